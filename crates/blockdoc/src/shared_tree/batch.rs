// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Operation batches: the unit of atomicity against the shared tree.

use serde::{Deserialize, Serialize};

use crate::block::BlockType;

use super::store::BlockRecord;
use super::text::{TextRecord, TextRun};
use super::{BlockId, TextId};

/// A single atomic field mutation against the shared tree.
///
/// Mutations are deliberately fine-grained: structure changes are explicit
/// link edits rather than implicit side effects, so a batch reads as a
/// complete record of what changed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Mutation {
    /// Insert a new block record. Records enter the tree unlinked; linkage
    /// is established by a following [`Mutation::InsertChild`].
    InsertBlock { record: BlockRecord },

    /// Remove a block record. The block must be unlinked and childless.
    RemoveBlock { id: BlockId },

    /// Replace a block's type.
    SetBlockType { id: BlockId, ty: BlockType },

    /// Replace a block's serialized data payload.
    SetBlockData { id: BlockId, data: String },

    /// Link `child` into `parent`'s child order at `index`.
    InsertChild {
        parent: BlockId,
        index: usize,
        child: BlockId,
    },

    /// Unlink `child` from `parent`, leaving the child record in place.
    RemoveChild { parent: BlockId, child: BlockId },

    /// Insert a new text record.
    InsertText { record: TextRecord },

    /// Remove a text record. No block may still reference it.
    RemoveText { id: TextId },

    /// Replace the UTF-16 span `[at, at + delete)` of a text record with
    /// the given runs.
    SpliceText {
        id: TextId,
        at: usize,
        delete: usize,
        insert: Vec<TextRun>,
    },
}

/// An ordered list of mutations applied as one replicated transaction.
///
/// The name is a human-readable operation tag used for diagnostics and
/// history grouping; it has no semantic effect. A batch is constructed by
/// one mutation primitive, executed exactly once, and then discarded.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OperationBatch {
    name: String,
    mutations: Vec<Mutation>,
}

impl OperationBatch {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mutations: Vec::new(),
        }
    }

    pub fn push(&mut self, mutation: Mutation) {
        self.mutations.push(mutation);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    pub fn len(&self) -> usize {
        self.mutations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }
}
