// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The shared document tree: the replicated store of block and text records.
//!
//! This is the authoritative side of the dual-tree model. All mutation goes
//! through [`SharedTree::apply`] as a named [`OperationBatch`] executed
//! all-or-nothing; readers see either the state before a batch or the state
//! after it, never anything in between.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

mod batch;
mod store;
mod text;

pub use batch::{Mutation, OperationBatch};
pub use store::{BlockRecord, SharedTree};
pub use text::{utf16_len, RunAttrs, TextRecord, TextRun};

/// Stable, globally unique block identifier.
///
/// Ids are opaque strings; freshly generated ids are simple-form UUID v4.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(String);

impl BlockId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for BlockId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Stable identifier of a text record.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextId(String);

impl TextId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TextId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TextId {
    fn from(s: String) -> Self {
        Self(s)
    }
}
