// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Editing-command layer for a collaborative block-structured document.
//!
//! The crate is split along the write path:
//!
//! * [`shared_tree`] is the persistence kernel. It owns block, child-list
//!   and text records, applies [`OperationBatch`]es atomically and audits
//!   referential integrity.
//! * [`view_tree`] is the read side: an immutable projection of the
//!   kernel into a positional tree, addressed by [`BlockPath`]s, plus the
//!   selection types layered on top of it.
//! * [`document_model`] holds [`DocumentModel`], the command surface.
//!   Commands resolve the selection against a view snapshot, consult the
//!   read-only gate, and commit their whole effect as one named batch.
//!
//! Text offsets are UTF-16 code units throughout, matching what editor
//! surfaces report.

pub mod block;
pub mod document_model;
pub mod error;
pub mod shared_tree;
pub mod view_tree;

pub use block::{parse_data, BlockType, DataMap};
pub use document_model::{block_text_content, DocumentModel};
pub use error::{EditError, Result};
pub use shared_tree::{
    utf16_len, BlockId, BlockRecord, Mutation, OperationBatch, RunAttrs, SharedTree, TextId,
    TextRecord, TextRun,
};
pub use view_tree::{BlockPath, Point, Selection, ViewBlock, ViewTree};

pub use doc_mentions::{render_date_value, Mention, MentionKind, PageResolver};
