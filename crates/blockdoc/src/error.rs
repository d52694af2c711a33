// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Error types for document editing operations.

use thiserror::Error;

use crate::shared_tree::{BlockId, TextId};
use crate::view_tree::BlockPath;

/// Errors that can occur while editing a block document.
///
/// Read-only is deliberately absent: mutating a read-only element is an
/// expected condition and a silent no-op, never a failure.
#[derive(Error, Debug)]
pub enum EditError {
    /// An operation needed a selection but none was given or active.
    #[error("no selection given and no active selection")]
    NoSelection,

    /// The selection has the wrong shape for the operation.
    #[error("invalid selection: expected an expanded range")]
    InvalidSelection,

    /// Block not found in the shared tree.
    #[error("block not found: {0:?}")]
    BlockNotFound(BlockId),

    /// Text record not found in the shared tree.
    #[error("text not found: {0:?}")]
    TextNotFound(TextId),

    /// No block exists at the given view-tree path.
    #[error("no block at path {0:?}")]
    PathNotFound(BlockPath),

    /// The block carries no text record.
    #[error("block {0:?} has no text content")]
    NoText(BlockId),

    /// Attempted to insert a block id that already exists.
    #[error("block already exists: {0:?}")]
    DuplicateBlock(BlockId),

    /// Attempted to insert a text id that already exists.
    #[error("text already exists: {0:?}")]
    DuplicateText(TextId),

    /// Text offset or child index past the end of its sequence.
    #[error("offset {offset} out of bounds (length {len})")]
    OffsetOutOfBounds { offset: usize, len: usize },

    /// Attempted to remove a block that is still linked into the tree.
    #[error("block {0:?} is still linked into the tree")]
    StillLinked(BlockId),

    /// Attempted to remove a text record a block still points at.
    #[error("text {0:?} is still referenced by a block")]
    TextInUse(TextId),

    /// The document root cannot be removed.
    #[error("cannot remove the document root")]
    CannotRemoveRoot,

    /// The document root cannot be linked under another block.
    #[error("cannot give the document root a parent")]
    CannotReparentRoot,

    /// Child-link mutation named a child not under that parent.
    #[error("block {child:?} is not a child of {parent:?}")]
    ChildNotFound { parent: BlockId, child: BlockId },

    /// Child-link mutation would break single-parenthood.
    #[error("block {0:?} already has a parent")]
    AlreadyParented(BlockId),

    /// Child-link mutation would make a block its own ancestor.
    #[error("linking {child:?} under {parent:?} would create a cycle")]
    WouldCycle { parent: BlockId, child: BlockId },

    /// A block data payload failed to parse as a JSON object.
    #[error("malformed block data: {0}")]
    MalformedData(String),
}

/// Result alias used throughout this crate.
pub type Result<T> = std::result::Result<T, EditError>;
