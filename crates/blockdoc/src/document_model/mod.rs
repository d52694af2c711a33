// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The editing command layer.
//!
//! [`DocumentModel`] is the public surface: it resolves selections against
//! a fresh view-tree projection, dispatches on block-type policy, expresses
//! every structural edit as one or more named mutation batches against the
//! shared tree, and repositions the selection afterwards. Content flattening
//! for the rendering leaves lives in [`block_text_content`].

mod base;
mod block_data;
mod break_ops;
mod content;
mod delete_ops;
mod mentions;
mod tree_ops;

pub use base::DocumentModel;
pub use content::block_text_content;
