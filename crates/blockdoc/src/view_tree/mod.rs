// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The reader-side view of the document.
//!
//! A [`ViewTree`] is an immutable snapshot projected from the shared tree:
//! blocks addressed by [`BlockPath`], text resolved inline, data payloads
//! parsed. Commands read the snapshot to decide what to do, then express
//! the decision as a mutation batch against the shared tree. Paths are
//! positional and shift whenever siblings are inserted or removed, so a
//! path must never be held across a committed batch.
//!
//! All offsets are UTF-16 code units.

mod node;
mod point;
mod project;

pub use node::{ViewBlock, ViewTree};
pub use point::{BlockPath, Point, Selection};
