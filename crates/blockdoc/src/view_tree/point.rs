// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Paths, points and selections over the view tree.

use serde::{Deserialize, Serialize};

/// Positional address of a block: child indices from the document root.
///
/// `[0]` is the first top-level block, `[0, 2]` its third child, and so
/// on. The empty path addresses the root itself; commands never produce
/// it but traversal code must tolerate it.
///
/// **Stability note:** paths shift whenever siblings are inserted or
/// removed. After a committed batch every held path must be re-derived
/// from a fresh projection.
///
/// The derived ordering is document order: a block sorts before its own
/// descendants, and those before its following siblings.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockPath(Vec<usize>);

impl BlockPath {
    /// The empty path, addressing the document root.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of indices, i.e. nesting depth. Top-level blocks have
    /// depth 1.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn is_top_level(&self) -> bool {
        self.0.len() == 1
    }

    /// The parent's path, or `None` for the root.
    pub fn parent(&self) -> Option<BlockPath> {
        let (_, init) = self.0.split_last()?;
        Some(Self(init.to_vec()))
    }

    /// This block's index within its parent, or `None` for the root.
    pub fn index_in_parent(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// The path of this block's child at `index`.
    pub fn child(&self, index: usize) -> BlockPath {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// The path of the sibling at `index` under the same parent.
    ///
    /// Returns `None` for the root, which has no siblings.
    pub fn sibling(&self, index: usize) -> Option<BlockPath> {
        let mut parent = self.parent()?;
        parent.0.push(index);
        Some(parent)
    }

    /// Whether `self` lies on the path from the root to `other`,
    /// `other` itself included.
    pub fn is_prefix_of(&self, other: &BlockPath) -> bool {
        other.0.len() >= self.0.len() && other.0[..self.0.len()] == self.0[..]
    }

    /// Strict ancestry: a prefix of `other` but not `other` itself.
    pub fn is_ancestor_of(&self, other: &BlockPath) -> bool {
        other.0.len() > self.0.len() && self.is_prefix_of(other)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }
}

impl From<Vec<usize>> for BlockPath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl<const N: usize> From<[usize; N]> for BlockPath {
    fn from(indices: [usize; N]) -> Self {
        Self(indices.to_vec())
    }
}

/// A caret position: a block plus a UTF-16 code unit offset into its
/// text.
///
/// The derived ordering compares paths first, then offsets, which is
/// document order for points.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Point {
    pub path: BlockPath,
    pub offset: usize,
}

impl Point {
    pub fn new(path: impl Into<BlockPath>, offset: usize) -> Self {
        Self {
            path: path.into(),
            offset,
        }
    }

    /// The point at offset 0 of `path`.
    pub fn start_of(path: impl Into<BlockPath>) -> Self {
        Self::new(path, 0)
    }
}

/// A selection: either a collapsed caret or an expanded range.
///
/// `anchor` and `focus` are stored as given, so a backward drag keeps
/// its direction; [`Selection::start`] and [`Selection::end`] normalise
/// to document order on use.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: Point,
    pub focus: Point,
}

impl Selection {
    pub fn collapsed(point: Point) -> Self {
        Self {
            anchor: point.clone(),
            focus: point,
        }
    }

    pub fn range(anchor: Point, focus: Point) -> Self {
        Self { anchor, focus }
    }

    /// The caret at offset `offset` of the block at `path`.
    pub fn caret(path: impl Into<BlockPath>, offset: usize) -> Self {
        Self::collapsed(Point::new(path, offset))
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// The earlier of the two edges in document order.
    pub fn start(&self) -> &Point {
        if self.anchor <= self.focus {
            &self.anchor
        } else {
            &self.focus
        }
    }

    /// The later of the two edges in document order.
    pub fn end(&self) -> &Point {
        if self.anchor <= self.focus {
            &self.focus
        } else {
            &self.anchor
        }
    }

    /// Collapse onto the earlier edge.
    pub fn collapse_to_start(&self) -> Selection {
        Self::collapsed(self.start().clone())
    }
}
