// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! View-tree nodes and document-order traversal.

use crate::block::{BlockType, DataMap};
use crate::shared_tree::{BlockId, TextRecord};

use super::BlockPath;

/// One block in a projected snapshot: record fields resolved, data
/// parsed, text pulled inline, children nested.
#[derive(Clone, Debug)]
pub struct ViewBlock {
    pub id: BlockId,
    pub ty: BlockType,
    pub path: BlockPath,
    pub data: DataMap,
    pub text: Option<TextRecord>,
    pub children: Vec<ViewBlock>,
}

impl ViewBlock {
    /// UTF-16 length of this block's own text; 0 when it has none.
    pub fn text_len_utf16(&self) -> usize {
        self.text.as_ref().map_or(0, TextRecord::len_utf16)
    }

    /// This block's own literal run text, placeholders included.
    pub fn raw_text(&self) -> String {
        self.text.as_ref().map(TextRecord::plain_text).unwrap_or_default()
    }
}

/// An immutable snapshot of the whole document.
///
/// Traversal is document order: depth-first, parents before children.
/// The root page itself is excluded from [`ViewTree::blocks`] and from
/// previous/next stepping; it is an addressing origin, not content.
#[derive(Clone, Debug)]
pub struct ViewTree {
    pub(super) root: ViewBlock,
}

impl ViewTree {
    pub fn root(&self) -> &ViewBlock {
        &self.root
    }

    /// The block addressed by `path`; the empty path addresses the root.
    pub fn node_at(&self, path: &BlockPath) -> Option<&ViewBlock> {
        let mut node = &self.root;
        for &index in path.indices() {
            node = node.children.get(index)?;
        }
        Some(node)
    }

    /// The current path of the block with `id`, if it is in the document.
    pub fn path_of(&self, id: &BlockId) -> Option<BlockPath> {
        self.blocks()
            .into_iter()
            .find(|block| &block.id == id)
            .map(|block| block.path.clone())
    }

    /// Every block in document order, root excluded.
    pub fn blocks(&self) -> Vec<&ViewBlock> {
        fn walk<'a>(node: &'a ViewBlock, out: &mut Vec<&'a ViewBlock>) {
            out.push(node);
            for child in &node.children {
                walk(child, out);
            }
        }
        let mut out = Vec::new();
        for child in &self.root.children {
            walk(child, &mut out);
        }
        out
    }

    /// The block before `path` in document order, if any.
    pub fn previous_block(&self, path: &BlockPath) -> Option<&ViewBlock> {
        let blocks = self.blocks();
        let position = blocks.iter().position(|block| &block.path == path)?;
        position.checked_sub(1).map(|p| blocks[p])
    }

    /// The block after `path` in document order, if any.
    pub fn next_block(&self, path: &BlockPath) -> Option<&ViewBlock> {
        let blocks = self.blocks();
        let position = blocks.iter().position(|block| &block.path == path)?;
        blocks.get(position + 1).copied()
    }

    pub fn first_block(&self) -> Option<&ViewBlock> {
        self.root.children.first()
    }

    pub fn last_block(&self) -> Option<&ViewBlock> {
        self.blocks().last().copied()
    }
}
