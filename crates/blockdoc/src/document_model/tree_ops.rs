// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Low-level tree mutation building blocks shared by the commands.

use crate::block::BlockType;
use crate::error::Result;
use crate::shared_tree::{
    BlockId, BlockRecord, Mutation, OperationBatch, TextId, TextRecord, TextRun,
};
use crate::view_tree::{BlockPath, ViewBlock};

use super::DocumentModel;

impl DocumentModel {
    /// Insert a new block of `ty` holding `text` under the block at
    /// `parent`, at child position `index` (clamped to the child count).
    ///
    /// This is the document-construction primitive: it does not move the
    /// selection. Returns the new block's id, or `None` when the parent
    /// element is read-only and nothing was inserted.
    pub fn insert_block(
        &mut self,
        parent: &BlockPath,
        index: usize,
        ty: BlockType,
        text: &str,
    ) -> Result<Option<BlockId>> {
        let view = self.view();
        let parent_block = Self::require_block(&view, parent)?;
        if self.is_element_read_only(&parent_block.id) {
            return Ok(None);
        }
        let index = index.min(parent_block.children.len());

        let block_id = BlockId::generate();
        let text_id = TextId::generate();
        let runs = if text.is_empty() {
            Vec::new()
        } else {
            vec![TextRun::plain(text)]
        };

        let mut batch = OperationBatch::new("insert_block");
        batch.push(Mutation::InsertText {
            record: TextRecord::new(text_id.clone(), runs),
        });
        batch.push(Mutation::InsertBlock {
            record: BlockRecord::new(block_id.clone(), ty, Some(text_id)),
        });
        batch.push(Mutation::InsertChild {
            parent: parent_block.id.clone(),
            index,
            child: block_id.clone(),
        });
        self.tree.apply(&batch)?;
        Ok(Some(block_id))
    }
}

/// Emit the mutations that delete `block` and its whole subtree.
///
/// Children are unlinked and removed bottom-up so every record is
/// childless and unlinked by the time its removal applies.
pub(super) fn remove_subtree(block: &ViewBlock, parent_id: &BlockId, batch: &mut OperationBatch) {
    batch.push(Mutation::RemoveChild {
        parent: parent_id.clone(),
        child: block.id.clone(),
    });
    for child in &block.children {
        remove_subtree(child, &block.id, batch);
    }
    batch.push(Mutation::RemoveBlock {
        id: block.id.clone(),
    });
    if let Some(text) = &block.text {
        batch.push(Mutation::RemoveText {
            id: text.id.clone(),
        });
    }
}

/// Emit the mutations that move every child of `from` to the end of
/// `to`'s child list, preserving order. `to_len` is `to`'s child count
/// before the batch.
pub(super) fn adopt_children(
    from: &ViewBlock,
    to: &BlockId,
    to_len: usize,
    batch: &mut OperationBatch,
) {
    for (i, child) in from.children.iter().enumerate() {
        batch.push(Mutation::RemoveChild {
            parent: from.id.clone(),
            child: child.id.clone(),
        });
        batch.push(Mutation::InsertChild {
            parent: to.clone(),
            index: to_len + i,
            child: child.id.clone(),
        });
    }
}
