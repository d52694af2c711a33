// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Break insertion: splitting a block at the cursor.

use crate::error::{EditError, Result};
use crate::shared_tree::{BlockId, BlockRecord, Mutation, OperationBatch, TextId, TextRecord};
use crate::view_tree::{Point, Selection};

use super::DocumentModel;

impl DocumentModel {
    /// Insert a block break at the selection.
    ///
    /// Collapsed: split the current block at the cursor into a new
    /// following sibling. The new block's type follows the break policy
    /// (list-ish blocks continue their type, everything else becomes a
    /// paragraph); children stay with the original block. A range
    /// selection deletes its contents first, then breaks at the collapsed
    /// point. Selection ends up at the start of the new block.
    pub fn insert_break(&mut self, at: Option<Selection>) -> Result<()> {
        let selection = self.resolve_selection(at)?;
        let view = self.view();
        let start = Self::require_block(&view, &selection.start().path)?;
        if self.is_element_read_only(&start.id) {
            return Ok(());
        }

        let point = if selection.is_collapsed() {
            selection.start().clone()
        } else {
            self.delete_range(&selection)?
        };
        self.split_at(&point)
    }

    /// Split the block at `point` into itself plus a new following
    /// sibling carrying the text after the cursor. One batch.
    fn split_at(&mut self, point: &Point) -> Result<()> {
        let view = self.view();
        let block = Self::require_block(&view, &point.path)?;
        let Some(parent_path) = point.path.parent() else {
            return Err(EditError::PathNotFound(point.path.clone()));
        };
        let parent_id = Self::require_block(&view, &parent_path)?.id.clone();
        let index = point.path.index_in_parent().unwrap_or(0);
        let offset = point.offset.min(block.text_len_utf16());

        let mut batch = OperationBatch::new("insert_break");
        let tail = match &block.text {
            Some(text) => {
                let tail = text.runs_from(offset)?;
                if !tail.is_empty() {
                    batch.push(Mutation::SpliceText {
                        id: text.id.clone(),
                        at: offset,
                        delete: text.len_utf16() - offset,
                        insert: Vec::new(),
                    });
                }
                tail
            }
            None => Vec::new(),
        };

        let text_id = TextId::generate();
        batch.push(Mutation::InsertText {
            record: TextRecord::new(text_id.clone(), tail),
        });
        let new_id = BlockId::generate();
        batch.push(Mutation::InsertBlock {
            record: BlockRecord::new(new_id.clone(), block.ty.break_successor(), Some(text_id)),
        });
        batch.push(Mutation::InsertChild {
            parent: parent_id,
            index: index + 1,
            child: new_id,
        });
        self.tree.apply(&batch)?;

        self.selection = Some(Selection::caret(parent_path.child(index + 1), 0));
        Ok(())
    }
}
