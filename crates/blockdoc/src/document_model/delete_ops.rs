// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Deletion commands: backward/forward merges, lifting, range removal.
//!
//! Backspace at a block boundary dispatches on a per-type policy table
//! instead of branching on type strings: non-paragraph blocks convert to
//! paragraphs, nested first children lift one level, everything else
//! merges into the previous visible block in document order.

use crate::block::BlockType;
use crate::error::{EditError, Result};
use crate::shared_tree::{BlockId, BlockRecord, Mutation, OperationBatch, TextId, TextRecord};
use crate::view_tree::{BlockPath, Point, Selection, ViewBlock};

use super::tree_ops::{adopt_children, remove_subtree};
use super::DocumentModel;

impl DocumentModel {
    /// Delete backward at a block boundary.
    ///
    /// Collapsed: a non-paragraph block converts to a paragraph; a nested
    /// first child at offset 0 lifts one level; otherwise the block merges
    /// into the previous visible block (a no-op at the very start of the
    /// document). Range: collapse to the start edge and delete the
    /// original range.
    pub fn delete_block_backward(&mut self, at: Option<Selection>) -> Result<()> {
        let selection = self.resolve_selection(at)?;
        let view = self.view();
        let start = Self::require_block(&view, &selection.start().path)?;
        if self.is_element_read_only(&start.id) {
            return Ok(());
        }

        if !selection.is_collapsed() {
            let caret = self.delete_range(&selection)?;
            self.selection = Some(Selection::collapsed(caret));
            return Ok(());
        }

        let point = selection.start().clone();
        if start.ty.converts_on_backspace() {
            let id = start.id.clone();
            self.turn_into_paragraph(&id)?;
            self.selection = Some(Selection::collapsed(point));
            return Ok(());
        }
        if point.path.depth() > 1
            && point.offset == 0
            && point.path.index_in_parent() == Some(0)
        {
            let lifted = self.lift_block(&point.path)?;
            self.selection = Some(Selection::caret(lifted, 0));
            return Ok(());
        }
        self.merge_block_backward(&point.path)
    }

    /// Delete forward at a block boundary: the current block absorbs the
    /// next visible block. A no-op in the last block. Range: as backward.
    pub fn delete_block_forward(&mut self, at: Option<Selection>) -> Result<()> {
        let selection = self.resolve_selection(at)?;
        let view = self.view();
        let start = Self::require_block(&view, &selection.start().path)?;
        if self.is_element_read_only(&start.id) {
            return Ok(());
        }

        if !selection.is_collapsed() {
            let caret = self.delete_range(&selection)?;
            self.selection = Some(Selection::collapsed(caret));
            return Ok(());
        }

        let point = selection.start().clone();
        let Some(next) = view.next_block(&point.path) else {
            return Ok(());
        };
        let Some(next_parent_path) = next.path.parent() else {
            return Err(EditError::PathNotFound(next.path.clone()));
        };
        let next_parent_id = Self::require_block(&view, &next_parent_path)?.id.clone();
        self.merge_blocks(start, next, &next_parent_id, "merge_block_forward")?;
        // The absorbing block did not move; the cursor stays put.
        self.selection = Some(Selection::collapsed(point));
        Ok(())
    }

    /// Remove every block and leave one empty root-level paragraph.
    /// Unconditional: no selection required.
    pub fn delete_entire_document(&mut self) -> Result<()> {
        let root_id = self.tree.root_id().clone();
        if self.is_element_read_only(&root_id) {
            return Ok(());
        }
        let view = self.view();

        let mut batch = OperationBatch::new("delete_entire_document");
        for child in &view.root().children {
            remove_subtree(child, &root_id, &mut batch);
        }
        let text_id = TextId::generate();
        batch.push(Mutation::InsertText {
            record: TextRecord::empty(text_id.clone()),
        });
        let block_id = BlockId::generate();
        batch.push(Mutation::InsertBlock {
            record: BlockRecord::new(block_id.clone(), BlockType::Paragraph, Some(text_id)),
        });
        batch.push(Mutation::InsertChild {
            parent: root_id,
            index: 0,
            child: block_id,
        });
        self.tree.apply(&batch)?;

        self.selection = Some(Selection::caret([0], 0));
        Ok(())
    }

    /// Delete the contents of a range selection.
    ///
    /// Fails with `InvalidSelection` when the selection is collapsed.
    pub fn remove_range(&mut self, at: Selection) -> Result<()> {
        if at.is_collapsed() {
            return Err(EditError::InvalidSelection);
        }
        let view = self.view();
        let start = Self::require_block(&view, &at.start().path)?;
        if self.is_element_read_only(&start.id) {
            return Ok(());
        }
        let caret = self.delete_range(&at)?;
        self.selection = Some(Selection::collapsed(caret));
        Ok(())
    }

    // ────────────────────────────────────────────────────────────────────
    // Primitives
    // ────────────────────────────────────────────────────────────────────

    /// Delete everything strictly inside `selection`, merging the two
    /// boundary blocks into one. Returns the caret at the range start.
    /// One batch.
    pub(crate) fn delete_range(&mut self, selection: &Selection) -> Result<Point> {
        let view = self.view();
        let start_point = selection.start();
        let end_point = selection.end();
        let start = Self::require_block(&view, &start_point.path)?;
        let end = Self::require_block(&view, &end_point.path)?;
        let so = start_point.offset.min(start.text_len_utf16());
        let eo = end_point.offset.min(end.text_len_utf16());
        let caret = Point::new(start_point.path.clone(), so);

        let mut batch = OperationBatch::new("remove_range");

        if start.id == end.id {
            if let Some(text) = &start.text {
                if eo > so {
                    batch.push(Mutation::SpliceText {
                        id: text.id.clone(),
                        at: so,
                        delete: eo - so,
                        insert: Vec::new(),
                    });
                }
            }
            self.tree.apply(&batch)?;
            return Ok(caret);
        }

        // Boundary text: trim the start block from the cursor on and pull
        // the end block's tail up in the same splice.
        let end_tail = match &end.text {
            Some(text) => text.runs_from(eo)?,
            None => Vec::new(),
        };
        if let Some(text) = &start.text {
            batch.push(Mutation::SpliceText {
                id: text.id.clone(),
                at: so,
                delete: text.len_utf16() - so,
                insert: end_tail,
            });
        }

        // Text of the end block's strict ancestors inside the range lies
        // entirely within it. The blocks themselves survive: they still
        // hold the children that follow the range.
        for block in view.blocks() {
            if block.path > start_point.path
                && block.path < end_point.path
                && block.path.is_ancestor_of(&end_point.path)
            {
                if let Some(text) = &block.text {
                    if text.len_utf16() > 0 {
                        batch.push(Mutation::SpliceText {
                            id: text.id.clone(),
                            at: 0,
                            delete: text.len_utf16(),
                            insert: Vec::new(),
                        });
                    }
                }
            }
        }

        // The end block dissolves into the start block.
        adopt_children(end, &start.id, start.children.len(), &mut batch);
        let Some(end_parent_path) = end_point.path.parent() else {
            return Err(EditError::PathNotFound(end_point.path.clone()));
        };
        let end_parent_id = Self::require_block(&view, &end_parent_path)?.id.clone();
        batch.push(Mutation::RemoveChild {
            parent: end_parent_id,
            child: end.id.clone(),
        });
        batch.push(Mutation::RemoveBlock {
            id: end.id.clone(),
        });
        if let Some(text) = &end.text {
            batch.push(Mutation::RemoveText {
                id: text.id.clone(),
            });
        }

        // Fully-enclosed subtrees. Document order visits parents before
        // children, so tracking removed roots keeps this topmost-only.
        let mut removed: Vec<BlockPath> = Vec::new();
        for block in view.blocks() {
            if block.path <= start_point.path || block.path >= end_point.path {
                continue;
            }
            if block.path.is_prefix_of(&end_point.path) {
                continue;
            }
            if removed.iter().any(|r| r.is_prefix_of(&block.path)) {
                continue;
            }
            let Some(parent_path) = block.path.parent() else {
                continue;
            };
            let parent_id = Self::require_block(&view, &parent_path)?.id.clone();
            remove_subtree(block, &parent_id, &mut batch);
            removed.push(block.path.clone());
        }

        self.tree.apply(&batch)?;
        Ok(caret)
    }

    /// Convert a block to a paragraph in place, keeping data and
    /// children. One batch.
    fn turn_into_paragraph(&mut self, id: &BlockId) -> Result<()> {
        let mut batch = OperationBatch::new("turn_into_paragraph");
        batch.push(Mutation::SetBlockType {
            id: id.clone(),
            ty: BlockType::Paragraph,
        });
        self.tree.apply(&batch)
    }

    /// Re-parent the block at `path` under its grandparent, immediately
    /// after its former parent. Children travel with it. One batch.
    /// Returns the block's new path.
    fn lift_block(&mut self, path: &BlockPath) -> Result<BlockPath> {
        let view = self.view();
        let block = Self::require_block(&view, path)?;
        let Some(parent_path) = path.parent() else {
            return Err(EditError::PathNotFound(path.clone()));
        };
        let Some(grandparent_path) = parent_path.parent() else {
            return Err(EditError::PathNotFound(parent_path));
        };
        let parent_id = Self::require_block(&view, &parent_path)?.id.clone();
        let grandparent_id = Self::require_block(&view, &grandparent_path)?.id.clone();
        let parent_index = parent_path.index_in_parent().unwrap_or(0);

        let mut batch = OperationBatch::new("lift_block");
        batch.push(Mutation::RemoveChild {
            parent: parent_id,
            child: block.id.clone(),
        });
        batch.push(Mutation::InsertChild {
            parent: grandparent_id,
            index: parent_index + 1,
            child: block.id.clone(),
        });
        self.tree.apply(&batch)?;
        Ok(grandparent_path.child(parent_index + 1))
    }

    /// Merge the block at `path` into the previous visible block in
    /// document order. A no-op at the very start of the document.
    fn merge_block_backward(&mut self, path: &BlockPath) -> Result<()> {
        let view = self.view();
        let block = Self::require_block(&view, path)?;
        let Some(previous) = view.previous_block(path) else {
            return Ok(());
        };
        // The join point, before the appended content.
        let join = Point::new(previous.path.clone(), previous.text_len_utf16());
        let Some(parent_path) = path.parent() else {
            return Err(EditError::PathNotFound(path.clone()));
        };
        let parent_id = Self::require_block(&view, &parent_path)?.id.clone();
        self.merge_blocks(previous, block, &parent_id, "merge_block_backward")?;
        self.selection = Some(Selection::collapsed(join));
        Ok(())
    }

    /// Merge `absorbed` into `absorbing`: text appended, children adopted
    /// in order, record removed. One batch.
    fn merge_blocks(
        &mut self,
        absorbing: &ViewBlock,
        absorbed: &ViewBlock,
        absorbed_parent: &BlockId,
        name: &str,
    ) -> Result<()> {
        let mut batch = OperationBatch::new(name);
        if let (Some(into), Some(from)) = (&absorbing.text, &absorbed.text) {
            let runs = from.runs_from(0)?;
            if !runs.is_empty() {
                batch.push(Mutation::SpliceText {
                    id: into.id.clone(),
                    at: into.len_utf16(),
                    delete: 0,
                    insert: runs,
                });
            }
        }
        adopt_children(absorbed, &absorbing.id, absorbing.children.len(), &mut batch);
        batch.push(Mutation::RemoveChild {
            parent: absorbed_parent.clone(),
            child: absorbed.id.clone(),
        });
        batch.push(Mutation::RemoveBlock {
            id: absorbed.id.clone(),
        });
        if let Some(text) = &absorbed.text {
            batch.push(Mutation::RemoveText {
                id: text.id.clone(),
            });
        }
        self.tree.apply(&batch)
    }
}
