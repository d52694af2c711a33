// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Block data patching: shallow read-modify-write merges addressed by id.

use tracing::warn;

use crate::block::{merge_data, DataMap};
use crate::error::Result;
use crate::shared_tree::{BlockId, Mutation, OperationBatch};
use crate::view_tree::{Point, Selection};

use super::DocumentModel;

impl DocumentModel {
    /// Merge `patch` onto the block's data, incoming keys winning.
    /// Keys absent from the patch are left untouched. One batch.
    ///
    /// With `select`, the selection moves to the start of the patched
    /// block afterwards. Blocks are addressed by id here, not by path:
    /// a concurrent edit may have moved or removed the block, in which
    /// case the write is skipped and the selection falls back to the
    /// start of the document.
    pub fn set_block_data(
        &mut self,
        block_id: &BlockId,
        patch: &DataMap,
        select: bool,
    ) -> Result<()> {
        if self.is_element_read_only(block_id) {
            return Ok(());
        }

        match self.tree.block(block_id) {
            Some(record) => {
                let merged = merge_data(&record.data, patch)?;
                let mut batch = OperationBatch::new("set_block_data");
                batch.push(Mutation::SetBlockData {
                    id: block_id.clone(),
                    data: merged,
                });
                self.tree.apply(&batch)?;
            }
            None => {
                warn!(block = %block_id, "set_block_data target is not in the tree, skipping write");
            }
        }

        if select {
            let view = self.view();
            let point = match view.path_of(block_id) {
                Some(path) => Point::start_of(path),
                None => {
                    warn!(block = %block_id, "patched block has no position, selecting document start");
                    Point::new([0], 0)
                }
            };
            self.selection = Some(Selection::collapsed(point));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::block::{BlockType, DataMap};
    use crate::shared_tree::BlockId;
    use crate::view_tree::{BlockPath, Selection};

    use super::super::DocumentModel;

    fn patch(value: serde_json::Value) -> DataMap {
        match value {
            serde_json::Value::Object(map) => map,
            other => panic!("expected an object literal, got {other}"),
        }
    }

    fn model_with_todo() -> (DocumentModel, BlockId) {
        let mut model = DocumentModel::new();
        let id = model
            .insert_block(&BlockPath::root(), 1, BlockType::TodoList, "buy milk")
            .unwrap()
            .unwrap();
        (model, id)
    }

    #[test]
    fn patches_accumulate_shallowly() {
        let (mut model, id) = model_with_todo();
        model.set_block_data(&id, &patch(json!({"checked": true})), false).unwrap();
        model.set_block_data(&id, &patch(json!({"due": "friday"})), false).unwrap();

        let view = model.view();
        let block = view.node_at(&[1].into()).unwrap();
        assert_eq!(block.data.get("checked"), Some(&json!(true)));
        assert_eq!(block.data.get("due"), Some(&json!("friday")));
    }

    #[test]
    fn incoming_keys_win() {
        let (mut model, id) = model_with_todo();
        model.set_block_data(&id, &patch(json!({"checked": true})), false).unwrap();
        model.set_block_data(&id, &patch(json!({"checked": false})), false).unwrap();

        let view = model.view();
        let block = view.node_at(&[1].into()).unwrap();
        assert_eq!(block.data.get("checked"), Some(&json!(false)));
    }

    #[test]
    fn select_moves_to_the_block_start() {
        let (mut model, id) = model_with_todo();
        model.select(Selection::caret([0], 0));
        model.set_block_data(&id, &patch(json!({"checked": true})), true).unwrap();
        assert_eq!(model.selection(), Some(&Selection::caret([1], 0)));
    }

    #[test]
    fn unknown_block_falls_back_to_the_document_start() {
        let (mut model, _) = model_with_todo();
        let before = model.revision();
        model.select(Selection::caret([1], 4));

        let stranger = BlockId::generate();
        model.set_block_data(&stranger, &patch(json!({"checked": true})), true).unwrap();

        // No write happened, but the selection still repositioned
        assert_eq!(model.revision(), before);
        assert_eq!(model.selection(), Some(&Selection::caret([0], 0)));
    }

    #[test]
    fn read_only_patches_are_dropped() {
        let (mut model, id) = model_with_todo();
        let before = model.revision();
        model.set_read_only(true);
        model.set_block_data(&id, &patch(json!({"checked": true})), true).unwrap();

        assert_eq!(model.revision(), before);
        assert_eq!(model.selection(), None);
    }

    #[test]
    fn element_gate_drops_patches_for_that_block_only() {
        let (mut model, id) = model_with_todo();
        let other = model
            .insert_block(&BlockPath::root(), 2, BlockType::TodoList, "walk dog")
            .unwrap()
            .unwrap();
        let gated = id.clone();
        model.set_element_gate(move |candidate| *candidate == gated);

        model.set_block_data(&id, &patch(json!({"checked": true})), false).unwrap();
        model.set_block_data(&other, &patch(json!({"checked": true})), false).unwrap();

        let view = model.view();
        assert_eq!(view.node_at(&[1].into()).unwrap().data.get("checked"), None);
        assert_eq!(
            view.node_at(&[2].into()).unwrap().data.get("checked"),
            Some(&json!(true)),
        );
    }
}
