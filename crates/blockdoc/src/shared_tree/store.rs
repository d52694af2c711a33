// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The shared tree store and batch application.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::block::{parse_data, BlockType, EMPTY_DATA};
use crate::error::{EditError, Result};

use super::batch::{Mutation, OperationBatch};
use super::text::TextRecord;
use super::{BlockId, TextId};

/// One block's replicated record.
///
/// `parent` and `children` are two sides of the same link: every non-root
/// block has exactly one parent and appears exactly once in that parent's
/// child order. `data` is a flat JSON object serialized to text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockRecord {
    pub id: BlockId,
    pub ty: BlockType,
    pub parent: Option<BlockId>,
    pub children: Vec<BlockId>,
    pub text: Option<TextId>,
    pub data: String,
}

impl BlockRecord {
    /// A fresh unlinked record with an empty data payload.
    pub fn new(id: BlockId, ty: BlockType, text: Option<TextId>) -> Self {
        Self {
            id,
            ty,
            parent: None,
            children: Vec::new(),
            text,
            data: EMPTY_DATA.to_string(),
        }
    }
}

/// In-process handle to the replicated document tree.
///
/// Stands in for the external CRDT engine named by the editing contract:
/// atomic reads of individual records plus [`SharedTree::apply`], which
/// executes a named mutation batch all-or-nothing. A failed batch leaves
/// the tree byte-for-byte unchanged.
///
/// A fresh tree is never empty: it holds the root page and one empty
/// paragraph.
#[derive(Clone, Debug)]
pub struct SharedTree {
    root: BlockId,
    blocks: HashMap<BlockId, BlockRecord>,
    texts: HashMap<TextId, TextRecord>,
    revision: u64,
}

impl SharedTree {
    pub fn new() -> Self {
        let root_id = BlockId::generate();
        let para_id = BlockId::generate();
        let text_id = TextId::generate();

        let mut root = BlockRecord::new(root_id.clone(), BlockType::Page, None);
        root.children.push(para_id.clone());

        let mut para =
            BlockRecord::new(para_id.clone(), BlockType::Paragraph, Some(text_id.clone()));
        para.parent = Some(root_id.clone());

        let mut blocks = HashMap::new();
        blocks.insert(root_id.clone(), root);
        blocks.insert(para_id, para);

        let mut texts = HashMap::new();
        texts.insert(text_id.clone(), TextRecord::empty(text_id));

        Self {
            root: root_id,
            blocks,
            texts,
            revision: 0,
        }
    }

    // ────────────────────────────────────────────────────────────────────
    // Accessors
    // ────────────────────────────────────────────────────────────────────

    pub fn root_id(&self) -> &BlockId {
        &self.root
    }

    /// Monotonic count of committed batches.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn block(&self, id: &BlockId) -> Option<&BlockRecord> {
        self.blocks.get(id)
    }

    /// The root record. The root always exists and cannot be removed.
    pub fn root_record(&self) -> &BlockRecord {
        &self.blocks[&self.root]
    }

    pub fn text(&self, id: &TextId) -> Option<&TextRecord> {
        self.texts.get(id)
    }

    /// Number of block records, root included.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    // ────────────────────────────────────────────────────────────────────
    // Batch application
    // ────────────────────────────────────────────────────────────────────

    /// Execute a batch all-or-nothing.
    ///
    /// Mutations are staged against a copy of the tree; the copy replaces
    /// the live state only if every mutation applies cleanly, so a failure
    /// can never leave a half-applied batch visible.
    pub fn apply(&mut self, batch: &OperationBatch) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }

        let mut staged = self.clone();
        for mutation in batch.mutations() {
            staged.apply_mutation(mutation)?;
        }
        staged.revision = self.revision + 1;
        staged.assert_invariants();

        debug!(
            batch = batch.name(),
            mutations = batch.len(),
            revision = staged.revision,
            "batch committed"
        );
        *self = staged;
        Ok(())
    }

    fn apply_mutation(&mut self, mutation: &Mutation) -> Result<()> {
        match mutation {
            Mutation::InsertBlock { record } => {
                if self.blocks.contains_key(&record.id) {
                    return Err(EditError::DuplicateBlock(record.id.clone()));
                }
                parse_data(&record.data)?;
                if let Some(text_id) = &record.text {
                    if !self.texts.contains_key(text_id) {
                        return Err(EditError::TextNotFound(text_id.clone()));
                    }
                }
                self.blocks.insert(record.id.clone(), record.clone());
            }
            Mutation::RemoveBlock { id } => {
                if *id == self.root {
                    return Err(EditError::CannotRemoveRoot);
                }
                let record = self
                    .blocks
                    .get(id)
                    .ok_or_else(|| EditError::BlockNotFound(id.clone()))?;
                if record.parent.is_some() || !record.children.is_empty() {
                    return Err(EditError::StillLinked(id.clone()));
                }
                self.blocks.remove(id);
            }
            Mutation::SetBlockType { id, ty } => {
                let record = self
                    .blocks
                    .get_mut(id)
                    .ok_or_else(|| EditError::BlockNotFound(id.clone()))?;
                record.ty = ty.clone();
            }
            Mutation::SetBlockData { id, data } => {
                parse_data(data)?;
                let record = self
                    .blocks
                    .get_mut(id)
                    .ok_or_else(|| EditError::BlockNotFound(id.clone()))?;
                record.data = data.clone();
            }
            Mutation::InsertChild {
                parent,
                index,
                child,
            } => {
                if *child == self.root {
                    return Err(EditError::CannotReparentRoot);
                }
                let child_record = self
                    .blocks
                    .get(child)
                    .ok_or_else(|| EditError::BlockNotFound(child.clone()))?;
                if child_record.parent.is_some() {
                    return Err(EditError::AlreadyParented(child.clone()));
                }
                if child == parent || self.is_ancestor(child, parent) {
                    return Err(EditError::WouldCycle {
                        parent: parent.clone(),
                        child: child.clone(),
                    });
                }
                let parent_record = self
                    .blocks
                    .get_mut(parent)
                    .ok_or_else(|| EditError::BlockNotFound(parent.clone()))?;
                if *index > parent_record.children.len() {
                    return Err(EditError::OffsetOutOfBounds {
                        offset: *index,
                        len: parent_record.children.len(),
                    });
                }
                parent_record.children.insert(*index, child.clone());
                if let Some(child_record) = self.blocks.get_mut(child) {
                    child_record.parent = Some(parent.clone());
                }
            }
            Mutation::RemoveChild { parent, child } => {
                let parent_record = self
                    .blocks
                    .get_mut(parent)
                    .ok_or_else(|| EditError::BlockNotFound(parent.clone()))?;
                let position = parent_record
                    .children
                    .iter()
                    .position(|c| c == child)
                    .ok_or_else(|| EditError::ChildNotFound {
                        parent: parent.clone(),
                        child: child.clone(),
                    })?;
                parent_record.children.remove(position);
                let child_record = self
                    .blocks
                    .get_mut(child)
                    .ok_or_else(|| EditError::BlockNotFound(child.clone()))?;
                child_record.parent = None;
            }
            Mutation::InsertText { record } => {
                if self.texts.contains_key(&record.id) {
                    return Err(EditError::DuplicateText(record.id.clone()));
                }
                self.texts.insert(record.id.clone(), record.clone());
            }
            Mutation::RemoveText { id } => {
                if self.blocks.values().any(|b| b.text.as_ref() == Some(id)) {
                    return Err(EditError::TextInUse(id.clone()));
                }
                self.texts
                    .remove(id)
                    .ok_or_else(|| EditError::TextNotFound(id.clone()))?;
            }
            Mutation::SpliceText {
                id,
                at,
                delete,
                insert,
            } => {
                let record = self
                    .texts
                    .get_mut(id)
                    .ok_or_else(|| EditError::TextNotFound(id.clone()))?;
                record.splice(*at, *delete, insert.clone())?;
            }
        }
        Ok(())
    }

    /// Whether `maybe_ancestor` appears on the parent chain of `block`.
    fn is_ancestor(&self, maybe_ancestor: &BlockId, block: &BlockId) -> bool {
        let mut current = self.blocks.get(block).and_then(|b| b.parent.as_ref());
        while let Some(parent) = current {
            if parent == maybe_ancestor {
                return true;
            }
            current = self.blocks.get(parent).and_then(|b| b.parent.as_ref());
        }
        false
    }

    // ────────────────────────────────────────────────────────────────────
    // Invariants
    // ────────────────────────────────────────────────────────────────────

    /// Structural audit of the whole tree, run after every committed batch
    /// in test builds and behind the `assert-invariants` feature:
    /// single parenthood, symmetric child links, no orphans or cycles, and
    /// one-to-one block/text correlation.
    #[cfg(any(test, feature = "assert-invariants"))]
    pub(crate) fn assert_invariants(&self) {
        use std::collections::HashSet;

        let root = self.blocks.get(&self.root).expect("root record missing");
        assert!(root.parent.is_none(), "root must not have a parent");
        assert_eq!(root.ty, BlockType::Page, "root must stay a page block");

        let mut linked: HashSet<&BlockId> = HashSet::new();
        let mut referenced_texts: HashSet<&TextId> = HashSet::new();
        for (id, record) in &self.blocks {
            assert_eq!(&record.id, id, "record id must match its key");
            for child in &record.children {
                let child_record = self
                    .blocks
                    .get(child)
                    .unwrap_or_else(|| panic!("dangling child link: {child:?}"));
                assert_eq!(
                    child_record.parent.as_ref(),
                    Some(id),
                    "child {child:?} does not point back at {id:?}"
                );
                assert!(linked.insert(child), "block {child:?} linked twice");
            }
            if let Some(text) = &record.text {
                assert!(
                    self.texts.contains_key(text),
                    "dangling text link: {text:?}"
                );
                assert!(
                    referenced_texts.insert(text),
                    "text {text:?} referenced twice"
                );
            }
            if id != &self.root {
                assert!(record.parent.is_some(), "orphan block: {id:?}");
            }
        }

        // Everything reachable from the root, exactly once; with symmetric
        // links established above this also rules out cycles.
        let mut reached: HashSet<&BlockId> = HashSet::new();
        let mut stack = vec![&self.root];
        while let Some(id) = stack.pop() {
            assert!(reached.insert(id), "block {id:?} reached twice");
            let record = &self.blocks[id];
            stack.extend(record.children.iter());
        }
        assert_eq!(
            reached.len(),
            self.blocks.len(),
            "blocks unreachable from the root"
        );

        assert_eq!(
            referenced_texts.len(),
            self.texts.len(),
            "unreferenced text records"
        );
    }

    #[cfg(not(any(test, feature = "assert-invariants")))]
    pub(crate) fn assert_invariants(&self) {}
}

impl Default for SharedTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::block::BlockType;
    use crate::error::EditError;
    use crate::shared_tree::{
        BlockId, BlockRecord, Mutation, OperationBatch, SharedTree, TextId, TextRecord, TextRun,
    };

    fn first_child(tree: &SharedTree) -> BlockId {
        tree.block(tree.root_id()).unwrap().children[0].clone()
    }

    /// Batch inserting an empty block of `ty` at root index `index`.
    fn insert_batch(tree: &SharedTree, ty: BlockType, index: usize) -> (OperationBatch, BlockId) {
        let id = BlockId::generate();
        let text_id = TextId::generate();
        let mut batch = OperationBatch::new("insert_block");
        batch.push(Mutation::InsertText {
            record: TextRecord::empty(text_id.clone()),
        });
        batch.push(Mutation::InsertBlock {
            record: BlockRecord::new(id.clone(), ty, Some(text_id)),
        });
        batch.push(Mutation::InsertChild {
            parent: tree.root_id().clone(),
            index,
            child: id.clone(),
        });
        (batch, id)
    }

    // ===================================================================
    // Construction
    // ===================================================================

    #[test]
    fn new_tree_is_a_page_with_one_empty_paragraph() {
        let tree = SharedTree::new();
        assert_eq!(tree.revision(), 0);
        assert_eq!(tree.block_count(), 2);

        let root = tree.block(tree.root_id()).unwrap();
        assert_eq!(root.ty, BlockType::Page);
        assert_eq!(root.children.len(), 1);

        let para = tree.block(&root.children[0]).unwrap();
        assert_eq!(para.ty, BlockType::Paragraph);
        let text = tree.text(para.text.as_ref().unwrap()).unwrap();
        assert!(text.is_empty());
    }

    // ===================================================================
    // Batch application
    // ===================================================================

    #[test]
    fn committed_batch_bumps_revision() {
        let mut tree = SharedTree::new();
        let (batch, id) = insert_batch(&tree, BlockType::Heading, 1);
        tree.apply(&batch).unwrap();

        assert_eq!(tree.revision(), 1);
        assert_eq!(tree.block_count(), 3);
        let inserted = tree.block(&id).unwrap();
        assert_eq!(inserted.parent.as_ref(), Some(tree.root_id()));
    }

    #[test]
    fn failing_batch_is_all_or_nothing() {
        let mut tree = SharedTree::new();
        let (mut batch, _) = insert_batch(&tree, BlockType::Heading, 1);
        // A second mutation that cannot apply
        batch.push(Mutation::RemoveBlock {
            id: BlockId::from("missing"),
        });

        let err = tree.apply(&batch);
        assert!(matches!(err, Err(EditError::BlockNotFound(_))));

        // Nothing from the batch landed
        assert_eq!(tree.revision(), 0);
        assert_eq!(tree.block_count(), 2);
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        let mut tree = SharedTree::new();
        tree.apply(&OperationBatch::new("noop")).unwrap();
        assert_eq!(tree.revision(), 0);
    }

    #[test]
    fn duplicate_block_insert_is_rejected() {
        let mut tree = SharedTree::new();
        let id = first_child(&tree);
        let mut batch = OperationBatch::new("bad");
        batch.push(Mutation::InsertBlock {
            record: BlockRecord::new(id, BlockType::Paragraph, None),
        });
        assert!(matches!(
            tree.apply(&batch),
            Err(EditError::DuplicateBlock(_)),
        ));
    }

    #[test]
    fn linked_block_cannot_be_removed() {
        let mut tree = SharedTree::new();
        let id = first_child(&tree);
        let mut batch = OperationBatch::new("bad");
        batch.push(Mutation::RemoveBlock { id });
        assert!(matches!(tree.apply(&batch), Err(EditError::StillLinked(_))));
    }

    #[test]
    fn root_cannot_be_removed() {
        let mut tree = SharedTree::new();
        let mut batch = OperationBatch::new("bad");
        batch.push(Mutation::RemoveBlock {
            id: tree.root_id().clone(),
        });
        assert!(matches!(
            tree.apply(&batch),
            Err(EditError::CannotRemoveRoot),
        ));
    }

    #[test]
    fn reparenting_under_a_descendant_is_rejected() {
        let mut tree = SharedTree::new();
        let (batch, outer) = insert_batch(&tree, BlockType::ToggleList, 1);
        tree.apply(&batch).unwrap();

        let inner = BlockId::generate();
        let mut nest = OperationBatch::new("insert_block");
        nest.push(Mutation::InsertBlock {
            record: BlockRecord::new(inner.clone(), BlockType::Paragraph, None),
        });
        nest.push(Mutation::InsertChild {
            parent: outer.clone(),
            index: 0,
            child: inner.clone(),
        });
        tree.apply(&nest).unwrap();

        // Unlink the outer block, then try to hang it under its own child
        let mut bad = OperationBatch::new("bad");
        bad.push(Mutation::RemoveChild {
            parent: tree.root_id().clone(),
            child: outer.clone(),
        });
        bad.push(Mutation::InsertChild {
            parent: inner,
            index: 0,
            child: outer,
        });
        assert!(matches!(tree.apply(&bad), Err(EditError::WouldCycle { .. })));
    }

    #[test]
    fn root_cannot_be_reparented() {
        let mut tree = SharedTree::new();
        let para = first_child(&tree);
        let mut bad = OperationBatch::new("bad");
        bad.push(Mutation::InsertChild {
            parent: para,
            index: 0,
            child: tree.root_id().clone(),
        });
        assert!(matches!(
            tree.apply(&bad),
            Err(EditError::CannotReparentRoot),
        ));
    }

    #[test]
    fn set_block_data_validates_the_payload() {
        let mut tree = SharedTree::new();
        let id = first_child(&tree);

        let mut batch = OperationBatch::new("set_block_data");
        batch.push(Mutation::SetBlockData {
            id: id.clone(),
            data: r#"{"checked": true}"#.to_string(),
        });
        tree.apply(&batch).unwrap();
        assert_eq!(tree.block(&id).unwrap().data, r#"{"checked": true}"#);

        let mut bad = OperationBatch::new("set_block_data");
        bad.push(Mutation::SetBlockData {
            id,
            data: "[]".to_string(),
        });
        assert!(matches!(
            tree.apply(&bad),
            Err(EditError::MalformedData(_)),
        ));
    }

    #[test]
    fn splice_text_edits_through_a_batch() {
        let mut tree = SharedTree::new();
        let para = first_child(&tree);
        let text_id = tree.block(&para).unwrap().text.clone().unwrap();

        let mut batch = OperationBatch::new("replace_text");
        batch.push(Mutation::SpliceText {
            id: text_id.clone(),
            at: 0,
            delete: 0,
            insert: vec![TextRun::plain("hello")],
        });
        tree.apply(&batch).unwrap();
        assert_eq!(tree.text(&text_id).unwrap().plain_text(), "hello");
    }
}
