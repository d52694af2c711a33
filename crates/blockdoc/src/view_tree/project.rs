// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Projection from the shared tree to a view snapshot.

use tracing::warn;

use crate::block::{parse_data, DataMap};
use crate::shared_tree::{BlockRecord, SharedTree};

use super::{BlockPath, ViewBlock, ViewTree};

impl ViewTree {
    /// Project a snapshot of the whole shared tree.
    ///
    /// Projection never fails. Batch application keeps links consistent
    /// locally, but a replicated backend can merge remote changes into
    /// states local validation never saw, so dangling child or text
    /// links are logged and skipped and a malformed data payload reads
    /// as empty.
    pub fn project(tree: &SharedTree) -> ViewTree {
        let root = build_block(tree, tree.root_record(), BlockPath::root());
        ViewTree { root }
    }
}

fn build_block(tree: &SharedTree, record: &BlockRecord, path: BlockPath) -> ViewBlock {
    let data = match parse_data(&record.data) {
        Ok(map) => map,
        Err(error) => {
            warn!(block = %record.id, %error, "projecting malformed block data as empty");
            DataMap::new()
        }
    };

    let text = record.text.as_ref().and_then(|id| match tree.text(id) {
        Some(text) => Some(text.clone()),
        None => {
            warn!(block = %record.id, text = %id, "dangling text link");
            None
        }
    });

    let mut children = Vec::with_capacity(record.children.len());
    for child_id in &record.children {
        match tree.block(child_id) {
            Some(child) => {
                let child_path = path.child(children.len());
                children.push(build_block(tree, child, child_path));
            }
            None => warn!(block = %record.id, child = %child_id, "dangling child link"),
        }
    }

    ViewBlock {
        id: record.id.clone(),
        ty: record.ty.clone(),
        path,
        data,
        text,
        children,
    }
}
