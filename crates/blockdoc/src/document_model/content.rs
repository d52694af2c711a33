// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Content extraction: flatten block subtrees to plain strings.
//!
//! Inline leaves render from their canonical value, not their stored
//! display text, so stale snapshots (a renamed page, a re-rendered date)
//! never leak into extracted content.

use doc_mentions::{render_date_value, MentionKind, PageResolver};

use crate::error::Result;
use crate::shared_tree::TextRun;
use crate::view_tree::{BlockPath, ViewBlock};

use super::DocumentModel;

/// Flattened text of `block` and its descendants, in document order,
/// joined without separators.
pub fn block_text_content(block: &ViewBlock, pages: &dyn PageResolver) -> String {
    let mut out = String::new();
    if let Some(text) = &block.text {
        for run in &text.runs {
            flatten_run(run, pages, &mut out);
        }
    }
    for child in &block.children {
        out.push_str(&block_text_content(child, pages));
    }
    out
}

fn flatten_run(run: &TextRun, pages: &dyn PageResolver, out: &mut String) {
    if let Some(source) = &run.attrs.formula {
        out.push_str(source);
        return;
    }
    if let Some(mention) = &run.attrs.mention {
        match mention.kind {
            MentionKind::Date => {
                if let Some(value) = &mention.date {
                    out.push_str(&render_date_value(value));
                }
            }
            MentionKind::PageRef => {
                if let Some(page_id) = &mention.page_id {
                    if let Some(title) = pages.page_title(page_id) {
                        out.push_str(&title);
                    }
                }
            }
        }
        return;
    }
    out.push_str(&run.text);
}

impl DocumentModel {
    /// Flattened text of the block at `path`, descendants included.
    pub fn block_text_content(&self, path: &BlockPath) -> Result<String> {
        let view = self.view();
        let block = Self::require_block(&view, path)?;
        Ok(block_text_content(block, self.pages.as_ref()))
    }

    /// Flattened text of the whole document, one line per top-level
    /// block.
    pub fn document_text(&self) -> String {
        let view = self.view();
        let lines: Vec<String> = view
            .root()
            .children
            .iter()
            .map(|child| block_text_content(child, self.pages.as_ref()))
            .collect();
        lines.join("\n")
    }
}
