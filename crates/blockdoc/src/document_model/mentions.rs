// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Inline leaf insertion: date mentions, page mentions and formulas.
//!
//! Each command splices a single annotated run into the block at the
//! caret. A range selection is replaced first, the same way typing over
//! a selection replaces it.

use doc_mentions::{render_date_value, Mention};

use crate::error::{EditError, Result};
use crate::shared_tree::{Mutation, OperationBatch, TextRun};
use crate::view_tree::Selection;

use super::DocumentModel;

/// Placeholder text stored for page mentions. Presentation resolves the
/// live title at render time, so the stored text only matters to peers
/// without the page table.
const PAGE_FALLBACK: &str = "$";

impl DocumentModel {
    /// Insert a date mention at the selection. `value` is either a
    /// `YYYY-MM-DD` calendar date or a Unix timestamp in seconds or
    /// milliseconds; the stored display text is its rendered form.
    pub fn insert_date_mention(&mut self, value: &str, at: Option<Selection>) -> Result<()> {
        let run = TextRun::mention(render_date_value(value), Mention::date(value));
        self.insert_inline(run, "insert_date_mention", at)
    }

    /// Insert a reference to another page at the selection.
    pub fn insert_page_mention(&mut self, page_id: &str, at: Option<Selection>) -> Result<()> {
        let run = TextRun::mention(PAGE_FALLBACK, Mention::page_ref(page_id));
        self.insert_inline(run, "insert_page_mention", at)
    }

    /// Insert an inline formula at the selection. The display text is
    /// the source itself; rendering is a presentation concern.
    pub fn insert_formula(&mut self, source: &str, at: Option<Selection>) -> Result<()> {
        let run = TextRun::formula(source, source);
        self.insert_inline(run, "insert_formula", at)
    }

    fn insert_inline(&mut self, run: TextRun, name: &str, at: Option<Selection>) -> Result<()> {
        let selection = self.resolve_selection(at)?;
        {
            let view = self.view();
            let start = Self::require_block(&view, &selection.start().path)?;
            if self.is_element_read_only(&start.id) {
                return Ok(());
            }
        }
        let caret = if selection.is_collapsed() {
            selection.start().clone()
        } else {
            self.delete_range(&selection)?
        };

        let view = self.view();
        let block = Self::require_block(&view, &caret.path)?;
        let Some(text) = &block.text else {
            return Err(EditError::NoText(block.id.clone()));
        };
        let offset = caret.offset.min(text.len_utf16());
        let advance = run.len_utf16();

        let mut batch = OperationBatch::new(name);
        batch.push(Mutation::SpliceText {
            id: text.id.clone(),
            at: offset,
            delete: 0,
            insert: vec![run],
        });
        self.tree.apply(&batch)?;

        self.selection = Some(Selection::caret(caret.path, offset + advance));
        Ok(())
    }
}
