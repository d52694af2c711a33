// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use doc_mentions::PageResolver;

use crate::error::{EditError, Result};
use crate::shared_tree::{BlockId, SharedTree};
use crate::view_tree::{BlockPath, Point, Selection, ViewBlock, ViewTree};

/// The editing command layer over a shared block document.
///
/// Holds the shared tree, the active selection, and the read-only gate.
/// Commands always project a fresh [`ViewTree`] before deciding anything,
/// so no block or path reference survives a committed batch.
///
/// Read-only comes in two layers: a document-wide flag, and an optional
/// per-element predicate supplied by the embedding editor. A mutating
/// command on a read-only element is a silent no-op, never an error.
pub struct DocumentModel {
    pub(crate) tree: SharedTree,

    /// The active selection, if any. Stored as given; commands normalise
    /// edge order on use.
    pub(crate) selection: Option<Selection>,

    /// Document-wide read-only flag.
    read_only: bool,

    /// Per-element read-only predicate from the embedding editor.
    element_gate: Option<Box<dyn Fn(&BlockId) -> bool>>,

    /// Page-title resolution for page-reference mentions.
    pub(crate) pages: Box<dyn PageResolver>,
}

impl DocumentModel {
    /// A new model over a fresh document: one page with one empty
    /// paragraph, no selection.
    pub fn new() -> Self {
        Self {
            tree: SharedTree::new(),
            selection: None,
            read_only: false,
            element_gate: None,
            pages: Box::new(()),
        }
    }

    // ────────────────────────────────────────────────────────────────────
    // State access
    // ────────────────────────────────────────────────────────────────────

    /// The shared tree this model edits.
    pub fn tree(&self) -> &SharedTree {
        &self.tree
    }

    /// Count of committed batches, for change detection in tests and
    /// embedding code.
    pub fn revision(&self) -> u64 {
        self.tree.revision()
    }

    /// Project a fresh view snapshot of the current shared tree.
    pub fn view(&self) -> ViewTree {
        ViewTree::project(&self.tree)
    }

    // ────────────────────────────────────────────────────────────────────
    // Selection
    // ────────────────────────────────────────────────────────────────────

    pub fn select(&mut self, selection: Selection) {
        self.selection = Some(selection);
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// The explicit selection if given, else the active one.
    pub(crate) fn resolve_selection(&self, at: Option<Selection>) -> Result<Selection> {
        at.or_else(|| self.selection.clone())
            .ok_or(EditError::NoSelection)
    }

    /// The block a path addresses, or `PathNotFound`.
    pub(crate) fn require_block<'a>(
        view: &'a ViewTree,
        path: &BlockPath,
    ) -> Result<&'a ViewBlock> {
        view.node_at(path)
            .ok_or_else(|| EditError::PathNotFound(path.clone()))
    }

    // ────────────────────────────────────────────────────────────────────
    // Read-only gate
    // ────────────────────────────────────────────────────────────────────

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Install a per-element read-only predicate.
    pub fn set_element_gate(&mut self, gate: impl Fn(&BlockId) -> bool + 'static) {
        self.element_gate = Some(Box::new(gate));
    }

    pub fn clear_element_gate(&mut self) {
        self.element_gate = None;
    }

    /// Whether writes to the element are currently blocked, by either the
    /// document-wide flag or the per-element predicate.
    pub fn is_element_read_only(&self, id: &BlockId) -> bool {
        self.read_only || self.element_gate.as_ref().map_or(false, |gate| gate(id))
    }

    /// Install the page-title resolver used by mention flattening.
    pub fn set_page_resolver(&mut self, pages: impl PageResolver + 'static) {
        self.pages = Box::new(pages);
    }

    // ────────────────────────────────────────────────────────────────────
    // Debug introspection
    // ────────────────────────────────────────────────────────────────────

    /// Render the block tree as indented lines with the selection marked
    /// inline: `|` for a caret, `{`/`}` for a range.
    pub fn to_tree(&self) -> String {
        let view = self.view();
        let mut out = String::new();

        match &self.selection {
            Some(sel) if sel.is_collapsed() => {
                out.push_str(&format!("sel: {}\n", fmt_point(sel.start())));
            }
            Some(sel) => {
                out.push_str(&format!(
                    "sel: {}..{}\n",
                    fmt_point(sel.start()),
                    fmt_point(sel.end()),
                ));
            }
            None => out.push_str("sel: (none)\n"),
        }

        for block in view.blocks() {
            for _ in 1..block.path.depth() {
                out.push_str("│  ");
            }
            out.push_str("├─ ");
            out.push_str(&block.ty.to_string());
            if let Some(text) = &block.text {
                let (open, close, collapsed) = match &self.selection {
                    Some(sel) => {
                        let open = (sel.start().path == block.path)
                            .then_some(sel.start().offset);
                        let close = (sel.end().path == block.path)
                            .then_some(sel.end().offset);
                        (open, close, sel.is_collapsed())
                    }
                    None => (None, None, false),
                };
                let annotated =
                    annotate_selection(&text.plain_text(), open, close, collapsed);
                out.push_str(&format!(" \"{annotated}\""));
            }
            if !block.data.is_empty() {
                out.push(' ');
                out.push_str(&serde_json::to_string(&block.data).unwrap_or_default());
            }
            out.push('\n');
        }

        out
    }
}

fn fmt_point(point: &Point) -> String {
    let path: Vec<String> = point
        .path
        .indices()
        .iter()
        .map(usize::to_string)
        .collect();
    format!("[{}]:{}", path.join("."), point.offset)
}

/// Insert `|` (caret) or `{`/`}` (range edge) markers into one block's
/// text at the given UTF-16 offsets.
fn annotate_selection(
    text: &str,
    open: Option<usize>,
    close: Option<usize>,
    collapsed: bool,
) -> String {
    let mut out = String::new();
    let mut pos = 0;
    for ch in text.chars() {
        push_markers(&mut out, pos, open, close, collapsed);
        out.push(ch);
        pos += ch.len_utf16();
    }
    // Markers at the very end of the text
    push_markers(&mut out, pos, open, close, collapsed);
    out
}

fn push_markers(
    out: &mut String,
    pos: usize,
    open: Option<usize>,
    close: Option<usize>,
    collapsed: bool,
) {
    if close == Some(pos) && !collapsed {
        out.push('}');
    }
    if open == Some(pos) {
        out.push(if collapsed { '|' } else { '{' });
    }
}

impl Default for DocumentModel {
    fn default() -> Self {
        Self::new()
    }
}
