// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Text records: sequences of annotated runs.
//!
//! All offsets and lengths over text are UTF-16 code units, consistent with
//! the rest of the API surface. A run is a string plus optional inline
//! annotations (a formula source or a mention); plain adjacent runs are kept
//! merged so the run list stays canonical.

use doc_mentions::Mention;
use serde::{Deserialize, Serialize};

use crate::error::{EditError, Result};

use super::TextId;

/// UTF-16 code-unit length of a string.
pub fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}

/// Byte index of the char boundary at a UTF-16 offset, or `None` when the
/// offset is past the end or inside a surrogate pair.
fn byte_index_at_utf16(s: &str, offset: usize) -> Option<usize> {
    let mut units = 0;
    for (i, ch) in s.char_indices() {
        if units == offset {
            return Some(i);
        }
        units += ch.len_utf16();
        if units > offset {
            return None;
        }
    }
    (units == offset).then_some(s.len())
}

/// Inline annotations carried by a text run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunAttrs {
    /// Raw formula source; the run's text is only a display placeholder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    /// Inline mention reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mention: Option<Mention>,
}

impl RunAttrs {
    pub fn is_plain(&self) -> bool {
        self.formula.is_none() && self.mention.is_none()
    }
}

/// A run of text with uniform annotations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    #[serde(default, skip_serializing_if = "RunAttrs::is_plain")]
    pub attrs: RunAttrs,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attrs: RunAttrs::default(),
        }
    }

    /// A formula run: `text` is the display placeholder, `source` the raw
    /// formula contributed to flattened content.
    pub fn formula(text: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attrs: RunAttrs {
                formula: Some(source.into()),
                mention: None,
            },
        }
    }

    /// A mention run: `text` is the display placeholder.
    pub fn mention(text: impl Into<String>, mention: Mention) -> Self {
        Self {
            text: text.into(),
            attrs: RunAttrs {
                formula: None,
                mention: Some(mention),
            },
        }
    }

    pub fn len_utf16(&self) -> usize {
        utf16_len(&self.text)
    }

    /// Copy of the `[from, to)` UTF-16 slice of this run, keeping its attrs.
    fn slice(&self, from: usize, to: usize) -> Result<TextRun> {
        let len = self.len_utf16();
        let start = byte_index_at_utf16(&self.text, from)
            .ok_or(EditError::OffsetOutOfBounds { offset: from, len })?;
        let end = byte_index_at_utf16(&self.text, to)
            .ok_or(EditError::OffsetOutOfBounds { offset: to, len })?;
        Ok(TextRun {
            text: self.text[start..end].to_string(),
            attrs: self.attrs.clone(),
        })
    }
}

/// The replicated text content of one block.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextRecord {
    pub id: TextId,
    pub runs: Vec<TextRun>,
}

impl TextRecord {
    pub fn new(id: TextId, runs: Vec<TextRun>) -> Self {
        let mut record = Self { id, runs };
        record.normalize();
        record
    }

    pub fn empty(id: TextId) -> Self {
        Self {
            id,
            runs: Vec::new(),
        }
    }

    pub fn len_utf16(&self) -> usize {
        self.runs.iter().map(TextRun::len_utf16).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|r| r.text.is_empty())
    }

    /// The literal run text, concatenated. Placeholder text of formula and
    /// mention runs appears as-is; resolved flattening lives in the model's
    /// content access layer.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Copies of the runs covering `[from, len)`, trimmed at `from`.
    pub fn runs_from(&self, from: usize) -> Result<Vec<TextRun>> {
        let len = self.len_utf16();
        if from > len {
            return Err(EditError::OffsetOutOfBounds { offset: from, len });
        }
        let mut out = Vec::new();
        let mut pos = 0;
        for run in &self.runs {
            let run_len = run.len_utf16();
            let run_end = pos + run_len;
            if run_end > from {
                let keep_from = from.saturating_sub(pos);
                if keep_from < run_len {
                    out.push(run.slice(keep_from, run_len)?);
                }
            }
            pos = run_end;
        }
        Ok(out)
    }

    /// Replace the UTF-16 span `[at, at + delete)` with `insert`.
    ///
    /// Annotated runs overlapping the span boundaries are trimmed, keeping
    /// their annotations on the surviving part. On error the record is
    /// unchanged.
    pub(crate) fn splice(
        &mut self,
        at: usize,
        delete: usize,
        insert: Vec<TextRun>,
    ) -> Result<()> {
        let len = self.len_utf16();
        let end = at + delete;
        if end > len {
            return Err(EditError::OffsetOutOfBounds { offset: end, len });
        }

        let mut head: Vec<TextRun> = Vec::new();
        let mut tail: Vec<TextRun> = Vec::new();
        let mut pos = 0;
        for run in &self.runs {
            let run_len = run.len_utf16();
            let run_start = pos;
            let run_end = pos + run_len;
            pos = run_end;

            if run_start < at {
                let keep_to = at.min(run_end) - run_start;
                if keep_to > 0 {
                    head.push(run.slice(0, keep_to)?);
                }
            }
            if run_end > end {
                let keep_from = end.saturating_sub(run_start);
                if keep_from < run_len {
                    tail.push(run.slice(keep_from, run_len)?);
                }
            }
        }

        head.extend(insert);
        head.extend(tail);
        self.runs = head;
        self.normalize();
        Ok(())
    }

    /// Drop empty runs and merge adjacent plain runs.
    ///
    /// Annotated runs never merge, even with identical annotations: a
    /// mention or formula run is one logical object.
    fn normalize(&mut self) {
        self.runs.retain(|r| !r.text.is_empty());
        let mut i = 0;
        while i + 1 < self.runs.len() {
            if self.runs[i].attrs.is_plain() && self.runs[i + 1].attrs.is_plain() {
                let next = self.runs.remove(i + 1);
                self.runs[i].text.push_str(&next.text);
            } else {
                i += 1;
            }
        }
    }
}
