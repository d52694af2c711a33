// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Mention utilities for block documents.
//!
//! A mention is a typed inline reference carried on a text run: either a
//! date mention (a stored date value rendered as a human-readable string)
//! or a page reference (a block/page id resolved to its displayed title).
//!
//! Date values follow a length-based contract: a value of exactly 10
//! characters is a calendar date in `YYYY-MM-DD` form; any other length is
//! an epoch timestamp. Both render as `"MMM DD, YYYY"` (e.g. `Jun 15, 2023`).

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// The kind of inline reference a [`Mention`] represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MentionKind {
    /// A date, rendered from the stored value.
    Date,
    /// A reference to another page, rendered as that page's title.
    PageRef,
}

/// A typed inline reference embedded in a text run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
    #[serde(rename = "type")]
    pub kind: MentionKind,
    /// Date value for [`MentionKind::Date`] mentions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Referenced page id for [`MentionKind::PageRef`] mentions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_id: Option<String>,
}

impl Mention {
    /// Create a date mention from a stored date value.
    pub fn date(value: impl Into<String>) -> Self {
        Self {
            kind: MentionKind::Date,
            date: Some(value.into()),
            page_id: None,
        }
    }

    /// Create a page-reference mention.
    pub fn page_ref(page_id: impl Into<String>) -> Self {
        Self {
            kind: MentionKind::PageRef,
            date: None,
            page_id: Some(page_id.into()),
        }
    }
}

/// Resolves page ids to displayed page titles.
///
/// Implemented by whatever component knows the surrounding workspace; an
/// unresolvable id renders as the empty string.
pub trait PageResolver {
    fn page_title(&self, page_id: &str) -> Option<String>;
}

/// Map-backed resolver, mostly useful in tests and imports.
impl PageResolver for HashMap<String, String> {
    fn page_title(&self, page_id: &str) -> Option<String> {
        self.get(page_id).cloned()
    }
}

/// Null resolver: every page is unresolved.
impl PageResolver for () {
    fn page_title(&self, _page_id: &str) -> Option<String> {
        None
    }
}

/// Render a stored date-mention value as `"MMM DD, YYYY"`.
///
/// A value of exactly 10 characters is parsed as a `YYYY-MM-DD` calendar
/// date. Any other length is parsed as an epoch timestamp: more than 10
/// digits means milliseconds, otherwise seconds. Unparseable values render
/// as the empty string rather than failing content extraction.
pub fn render_date_value(value: &str) -> String {
    if value.len() == 10 {
        return NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(|d| d.format("%b %d, %Y").to_string())
            .unwrap_or_default();
    }

    let Ok(stamp) = value.parse::<i64>() else {
        return String::new();
    };

    let digits = value.trim_start_matches('-').len();
    let parsed = if digits > 10 {
        DateTime::from_timestamp_millis(stamp)
    } else {
        DateTime::from_timestamp(stamp, 0)
    };

    parsed
        .map(|dt| dt.format("%b %d, %Y").to_string())
        .unwrap_or_default()
}
