// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Block types, per-type editing policy, and the block data payload.
//!
//! Every block record carries a type string and an opaque data payload (a
//! flat JSON object serialized to text). The editing commands never branch
//! on type strings directly; they go through the policy methods here, so
//! adding a block type means touching one table.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum_macros::{Display, EnumString};

use crate::error::{EditError, Result};

/// The semantic kind of a block.
///
/// Unknown type strings from remote peers are preserved losslessly in
/// [`BlockType::Other`] and round-trip through serialization unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum BlockType {
    /// The document root. Never appears below the root.
    Page,
    Paragraph,
    Heading,
    Quote,
    Callout,
    CodeBlock,
    ToggleList,
    BulletedList,
    NumberedList,
    TodoList,
    Divider,
    #[strum(default)]
    Other(String),
}

impl BlockType {
    /// Whether a break inside this block continues the same type.
    ///
    /// List-like blocks keep producing items of their own kind; everything
    /// else produces a paragraph.
    pub fn continues_on_break(&self) -> bool {
        matches!(
            self,
            BlockType::BulletedList
                | BlockType::NumberedList
                | BlockType::TodoList
                | BlockType::ToggleList
        )
    }

    /// The type of the block created by splitting this one.
    pub fn break_successor(&self) -> BlockType {
        if self.continues_on_break() {
            self.clone()
        } else {
            BlockType::Paragraph
        }
    }

    /// Whether backspace at the start of this block converts it to a
    /// paragraph instead of merging it into the previous block.
    pub fn converts_on_backspace(&self) -> bool {
        !matches!(self, BlockType::Paragraph)
    }
}

impl Serialize for BlockType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BlockType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        // EnumString with a default variant never fails to parse.
        Ok(s.parse().unwrap_or(BlockType::Other(s)))
    }
}

/// A parsed block data payload: a flat JSON object.
pub type DataMap = serde_json::Map<String, serde_json::Value>;

/// The serialized form of an empty payload.
pub const EMPTY_DATA: &str = "{}";

/// Parse a serialized block data payload.
///
/// The empty string is tolerated and reads as an empty object; any other
/// non-object payload is malformed.
pub fn parse_data(data: &str) -> Result<DataMap> {
    if data.trim().is_empty() {
        return Ok(DataMap::new());
    }
    let value: serde_json::Value = serde_json::from_str(data)
        .map_err(|e| EditError::MalformedData(e.to_string()))?;
    match value {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(EditError::MalformedData(format!(
            "expected an object, got {other}"
        ))),
    }
}

/// Shallow-merge `patch` onto a serialized payload and re-serialize.
///
/// Incoming keys win; keys absent from the patch are preserved unchanged,
/// including keys this crate knows nothing about.
pub fn merge_data(current: &str, patch: &DataMap) -> Result<String> {
    let mut data = parse_data(current)?;
    for (key, value) in patch {
        data.insert(key.clone(), value.clone());
    }
    serde_json::to_string(&data).map_err(|e| EditError::MalformedData(e.to_string()))
}
