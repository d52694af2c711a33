// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::collections::HashMap;

use indoc::indoc;
use serde_json::json;

use blockdoc::{BlockPath, BlockType, DataMap, DocumentModel, EditError, Point, Selection};

fn data(value: serde_json::Value) -> DataMap {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected an object literal, got {other}"),
    }
}

fn text_at(model: &DocumentModel, path: impl Into<BlockPath>) -> String {
    let view = model.view();
    view.node_at(&path.into())
        .map(|block| block.raw_text())
        .unwrap_or_else(|| panic!("no block at that path"))
}

/// A small travel note. The seed paragraph from the fresh document stays
/// at the front, the way a real document keeps whatever block it opened
/// with.
///
/// ```text
/// ├─ paragraph ""
/// ├─ heading "trip notes"
/// ├─ toggle_list "packing"
/// │  ├─ todo_list "tent"
/// │  ├─ todo_list "stove"
/// ├─ paragraph "maybe rain"
/// ```
fn note_document() -> DocumentModel {
    let mut model = DocumentModel::new();
    let root = BlockPath::root();
    model
        .insert_block(&root, 1, BlockType::Heading, "trip notes")
        .unwrap();
    model
        .insert_block(&root, 2, BlockType::ToggleList, "packing")
        .unwrap();
    model
        .insert_block(&[2].into(), 0, BlockType::TodoList, "tent")
        .unwrap();
    model
        .insert_block(&[2].into(), 1, BlockType::TodoList, "stove")
        .unwrap();
    model
        .insert_block(&root, 3, BlockType::Paragraph, "maybe rain")
        .unwrap();
    model
}

#[test]
fn a_fresh_document_is_one_empty_paragraph() {
    let model = DocumentModel::new();
    assert_eq!(
        model.to_tree(),
        indoc! {r#"
            sel: (none)
            ├─ paragraph ""
        "#},
    );
}

#[test]
fn commands_require_a_selection() {
    let mut model = DocumentModel::new();
    assert!(matches!(model.insert_break(None), Err(EditError::NoSelection)));
    assert!(matches!(
        model.delete_block_backward(None),
        Err(EditError::NoSelection),
    ));
    assert!(matches!(
        model.delete_block_forward(None),
        Err(EditError::NoSelection),
    ));
}

#[test]
fn break_then_backspace_restores_the_block() {
    let mut model = DocumentModel::new();
    model
        .insert_block(&BlockPath::root(), 1, BlockType::Paragraph, "alpha beta")
        .unwrap();
    model.select(Selection::caret([1], 6));

    model.insert_break(None).unwrap();
    assert_eq!(text_at(&model, [1]), "alpha ");
    assert_eq!(text_at(&model, [2]), "beta");
    assert_eq!(model.selection(), Some(&Selection::caret([2], 0)));

    model.delete_block_backward(None).unwrap();
    assert_eq!(text_at(&model, [1]), "alpha beta");
    assert_eq!(model.selection(), Some(&Selection::caret([1], 6)));
    assert_eq!(model.view().blocks().len(), 2);
}

#[test]
fn breaks_in_list_items_continue_the_list() {
    let mut model = note_document();
    model.select(Selection::caret([2, 0], 4));
    model.insert_break(None).unwrap();

    let view = model.view();
    let new_item = view.node_at(&[2, 1].into()).unwrap();
    assert_eq!(new_item.ty, BlockType::TodoList);
    assert_eq!(new_item.raw_text(), "");
    assert_eq!(view.node_at(&[2, 2].into()).unwrap().raw_text(), "stove");
}

#[test]
fn backspace_converts_then_lifts_a_nested_item() {
    let mut model = note_document();
    model.select(Selection::caret([2, 0], 0));

    // First backspace: the todo item becomes a plain paragraph in place.
    model.delete_block_backward(None).unwrap();
    // Second: the nested first child lifts out of the toggle.
    model.delete_block_backward(None).unwrap();

    assert_eq!(
        model.to_tree(),
        indoc! {r#"
            sel: [3]:0
            ├─ paragraph ""
            ├─ heading "trip notes"
            ├─ toggle_list "packing"
            │  ├─ todo_list "stove"
            ├─ paragraph "|tent"
            ├─ paragraph "maybe rain"
        "#},
    );
}

#[test]
fn merging_appends_text_and_adopts_children_in_order() {
    let mut model = DocumentModel::new();
    let root = BlockPath::root();
    model
        .insert_block(&root, 1, BlockType::Paragraph, "intro")
        .unwrap();
    model
        .insert_block(&root, 2, BlockType::Paragraph, "outro")
        .unwrap();
    model
        .insert_block(&[2].into(), 0, BlockType::Paragraph, "a")
        .unwrap();
    model
        .insert_block(&[2].into(), 1, BlockType::Paragraph, "b")
        .unwrap();

    model.select(Selection::caret([2], 0));
    model.delete_block_backward(None).unwrap();

    assert_eq!(
        model.to_tree(),
        indoc! {r#"
            sel: [1]:5
            ├─ paragraph ""
            ├─ paragraph "intro|outro"
            │  ├─ paragraph "a"
            │  ├─ paragraph "b"
        "#},
    );
}

#[test]
fn forward_delete_absorbs_the_next_block() {
    let mut model = note_document();
    model.select(Selection::caret([3], 10));
    let before = model.revision();

    // "maybe rain" is the last block; nothing to absorb.
    model.delete_block_forward(None).unwrap();
    assert_eq!(model.revision(), before);

    model.select(Selection::caret([2, 0], 4));
    model.delete_block_forward(None).unwrap();
    assert_eq!(text_at(&model, [2, 0]), "tentstove");
    assert_eq!(model.selection(), Some(&Selection::caret([2, 0], 4)));
}

#[test]
fn cross_block_range_removal_merges_the_boundaries() {
    let mut model = note_document();
    model
        .remove_range(Selection::range(Point::new([1], 4), Point::new([3], 5)))
        .unwrap();

    assert_eq!(
        model.to_tree(),
        indoc! {r#"
            sel: [1]:4
            ├─ paragraph ""
            ├─ heading "trip| rain"
        "#},
    );
}

#[test]
fn block_data_patches_accumulate() {
    let mut model = note_document();
    let view = model.view();
    let tent = view.node_at(&[2, 0].into()).unwrap().id.clone();

    model.set_block_data(&tent, &data(json!({"checked": true})), false).unwrap();
    model.set_block_data(&tent, &data(json!({"assignee": "sam"})), false).unwrap();

    let view = model.view();
    let block = view.node_at(&[2, 0].into()).unwrap();
    assert_eq!(block.data.get("checked"), Some(&json!(true)));
    assert_eq!(block.data.get("assignee"), Some(&json!("sam")));
}

#[test]
fn block_data_shows_up_in_the_tree_dump() {
    let mut model = DocumentModel::new();
    let todo = model
        .insert_block(&BlockPath::root(), 1, BlockType::TodoList, "tent")
        .unwrap()
        .unwrap();
    model.set_block_data(&todo, &data(json!({"checked": true})), true).unwrap();

    assert_eq!(
        model.to_tree(),
        indoc! {r#"
            sel: [1]:0
            ├─ paragraph ""
            ├─ todo_list "|tent" {"checked":true}
        "#},
    );
}

#[test]
fn date_mentions_flatten_to_formatted_dates() {
    let mut model = DocumentModel::new();
    model
        .insert_block(&BlockPath::root(), 1, BlockType::Paragraph, "due ")
        .unwrap();
    model.select(Selection::caret([1], 4));
    model.insert_date_mention("2023-06-15", None).unwrap();

    assert_eq!(
        model.block_text_content(&[1].into()).unwrap(),
        "due Jun 15, 2023",
    );
}

#[test]
fn timestamp_date_mentions_flatten_the_same_way() {
    let mut model = DocumentModel::new();
    model.select(Selection::caret([0], 0));
    model.insert_date_mention("946684800", None).unwrap();
    assert_eq!(model.block_text_content(&[0].into()).unwrap(), "Jan 01, 2000");
}

#[test]
fn page_mentions_flatten_to_resolved_titles() {
    let mut model = DocumentModel::new();
    let mut pages = HashMap::new();
    pages.insert("page-1".to_string(), "Packing list".to_string());
    model.set_page_resolver(pages);

    model.select(Selection::caret([0], 0));
    model.insert_page_mention("page-1", None).unwrap();
    assert_eq!(model.block_text_content(&[0].into()).unwrap(), "Packing list");

    // Unresolvable references flatten to nothing.
    model.insert_page_mention("page-404", None).unwrap();
    assert_eq!(model.block_text_content(&[0].into()).unwrap(), "Packing list");
}

#[test]
fn formulas_flatten_to_their_source() {
    let mut model = DocumentModel::new();
    model.select(Selection::caret([0], 0));
    model.insert_formula("prop(\"Cost\") * 2", None).unwrap();
    assert_eq!(
        model.block_text_content(&[0].into()).unwrap(),
        "prop(\"Cost\") * 2",
    );
}

#[test]
fn document_text_walks_the_whole_tree() {
    let model = note_document();
    assert_eq!(
        model.document_text(),
        "\ntrip notes\npackingtentstove\nmaybe rain",
    );
}

#[test]
fn delete_entire_document_collapses_to_one_paragraph() {
    let mut model = note_document();
    model.delete_entire_document().unwrap();
    assert_eq!(
        model.to_tree(),
        indoc! {r#"
            sel: [0]:0
            ├─ paragraph "|"
        "#},
    );
}

#[test]
fn read_only_turns_every_mutating_command_into_a_no_op() {
    let mut model = note_document();
    let view = model.view();
    let tent = view.node_at(&[2, 0].into()).unwrap().id.clone();
    model.select(Selection::caret([2, 0], 0));
    let before_revision = model.revision();
    let before_tree = model.to_tree();

    model.set_read_only(true);

    model.insert_break(None).unwrap();
    model.delete_block_backward(None).unwrap();
    model.delete_block_forward(None).unwrap();
    model
        .remove_range(Selection::range(Point::new([1], 0), Point::new([3], 2)))
        .unwrap();
    model.set_block_data(&tent, &data(json!({"checked": true})), false).unwrap();
    model.insert_date_mention("2023-06-15", None).unwrap();
    model.insert_page_mention("page-1", None).unwrap();
    model.insert_formula("1 + 1", None).unwrap();
    assert!(model
        .insert_block(&BlockPath::root(), 0, BlockType::Paragraph, "new")
        .unwrap()
        .is_none());
    model.delete_entire_document().unwrap();

    assert_eq!(model.revision(), before_revision);
    assert_eq!(model.to_tree(), before_tree);
}

#[test]
fn the_element_gate_freezes_single_blocks() {
    let mut model = note_document();
    let view = model.view();
    let heading = view.node_at(&[1].into()).unwrap().id.clone();
    let frozen = heading.clone();
    model.set_element_gate(move |id| *id == frozen);

    // Edits addressed at the frozen heading do nothing.
    let before = model.revision();
    model.select(Selection::caret([1], 10));
    model.insert_break(None).unwrap();
    model.set_block_data(&heading, &data(json!({"level": 2})), false).unwrap();
    assert_eq!(model.revision(), before);

    // The rest of the document still edits normally.
    model.select(Selection::caret([3], 6));
    model.insert_break(None).unwrap();
    assert_eq!(model.revision(), before + 1);
    assert_eq!(text_at(&model, [4]), "rain");

    model.clear_element_gate();
    model.select(Selection::caret([1], 10));
    model.insert_break(None).unwrap();
    assert_eq!(text_at(&model, [2]), "");
}
