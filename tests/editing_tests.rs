//! Cell editing tests
//!
//! Tests for opening an editor over a content cell, handing it back when
//! editing ends, and the events that end editing implicitly.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{config, loaded_sheet, GridProvider};
use sheetview::{
    CellHandle, CellIndex, EmptyCell, Rect, Selection, SheetEvents, SheetView, Size, TextCell,
};

fn small_sheet() -> SheetView<GridProvider> {
    let mut provider = GridProvider::new(20, 100);
    provider.read_only_rows = vec![0];
    loaded_sheet(provider, Size::new(400.0, 300.0), config(1))
}

/// Collects `(index, editor text)` for every ended edit.
fn record_edits(sheet: &mut SheetView<GridProvider>) -> Rc<RefCell<Vec<(CellIndex, String)>>> {
    let ended: Rc<RefCell<Vec<(CellIndex, String)>>> = Rc::default();
    let sink = Rc::clone(&ended);
    sheet.set_events(SheetEvents {
        did_end_editing: Some(Box::new(move |index: CellIndex, editor: CellHandle| {
            let text = editor
                .downcast_ref::<TextCell>()
                .map(|cell| cell.text.clone())
                .unwrap_or_default();
            sink.borrow_mut().push((index, text));
        })),
        ..SheetEvents::default()
    });
    ended
}

#[test]
fn test_editor_is_placed_over_cell() {
    let mut sheet = small_sheet();
    let index = sheet.make_index(3, 4);
    sheet.edit_cell_at(index);

    assert_eq!(sheet.editing_index(), Some(index));
    let editor = sheet.editor().unwrap();
    assert_eq!(editor.frame(), Rect::new(300.0, 180.0, 100.0, 45.0));
    assert_eq!(editor.frame(), sheet.frame_for(index));
    assert_eq!(editor.index(), index);
    assert_eq!(editor.downcast_ref::<TextCell>().unwrap().text, "r4c3");
}

#[test]
fn test_invalid_indices_are_not_edited() {
    let mut sheet = small_sheet();
    sheet.edit_cell_at(sheet.make_index(50, 0));
    sheet.edit_cell_at(sheet.make_index(0, 100));
    sheet.edit_cell_at(CellIndex::INVALID);
    // flat position disagreeing with the column count
    sheet.edit_cell_at(CellIndex::new(3, 4, 999));
    assert!(sheet.editing_index().is_none());
    assert!(sheet.editor().is_none());
    assert_eq!(sheet.frame_for(CellIndex::new(3, 4, 999)), Rect::ZERO);
}

#[test]
fn test_end_editing_hands_editor_to_listener() {
    let mut sheet = small_sheet();
    let ended = record_edits(&mut sheet);

    let index = sheet.make_index(2, 5);
    sheet.edit_cell_at(index);
    sheet.end_edit_cell();

    assert!(sheet.editing_index().is_none());
    assert_eq!(*ended.borrow(), vec![(index, "r5c2".to_string())]);

    // ending again is a no-op
    sheet.end_edit_cell();
    assert_eq!(ended.borrow().len(), 1);
}

#[test]
fn test_unclaimed_editor_goes_back_to_pool() {
    let mut sheet = small_sheet();
    let pooled = sheet.pool_stats()["text"].pooled;

    sheet.edit_cell_at(sheet.make_index(1, 1));
    sheet.end_edit_cell();
    assert_eq!(sheet.pool_stats()["text"].pooled, pooled + 1);

    let cell = sheet.dequeue_reusable_cell("text").unwrap();
    assert!(cell.index().is_invalid());
    assert_eq!(cell.downcast_ref::<TextCell>().unwrap().text, "");
}

#[test]
fn test_new_edit_ends_previous_one() {
    let mut sheet = small_sheet();
    let ended = record_edits(&mut sheet);

    let first = sheet.make_index(1, 1);
    let second = sheet.make_index(2, 2);
    sheet.edit_cell_at(first);
    sheet.edit_cell_at(second);

    assert_eq!(sheet.editing_index(), Some(second));
    assert_eq!(*ended.borrow(), vec![(first, "r1c1".to_string())]);
}

#[test]
fn test_selection_change_ends_editing() {
    let mut sheet = small_sheet();
    let ended = record_edits(&mut sheet);

    let index = sheet.make_index(1, 2);
    sheet.edit_cell_at(index);
    sheet.set_selection(Selection::single_row(2), false);

    assert!(sheet.editing_index().is_none());
    assert_eq!(ended.borrow().len(), 1);
    assert_eq!(ended.borrow()[0].0, index);
}

#[test]
fn test_unchanged_selection_keeps_editing() {
    let mut sheet = small_sheet();
    let ended = record_edits(&mut sheet);
    sheet.set_selection(Selection::single_row(2), false);

    let index = sheet.make_index(1, 2);
    sheet.edit_cell_at(index);
    sheet.set_selection(Selection::single_row(2), false);

    assert_eq!(sheet.editing_index(), Some(index));
    assert!(ended.borrow().is_empty());
}

#[test]
fn test_refused_editor_uses_placeholder() {
    let mut sheet = small_sheet();
    let index = sheet.make_index(4, 0);
    sheet.edit_cell_at(index);

    let editor = sheet.editor().unwrap();
    assert!(editor.downcast_ref::<EmptyCell>().is_some());
    assert_eq!(editor.frame(), Rect::new(400.0, 0.0, 100.0, 45.0));
}

#[test]
fn test_snapshot_reports_editing_index() {
    let mut sheet = small_sheet();
    let index = sheet.make_index(2, 3);
    sheet.edit_cell_at(index);
    assert_eq!(sheet.snapshot().editing, Some(index));
    sheet.end_edit_cell();
    assert!(sheet.snapshot().editing.is_none());
}
