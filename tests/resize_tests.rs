//! Column and row resize tests
//!
//! Tests that resizing re-derives offsets, re-acquires only the affected
//! cells in the content region and its frozen sibling, and that interactive
//! resize sessions move their indicator and commit through the handler.

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

use common::{assert_region_consistent, config, loaded_sheet, take_calls, GridProvider};
use sheetview::{Axis, CellRange, Point, Rect, ResizeHandlers, SheetArea, SheetView, Size};

/// Content viewport 400x300 behind two frozen rows and one frozen column.
fn framed_sheet() -> SheetView<GridProvider> {
    loaded_sheet(
        GridProvider::new(20, 100).with_fixed(2, 1),
        Size::new(500.0, 390.0),
        config(1),
    )
}

fn width_of(sheet: &SheetView<GridProvider>, col: usize) -> f64 {
    sheet.columns().get(col).unwrap().size
}

// ============================================================================
// Direct setters
// ============================================================================

#[test]
fn test_column_width_reacquires_from_resized_column() {
    let mut sheet = framed_sheet();
    take_calls(&sheet);

    assert!(sheet.set_column_width(2, 300.0));
    assert_eq!(width_of(&sheet, 2), 300.0);
    assert_eq!(sheet.columns().get(3).unwrap().offset, 500.0);
    assert_eq!(sheet.columns().total_extent(), 2200.0);

    // column 2 now reaches past the viewport edge
    assert_eq!(
        sheet.region(SheetArea::Content).range(),
        CellRange::new(0, 3, 0, 7)
    );
    assert_eq!(
        sheet.region(SheetArea::FixedTop).range(),
        CellRange::new(0, 3, 0, 2)
    );

    let calls = take_calls(&sheet);
    assert_eq!(calls.len(), 7 + 2);
    assert!(calls.iter().all(|(_, index)| index.col == 2));
    assert!(calls.iter().all(|(area, _)| *area != SheetArea::FixedLeft));
    for area in SheetArea::ALL {
        assert_region_consistent(&sheet, area);
    }
}

#[test]
fn test_row_height_reacquires_from_resized_row() {
    let mut sheet = framed_sheet();
    take_calls(&sheet);

    assert!(sheet.set_row_height(1, 200.0));
    assert_eq!(sheet.rows().get(2).unwrap().offset, 245.0);
    assert_eq!(
        sheet.region(SheetArea::Content).range(),
        CellRange::new(0, 5, 0, 4)
    );

    let calls = take_calls(&sheet);
    // content rows 1..4 x 5 columns, frozen-left rows 1..4
    assert_eq!(calls.len(), 15 + 3);
    assert!(calls.iter().all(|(_, index)| index.row >= 1));
    assert!(calls.iter().all(|(area, _)| *area != SheetArea::FixedTop));
    for area in SheetArea::ALL {
        assert_region_consistent(&sheet, area);
    }
}

#[test]
fn test_invalid_resizes_are_ignored() {
    let mut sheet = framed_sheet();
    take_calls(&sheet);

    assert!(!sheet.set_column_width(-1, 50.0));
    assert!(!sheet.set_column_width(20, 50.0));
    assert!(!sheet.set_column_width(2, 0.0));
    assert!(!sheet.set_column_width(2, f64::NAN));
    assert!(!sheet.set_column_width(2, 100.0));
    assert!(!sheet.set_row_height(100, 50.0));
    assert!(take_calls(&sheet).is_empty());
    assert_eq!(sheet.columns().total_extent(), 2000.0);
}

#[test]
fn test_shrinking_clamps_offset_and_resyncs_frozen_top() {
    let mut sheet = framed_sheet();
    sheet.set_content_offset(Point::new(1600.0, 0.0));

    assert!(sheet.set_column_width(0, 50.0));
    assert_eq!(sheet.content_offset().x, 1550.0);
    assert_eq!(sheet.region(SheetArea::FixedTop).offset().x, 1550.0);
    for area in SheetArea::ALL {
        assert_region_consistent(&sheet, area);
    }
}

#[test]
fn test_resize_outside_window_keeps_live_cells() {
    let mut sheet = framed_sheet();
    take_calls(&sheet);

    assert!(sheet.set_column_width(15, 250.0));
    assert!(take_calls(&sheet).is_empty());
    assert_eq!(sheet.region(SheetArea::Content).len(), 35);
    assert_eq!(sheet.columns().total_extent(), 2150.0);
}

// ============================================================================
// Interactive sessions
// ============================================================================

#[test]
fn test_session_indicator_tracks_pending_size() {
    let mut sheet = framed_sheet();
    sheet.begin_resizing_column(2);
    // right edge of column 2 (300) shifted by the frozen-left width
    assert_eq!(
        sheet.resize_indicator(),
        Some(Rect::new(400.0, 0.0, 1.0, 390.0))
    );

    sheet.update_resizing(2, 150.0);
    assert_eq!(
        sheet.resize_indicator(),
        Some(Rect::new(450.0, 0.0, 1.0, 390.0))
    );

    // wrong index and non-positive sizes are ignored
    sheet.update_resizing(3, 400.0);
    sheet.update_resizing(2, -1.0);
    assert_eq!(sheet.resize_session().unwrap().size, 150.0);

    // the live width does not change until the session ends
    assert_eq!(width_of(&sheet, 2), 100.0);
    sheet.end_resizing();
    assert_eq!(width_of(&sheet, 2), 150.0);
    assert!(sheet.resize_session().is_none());
    assert!(sheet.resize_indicator().is_none());
}

#[test]
fn test_row_session_indicator_spans_width() {
    let mut sheet = framed_sheet();
    sheet.begin_resizing_row(1);
    assert_eq!(
        sheet.resize_indicator(),
        Some(Rect::new(0.0, 180.0, 500.0, 1.0))
    );
    let session = sheet.resize_session().unwrap();
    assert_eq!(session.axis, Axis::Vertical);
    assert_eq!(session.index, 1);
}

#[test]
fn test_indicator_follows_scroll() {
    let mut sheet = framed_sheet();
    sheet.begin_resizing_column(2);
    sheet.set_content_offset(Point::new(100.0, 0.0));
    assert_eq!(sheet.resize_indicator().unwrap().x, 300.0);
}

#[test]
fn test_begin_on_invalid_index_starts_nothing() {
    let mut sheet = framed_sheet();
    sheet.begin_resizing_column(99);
    sheet.begin_resizing_row(-1);
    assert!(sheet.resize_session().is_none());
}

#[test]
fn test_handler_can_take_over_commit() {
    let mut sheet = framed_sheet();
    let ended: Rc<RefCell<Vec<(Axis, isize, f64)>>> = Rc::default();
    let sink = Rc::clone(&ended);
    sheet.set_resize_handlers(ResizeHandlers {
        did_end_resizing: Some(Box::new(move |axis: Axis, index: isize, size: f64| {
            sink.borrow_mut().push((axis, index, size));
            true
        })),
        ..ResizeHandlers::default()
    });

    sheet.begin_resizing_column(4);
    sheet.update_resizing(4, 180.0);
    sheet.end_resizing();

    assert_eq!(*ended.borrow(), vec![(Axis::Horizontal, 4, 180.0)]);
    assert_eq!(width_of(&sheet, 4), 100.0);
}

#[test]
fn test_declining_handler_lets_sheet_commit() {
    let mut sheet = framed_sheet();
    sheet.set_resize_handlers(ResizeHandlers {
        did_end_resizing: Some(Box::new(|_: Axis, _: isize, _: f64| false)),
        ..ResizeHandlers::default()
    });
    sheet.begin_resizing_row(0);
    sheet.update_resizing(0, 90.0);
    sheet.end_resizing();
    assert_eq!(sheet.rows().get(0).unwrap().size, 90.0);
}

#[test]
fn test_custom_indicator_frame() {
    let mut sheet = framed_sheet();
    sheet.set_resize_handlers(ResizeHandlers {
        indicator_frame: Some(Box::new(|_: Axis, edge: f64| {
            Rect::new(edge - 2.0, 0.0, 4.0, 10.0)
        })),
        ..ResizeHandlers::default()
    });
    sheet.begin_resizing_column(2);
    assert_eq!(
        sheet.resize_indicator(),
        Some(Rect::new(398.0, 0.0, 4.0, 10.0))
    );
}

#[test]
fn test_new_session_ends_previous_one() {
    let mut sheet = framed_sheet();
    sheet.begin_resizing_column(1);
    sheet.update_resizing(1, 120.0);
    sheet.begin_resizing_column(3);

    assert_eq!(width_of(&sheet, 1), 120.0);
    assert_eq!(sheet.resize_session().unwrap().index, 3);
}
