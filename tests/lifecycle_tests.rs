//! Cell lifecycle tests
//!
//! Tests that each region materializes exactly its visible window, that
//! scrolling only touches entering and leaving cells, and that retired
//! cells go back to bounded reuse pools.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{assert_region_consistent, config, loaded_sheet, take_calls, GridProvider};
use sheetview::{
    CellIndex, CellRange, DataProvider, Point, SheetArea, SheetConfig, SheetError, SheetView, Size,
    TextCell,
};

fn small_sheet() -> SheetView<GridProvider> {
    loaded_sheet(
        GridProvider::new(20, 100),
        Size::new(400.0, 300.0),
        config(1),
    )
}

#[test]
fn test_initial_window() {
    let sheet = small_sheet();
    let content = sheet.region(SheetArea::Content);
    assert_eq!(content.range(), CellRange::new(0, 5, 0, 7));
    assert_eq!(content.len(), 35);
    assert_region_consistent(&sheet, SheetArea::Content);

    // no frozen rows or columns: nothing materialized there
    assert!(sheet.region(SheetArea::FixedTop).is_empty());
    assert!(sheet.region(SheetArea::FixedLeft).is_empty());
}

#[test]
fn test_scroll_only_requests_entering_cells() {
    let mut sheet = small_sheet();
    take_calls(&sheet);

    assert!(sheet.set_content_offset(Point::new(100.0, 0.0)));
    let calls = take_calls(&sheet);
    assert_eq!(sheet.region(SheetArea::Content).range(), CellRange::new(0, 6, 0, 7));
    assert_eq!(calls.len(), 7);
    assert!(calls
        .iter()
        .all(|(area, index)| *area == SheetArea::Content && index.col == 5));
    assert_region_consistent(&sheet, SheetArea::Content);
}

#[test]
fn test_scroll_within_same_window_is_free() {
    let mut sheet = small_sheet();
    take_calls(&sheet);

    // still resolves to [0, 5) x [0, 7)
    assert!(sheet.set_content_offset(Point::new(0.0, 10.0)));
    assert!(take_calls(&sheet).is_empty());
    assert_eq!(sheet.region(SheetArea::Content).len(), 35);
}

#[test]
fn test_scroll_releases_leaving_cells_into_pool() {
    let mut sheet = small_sheet();
    let before = sheet.pool_stats()["text"];
    assert_eq!(before.allocated, 35);
    assert_eq!(before.pooled, 0);

    // [0,5) -> [2,8): columns 0 and 1 leave, 5..8 enter
    sheet.set_content_offset(Point::new(300.0, 0.0));
    let stats = sheet.pool_stats()["text"];
    assert_eq!(sheet.region(SheetArea::Content).range(), CellRange::new(2, 8, 0, 7));
    // 14 released first, then 21 acquired: 14 reused, 7 new
    assert_eq!(stats.reused, 14);
    assert_eq!(stats.allocated, 42);
    assert_eq!(stats.pooled, 0);
    assert_region_consistent(&sheet, SheetArea::Content);
}

#[test]
fn test_recycled_cells_are_reset() {
    let mut sheet = small_sheet();
    sheet.set_content_offset(Point::new(1600.0, 4200.0));
    assert_region_consistent(&sheet, SheetArea::Content);

    let region = sheet.region(SheetArea::Content);
    for index in region.visible_indices() {
        let cell = region.cell(&index).unwrap();
        let text = cell.downcast_ref::<TextCell>().unwrap();
        assert_eq!(text.text, common::label(index));
        assert_eq!(cell.reuse_identifier(), "text");
        assert!(!cell.is_selected());
    }
}

#[test]
fn test_clamped_scroll_reports_no_change() {
    let mut sheet = small_sheet();
    assert!(sheet.set_content_offset(Point::new(99_999.0, 99_999.0)));
    assert_eq!(sheet.content_offset(), Point::new(1600.0, 4200.0));
    assert!(!sheet.scroll_by(10.0, 10.0));
    assert_eq!(
        sheet.region(SheetArea::Content).range(),
        CellRange::new(15, 20, 92, 100)
    );
}

#[test]
fn test_pool_never_exceeds_capacity() {
    let mut sheet = SheetView::new(GridProvider::new(20, 100), config(1));
    sheet
        .register_with("text", 5, || Box::new(TextCell::default()))
        .unwrap();
    sheet
        .register_with("header", 5, || Box::new(sheetview::HeaderCell::default()))
        .unwrap();
    sheet.set_bounds(Size::new(400.0, 300.0));
    sheet.reload_data();

    // jump far enough that every live cell leaves at once
    sheet.set_content_offset(Point::new(1600.0, 4200.0));
    let stats = sheet.pool_stats()["text"];
    assert!(stats.pooled <= 5);
    assert_eq!(stats.dropped, 35 - 5);
    assert_region_consistent(&sheet, SheetArea::Content);
}

#[test]
fn test_register_twice_is_an_error() {
    let mut sheet = small_sheet();
    let err = sheet
        .register("text", || Box::new(TextCell::default()))
        .unwrap_err();
    assert!(matches!(err, SheetError::DuplicateReuseIdentifier(ref id) if id == "text"));
}

#[test]
fn test_dequeue_unregistered_is_an_error() {
    let mut sheet = small_sheet();
    let err = sheet.dequeue_reusable_cell("missing").unwrap_err();
    assert!(matches!(err, SheetError::UnregisteredReuseIdentifier(_)));
    assert!(sheet.dequeue_reusable_cell("text").is_ok());
}

#[test]
fn test_missing_provider_cells_get_placeholders() {
    struct Bare;
    impl DataProvider for Bare {
        fn column_count(&self) -> usize {
            3
        }
        fn row_count(&self) -> usize {
            2
        }
    }

    let mut sheet = SheetView::new(Bare, SheetConfig::default());
    sheet.set_bounds(Size::new(1000.0, 1000.0));
    sheet.reload_data();
    let region = sheet.region(SheetArea::Content);
    assert_eq!(region.range(), CellRange::new(0, 3, 0, 2));
    assert_eq!(region.len(), 6);
    let cell = region.cell(&CellIndex::new(2, 1, 5)).unwrap();
    assert_eq!(cell.index(), CellIndex::new(2, 1, 5));
    assert!(cell.downcast_ref::<sheetview::EmptyCell>().is_some());
}

#[test]
fn test_empty_sheet_materializes_nothing() {
    let sheet = loaded_sheet(
        GridProvider::new(0, 0),
        Size::new(400.0, 300.0),
        config(1),
    );
    for area in SheetArea::ALL {
        assert!(sheet.region(area).is_empty());
        assert!(sheet.region(area).range().is_empty());
    }
}

#[test]
fn test_reload_data_rebuilds_every_cell() {
    let mut sheet = small_sheet();
    take_calls(&sheet);
    sheet.reload_data();
    assert_eq!(take_calls(&sheet).len(), 35);
    assert_region_consistent(&sheet, SheetArea::Content);
}

#[test]
fn test_reload_cells_at_only_touches_live_cells() {
    let mut sheet = small_sheet();
    take_calls(&sheet);
    let live = sheet.make_index(1, 1);
    let offscreen = sheet.make_index(15, 80);
    sheet.reload_cells_at(&[live, offscreen]);
    let calls = take_calls(&sheet);
    assert_eq!(calls, vec![(SheetArea::Content, live)]);
    assert_region_consistent(&sheet, SheetArea::Content);
}

#[test]
fn test_bounds_change_resolves_new_window() {
    let mut sheet = small_sheet();
    sheet.set_bounds(Size::new(800.0, 300.0));
    assert_eq!(
        sheet.region(SheetArea::Content).range(),
        CellRange::new(0, 9, 0, 7)
    );
    assert_region_consistent(&sheet, SheetArea::Content);

    sheet.set_bounds(Size::ZERO);
    assert!(sheet.region(SheetArea::Content).is_empty());
}

#[test]
fn test_large_sheet_window_is_bounded() {
    let mut sheet = loaded_sheet(
        GridProvider::new(1_000, 100_000),
        Size::new(1280.0, 800.0),
        config(1),
    );
    sheet.set_content_offset(Point::new(40_000.0, 3_000_000.0));
    let region = sheet.region(SheetArea::Content);
    // 1280 / 100 -> 13 or 14 columns plus padding; 800 / 45 -> 18 or 19 rows
    assert!(region.range().column_count() <= 15);
    assert!(region.range().row_count() <= 21);
    assert_region_consistent(&sheet, SheetArea::Content);
}
