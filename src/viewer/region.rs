//! Scroll regions and their cell lifecycle.
//!
//! A region owns the map from visible index to live cell. Every offset,
//! geometry or frame change goes through [`ScrollRegion::refresh`], which
//! diffs the newly resolved range against the materialized one and only
//! touches cells that entered or left.

use std::collections::HashMap;
use std::rc::Rc;

use crate::cell::{CellHandle, SheetCell};
use crate::layout::{AxisPolicy, GeometryTable, Viewport, VisibleRangeResolver};
use crate::render::{CellSnapshot, RegionSnapshot};
use crate::types::{Axis, CellIndex, CellRange, Point, Rect, Selection, SheetArea, Size};

/// Where regions get cells from and hand retired cells back to.
pub(crate) trait CellBroker {
    /// A cell for `index`, never failing: a placeholder stands in for
    /// anything the provider does not supply.
    fn cell_for(&mut self, index: CellIndex, area: SheetArea) -> CellHandle;

    fn release_cell(&mut self, cell: CellHandle);
}

/// One scrollable sub-region of a sheet.
#[derive(Debug)]
pub struct ScrollRegion {
    area: SheetArea,
    columns: Rc<GeometryTable>,
    rows: Rc<GeometryTable>,
    /// Frame in sheet coordinates
    frame: Rect,
    offset: Point,
    overscan: usize,
    range: CellRange,
    visible: HashMap<CellIndex, CellHandle>,
    selection: Selection,
}

impl ScrollRegion {
    pub(crate) fn new(area: SheetArea, overscan: usize) -> Self {
        Self {
            area,
            columns: Rc::new(GeometryTable::default()),
            rows: Rc::new(GeometryTable::default()),
            frame: Rect::ZERO,
            offset: Point::ZERO,
            overscan,
            range: CellRange::EMPTY,
            visible: HashMap::new(),
            selection: Selection::None,
        }
    }

    pub fn area(&self) -> SheetArea {
        self.area
    }

    pub fn frame(&self) -> Rect {
        self.frame
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    /// Currently materialized index window.
    pub fn range(&self) -> CellRange {
        self.range
    }

    /// Selection this region displays; `None` if the sheet selection is not
    /// supported here.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn columns(&self) -> &GeometryTable {
        &self.columns
    }

    pub fn rows(&self) -> &GeometryTable {
        &self.rows
    }

    /// Number of live cells.
    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    pub fn cell(&self, index: &CellIndex) -> Option<&dyn SheetCell> {
        self.visible.get(index).map(AsRef::as_ref)
    }

    /// Indices of all live cells, ordered by column then row.
    pub fn visible_indices(&self) -> Vec<CellIndex> {
        let mut indices: Vec<CellIndex> = self.visible.keys().copied().collect();
        indices.sort_unstable();
        indices
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.offset, self.frame.size())
    }

    pub fn content_size(&self) -> Size {
        Size::new(self.columns.total_extent(), self.rows.total_extent())
    }

    /// Range the current viewport asks for. Pure.
    pub fn resolve_range(&self) -> CellRange {
        if self.frame.is_empty() {
            return CellRange::EMPTY;
        }
        let (horizontal, vertical) = match self.area {
            SheetArea::Content => (AxisPolicy::Scrolling, AxisPolicy::Scrolling),
            SheetArea::FixedTop => (AxisPolicy::Scrolling, AxisPolicy::Fixed),
            SheetArea::FixedLeft => (AxisPolicy::Fixed, AxisPolicy::Scrolling),
        };
        VisibleRangeResolver {
            columns: &self.columns,
            rows: &self.rows,
            horizontal,
            vertical,
            overscan: self.overscan,
        }
        .resolve_viewport(&self.viewport())
    }

    /// Convert a point in sheet coordinates to this region's content coordinates.
    pub fn to_content(&self, point: Point) -> Point {
        Point::new(
            point.x - self.frame.x + self.offset.x,
            point.y - self.frame.y + self.offset.y,
        )
    }

    /// Convert a point in content coordinates to sheet coordinates.
    pub fn to_sheet(&self, point: Point) -> Point {
        Point::new(
            point.x - self.offset.x + self.frame.x,
            point.y - self.offset.y + self.frame.y,
        )
    }

    /// Index under `point` (content coordinates), searching only the
    /// materialized range.
    pub fn hit_test(&self, point: Point) -> Option<CellIndex> {
        if self.range.is_empty() {
            return None;
        }
        let col = self.columns.find_visible_intersecting(
            point.x,
            self.range.left_column..self.range.right_column,
        )?;
        let row = self
            .rows
            .find_visible_intersecting(point.y, self.range.top_row..self.range.bottom_row)?;
        Some(self.make_index(col.index, row.index))
    }

    /// Offset that makes `rect` (content coordinates) visible, if a move is needed.
    pub fn scroll_rect_to_visible(&self, rect: Rect) -> Option<Point> {
        self.viewport().offset_revealing(rect, self.content_size())
    }

    pub fn is_selection_supported(&self, selection: &Selection) -> bool {
        match self.area {
            SheetArea::Content => true,
            SheetArea::FixedTop => selection.is_column_oriented(),
            SheetArea::FixedLeft => selection.is_row_oriented(),
        }
    }

    pub fn snapshot(&self) -> RegionSnapshot {
        let mut cells: Vec<CellSnapshot> = self.visible.values().map(|cell| cell.render()).collect();
        cells.sort_unstable_by_key(|cell| (cell.row, cell.col));
        RegionSnapshot {
            area: self.area,
            frame: self.frame,
            offset: self.offset,
            range: self.range,
            cells,
        }
    }

    // ===== geometry =====

    pub(crate) fn set_geometry(&mut self, columns: Rc<GeometryTable>, rows: Rc<GeometryTable>) {
        self.columns = columns;
        self.rows = rows;
    }

    pub(crate) fn set_frame(&mut self, frame: Rect) {
        self.frame = frame;
    }

    // ===== lifecycle =====

    /// Scroll to `offset` (clamped to the content). Returns `false` when the
    /// clamped offset equals the current one.
    pub(crate) fn apply_offset<B: CellBroker>(&mut self, offset: Point, broker: &mut B) -> bool {
        let clamped = self.viewport().clamp_offset(offset, self.content_size());
        if clamped == self.offset {
            return false;
        }
        tracing::trace!(
            target: "sheetview::scroll",
            area = ?self.area,
            x = clamped.x,
            y = clamped.y,
            "offset changed"
        );
        self.offset = clamped;
        self.refresh(broker);
        true
    }

    /// Scroll along one axis, keeping the other.
    pub(crate) fn apply_axis<B: CellBroker>(&mut self, axis: Axis, value: f64, broker: &mut B) -> bool {
        let mut offset = self.offset;
        match axis {
            Axis::Horizontal => offset.x = value,
            Axis::Vertical => offset.y = value,
        }
        self.apply_offset(offset, broker)
    }

    /// Re-clamp the offset after a geometry or frame change, then refresh.
    pub(crate) fn revalidate<B: CellBroker>(&mut self, broker: &mut B) {
        self.offset = self.viewport().clamp_offset(self.offset, self.content_size());
        self.refresh(broker);
    }

    /// Bring the live cells in line with the resolved range.
    ///
    /// A no-op when the range did not change.
    pub(crate) fn refresh<B: CellBroker>(&mut self, broker: &mut B) -> bool {
        let range = self.resolve_range();
        if range == self.range {
            return false;
        }
        let released = self.release_cells(&range, broker);
        let added = self.add_cells(&range, broker);
        self.range = range;
        tracing::trace!(
            target: "sheetview::lifecycle",
            area = ?self.area,
            ?range,
            released,
            added,
            "range changed"
        );
        true
    }

    /// Drop every live cell and rebuild from the current geometry.
    pub(crate) fn reload<B: CellBroker>(&mut self, broker: &mut B) {
        let released = self.release_cells(&CellRange::EMPTY, broker);
        self.range = CellRange::EMPTY;
        self.revalidate(broker);
        tracing::debug!(
            target: "sheetview::lifecycle",
            area = ?self.area,
            released,
            live = self.visible.len(),
            "region reloaded"
        );
    }

    /// Release every live cell whose index is outside `keep`.
    pub(crate) fn release_cells<B: CellBroker>(&mut self, keep: &CellRange, broker: &mut B) -> usize {
        self.release_where(|index| !keep.contains(index), broker)
    }

    /// Acquire a cell for every index of `range` that has none yet.
    pub(crate) fn add_cells<B: CellBroker>(&mut self, range: &CellRange, broker: &mut B) -> usize {
        let mut added = 0;
        for (col, row) in range.positions() {
            let index = self.make_index(col, row);
            if self.visible.contains_key(&index) {
                continue;
            }
            let Some(frame) = self.frame_of(col, row) else {
                continue;
            };
            let cell = self.acquire(index, frame, broker);
            self.visible.insert(index, cell);
            added += 1;
        }
        added
    }

    /// Swap the live cells at `indices` for fresh ones from the provider,
    /// keeping their frames. Indices without a live cell are skipped.
    pub(crate) fn reload_cells_at<B: CellBroker>(
        &mut self,
        indices: &[CellIndex],
        broker: &mut B,
    ) -> usize {
        let mut reloaded = 0;
        for index in indices {
            let Some((key, old)) = self.visible.remove_entry(index) else {
                continue;
            };
            let frame = old.frame();
            broker.release_cell(old);
            let cell = self.acquire(key, frame, broker);
            self.visible.insert(key, cell);
            reloaded += 1;
        }
        reloaded
    }

    /// Release and re-acquire every live cell matching `affected`, then
    /// settle on the range of the changed geometry.
    ///
    /// Cells outside `affected` keep their instance and frame.
    pub(crate) fn relayout<B: CellBroker>(
        &mut self,
        affected: impl Fn(&CellIndex) -> bool,
        broker: &mut B,
    ) -> usize {
        let stale = self.release_where(affected, broker);
        self.offset = self.viewport().clamp_offset(self.offset, self.content_size());
        let range = self.resolve_range();
        self.release_cells(&range, broker);
        self.add_cells(&range, broker);
        self.range = range;
        stale
    }

    // ===== selection =====

    /// Restamp live cells: the previous selection's cells go back to none,
    /// then the new selection's cells take it. Returns the number stamped.
    ///
    /// Only cells inside the materialized range are visited.
    pub(crate) fn apply_selection(&mut self, selection: &Selection) -> usize {
        let previous = std::mem::replace(&mut self.selection, selection.clone());
        let column_count = self.columns.len();
        for index in previous.visible_indices(&self.range, column_count) {
            if let Some(cell) = self.visible.get_mut(&index) {
                cell.stamp_selection(&Selection::None);
            }
        }
        let mut stamped = 0;
        for index in selection.visible_indices(&self.range, column_count) {
            if let Some(cell) = self.visible.get_mut(&index) {
                cell.stamp_selection(selection);
                stamped += 1;
            }
        }
        stamped
    }

    pub(crate) fn clear_selection(&mut self) {
        self.apply_selection(&Selection::None);
    }

    // ===== helpers =====

    fn release_where<B: CellBroker>(
        &mut self,
        leaving: impl Fn(&CellIndex) -> bool,
        broker: &mut B,
    ) -> usize {
        let indices: Vec<CellIndex> = self.visible.keys().filter(|i| leaving(i)).copied().collect();
        for index in &indices {
            if let Some(cell) = self.visible.remove(index) {
                broker.release_cell(cell);
            }
        }
        indices.len()
    }

    fn acquire<B: CellBroker>(&self, index: CellIndex, frame: Rect, broker: &mut B) -> CellHandle {
        let mut cell = broker.cell_for(index, self.area);
        {
            let state = cell.state_mut();
            state.index = index;
            state.frame = frame;
        }
        if self.selection.contains(&index) {
            cell.stamp_selection(&self.selection);
        } else {
            cell.stamp_selection(&Selection::None);
        }
        cell
    }

    fn frame_of(&self, col: usize, row: usize) -> Option<Rect> {
        let column = self.columns.get(col)?;
        let row = self.rows.get(row)?;
        Some(Rect::new(column.offset, row.offset, column.size, row.size))
    }

    fn make_index(&self, col: usize, row: usize) -> CellIndex {
        CellIndex::with_column_count(to_isize(col), to_isize(row), self.columns.len())
    }
}

fn to_isize(value: usize) -> isize {
    isize::try_from(value).unwrap_or(isize::MAX)
}

/// The three regions of a sheet.
#[derive(Debug)]
pub(crate) struct Regions {
    pub content: ScrollRegion,
    pub top: ScrollRegion,
    pub left: ScrollRegion,
}

impl Regions {
    pub fn new(overscan: usize) -> Self {
        Self {
            content: ScrollRegion::new(SheetArea::Content, overscan),
            top: ScrollRegion::new(SheetArea::FixedTop, overscan),
            left: ScrollRegion::new(SheetArea::FixedLeft, overscan),
        }
    }

    pub fn get(&self, area: SheetArea) -> &ScrollRegion {
        match area {
            SheetArea::Content => &self.content,
            SheetArea::FixedTop => &self.top,
            SheetArea::FixedLeft => &self.left,
        }
    }

    pub fn get_mut(&mut self, area: SheetArea) -> &mut ScrollRegion {
        match area {
            SheetArea::Content => &mut self.content,
            SheetArea::FixedTop => &mut self.top,
            SheetArea::FixedLeft => &mut self.left,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScrollRegion> {
        [&self.content, &self.top, &self.left].into_iter()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;
    use crate::cell::{CellRegistry, TextCell};

    /// Broker that counts requests and pools into a real registry.
    struct CountingBroker {
        cells: CellRegistry,
        requested: Vec<CellIndex>,
        released: usize,
    }

    impl CountingBroker {
        fn new() -> Self {
            let mut cells = CellRegistry::new();
            cells
                .register("text", 1_000, || Box::new(TextCell::default()))
                .unwrap();
            Self {
                cells,
                requested: Vec::new(),
                released: 0,
            }
        }
    }

    impl CellBroker for CountingBroker {
        fn cell_for(&mut self, index: CellIndex, _area: SheetArea) -> CellHandle {
            self.requested.push(index);
            self.cells.dequeue("text").unwrap()
        }

        fn release_cell(&mut self, mut cell: CellHandle) {
            self.released += 1;
            cell.retire();
            self.cells.recycle(cell);
        }
    }

    fn content_region() -> ScrollRegion {
        let mut region = ScrollRegion::new(SheetArea::Content, 1);
        region.set_geometry(
            Rc::new(GeometryTable::uniform(20, 100.0)),
            Rc::new(GeometryTable::uniform(50, 45.0)),
        );
        region.set_frame(Rect::new(0.0, 0.0, 400.0, 450.0));
        region
    }

    fn assert_map_matches_range(region: &ScrollRegion) {
        let range = region.range();
        assert_eq!(region.len(), range.area());
        for index in region.visible_indices() {
            assert!(range.contains(&index), "{index:?} outside {range:?}");
        }
    }

    #[test]
    fn test_initial_refresh_materializes_range() {
        let mut region = content_region();
        let mut broker = CountingBroker::new();
        assert!(region.refresh(&mut broker));
        assert_eq!(region.range(), CellRange::new(0, 5, 0, 11));
        assert_eq!(broker.requested.len(), 55);
        assert_map_matches_range(&region);
    }

    #[test]
    fn test_unchanged_range_is_a_no_op() {
        let mut region = content_region();
        let mut broker = CountingBroker::new();
        region.refresh(&mut broker);
        let requested = broker.requested.len();
        assert!(!region.refresh(&mut broker));
        // sub-cell scroll keeps the same range
        assert!(region.apply_offset(Point::new(10.0, 0.0), &mut broker));
        assert_eq!(broker.requested.len(), requested);
        assert_eq!(broker.released, 0);
    }

    #[test]
    fn test_scroll_releases_and_acquires_only_the_delta() {
        let mut region = content_region();
        let mut broker = CountingBroker::new();
        region.refresh(&mut broker);
        broker.requested.clear();

        region.apply_offset(Point::new(100.0, 0.0), &mut broker);
        // columns [0,5) -> [0,6): one new column, nothing leaves
        assert_eq!(region.range(), CellRange::new(0, 6, 0, 11));
        assert_eq!(broker.requested.len(), 11);
        assert_eq!(broker.released, 0);

        region.apply_offset(Point::new(300.0, 0.0), &mut broker);
        assert_eq!(region.range(), CellRange::new(2, 8, 0, 11));
        assert_eq!(broker.released, 22);
        assert_map_matches_range(&region);
    }

    #[test]
    fn test_offset_is_clamped() {
        let mut region = content_region();
        let mut broker = CountingBroker::new();
        region.apply_offset(Point::new(99_999.0, -5.0), &mut broker);
        assert_eq!(region.offset(), Point::new(1600.0, 0.0));
        assert_eq!(region.range().right_column, 20);
    }

    #[test]
    fn test_reload_cells_at_keeps_frame() {
        let mut region = content_region();
        let mut broker = CountingBroker::new();
        region.refresh(&mut broker);
        let index = CellIndex::with_column_count(2, 3, 20);
        let frame = region.cell(&index).unwrap().frame();
        broker.requested.clear();

        let missing = CellIndex::with_column_count(19, 49, 20);
        assert_eq!(region.reload_cells_at(&[index, missing], &mut broker), 1);
        assert_eq!(broker.requested, vec![index]);
        assert_eq!(region.cell(&index).unwrap().frame(), frame);
        assert_map_matches_range(&region);
    }

    #[test]
    fn test_selection_restamps_visible_cells_only() {
        let mut region = content_region();
        let mut broker = CountingBroker::new();
        region.refresh(&mut broker);

        let stamped = region.apply_selection(&Selection::single_column(1));
        assert_eq!(stamped, 11);
        let in_column = CellIndex::with_column_count(1, 4, 20);
        assert!(region.cell(&in_column).unwrap().is_selected());

        region.apply_selection(&Selection::single_row(2));
        assert!(!region.cell(&in_column).unwrap().is_selected());
        let in_row = CellIndex::with_column_count(3, 2, 20);
        assert!(region.cell(&in_row).unwrap().is_selected());

        // cells entering the range pick up the selection
        region.apply_offset(Point::new(500.0, 0.0), &mut broker);
        let entered = CellIndex::with_column_count(8, 2, 20);
        assert!(region.cell(&entered).unwrap().is_selected());
    }

    #[test]
    fn test_frozen_support() {
        let top = ScrollRegion::new(SheetArea::FixedTop, 1);
        let left = ScrollRegion::new(SheetArea::FixedLeft, 1);
        let column = Selection::ColumnRange { from: 1, to: 3 };
        let row = Selection::single_row(1);
        assert!(top.is_selection_supported(&column));
        assert!(!top.is_selection_supported(&row));
        assert!(left.is_selection_supported(&row));
        assert!(!left.is_selection_supported(&Selection::cell_range(0, 0, 1, 1)));
    }

    #[test]
    fn test_hit_test_uses_materialized_range() {
        let mut region = content_region();
        let mut broker = CountingBroker::new();
        region.refresh(&mut broker);
        let hit = region.hit_test(Point::new(250.0, 100.0)).unwrap();
        assert_eq!((hit.col, hit.row), (2, 2));
        assert!(region.hit_test(Point::new(1500.0, 100.0)).is_none());
    }

    #[test]
    fn test_empty_frame_materializes_nothing() {
        let mut region = content_region();
        region.set_frame(Rect::ZERO);
        let mut broker = CountingBroker::new();
        assert!(!region.refresh(&mut broker));
        assert!(region.is_empty());
    }
}
