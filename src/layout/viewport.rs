//! Viewport state and visible-range resolution.

use crate::types::{CellRange, Point, Rect, Size};

use super::GeometryTable;

/// Visible window of one scroll region, in the region's content coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    /// Scroll position (top-left corner of the visible window)
    pub offset: Point,
    /// Size of the visible window
    pub size: Size,
}

impl Viewport {
    pub fn new(offset: Point, size: Size) -> Self {
        Self { offset, size }
    }

    pub fn top_left(&self) -> Point {
        self.offset
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(
            self.offset.x + self.size.width,
            self.offset.y + self.size.height,
        )
    }

    pub fn visible_rect(&self) -> Rect {
        Rect::new(
            self.offset.x,
            self.offset.y,
            self.size.width,
            self.size.height,
        )
    }

    /// Clamp an offset so the window stays inside `content`.
    ///
    /// When the content is smaller than the window on an axis, that axis is
    /// pinned at 0.
    pub fn clamp_offset(&self, offset: Point, content: Size) -> Point {
        let max_x = (content.width - self.size.width).max(0.0);
        let max_y = (content.height - self.size.height).max(0.0);
        let x = if offset.x.is_finite() { offset.x } else { 0.0 };
        let y = if offset.y.is_finite() { offset.y } else { 0.0 };
        Point::new(x.clamp(0.0, max_x), y.clamp(0.0, max_y))
    }

    /// Offset that brings `rect` into view with the least movement.
    ///
    /// A rect larger than the window is cut down to the window size first, so
    /// only its top-left corner is guaranteed to become visible. Returns
    /// `None` if the rect is already fully visible.
    pub fn offset_revealing(&self, rect: Rect, content: Size) -> Option<Point> {
        let target = rect.limited_by(self.size);
        let mut offset = self.offset;

        if target.x < offset.x {
            offset.x = target.x;
        } else if target.max_x() > offset.x + self.size.width {
            offset.x = target.max_x() - self.size.width;
        }
        if target.y < offset.y {
            offset.y = target.y;
        } else if target.max_y() > offset.y + self.size.height {
            offset.y = target.max_y() - self.size.height;
        }

        let offset = self.clamp_offset(offset, content);
        if offset == self.offset {
            None
        } else {
            Some(offset)
        }
    }
}

/// How a region treats one axis during range resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisPolicy {
    /// The axis scrolls: resolve from the viewport edges.
    Scrolling,
    /// The axis is pinned: always report the whole table.
    Fixed,
}

/// Maps a viewport to the index window worth materializing.
///
/// Pure: the same inputs always give the same range.
#[derive(Debug, Clone, Copy)]
pub struct VisibleRangeResolver<'a> {
    pub columns: &'a GeometryTable,
    pub rows: &'a GeometryTable,
    pub horizontal: AxisPolicy,
    pub vertical: AxisPolicy,
    /// Padding units added before the leading edge and kept past the trailing one.
    pub overscan: usize,
}

impl VisibleRangeResolver<'_> {
    pub fn resolve(&self, top_left: Point, bottom_right: Point) -> CellRange {
        let (left_column, right_column) = resolve_axis(
            self.columns,
            self.horizontal,
            top_left.x,
            bottom_right.x,
            self.overscan,
        );
        let (top_row, bottom_row) = resolve_axis(
            self.rows,
            self.vertical,
            top_left.y,
            bottom_right.y,
            self.overscan,
        );
        if left_column >= right_column || top_row >= bottom_row {
            return CellRange::EMPTY;
        }
        CellRange {
            left_column,
            right_column,
            top_row,
            bottom_row,
        }
    }

    pub fn resolve_viewport(&self, viewport: &Viewport) -> CellRange {
        self.resolve(viewport.top_left(), viewport.bottom_right())
    }
}

/// Half-open index span for one axis.
///
/// The entry under `trail` is included (the exclusive bound sits one past
/// it); `overscan` more entries are added before `lead`.
fn resolve_axis(
    table: &GeometryTable,
    policy: AxisPolicy,
    lead: f64,
    trail: f64,
    overscan: usize,
) -> (usize, usize) {
    let count = table.len();
    if count == 0 {
        return (0, 0);
    }
    if policy == AxisPolicy::Fixed {
        return (0, count);
    }
    let last = count - 1;
    let locate = |offset: f64| match table.find_intersecting(offset) {
        Some(def) => def.index,
        None if offset <= 0.0 => 0,
        None => last,
    };
    let first = locate(lead);
    let end = locate(trail.max(lead));
    (
        first.saturating_sub(overscan),
        end.saturating_add(overscan.max(1)).min(count),
    )
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    fn resolver<'a>(cols: &'a GeometryTable, rows: &'a GeometryTable) -> VisibleRangeResolver<'a> {
        VisibleRangeResolver {
            columns: cols,
            rows,
            horizontal: AxisPolicy::Scrolling,
            vertical: AxisPolicy::Scrolling,
            overscan: 1,
        }
    }

    #[test]
    fn test_initial_window() {
        let cols = GeometryTable::uniform(20, 100.0);
        let rows = GeometryTable::uniform(50, 45.0);
        let range = resolver(&cols, &rows).resolve(Point::ZERO, Point::new(400.0, 450.0));
        assert_eq!(range, CellRange::new(0, 5, 0, 11));
    }

    #[test]
    fn test_leading_padding() {
        let cols = GeometryTable::uniform(20, 100.0);
        let rows = GeometryTable::uniform(50, 45.0);
        let range = resolver(&cols, &rows)
            .resolve(Point::new(1000.0, 0.0), Point::new(1400.0, 450.0));
        assert_eq!(range.left_column, 9);
        assert_eq!(range.right_column, 15);
    }

    #[test]
    fn test_clamped_at_table_end() {
        let cols = GeometryTable::uniform(20, 100.0);
        let rows = GeometryTable::uniform(50, 45.0);
        let range = resolver(&cols, &rows)
            .resolve(Point::new(1600.0, 0.0), Point::new(2000.0, 450.0));
        assert_eq!(range.right_column, 20);
        assert_eq!(range.left_column, 15);
    }

    #[test]
    fn test_fixed_axis_reports_full_extent() {
        let cols = GeometryTable::uniform(20, 100.0);
        let rows = GeometryTable::uniform(2, 30.0);
        let mut r = resolver(&cols, &rows);
        r.vertical = AxisPolicy::Fixed;
        let range = r.resolve(Point::new(500.0, 0.0), Point::new(900.0, 10.0));
        assert_eq!((range.top_row, range.bottom_row), (0, 2));
        assert_eq!((range.left_column, range.right_column), (4, 10));
    }

    #[test]
    fn test_empty_table_gives_empty_range() {
        let cols = GeometryTable::default();
        let rows = GeometryTable::uniform(5, 10.0);
        let range = resolver(&cols, &rows).resolve(Point::ZERO, Point::new(100.0, 100.0));
        assert_eq!(range, CellRange::EMPTY);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let cols = GeometryTable::uniform(20, 100.0);
        let rows = GeometryTable::uniform(50, 45.0);
        let r = resolver(&cols, &rows);
        let a = r.resolve(Point::new(333.0, 777.0), Point::new(733.0, 1227.0));
        let b = r.resolve(Point::new(333.0, 777.0), Point::new(733.0, 1227.0));
        assert_eq!(a, b);
    }

    #[test]
    fn test_clamp_offset() {
        let vp = Viewport::new(Point::ZERO, Size::new(400.0, 450.0));
        let content = Size::new(2000.0, 2250.0);
        assert_eq!(
            vp.clamp_offset(Point::new(-5.0, 9999.0), content),
            Point::new(0.0, 1800.0)
        );
        let small = Size::new(100.0, 100.0);
        assert_eq!(vp.clamp_offset(Point::new(50.0, 50.0), small), Point::ZERO);
    }

    #[test]
    fn test_offset_revealing() {
        let vp = Viewport::new(Point::ZERO, Size::new(400.0, 450.0));
        let content = Size::new(2000.0, 2250.0);
        assert_eq!(
            vp.offset_revealing(Rect::new(10.0, 10.0, 50.0, 50.0), content),
            None
        );
        assert_eq!(
            vp.offset_revealing(Rect::new(900.0, 0.0, 100.0, 45.0), content),
            Some(Point::new(600.0, 0.0))
        );
        // Larger than the window: top-left wins.
        assert_eq!(
            vp.offset_revealing(Rect::new(1000.0, 900.0, 800.0, 900.0), content),
            Some(Point::new(1000.0, 900.0))
        );
    }
}
