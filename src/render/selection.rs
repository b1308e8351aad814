//! Selection geometry.
//!
//! Keeps the bounding-box math for scroll-to-selection testable without a
//! live sheet.

use crate::layout::GeometryTable;
use crate::types::{Rect, Selection};

/// Extent of a selection in content coordinates, per axis.
///
/// An axis is `None` when the selection does not constrain it (a column
/// selection spans every row) or when none of its indices exist.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionBounds {
    /// Leading and trailing x edge
    pub horizontal: Option<(f64, f64)>,
    /// Leading and trailing y edge
    pub vertical: Option<(f64, f64)>,
}

impl SelectionBounds {
    /// Bounds of `selection` against the content geometry.
    ///
    /// Indices outside the tables are ignored. Returns `None` when nothing
    /// of the selection exists.
    pub fn of(selection: &Selection, columns: &GeometryTable, rows: &GeometryTable) -> Option<Self> {
        let bounds = match selection {
            Selection::None => return None,
            Selection::ColumnSet(set) => Self {
                horizontal: set_span(set.iter().copied(), columns),
                vertical: None,
            },
            Selection::ColumnRange { from, to } => Self {
                horizontal: range_span(*from, *to, columns),
                vertical: None,
            },
            Selection::RowSet(set) => Self {
                horizontal: None,
                vertical: set_span(set.iter().copied(), rows),
            },
            Selection::RowRange { from, to } => Self {
                horizontal: None,
                vertical: range_span(*from, *to, rows),
            },
            Selection::CellSet(cells) => {
                let valid: Vec<_> = cells
                    .iter()
                    .filter(|c| columns.is_valid(c.col) && rows.is_valid(c.row))
                    .collect();
                Self {
                    horizontal: set_span(valid.iter().map(|c| c.col), columns),
                    vertical: set_span(valid.iter().map(|c| c.row), rows),
                }
            }
            Selection::CellRange {
                left,
                top,
                right,
                bottom,
            } => {
                let horizontal = range_span(*left, *right, columns);
                let vertical = range_span(*top, *bottom, rows);
                if horizontal.is_none() || vertical.is_none() {
                    return None;
                }
                Self {
                    horizontal,
                    vertical,
                }
            }
        };
        if bounds.horizontal.is_none() && bounds.vertical.is_none() {
            return None;
        }
        Some(bounds)
    }

    /// Rect to scroll into view, grown by `padding` on constrained axes.
    ///
    /// Unconstrained axes take the currently visible span with no padding, so
    /// scrolling to a column selection never moves vertically.
    pub fn to_rect(&self, visible: Rect, padding: f64) -> Rect {
        let (x, width) = match self.horizontal {
            Some((lo, hi)) => (lo - padding, hi - lo + 2.0 * padding),
            None => (visible.x, 0.0),
        };
        let (y, height) = match self.vertical {
            Some((lo, hi)) => (lo - padding, hi - lo + 2.0 * padding),
            None => (visible.y, 0.0),
        };
        Rect::new(x, y, width, height)
    }
}

fn set_span(indices: impl Iterator<Item = isize>, table: &GeometryTable) -> Option<(f64, f64)> {
    let mut span: Option<(usize, usize)> = None;
    for index in indices.filter(|i| table.is_valid(*i)) {
        let Ok(i) = usize::try_from(index) else {
            continue;
        };
        span = Some(match span {
            Some((lo, hi)) => (lo.min(i), hi.max(i)),
            None => (i, i),
        });
    }
    let (lo, hi) = span?;
    table.span(lo, hi)
}

/// Span of the inclusive range `from..=to`, clipped to the table.
/// `None` when `from > to`.
fn range_span(from: isize, to: isize, table: &GeometryTable) -> Option<(f64, f64)> {
    let last = isize::try_from(table.len()).ok()? - 1;
    let lo = from.max(0);
    let hi = to.min(last);
    if lo > hi {
        return None;
    }
    table.span(usize::try_from(lo).ok()?, usize::try_from(hi).ok()?)
}
