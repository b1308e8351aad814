use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{CellIndex, CellRange};

/// Kind of selection a tap is allowed to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SelectionMode {
    Cell,
    Row,
    Column,
    Range,
}

impl SelectionMode {
    /// Every mode enabled.
    pub fn all() -> BTreeSet<SelectionMode> {
        [
            SelectionMode::Cell,
            SelectionMode::Row,
            SelectionMode::Column,
            SelectionMode::Range,
        ]
        .into_iter()
        .collect()
    }
}

/// Selection state of a sheet. Exactly one variant is active.
///
/// Column and row variants cover whole columns/rows including the frozen
/// header cells on the orthogonal axis. Cell variants only affect content
/// cells. Range bounds are inclusive; a range whose start lies past its end
/// selects nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Selection {
    #[default]
    None,
    ColumnSet(BTreeSet<isize>),
    ColumnRange {
        from: isize,
        to: isize,
    },
    RowSet(BTreeSet<isize>),
    RowRange {
        from: isize,
        to: isize,
    },
    CellSet(BTreeSet<CellIndex>),
    CellRange {
        left: isize,
        top: isize,
        right: isize,
        bottom: isize,
    },
}

impl Selection {
    /// A [`Selection::ColumnSet`] holding one column.
    pub fn single_column(col: isize) -> Self {
        Selection::ColumnSet(BTreeSet::from([col]))
    }

    /// A [`Selection::RowSet`] holding one row.
    pub fn single_row(row: isize) -> Self {
        Selection::RowSet(BTreeSet::from([row]))
    }

    /// A [`Selection::CellSet`] holding one cell.
    pub fn single_cell(index: CellIndex) -> Self {
        Selection::CellSet(BTreeSet::from([index]))
    }

    pub fn cell_range(left: isize, top: isize, right: isize, bottom: isize) -> Self {
        Selection::CellRange {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Selection::None)
    }

    /// Whole-column variants.
    pub fn is_column_oriented(&self) -> bool {
        matches!(
            self,
            Selection::ColumnSet(_) | Selection::ColumnRange { .. }
        )
    }

    /// Whole-row variants.
    pub fn is_row_oriented(&self) -> bool {
        matches!(self, Selection::RowSet(_) | Selection::RowRange { .. })
    }

    /// True if `index` lies inside this selection's logical extent.
    pub fn contains(&self, index: &CellIndex) -> bool {
        match self {
            Selection::None => false,
            Selection::ColumnSet(cols) => cols.contains(&index.col),
            Selection::ColumnRange { from, to } => within(index.col, *from, *to),
            Selection::RowSet(rows) => rows.contains(&index.row),
            Selection::RowRange { from, to } => within(index.row, *from, *to),
            Selection::CellSet(cells) => cells.contains(index),
            Selection::CellRange {
                left,
                top,
                right,
                bottom,
            } => within(index.col, *left, *right) && within(index.row, *top, *bottom),
        }
    }

    /// Indices of this selection that fall inside `within`.
    ///
    /// The work is bounded by the materialized window, not by the logical
    /// size of the selection: selecting row 50 000 yields at most
    /// `within.column_count()` indices. `column_count` is the owning area's
    /// width, used to derive flat indices.
    pub fn visible_indices(&self, within: &CellRange, column_count: usize) -> Vec<CellIndex> {
        if within.is_empty() {
            return Vec::new();
        }
        let make = |col: usize, row: usize| {
            CellIndex::with_column_count(to_isize(col), to_isize(row), column_count)
        };
        let rows = within.top_row..within.bottom_row;
        let cols = within.left_column..within.right_column;

        match self {
            Selection::None => Vec::new(),
            Selection::ColumnSet(set) => set
                .range(to_isize(cols.start)..to_isize(cols.end))
                .filter_map(|col| usize::try_from(*col).ok())
                .flat_map(|col| rows.clone().map(move |row| (col, row)))
                .map(|(col, row)| make(col, row))
                .collect(),
            Selection::ColumnRange { from, to } => clip(*from, *to, &cols)
                .flat_map(|col| rows.clone().map(move |row| (col, row)))
                .map(|(col, row)| make(col, row))
                .collect(),
            Selection::RowSet(set) => set
                .range(to_isize(rows.start)..to_isize(rows.end))
                .filter_map(|row| usize::try_from(*row).ok())
                .flat_map(|row| cols.clone().map(move |col| (col, row)))
                .map(|(col, row)| make(col, row))
                .collect(),
            Selection::RowRange { from, to } => clip(*from, *to, &rows)
                .flat_map(|row| cols.clone().map(move |col| (col, row)))
                .map(|(col, row)| make(col, row))
                .collect(),
            Selection::CellSet(set) => {
                let lower = CellIndex::new(to_isize(cols.start), isize::MIN, 0);
                let upper = CellIndex::new(to_isize(cols.end), isize::MIN, 0);
                set.range(lower..upper)
                    .filter(|idx| within.contains_row(idx.row))
                    .filter_map(|idx| Some(make(idx.col_usize()?, idx.row_usize()?)))
                    .collect()
            }
            Selection::CellRange {
                left,
                top,
                right,
                bottom,
            } => {
                let row_span: Vec<usize> = clip(*top, *bottom, &rows).collect();
                clip(*left, *right, &cols)
                    .flat_map(|col| row_span.iter().map(move |row| (col, *row)))
                    .map(|(col, row)| make(col, row))
                    .collect()
            }
        }
    }
}

fn within(value: isize, from: isize, to: isize) -> bool {
    value >= from && value <= to
}

fn to_isize(value: usize) -> isize {
    isize::try_from(value).unwrap_or(isize::MAX)
}

/// Intersection of the inclusive span `from..=to` with the half-open `window`.
/// Empty when `from > to`.
fn clip(from: isize, to: isize, window: &std::ops::Range<usize>) -> std::ops::Range<usize> {
    if from > to {
        return 0..0;
    }
    let lo = usize::try_from(from.max(0)).unwrap_or(0);
    let hi = match usize::try_from(to) {
        Ok(hi) => hi.saturating_add(1),
        Err(_) => 0,
    };
    lo.max(window.start)..hi.min(window.end)
}
