use serde::{Deserialize, Serialize};

use super::CellIndex;

/// Rectangular window of materialized indices in one region.
///
/// Left/top are inclusive, right/bottom exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CellRange {
    pub left_column: usize,
    pub right_column: usize,
    pub top_row: usize,
    pub bottom_row: usize,
}

impl CellRange {
    pub const EMPTY: CellRange = CellRange {
        left_column: 0,
        right_column: 0,
        top_row: 0,
        bottom_row: 0,
    };

    pub fn new(left_column: usize, right_column: usize, top_row: usize, bottom_row: usize) -> Self {
        Self {
            left_column,
            right_column,
            top_row,
            bottom_row,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.left_column >= self.right_column || self.top_row >= self.bottom_row
    }

    pub fn column_count(&self) -> usize {
        self.right_column.saturating_sub(self.left_column)
    }

    pub fn row_count(&self) -> usize {
        self.bottom_row.saturating_sub(self.top_row)
    }

    /// Number of indices covered.
    pub fn area(&self) -> usize {
        self.column_count() * self.row_count()
    }

    pub fn contains_column(&self, col: isize) -> bool {
        usize::try_from(col).is_ok_and(|c| c >= self.left_column && c < self.right_column)
    }

    pub fn contains_row(&self, row: isize) -> bool {
        usize::try_from(row).is_ok_and(|r| r >= self.top_row && r < self.bottom_row)
    }

    pub fn contains(&self, index: &CellIndex) -> bool {
        self.contains_column(index.col) && self.contains_row(index.row)
    }

    /// Column-major `(col, row)` pairs inside the range.
    pub fn positions(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (self.left_column..self.right_column)
            .flat_map(move |col| (self.top_row..self.bottom_row).map(move |row| (col, row)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_right_and_bottom_are_exclusive() {
        let range = CellRange::new(2, 5, 0, 3);
        assert!(range.contains(&CellIndex::new(2, 0, 0)));
        assert!(range.contains(&CellIndex::new(4, 2, 0)));
        assert!(!range.contains(&CellIndex::new(5, 0, 0)));
        assert!(!range.contains(&CellIndex::new(2, 3, 0)));
        assert!(!range.contains(&CellIndex::INVALID));
    }

    #[test]
    fn test_empty_range_has_no_positions() {
        assert!(CellRange::EMPTY.is_empty());
        assert_eq!(CellRange::EMPTY.positions().count(), 0);
        assert_eq!(CellRange::new(0, 3, 0, 2).positions().count(), 6);
        assert_eq!(CellRange::new(0, 3, 0, 2).area(), 6);
    }
}
