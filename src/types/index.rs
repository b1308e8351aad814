use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A 2D position inside one sheet area.
///
/// Equality, hashing and ordering only look at `(col, row)`; `flat` is a
/// convenience value derived from the owning area's column count.
#[derive(Clone, Copy, Serialize, Deserialize)]
pub struct CellIndex {
    /// Zero-based column, increasing left to right.
    pub col: isize,
    /// Zero-based row, increasing top to bottom.
    pub row: isize,
    /// Position in a row-major flattening of the area (`row * column_count + col`).
    pub flat: isize,
}

impl CellIndex {
    /// Sentinel for "no index". Released cells carry this value.
    pub const INVALID: CellIndex = CellIndex {
        col: -1,
        row: -1,
        flat: -1,
    };

    /// Top-left position.
    pub const ZERO: CellIndex = CellIndex {
        col: 0,
        row: 0,
        flat: 0,
    };

    pub fn new(col: isize, row: isize, flat: isize) -> Self {
        Self { col, row, flat }
    }

    /// Build an index, deriving `flat` from the area's column count.
    pub fn with_column_count(col: isize, row: isize, column_count: usize) -> Self {
        let width = isize::try_from(column_count).unwrap_or(isize::MAX);
        Self {
            col,
            row,
            flat: row.saturating_mul(width).saturating_add(col),
        }
    }

    pub fn is_invalid(&self) -> bool {
        self.col < 0 || self.row < 0
    }

    /// Column as a table position, if non-negative.
    pub fn col_usize(&self) -> Option<usize> {
        usize::try_from(self.col).ok()
    }

    /// Row as a table position, if non-negative.
    pub fn row_usize(&self) -> Option<usize> {
        usize::try_from(self.row).ok()
    }
}

impl Default for CellIndex {
    fn default() -> Self {
        Self::INVALID
    }
}

impl PartialEq for CellIndex {
    fn eq(&self, other: &Self) -> bool {
        self.col == other.col && self.row == other.row
    }
}

impl Eq for CellIndex {}

impl Hash for CellIndex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.col.hash(state);
        self.row.hash(state);
    }
}

impl PartialOrd for CellIndex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellIndex {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.col, self.row).cmp(&(other.col, other.row))
    }
}

impl fmt::Debug for CellIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{Index {}, {}, {}}}", self.col, self.row, self.flat)
    }
}
