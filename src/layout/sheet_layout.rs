//! Geometry tables for one sheet axis.
//!
//! A table stores every column (or row) with its size and the cumulative
//! offset of its leading edge, so that offset → index lookups are O(log n)
//! binary searches and index → frame lookups are O(1).

use std::cmp::Ordering;
use std::ops::Range;

use serde::Serialize;

/// One column or row: position in the table, extent, and leading-edge offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisDefinition {
    pub index: usize,
    pub size: f64,
    pub offset: f64,
}

impl AxisDefinition {
    /// Trailing edge (`offset + size`).
    pub fn end(&self) -> f64 {
        self.offset + self.size
    }

    /// Lower-closed span test.
    pub fn spans(&self, offset: f64) -> bool {
        offset >= self.offset && offset < self.end()
    }
}

/// A column of the content or fixed-left area.
pub type ColumnDefinition = AxisDefinition;
/// A row of the content or fixed-top area.
pub type RowDefinition = AxisDefinition;

/// Offset-sorted sequence of axis definitions.
///
/// Invariants: `entries[i].index == i`, `entries[0].offset == 0` and
/// `entries[i + 1].offset == entries[i].offset + entries[i].size`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryTable {
    entries: Vec<AxisDefinition>,
}

impl GeometryTable {
    /// Build a table of `count` entries, asking `size_at` for each size.
    ///
    /// Sizes that are not strictly positive and finite are replaced by
    /// `fallback`.
    pub fn build(count: usize, fallback: f64, mut size_at: impl FnMut(usize) -> Option<f64>) -> Self {
        let mut entries = Vec::with_capacity(count);
        let mut offset = 0.0;
        for index in 0..count {
            let size = size_at(index)
                .filter(|s| s.is_finite() && *s > 0.0)
                .unwrap_or(fallback);
            entries.push(AxisDefinition {
                index,
                size,
                offset,
            });
            offset += size;
        }
        Self { entries }
    }

    /// Build a table from explicit sizes.
    pub fn from_sizes(sizes: &[f64], fallback: f64) -> Self {
        Self::build(sizes.len(), fallback, |i| sizes.get(i).copied())
    }

    /// Build `count` entries of the same size.
    pub fn uniform(count: usize, size: f64) -> Self {
        Self::build(count, size, |_| None)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&AxisDefinition> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[AxisDefinition] {
        &self.entries
    }

    /// Trailing edge of the last entry (0 for an empty table).
    pub fn total_extent(&self) -> f64 {
        self.entries.last().map_or(0.0, AxisDefinition::end)
    }

    /// Whether `index` addresses an entry of this table.
    pub fn is_valid(&self, index: isize) -> bool {
        usize::try_from(index).is_ok_and(|i| i < self.entries.len())
    }

    /// Change the size of one entry and re-derive every later offset.
    ///
    /// Returns `false` (and leaves the table untouched) for an invalid index,
    /// a non-positive size, or a size equal to the current one.
    pub fn resize(&mut self, index: usize, size: f64) -> bool {
        if !(size.is_finite() && size > 0.0) {
            return false;
        }
        let Some(entry) = self.entries.get_mut(index) else {
            return false;
        };
        if (entry.size - size).abs() <= f64::EPSILON {
            return false;
        }
        entry.size = size;
        let mut offset = entry.end();
        for next in self.entries.iter_mut().skip(index + 1) {
            next.offset = offset;
            offset += next.size;
        }
        true
    }

    /// Find the entry whose `[offset, offset + size)` span contains `offset`.
    ///
    /// Returns `None` outside `[0, total_extent)`. An offset landing exactly on
    /// a boundary belongs to the entry starting there.
    pub fn find_intersecting(&self, offset: f64) -> Option<&AxisDefinition> {
        Self::search(&self.entries, offset)
    }

    /// Like [`find_intersecting`](Self::find_intersecting), restricted to the
    /// entries in `window` (typically a region's materialized range).
    pub fn find_visible_intersecting(
        &self,
        offset: f64,
        window: Range<usize>,
    ) -> Option<&AxisDefinition> {
        let end = window.end.min(self.entries.len());
        let start = window.start.min(end);
        self.entries
            .get(start..end)
            .and_then(|slice| Self::search(slice, offset))
    }

    /// Leading and trailing edge of the inclusive span `first..=last`.
    pub fn span(&self, first: usize, last: usize) -> Option<(f64, f64)> {
        let lo = self.entries.get(first.min(last))?;
        let hi = self.entries.get(first.max(last))?;
        Some((lo.offset, hi.end()))
    }

    fn search(entries: &[AxisDefinition], offset: f64) -> Option<&AxisDefinition> {
        if !offset.is_finite() {
            return None;
        }
        entries
            .binary_search_by(|def| {
                if def.offset > offset {
                    Ordering::Greater
                } else if def.end() <= offset {
                    Ordering::Less
                } else {
                    Ordering::Equal
                }
            })
            .ok()
            .and_then(|i| entries.get(i))
    }
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

    fn twenty_wide() -> GeometryTable {
        GeometryTable::uniform(20, 100.0)
    }

    #[test]
    fn test_offsets_are_cumulative() {
        let table = GeometryTable::from_sizes(&[10.0, 20.0, 30.0], 5.0);
        let offsets: Vec<f64> = table.entries().iter().map(|d| d.offset).collect();
        assert_eq!(offsets, vec![0.0, 10.0, 30.0]);
        assert_eq!(table.total_extent(), 60.0);
    }

    #[test]
    fn test_invalid_sizes_fall_back() {
        let table = GeometryTable::from_sizes(&[0.0, -3.0, f64::NAN, 7.0], 5.0);
        let sizes: Vec<f64> = table.entries().iter().map(|d| d.size).collect();
        assert_eq!(sizes, vec![5.0, 5.0, 5.0, 7.0]);
    }

    #[test]
    fn test_find_first_element() {
        assert_eq!(twenty_wide().find_intersecting(10.0).unwrap().index, 0);
    }

    #[test]
    fn test_find_mid_element() {
        assert_eq!(twenty_wide().find_intersecting(1010.0).unwrap().index, 10);
    }

    #[test]
    fn test_find_last_element() {
        assert_eq!(twenty_wide().find_intersecting(1910.0).unwrap().index, 19);
    }

    #[test]
    fn test_find_out_of_bounds() {
        let table = twenty_wide();
        assert!(table.find_intersecting(2001.0).is_none());
        assert!(table.find_intersecting(2000.0).is_none());
        assert!(table.find_intersecting(-1.0).is_none());
        assert!(table.find_intersecting(f64::NAN).is_none());
    }

    #[test]
    fn test_boundary_belongs_to_next_entry() {
        let table = twenty_wide();
        assert_eq!(table.find_intersecting(0.0).unwrap().index, 0);
        assert_eq!(table.find_intersecting(100.0).unwrap().index, 1);
        assert_eq!(table.find_intersecting(99.999).unwrap().index, 0);
    }

    #[test]
    fn test_find_empty_table() {
        assert!(GeometryTable::default().find_intersecting(0.0).is_none());
    }

    #[test]
    fn test_find_visible_restricts_window() {
        let table = twenty_wide();
        assert_eq!(
            table.find_visible_intersecting(550.0, 3..8).unwrap().index,
            5
        );
        assert!(table.find_visible_intersecting(150.0, 3..8).is_none());
        assert!(table.find_visible_intersecting(150.0, 30..40).is_none());
    }

    #[test]
    fn test_resize_shifts_later_offsets() {
        let mut table = twenty_wide();
        assert!(table.resize(3, 250.0));
        assert_eq!(table.get(2).unwrap().offset, 200.0);
        assert_eq!(table.get(3).unwrap().offset, 300.0);
        assert_eq!(table.get(4).unwrap().offset, 550.0);
        assert_eq!(table.get(19).unwrap().offset, 2050.0);
        assert_eq!(table.total_extent(), 2150.0);
    }

    #[test]
    fn test_resize_rejects_noop_and_invalid() {
        let mut table = twenty_wide();
        assert!(!table.resize(3, 100.0));
        assert!(!table.resize(20, 50.0));
        assert!(!table.resize(0, 0.0));
        assert_eq!(table, twenty_wide());
    }

    #[test]
    fn test_span() {
        let table = twenty_wide();
        assert_eq!(table.span(2, 4), Some((200.0, 500.0)));
        assert_eq!(table.span(4, 2), Some((200.0, 500.0)));
        assert_eq!(table.span(2, 40), None);
    }
}
