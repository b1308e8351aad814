//! The data-provider capability a sheet pulls its shape and cells from.

use crate::cell::{CellHandle, CellRegistry};
use crate::types::{CellIndex, SheetArea};

/// Supplies the table shape and the cells of a [`SheetView`](super::SheetView).
///
/// Only the two counts are required. Every other method has a default that
/// makes the sheet fall back to configured sizes and placeholder cells.
///
/// Cells are handed out by value. Implementations normally take them from
/// `cells` with [`CellRegistry::dequeue`] so that retired instances get reused.
pub trait DataProvider {
    fn column_count(&self) -> usize;

    fn row_count(&self) -> usize;

    /// Width of content column `index`; `None` uses the configured default.
    fn column_width(&self, _index: usize) -> Option<f64> {
        None
    }

    /// Height of content row `index`; `None` uses the configured default.
    fn row_height(&self, _index: usize) -> Option<f64> {
        None
    }

    /// Number of frozen rows in `area` (only `FixedTop` is asked).
    fn fixed_row_count(&self, _area: SheetArea) -> usize {
        0
    }

    /// Number of frozen columns in `area` (only `FixedLeft` is asked).
    fn fixed_column_count(&self, _area: SheetArea) -> usize {
        0
    }

    fn fixed_row_height(&self, _index: usize, _area: SheetArea) -> Option<f64> {
        None
    }

    fn fixed_column_width(&self, _index: usize, _area: SheetArea) -> Option<f64> {
        None
    }

    /// Produce the cell for `index` in `area`.
    ///
    /// Returning `None` puts an [`EmptyCell`](crate::cell::EmptyCell)
    /// placeholder in its place.
    fn cell_for(
        &mut self,
        _index: CellIndex,
        _area: SheetArea,
        _cells: &mut CellRegistry,
    ) -> Option<CellHandle> {
        None
    }

    /// Produce an editor for the content cell at `index`.
    fn editor_for(&mut self, _index: CellIndex, _cells: &mut CellRegistry) -> Option<CellHandle> {
        None
    }

    /// Pool capacity for `identifier`; `None` uses
    /// [`SheetConfig::default_reuse_capacity`](crate::SheetConfig::default_reuse_capacity).
    fn reuse_capacity(&self, _identifier: &str) -> Option<usize> {
        None
    }
}
