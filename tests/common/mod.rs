//! Common test utilities for sheet integration tests.
//!
//! `GridProvider` serves a configurable grid and records every cell the
//! sheet asks it for, so tests can assert exactly which cells were acquired.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::cell::RefCell;
use std::rc::Rc;

use sheetview::{
    CellHandle, CellIndex, CellRegistry, DataProvider, HeaderCell, SheetArea, SheetConfig,
    SheetView, Size, TextCell,
};

/// Shared log of `(area, index)` pairs the provider produced cells for.
pub type CallLog = Rc<RefCell<Vec<(SheetArea, CellIndex)>>>;

#[derive(Debug, Clone)]
pub struct GridProvider {
    pub columns: usize,
    pub rows: usize,
    pub column_widths: Vec<f64>,
    pub row_heights: Vec<f64>,
    pub fixed_top: usize,
    pub fixed_left: usize,
    /// Rows whose editor request is refused
    pub read_only_rows: Vec<isize>,
    pub calls: CallLog,
}

impl GridProvider {
    /// A grid using the configured default sizes.
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            column_widths: Vec::new(),
            row_heights: Vec::new(),
            fixed_top: 0,
            fixed_left: 0,
            read_only_rows: Vec::new(),
            calls: Rc::default(),
        }
    }

    pub fn with_fixed(mut self, top: usize, left: usize) -> Self {
        self.fixed_top = top;
        self.fixed_left = left;
        self
    }

    pub fn with_column_widths(mut self, widths: &[f64]) -> Self {
        self.column_widths = widths.to_vec();
        self
    }

    pub fn with_row_heights(mut self, heights: &[f64]) -> Self {
        self.row_heights = heights.to_vec();
        self
    }
}

pub fn label(index: CellIndex) -> String {
    format!("r{}c{}", index.row, index.col)
}

impl DataProvider for GridProvider {
    fn column_count(&self) -> usize {
        self.columns
    }

    fn row_count(&self) -> usize {
        self.rows
    }

    fn column_width(&self, index: usize) -> Option<f64> {
        self.column_widths.get(index).copied()
    }

    fn row_height(&self, index: usize) -> Option<f64> {
        self.row_heights.get(index).copied()
    }

    fn fixed_row_count(&self, area: SheetArea) -> usize {
        match area {
            SheetArea::FixedTop => self.fixed_top,
            _ => 0,
        }
    }

    fn fixed_column_count(&self, area: SheetArea) -> usize {
        match area {
            SheetArea::FixedLeft => self.fixed_left,
            _ => 0,
        }
    }

    fn cell_for(
        &mut self,
        index: CellIndex,
        area: SheetArea,
        cells: &mut CellRegistry,
    ) -> Option<CellHandle> {
        self.calls.borrow_mut().push((area, index));
        match area {
            SheetArea::Content => {
                let mut cell = cells.dequeue("text").ok()?;
                cell.downcast_mut::<TextCell>()?.text = label(index);
                Some(cell)
            }
            SheetArea::FixedTop | SheetArea::FixedLeft => {
                let mut cell = cells.dequeue("header").ok()?;
                cell.downcast_mut::<HeaderCell>()?.title = label(index);
                Some(cell)
            }
        }
    }

    fn editor_for(&mut self, index: CellIndex, cells: &mut CellRegistry) -> Option<CellHandle> {
        if self.read_only_rows.contains(&index.row) {
            return None;
        }
        let mut editor = cells.dequeue("text").ok()?;
        editor.downcast_mut::<TextCell>()?.text = label(index);
        Some(editor)
    }
}

/// Default config with the given overscan.
pub fn config(overscan: usize) -> SheetConfig {
    SheetConfig {
        overscan,
        ..SheetConfig::default()
    }
}

/// Build, register the bundled kinds, size and load a sheet.
pub fn loaded_sheet(provider: GridProvider, bounds: Size, config: SheetConfig) -> SheetView<GridProvider> {
    let mut sheet = SheetView::new(provider, config);
    sheet
        .register("text", || Box::new(TextCell::default()))
        .unwrap();
    sheet
        .register("header", || Box::new(HeaderCell::default()))
        .unwrap();
    sheet.set_bounds(bounds);
    sheet.reload_data();
    sheet
}

/// Check that a region's live cells exactly cover its range, each keyed by
/// its own index and framed by the geometry tables.
pub fn assert_region_consistent(sheet: &SheetView<GridProvider>, area: SheetArea) {
    let region = sheet.region(area);
    let range = region.range();
    assert_eq!(
        region.len(),
        range.area(),
        "{area:?}: {} live cells for range {range:?}",
        region.len()
    );
    for index in region.visible_indices() {
        assert!(range.contains(&index), "{area:?}: {index:?} outside {range:?}");
        let cell = region.cell(&index).unwrap();
        assert_eq!(cell.index(), index);
        let col = region.columns().get(index.col_usize().unwrap()).unwrap();
        let row = region.rows().get(index.row_usize().unwrap()).unwrap();
        assert_eq!(cell.frame().x, col.offset, "{area:?}: {index:?} x");
        assert_eq!(cell.frame().width, col.size, "{area:?}: {index:?} width");
        assert_eq!(cell.frame().y, row.offset, "{area:?}: {index:?} y");
        assert_eq!(cell.frame().height, row.size, "{area:?}: {index:?} height");
    }
}

/// Drain the provider call log.
pub fn take_calls(sheet: &SheetView<GridProvider>) -> Vec<(SheetArea, CellIndex)> {
    sheet.provider().calls.borrow_mut().drain(..).collect()
}
