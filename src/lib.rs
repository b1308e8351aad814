//! sheetview - virtualized spreadsheet grid engine
//!
//! Presents a large logical table by materializing only the cells inside
//! the visible window of each scroll region:
//! - Binary-searched column/row geometry with cumulative offsets
//! - Diff-based cell lifecycle: only cells entering or leaving are touched
//! - Bounded per-identifier reuse pools for retired cells
//! - Frozen header rows/columns kept in sync with the content area
//! - Layered selection (cells, rows, columns, ranges) stamped onto live cells
//!
//! # Usage
//!
//! ```no_run
//! use sheetview::{DataProvider, SheetConfig, SheetView, Size, TextCell};
//!
//! struct Numbers;
//!
//! impl DataProvider for Numbers {
//!     fn column_count(&self) -> usize {
//!         1_000
//!     }
//!     fn row_count(&self) -> usize {
//!         100_000
//!     }
//! }
//!
//! let mut sheet = SheetView::new(Numbers, SheetConfig::default());
//! sheet.set_bounds(Size::new(800.0, 600.0));
//! sheet.register("text", || Box::new(TextCell::default())).ok();
//! sheet.reload_data();
//! sheet.scroll_by(0.0, 45_000.0);
//! ```

pub mod cell;
pub mod config;
pub mod error;
pub mod layout;
pub mod render;
pub mod types;
pub mod viewer;

pub use cell::{CellHandle, CellRegistry, CellState, EmptyCell, HeaderCell, SheetCell, TextCell};
pub use config::SheetConfig;
pub use error::{Result, SheetError};
pub use layout::{GeometryTable, Viewport};
pub use render::{CellSnapshot, RegionSnapshot, SheetSnapshot};
pub use viewer::{
    DataProvider, HitTarget, ResizeHandlers, ResizeSession, ScrollRegion, SheetEvents, SheetView,
};

pub use types::*;
