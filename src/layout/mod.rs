//! Layout engine for column/row geometry and visible-range resolution.
//!
//! This module handles:
//! - Geometry tables with cumulative offsets, rebuilt on reload and patched on resize
//! - Binary search from a pixel offset to the column/row spanning it
//! - Mapping a viewport to the index window that should be materialized

mod sheet_layout;
mod viewport;

pub use sheet_layout::{AxisDefinition, ColumnDefinition, GeometryTable, RowDefinition};
pub use viewport::{AxisPolicy, Viewport, VisibleRangeResolver};
