//! Presentation output of the engine.
//!
//! This module provides:
//! - Selection bounding geometry used for scroll-into-view
//! - Serializable snapshots of regions and their live cells

pub mod selection;
pub mod snapshot;

pub use selection::SelectionBounds;
pub use snapshot::{CellSnapshot, RegionSnapshot, SheetSnapshot};
