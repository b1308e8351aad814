//! Serializable snapshots of what a sheet currently shows.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::cell::{CellState, PoolStats};
use crate::types::{CellIndex, CellRange, Point, Rect, Selection, SheetArea, Size};

/// Presentation data of one live cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellSnapshot {
    pub col: isize,
    pub row: isize,
    pub frame: Rect,
    pub selected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub reuse_identifier: String,
}

impl CellSnapshot {
    /// Snapshot of the engine-managed part of a cell plus optional label text.
    pub fn from_state(state: &CellState, text: Option<String>) -> Self {
        Self {
            col: state.index.col,
            row: state.index.row,
            frame: state.frame,
            selected: !state.selection.is_none(),
            text,
            reuse_identifier: state.reuse_identifier.clone(),
        }
    }
}

/// One scroll region: where it sits, where it is scrolled to, what it holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionSnapshot {
    pub area: SheetArea,
    /// Region frame in sheet coordinates
    pub frame: Rect,
    pub offset: Point,
    pub range: CellRange,
    /// Live cells, ordered by row then column
    pub cells: Vec<CellSnapshot>,
}

/// Whole-sheet snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetSnapshot {
    pub bounds: Size,
    pub selection: Selection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editing: Option<CellIndex>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resize_indicator: Option<Rect>,
    pub regions: Vec<RegionSnapshot>,
    pub pools: BTreeMap<String, PoolStats>,
}

impl SheetSnapshot {
    pub fn region(&self, area: SheetArea) -> Option<&RegionSnapshot> {
        self.regions.iter().find(|r| r.area == area)
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    /// Propagates serializer failures.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
