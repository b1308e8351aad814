//! Event callbacks and tap handling for `SheetView`.
//!
//! Callbacks are optional boxed closures. An unset callback takes its
//! default: notifications are dropped and `should_select_*` answers `true`.

use std::fmt;

use super::{DataProvider, SheetView};
use crate::cell::CellHandle;
use crate::types::{Axis, CellIndex, Point, Rect, Selection, SelectionMode, SheetArea};

type Handler<A> = Option<Box<dyn FnMut(A)>>;
type Predicate<A> = Option<Box<dyn FnMut(A) -> bool>>;

/// Notifications and veto points of a sheet.
#[derive(Default)]
pub struct SheetEvents {
    /// A content cell was tapped.
    pub did_touch_cell: Handler<CellIndex>,
    /// A frozen cell was tapped.
    pub did_touch_fixed_cell: Option<Box<dyn FnMut(CellIndex, SheetArea)>>,
    pub should_select_cell: Predicate<CellIndex>,
    pub should_select_column: Predicate<isize>,
    pub should_select_row: Predicate<isize>,
    /// Called with `(new, previous)` after the sheet selection changed.
    pub selection_changed: Option<Box<dyn FnMut(&Selection, &Selection)>>,
    /// Receives the editor when an editing session ends.
    pub did_end_editing: Option<Box<dyn FnMut(CellIndex, CellHandle)>>,
}

impl SheetEvents {
    pub(crate) fn touch_cell(&mut self, index: CellIndex) {
        if let Some(handler) = self.did_touch_cell.as_mut() {
            handler(index);
        }
    }

    pub(crate) fn touch_fixed_cell(&mut self, index: CellIndex, area: SheetArea) {
        if let Some(handler) = self.did_touch_fixed_cell.as_mut() {
            handler(index, area);
        }
    }

    pub(crate) fn should_select_cell(&mut self, index: CellIndex) -> bool {
        self.should_select_cell.as_mut().map_or(true, |f| f(index))
    }

    pub(crate) fn should_select_column(&mut self, col: isize) -> bool {
        self.should_select_column.as_mut().map_or(true, |f| f(col))
    }

    pub(crate) fn should_select_row(&mut self, row: isize) -> bool {
        self.should_select_row.as_mut().map_or(true, |f| f(row))
    }

    pub(crate) fn selection_changed(&mut self, selection: &Selection, previous: &Selection) {
        if let Some(handler) = self.selection_changed.as_mut() {
            handler(selection, previous);
        }
    }

    /// Hand the editor over; gives it back when nobody listens.
    pub(crate) fn end_editing(&mut self, index: CellIndex, editor: CellHandle) -> Option<CellHandle> {
        match self.did_end_editing.as_mut() {
            Some(handler) => {
                handler(index, editor);
                None
            }
            None => Some(editor),
        }
    }
}

impl fmt::Debug for SheetEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetEvents")
            .field("did_touch_cell", &self.did_touch_cell.is_some())
            .field("did_touch_fixed_cell", &self.did_touch_fixed_cell.is_some())
            .field("should_select_cell", &self.should_select_cell.is_some())
            .field("should_select_column", &self.should_select_column.is_some())
            .field("should_select_row", &self.should_select_row.is_some())
            .field("selection_changed", &self.selection_changed.is_some())
            .field("did_end_editing", &self.did_end_editing.is_some())
            .finish()
    }
}

/// Optional hooks for column/row resizing sessions.
#[derive(Default)]
pub struct ResizeHandlers {
    /// Indicator frame (sheet coordinates) for an edge at the given offset
    /// along `axis`. Unset: a thin line across the sheet.
    pub indicator_frame: Option<Box<dyn FnMut(Axis, f64) -> Rect>>,
    /// Called with `(axis, index, size)` when a session ends. Return `true`
    /// if the new size was handled; otherwise the sheet applies it itself.
    pub did_end_resizing: Option<Box<dyn FnMut(Axis, isize, f64) -> bool>>,
}

impl fmt::Debug for ResizeHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResizeHandlers")
            .field("indicator_frame", &self.indicator_frame.is_some())
            .field("did_end_resizing", &self.did_end_resizing.is_some())
            .finish()
    }
}

/// What a tap landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Cell { area: SheetArea, index: CellIndex },
    /// The frozen corner or an empty part of a region
    None,
}

impl<P: DataProvider> SheetView<P> {
    /// Find the live cell under `point` (sheet coordinates).
    pub fn hit_test(&self, point: Point) -> HitTarget {
        for area in SheetArea::ALL {
            let region = self.regions.get(area);
            if !region.frame().contains(point) {
                continue;
            }
            return match region.hit_test(region.to_content(point)) {
                Some(index) => HitTarget::Cell { area, index },
                None => HitTarget::None,
            };
        }
        HitTarget::None
    }

    /// Handle a tap at `point` in sheet coordinates.
    pub fn tap(&mut self, point: Point) -> HitTarget {
        let target = self.hit_test(point);
        if let HitTarget::Cell { area, index } = target {
            self.handle_tap(area, index);
        }
        target
    }

    /// Handle a tap at `point` in the content coordinates of `area`.
    pub fn tap_in(&mut self, area: SheetArea, point: Point) -> HitTarget {
        match self.regions.get(area).hit_test(point) {
            Some(index) => {
                self.handle_tap(area, index);
                HitTarget::Cell { area, index }
            }
            None => HitTarget::None,
        }
    }

    fn handle_tap(&mut self, area: SheetArea, index: CellIndex) {
        tracing::debug!(target: "sheetview::selection", ?area, ?index, "tap");
        let selection = match area {
            SheetArea::Content => {
                self.events.touch_cell(index);
                (self.allowed_modes.contains(&SelectionMode::Cell)
                    && self.events.should_select_cell(index))
                .then(|| Selection::single_cell(index))
            }
            SheetArea::FixedTop => {
                self.events.touch_fixed_cell(index, area);
                (self.allowed_modes.contains(&SelectionMode::Column)
                    && self.events.should_select_column(index.col))
                .then(|| Selection::single_column(index.col))
            }
            SheetArea::FixedLeft => {
                self.events.touch_fixed_cell(index, area);
                (self.allowed_modes.contains(&SelectionMode::Row)
                    && self.events.should_select_row(index.row))
                .then(|| Selection::single_row(index.row))
            }
        };
        if let Some(selection) = selection {
            self.set_selection(selection, true);
        }
    }
}
