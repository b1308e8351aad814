//! Cell instances and their reuse pools.
//!
//! The engine only talks to cells through the [`SheetCell`] trait. Concrete
//! kinds carry their own presentation state and refresh it from the hooks
//! the engine calls when a cell is recycled or its selection stamp changes.

mod kinds;
mod pool;

use std::any::Any;
use std::fmt;

pub use kinds::{EmptyCell, HeaderCell, TextCell};
pub use pool::{CellFactory, CellRegistry, PoolStats, ReusePool};

use crate::render::CellSnapshot;
use crate::types::{CellIndex, Rect, Selection};

/// Engine-managed state every cell carries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellState {
    /// Pool this cell returns to when released; empty for unpooled cells
    pub reuse_identifier: String,
    /// Position the cell currently represents, `CellIndex::INVALID` when retired
    pub index: CellIndex,
    /// Selection covering this cell, `Selection::None` if unselected
    pub selection: Selection,
    /// Frame inside the owning region's content coordinates
    pub frame: Rect,
}

/// Capability interface implemented by every cell kind.
pub trait SheetCell: Any + fmt::Debug {
    fn state(&self) -> &CellState;

    fn state_mut(&mut self) -> &mut CellState;

    /// Reset presentation before a (possibly recycled) cell is handed out.
    fn prepare_for_reuse(&mut self) {}

    /// Called after the selection stamp changed.
    fn selection_changed(&mut self) {}

    /// Produce a presentation snapshot of the cell.
    fn render(&self) -> CellSnapshot {
        CellSnapshot::from_state(self.state(), None)
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Owned, type-erased cell.
pub type CellHandle = Box<dyn SheetCell>;

impl<'a> dyn SheetCell + 'a {
    pub fn downcast_ref<T: SheetCell>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: SheetCell>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    pub fn reuse_identifier(&self) -> &str {
        &self.state().reuse_identifier
    }

    pub fn index(&self) -> CellIndex {
        self.state().index
    }

    pub fn selection(&self) -> &Selection {
        &self.state().selection
    }

    pub fn is_selected(&self) -> bool {
        !self.state().selection.is_none()
    }

    pub fn frame(&self) -> Rect {
        self.state().frame
    }

    /// Replace the selection stamp, notifying the cell only on change.
    pub(crate) fn stamp_selection(&mut self, selection: &Selection) {
        if self.state().selection != *selection {
            self.state_mut().selection = selection.clone();
            self.selection_changed();
        }
    }

    /// Clear transient state before the cell goes back to its pool.
    pub(crate) fn retire(&mut self) {
        self.stamp_selection(&Selection::None);
        self.state_mut().index = CellIndex::INVALID;
    }
}
