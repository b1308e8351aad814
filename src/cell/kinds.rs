//! Bundled cell kinds.

use std::any::Any;

use super::{CellState, SheetCell};
use crate::render::CellSnapshot;

/// Placeholder used when the data provider yields no cell.
#[derive(Debug, Clone, Default)]
pub struct EmptyCell {
    state: CellState,
}

impl SheetCell for EmptyCell {
    fn state(&self) -> &CellState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut CellState {
        &mut self.state
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A single text label with separate normal/selected backgrounds.
#[derive(Debug, Clone)]
pub struct TextCell {
    state: CellState,
    pub text: String,
    pub normal_background: String,
    pub selected_background: String,
    background: String,
}

impl Default for TextCell {
    fn default() -> Self {
        let normal = "#FFFFFF".to_string();
        Self {
            state: CellState::default(),
            text: String::new(),
            background: normal.clone(),
            normal_background: normal,
            selected_background: "#CFD8E8".to_string(),
        }
    }
}

impl TextCell {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Background currently applied, following the selection stamp.
    pub fn background(&self) -> &str {
        &self.background
    }

    fn refresh_colors(&mut self) {
        self.background = if self.state.selection.is_none() {
            self.normal_background.clone()
        } else {
            self.selected_background.clone()
        };
    }
}

impl SheetCell for TextCell {
    fn state(&self) -> &CellState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut CellState {
        &mut self.state
    }

    fn prepare_for_reuse(&mut self) {
        self.text.clear();
        self.refresh_colors();
    }

    fn selection_changed(&mut self) {
        self.refresh_colors();
    }

    fn render(&self) -> CellSnapshot {
        CellSnapshot::from_state(&self.state, Some(self.text.clone()))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Bold title for frozen header rows and columns.
#[derive(Debug, Clone, Default)]
pub struct HeaderCell {
    state: CellState,
    pub title: String,
    highlighted: bool,
}

impl HeaderCell {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Whether the header is drawn in its selected style.
    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }
}

impl SheetCell for HeaderCell {
    fn state(&self) -> &CellState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut CellState {
        &mut self.state
    }

    fn prepare_for_reuse(&mut self) {
        self.title.clear();
        self.highlighted = false;
    }

    fn selection_changed(&mut self) {
        self.highlighted = !self.state.selection.is_none();
    }

    fn render(&self) -> CellSnapshot {
        CellSnapshot::from_state(&self.state, Some(self.title.clone()))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
