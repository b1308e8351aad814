//! Engine configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Tunables for a [`SheetView`](crate::viewer::SheetView).
///
/// Every field has a default, so a partial JSON document is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// Column width used when the data provider supplies none
    pub default_column_width: f64,
    /// Row height used when the data provider supplies none
    pub default_row_height: f64,
    /// Lower bound for reuse pool capacity when the provider does not override it
    pub min_reuse_capacity: usize,
    /// Padding units added around the visible window
    pub overscan: usize,
    /// Margin kept around a selection scrolled into view
    pub selection_padding: f64,
    /// Thickness of the default resize indicator
    pub resizer_thickness: f64,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            default_column_width: 100.0,
            default_row_height: 45.0,
            min_reuse_capacity: 100,
            overscan: 1,
            selection_padding: 16.0,
            resizer_thickness: 1.0,
        }
    }
}

impl SheetConfig {
    /// Parse a JSON configuration document.
    ///
    /// # Errors
    /// Returns [`SheetError::Config`](crate::SheetError::Config) on malformed JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON configuration file.
    ///
    /// # Errors
    /// Returns an I/O or parse error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Default pool capacity for a viewport of the given width:
    /// `max(width / default_column_width, min_reuse_capacity)`.
    pub fn default_reuse_capacity(&self, viewport_width: f64) -> usize {
        let per_screen = if self.default_column_width > 0.0 && viewport_width.is_finite() {
            (viewport_width / self.default_column_width).floor().max(0.0)
        } else {
            0.0
        };
        // Saturating float -> int conversion.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let per_screen = per_screen as usize;
        per_screen.max(self.min_reuse_capacity)
    }
}
