//! The sheet facade.
//!
//! `SheetView` is the entry point of the engine. It handles:
//! - Building geometry tables from the data provider and sharing them with regions
//! - Laying out the content, frozen-top and frozen-left regions inside its bounds
//! - Keeping the sheet selection and stamping it into each region
//! - Owning the reuse pools and brokering provider calls for the regions
//!
//! Scrolling, tapping, resizing and editing live in the submodules and all
//! extend `SheetView` directly.

mod edit;
mod events;
mod provider;
mod region;
mod resize;
mod scroll;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::rc::Rc;

pub use events::{HitTarget, ResizeHandlers, SheetEvents};
pub use provider::DataProvider;
pub use region::ScrollRegion;
pub use resize::ResizeSession;
pub use scroll::{ScrollCoordinator, SyncTarget};

use edit::EditSession;
use region::{CellBroker, Regions};

use crate::cell::{CellHandle, CellRegistry, EmptyCell, PoolStats};
use crate::config::SheetConfig;
use crate::error::Result;
use crate::layout::GeometryTable;
use crate::render::{SelectionBounds, SheetSnapshot};
use crate::types::{CellIndex, Rect, Selection, SelectionMode, SheetArea, Size};

/// Provider plus pools, lent to a region while it acquires and releases cells.
struct Broker<'a, P> {
    provider: &'a mut P,
    cells: &'a mut CellRegistry,
}

impl<P: DataProvider> CellBroker for Broker<'_, P> {
    fn cell_for(&mut self, index: CellIndex, area: SheetArea) -> CellHandle {
        let mut cell: CellHandle = match self.provider.cell_for(index, area, self.cells) {
            Some(cell) => cell,
            None => {
                tracing::trace!(target: "sheetview::lifecycle", ?area, ?index, "no cell from provider, using placeholder");
                Box::new(EmptyCell::default())
            }
        };
        cell.state_mut().index = index;
        cell
    }

    fn release_cell(&mut self, mut cell: CellHandle) {
        cell.retire();
        self.cells.recycle(cell);
    }
}

/// A virtualized grid over a [`DataProvider`].
///
/// Typical setup: create, set bounds, register reuse identifiers, then
/// [`reload_data`](Self::reload_data).
pub struct SheetView<P: DataProvider> {
    provider: P,
    config: SheetConfig,
    cells: CellRegistry,
    regions: Regions,
    columns: Rc<GeometryTable>,
    rows: Rc<GeometryTable>,
    fixed_top_rows: Rc<GeometryTable>,
    fixed_left_columns: Rc<GeometryTable>,
    bounds: Size,
    selection: Selection,
    allowed_modes: BTreeSet<SelectionMode>,
    scroll: ScrollCoordinator,
    events: SheetEvents,
    resize_handlers: ResizeHandlers,
    editing: Option<EditSession>,
    resizing: Option<ResizeSession>,
}

impl<P: DataProvider> SheetView<P> {
    pub fn new(provider: P, config: SheetConfig) -> Self {
        let regions = Regions::new(config.overscan);
        Self {
            provider,
            config,
            cells: CellRegistry::new(),
            regions,
            columns: Rc::new(GeometryTable::default()),
            rows: Rc::new(GeometryTable::default()),
            fixed_top_rows: Rc::new(GeometryTable::default()),
            fixed_left_columns: Rc::new(GeometryTable::default()),
            bounds: Size::ZERO,
            selection: Selection::None,
            allowed_modes: SelectionMode::all(),
            scroll: ScrollCoordinator::new(),
            events: SheetEvents::default(),
            resize_handlers: ResizeHandlers::default(),
            editing: None,
            resizing: None,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Mutable access to the provider. Call [`reload_data`](Self::reload_data)
    /// or [`reload_cells_at`](Self::reload_cells_at) after changing what it serves.
    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    pub fn set_events(&mut self, events: SheetEvents) {
        self.events = events;
    }

    pub fn events_mut(&mut self) -> &mut SheetEvents {
        &mut self.events
    }

    pub fn set_resize_handlers(&mut self, handlers: ResizeHandlers) {
        self.resize_handlers = handlers;
    }

    /// Selection kinds a tap may produce. Programmatic selection is not gated.
    pub fn allowed_selection_modes(&self) -> &BTreeSet<SelectionMode> {
        &self.allowed_modes
    }

    pub fn set_allowed_selection_modes(&mut self, modes: BTreeSet<SelectionMode>) {
        self.allowed_modes = modes;
    }

    pub fn region(&self, area: SheetArea) -> &ScrollRegion {
        self.regions.get(area)
    }

    pub fn columns(&self) -> &GeometryTable {
        &self.columns
    }

    pub fn rows(&self) -> &GeometryTable {
        &self.rows
    }

    pub fn fixed_top_rows(&self) -> &GeometryTable {
        &self.fixed_top_rows
    }

    pub fn fixed_left_columns(&self) -> &GeometryTable {
        &self.fixed_left_columns
    }

    // ===== bounds =====

    pub fn bounds(&self) -> Size {
        self.bounds
    }

    /// Resize the sheet, re-lay out the regions and re-resolve their ranges.
    pub fn set_bounds(&mut self, bounds: Size) {
        if bounds == self.bounds {
            return;
        }
        self.bounds = bounds;
        self.layout_regions();

        self.settle_regions(|region, broker| region.revalidate(broker));
        self.refresh_resize_indicator();
        tracing::debug!(
            target: "sheetview::lifecycle",
            width = bounds.width,
            height = bounds.height,
            "bounds changed"
        );
    }

    /// Frozen-left strip under the frozen-top strip, content in the remainder.
    fn layout_regions(&mut self) {
        let top_height = self.fixed_top_rows.total_extent().min(self.bounds.height);
        let left_width = self.fixed_left_columns.total_extent().min(self.bounds.width);
        let width = (self.bounds.width - left_width).max(0.0);
        let height = (self.bounds.height - top_height).max(0.0);

        self.regions
            .top
            .set_frame(Rect::new(left_width, 0.0, width, top_height));
        self.regions
            .left
            .set_frame(Rect::new(0.0, top_height, left_width, height));
        self.regions
            .content
            .set_frame(Rect::new(left_width, top_height, width, height));
    }

    // ===== reuse pools =====

    /// Create the reuse pool for `identifier`.
    ///
    /// Capacity comes from [`DataProvider::reuse_capacity`], or
    /// [`SheetConfig::default_reuse_capacity`] over the current bounds width.
    ///
    /// # Errors
    /// [`SheetError::DuplicateReuseIdentifier`](crate::SheetError::DuplicateReuseIdentifier)
    /// if the identifier is already registered.
    pub fn register(
        &mut self,
        identifier: &str,
        factory: impl Fn() -> CellHandle + 'static,
    ) -> Result<()> {
        let capacity = self
            .provider
            .reuse_capacity(identifier)
            .unwrap_or_else(|| self.config.default_reuse_capacity(self.bounds.width));
        self.cells.register(identifier, capacity, factory)
    }

    /// Like [`register`](Self::register) with an explicit capacity.
    ///
    /// # Errors
    /// See [`register`](Self::register).
    pub fn register_with(
        &mut self,
        identifier: &str,
        capacity: usize,
        factory: impl Fn() -> CellHandle + 'static,
    ) -> Result<()> {
        self.cells.register(identifier, capacity, factory)
    }

    /// Pop a pooled cell (or build one) for `identifier`, reset for reuse.
    ///
    /// # Errors
    /// [`SheetError::UnregisteredReuseIdentifier`](crate::SheetError::UnregisteredReuseIdentifier)
    /// if the identifier was never registered.
    pub fn dequeue_reusable_cell(&mut self, identifier: &str) -> Result<CellHandle> {
        self.cells.dequeue(identifier)
    }

    pub fn pool_stats(&self) -> BTreeMap<String, PoolStats> {
        self.cells.stats()
    }

    // ===== reloads =====

    /// Rebuild every geometry table from the provider and reload all regions.
    pub fn reload_data(&mut self) {
        let provider = &self.provider;
        let config = &self.config;
        let columns = GeometryTable::build(
            provider.column_count(),
            config.default_column_width,
            |i| provider.column_width(i),
        );
        let rows = GeometryTable::build(provider.row_count(), config.default_row_height, |i| {
            provider.row_height(i)
        });
        let fixed_top_rows = GeometryTable::build(
            provider.fixed_row_count(SheetArea::FixedTop),
            config.default_row_height,
            |i| provider.fixed_row_height(i, SheetArea::FixedTop),
        );
        let fixed_left_columns = GeometryTable::build(
            provider.fixed_column_count(SheetArea::FixedLeft),
            config.default_column_width,
            |i| provider.fixed_column_width(i, SheetArea::FixedLeft),
        );

        self.columns = Rc::new(columns);
        self.rows = Rc::new(rows);
        self.fixed_top_rows = Rc::new(fixed_top_rows);
        self.fixed_left_columns = Rc::new(fixed_left_columns);
        self.push_geometry();
        self.layout_regions();

        self.settle_regions(|region, broker| region.reload(broker));

        tracing::debug!(
            target: "sheetview::lifecycle",
            columns = self.columns.len(),
            rows = self.rows.len(),
            fixed_top = self.fixed_top_rows.len(),
            fixed_left = self.fixed_left_columns.len(),
            "data reloaded"
        );
    }

    /// Refresh specific content cells in place.
    pub fn reload_cells_at(&mut self, indices: &[CellIndex]) {
        let mut broker = Broker {
            provider: &mut self.provider,
            cells: &mut self.cells,
        };
        let reloaded = self.regions.content.reload_cells_at(indices, &mut broker);
        tracing::debug!(target: "sheetview::lifecycle", requested = indices.len(), reloaded, "cells reloaded");
    }

    pub fn reload_cell_at(&mut self, index: CellIndex) {
        self.reload_cells_at(&[index]);
    }

    /// Hand the current geometry tables to the regions that read them.
    fn push_geometry(&mut self) {
        self.regions
            .content
            .set_geometry(Rc::clone(&self.columns), Rc::clone(&self.rows));
        self.regions
            .top
            .set_geometry(Rc::clone(&self.columns), Rc::clone(&self.fixed_top_rows));
        self.regions
            .left
            .set_geometry(Rc::clone(&self.fixed_left_columns), Rc::clone(&self.rows));
    }

    // ===== selection =====

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Replace the sheet selection.
    ///
    /// An unchanged selection is a no-op and leaves an active edit open.
    /// Otherwise the edit ends, frozen regions show the selection only when
    /// they support it and clear themselves otherwise, and the content area
    /// is scrolled so the selection becomes visible.
    pub fn set_selection(&mut self, selection: Selection, animated: bool) {
        if selection == self.selection {
            return;
        }
        self.end_edit_cell();

        for area in [SheetArea::FixedTop, SheetArea::FixedLeft] {
            let region = self.regions.get_mut(area);
            if region.is_selection_supported(&selection) {
                region.apply_selection(&selection);
            } else {
                region.clear_selection();
            }
        }
        let stamped = self.regions.content.apply_selection(&selection);

        let previous = std::mem::replace(&mut self.selection, selection);
        tracing::debug!(
            target: "sheetview::selection",
            selection = ?self.selection,
            ?previous,
            stamped,
            animated,
            "selection changed"
        );
        self.events.selection_changed(&self.selection, &previous);
        self.scroll_to_current_selection(animated);
    }

    /// Scroll the content so `selection`'s bounding box is visible.
    ///
    /// Column selections only scroll horizontally and row selections only
    /// vertically. A box larger than the viewport shows its top-left corner.
    pub fn scroll_to_selection(&mut self, selection: &Selection, animated: bool) {
        let Some(bounds) = SelectionBounds::of(selection, &self.columns, &self.rows) else {
            return;
        };
        let content = &self.regions.content;
        let rect = bounds.to_rect(
            content.viewport().visible_rect(),
            self.config.selection_padding,
        );
        let Some(offset) = content.scroll_rect_to_visible(rect) else {
            return;
        };
        tracing::debug!(target: "sheetview::scroll", x = offset.x, y = offset.y, animated, "scroll to selection");
        self.scroll(SheetArea::Content, offset);
    }

    pub fn scroll_to_current_selection(&mut self, animated: bool) {
        let selection = self.selection.clone();
        self.scroll_to_selection(&selection, animated);
    }

    // ===== indices =====

    /// Content index for `(col, row)` with its flat position filled in.
    pub fn make_index(&self, col: isize, row: isize) -> CellIndex {
        CellIndex::with_column_count(col, row, self.columns.len())
    }

    /// True if `index` addresses a content cell and its flat position agrees
    /// with the current column count.
    pub fn is_valid(&self, index: CellIndex) -> bool {
        self.is_valid_column(index.col)
            && self.is_valid_row(index.row)
            && self.make_index(index.col, index.row).flat == index.flat
    }

    pub fn is_valid_column(&self, col: isize) -> bool {
        self.columns.is_valid(col)
    }

    pub fn is_valid_row(&self, row: isize) -> bool {
        self.rows.is_valid(row)
    }

    /// Frame a content cell has in content coordinates; zero for invalid indices.
    pub fn frame_for(&self, index: CellIndex) -> Rect {
        if !self.is_valid(index) {
            return Rect::ZERO;
        }
        let column = index.col_usize().and_then(|c| self.columns.get(c));
        let row = index.row_usize().and_then(|r| self.rows.get(r));
        match (column, row) {
            (Some(column), Some(row)) => Rect::new(column.offset, row.offset, column.size, row.size),
            _ => Rect::ZERO,
        }
    }

    // ===== snapshots =====

    pub fn snapshot(&self) -> SheetSnapshot {
        SheetSnapshot {
            bounds: self.bounds,
            selection: self.selection.clone(),
            editing: self.editing_index(),
            resize_indicator: self.resize_indicator(),
            regions: self.regions.iter().map(ScrollRegion::snapshot).collect(),
            pools: self.cells.stats(),
        }
    }
}

impl<P: DataProvider> fmt::Debug for SheetView<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetView")
            .field("bounds", &self.bounds)
            .field("columns", &self.columns.len())
            .field("rows", &self.rows.len())
            .field("selection", &self.selection)
            .field("regions", &self.regions)
            .field("cells", &self.cells)
            .finish_non_exhaustive()
    }
}
