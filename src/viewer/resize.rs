//! Column/row resizing for `SheetView`.
//!
//! Includes the direct `set_column_width`/`set_row_height` setters and the
//! interactive begin/update/end session with its indicator frame.

use std::rc::Rc;

use super::region::CellBroker;
use super::{DataProvider, ScrollRegion, SheetView};
use crate::layout::{AxisDefinition, GeometryTable};
use crate::types::{Axis, Point, Rect, SheetArea};

/// An interactive resize in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeSession {
    pub axis: Axis,
    pub index: isize,
    /// Size the entry will get when the session ends
    pub size: f64,
    /// Indicator frame in sheet coordinates
    pub indicator: Rect,
}

impl<P: DataProvider> SheetView<P> {
    /// Set the width of content column `index`.
    ///
    /// Offsets of later columns are re-derived and cells at or right of the
    /// column are re-acquired in the content and frozen-top regions. Returns
    /// `false` (no-op) for an invalid index, a non-positive width or an
    /// unchanged width.
    pub fn set_column_width(&mut self, index: isize, width: f64) -> bool {
        self.resize_entry(Axis::Horizontal, index, width)
    }

    /// Set the height of content row `index`. See [`set_column_width`](Self::set_column_width).
    pub fn set_row_height(&mut self, index: isize, height: f64) -> bool {
        self.resize_entry(Axis::Vertical, index, height)
    }

    fn resize_entry(&mut self, axis: Axis, index: isize, size: f64) -> bool {
        let Ok(position) = usize::try_from(index) else {
            return false;
        };
        let table = match axis {
            Axis::Horizontal => &mut self.columns,
            Axis::Vertical => &mut self.rows,
        };
        let Some(current) = table.get(position).map(|def| def.size) else {
            return false;
        };
        if !(size.is_finite() && size > 0.0) || (current - size).abs() <= f64::EPSILON {
            return false;
        }
        Rc::make_mut(table).resize(position, size);
        self.push_geometry();

        let sibling = match axis {
            Axis::Horizontal => SheetArea::FixedTop,
            Axis::Vertical => SheetArea::FixedLeft,
        };
        let mut reacquired = 0;
        self.settle_regions(|region, broker| {
            if region.area() == SheetArea::Content || region.area() == sibling {
                reacquired += relayout_from(region, axis, position, broker);
            }
        });
        self.refresh_resize_indicator();
        tracing::debug!(
            target: "sheetview::resize",
            ?axis,
            index,
            from = current,
            to = size,
            reacquired,
            "entry resized"
        );
        true
    }

    // ===== interactive sessions =====

    /// Start resizing content column `index`, ending any running session.
    pub fn begin_resizing_column(&mut self, index: isize) {
        self.begin_resizing(Axis::Horizontal, index);
    }

    /// Start resizing content row `index`, ending any running session.
    pub fn begin_resizing_row(&mut self, index: isize) {
        self.begin_resizing(Axis::Vertical, index);
    }

    fn begin_resizing(&mut self, axis: Axis, index: isize) {
        let Some(size) = entry(self.table(axis), index).map(|def| def.size) else {
            return;
        };
        self.end_resizing();
        let indicator = self.indicator_frame(axis, index, size);
        self.resizing = Some(ResizeSession {
            axis,
            index,
            size,
            indicator,
        });
        tracing::debug!(target: "sheetview::resize", ?axis, index, size, "resizing began");
    }

    /// Move the pending size of the running session.
    ///
    /// Ignored without a session, for a different index, or for a size that
    /// is not strictly positive.
    pub fn update_resizing(&mut self, index: isize, size: f64) {
        let Some(session) = self.resizing else {
            return;
        };
        if session.index != index || !(size.is_finite() && size > 0.0) {
            return;
        }
        let indicator = self.indicator_frame(session.axis, index, size);
        self.resizing = Some(ResizeSession {
            size,
            indicator,
            ..session
        });
    }

    /// Finish the running session.
    ///
    /// The resize callback sees the final size first; if it does not handle
    /// it, the sheet applies the size itself.
    pub fn end_resizing(&mut self) {
        let Some(session) = self.resizing.take() else {
            return;
        };
        let handled = self
            .resize_handlers
            .did_end_resizing
            .as_mut()
            .is_some_and(|handler| handler(session.axis, session.index, session.size));
        tracing::debug!(
            target: "sheetview::resize",
            axis = ?session.axis,
            index = session.index,
            size = session.size,
            handled,
            "resizing ended"
        );
        if !handled {
            match session.axis {
                Axis::Horizontal => self.set_column_width(session.index, session.size),
                Axis::Vertical => self.set_row_height(session.index, session.size),
            };
        }
    }

    pub fn resize_session(&self) -> Option<ResizeSession> {
        self.resizing
    }

    pub fn resize_indicator(&self) -> Option<Rect> {
        self.resizing.map(|session| session.indicator)
    }

    /// Move the indicator after the content scrolled or the sheet re-laid out.
    pub(crate) fn refresh_resize_indicator(&mut self) {
        if let Some(session) = self.resizing {
            let indicator = self.indicator_frame(session.axis, session.index, session.size);
            self.resizing = Some(ResizeSession {
                indicator,
                ..session
            });
        }
    }

    fn indicator_frame(&mut self, axis: Axis, index: isize, size: f64) -> Rect {
        let start = entry(self.table(axis), index).map_or(0.0, |def| def.offset);
        let content = &self.regions.content;
        let edge = match axis {
            Axis::Horizontal => content.to_sheet(Point::new(start + size, 0.0)).x,
            Axis::Vertical => content.to_sheet(Point::new(0.0, start + size)).y,
        };
        if let Some(frame) = self.resize_handlers.indicator_frame.as_mut() {
            return frame(axis, edge);
        }
        let thickness = self.config.resizer_thickness;
        match axis {
            Axis::Horizontal => Rect::new(edge, 0.0, thickness, self.bounds.height),
            Axis::Vertical => Rect::new(0.0, edge, self.bounds.width, thickness),
        }
    }

    fn table(&self, axis: Axis) -> &GeometryTable {
        match axis {
            Axis::Horizontal => &self.columns,
            Axis::Vertical => &self.rows,
        }
    }
}

fn entry(table: &GeometryTable, index: isize) -> Option<&AxisDefinition> {
    usize::try_from(index).ok().and_then(|i| table.get(i))
}

/// Re-acquire the cells of `region` at or past `position` on `axis`.
///
/// Regions whose range ends before the resized entry only re-clamp.
fn relayout_from<B: CellBroker>(
    region: &mut ScrollRegion,
    axis: Axis,
    position: usize,
    broker: &mut B,
) -> usize {
    let range = region.range();
    let reaches = match axis {
        Axis::Horizontal => range.right_column > position,
        Axis::Vertical => range.bottom_row > position,
    };
    if range.is_empty() || !reaches {
        region.revalidate(broker);
        return 0;
    }
    let first = isize::try_from(position).unwrap_or(isize::MAX);
    match axis {
        Axis::Horizontal => region.relayout(|index| index.col >= first, broker),
        Axis::Vertical => region.relayout(|index| index.row >= first, broker),
    }
}
