//! Scroll synchronization between regions.
//!
//! Content and frozen-top share the horizontal offset; content and
//! frozen-left share the vertical one. The frozen regions never talk to each
//! other directly.

use super::{Broker, DataProvider, ScrollRegion, SheetView};
use crate::types::{Axis, Point, SheetArea};

/// One offset write the coordinator asks for after a region moved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncTarget {
    pub area: SheetArea,
    pub axis: Axis,
    pub value: f64,
}

/// Decides which sibling regions follow a scrolled region.
#[derive(Debug, Default)]
pub struct ScrollCoordinator {
    suppressed: bool,
}

impl ScrollCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    /// Stop propagation (bulk reload, bounds change or resize). Returns the
    /// previous state for [`restore`](Self::restore).
    pub fn suppress(&mut self) -> bool {
        std::mem::replace(&mut self.suppressed, true)
    }

    pub fn restore(&mut self, previous: bool) {
        self.suppressed = previous;
    }

    /// Offsets siblings must take after `source` scrolled to `offset`.
    ///
    /// Empty while suppressed.
    pub fn propagate(&self, source: SheetArea, offset: Point) -> Vec<SyncTarget> {
        if self.suppressed {
            return Vec::new();
        }
        let sync = |area, axis| SyncTarget {
            area,
            axis,
            value: match axis {
                Axis::Horizontal => offset.x,
                Axis::Vertical => offset.y,
            },
        };
        match source {
            SheetArea::Content => vec![
                sync(SheetArea::FixedTop, Axis::Horizontal),
                sync(SheetArea::FixedLeft, Axis::Vertical),
            ],
            SheetArea::FixedTop => vec![sync(SheetArea::Content, Axis::Horizontal)],
            SheetArea::FixedLeft => vec![sync(SheetArea::Content, Axis::Vertical)],
        }
    }
}

impl<P: DataProvider> SheetView<P> {
    /// Scroll `area` to `offset` (clamped) and let the regions sharing an
    /// axis with it follow. Returns `false` if the offset did not change.
    ///
    /// `offset` is in the content coordinates of `area`.
    pub fn scroll(&mut self, area: SheetArea, offset: Point) -> bool {
        let mut broker = Broker {
            provider: &mut self.provider,
            cells: &mut self.cells,
        };
        if !self.regions.get_mut(area).apply_offset(offset, &mut broker) {
            return false;
        }
        self.sync_from(area);
        self.refresh_resize_indicator();
        true
    }

    /// Scroll the content area; the frozen regions follow.
    pub fn set_content_offset(&mut self, offset: Point) -> bool {
        self.scroll(SheetArea::Content, offset)
    }

    pub fn content_offset(&self) -> Point {
        self.regions.content.offset()
    }

    /// Scroll the content area by a delta.
    pub fn scroll_by(&mut self, delta_x: f64, delta_y: f64) -> bool {
        let offset = self.content_offset();
        self.set_content_offset(Point::new(offset.x + delta_x, offset.y + delta_y))
    }

    /// Apply `update` to every region with propagation suppressed, then push
    /// the settled content offset to the frozen regions once.
    ///
    /// Offsets clamped mid-update do not drag siblings along while the others
    /// are still stale. Nested inside another suppressed span, the final push
    /// is left to the outer one.
    pub(super) fn settle_regions<F>(&mut self, mut update: F)
    where
        F: FnMut(&mut ScrollRegion, &mut Broker<'_, P>),
    {
        let previous = self.scroll.suppress();
        for area in SheetArea::ALL {
            let before = self.regions.get(area).offset();
            let mut broker = Broker {
                provider: &mut self.provider,
                cells: &mut self.cells,
            };
            update(self.regions.get_mut(area), &mut broker);
            if self.regions.get(area).offset() != before {
                self.sync_from(area);
            }
        }
        self.scroll.restore(previous);
        self.sync_from(SheetArea::Content);
    }

    /// Push the offset of `area` to its siblings, e.g. after a resize clamped it.
    pub(crate) fn sync_from(&mut self, area: SheetArea) {
        let mut broker = Broker {
            provider: &mut self.provider,
            cells: &mut self.cells,
        };
        let offset = self.regions.get(area).offset();
        for target in self.scroll.propagate(area, offset) {
            self.regions
                .get_mut(target.area)
                .apply_axis(target.axis, target.value, &mut broker);
        }
    }
}
