use serde::{Deserialize, Serialize};

/// One of the scrollable sub-regions of a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SheetArea {
    /// Main content, scrolls on both axes.
    Content,
    /// Frozen header rows above the content; scrolls horizontally only.
    FixedTop,
    /// Frozen header columns left of the content; scrolls vertically only.
    FixedLeft,
}

impl SheetArea {
    pub const ALL: [SheetArea; 3] = [SheetArea::Content, SheetArea::FixedTop, SheetArea::FixedLeft];
}

/// Layout axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Horizontal,
    Vertical,
}
