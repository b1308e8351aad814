//! Value types shared by the layout, cell and viewer modules.

mod area;
mod geometry;
mod index;
mod range;
mod selection;

pub use area::*;
pub use geometry::*;
pub use index::*;
pub use range::*;
pub use selection::*;
