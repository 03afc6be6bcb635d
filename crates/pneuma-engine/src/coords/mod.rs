//! Coordinate and geometry types shared by shapes, components and exporters.
//!
//! Canonical scene space:
//! - abstract scene units (a valve chamber of height 2 is two units tall)
//! - origin at the scene centre
//! - +X right, +Y up
//!
//! Exporters flip Y when targeting top-left-origin formats such as SVG.

mod affine;
mod rect;
mod vec2;

pub use affine::{Affine, Similarity};
pub use rect::Rect;
pub use vec2::Vec2;
