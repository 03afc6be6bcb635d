//! Paint model shared between components and exporters.
//!
//! Scope:
//! - color representation (linear premultiplied alpha)
//! - stroke and fill descriptions with independent opacity
//! - per-shape `Style` (stroke, fill, z-layer)
//!
//! Geometry types remain in `coords`.

pub mod color;
pub mod palette;

use serde::{Deserialize, Serialize};

use crate::scene::ZIndex;

pub use color::Color;

/// Outline drawn along a shape.
///
/// `width` uses the host engine's stroke units; exporters convert it.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
    pub opacity: f32,
}

impl Stroke {
    #[inline]
    pub fn new(color: Color, width: f32) -> Self {
        Self { color, width, opacity: 1.0 }
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.width > 0.0 && self.opacity > 0.0
    }
}

/// Interior paint of a closed shape.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub color: Color,
    pub opacity: f32,
}

impl Fill {
    #[inline]
    pub fn new(color: Color, opacity: f32) -> Self {
        Self { color, opacity: opacity.clamp(0.0, 1.0) }
    }

    #[inline]
    pub fn solid(color: Color) -> Self {
        Self::new(color, 1.0)
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }
}

/// Paint state of one shape.
///
/// Both parts are always present; an invisible stroke or fill is expressed
/// through zero width or zero opacity so colour changes survive toggling.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub stroke: Stroke,
    pub fill: Fill,
    pub z: ZIndex,
}

impl Style {
    /// Default stroke width, in stroke units.
    pub const STROKE_WIDTH: f32 = 4.0;

    /// Black outline, transparent interior.
    pub fn outline() -> Self {
        Self {
            stroke: Stroke::new(palette::BLACK, Self::STROKE_WIDTH),
            fill: Fill::new(palette::BLACK, 0.0),
            z: ZIndex::default(),
        }
    }

    /// Filled shape without outline.
    pub fn solid(color: Color) -> Self {
        Self {
            stroke: Stroke::new(color, 0.0),
            fill: Fill::solid(color),
            z: ZIndex::default(),
        }
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::outline()
    }
}
