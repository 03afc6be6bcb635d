use crate::paint::{Fill, Stroke};

use super::shapes::Shape;

/// Renderer-agnostic draw command: one shape with its resolved paint.
///
/// Extending the scene:
/// - add a new shape module under `scene::shapes::*`
/// - add a new `Shape` variant
/// - teach the exporters under `export::*` to emit it
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCmd {
    pub shape: Shape,
    pub stroke: Stroke,
    pub fill: Fill,
}

impl DrawCmd {
    #[inline]
    pub fn new(shape: Shape, stroke: Stroke, fill: Fill) -> Self {
        Self { shape, stroke, fill }
    }

    /// Whether anything would be painted.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.stroke.is_visible() || (self.shape.is_closed() && self.fill.is_visible())
    }
}
