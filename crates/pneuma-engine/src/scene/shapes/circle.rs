use core::f32::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::coords::{Affine, Rect, Vec2};

use super::{flatten_arc, PathShape, Shape};

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleShape {
    pub center: Vec2,
    pub radius: f32,
}

impl CircleShape {
    #[inline]
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_center_size(self.center, 2.0 * self.radius, 2.0 * self.radius)
    }

    /// Closed polygon; the duplicate closing vertex is dropped.
    pub fn outline(&self, tolerance: f32) -> Vec<Vec2> {
        let mut pts = flatten_arc(self.center, self.radius, 0.0, TAU, tolerance);
        pts.pop();
        pts
    }

    pub fn transformed(&self, t: &Affine) -> Shape {
        match t.as_similarity() {
            Some(sim) => Shape::Circle(CircleShape {
                center: t.apply(self.center),
                radius: self.radius * sim.scale,
            }),
            None => Shape::Path(PathShape::closed(self.outline(super::DEFAULT_TOLERANCE)).transformed(t)),
        }
    }
}
