use serde::{Deserialize, Serialize};

use crate::coords::{Affine, Rect, Vec2};

use super::{arc_bounds, flatten_arc, PathShape, Shape};

/// Circular arc. Positive `sweep` runs counter-clockwise from `start_angle`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcShape {
    pub center: Vec2,
    pub radius: f32,
    pub start_angle: f32,
    pub sweep: f32,
}

impl ArcShape {
    #[inline]
    pub fn new(center: Vec2, radius: f32, start_angle: f32, sweep: f32) -> Self {
        Self { center, radius, start_angle, sweep }
    }

    /// Arc from `start` to `end` bending by `angle` radians (positive bulges
    /// to the right of the chord, turning counter-clockwise).
    ///
    /// A vanishing angle degenerates into the straight chord, returned as `None`.
    pub fn between(start: Vec2, end: Vec2, angle: f32) -> Option<Self> {
        let chord = end - start;
        let half = chord.length() * 0.5;
        if angle.abs() < 1e-6 || half <= 0.0 {
            return None;
        }
        let mid = (start + end) * 0.5;
        let left = chord.normalized().perp();
        let center = mid + left * (half / (angle * 0.5).tan());
        let radius = center.distance(start);
        let start_angle = (start - center).angle();
        Some(Self { center, radius, start_angle, sweep: angle })
    }

    pub fn start(&self) -> Vec2 {
        self.point_at(0.0)
    }

    pub fn end(&self) -> Vec2 {
        self.point_at(1.0)
    }

    /// Point at fraction `t` of the sweep.
    #[inline]
    pub fn point_at(&self, t: f32) -> Vec2 {
        self.center + Vec2::from_angle(self.start_angle + self.sweep * t) * self.radius
    }

    pub fn bounds(&self) -> Rect {
        arc_bounds(self.center, self.radius, self.start_angle, self.sweep)
    }

    pub fn outline(&self, tolerance: f32) -> Vec<Vec2> {
        flatten_arc(self.center, self.radius, self.start_angle, self.sweep, tolerance)
    }

    pub fn transformed(&self, t: &Affine) -> Shape {
        match t.as_similarity() {
            Some(sim) => {
                let (start_angle, sweep) = if sim.mirrored {
                    (sim.rotation - self.start_angle, -self.sweep)
                } else {
                    (self.start_angle + sim.rotation, self.sweep)
                };
                Shape::Arc(ArcShape {
                    center: t.apply(self.center),
                    radius: self.radius * sim.scale,
                    start_angle,
                    sweep,
                })
            }
            None => Shape::Path(
                PathShape::open(self.outline(super::DEFAULT_TOLERANCE)).transformed(t),
            ),
        }
    }
}
