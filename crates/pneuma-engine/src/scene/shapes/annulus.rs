use core::f32::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::coords::{Affine, Rect, Vec2};

use super::{arc_bounds, flatten_arc, PathShape, Shape};

/// Ring or annular sector between `inner` and `outer` radii.
///
/// A full ring has `sweep == TAU`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnulusShape {
    pub center: Vec2,
    pub inner: f32,
    pub outer: f32,
    pub start_angle: f32,
    pub sweep: f32,
}

impl AnnulusShape {
    #[inline]
    pub fn ring(center: Vec2, inner: f32, outer: f32) -> Self {
        Self { center, inner, outer, start_angle: 0.0, sweep: TAU }
    }

    #[inline]
    pub fn sector(center: Vec2, inner: f32, outer: f32, start_angle: f32, sweep: f32) -> Self {
        Self { center, inner, outer, start_angle, sweep }
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.sweep.abs() >= TAU - 1e-6
    }

    pub fn bounds(&self) -> Rect {
        let outer = arc_bounds(self.center, self.outer, self.start_angle, self.sweep);
        if self.is_full() {
            outer
        } else {
            outer.union(arc_bounds(self.center, self.inner, self.start_angle, self.sweep))
        }
    }

    /// Outer arc forward then inner arc backward.
    pub fn outline(&self, tolerance: f32) -> Vec<Vec2> {
        let mut pts = flatten_arc(self.center, self.outer, self.start_angle, self.sweep, tolerance);
        let mut inner = flatten_arc(self.center, self.inner, self.start_angle, self.sweep, tolerance);
        inner.reverse();
        pts.extend(inner);
        pts
    }

    pub fn transformed(&self, t: &Affine) -> Shape {
        match t.as_similarity() {
            Some(sim) => {
                let (start_angle, sweep) = if sim.mirrored {
                    (sim.rotation - self.start_angle, -self.sweep)
                } else {
                    (self.start_angle + sim.rotation, self.sweep)
                };
                Shape::Annulus(AnnulusShape {
                    center: t.apply(self.center),
                    inner: self.inner * sim.scale,
                    outer: self.outer * sim.scale,
                    start_angle,
                    sweep,
                })
            }
            None => Shape::Path(PathShape::closed(self.outline(super::DEFAULT_TOLERANCE)).transformed(t)),
        }
    }
}
