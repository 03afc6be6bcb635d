use core::f32::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use crate::coords::{Affine, Rect, Vec2};

use super::{flatten_arc, PathShape, Shape};

/// Rectangle with uniform corner radius, rotated about its centre.
///
/// `radius == 0` is a plain rectangle.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundedRectShape {
    pub center: Vec2,
    pub width: f32,
    pub height: f32,
    pub radius: f32,
    pub rotation: f32,
}

impl RoundedRectShape {
    #[inline]
    pub fn new(center: Vec2, width: f32, height: f32, radius: f32) -> Self {
        Self { center, width, height, radius, rotation: 0.0 }
    }

    /// Corner radius limited to half the shorter side.
    #[inline]
    pub fn effective_radius(&self) -> f32 {
        self.radius.clamp(0.0, 0.5 * self.width.abs().min(self.height.abs()))
    }

    /// Counter-clockwise boundary starting at the top-right corner.
    pub fn outline(&self, tolerance: f32) -> Vec<Vec2> {
        let r = self.effective_radius();
        let hw = self.width.abs() * 0.5;
        let hh = self.height.abs() * 0.5;
        let corners = [
            (Vec2::new(hw - r, hh - r), 0.0),
            (Vec2::new(-hw + r, hh - r), FRAC_PI_2),
            (Vec2::new(-hw + r, -hh + r), 2.0 * FRAC_PI_2),
            (Vec2::new(hw - r, -hh + r), 3.0 * FRAC_PI_2),
        ];
        let mut local = Vec::new();
        for (c, start) in corners {
            if r > 0.0 {
                local.extend(flatten_arc(c, r, start, FRAC_PI_2, tolerance));
            } else {
                local.push(c);
            }
        }
        local
            .into_iter()
            .map(|p| self.center + p.rotated(self.rotation))
            .collect()
    }

    pub fn bounds(&self) -> Rect {
        if self.rotation == 0.0 {
            return Rect::from_center_size(self.center, self.width.abs(), self.height.abs());
        }
        Rect::from_points(self.outline(super::DEFAULT_TOLERANCE)).unwrap_or_default()
    }

    pub fn transformed(&self, t: &Affine) -> Shape {
        match t.as_similarity() {
            Some(sim) => {
                let rotation = if sim.mirrored {
                    sim.rotation - self.rotation
                } else {
                    self.rotation + sim.rotation
                };
                Shape::RoundedRect(RoundedRectShape {
                    center: t.apply(self.center),
                    width: self.width * sim.scale,
                    height: self.height * sim.scale,
                    radius: self.radius * sim.scale,
                    rotation,
                })
            }
            None => Shape::Path(PathShape::closed(self.outline(super::DEFAULT_TOLERANCE)).transformed(t)),
        }
    }
}
