use serde::{Deserialize, Serialize};

use crate::coords::{Affine, Rect, Vec2};

/// Straight arrow with a triangular tip at `end`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrowShape {
    pub start: Vec2,
    pub end: Vec2,
    pub tip_length: f32,
    pub tip_width: f32,
}

impl ArrowShape {
    pub const DEFAULT_TIP_LENGTH: f32 = 0.35;

    #[inline]
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self::with_tip(start, end, Self::DEFAULT_TIP_LENGTH)
    }

    /// Tip length is capped at a quarter of the arrow length.
    pub fn with_tip(start: Vec2, end: Vec2, tip_length: f32) -> Self {
        let tip_length = tip_length.min(0.25 * start.distance(end));
        Self { start, end, tip_length, tip_width: tip_length }
    }

    /// Tip triangle: `[end, left base, right base]`.
    pub fn tip(&self) -> [Vec2; 3] {
        let dir = (self.end - self.start).normalized();
        let base = self.end - dir * self.tip_length;
        let side = dir.perp() * (self.tip_width * 0.5);
        [self.end, base + side, base - side]
    }

    /// Shaft end point where the tip begins.
    pub fn shaft_end(&self) -> Vec2 {
        self.end - (self.end - self.start).normalized() * self.tip_length
    }

    pub fn outline(&self) -> Vec<Vec2> {
        let [tip, l, r] = self.tip();
        vec![self.start, self.shaft_end(), l, tip, r, self.shaft_end()]
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_points(self.outline()).unwrap_or_default()
    }

    pub fn transformed(&self, t: &Affine) -> ArrowShape {
        let k = t.determinant().abs().sqrt();
        ArrowShape {
            start: t.apply(self.start),
            end: t.apply(self.end),
            tip_length: self.tip_length * k,
            tip_width: self.tip_width * k,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tip_sits_on_end_point() {
        let a = ArrowShape::with_tip(Vec2::ORIGIN, Vec2::new(4.0, 0.0), 0.5);
        let [tip, l, r] = a.tip();
        assert_eq!(tip, Vec2::new(4.0, 0.0));
        assert!((l.x - 3.5).abs() < 1e-6 && (r.x - 3.5).abs() < 1e-6);
        assert!((l.y - 0.25).abs() < 1e-6 && (r.y + 0.25).abs() < 1e-6);
    }

    #[test]
    fn short_arrow_caps_the_tip() {
        let a = ArrowShape::with_tip(Vec2::ORIGIN, Vec2::new(0.4, 0.0), 0.35);
        assert!((a.tip_length - 0.1).abs() < 1e-6);
    }
}
