use serde::{Deserialize, Serialize};

use crate::coords::{Affine, Rect, Vec2};

/// Average glyph advance as a fraction of the font size.
const ADVANCE: f32 = 0.6;

/// Single line of text centred on `center`.
///
/// No font is resolved here; extent is estimated from the character count so
/// layout helpers can place labels. Exporters emit the string as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextShape {
    pub text: String,
    pub center: Vec2,
    /// Cap height in scene units.
    pub size: f32,
    pub rotation: f32,
}

impl TextShape {
    pub fn new(text: impl Into<String>, center: Vec2, size: f32) -> Self {
        Self { text: text.into(), center, size, rotation: 0.0 }
    }

    /// Estimated unrotated `(width, height)`.
    pub fn extent(&self) -> Vec2 {
        let chars = self.text.chars().count() as f32;
        Vec2::new(ADVANCE * self.size * chars, self.size)
    }

    pub fn outline(&self) -> Vec<Vec2> {
        let half = self.extent() * 0.5;
        [
            Vec2::new(half.x, half.y),
            Vec2::new(-half.x, half.y),
            Vec2::new(-half.x, -half.y),
            Vec2::new(half.x, -half.y),
        ]
        .into_iter()
        .map(|p| self.center + p.rotated(self.rotation))
        .collect()
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_points(self.outline()).unwrap_or_default()
    }

    /// Glyphs stay upright under mirrors; only the anchor, size and rotation follow.
    pub fn transformed(&self, t: &Affine) -> TextShape {
        let (scale, rotation) = match t.as_similarity() {
            Some(sim) if !sim.mirrored => (sim.scale, self.rotation + sim.rotation),
            Some(sim) => (sim.scale, self.rotation),
            None => (t.determinant().abs().sqrt(), self.rotation),
        };
        TextShape {
            text: self.text.clone(),
            center: t.apply(self.center),
            size: self.size * scale,
            rotation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extent_grows_with_characters() {
        let a = TextShape::new("1", Vec2::ORIGIN, 0.5);
        let b = TextShape::new("12", Vec2::ORIGIN, 0.5);
        assert!((b.extent().x - 2.0 * a.extent().x).abs() < 1e-6);
        assert_eq!(a.extent().y, 0.5);
    }

    #[test]
    fn mirror_moves_anchor_but_keeps_reading_direction() {
        let t = TextShape::new("P", Vec2::new(1.0, 0.0), 0.3);
        let m = t.transformed(&Affine::flip_about(Vec2::ORIGIN, Vec2::UP));
        assert!((m.center - Vec2::new(-1.0, 0.0)).length() < 1e-6);
        assert_eq!(m.rotation, 0.0);
    }
}
