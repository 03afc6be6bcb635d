use core::f32::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};

use pneuma_engine::anim::{Animation, Mutation};
use pneuma_engine::coords::Vec2;
use pneuma_engine::paint::{palette, Color};
use pneuma_engine::scene::Node;

use crate::component::Component;

/// What a seven-segment digit can show.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Glyph {
    Digit(u8),
    #[default]
    Blank,
}

impl Glyph {
    /// `None` above 9.
    pub fn digit(d: u32) -> Option<Self> {
        u8::try_from(d).ok().filter(|d| *d <= 9).map(Glyph::Digit)
    }

    /// Lit segments, indexed as the display's children.
    pub fn segments(self) -> [bool; 7] {
        match self {
            Glyph::Digit(d) => DIGITS.get(usize::from(d)).copied().unwrap_or([false; 7]),
            Glyph::Blank => [false; 7],
        }
    }
}

//      5
//    -----
//  3|     |1
//   |  0  |
//    -----
//  4|     |2
//   |     |
//    -----
//      6
const DIGITS: [[bool; 7]; 10] = {
    const O: bool = false;
    const I: bool = true;
    [
        [O, I, I, I, I, I, I],
        [O, I, I, O, O, O, O],
        [I, I, O, O, I, I, I],
        [I, I, I, O, O, I, I],
        [I, I, I, I, O, O, O],
        [I, O, I, I, O, I, I],
        [I, O, I, I, I, I, I],
        [O, I, I, O, O, I, O],
        [I, I, I, I, I, I, I],
        [I, I, I, I, O, I, I],
    ]
};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SegmentStyle {
    pub off_color: Color,
    pub on_color: Color,
    pub off_opacity: f32,
    pub on_opacity: f32,
}

impl Default for SegmentStyle {
    fn default() -> Self {
        Self {
            off_color: palette::GREY_A,
            on_color: palette::RED_C,
            off_opacity: 0.1,
            on_opacity: 1.0,
        }
    }
}

/// One seven-segment digit. `height` is the segment length; the digit is
/// about twice as tall.
#[derive(Debug, Clone)]
pub struct SevenSegmentDisplay {
    node: Node,
    style: SegmentStyle,
    glyph: Glyph,
}

impl SevenSegmentDisplay {
    pub fn new(height: f32, style: SegmentStyle) -> Self {
        let w = height;
        let a = w / 5.0;
        let s = a * 3f32.sqrt() / 2.0;

        let vertical = Self::vertical(w, a, s);
        let horizontal = Self::horizontal(w, a, s);
        let place = |seg: &Node, angle: f32, mirrored: bool, at: Vec2| {
            let mut seg = seg.clone().rotated_about(angle, Vec2::ORIGIN);
            if mirrored {
                seg.flip_about(Vec2::UP, Vec2::ORIGIN);
            }
            seg.shifted(at)
        };
        let edge = w - s / 2.0;
        let segments = vec![
            Self::central(w, a),
            place(&vertical, FRAC_PI_2, false, Vec2::new(w / 2.0, w / 2.0)),
            place(&vertical, -FRAC_PI_2, true, Vec2::new(w / 2.0, -w / 2.0)),
            place(&vertical, FRAC_PI_2, true, Vec2::new(-w / 2.0, w / 2.0)),
            place(&vertical, -FRAC_PI_2, false, Vec2::new(-w / 2.0, -w / 2.0)),
            horizontal.clone().shifted(Vec2::UP * edge),
            horizontal.flipped(Vec2::RIGHT).shifted(Vec2::DOWN * edge),
        ];
        let mut node = Node::group(segments);
        node.set_stroke_width(0.0);
        node.set_fill(style.off_color, style.off_opacity);
        Self { node, style, glyph: Glyph::Blank }
    }

    /// Middle bar: a stretched hexagon.
    fn central(w: f32, a: f32) -> Node {
        let s = w / 2.0 - a * (3f32.sqrt() - 1.2);
        let tip = s + a / (2.0 * (PI / 6.0).tan());
        Node::polygon(vec![
            Vec2::new(-s, -a / 2.0),
            Vec2::new(s, -a / 2.0),
            Vec2::new(tip, 0.0),
            Vec2::new(s, a / 2.0),
            Vec2::new(-s, a / 2.0),
            Vec2::new(-tip, 0.0),
        ])
    }

    /// Side bar, lying down, centred on the origin.
    fn vertical(w: f32, a: f32, s: f32) -> Node {
        let inset = (s - a / 2.0) * (PI / 3.0).tan();
        Node::polygon(vec![
            Vec2::new(-w / 2.0, 0.0),
            Vec2::new(w / 2.0 - inset, 0.0),
            Vec2::new(w / 2.0, s - a / 2.0),
            Vec2::new(w / 2.0 - s, s),
            Vec2::new(-(w / 2.0 - a / 2.0), s),
        ])
        .shifted(Vec2::DOWN * (s / 2.0))
    }

    /// Top bar, wide edge up, centred on the origin.
    fn horizontal(w: f32, a: f32, s: f32) -> Node {
        Node::polygon(vec![
            Vec2::new(-(w / 2.0 - a / 2.0), 0.0),
            Vec2::new(w / 2.0 - a / 2.0, 0.0),
            Vec2::new(w / 2.0, s),
            Vec2::new(-w / 2.0, s),
        ])
        .shifted(Vec2::DOWN * (s / 2.0))
    }

    #[inline]
    pub fn glyph(&self) -> Glyph {
        self.glyph
    }

    /// Lights the segments of `glyph` and dims the rest, one animation per
    /// segment.
    pub fn show(&mut self, glyph: Glyph) -> Vec<Animation> {
        self.glyph = glyph;
        let anims = glyph
            .segments()
            .iter()
            .enumerate()
            .map(|(i, &lit)| {
                let (color, opacity) = if lit {
                    (self.style.on_color, self.style.on_opacity)
                } else {
                    (self.style.off_color, self.style.off_opacity)
                };
                Animation::mutate([i])
                    .with(Mutation::SetFillColor(color))
                    .with(Mutation::SetFillOpacity(opacity))
            })
            .collect();
        self.commit(anims)
    }

    pub fn reset(&mut self) -> Vec<Animation> {
        self.show(Glyph::Blank)
    }
}

impl Default for SevenSegmentDisplay {
    fn default() -> Self {
        Self::new(1.0, SegmentStyle::default())
    }
}

impl Component for SevenSegmentDisplay {
    fn node(&self) -> &Node {
        &self.node
    }

    fn node_mut(&mut self) -> &mut Node {
        &mut self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(d: &SevenSegmentDisplay) -> Vec<bool> {
        d.node()
            .children()
            .iter()
            .map(|s| s.style().is_some_and(|st| st.fill.opacity == 1.0))
            .collect()
    }

    #[test]
    fn digit_box_scales_with_height() {
        let small = SevenSegmentDisplay::new(1.0, SegmentStyle::default()).bounds();
        let large = SevenSegmentDisplay::new(3.0, SegmentStyle::default()).bounds();
        assert!((large.width() - 3.0 * small.width()).abs() < 1e-4);
        assert!((large.height() - 3.0 * small.height()).abs() < 1e-4);
        assert!(small.height() > 1.5 * small.width());
    }

    #[test]
    fn segments_frame_the_digit() {
        let d = SevenSegmentDisplay::default();
        let seg = d.node().children();
        assert!(seg[5].center().y > seg[1].center().y);
        assert!(seg[1].center().x > 0.0 && seg[3].center().x < 0.0);
        assert!(seg[6].center().y < seg[2].center().y);
        // Outer edges are the wide ones.
        assert!(seg[5].top().y - seg[5].center().y > 0.0);
        assert!((seg[6].bottom().y + seg[5].top().y).abs() < 1e-4);
    }

    #[test]
    fn show_lights_the_table() {
        let mut d = SevenSegmentDisplay::default();
        let anims = d.show(Glyph::Digit(7));
        assert_eq!(anims.len(), 7);
        assert_eq!(lit(&d), vec![false, true, true, false, false, true, false]);
        d.reset();
        assert_eq!(lit(&d), vec![false; 7]);
        assert_eq!(d.glyph(), Glyph::Blank);
    }

    #[test]
    fn digits_above_nine_are_rejected() {
        assert_eq!(Glyph::digit(9), Some(Glyph::Digit(9)));
        assert_eq!(Glyph::digit(10), None);
        assert_eq!(Glyph::Digit(8).segments(), [true; 7]);
    }
}
