use pneuma_engine::anim::Animation;
use pneuma_engine::coords::Vec2;
use pneuma_engine::paint::{palette, Color};
use pneuma_engine::scene::{Node, NodePath};

use crate::component::Component;
use crate::electronics::{Glyph, SegmentStyle, SevenSegmentDisplay};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SensorStyle {
    pub body_color: Color,
    /// Captions on the body.
    pub text_color: Color,
    /// Screen, buttons and fitting caps.
    pub accent_color: Color,
    pub segments: SegmentStyle,
}

impl Default for SensorStyle {
    fn default() -> Self {
        Self {
            body_color: palette::GREY_D,
            text_color: palette::WHITE,
            accent_color: palette::SIGNAL_BLUE,
            segments: SegmentStyle::default(),
        }
    }
}

/// Inline flow sensor with a four-digit screen.
///
/// Node layout:
/// - `0` body: `[case, unit, top fitting, top cap, bottom fitting,
///   bottom cap, button A, arrow A, label A, button B, arrow B, label B]`
/// - `1` screen: `[panel, digit 0 (rightmost), digit 1, digit 2, digit 3]`
#[derive(Debug, Clone)]
pub struct FlowSensor {
    node: Node,
    /// Digit state; geometry lives in the screen subtree.
    digits: Vec<SevenSegmentDisplay>,
}

impl FlowSensor {
    pub const DIGITS: usize = 4;
    const SCREEN: usize = 1;

    pub fn new(height: f32, unit: &str, style: SensorStyle) -> Self {
        let h = height;
        let w = 2.0 / 3.0 * h;
        let body = Self::body(h, w, unit, style);

        let panel = Node::rounded_rect(Vec2::UP * (0.3 * h), 0.8 * w, h / 4.0, h / 100.0)
            .color(style.accent_color)
            .fill_opacity(1.0);
        let pitch = 0.8 * w / 8.0;
        let mut digits = Vec::with_capacity(Self::DIGITS);
        let mut screen = vec![panel];
        for i in 0..Self::DIGITS {
            let digit = SevenSegmentDisplay::new(h / 10.0, style.segments);
            let x = pitch * (3.0 - 2.0 * i as f32);
            screen.push(digit.node().clone().shifted(Vec2::new(x, 0.3 * h)));
            digits.push(digit);
        }

        log::debug!("flow sensor h={h} [{unit}]");
        Self { node: Node::group(vec![body, Node::group(screen)]), digits }
    }

    fn body(h: f32, w: f32, unit: &str, style: SensorStyle) -> Node {
        let solid = |n: Node, color: Color, opacity: f32| n.no_stroke().fill(color, opacity);
        let case = Node::rect(Vec2::ORIGIN, w, h).color(style.body_color).fill_opacity(1.0);
        let (button_w, button_h) = (w / 7.0, w / 4.0);

        let fitting = solid(Node::rect(Vec2::ORIGIN, w / 3.0, h / 5.0), palette::BLACK, 0.8);
        let cap = solid(Node::rect(Vec2::ORIGIN, w / 3.5, h / 25.0), style.accent_color, 0.8);
        let top = fitting.clone().placed_next_to(case.bounds(), Vec2::UP, 0.0);
        let top_cap = cap.clone().placed_next_to(top.bounds(), Vec2::UP, 0.0);
        let bottom = fitting.placed_next_to(case.bounds(), Vec2::DOWN, 0.0);
        let bottom_cap = cap.placed_next_to(bottom.bounds(), Vec2::DOWN, 0.0);

        let mut nodes = vec![
            case,
            Node::text(unit, Vec2::UP * (button_h / 3.0), h / 12.0).color(style.text_color),
            top,
            top_cap,
            bottom,
            bottom_cap,
        ];
        for (side, dir, name) in [(-1.0, Vec2::UP, "A"), (1.0, Vec2::DOWN, "B")] {
            let center = Vec2::new(side * w / 4.0, -h / 6.0);
            let button = Node::rounded_rect(center, button_w, button_h, h / 100.0)
                .color(style.accent_color)
                .fill_opacity(1.0);
            let reach = dir * (0.3 * button_h);
            let arrow = Node::arrow_with_ratio(center - reach, center + reach, 0.4)
                .color(palette::GREY_B)
                .stroke_width(2.0);
            let label = Node::text(name, Vec2::ORIGIN, h / 8.0)
                .color(style.text_color)
                .placed_next_to(button.bounds(), Vec2::DOWN, h / 20.0);
            nodes.extend([button, arrow, label]);
        }
        Node::group(nodes)
    }

    /// What each digit shows, rightmost first.
    pub fn glyphs(&self) -> Vec<Glyph> {
        self.digits.iter().map(SevenSegmentDisplay::glyph).collect()
    }

    /// Shows the four least significant digits of `number`; unused leading
    /// digits go blank.
    pub fn update_screen(&mut self, number: u64) -> Vec<Animation> {
        let text = number.to_string();
        let mut shown = text.chars().rev().filter_map(|c| c.to_digit(10)).map(Glyph::digit);
        let glyphs: Vec<Glyph> = (0..Self::DIGITS)
            .map(|_| shown.next().flatten().unwrap_or(Glyph::Blank))
            .collect();
        self.show(&glyphs)
    }

    /// Blanks every digit.
    pub fn reset_screen(&mut self) -> Vec<Animation> {
        self.show(&[Glyph::Blank; Self::DIGITS])
    }

    fn show(&mut self, glyphs: &[Glyph]) -> Vec<Animation> {
        let mut anims = Vec::new();
        for (i, (digit, &glyph)) in self.digits.iter_mut().zip(glyphs).enumerate() {
            let prefix = NodePath::from([Self::SCREEN, 1 + i]);
            anims.extend(digit.show(glyph).iter().map(|a| a.prefixed(&prefix)));
        }
        self.commit(anims)
    }

    /// Where the inlet pipe attaches.
    pub fn fitting_top(&self) -> Vec2 {
        self.node.get(&NodePath::from([0, 3])).map(Node::top).unwrap_or_default()
    }

    /// Where the outlet pipe attaches.
    pub fn fitting_bottom(&self) -> Vec2 {
        self.node.get(&NodePath::from([0, 5])).map(Node::bottom).unwrap_or_default()
    }
}

impl Component for FlowSensor {
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

    fn sensor() -> FlowSensor {
        FlowSensor::new(1.0, "l/min", SensorStyle::default())
    }

    #[test]
    fn short_numbers_blank_the_leading_digits() {
        let mut s = sensor();
        let anims = s.update_screen(7);
        assert_eq!(anims.len(), 4 * 7);
        assert_eq!(s.glyphs(), vec![Glyph::Digit(7), Glyph::Blank, Glyph::Blank, Glyph::Blank]);
    }

    #[test]
    fn long_numbers_keep_the_last_four_digits() {
        let mut s = sensor();
        s.update_screen(123_456);
        let expected = [6, 5, 4, 3].map(Glyph::Digit).to_vec();
        assert_eq!(s.glyphs(), expected);

        s.update_screen(200);
        assert_eq!(s.glyphs()[3], Glyph::Blank);
        assert_eq!(s.glyphs()[0], Glyph::Digit(0));
    }

    #[test]
    fn screen_tree_follows_the_digits() {
        let mut s = sensor();
        s.update_screen(8);
        let lit = |s: &FlowSensor, path: [usize; 3]| {
            s.node()
                .get(&NodePath::from(path))
                .ok()
                .and_then(Node::style)
                .map(|st| st.fill.opacity)
        };
        assert_eq!(lit(&s, [1, 1, 0]), Some(1.0));
        assert_eq!(lit(&s, [1, 2, 0]), Some(0.1));
        s.reset_screen();
        assert_eq!(lit(&s, [1, 1, 0]), Some(0.1));
    }

    #[test]
    fn digits_read_right_to_left() {
        let s = sensor();
        let screen = &s.node().children()[1];
        assert!(screen.children()[1].center().x > screen.children()[4].center().x);
    }

    #[test]
    fn fittings_cap_the_body() {
        let s = sensor();
        assert!(s.fitting_top().y > 0.5);
        assert!(s.fitting_bottom().y < -0.5);
        assert!((s.fitting_top().x).abs() < 1e-5);
    }
}
