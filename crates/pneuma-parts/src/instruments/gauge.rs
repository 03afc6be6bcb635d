use core::f32::consts::{FRAC_PI_2, PI};

use pneuma_engine::anim::Animation;
use pneuma_engine::coords::Vec2;
use pneuma_engine::geom::{self, BooleanOperation};
use pneuma_engine::paint::{palette, Color};
use pneuma_engine::scene::{Node, NodePath};

use crate::component::Component;

/// Angle of the zero notch.
const SCALE_START: f32 = 7.0 / 6.0 * PI;
/// Sweep from zero to full scale, clockwise.
const SCALE_SWEEP: f32 = -4.0 / 3.0 * PI;
const NOTCHES: usize = 40;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GaugeStyle {
    pub scale_color: Color,
    pub needle_color: Color,
    pub dial_fill: Color,
}

impl Default for GaugeStyle {
    fn default() -> Self {
        Self {
            scale_color: palette::SIGNAL_BLUE,
            needle_color: palette::SIGNAL_BLUE,
            dial_fill: palette::GREY_A,
        }
    }
}

/// Dial pressure gauge reading 0 to 100 % of its scale.
///
/// Node layout:
/// - `0` body: `[dial, fitting arc, fitting sides and base…, fitting plate]`
/// - `1` scale: `[notches, labels, unit]`
/// - `2` needle: `[blade, hub overlay, pivot]`
#[derive(Debug, Clone)]
pub struct Gauge {
    node: Node,
    value: f32,
}

impl Gauge {
    const NEEDLE: usize = 2;

    pub fn new(radius: f32, unit: &str, style: GaugeStyle) -> Self {
        let node = Node::group(vec![
            Self::body(radius, style),
            Self::scale(radius, unit, style),
            Self::needle(radius, style),
        ]);
        log::debug!("gauge r={radius} [{unit}]");
        Self { node, value: 0.0 }
    }

    fn body(r: f32, style: GaugeStyle) -> Node {
        let half = PI / 12.0;
        let (a1, a2) = (1.5 * PI - half, 1.5 * PI + half);
        let (p1, p2) = (Vec2::from_angle(a1) * r, Vec2::from_angle(a2) * r);
        let drop = Vec2::DOWN * (r / 3.0);
        let thin = |n: Node| n.stroke(palette::BLACK, 2.0);

        let arc = thin(Node::arc(Vec2::ORIGIN, r, a1, 2.0 * half));
        let base = thin(Node::line(Vec2::new(p1.x, p1.y - r / 3.0), Vec2::new(p2.x, p1.y - r / 3.0)));
        let mut outline = arc.outline();
        outline.extend([base.end(), base.start()]);
        let plate = Node::polygon(outline).no_stroke().fill(palette::GREY_C, 0.5);

        Node::group(vec![
            Node::circle(Vec2::ORIGIN, r).stroke(palette::BLACK, 4.0).fill(style.dial_fill, 0.3),
            arc,
            thin(Node::line(p1, p1 + drop)),
            base,
            thin(Node::line(p2, p2 + drop)),
            plate,
        ])
    }

    fn scale(r: f32, unit: &str, style: GaugeStyle) -> Node {
        let step = SCALE_SWEEP / NOTCHES as f32;
        let mut notches = Vec::with_capacity(NOTCHES + 1);
        let mut labels = Vec::new();
        for i in 0..=NOTCHES {
            let u = Vec2::from_angle(SCALE_START + i as f32 * step);
            let major = i % 5 == 0;
            let outer = if major { 0.9 * r } else { 0.8 * r };
            notches.push(Node::line(u * outer, u * (0.7 * r)).stroke(style.scale_color, 2.0));
            if major {
                labels.push(Node::text((i / 5).to_string(), u * (0.6 * r), 0.15 * r).color(palette::BLACK));
            }
        }
        let unit = Node::text(unit, Vec2::DOWN * (0.6 * r), 0.12 * r).color(style.scale_color);
        Node::group(vec![Node::group(notches), Node::group(labels), unit])
    }

    fn needle(r: f32, style: GaugeStyle) -> Node {
        let (a, b, c) = (1.0 / 15.0, 1.0 / 3.0, 1.0 / 10.0);
        let blade = Node::polygon(vec![
            Vec2::new(-a * r, -b * r),
            Vec2::new(a * r, -b * r),
            Vec2::new(0.0, 2.0 * b * r),
        ]);
        let hub = Node::circle(Vec2::ORIGIN, c * r);
        let paint = |mut n: Node| {
            n.set_fill(style.needle_color, 1.0);
            n.set_stroke_width(0.0);
            n
        };
        let needle = Node::group(vec![
            paint(geom::boolean(&blade, &hub, BooleanOperation::Union)),
            paint(geom::boolean(&blade, &hub, BooleanOperation::Intersection)),
            Node::dot(Vec2::ORIGIN, c * r / 3.0).color(palette::GREY_B),
        ]);
        // Drawn pointing up; turn it onto the zero notch.
        needle.rotated_about(SCALE_START - FRAC_PI_2, Vec2::ORIGIN)
    }

    /// Sum of every reading change so far, in percent.
    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Where the needle pivots.
    pub fn pivot(&self) -> Vec2 {
        self.node.get(&NodePath::from([Self::NEEDLE, 2])).map(Node::center).unwrap_or_default()
    }

    /// Swings the needle by `percent` of full scale from where it stands.
    ///
    /// Each call is clamped to `[-100, 100]`; the needle itself is not
    /// stopped at either end of the scale.
    pub fn set_value(&mut self, percent: f32, run_time: f32) -> Vec<Animation> {
        let percent = percent.clamp(-100.0, 100.0);
        let angle = SCALE_SWEEP * percent / 100.0;
        self.value += percent;
        let swing = Animation::rotate(vec![NodePath::from([Self::NEEDLE])], angle, Some(self.pivot()))
            .run_time(run_time);
        self.commit(vec![swing])
    }
}

impl Component for Gauge {
    fn node(&self) -> &Node {
        &self.node
    }

    fn node_mut(&mut self) -> &mut Node {
        &mut self.node
    }
}
