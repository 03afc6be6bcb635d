use core::f32::consts::{FRAC_PI_2, PI, TAU};

use serde::{Deserialize, Serialize};

use pneuma_engine::anim::Animation;
use pneuma_engine::coords::Vec2;
use pneuma_engine::paint::{palette, Color};
use pneuma_engine::scene::{Node, NodePath};

use crate::component::Component;

/// Turning sense of the pulleys.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Spin {
    /// Upper run moves right.
    #[default]
    Clockwise,
    CounterClockwise,
}

impl Spin {
    /// Sign of the rotation angle, counter-clockwise positive.
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Spin::Clockwise => -1.0,
            Spin::CounterClockwise => 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConveyorConfig {
    height: f32,
    length: f32,
    belt_color: Color,
    spin: Spin,
}

impl ConveyorConfig {
    /// `length` is the distance between the pulley centres.
    pub fn new(height: f32, length: f32) -> Self {
        Self { height, length, ..Self::default() }
    }

    pub fn belt_color(mut self, v: Color) -> Self { self.belt_color = v; self }
    pub fn spin(mut self, v: Spin) -> Self { self.spin = v; self }

    pub fn build(self) -> ConveyorBelt {
        ConveyorBelt::new(self)
    }
}

impl Default for ConveyorConfig {
    fn default() -> Self {
        Self { height: 1.0, length: 4.0, belt_color: palette::SIGNAL_BLUE, spin: Spin::default() }
    }
}

/// Belt conveyor seen from the side.
///
/// Node layout:
/// - `0` left pulley, `2` right pulley: `[disc, hub, holes…]`
/// - `1` belt: `[right bend, upper run, left bend, lower run]`
/// - `3` frame: `[right edge, top, left edge, bottom, plate, upper arrow, lower arrow]`
#[derive(Debug, Clone)]
pub struct ConveyorBelt {
    node: Node,
    spin: Spin,
}

impl ConveyorBelt {
    const LEFT_PULLEY: usize = 0;
    const RIGHT_PULLEY: usize = 2;
    const FRAME: usize = 3;
    const HOLES: usize = 8;

    fn new(cfg: ConveyorConfig) -> Self {
        let h = cfg.height;
        let r = h / 2.0;
        let half = cfg.length / 2.0;
        let (left, right) = (Vec2::LEFT * half, Vec2::RIGHT * half);

        let width = (8.0 * h).clamp(1.0, 8.0);
        let belt = Node::group(vec![
            Node::arc(right, r, -FRAC_PI_2, PI),
            Node::line(right + Vec2::UP * r, left + Vec2::UP * r),
            Node::arc(left, r, FRAC_PI_2, PI),
            Node::line(left + Vec2::DOWN * r, right + Vec2::DOWN * r),
        ])
        .stroke(cfg.belt_color, width);

        let node = Node::group(vec![
            Self::pulley(left, h),
            belt,
            Self::pulley(right, h),
            Self::frame(left, right, cfg.spin, h),
        ]);
        log::debug!("conveyor belt {}x{h}, {:?}", cfg.length, cfg.spin);
        Self { node, spin: cfg.spin }
    }

    fn pulley(center: Vec2, h: f32) -> Node {
        let r = h / 2.0;
        let (inner, outer) = (0.3 * r, 0.9 * r);
        let mid = (inner + outer) / 2.0;

        let mut parts = vec![
            Node::annulus(center, inner, outer).color(palette::GREY_D).fill_opacity(1.0),
            Node::circle(center, 0.2 * r).fill(palette::BLACK, 1.0),
        ];
        let hole_width = h.clamp(1.0, 2.0);
        parts.extend((0..Self::HOLES).map(|i| {
            let at = center + Vec2::from_angle(i as f32 * TAU / Self::HOLES as f32) * mid;
            Node::circle(at, outer / 7.0).stroke(palette::GREY_A, hole_width)
        }));
        Node::group(parts)
    }

    fn frame(left: Vec2, right: Vec2, spin: Spin, h: f32) -> Node {
        let r = 1.05 * h / 2.0;
        let start = 0.75 * PI;
        let u = Vec2::from_angle(start) * r;
        let mirror = |v: Vec2| Vec2::new(-v.x, v.y);
        let (a, b) = (right + u, left + mirror(u));
        let (c, d) = (left - u, right - mirror(u));

        let edge = |n: Node| n.stroke(palette::GREY_D, 1.0);
        let right_edge = edge(Node::arc(right, r, -start, -FRAC_PI_2));
        let left_edge = edge(Node::arc(left, r, PI - start, -FRAC_PI_2));
        let mut outline = right_edge.outline();
        outline.extend(left_edge.outline());
        let plate = Node::polygon(outline).no_stroke().fill(palette::GREY_D, 0.9);

        // The upper arrow points right and rides on the run moving that way.
        let gap = (right.x - left.x) / 2.0;
        let offset = Vec2::DOWN * (spin.sign() * h / 6.0);
        let arrow = |from: Vec2, to: Vec2| {
            let tip = (h / 6.0) / from.distance(to).max(f32::EPSILON);
            Node::arrow_with_ratio(from, to, tip)
                .color(palette::GREY_A)
                .stroke_width(2.0 * h)
        };
        let upper = arrow(
            right + Vec2::LEFT * (gap - r / 3.0) + offset,
            right + Vec2::LEFT * (1.2 * r) + offset,
        );
        let lower = arrow(
            left + Vec2::RIGHT * (gap - r / 3.0) - offset,
            left + Vec2::RIGHT * (1.2 * r) - offset,
        );

        Node::group(vec![
            right_edge,
            edge(Node::line(a, b)),
            left_edge,
            edge(Node::line(c, d)),
            plate,
            upper,
            lower,
        ])
    }

    #[inline]
    pub fn spin(&self) -> Spin {
        self.spin
    }

    pub fn left_pulley(&self) -> Vec2 {
        self.node.child(Self::LEFT_PULLEY).map(Node::center).unwrap_or_default()
    }

    pub fn right_pulley(&self) -> Vec2 {
        self.node.child(Self::RIGHT_PULLEY).map(Node::center).unwrap_or_default()
    }

    /// Turns both pulleys `turns` times and flashes the direction arrows.
    pub fn move_belt(&mut self, turns: f32, run_time: f32) -> Vec<Animation> {
        let angle = self.spin.sign() * turns * TAU;
        let rotate = |index: usize, about: Vec2| {
            Animation::rotate(vec![NodePath::from([index])], angle, Some(about)).run_time(run_time)
        };
        let indicate = |index: usize| Animation::Indicate {
            targets: vec![NodePath::from([Self::FRAME, index])],
            scale_factor: 1.05,
            color: palette::ALERT_RED,
            run_time,
        };
        let anims = vec![
            rotate(Self::LEFT_PULLEY, self.left_pulley()),
            rotate(Self::RIGHT_PULLEY, self.right_pulley()),
            indicate(5),
            indicate(6),
        ];
        self.commit(anims)
    }
}

impl Component for ConveyorBelt {
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

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    fn part<'a>(c: &'a ConveyorBelt, path: &[usize]) -> &'a Node {
        c.node().get(&NodePath::from(path.to_vec())).unwrap()
    }

    #[test]
    fn belt_is_a_closed_loop() {
        let c = ConveyorConfig::default().build();
        let belt = part(&c, &[1]).children();
        for i in 0..4 {
            assert!(close(belt[i].end(), belt[(i + 1) % 4].start()), "gap after part {i}");
        }
        assert!(close(c.left_pulley(), Vec2::new(-2.0, 0.0)));
        assert!(close(c.right_pulley(), Vec2::new(2.0, 0.0)));
    }

    #[test]
    fn pulleys_have_eight_holes() {
        let c = ConveyorConfig::default().build();
        assert_eq!(part(&c, &[0]).len(), 2 + 8);
        assert_eq!(part(&c, &[3]).len(), 7);
    }

    #[test]
    fn arrows_follow_the_belt() {
        let cw = ConveyorConfig::default().build();
        let upper = part(&cw, &[3, 5]);
        assert!(upper.end().x > upper.start().x);
        assert!(upper.center().y > 0.0);

        let ccw = ConveyorConfig::default().spin(Spin::CounterClockwise).build();
        assert!(part(&ccw, &[3, 5]).center().y < 0.0);
        assert!(part(&ccw, &[3, 6]).center().y > 0.0);
    }

    #[test]
    fn quarter_turn_moves_the_holes() {
        let mut c = ConveyorConfig::default().build();
        let hub = c.left_pulley();
        let before = part(&c, &[0, 2]).center();
        let anims = c.move_belt(0.25, 2.0);
        assert_eq!(anims.len(), 4);
        assert!(anims.iter().all(|a| a.duration() == 2.0));

        // Clockwise: the hole at 3 o'clock goes to 6 o'clock.
        let after = part(&c, &[0, 2]).center();
        assert!(close(after - hub, (before - hub).rotated(-FRAC_PI_2)));
        assert!(close(c.left_pulley(), hub));
    }
}
