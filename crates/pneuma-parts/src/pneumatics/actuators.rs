use core::f32::consts::{FRAC_PI_2, PI};
use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use pneuma_engine::anim::{Animation, Mutation};
use pneuma_engine::coords::Vec2;
use pneuma_engine::paint::{palette, Color};
use pneuma_engine::scene::{Node, NodePath};

use super::{arc_angle, sign, Side, SHADE_OPACITY};
use crate::component::{commit_to, Component};
use crate::error::ParseError;
use crate::mechanics::spring::{CompressionSpring, SpringConfig, SpringSizing, SpringStyle};

/// Free length of the return spring over the chamber width.
const SPRING_LENGTH_FACTOR: f32 = 1.2;
/// Push button and roller lever shrink or grow by this factor when pressed.
const PRESS_STRETCH: f32 = 2.0;

/// How a directional valve is operated from one side.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ActuatorKind {
    #[default]
    Coil,
    ManualLever,
    PushButton,
    SimpleLever,
    RollerLever,
    CompressionSpring,
    PneumaticSignal,
    /// Bare valve side.
    None,
}

impl ActuatorKind {
    pub const ALL: [ActuatorKind; 8] = [
        ActuatorKind::Coil,
        ActuatorKind::ManualLever,
        ActuatorKind::PushButton,
        ActuatorKind::SimpleLever,
        ActuatorKind::RollerLever,
        ActuatorKind::CompressionSpring,
        ActuatorKind::PneumaticSignal,
        ActuatorKind::None,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ActuatorKind::Coil => "Coil",
            ActuatorKind::ManualLever => "Manual lever",
            ActuatorKind::PushButton => "Push button",
            ActuatorKind::SimpleLever => "Simple lever",
            ActuatorKind::RollerLever => "Roller lever",
            ActuatorKind::CompressionSpring => "Compression spring",
            ActuatorKind::PneumaticSignal => "Pneumatic signal",
            ActuatorKind::None => "None",
        }
    }
}

impl fmt::Display for ActuatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ActuatorKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseError::new(format!("unknown actuator `{s}`")))
    }
}

/// Colours shared by every actuator symbol.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ActuatorStyle {
    pub stroke_color: Color,
    pub fill_color: Color,
    /// Fill of a pressed or signalled actuator.
    pub active_color: Color,
}

impl Default for ActuatorStyle {
    fn default() -> Self {
        Self {
            stroke_color: palette::GREY_E,
            fill_color: palette::GREY_A,
            active_color: palette::ALERT_RED,
        }
    }
}

/// Operating device on one side of a directional valve.
///
/// The actuator does not own its drawing: the valve embeds the node returned
/// by [`draw`](Self::draw) in its own tree and hands that subtree back to
/// [`actuate`](Self::actuate). Paths in the returned animations are relative
/// to the actuator subtree.
///
/// Node layouts by kind:
/// - coil: `[body, winding]`
/// - manual lever: `[4 body edges, shade, lever, knob]`
/// - push button: `[button, stem, top stop, bottom stop]`
/// - simple lever: `[3 edges, cam, shade, cam shade]`
/// - roller lever: `[3 edges, cam, shade, roller, axle]`
/// - compression spring: one node per coil
/// - pneumatic signal: `[pilot line, triangle, stub]`
#[derive(Debug, Clone)]
pub struct Actuator {
    kind: ActuatorKind,
    side: Side,
    anchor: Vec2,
    size: f32,
    style: ActuatorStyle,
    spring: Option<CompressionSpring>,
    signalled: bool,
}

impl Actuator {
    /// `anchor` is the lower outer corner of the valve on `side`; `size` is
    /// the chamber side.
    pub fn new(kind: ActuatorKind, side: Side, anchor: Vec2, size: f32, style: ActuatorStyle) -> Self {
        let spring = (kind == ActuatorKind::CompressionSpring).then(|| {
            SpringConfig::new(size / 3.0, SpringSizing::ByHeight(SPRING_LENGTH_FACTOR * size))
                .coils(10)
                .angle(FRAC_PI_2 * side.sign())
                .color(palette::BLACK)
                .style(SpringStyle { geometric_ratio: 1.0 / 80.0, ..SpringStyle::default() })
                .build()
        });
        log::debug!("{kind} actuator on the {side:?} side");
        Self { kind, side, anchor, size, style, spring, signalled: false }
    }

    #[inline]
    pub fn kind(&self) -> ActuatorKind {
        self.kind
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Whether a pneumatic signal is currently applied.
    #[inline]
    pub fn is_signalled(&self) -> bool {
        self.signalled
    }

    #[inline]
    fn stroke_width(&self) -> f32 {
        2.0 * self.size
    }

    fn edge(&self, from: Vec2, to: Vec2) -> Node {
        Node::line(from, to).stroke(self.style.stroke_color, self.stroke_width())
    }

    fn shade(&self, points: Vec<Vec2>) -> Node {
        Node::polygon(points)
            .stroke(self.style.stroke_color, 0.0)
            .fill(self.style.fill_color, SHADE_OPACITY)
    }

    fn body(&self, node: Node) -> Node {
        node.stroke(self.style.stroke_color, self.stroke_width())
            .fill(self.style.fill_color, SHADE_OPACITY)
    }

    /// Symbol in its rest pose.
    pub fn draw(&self) -> Node {
        let node = match self.kind {
            ActuatorKind::Coil => self.draw_coil(),
            ActuatorKind::ManualLever => self.draw_manual_lever(),
            ActuatorKind::PushButton => self.draw_push_button(),
            ActuatorKind::SimpleLever => self.draw_simple_lever(),
            ActuatorKind::RollerLever => self.draw_roller_lever(),
            ActuatorKind::CompressionSpring => self.draw_spring(),
            ActuatorKind::PneumaticSignal => self.draw_signal(),
            ActuatorKind::None => Node::empty(),
        };
        node.shifted(self.anchor)
    }

    fn draw_coil(&self) -> Node {
        let (w, h) = (self.size, self.size);
        let s = self.side.dir();
        let body = self.body(Node::rect(s * (w / 2.0) + Vec2::UP * (h / 4.0), w, h / 2.0));
        let winding = Node::line(body.top() - s * (w / 8.0), body.bottom() + s * (w / 8.0))
            .stroke(palette::BLACK, self.stroke_width());
        Node::group(vec![body, winding])
    }

    fn draw_manual_lever(&self) -> Node {
        let (w, h) = (self.size, self.size);
        let s = self.side.dir();
        let (a, b, c) = (4.0 / 7.0, 4.0 / 5.0, 1.0 / 10.0);
        let r = h / 8.0;
        let tilt = PI / 12.0;
        let (sin, cos) = tilt.sin_cos();
        let tg = tilt.tan();

        let p0 = s * ((a + c * tg) * w) + Vec2::UP * (h * c);
        let p1 = s * ((a + (0.25 + c) * tg) * w) + Vec2::UP * ((c + 0.25) * h);
        let p2 = p1 - s * ((a + (0.25 + c) * tg) * w);
        let p3 = p2 + Vec2::DOWN * (h / 4.0);

        let lever_foot = s * (a * w);
        let lever_tip = s * ((a + b * sin) * h) + Vec2::UP * (cos * b * h);
        let knob = s * (a * w + sin * (b * h + r)) + Vec2::UP * (cos * (b * h + r));

        Node::group(vec![
            self.edge(p0, p1),
            self.edge(p1, p2),
            self.edge(p2, p3),
            self.edge(p3, p0),
            self.shade(vec![p0, p1, p2, p3]),
            self.edge(lever_foot, lever_tip),
            self.body(Node::circle(knob, r)),
        ])
    }

    fn draw_push_button(&self) -> Node {
        let (w, h) = (self.size, self.size);
        let s = self.side.dir();
        let button = self.body(Node::rect(s * (w / 2.0) + Vec2::UP * (h / 4.0), w, h / 4.0));
        let stem_center = s * (w / 2.0) + button.center();
        let top = stem_center + Vec2::UP * (h / 4.0);
        let bottom = stem_center + Vec2::DOWN * (h / 4.0);
        Node::group(vec![
            button,
            self.edge(top, bottom),
            self.edge(top, top - s * (w / 4.0)),
            self.edge(bottom, bottom - s * (w / 4.0)),
        ])
    }

    /// Three edges of the lever frame followed by the cam arc. `radius` is
    /// signed as in [`arc_angle`].
    fn lever_frame(&self, radius: f32) -> (Vec<Node>, Vec<Vec2>) {
        let (w, h) = (self.size, self.size);
        let s = self.side.dir();
        let (a, b) = (1.0 / 10.0, 1.0 / 4.0);
        let low = Vec2::UP * (a * h);
        let high = Vec2::UP * ((a + b) * h);
        let starts = vec![low + s * w, low, high, high + s * w];
        let cam = Node::arc_between(high + s * w, low + s * w, arc_angle(b * h / 2.0, radius))
            .stroke(self.style.stroke_color, self.stroke_width());
        let nodes = vec![
            self.edge(low + s * w, low),
            self.edge(low, high),
            self.edge(high, high + s * w),
            cam,
        ];
        (nodes, starts)
    }

    fn draw_simple_lever(&self) -> Node {
        let h = self.size;
        let (mut nodes, starts) = self.lever_frame(-h / 8.0 * self.side.sign());
        let cam_outline = nodes[3].outline();
        nodes.push(self.shade(starts));
        nodes.push(self.shade(cam_outline));
        Node::group(nodes)
    }

    fn draw_roller_lever(&self) -> Node {
        let (w, h) = (self.size, self.size);
        let s = self.side.dir();
        let (a, b) = (1.0 / 10.0, 1.0 / 4.0);
        let r = b * h * 2.0 / 3.0;
        let (mut nodes, starts) = self.lever_frame(r * self.side.sign());
        nodes.push(self.shade(starts));
        let center = s * (w + r * 2.0 / 3.0) + Vec2::UP * ((a + b / 2.0) * h);
        nodes.push(self.body(Node::circle(center, r)));
        nodes.push(Node::dot(center, h * a * 2.0 / 3.0));
        Node::group(nodes)
    }

    fn draw_spring(&self) -> Node {
        let Some(spring) = &self.spring else {
            return Node::empty();
        };
        let d_ext = self.size / 3.0;
        spring
            .node()
            .clone()
            .shifted(self.side.dir() * spring.length() + Vec2::UP * (d_ext / 2.0))
    }

    fn draw_signal(&self) -> Node {
        let h = self.size;
        let s = self.side.dir();
        let sw = self.stroke_width();
        let rotation = match self.side {
            Side::Left => PI / 6.0,
            Side::Right => PI / 6.0 + PI,
        };
        let pilot = self.edge(Vec2::ORIGIN, s * (h / 3.0));
        let triangle = Node::triangle(Vec2::ORIGIN, h / 5.0)
            .stroke(palette::BLACK, sw)
            .fill(self.style.fill_color, SHADE_OPACITY)
            .rotated(rotation)
            .placed_next_to(pilot.bounds(), s, 0.0);
        let stub = Node::line(Vec2::ORIGIN, s * (h / 6.0))
            .stroke(palette::BLACK, sw)
            .placed_next_to(triangle.bounds(), s, 0.0);
        Node::group(vec![pilot, triangle, stub]).shifted(Vec2::UP * (h / 3.0))
    }

    /// A button or roller driving the slide away from its side is highlighted.
    fn press_fill(&self, towards: f32) -> Color {
        if towards < 0.0 { self.style.active_color } else { self.style.fill_color }
    }

    /// Animations accompanying a valve slide by one chamber in `motion`
    /// (`LEFT` or `RIGHT`). Committed to `node`, the actuator subtree.
    pub fn actuate(&mut self, node: &mut Node, motion: Vec2, run_time: f32) -> Vec<Animation> {
        let w = self.size;
        // Positive when the slide moves towards this side.
        let towards = sign(self.side.sign() * motion.x);
        let anims = match self.kind {
            ActuatorKind::PushButton => {
                let fill = self.press_fill(towards);
                vec![
                    Animation::mutate([0])
                        .with(Mutation::Shift(motion * (1.25 * w)))
                        .with(Mutation::SetFillColor(fill))
                        .with(Mutation::stretch(PRESS_STRETCH.powf(towards), Vec2::RIGHT)),
                    Animation::mutate_all(paths(1..4))
                        .with(Mutation::Shift(motion * (1.5 * w)))
                        .with(Mutation::SetFillColor(fill)),
                ]
            }
            ActuatorKind::RollerLever => {
                let fill = self.press_fill(towards);
                let stretch = Mutation::stretch(PRESS_STRETCH.powf(towards), Vec2::RIGHT);
                let near = Mutation::Shift(motion * (1.25 * w));
                let far = Mutation::Shift(motion * ((1.25 + 0.5 / PRESS_STRETCH) * w));
                vec![
                    Animation::mutate_all(paths(0..3)).with(near.clone()).with(stretch.clone()),
                    Animation::mutate([3]).with(far.clone()),
                    Animation::mutate([4]).with(near).with(stretch),
                    Animation::mutate([5]).with(far.clone()).with(Mutation::SetFillColor(fill)),
                    Animation::mutate([6]).with(far),
                ]
            }
            ActuatorKind::CompressionSpring => self.spring_compression(towards),
            ActuatorKind::PneumaticSignal => {
                let color = self.toggle_signal();
                let shift = Mutation::Shift(motion * w);
                vec![
                    Animation::mutate([0]).with(shift.clone()),
                    Animation::mutate([1]).with(shift.clone()).with(Mutation::SetColor(color)),
                    Animation::mutate([2]).with(shift),
                ]
            }
            ActuatorKind::None => Vec::new(),
            ActuatorKind::Coil | ActuatorKind::ManualLever | ActuatorKind::SimpleLever => {
                vec![Animation::mutate(NodePath::root()).with(Mutation::Shift(motion * w))]
            }
        };
        let anims = anims.into_iter().map(|a| a.run_time(run_time)).collect();
        commit_to(node, anims)
    }

    /// Puts the subtree in its pressed pose without animating, for valves
    /// drawn already switched. Levers and coils have no pressed pose.
    pub fn pre_actuate(&mut self, node: &mut Node) {
        let w = self.size;
        let side = self.side.sign();
        let squeeze = Mutation::stretch(1.0 / PRESS_STRETCH, Vec2::RIGHT);
        let anims = match self.kind {
            ActuatorKind::PushButton => vec![
                Animation::mutate([0])
                    .with(Mutation::Shift(Vec2::LEFT * (side * w / 4.0)))
                    .with(Mutation::SetFillColor(self.style.active_color))
                    .with(squeeze),
                Animation::mutate_all(paths(1..4)).with(Mutation::Shift(Vec2::LEFT * (side * w / 2.0))),
            ],
            ActuatorKind::RollerLever => {
                let near = Mutation::Shift(Vec2::LEFT * (side * w / 4.0));
                let far = Mutation::Shift(Vec2::LEFT * (side * (0.25 + 0.5 / PRESS_STRETCH) * w));
                vec![
                    Animation::mutate_all(paths(0..3)).with(near.clone()).with(squeeze.clone()),
                    Animation::mutate([3]).with(far.clone()),
                    Animation::mutate([4]).with(near).with(squeeze),
                    Animation::mutate([5])
                        .with(far.clone())
                        .with(Mutation::SetFillColor(self.style.active_color)),
                    Animation::mutate([6]).with(far),
                ]
            }
            ActuatorKind::CompressionSpring => {
                let mut anims = vec![Animation::mutate(NodePath::root()).with(Mutation::Shift(-self.side.dir() * w))];
                anims.extend(self.spring_compression(1.0));
                anims
            }
            ActuatorKind::PneumaticSignal => {
                self.signalled = true;
                vec![Animation::mutate([1]).with(Mutation::SetColor(self.style.active_color))]
            }
            ActuatorKind::Coil | ActuatorKind::ManualLever | ActuatorKind::SimpleLever | ActuatorKind::None => {
                log::debug!("{} actuator has no pressed pose", self.kind);
                Vec::new()
            }
        };
        commit_to(node, anims);
    }

    /// Compresses (`k > 0`) or releases the spring by one chamber of travel.
    fn spring_compression(&self, k: f32) -> Vec<Animation> {
        let Some(spring) = &self.spring else {
            return Vec::new();
        };
        let fraction = k * (self.size / SPRING_LENGTH_FACTOR + 4.0 * spring.wire_diameter()) / self.size;
        spring.compression(fraction, Vec2::ORIGIN)
    }

    /// Colour for the signal triangle after toggling, and the toggle itself.
    fn toggle_signal(&mut self) -> Color {
        let color = if self.signalled { self.style.fill_color } else { self.style.active_color };
        self.signalled = !self.signalled;
        color
    }
}

fn paths(range: core::ops::Range<usize>) -> Vec<NodePath> {
    range.map(|i| NodePath::from([i])).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const H: f32 = 2.0;

    fn actuator(kind: ActuatorKind, side: Side) -> (Actuator, Node) {
        let anchor = side.dir() * H + Vec2::DOWN * (H / 2.0);
        let a = Actuator::new(kind, side, anchor, H, ActuatorStyle::default());
        let node = a.draw();
        (a, node)
    }

    fn fill_of(node: &Node, i: usize) -> Color {
        node.children()[i].style().map(|s| s.fill.color).unwrap_or_default()
    }

    // ── parsing ───────────────────────────────────────────────────────────

    #[test]
    fn names_round_trip() {
        for kind in ActuatorKind::ALL {
            assert_eq!(kind.name().parse::<ActuatorKind>(), Ok(kind));
        }
        assert_eq!("push BUTTON".parse::<ActuatorKind>(), Ok(ActuatorKind::PushButton));
        assert!("Hydraulic ram".parse::<ActuatorKind>().is_err());
    }

    // ── drawing ───────────────────────────────────────────────────────────

    #[test]
    fn layouts_have_documented_parts() {
        let count = |k| actuator(k, Side::Left).1.len();
        assert_eq!(count(ActuatorKind::Coil), 2);
        assert_eq!(count(ActuatorKind::ManualLever), 7);
        assert_eq!(count(ActuatorKind::PushButton), 4);
        assert_eq!(count(ActuatorKind::SimpleLever), 6);
        assert_eq!(count(ActuatorKind::RollerLever), 7);
        assert_eq!(count(ActuatorKind::CompressionSpring), 10);
        assert_eq!(count(ActuatorKind::PneumaticSignal), 3);
        assert!(count(ActuatorKind::None) == 0);
    }

    #[test]
    fn symbols_stay_outside_the_valve() {
        for kind in [ActuatorKind::Coil, ActuatorKind::PushButton, ActuatorKind::CompressionSpring] {
            let (_, left) = actuator(kind, Side::Left);
            assert!(left.bounds().max().x <= -H + 1e-3, "{kind} crosses the valve");
            let (_, right) = actuator(kind, Side::Right);
            assert!(right.bounds().min().x >= H - 1e-3, "{kind} crosses the valve");
        }
    }

    #[test]
    fn spring_free_end_touches_the_valve() {
        let (_, node) = actuator(ActuatorKind::CompressionSpring, Side::Right);
        assert!((node.bounds().min().x - H).abs() < 0.1);
    }

    // ── actuation ─────────────────────────────────────────────────────────

    #[test]
    fn spring_travel_is_a_share_of_its_free_length() {
        let (a, _) = actuator(ActuatorKind::CompressionSpring, Side::Right);
        let Some(spring) = a.spring.as_ref() else { panic!("spring actuator without spring") };
        let share = (H / SPRING_LENGTH_FACTOR + 4.0 * spring.wire_diameter()) / H;
        assert!(share < 1.0);
        assert_eq!(a.spring_compression(1.0), spring.compression(share, Vec2::ORIGIN));
        assert_eq!(a.spring_compression(-1.0), spring.compression(-share, Vec2::ORIGIN));
    }

    #[test]
    fn push_button_press_and_release() {
        let (mut a, mut node) = actuator(ActuatorKind::PushButton, Side::Left);
        let width = node.children()[0].width();

        let anims = a.actuate(&mut node, Vec2::RIGHT, 0.5);
        assert_eq!(anims.len(), 2);
        assert!(anims.iter().all(|x| x.duration() == 0.5));
        assert!((node.children()[0].width() - width / 2.0).abs() < 1e-3);
        assert_eq!(fill_of(&node, 0), palette::ALERT_RED);

        a.actuate(&mut node, Vec2::LEFT, 0.5);
        assert!((node.children()[0].width() - width).abs() < 1e-3);
        assert_eq!(fill_of(&node, 0), palette::GREY_A);
    }

    #[test]
    fn roller_lever_press_and_release() {
        let (mut a, mut node) = actuator(ActuatorKind::RollerLever, Side::Right);
        let roller = node.children()[5].center();

        a.actuate(&mut node, Vec2::LEFT, 1.0);
        assert_eq!(fill_of(&node, 5), palette::ALERT_RED);

        a.actuate(&mut node, Vec2::RIGHT, 1.0);
        assert_eq!(fill_of(&node, 5), palette::GREY_A);
        assert!((node.children()[5].center() - roller).length() < 1e-4);
    }

    #[test]
    fn spring_compresses_when_pushed() {
        let (mut a, mut node) = actuator(ActuatorKind::CompressionSpring, Side::Right);
        let free = node.width();
        a.actuate(&mut node, Vec2::RIGHT, 1.0);
        let pressed = node.width();
        assert!(pressed < free - 0.5 * H, "{free} -> {pressed}");
        a.actuate(&mut node, Vec2::LEFT, 1.0);
        assert!((node.width() - free).abs() < 1e-3);
    }

    #[test]
    fn pneumatic_signal_toggles_colour() {
        let (mut a, mut node) = actuator(ActuatorKind::PneumaticSignal, Side::Left);
        a.actuate(&mut node, Vec2::RIGHT, 1.0);
        assert!(a.is_signalled());
        assert_eq!(fill_of(&node, 1), palette::ALERT_RED);
        a.actuate(&mut node, Vec2::LEFT, 1.0);
        assert!(!a.is_signalled());
        assert_eq!(fill_of(&node, 1), palette::GREY_A);
    }

    #[test]
    fn coil_translates_by_one_chamber() {
        let (mut a, mut node) = actuator(ActuatorKind::Coil, Side::Left);
        let before = node.center();
        a.actuate(&mut node, Vec2::RIGHT, 1.0);
        assert!((node.center() - (before + Vec2::RIGHT * H)).length() < 1e-4);
    }

    #[test]
    fn pre_actuated_push_button_is_pressed() {
        let (mut a, mut node) = actuator(ActuatorKind::PushButton, Side::Left);
        let width = node.children()[0].width();
        a.pre_actuate(&mut node);
        assert!((node.children()[0].width() - width / 2.0).abs() < 1e-3);
        assert_eq!(fill_of(&node, 0), palette::ALERT_RED);
        // Still flush with the valve body.
        assert!((node.children()[0].bounds().max().x + H).abs() < 1e-3);
    }
}
