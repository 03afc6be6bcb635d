use core::f32::consts::PI;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use pneuma_engine::anim::{Animation, Mutation};
use pneuma_engine::coords::Vec2;
use pneuma_engine::paint::{palette, Color};
use pneuma_engine::scene::{Node, NodePath};

use super::actuators::{Actuator, ActuatorKind, ActuatorStyle};
use super::Side;
use crate::component::Component;
use crate::error::ParseError;

/// Flow paths of the middle chamber of a 5/3 valve.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CenterMode {
    /// Outputs vented, supply blocked.
    #[default]
    Open,
    /// Every port blocked.
    Closed,
    /// Supply fed to both outputs.
    Pressure,
}

impl FromStr for CenterMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" | "center open" => Ok(CenterMode::Open),
            "closed" | "center closed" => Ok(CenterMode::Closed),
            "pressure" | "center pressure" => Ok(CenterMode::Pressure),
            other => Err(ParseError::new(format!("unknown centre configuration `{other}`"))),
        }
    }
}

/// Port count / switching positions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValveFamily {
    FiveTwo,
    FiveThree(CenterMode),
    ThreeTwo,
}

impl ValveFamily {
    #[inline]
    pub fn chamber_count(self) -> usize {
        match self {
            ValveFamily::FiveThree(_) => 3,
            ValveFamily::FiveTwo | ValveFamily::ThreeTwo => 2,
        }
    }

    fn ports(self) -> &'static [Port] {
        match self {
            ValveFamily::ThreeTwo => &THREE_PORTS,
            ValveFamily::FiveTwo | ValveFamily::FiveThree(_) => &FIVE_PORTS,
        }
    }

    /// Links of each chamber, left to right.
    fn chambers(self) -> Vec<&'static [Link]> {
        match self {
            ValveFamily::FiveTwo => vec![FIVE_LEFT, FIVE_RIGHT],
            ValveFamily::FiveThree(CenterMode::Open) => vec![FIVE_LEFT, CENTER_OPEN, FIVE_RIGHT],
            ValveFamily::FiveThree(CenterMode::Closed) => vec![FIVE_LEFT, CENTER_CLOSED, FIVE_RIGHT],
            ValveFamily::FiveThree(CenterMode::Pressure) => vec![FIVE_LEFT, CENTER_PRESSURE, FIVE_RIGHT],
            ValveFamily::ThreeTwo => vec![THREE_LEFT, THREE_RIGHT],
        }
    }
}

const FIVE_LEFT: &[Link] = &[Link::Flow(1, 4), Link::Flow(2, 3), Link::Blocked(5)];
const FIVE_RIGHT: &[Link] = &[Link::Flow(1, 2), Link::Flow(4, 5), Link::Blocked(3)];
const CENTER_OPEN: &[Link] = &[Link::Flow(5, 4), Link::Blocked(1), Link::Flow(3, 2)];
const CENTER_CLOSED: &[Link] = &[
    Link::Blocked(1),
    Link::Blocked(2),
    Link::Blocked(3),
    Link::Blocked(4),
    Link::Blocked(5),
];
const CENTER_PRESSURE: &[Link] = &[Link::Blocked(3), Link::Blocked(5), Link::Manifold([4, 2], 1)];
const THREE_LEFT: &[Link] = &[Link::Flow(1, 2), Link::Blocked(3)];
const THREE_RIGHT: &[Link] = &[Link::Blocked(1), Link::Flow(2, 3)];

/// Port on a chamber, in chamber-size units from its centre.
struct Port {
    offset: Vec2,
    /// Rotation of a blocking stub drawn on the port.
    stub_angle: f32,
    label_dir: Vec2,
}

// ISO/FESTO numbering on a five-port chamber:
//
//   |  4       2  |
//   |             |
//   |  5   1   3  |
const FIVE_PORTS: [Port; 5] = [
    Port { offset: Vec2::new(0.0, -0.5), stub_angle: 0.0, label_dir: Vec2::DR },
    Port { offset: Vec2::new(0.25, 0.5), stub_angle: PI, label_dir: Vec2::UR },
    Port { offset: Vec2::new(0.25, -0.5), stub_angle: 0.0, label_dir: Vec2::DR },
    Port { offset: Vec2::new(-0.25, 0.5), stub_angle: PI, label_dir: Vec2::UL },
    Port { offset: Vec2::new(-0.25, -0.5), stub_angle: 0.0, label_dir: Vec2::DL },
];

const THREE_PORTS: [Port; 3] = [
    Port { offset: Vec2::new(-0.25, -0.5), stub_angle: 0.0, label_dir: Vec2::DL },
    Port { offset: Vec2::new(-0.25, 0.5), stub_angle: PI, label_dir: Vec2::UL },
    Port { offset: Vec2::new(0.25, -0.5), stub_angle: 0.0, label_dir: Vec2::DR },
];

/// Connection drawn inside a chamber; port numbers start at 1.
#[derive(Debug, Copy, Clone)]
enum Link {
    /// Air flows from the first port to the second.
    Flow(usize, usize),
    /// Port closed by a "T" stub.
    Blocked(usize),
    /// Both outputs fed from one inlet.
    Manifold([usize; 2], usize),
}

/// Shared look of directional valves.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ValveStyle {
    pub stroke_color: Color,
    pub fill_color: Color,
    pub chamber_opacity: f32,
    /// Blocking stub half-width over chamber size.
    pub stub_ratio: f32,
    pub actuator: ActuatorStyle,
}

impl Default for ValveStyle {
    fn default() -> Self {
        Self {
            stroke_color: palette::GREY_E,
            fill_color: palette::GREY_A,
            chamber_opacity: 0.5,
            stub_ratio: 1.0 / 10.0,
            actuator: ActuatorStyle::default(),
        }
    }
}

/// Parameters of a [`DirectionalValve`].
///
/// ```rust,ignore
/// let valve = ValveConfig::new(ValveFamily::FiveTwo)
///     .height(1.0)
///     .actuators(ActuatorKind::PushButton, ActuatorKind::CompressionSpring)
///     .build();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ValveConfig {
    family: ValveFamily,
    height: f32,
    left: ActuatorKind,
    right: ActuatorKind,
    labels: bool,
    actuated: bool,
    style: ValveStyle,
}

impl ValveConfig {
    pub fn new(family: ValveFamily) -> Self {
        Self { family, ..Self::default() }
    }

    pub fn height(mut self, v: f32) -> Self { self.height = v; self }
    pub fn actuators(mut self, left: ActuatorKind, right: ActuatorKind) -> Self {
        self.left = left;
        self.right = right;
        self
    }
    /// Writes the port numbers inside every chamber.
    pub fn labels(mut self, v: bool) -> Self { self.labels = v; self }
    /// Draws the actuators already pressed.
    pub fn actuated(mut self, v: bool) -> Self { self.actuated = v; self }
    pub fn style(mut self, v: ValveStyle) -> Self { self.style = v; self }

    pub fn build(self) -> DirectionalValve {
        DirectionalValve::new(self)
    }
}

impl Default for ValveConfig {
    fn default() -> Self {
        Self {
            family: ValveFamily::FiveTwo,
            height: 2.0,
            left: ActuatorKind::Coil,
            right: ActuatorKind::CompressionSpring,
            labels: false,
            actuated: false,
            style: ValveStyle::default(),
        }
    }
}

/// Directional control valve symbol.
///
/// Node layout: `[left actuator, chambers (left to right)…, right actuator]`.
#[derive(Debug, Clone)]
pub struct DirectionalValve {
    node: Node,
    family: ValveFamily,
    size: f32,
    left: Actuator,
    right: Actuator,
    offset: i32,
}

impl DirectionalValve {
    fn new(cfg: ValveConfig) -> Self {
        let h = cfg.height;
        let n = cfg.family.chamber_count();
        let half_span = h * n as f32 / 2.0;

        let mut left = Actuator::new(cfg.left, Side::Left, Vec2::new(-half_span, -h / 2.0), h, cfg.style.actuator);
        let mut right = Actuator::new(cfg.right, Side::Right, Vec2::new(half_span, -h / 2.0), h, cfg.style.actuator);

        let mut children = Vec::with_capacity(n + 2);
        let mut left_node = left.draw();
        if cfg.actuated {
            left.pre_actuate(&mut left_node);
        }
        children.push(left_node);
        for (i, links) in cfg.family.chambers().into_iter().enumerate() {
            let center = Vec2::new(-half_span + h * (i as f32 + 0.5), 0.0);
            children.push(chamber(&cfg, links).shifted(center));
        }
        let mut right_node = right.draw();
        if cfg.actuated {
            right.pre_actuate(&mut right_node);
        }
        children.push(right_node);

        log::debug!(
            "{:?} valve: {} | {}, height {h}",
            cfg.family,
            left.kind(),
            right.kind()
        );
        Self { node: Node::group(children), family: cfg.family, size: h, left, right, offset: 0 }
    }

    #[inline]
    pub fn family(&self) -> ValveFamily {
        self.family
    }

    #[inline]
    pub fn chamber_count(&self) -> usize {
        self.family.chamber_count()
    }

    /// Index of the rightmost chamber.
    #[inline]
    pub fn right_chamber(&self) -> usize {
        self.chamber_count() - 1
    }

    /// Net number of chamber widths slid to the right.
    #[inline]
    pub fn offset(&self) -> i32 {
        self.offset
    }

    pub fn left_actuator(&self) -> &Actuator {
        &self.left
    }

    pub fn right_actuator(&self) -> &Actuator {
        &self.right
    }

    /// Chamber subtree: `[body, links…, labels…]`.
    pub fn chamber(&self, index: usize) -> Option<&Node> {
        if index < self.chamber_count() {
            self.node.child(index + 1)
        } else {
            None
        }
    }

    /// Position of port `port` (1-based ISO number) on chamber `index`.
    pub fn port(&self, index: usize, port: usize) -> Option<Vec2> {
        let body = self.chamber(index)?.child(0)?;
        let p = self.family.ports().get(port.checked_sub(1)?)?;
        Some(body.center() + p.offset * self.size)
    }

    /// Supply port.
    pub fn port_1(&self, chamber: usize) -> Option<Vec2> {
        self.port(chamber, 1)
    }

    pub fn port_3(&self, chamber: usize) -> Option<Vec2> {
        self.port(chamber, 3)
    }

    /// Second exhaust; five-port valves only.
    pub fn port_5(&self, chamber: usize) -> Option<Vec2> {
        self.port(chamber, 5)
    }

    /// Slides the chambers by one width towards `motion` (`LEFT` or
    /// `RIGHT`); each actuator follows according to its kind.
    pub fn slide(&mut self, motion: Vec2, run_time: f32) -> Vec<Animation> {
        let last = self.chamber_count() + 1;
        let mut anims = Vec::new();
        for (index, actuator) in [(0, &mut self.left), (last, &mut self.right)] {
            let Some(sub) = self.node.child_mut(index) else {
                log::error!("valve actuator {index} missing");
                continue;
            };
            let prefix = NodePath::from([index]);
            anims.extend(actuator.actuate(sub, motion, run_time).iter().map(|a| a.prefixed(&prefix)));
        }

        let chambers = (1..last).map(|i| NodePath::from([i])).collect();
        let body = Animation::mutate_all(chambers)
            .with(Mutation::Shift(motion * self.size))
            .run_time(run_time);
        anims.extend(self.commit(vec![body]));

        self.offset += super::sign(motion.x) as i32;
        anims
    }
}

impl Component for DirectionalValve {
    fn node(&self) -> &Node {
        &self.node
    }

    fn node_mut(&mut self) -> &mut Node {
        &mut self.node
    }
}

fn chamber(cfg: &ValveConfig, links: &[Link]) -> Node {
    let h = cfg.height;
    let sw = 2.0 * h;
    let ports = cfg.family.ports();
    let at = |port: usize| ports.get(port.wrapping_sub(1)).map(|p| p.offset * h);

    let mut nodes = vec![Node::square(Vec2::ORIGIN, h)
        .stroke(cfg.style.stroke_color, sw)
        .fill(cfg.style.fill_color, cfg.style.chamber_opacity)];

    for link in links {
        match *link {
            Link::Flow(from, to) => {
                let (Some(a), Some(b)) = (at(from), at(to)) else { continue };
                nodes.push(Node::arrow_with_ratio(a, b, 0.15).stroke(palette::BLACK, sw));
            }
            Link::Blocked(port) => {
                let Some(p) = ports.get(port.wrapping_sub(1)) else { continue };
                let k = h * cfg.style.stub_ratio;
                let top = Vec2::UP * (2.0 * k);
                let stub = Node::group(vec![
                    Node::line(Vec2::ORIGIN, top),
                    Node::line(top + Vec2::LEFT * k, top + Vec2::RIGHT * k),
                ])
                .stroke(palette::BLACK, sw)
                .rotated_about(p.stub_angle, Vec2::ORIGIN)
                .shifted(p.offset * h);
                nodes.push(stub);
            }
            Link::Manifold([out_a, out_b], inlet) => {
                let (Some(a), Some(b), Some(inlet)) = (at(out_a), at(out_b), at(inlet)) else { continue };
                let drop = Vec2::DOWN * (h / 2.0);
                let bar = Node::line(a + drop, b + drop).stroke(palette::BLACK, 3.0);
                let feed = Node::line(bar.center(), inlet).stroke(palette::BLACK, 3.0);
                nodes.push(Node::group(vec![
                    Node::arrow_with_ratio(a + drop, a, 0.35).stroke(palette::BLACK, 5.0),
                    Node::arrow_with_ratio(b + drop, b, 0.35).stroke(palette::BLACK, 5.0),
                    bar,
                    feed,
                ]));
            }
        }
    }

    if cfg.labels {
        for (i, p) in ports.iter().enumerate() {
            let pos = p.offset * h + p.label_dir * (h / 10.0);
            nodes.push(Node::text((i + 1).to_string(), pos, 0.12 * h));
        }
    }
    Node::group(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-4
    }

    // ── layout ────────────────────────────────────────────────────────────

    #[test]
    fn node_layout_per_family() {
        assert_eq!(ValveConfig::default().build().node().len(), 4);
        let v = ValveConfig::new(ValveFamily::FiveThree(CenterMode::Closed)).build();
        assert_eq!(v.node().len(), 5);
        // Body plus five blocking stubs.
        assert_eq!(v.chamber(1).map(Node::len), Some(6));
        assert_eq!(ValveConfig::new(ValveFamily::ThreeTwo).build().node().len(), 4);
    }

    #[test]
    fn ports_follow_iso_numbering() {
        let v = ValveConfig::default().build();
        assert!(close(v.port_1(1).unwrap_or_default(), Vec2::new(1.0, -1.0)));
        assert!(close(v.port_3(1).unwrap_or_default(), Vec2::new(1.5, -1.0)));
        assert!(close(v.port_5(0).unwrap_or_default(), Vec2::new(-1.5, -1.0)));
        assert!(v.port(0, 0).is_none());
        assert!(v.port(2, 1).is_none());
        assert!(ValveConfig::new(ValveFamily::ThreeTwo).build().port_5(0).is_none());
    }

    #[test]
    fn labels_are_added_once_per_chamber() {
        let plain = ValveConfig::default().build();
        let labelled = ValveConfig::default().labels(true).build();
        let count = |v: &DirectionalValve| v.chamber(0).map(Node::len).unwrap_or(0);
        assert_eq!(count(&labelled), count(&plain) + 5);
    }

    #[test]
    fn five_three_centre_sits_on_the_origin() {
        let v = ValveConfig::new(ValveFamily::FiveThree(CenterMode::Pressure)).height(1.0).build();
        let c = v.chamber(1).and_then(|c| c.child(0)).map(Node::center).unwrap_or(Vec2::UP);
        assert!(close(c, Vec2::ORIGIN));
        assert!(v.node().children()[0].bounds().max().x <= -1.5 + 1e-3);
    }

    #[test]
    fn centre_mode_parses() {
        assert_eq!("Center pressure".parse::<CenterMode>(), Ok(CenterMode::Pressure));
        assert_eq!("closed".parse::<CenterMode>(), Ok(CenterMode::Closed));
        assert!("half".parse::<CenterMode>().is_err());
    }

    // ── sliding ───────────────────────────────────────────────────────────

    #[test]
    fn slide_moves_chambers_and_ports() {
        let mut v = ValveConfig::new(ValveFamily::FiveTwo)
            .height(1.0)
            .actuators(ActuatorKind::PushButton, ActuatorKind::CompressionSpring)
            .build();
        let before = v.port_1(1).unwrap_or_default();
        let anims = v.slide(Vec2::RIGHT, 1.0);
        // Two push-button parts, ten spring coils, the chambers.
        assert_eq!(anims.len(), 13);
        assert!(anims.iter().take(2).all(|a| a.targets()[0].indices()[0] == 0));
        assert!(close(v.port_1(1).unwrap_or_default(), before + Vec2::RIGHT));
        assert_eq!(v.offset(), 1);

        v.slide(Vec2::LEFT, 1.0);
        assert!(close(v.port_1(1).unwrap_or_default(), before));
        assert_eq!(v.offset(), 0);
    }

    #[test]
    fn actuated_valve_starts_pressed() {
        let v = ValveConfig::default()
            .actuators(ActuatorKind::PushButton, ActuatorKind::Coil)
            .actuated(true)
            .build();
        let fill = v.node().children()[0].children()[0].style().map(|s| s.fill.color);
        assert_eq!(fill, Some(palette::ALERT_RED));
        let coil: Option<Color> = v.node().children()[3].children()[0].style().map(|s| s.fill.color);
        assert_eq!(coil, Some(palette::GREY_A));
    }
}
