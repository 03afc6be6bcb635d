use core::f32::consts::{FRAC_1_SQRT_2, PI, SQRT_2};

use serde::{Deserialize, Serialize};

use pneuma_engine::anim::{Animation, Mutation};
use pneuma_engine::coords::Vec2;
use pneuma_engine::paint::{palette, Color};
use pneuma_engine::scene::{Node, NodePath};

use super::Side;
use crate::component::Component;

/// Position of a check ball.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BallState {
    /// Lifted off the seat, air flows.
    Open,
    /// Pressed on the seat against the flow.
    Closed,
    /// Idle, uncoloured.
    #[default]
    Neutral,
}

/// Shared look of functional valves.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FunctionalStyle {
    pub stroke_color: Color,
    pub fill_color: Color,
    pub body_opacity: f32,
    /// Colour of idle internals.
    pub idle_color: Color,
}

impl Default for FunctionalStyle {
    fn default() -> Self {
        Self {
            stroke_color: palette::GREY_E,
            fill_color: palette::GREY_A,
            body_opacity: 0.5,
            idle_color: palette::BLACK,
        }
    }
}

/// Parameters shared by every functional valve.
///
/// ```rust,ignore
/// let mut choke = FunctionalConfig::new(1.5).flipped(true).one_way();
/// let anims = choke.active_choke(true, palette::BLUE_E);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionalConfig {
    height: f32,
    angle: f32,
    flipped: bool,
    labels: bool,
    style: FunctionalStyle,
    actuated: Option<f32>,
}

impl FunctionalConfig {
    pub fn new(height: f32) -> Self {
        Self { height, ..Self::default() }
    }

    /// Rotation of check valves; logic valves stay horizontal.
    pub fn angle(mut self, v: f32) -> Self { self.angle = v; self }
    /// Mirrors check valves so the flow runs the other way.
    pub fn flipped(mut self, v: bool) -> Self { self.flipped = v; self }
    /// Writes the port numbers next to the ports.
    pub fn labels(mut self, v: bool) -> Self { self.labels = v; self }
    pub fn style(mut self, v: FunctionalStyle) -> Self { self.style = v; self }
    /// Builds logic valves already switched to `position` (`-1` left, `1` right).
    pub fn actuated(mut self, position: f32) -> Self { self.actuated = Some(position); self }

    pub fn one_way(self) -> OneWayFlowControlValve {
        OneWayFlowControlValve::new(self)
    }

    pub fn piloted_check(self) -> PilotedCheckValve {
        PilotedCheckValve::new(self)
    }

    pub fn and_valve(self) -> AndValve {
        AndValve::new(self)
    }

    pub fn or_valve(self) -> OrValve {
        OrValve::new(self)
    }

    #[inline]
    fn stroke_width(&self) -> f32 {
        2.0 * self.height
    }

    fn body(&self, width: f32) -> Node {
        Node::rect(Vec2::ORIGIN, width, self.height)
            .stroke(self.style.stroke_color, self.stroke_width())
            .fill(self.style.fill_color, self.style.body_opacity)
    }

    fn line(&self, from: Vec2, to: Vec2) -> Node {
        Node::line(from, to).stroke(palette::BLACK, self.stroke_width())
    }

    fn label(&self, text: &str, anchor: Vec2, dir: Vec2, buff: f32) -> Node {
        let mut label = Node::text(text, Vec2::ORIGIN, 0.12 * self.height);
        label.next_to_point(anchor, dir, buff);
        label
    }
}

impl Default for FunctionalConfig {
    fn default() -> Self {
        Self {
            height: 2.0,
            angle: 0.0,
            flipped: false,
            labels: false,
            style: FunctionalStyle::default(),
            actuated: None,
        }
    }
}

// ── check ball ────────────────────────────────────────────────────────────

/// Ball pushed off its seat along `seat_dir`; the stem below it keeps its
/// far end and follows the ball.
#[derive(Debug, Clone)]
struct CheckBall {
    ball: usize,
    stem: usize,
    stem_length: f32,
    travel: f32,
    offset: f32,
    seat_dir: Vec2,
    state: BallState,
}

impl CheckBall {
    /// Ball and stem transitions to `state`; the ball always returns to its
    /// seat unless the new state is open.
    fn motion(&mut self, state: BallState, color: Color, opacity: f32) -> [Animation; 2] {
        let target = if state == BallState::Open { self.travel } else { 0.0 };
        let delta = target - self.offset;
        let scale = (self.stem_length - target) / (self.stem_length - self.offset);
        self.offset = target;
        self.state = state;
        [
            Animation::mutate([self.ball])
                .with(Mutation::SetColor(color))
                .with(Mutation::SetFillOpacity(opacity))
                .with(Mutation::Shift(self.seat_dir * delta)),
            Animation::mutate([self.stem])
                .with(Mutation::SetColor(color))
                .with(Mutation::scale(scale))
                .with(Mutation::Shift(self.seat_dir * (delta / 2.0))),
        ]
    }
}

fn indices(range: core::ops::Range<usize>) -> Vec<NodePath> {
    range.map(|i| NodePath::from([i])).collect()
}

// ── one-way flow control valve ────────────────────────────────────────────

/// Adjustable choke in parallel with a check valve.
///
/// Node layout:
/// - `0` body, `1..4` choke branch (port 2 stub, choke line, port 1 stub)
/// - `4`, `5` junction dots
/// - `6..10` check branch (top run, drop, seat cone)
/// - `10` ball, `11` stem, `12` bottom run
/// - `13`, `14` choke arcs, `15` adjustment arrow
/// - `16`, `17` port labels when enabled
#[derive(Debug, Clone)]
pub struct OneWayFlowControlValve {
    node: Node,
    check: CheckBall,
    choke_width: f32,
    idle_color: Color,
}

impl OneWayFlowControlValve {
    fn new(cfg: FunctionalConfig) -> Self {
        let h = cfg.height;
        let w = h;
        let r = h / 15.0;
        let x_l = -w / 4.0;
        let x_r = w / 4.0;
        let third = h / 3.0;

        let mut nodes = vec![
            cfg.body(w),
            cfg.line(Vec2::new(x_l, h / 2.0), Vec2::new(x_l, third)),
            cfg.line(Vec2::new(x_l, third), Vec2::new(x_l, -third)),
            cfg.line(Vec2::new(x_l, -third), Vec2::new(x_l, -h / 2.0)),
            Node::dot(Vec2::new(x_l, third), h / 40.0),
            Node::dot(Vec2::new(x_l, -third), h / 40.0),
            cfg.line(Vec2::new(x_l, third), Vec2::new(x_r, third)),
            cfg.line(Vec2::new(x_r, third), Vec2::new(x_r, SQRT_2 * r)),
        ];
        let apex = Vec2::new(x_r, SQRT_2 * r);
        let spread = (0.5 + SQRT_2) * r;
        nodes.push(cfg.line(apex, apex + Vec2::new(-spread, -r / 2.0)));
        nodes.push(cfg.line(apex, apex + Vec2::new(spread, -r / 2.0)));
        nodes.push(Node::circle(Vec2::new(x_r, 0.0), h / 14.0).stroke(palette::BLACK, cfg.stroke_width()));
        nodes.push(cfg.line(Vec2::new(x_r, -r), Vec2::new(x_r, -third)));
        nodes.push(cfg.line(Vec2::new(x_r, -third), Vec2::new(x_l, -third)));

        let choke = Vec2::new(x_l, 0.0);
        let offset = Vec2::RIGHT * ((1.0 / 3.0 + 1.0 / 20.0) * h);
        nodes.push(Node::arc(choke + offset, third, 5.0 / 6.0 * PI, PI / 3.0).stroke(palette::BLACK, cfg.stroke_width()));
        nodes.push(Node::arc(choke - offset, third, PI / 6.0, -PI / 3.0).stroke(palette::BLACK, cfg.stroke_width()));
        let tilt = Vec2::from_angle(PI / 6.0);
        nodes.push(Node::arrow(choke - tilt * (h / 6.0), choke + tilt * (h / 4.0)).stroke(palette::BLACK, cfg.stroke_width()));

        if cfg.labels {
            let top = nodes[1].start();
            let bottom = nodes[3].end();
            nodes.push(cfg.label("2", top, Vec2::DL, 0.15));
            nodes.push(cfg.label("1", bottom, Vec2::UL, 0.15));
        }

        let mut body = Node::group(nodes);
        body.rotate_about(cfg.angle, Vec2::ORIGIN);
        let mut seat_dir = Vec2::DOWN.rotated(cfg.angle);
        if cfg.flipped {
            // Mirror across the valve's horizontal centre line, then turn the
            // adjustment arrow back up.
            body.flip_about(Vec2::RIGHT.rotated(cfg.angle), Vec2::ORIGIN);
            if let Some(arrow) = body.child_mut(15) {
                arrow.flip(Vec2::RIGHT.rotated(cfg.angle));
            }
            seat_dir = -seat_dir;
        }

        let stem_length = third - r;
        log::debug!("one-way flow control valve, height {h}, flipped {}", cfg.flipped);
        Self {
            node: body,
            check: CheckBall {
                ball: 10,
                stem: 11,
                stem_length,
                travel: 2.0 / 7.0 * stem_length,
                offset: 0.0,
                seat_dir,
                state: BallState::Neutral,
            },
            choke_width: cfg.stroke_width(),
            idle_color: cfg.style.idle_color,
        }
    }

    #[inline]
    pub fn ball_state(&self) -> BallState {
        self.check.state
    }

    /// Highlights the choke branch (`active`) or returns it to idle.
    pub fn active_choke(&mut self, active: bool, color: Color) -> Vec<Animation> {
        let (color, width) = if active {
            (color, 2.0 * self.choke_width)
        } else {
            (self.idle_color, self.choke_width)
        };
        let anims = vec![
            Animation::mutate([2])
                .with(Mutation::SetColor(color))
                .with(Mutation::SetStrokeWidth(width)),
            Animation::mutate_all(indices(13..16)).with(Mutation::SetColor(color)),
        ];
        self.commit(anims)
    }

    /// Moves the check ball and colours the branch the air takes. `color`
    /// is ignored for [`BallState::Neutral`].
    pub fn active_not_return(&mut self, state: BallState, color: Color) -> Vec<Animation> {
        let (color, opacity) = match state {
            BallState::Neutral => (self.idle_color, 0.0),
            BallState::Open | BallState::Closed => (color, 0.3),
        };
        // An open valve colours the whole check branch; a closed one stops at
        // the seat.
        let first = if state == BallState::Closed { 8 } else { 6 };
        let mut targets = vec![NodePath::from([1]), NodePath::from([3]), NodePath::from([12])];
        targets.extend(indices(first..10));

        let mut anims = Vec::from(self.check.motion(state, color, opacity));
        anims.push(Animation::mutate_all(targets).with(Mutation::SetColor(color)));
        self.commit(anims)
    }

    /// Port 2 (outlet of the choke branch).
    pub fn port_2(&self) -> Vec2 {
        self.node.child(1).map(Node::start).unwrap_or_default()
    }

    /// Port 1 (inlet of the choke branch).
    pub fn port_1(&self) -> Vec2 {
        self.node.child(3).map(Node::end).unwrap_or_default()
    }
}

impl Component for OneWayFlowControlValve {
    fn node(&self) -> &Node {
        &self.node
    }

    fn node_mut(&mut self) -> &mut Node {
        &mut self.node
    }
}

// ── piloted check valve ───────────────────────────────────────────────────

/// Check valve that a pilot signal on port 3 can force open.
///
/// Node layout: `0` body, `1` inlet stub, `2`, `3` seat cone, `4` ball,
/// `5` stem, `6`, `7` pilot line, then labels `1`, `2`, `3` when enabled.
#[derive(Debug, Clone)]
pub struct PilotedCheckValve {
    node: Node,
    check: CheckBall,
    idle_color: Color,
}

impl PilotedCheckValve {
    fn new(cfg: FunctionalConfig) -> Self {
        let h = cfg.height;
        let w = h / 1.8;
        let r = h / 10.0;

        let apex = Vec2::UP * (1.5 / 5.0 * h);
        let spread = (0.5 + SQRT_2) * r;
        let ball_center = Vec2::UP * (0.3 * h - (1.0 + FRAC_1_SQRT_2) * r);
        let ball_bottom = ball_center + Vec2::DOWN * r;
        let pilot_start = Vec2::new(-w / 2.0, h / 4.0);
        let pilot_end = pilot_start + Vec2::RIGHT * (h / 8.0);

        let mut nodes = vec![
            cfg.body(w),
            cfg.line(Vec2::UP * (h / 2.0), Vec2::UP * (0.3 * h)),
            cfg.line(apex, apex + Vec2::new(-spread, -spread)),
            cfg.line(apex, apex + Vec2::new(spread, -spread)),
            Node::circle(ball_center, r).stroke(palette::BLACK, cfg.stroke_width()),
            cfg.line(ball_bottom, Vec2::DOWN * (h / 2.0)),
            cfg.line(pilot_start, pilot_end),
        ];
        let cone_center = nodes[2].center();
        nodes.push(cfg.line(pilot_end, cone_center));

        if cfg.labels {
            let (top, bottom) = (nodes[1].top(), nodes[5].bottom());
            nodes.push(cfg.label("1", top, Vec2::UL, 0.05 * h));
            nodes.push(cfg.label("2", bottom, Vec2::DL, 0.05 * h));
            nodes.push(cfg.label("3", pilot_start, Vec2::UL, 0.05 * h));
        }

        let mut body = Node::group(nodes);
        body.rotate_about(cfg.angle, Vec2::ORIGIN);
        if cfg.flipped {
            // Pilot on the other side.
            body.flip_about(Vec2::UP.rotated(cfg.angle), Vec2::ORIGIN);
        }

        let stem_length = ball_bottom.y + h / 2.0;
        log::debug!("piloted check valve, height {h}, flipped {}", cfg.flipped);
        Self {
            node: body,
            check: CheckBall {
                ball: 4,
                stem: 5,
                stem_length,
                travel: 4.0 / 7.0 * (1.2 / 5.0 * h),
                offset: 0.0,
                seat_dir: Vec2::DOWN.rotated(cfg.angle),
                state: BallState::Neutral,
            },
            idle_color: cfg.style.idle_color,
        }
    }

    #[inline]
    pub fn ball_state(&self) -> BallState {
        self.check.state
    }

    pub fn active_not_return(&mut self, state: BallState, color: Color) -> Vec<Animation> {
        let (color, opacity) = match state {
            BallState::Neutral => (self.idle_color, 0.0),
            BallState::Open | BallState::Closed => (color, 0.1),
        };
        let mut anims = Vec::from(self.check.motion(state, color, opacity));
        anims.push(Animation::mutate([1]).with(Mutation::SetColor(color)));
        self.commit(anims)
    }

    /// Port 1, top of the body.
    pub fn port_1(&self) -> Vec2 {
        self.node.child(1).map(Node::start).unwrap_or_default()
    }

    /// Port 3, pilot inlet.
    pub fn port_3(&self) -> Vec2 {
        self.node.child(6).map(Node::start).unwrap_or_default()
    }
}

impl Component for PilotedCheckValve {
    fn node(&self) -> &Node {
        &self.node
    }

    fn node_mut(&mut self) -> &mut Node {
        &mut self.node
    }
}

// ── logic valves ──────────────────────────────────────────────────────────

/// Port stubs on the left, top and right of a logic valve body.
fn logic_ports(cfg: &FunctionalConfig, body: &Node, w: f32) -> [Node; 3] {
    [
        cfg.line(body.left(), body.left() + Vec2::LEFT * (w / 6.0)),
        cfg.line(body.top(), body.top() + Vec2::UP * (w / 6.0)),
        cfg.line(body.right(), body.right() + Vec2::RIGHT * (w / 6.0)),
    ]
}

fn logic_labels(cfg: &FunctionalConfig, ports: &[Node]) -> Vec<Node> {
    let h = cfg.height;
    vec![
        cfg.label("1", ports[0].top(), Vec2::UP, h / 20.0),
        cfg.label("2", ports[1].right(), Vec2::RIGHT, h / 20.0),
        cfg.label("3", ports[2].top(), Vec2::UP, h / 20.0),
    ]
}

/// Two-pressure (AND) valve with a sliding shuttle piston.
///
/// Node layout: `0` body, `1..5` diaphragms, `5` piston, `6`, `7` piston
/// ends, `8..11` port stubs (1, 2, 3), then labels when enabled.
#[derive(Debug, Clone)]
pub struct AndValve {
    node: Node,
    /// Distance between the two piston seats.
    travel: f32,
    position: f32,
}

impl AndValve {
    /// Clearance between piston and diaphragm over body width.
    const WALL: f32 = 1.0 / 90.0;

    fn new(cfg: FunctionalConfig) -> Self {
        let h = cfg.height;
        let w = 2.0 * h;
        let body = cfg.body(w);

        let diaphragm = |x: f32, y: f32, dir: Vec2| {
            let from = Vec2::new(x, y);
            cfg.line(from, from + dir * (h / 5.0))
        };
        let piston = Node::rect(Vec2::RIGHT * (w / 12.0 - w * Self::WALL), 2.0 / 3.0 * w, h / 5.0)
            .stroke(palette::BLACK, cfg.stroke_width())
            .fill(palette::BLACK, 0.0);
        let end = |at: Vec2| cfg.line(at + Vec2::DOWN * (0.4 * h), at + Vec2::UP * (0.4 * h));
        let (left_end, right_end) = (end(piston.left()), end(piston.right()));
        let ports = logic_ports(&cfg, &body, w);
        let labels = if cfg.labels { logic_labels(&cfg, &ports) } else { Vec::new() };

        let mut nodes = vec![
            body,
            diaphragm(-w / 4.0, -h / 2.0, Vec2::UP),
            diaphragm(-w / 4.0, h / 2.0, Vec2::DOWN),
            diaphragm(w / 4.0, -h / 2.0, Vec2::UP),
            diaphragm(w / 4.0, h / 2.0, Vec2::DOWN),
            piston,
            left_end,
            right_end,
        ];
        nodes.extend(ports);
        nodes.extend(labels);

        log::debug!("AND valve, height {h}");
        let mut valve = Self { node: Node::group(nodes), travel: (w / 6.0 - 2.0 * w * Self::WALL), position: 1.0 };
        if let Some(position) = cfg.actuated {
            valve.switch_valve(position, 0.0);
        }
        valve
    }

    /// Piston position: `-1` on the left seat, `1` on the right seat (as drawn).
    #[inline]
    pub fn position(&self) -> f32 {
        self.position
    }

    /// Moves the piston to `position`, clamped to `[-1, 1]`.
    pub fn switch_valve(&mut self, position: f32, run_time: f32) -> Vec<Animation> {
        let position = position.clamp(-1.0, 1.0);
        let by = (position - self.position) / 2.0 * self.travel;
        self.position = position;
        let anim = Animation::mutate_all(indices(5..8))
            .with(Mutation::Shift(Vec2::RIGHT * by))
            .run_time(run_time);
        self.commit(vec![anim])
    }

    pub fn port_1(&self) -> Vec2 {
        self.node.child(8).map(Node::end).unwrap_or_default()
    }

    pub fn port_2(&self) -> Vec2 {
        self.node.child(9).map(Node::end).unwrap_or_default()
    }

    pub fn port_3(&self) -> Vec2 {
        self.node.child(10).map(Node::end).unwrap_or_default()
    }
}

impl Component for AndValve {
    fn node(&self) -> &Node {
        &self.node
    }

    fn node_mut(&mut self) -> &mut Node {
        &mut self.node
    }
}

/// Shuttle (OR) valve with a free ball between two seats.
///
/// Node layout: `0` body, `1..4` left seat, `4` outlet drop, `5` junction,
/// `6..9` right seat, `9` ball, `10`, `11` ball links, `12..15` port stubs
/// (1, 2, 3), then labels when enabled.
#[derive(Debug, Clone)]
pub struct OrValve {
    node: Node,
    seat: f32,
    side: Side,
}

impl OrValve {
    fn new(cfg: FunctionalConfig) -> Self {
        let h = cfg.height;
        let w = 2.0 * h;
        let body = cfg.body(w);
        let k = w / 8.0;

        let left_in = body.left() + Vec2::RIGHT * k;
        let right_in = body.right() + Vec2::LEFT * k;
        let top = body.top();
        let seat = w * 3.0 / 16.0 + k * FRAC_1_SQRT_2;
        let ball = Node::circle(Vec2::LEFT * seat, h / 8.0).stroke(palette::BLACK, cfg.stroke_width());
        let links = [cfg.line(left_in, ball.left()), cfg.line(ball.right(), right_in)];
        let ports = logic_ports(&cfg, &body, w);

        let mut nodes = vec![
            body.clone(),
            cfg.line(body.left(), left_in),
            cfg.line(left_in, left_in + Vec2::new(k, k)),
            cfg.line(left_in, left_in + Vec2::new(k, -k)),
            cfg.line(top, top + Vec2::DOWN * (h / 2.0)),
            Node::dot(Vec2::ORIGIN, 0.025 * h),
            cfg.line(body.right(), right_in),
            cfg.line(right_in, right_in + Vec2::new(-k, k)),
            cfg.line(right_in, right_in + Vec2::new(-k, -k)),
            ball,
        ];
        nodes.extend(links);
        let labels = if cfg.labels { logic_labels(&cfg, &ports) } else { Vec::new() };
        nodes.extend(ports);
        nodes.extend(labels);

        log::debug!("OR valve, height {h}");
        let mut valve = Self { node: Node::group(nodes), seat, side: Side::Left };
        if let Some(p) = cfg.actuated.filter(|p| *p != 0.0) {
            let side = if p > 0.0 { Side::Right } else { Side::Left };
            valve.switch_valve(side, 0.0);
        }
        valve
    }

    /// Seat the ball currently rests on.
    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Rolls the ball onto the `side` seat and redraws the links to it.
    pub fn switch_valve(&mut self, side: Side, run_time: f32) -> Vec<Animation> {
        let by = Vec2::RIGHT * (self.seat * (side.sign() - self.side.sign()));
        self.side = side;

        let child = |i: usize| self.node.child(i).cloned().unwrap_or_default();
        let (ball, left_link, right_link) = (child(9), child(10), child(11));
        let left_in = child(1).end();
        let right_in = child(6).end();
        let relink = |old: &Node, from: Vec2, to: Vec2| {
            let mut line = Node::line(from, to);
            if let (Node::Shape(new), Some(style)) = (&mut line, old.style()) {
                new.style = *style;
            }
            line
        };
        let new_left = relink(&left_link, left_in, ball.left() + by);
        let new_right = relink(&right_link, ball.right() + by, right_in);

        let anims = vec![
            Animation::mutate([9]).with(Mutation::Shift(by)),
            Animation::mutate([10]).with(Mutation::Become(new_left)),
            Animation::mutate([11]).with(Mutation::Become(new_right)),
        ];
        let anims = anims.into_iter().map(|a| a.run_time(run_time)).collect();
        self.commit(anims)
    }

    pub fn port_1(&self) -> Vec2 {
        self.node.child(12).map(Node::end).unwrap_or_default()
    }

    pub fn port_2(&self) -> Vec2 {
        self.node.child(13).map(Node::end).unwrap_or_default()
    }

    pub fn port_3(&self) -> Vec2 {
        self.node.child(14).map(Node::end).unwrap_or_default()
    }
}

impl Component for OrValve {
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

    fn center(node: &Node, i: usize) -> Vec2 {
        node.child(i).map(Node::center).unwrap_or(Vec2::new(f32::NAN, f32::NAN))
    }

    // ── one-way flow control ──────────────────────────────────────────────

    #[test]
    fn ball_returns_to_seat_after_open_then_neutral() {
        let mut v = FunctionalConfig::new(1.5).one_way();
        let seat = center(v.node(), 10);
        let stem = v.node().children()[11].height();

        v.active_not_return(BallState::Open, palette::BLUE_E);
        assert!(center(v.node(), 10).y < seat.y - 1e-3);
        assert_eq!(v.ball_state(), BallState::Open);

        v.active_not_return(BallState::Neutral, palette::BLUE_E);
        assert!(close(center(v.node(), 10), seat));
        assert!((v.node().children()[11].height() - stem).abs() < 1e-4);
    }

    #[test]
    fn repeated_open_does_not_drift() {
        let mut v = FunctionalConfig::default().one_way();
        v.active_not_return(BallState::Open, palette::BLUE_E);
        let once = center(v.node(), 10);
        v.active_not_return(BallState::Open, palette::BLUE_E);
        assert!(close(center(v.node(), 10), once));
    }

    #[test]
    fn stem_keeps_its_far_end() {
        let mut v = FunctionalConfig::default().one_way();
        let bottom = v.node().children()[11].bottom();
        v.active_not_return(BallState::Open, palette::BLUE_E);
        assert!(close(v.node().children()[11].bottom(), bottom));
    }

    #[test]
    fn neutral_clears_the_colour() {
        let mut v = FunctionalConfig::default().one_way();
        v.active_not_return(BallState::Closed, palette::BLUE_A);
        let stroke = |v: &OneWayFlowControlValve, i: usize| {
            v.node().children()[i].style().map(|s| s.stroke.color)
        };
        assert_eq!(stroke(&v, 8), Some(palette::BLUE_A));
        assert_eq!(stroke(&v, 6), Some(palette::BLACK));
        v.active_not_return(BallState::Neutral, palette::BLUE_A);
        assert_eq!(stroke(&v, 8), Some(palette::BLACK));
    }

    #[test]
    fn choke_toggles_width_and_colour() {
        let mut v = FunctionalConfig::new(1.5).one_way();
        let width = |v: &OneWayFlowControlValve| v.node().children()[2].style().map(|s| s.stroke.width);
        assert_eq!(width(&v), Some(3.0));
        let anims = v.active_choke(true, palette::BLUE_E);
        assert_eq!(anims.len(), 2);
        assert_eq!(width(&v), Some(6.0));
        v.active_choke(false, palette::BLUE_E);
        assert_eq!(width(&v), Some(3.0));
    }

    #[test]
    fn flipping_swaps_the_ports() {
        let plain = FunctionalConfig::default().one_way();
        assert!(plain.port_2().y > plain.port_1().y);
        let mut flipped = FunctionalConfig::default().flipped(true).one_way();
        assert!(flipped.port_2().y < flipped.port_1().y);

        let seat = center(flipped.node(), 10);
        flipped.active_not_return(BallState::Open, palette::BLUE_E);
        assert!(center(flipped.node(), 10).y > seat.y);
    }

    // ── piloted check ─────────────────────────────────────────────────────

    #[test]
    fn pilot_port_switches_side_when_flipped() {
        let plain = FunctionalConfig::default().piloted_check();
        assert!(plain.port_3().x < 0.0);
        let flipped = FunctionalConfig::default().flipped(true).piloted_check();
        assert!(flipped.port_3().x > 0.0);
        assert!(close(plain.port_1(), Vec2::UP));
    }

    #[test]
    fn piloted_ball_reseats() {
        let mut v = FunctionalConfig::default().labels(true).piloted_check();
        assert_eq!(v.node().len(), 11);
        let seat = center(v.node(), 4);
        v.active_not_return(BallState::Open, palette::BLUE_E);
        v.active_not_return(BallState::Closed, palette::BLUE_A);
        assert!(close(center(v.node(), 4), seat));
    }

    // ── logic valves ──────────────────────────────────────────────────────

    #[test]
    fn and_piston_is_clamped() {
        let mut v = FunctionalConfig::default().and_valve();
        let start = center(v.node(), 5);
        v.switch_valve(-5.0, 1.0);
        assert_eq!(v.position(), -1.0);
        let travel = start.x - center(v.node(), 5).x;
        // w/6 - 2w/90 with w = 4.
        assert!((travel - (4.0 / 6.0 - 8.0 / 90.0)).abs() < 1e-4);
        v.switch_valve(1.0, 1.0);
        assert!(close(center(v.node(), 5), start));
    }

    #[test]
    fn and_ports_with_labels_keep_their_indices() {
        let plain = FunctionalConfig::default().and_valve();
        let labelled = FunctionalConfig::default().labels(true).and_valve();
        assert!(close(plain.port_2(), labelled.port_2()));
        assert_eq!(labelled.node().len(), 14);
        assert!(close(plain.port_1(), Vec2::new(-2.0 - 4.0 / 6.0, 0.0)));
    }

    #[test]
    fn or_ball_rolls_and_relinks() {
        let mut v = FunctionalConfig::default().or_valve();
        let start = center(v.node(), 9);
        v.switch_valve(Side::Right, 1.0);
        let ball = &v.node().children()[9];
        assert!(close(ball.center(), Vec2::new(-start.x, start.y)));
        assert!(close(v.node().children()[11].start(), ball.right()));
        assert!(close(v.node().children()[10].end(), ball.left()));

        // Already there: nothing moves.
        v.switch_valve(Side::Right, 1.0);
        assert!(close(center(v.node(), 9), Vec2::new(-start.x, start.y)));
        assert_eq!(v.side(), Side::Right);
    }

    #[test]
    fn and_valve_can_start_on_the_left_seat() {
        let mut switched = FunctionalConfig::default().and_valve();
        switched.switch_valve(-1.0, 1.0);
        let v = FunctionalConfig::default().actuated(-1.0).and_valve();
        assert_eq!(v.position(), -1.0);
        assert!(close(center(v.node(), 5), center(switched.node(), 5)));
        assert!(close(center(v.node(), 6), center(switched.node(), 6)));

        // Switching back is a full stroke, not a no-op.
        let mut v = v;
        let anims = v.switch_valve(1.0, 1.0);
        assert_eq!(anims.len(), 1);
        assert!(close(center(v.node(), 5), center(FunctionalConfig::default().and_valve().node(), 5)));
    }

    #[test]
    fn or_valve_can_start_on_the_right_seat() {
        let plain = FunctionalConfig::default().or_valve();
        let v = FunctionalConfig::default().actuated(1.0).or_valve();
        assert_eq!(v.side(), Side::Right);
        let (ball, start) = (center(v.node(), 9), center(plain.node(), 9));
        assert!(close(ball, Vec2::new(-start.x, start.y)));
        assert!(close(v.node().children()[11].start(), v.node().children()[9].right()));

        let left = FunctionalConfig::default().actuated(-1.0).or_valve();
        assert_eq!(left.side(), Side::Left);
        assert!(close(center(left.node(), 9), start));
    }
}
