use core::f32::consts::FRAC_PI_2;

use pneuma_engine::anim::{Animation, Mutation};
use pneuma_engine::coords::Vec2;
use pneuma_engine::paint::{palette, Color, Style};
use pneuma_engine::scene::{Node, NodePath};

use crate::component::Component;

/// Straight runs joined by quarter-turn elbows.
///
/// ```rust,ignore
/// let pipe = PipeConfig::new(valve.port_1())
///     .runs([0.5, 2.0], [Vec2::DOWN, Vec2::RIGHT])
///     .build();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PipeConfig {
    start: Vec2,
    lengths: Vec<f32>,
    directions: Vec<Vec2>,
    color: Color,
    radius: f32,
    width: f32,
}

impl PipeConfig {
    pub fn new(start: Vec2) -> Self {
        Self { start, ..Self::default() }
    }

    /// Run lengths and their directions, pairwise.
    pub fn runs(mut self, lengths: impl Into<Vec<f32>>, directions: impl Into<Vec<Vec2>>) -> Self {
        self.lengths = lengths.into();
        self.directions = directions.into();
        self
    }

    pub fn color(mut self, v: Color) -> Self { self.color = v; self }
    /// Elbow radius.
    pub fn radius(mut self, v: f32) -> Self { self.radius = v; self }
    pub fn width(mut self, v: f32) -> Self { self.width = v; self }

    pub fn build(self) -> PipeConnection {
        PipeConnection::new(self)
    }
}

impl Default for PipeConfig {
    fn default() -> Self {
        Self {
            start: Vec2::ORIGIN,
            lengths: vec![1.0],
            directions: vec![Vec2::RIGHT],
            color: palette::BLACK,
            radius: 0.1,
            width: Style::STROKE_WIDTH,
        }
    }
}

/// Pipe or hose between two ports.
///
/// Children alternate between runs and elbows, starting and ending with a run.
#[derive(Debug, Clone)]
pub struct PipeConnection {
    node: Node,
}

impl PipeConnection {
    fn new(cfg: PipeConfig) -> Self {
        if cfg.lengths.len() != cfg.directions.len() {
            log::warn!(
                "pipe has {} lengths but {} directions; nothing drawn",
                cfg.lengths.len(),
                cfg.directions.len()
            );
            return Self { node: Node::empty() };
        }
        let Some((&first_len, _)) = cfg.lengths.split_first() else {
            return Self { node: Node::empty() };
        };

        let segment = |node: Node| node.stroke(cfg.color, cfg.width);
        let dirs: Vec<Vec2> = cfg.directions.iter().map(|d| d.normalized()).collect();

        let mut cursor = cfg.start + dirs[0] * first_len;
        let mut heading = dirs[0];
        let mut parts = vec![segment(Node::line(cfg.start, cursor))];

        for (&len, &dir) in cfg.lengths.iter().zip(&dirs).skip(1) {
            let turn = heading.cross(dir);
            if turn.abs() < 1e-4 {
                log::warn!("pipe turns between parallel directions {heading:?} and {dir:?}; run skipped");
                continue;
            }
            if 1.0 - turn.abs() > 1e-4 {
                log::warn!("pipe elbows are quarter turns, {heading:?} to {dir:?} is not; run skipped");
                continue;
            }
            // Elbow centre sits one radius off the run, on the inside of the turn.
            let center = cursor + dir * cfg.radius;
            let start_angle = (-dir).angle();
            parts.push(segment(Node::arc(center, cfg.radius, start_angle, FRAC_PI_2.copysign(turn))));
            cursor = center + heading * cfg.radius;

            let end = cursor + dir * len;
            parts.push(segment(Node::line(cursor, end)));
            cursor = end;
            heading = dir;
        }

        log::debug!("pipe with {} parts from {:?}", parts.len(), cfg.start);
        Self { node: Node::group(parts) }
    }

    /// Where the pipe starts; the origin for an empty pipe.
    pub fn start_point(&self) -> Vec2 {
        self.node.start()
    }

    pub fn end_point(&self) -> Vec2 {
        self.node.end()
    }

    /// Recolours every run and elbow.
    pub fn set_color(&mut self, color: Color, run_time: f32) -> Vec<Animation> {
        let targets = (0..self.node.len()).map(|i| NodePath::from([i])).collect();
        let anim = Animation::mutate_all(targets)
            .with(Mutation::SetStrokeColor(color))
            .run_time(run_time);
        self.commit(vec![anim])
    }
}

impl Component for PipeConnection {
    fn node(&self) -> &Node {
        &self.node
    }

    fn node_mut(&mut self) -> &mut Node {
        &mut self.node
    }
}
