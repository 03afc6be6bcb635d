use core::f32::consts::FRAC_PI_2;

use anyhow::{Context, Result};

use pneuma_parts::prelude::*;

const CYLINDER: usize = 0;
const VALVE: usize = 1;
const CHOKES: [usize; 2] = [2, 3];
const SENSORS: [usize; 2] = [4, 5];
const PIPES: usize = 6;

/// Where the valve's working ports sit, rear line first.
const VALVE_PORTS: [usize; 2] = [4, 2];

/// Meter-out speed control of a double-acting cylinder: a 5/2 valve feeds
/// each chamber through a one-way flow control valve and a flow sensor.
///
/// Scene children are the components in a fixed order; the pipes share one
/// group, three per line.
pub struct FlowRegulation {
    cylinder: DoubleActingCylinder,
    valve: DirectionalValve,
    chokes: [OneWayFlowControlValve; 2],
    sensors: [FlowSensor; 2],
    pipes: Vec<PipeConnection>,
}

impl FlowRegulation {
    pub fn new() -> Result<Self> {
        let mut cylinder = CylinderConfig::new(2.0, 3.0).angle(FRAC_PI_2).build();
        cylinder.switch_fitting_side();
        cylinder.move_to(Vec2::new(-1.5, 3.2));

        let mut valve = ValveConfig::new(ValveFamily::FiveTwo)
            .height(1.0)
            .actuators(ActuatorKind::PushButton, ActuatorKind::CompressionSpring)
            .build();
        valve.move_to(Vec2::new(1.5, -4.5));

        let mut chokes = [0.3, 3.2].map(|x| {
            let mut choke = FunctionalConfig::new(1.5).flipped(true).one_way();
            choke.move_to(Vec2::new(x, -1.5));
            choke
        });
        let mut sensors: [FlowSensor; 2] =
            core::array::from_fn(|_| FlowSensor::new(1.0, "Flow", SensorStyle::default()));
        for (sensor, choke) in sensors.iter_mut().zip(&chokes) {
            let gap = Vec2::UP * 0.6;
            sensor.shift(choke.port_1() + gap - sensor.fitting_bottom());
        }

        let right = valve.right_chamber();
        let mut pipes = Vec::with_capacity(6);
        for line in 0..2 {
            let port = valve
                .port(right, VALVE_PORTS[line])
                .with_context(|| format!("valve has no port {}", VALVE_PORTS[line]))?;
            let fitting = cylinder.fitting(line);
            let top = sensors[line].fitting_top();
            let bottom = sensors[line].fitting_bottom();
            let (inlet, outlet) = (chokes[line].port_1(), chokes[line].port_2());
            let drop = 0.3 + 0.4 * line as f32;

            pipes.push(pipe(fitting, &[Vec2::RIGHT * (top.x - fitting.x), Vec2::UP * (top.y - fitting.y)]));
            pipes.push(pipe(bottom, &[inlet - bottom]));
            pipes.push(pipe(
                outlet,
                &[
                    Vec2::DOWN * drop,
                    Vec2::RIGHT * (port.x - outlet.x),
                    Vec2::UP * (port.y - outlet.y + drop),
                ],
            ));
        }

        for (choke, sensor) in chokes.iter_mut().zip(sensors.iter_mut()) {
            choke.active_not_return(BallState::Neutral, palette::BLACK);
            sensor.update_screen(0);
        }
        log::info!("flow regulation circuit assembled ({} pipes)", pipes.len());
        Ok(Self { cylinder, valve, chokes, sensors, pipes })
    }

    /// Current picture, one child per component.
    pub fn scene(&self) -> Node {
        let mut nodes = vec![self.cylinder.node().clone(), self.valve.node().clone()];
        nodes.extend(self.chokes.iter().map(|c| c.node().clone()));
        nodes.extend(self.sensors.iter().map(|s| s.node().clone()));
        nodes.push(Node::group(self.pipes.iter().map(|p| p.node().clone()).collect()));
        Node::group(nodes)
    }

    /// Shifts the valve spool: `RIGHT` feeds the rear line, `LEFT` the front.
    pub fn switch(&mut self, motion: Vec2) -> Vec<Animation> {
        at([VALVE], self.valve.slide(motion, 1.0))
    }

    /// Strokes the cylinder with air entering through `line` (`0` rear,
    /// `1` front). The exhaust leaves through the other line's choke.
    pub fn stroke(&mut self, line: usize, fraction: f32, run_time: f32) -> Vec<Animation> {
        let exhaust = 1 - line;
        let mut anims = at([CYLINDER], self.cylinder.open_close(fraction, run_time));
        anims.extend(at([CHOKES[line]], self.chokes[line].active_not_return(BallState::Open, palette::BLUE_A)));
        anims.extend(at([CHOKES[exhaust]], self.chokes[exhaust].active_not_return(BallState::Closed, palette::BLUE_E)));
        anims.extend(at([CHOKES[exhaust]], self.chokes[exhaust].active_choke(true, palette::BLUE_E)));
        for (l, color) in [(line, palette::BLUE_A), (exhaust, palette::BLUE_E)] {
            for i in 3 * l..3 * l + 3 {
                anims.extend(at([PIPES, i], self.pipes[i].set_color(color, 0.5)));
            }
        }
        anims
    }

    /// Shows a flow reading on both sensors.
    pub fn measure(&mut self, flow: u64) -> Vec<Animation> {
        let mut anims = Vec::new();
        for (sensor, index) in self.sensors.iter_mut().zip(SENSORS) {
            anims.extend(at([index], sensor.update_screen(flow)));
        }
        anims
    }

    /// Returns chokes, pipes and screens to idle.
    pub fn settle(&mut self) -> Vec<Animation> {
        let mut anims = Vec::new();
        for (choke, index) in self.chokes.iter_mut().zip(CHOKES) {
            anims.extend(at([index], choke.active_not_return(BallState::Neutral, palette::BLACK)));
            anims.extend(at([index], choke.active_choke(false, palette::BLACK)));
        }
        for (i, pipe) in self.pipes.iter_mut().enumerate() {
            anims.extend(at([PIPES, i], pipe.set_color(palette::BLACK, 0.5)));
        }
        anims.extend(self.measure(0));
        anims
    }
}

/// Re-roots component animations at the component's place in the scene.
fn at<const N: usize>(index: [usize; N], anims: Vec<Animation>) -> Vec<Animation> {
    let prefix = NodePath::from(index);
    anims.iter().map(|a| a.prefixed(&prefix)).collect()
}

/// Pipe along corner-to-corner legs; each corner is rounded off.
fn pipe(start: Vec2, legs: &[Vec2]) -> PipeConnection {
    let legs: Vec<Vec2> = legs.iter().copied().filter(|l| l.length() > 1e-4).collect();
    let radius = 0.1;
    let last = legs.len().saturating_sub(1);
    let lengths: Vec<f32> = legs
        .iter()
        .enumerate()
        .map(|(i, leg)| {
            let corners = usize::from(i > 0) + usize::from(i < last);
            (leg.length() - radius * corners as f32).max(0.0)
        })
        .collect();
    let directions: Vec<Vec2> = legs.iter().map(|l| l.normalized()).collect();
    PipeConfig::new(start)
        .runs(lengths, directions)
        .radius(radius)
        .color(palette::BLACK)
        .build()
}
