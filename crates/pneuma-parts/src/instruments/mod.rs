//! Measuring instruments: dial gauges and digital flow sensors.

pub mod flow_sensor;
pub mod gauge;

pub use flow_sensor::{FlowSensor, SensorStyle};
pub use gauge::{Gauge, GaugeStyle};
