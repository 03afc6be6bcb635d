mod circuit;
mod snapshot;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use pneuma_engine::anim::Timeline;
use pneuma_engine::export::svg::SvgOptions;
use pneuma_engine::logging::{init_logging, LoggingConfig};
use pneuma_parts::prelude::{Animation, Vec2};

use circuit::FlowRegulation;
use snapshot::SnapshotWriter;

/// Plays the flow-regulation circuit and writes one snapshot per step.
#[derive(Parser)]
#[command(name = "pneuma-studio")]
struct Args {
    /// Output directory.
    #[arg(short, long, default_value = "out")]
    out: PathBuf,

    /// Also rasterize every snapshot to PNG.
    #[arg(long)]
    png: bool,

    /// Pixels per scene unit.
    #[arg(short, long, default_value_t = 100.0)]
    scale: f32,

    /// Log filter, e.g. `debug` or `pneuma_parts=debug`.
    #[arg(long, default_value = "info")]
    log: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(LoggingConfig {
        env_filter: Some(args.log.clone()),
        timestamps: false,
        ..LoggingConfig::default()
    });

    let svg = SvgOptions { scale: args.scale, ..SvgOptions::default() };
    let mut writer = SnapshotWriter::new(&args.out, svg, args.png)?;
    let mut circuit = FlowRegulation::new()?;
    let mut timeline = Timeline::new();

    writer.frame("initial", &circuit.scene())?;
    timeline.play("initial", Vec::new()).wait = 1.0;

    let mut record = |label: &str, anims: Vec<Animation>, wait: f32, circuit: &FlowRegulation| -> Result<()> {
        timeline.play(label, anims).wait = wait;
        writer.frame(label, &circuit.scene())?;
        Ok(())
    };

    // Extend slowly: air in through the rear line, out through the front choke.
    let anims = circuit.switch(Vec2::RIGHT);
    record("valve right", anims, 0.5, &circuit)?;
    let mut anims = circuit.stroke(0, 0.75, 4.0);
    anims.extend(circuit.measure(100));
    record("extend", anims, 1.0, &circuit)?;
    let anims = circuit.settle();
    record("extended", anims, 1.0, &circuit)?;

    // And back, choked on the rear line.
    let anims = circuit.switch(Vec2::LEFT);
    record("valve left", anims, 0.5, &circuit)?;
    let mut anims = circuit.stroke(1, 0.75, 4.0);
    anims.extend(circuit.measure(200));
    record("retract", anims, 1.0, &circuit)?;
    let anims = circuit.settle();
    record("retracted", anims, 1.0, &circuit)?;

    writer.timeline(&timeline)?;
    Ok(())
}
