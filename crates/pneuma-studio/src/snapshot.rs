use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg;

use pneuma_engine::anim::Timeline;
use pneuma_engine::export::svg::{to_svg, SvgOptions};
use pneuma_engine::scene::Node;

/// Writes numbered frames and the animation log into one directory.
pub struct SnapshotWriter {
    dir: PathBuf,
    svg: SvgOptions,
    /// Present when PNGs are wanted.
    raster: Option<usvg::Options<'static>>,
    frames: usize,
}

impl SnapshotWriter {
    pub fn new(dir: impl Into<PathBuf>, svg: SvgOptions, png: bool) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
        let raster = png.then(|| {
            let mut opts = usvg::Options::default();
            opts.fontdb_mut().load_system_fonts();
            opts
        });
        Ok(Self { dir, svg, raster, frames: 0 })
    }

    /// Saves `scene` as the next frame; returns the SVG path.
    pub fn frame(&mut self, label: &str, scene: &Node) -> Result<PathBuf> {
        let stem = format!("{:02}-{}", self.frames, slug(label));
        self.frames += 1;

        let svg = to_svg(scene, &self.svg);
        let path = self.dir.join(format!("{stem}.svg"));
        fs::write(&path, &svg).with_context(|| format!("writing {}", path.display()))?;
        log::info!("frame {}", path.display());

        if let Some(opts) = &self.raster {
            let png = self.dir.join(format!("{stem}.png"));
            rasterize(&svg, opts, &png)?;
            log::debug!("rasterized {}", png.display());
        }
        Ok(path)
    }

    /// Dumps every step's animations as JSON.
    pub fn timeline(&self, timeline: &Timeline) -> Result<PathBuf> {
        let path = self.dir.join("timeline.json");
        let json = serde_json::to_string_pretty(timeline).context("serializing timeline")?;
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        log::info!("{} steps, {:.1}s -> {}", timeline.len(), timeline.duration(), path.display());
        Ok(path)
    }
}

fn rasterize(svg: &str, opts: &usvg::Options, out: &Path) -> Result<()> {
    let tree = usvg::Tree::from_str(svg, opts).context("parsing generated SVG")?;
    let size = tree.size().to_int_size();
    let mut pixmap = Pixmap::new(size.width(), size.height()).context("allocating pixmap")?;
    resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());
    pixmap.save_png(out).with_context(|| format!("writing {}", out.display()))?;
    Ok(())
}

/// File-name friendly form of a step label.
fn slug(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    for c in label.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_matches('-').to_string()
}
