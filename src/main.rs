//! meshpick - pointer hit testing on textured meshes
//!
//! Headless probe: loads a scene, replays pointer positions through the
//! router and prints what each one hit as JSON.

mod config;
mod report;

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use config::{PointerConfig, SceneConfig};
use glam::DVec2;
use meshpick_core::ElementId;
use meshpick_hit::CaptureTarget;
use report::ProbeReport;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Pointer hit-test probe for meshpick scenes", long_about = None)]
struct Args {
    /// Scene file (TOML); defaults are used when it is missing or invalid
    #[arg(short, long)]
    scene: Option<PathBuf>,

    /// Extra pointer position as `x,y` in viewport pixels (repeatable)
    #[arg(short, long = "pointer", value_parser = parse_point)]
    pointers: Vec<DVec2>,

    /// Capture the element with this id for the extra pointers
    #[arg(long)]
    capture: Option<u64>,

    /// Include the visible edges of every surface in the output
    #[arg(long)]
    dump_edges: bool,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    // WARN by default, override via RUST_LOG
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    info!("Starting meshpick v{}", env!("CARGO_PKG_VERSION"));

    let scene = match &args.scene {
        Some(path) => SceneConfig::load_from_path(path),
        None => SceneConfig::load(),
    };

    let capture = match args.capture {
        Some(element) => Some(capture_for(&scene, ElementId(element))?),
        None => None,
    };
    let mut pointers = scene.pointers.clone();
    pointers.extend(args.pointers.iter().map(|&position| PointerConfig { position, capture }));

    let report = ProbeReport::run(&scene, &pointers, args.dump_edges);
    let json = if args.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .context("Failed to serialize probe report")?;

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote report to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Capture the whole content of the first surface showing `element`.
fn capture_for(scene: &SceneConfig, element: ElementId) -> Result<CaptureTarget> {
    let Some(surface) = scene.surfaces.iter().find(|s| s.element == element.0) else {
        bail!("No surface shows element {}", element.0);
    };
    Ok(CaptureTarget {
        element,
        bounds: surface.content_bounds,
    })
}

fn parse_point(value: &str) -> Result<DVec2, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{value}`"))?;
    let coord = |s: &str| {
        s.trim()
            .parse::<f64>()
            .map_err(|err| format!("invalid coordinate `{s}`: {err}"))
    };
    Ok(DVec2::new(coord(x)?, coord(y)?))
}
