//! Render a station snapshot offline and save the temperature glow as PNG.
//!
//! Usage:
//!   cargo run --package renderer --example render_snapshot -- \
//!       --snapshot stations.json --output glow.png --layer temperature

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use map_engine::HeadlessMap;
use renderer::{LayerRenderer, WeatherMap};
use station_common::{MapConfig, MeasurementLayer, Size, StationSnapshot};

#[derive(Parser, Debug)]
#[command(name = "render_snapshot")]
#[command(about = "Render a weather station snapshot on a headless map")]
struct Args {
    /// Station snapshot JSON file
    #[arg(short, long)]
    snapshot: PathBuf,

    /// Optional YAML map configuration
    #[arg(short, long, env = "MAP_CONFIG")]
    config: Option<PathBuf>,

    /// Layer to render (temperature, wind, pressure)
    #[arg(short, long, default_value = "temperature")]
    layer: MeasurementLayer,

    /// Where to write the glow overlay PNG (temperature layer only)
    #[arg(short, long, default_value = "glow.png")]
    output: PathBuf,

    /// Viewport width in CSS pixels
    #[arg(long, default_value = "1024")]
    width: f64,

    /// Viewport height in CSS pixels
    #[arg(long, default_value = "768")]
    height: f64,

    /// Device pixel ratio of the virtual display
    #[arg(long, default_value = "1")]
    dpr: f64,

    /// Station to highlight
    #[arg(long)]
    select: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = match &args.config {
        Some(path) => MapConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => MapConfig::default(),
    };
    let snapshot = StationSnapshot::from_file(&args.snapshot)
        .with_context(|| format!("loading snapshot {}", args.snapshot.display()))?;

    info!(
        stations = snapshot.stations.len(),
        valid = snapshot.count_valid(args.layer),
        layer = %args.layer,
        "Loaded snapshot"
    );

    let engine = HeadlessMap::new(Size::new(args.width, args.height)).with_device_pixel_ratio(args.dpr);
    let mut weather_map = WeatherMap::mount(engine, config, |id| {
        info!(station = ?id, "Station selected");
    });

    weather_map.set_measurement(args.layer);
    weather_map.apply_snapshot(snapshot);
    weather_map.set_selected_station(args.select.as_deref());

    let summary = weather_map.summary();
    println!("{}", serde_json::to_string_pretty(&summary)?);

    if args.layer != MeasurementLayer::Temperature {
        info!("No overlay for the {} layer, skipping PNG export", args.layer);
        return Ok(());
    }

    let Some(overlay) = weather_map.temperature().overlay() else {
        bail!("no glow overlay was painted; does the snapshot contain temperatures?");
    };
    let png = weather_map.map().canvas_png(overlay.canvas())?;
    std::fs::write(&args.output, &png)
        .with_context(|| format!("writing {}", args.output.display()))?;

    info!(
        path = %args.output.display(),
        bytes = png.len(),
        markers = weather_map.renderer(args.layer).marker_keys().len(),
        "Saved glow overlay"
    );

    weather_map.teardown();
    Ok(())
}
