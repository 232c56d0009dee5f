use std::path::PathBuf;

use crate::render::MetricView;

/// Ward analytics CLI (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "wardmap", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Match ward boundaries to metric records and write the mapping report
    Report(ReportArgs),

    /// Render the ward map to an SVG snapshot
    Render(RenderArgs),
}

#[derive(clap::Args, Debug)]
pub struct ReportArgs {
    /// Boundary GeoJSON (KGIS ward polygons)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub boundaries: PathBuf,

    /// Ward metrics JSON (before/after bundles)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub wards: PathBuf,

    /// Output report file, defaults to "./ward-mapping-debug.json"
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Minimum fuzzy-match similarity
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Also try shared-token overlap after fuzzy matching fails
    #[arg(long)]
    pub token_fallback: bool,
}

#[derive(clap::Args, Debug)]
pub struct RenderArgs {
    /// Boundary GeoJSON (KGIS ward polygons)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub boundaries: PathBuf,

    /// Ward metrics JSON (before/after bundles)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub wards: PathBuf,

    /// Output SVG file, defaults to "./wardmap.svg"
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Metric to color the map by
    #[arg(short, long, value_enum, default_value = "shortage")]
    pub metric: MetricView,

    /// Surface width in pixels
    #[arg(long, default_value_t = 1600)]
    pub width: u32,

    /// Surface height in pixels
    #[arg(long, default_value_t = 1000)]
    pub height: u32,

    /// Zoom factor, clamped to the interactive range
    #[arg(long)]
    pub zoom: Option<f64>,
}
