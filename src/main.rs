mod app;
mod config;
mod network;
mod util;

use std::path::PathBuf;

use anyhow::{Context as _, anyhow};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use config::{FileConfig, Overrides, PerformanceTier, SceneConfig};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON file with scene settings and force parameters.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    satellites: Option<usize>,

    /// Skip detection and force a performance tier.
    #[arg(long, value_enum)]
    tier: Option<PerformanceTier>,

    #[arg(long, conflicts_with = "no_auto_rotate")]
    auto_rotate: bool,

    #[arg(long)]
    no_auto_rotate: bool,

    #[arg(long, allow_negative_numbers = true)]
    rotation_speed: Option<f32>,

    /// Accent color as #RRGGBB.
    #[arg(long)]
    color: Option<String>,

    /// Seed for a reproducible layout.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = 1280.0)]
    width: f32,

    #[arg(long, default_value_t = 820.0)]
    height: f32,

    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn overrides(&self) -> Overrides {
        let auto_rotate = match (self.auto_rotate, self.no_auto_rotate) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };

        Overrides {
            satellites: self.satellites,
            tier: self.tier,
            auto_rotate,
            rotation_speed: self.rotation_speed,
            accent_color: self.color.clone(),
            seed: self.seed,
        }
    }

    fn default_filter(&self) -> &'static str {
        if self.verbose {
            "neural_mesh=debug"
        } else if self.quiet {
            "neural_mesh=error"
        } else {
            "neural_mesh=info"
        }
    }
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.default_filter());

    let file = match &args.config {
        Some(path) => FileConfig::load(path)
            .with_context(|| format!("loading scene settings from {}", path.display()))?,
        None => FileConfig::default(),
    };

    let detected = PerformanceTier::detect(args.width, std::env::consts::OS);
    let scene = SceneConfig::resolve(file, args.overrides(), detected)
        .context("resolving scene settings")?;

    info!(
        tier = scene.tier.label(),
        satellites = scene.satellites,
        auto_rotate = scene.auto_rotate,
        seed = ?scene.seed,
        "starting viewer"
    );

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([args.width, args.height])
            .with_title("neural-mesh"),
        ..Default::default()
    };

    eframe::run_native(
        "neural-mesh",
        options,
        Box::new(move |cc| Ok(Box::new(app::NetworkApp::new(cc, scene.clone())))),
    )
    .map_err(|error| anyhow!("viewer exited with an error: {error}"))
}
