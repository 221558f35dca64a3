mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::Result;
use app::ExamVitalsApp;
use clap::Parser;
use config::ViewerConfig;
use data::model::Band;
use eframe::egui;

/// Exam Vitals – heart rate, skin conductance and skin temperature by exam
#[derive(Parser, Debug)]
#[command(name = "exam-vitals")]
#[command(version)]
#[command(about = "Interactive viewer for exam-session physiology data", long_about = None)]
struct Cli {
    /// Data file to open (.csv, .json or .parquet)
    data: Option<PathBuf>,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Initially selected exam ("all" for every exam)
    #[arg(long)]
    exam: Option<String>,

    /// Initially selected performance band
    #[arg(long, value_parser = parse_band)]
    band: Option<BandArg>,
}

/// `--band` accepts "all" in addition to the three bands.
#[derive(Debug, Clone, Copy)]
enum BandArg {
    All,
    Band(Band),
}

fn parse_band(s: &str) -> Result<BandArg, String> {
    if s.eq_ignore_ascii_case("all") {
        Ok(BandArg::All)
    } else {
        s.parse().map(BandArg::Band)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => ViewerConfig::from_file(path)?,
        None => ViewerConfig::default(),
    };
    if let Some(BandArg::All) = cli.band {
        config.default_band = None;
    }
    let band = match cli.band {
        Some(BandArg::Band(b)) => Some(b),
        _ => None,
    };
    let config = config.with_overrides(cli.data, cli.exam, band);
    log::debug!("Starting with {config:?}");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([600.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Exam Vitals – Physiology by Exam",
        options,
        Box::new(move |_cc| Ok(Box::new(ExamVitalsApp::new(&config)))),
    )
    .map_err(|e| anyhow::anyhow!("running viewer: {e}"))
}
