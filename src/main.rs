use std::path::PathBuf;

use clap::Parser;
use eframe::egui;

use sheet_sieve::app::SieveApp;
use sheet_sieve::settings::Settings;
use sheet_sieve::state::AppState;

/// Highlight rows with empty or filled columns and export the matches.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Spreadsheet to open on startup (local path or http(s) URL)
    source: Option<String>,

    /// JSON file with viewer settings
    #[arg(long)]
    settings: Option<PathBuf>,
}

fn main() -> eframe::Result {
    env_logger::init();
    let args = Args::parse();

    let settings = match Settings::load(args.settings.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("{e:#}; falling back to default settings");
            Settings::default()
        }
    };

    let mut state = AppState::new(settings);
    if let Some(source) = args.source {
        state.source_input = source.clone();
        state.start_load(source);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Sheet Sieve",
        options,
        Box::new(|_cc| Ok(Box::new(SieveApp::new(state)))),
    )
}
