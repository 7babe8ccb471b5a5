//! casa - terminal drum machine
//!
//! Run with: cargo run --release -- [config.json]

mod app;
mod ui;

use std::{fs::File, path::PathBuf, sync::Mutex};

use casa_drums::MachineConfig;
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use tracing_subscriber::EnvFilter;

use app::Casa;

const DEFAULT_CONFIG: &str = "casa.json";
const LOG_FILE: &str = "casa.log";

fn main() -> EyreResult<()> {
    color_eyre::install()?;

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let config = MachineConfig::load(&config_path)?;

    init_logging(&config)?;
    tracing::info!(config = %config_path.display(), "starting casa");

    Casa::new(config).run()
}

/// Log to a file next to the exports; stdout belongs to the TUI.
fn init_logging(config: &MachineConfig) -> EyreResult<()> {
    std::fs::create_dir_all(&config.export_dir)
        .wrap_err_with(|| format!("failed to create {}", config.export_dir.display()))?;
    let path = config.export_dir.join(LOG_FILE);
    let file = File::create(&path)
        .wrap_err_with(|| format!("failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("casa_drums=info,casa=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
