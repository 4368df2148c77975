use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use ward_core::{data_dir_from_env_value, CoreConfig, ErQueue, PatientRegistry};

mod console;

use console::Console;

/// Main entry point for the interactive ward console
///
/// Loads both collections from the data directory and hands them to the menu console.
/// Every change is written through to disk as it happens, so leaving the console needs
/// no final save.
///
/// # Environment Variables
/// - `WARD_DATA_DIR`: Directory holding `patients.txt` and `erqueue.txt` (default: ".")
/// - `RUST_LOG`: Log filter; logs go to stderr (default: "ward=warn")
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("ward=warn".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let data_dir = data_dir_from_env_value(std::env::var("WARD_DATA_DIR").ok());
    let cfg = CoreConfig::new(data_dir)?;
    tracing::info!("++ Using ward data in {}", cfg.data_dir().display());

    let registry = PatientRegistry::open(&cfg)?;
    let queue = ErQueue::open(&cfg)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    Console::new(stdin.lock(), stdout.lock(), registry, queue).run()?;

    Ok(())
}
