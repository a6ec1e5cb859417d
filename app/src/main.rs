//! Treadmill Calculator CLI
//!
//! Estimates treadmill energy expenditure, solves calorie goals and keeps a
//! local workout session and weight log.

use anyhow::Result;
use clap::Parser;
use tracing::{debug, error};
use treadmill_calc_app::cli::{self, Cli};
use treadmill_calc_app::config::AppConfig;
use treadmill_calc_app::logging::init_tracing;
use treadmill_calc_app::state::AppState;

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = AppConfig::load()?;
    if let Some(data_dir) = &cli.data_dir {
        config.storage.data_dir = data_dir.clone();
    }

    init_tracing(cli.verbose, config.logging.json);

    debug!(
        version = env!("CARGO_PKG_VERSION"),
        env = if AppConfig::is_production() { "production" } else { "development" },
        data_dir = %config.storage.data_dir.display(),
        "Starting treadmill calculator"
    );

    let state = AppState::new(config);

    match cli::execute(&cli, &state) {
        Ok(output) => {
            println!("{output}");
            Ok(())
        }
        Err(e) => {
            error!(code = e.code(), error = %e, "Command failed");
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
