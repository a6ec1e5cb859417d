//! Tracing setup for the CLI
//!
//! Logs go to stderr so command output on stdout stays machine-readable.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::AppConfig;

/// Filter used when `RUST_LOG` is not set
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "treadmill_calc_app=debug,treadmill_calc_shared=debug"
    } else {
        "treadmill_calc_app=info"
    }
}

/// Initialize tracing/logging
///
/// JSON lines in production or when `logging.json` is set, pretty output
/// otherwise.
pub fn init_tracing(verbose: bool, json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(verbose).into());

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if json || AppConfig::is_production() {
        subscriber
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .compact()
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
