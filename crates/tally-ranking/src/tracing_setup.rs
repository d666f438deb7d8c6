//! Tracing initialization.

use std::sync::Once;

use tally_core::config::ObservabilityConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Install the subscriber with default settings.
///
/// Reads the `TALLY_LOG` environment variable for filtering, e.g.
/// `TALLY_LOG=tally_ranking=debug,tally_storage=warn`. Falls back to `info`.
pub fn init_tracing() {
    init_tracing_with(&ObservabilityConfig::default());
}

/// Install the subscriber; `config.log_level` applies when `TALLY_LOG` is unset.
///
/// Only the first call in a process has an effect, and an already-installed
/// global subscriber is left in place.
pub fn init_tracing_with(config: &ObservabilityConfig) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("TALLY_LOG")
            .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
        let registry = tracing_subscriber::registry().with(filter);

        let installed = if config.json {
            registry
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .try_init()
        } else {
            registry
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .try_init()
        };
        if installed.is_err() {
            tracing::debug!("global subscriber already installed");
        }
    });
}
