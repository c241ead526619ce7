//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::constants::LOG_ENV_VAR;

static INIT: Once = Once::new();

/// Initialize logging with the compiled default filter.
///
/// Reads `ASSURANCE_LOG` for per-module levels, e.g.
/// `ASSURANCE_LOG=assurance_engine=debug,assurance_storage=warn`.
/// Falls back to `assurance=info` when unset or invalid.
pub fn init_tracing() {
    init_tracing_with_default("assurance=info");
}

/// Initialize logging, falling back to `default_filter` (usually
/// `TelemetryConfig::effective_log_filter`). Idempotent.
pub fn init_tracing_with_default(default_filter: &str) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new(default_filter));

        // A subscriber installed by the host application wins.
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
