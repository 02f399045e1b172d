//! Logging setup for the command-line front end.
//!
//! Installs a global tracing subscriber writing to stdout, filtered by
//! `RUST_LOG` (default `info`). Subsequent calls are no-ops.

use std::sync::OnceLock;

use tracing_subscriber::{EnvFilter, fmt};

static INITIALIZED: OnceLock<()> = OnceLock::new();

pub fn init() {
    INITIALIZED.get_or_init(|| {
        let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .try_init();
    });
}
