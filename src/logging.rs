// src/logging.rs
//! Optional `tracing-subscriber` setup (feature `logging`)

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install a global fmt subscriber honouring `RUST_LOG` (default `info`).
/// Safe to call more than once; later calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .try_init()
        .ok();
}
