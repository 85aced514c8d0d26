//! Logging sink initialization.
//!
//! The JSON-RPC wire is stdout; every diagnostic line must go elsewhere, so
//! this always writes to stderr and optionally mirrors to a log file.
//! Mixing the two channels corrupts the protocol (spec §4.1).

use std::path::Path;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn init(log_level: &str, log_file: Option<&Path>) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_ansi(false)
        .compact();

    let registry = tracing_subscriber::registry().with(env_filter).with(stderr_layer);

    if let Some(path) = log_file {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::OpenOptions::new().create(true).append(true).open(path)?;
        let file_layer = fmt::layer()
            .with_writer(std::sync::Arc::new(file))
            .with_target(true)
            .with_ansi(false);
        registry.with(file_layer).init();
    } else {
        registry.init();
    }

    tracing::info!("logging initialized");
    Ok(())
}
