use std::fs::OpenOptions;
use std::io;
use std::sync::Arc;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::ServerConfig;

const DEFAULT_FILTER: &str = "info,sqlx=warn";

/// Install the global subscriber: stdout filtered by `RUST_LOG`, plus the
/// plain-text log file when one is configured.
pub fn init(config: &ServerConfig) -> io::Result<()> {
    let stdout = tracing_subscriber::fmt::layer().with_filter(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    );

    let file = match &config.error_log {
        Some(path) => {
            let handle = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_file(true)
                    .with_line_number(true)
                    .with_writer(Arc::new(handle))
                    .with_filter(LevelFilter::INFO),
            )
        }
        None => None,
    };

    tracing_subscriber::registry().with(stdout).with(file).init();
    Ok(())
}
