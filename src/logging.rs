//! Tracing subscriber setup for the binary.

use std::env::var;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer};

pub fn init() {
    initialize_tracing(LevelFilter::WARN);
}

/// Log to stderr, filtered by RUST_LOG; JSON lines when RUST_LOG_FORMAT=json.
fn initialize_tracing(level: LevelFilter) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let log_format = var("RUST_LOG_FORMAT").unwrap_or_default();

    let log_layer = match log_format.as_str() {
        "json" => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_filter(env_filter)
            .boxed(),
        _ => tracing_subscriber::fmt::layer()
            .compact()
            .without_time()
            .with_writer(std::io::stderr)
            .with_filter(env_filter)
            .boxed(),
    };

    // A subscriber may already be installed when embedded in a host program.
    let _ = tracing_subscriber::registry().with(log_layer).try_init();
}
