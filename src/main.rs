//!
//! designboard server binary
//! --------------------------
//! Command-line entry point for the file tree HTTP API. Supports configuration via
//! CLI flags and `DESIGNBOARD_*` environment variables.

use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use designboard::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Init logging
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))?;
    fmt().with_env_filter(filter).init();

    let cfg = ServerConfig::parse();

    // Startup banner at info level so something always prints at default verbosity
    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "<unset>".to_string());
    info!(
        target: "designboard",
        "designboard starting: RUST_LOG='{}', bind={}, http_port={}, seed={}",
        rust_log, cfg.bind, cfg.http_port, cfg.seed_enabled()
    );

    designboard::server::run_with_config(&cfg).await
}
