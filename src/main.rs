use anyhow::Result;
use covidstat::{compile, Config};
use std::env;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::default().add_directive(log_level.parse().unwrap_or(Level::INFO.into()))
    });
    fmt().with_env_filter(filter).with_target(false).init();

    // ─── 2) configuration ────────────────────────────────────────────
    let config = Config::from_env()?;
    info!(?config, "startup");

    // ─── 3) process every release and export ─────────────────────────
    let summary = compile::run(&config)?;
    info!(
        seen = summary.files_seen,
        processed = summary.processed.len(),
        skipped = summary.skipped.len(),
        failed = summary.failed.len(),
        "batch finished"
    );
    Ok(())
}
