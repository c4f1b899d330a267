//! newsgate -- near-duplicate screening service for the ingestion pipeline.
//!
//! Usage: newsgate [--threshold <score>]
//!
//! Weights and threshold come from `NEWSGATE_*` environment variables;
//! `--threshold` overrides the environment.

use anyhow::Context;

fn main() -> anyhow::Result<()> {
    // Initialize tracing to stderr so it does not interfere with the stdio protocol.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = newsgate::server::ServiceConfig::from_env()?;

    if let Some(raw) = std::env::args().skip_while(|a| a != "--threshold").nth(1) {
        config.threshold = raw
            .parse()
            .with_context(|| format!("invalid --threshold value: {raw}"))?;
    }

    newsgate::run_service(config)
}
