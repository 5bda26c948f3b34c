use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Default when RUST_LOG is unset: only problems, so the chat stays readable
const DEFAULT_FILTER: &str = "warn";

/// Send logs to stderr, keeping stdout for the conversation.
pub fn init() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow!("Failed to set up logging: {}", e))
}
