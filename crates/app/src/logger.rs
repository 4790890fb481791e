//! Logging setup via tracing-subscriber.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Pick the filter directive: `--log`, then `STUDYPATH_LOG`, then `RUST_LOG`.
pub fn resolve_filter(flag: Option<&str>, lookup: impl Fn(&str) -> Option<String>) -> String {
    flag.map(str::to_string)
        .or_else(|| lookup("STUDYPATH_LOG"))
        .or_else(|| lookup("RUST_LOG"))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

/// Install the global subscriber, writing to stderr.
///
/// # Errors
///
/// Returns an error when `directive` is not a valid filter or a subscriber
/// is already installed.
pub fn init(directive: &str) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_new(directive)
        .map_err(|e| format!("invalid log filter '{directive}': {e}"))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| format!("failed to set subscriber: {e}"))?;
    Ok(())
}
