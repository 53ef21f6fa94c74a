//! Log subscriber for the command-line front end
//!
//! Events go to stderr; stdout is reserved for command output.

use tracing_subscriber::{
    fmt, layer::SubscriberExt, registry::Registry, util::SubscriberInitExt, EnvFilter, Layer,
};

use crate::config::{LogFormat, LoggingConfig};
use crate::domain::DomainError;

const FALLBACK_DIRECTIVE: &str = "warn";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Directive precedence: `RUST_LOG`, then the configured level, then `warn`.
/// Unparsable directives are skipped.
fn build_filter(env_directive: Option<&str>, level: &str) -> EnvFilter {
    env_directive
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .or_else(|| EnvFilter::try_new(level).ok())
        .unwrap_or_else(|| EnvFilter::new(FALLBACK_DIRECTIVE))
}

fn format_layer(format: &LogFormat) -> BoxedLayer {
    match format {
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(false)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_current_span(false)
            .boxed(),
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), DomainError> {
    let env_directive = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(env_directive.as_deref(), &config.level);

    tracing_subscriber::registry()
        .with(format_layer(&config.format))
        .with(filter)
        .try_init()
        .map_err(|e| DomainError::internal(format!("Failed to install log subscriber: {}", e)))?;

    tracing::debug!(level = %config.level, format = ?config.format, "Logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_directive_wins() {
        let filter = build_filter(Some("semantic_cache=trace"), "info");

        assert_eq!(filter.to_string(), "semantic_cache=trace");
    }

    #[test]
    fn test_configured_level_used_without_env() {
        assert_eq!(build_filter(None, "debug").to_string(), "debug");
    }

    #[test]
    fn test_invalid_directives_fall_back() {
        assert_eq!(build_filter(Some("app=bogus"), "debug").to_string(), "debug");
        assert_eq!(build_filter(None, "app=bogus").to_string(), FALLBACK_DIRECTIVE);
    }
}
