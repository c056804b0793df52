use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogFormat, LoggingConfig};
use crate::domain::DomainError;

/// HTTP plumbing stays at warn unless `RUST_LOG` says otherwise
const QUIET_DEPENDENCIES: &[&str] = &["hyper=warn", "reqwest=warn"];

/// Builds the level filter, preferring `RUST_LOG` when it is set
fn level_filter(config: &LoggingConfig) -> Result<EnvFilter, DomainError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    directives_filter(&config.level)
}

fn directives_filter(level: &str) -> Result<EnvFilter, DomainError> {
    let mut directives = vec![level.trim().to_string()];
    directives.extend(QUIET_DEPENDENCIES.iter().map(|d| d.to_string()));

    EnvFilter::try_new(directives.join(",")).map_err(|e| {
        DomainError::configuration(format!("Invalid log level '{}': {}", level, e))
    })
}

/// Installs the global subscriber. Everything goes to stderr so record output on
/// stdout stays machine-readable.
pub fn try_init_logging(config: &LoggingConfig) -> Result<(), DomainError> {
    let filter = level_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match config.format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init(),
    };
    installed.map_err(|e| DomainError::configuration(format!("Logging already set up: {}", e)))?;

    tracing::debug!(level = %config.level, format = ?config.format, "Logging initialized");
    Ok(())
}
