//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the `tracing` subscriber from the manifest settings
//! - Let `RUST_LOG` override the configured level
//!
//! # Design Decisions
//! - Installing twice is not an error; the first subscriber wins

use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::schema::ObservabilityConfig;
use crate::observability::metrics;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),
}

/// Install the global subscriber and apply the metrics switch.
pub fn init(config: &ObservabilityConfig) -> Result<(), LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level)?,
    };

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    metrics::set_enabled(config.metrics_enabled);
    if config.metrics_enabled {
        metrics::describe();
    }

    match installed {
        Ok(()) => tracing::info!(
            log_level = %config.log_level,
            metrics_enabled = config.metrics_enabled,
            "Logging initialized"
        ),
        Err(e) => tracing::debug!(error = %e, "Subscriber already installed"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::SWITCH_LOCK;

    #[test]
    fn test_init_is_idempotent() {
        let _guard = SWITCH_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let config = ObservabilityConfig::default();
        assert!(init(&config).is_ok());
        assert!(init(&config).is_ok());
    }

    #[test]
    fn test_rejects_bad_filter() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let config = ObservabilityConfig {
            log_level: "router=verbose".to_string(),
            metrics_enabled: true,
        };
        assert!(matches!(init(&config), Err(LoggingError::Filter(_))));
    }
}
