//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Registration and lookup produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters, histograms via `metrics`)
//!
//! Consumers:
//!     → Whatever subscriber / recorder the host installs
//! ```
//!
//! # Design Decisions
//! - Compile and merge steps log at trace, lookups at debug
//! - Metrics are no-ops until the host installs a recorder

pub mod logging;
pub mod metrics;

/// Serializes tests that flip the global metrics switch.
#[cfg(test)]
pub(crate) static SWITCH_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
