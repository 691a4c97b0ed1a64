//! # LOT Telemetry
//!
//! Structured logging for Link-of-Trust binaries.
//!
//! Libraries only emit `tracing` events; binaries call [`init_telemetry`]
//! once at startup to decide where those events go.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use lot_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let _guard = init_telemetry(TelemetryConfig::from_env())?;
//!     // ...
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `LOT_LOG_LEVEL` / `RUST_LOG` | `info` | Filter directive |
//! | `LOT_JSON_LOGS` | `false` (`true` in containers) | JSON lines output |
//! | `LOT_SERVICE_NAME` | `link-of-trust` | Service name |

#![warn(missing_docs)]

mod config;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use tracing_setup::build_filter;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The filter directive could not be parsed.
    #[error("Invalid log filter: {0}")]
    Filter(String),

    /// A global subscriber is already installed.
    #[error("Failed to install subscriber: {0}")]
    SubscriberInit(String),
}

/// Install logging. Hold the returned guard for the lifetime of the program.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    tracing_setup::init_tracing(&config)?;

    tracing::info!(
        service = %config.service_name,
        json = config.json_logs,
        "Logging initialized"
    );

    Ok(TelemetryGuard {
        service_name: config.service_name,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    service_name: String,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::debug!(service = %self.service_name, "Shutting down telemetry");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails() {
        let config = TelemetryConfig {
            ansi: false,
            ..Default::default()
        };
        let first = init_telemetry(config.clone());
        assert!(first.is_ok());
        assert!(matches!(
            init_telemetry(config),
            Err(TelemetryError::SubscriberInit(_))
        ));
    }
}
