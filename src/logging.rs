//! Tracing subscriber setup.
//!
//! `RUST_LOG` wins over the configured level when it is set. Log lines go to
//! stderr so that command output on stdout stays machine-readable.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::error::{BridgeError, BridgeResult};

/// Build the filter: `RUST_LOG` if present, the configured level otherwise.
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Install the global subscriber.
///
/// Fails with [`BridgeError::Logging`] if a subscriber is already installed.
pub fn init(config: &LoggingConfig) -> BridgeResult<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_writer(std::io::stderr);

    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|err| BridgeError::Logging(err.to_string()))
}
