//! Logging setup for binaries and tests that embed the pipeline.
//!
//! Library code only emits `tracing` events; nothing is printed until a
//! subscriber is installed here or by the caller.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::config::{LogFormat, LoggingConfig};
use crate::error::{OracleError, OracleResult};

/// Install a global `fmt` subscriber for `config`.
///
/// Returns `Ok(false)` without changing anything if a global subscriber is
/// already installed, so repeated calls are harmless.
///
/// # Errors
///
/// `Configuration` if `config.level` is not a valid filter directive.
pub fn init_logging(config: &LoggingConfig) -> OracleResult<bool> {
    let env_filter = EnvFilter::try_new(&config.level).map_err(|e| {
        OracleError::Configuration(format!("invalid log level '{}': {e}", config.level))
    })?;

    let fmt_layer = match config.format {
        LogFormat::Console => fmt::layer().with_target(false).boxed(),
        LogFormat::Json => fmt::layer().with_target(true).json().boxed(),
    };

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .is_ok();
    if installed {
        tracing::debug!(level = %config.level, format = ?config.format, "logging initialized");
    }
    Ok(installed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        let config = LoggingConfig::default();
        init_logging(&config).unwrap();
        // A subscriber is installed now, whichever call installed it.
        assert!(!init_logging(&config).unwrap());
    }

    #[test]
    fn test_invalid_level() {
        let config = LoggingConfig {
            level: "kickback=notalevel".into(),
            format: LogFormat::Console,
        };
        assert!(matches!(
            init_logging(&config),
            Err(OracleError::Configuration(_))
        ));
    }
}
