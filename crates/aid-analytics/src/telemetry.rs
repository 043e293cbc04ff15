use crate::config::TelemetryConfig;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

/// Reasons the dashboard could not set up its diagnostic logging.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("dashboard log filter '{value}' (APP_LOG_LEVEL) is not a valid tracing directive")]
    InvalidLogFilter {
        value: String,
        #[source]
        source: ParseError,
    },
    #[error("dashboard logging was already initialized: {0}")]
    AlreadyInitialized(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Builds the filter from `RUST_LOG`, falling back to the configured level.
pub fn env_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.log_level).map_err(|source| {
            TelemetryError::InvalidLogFilter {
                value: config.log_level.clone(),
                source,
            }
        }),
    }
}

/// Installs the global subscriber. Logs go to stderr so report output on stdout stays clean.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config)?)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::AlreadyInitialized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unparseable_levels() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = TelemetryConfig {
            log_level: "aid_analytics=loud".to_string(),
        };

        match env_filter(&config) {
            Err(error @ TelemetryError::InvalidLogFilter { .. }) => {
                assert!(error.to_string().contains("'aid_analytics=loud'"));
                assert!(std::error::Error::source(&error).is_some());
            }
            other => panic!("expected filter error, got {other:?}"),
        }
    }

    #[test]
    fn accepts_directive_lists() {
        let config = TelemetryConfig {
            log_level: "warn,aid_analytics=debug".to_string(),
        };

        assert!(env_filter(&config).is_ok());
    }
}
