use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
pub enum TelemetryError {
    InvalidFilter { value: String, source: ParseError },
    AlreadyInstalled(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::InvalidFilter { value, .. } => {
                write!(f, "log filter '{value}' could not be parsed")
            }
            TelemetryError::AlreadyInstalled(err) => {
                write!(f, "tracing subscriber already installed: {err}")
            }
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::InvalidFilter { source, .. } => Some(source),
            TelemetryError::AlreadyInstalled(err) => Some(&**err),
        }
    }
}

/// `RUST_LOG` wins over the configured level when it is set and valid.
pub fn build_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(&config.log_level).map_err(|source| TelemetryError::InvalidFilter {
        value: config.log_level.clone(),
        source,
    })
}

/// Install the global subscriber. Calling twice returns `AlreadyInstalled`.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = build_filter(config)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_targets)
        .with_ansi(config.ansi)
        .compact()
        .try_init()
        .map_err(TelemetryError::AlreadyInstalled)
}
