use crate::voice::Language;
use crate::workflows::assessment::TriageThresholds;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the triage service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub triage: TriageConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let high = threshold_from_env("TRIAGE_HIGH_THRESHOLD", TriageThresholds::DEFAULT_HIGH)?;
        let medium =
            threshold_from_env("TRIAGE_MEDIUM_THRESHOLD", TriageThresholds::DEFAULT_MEDIUM)?;
        let thresholds = TriageThresholds::new(high, medium)
            .ok_or(ConfigError::ThresholdOrder { high, medium })?;

        let voice_language = match env::var("TRIAGE_VOICE_LANGUAGE") {
            Ok(raw) => raw
                .parse::<Language>()
                .map_err(|_| ConfigError::UnknownLanguage(raw))?,
            Err(_) => Language::default(),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                ansi: environment == AppEnvironment::Development,
                with_targets: environment != AppEnvironment::Production,
            },
            triage: TriageConfig {
                thresholds,
                voice_language,
            },
        })
    }
}

fn threshold_from_env(name: &'static str, default: f64) -> Result<f64, ConfigError> {
    let raw = match env::var(name) {
        Ok(raw) => raw,
        Err(_) => return Ok(default),
    };

    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ConfigError::InvalidThreshold { name, value: raw }),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Log filter and formatting controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub ansi: bool,
    pub with_targets: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            ansi: false,
            with_targets: false,
        }
    }
}

/// Scoring and voice settings for the assessment flow.
#[derive(Debug, Clone, Default)]
pub struct TriageConfig {
    pub thresholds: TriageThresholds,
    pub voice_language: Language,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidThreshold { name: &'static str, value: String },
    ThresholdOrder { high: f64, medium: f64 },
    UnknownLanguage(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidThreshold { name, value } => {
                write!(f, "{name} must be a number, got '{value}'")
            }
            ConfigError::ThresholdOrder { high, medium } => write!(
                f,
                "triage thresholds must satisfy 0 <= medium ({medium}) <= high ({high}) <= 1"
            ),
            ConfigError::UnknownLanguage(value) => write!(
                f,
                "TRIAGE_VOICE_LANGUAGE must be punjabi, hindi or english, got '{value}'"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidThreshold { .. }
            | ConfigError::ThresholdOrder { .. }
            | ConfigError::UnknownLanguage(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for name in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "TRIAGE_HIGH_THRESHOLD",
            "TRIAGE_MEDIUM_THRESHOLD",
            "TRIAGE_VOICE_LANGUAGE",
        ] {
            env::remove_var(name);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.triage.thresholds, TriageThresholds::default());
        assert_eq!(config.triage.voice_language, Language::Punjabi);
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn reads_threshold_and_language_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("TRIAGE_HIGH_THRESHOLD", "0.8");
        env::set_var("TRIAGE_MEDIUM_THRESHOLD", "0.5");
        env::set_var("TRIAGE_VOICE_LANGUAGE", "hindi");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.triage.thresholds.high, 0.8);
        assert_eq!(config.triage.thresholds.medium, 0.5);
        assert_eq!(config.triage.voice_language, Language::Hindi);
        reset_env();
    }

    #[test]
    fn rejects_inverted_thresholds() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("TRIAGE_HIGH_THRESHOLD", "0.3");
        env::set_var("TRIAGE_MEDIUM_THRESHOLD", "0.6");
        match AppConfig::load() {
            Err(ConfigError::ThresholdOrder { .. }) => {}
            other => panic!("expected threshold order error, got {other:?}"),
        }
        reset_env();
    }

    #[test]
    fn rejects_non_numeric_threshold_and_unknown_language() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("TRIAGE_HIGH_THRESHOLD", "very");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidThreshold {
                name: "TRIAGE_HIGH_THRESHOLD",
                ..
            })
        ));

        reset_env();
        env::set_var("TRIAGE_VOICE_LANGUAGE", "klingon");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::UnknownLanguage(_))
        ));
        reset_env();
    }
}
