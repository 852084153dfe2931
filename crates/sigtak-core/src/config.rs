//! Configuration for the SigTAK gateway.
//!
//! Settings are loaded from a YAML file and can be overridden per-field
//! with `SIGTAK__`-prefixed environment variables, e.g.
//! `SIGTAK__DAEMON__PORT=7584` or `SIGTAK__COT__DESTINATION=10.0.0.5:4242`.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration for the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// signal-cli JSON-RPC daemon to read chat messages from
    #[serde(default)]
    pub daemon: DaemonSettings,

    /// CoT output settings
    #[serde(default)]
    pub cot: CotSettings,

    /// Reconnect policy for the daemon connection
    #[serde(default)]
    pub reconnect: ReconnectSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            daemon: DaemonSettings::default(),
            cot: CotSettings::default(),
            reconnect: ReconnectSettings::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Address of the signal-cli daemon (started with `daemon --tcp`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonSettings {
    #[serde(default = "default_daemon_host")]
    pub host: String,
    #[serde(default = "default_daemon_port")]
    pub port: u16,
}

impl Default for DaemonSettings {
    fn default() -> Self {
        Self {
            host: default_daemon_host(),
            port: default_daemon_port(),
        }
    }
}

impl DaemonSettings {
    /// `host:port` form used for connecting.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Where and how CoT events are emitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CotSettings {
    /// UDP destination as `host:port`, resolved once at startup
    #[serde(default = "default_cot_destination")]
    pub destination: String,
    /// Seconds until an emitted event goes stale on the display
    #[serde(default = "default_stale_secs")]
    pub stale_secs: u64,
}

impl Default for CotSettings {
    fn default() -> Self {
        Self {
            destination: default_cot_destination(),
            stale_secs: default_stale_secs(),
        }
    }
}

/// Backoff policy for re-establishing the daemon connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconnectSettings {
    #[serde(default = "default_initial_backoff_secs")]
    pub initial_backoff_secs: u64,
    #[serde(default = "default_max_backoff_secs")]
    pub max_backoff_secs: u64,
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
    /// Maximum attempts before giving up (None = retry forever)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: Option<u32>,
}

impl Default for ReconnectSettings {
    fn default() -> Self {
        Self {
            initial_backoff_secs: default_initial_backoff_secs(),
            max_backoff_secs: default_max_backoff_secs(),
            backoff_multiplier: default_backoff_multiplier(),
            max_attempts: default_max_attempts(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log level when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_daemon_host() -> String {
    "127.0.0.1".to_string()
}

fn default_daemon_port() -> u16 {
    // signal-cli's default TCP JSON-RPC port
    7583
}

fn default_cot_destination() -> String {
    "127.0.0.1:4242".to_string()
}

fn default_stale_secs() -> u64 {
    120
}

fn default_initial_backoff_secs() -> u64 {
    1
}

fn default_max_backoff_secs() -> u64 {
    60
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_max_attempts() -> Option<u32> {
    Some(10)
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Loads configuration from a YAML file, merged with `SIGTAK__`
    /// environment variable overrides.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(true))
            .add_source(
                config::Environment::with_prefix("SIGTAK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ConfigError::load_failed(path.display().to_string(), e.to_string()))?;

        settings
            .try_deserialize()
            .map_err(|e| ConfigError::InvalidFormat {
                reason: e.to_string(),
            })
    }

    /// Loads configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::InvalidFormat {
            reason: e.to_string(),
        })
    }

    /// Validates all settings, returning the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.daemon.host.is_empty() {
            return Err(ConfigError::invalid_value("daemon.host", "must not be empty"));
        }

        if self.daemon.port == 0 {
            return Err(ConfigError::invalid_value("daemon.port", "must not be zero"));
        }

        match self.cot.destination.rsplit_once(':') {
            Some((host, port)) if !host.is_empty() => {
                if port.parse::<u16>().map(|p| p == 0).unwrap_or(true) {
                    return Err(ConfigError::invalid_value(
                        "cot.destination",
                        format!("invalid port {:?}", port),
                    ));
                }
            }
            _ => {
                return Err(ConfigError::invalid_value(
                    "cot.destination",
                    "expected host:port",
                ));
            }
        }

        if self.cot.stale_secs == 0 {
            return Err(ConfigError::invalid_value("cot.stale_secs", "must be positive"));
        }

        if self.reconnect.backoff_multiplier < 1.0 {
            return Err(ConfigError::invalid_value(
                "reconnect.backoff_multiplier",
                "must be at least 1.0",
            ));
        }

        Ok(())
    }
}
