//! Reconnect backoff policy

use sigtak_core::config::ReconnectSettings;
use std::time::Duration;

/// Configuration for auto-reconnect behavior
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Initial backoff duration
    pub initial_backoff: Duration,
    /// Maximum backoff duration
    pub max_backoff: Duration,
    /// Backoff multiplier (for exponential backoff)
    pub backoff_multiplier: f64,
    /// Maximum number of reconnect attempts (None = infinite)
    pub max_attempts: Option<u32>,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(60),
            backoff_multiplier: 2.0,
            max_attempts: Some(10),
        }
    }
}

impl From<&ReconnectSettings> for ReconnectConfig {
    fn from(settings: &ReconnectSettings) -> Self {
        Self {
            initial_backoff: Duration::from_secs(settings.initial_backoff_secs),
            max_backoff: Duration::from_secs(settings.max_backoff_secs),
            backoff_multiplier: settings.backoff_multiplier,
            max_attempts: settings.max_attempts,
        }
    }
}

/// Exponential backoff duration for the given attempt, capped at the
/// configured maximum.
pub fn calculate_backoff(attempt: u32, config: &ReconnectConfig) -> Duration {
    let backoff_secs =
        config.initial_backoff.as_secs_f64() * config.backoff_multiplier.powi(attempt as i32);
    let capped_secs = backoff_secs.min(config.max_backoff.as_secs_f64());
    Duration::from_secs_f64(capped_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_calculation() {
        let config = ReconnectConfig {
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(60),
            backoff_multiplier: 2.0,
            max_attempts: None,
        };

        assert_eq!(calculate_backoff(0, &config), Duration::from_secs(1));
        assert_eq!(calculate_backoff(1, &config), Duration::from_secs(2));
        assert_eq!(calculate_backoff(2, &config), Duration::from_secs(4));
        assert_eq!(calculate_backoff(3, &config), Duration::from_secs(8));
        assert_eq!(calculate_backoff(10, &config), Duration::from_secs(60)); // capped
    }

    #[test]
    fn test_from_settings() {
        let settings = ReconnectSettings {
            initial_backoff_secs: 2,
            max_backoff_secs: 30,
            backoff_multiplier: 1.5,
            max_attempts: Some(5),
        };
        let config = ReconnectConfig::from(&settings);
        assert_eq!(config.initial_backoff, Duration::from_secs(2));
        assert_eq!(config.max_backoff, Duration::from_secs(30));
        assert_eq!(config.max_attempts, Some(5));
    }
}
