//! Application configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory where projects are stored.
    pub projects_dir: PathBuf,

    /// Render engine connection settings.
    pub engine: EngineConfig,

    /// Job status polling cadence.
    pub polling: PollingConfig,

    /// Local fallback when the render engine is unreachable.
    pub degraded: DegradedModeConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Render engine endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Base URL of the render engine API (e.g. `http://localhost:8000`).
    pub base_url: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

/// Polling cadence for in-flight jobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Nominal interval between status queries.
    pub interval_ms: u64,

    /// Interval used after a failed status query.
    pub backoff_ms: u64,
}

/// Simulated progress parameters for degraded mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DegradedModeConfig {
    /// Time between simulated progress steps.
    pub tick_ms: u64,

    /// Progress added per step, in percent.
    pub step_percent: f64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "cutroom=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            projects_dir: dirs_default_projects(),
            engine: EngineConfig::default(),
            polling: PollingConfig::default(),
            degraded: DegradedModeConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            backoff_ms: 2000,
        }
    }
}

impl Default for DegradedModeConfig {
    fn default() -> Self {
        Self {
            tick_ms: 300,
            step_percent: 10.0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl EngineConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

/// Smallest simulated progress step, in percent.
pub const MIN_STEP_PERCENT: f64 = 1.0;

impl DegradedModeConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Number of simulated steps needed to reach 100%.
    ///
    /// Non-positive or non-finite step sizes fall back to a single step.
    /// Positive sizes below [`MIN_STEP_PERCENT`] are raised to it, capping the
    /// simulation at 100 steps.
    pub fn steps(&self) -> u32 {
        if !self.step_percent.is_finite() || self.step_percent <= 0.0 {
            return 1;
        }
        let step = self.step_percent.max(MIN_STEP_PERCENT);
        (100.0 / step).ceil().max(1.0) as u32
    }

    /// Upper bound on how long a degraded job takes to complete.
    pub fn completion_window(&self) -> Duration {
        self.tick() * self.steps()
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("cutroom").join("config.json")
}

/// Default projects directory.
fn dirs_default_projects() -> PathBuf {
    let base = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".local").join("share")
        });
    base.join("cutroom").join("projects")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_polling_cadence() {
        let polling = PollingConfig::default();
        assert_eq!(polling.interval(), Duration::from_secs(1));
        assert_eq!(polling.backoff(), Duration::from_secs(2));
    }

    #[test]
    fn test_degraded_window_is_bounded() {
        let degraded = DegradedModeConfig {
            tick_ms: 100,
            step_percent: 30.0,
        };
        assert_eq!(degraded.steps(), 4);
        assert_eq!(degraded.completion_window(), Duration::from_millis(400));
    }

    #[test]
    fn test_degraded_steps_never_zero() {
        let degraded = DegradedModeConfig {
            tick_ms: 100,
            step_percent: 0.0,
        };
        assert_eq!(degraded.steps(), 1);

        let degraded = DegradedModeConfig {
            tick_ms: 100,
            step_percent: 250.0,
        };
        assert_eq!(degraded.steps(), 1);
    }

    #[test]
    fn test_tiny_degraded_step_is_clamped() {
        let degraded = DegradedModeConfig {
            tick_ms: 300,
            step_percent: 1e-9,
        };
        assert_eq!(degraded.steps(), 100);
        assert_eq!(degraded.completion_window(), Duration::from_secs(30));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"engine": {"base_url": "http://render:9000"}}"#).unwrap();
        assert_eq!(config.engine.base_url, "http://render:9000");
        assert_eq!(config.engine.request_timeout_secs, 30);
        assert_eq!(config.polling.interval_ms, 1000);
        assert_eq!(config.logging.level, "info");
    }
}
