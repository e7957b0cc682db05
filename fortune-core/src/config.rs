use crate::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

pub const ENV_API_BASE_URL: &str = "FORTUNE_API_BASE_URL";
pub const ENV_API_TIMEOUT_SECS: &str = "FORTUNE_API_TIMEOUT_SECS";

/// The sub-step counter of the reading animation never exceeds this.
pub const MAX_ANIMATION_STEPS: u8 = 4;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub dashboard: DashboardConfig,
    pub reading: ReadingConfig,
    pub share: ShareConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_read_attempts: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            timeout_secs: 30,
            max_read_attempts: 3,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn parsed_base_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidValue {
            field: "api.base_url".to_string(),
            value: format!("{} ({})", self.base_url, e),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Whether `sync_data` still reloads when the sync request itself fails.
    pub reload_after_failed_sync: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            reload_after_failed_sync: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReadingConfig {
    pub step_delay_ms: u64,
    pub final_pause_ms: u64,
    pub animation_steps: u8,
    pub share_origin: String,
}

impl Default for ReadingConfig {
    fn default() -> Self {
        Self {
            step_delay_ms: 800,
            final_pause_ms: 1000,
            animation_steps: MAX_ANIMATION_STEPS,
            share_origin: "https://threadsfortune.app".to_string(),
        }
    }
}

impl ReadingConfig {
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    pub fn final_pause(&self) -> Duration {
        Duration::from_millis(self.final_pause_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShareConfig {
    pub toast_duration_ms: u64,
    pub image_file_name: String,
    pub download_dir: Option<PathBuf>,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            toast_duration_ms: 3000,
            image_file_name: "my-creator-dna.png".to_string(),
            download_dir: None,
        }
    }
}

impl ShareConfig {
    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }
}

impl AppConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML file, apply environment overrides, then validate.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ConfigError::InvalidFormat {
                details: format!("{}: {}", path.display(), e),
            },
        })?;
        info!("Loading configuration from {}", path.display());

        let mut config: AppConfig = toml::from_str(&raw)?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults plus environment overrides, for running without a file.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = AppConfig::default();
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply_env_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(base_url) = lookup(ENV_API_BASE_URL) {
            debug!("{} overrides api.base_url", ENV_API_BASE_URL);
            self.api.base_url = base_url;
        }
        if let Some(raw) = lookup(ENV_API_TIMEOUT_SECS) {
            self.api.timeout_secs = raw.parse().map_err(|_| ConfigError::InvalidValue {
                field: ENV_API_TIMEOUT_SECS.to_string(),
                value: raw.clone(),
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api.parsed_base_url()?;

        if self.api.timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed {
                reason: "api.timeout_secs must be greater than zero".to_string(),
            });
        }
        if self.api.max_read_attempts == 0 {
            return Err(ConfigError::ValidationFailed {
                reason: "api.max_read_attempts must be at least 1".to_string(),
            });
        }
        if self.reading.animation_steps == 0 || self.reading.animation_steps > MAX_ANIMATION_STEPS
        {
            return Err(ConfigError::InvalidValue {
                field: "reading.animation_steps".to_string(),
                value: self.reading.animation_steps.to_string(),
            });
        }
        if self.share.image_file_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "share.image_file_name".to_string(),
                value: String::new(),
            });
        }
        Ok(())
    }
}
