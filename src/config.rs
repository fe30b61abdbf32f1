//! Configuration for auditr.
//!
//! Loaded from an explicit path, ~/.config/auditr/auditr.yml or ./auditr.yml,
//! falling back to defaults. Call [`Config::validate`] before building any
//! client so missing credentials fail at startup.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub llm: LlmConfig,
    pub audit: AuditConfig,
    pub mall: MallConfig,
    pub monitor: MonitorConfig,
    pub notify: NotifyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub base_url: String,
    pub api_key: Option<String>,
    pub temperature: f32,
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gemini-3-flash-preview-free".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            temperature: 0.1,
            timeout_ms: 120000,
        }
    }
}

/// What the engine returns when the last allowed step yields neither an
/// action nor a finish marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinalMalformedReply {
    /// Return the model's raw reply as a best-effort answer
    #[default]
    Raw,
    /// Return the step-budget sentinel
    Sentinel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub gold_threshold: u32,
    pub exp_threshold: u32,
    pub max_steps: u32,
    pub step_cooldown_secs: u64,
    pub rate_limit_cooldown_secs: u64,
    pub final_malformed_reply: FinalMalformedReply,
    pub prompt_template: Option<PathBuf>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            gold_threshold: 200,
            exp_threshold: 150,
            max_steps: 5,
            step_cooldown_secs: 60,
            rate_limit_cooldown_secs: 70,
            final_malformed_reply: FinalMalformedReply::Raw,
            prompt_template: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MallConfig {
    pub order_api: Option<String>,
    pub point_api: Option<String>,
    /// Session token sent as the Authorization header
    pub token: Option<String>,
    pub orders_per_scan: u32,
    pub point_page_size: u32,
    pub timeout_ms: u64,
}

impl Default for MallConfig {
    fn default() -> Self {
        Self {
            order_api: None,
            point_api: None,
            token: None,
            orders_per_scan: 5,
            point_page_size: 15,
            timeout_ms: 10000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub check_interval_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            check_interval_secs: 1800,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    pub webhook_url: Option<String>,
    pub console: bool,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            console: true,
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self, ConfigError> {
        // Explicit path takes precedence, and its failure is fatal
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let project_name = env!("CARGO_PKG_NAME");

        // Try primary location: ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        log::info!("Loaded config from: {}", path.display());
        Ok(config)
    }

    /// Check everything the auditor needs before any client is built
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.api_key.as_deref().is_none_or(|k| k.trim().is_empty()) {
            return Err(ConfigError::Missing("llm.api_key"));
        }
        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::Missing("llm.model"));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::Invalid {
                field: "llm.temperature",
                reason: format!("{} is outside 0.0..=2.0", self.llm.temperature),
            });
        }
        if self.audit.max_steps == 0 {
            return Err(ConfigError::Invalid {
                field: "audit.max_steps",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.mall.order_api.is_none() {
            return Err(ConfigError::Missing("mall.order_api"));
        }
        if self.mall.point_api.is_none() {
            return Err(ConfigError::Missing("mall.point_api"));
        }
        Ok(())
    }

    /// The API key, once [`Config::validate`] has passed
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.llm
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::Missing("llm.api_key"))
    }
}
