//! habitd configuration types and loading

use chrono::NaiveTime;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main habitd configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Text generator configuration
    pub generator: GeneratorConfig,

    /// Weekly planning limits
    pub planning: PlanningConfig,

    /// Storage configuration
    pub storage: StorageConfig,

    /// Daily maintenance sweep configuration
    pub maintenance: MaintenanceConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Degenerate values are rejected here, at load time, so the planner and
    /// scheduler never have to defend against them. Call early in startup.
    pub fn validate(&self) -> Result<()> {
        if std::env::var(&self.generator.api_key_env).is_err() {
            return Err(eyre::eyre!(
                "Generator API key not found. Set the {} environment variable.",
                self.generator.api_key_env
            ));
        }

        if self.planning.max_weekly_tasks == 0 {
            return Err(eyre::eyre!("planning.max-weekly-tasks must be at least 1"));
        }

        self.maintenance
            .sweep_time()
            .wrap_err("maintenance.sweep-time must be HH:MM")?;

        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .habitd.yml
        let local_config = PathBuf::from(".habitd.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/habitd/habitd.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("habitd").join("habitd.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Text generator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Provider name (currently only "anthropic" supported)
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            provider: "anthropic".to_string(),
            model: "claude-sonnet-4-20250514".to_string(),
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            max_tokens: 4096,
            timeout_ms: 60_000,
        }
    }
}

/// Weekly planning limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningConfig {
    /// Hard cap on the number of tasks generated per week
    #[serde(rename = "max-weekly-tasks")]
    pub max_weekly_tasks: u32,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self { max_weekly_tasks: 30 }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the weekly plan, history, and users files
    #[serde(rename = "data-dir")]
    pub data_dir: PathBuf,
}

impl StorageConfig {
    /// Path of the account layer's users file (read-only from this core)
    pub fn users_file(&self) -> PathBuf {
        self.data_dir.join("users.json")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        // Use XDG data directory (~/.local/share/habitd on Linux)
        let data_dir = dirs::data_dir()
            .map(|d| d.join("habitd"))
            .unwrap_or_else(|| PathBuf::from(".habitd"));

        Self { data_dir }
    }
}

/// Daily maintenance sweep configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MaintenanceConfig {
    /// Wall-clock time (server-local, HH:MM) at which the sweep fires
    #[serde(rename = "sweep-time")]
    pub sweep_time: String,
}

impl MaintenanceConfig {
    /// Parse the configured sweep time
    pub fn sweep_time(&self) -> Result<NaiveTime> {
        NaiveTime::parse_from_str(&self.sweep_time, "%H:%M")
            .map_err(|e| eyre::eyre!("invalid sweep-time '{}': {}", self.sweep_time, e))
    }
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            sweep_time: "18:30".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.generator.provider, "anthropic");
        assert_eq!(config.planning.max_weekly_tasks, 30);
        assert_eq!(config.maintenance.sweep_time, "18:30");
    }

    #[test]
    fn test_sweep_time_parses() {
        let config = MaintenanceConfig::default();
        let time = config.sweep_time().unwrap();
        assert_eq!(time, NaiveTime::from_hms_opt(18, 30, 0).unwrap());
    }

    #[test]
    fn test_sweep_time_rejects_garbage() {
        let config = MaintenanceConfig {
            sweep_time: "half past six".to_string(),
        };
        assert!(config.sweep_time().is_err());
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
generator:
  provider: anthropic
  model: claude-opus-4
  api-key-env: MY_API_KEY
  base-url: https://api.example.com
  max-tokens: 8192
  timeout-ms: 30000

planning:
  max-weekly-tasks: 14

maintenance:
  sweep-time: "21:00"
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.generator.model, "claude-opus-4");
        assert_eq!(config.generator.api_key_env, "MY_API_KEY");
        assert_eq!(config.generator.timeout_ms, 30000);
        assert_eq!(config.planning.max_weekly_tasks, 14);
        assert_eq!(
            config.maintenance.sweep_time().unwrap(),
            NaiveTime::from_hms_opt(21, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
planning:
  max-weekly-tasks: 7
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        // Specified value
        assert_eq!(config.planning.max_weekly_tasks, 7);

        // Defaults for unspecified
        assert_eq!(config.generator.provider, "anthropic");
        assert_eq!(config.maintenance.sweep_time, "18:30");
    }

    #[test]
    fn test_users_file_path() {
        let storage = StorageConfig {
            data_dir: PathBuf::from("/data/habitd"),
        };
        assert_eq!(storage.users_file(), PathBuf::from("/data/habitd/users.json"));
    }
}
