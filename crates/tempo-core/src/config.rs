use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::TempoError;

/// Top-level Tempo configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub skill: SkillSettings,
    #[serde(default)]
    pub channel: ChannelConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
}

/// General skill settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillSettings {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for SkillSettings {
    fn default() -> Self {
        Self {
            name: default_name(),
            log_level: default_log_level(),
        }
    }
}

/// Transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ChannelConfig {
    pub console: Option<ConsoleConfig>,
}

/// Console transport — stdin utterances, stdout responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Reply destination attached to requests read from stdin.
    #[serde(default = "default_console_topic")]
    pub output_topic: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            output_topic: default_console_topic(),
        }
    }
}

/// Persistence config. Disabled means in-memory-only operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            db_path: default_db_path(),
        }
    }
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist.
pub fn load(path: &str) -> Result<Config, TempoError> {
    let path = Path::new(path);
    if !path.exists() {
        tracing::info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(Config {
            channel: ChannelConfig {
                console: Some(ConsoleConfig::default()),
            },
            ..Default::default()
        });
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| TempoError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| TempoError::Config(format!("failed to parse config: {}", e)))?;

    Ok(config)
}

fn default_true() -> bool {
    true
}

fn default_name() -> String {
    "tempo".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_console_topic() -> String {
    "assistant/console/output".to_string()
}

fn default_db_path() -> String {
    "~/.tempo/data/tempo.db".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_sections_missing() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.skill.name, "tempo");
        assert_eq!(cfg.skill.log_level, "info");
        assert!(!cfg.memory.enabled);
        assert!(cfg.channel.console.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [skill]
            name = "kitchen-tempo"

            [channel.console]
            enabled = true
            output_topic = "assistant/kitchen/output"

            [memory]
            enabled = true
            db_path = "/tmp/tempo.db"
        "#;
        let cfg: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.skill.name, "kitchen-tempo");
        let console = cfg.channel.console.unwrap();
        assert!(console.enabled);
        assert_eq!(console.output_topic, "assistant/kitchen/output");
        assert!(cfg.memory.enabled);
        assert_eq!(cfg.memory.db_path, "/tmp/tempo.db");
    }

    #[test]
    fn test_shellexpand_home() {
        std::env::set_var("HOME", "/home/test");
        assert_eq!(shellexpand("~/x.db"), "/home/test/x.db");
        assert_eq!(shellexpand("/abs/x.db"), "/abs/x.db");
    }
}
