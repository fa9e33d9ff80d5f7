use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
    #[serde(default = "default_provider_delay_ms")]
    pub provider_delay_ms: u64,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_theme() -> String {
    "lavender".to_string()
}
fn default_tick_rate_ms() -> u64 {
    16
}
fn default_provider_delay_ms() -> u64 {
    500
}
fn default_data_dir() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wordcard")
        .to_string_lossy()
        .to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            tick_rate_ms: default_tick_rate_ms(),
            provider_delay_ms: default_provider_delay_ms(),
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(path)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wordcard")
            .join("config.toml")
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    /// Clamp numeric fields into their working ranges and fall back to the
    /// default theme when the configured one is unknown.
    pub fn validate(&mut self, valid_themes: &[&str]) {
        self.tick_rate_ms = self.tick_rate_ms.clamp(5, 250);
        self.provider_delay_ms = self.provider_delay_ms.min(5000);
        if !valid_themes.contains(&self.theme.as_str()) {
            self.theme = default_theme();
        }
        if self.data_dir.trim().is_empty() {
            self.data_dir = default_data_dir();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.theme, "lavender");
        assert_eq!(config.tick_rate_ms, 16);
        assert_eq!(config.provider_delay_ms, 500);
        assert_eq!(config.log_level, "info");
        assert!(config.data_dir.contains("wordcard"));
    }

    #[test]
    fn test_config_serde_partial_file() {
        let toml_str = r#"
theme = "terminal-dark"
provider_delay_ms = 0
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.theme, "terminal-dark");
        assert_eq!(config.provider_delay_ms, 0);
        assert_eq!(config.tick_rate_ms, 16);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.theme, deserialized.theme);
        assert_eq!(config.data_dir, deserialized.data_dir);
        assert_eq!(config.tick_rate_ms, deserialized.tick_rate_ms);
    }

    #[test]
    fn test_validate_clamps_values() {
        let mut config = Config::default();
        config.tick_rate_ms = 0;
        config.provider_delay_ms = 60_000;
        config.theme = "nonexistent".to_string();
        config.data_dir = "  ".to_string();

        config.validate(&["lavender", "terminal-dark"]);

        assert_eq!(config.tick_rate_ms, 5);
        assert_eq!(config.provider_delay_ms, 5000);
        assert_eq!(config.theme, "lavender");
        assert!(config.data_dir.contains("wordcard"));
    }

    #[test]
    fn test_validate_keeps_known_theme() {
        let mut config = Config::default();
        config.theme = "terminal-dark".to_string();
        config.validate(&["lavender", "terminal-dark"]);
        assert_eq!(config.theme, "terminal-dark");
    }
}
