// src/core/config_manager.rs
//! Converter configuration: optional YAML/TOML file plus environment overrides

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::converter::HtmlOptions;
use crate::utils::get_file_extension;

pub const CONFIG_ENV: &str = "RESUME_CONVERTER_CONFIG";
pub const PORT_ENV: &str = "RESUME_CONVERTER_PORT";
pub const ESCAPE_HTML_ENV: &str = "RESUME_CONVERTER_ESCAPE_HTML";
pub const DEFAULT_CONFIG_FILES: [&str; 2] = ["resume-converter.yaml", "resume-converter.toml"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    pub html: HtmlOptions,
    pub server: ServerSettings,
    pub output: OutputSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub address: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Keep a timestamped copy of an output file before overwriting it
    pub backup_existing: bool,
}

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub converter: ConverterConfig,
    pub source: Option<PathBuf>,
}

impl ConfigManager {
    /// Load configuration from `explicit`, `$RESUME_CONVERTER_CONFIG`, or a
    /// default file in the working directory, then apply env overrides.
    /// Without any file the defaults are used.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let source = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => std::env::var(CONFIG_ENV)
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    DEFAULT_CONFIG_FILES
                        .iter()
                        .map(PathBuf::from)
                        .find(|p| p.exists())
                }),
        };

        let mut converter = match &source {
            Some(path) => Self::load_from_file(path)?,
            None => {
                info!("No configuration file found, using defaults");
                ConverterConfig::default()
            }
        };

        Self::apply_overrides(&mut converter, |name| std::env::var(name).ok())?;

        Ok(Self { converter, source })
    }

    pub fn load_from_file(path: &Path) -> Result<ConverterConfig> {
        if !path.exists() {
            anyhow::bail!("Configuration file not found: {}", path.display());
        }
        info!("Loading configuration from {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let name = path.to_string_lossy();
        match get_file_extension(&name).as_deref() {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display())),
            Some("toml") => toml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display())),
            _ => anyhow::bail!(
                "Unsupported configuration format: {}. Use .yaml or .toml",
                path.display()
            ),
        }
    }

    /// Apply `RESUME_CONVERTER_*` overrides read through `lookup`
    pub fn apply_overrides(
        config: &mut ConverterConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<()> {
        if let Some(port) = lookup(PORT_ENV) {
            config.server.port = port
                .trim()
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("{} must be a valid port number", PORT_ENV))?;
        }

        if let Some(escape) = lookup(ESCAPE_HTML_ENV) {
            config.html.escape_values = match escape.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                other => anyhow::bail!("{} must be a boolean, got '{}'", ESCAPE_HTML_ENV, other),
            };
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn temp_config(ext: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "resume-converter-{}.{}",
            uuid::Uuid::new_v4().simple(),
            ext
        ));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let config = ConverterConfig::default();
        assert!(config.html.escape_values);
        assert_eq!(config.html.lang, "en");
        assert_eq!(config.server.port, 8000);
        assert!(!config.output.backup_existing);
    }

    #[test]
    fn test_load_yaml_with_partial_sections() {
        let path = temp_config("yaml", "html:\n  escape_values: false\nserver:\n  port: 9100\n");
        let config = ConfigManager::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert!(!config.html.escape_values);
        assert_eq!(config.html.lang, "en");
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.address, "127.0.0.1");
    }

    #[test]
    fn test_load_toml() {
        let path = temp_config(
            "toml",
            "[html]\nlang = \"fr\"\nextra_css = \"h1 { color: red; }\"\n\n[output]\nbackup_existing = true\n",
        );
        let config = ConfigManager::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.html.lang, "fr");
        assert_eq!(config.html.extra_css.as_deref(), Some("h1 { color: red; }"));
        assert!(config.output.backup_existing);
    }

    #[test]
    fn test_missing_and_unsupported_files() {
        assert!(ConfigManager::load_from_file(Path::new("/nonexistent/config.yaml")).is_err());

        let path = temp_config("ini", "port=1");
        let err = ConfigManager::load_from_file(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(err.to_string().contains("Unsupported configuration format"));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [(PORT_ENV, "8123"), (ESCAPE_HTML_ENV, "off")].into();
        let mut config = ConverterConfig::default();

        ConfigManager::apply_overrides(&mut config, |name| env.get(name).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.server.port, 8123);
        assert!(!config.html.escape_values);
    }

    #[test]
    fn test_invalid_overrides() {
        let mut config = ConverterConfig::default();
        let bad_port = ConfigManager::apply_overrides(&mut config, |name| {
            (name == PORT_ENV).then(|| "not-a-port".to_string())
        });
        assert!(bad_port.is_err());

        let bad_bool = ConfigManager::apply_overrides(&mut config, |name| {
            (name == ESCAPE_HTML_ENV).then(|| "maybe".to_string())
        });
        assert!(bad_bool.is_err());
    }

    #[test]
    fn test_load_with_explicit_path() {
        let path = temp_config("yml", "server:\n  address: 0.0.0.0\n");
        let manager = ConfigManager::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(manager.source.as_deref(), Some(path.as_path()));
        assert_eq!(manager.converter.server.address, "0.0.0.0");
    }
}
