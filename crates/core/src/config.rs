use crate::filename::DEFAULT_TEXT_SEPARATOR;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Overrides the location of the config file.
pub const CONFIG_PATH_ENV: &str = "APPENDFILENAME_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub separator: String,
    pub rename_symlink_sources: bool,
    pub vocabulary: VocabularyConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_TEXT_SEPARATOR.to_string(),
            rename_symlink_sources: true,
            vocabulary: VocabularyConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct VocabularyConfig {
    /// Offered for completion in any case.
    pub initial_words: Vec<String>,
    /// Compared case-insensitively.
    pub blacklist: Vec<String>,
    pub min_word_len: usize,
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            initial_words: Vec::new(),
            blacklist: ["img", "jpg", "jpeg", "png", "bmp"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            min_word_len: 4,
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str::<Self>(raw).context("Failed to parse config file")
    }
}

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub config_path: PathBuf,
}

pub fn app_paths() -> Result<AppPaths> {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|v| !v.is_empty()) {
        let config_path = PathBuf::from(path);
        let config_dir = config_path
            .parent()
            .map(PathBuf::from)
            .unwrap_or_default();
        return Ok(AppPaths {
            config_dir,
            config_path,
        });
    }

    let proj = ProjectDirs::from("", "", "appendfilename")
        .context("Failed to determine the config directory of this OS")?;
    let config_dir = proj.config_dir().to_path_buf();
    Ok(AppPaths {
        config_path: config_dir.join("config.toml"),
        config_dir,
    })
}

pub fn load_config() -> Result<AppConfig> {
    let paths = app_paths()?;
    if !paths.config_path.exists() {
        log::debug!(
            "no config file at {}, using defaults",
            paths.config_path.display()
        );
        return Ok(AppConfig::default());
    }

    let raw = fs::read_to_string(&paths.config_path).with_context(|| {
        format!(
            "Failed to read config file: {}",
            paths.config_path.display()
        )
    })?;

    AppConfig::from_toml_str(&raw)
        .with_context(|| format!("Invalid config file: {}", paths.config_path.display()))
}

pub fn save_config(config: &AppConfig) -> Result<PathBuf> {
    let paths = app_paths()?;
    if !paths.config_dir.as_os_str().is_empty() {
        fs::create_dir_all(&paths.config_dir).with_context(|| {
            format!(
                "Failed to create config directory: {}",
                paths.config_dir.display()
            )
        })?;
    }
    let body = toml::to_string_pretty(config).context("Failed to serialize config")?;
    fs::write(&paths.config_path, body).with_context(|| {
        format!(
            "Failed to write config file: {}",
            paths.config_path.display()
        )
    })?;
    Ok(paths.config_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = AppConfig::from_toml_str("").expect("must parse");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.separator, " ");
        assert!(config.rename_symlink_sources);
        assert_eq!(config.vocabulary.min_word_len, 4);
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
separator = "_"

[vocabulary]
initial_words = ["Graz", "LaTeX"]
"#,
        )
        .expect("must parse");
        assert_eq!(config.separator, "_");
        assert!(config.rename_symlink_sources);
        assert_eq!(config.vocabulary.initial_words, vec!["Graz", "LaTeX"]);
        assert!(config.vocabulary.blacklist.contains(&"img".to_string()));
    }

    #[test]
    fn symlink_source_renaming_can_be_disabled() {
        let config =
            AppConfig::from_toml_str("rename_symlink_sources = false").expect("must parse");
        assert!(!config.rename_symlink_sources);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(AppConfig::from_toml_str("separator = ").is_err());
        assert!(AppConfig::from_toml_str("separator = 3").is_err());
    }

    #[test]
    fn default_config_round_trips_through_toml() {
        let body = toml::to_string_pretty(&AppConfig::default()).expect("serialize");
        let parsed = AppConfig::from_toml_str(&body).expect("must parse");
        assert_eq!(parsed, AppConfig::default());
    }
}
