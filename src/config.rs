//! Configuration management
//!
//! Load and save user preferences to a TOML config file.

use anyhow::{Context, Result};
use directories::{ProjectDirs, UserDirs};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::style::{DEFAULT_COLOR, DEFAULT_FONT};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub style: StylePreferences,
    pub persistence: PersistencePreferences,
    pub session: SessionPreferences,
    pub export: ExportPreferences,
    pub logging: LoggingPreferences,
    pub ui: UiPreferences,
}

impl Config {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from an explicit path; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {:?}", path))?;
            let config: Config = toml::from_str(&contents)
                .with_context(|| format!("Invalid config: {:?}", path))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Record the last used style in the config file at `path`.
    ///
    /// The file is re-read first and only the style section changes. A file
    /// that cannot be read or parsed is left untouched and the error returned.
    pub fn remember_style_at(path: &Path, style: StylePreferences) -> Result<()> {
        let mut config = Self::load_from(path)?;
        config.style = style;
        config.save_to(path)
    }

    pub fn remember_style(style: StylePreferences) -> Result<()> {
        Self::remember_style_at(&Self::config_path()?, style)
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir().join("config.toml"))
    }

    /// Directory holding the config file and the log
    pub fn config_dir() -> PathBuf {
        match ProjectDirs::from("com", "inkname", "inkname") {
            Some(proj_dirs) => proj_dirs.config_dir().to_path_buf(),
            // Fallback to current directory
            None => PathBuf::from("."),
        }
    }
}

/// Style selected at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StylePreferences {
    pub default_font: String,
    pub default_color: String,
}

impl Default for StylePreferences {
    fn default() -> Self {
        Self {
            default_font: DEFAULT_FONT.to_string(),
            default_color: DEFAULT_COLOR.to_string(),
        }
    }
}

/// Signature backend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistencePreferences {
    pub enabled: bool,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for PersistencePreferences {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "http://127.0.0.1:8080".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Identity handed over by the login flow
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionPreferences {
    pub user_id: Option<i64>,
}

/// Where PNG downloads go
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportPreferences {
    pub directory: Option<PathBuf>,
}

impl ExportPreferences {
    /// Configured directory, else the user's download folder, else the working directory
    pub fn download_dir(&self) -> PathBuf {
        if let Some(dir) = &self.directory {
            return dir.clone();
        }
        UserDirs::new()
            .and_then(|dirs| dirs.download_dir().map(|d| d.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    pub level: String,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// UI preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiPreferences {
    pub show_glyph_preview: bool,
}

impl Default for UiPreferences {
    fn default() -> Self {
        Self {
            show_glyph_preview: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.style.default_font, "Brush Script MT, cursive");
        assert_eq!(config.style.default_color, "#000000");
        assert!(config.persistence.enabled);
        assert_eq!(config.persistence.timeout_secs, 10);
        assert!(config.session.user_id.is_none());
    }

    #[test]
    fn test_config_serialization() {
        let mut config = Config::default();
        config.session.user_id = Some(7);
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.session.user_id, Some(7));
        assert_eq!(parsed.persistence.base_url, config.persistence.base_url);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let parsed: Config = toml::from_str("[persistence]\nenabled = false\n").unwrap();
        assert!(!parsed.persistence.enabled);
        assert_eq!(parsed.persistence.timeout_secs, 10);
        assert_eq!(parsed.logging.level, "info");
    }

    fn scratch_config(label: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("inkname-config-{}-{}", label, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir.join("config.toml")
    }

    fn cursive_red() -> StylePreferences {
        StylePreferences {
            default_font: "cursive".to_string(),
            default_color: "red".to_string(),
        }
    }

    #[test]
    fn test_remember_style_keeps_other_sections() {
        let path = scratch_config("keep");
        std::fs::write(&path, "[session]\nuser_id = 42\n\n[persistence]\nenabled = false\n").unwrap();

        Config::remember_style_at(&path, cursive_red()).unwrap();

        let saved = Config::load_from(&path).unwrap();
        assert_eq!(saved.session.user_id, Some(42));
        assert!(!saved.persistence.enabled);
        assert_eq!(saved.style.default_font, "cursive");
        assert_eq!(saved.style.default_color, "red");
    }

    #[test]
    fn test_remember_style_leaves_broken_file_alone() {
        let path = scratch_config("broken");
        let broken = "[session]\nuser_id = \"not a number\"\n";
        std::fs::write(&path, broken).unwrap();

        assert!(Config::remember_style_at(&path, cursive_red()).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), broken);
    }

    #[test]
    fn test_remember_style_creates_missing_file() {
        let path = scratch_config("fresh");
        let _ = std::fs::remove_file(&path);

        Config::remember_style_at(&path, cursive_red()).unwrap();

        let saved = Config::load_from(&path).unwrap();
        assert_eq!(saved.style.default_color, "red");
        assert!(saved.session.user_id.is_none());
    }

    #[test]
    fn test_configured_download_dir_wins() {
        let prefs = ExportPreferences {
            directory: Some(PathBuf::from("/tmp/sigs")),
        };
        assert_eq!(prefs.download_dir(), PathBuf::from("/tmp/sigs"));
    }
}
