use std::path::{Path, PathBuf};
use std::{fs, io};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const CONFIG_DIR: &str = "whichspace";
const CONFIG_FILE: &str = "config.toml";
const DEFAULT_WATCH_PATH: &str = "~/Library/Preferences/com.apple.spaces.plist";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse {path}: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },
    #[error("invalid config: {0}")]
    Invalid(String),
}

pub fn config_file() -> PathBuf {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .filter(|p| p.is_absolute())
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join(CONFIG_DIR).join(CONFIG_FILE)
}

/// Expands a leading `~` against the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    pub label: LabelSettings,
    pub watch: WatchSettings,
    pub menu: MenuSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelStrategy {
    /// Number Spaces 1..=N by their order on the display.
    #[default]
    Position,
    /// Show raw Space ids inside `value_range`, split by value.
    Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct LabelSettings {
    pub strategy: LabelStrategy,
    pub value_range: [u64; 2],
    pub separator: String,
    pub active_font_size: f64,
    pub neighbor_font_size: f64,
    pub neighbor_baseline_offset: f64,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            strategy: LabelStrategy::Position,
            value_range: [1, 16],
            separator: " ".to_string(),
            active_font_size: 12.0,
            neighbor_font_size: 10.0,
            neighbor_baseline_offset: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct WatchSettings {
    pub enabled: bool,
    pub path: PathBuf,
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            path: PathBuf::from(DEFAULT_WATCH_PATH),
        }
    }
}

impl WatchSettings {
    pub fn resolved_path(&self) -> PathBuf { expand_tilde(&self.path) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplaySelection {
    /// The display showing the active Space.
    #[default]
    Active,
    /// Always the first display the window server reports.
    Main,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct MenuSettings {
    pub list_spaces: bool,
    pub display: DisplaySelection,
}

impl Default for MenuSettings {
    fn default() -> Self {
        Self {
            list_spaces: true,
            display: DisplaySelection::Active,
        }
    }
}

impl Config {
    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> { toml::from_str(contents) }

    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads an explicitly given `path`, which must exist, or else the
    /// default location, falling back to defaults when that is absent.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                let config = Self::read(path)?;
                info!(?path, "Loaded config");
                Ok(config)
            }
            None => Self::load_or_default(&config_file()),
        }
    }

    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(?path, "No config file; using defaults");
            return Ok(Self::default());
        }
        let config = Self::read(path)?;
        info!(?path, "Loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let [low, high] = self.label.value_range;
        if low > high {
            return Err(ConfigError::Invalid(format!(
                "label.value_range lower bound {low} exceeds upper bound {high}"
            )));
        }
        for (name, size) in [
            ("label.active_font_size", self.label.active_font_size),
            ("label.neighbor_font_size", self.label.neighbor_font_size),
        ] {
            if !(size > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be positive")));
            }
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> { toml::to_string_pretty(self) }
}
