//! User configuration persisted between invocations
//!
//! Stores the preferred city and display language as a small JSON file in
//! the XDG config directory. The core treats this as read-only input; only
//! the `setup` command writes it.

use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::i18n::Language;

/// Environment variable overriding the config directory, used by tests
pub const CONFIG_DIR_ENV: &str = "SALATY_CONFIG_DIR";

/// Name of the config file inside the config directory
const CONFIG_FILE_NAME: &str = "config.json";

/// Saved user preferences.
///
/// The city is optional because a fresh install has a language default but
/// no saved city; callers that need a city resolve it from here or from a
/// command-line override before invoking the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    /// Preferred city id from the supported-city registry
    pub city_id: Option<String>,
    /// Preferred display language
    #[serde(default)]
    pub language: Language,
}

/// Reads and writes the config file
#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_dir: PathBuf,
}

impl ConfigStore {
    /// Creates a store over the XDG config directory (`~/.config/salaty/` on
    /// Linux), honoring the `SALATY_CONFIG_DIR` environment variable when
    /// set. Returns `None` if no config directory can be determined.
    pub fn new() -> Option<Self> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Some(Self {
                config_dir: PathBuf::from(dir),
            });
        }
        let project_dirs = ProjectDirs::from("", "", "salaty")?;
        Some(Self {
            config_dir: project_dirs.config_dir().to_path_buf(),
        })
    }

    /// Creates a store over a custom directory, for tests
    pub fn with_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    fn config_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    /// Loads the saved configuration.
    ///
    /// A missing or unparseable file reads as `None`; resolving that (via
    /// `setup`) is the caller's responsibility.
    pub fn load(&self) -> Option<UserConfig> {
        let content = fs::read_to_string(self.config_path()).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Saves the configuration, creating the directory if needed.
    pub fn save(&self, config: &UserConfig) -> std::io::Result<()> {
        fs::create_dir_all(&self.config_dir)?;
        let json = serde_json::to_string_pretty(config)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(self.config_path(), json)
    }
}
