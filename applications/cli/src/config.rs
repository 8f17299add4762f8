//! BeatBox configuration
//!
//! Layered: built-in defaults, then `beatbox.toml`, then `BEATBOX_*`
//! environment variables (`__` separates sections, e.g.
//! `BEATBOX_SESSION__RESTART_THRESHOLD_MS=5000`).

use beatbox_playback::SessionConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "beatbox.toml";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The sources could not be read or merged
    #[error("Failed to load configuration: {0}")]
    Load(String),

    /// The merged configuration is unusable
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BeatboxConfig {
    #[serde(default = "default_library")]
    pub library: LibrarySettings,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibrarySettings {
    #[serde(default = "default_directories")]
    pub directories: Vec<PathBuf>,

    #[serde(default = "default_min_duration_ms")]
    pub min_duration_ms: u64,

    #[serde(default)]
    pub follow_links: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
}

impl Default for BeatboxConfig {
    fn default() -> Self {
        Self {
            library: default_library(),
            session: SessionConfig::default(),
            storage: default_storage(),
        }
    }
}

impl BeatboxConfig {
    /// Load from `path` (or `beatbox.toml` if present) and the environment
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("BEATBOX")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("library.directories")
                .try_parsing(true),
        );

        settings
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| ConfigError::Load(e.to_string()))
    }

    /// Replace the library directories when any are given on the command line
    pub fn with_directories(mut self, directories: Vec<PathBuf>) -> Self {
        if !directories.is_empty() {
            self.library.directories = directories;
        }
        self
    }

    /// Reject settings the session cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.library.directories.is_empty() {
            return Err(ConfigError::Invalid(
                "No library directories (set library.directories or pass DIR)".to_string(),
            ));
        }

        if self.session.release_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "session.release_timeout_ms must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

// Default values
fn default_library() -> LibrarySettings {
    LibrarySettings {
        directories: default_directories(),
        min_duration_ms: default_min_duration_ms(),
        follow_links: false,
    }
}

fn default_directories() -> Vec<PathBuf> {
    vec![PathBuf::from("./music")]
}

fn default_min_duration_ms() -> u64 {
    beatbox_library::DEFAULT_MIN_DURATION_MS
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        state_file: default_state_file(),
    }
}

fn default_state_file() -> PathBuf {
    PathBuf::from("./data/last_played.json")
}
