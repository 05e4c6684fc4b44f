//! Persisted settings for the `likes` binary.
//!
//! Settings live in a RON file. Every field is optional in the file; command
//! line flags are applied on top.

use std::fs;
use std::path::{Path, PathBuf};

use engine_logging::{engine_debug, engine_info};
use likes_engine::EngineConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_SETTINGS_FILE: &str = "likes.ron";
pub const DEFAULT_LIKES_URL: &str = "https://soundcloud.com/g_t_w_y/likes";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read settings {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub likes_url: String,
    pub engine: EngineConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            likes_url: DEFAULT_LIKES_URL.to_string(),
            engine: EngineConfig::default(),
        }
    }
}

/// Command line values that win over the settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub likes_url: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub download_dir: Option<PathBuf>,
    /// Appended to the configured keywords, not replacing them.
    pub exclude: Vec<String>,
}

impl Settings {
    /// An explicit path must exist. Without one, `likes.ron` in the working
    /// directory is used when present, otherwise the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::read(path),
            None => {
                let fallback = Path::new(DEFAULT_SETTINGS_FILE);
                if fallback.is_file() {
                    Self::read(fallback)
                } else {
                    engine_debug!("No settings file; using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::parse(&content).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })?;
        engine_info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    pub fn parse(content: &str) -> Result<Self, String> {
        ron::from_str(content).map_err(|err| err.to_string())
    }

    pub fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(url) = overrides.likes_url {
            self.likes_url = url;
        }
        if let Some(dir) = overrides.output_dir {
            self.engine.output_dir = dir;
        }
        if let Some(dir) = overrides.download_dir {
            self.engine.download_dir = dir;
        }
        self.engine.exclude_keywords.extend(overrides.exclude);
        self
    }
}
