//! Optional TOML configuration for the windowed and headless front-ends.

use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use thiserror::Error;
use tracing::Level;

/// Contents of a configuration file. Missing tables and keys keep their defaults.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct FileConfig {
    window: WindowConfig,
    logging: LoggingConfig,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
struct WindowConfig {
    vsync: bool,
    show_fps: bool,
    max_ticks_per_frame: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            vsync: true,
            show_fps: false,
            max_ticks_per_frame: 8,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
struct LoggingConfig {
    level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
        }
    }
}

impl FileConfig {
    /// Reads and parses the configuration file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Merges command-line overrides into the file values.
    pub(crate) fn resolve(self, overrides: &Overrides) -> Result<Settings, ConfigError> {
        let level_name = overrides
            .log_level
            .clone()
            .unwrap_or(self.logging.level);
        let log_level =
            Level::from_str(&level_name).map_err(|_| ConfigError::InvalidLogLevel {
                level: level_name,
            })?;

        if self.window.max_ticks_per_frame == 0 {
            return Err(ConfigError::ZeroTickBudget);
        }

        Ok(Settings {
            vsync: overrides.vsync.unwrap_or(self.window.vsync),
            show_fps: overrides.show_fps || self.window.show_fps,
            max_ticks_per_frame: self.window.max_ticks_per_frame,
            log_level,
        })
    }
}

/// Values supplied on the command line that take precedence over the file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Overrides {
    pub(crate) vsync: Option<bool>,
    pub(crate) show_fps: bool,
    pub(crate) log_level: Option<String>,
}

/// Effective settings after merging file and command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) vsync: bool,
    pub(crate) show_fps: bool,
    pub(crate) max_ticks_per_frame: u32,
    pub(crate) log_level: Level,
}

/// Failures raised while loading or validating the configuration.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("unknown log level `{level}`")]
    InvalidLogLevel { level: String },
    #[error("window.max_ticks_per_frame must be at least 1")]
    ZeroTickBudget,
}
