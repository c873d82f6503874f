//! Episode recording configuration
use crate::envs::{Catch, CatchConfig};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Identifier of the built-in [`Catch`] environment.
pub const CATCH_ENV_ID: &str = "catch";

/// Configuration for recording one episode.
///
/// Every field has a default so a configuration file only needs to list what it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecordConfig {
    /// Folder the video is written to. Created if missing.
    pub video_folder: PathBuf,
    /// Video file name prefix; also used to find the video after the episode.
    pub name_prefix: String,
    /// Environment identifier.
    pub env_id: String,
    /// Upper bound on the number of steps taken by the episode runner.
    pub max_steps: u64,
    /// Truncate the episode after this many steps (reported as `truncated`).
    pub step_limit: Option<u64>,
    /// Random seed for the environment. The random policy uses `seed + 1`.
    pub seed: u64,
    /// Video frame rate.
    pub fps: u32,
    /// Catch environment parameters
    pub catch: CatchConfig,
}

impl Default for RecordConfig {
    fn default() -> Self {
        Self {
            video_folder: PathBuf::from("videos"),
            name_prefix: "catch_episode".into(),
            env_id: CATCH_ENV_ID.into(),
            max_steps: 1_000_000,
            step_limit: None,
            seed: 0,
            fps: 30,
            catch: CatchConfig::default(),
        }
    }
}

impl RecordConfig {
    /// Load a configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Construct the configured environment.
    pub fn build_env(&self) -> Result<Catch, ConfigError> {
        if self.env_id != CATCH_ENV_ID {
            return Err(ConfigError::UnknownEnv(self.env_id.clone()));
        }
        let catch = &self.catch;
        if catch.columns == 0 || catch.rows < 2 || catch.scale == 0 {
            return Err(ConfigError::Invalid(format!(
                "catch grid must be at least 1x2 with a positive scale, got {}x{} at scale {}",
                catch.columns, catch.rows, catch.scale
            )));
        }
        Ok(Catch::new(self.catch, self.seed))
    }
}

/// Error loading or applying a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config from {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config from {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown environment \"{0}\"")]
    UnknownEnv(String),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
