//! Command-line options
use crate::config::{ConfigError, RecordConfig};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(
    name = "rerecord",
    version,
    author,
    about,
    after_help = "Options given on the command line override values from --config."
)]
pub struct Options {
    /// JSON configuration file (defaults are used for anything it omits)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Folder to write the episode video to
    #[arg(long)]
    pub video_folder: Option<PathBuf>,

    /// Video file name prefix
    #[arg(long)]
    pub name_prefix: Option<String>,

    /// Environment identifier
    #[arg(long)]
    pub env_id: Option<String>,

    /// Maximum number of steps in the episode
    #[arg(long)]
    pub max_steps: Option<u64>,

    /// Truncate the episode after this many steps
    #[arg(long)]
    pub step_limit: Option<u64>,

    /// Random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Video frames per second
    #[arg(long)]
    pub fps: Option<u32>,
}

impl Options {
    /// Resolve the recording configuration: file values (or defaults) overridden by flags.
    pub fn record_config(&self) -> Result<RecordConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => RecordConfig::from_file(path)?,
            None => RecordConfig::default(),
        };
        if let Some(video_folder) = &self.video_folder {
            config.video_folder = video_folder.clone();
        }
        if let Some(name_prefix) = &self.name_prefix {
            config.name_prefix = name_prefix.clone();
        }
        if let Some(env_id) = &self.env_id {
            config.env_id = env_id.clone();
        }
        if let Some(max_steps) = self.max_steps {
            config.max_steps = max_steps;
        }
        if self.step_limit.is_some() {
            config.step_limit = self.step_limit;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let opts = Options::try_parse_from(["rerecord"]).unwrap();
        assert_eq!(opts.record_config().unwrap(), RecordConfig::default());
    }

    #[test]
    fn flags_override() {
        let opts = Options::try_parse_from([
            "rerecord",
            "--video-folder",
            "out",
            "--name-prefix",
            "galaxian_episode",
            "--max-steps",
            "10",
            "--step-limit",
            "5",
            "--seed",
            "3",
        ])
        .unwrap();
        let config = opts.record_config().unwrap();
        assert_eq!(config.video_folder, PathBuf::from("out"));
        assert_eq!(config.name_prefix, "galaxian_episode");
        assert_eq!(config.max_steps, 10);
        assert_eq!(config.step_limit, Some(5));
        assert_eq!(config.seed, 3);
        assert_eq!(config.fps, 30);
    }

    #[test]
    fn flags_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"name_prefix": "from_file", "seed": 9}}"#).unwrap();
        let path = file.path().to_str().unwrap().to_string();
        let opts =
            Options::try_parse_from(["rerecord", "--config", &path, "--seed", "1"]).unwrap();
        let config = opts.record_config().unwrap();
        assert_eq!(config.name_prefix, "from_file");
        assert_eq!(config.seed, 1);
    }

    #[test]
    fn rejects_non_numeric_steps() {
        assert!(Options::try_parse_from(["rerecord", "--max-steps", "many"]).is_err());
    }
}
