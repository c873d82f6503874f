//! Error type
use crate::config::ConfigError;
use crate::simulation::EpisodeError;
use crate::video::VideoError;
use thiserror::Error;

/// Error recording an episode.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("episode failed")]
    Episode(#[from] EpisodeError),
    #[error("video recording failed")]
    Video(#[from] VideoError),
    #[error("invalid configuration")]
    Config(#[from] ConfigError),
}
