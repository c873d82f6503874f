//! Simulating agent-environment interaction
mod runner;

pub use runner::{EpisodeEnd, EpisodeError, EpisodeResult, EpisodeRunner};
