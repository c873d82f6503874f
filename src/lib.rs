//! Record reinforcement learning episodes as videos named by their score.
//!
//! An [`EpisodeRunner`] drives one episode of a [`Policy`] in an [`Environment`]
//! wrapped by a [`RecordVideo`] recorder.
//! Once the recorder is closed, an [`ArtifactFinalizer`] finds the video it wrote
//! and renames it to include the episode score.
#![warn(clippy::cast_lossless)]
#![warn(clippy::cast_possible_truncation)]
#![warn(clippy::doc_markdown)]
#![warn(clippy::explicit_iter_loop)]
#![warn(clippy::missing_const_for_fn)] // has some false positives
#![warn(clippy::needless_borrow)]
#![warn(clippy::needless_pass_by_value)]
#![warn(clippy::redundant_closure_for_method_calls)]
#![warn(clippy::use_self)]
pub mod artifacts;
pub mod cli;
pub mod config;
pub mod envs;
mod error;
pub mod logging;
pub mod policies;
pub mod record;
pub mod simulation;
pub mod spaces;
pub mod video;

pub use artifacts::{ArtifactFinalizer, Finalized};
pub use config::RecordConfig;
pub use envs::{EnvStructure, Environment, Render};
pub use error::RecordError;
pub use policies::{Policy, RandomPolicy};
pub use record::{record, record_episode, RecordOutcome};
pub use simulation::{EpisodeResult, EpisodeRunner};
pub use video::{RecordVideo, Y4mWriter};
