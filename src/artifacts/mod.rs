//! Locating recorded episode videos and naming them by score
mod finalizer;

pub use finalizer::{
    score, scored_file_name, ArtifactFinalizer, FinalizeError, Finalized, DEFAULT_EXTENSION,
};
