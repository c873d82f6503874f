//! Capturing environment frames as video files
mod record;
mod y4m;

pub use record::RecordVideo;
pub use y4m::Y4mWriter;

use crate::envs::Frame;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Encodes a sequence of frames into a video container file.
///
/// One video is written at a time: `begin`, any number of `write_frame`, then `finish`.
pub trait FrameWriter {
    /// File extension of the container format, without a leading dot.
    fn extension(&self) -> &str;

    /// Start a new video at `path` with the given frame dimensions.
    fn begin(&mut self, path: &Path, width: usize, height: usize) -> Result<(), VideoError>;

    /// Append a frame to the current video.
    fn write_frame(&mut self, frame: &Frame) -> Result<(), VideoError>;

    /// Complete the current video.
    ///
    /// Once this returns the file is fully written to storage.
    fn finish(&mut self) -> Result<(), VideoError>;
}

impl<W: FrameWriter + ?Sized> FrameWriter for Box<W> {
    fn extension(&self) -> &str {
        W::extension(self)
    }
    fn begin(&mut self, path: &Path, width: usize, height: usize) -> Result<(), VideoError> {
        W::begin(self, path, width, height)
    }
    fn write_frame(&mut self, frame: &Frame) -> Result<(), VideoError> {
        W::write_frame(self, frame)
    }
    fn finish(&mut self) -> Result<(), VideoError> {
        W::finish(self)
    }
}

/// Error writing a video.
#[derive(Error, Debug)]
pub enum VideoError {
    #[error("no video in progress")]
    NotStarted,
    #[error("a video is already in progress at {}", .0.display())]
    AlreadyStarted(PathBuf),
    #[error("frame is {actual:?} but the video is {expected:?} (width, height)")]
    FrameSize {
        expected: (usize, usize),
        actual: (usize, usize),
    },
    #[error("frame has {actual} bytes of pixel data, expected {expected}")]
    FrameBuffer { expected: usize, actual: usize },
    #[error("video i/o error")]
    Io(#[from] io::Error),
}
