use super::{FrameWriter, VideoError};
use crate::envs::{EnvError, EnvStructure, Environment, Frame, Info, Render, Transition};
use std::fs;
use std::mem;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment wrapper that records every episode to a video file.
///
/// Behaves exactly like the wrapped environment. As a side effect, each `reset` starts a new
/// video `<folder>/<name_prefix>-episode-<id>.<ext>` containing the reset frame and one frame
/// per step. Ids count from 0, skipping any id whose file is already in the folder. A video is finished when its episode ends, when the next
/// episode starts, or when the recorder is closed.
///
/// Call [`RecordVideo::close`] before looking for the written files: only then is every video
/// guaranteed to be complete. Dropping an unclosed recorder finishes the current video on a
/// best-effort basis.
#[derive(Debug)]
pub struct RecordVideo<E, W: FrameWriter> {
    inner: E,
    writer: W,
    folder: PathBuf,
    name_prefix: String,
    next_episode_id: u64,
    current: Option<PathBuf>,
    recorded: Vec<PathBuf>,
    closed: bool,
}

impl<E, W: FrameWriter> RecordVideo<E, W> {
    /// Wrap an environment, creating `folder` if it does not exist.
    pub fn new<P, S>(inner: E, writer: W, folder: P, name_prefix: S) -> Result<Self, VideoError>
    where
        P: Into<PathBuf>,
        S: Into<String>,
    {
        let folder = folder.into();
        fs::create_dir_all(&folder)?;
        Ok(Self {
            inner,
            writer,
            folder,
            name_prefix: name_prefix.into(),
            next_episode_id: 0,
            current: None,
            recorded: Vec::new(),
            closed: false,
        })
    }

    pub const fn inner(&self) -> &E {
        &self.inner
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn name_prefix(&self) -> &str {
        &self.name_prefix
    }

    /// Videos that have been completely written so far.
    pub fn recorded(&self) -> &[PathBuf] {
        &self.recorded
    }

    /// Finish any video in progress and release the environment.
    ///
    /// # Returns
    /// The paths of all completed videos, in recording order.
    pub fn close(mut self) -> Result<Vec<PathBuf>, VideoError> {
        self.closed = true;
        self.finish_current()?;
        Ok(mem::take(&mut self.recorded))
    }

    fn finish_current(&mut self) -> Result<(), VideoError> {
        if let Some(path) = self.current.take() {
            self.writer.finish()?;
            debug!(path = %path.display(), "video finished");
            self.recorded.push(path);
        }
        Ok(())
    }

    /// Path of the next episode video, past any file left in the folder by an earlier run.
    fn next_free_path(&mut self) -> PathBuf {
        loop {
            let path = self.video_path(self.next_episode_id);
            self.next_episode_id += 1;
            if fs::symlink_metadata(&path).is_err() {
                return path;
            }
            debug!(path = %path.display(), "video already exists, skipping episode id");
        }
    }

    fn video_path(&self, episode_id: u64) -> PathBuf {
        self.folder.join(format!(
            "{}-episode-{}.{}",
            self.name_prefix,
            episode_id,
            self.writer.extension()
        ))
    }
}

impl<E: Render, W: FrameWriter> RecordVideo<E, W> {
    fn start(&mut self) -> Result<(), VideoError> {
        self.finish_current()?;
        let path = self.next_free_path();
        let frame = self.inner.render();
        self.writer.begin(&path, frame.width, frame.height)?;
        debug!(path = %path.display(), "video started");
        self.current = Some(path);
        self.writer.write_frame(&frame)
    }

    fn capture(&mut self) -> Result<(), VideoError> {
        if self.current.is_some() {
            self.writer.write_frame(&self.inner.render())?;
        }
        Ok(())
    }
}

impl<E, W: FrameWriter> Drop for RecordVideo<E, W> {
    fn drop(&mut self) {
        if !self.closed {
            if let Err(error) = self.finish_current() {
                warn!(%error, "failed to finish video of unclosed recorder");
            }
        }
    }
}

impl<E: EnvStructure, W: FrameWriter> EnvStructure for RecordVideo<E, W> {
    type ActionSpace = E::ActionSpace;

    fn action_space(&self) -> Self::ActionSpace {
        self.inner.action_space()
    }

    fn reward_range(&self) -> (f64, f64) {
        self.inner.reward_range()
    }
}

impl<E, W> Environment for RecordVideo<E, W>
where
    E: Environment + Render,
    W: FrameWriter,
{
    type Observation = E::Observation;
    type Action = E::Action;

    fn reset(&mut self) -> Result<(Self::Observation, Info), EnvError> {
        let reset = self.inner.reset()?;
        self.start().map_err(|e| EnvError::Wrapper(e.into()))?;
        Ok(reset)
    }

    fn step(&mut self, action: &Self::Action) -> Result<Transition<Self::Observation>, EnvError> {
        let transition = self.inner.step(action)?;
        self.capture().map_err(|e| EnvError::Wrapper(e.into()))?;
        if transition.episode_done() {
            self.finish_current()
                .map_err(|e| EnvError::Wrapper(e.into()))?;
        }
        Ok(transition)
    }
}

impl<E: Render, W: FrameWriter> Render for RecordVideo<E, W> {
    fn render(&self) -> Frame {
        self.inner.render()
    }
}
