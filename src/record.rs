//! Recording a scored episode video
use crate::artifacts::{ArtifactFinalizer, Finalized};
use crate::config::RecordConfig;
use crate::envs::{Environment, Render, StepLimit, WithStepLimit};
use crate::error::RecordError;
use crate::logging::Logger;
use crate::policies::Policy;
use crate::simulation::{EpisodeResult, EpisodeRunner};
use crate::video::{FrameWriter, RecordVideo};
use std::path::PathBuf;
use tracing::{info, warn};

/// Everything produced by recording one episode.
#[derive(Debug)]
pub struct RecordOutcome {
    pub episode: EpisodeResult,
    /// Videos the recorder reports having written.
    pub recordings: Vec<PathBuf>,
    /// The scored video, as located after the recorder was closed.
    pub artifact: Finalized,
}

/// Record one episode of `env` under `policy` and rename the video to include the score.
///
/// The environment is wrapped in a per-episode [`StepLimit`] if `config.step_limit` is set.
/// See [`record`].
pub fn record_episode<E, W, P, L>(
    env: E,
    writer: W,
    config: &RecordConfig,
    policy: &mut P,
    logger: &mut L,
) -> Result<RecordOutcome, RecordError>
where
    E: Environment + Render,
    W: FrameWriter,
    P: Policy<E::Observation, E::Action> + ?Sized,
    L: Logger + ?Sized,
{
    match config.step_limit {
        Some(limit) => record(
            WithStepLimit::new(env, StepLimit::new(limit)),
            writer,
            config,
            policy,
            logger,
        ),
        None => record(env, writer, config, policy, logger),
    }
}

/// Record one episode of `env` under `policy` and rename the video to include the score.
///
/// 1. Wraps the environment in a video recorder writing to `config.video_folder`.
/// 2. Runs a single episode of at most `config.max_steps` steps.
/// 3. Closes the recorder, whether or not the episode succeeded,
///    so that the video is complete before it is looked for.
/// 4. Finds the latest video named with `config.name_prefix` and renames it with the score.
///
/// Episode and recorder failures are returned as errors.
/// Finalization problems (no video found, name collision) are reported in the outcome.
pub fn record<E, W, P, L>(
    env: E,
    writer: W,
    config: &RecordConfig,
    policy: &mut P,
    logger: &mut L,
) -> Result<RecordOutcome, RecordError>
where
    E: Environment + Render,
    W: FrameWriter,
    P: Policy<E::Observation, E::Action> + ?Sized,
    L: Logger + ?Sized,
{
    let finalizer = ArtifactFinalizer::new(writer.extension());
    let runner = EpisodeRunner::new(config.max_steps);

    let mut recorder = RecordVideo::new(env, writer, &config.video_folder, &*config.name_prefix)?;
    let run = runner.run(&mut recorder, policy, logger);
    let closed = recorder.close();

    let episode = match run {
        Ok(episode) => episode,
        Err(error) => {
            if let Err(close_error) = closed {
                warn!(error = %close_error, "failed to close recorder after episode failure");
            }
            return Err(error.into());
        }
    };
    let recordings = closed?;
    info!(%episode, "episode finished");

    let artifact = finalizer.finalize(
        &config.video_folder,
        &config.name_prefix,
        episode.total_reward,
    );
    Ok(RecordOutcome {
        episode,
        recordings,
        artifact,
    })
}
