use crate::artifacts;
use crate::envs::{EnvError, Environment};
use crate::logging::{Event, Loggable, Logger};
use crate::policies::{Policy, PolicyError};
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

/// Runs a single bounded episode of policy-environment interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EpisodeRunner {
    /// Maximum number of steps to take in the episode.
    pub max_steps: u64,
}

impl EpisodeRunner {
    pub const fn new(max_steps: u64) -> Self {
        Self { max_steps }
    }

    /// Run one episode from reset until termination, truncation, or the step limit.
    ///
    /// The stopping conditions are checked before every step, including the first.
    /// Any error from the environment or the policy ends the episode immediately;
    /// no partial result is produced.
    ///
    /// The environment is left open: the caller is responsible for releasing it
    /// (flushing any recording) once this returns.
    pub fn run<E, P, L>(
        &self,
        environment: &mut E,
        policy: &mut P,
        logger: &mut L,
    ) -> Result<EpisodeResult, EpisodeError>
    where
        E: Environment + ?Sized,
        P: Policy<E::Observation, E::Action> + ?Sized,
        L: Logger + ?Sized,
    {
        let (mut observation, _) = environment
            .reset()
            .map_err(|source| EpisodeError::Environment { steps: 0, source })?;
        debug!(max_steps = self.max_steps, "episode started");

        let mut total_reward = 0.0;
        let mut step_count = 0;
        let mut terminated = false;
        let mut truncated = false;
        while !(terminated || truncated) && step_count < self.max_steps {
            let action = policy
                .act(&observation)
                .map_err(|source| EpisodeError::Policy {
                    steps: step_count,
                    source,
                })?;
            let transition =
                environment
                    .step(&action)
                    .map_err(|source| EpisodeError::Environment {
                        steps: step_count,
                        source,
                    })?;

            total_reward += transition.reward;
            step_count += 1;
            terminated = transition.terminated;
            truncated = transition.truncated;
            observation = transition.observation;

            log(logger, Event::Step, "reward", Loggable::Scalar(transition.reward));
            logger.done(Event::Step);
        }

        let result = EpisodeResult {
            total_reward,
            step_count,
            terminated,
            truncated,
        };
        log(logger, Event::Episode, "total_reward", Loggable::Scalar(total_reward));
        log(logger, Event::Episode, "steps", Loggable::Count(step_count));
        logger.done(Event::Episode);
        debug!(
            steps = step_count,
            total_reward,
            end = %result.end(),
            "episode finished"
        );
        Ok(result)
    }
}

fn log<L: Logger + ?Sized>(logger: &mut L, event: Event, name: &str, value: Loggable) {
    if let Err(error) = logger.log(event, name, value) {
        warn!(%error, "failed to log simulation statistic");
    }
}

/// Summary of a completed episode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeResult {
    /// Sum of all step rewards, in step order.
    pub total_reward: f64,
    /// Number of environment steps taken.
    pub step_count: u64,
    /// Whether the last step reached a terminal state.
    pub terminated: bool,
    /// Whether the last step was cut off by the environment.
    pub truncated: bool,
}

impl EpisodeResult {
    /// Why the episode stopped.
    pub const fn end(&self) -> EpisodeEnd {
        if self.terminated {
            EpisodeEnd::Terminated
        } else if self.truncated {
            EpisodeEnd::Truncated
        } else {
            EpisodeEnd::StepLimitReached
        }
    }

    /// The total reward truncated toward zero.
    pub fn score(&self) -> i64 {
        artifacts::score(self.total_reward)
    }
}

impl fmt::Display for EpisodeResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "steps={}, score={} ({})",
            self.step_count,
            self.total_reward,
            self.end()
        )
    }
}

/// Terminal state of an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EpisodeEnd {
    /// The environment reached a terminal state.
    Terminated,
    /// The environment cut the episode off.
    Truncated,
    /// The runner's step limit was reached first.
    StepLimitReached,
}

impl fmt::Display for EpisodeEnd {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Self::Terminated => "terminated",
            Self::Truncated => "truncated",
            Self::StepLimitReached => "step limit reached",
        };
        f.write_str(s)
    }
}

/// An episode was abandoned because a collaborator failed.
#[derive(Error, Debug)]
pub enum EpisodeError {
    #[error("environment failed after {steps} steps")]
    Environment {
        steps: u64,
        #[source]
        source: EnvError,
    },
    #[error("policy failed after {steps} steps")]
    Policy {
        steps: u64,
        #[source]
        source: PolicyError,
    },
}
