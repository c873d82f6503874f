//! Reinforcement learning environments
mod catch;
mod frame;
mod step_limit;
#[cfg(test)]
pub mod testing;

pub use catch::{Catch, CatchConfig, Move};
pub use frame::{Frame, Rgb};
pub use step_limit::{StepLimit, WithStepLimit};

use crate::spaces::Space;
use std::collections::BTreeMap;
use std::error::Error;
use thiserror::Error;

/// Auxiliary diagnostic information returned alongside observations.
///
/// Opaque to the simulation loop.
pub type Info = BTreeMap<String, f64>;

/// The external structure of a reinforcement learning environment.
pub trait EnvStructure {
    type ActionSpace: Space;

    /// The space of all possible actions.
    ///
    /// Every element in this space must be a valid action.
    fn action_space(&self) -> Self::ActionSpace;

    /// A lower and upper bound on possible reward values.
    ///
    /// These bounds are not required to be tight but ideally will be as tight as possible.
    fn reward_range(&self) -> (f64, f64);
}

impl<E: EnvStructure + ?Sized> EnvStructure for Box<E> {
    type ActionSpace = E::ActionSpace;

    fn action_space(&self) -> Self::ActionSpace {
        E::action_space(self)
    }
    fn reward_range(&self) -> (f64, f64) {
        E::reward_range(self)
    }
}

/// The result of a single environment step.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<O> {
    /// Observation of the resulting state.
    pub observation: O,
    /// The reward value for this transition.
    pub reward: f64,
    /// Whether the resulting state is terminal.
    pub terminated: bool,
    /// Whether the episode was cut off by an external bound (like a step limit).
    pub truncated: bool,
    /// Auxiliary diagnostic information.
    pub info: Info,
}

impl<O> Transition<O> {
    /// Whether this step ends the episode, either naturally or by truncation.
    pub const fn episode_done(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// A reinforcement learning environment with internal state.
///
/// Follows the standard episodic interface: `reset` starts an episode and `step` advances it.
pub trait Environment {
    type Observation;
    type Action;

    /// Reset the environment to an initial state.
    ///
    /// Must be called before each new episode.
    ///
    /// # Returns
    /// An observation of the initial state along with auxiliary info.
    fn reset(&mut self) -> Result<(Self::Observation, Info), EnvError>;

    /// Take a step in the environment.
    ///
    /// Returns an error if the environment has not been reset since the end of the last episode
    /// or if the action is not valid.
    fn step(&mut self, action: &Self::Action) -> Result<Transition<Self::Observation>, EnvError>;
}

impl<E: Environment + ?Sized> Environment for Box<E> {
    type Observation = E::Observation;
    type Action = E::Action;

    fn reset(&mut self) -> Result<(Self::Observation, Info), EnvError> {
        E::reset(self)
    }

    fn step(&mut self, action: &Self::Action) -> Result<Transition<Self::Observation>, EnvError> {
        E::step(self, action)
    }
}

/// An environment that can draw its current state as an RGB image.
pub trait Render {
    /// Render the current state.
    fn render(&self) -> Frame;
}

impl<E: Render + ?Sized> Render for Box<E> {
    fn render(&self) -> Frame {
        E::render(self)
    }
}

/// Error reported by an environment.
#[derive(Error, Debug)]
pub enum EnvError {
    #[error("environment must be reset before stepping")]
    NotReset,
    #[error("action {action} is not in the action space of size {num_actions}")]
    InvalidAction { action: usize, num_actions: usize },
    #[error("simulator failure: {0}")]
    Simulator(String),
    #[error("environment wrapper failed")]
    Wrapper(#[source] Box<dyn Error + Send + Sync>),
}
