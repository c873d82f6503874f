use super::{EnvError, EnvStructure, Environment, Frame, Info, Render, Transition};

/// Cuts off episodes after a set number of steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StepLimit {
    /// Maximum number of steps per episode
    pub max_steps_per_episode: u64,
}

impl StepLimit {
    pub const fn new(max_steps_per_episode: u64) -> Self {
        Self {
            max_steps_per_episode,
        }
    }
}

impl Default for StepLimit {
    fn default() -> Self {
        Self {
            max_steps_per_episode: 100,
        }
    }
}

/// Environment wrapper that truncates episodes at a [`StepLimit`].
///
/// The limiting step is marked `truncated` but not `terminated`.
#[derive(Debug, Clone, PartialEq)]
pub struct WithStepLimit<E> {
    pub inner: E,
    pub limit: StepLimit,
    current_steps: u64,
}

impl<E> WithStepLimit<E> {
    pub const fn new(inner: E, limit: StepLimit) -> Self {
        Self {
            inner,
            limit,
            current_steps: 0,
        }
    }

    /// Number of steps taken in the current episode.
    pub const fn current_steps(&self) -> u64 {
        self.current_steps
    }
}

impl<E: EnvStructure> EnvStructure for WithStepLimit<E> {
    type ActionSpace = E::ActionSpace;

    fn action_space(&self) -> Self::ActionSpace {
        self.inner.action_space()
    }

    fn reward_range(&self) -> (f64, f64) {
        self.inner.reward_range()
    }
}

impl<E: Environment> Environment for WithStepLimit<E> {
    type Observation = E::Observation;
    type Action = E::Action;

    fn reset(&mut self) -> Result<(Self::Observation, Info), EnvError> {
        self.current_steps = 0;
        self.inner.reset()
    }

    fn step(&mut self, action: &Self::Action) -> Result<Transition<Self::Observation>, EnvError> {
        let mut transition = self.inner.step(action)?;
        self.current_steps += 1;
        if self.current_steps >= self.limit.max_steps_per_episode {
            transition.truncated = true;
        }
        Ok(transition)
    }
}

impl<E: Render> Render for WithStepLimit<E> {
    fn render(&self) -> Frame {
        self.inner.render()
    }
}
