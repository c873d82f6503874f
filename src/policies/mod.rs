//! Policies: decision functions mapping observations to actions
mod random;

pub use random::RandomPolicy;

use std::error::Error;
use thiserror::Error;

/// A policy selects an action given an observation.
///
/// A policy may keep internal state (such as a random number generator)
/// but never interacts with the environment directly.
///
/// Any closure `FnMut(&O) -> A` is an infallible policy.
pub trait Policy<O: ?Sized, A> {
    /// Choose an action for the given observation.
    fn act(&mut self, observation: &O) -> Result<A, PolicyError>;
}

impl<O, A, F> Policy<O, A> for F
where
    O: ?Sized,
    F: FnMut(&O) -> A,
{
    fn act(&mut self, observation: &O) -> Result<A, PolicyError> {
        Ok(self(observation))
    }
}

/// Error raised by a policy while selecting an action.
#[derive(Error, Debug)]
#[error("policy failed to select an action")]
pub struct PolicyError(#[source] pub Box<dyn Error + Send + Sync>);

impl PolicyError {
    pub fn new<E: Into<Box<dyn Error + Send + Sync>>>(error: E) -> Self {
        Self(error.into())
    }
}
