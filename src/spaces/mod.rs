//! Spaces: sets of observations and actions
mod index;

pub use index::IndexSpace;

use rand::distributions::Distribution;
use std::fmt::{Debug, Display};

/// A mathematical space
pub trait Space: Display + Debug {
    type Element;

    /// Check if the space contains a particular value
    fn contains(&self, value: &Self::Element) -> bool;
}

/// A space from which elements can be sampled uniformly at random.
pub trait SampleSpace: Space + Distribution<<Self as Space>::Element> {}

impl<T: Space + Distribution<<T as Space>::Element>> SampleSpace for T {}
