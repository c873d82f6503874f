//! Episode statistics reporting
//!
//! The [`EpisodeRunner`](crate::EpisodeRunner) reports the reward of every step and
//! the totals of every episode to a [`Logger`]. Pass `()` to discard them.
mod display;

pub use display::DisplayLogger;

use enum_map::Enum;
use std::error::Error;
use std::fmt;

/// The scope a statistic belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum)]
pub enum Event {
    /// One environment step
    Step,
    /// One whole episode
    Episode,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Step => "step",
            Self::Episode => "episode",
        })
    }
}

/// A statistic value.
///
/// Every name keeps a single kind of value: a name first logged as a scalar only accepts
/// scalars afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Loggable {
    /// A marker with no data; only the name is shown.
    Nothing,
    /// A measurement such as a reward. Summarized by mean and range.
    Scalar(f64),
    /// A number of things such as steps. Summarized by total.
    Count(u64),
}

impl From<f64> for Loggable {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

impl From<u64> for Loggable {
    fn from(value: u64) -> Self {
        Self::Count(value)
    }
}

/// Receives statistics while episodes are recorded.
pub trait Logger {
    /// Record `value` under `name` for the current `event`.
    ///
    /// Fails if `name` already holds a different kind of value for that event.
    /// A failed statistic never stops the episode.
    fn log<'a>(&mut self, event: Event, name: &'a str, value: Loggable)
        -> Result<(), LogError<'a>>;

    /// Mark the end of the current step or episode.
    fn done(&mut self, event: Event);
}

/// Discards everything
impl Logger for () {
    fn log<'a>(&mut self, _: Event, _: &'a str, _: Loggable) -> Result<(), LogError<'a>> {
        Ok(())
    }

    fn done(&mut self, _: Event) {}
}

impl<L: Logger + ?Sized> Logger for &mut L {
    fn log<'a>(
        &mut self,
        event: Event,
        name: &'a str,
        value: Loggable,
    ) -> Result<(), LogError<'a>> {
        L::log(self, event, name, value)
    }

    fn done(&mut self, event: Event) {
        L::done(self, event)
    }
}

/// A statistic whose kind differs from the values already recorded under its name.
#[derive(Debug, Clone, PartialEq)]
pub struct LogError<'a> {
    pub event: Event,
    pub name: &'a str,
    pub value: Loggable,
    /// Kind of the values already recorded under `name`
    pub recorded: &'static str,
}

impl<'a> fmt::Display for LogError<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} statistic \"{}\" holds {} values, cannot add {:?}",
            self.event, self.name, self.recorded, self.value
        )
    }
}

impl<'a> Error for LogError<'a> {}
