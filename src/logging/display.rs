//! Command-line logger
use super::{Event, LogError, Loggable, Logger};
use enum_map::EnumMap;
use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Stdout, Write};
use yansi::Paint;

/// Logger that displays a summary at the end of each episode.
///
/// Step values are aggregated over the episode; episode values are shown as logged.
#[derive(Debug)]
pub struct DisplayLogger<W = Stdout> {
    writer: W,
    events: EnumMap<Event, EventLog>,
    num_episodes: u64,
}

impl DisplayLogger {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for DisplayLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> DisplayLogger<W> {
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            events: EnumMap::default(),
            num_episodes: 0,
        }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Display the summary and clear all stored data.
    fn display(&mut self) -> io::Result<()> {
        let num_steps = self.events[Event::Step].count;
        writeln!(
            self.writer,
            "==== Episode {} ({} steps) ====",
            self.num_episodes, num_steps
        )?;
        for (event, log) in self.events.iter_mut() {
            for (name, aggregator) in &log.aggregators {
                let label = match event {
                    Event::Step => format!("{} (per step)", name),
                    Event::Episode => name.clone(),
                };
                writeln!(self.writer, "{:<24} {}", Paint::fixed(35, label), aggregator)?;
            }
            log.clear();
        }
        self.writer.flush()
    }
}

impl<W: Write> Logger for DisplayLogger<W> {
    fn log<'a>(
        &mut self,
        event: Event,
        name: &'a str,
        value: Loggable,
    ) -> Result<(), LogError<'a>> {
        let aggregators = &mut self.events[event].aggregators;
        let updated = match aggregators.get_mut(name) {
            Some(aggregator) => aggregator.update(value),
            None => {
                let mut aggregator = Aggregator::from(value);
                let updated = aggregator.update(value);
                aggregators.insert(name.to_string(), aggregator);
                updated
            }
        };
        updated.map_err(|recorded| LogError {
            event,
            name,
            value,
            recorded,
        })
    }

    fn done(&mut self, event: Event) {
        self.events[event].count += 1;
        if event == Event::Episode {
            if let Err(error) = self.display() {
                tracing::warn!(%error, "failed to display episode summary");
            }
            self.num_episodes += 1;
        }
    }
}

#[derive(Debug, Default)]
struct EventLog {
    count: u64,
    aggregators: BTreeMap<String, Aggregator>,
}

impl EventLog {
    fn clear(&mut self) {
        self.count = 0;
        self.aggregators.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Aggregator {
    Nothing,
    Scalar {
        sum: f64,
        count: u64,
        min: f64,
        max: f64,
    },
    Count(u64),
}

impl From<Loggable> for Aggregator {
    fn from(value: Loggable) -> Self {
        match value {
            Loggable::Nothing => Self::Nothing,
            Loggable::Scalar(_) => Self::Scalar {
                sum: 0.0,
                count: 0,
                min: f64::INFINITY,
                max: f64::NEG_INFINITY,
            },
            Loggable::Count(_) => Self::Count(0),
        }
    }
}

impl Aggregator {
    /// Add a value, or return the kind this aggregator holds if `value` is of another kind.
    fn update(&mut self, value: Loggable) -> Result<(), &'static str> {
        match (self, value) {
            (Self::Nothing, Loggable::Nothing) => {}
            (
                Self::Scalar {
                    sum,
                    count,
                    min,
                    max,
                },
                Loggable::Scalar(x),
            ) => {
                *sum += x;
                *count += 1;
                *min = min.min(x);
                *max = max.max(x);
            }
            (Self::Count(total), Loggable::Count(n)) => *total += n,
            (aggregator, _) => return Err(aggregator.kind()),
        }
        Ok(())
    }

    const fn kind(&self) -> &'static str {
        match self {
            Self::Nothing => "nothing",
            Self::Scalar { .. } => "scalar",
            Self::Count(_) => "count",
        }
    }
}

impl fmt::Display for Aggregator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Nothing => Ok(()),
            Self::Scalar {
                sum,
                count: 1,
                min: _,
                max: _,
            } => write!(f, "{}", sum),
            Self::Scalar {
                sum,
                count,
                min,
                max,
            } => write!(
                f,
                "{:.4} {}",
                sum / *count as f64,
                Paint::fixed(8, format!("[{} .. {}] sum {}", min, max, sum))
            ),
            Self::Count(total) => write!(f, "{}", total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(logger: DisplayLogger<Vec<u8>>) -> String {
        String::from_utf8(logger.into_writer()).unwrap()
    }

    #[test]
    fn displays_on_episode_done() {
        let mut logger = DisplayLogger::with_writer(Vec::new());
        logger.log(Event::Step, "reward", Loggable::Scalar(1.0)).unwrap();
        logger.done(Event::Step);
        logger.log(Event::Step, "reward", Loggable::Scalar(3.0)).unwrap();
        logger.done(Event::Step);
        logger.log(Event::Episode, "steps", Loggable::Count(2)).unwrap();
        logger.log(Event::Episode, "total_reward", Loggable::Scalar(4.0)).unwrap();
        logger.done(Event::Episode);

        let text = output(logger);
        assert!(text.contains("==== Episode 0 (2 steps) ===="));
        assert!(text.contains("reward (per step)"));
        assert!(text.contains("2.0000"));
        assert!(text.contains("total_reward"));
    }

    #[test]
    fn nothing_displayed_before_episode_done() {
        let mut logger = DisplayLogger::with_writer(Vec::new());
        logger.log(Event::Step, "reward", Loggable::Scalar(1.0)).unwrap();
        logger.done(Event::Step);
        assert!(output(logger).is_empty());
    }

    #[test]
    fn episodes_are_numbered() {
        let mut logger = DisplayLogger::with_writer(Vec::new());
        logger.done(Event::Episode);
        logger.done(Event::Episode);
        let text = output(logger);
        assert!(text.contains("Episode 0"));
        assert!(text.contains("Episode 1"));
    }

    #[test]
    fn incompatible_value() {
        let mut logger = DisplayLogger::with_writer(Vec::new());
        logger.log(Event::Step, "reward", Loggable::Scalar(1.0)).unwrap();
        let error = logger.log(Event::Step, "reward", Loggable::Count(1)).unwrap_err();
        assert_eq!(error.recorded, "scalar");
        assert_eq!(
            error.to_string(),
            "step statistic \"reward\" holds scalar values, cannot add Count(1)"
        );
        // The same name is independent under another event
        assert!(logger
            .log(Event::Episode, "reward", Loggable::Count(1))
            .is_ok());
    }

    #[test]
    fn null_logger() {
        assert!(().log(Event::Step, "x", Loggable::Nothing).is_ok());
    }
}
