//! Environment testing utilities
use super::{EnvError, EnvStructure, Environment, Frame, Info, Render, Rgb, Transition};
use crate::policies::{Policy, RandomPolicy};
use crate::spaces::{IndexSpace, SampleSpace, Space};

/// Run an environment with a random policy and check that invariants are satisfied.
pub fn check_structure<E>(mut env: E, num_steps: u64, seed: u64)
where
    E: Environment + EnvStructure,
    E::ActionSpace: SampleSpace + Space<Element = E::Action>,
{
    let action_space = env.action_space();
    let (min_reward, max_reward) = env.reward_range();
    let mut policy = RandomPolicy::new(action_space, seed);

    let (mut observation, _) = env.reset().unwrap();
    for _ in 0..num_steps {
        let action = policy.act(&observation).unwrap();
        assert!(env.action_space().contains(&action));
        let transition = env.step(&action).unwrap();
        assert!(transition.reward >= min_reward);
        assert!(transition.reward <= max_reward);
        observation = if transition.episode_done() {
            env.reset().unwrap().0
        } else {
            transition.observation
        };
    }
}

/// Environment that replays a fixed script of `(reward, terminated)` pairs.
///
/// Observations are the number of steps taken so far in the episode.
/// Once the script is exhausted the episode continues forever with zero reward.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptedEnv {
    pub script: Vec<(f64, bool)>,
    /// Fail with a simulator error on this (0-based) step of an episode.
    pub fail_at: Option<usize>,
    /// Every action received, in order.
    pub actions: Vec<usize>,
    pub num_resets: u64,
    position: Option<usize>,
}

impl ScriptedEnv {
    pub fn new(script: Vec<(f64, bool)>) -> Self {
        Self {
            script,
            ..Self::default()
        }
    }

    /// An environment that never terminates.
    pub fn endless() -> Self {
        Self::default()
    }

    pub fn failing_at(mut self, step: usize) -> Self {
        self.fail_at = Some(step);
        self
    }
}

impl EnvStructure for ScriptedEnv {
    type ActionSpace = IndexSpace;

    fn action_space(&self) -> Self::ActionSpace {
        IndexSpace::new(4)
    }

    fn reward_range(&self) -> (f64, f64) {
        (f64::NEG_INFINITY, f64::INFINITY)
    }
}

impl Environment for ScriptedEnv {
    type Observation = usize;
    type Action = usize;

    fn reset(&mut self) -> Result<(Self::Observation, Info), EnvError> {
        self.num_resets += 1;
        self.position = Some(0);
        Ok((0, Info::new()))
    }

    fn step(&mut self, action: &Self::Action) -> Result<Transition<Self::Observation>, EnvError> {
        let position = self.position.ok_or(EnvError::NotReset)?;
        if self.fail_at == Some(position) {
            return Err(EnvError::Simulator(format!("scripted failure at {}", position)));
        }
        self.actions.push(*action);
        let (reward, terminated) = self.script.get(position).copied().unwrap_or((0.0, false));
        self.position = if terminated { None } else { Some(position + 1) };
        Ok(Transition {
            observation: position + 1,
            reward,
            terminated,
            truncated: false,
            info: Info::new(),
        })
    }
}

/// Renders a 2x2 frame whose red channel is the current step position.
impl Render for ScriptedEnv {
    fn render(&self) -> Frame {
        let level = self.position.unwrap_or(0).min(255) as u8;
        Frame::filled(2, 2, Rgb(level, 0, 0))
    }
}
