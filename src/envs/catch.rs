//! Catch environment
use super::{EnvError, EnvStructure, Environment, Frame, Info, Render, Rgb, Transition};
use crate::spaces::IndexSpace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

const BALL_COLOUR: Rgb = Rgb(236, 236, 236);
const PADDLE_COLOUR: Rgb = Rgb(92, 186, 92);

/// Configuration for the [`Catch`] environment.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CatchConfig {
    /// Number of grid columns
    pub columns: usize,
    /// Number of grid rows, including the paddle row
    pub rows: usize,
    /// Number of balls dropped per episode
    pub rounds: u32,
    /// Side length of one grid cell in pixels
    pub scale: usize,
}

impl Default for CatchConfig {
    fn default() -> Self {
        Self {
            columns: 5,
            rows: 10,
            rounds: 10,
            scale: 8,
        }
    }
}

/// Catch environment
///
/// A ball falls one row per step from a random column at the top of a grid.
/// The agent moves a paddle along the bottom row and must be under the ball when it lands.
/// * Catching the ball gives +1 reward, missing it gives -1.
/// * A new ball is dropped after each landing.
/// * The episode terminates once `rounds` balls have landed.
///
/// Observations are rendered RGB frames.
/// Described in "Recurrent Models of Visual Attention" by Mnih et al. (2014).
#[derive(Debug, Clone)]
pub struct Catch {
    config: CatchConfig,
    rng: StdRng,
    state: Option<CatchState>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CatchState {
    ball_column: usize,
    ball_row: usize,
    paddle: usize,
    landed: u32,
    done: bool,
}

/// Paddle movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Left,
    Stay,
    Right,
}

impl Move {
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Left),
            1 => Some(Self::Stay),
            2 => Some(Self::Right),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }
}

impl Catch {
    /// Create a new environment with a seed for its internal randomness.
    ///
    /// # Panics
    /// If the grid has no columns or fewer than two rows.
    pub fn new(config: CatchConfig, seed: u64) -> Self {
        assert!(config.columns > 0, "catch grid must have at least one column");
        assert!(config.rows > 1, "catch grid must have at least two rows");
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
            state: None,
        }
    }

    pub const fn config(&self) -> &CatchConfig {
        &self.config
    }

    fn drop_ball(&mut self, paddle: usize, landed: u32) -> CatchState {
        CatchState {
            ball_column: self.rng.gen_range(0..self.config.columns),
            ball_row: 0,
            paddle,
            landed,
            done: false,
        }
    }

    fn info(state: &CatchState) -> Info {
        let mut info = Info::new();
        info.insert("landed".into(), f64::from(state.landed));
        info
    }
}

impl EnvStructure for Catch {
    type ActionSpace = IndexSpace;

    fn action_space(&self) -> Self::ActionSpace {
        IndexSpace::new(3)
    }

    fn reward_range(&self) -> (f64, f64) {
        (-1.0, 1.0)
    }
}

impl Environment for Catch {
    type Observation = Frame;
    type Action = usize;

    fn reset(&mut self) -> Result<(Self::Observation, Info), EnvError> {
        let state = self.drop_ball(self.config.columns / 2, 0);
        self.state = Some(state);
        Ok((self.render(), Self::info(&state)))
    }

    fn step(&mut self, action: &Self::Action) -> Result<Transition<Self::Observation>, EnvError> {
        let mut state = match self.state {
            Some(state) if !state.done => state,
            _ => return Err(EnvError::NotReset),
        };
        let action = Move::from_index(*action).ok_or(EnvError::InvalidAction {
            action: *action,
            num_actions: 3,
        })?;

        state.paddle = match action {
            Move::Left => state.paddle.saturating_sub(1),
            Move::Stay => state.paddle,
            Move::Right => (state.paddle + 1).min(self.config.columns - 1),
        };
        state.ball_row += 1;

        let mut reward = 0.0;
        let mut terminated = false;
        if state.ball_row == self.config.rows - 1 {
            reward = if state.ball_column == state.paddle {
                1.0
            } else {
                -1.0
            };
            state.landed += 1;
            if state.landed >= self.config.rounds {
                state.done = true;
                terminated = true;
            } else {
                state = self.drop_ball(state.paddle, state.landed);
            }
        }
        self.state = Some(state);

        Ok(Transition {
            observation: self.render(),
            reward,
            terminated,
            truncated: false,
            info: Self::info(&state),
        })
    }
}

impl Render for Catch {
    fn render(&self) -> Frame {
        let scale = self.config.scale;
        let mut frame = Frame::filled(
            self.config.columns * scale,
            self.config.rows * scale,
            Rgb::BLACK,
        );
        if let Some(state) = &self.state {
            if !state.done {
                frame.fill_rect(
                    state.ball_column * scale,
                    state.ball_row * scale,
                    scale,
                    scale,
                    BALL_COLOUR,
                );
            }
            frame.fill_rect(
                state.paddle * scale,
                (self.config.rows - 1) * scale,
                scale,
                scale,
                PADDLE_COLOUR,
            );
        }
        frame
    }
}
