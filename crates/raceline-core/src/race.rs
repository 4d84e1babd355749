//! The budgeted race loop.
//!
//! The loop owns the current snapshot and the remaining step budget and
//! threads both explicitly: each step draws per-car advancement, renders
//! the new snapshot, and yields the frame to the caller. A race is running
//! while budget remains and done once it hits zero; done is terminal.
//! Control flow is deterministic — only car positions are randomized.

use rand::Rng;

use raceline_logic::config::{validate_config, ConfigError, RaceConfig};
use raceline_logic::render::{render_track, TRACK_MARK};
use raceline_logic::state::RaceState;
use raceline_logic::stepping::{apply, AdvanceDecision};
use thiserror::Error;

/// Error starting or reporting a race.
#[derive(Debug, Error)]
pub enum RaceError {
    /// Configuration failed validation; all violations are listed.
    #[error("invalid race config: {0:?}")]
    Config(Vec<ConfigError>),
    /// Output stream failure while writing frames.
    #[error("frame output failed: {0}")]
    Io(#[from] std::io::Error),
}

/// One completed step: the snapshot after advancement plus its rendering.
#[derive(Debug, Clone)]
pub struct StepFrame {
    /// 1-based step number.
    pub step: u32,
    /// Snapshot after this step's advancement.
    pub state: RaceState,
    /// Rendered track lines, leading blank separator included.
    pub lines: Vec<String>,
}

/// Advance every car once, producing the next snapshot.
///
/// Each car gets one fresh uniform draw in [0, 1); draws at or above the
/// stall threshold move the car one mark. The input snapshot is untouched
/// and the result always has the same car count. An empty grid is a valid
/// no-op producing an empty result.
pub fn advance_snapshot(
    state: &RaceState,
    stall_probability: f32,
    rng: &mut impl Rng,
) -> RaceState {
    state.map_positions(|_, pos| {
        let draw: f32 = rng.gen();
        apply(pos, AdvanceDecision::from_draw(draw, stall_probability))
    })
}

/// A race in progress. Yields one [`StepFrame`] per step, lazily.
#[derive(Debug)]
pub struct Race<R: Rng> {
    current: RaceState,
    remaining: u32,
    step: u32,
    stall_probability: f32,
    mark: char,
    rng: R,
}

impl<R: Rng> Race<R> {
    /// Start a race from a validated config on a fresh starting grid.
    pub fn new(config: &RaceConfig, rng: R) -> Result<Self, RaceError> {
        let grid = RaceState::starting_grid(config.car_count as usize, config.starting_position);
        Self::from_grid(grid, config, rng)
    }

    /// Start a race from an explicit grid instead of a generated one.
    ///
    /// `config.car_count` and `config.starting_position` are ignored; the
    /// grid is taken as given. The config is still validated.
    pub fn from_grid(grid: RaceState, config: &RaceConfig, rng: R) -> Result<Self, RaceError> {
        let errors = validate_config(config);
        if !errors.is_empty() {
            return Err(RaceError::Config(errors));
        }
        Ok(Self {
            current: grid,
            remaining: config.steps,
            step: 0,
            stall_probability: config.stall_probability,
            mark: TRACK_MARK,
            rng,
        })
    }

    /// Snapshot the loop currently holds.
    pub fn state(&self) -> &RaceState {
        &self.current
    }

    /// Steps left in the budget.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Whether the step budget is exhausted.
    pub fn is_done(&self) -> bool {
        self.remaining == 0
    }

    fn step_once(&mut self) -> StepFrame {
        let next = advance_snapshot(&self.current, self.stall_probability, &mut self.rng);
        debug_assert!(self.current.precedes(&next));

        self.remaining -= 1;
        self.step += 1;
        log::trace!(
            "step {}: {:?}, {} remaining",
            self.step,
            next.positions(),
            self.remaining
        );
        if self.remaining == 0 {
            log::debug!("step budget exhausted after {} steps", self.step);
        }

        let lines = render_track(&next, self.mark);
        let frame = StepFrame {
            step: self.step,
            state: next.clone(),
            lines,
        };
        self.current = next;
        frame
    }
}

impl<R: Rng> Iterator for Race<R> {
    type Item = StepFrame;

    fn next(&mut self) -> Option<StepFrame> {
        if self.is_done() {
            return None;
        }
        Some(self.step_once())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.remaining as usize;
        (left, Some(left))
    }
}

impl<R: Rng> ExactSizeIterator for Race<R> {}

/// Run a whole race eagerly, collecting every frame in step order.
pub fn run_race(config: &RaceConfig, rng: impl Rng) -> Result<Vec<StepFrame>, RaceError> {
    Ok(Race::new(config, rng)?.collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config(car_count: u32, steps: u32, stall_probability: f32) -> RaceConfig {
        RaceConfig {
            car_count,
            steps,
            stall_probability,
            ..RaceConfig::default()
        }
    }

    #[test]
    fn test_budget_counts_down_to_done() {
        let mut race = Race::new(&config(3, 2, 0.3), StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(race.remaining(), 2);
        assert!(!race.is_done());

        assert!(race.next().is_some());
        assert_eq!(race.remaining(), 1);
        assert!(race.next().is_some());
        assert!(race.is_done());

        // done is terminal
        assert!(race.next().is_none());
        assert!(race.next().is_none());
        assert_eq!(race.remaining(), 0);
    }

    #[test]
    fn test_zero_step_race_yields_nothing() {
        let frames = run_race(&config(3, 0, 0.3), StdRng::seed_from_u64(7)).unwrap();
        assert!(frames.is_empty());
    }

    #[test]
    fn test_frames_are_numbered_from_one() {
        let frames = run_race(&config(2, 4, 0.3), StdRng::seed_from_u64(7)).unwrap();
        let steps: Vec<u32> = frames.iter().map(|f| f.step).collect();
        assert_eq!(steps, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_size_hint_tracks_budget() {
        let mut race = Race::new(&config(1, 3, 0.3), StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(race.len(), 3);
        race.next();
        assert_eq!(race.len(), 2);
    }

    #[test]
    fn test_invalid_probability_rejected() {
        let err = Race::new(&config(3, 5, 1.5), StdRng::seed_from_u64(7)).unwrap_err();
        match err {
            RaceError::Config(errors) => {
                assert!(errors.contains(&ConfigError::StallProbabilityOutOfRange(1.5)));
            }
            other => panic!("expected config error, got {}", other),
        }
    }

    #[test]
    fn test_advance_does_not_mutate_input() {
        let state = RaceState::from_positions(vec![1, 4, 2]);
        let before = state.clone();
        let mut rng = StdRng::seed_from_u64(99);
        let next = advance_snapshot(&state, 0.3, &mut rng);
        assert_eq!(state, before);
        assert_eq!(next.car_count(), 3);
    }

    #[test]
    fn test_advance_on_empty_grid() {
        let mut rng = StdRng::seed_from_u64(0);
        let next = advance_snapshot(&RaceState::from_positions(vec![]), 0.3, &mut rng);
        assert!(next.is_empty());
    }

    #[test]
    fn test_stall_probability_zero_always_advances() {
        // Every draw in [0, 1) clears a threshold of 0.0.
        let frames = run_race(&config(4, 6, 0.0), StdRng::seed_from_u64(3)).unwrap();
        let last = frames.last().unwrap();
        assert!(last.state.positions().iter().all(|&pos| pos == 1 + 6));
    }

    #[test]
    fn test_stall_probability_one_never_advances() {
        // No draw in [0, 1) reaches a threshold of 1.0.
        let frames = run_race(&config(4, 6, 1.0), StdRng::seed_from_u64(3)).unwrap();
        let last = frames.last().unwrap();
        assert!(last.state.positions().iter().all(|&pos| pos == 1));
    }

    #[test]
    fn test_same_seed_replays_exactly() {
        let a = run_race(&config(5, 10, 0.3), StdRng::seed_from_u64(42)).unwrap();
        let b = run_race(&config(5, 10, 0.3), StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a.len(), b.len());
        for (fa, fb) in a.iter().zip(&b) {
            assert_eq!(fa.state, fb.state);
            assert_eq!(fa.lines, fb.lines);
        }
    }
}
