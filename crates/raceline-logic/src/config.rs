//! Race configuration and validation.
//!
//! A [`RaceConfig`] is plain serde-deserializable data supplied by the
//! caller (the harness ships a default as JSON). Validation returns every
//! violation found, not just the first, so a bad config can be reported in
//! full.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::stepping::DEFAULT_STALL_PROBABILITY;

/// Largest grid the track renderer will accept.
pub const MAX_GRID_CARS: u32 = 1024;

/// Caller-facing configuration for one race.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceConfig {
    /// Number of cars on the grid.
    pub car_count: u32,
    /// Step budget: the race runs exactly this many steps.
    pub steps: u32,
    /// Probability in [0, 1] that a car stalls on a given step.
    pub stall_probability: f32,
    /// Distance every car starts at.
    pub starting_position: u32,
    /// Random seed (None = seed from entropy).
    pub seed: Option<u64>,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            car_count: 3,
            steps: 5,
            stall_probability: DEFAULT_STALL_PROBABILITY,
            starting_position: 1,
            seed: None,
        }
    }
}

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Stall probability outside [0, 1] (NaN included).
    #[error("stall probability {0} outside [0, 1]")]
    StallProbabilityOutOfRange(f32),
    /// More cars than the renderer can sensibly print.
    #[error("car count {0} exceeds the grid cap")]
    GridTooLarge(u32),
}

/// Validate a race configuration, returning all errors found.
pub fn validate_config(config: &RaceConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    if !(0.0..=1.0).contains(&config.stall_probability) {
        errors.push(ConfigError::StallProbabilityOutOfRange(
            config.stall_probability,
        ));
    }
    if config.car_count > MAX_GRID_CARS {
        errors.push(ConfigError::GridTooLarge(config.car_count));
    }

    errors
}
