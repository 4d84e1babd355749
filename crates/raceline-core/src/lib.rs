//! Race engine for Raceline.
//!
//! Couples the pure logic crate to its two external collaborators: a
//! randomness source and an output stream. All randomness enters through
//! the `rand::Rng` handed in by the caller, so seeded runs replay exactly;
//! all I/O goes through the writer seam in [`report`].
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`race`] | Step advancement and the budgeted race loop |
//! | [`report`] | Writing rendered frames to an `io::Write` |

pub mod race;
pub mod report;

pub use race::{advance_snapshot, run_race, Race, RaceError, StepFrame};
pub use report::{write_frame, write_transcript};
