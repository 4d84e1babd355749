//! Standings queries over a snapshot.
//!
//! Everything here is a fold, filter, or map over the position sequence of
//! one snapshot; none of it holds state of its own or mutates its input.

use crate::state::RaceState;

/// A car index paired with its distance.
pub type Placing = (usize, u32);

/// Cars at the farthest distance, in index order. Ties share the lead.
pub fn leaders(state: &RaceState) -> Vec<usize> {
    match state.positions().iter().max() {
        Some(&best) => state
            .positions()
            .iter()
            .enumerate()
            .filter(|(_, &pos)| pos == best)
            .map(|(car, _)| car)
            .collect(),
        None => Vec::new(),
    }
}

/// Total distance covered by the whole grid.
pub fn total_distance(state: &RaceState) -> u64 {
    state.positions().iter().map(|&pos| u64::from(pos)).sum()
}

/// Cars at or past `line`, in index order.
pub fn cars_past(state: &RaceState, line: u32) -> Vec<usize> {
    state
        .positions()
        .iter()
        .enumerate()
        .filter(|(_, &pos)| pos >= line)
        .map(|(car, _)| car)
        .collect()
}

/// Placings sorted best-first: distance descending, car index ascending on
/// ties.
pub fn placings(state: &RaceState) -> Vec<Placing> {
    let mut placings: Vec<Placing> = state
        .positions()
        .iter()
        .enumerate()
        .map(|(car, &pos)| (car, pos))
        .collect();
    placings.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    placings
}
