//! Track rendering.
//!
//! Renders a snapshot as one row of repeated marks per car, in index order,
//! preceded by a single blank separator line. Rendering is pure: it returns
//! lines and never touches an output stream — writing is the caller's job.

use crate::state::RaceState;

/// Mark character for one unit of distance.
pub const TRACK_MARK: char = '-';

/// Render a snapshot into its per-step lines.
///
/// Output is one blank separator line followed by `car_count` rows, so each
/// step contributes exactly `car_count + 1` lines to the race transcript.
pub fn render_track(state: &RaceState, mark: char) -> Vec<String> {
    let mut lines = Vec::with_capacity(state.car_count() + 1);
    lines.push(String::new());
    for &pos in state.positions() {
        lines.push(std::iter::repeat(mark).take(pos as usize).collect());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_rows_match_positions() {
        let state = RaceState::from_positions(vec![2, 1, 3]);
        let lines = render_track(&state, TRACK_MARK);
        assert_eq!(lines, vec!["", "--", "-", "---"]);
    }

    #[test]
    fn test_render_line_count() {
        let state = RaceState::starting_grid(5, 1);
        let lines = render_track(&state, TRACK_MARK);
        assert_eq!(lines.len(), state.car_count() + 1);
        assert!(lines[0].is_empty());
    }

    #[test]
    fn test_render_empty_grid_is_separator_only() {
        let state = RaceState::from_positions(vec![]);
        assert_eq!(render_track(&state, TRACK_MARK), vec![String::new()]);
    }

    #[test]
    fn test_render_custom_mark() {
        let state = RaceState::from_positions(vec![3]);
        let lines = render_track(&state, '=');
        assert_eq!(lines[1], "===");
    }

    #[test]
    fn test_render_does_not_mutate_state() {
        let state = RaceState::from_positions(vec![4, 2]);
        let before = state.clone();
        let _ = render_track(&state, TRACK_MARK);
        assert_eq!(state, before);
    }
}
