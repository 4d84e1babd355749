//! Frame output.
//!
//! Rendering is pure and returns lines; this module owns the only I/O in
//! the engine, writing rendered frames to any `io::Write`. Stream failures
//! are returned to the caller, never swallowed.

use std::io::Write;

use crate::race::StepFrame;

/// Write one frame's lines to `out`.
pub fn write_frame<W: Write>(out: &mut W, frame: &StepFrame) -> std::io::Result<()> {
    for line in &frame.lines {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

/// Write every frame of a race in step order.
pub fn write_transcript<W: Write>(out: &mut W, frames: &[StepFrame]) -> std::io::Result<()> {
    for frame in frames {
        write_frame(out, frame)?;
    }
    Ok(())
}
