//! Closed-loop and timed control.

pub mod countdown;
pub mod regulator;
