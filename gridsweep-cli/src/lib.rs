//! Support library for the gridsweep CLI binary.
//!
//! Exposes the command pipeline and logging setup so doctests and integration
//! tests can drive commands without spawning the binary.

pub mod cli;
pub mod logging;
