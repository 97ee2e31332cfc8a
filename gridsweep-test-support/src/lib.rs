//! Shared test utilities used across gridsweep crates.
//!
//! - [`solver`]: in-process solver doubles and shell-script fake solvers.
//! - [`report`]: a renderer that records what it was asked to draw.
//! - [`tracing`]: a recording layer for asserting diagnostics.

pub mod report;
pub mod solver;
pub mod tracing;
