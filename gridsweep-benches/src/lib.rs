//! Benchmark support for gridsweep.
//!
//! Holds the fixtures and parameter types shared by the Criterion benches
//! so setup code can propagate failures with `?`.

pub mod error;
pub mod params;
pub mod records;
