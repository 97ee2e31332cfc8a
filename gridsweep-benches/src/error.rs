//! Benchmark setup error type.
//!
//! Aggregates the failures that can arise while preparing benchmark inputs
//! so setup functions can use `?` instead of `.expect()`.

use gridsweep_core::GenerationError;

use crate::records::RecordsError;

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// The grid or weight policy was rejected.
    #[error("graph generation failed: {0}")]
    Generation(#[from] GenerationError),
    /// Synthetic solver output could not be produced.
    #[error("synthetic records failed: {0}")]
    Records(#[from] RecordsError),
    /// Writing the graph to the sink failed.
    #[error("writing the graph failed: {0}")]
    Io(#[from] std::io::Error),
}
