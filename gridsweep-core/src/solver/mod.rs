//! Invocation of the external SSSP solver.
//!
//! The orchestrator talks to the solver through [`SolverInvoker`] so studies
//! can be driven by the real executable ([`ProcessSolver`]) or by an
//! in-process double in tests.

mod process;

use std::{
    fmt,
    num::NonZeroUsize,
    path::{Path, PathBuf},
    time::Duration,
};

pub use process::ProcessSolver;

use crate::error::InvocationError;
use crate::grid::Dimensionality;

/// Algorithm selector understood by the solver.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Algorithm {
    /// Sequential Dijkstra; the trusted reference.
    Baseline,
    /// Thread-parallel iterative Bellman-Ford relaxation.
    Parallel,
}

impl Algorithm {
    /// Value passed to the solver's `--algo` argument.
    #[must_use]
    pub const fn solver_name(self) -> &'static str {
        match self {
            Self::Baseline => "dijkstra",
            Self::Parallel => "bellmanford",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Baseline => "Dijkstra",
            Self::Parallel => "Bellman-Ford",
        })
    }
}

/// Parameters of a single solver run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SolverInvocation {
    /// Algorithm to run.
    pub algorithm: Algorithm,
    /// Degree of parallelism; ignored by the baseline.
    pub threads: NonZeroUsize,
    /// Whether the input is a 2D or 3D grid.
    pub dimensionality: Dimensionality,
    /// Graph file to read.
    pub input: PathBuf,
    /// Result file to write.
    pub output: PathBuf,
}

impl SolverInvocation {
    /// Describes a baseline run.
    #[must_use]
    pub fn baseline(dimensionality: Dimensionality, input: &Path, output: &Path) -> Self {
        Self {
            algorithm: Algorithm::Baseline,
            threads: NonZeroUsize::MIN,
            dimensionality,
            input: input.to_path_buf(),
            output: output.to_path_buf(),
        }
    }

    /// Describes a parallel run with `threads` threads.
    #[must_use]
    pub fn parallel(
        threads: NonZeroUsize,
        dimensionality: Dimensionality,
        input: &Path,
        output: &Path,
    ) -> Self {
        Self {
            algorithm: Algorithm::Parallel,
            threads,
            dimensionality,
            input: input.to_path_buf(),
            output: output.to_path_buf(),
        }
    }
}

/// What a finished solver run left behind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SolverResult {
    /// Output records, one per line, in the order the solver wrote them.
    pub lines: Vec<String>,
    /// Wall-clock time spent running the solver.
    pub elapsed: Duration,
    /// Relaxation rounds reported by the parallel algorithm.
    pub iterations: Option<u64>,
}

/// Runs the solver synchronously.
pub trait SolverInvoker {
    /// Runs `invocation` to completion and collects its results.
    ///
    /// # Errors
    /// Returns [`InvocationError`] when the solver cannot be run or its
    /// results cannot be read.
    fn invoke(&mut self, invocation: &SolverInvocation) -> Result<SolverResult, InvocationError>;
}

impl<T: SolverInvoker + ?Sized> SolverInvoker for &mut T {
    fn invoke(&mut self, invocation: &SolverInvocation) -> Result<SolverResult, InvocationError> {
        (**self).invoke(invocation)
    }
}
