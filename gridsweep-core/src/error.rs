//! Error types for the gridsweep core library.
//!
//! Each stage of a scaling study has its own error enum so callers can react
//! to generation, invocation and rendering failures separately. Every enum
//! exposes a stable machine-readable code for structured diagnostics.

use std::{fmt, io, path::PathBuf, process::ExitStatus};

use thiserror::Error;

use crate::grid::{Cell, GridSpec};
use crate::solver::Algorithm;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $pattern:pat => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $($pattern => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Errors raised while validating or writing a synthetic grid graph.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum GenerationError {
    /// A grid extent was zero.
    #[error("grid extent along `{axis}` must be at least 1")]
    ZeroExtent {
        /// Axis name (`x`, `y` or `z`) carrying the zero extent.
        axis: &'static str,
    },
    /// The source vertex lies outside the grid.
    #[error("source vertex {vertex} lies outside grid {grid}")]
    SourceOutOfBounds {
        /// Offending source coordinates.
        vertex: Cell,
        /// Grid the source was checked against.
        grid: GridSpec,
    },
    /// A weight parameter was non-finite or not strictly positive.
    #[error("edge weight parameter `{parameter}` must be finite and positive")]
    InvalidWeight {
        /// Name of the rejected parameter.
        parameter: &'static str,
    },
    /// The random weight range was empty.
    #[error("random weight range [{lo}, {hi}) is empty")]
    EmptyWeightRange {
        /// Inclusive lower bound.
        lo: f64,
        /// Exclusive upper bound.
        hi: f64,
    },
    /// Writing the graph file failed.
    #[error("failed to write graph file `{path}`: {source}")]
    Io {
        /// Destination path.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
}

define_error_codes! {
    /// Stable codes describing [`GenerationError`] variants.
    enum GenerationErrorCode for GenerationError {
        /// A grid extent was zero.
        ZeroExtent => Self::ZeroExtent { .. } => "GENERATION_ZERO_EXTENT",
        /// The source vertex lies outside the grid.
        SourceOutOfBounds => Self::SourceOutOfBounds { .. } => "GENERATION_SOURCE_OUT_OF_BOUNDS",
        /// A weight parameter was rejected.
        InvalidWeight => Self::InvalidWeight { .. } => "GENERATION_INVALID_WEIGHT",
        /// The random weight range was empty.
        EmptyWeightRange => Self::EmptyWeightRange { .. } => "GENERATION_EMPTY_WEIGHT_RANGE",
        /// Writing the graph file failed.
        Io => Self::Io { .. } => "GENERATION_IO",
    }
}

/// Errors raised while running the external solver or reading its results.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum InvocationError {
    /// The solver executable could not be started.
    #[error("failed to start solver `{program}`: {source}")]
    Spawn {
        /// Executable that failed to start.
        program: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Waiting for the solver to exit failed.
    #[error("failed waiting for solver `{program}`: {source}")]
    Wait {
        /// Executable being waited on.
        program: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The solver exited unsuccessfully.
    #[error("{algorithm} solver exited unsuccessfully ({status})")]
    Failed {
        /// Algorithm the solver was asked to run.
        algorithm: Algorithm,
        /// Exit status reported by the operating system.
        status: ExitStatus,
    },
    /// The solver did not leave a readable output file.
    #[error("solver output `{path}` could not be read: {source}")]
    MissingOutput {
        /// Declared output path.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The convergence log could not be read.
    #[error("convergence log `{path}` could not be read: {source}")]
    MissingLog {
        /// Convergence log path.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// A convergence log left by an earlier run could not be removed.
    #[error("stale convergence log `{path}` could not be removed: {source}")]
    StaleLog {
        /// Convergence log path.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The first line of the convergence log was not an iteration count.
    #[error("convergence log `{path}` starts with `{line}` instead of an iteration count")]
    MalformedLog {
        /// Convergence log path.
        path: PathBuf,
        /// Offending first line.
        line: String,
    },
    /// A parallel invocation produced no iteration count.
    #[error("parallel run with {threads} threads reported no iteration count")]
    MissingIterations {
        /// Thread count of the offending invocation.
        threads: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`InvocationError`] variants.
    enum InvocationErrorCode for InvocationError {
        /// The solver executable could not be started.
        Spawn => Self::Spawn { .. } => "INVOCATION_SPAWN",
        /// Waiting for the solver failed.
        Wait => Self::Wait { .. } => "INVOCATION_WAIT",
        /// The solver exited unsuccessfully.
        Failed => Self::Failed { .. } => "INVOCATION_FAILED",
        /// The solver output could not be read.
        MissingOutput => Self::MissingOutput { .. } => "INVOCATION_MISSING_OUTPUT",
        /// The convergence log could not be read.
        MissingLog => Self::MissingLog { .. } => "INVOCATION_MISSING_LOG",
        /// A stale convergence log could not be removed.
        StaleLog => Self::StaleLog { .. } => "INVOCATION_STALE_LOG",
        /// The convergence log was malformed.
        MalformedLog => Self::MalformedLog { .. } => "INVOCATION_MALFORMED_LOG",
        /// A parallel run reported no iterations.
        MissingIterations => Self::MissingIterations { .. } => "INVOCATION_MISSING_ITERATIONS",
    }
}

/// Errors raised while rendering scaling charts.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ReportError {
    /// There was nothing to plot.
    #[error("scaling series for `{prefix}` is empty")]
    EmptySeries {
        /// Chart name prefix of the study.
        prefix: String,
    },
    /// The chart directory could not be created.
    #[error("failed to create chart directory `{path}`: {source}")]
    Io {
        /// Directory path.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The drawing backend failed.
    #[error("failed to draw chart `{path}`: {message}")]
    Draw {
        /// Chart destination.
        path: PathBuf,
        /// Backend error description.
        message: String,
    },
}

define_error_codes! {
    /// Stable codes describing [`ReportError`] variants.
    enum ReportErrorCode for ReportError {
        /// There was nothing to plot.
        EmptySeries => Self::EmptySeries { .. } => "REPORT_EMPTY_SERIES",
        /// The chart directory could not be created.
        Io => Self::Io { .. } => "REPORT_IO",
        /// The drawing backend failed.
        Draw => Self::Draw { .. } => "REPORT_DRAW",
    }
}

/// Errors raised by the harness configuration builder.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ConfigError {
    /// The thread sweep must include at least one thread count.
    #[error("max_threads must be at least 1 (got {got})")]
    ZeroMaxThreads {
        /// Rejected upper bound.
        got: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`ConfigError`] variants.
    enum ConfigErrorCode for ConfigError {
        /// The thread sweep was empty.
        ZeroMaxThreads => Self::ZeroMaxThreads { .. } => "CONFIG_ZERO_MAX_THREADS",
    }
}

/// Error type produced while running a scaling study.
///
/// A correctness mismatch is not an error: it is reported through
/// [`crate::StudyOutcome::Aborted`].
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum StudyError {
    /// Generating the study input failed.
    #[error(transparent)]
    Generation(#[from] GenerationError),
    /// Running the solver failed.
    #[error(transparent)]
    Invocation(#[from] InvocationError),
    /// Rendering the charts failed.
    #[error(transparent)]
    Report(#[from] ReportError),
    /// Reading or rewriting a result file failed.
    #[error("failed to access `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// A series entry did not extend the thread sweep.
    #[error("thread count {next} does not follow {previous} in the scaling series")]
    NonIncreasingThreads {
        /// Last recorded thread count.
        previous: usize,
        /// Rejected thread count.
        next: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`StudyError`] variants.
    enum StudyErrorCode for StudyError {
        /// Generating the study input failed.
        Generation => Self::Generation(_) => "STUDY_GENERATION",
        /// Running the solver failed.
        Invocation => Self::Invocation(_) => "STUDY_INVOCATION",
        /// Rendering the charts failed.
        Report => Self::Report(_) => "STUDY_REPORT",
        /// Reading or rewriting a result file failed.
        Io => Self::Io { .. } => "STUDY_IO",
        /// A series entry did not extend the thread sweep.
        NonIncreasingThreads => Self::NonIncreasingThreads { .. } => "STUDY_NON_INCREASING_THREADS",
    }
}

/// Convenient result alias for study operations.
pub type Result<T, E = StudyError> = core::result::Result<T, E>;
