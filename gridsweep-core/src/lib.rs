//! Verification and scaling harness for grid-graph shortest-path solvers.
//!
//! The crate generates synthetic 2D and 3D grid graphs, drives an external
//! solver through a sequential baseline run and a sweep of parallel runs,
//! checks every parallel result against the baseline, and renders execution
//! time and iteration charts for studies that verify completely.
//!
//! ```
//! use gridsweep_core::{Cell, EdgeWeightPolicy, GraphGenerator, GridSpec};
//!
//! let grid = GridSpec::two_d(3, 3)?;
//! let generator = GraphGenerator::new(grid, EdgeWeightPolicy::Uniform(1.0), Cell::planar(0, 0))?;
//! let edges = generator.write_to(std::io::sink())?;
//! assert_eq!(edges, 24);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod canonical;
mod config;
mod error;
mod grid;
mod report;
mod solver;
mod study;

pub use crate::{
    canonical::{CanonicalOutput, LineDiff, canonicalize_file, diff, verify},
    config::{
        DEFAULT_CHARTS_DIR, DEFAULT_INPUTS_DIR, DEFAULT_LOG_FILE, DEFAULT_MAX_THREADS,
        DEFAULT_OUTPUTS_DIR, DEFAULT_SEED, DEFAULT_SOLVER, HarnessConfig, HarnessConfigBuilder,
    },
    error::{
        ConfigError, ConfigErrorCode, GenerationError, GenerationErrorCode, InvocationError,
        InvocationErrorCode, ReportError, ReportErrorCode, Result, StudyError, StudyErrorCode,
    },
    grid::{
        Axis, Cell, Dimensionality, EdgeWeightPolicy, GenerationSummary, GraphGenerator,
        GridSpec, MIN_WEIGHT, StandardCase, WeightSampler, generate,
    },
    report::{RenderedCharts, ReportRenderer, SvgChartRenderer},
    solver::{Algorithm, ProcessSolver, SolverInvocation, SolverInvoker, SolverResult},
    study::{
        ScalingSeries, SeriesPoint, StudyOrchestrator, StudyOutcome, StudyPhase, StudyPlan,
        prepare_input,
    },
};
