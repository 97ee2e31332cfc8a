//! Scaling study orchestration.
//!
//! A study runs the baseline solver once, then sweeps the parallel solver
//! over `1..=max_threads`, verifying each result against the baseline before
//! recording its timing and iteration count. The first mismatch aborts the
//! sweep without rendering charts.

mod series;

use std::{fmt, fs, num::NonZeroUsize, path::PathBuf};

use tracing::{debug, error, info, instrument};

pub use series::{ScalingSeries, SeriesPoint};

use crate::{
    Result,
    canonical::{CanonicalOutput, LineDiff, diff, verify},
    config::HarnessConfig,
    error::{InvocationError, StudyError},
    grid::{Dimensionality, GenerationSummary, StandardCase, generate},
    report::{RenderedCharts, ReportRenderer},
    solver::{SolverInvocation, SolverInvoker, SolverResult},
};

/// Where a study currently is in its lifecycle.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StudyPhase {
    /// Nothing has run yet.
    Init,
    /// The baseline solver is running.
    BaselineRun,
    /// The baseline output has been canonicalised and retained.
    BaselineCanonicalized,
    /// The parallel solver is being checked with `threads` threads.
    Sweep {
        /// Thread count under test.
        threads: usize,
    },
    /// Every thread count matched and the charts were rendered.
    Complete,
    /// A thread count produced a mismatching output.
    Aborted {
        /// Thread count whose output mismatched.
        threads: usize,
    },
}

impl fmt::Display for StudyPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init => f.write_str("init"),
            Self::BaselineRun => f.write_str("baseline-run"),
            Self::BaselineCanonicalized => f.write_str("baseline-canonicalized"),
            Self::Sweep { threads } => write!(f, "sweep({threads})"),
            Self::Complete => f.write_str("complete"),
            Self::Aborted { threads } => write!(f, "aborted({threads})"),
        }
    }
}

/// Inputs of a single study.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StudyPlan {
    /// Title used in progress logs.
    pub title: String,
    /// Prefix of the rendered chart file names.
    pub chart_prefix: String,
    /// Graph file handed to the solver.
    pub input: PathBuf,
    /// Dimensionality of the input graph.
    pub dimensionality: Dimensionality,
}

impl StudyPlan {
    /// Plans the standard `case` using the configured input directory.
    #[must_use]
    pub fn for_case(case: StandardCase, config: &HarnessConfig) -> Self {
        Self {
            title: case.title().to_owned(),
            chart_prefix: case.chart_prefix().to_owned(),
            input: config.input_path(case),
            dimensionality: case.grid().dimensionality(),
        }
    }
}

/// Writes the input graph of `case` unless the configured path already holds
/// one.
///
/// Returns the summary of a freshly written graph, or `None` when an existing
/// input is reused.
///
/// # Errors
/// Returns [`StudyError::Io`] when the inputs directory cannot be created and
/// [`StudyError::Generation`] when the graph cannot be written.
#[instrument(name = "study.prepare_input", err, skip(case, config), fields(case = %case))]
pub fn prepare_input(
    case: StandardCase,
    config: &HarnessConfig,
) -> Result<Option<GenerationSummary>> {
    let input = config.input_path(case);
    if input.exists() {
        info!(path = %input.display(), "reusing existing input");
        return Ok(None);
    }
    let inputs_dir = config.inputs_dir();
    fs::create_dir_all(inputs_dir).map_err(|source| StudyError::Io {
        path: inputs_dir.to_path_buf(),
        source,
    })?;
    let summary = generate(case.grid(), case.policy(config.seed()), case.source(), &input)?;
    Ok(Some(summary))
}

/// How a study ended.
#[derive(Clone, Debug, PartialEq)]
pub enum StudyOutcome {
    /// All thread counts matched the baseline.
    Complete {
        /// One point per thread count.
        series: ScalingSeries,
        /// Charts rendered from the series.
        charts: RenderedCharts,
    },
    /// The sweep stopped at the first mismatching thread count.
    Aborted {
        /// Thread count whose output differed from the baseline.
        failed_threads: usize,
        /// Line-level summary of the difference.
        mismatch: LineDiff,
        /// Points recorded before the mismatch.
        series: ScalingSeries,
    },
}

impl StudyOutcome {
    /// Returns `true` when the study completed.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::Complete { .. })
    }

    /// Returns the points recorded by the study.
    #[must_use]
    pub const fn series(&self) -> &ScalingSeries {
        match self {
            Self::Complete { series, .. } | Self::Aborted { series, .. } => series,
        }
    }
}

/// Drives one study at a time against a solver and a chart renderer.
///
/// # Examples
/// ```no_run
/// use gridsweep_core::{HarnessConfig, StandardCase, StudyOrchestrator, StudyPlan};
///
/// let config = HarnessConfig::builder().build()?;
/// let plan = StudyPlan::for_case(StandardCase::Uniform2d, &config);
/// let mut orchestrator = StudyOrchestrator::new(
///     &config,
///     config.process_solver(),
///     config.chart_renderer(),
/// );
/// let outcome = orchestrator.run(&plan)?;
/// println!("{} thread counts verified", outcome.series().len());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct StudyOrchestrator<'cfg, S, R> {
    config: &'cfg HarnessConfig,
    solver: S,
    renderer: R,
    phase: StudyPhase,
}

impl<'cfg, S, R> StudyOrchestrator<'cfg, S, R>
where
    S: SolverInvoker,
    R: ReportRenderer,
{
    /// Creates an orchestrator in the [`StudyPhase::Init`] phase.
    pub const fn new(config: &'cfg HarnessConfig, solver: S, renderer: R) -> Self {
        Self {
            config,
            solver,
            renderer,
            phase: StudyPhase::Init,
        }
    }

    /// Returns the phase reached by the most recent study.
    #[must_use]
    pub const fn phase(&self) -> StudyPhase {
        self.phase
    }

    /// Consumes the orchestrator and returns its solver and renderer.
    pub fn into_parts(self) -> (S, R) {
        (self.solver, self.renderer)
    }

    /// Runs the study described by `plan`.
    ///
    /// A correctness mismatch is reported as [`StudyOutcome::Aborted`], not as
    /// an error.
    ///
    /// # Errors
    /// Returns [`StudyError`] when the solver cannot be run, a result file
    /// cannot be accessed, or the charts cannot be rendered.
    #[instrument(
        name = "study.run",
        err,
        skip(self, plan),
        fields(
            study = %plan.title,
            input = %plan.input.display(),
            max_threads = self.config.max_threads().get(),
        ),
    )]
    pub fn run(&mut self, plan: &StudyPlan) -> Result<StudyOutcome> {
        self.transition(StudyPhase::Init);
        let outputs_dir = self.config.outputs_dir();
        fs::create_dir_all(outputs_dir).map_err(|source| StudyError::Io {
            path: outputs_dir.to_path_buf(),
            source,
        })?;

        info!(study = %plan.title, "running baseline solver");
        let baseline = self.run_baseline(plan)?;

        let mut series = ScalingSeries::new();
        for threads in self.config.thread_counts() {
            self.transition(StudyPhase::Sweep {
                threads: threads.get(),
            });
            info!(threads = threads.get(), "running parallel solver");
            let (candidate, result) = self.run_parallel(plan, threads)?;

            if !verify(&candidate, &baseline) {
                let mismatch = diff(&candidate, &baseline);
                error!(
                    study = %plan.title,
                    threads = threads.get(),
                    missing = mismatch.missing,
                    unexpected = mismatch.unexpected,
                    "parallel output does not match the baseline"
                );
                self.transition(StudyPhase::Aborted {
                    threads: threads.get(),
                });
                return Ok(StudyOutcome::Aborted {
                    failed_threads: threads.get(),
                    mismatch,
                    series,
                });
            }

            let iterations = result
                .iterations
                .ok_or(InvocationError::MissingIterations {
                    threads: threads.get(),
                })?;
            info!(
                threads = threads.get(),
                elapsed_s = result.elapsed.as_secs_f64(),
                iterations,
                "parallel output verified"
            );
            series.push(SeriesPoint {
                threads: threads.get(),
                elapsed: result.elapsed,
                iterations,
            })?;
        }

        let charts = self.renderer.render(&series, &plan.chart_prefix)?;
        self.transition(StudyPhase::Complete);
        Ok(StudyOutcome::Complete { series, charts })
    }

    fn run_baseline(&mut self, plan: &StudyPlan) -> Result<CanonicalOutput> {
        self.transition(StudyPhase::BaselineRun);
        let output = self.config.baseline_output_path();
        let invocation = SolverInvocation::baseline(plan.dimensionality, &plan.input, &output);
        let result = self.solver.invoke(&invocation)?;
        let baseline = canonicalise(result.lines, &invocation)?;
        self.transition(StudyPhase::BaselineCanonicalized);
        Ok(baseline)
    }

    fn run_parallel(
        &mut self,
        plan: &StudyPlan,
        threads: NonZeroUsize,
    ) -> Result<(CanonicalOutput, SolverResult)> {
        let output = self.config.thread_output_path(threads);
        let invocation =
            SolverInvocation::parallel(threads, plan.dimensionality, &plan.input, &output);
        let mut result = self.solver.invoke(&invocation)?;
        let canonical = canonicalise(std::mem::take(&mut result.lines), &invocation)?;
        Ok((canonical, result))
    }

    fn transition(&mut self, next: StudyPhase) {
        debug!(from = %self.phase, to = %next, "study phase transition");
        self.phase = next;
    }
}

/// Sorts the solver's records and rewrites its output file in canonical form.
fn canonicalise(lines: Vec<String>, invocation: &SolverInvocation) -> Result<CanonicalOutput> {
    let canonical = CanonicalOutput::from_lines(lines);
    canonical
        .persist(&invocation.output)
        .map_err(|source| StudyError::Io {
            path: invocation.output.clone(),
            source,
        })?;
    Ok(canonical)
}

#[cfg(test)]
mod tests;
