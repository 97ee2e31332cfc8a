//! Harness configuration shared by every study of a run.
//!
//! Paths, the thread sweep and the random seed are gathered into an explicit
//! [`HarnessConfig`] handed to the orchestrator, so several differently
//! configured runs can coexist in one process.

use std::{
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use crate::{
    error::ConfigError,
    grid::StandardCase,
    report::SvgChartRenderer,
    solver::ProcessSolver,
};

/// Default solver executable.
pub const DEFAULT_SOLVER: &str = "./main";
/// Default convergence log written by the solver.
pub const DEFAULT_LOG_FILE: &str = "logs.txt";
/// Default directory for solver result files.
pub const DEFAULT_OUTPUTS_DIR: &str = "./outputs";
/// Default directory for rendered charts.
pub const DEFAULT_CHARTS_DIR: &str = "./graphs";
/// Default directory holding generated input graphs.
pub const DEFAULT_INPUTS_DIR: &str = "./tests";
/// Default upper bound of the thread sweep.
pub const DEFAULT_MAX_THREADS: usize = 8;
/// Default seed for random weight policies.
pub const DEFAULT_SEED: u64 = 1;

const BASELINE_OUTPUT_FILE: &str = "output_correct.txt";

/// Validated harness configuration.
///
/// # Examples
/// ```
/// use gridsweep_core::HarnessConfig;
///
/// let config = HarnessConfig::builder()
///     .with_max_threads(3)
///     .with_outputs_dir("out")
///     .build()
///     .expect("configuration is valid");
/// let sweep: Vec<usize> = config.thread_counts().map(|n| n.get()).collect();
/// assert_eq!(sweep, vec![1, 2, 3]);
/// assert!(config.baseline_output_path().ends_with("output_correct.txt"));
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HarnessConfig {
    solver: PathBuf,
    solver_dir: Option<PathBuf>,
    log_file: PathBuf,
    outputs_dir: PathBuf,
    charts_dir: PathBuf,
    inputs_dir: PathBuf,
    max_threads: NonZeroUsize,
    seed: u64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            solver: PathBuf::from(DEFAULT_SOLVER),
            solver_dir: None,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            outputs_dir: PathBuf::from(DEFAULT_OUTPUTS_DIR),
            charts_dir: PathBuf::from(DEFAULT_CHARTS_DIR),
            inputs_dir: PathBuf::from(DEFAULT_INPUTS_DIR),
            max_threads: NonZeroUsize::new(DEFAULT_MAX_THREADS).unwrap_or(NonZeroUsize::MIN),
            seed: DEFAULT_SEED,
        }
    }
}

impl HarnessConfig {
    /// Starts a builder populated with the defaults.
    #[must_use]
    pub fn builder() -> HarnessConfigBuilder {
        HarnessConfigBuilder::default()
    }

    /// Solver executable.
    #[must_use]
    pub fn solver(&self) -> &Path {
        &self.solver
    }

    /// Directory the solver runs in, if not inherited.
    #[must_use]
    pub fn solver_dir(&self) -> Option<&Path> {
        self.solver_dir.as_deref()
    }

    /// Convergence log path as configured.
    #[must_use]
    pub fn log_file(&self) -> &Path {
        &self.log_file
    }

    /// Directory receiving result files.
    #[must_use]
    pub fn outputs_dir(&self) -> &Path {
        &self.outputs_dir
    }

    /// Directory receiving charts.
    #[must_use]
    pub fn charts_dir(&self) -> &Path {
        &self.charts_dir
    }

    /// Directory holding the standard input graphs.
    #[must_use]
    pub fn inputs_dir(&self) -> &Path {
        &self.inputs_dir
    }

    /// Upper bound of the thread sweep.
    #[must_use]
    pub const fn max_threads(&self) -> NonZeroUsize {
        self.max_threads
    }

    /// Seed for random weight policies.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Thread counts `1..=max_threads` in increasing order.
    pub fn thread_counts(&self) -> impl Iterator<Item = NonZeroUsize> + use<> {
        (1..=self.max_threads.get()).filter_map(NonZeroUsize::new)
    }

    /// Where the canonical baseline output is kept.
    #[must_use]
    pub fn baseline_output_path(&self) -> PathBuf {
        self.outputs_dir.join(BASELINE_OUTPUT_FILE)
    }

    /// Where the run with `threads` threads writes its output.
    #[must_use]
    pub fn thread_output_path(&self, threads: NonZeroUsize) -> PathBuf {
        self.outputs_dir.join(format!("output_{threads}.txt"))
    }

    /// Input graph path of a standard case.
    #[must_use]
    pub fn input_path(&self, case: StandardCase) -> PathBuf {
        self.inputs_dir.join(case.input_file_name())
    }

    /// Builds the process-backed solver described by this configuration.
    #[must_use]
    pub fn process_solver(&self) -> ProcessSolver {
        let solver = ProcessSolver::new(&self.solver, &self.log_file);
        match &self.solver_dir {
            Some(dir) => solver.with_working_dir(dir),
            None => solver,
        }
    }

    /// Builds the SVG chart renderer writing into the charts directory.
    #[must_use]
    pub fn chart_renderer(&self) -> SvgChartRenderer {
        SvgChartRenderer::new(&self.charts_dir)
    }
}

/// Configures and validates a [`HarnessConfig`].
#[derive(Clone, Debug)]
pub struct HarnessConfigBuilder {
    config: HarnessConfig,
    max_threads: usize,
}

impl Default for HarnessConfigBuilder {
    fn default() -> Self {
        Self {
            config: HarnessConfig::default(),
            max_threads: DEFAULT_MAX_THREADS,
        }
    }
}

impl HarnessConfigBuilder {
    /// Overrides the solver executable.
    #[must_use]
    pub fn with_solver(mut self, solver: impl Into<PathBuf>) -> Self {
        self.config.solver = solver.into();
        self
    }

    /// Runs the solver from `dir` instead of the current directory.
    #[must_use]
    pub fn with_solver_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.solver_dir = Some(dir.into());
        self
    }

    /// Overrides the convergence log path.
    #[must_use]
    pub fn with_log_file(mut self, log_file: impl Into<PathBuf>) -> Self {
        self.config.log_file = log_file.into();
        self
    }

    /// Overrides the result directory.
    #[must_use]
    pub fn with_outputs_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.outputs_dir = dir.into();
        self
    }

    /// Overrides the chart directory.
    #[must_use]
    pub fn with_charts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.charts_dir = dir.into();
        self
    }

    /// Overrides the input graph directory.
    #[must_use]
    pub fn with_inputs_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.inputs_dir = dir.into();
        self
    }

    /// Overrides the upper bound of the thread sweep.
    #[must_use]
    pub const fn with_max_threads(mut self, max_threads: usize) -> Self {
        self.max_threads = max_threads;
        self
    }

    /// Overrides the random weight seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns [`ConfigError::ZeroMaxThreads`] when the sweep would be empty.
    pub fn build(self) -> Result<HarnessConfig, ConfigError> {
        let max_threads = NonZeroUsize::new(self.max_threads).ok_or(ConfigError::ZeroMaxThreads {
            got: self.max_threads,
        })?;
        Ok(HarnessConfig {
            max_threads,
            ..self.config
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    fn defaults_mirror_the_classic_layout() {
        let config = HarnessConfig::builder().build().expect("defaults are valid");
        assert_eq!(config.solver(), Path::new("./main"));
        assert_eq!(config.log_file(), Path::new("logs.txt"));
        assert_eq!(config.max_threads().get(), 8);
        assert_eq!(config.seed(), 1);
        assert_eq!(
            config.baseline_output_path(),
            Path::new("./outputs").join("output_correct.txt")
        );
        assert_eq!(
            config.input_path(StandardCase::Random3d),
            Path::new("./tests").join("input_3d_random.txt")
        );
    }

    #[rstest]
    #[case(1, vec![1])]
    #[case(4, vec![1, 2, 3, 4])]
    fn thread_sweep_is_contiguous(#[case] max: usize, #[case] expected: Vec<usize>) {
        let config = HarnessConfig::builder()
            .with_max_threads(max)
            .build()
            .expect("non-zero sweep");
        let sweep: Vec<usize> = config.thread_counts().map(NonZeroUsize::get).collect();
        assert_eq!(sweep, expected);
    }

    #[rstest]
    fn zero_max_threads_is_rejected() {
        let err = HarnessConfig::builder()
            .with_max_threads(0)
            .build()
            .expect_err("empty sweep must fail");
        assert_eq!(err, ConfigError::ZeroMaxThreads { got: 0 });
    }

    #[rstest]
    fn thread_outputs_are_numbered() {
        let config = HarnessConfig::builder()
            .with_outputs_dir("/tmp/runs")
            .build()
            .expect("valid config");
        let three = NonZeroUsize::new(3).expect("non-zero");
        assert_eq!(
            config.thread_output_path(three),
            PathBuf::from("/tmp/runs/output_3.txt")
        );
    }

    #[rstest]
    fn process_solver_uses_configured_paths() {
        let config = HarnessConfig::builder()
            .with_solver("/opt/sssp/main")
            .with_solver_dir("/opt/sssp")
            .build()
            .expect("valid config");
        let solver = config.process_solver();
        assert_eq!(solver.program(), Path::new("/opt/sssp/main"));
        assert_eq!(solver.log_path(), PathBuf::from("/opt/sssp/logs.txt"));
    }
}
