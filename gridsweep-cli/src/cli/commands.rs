//! Command implementations and argument parsing for the gridsweep CLI.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use gridsweep_core::{
    Cell, ConfigError, DEFAULT_CHARTS_DIR, DEFAULT_INPUTS_DIR, DEFAULT_LOG_FILE,
    DEFAULT_MAX_THREADS, DEFAULT_OUTPUTS_DIR, DEFAULT_SEED, DEFAULT_SOLVER, EdgeWeightPolicy,
    GenerationError, GenerationSummary, GridSpec, HarnessConfig, StandardCase, StudyError,
    StudyOrchestrator, StudyOutcome, StudyPlan, generate, prepare_input,
};
use thiserror::Error;
use tracing::{Span, field, info, instrument, warn};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "gridsweep",
    about = "Generate grid graphs and verify parallel SSSP solvers across thread counts."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Write one grid graph file.
    Generate(GenerateCommand),
    /// Write the four standard study inputs.
    GenerateSuite(SuiteCommand),
    /// Run one standard scaling study.
    Study(StudyCommand),
    /// Run the four standard scaling studies in order.
    Run(RunCommand),
}

/// Options accepted by the `generate` command.
#[derive(Debug, Args, Clone)]
#[command(group(ArgGroup::new("weights").required(true).args(["uniform", "random"])))]
pub struct GenerateCommand {
    /// Grid extents: `X Y` for a 2D grid or `X Y Z` for a 3D grid.
    #[arg(long, num_args = 2..=3, required = true, value_name = "EXTENT")]
    pub dims: Vec<usize>,

    /// Source vertex coordinates, matching the grid's dimensionality.
    #[arg(long, num_args = 2..=3, required = true, value_name = "COORD")]
    pub source: Vec<usize>,

    /// Give every edge this weight.
    #[arg(long, value_name = "WEIGHT")]
    pub uniform: Option<f64>,

    /// Draw each edge weight uniformly from `[LO, HI)`.
    #[arg(long, num_args = 2, value_names = ["LO", "HI"])]
    pub random: Option<Vec<f64>>,

    /// Seed for random weights.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Destination graph file.
    #[arg(long)]
    pub output: PathBuf,
}

/// Options accepted by the `generate-suite` command.
#[derive(Debug, Args, Clone)]
pub struct SuiteCommand {
    /// Directory receiving the input graphs.
    #[arg(long, default_value = DEFAULT_INPUTS_DIR)]
    pub inputs_dir: PathBuf,

    /// Seed for the random-weight cases.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,
}

/// Options accepted by the `study` command.
#[derive(Debug, Args, Clone)]
pub struct StudyCommand {
    /// Standard case to study.
    #[arg(value_enum)]
    pub case: CaseArg,

    /// Harness configuration.
    #[command(flatten)]
    pub harness: HarnessArgs,
}

/// Options accepted by the `run` command.
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Harness configuration.
    #[command(flatten)]
    pub harness: HarnessArgs,

    /// Keep running later studies after a mismatch; the command still fails.
    #[arg(long)]
    pub keep_going: bool,
}

/// Standard cases as spelled on the command line.
#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum CaseArg {
    /// 1000 x 1000 grid with unit weights.
    #[value(name = "2d_uniform")]
    Uniform2d,
    /// 1000 x 1000 grid with random weights.
    #[value(name = "2d_random")]
    Random2d,
    /// 50 x 50 x 50 grid with unit weights.
    #[value(name = "3d_uniform")]
    Uniform3d,
    /// 50 x 50 x 50 grid with random weights.
    #[value(name = "3d_random")]
    Random3d,
}

impl From<CaseArg> for StandardCase {
    fn from(value: CaseArg) -> Self {
        match value {
            CaseArg::Uniform2d => Self::Uniform2d,
            CaseArg::Random2d => Self::Random2d,
            CaseArg::Uniform3d => Self::Uniform3d,
            CaseArg::Random3d => Self::Random3d,
        }
    }
}

/// Flags mapped onto [`HarnessConfig`].
#[derive(Debug, Args, Clone)]
pub struct HarnessArgs {
    /// Solver executable.
    #[arg(long, default_value = DEFAULT_SOLVER)]
    pub solver: PathBuf,

    /// Directory to run the solver from (defaults to the current directory).
    #[arg(long)]
    pub solver_dir: Option<PathBuf>,

    /// Convergence log written by the parallel solver.
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// Directory receiving solver result files.
    #[arg(long, default_value = DEFAULT_OUTPUTS_DIR)]
    pub outputs_dir: PathBuf,

    /// Directory receiving charts.
    #[arg(long, default_value = DEFAULT_CHARTS_DIR)]
    pub charts_dir: PathBuf,

    /// Directory holding the standard input graphs.
    #[arg(long, default_value = DEFAULT_INPUTS_DIR)]
    pub inputs_dir: PathBuf,

    /// Largest thread count in the sweep.
    #[arg(long, default_value_t = DEFAULT_MAX_THREADS)]
    pub max_threads: usize,

    /// Seed for random-weight inputs generated on demand.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,
}

impl HarnessArgs {
    /// Builds the validated harness configuration.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when the configuration is rejected.
    pub fn to_config(&self) -> Result<HarnessConfig, ConfigError> {
        let builder = HarnessConfig::builder()
            .with_solver(&self.solver)
            .with_log_file(&self.log_file)
            .with_outputs_dir(&self.outputs_dir)
            .with_charts_dir(&self.charts_dir)
            .with_inputs_dir(&self.inputs_dir)
            .with_max_threads(self.max_threads)
            .with_seed(self.seed);
        match &self.solver_dir {
            Some(dir) => builder.with_solver_dir(dir).build(),
            None => builder.build(),
        }
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// A directory could not be created.
    #[error("failed to create `{path}`: {source}")]
    Io {
        /// Directory path.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// `--dims` named neither a 2D nor a 3D grid.
    #[error("expected 2 or 3 grid extents, got {got}")]
    Dimensions {
        /// Number of extents supplied.
        got: usize,
    },
    /// `--source` and `--dims` disagree on dimensionality.
    #[error("source has {coordinates} coordinates but the grid has {dims} dimensions")]
    SourceArity {
        /// Number of grid extents.
        dims: usize,
        /// Number of source coordinates.
        coordinates: usize,
    },
    /// The harness configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Graph generation failed.
    #[error(transparent)]
    Generation(#[from] GenerationError),
    /// A study failed before it could reach a verdict.
    #[error(transparent)]
    Study(#[from] StudyError),
    /// A parallel run disagreed with the baseline.
    #[error("{study}: parallel output with {threads} threads does not match the baseline")]
    Mismatch {
        /// Title of the aborted study.
        study: String,
        /// First thread count whose output mismatched.
        threads: usize,
    },
}

impl CliError {
    /// Stable code of the underlying library error, when there is one.
    #[must_use]
    pub const fn code(&self) -> Option<&'static str> {
        match self {
            Self::Config(err) => Some(err.code().as_str()),
            Self::Generation(err) => Some(err.code().as_str()),
            Self::Study(err) => Some(err.code().as_str()),
            Self::Mismatch { .. } => Some("CORRECTNESS_MISMATCH"),
            Self::Io { .. } | Self::Dimensions { .. } | Self::SourceArity { .. } => None,
        }
    }
}

/// Result of one study run from the command line.
#[derive(Debug, Clone)]
pub struct StudyReport {
    /// Case that was studied.
    pub case: StandardCase,
    /// Input graph handed to the solver.
    pub input: PathBuf,
    /// How the study ended.
    pub outcome: StudyOutcome,
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone)]
pub enum ExecutionSummary {
    /// Graph files written by `generate` or `generate-suite`.
    Generated(Vec<GenerationSummary>),
    /// Studies run by `study` or `run`, in execution order.
    Studies(Vec<StudyReport>),
}

impl ExecutionSummary {
    /// Fails with the first correctness mismatch recorded in the summary.
    ///
    /// # Errors
    /// Returns [`CliError::Mismatch`] naming the first aborted study.
    pub fn verified(&self) -> Result<(), CliError> {
        let Self::Studies(reports) = self else {
            return Ok(());
        };
        for report in reports {
            if let StudyOutcome::Aborted { failed_threads, .. } = report.outcome {
                return Err(CliError::Mismatch {
                    study: report.case.title().to_owned(),
                    threads: failed_threads,
                });
            }
        }
        Ok(())
    }
}

/// Executes the CLI command represented by `cli`.
///
/// A study that aborts on a mismatch is still a successful execution; check
/// [`ExecutionSummary::verified`] for the verdict.
///
/// # Errors
/// Returns [`CliError`] when generation or a study fails outright.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use gridsweep_cli::cli::{Cli, Command, ExecutionSummary, GenerateCommand, run_cli};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let dir = tempfile::tempdir()?;
/// let cli = Cli {
///     command: Command::Generate(GenerateCommand {
///         dims: vec![3, 3],
///         source: vec![0, 0],
///         uniform: Some(1.0),
///         random: None,
///         seed: 1,
///         output: dir.path().join("graph.txt"),
///     }),
/// };
/// let ExecutionSummary::Generated(files) = run_cli(cli)? else {
///     unreachable!("generate reports generated files");
/// };
/// assert_eq!(files[0].edges, 24);
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    let span = Span::current();
    match cli.command {
        Command::Generate(command) => {
            span.record("command", "generate");
            run_generate(&command)
        }
        Command::GenerateSuite(command) => {
            span.record("command", "generate-suite");
            run_generate_suite(&command)
        }
        Command::Study(command) => {
            span.record("command", "study");
            run_study(&command)
        }
        Command::Run(command) => {
            span.record("command", "run");
            run_all(&command)
        }
    }
}

pub(super) fn grid_from_dims(dims: &[usize]) -> Result<GridSpec, CliError> {
    let grid = match *dims {
        [x, y] => GridSpec::two_d(x, y)?,
        [x, y, z] => GridSpec::three_d(x, y, z)?,
        _ => return Err(CliError::Dimensions { got: dims.len() }),
    };
    Ok(grid)
}

pub(super) fn source_cell(dims: usize, coordinates: &[usize]) -> Result<Cell, CliError> {
    match (dims, coordinates) {
        (2, &[x, y]) => Ok(Cell::planar(x, y)),
        (3, &[x, y, z]) => Ok(Cell::new(x, y, z)),
        _ => Err(CliError::SourceArity {
            dims,
            coordinates: coordinates.len(),
        }),
    }
}

pub(super) fn weight_policy(command: &GenerateCommand) -> EdgeWeightPolicy {
    match (command.uniform, command.random.as_deref()) {
        (_, Some(&[lo, hi])) => EdgeWeightPolicy::Random {
            lo,
            hi,
            seed: command.seed,
        },
        (Some(weight), _) => EdgeWeightPolicy::Uniform(weight),
        _ => EdgeWeightPolicy::Uniform(1.0),
    }
}

fn run_generate(command: &GenerateCommand) -> Result<ExecutionSummary, CliError> {
    let grid = grid_from_dims(&command.dims)?;
    let source = source_cell(command.dims.len(), &command.source)?;
    let summary = generate(grid, weight_policy(command), source, &command.output)?;
    Ok(ExecutionSummary::Generated(vec![summary]))
}

fn run_generate_suite(command: &SuiteCommand) -> Result<ExecutionSummary, CliError> {
    create_dir(&command.inputs_dir)?;
    let mut written = Vec::with_capacity(StandardCase::ALL.len());
    for case in StandardCase::ALL {
        let path = command.inputs_dir.join(case.input_file_name());
        info!(case = %case, path = %path.display(), "generating standard input");
        written.push(generate_case(case, command.seed, &path)?);
    }
    Ok(ExecutionSummary::Generated(written))
}

fn run_study(command: &StudyCommand) -> Result<ExecutionSummary, CliError> {
    let config = command.harness.to_config()?;
    let report = run_case(&config, command.case.into())?;
    Ok(ExecutionSummary::Studies(vec![report]))
}

fn run_all(command: &RunCommand) -> Result<ExecutionSummary, CliError> {
    let config = command.harness.to_config()?;
    let mut reports = Vec::with_capacity(StandardCase::ALL.len());
    for case in StandardCase::ALL {
        let report = run_case(&config, case)?;
        let aborted = !report.outcome.is_complete();
        reports.push(report);
        if aborted && !command.keep_going {
            warn!(case = %case, "stopping after the first mismatching study");
            break;
        }
    }
    Ok(ExecutionSummary::Studies(reports))
}

#[instrument(name = "cli.study", err, skip(config, case), fields(case = %case))]
fn run_case(config: &HarnessConfig, case: StandardCase) -> Result<StudyReport, CliError> {
    prepare_input(case, config)?;
    let input = config.input_path(case);
    let plan = StudyPlan::for_case(case, config);
    let mut solver = config.process_solver();
    let renderer = config.chart_renderer();
    let outcome = StudyOrchestrator::new(config, &mut solver, &renderer).run(&plan)?;
    Ok(StudyReport {
        case,
        input,
        outcome,
    })
}

fn generate_case(
    case: StandardCase,
    seed: u64,
    path: &Path,
) -> Result<GenerationSummary, GenerationError> {
    generate(case.grid(), case.policy(seed), case.source(), path)
}

fn create_dir(path: &Path) -> Result<(), CliError> {
    fs::create_dir_all(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Renders `summary` to `writer` in a tab-separated text format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use std::path::PathBuf;
/// # use gridsweep_cli::cli::{ExecutionSummary, render_summary};
/// # use gridsweep_core::GenerationSummary;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let summary = ExecutionSummary::Generated(vec![GenerationSummary {
///     path: PathBuf::from("graph.txt"),
///     cells: 9,
///     edges: 24,
/// }]);
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// assert_eq!(String::from_utf8(buffer)?, "graph.txt\t9 cells\t24 edges\n");
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    match summary {
        ExecutionSummary::Generated(files) => {
            for file in files {
                writeln!(
                    writer,
                    "{}\t{} cells\t{} edges",
                    file.path.display(),
                    file.cells,
                    file.edges
                )?;
            }
        }
        ExecutionSummary::Studies(reports) => {
            for report in reports {
                render_study(report, &mut writer)?;
            }
        }
    }
    Ok(())
}

fn render_study(report: &StudyReport, writer: &mut impl Write) -> io::Result<()> {
    writeln!(writer, "study: {}", report.case.title())?;
    writeln!(writer, "input: {}", report.input.display())?;
    writeln!(writer, "threads\tseconds\titerations")?;
    for point in report.outcome.series().points() {
        writeln!(
            writer,
            "{}\t{:.6}\t{}",
            point.threads,
            point.elapsed.as_secs_f64(),
            point.iterations
        )?;
    }
    match &report.outcome {
        StudyOutcome::Complete { charts, .. } => {
            writeln!(writer, "chart: {}", charts.execution_time.display())?;
            writeln!(writer, "chart: {}", charts.iterations.display())?;
        }
        StudyOutcome::Aborted {
            failed_threads,
            mismatch,
            ..
        } => {
            writeln!(writer, "mismatch at {failed_threads} threads: {mismatch}")?;
        }
    }
    Ok(())
}
