//! Solver backed by the external executable.

use std::{
    ffi::OsString,
    fs, io,
    path::{self, Path, PathBuf},
    process::{Child, Command, ExitStatus, Stdio},
    time::Instant,
};

use tracing::{debug, instrument, warn};

use super::{Algorithm, SolverInvocation, SolverInvoker, SolverResult};
use crate::error::InvocationError;

/// Runs the solver executable as a blocking child process.
///
/// The solver reports convergence through a fixed-path log whose first line
/// is the iteration count. The log is removed before every parallel run so a
/// solver that dies early cannot hand back a previous run's count.
#[derive(Clone, Debug)]
pub struct ProcessSolver {
    program: PathBuf,
    log_path: PathBuf,
    working_dir: Option<PathBuf>,
}

impl ProcessSolver {
    /// Creates a solver running `program` and reading iteration counts from
    /// `log_path`.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>, log_path: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            log_path: log_path.into(),
            working_dir: None,
        }
    }

    /// Runs the solver from `dir`. A relative log path is resolved against it.
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Returns the executable this solver runs.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Returns where the convergence log is read from.
    #[must_use]
    pub fn log_path(&self) -> PathBuf {
        match &self.working_dir {
            Some(dir) if self.log_path.is_relative() => dir.join(&self.log_path),
            _ => self.log_path.clone(),
        }
    }

    /// Builds the solver's argument list for `invocation`.
    #[must_use]
    pub fn arguments(invocation: &SolverInvocation) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["--algo".into(), invocation.algorithm.solver_name().into()];
        if invocation.algorithm == Algorithm::Parallel {
            args.push("--nthreads".into());
            args.push(invocation.threads.to_string().into());
        }
        args.extend([
            "--flag3d".into(),
            invocation.dimensionality.solver_flag().into(),
            "--input".into(),
            invocation.input.clone().into_os_string(),
            "--output".into(),
            invocation.output.clone().into_os_string(),
        ]);
        args
    }

    fn command(&self, invocation: &SolverInvocation) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(Self::arguments(invocation))
            .stdin(Stdio::null());
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }
        command
    }

    /// Anchors relative input and output paths to the harness's own working
    /// directory when the solver runs elsewhere.
    fn resolve_paths(&self, invocation: &SolverInvocation) -> io::Result<SolverInvocation> {
        let mut resolved = invocation.clone();
        if self.working_dir.is_some() {
            if resolved.input.is_relative() {
                resolved.input = path::absolute(&resolved.input)?;
            }
            if resolved.output.is_relative() {
                resolved.output = path::absolute(&resolved.output)?;
            }
        }
        Ok(resolved)
    }

    fn clear_stale_log(log_path: &Path) -> Result<(), InvocationError> {
        match fs::remove_file(log_path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(InvocationError::StaleLog {
                path: log_path.to_path_buf(),
                source,
            }),
        }
    }
}

impl SolverInvoker for ProcessSolver {
    #[instrument(
        name = "solver.invoke",
        err,
        skip(self, invocation),
        fields(
            algorithm = invocation.algorithm.solver_name(),
            threads = invocation.threads.get(),
            output = %invocation.output.display(),
        ),
    )]
    fn invoke(&mut self, invocation: &SolverInvocation) -> Result<SolverResult, InvocationError> {
        let log_path = self.log_path();
        if invocation.algorithm == Algorithm::Parallel {
            Self::clear_stale_log(&log_path)?;
        }

        let resolved = self
            .resolve_paths(invocation)
            .map_err(|source| InvocationError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        let mut command = self.command(&resolved);
        let started = Instant::now();
        let mut child = ChildGuard::spawn(&mut command).map_err(|source| InvocationError::Spawn {
            program: self.program.clone(),
            source,
        })?;
        let status = child.wait().map_err(|source| InvocationError::Wait {
            program: self.program.clone(),
            source,
        })?;
        let elapsed = started.elapsed();

        if !status.success() {
            return Err(InvocationError::Failed {
                algorithm: invocation.algorithm,
                status,
            });
        }

        let lines = read_lines(&invocation.output).map_err(|source| InvocationError::MissingOutput {
            path: invocation.output.clone(),
            source,
        })?;
        let iterations = match invocation.algorithm {
            Algorithm::Baseline => None,
            Algorithm::Parallel => Some(read_iteration_count(&log_path)?),
        };

        debug!(
            elapsed_ms = elapsed.as_millis(),
            lines = lines.len(),
            iterations,
            "solver finished"
        );
        Ok(SolverResult {
            lines,
            elapsed,
            iterations,
        })
    }
}

/// Owns a running child and guarantees it is reaped.
///
/// Dropping the guard before [`ChildGuard::wait`] succeeds kills the process
/// and waits for it, so no exit path leaks a running solver.
struct ChildGuard {
    child: Child,
    reaped: bool,
}

impl ChildGuard {
    fn spawn(command: &mut Command) -> io::Result<Self> {
        Ok(Self {
            child: command.spawn()?,
            reaped: false,
        })
    }

    fn wait(&mut self) -> io::Result<ExitStatus> {
        let status = self.child.wait()?;
        self.reaped = true;
        Ok(status)
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if self.reaped {
            return;
        }
        if let Err(err) = self.child.kill() {
            warn!(error = %err, pid = self.child.id(), "failed to kill solver process");
        }
        if let Err(err) = self.child.wait() {
            warn!(error = %err, pid = self.child.id(), "failed to reap solver process");
        }
    }
}

fn read_lines(path: &Path) -> io::Result<Vec<String>> {
    Ok(fs::read_to_string(path)?
        .lines()
        .map(str::to_owned)
        .collect())
}

fn read_iteration_count(log_path: &Path) -> Result<u64, InvocationError> {
    let text = fs::read_to_string(log_path).map_err(|source| InvocationError::MissingLog {
        path: log_path.to_path_buf(),
        source,
    })?;
    let first = text.lines().next().unwrap_or_default().trim();
    first
        .parse::<u64>()
        .map_err(|_| InvocationError::MalformedLog {
            path: log_path.to_path_buf(),
            line: first.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::num::NonZeroUsize;

    use rstest::rstest;

    use crate::grid::Dimensionality;

    fn arguments_as_strings(invocation: &SolverInvocation) -> Vec<String> {
        ProcessSolver::arguments(invocation)
            .into_iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }

    #[rstest]
    fn baseline_arguments_omit_thread_count() {
        let invocation = SolverInvocation::baseline(
            Dimensionality::TwoD,
            Path::new("tests/input.txt"),
            Path::new("outputs/output_correct.txt"),
        );
        assert_eq!(
            arguments_as_strings(&invocation),
            vec![
                "--algo",
                "dijkstra",
                "--flag3d",
                "0",
                "--input",
                "tests/input.txt",
                "--output",
                "outputs/output_correct.txt",
            ]
        );
    }

    #[rstest]
    fn parallel_arguments_carry_thread_count() {
        let threads = NonZeroUsize::new(6).expect("non-zero");
        let invocation = SolverInvocation::parallel(
            threads,
            Dimensionality::ThreeD,
            Path::new("in.txt"),
            Path::new("out_6.txt"),
        );
        assert_eq!(
            arguments_as_strings(&invocation),
            vec![
                "--algo",
                "bellmanford",
                "--nthreads",
                "6",
                "--flag3d",
                "1",
                "--input",
                "in.txt",
                "--output",
                "out_6.txt",
            ]
        );
    }

    #[rstest]
    #[case::relative("logs.txt", Some("/work"), "/work/logs.txt")]
    #[case::absolute("/var/logs.txt", Some("/work"), "/var/logs.txt")]
    #[case::inherited("logs.txt", None, "logs.txt")]
    fn log_path_resolves_against_working_dir(
        #[case] log: &str,
        #[case] dir: Option<&str>,
        #[case] expected: &str,
    ) {
        let mut solver = ProcessSolver::new("./main", log);
        if let Some(dir) = dir {
            solver = solver.with_working_dir(dir);
        }
        assert_eq!(solver.log_path(), PathBuf::from(expected));
    }

    #[rstest]
    fn relative_paths_are_anchored_when_the_solver_runs_elsewhere() {
        let invocation = SolverInvocation::parallel(
            NonZeroUsize::MIN,
            Dimensionality::TwoD,
            Path::new("tests/input_2d_uniform.txt"),
            Path::new("outputs/output_1.txt"),
        );
        let cwd = std::env::current_dir().expect("current dir");

        let relocated = ProcessSolver::new("./main", "logs.txt").with_working_dir("/opt/sssp");
        let resolved = relocated.resolve_paths(&invocation).expect("paths resolve");
        assert_eq!(resolved.input, cwd.join("tests/input_2d_uniform.txt"));
        assert_eq!(resolved.output, cwd.join("outputs/output_1.txt"));

        let inherited = ProcessSolver::new("./main", "logs.txt");
        assert_eq!(
            inherited.resolve_paths(&invocation).expect("paths resolve"),
            invocation
        );
    }

    #[rstest]
    #[case::plain("42\n", 42)]
    #[case::padded("  7  \nignored\n", 7)]
    #[case::no_newline("0", 0)]
    fn iteration_count_reads_first_line(#[case] contents: &str, #[case] expected: u64) {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let path = dir.path().join("logs.txt");
        fs::write(&path, contents).expect("write log");
        assert_eq!(read_iteration_count(&path).expect("valid log"), expected);
    }

    #[rstest]
    #[case::empty("")]
    #[case::text("converged\n")]
    #[case::negative("-3\n")]
    fn iteration_count_rejects_malformed_logs(#[case] contents: &str) {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let path = dir.path().join("logs.txt");
        fs::write(&path, contents).expect("write log");
        let err = read_iteration_count(&path).expect_err("malformed log must fail");
        assert!(matches!(err, InvocationError::MalformedLog { .. }));
    }

    #[rstest]
    fn missing_iteration_log_is_reported() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let err = read_iteration_count(&dir.path().join("absent.txt"))
            .expect_err("missing log must fail");
        assert!(matches!(err, InvocationError::MissingLog { .. }));
    }

    #[rstest]
    fn stale_log_removal_tolerates_absent_file() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let path = dir.path().join("logs.txt");
        ProcessSolver::clear_stale_log(&path).expect("absent log is fine");
        fs::write(&path, "3\n").expect("write log");
        ProcessSolver::clear_stale_log(&path).expect("existing log is removed");
        assert!(!path.exists());
    }
}
