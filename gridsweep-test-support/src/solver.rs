//! Solver doubles.
//!
//! [`ScriptedSolver`] answers in-process and writes its records to the
//! invocation's output path the way the real solver would. [`fake_solver`]
//! writes a small `sh` program honouring the solver's command-line contract
//! for tests that exercise [`gridsweep_core::ProcessSolver`] end to end.

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use gridsweep_core::{Algorithm, InvocationError, SolverInvocation, SolverInvoker, SolverResult};

/// Records of a 3x1 grid solved from its left end.
pub const SAMPLE_RECORDS: [&str; 3] = ["0 0 0", "1 0 1", "2 0 2"];

/// In-process solver returning a fixed set of records.
///
/// Parallel runs emit the records in reverse order so tests exercise
/// canonicalisation. A corrupted thread count drops the last record.
#[derive(Clone, Debug)]
pub struct ScriptedSolver {
    records: Vec<String>,
    corrupt_at: Option<usize>,
    base_elapsed: Duration,
    invocations: Vec<SolverInvocation>,
}

impl Default for ScriptedSolver {
    fn default() -> Self {
        Self::new(SAMPLE_RECORDS)
    }
}

impl ScriptedSolver {
    /// Creates a solver answering every invocation with `records`.
    pub fn new<I, S>(records: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            records: records.into_iter().map(Into::into).collect(),
            corrupt_at: None,
            base_elapsed: Duration::from_millis(120),
            invocations: Vec::new(),
        }
    }

    /// Drops one record from the parallel run with `threads` threads.
    #[must_use]
    pub const fn corrupt_at(mut self, threads: usize) -> Self {
        self.corrupt_at = Some(threads);
        self
    }

    /// Invocations received so far, in order.
    #[must_use]
    pub fn invocations(&self) -> &[SolverInvocation] {
        &self.invocations
    }

    /// Thread counts of the parallel invocations received so far.
    #[must_use]
    pub fn parallel_threads(&self) -> Vec<usize> {
        self.invocations
            .iter()
            .filter(|call| call.algorithm == Algorithm::Parallel)
            .map(|call| call.threads.get())
            .collect()
    }

    /// Iteration count reported for `threads` threads.
    #[must_use]
    pub fn iterations_for(&self, threads: usize) -> u64 {
        u64::try_from(self.records.len().saturating_add(threads)).unwrap_or(u64::MAX)
    }
}

impl SolverInvoker for ScriptedSolver {
    fn invoke(&mut self, invocation: &SolverInvocation) -> Result<SolverResult, InvocationError> {
        self.invocations.push(invocation.clone());
        let threads = invocation.threads.get();
        let mut lines = self.records.clone();
        let mut iterations = None;
        if invocation.algorithm == Algorithm::Parallel {
            lines.reverse();
            if self.corrupt_at == Some(threads) {
                lines.pop();
            }
            iterations = Some(self.iterations_for(threads));
        }

        let mut text = lines.join("\n");
        text.push('\n');
        fs::write(&invocation.output, text).map_err(|source| InvocationError::MissingOutput {
            path: invocation.output.clone(),
            source,
        })?;

        let divisor = u32::try_from(threads).unwrap_or(u32::MAX);
        Ok(SolverResult {
            lines,
            elapsed: self.base_elapsed / divisor,
            iterations,
        })
    }
}

/// Shell prelude parsing the solver's arguments into `algo`, `threads`,
/// `flag3d`, `input` and `output`.
const ARGUMENT_PRELUDE: &str = r#"#!/bin/sh
set -eu
algo=""; threads=""; flag3d=""; input=""; output=""
while [ "$#" -gt 0 ]; do
    case "$1" in
        --algo) algo="$2"; shift 2 ;;
        --nthreads) threads="$2"; shift 2 ;;
        --flag3d) flag3d="$2"; shift 2 ;;
        --input) input="$2"; shift 2 ;;
        --output) output="$2"; shift 2 ;;
        *) echo "unknown argument $1" >&2; exit 64 ;;
    esac
done
"#;

/// Body of a solver that writes [`SAMPLE_RECORDS`] and, for the parallel
/// algorithm, logs the thread count plus ten as its iteration count.
pub const WELL_BEHAVED_BODY: &str = r#"
if [ "$algo" = "bellmanford" ]; then
    printf '2 0 2\n1 0 1\n0 0 0\n' > "$output"
    echo $((threads + 10)) > logs.txt
else
    printf '0 0 0\n1 0 1\n2 0 2\n' > "$output"
fi
"#;

/// Writes an executable fake solver named `name` into `dir`.
///
/// `body` runs after the argument prelude with the parsed arguments in
/// scope; the script's working directory is wherever the solver is started.
///
/// # Errors
/// Returns any error raised while writing the script or marking it
/// executable.
pub fn fake_solver(dir: &Path, name: &str, body: &str) -> io::Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, format!("{ARGUMENT_PRELUDE}{body}"))?;
    make_executable(&path)?;
    Ok(path)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::num::NonZeroUsize;

    use gridsweep_core::Dimensionality;
    use rstest::rstest;

    #[rstest]
    fn scripted_solver_writes_its_output() {
        let dir = tempfile::tempdir().expect("temp dir");
        let output = dir.path().join("output_2.txt");
        let mut solver = ScriptedSolver::default();
        let threads = NonZeroUsize::new(2).expect("non-zero");
        let invocation = SolverInvocation::parallel(
            threads,
            Dimensionality::TwoD,
            Path::new("input.txt"),
            &output,
        );

        let result = solver.invoke(&invocation).expect("scripted run");
        assert_eq!(result.lines, vec!["2 0 2", "1 0 1", "0 0 0"]);
        assert_eq!(result.iterations, Some(5));
        assert_eq!(result.elapsed, Duration::from_millis(60));
        assert_eq!(
            fs::read_to_string(&output).expect("output written"),
            "2 0 2\n1 0 1\n0 0 0\n"
        );
        assert_eq!(solver.parallel_threads(), vec![2]);
    }

    #[rstest]
    fn corrupted_thread_count_drops_a_record() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut solver = ScriptedSolver::default().corrupt_at(1);
        let invocation = SolverInvocation::parallel(
            NonZeroUsize::MIN,
            Dimensionality::TwoD,
            Path::new("input.txt"),
            &dir.path().join("output_1.txt"),
        );
        let result = solver.invoke(&invocation).expect("scripted run");
        assert_eq!(result.lines.len(), SAMPLE_RECORDS.len() - 1);
    }
}
