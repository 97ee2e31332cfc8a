//! Shared fixtures for the CLI unit tests.
//!
//! Studies run against `sh` fake solvers in a temporary directory with
//! placeholder inputs so no full-size standard graph is ever generated.

use std::fs;
use std::path::{Path, PathBuf};

use gridsweep_core::StandardCase;
use gridsweep_test_support::solver::{WELL_BEHAVED_BODY, fake_solver};
use tempfile::TempDir;

use super::{HarnessArgs, run_cli, Cli, CliError, ExecutionSummary};

/// Solver body that drops a record from the 2-thread run of the 2D random
/// study and otherwise behaves like [`WELL_BEHAVED_BODY`].
pub(super) const CORRUPTS_2D_RANDOM_BODY: &str = r#"
if [ "$algo" = "bellmanford" ]; then
    case "$input" in
        *input_2d_random.txt)
            if [ "$threads" = "2" ]; then
                printf '2 0 2\n1 0 1\n' > "$output"
            else
                printf '2 0 2\n1 0 1\n0 0 0\n' > "$output"
            fi ;;
        *) printf '2 0 2\n1 0 1\n0 0 0\n' > "$output" ;;
    esac
    echo $((threads + 10)) > logs.txt
else
    printf '0 0 0\n1 0 1\n2 0 2\n' > "$output"
fi
"#;

pub(super) struct Harness {
    pub(super) dir: TempDir,
    pub(super) args: HarnessArgs,
}

impl Harness {
    pub(super) fn well_behaved(max_threads: usize) -> Self {
        Self::with_body(WELL_BEHAVED_BODY, max_threads)
    }

    pub(super) fn with_body(body: &str, max_threads: usize) -> Self {
        let dir = TempDir::new().expect("temp dir");
        let solver_dir = dir.path().join("solver");
        fs::create_dir_all(&solver_dir).expect("solver dir");
        let solver = fake_solver(&solver_dir, "main", body).expect("fake solver");
        let args = HarnessArgs {
            solver,
            solver_dir: Some(solver_dir),
            log_file: PathBuf::from("logs.txt"),
            outputs_dir: dir.path().join("outputs"),
            charts_dir: dir.path().join("graphs"),
            inputs_dir: dir.path().join("tests"),
            max_threads,
            seed: 1,
        };
        Self { dir, args }
    }

    /// Writes a tiny stand-in for every standard input.
    pub(super) fn with_placeholder_inputs(self) -> Self {
        fs::create_dir_all(&self.args.inputs_dir).expect("inputs dir");
        for case in StandardCase::ALL {
            fs::write(
                self.args.inputs_dir.join(case.input_file_name()),
                "3 1\n0 0\n",
            )
            .expect("placeholder input");
        }
        self
    }

    pub(super) fn charts_dir(&self) -> &Path {
        &self.args.charts_dir
    }
}

pub(super) fn run_cli_expecting_error(cli: Cli, panic_msg: &str) -> CliError {
    match run_cli(cli) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}

pub(super) fn study_count(summary: &ExecutionSummary) -> usize {
    match summary {
        ExecutionSummary::Studies(reports) => reports.len(),
        ExecutionSummary::Generated(_) => panic!("expected study reports"),
    }
}
