use std::{cell::RefCell, path::Path, time::Duration};

use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::*;
use crate::{
    error::{GenerationError, ReportError},
    solver::Algorithm,
};

const RECORDS: [&str; 3] = ["0 0 0", "1 0 1", "0 1 1"];

/// Returns the records in a thread-dependent order and can drop a line at a
/// chosen thread count.
#[derive(Default)]
struct FakeSolver {
    calls: Vec<SolverInvocation>,
    drop_line_at: Option<usize>,
    omit_iterations: bool,
}

impl SolverInvoker for FakeSolver {
    fn invoke(
        &mut self,
        invocation: &SolverInvocation,
    ) -> core::result::Result<SolverResult, InvocationError> {
        self.calls.push(invocation.clone());
        let threads = invocation.threads.get();
        let mut lines: Vec<String> = RECORDS.iter().map(|line| (*line).to_owned()).collect();
        let line_count = lines.len();
        lines.rotate_left(threads % line_count);
        if self.drop_line_at == Some(threads) && invocation.algorithm == Algorithm::Parallel {
            lines.pop();
        }
        let iterations = match invocation.algorithm {
            Algorithm::Baseline => None,
            Algorithm::Parallel if self.omit_iterations => None,
            Algorithm::Parallel => {
                Some(u64::try_from(threads).map_or(u64::MAX, |n| n.saturating_add(10)))
            }
        };
        Ok(SolverResult {
            lines,
            elapsed: Duration::from_millis(100)
                .checked_div(u32::try_from(threads).unwrap_or(u32::MAX))
                .unwrap_or_default(),
            iterations,
        })
    }
}

#[derive(Default)]
struct CountingRenderer {
    prefixes: RefCell<Vec<String>>,
}

impl ReportRenderer for CountingRenderer {
    fn render(
        &self,
        series: &ScalingSeries,
        name_prefix: &str,
    ) -> core::result::Result<RenderedCharts, ReportError> {
        if series.is_empty() {
            return Err(ReportError::EmptySeries {
                prefix: name_prefix.to_owned(),
            });
        }
        self.prefixes.borrow_mut().push(name_prefix.to_owned());
        Ok(RenderedCharts {
            execution_time: PathBuf::from(format!("{name_prefix}_time.svg")),
            iterations: PathBuf::from(format!("{name_prefix}_iterations.svg")),
        })
    }
}

struct Workspace {
    _dir: TempDir,
    config: HarnessConfig,
    plan: StudyPlan,
}

#[fixture]
fn workspace() -> Workspace {
    let dir = TempDir::new().expect("temp dir");
    let config = HarnessConfig::builder()
        .with_outputs_dir(dir.path().join("outputs"))
        .with_inputs_dir(dir.path().join("inputs"))
        .with_max_threads(4)
        .build()
        .expect("valid config");
    let plan = StudyPlan::for_case(StandardCase::Uniform2d, &config);
    Workspace {
        _dir: dir,
        config,
        plan,
    }
}

#[rstest]
fn complete_study_records_every_thread_count(workspace: Workspace) {
    let renderer = CountingRenderer::default();
    let mut orchestrator =
        StudyOrchestrator::new(&workspace.config, FakeSolver::default(), &renderer);

    let outcome = orchestrator.run(&workspace.plan).expect("study runs");

    assert_eq!(orchestrator.phase(), StudyPhase::Complete);
    let StudyOutcome::Complete { series, charts } = outcome else {
        panic!("expected a complete study");
    };
    assert_eq!(series.thread_counts().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    assert_eq!(
        series.points().iter().map(|p| p.iterations).collect::<Vec<_>>(),
        vec![11, 12, 13, 14]
    );
    assert_eq!(charts.execution_time, Path::new("2d_uniform_time.svg"));
    assert_eq!(*renderer.prefixes.borrow(), vec!["2d_uniform".to_owned()]);
}

#[rstest]
fn baseline_runs_first_and_is_persisted_sorted(workspace: Workspace) {
    let mut orchestrator = StudyOrchestrator::new(
        &workspace.config,
        FakeSolver::default(),
        CountingRenderer::default(),
    );
    orchestrator.run(&workspace.plan).expect("study runs");
    let (solver, _) = orchestrator.into_parts();

    let first = solver.calls.first().expect("baseline call");
    assert_eq!(first.algorithm, Algorithm::Baseline);
    assert_eq!(first.output, workspace.config.baseline_output_path());
    assert!(
        solver.calls[1..]
            .iter()
            .all(|call| call.algorithm == Algorithm::Parallel)
    );
    assert_eq!(
        fs::read_to_string(workspace.config.baseline_output_path()).expect("baseline file"),
        "0 0 0\n0 1 1\n1 0 1\n"
    );
    let two = NonZeroUsize::new(2).expect("non-zero");
    assert_eq!(
        fs::read_to_string(workspace.config.thread_output_path(two)).expect("thread output"),
        "0 0 0\n0 1 1\n1 0 1\n"
    );
}

#[rstest]
fn mismatch_aborts_without_rendering(workspace: Workspace) {
    let renderer = CountingRenderer::default();
    let solver = FakeSolver {
        drop_line_at: Some(2),
        ..FakeSolver::default()
    };
    let mut orchestrator = StudyOrchestrator::new(&workspace.config, solver, &renderer);

    let outcome = orchestrator.run(&workspace.plan).expect("mismatch is not an error");

    assert_eq!(orchestrator.phase(), StudyPhase::Aborted { threads: 2 });
    let StudyOutcome::Aborted {
        failed_threads,
        mismatch,
        series,
    } = outcome
    else {
        panic!("expected an aborted study");
    };
    assert_eq!(failed_threads, 2);
    assert_eq!(mismatch.missing, 1);
    assert_eq!(mismatch.unexpected, 0);
    assert_eq!(series.thread_counts().collect::<Vec<_>>(), vec![1]);
    assert!(renderer.prefixes.borrow().is_empty());

    let (solver, _) = orchestrator.into_parts();
    let max_invoked = solver
        .calls
        .iter()
        .map(|call| call.threads.get())
        .max()
        .expect("calls recorded");
    assert_eq!(max_invoked, 2);
}

#[rstest]
fn missing_iteration_count_is_an_invocation_error(workspace: Workspace) {
    let solver = FakeSolver {
        omit_iterations: true,
        ..FakeSolver::default()
    };
    let mut orchestrator =
        StudyOrchestrator::new(&workspace.config, solver, CountingRenderer::default());

    let err = orchestrator
        .run(&workspace.plan)
        .expect_err("missing iterations must fail");
    assert!(matches!(
        err,
        StudyError::Invocation(InvocationError::MissingIterations { threads: 1 })
    ));
}

#[rstest]
fn plan_follows_the_standard_case(workspace: Workspace) {
    let plan = StudyPlan::for_case(StandardCase::Random3d, &workspace.config);
    assert_eq!(plan.title, "3D RANDOM WEIGHTS");
    assert_eq!(plan.chart_prefix, "3d_random");
    assert_eq!(plan.dimensionality, Dimensionality::ThreeD);
    assert!(plan.input.ends_with("input_3d_random.txt"));
}

#[rstest]
#[case(StudyPhase::Init, "init")]
#[case(StudyPhase::Sweep { threads: 3 }, "sweep(3)")]
#[case(StudyPhase::Aborted { threads: 5 }, "aborted(5)")]
fn phases_display_compactly(#[case] phase: StudyPhase, #[case] expected: &str) {
    assert_eq!(phase.to_string(), expected);
}

#[rstest]
fn existing_input_is_reused(workspace: Workspace) {
    let input = workspace.config.input_path(StandardCase::Random3d);
    fs::create_dir_all(workspace.config.inputs_dir()).expect("inputs dir");
    fs::write(&input, "placeholder\n").expect("placeholder input");

    let summary = prepare_input(StandardCase::Random3d, &workspace.config).expect("input ready");
    assert!(summary.is_none());
    assert_eq!(fs::read_to_string(&input).expect("input"), "placeholder\n");
}

#[rstest]
fn unusable_inputs_dir_is_an_io_error(workspace: Workspace) {
    let blocker = workspace.config.outputs_dir().with_file_name("blocker");
    fs::write(&blocker, "not a directory").expect("blocker file");
    let config = HarnessConfig::builder()
        .with_inputs_dir(blocker.join("inputs"))
        .build()
        .expect("valid config");

    let err = prepare_input(StandardCase::Uniform2d, &config).expect_err("inputs dir must fail");
    assert!(matches!(err, StudyError::Io { ref path, .. } if path == &blocker.join("inputs")));
}

#[cfg(unix)]
#[rstest]
fn unwritable_input_is_a_generation_error(workspace: Workspace) {
    let inputs_dir = workspace.config.inputs_dir();
    fs::create_dir_all(inputs_dir).expect("inputs dir");
    let input = workspace.config.input_path(StandardCase::Uniform3d);
    std::os::unix::fs::symlink(inputs_dir.join("missing").join("graph.txt"), &input)
        .expect("dangling link");

    let err = prepare_input(StandardCase::Uniform3d, &workspace.config)
        .expect_err("dangling input must fail");
    assert!(matches!(
        err,
        StudyError::Generation(GenerationError::Io { ref path, .. }) if path == &input
    ));
    assert_eq!(err.code().as_str(), "STUDY_GENERATION");
}
