//! Stable error codes.

use std::{io, path::PathBuf};

use gridsweep_core::{
    Cell, ConfigError, ConfigErrorCode, GenerationError, GridSpec, InvocationError,
    InvocationErrorCode, ReportError, ReportErrorCode, StudyError, StudyErrorCode,
};
use rstest::rstest;

fn io_error() -> io::Error {
    io::Error::new(io::ErrorKind::PermissionDenied, "denied")
}

#[rstest]
#[case(GenerationError::ZeroExtent { axis: "y" }, "GENERATION_ZERO_EXTENT")]
#[case(
    GenerationError::SourceOutOfBounds {
        vertex: Cell::planar(3, 0),
        grid: GridSpec::two_d(3, 3).expect("valid grid"),
    },
    "GENERATION_SOURCE_OUT_OF_BOUNDS",
)]
#[case(GenerationError::InvalidWeight { parameter: "lo" }, "GENERATION_INVALID_WEIGHT")]
#[case(GenerationError::EmptyWeightRange { lo: 2.0, hi: 2.0 }, "GENERATION_EMPTY_WEIGHT_RANGE")]
#[case(
    GenerationError::Io { path: PathBuf::from("graph.txt"), source: io_error() },
    "GENERATION_IO",
)]
fn generation_codes_are_stable(#[case] error: GenerationError, #[case] code: &str) {
    assert_eq!(error.code().as_str(), code);
    assert_eq!(error.code().to_string(), code);
}

#[rstest]
#[case(InvocationError::MissingIterations { threads: 4 }, InvocationErrorCode::MissingIterations)]
#[case(
    InvocationError::MalformedLog { path: PathBuf::from("logs.txt"), line: "x".to_owned() },
    InvocationErrorCode::MalformedLog,
)]
#[case(
    InvocationError::StaleLog { path: PathBuf::from("logs.txt"), source: io_error() },
    InvocationErrorCode::StaleLog,
)]
fn invocation_codes_match_variants(#[case] error: InvocationError, #[case] code: InvocationErrorCode) {
    assert_eq!(error.code(), code);
}

#[rstest]
fn study_errors_wrap_stage_errors() {
    let generation: StudyError = GenerationError::ZeroExtent { axis: "x" }.into();
    assert_eq!(generation.code(), StudyErrorCode::Generation);

    let invocation: StudyError = InvocationError::MissingIterations { threads: 2 }.into();
    assert_eq!(invocation.code(), StudyErrorCode::Invocation);
    assert_eq!(
        invocation.to_string(),
        "parallel run with 2 threads reported no iteration count"
    );

    let report: StudyError = ReportError::EmptySeries {
        prefix: "2d_uniform".to_owned(),
    }
    .into();
    assert_eq!(report.code(), StudyErrorCode::Report);
}

#[rstest]
fn config_codes_are_stable() {
    let error = ConfigError::ZeroMaxThreads { got: 0 };
    assert_eq!(error.code(), ConfigErrorCode::ZeroMaxThreads);
    assert_eq!(error.code().as_str(), "CONFIG_ZERO_MAX_THREADS");
    assert_eq!(error.to_string(), "max_threads must be at least 1 (got 0)");
}

#[rstest]
fn report_codes_are_stable() {
    let error = ReportError::Draw {
        path: PathBuf::from("chart.svg"),
        message: "backend failed".to_owned(),
    };
    assert_eq!(error.code(), ReportErrorCode::Draw);
    assert_eq!(
        error.to_string(),
        "failed to draw chart `chart.svg`: backend failed"
    );
}
