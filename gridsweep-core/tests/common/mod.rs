//! Fixtures shared by the integration tests.

use gridsweep_core::{HarnessConfig, StandardCase, StudyPlan};
use tempfile::TempDir;

/// Temporary harness layout. The directory lives as long as the value.
pub struct Workspace {
    pub dir: TempDir,
    pub config: HarnessConfig,
}

impl Workspace {
    pub fn new(max_threads: usize) -> Self {
        let dir = TempDir::new().expect("temp dir");
        let config = HarnessConfig::builder()
            .with_outputs_dir(dir.path().join("outputs"))
            .with_charts_dir(dir.path().join("graphs"))
            .with_inputs_dir(dir.path().join("tests"))
            .with_max_threads(max_threads)
            .build()
            .expect("valid config");
        Self { dir, config }
    }

    pub fn plan(&self, case: StandardCase) -> StudyPlan {
        StudyPlan::for_case(case, &self.config)
    }
}
