//! Renderer double recording every request.

use std::{
    path::PathBuf,
    sync::{Arc, Mutex, PoisonError},
};

use gridsweep_core::{RenderedCharts, ReportError, ReportRenderer, ScalingSeries};

/// One request received by a [`RecordingRenderer`].
#[derive(Clone, Debug, PartialEq)]
pub struct RenderRequest {
    /// Chart name prefix.
    pub prefix: String,
    /// Series handed to the renderer.
    pub series: ScalingSeries,
}

/// Records render requests without touching the filesystem.
///
/// Clones share the same request log, so a test can keep one handle while the
/// orchestrator owns another.
#[derive(Clone, Debug, Default)]
pub struct RecordingRenderer {
    requests: Arc<Mutex<Vec<RenderRequest>>>,
}

impl RecordingRenderer {
    /// Returns a snapshot of the requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RenderRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ReportRenderer for RecordingRenderer {
    fn render(
        &self,
        series: &ScalingSeries,
        name_prefix: &str,
    ) -> Result<RenderedCharts, ReportError> {
        if series.is_empty() {
            return Err(ReportError::EmptySeries {
                prefix: name_prefix.to_owned(),
            });
        }
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RenderRequest {
                prefix: name_prefix.to_owned(),
                series: series.clone(),
            });
        Ok(RenderedCharts {
            execution_time: PathBuf::from(format!("{name_prefix}_execution_time_vs_threads.svg")),
            iterations: PathBuf::from(format!("{name_prefix}_iterations_vs_threads.svg")),
        })
    }
}
