//! Scaling charts rendered from a completed study.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use plotters::prelude::*;
use tracing::{info, instrument};

use crate::{error::ReportError, study::ScalingSeries};

const CHART_SIZE: (u32, u32) = (1000, 600);
const THREADS_LABEL: &str = "Number of Threads";
const HEADROOM: f64 = 1.1;

/// Paths of the charts written for one study.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RenderedCharts {
    /// Execution time against thread count.
    pub execution_time: PathBuf,
    /// Iteration count against thread count.
    pub iterations: PathBuf,
}

/// Turns a scaling series into charts.
pub trait ReportRenderer {
    /// Renders `series`, naming the charts after `name_prefix`.
    ///
    /// # Errors
    /// Returns [`ReportError::EmptySeries`] when there is nothing to plot and
    /// [`ReportError::Draw`] when a chart cannot be written.
    fn render(&self, series: &ScalingSeries, name_prefix: &str)
    -> Result<RenderedCharts, ReportError>;
}

impl<R: ReportRenderer + ?Sized> ReportRenderer for &R {
    fn render(
        &self,
        series: &ScalingSeries,
        name_prefix: &str,
    ) -> Result<RenderedCharts, ReportError> {
        (**self).render(series, name_prefix)
    }
}

/// Writes two SVG line charts per study into a directory.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use gridsweep_core::{ReportRenderer, ScalingSeries, SeriesPoint, SvgChartRenderer};
///
/// let dir = tempfile::tempdir()?;
/// let mut series = ScalingSeries::new();
/// series.push(SeriesPoint { threads: 1, elapsed: Duration::from_secs(2), iterations: 40 })?;
/// let charts = SvgChartRenderer::new(dir.path()).render(&series, "2d_uniform")?;
/// assert!(charts.iterations.ends_with("2d_uniform_iterations_vs_threads.svg"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct SvgChartRenderer {
    charts_dir: PathBuf,
}

impl SvgChartRenderer {
    /// Creates a renderer writing into `charts_dir`, created on demand.
    #[must_use]
    pub fn new(charts_dir: impl Into<PathBuf>) -> Self {
        Self {
            charts_dir: charts_dir.into(),
        }
    }

    /// Directory receiving the charts.
    #[must_use]
    pub fn charts_dir(&self) -> &Path {
        &self.charts_dir
    }

    /// Paths the charts for `name_prefix` are written to.
    #[must_use]
    pub fn chart_paths(&self, name_prefix: &str) -> RenderedCharts {
        RenderedCharts {
            execution_time: self
                .charts_dir
                .join(format!("{name_prefix}_execution_time_vs_threads.svg")),
            iterations: self
                .charts_dir
                .join(format!("{name_prefix}_iterations_vs_threads.svg")),
        }
    }
}

impl ReportRenderer for SvgChartRenderer {
    #[instrument(
        name = "report.render",
        err,
        skip(self, series),
        fields(points = series.len(), charts_dir = %self.charts_dir.display()),
    )]
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
        fs::create_dir_all(&self.charts_dir).map_err(|source| ReportError::Io {
            path: self.charts_dir.clone(),
            source,
        })?;

        let charts = self.chart_paths(name_prefix);
        let times: Vec<(f64, f64)> = series.execution_times().collect();
        draw_line_chart(
            &charts.execution_time,
            &ChartLabels {
                title: "Execution Time vs. Number of Threads",
                y_desc: "Execution Time (seconds)",
            },
            &times,
            SeriesStyle {
                color: BLUE,
                marker: Marker::Circle,
            },
        )?;
        let iterations: Vec<(f64, f64)> = series.iteration_counts().collect();
        draw_line_chart(
            &charts.iterations,
            &ChartLabels {
                title: "Iterations vs. Number of Threads",
                y_desc: "Number of Iterations",
            },
            &iterations,
            SeriesStyle {
                color: RED,
                marker: Marker::Cross,
            },
        )?;

        info!(
            execution_time = %charts.execution_time.display(),
            iterations = %charts.iterations.display(),
            "charts written"
        );
        Ok(charts)
    }
}

struct ChartLabels {
    title: &'static str,
    y_desc: &'static str,
}

#[derive(Clone, Copy)]
enum Marker {
    Circle,
    Cross,
}

#[derive(Clone, Copy)]
struct SeriesStyle {
    color: RGBColor,
    marker: Marker,
}

fn draw_error<E: fmt::Display>(path: &Path) -> impl Fn(E) -> ReportError + '_ {
    move |err| ReportError::Draw {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "axis bounds are padded around the plotted values"
)]
fn axis_ranges(points: &[(f64, f64)]) -> (std::ops::Range<f64>, std::ops::Range<f64>) {
    let x_max = points.iter().map(|&(x, _)| x).fold(1.0_f64, f64::max);
    let y_max = points.iter().map(|&(_, y)| y).fold(0.0_f64, f64::max);
    let y_top = if y_max > 0.0 { y_max * HEADROOM } else { 1.0 };
    (0.5..x_max + 0.5, 0.0..y_top)
}

fn draw_line_chart(
    path: &Path,
    labels: &ChartLabels,
    points: &[(f64, f64)],
    style: SeriesStyle,
) -> Result<(), ReportError> {
    let (x_range, y_range) = axis_ranges(points);
    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(draw_error(path))?;
    let mut chart = ChartBuilder::on(&root)
        .caption(labels.title, ("sans-serif", 24))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range, y_range)
        .map_err(draw_error(path))?;

    chart
        .configure_mesh()
        .x_desc(THREADS_LABEL)
        .y_desc(labels.y_desc)
        .x_labels(points.len())
        .draw()
        .map_err(draw_error(path))?;

    chart
        .draw_series(LineSeries::new(points.iter().copied(), style.color))
        .map_err(draw_error(path))?;
    match style.marker {
        Marker::Circle => chart.draw_series(
            points
                .iter()
                .map(|&point| Circle::new(point, 4, style.color.filled())),
        ),
        Marker::Cross => chart.draw_series(
            points
                .iter()
                .map(|&point| Cross::new(point, 5, style.color)),
        ),
    }
    .map_err(draw_error(path))?;

    root.present().map_err(draw_error(path))?;
    Ok(())
}
