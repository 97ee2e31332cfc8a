//! Per-thread-count measurements gathered during a sweep.

use std::time::Duration;

use crate::error::StudyError;

/// Measurements from one verified parallel run.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SeriesPoint {
    /// Thread count the solver ran with.
    pub threads: usize,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
    /// Relaxation rounds until convergence.
    pub iterations: u64,
}

/// Points ordered by strictly increasing thread count.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use gridsweep_core::{ScalingSeries, SeriesPoint};
///
/// let mut series = ScalingSeries::new();
/// series
///     .push(SeriesPoint { threads: 1, elapsed: Duration::from_millis(900), iterations: 12 })
///     .expect("first point");
/// series
///     .push(SeriesPoint { threads: 2, elapsed: Duration::from_millis(500), iterations: 12 })
///     .expect("increasing thread count");
/// assert!(series
///     .push(SeriesPoint { threads: 2, elapsed: Duration::ZERO, iterations: 0 })
///     .is_err());
/// assert_eq!(series.thread_counts().collect::<Vec<_>>(), vec![1, 2]);
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ScalingSeries {
    points: Vec<SeriesPoint>,
}

impl ScalingSeries {
    /// Creates an empty series.
    #[must_use]
    pub const fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Appends a point.
    ///
    /// # Errors
    /// Returns [`StudyError::NonIncreasingThreads`] when `point.threads` does
    /// not exceed the last recorded thread count.
    pub fn push(&mut self, point: SeriesPoint) -> Result<(), StudyError> {
        if let Some(last) = self.points.last() {
            if point.threads <= last.threads {
                return Err(StudyError::NonIncreasingThreads {
                    previous: last.threads,
                    next: point.threads,
                });
            }
        }
        self.points.push(point);
        Ok(())
    }

    /// Returns the recorded points.
    #[must_use]
    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    /// Number of recorded points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` when nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Thread counts in recording order.
    pub fn thread_counts(&self) -> impl Iterator<Item = usize> + '_ {
        self.points.iter().map(|point| point.threads)
    }

    /// `(threads, seconds)` pairs for the execution time chart.
    #[expect(
        clippy::cast_precision_loss,
        reason = "thread counts are tiny and only used as chart coordinates"
    )]
    pub fn execution_times(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points
            .iter()
            .map(|point| (point.threads as f64, point.elapsed.as_secs_f64()))
    }

    /// `(threads, iterations)` pairs for the iteration chart.
    #[expect(
        clippy::cast_precision_loss,
        reason = "thread and iteration counts are only used as chart coordinates"
    )]
    pub fn iteration_counts(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points
            .iter()
            .map(|point| (point.threads as f64, point.iterations as f64))
    }
}
