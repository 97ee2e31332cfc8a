//! Benchmark parameter types.
//!
//! Each type renders as a compact Criterion benchmark identifier.

use std::fmt;

use gridsweep_core::{Cell, EdgeWeightPolicy, GenerationError, GraphGenerator, GridSpec};

/// Weight policy family exercised by a generation benchmark.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WeightKind {
    /// Constant weight of one.
    Uniform,
    /// Seeded samples from `[1, 10)`.
    Random,
}

/// Parameters for a graph generation benchmark run.
#[derive(Clone, Debug)]
pub struct GenerateBenchParams {
    /// Grid extents; a zero `z` selects a planar grid.
    pub extents: [usize; 3],
    /// Weight policy family.
    pub weights: WeightKind,
    /// Seed for random weights.
    pub seed: u64,
}

impl GenerateBenchParams {
    /// Builds the generator these parameters describe, rooted at the origin.
    ///
    /// # Errors
    /// Returns [`GenerationError`] for zero extents.
    pub fn generator(&self) -> Result<GraphGenerator, GenerationError> {
        let [x, y, z] = self.extents;
        let grid = if z == 0 {
            GridSpec::two_d(x, y)?
        } else {
            GridSpec::three_d(x, y, z)?
        };
        let policy = match self.weights {
            WeightKind::Uniform => EdgeWeightPolicy::Uniform(1.0),
            WeightKind::Random => EdgeWeightPolicy::Random {
                lo: 1.0,
                hi: 10.0,
                seed: self.seed,
            },
        };
        GraphGenerator::new(grid, policy, Cell::new(0, 0, 0))
    }
}

impl fmt::Display for GenerateBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z] = self.extents;
        let weights = match self.weights {
            WeightKind::Uniform => "uniform",
            WeightKind::Random => "random",
        };
        if z == 0 {
            write!(f, "{x}x{y},{weights}")
        } else {
            write!(f, "{x}x{y}x{z},{weights}")
        }
    }
}

/// Parameters for a canonicalisation benchmark run.
#[derive(Clone, Debug)]
pub struct CanonicalBenchParams {
    /// Number of distance records in the synthetic output.
    pub record_count: usize,
}

impl fmt::Display for CanonicalBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={}", self.record_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case([4, 5, 0], WeightKind::Uniform, "4x5,uniform")]
    #[case([2, 3, 4], WeightKind::Random, "2x3x4,random")]
    fn params_render_as_identifiers(
        #[case] extents: [usize; 3],
        #[case] weights: WeightKind,
        #[case] expected: &str,
    ) {
        let params = GenerateBenchParams {
            extents,
            weights,
            seed: 1,
        };
        assert_eq!(params.to_string(), expected);
    }

    #[rstest]
    fn generator_matches_the_extents() {
        let params = GenerateBenchParams {
            extents: [3, 3, 0],
            weights: WeightKind::Random,
            seed: 9,
        };
        let generator = params.generator().expect("valid grid");
        assert_eq!(generator.grid().cell_count(), 9);
    }

    #[rstest]
    fn zero_extent_is_rejected() {
        let params = GenerateBenchParams {
            extents: [0, 3, 0],
            weights: WeightKind::Uniform,
            seed: 1,
        };
        assert!(params.generator().is_err());
    }
}
