//! The four standard scaling studies.

use std::fmt;

use super::{Cell, Dimensionality, EdgeWeightPolicy, GridSpec};

const PLANAR_EXTENT: usize = 1_000;
const VOLUME_EXTENT: usize = 50;
const UNIFORM_WEIGHT: f64 = 1.0;
const RANDOM_RANGE: (f64, f64) = (1.0, 10.0);

/// One of the canonical (dimensionality x weight policy) study inputs.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StandardCase {
    /// 1000 x 1000 grid, every weight 1.0, source at the corner.
    Uniform2d,
    /// 1000 x 1000 grid, weights in `[1.0, 10.0)`, source at the centre.
    Random2d,
    /// 50 x 50 x 50 grid, every weight 1.0, source at the corner.
    Uniform3d,
    /// 50 x 50 x 50 grid, weights in `[1.0, 10.0)`, source at the centre.
    Random3d,
}

impl StandardCase {
    /// Every case in the order studies are run.
    pub const ALL: [Self; 4] = [
        Self::Uniform2d,
        Self::Random2d,
        Self::Uniform3d,
        Self::Random3d,
    ];

    /// Human-readable title used in progress logs.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Uniform2d => "2D UNIFORM WEIGHTS",
            Self::Random2d => "2D RANDOM WEIGHTS",
            Self::Uniform3d => "3D UNIFORM WEIGHTS",
            Self::Random3d => "3D RANDOM WEIGHTS",
        }
    }

    /// Prefix of the chart file names.
    #[must_use]
    pub const fn chart_prefix(self) -> &'static str {
        match self {
            Self::Uniform2d => "2d_uniform",
            Self::Random2d => "2d_random",
            Self::Uniform3d => "3d_uniform",
            Self::Random3d => "3d_random",
        }
    }

    /// File name of the generated input graph.
    #[must_use]
    pub const fn input_file_name(self) -> &'static str {
        match self {
            Self::Uniform2d => "input_2d_uniform.txt",
            Self::Random2d => "input_2d_random.txt",
            Self::Uniform3d => "input_3d_uniform.txt",
            Self::Random3d => "input_3d_random.txt",
        }
    }

    /// Grid the case is generated on.
    #[must_use]
    pub const fn grid(self) -> GridSpec {
        match self {
            Self::Uniform2d | Self::Random2d => {
                GridSpec::new_unchecked(PLANAR_EXTENT, PLANAR_EXTENT, 1, Dimensionality::TwoD)
            }
            Self::Uniform3d | Self::Random3d => GridSpec::new_unchecked(
                VOLUME_EXTENT,
                VOLUME_EXTENT,
                VOLUME_EXTENT,
                Dimensionality::ThreeD,
            ),
        }
    }

    /// SSSP source vertex.
    #[must_use]
    pub const fn source(self) -> Cell {
        match self {
            Self::Uniform2d => Cell::planar(0, 0),
            Self::Random2d => Cell::planar(500, 500),
            Self::Uniform3d => Cell::new(0, 0, 0),
            Self::Random3d => Cell::new(25, 25, 25),
        }
    }

    /// Weight policy, seeding random cases with `seed`.
    #[must_use]
    pub const fn policy(self, seed: u64) -> EdgeWeightPolicy {
        match self {
            Self::Uniform2d | Self::Uniform3d => EdgeWeightPolicy::Uniform(UNIFORM_WEIGHT),
            Self::Random2d | Self::Random3d => EdgeWeightPolicy::Random {
                lo: RANDOM_RANGE.0,
                hi: RANDOM_RANGE.1,
                seed,
            },
        }
    }

    /// Looks a case up by its chart prefix (`2d_uniform`, ...).
    #[must_use]
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|case| case.chart_prefix() == prefix)
    }
}

impl fmt::Display for StandardCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}
