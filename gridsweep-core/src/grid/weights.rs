//! Edge weight policies and their samplers.

use std::{fmt, ops::Range};

use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::error::GenerationError;

/// Smallest weight that stays positive once serialised with two decimals.
pub const MIN_WEIGHT: f64 = 0.01;

/// How the generator weights each directed edge.
///
/// # Examples
/// ```
/// use gridsweep_core::EdgeWeightPolicy;
///
/// let policy = EdgeWeightPolicy::Random { lo: 1.0, hi: 10.0, seed: 1 };
/// policy.validate().expect("range is valid");
/// let mut sampler = policy.sampler();
/// let weight = sampler.next_weight();
/// assert!((1.0..10.0).contains(&weight));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EdgeWeightPolicy {
    /// Every edge carries the same weight.
    Uniform(f64),
    /// Each directed edge draws an independent sample from `[lo, hi)`.
    Random {
        /// Inclusive lower bound.
        lo: f64,
        /// Exclusive upper bound.
        hi: f64,
        /// Seed making the sample stream reproducible.
        seed: u64,
    },
}

impl EdgeWeightPolicy {
    /// Checks that every weight this policy can produce is positive.
    ///
    /// # Errors
    /// Returns [`GenerationError::InvalidWeight`] for non-finite parameters or
    /// values below [`MIN_WEIGHT`], and [`GenerationError::EmptyWeightRange`]
    /// when `lo >= hi`.
    pub fn validate(&self) -> Result<(), GenerationError> {
        match *self {
            Self::Uniform(weight) => check_weight(weight, "uniform"),
            Self::Random { lo, hi, .. } => {
                check_weight(lo, "random.lo")?;
                check_weight(hi, "random.hi")?;
                if lo >= hi {
                    return Err(GenerationError::EmptyWeightRange { lo, hi });
                }
                Ok(())
            }
        }
    }

    /// Starts a fresh sample stream. Two samplers from the same policy yield
    /// identical sequences.
    #[must_use]
    pub fn sampler(&self) -> WeightSampler {
        match *self {
            Self::Uniform(weight) => WeightSampler::Constant(weight),
            Self::Random { lo, hi, seed } => WeightSampler::Random {
                rng: SmallRng::seed_from_u64(seed),
                range: lo..hi,
            },
        }
    }
}

impl fmt::Display for EdgeWeightPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uniform(weight) => write!(f, "uniform {weight:.2}"),
            Self::Random { lo, hi, seed } => write!(f, "random [{lo:.2}, {hi:.2}) seed={seed}"),
        }
    }
}

fn check_weight(value: f64, parameter: &'static str) -> Result<(), GenerationError> {
    if value.is_finite() && value >= MIN_WEIGHT {
        Ok(())
    } else {
        Err(GenerationError::InvalidWeight { parameter })
    }
}

/// Stream of edge weights drawn from an [`EdgeWeightPolicy`].
#[derive(Clone, Debug)]
pub enum WeightSampler {
    /// Always yields the same weight.
    Constant(f64),
    /// Yields seeded uniform samples.
    Random {
        /// Seeded generator.
        rng: SmallRng,
        /// Half-open sampling range.
        range: Range<f64>,
    },
}

impl WeightSampler {
    /// Draws the weight for the next directed edge.
    pub fn next_weight(&mut self) -> f64 {
        match self {
            Self::Constant(weight) => *weight,
            Self::Random { rng, range } => rng.gen_range(range.clone()),
        }
    }
}
