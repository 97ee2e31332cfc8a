//! Synthetic solver output for canonicalisation benchmarks.
//!
//! Records follow the solver's `x y distance` layout and are shuffled with a
//! seeded RNG so each benchmark run sorts the same permutation.

use rand::{Rng, SeedableRng, rngs::SmallRng, seq::SliceRandom};

/// Errors raised while building synthetic records.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum RecordsError {
    /// The requested record count was zero.
    #[error("record count must be greater than zero")]
    ZeroRecords,
}

/// Builds `count` distinct records of a square-ish planar grid in shuffled
/// order, joined into one newline-terminated text block.
///
/// # Errors
/// Returns [`RecordsError::ZeroRecords`] if `count` is zero.
///
/// # Examples
/// ```
/// use gridsweep_benches::records::shuffled_output;
///
/// let text = shuffled_output(4, 7).expect("non-zero count");
/// assert_eq!(text.lines().count(), 4);
/// ```
pub fn shuffled_output(count: usize, seed: u64) -> Result<String, RecordsError> {
    if count == 0 {
        return Err(RecordsError::ZeroRecords);
    }
    let width = count.isqrt().max(1);
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut records: Vec<String> = (0..count)
        .map(|index| {
            let x = index.checked_rem(width).unwrap_or(0);
            let y = index.checked_div(width).unwrap_or(0);
            let distance: u32 = rng.gen_range(0..1_000);
            format!("{x} {y} {distance}")
        })
        .collect();
    records.shuffle(&mut rng);

    let mut text = records.join("\n");
    text.push('\n');
    Ok(text)
}
