//! Which intensities may carry a bit.
//!
//! The embedding step roughly doubles a pixel's distance from its bin average,
//! so the darkest and brightest levels are left alone. Embedder, mask builder
//! and extractor all call [`eligible`]; they must agree or bit positions drift.

use crate::processing::matrix::IntensityMatrix;

/// Lowest intensity that can carry a bit.
pub const MIN_ELIGIBLE: u8 = 5;

/// Highest intensity that can carry a bit.
pub const MAX_ELIGIBLE: u8 = 249;

/// `true` for intensities in 5..=249.
pub fn eligible(value: u8) -> bool {
    (MIN_ELIGIBLE..=MAX_ELIGIBLE).contains(&value)
}

/// Number of eligible pixels in `cover`, the upper bound on embeddable bits.
pub fn capacity(cover: &IntensityMatrix) -> usize {
    cover
        .as_column_major()
        .iter()
        .filter(|&&pixel| eligible(pixel))
        .count()
}
