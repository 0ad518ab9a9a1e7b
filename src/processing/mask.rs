//! # TRA Mask Builder
//!
//! Extraction usually runs in a different process from embedding and cannot
//! see the embedder's running counter. The mask re-derives it: given only the
//! cover and a bit budget `n`, it marks the first `n` eligible pixels in
//! column-major order, which are exactly the pixels the embedder touched.

use log::debug;

use crate::common::error::{Result, StegoError};
use crate::processing::eligibility::eligible;
use crate::processing::matrix::IntensityMatrix;

/// One flag per pixel, true where a bit was (or would be) embedded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EligibilityMask {
    height: usize,
    width: usize,
    /// Flags in column-major order.
    flags: Vec<bool>,
}

impl EligibilityMask {
    /// Wrap precomputed flags (column-major).
    ///
    /// # Errors
    /// [`StegoError::MaskLength`] if `flags.len() != height * width`.
    pub fn from_column_major(height: usize, width: usize, flags: Vec<bool>) -> Result<Self> {
        if flags.len() != height * width {
            return Err(StegoError::MaskLength {
                expected: height * width,
                actual: flags.len(),
            });
        }
        Ok(Self {
            height,
            width,
            flags,
        })
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn as_column_major(&self) -> &[bool] {
        &self.flags
    }

    pub fn is_marked(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width && self.flags[col * self.height + row]
    }

    /// Number of marked positions.
    pub fn marked_count(&self) -> usize {
        self.flags.iter().filter(|&&flag| flag).count()
    }

    /// Column-major indices of the marked positions, in scan order.
    pub fn marked_positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.flags
            .iter()
            .enumerate()
            .filter_map(|(index, &flag)| flag.then_some(index))
    }

    pub(crate) fn ensure_covers(&self, matrix: &IntensityMatrix) -> Result<()> {
        if self.shape() != matrix.shape() {
            return Err(StegoError::ShapeMismatch {
                expected: matrix.shape(),
                actual: self.shape(),
            });
        }
        Ok(())
    }
}

/// Mark the first `n` eligible pixels of `cover` in column-major order.
///
/// Marks `min(n, capacity)` positions; later eligible pixels stay unmarked.
pub fn build_eligibility_mask(cover: &IntensityMatrix, n: usize) -> EligibilityMask {
    let mut marked = 0usize;
    let flags: Vec<bool> = cover
        .as_column_major()
        .iter()
        .map(|&pixel| {
            if eligible(pixel) && marked < n {
                marked += 1;
                true
            } else {
                false
            }
        })
        .collect();

    debug!(
        "TRA mask: {} of {} requested positions marked",
        marked, n
    );

    EligibilityMask {
        height: cover.height(),
        width: cover.width(),
        flags,
    }
}
