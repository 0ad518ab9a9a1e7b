//! # Intensity Matrices and Bit Sequences
//!
//! The two value types every other processing module consumes.
//!
//! [`IntensityMatrix`] stores its pixels in **column-major** order (down each
//! column, then left to right). That order decides which pixel receives the
//! k-th bit, so embedding, mask building and extraction all walk
//! [`IntensityMatrix::as_column_major`] directly instead of re-deriving the
//! traversal.

use serde::{Deserialize, Serialize};

use crate::common::error::{Result, StegoError};

/// A single-channel H×W grid of 8-bit intensities.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IntensityMatrix {
    height: usize,
    width: usize,
    /// Pixels in column-major order: index = col * height + row.
    data: Vec<u8>,
}

impl IntensityMatrix {
    /// Wrap a buffer that is already in column-major order.
    ///
    /// # Errors
    /// [`StegoError::BufferLength`] if `data.len() != height * width`.
    pub fn from_column_major(height: usize, width: usize, data: Vec<u8>) -> Result<Self> {
        let expected = height * width;
        if data.len() != expected {
            return Err(StegoError::BufferLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            height,
            width,
            data,
        })
    }

    /// Build a matrix from a row-major buffer, the layout image decoders produce.
    ///
    /// # Errors
    /// [`StegoError::BufferLength`] if `data.len() != height * width`.
    pub fn from_row_major(height: usize, width: usize, data: &[u8]) -> Result<Self> {
        let expected = height * width;
        if data.len() != expected {
            return Err(StegoError::BufferLength {
                expected,
                actual: data.len(),
            });
        }

        let mut column_major = Vec::with_capacity(expected);
        for col in 0..width {
            for row in 0..height {
                column_major.push(data[row * width + col]);
            }
        }
        Ok(Self {
            height,
            width,
            data: column_major,
        })
    }

    /// Build a matrix from rows of wide integers, rejecting anything outside [0, 255].
    ///
    /// All rows must have the same length; an empty slice yields a 0×0 matrix.
    ///
    /// # Errors
    /// - [`StegoError::BufferLength`] for a ragged row.
    /// - [`StegoError::InvalidIntensity`] for the first out-of-range value.
    pub fn from_rows<R: AsRef<[i64]>>(rows: &[R]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.as_ref().len());

        let mut row_major = Vec::with_capacity(height * width);
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != width {
                return Err(StegoError::BufferLength {
                    expected: width,
                    actual: values.len(),
                });
            }
            for (col, &value) in values.iter().enumerate() {
                let pixel = u8::try_from(value)
                    .map_err(|_| StegoError::InvalidIntensity { row, col, value })?;
                row_major.push(pixel);
            }
        }

        Self::from_row_major(height, width, &row_major)
    }

    /// A matrix of this shape holding `data` (column-major).
    pub(crate) fn with_pixels(&self, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), self.data.len());
        Self {
            height: self.height,
            width: self.width,
            data,
        }
    }

    /// A matrix with every pixel set to `value`.
    pub fn filled(height: usize, width: usize, value: u8) -> Self {
        Self {
            height,
            width,
            data: vec![value; height * width],
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// `(height, width)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Number of pixels.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Pixel at `(row, col)`, or `None` outside the matrix.
    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        if row >= self.height || col >= self.width {
            return None;
        }
        Some(self.data[col * self.height + row])
    }

    /// The pixels in scan order.
    pub fn as_column_major(&self) -> &[u8] {
        &self.data
    }

    /// Copy the pixels out in row-major order for image encoders.
    pub fn to_row_major(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len());
        for row in 0..self.height {
            for col in 0..self.width {
                out.push(self.data[col * self.height + row]);
            }
        }
        out
    }

    /// Fail with [`StegoError::ShapeMismatch`] unless `other` has this matrix's shape.
    pub fn ensure_same_shape(&self, other: &IntensityMatrix) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(StegoError::ShapeMismatch {
                expected: self.shape(),
                actual: other.shape(),
            });
        }
        Ok(())
    }
}

/// An ordered sequence of 0/1 values to hide or that was recovered.
///
/// Callers often hold bits as real numbers (read from text files); those are
/// normalized on the way in by rounding half-to-even and taking the result
/// modulo 2, so every stored value is exactly 0 or 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BitSequence(Vec<u8>);

impl BitSequence {
    /// Build from integer bits; any odd value counts as 1.
    pub fn new(bits: Vec<u8>) -> Self {
        Self(bits.into_iter().map(|b| b & 1).collect())
    }

    /// Build from real-valued bits. Non-finite values become 0.
    pub fn from_values(values: &[f64]) -> Self {
        Self(values.iter().map(|&v| normalize_bit(v)).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }

    /// The first `n` bits (all of them when `n >= len`).
    pub fn prefix(&self, n: usize) -> BitSequence {
        Self(self.0[..n.min(self.0.len())].to_vec())
    }

    /// Render as a contiguous string of '0' and '1'.
    pub fn to_bit_string(&self) -> String {
        self.0
            .iter()
            .map(|&b| if b == 1 { '1' } else { '0' })
            .collect()
    }
}

impl FromIterator<u8> for BitSequence {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl From<Vec<u8>> for BitSequence {
    fn from(bits: Vec<u8>) -> Self {
        Self::new(bits)
    }
}

fn normalize_bit(value: f64) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    value.round_ties_even().rem_euclid(2.0) as u8
}
