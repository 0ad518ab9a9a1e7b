//! # Error Types
//!
//! [`StegoError`] covers every way a core or collaborator call can refuse to run.
//! Core operations validate their preconditions before touching any output
//! buffer, so an error never comes with a partial result.

use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, StegoError>;

/// Errors reported by the embedding core and its I/O collaborators.
#[derive(Debug, Error)]
pub enum StegoError {
    /// Two matrices (or a matrix and a mask) that must share a shape do not.
    #[error("shape mismatch: expected {}x{}, got {}x{}", expected.0, expected.1, actual.0, actual.1)]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// An input intensity falls outside [0, 255].
    #[error("intensity {value} at row {row}, column {col} is outside [0, 255]")]
    InvalidIntensity { row: usize, col: usize, value: i64 },

    /// A flat pixel buffer (or a matrix row) has the wrong number of values.
    #[error("pixel buffer holds {actual} values, expected {expected}")]
    BufferLength { expected: usize, actual: usize },

    /// A precomputed mask does not hold one flag per pixel.
    #[error("mask holds {actual} flags, expected {expected}")]
    MaskLength { expected: usize, actual: usize },

    /// A per-pixel reference array does not hold one value per pixel.
    #[error("reference array holds {actual} values, expected {expected}")]
    ReferenceLength { expected: usize, actual: usize },

    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_mismatch_message_names_both_shapes() {
        let err = StegoError::ShapeMismatch {
            expected: (2, 3),
            actual: (3, 2),
        };
        assert_eq!(err.to_string(), "shape mismatch: expected 2x3, got 3x2");
    }

    #[test]
    fn reference_and_mask_lengths_are_told_apart() {
        let reference = StegoError::ReferenceLength {
            expected: 4,
            actual: 5,
        };
        assert_eq!(
            reference.to_string(),
            "reference array holds 5 values, expected 4"
        );
        let mask = StegoError::MaskLength {
            expected: 4,
            actual: 3,
        };
        assert_eq!(mask.to_string(), "mask holds 3 flags, expected 4");
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: StegoError = io.into();
        assert!(matches!(err, StegoError::Io(_)));
    }
}
