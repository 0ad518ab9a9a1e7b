//! # Extractor
//!
//! Non-blind recovery: with the original cover at hand, recompute the per-pixel
//! references from the **cover** and read one bit from every masked stego pixel.
//!
//! For a masked pixel with stego value `s` and reference `avg`:
//! - `bit = (s - avg) mod 2`
//! - reconstructed cover pixel `= floor((s + avg - bit) / 2)`
//!
//! Unmasked pixels are copied from the stego image. When the embedder did not
//! clip a pixel, both the bit and the original intensity come back exactly.
//! A pixel that saturated during embedding is recovered as-is, without any
//! attempt to repair it.

use log::debug;

use crate::common::error::Result;
use crate::processing::bins::PerPixelReference;
use crate::processing::eligibility::capacity;
use crate::processing::mask::{build_eligibility_mask, EligibilityMask};
use crate::processing::matrix::{BitSequence, IntensityMatrix};

/// Precomputed inputs a caller may already hold.
///
/// Anything left as `None` is derived from the cover.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions<'a> {
    /// Per-pixel references (column-major), normally from the cover.
    pub reference: Option<&'a PerPixelReference>,
    /// Positions carrying bits.
    pub mask: Option<&'a EligibilityMask>,
}

/// Recovered bits and the approximate cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractResult {
    pub bits: BitSequence,
    pub reconstructed: IntensityMatrix,
}

/// Extract up to `n_request` bits, deriving references and mask from `cover`.
///
/// # Errors
/// [`StegoError::ShapeMismatch`](crate::StegoError::ShapeMismatch) if cover and stego
/// differ in shape.
pub fn extract(
    cover: &IntensityMatrix,
    stego: &IntensityMatrix,
    n_request: usize,
) -> Result<ExtractResult> {
    extract_with(cover, stego, n_request, ExtractOptions::default())
}

/// Extract with optional precomputed references and mask.
///
/// At most `min(n_request, capacity)` bits are read, in mask order.
///
/// # Errors
/// - [`StegoError::ShapeMismatch`](crate::StegoError::ShapeMismatch) for cover/stego or
///   mask shape differences.
/// - [`StegoError::ReferenceLength`](crate::StegoError::ReferenceLength) for a reference of the
///   wrong length.
pub fn extract_with(
    cover: &IntensityMatrix,
    stego: &IntensityMatrix,
    n_request: usize,
    options: ExtractOptions<'_>,
) -> Result<ExtractResult> {
    cover.ensure_same_shape(stego)?;
    if let Some(reference) = options.reference {
        reference.ensure_covers(cover)?;
    }
    if let Some(mask) = options.mask {
        mask.ensure_covers(cover)?;
    }

    let used_len = n_request.min(capacity(cover));

    let derived_reference;
    let reference = match options.reference {
        Some(reference) => reference,
        None => {
            derived_reference = PerPixelReference::compute(cover);
            &derived_reference
        }
    };

    let derived_mask;
    let mask = match options.mask {
        Some(mask) => mask,
        None => {
            derived_mask = build_eligibility_mask(cover, used_len);
            &derived_mask
        }
    };

    let mut bits = Vec::with_capacity(used_len);
    let reconstructed: Vec<u8> = stego
        .as_column_major()
        .iter()
        .zip(reference.as_slice())
        .zip(mask.as_column_major())
        .map(|((&s, &avg), &marked)| {
            if !marked || bits.len() >= used_len {
                return s;
            }
            let s = i32::from(s);
            let avg = i32::from(avg);
            let bit = (s - avg).rem_euclid(2);
            bits.push(bit as u8);
            (s + avg - bit).div_euclid(2).clamp(0, 255) as u8
        })
        .collect();

    debug!(
        "Extracted {} bits ({} requested, {} usable)",
        bits.len(),
        n_request,
        used_len
    );

    Ok(ExtractResult {
        bits: BitSequence::new(bits),
        reconstructed: cover.with_pixels(reconstructed),
    })
}
