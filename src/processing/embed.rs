//! # Embedder
//!
//! Hides one bit per eligible pixel by pushing the pixel away from its bin
//! average: a pixel `p` with reference `avg` becomes `2p - avg + bit`.
//!
//! ## Algorithm
//! 1. Compute the bin table of the cover and expand it per pixel.
//! 2. Walk the cover in column-major order with a counter starting at 0.
//! 3. For each eligible pixel, while bits remain, write `2p - avg + b[cnt]`
//!    and advance the counter. Every other pixel is copied.
//! 4. Clip the result to [0, 255].
//!
//! With references taken from the cover itself the result never leaves
//! [1, 254]: an eligible pixel sits at most 4 levels from its bin average.
//! Externally supplied references can saturate; those pixels are clipped and
//! their bit is not guaranteed to survive extraction.

use log::{debug, warn};

use crate::common::error::Result;
use crate::processing::bins::PerPixelReference;
use crate::processing::eligibility::eligible;
use crate::processing::matrix::{BitSequence, IntensityMatrix};
use crate::processing::quality::QualityReport;

/// Output of one embedding run.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbedResult {
    pub stego: IntensityMatrix,
    /// Bits actually written: `min(bits.len(), capacity)`.
    pub bits_used: usize,
    pub psnr: f64,
    pub mse: f64,
    /// `NaN` for covers smaller than the SSIM window.
    pub ssim: f64,
}

impl EmbedResult {
    pub fn quality(&self) -> QualityReport {
        QualityReport {
            mse: self.mse,
            psnr: self.psnr,
            ssim: self.ssim,
        }
    }
}

/// Embed `bits` into `cover` using references derived from the cover.
pub fn embed(cover: &IntensityMatrix, bits: &BitSequence) -> EmbedResult {
    let reference = PerPixelReference::compute(cover);
    embed_checked(cover, bits, &reference)
}

/// Embed with caller-supplied per-pixel references (column-major).
///
/// # Errors
/// [`StegoError::ReferenceLength`](crate::StegoError::ReferenceLength) if `reference`
/// does not hold one value per cover pixel.
pub fn embed_with_reference(
    cover: &IntensityMatrix,
    bits: &BitSequence,
    reference: &PerPixelReference,
) -> Result<EmbedResult> {
    reference.ensure_covers(cover)?;
    Ok(embed_checked(cover, bits, reference))
}

fn embed_checked(
    cover: &IntensityMatrix,
    bits: &BitSequence,
    reference: &PerPixelReference,
) -> EmbedResult {
    let bits = bits.as_slice();
    let mut cnt = 0usize;
    let mut saturated = 0usize;

    let stego_pixels: Vec<u8> = cover
        .as_column_major()
        .iter()
        .zip(reference.as_slice())
        .map(|(&p, &avg)| {
            if !eligible(p) || cnt >= bits.len() {
                return p;
            }
            let d = i32::from(p) - i32::from(avg);
            let value = i32::from(p) + d + i32::from(bits[cnt]);
            cnt += 1;
            if !(0..=255).contains(&value) {
                saturated += 1;
            }
            value.clamp(0, 255) as u8
        })
        .collect();

    if saturated > 0 {
        warn!(
            "{} embedded pixel(s) saturated and were clipped; their bits may not be recoverable",
            saturated
        );
    }

    let stego = cover.with_pixels(stego_pixels);
    let quality = QualityReport::measure(cover, &stego);

    debug!(
        "Embedded {} of {} bits into {}x{} cover (MSE {:.6})",
        cnt,
        bits.len(),
        cover.height(),
        cover.width(),
        quality.mse
    );

    EmbedResult {
        stego,
        bits_used: cnt,
        psnr: quality.psnr,
        mse: quality.mse,
        ssim: quality.ssim,
    }
}
