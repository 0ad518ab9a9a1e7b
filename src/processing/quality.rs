//! # Quality Metrics
//!
//! MSE, PSNR and SSIM between two same-shaped intensity matrices.
//!
//! These are reporting values, not part of the embed/extract contract, but
//! they are compared against a reference toolkit so the formulas are fixed:
//!
//! - **MSE**: mean of squared pixel differences, in `f64`.
//! - **PSNR**: `10 * log10(255² / MSE)`, `+∞` when MSE is exactly 0.
//! - **SSIM**: Gaussian-weighted windows (σ = 1.5, kernel truncated at 3.5σ,
//!   i.e. 11 taps), half-sample symmetric borders, population (not sample)
//!   covariance, `K1 = 0.01`, `K2 = 0.03`, data range 255. The SSIM map is
//!   averaged after cropping `(11 - 1) / 2 = 5` pixels from every edge.
//!
//! An image smaller than the 11×11 window has no defined SSIM; [`ssim`]
//! returns `NaN` for it.

use serde::Serialize;

use crate::common::error::Result;
use crate::processing::matrix::IntensityMatrix;

/// Peak intensity used by PSNR and SSIM.
pub const DATA_RANGE: f64 = 255.0;

/// SSIM window edge in pixels.
pub const SSIM_WINDOW: usize = 11;

/// Standard deviation of the SSIM Gaussian window.
pub const SSIM_SIGMA: f64 = 1.5;

const SSIM_TRUNCATE: f64 = 3.5;
const SSIM_K1: f64 = 0.01;
const SSIM_K2: f64 = 0.03;

/// MSE, PSNR and SSIM for one image pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QualityReport {
    pub mse: f64,
    pub psnr: f64,
    pub ssim: f64,
}

impl QualityReport {
    /// Measure `test` against `reference`.
    ///
    /// # Errors
    /// [`StegoError::ShapeMismatch`](crate::StegoError::ShapeMismatch) if the shapes differ.
    pub fn compare(reference: &IntensityMatrix, test: &IntensityMatrix) -> Result<Self> {
        reference.ensure_same_shape(test)?;
        Ok(Self::measure(reference, test))
    }

    /// Caller guarantees equal shapes.
    pub(crate) fn measure(reference: &IntensityMatrix, test: &IntensityMatrix) -> Self {
        let mse = mse_unchecked(reference.as_column_major(), test.as_column_major());
        Self {
            mse,
            psnr: psnr_from_mse(mse),
            ssim: ssim_unchecked(reference, test),
        }
    }
}

/// Mean squared difference. An empty pair has an MSE of 0.
pub fn mse(a: &IntensityMatrix, b: &IntensityMatrix) -> Result<f64> {
    a.ensure_same_shape(b)?;
    Ok(mse_unchecked(a.as_column_major(), b.as_column_major()))
}

/// Peak signal-to-noise ratio in dB.
pub fn psnr(a: &IntensityMatrix, b: &IntensityMatrix) -> Result<f64> {
    Ok(psnr_from_mse(mse(a, b)?))
}

/// PSNR for a known MSE; `+∞` when `mse == 0`.
pub fn psnr_from_mse(mse: f64) -> f64 {
    if mse == 0.0 {
        return f64::INFINITY;
    }
    10.0 * ((DATA_RANGE * DATA_RANGE) / mse).log10()
}

/// Mean structural similarity.
pub fn ssim(a: &IntensityMatrix, b: &IntensityMatrix) -> Result<f64> {
    a.ensure_same_shape(b)?;
    Ok(ssim_unchecked(a, b))
}

fn mse_unchecked(a: &[u8], b: &[u8]) -> f64 {
    if a.is_empty() {
        return 0.0;
    }
    let total: f64 = a
        .iter()
        .zip(b)
        .map(|(&x, &y)| {
            let d = f64::from(x) - f64::from(y);
            d * d
        })
        .sum();
    total / a.len() as f64
}

fn ssim_unchecked(a: &IntensityMatrix, b: &IntensityMatrix) -> f64 {
    let (height, width) = a.shape();
    if height < SSIM_WINDOW || width < SSIM_WINDOW {
        return f64::NAN;
    }

    let x: Vec<f64> = a.as_column_major().iter().map(|&v| f64::from(v)).collect();
    let y: Vec<f64> = b.as_column_major().iter().map(|&v| f64::from(v)).collect();
    let xx: Vec<f64> = x.iter().map(|v| v * v).collect();
    let yy: Vec<f64> = y.iter().map(|v| v * v).collect();
    let xy: Vec<f64> = x.iter().zip(&y).map(|(p, q)| p * q).collect();

    let kernel = gaussian_kernel(SSIM_SIGMA, SSIM_TRUNCATE);
    let ux = gaussian_filter(&x, height, width, &kernel);
    let uy = gaussian_filter(&y, height, width, &kernel);
    let uxx = gaussian_filter(&xx, height, width, &kernel);
    let uyy = gaussian_filter(&yy, height, width, &kernel);
    let uxy = gaussian_filter(&xy, height, width, &kernel);

    let c1 = (SSIM_K1 * DATA_RANGE).powi(2);
    let c2 = (SSIM_K2 * DATA_RANGE).powi(2);
    let pad = (SSIM_WINDOW - 1) / 2;

    let mut total = 0.0;
    let mut samples = 0usize;
    for col in pad..width - pad {
        for row in pad..height - pad {
            let i = col * height + row;
            let vx = uxx[i] - ux[i] * ux[i];
            let vy = uyy[i] - uy[i] * uy[i];
            let vxy = uxy[i] - ux[i] * uy[i];

            let a1 = 2.0 * ux[i] * uy[i] + c1;
            let a2 = 2.0 * vxy + c2;
            let b1 = ux[i] * ux[i] + uy[i] * uy[i] + c1;
            let b2 = vx + vy + c2;
            total += (a1 * a2) / (b1 * b2);
            samples += 1;
        }
    }
    total / samples as f64
}

/// Normalized 1-D Gaussian with radius `floor(truncate * sigma + 0.5)`.
fn gaussian_kernel(sigma: f64, truncate: f64) -> Vec<f64> {
    let radius = (truncate * sigma + 0.5) as i64;
    let weights: Vec<f64> = (-radius..=radius)
        .map(|x| (-0.5 * (x * x) as f64 / (sigma * sigma)).exp())
        .collect();
    let sum: f64 = weights.iter().sum();
    weights.into_iter().map(|w| w / sum).collect()
}

/// Separable filter over a column-major image: rows axis first, then columns.
fn gaussian_filter(data: &[f64], height: usize, width: usize, kernel: &[f64]) -> Vec<f64> {
    let radius = (kernel.len() / 2) as isize;

    let mut down = vec![0.0; data.len()];
    for col in 0..width {
        let column = &data[col * height..(col + 1) * height];
        for row in 0..height {
            down[col * height + row] = kernel
                .iter()
                .enumerate()
                .map(|(k, w)| w * column[reflect(row as isize + k as isize - radius, height)])
                .sum();
        }
    }

    let mut across = vec![0.0; data.len()];
    for col in 0..width {
        for row in 0..height {
            across[col * height + row] = kernel
                .iter()
                .enumerate()
                .map(|(k, w)| {
                    let src = reflect(col as isize + k as isize - radius, width);
                    w * down[src * height + row]
                })
                .sum();
        }
    }
    across
}

/// Half-sample symmetric border: `d c b a | a b c d | d c b a`.
fn reflect(index: isize, len: usize) -> usize {
    let len = len as isize;
    let period = 2 * len;
    let wrapped = index.rem_euclid(period);
    if wrapped >= len {
        (period - 1 - wrapped) as usize
    } else {
        wrapped as usize
    }
}
