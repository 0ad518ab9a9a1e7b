//! # Image Decode and Encode
//!
//! Turns image files into [`IntensityMatrix`] values and back, using the
//! `image` crate. Colour inputs are reduced to luminance here so the core only
//! ever sees a single channel.

use image::{DynamicImage, GenericImageView, GrayImage};
use log::debug;
use std::path::Path;

use crate::common::error::{Result, StegoError};
use crate::processing::matrix::IntensityMatrix;

const LUMA_R: f64 = 0.298936021293776;
const LUMA_G: f64 = 0.587043074451121;
const LUMA_B: f64 = 0.114020904255103;

/// Reduce one RGB sample to an 8-bit luminance, rounding half up.
pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
    let y = LUMA_R * f64::from(r) + LUMA_G * f64::from(g) + LUMA_B * f64::from(b);
    (y + 0.5).floor().clamp(0.0, 255.0) as u8
}

/// Load an image file as a cover (or stego) intensity matrix.
///
/// # Errors
/// - [`StegoError::Image`] if the file cannot be decoded.
/// - [`StegoError::InvalidIntensity`] for 16-bit grayscale holding values above 255.
pub fn load_cover<P: AsRef<Path>>(path: P) -> Result<IntensityMatrix> {
    let path = path.as_ref();
    let img = image::open(path)?;
    let (width, height) = img.dimensions();
    debug!(
        "Decoded {} ({}x{}, {:?})",
        path.display(),
        width,
        height,
        img.color()
    );
    from_dynamic(img)
}

/// Convert a decoded image into an intensity matrix.
pub fn from_dynamic(img: DynamicImage) -> Result<IntensityMatrix> {
    let (width, height) = img.dimensions();
    let (width, height) = (width as usize, height as usize);

    let row_major: Vec<u8> = match img {
        DynamicImage::ImageLuma8(buf) => buf.into_raw(),
        DynamicImage::ImageLumaA8(buf) => buf.pixels().map(|p| p.0[0]).collect(),
        DynamicImage::ImageLuma16(buf) => {
            let mut out = Vec::with_capacity(width * height);
            for (index, &value) in buf.as_raw().iter().enumerate() {
                let pixel = u8::try_from(value).map_err(|_| StegoError::InvalidIntensity {
                    row: index / width,
                    col: index % width,
                    value: i64::from(value),
                })?;
                out.push(pixel);
            }
            out
        }
        DynamicImage::ImageRgb8(buf) => buf
            .pixels()
            .map(|p| luminance(p.0[0], p.0[1], p.0[2]))
            .collect(),
        DynamicImage::ImageRgba8(buf) => buf
            .pixels()
            .map(|p| luminance(p.0[0], p.0[1], p.0[2]))
            .collect(),
        other => other
            .to_rgb8()
            .pixels()
            .map(|p| luminance(p.0[0], p.0[1], p.0[2]))
            .collect(),
    };

    IntensityMatrix::from_row_major(height, width, &row_major)
}

/// Encode a matrix as 8-bit grayscale; the format follows the file extension.
///
/// # Errors
/// [`StegoError::Image`] if encoding or writing fails.
pub fn save_matrix<P: AsRef<Path>>(matrix: &IntensityMatrix, path: P) -> Result<()> {
    let path = path.as_ref();
    to_gray_image(matrix)?.save(path)?;
    debug!(
        "Wrote {}x{} grayscale image to {}",
        matrix.height(),
        matrix.width(),
        path.display()
    );
    Ok(())
}

/// Copy a matrix into a row-major `GrayImage`.
pub fn to_gray_image(matrix: &IntensityMatrix) -> Result<GrayImage> {
    let expected = matrix.height() * matrix.width();
    let pixels = matrix.to_row_major();
    let actual = pixels.len();
    GrayImage::from_raw(matrix.width() as u32, matrix.height() as u32, pixels)
        .ok_or(StegoError::BufferLength { expected, actual })
}
