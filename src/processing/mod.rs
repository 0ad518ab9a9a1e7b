//! # Bin-Average Embedding Core
//!
//! Pure transforms over an intensity matrix and a bit sequence. Nothing in
//! this module reads files, keeps state between calls or spawns threads.
//!
//! Data flow:
//!
//! ```text
//! cover ─► bins ─┬─► embed ──► stego (+ quality)
//!                ├─► mask
//!                └─► extract ◄── stego
//! ```
//!
//! ## Modules
//!
//! - [`matrix`]: column-major [`IntensityMatrix`] and [`BitSequence`]
//! - [`bins`]: 52-bin counts/averages and per-pixel references
//! - [`eligibility`]: which intensities may carry a bit
//! - [`embed`]: the embedder
//! - [`mask`]: rebuilds the set of positions that carry bits
//! - [`extract`]: non-blind recovery of bits and cover
//! - [`quality`]: MSE, PSNR, SSIM

pub mod bins;
pub mod eligibility;
pub mod embed;
pub mod extract;
pub mod mask;
pub mod matrix;
pub mod quality;

// Re-export main types and operations for convenience
pub use bins::{compute_bin_statistics, Bin, BinStatistics, BinTable, PerPixelReference};
pub use eligibility::{capacity, eligible};
pub use embed::{embed, embed_with_reference, EmbedResult};
pub use extract::{extract, extract_with, ExtractOptions, ExtractResult};
pub use mask::{build_eligibility_mask, EligibilityMask};
pub use matrix::{BitSequence, IntensityMatrix};
pub use quality::QualityReport;
