//! # avgbin-stego
//!
//! Hides a bit sequence in a grayscale image by pushing each usable pixel away
//! from the average of its 5-level intensity bin, and recovers both the bits
//! and the original pixels given the stego image **and** the original cover.
//!
//! The four core operations:
//!
//! - [`compute_bin_statistics`]: per-bin counts and averages of a cover
//! - [`embed`]: cover + bits → stego, bits used, PSNR/MSE/SSIM
//! - [`build_eligibility_mask`]: which pixels carry bits for a given budget
//! - [`extract`] / [`extract_with`]: cover + stego + budget → bits, reconstructed cover
//!
//! ```rust,ignore
//! use avgbin_stego::{embed, extract, BitSequence, IntensityMatrix};
//!
//! let cover = IntensityMatrix::from_rows(&[vec![10, 100], vec![200, 50]])?;
//! let bits = BitSequence::new(vec![1, 0, 1, 0]);
//! let embedded = embed(&cover, &bits);
//! let recovered = extract(&cover, &embedded.stego, embedded.bits_used)?;
//! assert_eq!(recovered.bits, bits);
//! assert_eq!(recovered.reconstructed, cover);
//! ```

pub mod common;
pub mod io;
pub mod processing;
pub mod session;

pub use common::error::{Result, StegoError};
pub use processing::{
    build_eligibility_mask, capacity, compute_bin_statistics, eligible, embed,
    embed_with_reference, extract, extract_with, Bin, BinStatistics, BinTable, BitSequence,
    EligibilityMask, EmbedResult, ExtractOptions, ExtractResult, IntensityMatrix,
    PerPixelReference, QualityReport,
};
pub use session::Session;
