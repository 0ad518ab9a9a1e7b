//! # File Collaborators
//!
//! Everything that touches the filesystem: image files, bit files and metric
//! reports. The processing core never calls into this module.

pub mod bits;
pub mod image;
pub mod report;

pub use self::bits::{load_bits, parse_bits, write_bits};
pub use self::image::{load_cover, save_matrix};
pub use self::report::{
    compare_bits, write_metrics_csv, write_metrics_json, BitComparison, MetricsRecord,
};
