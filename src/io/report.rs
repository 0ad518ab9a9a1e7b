//! # Reports
//!
//! Bit-error comparison and metrics export for a finished run.

use log::info;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::common::error::Result;
use crate::processing::embed::EmbedResult;
use crate::processing::matrix::BitSequence;

/// Extracted bits measured against the bits that were meant to be hidden.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BitComparison {
    pub extracted_len: usize,
    pub truth_len: usize,
    /// Length of the common prefix that was compared.
    pub compared: usize,
    pub mismatches: usize,
    /// `mismatches / compared`, 0 when nothing was compared.
    pub ber: f64,
}

impl BitComparison {
    /// One-line summary for terminals and logs.
    pub fn summary(&self) -> String {
        format!(
            "Extracted: {} | GT: {} | Mismatches: {} | BER: {:.6}",
            self.extracted_len, self.truth_len, self.mismatches, self.ber
        )
    }
}

/// Compare `extracted` with `truth` over their common prefix.
pub fn compare_bits(extracted: &BitSequence, truth: &BitSequence) -> BitComparison {
    let compared = extracted.len().min(truth.len());
    let mismatches = extracted
        .iter()
        .zip(truth.iter())
        .filter(|(a, b)| a != b)
        .count();
    BitComparison {
        extracted_len: extracted.len(),
        truth_len: truth.len(),
        compared,
        mismatches,
        ber: if compared == 0 {
            0.0
        } else {
            mismatches as f64 / compared as f64
        },
    }
}

/// Metrics of one embedding run, ready for export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsRecord {
    pub image: String,
    pub bits_file: String,
    pub psnr: f64,
    pub mse: f64,
    pub ssim: f64,
    pub bits_used: usize,
}

impl MetricsRecord {
    pub fn from_result(image: &str, bits_file: &str, result: &EmbedResult) -> Self {
        Self {
            image: image.to_string(),
            bits_file: bits_file.to_string(),
            psnr: result.psnr,
            mse: result.mse,
            ssim: result.ssim,
            bits_used: result.bits_used,
        }
    }

    /// CSV text: header plus a single data row.
    pub fn to_csv(&self) -> String {
        format!(
            "Image,Bits File,PSNR,MSE,SSIM,BitsUsed\n{},{},{},{},{},{}\n",
            csv_field(&self.image),
            csv_field(&self.bits_file),
            format_metric(self.psnr),
            format_metric(self.mse),
            format_metric(self.ssim),
            self.bits_used
        )
    }
}

/// Write the record as a two-line CSV file.
pub fn write_metrics_csv<P: AsRef<Path>>(record: &MetricsRecord, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut file = File::create(path)?;
    file.write_all(record.to_csv().as_bytes())?;
    info!("📊 Metrics written to {}", path.display());
    Ok(())
}

/// Write the record as pretty-printed JSON.
///
/// Non-finite metrics (an infinite PSNR, an undefined SSIM) serialize as `null`.
pub fn write_metrics_json<P: AsRef<Path>>(record: &MetricsRecord, path: P) -> Result<()> {
    let output = serde_json::json!({
        "generated_at": chrono::Local::now().to_rfc3339(),
        "metrics": record,
    });

    let path = path.as_ref();
    let json_string = serde_json::to_string_pretty(&output)?;
    let mut file = File::create(path)?;
    file.write_all(json_string.as_bytes())?;
    info!("📊 Metrics written to {}", path.display());
    Ok(())
}

/// Six decimals, with `inf`/`nan` spelled the way numeric toolkits print them.
fn format_metric(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "inf" } else { "-inf" }.to_string()
    } else {
        format!("{:.6}", value)
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
