//! # Configuration Utilities
//!
//! TOML configuration for the command-line front end. Every section and field
//! is optional; missing values fall back to [`Default`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Load a TOML configuration file and deserialize it into the specified type.
///
/// # Arguments
/// - `path`: Path to the TOML configuration file
///
/// # Returns
/// - `Ok(T)`: Successfully loaded and parsed configuration
/// - `Err`: File I/O or parsing error
///
/// # Example
/// ```ignore
/// let config: StegoConfig = load_config("config/avgbin.toml")?;
/// ```
pub fn load_config<T>(path: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let content =
        fs::read_to_string(path).with_context(|| format!("reading config file {}", path))?;
    let config: T =
        toml::from_str(&content).with_context(|| format!("parsing config file {}", path))?;
    Ok(config)
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StegoConfig {
    pub logging: LoggingConfig,
    pub output: OutputConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `error`, `warn`, `info`, `debug` or `trace`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Where results go when the command line does not say.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Appended to the cover's file stem to name the stego image.
    pub stego_suffix: String,
    /// Image format extension for the stego image (`tiff`, `png`).
    pub stego_extension: String,
    /// Default file for extracted bits.
    pub bits_file: PathBuf,
    /// Default file for the metrics CSV.
    pub metrics_csv: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            stego_suffix: "_stego".to_string(),
            stego_extension: "tiff".to_string(),
            bits_file: PathBuf::from("extracted_bits.txt"),
            metrics_csv: PathBuf::from("metrics.csv"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// File holding the last embedding run.
    pub path: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(".avgbin-session.json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[logging]\nlevel = \"debug\"\n\n[output]\nstego_extension = \"png\""
        )
        .unwrap();

        let config: StegoConfig = load_config(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.output.stego_extension, "png");
        assert_eq!(config.output.stego_suffix, "_stego");
        assert_eq!(config.session, SessionConfig::default());
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config: StegoConfig = load_config(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config, StegoConfig::default());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_config::<StegoConfig>("/nonexistent/avgbin.toml").is_err());
    }
}
