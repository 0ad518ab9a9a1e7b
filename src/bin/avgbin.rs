//! # avgbin Command-Line Front End
//!
//! Thin wrapper over the library: decodes files, calls the core, writes results.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin avgbin -- embed --cover lena.tif --bits secret.txt
//! cargo run --bin avgbin -- extract --cover lena.tif --stego lena_stego.tiff
//! cargo run --bin avgbin -- capacity --cover lena.tif
//! ```
//!
//! `embed` records the run in a session file; a later `extract` without
//! `--bits-len` uses that session's budget and ground-truth bits.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::path::{Path, PathBuf};

use avgbin_stego::common::config::{load_config, StegoConfig};
use avgbin_stego::common::logging::{init_logger, parse_level, with_verbosity};
use avgbin_stego::io::{self, MetricsRecord};
use avgbin_stego::processing::quality::QualityReport;
use avgbin_stego::{capacity, compute_bin_statistics, embed, extract, BinTable, Session};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a configuration file (TOML format)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Hide the bits of a bit file in a cover image
    Embed {
        #[arg(long)]
        cover: PathBuf,
        #[arg(long)]
        bits: PathBuf,
        /// Stego image path (default: <cover stem><suffix>.<extension>)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Write metrics as CSV (default file from the config when no path is given)
        #[arg(long)]
        metrics_csv: Option<Option<PathBuf>>,
        #[arg(long)]
        metrics_json: Option<PathBuf>,
    },
    /// Recover bits and the cover from a stego image (needs the original cover)
    Extract {
        #[arg(long)]
        cover: PathBuf,
        #[arg(long)]
        stego: PathBuf,
        /// Number of bits to read; overrides the session budget
        #[arg(long)]
        bits_len: Option<usize>,
        /// Ground-truth bit file to compare against
        #[arg(long)]
        truth: Option<PathBuf>,
        #[arg(long)]
        out_bits: Option<PathBuf>,
        #[arg(long)]
        out_cover: Option<PathBuf>,
    },
    /// Print how many bits a cover can hold
    Capacity {
        #[arg(long)]
        cover: PathBuf,
    },
    /// Print the occupied bins of a cover's bin table
    Stats {
        #[arg(long)]
        cover: PathBuf,
    },
    /// Print MSE, PSNR and SSIM between two images
    Compare {
        #[arg(long)]
        reference: PathBuf,
        #[arg(long)]
        test: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config: StegoConfig = match &args.config {
        Some(path) => load_config(path)?,
        None => StegoConfig::default(),
    };

    let level = with_verbosity(parse_level(&config.logging.level), args.verbose);
    init_logger(level);

    match args.command {
        Command::Embed {
            cover,
            bits,
            out,
            metrics_csv,
            metrics_json,
        } => run_embed(&config, &cover, &bits, out, metrics_csv, metrics_json),
        Command::Extract {
            cover,
            stego,
            bits_len,
            truth,
            out_bits,
            out_cover,
        } => run_extract(
            &config,
            &cover,
            &stego,
            bits_len,
            truth,
            out_bits,
            out_cover,
        ),
        Command::Capacity { cover } => {
            let cover_img = load(&cover)?;
            println!("{}", capacity(&cover_img));
            Ok(())
        }
        Command::Stats { cover } => {
            let table = compute_bin_statistics(&load(&cover)?);
            println!("bin\trange\tcount\taverage");
            for (index, bin) in table.occupied() {
                let (start, end) = BinTable::bin_range(index);
                let range = format!("{}-{}", start, end - 1);
                println!("{}\t{}\t{}\t{}", index, range, bin.count, bin.average);
            }
            Ok(())
        }
        Command::Compare { reference, test } => {
            let report = QualityReport::compare(&load(&reference)?, &load(&test)?)?;
            print_quality(&report);
            Ok(())
        }
    }
}

fn run_embed(
    config: &StegoConfig,
    cover_path: &Path,
    bits_path: &Path,
    out: Option<PathBuf>,
    metrics_csv: Option<Option<PathBuf>>,
    metrics_json: Option<PathBuf>,
) -> Result<()> {
    let cover = load(cover_path)?;
    let bits = io::load_bits(bits_path)
        .with_context(|| format!("reading bits from {}", bits_path.display()))?;

    let result = embed(&cover, &bits);

    let out = out.unwrap_or_else(|| default_stego_path(config, cover_path));
    io::save_matrix(&result.stego, &out)
        .with_context(|| format!("writing stego image {}", out.display()))?;
    info!(
        "✅ Embedded {} of {} bits, stego written to {}",
        result.bits_used,
        bits.len(),
        out.display()
    );

    print_quality(&result.quality());
    println!("Bits used: {}", result.bits_used);

    let cover_name = file_name(cover_path);
    let bits_name = file_name(bits_path);
    let record = MetricsRecord::from_result(&cover_name, &bits_name, &result);
    if let Some(path) = metrics_csv {
        let path = path.unwrap_or_else(|| config.output.metrics_csv.clone());
        io::write_metrics_csv(&record, &path)?;
        println!("Metrics exported to: {}", path.display());
    }
    if let Some(path) = metrics_json {
        io::write_metrics_json(&record, &path)?;
        println!("Metrics exported to: {}", path.display());
    }

    let mut session = Session::load_or_default(&config.session.path)?;
    session.record_embed(&cover_name, &bits_name, &bits, &result);
    session.save(&config.session.path)?;

    Ok(())
}

fn run_extract(
    config: &StegoConfig,
    cover_path: &Path,
    stego_path: &Path,
    bits_len: Option<usize>,
    truth_path: Option<PathBuf>,
    out_bits: Option<PathBuf>,
    out_cover: Option<PathBuf>,
) -> Result<()> {
    let cover = load(cover_path)?;
    let stego = load(stego_path)?;
    let session = Session::load_or_default(&config.session.path)?;

    let truth = match &truth_path {
        Some(path) => Some(io::load_bits(path)?),
        None => session.ground_truth().cloned(),
    };

    let budget = match (bits_len, session.extraction_budget(&cover), &truth) {
        (Some(n), _, _) => n,
        (None, Some(n), _) => n,
        (None, None, Some(truth)) => truth.len(),
        (None, None, None) => {
            bail!("no bit budget: pass --bits-len or --truth, or run embed first")
        }
    };

    let result = extract(&cover, &stego, budget)
        .with_context(|| format!("extracting from {}", stego_path.display()))?;
    info!("✅ Extracted {} bits", result.bits.len());

    let bits_out = out_bits.unwrap_or_else(|| config.output.bits_file.clone());
    io::write_bits(&result.bits, &bits_out)?;
    println!("Extracted bits written to: {}", bits_out.display());

    if let Some(path) = out_cover {
        io::save_matrix(&result.reconstructed, &path)?;
        println!("Reconstructed cover written to: {}", path.display());
    }

    if let Some(truth) = truth {
        println!("{}", io::compare_bits(&result.bits, &truth).summary());
    }

    Ok(())
}

fn load(path: &Path) -> Result<avgbin_stego::IntensityMatrix> {
    io::load_cover(path).with_context(|| format!("loading image {}", path.display()))
}

fn print_quality(report: &QualityReport) {
    println!("PSNR: {:.6}", report.psnr);
    println!("MSE: {:.6}", report.mse);
    println!("SSIM: {:.6}", report.ssim);
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// `<dir>/<stem><suffix>.<extension>` next to the cover.
fn default_stego_path(config: &StegoConfig, cover: &Path) -> PathBuf {
    let stem = cover
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "stego".to_string());
    let name = format!(
        "{}{}.{}",
        stem, config.output.stego_suffix, config.output.stego_extension
    );
    cover.with_file_name(name)
}
