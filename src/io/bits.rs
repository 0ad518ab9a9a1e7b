//! # Bit Files
//!
//! Reads and writes the plain-text files that carry bit sequences.
//!
//! Two layouts are accepted:
//! - **Numeric tables**: numbers separated by whitespace or commas, one row per
//!   line, `#` starting a comment. All rows must be the same width. The table
//!   is flattened column by column, then each value is normalized to 0/1.
//! - **Bit strings**: anything else. Every '0' and '1' character is a bit and
//!   all other characters are ignored.
//!
//! When every token is a run of two or more '0'/'1' characters the file is
//! read as a bit string, so `"0110"` means four bits. In a table that also
//! holds other numbers, `10` keeps its numeric value.

use log::{debug, warn};
use std::fs;
use std::path::Path;

use crate::common::error::Result;
use crate::processing::matrix::BitSequence;

/// Parse the contents of a bit file.
pub fn parse_bits(text: &str) -> BitSequence {
    match parse_numeric_table(text) {
        Some(values) => BitSequence::from_values(&values),
        None => {
            warn!("Bit file is not a numeric table, reading '0'/'1' characters instead");
            parse_bit_characters(text)
        }
    }
}

/// Read and parse a bit file. Invalid UTF-8 is replaced, not rejected.
pub fn load_bits<P: AsRef<Path>>(path: P) -> Result<BitSequence> {
    let path = path.as_ref();
    let raw = fs::read(path)?;
    let bits = parse_bits(&String::from_utf8_lossy(&raw));
    debug!("Loaded {} bits from {}", bits.len(), path.display());
    Ok(bits)
}

/// Write bits as one contiguous line of '0'/'1'.
pub fn write_bits<P: AsRef<Path>>(bits: &BitSequence, path: P) -> Result<()> {
    fs::write(path, bits.to_bit_string())?;
    Ok(())
}

fn parse_bit_characters(text: &str) -> BitSequence {
    text.chars()
        .filter_map(|ch| match ch {
            '0' => Some(0),
            '1' => Some(1),
            _ => None,
        })
        .collect()
}

/// Column-major flattening of a rectangular numeric table, or `None`.
///
/// A file whose tokens are all multi-digit 0/1 strings is a bit string, not a
/// table of binary-looking numbers.
fn parse_numeric_table(text: &str) -> Option<Vec<f64>> {
    let token_rows: Vec<Vec<&str>> = text
        .lines()
        .map(tokenize)
        .filter(|tokens| !tokens.is_empty())
        .collect();

    if !token_rows.is_empty() && token_rows.iter().flatten().all(|t| is_bit_string(t)) {
        return None;
    }

    let mut rows: Vec<Vec<f64>> = Vec::with_capacity(token_rows.len());
    for tokens in &token_rows {
        let row = tokens
            .iter()
            .map(|token| token.parse::<f64>().ok())
            .collect::<Option<Vec<f64>>>()?;
        if rows.first().is_some_and(|first| first.len() != row.len()) {
            return None;
        }
        rows.push(row);
    }

    let width = rows.first().map_or(0, Vec::len);
    let mut values = Vec::with_capacity(rows.len() * width);
    for col in 0..width {
        for row in &rows {
            values.push(row[col]);
        }
    }
    Some(values)
}

/// Tokens of one line, with any `#` comment removed.
fn tokenize(line: &str) -> Vec<&str> {
    let content = line.split('#').next().unwrap_or("");
    content
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .collect()
}

fn is_bit_string(token: &str) -> bool {
    token.len() > 1 && token.chars().all(|c| c == '0' || c == '1')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_value_per_line() {
        let bits = parse_bits("1\n0\n1\n1\n");
        assert_eq!(bits.as_slice(), &[1, 0, 1, 1]);
    }

    #[test]
    fn table_is_flattened_column_major() {
        let bits = parse_bits("1 0 0\n1 1 0\n");
        // Columns: [1,1], [0,1], [0,0]
        assert_eq!(bits.as_slice(), &[1, 1, 0, 1, 0, 0]);
    }

    #[test]
    fn commas_comments_and_reals() {
        let bits = parse_bits("# header\n1.0, 0.0\n\n0.0, 2.0 # trailing\n");
        assert_eq!(bits.as_slice(), &[1, 0, 0, 0]);
    }

    #[test]
    fn bit_strings_fall_back_to_characters() {
        assert_eq!(parse_bits("0110").as_slice(), &[0, 1, 1, 0]);
        assert_eq!(parse_bits("bits: 1a0b1").as_slice(), &[1, 0, 1]);
    }

    #[test]
    fn binary_looking_numbers_in_a_table_stay_numeric() {
        // 10 is the number ten, so it reduces to 0.
        assert_eq!(parse_bits("1\n10\n").as_slice(), &[1, 0]);
        assert_eq!(parse_bits("11 3\n0 101\n").as_slice(), &[1, 0, 1, 1]);
    }

    #[test]
    fn several_bit_strings_are_read_as_characters() {
        assert_eq!(parse_bits("0110\n11\n").as_slice(), &[0, 1, 1, 0, 1, 1]);
    }

    #[test]
    fn ragged_rows_fall_back_to_characters() {
        assert_eq!(parse_bits("1 0\n1\n").as_slice(), &[1, 0, 1]);
    }

    #[test]
    fn empty_text_is_empty_sequence() {
        assert!(parse_bits("").is_empty());
        assert!(parse_bits("  \n# nothing\n").is_empty());
    }

    #[test]
    fn written_bits_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bits.txt");
        let bits = BitSequence::new(vec![1, 0, 0, 1, 1]);
        write_bits(&bits, &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "10011");
        assert_eq!(load_bits(&path).unwrap(), bits);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_bits("/nonexistent/bits.txt").is_err());
    }
}
