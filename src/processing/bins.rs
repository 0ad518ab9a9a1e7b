//! # Bin Statistics
//!
//! Groups the 256 intensity levels into 52 bins of width 5 (intensity `v`
//! lands in bin `v / 5`) and records, for each bin, how many cover pixels fall
//! in it and the ceiling of their mean intensity. That average is the
//! reference every embedded pixel is perturbed against.
//!
//! Everything here is a pure function of the cover. It never looks at a stego
//! image or at the bits being hidden.

use serde::Serialize;

use crate::common::error::{Result, StegoError};
use crate::processing::matrix::IntensityMatrix;

/// Number of intensity levels in an 8-bit image.
pub const LEVELS: usize = 256;

/// Width of each bin in intensity levels.
pub const BIN_WIDTH: usize = 5;

/// Number of bins; the last one only holds level 255.
pub const BIN_COUNT: usize = 52;

/// One bin of the table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Bin {
    /// Cover pixels whose intensity falls in this bin.
    pub count: u64,
    /// `ceil(sum of intensities / count)`, 0 for an empty bin.
    pub average: u8,
}

/// Per-bin counts and averages for one cover image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BinTable {
    bins: Vec<Bin>,
}

impl BinTable {
    /// Bin index for an intensity.
    pub fn bin_index(value: u8) -> usize {
        value as usize / BIN_WIDTH
    }

    /// Intensity range `[start, end)` covered by bin `index`.
    pub fn bin_range(index: usize) -> (usize, usize) {
        (index * BIN_WIDTH, index * BIN_WIDTH + BIN_WIDTH)
    }

    pub fn get(&self, index: usize) -> Option<&Bin> {
        self.bins.get(index)
    }

    /// Average of the bin that `value` belongs to.
    pub fn average_for(&self, value: u8) -> u8 {
        self.bins[Self::bin_index(value)].average
    }

    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    /// `(index, bin)` for every bin holding at least one pixel.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, &Bin)> {
        self.bins
            .iter()
            .enumerate()
            .filter(|(_, bin)| bin.count > 0)
    }
}

/// The level histogram of a cover together with the [`BinTable`] derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinStatistics {
    histogram: Vec<u64>,
    table: BinTable,
}

impl BinStatistics {
    /// Build the 256-level histogram of `cover`, then fold it into 52 bins.
    pub fn compute(cover: &IntensityMatrix) -> Self {
        let mut histogram = vec![0u64; LEVELS];
        for &pixel in cover.as_column_major() {
            histogram[pixel as usize] += 1;
        }

        let mut counts = [0u64; BIN_COUNT];
        let mut sums = [0u64; BIN_COUNT];
        for (level, &hits) in histogram.iter().enumerate() {
            let index = level / BIN_WIDTH;
            counts[index] += hits;
            sums[index] += hits * level as u64;
        }

        // Integer ceiling division: fractions always round up.
        let bins = counts
            .iter()
            .zip(sums.iter())
            .map(|(&count, &sum)| Bin {
                count,
                average: if count == 0 {
                    0
                } else {
                    ((sum + count - 1) / count) as u8
                },
            })
            .collect();

        Self {
            histogram,
            table: BinTable { bins },
        }
    }

    pub fn table(&self) -> &BinTable {
        &self.table
    }

    pub fn into_table(self) -> BinTable {
        self.table
    }

    /// Pixel count for each intensity level 0..=255.
    pub fn level_histogram(&self) -> &[u64] {
        &self.histogram
    }
}

/// One reference intensity per cover pixel, in column-major scan order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PerPixelReference(Vec<u8>);

impl PerPixelReference {
    /// Look up every pixel of `cover` in `table`.
    pub fn from_table(cover: &IntensityMatrix, table: &BinTable) -> Self {
        Self(
            cover
                .as_column_major()
                .iter()
                .map(|&pixel| table.average_for(pixel))
                .collect(),
        )
    }

    /// Compute bin statistics for `cover` and expand them per pixel.
    pub fn compute(cover: &IntensityMatrix) -> Self {
        let stats = BinStatistics::compute(cover);
        Self::from_table(cover, stats.table())
    }

    /// Wrap externally supplied references (column-major).
    pub fn from_column_major(values: Vec<u8>) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fail with [`StegoError::ReferenceLength`] unless there is one value per pixel.
    pub(crate) fn ensure_covers(&self, matrix: &IntensityMatrix) -> Result<()> {
        if self.0.len() != matrix.len() {
            return Err(StegoError::ReferenceLength {
                expected: matrix.len(),
                actual: self.0.len(),
            });
        }
        Ok(())
    }
}

/// Compute the bin table of a cover image.
pub fn compute_bin_statistics(cover: &IntensityMatrix) -> BinTable {
    BinStatistics::compute(cover).into_table()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: &[Vec<i64>]) -> IntensityMatrix {
        IntensityMatrix::from_rows(rows).unwrap()
    }

    #[test]
    fn table_has_52_bins_and_last_holds_255() {
        let cover = matrix(&[vec![255, 255, 0]]);
        let table = compute_bin_statistics(&cover);
        assert_eq!(table.bins().len(), BIN_COUNT);
        assert_eq!(BinTable::bin_index(255), 51);
        assert_eq!(
            table.get(51),
            Some(&Bin {
                count: 2,
                average: 255
            })
        );
        assert_eq!(
            table.get(0),
            Some(&Bin {
                count: 1,
                average: 0
            })
        );
    }

    #[test]
    fn average_rounds_up() {
        // Bin 2 holds 10, 10, 11: mean 10.33 -> 11.
        let cover = matrix(&[vec![10, 10, 11]]);
        let table = compute_bin_statistics(&cover);
        assert_eq!(table.get(2).unwrap().average, 11);
        assert_eq!(table.get(2).unwrap().count, 3);

        // Exact mean stays put: 10, 12 -> 11.
        let cover = matrix(&[vec![10, 12]]);
        assert_eq!(compute_bin_statistics(&cover).average_for(14), 11);
    }

    #[test]
    fn empty_bins_average_to_zero() {
        let cover = matrix(&[vec![100]]);
        let table = compute_bin_statistics(&cover);
        assert_eq!(table.occupied().count(), 1);
        assert_eq!(table.get(7), Some(&Bin::default()));
    }

    #[test]
    fn histogram_counts_each_level() {
        let cover = matrix(&[vec![3, 3, 7], vec![3, 200, 7]]);
        let stats = BinStatistics::compute(&cover);
        let hist = stats.level_histogram();
        assert_eq!(hist.len(), LEVELS);
        assert_eq!(hist[3], 3);
        assert_eq!(hist[7], 2);
        assert_eq!(hist[200], 1);
        assert_eq!(hist.iter().sum::<u64>(), 6);
    }

    #[test]
    fn per_pixel_reference_follows_scan_order() {
        let cover = matrix(&[vec![10, 100], vec![200, 52]]);
        let reference = PerPixelReference::compute(&cover);
        // Scan order is [10, 200, 100, 52]; bin 10 holds only 52.
        assert_eq!(reference.as_slice(), &[10, 200, 100, 52]);
    }

    #[test]
    fn empty_cover_gives_empty_table() {
        let cover = IntensityMatrix::filled(0, 0, 0);
        let table = compute_bin_statistics(&cover);
        assert!(table.bins().iter().all(|b| *b == Bin::default()));
        assert!(PerPixelReference::compute(&cover).is_empty());
    }

    #[test]
    fn bin_range_is_half_open() {
        assert_eq!(BinTable::bin_range(0), (0, 5));
        assert_eq!(BinTable::bin_range(49), (245, 250));
    }
}
