//! Quanta matrix construction
//!
//! A quanta matrix counts, for one attribute and one set of interval
//! boundaries, how many samples of each class fall into each interval.
//! The CAIM criterion (see [`caim`](crate::caim)) is computed from it.
//!
//! # Two-Stage Construction
//!
//! Building the matrix straight from raw samples would cost `O(rows)` for
//! every trial boundary set. Instead the samples are first aggregated once
//! into an [`OccurrenceTable`]: the sorted distinct values of the attribute
//! (the *candidates*) with per-class occurrence counts. Every trial matrix is
//! then built from this table with a monotonic sweep, which costs
//! `O(candidates)` regardless of the number of rows.
//!
//! ```text
//! OccurrenceTable                      QuantaMatrix for D = {1.0, 3.5, 9.0}
//!
//! value:   1.0  2.0  5.0  9.0                 [1.0,3.5]  [3.5,9.0]
//! class A:  1    1    1    0        class A:      2          1
//! class B:  0    1    1    1        class B:      1          2
//!                                   marginal:     3          3
//! ```
//!
//! # Examples
//!
//! ```
//! use caim_stats::quanta::{OccurrenceTable, QuantaMatrix};
//!
//! // (class index, value) pairs
//! let pairs = [(0, 1.0), (0, 2.0), (1, 2.0), (1, 5.0), (0, 5.0), (1, 9.0)];
//! let table = OccurrenceTable::from_pairs(2, pairs);
//! assert_eq!(table.values(), &[1.0, 2.0, 5.0, 9.0]);
//!
//! let matrix = QuantaMatrix::build(&table, &[1.0, 3.5, 9.0]);
//! assert_eq!(matrix.num_intervals(), 2);
//! assert_eq!(matrix.count(0, 0), 2);
//! assert_eq!(matrix.marginal(1), 3);
//! ```

/// Per-class occurrence counts of the distinct values of one attribute.
///
/// Candidates are stored in ascending order and are unique; samples sharing
/// a value are collapsed into a single candidate whose class counts are
/// aggregated.
#[derive(Debug, Clone, PartialEq)]
pub struct OccurrenceTable {
    num_classes: usize,
    values: Vec<f64>,
    /// Candidate-major: `counts[candidate * num_classes + class]`
    counts: Vec<u64>,
}

impl OccurrenceTable {
    /// Aggregates `(class index, value)` pairs into an occurrence table.
    ///
    /// `NaN` values are treated as missing and skipped.
    ///
    /// # Panics
    ///
    /// Panics if a class index is not less than `num_classes`.
    #[must_use]
    pub fn from_pairs<I>(num_classes: usize, pairs: I) -> Self
    where
        I: IntoIterator<Item = (usize, f64)>,
    {
        let mut pairs = pairs
            .into_iter()
            .filter(|(_, value)| !value.is_nan())
            .collect::<Vec<_>>();
        pairs.sort_by(|a, b| a.1.total_cmp(&b.1));

        let mut values = Vec::new();
        let mut counts = Vec::new();
        for (class, value) in pairs {
            assert!(
                class < num_classes,
                "class index {class} out of range (num_classes = {num_classes})"
            );
            if values.last() != Some(&value) {
                values.push(value);
                counts.resize(counts.len() + num_classes, 0);
            }
            let base = counts.len() - num_classes;
            counts[base + class] += 1;
        }

        Self {
            num_classes,
            values,
            counts,
        }
    }

    #[must_use]
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    #[must_use]
    pub fn num_candidates(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sorted distinct candidate values.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Occurrence counts of each class for the candidate at `candidate`.
    #[must_use]
    pub fn class_counts(&self, candidate: usize) -> &[u64] {
        let base = candidate * self.num_classes;
        &self.counts[base..base + self.num_classes]
    }

    /// Total number of aggregated samples.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    #[must_use]
    pub fn min(&self) -> Option<f64> {
        self.values.first().copied()
    }

    #[must_use]
    pub fn max(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// Midpoints between every pair of consecutive candidates, ascending.
    ///
    /// A midpoint that does not fall strictly between its two candidates is
    /// left out: neighbours one ULP apart round onto one of them, and
    /// `-inf`/`+inf` neighbours have no midpoint at all.
    #[must_use]
    pub fn midpoints(&self) -> Vec<f64> {
        self.values
            .windows(2)
            .map(|pair| (pair[0], f64::midpoint(pair[0], pair[1]), pair[1]))
            .filter(|&(low, mid, high)| low < mid && mid < high)
            .map(|(_, mid, _)| mid)
            .collect()
    }
}

/// Class-by-interval occurrence count matrix.
///
/// Rows are class indices, columns are the intervals implied by a boundary
/// set. A marginal row holds the total of each column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantaMatrix {
    num_classes: usize,
    /// Interval-major: `counts[interval * num_classes + class]`
    counts: Vec<u64>,
    marginals: Vec<u64>,
}

impl QuantaMatrix {
    /// Builds the quanta matrix for `boundaries` from an occurrence table.
    ///
    /// Each consecutive boundary pair `[min, max]` forms one interval, and a
    /// candidate belongs to an interval when `min <= value <= max`. Both
    /// candidates and boundaries are sorted, so the scan start only moves
    /// forward.
    ///
    /// # Panics
    ///
    /// Panics if `boundaries` is not sorted in ascending order.
    #[must_use]
    pub fn build(table: &OccurrenceTable, boundaries: &[f64]) -> Self {
        assert!(
            boundaries.is_sorted_by(|a, b| a <= b),
            "boundaries must be sorted in ascending order"
        );

        let num_classes = table.num_classes();
        let num_intervals = boundaries.len().saturating_sub(1);
        let values = table.values();
        let mut counts = vec![0; num_intervals * num_classes];
        let mut marginals = vec![0; num_intervals];

        let mut left = 0;
        for (interval, bounds) in boundaries.windows(2).enumerate() {
            let (min, max) = (bounds[0], bounds[1]);
            while left < values.len() && values[left] < min {
                left += 1;
            }
            let mut right = left;
            while right < values.len() && values[right] <= max {
                right += 1;
            }

            let column = &mut counts[interval * num_classes..(interval + 1) * num_classes];
            for candidate in left..right {
                for (slot, count) in column.iter_mut().zip(table.class_counts(candidate)) {
                    *slot += count;
                }
            }
            marginals[interval] = column.iter().sum();
        }

        Self {
            num_classes,
            counts,
            marginals,
        }
    }

    #[must_use]
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    #[must_use]
    pub fn num_intervals(&self) -> usize {
        self.marginals.len()
    }

    /// Number of samples of `class` in `interval`.
    #[must_use]
    pub fn count(&self, class: usize, interval: usize) -> u64 {
        assert!(class < self.num_classes, "class index out of range");
        self.counts[interval * self.num_classes + class]
    }

    /// Total number of samples in `interval` (the marginal row).
    #[must_use]
    pub fn marginal(&self, interval: usize) -> u64 {
        self.marginals[interval]
    }

    /// Largest class count in `interval`.
    #[must_use]
    pub fn column_max(&self, interval: usize) -> u64 {
        self.counts[interval * self.num_classes..(interval + 1) * self.num_classes]
            .iter()
            .copied()
            .max()
            .unwrap_or(0)
    }

    /// Sum of all marginals.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.marginals.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64Mcg;

    use super::*;

    fn sample_table() -> OccurrenceTable {
        let values = [1.0, 2.0, 2.0, 5.0, 5.0, 9.0];
        let classes = [0, 0, 1, 1, 0, 1];
        OccurrenceTable::from_pairs(2, classes.into_iter().zip(values))
    }

    #[test]
    fn test_table_collapses_duplicates() {
        let table = sample_table();
        assert_eq!(table.values(), &[1.0, 2.0, 5.0, 9.0]);
        assert_eq!(table.class_counts(0), &[1, 0]);
        assert_eq!(table.class_counts(1), &[1, 1]);
        assert_eq!(table.class_counts(2), &[1, 1]);
        assert_eq!(table.class_counts(3), &[0, 1]);
        assert_eq!(table.total(), 6);
        assert_eq!(table.min(), Some(1.0));
        assert_eq!(table.max(), Some(9.0));
    }

    #[test]
    fn test_table_skips_nan() {
        let table = OccurrenceTable::from_pairs(2, [(0, f64::NAN), (1, 4.0), (0, 4.0)]);
        assert_eq!(table.values(), &[4.0]);
        assert_eq!(table.total(), 2);
    }

    #[test]
    fn test_empty_table() {
        let table = OccurrenceTable::from_pairs(3, []);
        assert!(table.is_empty());
        assert_eq!(table.min(), None);
        assert!(table.midpoints().is_empty());
    }

    #[test]
    #[should_panic(expected = "class index 2 out of range")]
    fn test_table_rejects_unknown_class() {
        let _ = OccurrenceTable::from_pairs(2, [(2, 1.0)]);
    }

    #[test]
    fn test_midpoints() {
        let table = sample_table();
        assert_eq!(table.midpoints(), vec![1.5, 3.5, 7.0]);
    }

    #[test]
    fn test_midpoints_skip_values_without_room_between() {
        let one = 1.0_f64;
        let next = f64::from_bits(one.to_bits() + 1);
        let table = OccurrenceTable::from_pairs(2, [(0, one), (1, next)]);
        assert!(table.midpoints().is_empty());

        let table = OccurrenceTable::from_pairs(
            2,
            [(0, f64::NEG_INFINITY), (1, 0.0), (1, 4.0), (0, f64::INFINITY)],
        );
        assert_eq!(table.midpoints(), vec![2.0]);
    }

    #[test]
    fn test_matrix_two_intervals() {
        let table = sample_table();
        let matrix = QuantaMatrix::build(&table, &[1.0, 3.5, 9.0]);
        assert_eq!(matrix.num_classes(), 2);
        assert_eq!(matrix.num_intervals(), 2);
        assert_eq!(matrix.count(0, 0), 2);
        assert_eq!(matrix.count(1, 0), 1);
        assert_eq!(matrix.count(0, 1), 1);
        assert_eq!(matrix.count(1, 1), 2);
        assert_eq!(matrix.marginal(0), 3);
        assert_eq!(matrix.marginal(1), 3);
        assert_eq!(matrix.column_max(0), 2);
        assert_eq!(matrix.total(), 6);
    }

    #[test]
    fn test_matrix_empty_interval() {
        let table = OccurrenceTable::from_pairs(2, [(0, 1.0), (1, 10.0)]);
        // (4.0, 6.0) contains no candidates
        let matrix = QuantaMatrix::build(&table, &[1.0, 4.0, 6.0, 10.0]);
        assert_eq!(matrix.marginal(1), 0);
        assert_eq!(matrix.column_max(1), 0);
        assert_eq!(matrix.total(), 2);
    }

    #[test]
    fn test_matrix_degenerate_boundaries() {
        let table = OccurrenceTable::from_pairs(2, [(0, 3.0), (1, 3.0), (1, 3.0)]);
        let matrix = QuantaMatrix::build(&table, &[3.0, 3.0]);
        assert_eq!(matrix.num_intervals(), 1);
        assert_eq!(matrix.count(1, 0), 2);
        assert_eq!(matrix.marginal(0), 3);
    }

    #[test]
    fn test_matrix_no_boundaries() {
        let table = sample_table();
        let matrix = QuantaMatrix::build(&table, &[]);
        assert_eq!(matrix.num_intervals(), 0);
        assert_eq!(matrix.total(), 0);
    }

    #[test]
    #[should_panic(expected = "boundaries must be sorted")]
    fn test_matrix_rejects_unsorted_boundaries() {
        let table = sample_table();
        let _ = QuantaMatrix::build(&table, &[9.0, 1.0]);
    }

    #[test]
    fn test_marginals_match_rows_and_total_matches_samples() {
        let mut rng = Pcg64Mcg::seed_from_u64(7);
        let pairs = (0..500)
            .map(|_| (rng.random_range(0..4), f64::from(rng.random_range(0..60_u8))))
            .collect::<Vec<_>>();
        let table = OccurrenceTable::from_pairs(4, pairs.iter().copied());
        let midpoints = table.midpoints();

        let mut boundaries = vec![table.min().unwrap()];
        boundaries.extend(midpoints.iter().step_by(7));
        boundaries.push(table.max().unwrap());

        let matrix = QuantaMatrix::build(&table, &boundaries);
        for interval in 0..matrix.num_intervals() {
            let sum = (0..4).map(|class| matrix.count(class, interval)).sum::<u64>();
            assert_eq!(sum, matrix.marginal(interval));
        }
        assert_eq!(matrix.total(), 500);
    }
}
