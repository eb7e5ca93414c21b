//! CAIM (Class-Attribute Interdependence Maximization) criterion
//!
//! For a quanta matrix with `C` interval columns:
//!
//! ```text
//! CAIM = (1 / C) * Σ_col max_row(col)² / marginal(col)
//! ```
//!
//! where `max_row(col)` is the largest class count in the column. The score
//! rewards boundary sets whose intervals are each dominated by one class, and
//! the `1 / C` factor penalizes adding intervals.
//!
//! A column with a zero marginal (an interval without samples) contributes 0.
//!
//! Reference: L. A. Kurgan, K. J. Cios, "CAIM Discretization Algorithm",
//! IEEE Transactions on Knowledge and Data Engineering 16(2), 145-153, 2004.

use crate::quanta::{OccurrenceTable, QuantaMatrix};

/// Computes the CAIM score of a quanta matrix.
///
/// Returns 0 for a matrix without intervals.
///
/// # Examples
///
/// ```
/// use caim_stats::{caim, quanta::{OccurrenceTable, QuantaMatrix}};
///
/// let table = OccurrenceTable::from_pairs(2, [(0, 1.0), (0, 2.0), (1, 8.0), (1, 9.0)]);
/// let matrix = QuantaMatrix::build(&table, &[1.0, 5.0, 9.0]);
/// // Both intervals are pure: (2²/2 + 2²/2) / 2
/// assert_eq!(caim::caim(&matrix), 2.0);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn caim(matrix: &QuantaMatrix) -> f64 {
    let num_intervals = matrix.num_intervals();
    if num_intervals == 0 {
        return 0.0;
    }

    let sum = (0..num_intervals)
        .map(|interval| {
            let marginal = matrix.marginal(interval);
            if marginal == 0 {
                return 0.0;
            }
            let max = matrix.column_max(interval) as f64;
            max * (max / marginal as f64)
        })
        .sum::<f64>();
    sum / num_intervals as f64
}

/// Builds the quanta matrix for `boundaries` and scores it.
#[must_use]
pub fn caim_for_boundaries(table: &OccurrenceTable, boundaries: &[f64]) -> f64 {
    caim(&QuantaMatrix::build(table, boundaries))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pure_intervals() {
        let table = OccurrenceTable::from_pairs(2, [(0, 1.0), (0, 2.0), (1, 8.0), (1, 9.0)]);
        assert_eq!(caim_for_boundaries(&table, &[1.0, 5.0, 9.0]), 2.0);
    }

    #[test]
    fn test_single_interval() {
        let table = OccurrenceTable::from_pairs(2, [(0, 1.0), (0, 2.0), (1, 8.0), (1, 9.0)]);
        // max = 2, marginal = 4 => 2 * 2 / 4 = 1
        assert_eq!(caim_for_boundaries(&table, &[1.0, 9.0]), 1.0);
    }

    #[test]
    fn test_zero_marginal_contributes_nothing() {
        let table = OccurrenceTable::from_pairs(2, [(0, 1.0), (1, 10.0)]);
        let score = caim_for_boundaries(&table, &[1.0, 4.0, 6.0, 10.0]);
        // (1 + 0 + 1) / 3
        assert!((score - 2.0 / 3.0).abs() < 1e-12);
        assert!(score.is_finite());
    }

    #[test]
    fn test_no_intervals() {
        let table = OccurrenceTable::from_pairs(2, [(0, 1.0)]);
        assert_eq!(caim_for_boundaries(&table, &[]), 0.0);
        assert_eq!(caim_for_boundaries(&table, &[1.0]), 0.0);
    }

    #[test]
    fn test_empty_table_scores_zero() {
        let table = OccurrenceTable::from_pairs(2, []);
        assert_eq!(caim_for_boundaries(&table, &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn test_score_is_non_negative() {
        let table = OccurrenceTable::from_pairs(
            3,
            [(0, 1.0), (1, 1.0), (2, 2.0), (0, 3.0), (1, 4.0), (2, 4.0)],
        );
        for boundaries in [
            vec![1.0, 4.0],
            vec![1.0, 1.5, 4.0],
            vec![1.0, 2.5, 3.5, 4.0],
            vec![1.0, 1.5, 2.5, 3.5, 4.0],
        ] {
            assert!(caim_for_boundaries(&table, &boundaries) >= 0.0);
        }
    }
}
