//! Greedy CAIM boundary search
//!
//! Finds the boundary set of one attribute from its
//! [`OccurrenceTable`](caim_stats::quanta::OccurrenceTable).
//!
//! # Algorithm
//!
//! 1. Start with `D = {min, max}` and the candidate set `B` of midpoints
//!    between consecutive distinct values.
//! 2. Score `D ∪ {b}` for every remaining `b ∈ B` and keep the midpoint with
//!    the strictly greatest score (`MaxCAIM`). Candidates are visited in
//!    ascending order, so ties resolve to the smallest midpoint.
//! 3. If no midpoint scored above zero, stop.
//! 4. Stop if `MaxCAIM <= GlobalCAIM` and `D` already has at least as many
//!    intervals as there are classes. Otherwise move the midpoint from `B` to
//!    `D`, set `GlobalCAIM = MaxCAIM` and repeat while `B` is not empty.
//!
//! The interval floor keeps splitting while there are fewer intervals than
//! classes, even when the score does not improve.
//!
//! # Cost
//!
//! Each round evaluates every remaining candidate, and each evaluation is
//! linear in the number of distinct values, so a full search is cubic in the
//! number of distinct values in the worst case and independent of the number
//! of rows.
//!
//! # Examples
//!
//! ```
//! use caim_discretize::search::{BoundarySearch, CaimSearch};
//! use caim_stats::quanta::OccurrenceTable;
//!
//! let values = [1.0, 2.0, 2.0, 5.0, 5.0, 9.0];
//! let classes = [0, 0, 1, 1, 0, 1];
//! let table = OccurrenceTable::from_pairs(2, classes.into_iter().zip(values));
//!
//! let scheme = CaimSearch.build_scheme(&table).unwrap();
//! assert_eq!(scheme.boundaries(), &[1.0, 1.5, 9.0]);
//! ```

use std::fmt;

use caim_stats::{caim, quanta::OccurrenceTable};
use tracing::debug;

use crate::scheme::AttributeScheme;

/// Strategy that turns an occurrence table into a boundary set.
///
/// [`CaimSearch`] is the reference implementation; alternative (for example
/// accelerated) implementations plug into
/// [`CaimDiscretizer::with_search`](crate::CaimDiscretizer::with_search).
pub trait BoundarySearch: fmt::Debug + Send + Sync {
    /// Returns `None` if the table has no candidates.
    fn build_scheme(&self, table: &OccurrenceTable) -> Option<AttributeScheme>;
}

/// Reference greedy CAIM search.
#[derive(Default, Debug, Clone, Copy)]
pub struct CaimSearch;

impl BoundarySearch for CaimSearch {
    fn build_scheme(&self, table: &OccurrenceTable) -> Option<AttributeScheme> {
        search(table).map(|outcome| outcome.scheme)
    }
}

/// One round of the search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchRound {
    /// Best midpoint of the round
    pub midpoint: f64,
    /// Its score (`MaxCAIM`)
    pub score: f64,
    /// Whether it was added to the boundary set
    pub accepted: bool,
}

/// Result of [`search`]: the scheme and the rounds that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub scheme: AttributeScheme,
    pub rounds: Vec<SearchRound>,
}

/// Runs the greedy search, recording every round.
///
/// Returns `None` if the table has no candidates. A table with a single
/// distinct value `v` yields the degenerate boundary set `[v, v]`.
#[must_use]
pub fn search(table: &OccurrenceTable) -> Option<SearchOutcome> {
    let (min, max) = (table.min()?, table.max()?);
    let num_classes = table.num_classes();

    let mut boundaries = vec![min, max];
    let mut remaining = table.midpoints();
    let mut rounds = vec![];
    let mut global_caim = 0.0;
    let mut step = 1;

    while !remaining.is_empty() {
        let Some((position, max_caim)) = best_candidate(table, &boundaries, &remaining) else {
            break;
        };
        let midpoint = remaining[position];

        if should_stop(max_caim, global_caim, step, num_classes) {
            rounds.push(SearchRound {
                midpoint,
                score: max_caim,
                accepted: false,
            });
            break;
        }

        insert_sorted(&mut boundaries, midpoint);
        remaining.remove(position);
        global_caim = max_caim;
        step += 1;
        debug!(midpoint, score = max_caim, intervals = step, "accepted boundary");
        rounds.push(SearchRound {
            midpoint,
            score: max_caim,
            accepted: true,
        });
    }

    let score = caim::caim_for_boundaries(table, &boundaries);
    let scheme = AttributeScheme::new(boundaries, score)
        .expect("search boundaries are sorted and start with min and max");
    Some(SearchOutcome { scheme, rounds })
}

/// Finds the candidate whose insertion into `boundaries` scores highest.
///
/// Returns its position in `candidates` and its score, or `None` if no
/// candidate scores above zero. Ties keep the earliest candidate.
#[must_use]
pub fn best_candidate(
    table: &OccurrenceTable,
    boundaries: &[f64],
    candidates: &[f64],
) -> Option<(usize, f64)> {
    let mut trial = Vec::with_capacity(boundaries.len() + 1);
    let mut best = None;
    let mut best_score = 0.0;

    for (position, &candidate) in candidates.iter().enumerate() {
        trial.clear();
        trial.extend_from_slice(boundaries);
        insert_sorted(&mut trial, candidate);

        let score = caim::caim_for_boundaries(table, &trial);
        if score > best_score {
            best_score = score;
            best = Some(position);
        }
    }

    best.map(|position| (position, best_score))
}

/// Stopping rule: stop once the score no longer improves and there are at
/// least as many intervals (`step`) as classes.
#[must_use]
pub fn should_stop(max_caim: f64, global_caim: f64, step: usize, num_classes: usize) -> bool {
    max_caim <= global_caim && step >= num_classes
}

fn insert_sorted(boundaries: &mut Vec<f64>, value: f64) {
    let at = boundaries.partition_point(|&b| b < value);
    boundaries.insert(at, value);
}

#[cfg(test)]
mod tests {
    use caim_stats::quanta::QuantaMatrix;
    use rand::{Rng, SeedableRng};
    use rand_distr::{Distribution, Normal};
    use rand_pcg::Pcg64Mcg;

    use super::*;

    fn table(values: &[f64], classes: &[usize], num_classes: usize) -> OccurrenceTable {
        OccurrenceTable::from_pairs(num_classes, classes.iter().copied().zip(values.iter().copied()))
    }

    fn random_table(seed: u64, rows: usize, num_classes: usize) -> OccurrenceTable {
        let mut rng = Pcg64Mcg::seed_from_u64(seed);
        let pairs = (0..rows)
            .map(|_| {
                let class = rng.random_range(0..num_classes);
                #[expect(clippy::cast_precision_loss)]
                let mean = class as f64 * 2.0;
                let value = Normal::new(mean, 1.5).unwrap().sample(&mut rng);
                // round so that values repeat
                (class, (value * 4.0).round() / 4.0)
            })
            .collect::<Vec<_>>();
        OccurrenceTable::from_pairs(num_classes, pairs)
    }

    #[test]
    fn test_binary_scenario() {
        let table = table(&[1.0, 2.0, 2.0, 5.0, 5.0, 9.0], &[0, 0, 1, 1, 0, 1], 2);
        let outcome = search(&table).unwrap();
        let boundaries = outcome.scheme.boundaries();

        assert_eq!(boundaries.first(), Some(&1.0));
        assert_eq!(boundaries.last(), Some(&9.0));
        assert!(boundaries.len() >= 3);
        // 1.5 and 7.0 tie in the first round; the smaller one wins
        assert_eq!(boundaries, &[1.0, 1.5, 9.0]);
        assert_eq!(
            outcome.rounds,
            vec![
                SearchRound {
                    midpoint: 1.5,
                    score: 1.4,
                    accepted: true
                },
                SearchRound {
                    midpoint: 7.0,
                    score: 1.0,
                    accepted: false
                },
            ]
        );
        assert_eq!(outcome.scheme.score(), 1.4);
    }

    #[test]
    fn test_single_value_is_degenerate() {
        let table = table(&[3.0, 3.0, 3.0], &[0, 1, 0], 2);
        let scheme = CaimSearch.build_scheme(&table).unwrap();
        assert_eq!(scheme.boundaries(), &[3.0, 3.0]);
        assert!(scheme.is_degenerate());
    }

    #[test]
    fn test_empty_table() {
        let table = table(&[], &[], 2);
        assert_eq!(search(&table), None);
    }

    #[test]
    fn test_separable_classes() {
        let table = table(
            &[1.0, 2.0, 3.0, 10.0, 11.0, 12.0, 20.0, 21.0],
            &[0, 0, 0, 1, 1, 1, 2, 2],
            3,
        );
        let outcome = search(&table).unwrap();
        // the C split scores 2.5 against 2.4 for the A split, so it goes first
        assert_eq!(outcome.rounds[0].midpoint, 16.0);
        assert_eq!(outcome.scheme.boundaries(), &[1.0, 6.5, 16.0, 21.0]);
        assert!(outcome.rounds.last().is_some_and(|round| !round.accepted));
    }

    #[test]
    fn test_floor_forces_splits_without_improvement() {
        // four classes, fully mixed values: the floor keeps adding boundaries
        // until there are four intervals
        let mixed = table(
            &[1.0, 1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 2.0, 3.0, 3.0, 3.0, 3.0, 4.0, 4.0, 4.0, 4.0, 5.0],
            &[0, 1, 2, 3, 0, 1, 2, 3, 0, 1, 2, 3, 0, 1, 2, 3, 0],
            4,
        );
        assert!(CaimSearch.build_scheme(&mixed).unwrap().num_intervals() >= 4);
    }

    #[test]
    fn test_should_stop() {
        assert!(should_stop(1.0, 1.0, 2, 2));
        assert!(should_stop(0.5, 1.0, 3, 2));
        assert!(!should_stop(1.5, 1.0, 3, 2));
        assert!(!should_stop(0.5, 1.0, 1, 2));
    }

    #[test]
    fn test_best_candidate_none_for_empty_candidates() {
        let table = table(&[1.0, 2.0], &[0, 1], 2);
        assert_eq!(best_candidate(&table, &[1.0, 2.0], &[]), None);
    }

    #[test]
    fn test_rounds_match_brute_force() {
        for seed in 0..5 {
            let table = random_table(seed, 200, 3);
            let outcome = search(&table).unwrap();

            let mut boundaries = vec![table.min().unwrap(), table.max().unwrap()];
            let mut remaining = table.midpoints();
            for round in &outcome.rounds {
                let scores = remaining
                    .iter()
                    .map(|&candidate| {
                        let mut trial = boundaries.clone();
                        trial.push(candidate);
                        trial.sort_by(f64::total_cmp);
                        caim::caim_for_boundaries(&table, &trial)
                    })
                    .collect::<Vec<_>>();
                let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let first = scores.iter().position(|&s| s == max).unwrap();

                assert!(round.score >= 0.0);
                assert_eq!(round.score, max);
                assert_eq!(round.midpoint, remaining[first]);

                if round.accepted {
                    boundaries.push(round.midpoint);
                    boundaries.sort_by(f64::total_cmp);
                    remaining.remove(first);
                }
            }
            assert_eq!(boundaries, outcome.scheme.boundaries());
        }
    }

    #[test]
    fn test_boundaries_strictly_increase() {
        for seed in 10..15 {
            let table = random_table(seed, 300, 4);
            let scheme = CaimSearch.build_scheme(&table).unwrap();
            let boundaries = scheme.boundaries();
            assert!(boundaries.windows(2).all(|w| w[0] < w[1]));
            assert_eq!(boundaries[0], table.min().unwrap());
            assert_eq!(boundaries[boundaries.len() - 1], table.max().unwrap());
        }
    }

    #[test]
    fn test_infinite_values() {
        let values = [f64::NEG_INFINITY, f64::INFINITY, f64::INFINITY];
        let outcome = search(&table(&values, &[0, 1, 1], 2)).unwrap();
        assert_eq!(outcome.scheme.boundaries(), &[f64::NEG_INFINITY, f64::INFINITY]);

        let table = table(&[f64::NEG_INFINITY, 0.0, 4.0, f64::INFINITY], &[0, 0, 1, 1], 2);
        let scheme = CaimSearch.build_scheme(&table).unwrap();
        assert_eq!(scheme.boundaries(), &[f64::NEG_INFINITY, 2.0, f64::INFINITY]);
        assert_eq!(scheme.score(), 2.0);
    }

    #[test]
    fn test_adjacent_floats_keep_every_row() {
        let one = 1.0_f64;
        let next = f64::from_bits(one.to_bits() + 1);
        let table = table(&[one, next], &[0, 1], 2);
        let scheme = CaimSearch.build_scheme(&table).unwrap();
        let boundaries = scheme.boundaries();

        assert_eq!(boundaries, &[one, next]);
        assert!(boundaries.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(QuantaMatrix::build(&table, boundaries).total(), 2);
    }

    #[test]
    fn test_interval_floor() {
        for seed in 20..25 {
            let table = random_table(seed, 150, 4);
            let scheme = CaimSearch.build_scheme(&table).unwrap();
            let floor = usize::min(4, table.midpoints().len() + 1);
            assert!(scheme.num_intervals() >= floor);
        }
    }
}
