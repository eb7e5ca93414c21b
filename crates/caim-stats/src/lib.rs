//! Statistical building blocks for CAIM discretization.
//!
//! This crate provides:
//!
//! - **Occurrence tables**: Per-class counts of the distinct values of an attribute
//! - **Quanta matrices**: Class-by-interval counts for a candidate boundary set
//! - **CAIM scoring**: The Class-Attribute Interdependence Maximization criterion
//! - **Descriptive statistics**: Summaries of numeric columns for reporting
//!
//! # Modules
//!
//! - [`quanta`]: Occurrence table and quanta matrix construction
//! - [`caim`]: CAIM score of a quanta matrix
//! - [`descriptive`]: Column summaries (count, distinct, min, max, mean, std dev)
//!
//! # Examples
//!
//! ## Scoring a boundary set
//!
//! ```
//! use caim_stats::{caim, quanta::{OccurrenceTable, QuantaMatrix}};
//!
//! let pairs = [(0, 1.0), (0, 2.0), (0, 3.0), (1, 7.0), (1, 9.0)];
//! let table = OccurrenceTable::from_pairs(2, pairs);
//!
//! let one_interval = caim::caim(&QuantaMatrix::build(&table, &[1.0, 9.0]));
//! let split = caim::caim(&QuantaMatrix::build(&table, &[1.0, 5.0, 9.0]));
//! assert!(split > one_interval);
//! ```
//!
//! ## Summarizing a column
//!
//! ```
//! use caim_stats::descriptive::ColumnSummary;
//!
//! let summary = ColumnSummary::new([Some(1.0), Some(2.0), None]).unwrap();
//! assert_eq!(summary.mean, 1.5);
//! ```

pub mod caim;
pub mod descriptive;
pub mod quanta;
