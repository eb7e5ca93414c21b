//! Supervised CAIM discretization of numeric attributes.
//!
//! Converts the numeric attributes of a labeled dataset into nominal ones by
//! choosing, per attribute, the interval boundaries that maximize the
//! class-attribute interdependence (CAIM) criterion.
//!
//! # Architecture
//!
//! ```text
//! discretizer   CaimDiscretizer: configure, fit, transform
//!   |
//!   +-- range       attribute range selector ("first-3,5,last")
//!   +-- scheduler   one search task per attribute on a worker pool
//!   |     +-- search      greedy CAIM boundary search (BoundarySearch)
//!   +-- scheme      per-attribute boundary sets, serializable
//!   +-- transform   value -> bin mapping and bin labels
//! ```
//!
//! Scoring and the quanta matrix live in `caim-stats`; the dataset model in
//! `caim-dataset`.

pub use self::{
    discretizer::{
        CaimDiscretizer, ConfigurationError, DEFAULT_TIMEOUT, DiscretizeError, DiscretizerConfig,
    },
    range::{AttributeRange, RangeError},
    scheme::{AttributeScheme, AttributeSlot, DiscretizationScheme, SchemeStore},
    search::{BoundarySearch, CaimSearch},
    transform::OutputFormat,
};

pub mod discretizer;
pub mod range;
pub mod scheduler;
pub mod scheme;
pub mod search;
pub mod transform;
