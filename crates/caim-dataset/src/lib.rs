//! Labeled tabular datasets for CAIM discretization
//!
//! This crate holds the data side of the workspace: attribute metadata, an
//! in-memory validated [`Dataset`], and the read-only [`DatasetView`] trait
//! through which the discretization engine consumes data.
//!
//! # Data Structure
//!
//! ```text
//! Dataset
//! ├─ relation name
//! ├─ attributes: Vec<Attribute>
//! │   ├─ name
//! │   └─ kind: numeric | nominal(labels)
//! └─ rows: Vec<Vec<Value>>
//!     └─ number | label | missing
//! ```
//!
//! # Examples
//!
//! ```
//! use caim_dataset::{Attribute, Dataset, DatasetView};
//!
//! let json = r#"{
//!     "relation": "toy",
//!     "attributes": [
//!         { "name": "x", "kind": "numeric" },
//!         { "name": "class", "kind": { "nominal": ["a", "b"] } }
//!     ],
//!     "rows": [[1.0, "a"], [2.0, "b"]]
//! }"#;
//! let dataset: Dataset = serde_json::from_str(json).unwrap();
//! assert_eq!(dataset.attribute(0), &Attribute::numeric("x"));
//! assert_eq!(dataset.label(1, 1), Some("b"));
//! ```

pub use self::{
    attribute::{Attribute, AttributeKind},
    dataset::{Dataset, DatasetError, DatasetView, Value},
};

pub mod attribute;
pub mod dataset;
