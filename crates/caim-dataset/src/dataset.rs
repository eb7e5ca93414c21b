//! In-memory labeled dataset
//!
//! # JSON Form
//!
//! ```json
//! {
//!   "relation": "iris",
//!   "attributes": [
//!     { "name": "petal_length", "kind": "numeric" },
//!     { "name": "class", "kind": { "nominal": ["setosa", "versicolor"] } }
//!   ],
//!   "rows": [
//!     [1.4, "setosa"],
//!     [null, "versicolor"]
//!   ]
//! }
//! ```
//!
//! `null` cells are missing values. Deserialization validates every row
//! against the declared attributes (see [`DatasetError`]).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::attribute::{Attribute, AttributeKind};

/// A single cell.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Label(String),
    Missing,
}

impl Value {
    /// The numeric value, `None` for labels, missing cells and `NaN`.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(v) if !v.is_nan() => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_label(&self) -> Option<&str> {
        match self {
            Value::Label(label) => Some(label),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Missing => true,
            Value::Number(v) => v.is_nan(),
            Value::Label(_) => false,
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<Option<f64>> for Value {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Value::Missing, Value::Number)
    }
}

impl From<String> for Value {
    fn from(label: String) -> Self {
        Value::Label(label)
    }
}

impl From<&str> for Value {
    fn from(label: &str) -> Self {
        Value::Label(label.to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum DatasetError {
    #[display("duplicate attribute name '{name}'")]
    DuplicateAttribute { name: String },
    #[display("nominal attribute '{attribute}' declares label '{label}' more than once")]
    DuplicateLabel { attribute: String, label: String },
    #[display("row {row} has {actual} values, expected {expected}")]
    RowWidthMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[display("row {row}: value of attribute '{attribute}' does not match its kind")]
    TypeMismatch { row: usize, attribute: String },
    #[display("row {row}: label '{label}' is not declared by attribute '{attribute}'")]
    UndeclaredLabel {
        row: usize,
        attribute: String,
        label: String,
    },
}

/// Read-only access to a labeled dataset.
///
/// This is everything the discretization engine needs from a dataset; any
/// tabular representation can be discretized by implementing it.
pub trait DatasetView {
    fn num_rows(&self) -> usize;

    fn attributes(&self) -> &[Attribute];

    /// Numeric value of a cell, `None` if missing or not numeric.
    fn number(&self, row: usize, attribute: usize) -> Option<f64>;

    /// Label of a cell, `None` if missing or not nominal.
    fn label(&self, row: usize, attribute: usize) -> Option<&str>;

    fn num_attributes(&self) -> usize {
        self.attributes().len()
    }

    fn attribute(&self, index: usize) -> &Attribute {
        &self.attributes()[index]
    }

    fn attribute_index(&self, name: &str) -> Option<usize> {
        self.attributes().iter().position(|a| a.name == name)
    }

    /// Declared labels of a nominal attribute in their stable order.
    fn nominal_values(&self, attribute: usize) -> Option<&[String]> {
        self.attribute(attribute).nominal_values()
    }
}

/// A validated in-memory dataset.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "DatasetRecord")]
pub struct Dataset {
    relation: String,
    attributes: Vec<Attribute>,
    rows: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct DatasetRecord {
    #[serde(default)]
    relation: String,
    attributes: Vec<Attribute>,
    rows: Vec<Vec<Value>>,
}

impl TryFrom<DatasetRecord> for Dataset {
    type Error = DatasetError;

    fn try_from(record: DatasetRecord) -> Result<Self, Self::Error> {
        Dataset::new(record.relation, record.attributes, record.rows)
    }
}

impl Dataset {
    /// Creates a dataset, validating every row against `attributes`.
    ///
    /// # Examples
    ///
    /// ```
    /// use caim_dataset::{Attribute, Dataset, DatasetView, Value};
    ///
    /// let dataset = Dataset::new(
    ///     "toy",
    ///     vec![Attribute::numeric("x"), Attribute::nominal("class", ["a", "b"])],
    ///     vec![
    ///         vec![Value::from(1.0), Value::from("a")],
    ///         vec![Value::Missing, Value::from("b")],
    ///     ],
    /// )
    /// .unwrap();
    /// assert_eq!(dataset.num_rows(), 2);
    /// assert_eq!(dataset.number(1, 0), None);
    /// assert_eq!(dataset.label(1, 1), Some("b"));
    /// ```
    pub fn new<S>(
        relation: S,
        attributes: Vec<Attribute>,
        rows: Vec<Vec<Value>>,
    ) -> Result<Self, DatasetError>
    where
        S: Into<String>,
    {
        let mut names = HashSet::new();
        for attribute in &attributes {
            if !names.insert(attribute.name.as_str()) {
                return Err(DatasetError::DuplicateAttribute {
                    name: attribute.name.clone(),
                });
            }
            if let Some(labels) = attribute.nominal_values() {
                let mut seen = HashSet::new();
                if let Some(label) = labels.iter().find(|l| !seen.insert(l.as_str())) {
                    return Err(DatasetError::DuplicateLabel {
                        attribute: attribute.name.clone(),
                        label: label.clone(),
                    });
                }
            }
        }

        for (row_index, row) in rows.iter().enumerate() {
            validate_row(row_index, row, &attributes)?;
        }

        Ok(Self {
            relation: relation.into(),
            attributes,
            rows,
        })
    }

    #[must_use]
    pub fn relation(&self) -> &str {
        &self.relation
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    #[must_use]
    pub fn row(&self, index: usize) -> &[Value] {
        &self.rows[index]
    }

    /// Cells of one attribute, top to bottom.
    pub fn column(&self, attribute: usize) -> impl Iterator<Item = &Value> + '_ {
        self.rows.iter().map(move |row| &row[attribute])
    }
}

fn validate_row(
    row_index: usize,
    row: &[Value],
    attributes: &[Attribute],
) -> Result<(), DatasetError> {
    if row.len() != attributes.len() {
        return Err(DatasetError::RowWidthMismatch {
            row: row_index,
            expected: attributes.len(),
            actual: row.len(),
        });
    }

    for (value, attribute) in row.iter().zip(attributes) {
        match (&attribute.kind, value) {
            (_, Value::Missing) | (AttributeKind::Numeric, Value::Number(_)) => {}
            (AttributeKind::Nominal(labels), Value::Label(label)) => {
                if !labels.contains(label) {
                    return Err(DatasetError::UndeclaredLabel {
                        row: row_index,
                        attribute: attribute.name.clone(),
                        label: label.clone(),
                    });
                }
            }
            _ => {
                return Err(DatasetError::TypeMismatch {
                    row: row_index,
                    attribute: attribute.name.clone(),
                });
            }
        }
    }
    Ok(())
}

impl DatasetView for Dataset {
    fn num_rows(&self) -> usize {
        self.rows.len()
    }

    fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    fn number(&self, row: usize, attribute: usize) -> Option<f64> {
        self.rows[row][attribute].as_number()
    }

    fn label(&self, row: usize, attribute: usize) -> Option<&str> {
        self.rows[row][attribute].as_label()
    }
}
