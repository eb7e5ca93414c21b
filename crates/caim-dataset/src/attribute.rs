//! Attribute metadata
//!
//! An attribute is a named column tagged as numeric or nominal. Nominal
//! attributes declare their labels up front; the declaration order is the
//! stable order used wherever labels are indexed (for the class attribute,
//! the rows of a quanta matrix).

use serde::{Deserialize, Serialize};

/// Kind of values an attribute holds.
///
/// Serialized as `"numeric"` or `{"nominal": ["a", "b"]}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    /// Continuous real values
    Numeric,
    /// One of the declared labels, in declaration order
    Nominal(Vec<String>),
}

/// A named column of a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Attribute {
    pub name: String,
    pub kind: AttributeKind,
}

impl Attribute {
    pub fn numeric<S>(name: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            name: name.into(),
            kind: AttributeKind::Numeric,
        }
    }

    pub fn nominal<S, I, L>(name: S, labels: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        Self {
            name: name.into(),
            kind: AttributeKind::Nominal(labels.into_iter().map(Into::into).collect()),
        }
    }

    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self.kind, AttributeKind::Numeric)
    }

    /// Declared labels of a nominal attribute, `None` for numeric ones.
    #[must_use]
    pub fn nominal_values(&self) -> Option<&[String]> {
        match &self.kind {
            AttributeKind::Numeric => None,
            AttributeKind::Nominal(labels) => Some(labels),
        }
    }

    /// Position of `label` among the declared labels.
    #[must_use]
    pub fn label_index(&self, label: &str) -> Option<usize> {
        self.nominal_values()?.iter().position(|l| l == label)
    }
}
