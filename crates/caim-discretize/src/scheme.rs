//! Discretization schemes
//!
//! An [`AttributeScheme`] is the final boundary set of one attribute. The
//! [`SchemeStore`] holds one [`AttributeSlot`] per attribute of a dataset; it
//! is sized when a fit starts and each eligible slot is written at most once.
//! A [`DiscretizationScheme`] is the store together with the class and
//! attribute metadata it was fitted on, and is what gets saved to disk.

use serde::{Deserialize, Serialize};

use crate::transform::{self, OutputFormat};

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
#[display("boundaries must contain at least two strictly increasing values, got {boundaries:?}")]
pub struct InvalidBoundariesError {
    pub boundaries: Vec<f64>,
}

/// Final boundary set of one attribute.
///
/// Boundaries are sorted, start at the attribute's minimum and end at its
/// maximum. An attribute with a single distinct value `v` has the degenerate
/// boundary set `[v, v]`, which maps every value to bin 0.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "AttributeSchemeRecord")]
pub struct AttributeScheme {
    boundaries: Vec<f64>,
    score: f64,
}

#[derive(Debug, Deserialize)]
struct AttributeSchemeRecord {
    boundaries: Vec<f64>,
    score: f64,
}

impl TryFrom<AttributeSchemeRecord> for AttributeScheme {
    type Error = InvalidBoundariesError;

    fn try_from(record: AttributeSchemeRecord) -> Result<Self, Self::Error> {
        AttributeScheme::new(record.boundaries, record.score)
    }
}

impl AttributeScheme {
    /// Creates a scheme from strictly increasing boundaries and their CAIM
    /// score. The only repeated boundary set accepted is the degenerate
    /// `[v, v]`.
    pub fn new(boundaries: Vec<f64>, score: f64) -> Result<Self, InvalidBoundariesError> {
        let degenerate = boundaries.len() == 2 && boundaries[0] == boundaries[1];
        let valid = boundaries.len() >= 2
            && boundaries.iter().all(|b| !b.is_nan())
            && (degenerate || boundaries.is_sorted_by(|a, b| a < b));
        if !valid {
            return Err(InvalidBoundariesError { boundaries });
        }
        Ok(Self { boundaries, score })
    }

    #[must_use]
    pub fn boundaries(&self) -> &[f64] {
        &self.boundaries
    }

    /// CAIM score of the final boundary set.
    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }

    #[must_use]
    pub fn num_intervals(&self) -> usize {
        self.boundaries.len() - 1
    }

    /// Whether the attribute had a single distinct value.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.boundaries.first() == self.boundaries.last()
    }

    #[must_use]
    pub fn min(&self) -> f64 {
        self.boundaries[0]
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.boundaries[self.boundaries.len() - 1]
    }

    /// Bin of `value`, in `0..num_intervals()`.
    #[must_use]
    pub fn bin_index(&self, value: f64) -> usize {
        transform::bin_index(&self.boundaries, value)
    }

    /// Label of `bin` in the given output format.
    #[must_use]
    pub fn label(&self, bin: usize, format: OutputFormat) -> String {
        match format {
            OutputFormat::Index => bin.to_string(),
            OutputFormat::Interval => transform::interval_label(
                self.boundaries[bin],
                self.boundaries[bin + 1],
                bin + 1 == self.num_intervals(),
            ),
        }
    }

    /// Labels of every bin, in bin order.
    #[must_use]
    pub fn labels(&self, format: OutputFormat) -> Vec<String> {
        (0..self.num_intervals())
            .map(|bin| self.label(bin, format))
            .collect()
    }
}

/// Discretization state of one attribute.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AttributeSlot {
    /// Not discretized: non-numeric, the class attribute, or outside the range
    Skipped,
    /// Eligible, but no scheme was produced (no values, or the search did not
    /// finish in time); transformed as a single bin
    Empty,
    Fitted(AttributeScheme),
}

impl AttributeSlot {
    #[must_use]
    pub fn scheme(&self) -> Option<&AttributeScheme> {
        match self {
            AttributeSlot::Fitted(scheme) => Some(scheme),
            AttributeSlot::Skipped | AttributeSlot::Empty => None,
        }
    }

    #[must_use]
    pub fn is_discretized(&self) -> bool {
        !matches!(self, AttributeSlot::Skipped)
    }
}

/// Per-attribute slots, indexed by attribute position.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct SchemeStore {
    slots: Vec<AttributeSlot>,
}

impl SchemeStore {
    /// Creates a store for `num_attributes` attributes, all skipped.
    #[must_use]
    pub fn new(num_attributes: usize) -> Self {
        Self {
            slots: vec![AttributeSlot::Skipped; num_attributes],
        }
    }

    /// Marks the attribute as eligible; its slot stays empty until filled.
    pub fn reserve(&mut self, index: usize) {
        assert!(
            matches!(self.slots[index], AttributeSlot::Skipped),
            "slot {index} reserved twice"
        );
        self.slots[index] = AttributeSlot::Empty;
    }

    /// Writes the scheme of a reserved attribute.
    ///
    /// # Panics
    ///
    /// Panics if the slot was not reserved or was already filled.
    pub fn fill(&mut self, index: usize, scheme: AttributeScheme) {
        assert!(
            matches!(self.slots[index], AttributeSlot::Empty),
            "slot {index} is not an unfilled reserved slot"
        );
        self.slots[index] = AttributeSlot::Fitted(scheme);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub fn slot(&self, index: usize) -> &AttributeSlot {
        &self.slots[index]
    }

    #[must_use]
    pub fn slots(&self) -> &[AttributeSlot] {
        &self.slots
    }

    /// Number of reserved slots that were never filled.
    #[must_use]
    pub fn num_empty(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot, AttributeSlot::Empty))
            .count()
    }
}

/// A fitted discretization scheme with the metadata it was fitted on.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DiscretizationScheme {
    /// Name of the class attribute
    pub class_attribute: String,
    /// Class labels in quanta matrix row order
    pub class_labels: Vec<String>,
    /// Names of all attributes, in dataset order
    pub attribute_names: Vec<String>,
    pub slots: SchemeStore,
}

impl DiscretizationScheme {
    #[must_use]
    pub fn num_attributes(&self) -> usize {
        self.attribute_names.len()
    }

    /// Scheme of the attribute at `index`, if it was fitted.
    #[must_use]
    pub fn attribute(&self, index: usize) -> Option<&AttributeScheme> {
        self.slots.slot(index).scheme()
    }

    /// Fitted schemes with their attribute index and name.
    pub fn fitted(&self) -> impl Iterator<Item = (usize, &str, &AttributeScheme)> + '_ {
        self.slots
            .slots()
            .iter()
            .zip(&self.attribute_names)
            .enumerate()
            .filter_map(|(index, (slot, name))| Some((index, name.as_str(), slot.scheme()?)))
    }
}
