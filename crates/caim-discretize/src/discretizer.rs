//! Discretizer facade
//!
//! [`CaimDiscretizer`] ties the pieces together:
//!
//! ```text
//! DiscretizerConfig --new--> CaimDiscretizer --fit(dataset)--> DiscretizationScheme
//!                                            --transform(dataset)--> discretized Dataset
//! ```
//!
//! Fitting resolves the class attribute, selects the numeric attributes inside
//! the configured range, and searches their boundaries on a worker pool. The
//! resulting scheme can be saved and applied to other datasets with the same
//! attributes through [`CaimDiscretizer::from_scheme`].

use std::{num::NonZeroUsize, sync::Arc, time::Duration};

use caim_dataset::{Attribute, Dataset, DatasetError, DatasetView, Value};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    range::{AttributeRange, RangeError},
    scheduler::{self, AttributeColumn, WorkerPool},
    scheme::{DiscretizationScheme, SchemeStore},
    search::{BoundarySearch, CaimSearch},
    transform::{self, OutputFormat},
};

/// How long a fit waits for its workers by default (30 days).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Discretizer settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DiscretizerConfig {
    /// Attributes to discretize, e.g. `first-3,5,last`
    pub attribute_range: String,
    pub output_format: OutputFormat,
    /// Name of the nominal class attribute
    pub class_attribute: String,
    /// Worker count; `None` uses the available parallelism
    pub threads: Option<NonZeroUsize>,
    /// How long a fit waits for its workers
    pub timeout: Duration,
}

impl Default for DiscretizerConfig {
    fn default() -> Self {
        Self {
            attribute_range: AttributeRange::all().to_string(),
            output_format: OutputFormat::default(),
            class_attribute: "class".to_owned(),
            threads: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigurationError {
    #[display("invalid attribute range: {_0}")]
    InvalidRange(RangeError),
    #[display("class attribute '{name}' not found")]
    MissingClassAttribute { name: String },
    #[display("class attribute '{name}' is not nominal")]
    ClassNotNominal { name: String },
}

impl From<RangeError> for ConfigurationError {
    fn from(error: RangeError) -> Self {
        ConfigurationError::InvalidRange(error)
    }
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum DiscretizeError {
    #[display("{_0}")]
    Configuration(ConfigurationError),
    #[display("discretizer has not been fitted")]
    NotFitted,
    #[display("row has {actual} values, expected {expected}")]
    RowWidthMismatch { expected: usize, actual: usize },
    #[display("dataset attributes {actual:?} differ from the fitted attributes {expected:?}")]
    SchemeMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },
    #[display("invalid discretized dataset: {_0}")]
    Dataset(DatasetError),
}

impl From<ConfigurationError> for DiscretizeError {
    fn from(error: ConfigurationError) -> Self {
        DiscretizeError::Configuration(error)
    }
}

impl From<DatasetError> for DiscretizeError {
    fn from(error: DatasetError) -> Self {
        DiscretizeError::Dataset(error)
    }
}

/// Supervised CAIM discretizer.
///
/// # Examples
///
/// ```
/// use caim_dataset::{Attribute, Dataset, Value};
/// use caim_discretize::{CaimDiscretizer, DiscretizerConfig};
///
/// let dataset = Dataset::new(
///     "toy",
///     vec![Attribute::numeric("x"), Attribute::nominal("class", ["A", "B"])],
///     [(1.0, "A"), (2.0, "A"), (2.0, "B"), (5.0, "B"), (5.0, "A"), (9.0, "B")]
///         .into_iter()
///         .map(|(x, class)| vec![Value::from(x), Value::from(class)])
///         .collect(),
/// )
/// .unwrap();
///
/// let mut discretizer = CaimDiscretizer::new(DiscretizerConfig::default()).unwrap();
/// let scheme = discretizer.fit(&dataset).unwrap();
/// assert_eq!(scheme.attribute(0).unwrap().boundaries(), &[1.0, 1.5, 9.0]);
///
/// let row = discretizer.transform_row(&[Value::from(5.0), Value::from("A")]).unwrap();
/// assert_eq!(row, vec![Value::from("[1.5-9.0]"), Value::from("A")]);
/// ```
#[derive(Debug, Clone)]
pub struct CaimDiscretizer {
    config: DiscretizerConfig,
    range: AttributeRange,
    search: Arc<dyn BoundarySearch>,
    scheme: Option<DiscretizationScheme>,
}

impl CaimDiscretizer {
    /// Creates an unfitted discretizer using [`CaimSearch`].
    pub fn new(config: DiscretizerConfig) -> Result<Self, ConfigurationError> {
        let range = config.attribute_range.parse()?;
        Ok(Self {
            config,
            range,
            search: Arc::new(CaimSearch),
            scheme: None,
        })
    }

    /// Creates a discretizer that applies a previously fitted scheme.
    pub fn from_scheme(
        config: DiscretizerConfig,
        scheme: DiscretizationScheme,
    ) -> Result<Self, ConfigurationError> {
        let mut discretizer = Self::new(config)?;
        discretizer.scheme = Some(scheme);
        Ok(discretizer)
    }

    /// Replaces the boundary search strategy.
    #[must_use]
    pub fn with_search(mut self, search: Arc<dyn BoundarySearch>) -> Self {
        self.search = search;
        self
    }

    #[must_use]
    pub fn config(&self) -> &DiscretizerConfig {
        &self.config
    }

    /// The fitted scheme, `None` before the first successful fit.
    #[must_use]
    pub fn scheme(&self) -> Option<&DiscretizationScheme> {
        self.scheme.as_ref()
    }

    /// Fits boundaries for every eligible attribute of `view`.
    ///
    /// An attribute is eligible if it is numeric, selected by the attribute
    /// range and not the class attribute. Rows with a missing class are
    /// ignored. On error the previous scheme, if any, is kept.
    pub fn fit<V>(&mut self, view: &V) -> Result<&DiscretizationScheme, DiscretizeError>
    where
        V: DatasetView + ?Sized,
    {
        let class_name = &self.config.class_attribute;
        let class_index = view.attribute_index(class_name).ok_or_else(|| {
            ConfigurationError::MissingClassAttribute {
                name: class_name.clone(),
            }
        })?;
        let class_labels = view
            .nominal_values(class_index)
            .ok_or_else(|| ConfigurationError::ClassNotNominal {
                name: class_name.clone(),
            })?
            .to_vec();

        let classes = (0..view.num_rows())
            .map(|row| {
                let label = view.label(row, class_index)?;
                class_labels.iter().position(|l| l == label)
            })
            .collect::<Arc<[_]>>();

        let num_attributes = view.num_attributes();
        let mut store = SchemeStore::new(num_attributes);
        let mut columns = vec![];
        for index in self.range.indices(num_attributes) {
            if index == class_index || !view.attribute(index).is_numeric() {
                continue;
            }
            store.reserve(index);
            columns.push(AttributeColumn::from_view(
                view,
                index,
                Arc::clone(&classes),
                class_labels.len(),
            ));
        }

        let pool = WorkerPool::new(self.config.threads, self.config.timeout);
        info!(
            attributes = columns.len(),
            rows = view.num_rows(),
            classes = class_labels.len(),
            threads = pool.threads().get(),
            "fitting"
        );
        let num_columns = columns.len();
        let fitted = scheduler::search_all(&pool, Arc::clone(&self.search), columns, &mut store);
        info!(fitted, empty = num_columns - fitted, "fit finished");

        let scheme = DiscretizationScheme {
            class_attribute: class_name.clone(),
            class_labels,
            attribute_names: view.attributes().iter().map(|a| a.name.clone()).collect(),
            slots: store,
        };
        Ok(&*self.scheme.insert(scheme))
    }

    fn fitted(&self) -> Result<&DiscretizationScheme, DiscretizeError> {
        self.scheme.as_ref().ok_or(DiscretizeError::NotFitted)
    }

    /// Discretizes one row laid out like the fitted dataset.
    pub fn transform_row(&self, row: &[Value]) -> Result<Vec<Value>, DiscretizeError> {
        let scheme = self.fitted()?;
        if row.len() != scheme.num_attributes() {
            return Err(DiscretizeError::RowWidthMismatch {
                expected: scheme.num_attributes(),
                actual: row.len(),
            });
        }
        Ok(row
            .iter()
            .zip(scheme.slots.slots())
            .map(|(value, slot)| transform::transform_value(value, slot, self.config.output_format))
            .collect())
    }

    /// Attributes of the discretized form of a dataset with `input`
    /// attributes.
    pub fn output_attributes(
        &self,
        input: &[Attribute],
    ) -> Result<Vec<Attribute>, DiscretizeError> {
        let scheme = self.fitted()?;
        let matches = input.len() == scheme.num_attributes()
            && input
                .iter()
                .zip(&scheme.attribute_names)
                .all(|(attribute, name)| attribute.name == *name);
        if !matches {
            return Err(DiscretizeError::SchemeMismatch {
                expected: scheme.attribute_names.clone(),
                actual: input.iter().map(|a| a.name.clone()).collect(),
            });
        }
        Ok(input
            .iter()
            .zip(scheme.slots.slots())
            .map(|(attribute, slot)| {
                transform::output_attribute(attribute, slot, self.config.output_format)
            })
            .collect())
    }

    /// Discretizes a whole dataset.
    pub fn transform(&self, dataset: &Dataset) -> Result<Dataset, DiscretizeError> {
        let attributes = self.output_attributes(dataset.attributes())?;
        let rows = dataset
            .rows()
            .iter()
            .map(|row| self.transform_row(row))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Dataset::new(dataset.relation(), attributes, rows)?)
    }
}
