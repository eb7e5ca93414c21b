use caim_discretize::{DiscretizationScheme, DiscretizerConfig};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fitted discretization scheme as saved by `caim fit`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SchemeFile {
    /// Timestamp when the scheme was fitted (ISO 8601 format)
    pub fitted_at: DateTime<Utc>,
    /// Relation name of the training dataset
    pub relation: String,
    /// Settings the scheme was fitted with
    pub config: DiscretizerConfig,
    pub scheme: DiscretizationScheme,
}
