use serde::{Deserialize, Serialize};

/// Transaction name used when none is configured
pub const DEFAULT_TRANSACTION_NAME: &str = "transaction";

/// Settings of a `BasicBusinessDateProvider`
///
/// Table and column names are required by `initialize`; they have no
/// defaults because the table layout belongs to the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Physical name of the business date table
    pub table_name: Option<String>,
    /// Column holding the segment code
    pub segment_column_name: Option<String>,
    /// Column holding the `yyyyMMdd` date
    pub date_column_name: Option<String>,
    /// Segment used by `get_date` when none is given
    pub default_segment: Option<String>,
    /// Cache all segments in the scope on first access
    pub cache_enabled: bool,
    /// Name of the scope connection to join, if the unit of work opened one
    pub transaction_name: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            table_name: None,
            segment_column_name: None,
            date_column_name: None,
            default_segment: None,
            cache_enabled: true,
            transaction_name: DEFAULT_TRANSACTION_NAME.to_string(),
        }
    }
}
