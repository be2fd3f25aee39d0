//! Configuration for ingestion, profiling and quality checks.
//!
//! Use [`SiftConfig::builder()`] for a validated configuration, or
//! [`SiftConfig::default()`] for the stock settings.

use crate::error::SiftError;
use crate::utils::DEFAULT_NA_VALUES;
use serde::{Deserialize, Serialize};

/// Default fraction of parseable values that flags a type-mismatch candidate.
pub const DEFAULT_MISMATCH_THRESHOLD: f64 = 0.9;

/// Default number of value counts kept per categorical column.
pub const DEFAULT_TOP_N_VALUES: usize = 5;

/// Default prefix of synthesized column names.
pub const DEFAULT_COLUMN_PREFIX: &str = "Column_";

/// Settings shared by every pipeline stage of a session.
///
/// # Example
///
/// ```rust
/// use tabsift::config::SiftConfig;
///
/// let config = SiftConfig::builder()
///     .mismatch_threshold(0.8)
///     .top_n_values(3)
///     .build()
///     .unwrap();
/// assert_eq!(config.top_n_values, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiftConfig {
    /// Fraction of non-missing values (0.0 exclusive, 1.0 inclusive) that must
    /// parse as numbers or dates before a text column is reported as a
    /// type-mismatch candidate.
    /// Default: 0.9
    pub mismatch_threshold: f64,

    /// Number of most frequent values listed in categorical profiles.
    /// Default: 5
    pub top_n_values: usize,

    /// Text values read as missing when ingesting csv.
    /// Default: the usual spreadsheet markers (`NA`, `null`, `NaN`, `#N/A`, ...)
    pub na_values: Vec<String>,

    /// Prefix of synthesized column names, followed by the column index.
    /// Default: "Column_"
    pub column_prefix: String,
}

impl Default for SiftConfig {
    fn default() -> Self {
        Self {
            mismatch_threshold: DEFAULT_MISMATCH_THRESHOLD,
            top_n_values: DEFAULT_TOP_N_VALUES,
            na_values: default_na_values(),
            column_prefix: DEFAULT_COLUMN_PREFIX.to_string(),
        }
    }
}

fn default_na_values() -> Vec<String> {
    DEFAULT_NA_VALUES.iter().map(|s| s.to_string()).collect()
}

impl SiftConfig {
    /// Create a new configuration builder.
    pub fn builder() -> SiftConfigBuilder {
        SiftConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(self.mismatch_threshold > 0.0 && self.mismatch_threshold <= 1.0) {
            return Err(ConfigValidationError::InvalidThreshold {
                field: "mismatch_threshold".to_string(),
                value: self.mismatch_threshold,
            });
        }

        if self.top_n_values == 0 {
            return Err(ConfigValidationError::InvalidTopN(self.top_n_values));
        }

        if self.column_prefix.trim().is_empty() {
            return Err(ConfigValidationError::EmptyColumnPrefix);
        }

        Ok(())
    }

    /// Synthesized name of the column at `index`.
    pub fn column_name(&self, index: usize) -> String {
        format!("{}{}", self.column_prefix, index)
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid threshold for '{field}': {value} (must be greater than 0.0 and at most 1.0)")]
    InvalidThreshold { field: String, value: f64 },

    #[error("Invalid top-N value count: {0} (must be at least 1)")]
    InvalidTopN(usize),

    #[error("Column prefix must not be empty")]
    EmptyColumnPrefix,
}

impl From<ConfigValidationError> for SiftError {
    fn from(err: ConfigValidationError) -> Self {
        SiftError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`SiftConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct SiftConfigBuilder {
    mismatch_threshold: Option<f64>,
    top_n_values: Option<usize>,
    na_values: Option<Vec<String>>,
    column_prefix: Option<String>,
}

impl SiftConfigBuilder {
    /// Set the type-mismatch threshold.
    ///
    /// # Arguments
    /// * `threshold` - Value in (0.0, 1.0] (e.g., 0.9 = 90% of values parse)
    pub fn mismatch_threshold(mut self, threshold: f64) -> Self {
        self.mismatch_threshold = Some(threshold);
        self
    }

    /// Set how many value counts categorical profiles keep.
    pub fn top_n_values(mut self, n: usize) -> Self {
        self.top_n_values = Some(n);
        self
    }

    /// Replace the csv NA markers.
    pub fn na_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.na_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Set the prefix of synthesized column names.
    pub fn column_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.column_prefix = Some(prefix.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `SiftConfig` or an error if validation fails.
    pub fn build(self) -> Result<SiftConfig, ConfigValidationError> {
        let config = SiftConfig {
            mismatch_threshold: self
                .mismatch_threshold
                .unwrap_or(DEFAULT_MISMATCH_THRESHOLD),
            top_n_values: self.top_n_values.unwrap_or(DEFAULT_TOP_N_VALUES),
            na_values: self.na_values.unwrap_or_else(default_na_values),
            column_prefix: self
                .column_prefix
                .unwrap_or_else(|| DEFAULT_COLUMN_PREFIX.to_string()),
        };

        config.validate()?;
        Ok(config)
    }
}
