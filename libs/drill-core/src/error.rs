//! Error types for drill-core.

use thiserror::Error;

/// Result type alias using SelectorError.
pub type Result<T> = std::result::Result<T, SelectorError>;

/// Errors that can occur while configuring or querying the selector.
#[derive(Debug, Error)]
pub enum SelectorError {
    /// Selection needs at least one candidate.
    #[error("candidate pool is empty")]
    EmptyPool,

    #[error("invalid config field {field}: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("malformed config: {0}")]
    Config(#[from] serde_json::Error),
}

impl SelectorError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}
