//! Error types for the adapter.

use thiserror::Error;

use crate::api::types::StatsGroup;

/// Result type alias using the adapter error type.
pub type Result<T> = std::result::Result<T, XngError>;

/// Main error type for the adapter.
#[derive(Error, Debug)]
pub enum XngError {
    /// The login email resolved to no company, or the login was rejected
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The API answered with a non-success status
    #[error("API request failed with status {status}: {body}")]
    ApiStatus { status: u16, body: String },

    /// A message or variation id had no entry in its stats response
    #[error("No {group} statistics found for id {id}")]
    MissingStatistics { group: StatsGroup, id: String },

    /// An input record lacked the configured segment id field
    #[error("Input record has no field '{0}'")]
    MissingSegmentField(String),

    /// HTTP client error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// General error from anyhow
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
