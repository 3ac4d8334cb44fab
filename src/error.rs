//! Error types for tune-classifier

use thiserror::Error;

/// Crate-wide error type
#[derive(Error, Debug)]
pub enum TuneError {
    /// Sampling was attempted without an active trial handle.
    /// This is a caller bug, not a recoverable runtime condition.
    #[error("an active trial handle is required for sampling")]
    TrialRequired,

    /// Family name not present in the registry
    #[error("unknown estimator family: {0}")]
    UnknownFamily(String),

    /// Malformed domain declaration (empty choices, inverted bounds, ...)
    #[error("invalid domain: {0}")]
    InvalidDomain(String),

    /// A finalized parameter set is missing a required entry
    #[error("missing parameter: {0}")]
    MissingParameter(String),

    /// A finalized parameter set was rejected by an estimator constructor
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// JSON serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Crate-wide result type
pub type Result<T> = std::result::Result<T, TuneError>;
