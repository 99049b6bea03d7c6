//! Error types for environment resolution.

use thiserror::Error;

/// Result type alias for resolution operations.
pub type ConfigResult<T> = Result<T, ConfigurationError>;

/// Everything that can go wrong while resolving names, profiles, or tags.
///
/// None of these are retryable: they all mean the inputs are wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("unknown environment label: {0:?} (expected dev, staging, or prod)")]
    UnknownEnvironment(String),

    #[error("unknown resource role: {0:?}")]
    UnknownRole(String),

    #[error("invalid uniqueness token {token:?}: {reason}")]
    InvalidToken { token: String, reason: String },

    #[error("invalid project prefix {prefix:?}: {reason}")]
    InvalidPrefix { prefix: String, reason: String },

    #[error("{role} name {name:?} is {len} characters, limit is {max}")]
    NameTooLong {
        role: String,
        name: String,
        len: usize,
        max: usize,
    },

    #[error("{role} name {name:?} is invalid: {reason}")]
    InvalidName {
        role: String,
        name: String,
        reason: String,
    },

    #[error("tag {key:?} already set to {existing:?}, refusing to overwrite with {incoming:?}")]
    TagConflict {
        key: String,
        existing: String,
        incoming: String,
    },

    #[error("invalid tag {key:?}: {reason}")]
    InvalidTag { key: String, reason: String },
}
