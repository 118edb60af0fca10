//! Error types for normalization.

use thiserror::Error;

/// Conditions that stop a normalization run.
///
/// Everything else (undecodable bytes, failing conversions, unknown node
/// kinds) is recovered in place and reported as a
/// [`NormalizeIssue`](crate::NormalizeIssue) instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// The tree nests deeper than the configured guard. Well-formed trees
    /// never get here; this points at a self-referencing conversion or a
    /// corrupt decoder.
    #[error("maximum nesting depth {max_depth} exceeded at {path}")]
    DepthExceeded { max_depth: usize, path: String },

    /// Two entries of one record share an output key (strict mode only).
    #[error("duplicate key '{key}' in record at {path}")]
    KeyCollision { key: String, path: String },

    /// Options failed validation or could not be parsed.
    #[error("invalid normalizer options: {message}")]
    InvalidOptions { message: String },
}

/// Result type alias for normalization.
pub type Result<T> = std::result::Result<T, NormalizeError>;

impl NormalizeError {
    /// Create a DepthExceeded error.
    pub fn depth_exceeded(max_depth: usize, path: impl Into<String>) -> Self {
        Self::DepthExceeded {
            max_depth,
            path: path.into(),
        }
    }

    /// Create a KeyCollision error.
    pub fn key_collision(key: impl Into<String>, path: impl Into<String>) -> Self {
        Self::KeyCollision {
            key: key.into(),
            path: path.into(),
        }
    }

    /// Create an InvalidOptions error.
    pub fn invalid_options(message: impl Into<String>) -> Self {
        Self::InvalidOptions {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for NormalizeError {
    fn from(error: serde_json::Error) -> Self {
        Self::invalid_options(error.to_string())
    }
}
