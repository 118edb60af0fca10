//! Error types for building tagged trees.

use thiserror::Error;

/// Errors raised while constructing or converting tree nodes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A tag string could not be parsed.
    #[error("invalid tag '{input}': {message}")]
    InvalidTag { input: String, message: String },

    /// An element key was empty.
    #[error("element key must not be empty")]
    EmptyKey,

    /// Date components do not form a calendar date.
    #[error("invalid date {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    /// Time components do not form a time of day.
    #[error("invalid time {hour:02}:{minute:02}:{second:02}.{microsecond:06}")]
    InvalidTime {
        hour: u32,
        minute: u32,
        second: u32,
        microsecond: u32,
    },

    /// A DICOM DA, TM or DT string could not be parsed.
    #[error("invalid {vr} value '{input}'")]
    InvalidTemporal { vr: &'static str, input: String },

    /// A dictionary conversion on an opaque node failed.
    #[error("{method}() failed: {message}")]
    Conversion { method: String, message: String },
}

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

impl ModelError {
    /// Create an InvalidTag error.
    pub fn invalid_tag(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidTag {
            input: input.into(),
            message: message.into(),
        }
    }

    /// Create an InvalidTemporal error.
    pub fn invalid_temporal(vr: &'static str, input: impl Into<String>) -> Self {
        Self::InvalidTemporal {
            vr,
            input: input.into(),
        }
    }

    /// Create a Conversion error.
    pub fn conversion(method: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Conversion {
            method: method.into(),
            message: message.into(),
        }
    }
}
