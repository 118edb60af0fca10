//! Recovered events collected during a normalization run.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Category of a recovered event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// A dictionary conversion on an opaque node failed; the next strategy
    /// was tried.
    ConversionFailed,
    /// Binary content was not valid UTF-8 and was decoded with replacement
    /// characters.
    InvalidUtf8Replaced,
    /// An opaque node was resolved through the fallback chain.
    UnrecognizedType,
    /// A later record entry replaced an earlier one with the same key.
    KeyOverwritten,
    /// A NaN or infinite float was emitted as a string.
    NonFiniteFloat,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::ConversionFailed => "conversion_failed",
            IssueKind::InvalidUtf8Replaced => "invalid_utf8_replaced",
            IssueKind::UnrecognizedType => "unrecognized_type",
            IssueKind::KeyOverwritten => "key_overwritten",
            IssueKind::NonFiniteFloat => "non_finite_float",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recovered event, located by its path in the source tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeIssue {
    pub kind: IssueKind,
    /// `$`-rooted path, e.g. `$.ReferencedImageSequence[0].(0009,1001)`.
    pub path: String,
    pub detail: String,
}

impl fmt::Display for NormalizeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}: {}", self.kind, self.path, self.detail)
    }
}

/// Normalized value plus everything that was recovered along the way.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizeOutcome {
    pub value: Value,
    pub issues: Vec<NormalizeIssue>,
}

impl NormalizeOutcome {
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Number of issues of `kind`.
    pub fn count(&self, kind: IssueKind) -> usize {
        self.issues.iter().filter(|issue| issue.kind == kind).count()
    }

    pub fn into_value(self) -> Value {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_counts_by_kind() {
        let outcome = NormalizeOutcome {
            value: Value::Null,
            issues: vec![
                NormalizeIssue {
                    kind: IssueKind::ConversionFailed,
                    path: "$.A".to_string(),
                    detail: "to_dict() failed: boom".to_string(),
                },
                NormalizeIssue {
                    kind: IssueKind::UnrecognizedType,
                    path: "$.A".to_string(),
                    detail: "Widget resolved via string representation".to_string(),
                },
            ],
        };
        assert!(outcome.has_issues());
        assert_eq!(outcome.count(IssueKind::ConversionFailed), 1);
        assert_eq!(outcome.count(IssueKind::KeyOverwritten), 0);
    }

    #[test]
    fn issue_display_and_serde() {
        let issue = NormalizeIssue {
            kind: IssueKind::InvalidUtf8Replaced,
            path: "$.(0009,1001)".to_string(),
            detail: "2 of 6 bytes invalid".to_string(),
        };
        assert_eq!(
            issue.to_string(),
            "invalid_utf8_replaced at $.(0009,1001): 2 of 6 bytes invalid"
        );
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["kind"], IssueKind::InvalidUtf8Replaced.as_str());
    }
}
