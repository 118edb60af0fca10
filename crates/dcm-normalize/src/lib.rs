//! Normalize parsed DICOM metadata trees into plain JSON values.
//!
//! The input is a [`TaggedNode`] tree produced by a decoder; the output is a
//! [`serde_json::Value`] made only of null, booleans, numbers, strings,
//! arrays and string-keyed objects, ready for `serde_json::to_string`.
//!
//! # Rules
//!
//! | Node | Output |
//! |------|--------|
//! | Record | object keyed by keyword (or `(GGGG,EEEE)`), excluded keys omitted |
//! | Sequence, MultiValue | array, order preserved |
//! | Date | `{year, month, day}` |
//! | Time | `{hour, minute, second, microsecond}` |
//! | DateTime | string |
//! | PersonName | `{family_name, given_name, middle_name, name_prefix, name_suffix}` |
//! | Binary | UTF-8 text, invalid sequences replaced, trimmed |
//! | Scalar | unchanged (non-finite floats as strings) |
//! | Opaque | fallback chain, see [`fallback`](crate::fallback) |
//!
//! Pixel Data `(7FE0,0010)` is excluded by default; see
//! [`NormalizeOptions::excluded_keys`].
//!
//! # Example
//!
//! ```
//! use dcm_model::{PersonName, Record, StructuredDate, TaggedNode};
//! use serde_json::json;
//!
//! let header = TaggedNode::from(
//!     Record::new()
//!         .with("PatientName", PersonName::new().with_family("DOE").with_given("JOHN"))
//!         .with("PixelData", vec![0_u8; 4096])
//!         .with("StudyDate", StructuredDate::new(2024, 1, 10).unwrap()),
//! );
//!
//! let value = dcm_normalize::normalize(&header).unwrap();
//! assert_eq!(value["StudyDate"], json!({"year": 2024, "month": 1, "day": 10}));
//! assert!(value.get("PixelData").is_none());
//! ```

pub mod decompose;
mod error;
pub mod fallback;
mod issue;
mod normalizer;
mod options;

pub use dcm_model::TaggedNode;
pub use decompose::{
    DecodedText, decode_bytes, decompose_date, decompose_person_name, decompose_time,
};
pub use error::{NormalizeError, Result};
pub use issue::{IssueKind, NormalizeIssue, NormalizeOutcome};
pub use normalizer::Normalizer;
pub use options::{CollisionPolicy, DEFAULT_MAX_DEPTH, NormalizeOptions};

use serde_json::Value;

/// Normalize `node` with default options.
///
/// # Errors
///
/// Only [`NormalizeError::DepthExceeded`], for trees nested deeper than
/// [`DEFAULT_MAX_DEPTH`].
pub fn normalize(node: &TaggedNode) -> Result<Value> {
    Normalizer::default().normalize(node)
}

/// Normalize an optional root with default options; `None` yields `{}`.
///
/// # Errors
///
/// Same as [`normalize`].
pub fn normalize_root(root: Option<&TaggedNode>) -> Result<Value> {
    Normalizer::default().normalize_root(root)
}

/// Normalize `node` with the given options.
///
/// # Errors
///
/// See [`Normalizer::normalize`].
pub fn normalize_with(node: &TaggedNode, options: &NormalizeOptions) -> Result<Value> {
    Normalizer::new(options.clone()).normalize(node)
}
