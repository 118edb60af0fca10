//! In-memory tagged tree for parsed DICOM metadata.
//!
//! A decoder turns an instance's header into a [`TaggedNode`] tree: records
//! of keyed elements, sequences of nested records, multi-valued fields, and
//! structured date, time and person-name values. Values the decoder cannot
//! classify are wrapped in an [`OpaqueNode`] that describes how they can be
//! converted.
//!
//! # Example
//!
//! ```
//! use dcm_model::{PersonName, Record, StructuredDate, Tag, TaggedNode};
//!
//! let header = Record::new()
//!     .with("PatientName", PersonName::from_dicom("DOE^JOHN"))
//!     .with("StudyDate", StructuredDate::from_dicom("20240110").unwrap())
//!     .with(Tag::PIXEL_DATA, vec![0_u8; 1024]);
//!
//! assert_eq!(header.len(), 3);
//! let root = TaggedNode::from(header);
//! assert_eq!(root.kind(), "record");
//! ```

mod convert;
pub mod datetime;
pub mod dictionary;
mod error;
pub mod node;
pub mod opaque;
pub mod person_name;
pub mod tag;

pub use datetime::{StructuredDate, StructuredDateTime, StructuredTime};
pub use error::{ModelError, Result};
pub use node::{BinaryBlob, Record, Scalar, TaggedNode};
pub use opaque::{DictConversion, FnConversion, OpaqueNode};
pub use person_name::PersonName;
pub use tag::{ElementKey, Tag};
