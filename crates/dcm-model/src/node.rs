//! The tagged tree.

use std::fmt;

use crate::datetime::{StructuredDate, StructuredDateTime, StructuredTime};
use crate::opaque::OpaqueNode;
use crate::person_name::PersonName;
use crate::tag::ElementKey;

/// A node of a parsed metadata tree.
#[derive(Debug, Clone, PartialEq)]
pub enum TaggedNode {
    /// Keyed sub-object, e.g. a dataset or a sequence item.
    Record(Record),
    /// Repeated group of sub-objects.
    Sequence(Vec<Record>),
    /// Several values of one field. Never treated as a sequence.
    MultiValue(Vec<TaggedNode>),
    Date(StructuredDate),
    Time(StructuredTime),
    DateTime(StructuredDateTime),
    PersonName(PersonName),
    Binary(BinaryBlob),
    Scalar(Scalar),
    Opaque(OpaqueNode),
}

impl TaggedNode {
    #[must_use]
    pub fn null() -> Self {
        Self::Scalar(Scalar::Null)
    }

    /// Short variant name for logs and reports.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Record(_) => "record",
            Self::Sequence(_) => "sequence",
            Self::MultiValue(_) => "multi-value",
            Self::Date(_) => "date",
            Self::Time(_) => "time",
            Self::DateTime(_) => "date-time",
            Self::PersonName(_) => "person-name",
            Self::Binary(_) => "binary",
            Self::Scalar(_) => "scalar",
            Self::Opaque(_) => "opaque",
        }
    }
}

/// Values that already map one-to-one onto JSON primitives.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
}

/// Ordered `(key, value)` entries.
///
/// Duplicate keys are kept as they arrive; resolving them is up to the
/// consumer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    entries: Vec<(ElementKey, TaggedNode)>,
}

impl Record {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Builder form of [`Record::push`].
    #[must_use]
    pub fn with(mut self, key: impl Into<ElementKey>, value: impl Into<TaggedNode>) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: impl Into<ElementKey>, value: impl Into<TaggedNode>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Last value stored under a key matching `key`.
    pub fn get(&self, key: &ElementKey) -> Option<&TaggedNode> {
        self.entries
            .iter()
            .rev()
            .find(|(candidate, _)| candidate.matches(key))
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ElementKey, &TaggedNode)> {
        self.into_iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<ElementKey>, V: Into<TaggedNode>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a ElementKey, &'a TaggedNode);
    type IntoIter = std::iter::Map<
        std::slice::Iter<'a, (ElementKey, TaggedNode)>,
        fn(&'a (ElementKey, TaggedNode)) -> (&'a ElementKey, &'a TaggedNode),
    >;

    fn into_iter(self) -> Self::IntoIter {
        let split: fn(&'a (ElementKey, TaggedNode)) -> (&'a ElementKey, &'a TaggedNode) =
            |(key, value)| (key, value);
        self.entries.iter().map(split)
    }
}

/// Raw bytes from an OB, OW, UN or similar element.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct BinaryBlob(Vec<u8>);

impl BinaryBlob {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl fmt::Debug for BinaryBlob {
    /// Only the first bytes are shown; blobs can be megabytes long.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const PREVIEW: usize = 16;
        let shown = &self.0[..self.0.len().min(PREVIEW)];
        write!(f, "BinaryBlob(len={}, head={shown:02X?}", self.0.len())?;
        if self.0.len() > PREVIEW {
            f.write_str("..")?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::Tag;

    #[test]
    fn record_keeps_order_and_duplicates() {
        let record = Record::new()
            .with("PatientID", "A")
            .with("Modality", "MR")
            .with("PatientID", "B");
        let keys: Vec<_> = record.iter().map(|(key, _)| key.to_string()).collect();
        assert_eq!(keys, ["PatientID", "Modality", "PatientID"]);
        assert_eq!(record.len(), 3);
    }

    #[test]
    fn record_get_returns_last_match() {
        let record = Record::new()
            .with("PatientID", "A")
            .with(Tag::new(0x0010, 0x0020), "B");
        assert_eq!(
            record.get(&ElementKey::keyword("PatientID")),
            Some(&TaggedNode::from("B"))
        );
        assert_eq!(record.get(&ElementKey::keyword("Rows")), None);
    }

    #[test]
    fn record_from_iterator() {
        let record: Record = [("Rows", 512_i64), ("Columns", 256_i64)].into_iter().collect();
        assert_eq!(record.len(), 2);
        assert!(!record.is_empty());
        assert_eq!((&record).into_iter().count(), 2);
    }

    #[test]
    fn blob_debug_is_bounded() {
        let blob = BinaryBlob::new(vec![0xAB; 4096]);
        let debug = format!("{blob:?}");
        assert!(debug.starts_with("BinaryBlob(len=4096, head=[AB, AB"));
        assert!(debug.ends_with("..)"));
        assert!(debug.len() < 120);
    }

    #[test]
    fn kind_names() {
        assert_eq!(TaggedNode::null().kind(), "scalar");
        assert_eq!(TaggedNode::Sequence(vec![]).kind(), "sequence");
        assert_eq!(TaggedNode::Binary(BinaryBlob::default()).kind(), "binary");
    }
}
