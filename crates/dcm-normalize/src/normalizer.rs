//! Recursive descent over a tagged tree.

use std::fmt::Write as _;

use dcm_model::{BinaryBlob, Record, Scalar, TaggedNode};
use serde_json::{Map, Value};
use tracing::debug;

use crate::decompose::{
    decode_bytes, decompose_date, decompose_person_name, decompose_time, float_value,
};
use crate::error::{NormalizeError, Result};
use crate::issue::{IssueKind, NormalizeIssue, NormalizeOutcome};
use crate::options::{CollisionPolicy, NormalizeOptions};

/// Converts tagged trees into plain JSON values.
///
/// Holds only its options, so one normalizer can be shared across threads
/// and reused for any number of trees.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    options: NormalizeOptions,
}

impl Normalizer {
    #[must_use]
    pub fn new(options: NormalizeOptions) -> Self {
        Self { options }
    }

    /// Create a normalizer after validating `options`.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError::InvalidOptions`] when the options are
    /// inconsistent.
    pub fn try_new(options: NormalizeOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self::new(options))
    }

    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    /// Normalize `node` into a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError::DepthExceeded`] when the tree nests deeper
    /// than `max_depth`, and [`NormalizeError::KeyCollision`] for duplicate
    /// keys under [`CollisionPolicy::Strict`].
    pub fn normalize(&self, node: &TaggedNode) -> Result<Value> {
        self.normalize_with_report(node)
            .map(NormalizeOutcome::into_value)
    }

    /// Normalize `node`, also returning every recovered issue.
    ///
    /// # Errors
    ///
    /// Same as [`Normalizer::normalize`].
    pub fn normalize_with_report(&self, node: &TaggedNode) -> Result<NormalizeOutcome> {
        let span = tracing::debug_span!(
            "normalize",
            root = node.kind(),
            max_depth = self.options.max_depth,
            excluded = self.options.excluded_keys.len()
        );
        let _guard = span.enter();

        let mut walk = Walk::new(&self.options);
        let value = walk.node(node)?;
        if !walk.issues.is_empty() {
            debug!(issues = walk.issues.len(), "normalization recovered issues");
        }
        Ok(NormalizeOutcome {
            value,
            issues: walk.issues,
        })
    }

    /// Normalize an optional root. An absent root yields an empty mapping.
    ///
    /// # Errors
    ///
    /// Same as [`Normalizer::normalize`].
    pub fn normalize_root(&self, root: Option<&TaggedNode>) -> Result<Value> {
        match root {
            Some(node) => self.normalize(node),
            None => Ok(Value::Object(Map::new())),
        }
    }
}

#[derive(Debug, Clone)]
enum Segment {
    Key(String),
    Index(usize),
}

/// State of one normalization run.
pub(crate) struct Walk<'a> {
    pub(crate) options: &'a NormalizeOptions,
    path: Vec<Segment>,
    depth: usize,
    pub(crate) issues: Vec<NormalizeIssue>,
}

impl<'a> Walk<'a> {
    fn new(options: &'a NormalizeOptions) -> Self {
        Self {
            options,
            path: Vec::new(),
            depth: 0,
            issues: Vec::new(),
        }
    }

    /// Entry point for every node; enforces the depth guard.
    pub(crate) fn node(&mut self, node: &TaggedNode) -> Result<Value> {
        if self.depth >= self.options.max_depth {
            return Err(NormalizeError::depth_exceeded(
                self.options.max_depth,
                self.path_string(),
            ));
        }
        self.depth += 1;
        let value = self.dispatch(node);
        self.depth -= 1;
        value
    }

    fn dispatch(&mut self, node: &TaggedNode) -> Result<Value> {
        match node {
            TaggedNode::Record(record) => self.record(record),
            TaggedNode::Sequence(items) => {
                let mut values = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    values.push(self.within(Segment::Index(index), |walk| walk.record(item))?);
                }
                Ok(Value::Array(values))
            }
            TaggedNode::MultiValue(items) => {
                let mut values = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    values.push(self.within(Segment::Index(index), |walk| walk.node(item))?);
                }
                Ok(Value::Array(values))
            }
            TaggedNode::Date(date) => Ok(decompose_date(date)),
            TaggedNode::Time(time) => Ok(decompose_time(time)),
            TaggedNode::DateTime(date_time) => Ok(Value::String(date_time.to_string())),
            TaggedNode::PersonName(name) => Ok(decompose_person_name(name)),
            TaggedNode::Scalar(scalar) => Ok(self.scalar(scalar)),
            TaggedNode::Binary(blob) => Ok(self.binary(blob)),
            TaggedNode::Opaque(opaque) => self.opaque(opaque),
        }
    }

    fn record(&mut self, record: &Record) -> Result<Value> {
        let mut map = Map::with_capacity(record.len());
        for (key, value) in record {
            if self.options.is_excluded(key) {
                continue;
            }
            let name = key.display_name().into_owned();
            if map.contains_key(&name) {
                match self.options.collision_policy {
                    CollisionPolicy::Strict => {
                        return Err(NormalizeError::key_collision(name, self.path_string()));
                    }
                    CollisionPolicy::Overwrite => {
                        debug!(key = %name, path = %self.path_string(), "record key overwritten");
                        self.issue(
                            IssueKind::KeyOverwritten,
                            format!("later '{name}' entry replaced an earlier one"),
                        );
                    }
                }
            }
            let normalized = self.within(Segment::Key(name.clone()), |walk| walk.node(value))?;
            map.insert(name, normalized);
        }
        Ok(Value::Object(map))
    }

    fn scalar(&mut self, scalar: &Scalar) -> Value {
        match scalar {
            Scalar::Null => Value::Null,
            Scalar::Bool(flag) => Value::Bool(*flag),
            Scalar::Int(int) => (*int).into(),
            Scalar::UInt(uint) => (*uint).into(),
            Scalar::Str(text) => Value::String(text.clone()),
            Scalar::Float(float) => float_value(*float).unwrap_or_else(|| {
                let text = float.to_string();
                self.issue(
                    IssueKind::NonFiniteFloat,
                    format!("{text} has no JSON number form"),
                );
                Value::String(text)
            }),
        }
    }

    pub(crate) fn binary(&mut self, blob: &BinaryBlob) -> Value {
        let decoded = decode_bytes(blob.as_bytes(), self.options.trim_decoded_text);
        if decoded.replaced {
            debug!(
                path = %self.path_string(),
                len = blob.len(),
                "invalid UTF-8 replaced while decoding bytes"
            );
            self.issue(
                IssueKind::InvalidUtf8Replaced,
                format!("{} bytes decoded with replacement characters", blob.len()),
            );
        }
        Value::String(decoded.text)
    }

    fn within<T>(
        &mut self,
        segment: Segment,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        self.path.push(segment);
        let result = f(self);
        self.path.pop();
        result
    }

    pub(crate) fn issue(&mut self, kind: IssueKind, detail: impl Into<String>) {
        let path = self.path_string();
        self.issues.push(NormalizeIssue {
            kind,
            path,
            detail: detail.into(),
        });
    }

    pub(crate) fn path_string(&self) -> String {
        let mut path = String::from("$");
        for segment in &self.path {
            match segment {
                Segment::Key(key) => {
                    path.push('.');
                    path.push_str(key);
                }
                Segment::Index(index) => {
                    let _ = write!(path, "[{index}]");
                }
            }
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcm_model::{PersonName, StructuredDate, Tag};
    use serde_json::json;

    #[test]
    fn paths_follow_keys_and_indexes() {
        let item = Record::new().with(Tag::new(0x0009, 0x1001), vec![0xFF_u8]);
        let root = TaggedNode::from(Record::new().with("ReferencedImageSequence", vec![item]));
        let outcome = Normalizer::default().normalize_with_report(&root).unwrap();
        assert_eq!(outcome.issues.len(), 1);
        assert_eq!(
            outcome.issues[0].path,
            "$.ReferencedImageSequence[0].(0009,1001)"
        );
        assert_eq!(outcome.issues[0].kind, IssueKind::InvalidUtf8Replaced);
    }

    #[test]
    fn overwrite_keeps_first_position() {
        let root = TaggedNode::from(
            Record::new()
                .with("PatientID", "A")
                .with("Modality", "CT")
                .with(Tag::new(0x0010, 0x0020), "B"),
        );
        let outcome = Normalizer::default().normalize_with_report(&root).unwrap();
        assert_eq!(outcome.value, json!({"PatientID": "B", "Modality": "CT"}));
        let keys: Vec<_> = outcome.value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["PatientID", "Modality"]);
        assert_eq!(outcome.count(IssueKind::KeyOverwritten), 1);
    }

    #[test]
    fn strict_policy_reports_collision() {
        let root = TaggedNode::from(
            Record::new().with("Nested", Record::new().with("A", 1_i64).with("A", 2_i64)),
        );
        let err = Normalizer::new(NormalizeOptions::strict())
            .normalize(&root)
            .unwrap_err();
        assert_eq!(err, NormalizeError::key_collision("A", "$.Nested"));
    }

    #[test]
    fn depth_guard_counts_nesting() {
        let mut node = TaggedNode::from("leaf");
        for _ in 0..5 {
            node = TaggedNode::MultiValue(vec![node]);
        }
        let shallow = Normalizer::new(NormalizeOptions::new().with_max_depth(6));
        assert!(shallow.normalize(&node).is_ok());

        let too_shallow = Normalizer::new(NormalizeOptions::new().with_max_depth(5));
        let err = too_shallow.normalize(&node).unwrap_err();
        assert_eq!(err, NormalizeError::depth_exceeded(5, "$[0][0][0][0][0]"));
    }

    #[test]
    fn try_new_validates() {
        assert!(Normalizer::try_new(NormalizeOptions::new().with_max_depth(0)).is_err());
        assert!(Normalizer::try_new(NormalizeOptions::default()).is_ok());
    }

    #[test]
    fn absent_root_is_empty_mapping() {
        let normalizer = Normalizer::default();
        assert_eq!(normalizer.normalize_root(None).unwrap(), json!({}));
        let name = TaggedNode::from(PersonName::from_dicom("DOE^JOHN"));
        assert_eq!(
            normalizer.normalize_root(Some(&name)).unwrap()["family_name"],
            "DOE"
        );
    }

    #[test]
    fn non_finite_float_becomes_string() {
        let root = TaggedNode::MultiValue(vec![f64::NAN.into(), f64::NEG_INFINITY.into()]);
        let outcome = Normalizer::default().normalize_with_report(&root).unwrap();
        assert_eq!(outcome.value, json!(["NaN", "-inf"]));
        assert_eq!(outcome.count(IssueKind::NonFiniteFloat), 2);
    }

    #[test]
    fn dates_inside_multi_values() {
        let root = TaggedNode::MultiValue(vec![
            StructuredDate::new(2024, 1, 10).unwrap().into(),
            TaggedNode::null(),
        ]);
        assert_eq!(
            Normalizer::default().normalize(&root).unwrap(),
            json!([{"year": 2024, "month": 1, "day": 10}, null])
        );
    }
}
