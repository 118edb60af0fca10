//! Fallback chain for opaque nodes.
//!
//! Strategies run in a fixed order and the first one that applies wins:
//!
//! 1. dictionary conversions, in registration order (failures are logged and
//!    skipped)
//! 2. the wrapped inner value of a value holder
//! 3. the raw bytes, decoded as UTF-8 with replacement
//! 4. the string form, or the debug form when the value has none
//!
//! Step 4 always succeeds, so an opaque node never fails the run on its own.

use dcm_model::OpaqueNode;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::Result;
use crate::issue::IssueKind;
use crate::normalizer::Walk;

impl Walk<'_> {
    pub(crate) fn opaque(&mut self, node: &OpaqueNode) -> Result<Value> {
        for conversion in node.conversions() {
            match conversion.convert() {
                Ok(converted) => {
                    self.resolved(node, &format!("{}()", conversion.method()));
                    return self.node(&converted);
                }
                Err(error) => {
                    let path = self.path_string();
                    warn!(
                        method = conversion.method(),
                        type_name = node.type_name(),
                        path = %path,
                        error = %error,
                        "dictionary conversion failed, trying next strategy"
                    );
                    self.issue(
                        IssueKind::ConversionFailed,
                        format!("{} on {}: {error}", conversion.method(), node.type_name()),
                    );
                }
            }
        }

        if let Some(inner) = node.inner() {
            self.resolved(node, "inner value");
            return self.node(inner);
        }

        if let Some(bytes) = node.bytes() {
            self.resolved(node, "raw bytes");
            return Ok(self.binary(bytes));
        }

        match node.display() {
            Some(text) => {
                self.resolved(node, "string representation");
                Ok(Value::String(text.to_string()))
            }
            None => {
                self.resolved(node, "debug representation");
                Ok(Value::String(node.debug_repr()))
            }
        }
    }

    fn resolved(&mut self, node: &OpaqueNode, strategy: &str) {
        debug!(
            type_name = node.type_name(),
            strategy,
            path = %self.path_string(),
            "opaque node resolved through fallback"
        );
        self.issue(
            IssueKind::UnrecognizedType,
            format!("{} resolved via {strategy}", node.type_name()),
        );
    }
}

#[cfg(test)]
mod tests {
    use dcm_model::{ModelError, OpaqueNode, Record, TaggedNode};
    use serde_json::json;

    use crate::issue::IssueKind;
    use crate::normalizer::Normalizer;

    fn normalize(node: OpaqueNode) -> crate::NormalizeOutcome {
        Normalizer::default()
            .normalize_with_report(&TaggedNode::from(node))
            .unwrap()
    }

    #[test]
    fn conversion_result_is_normalized() {
        let node = OpaqueNode::new("CodeItem").with_conversion("to_dict", || {
            Ok(Record::new()
                .with("CodeValue", "T-D1100")
                .with("CodingSchemeDesignator", "SRT")
                .into())
        });
        let outcome = normalize(node);
        assert_eq!(
            outcome.value,
            json!({"CodeValue": "T-D1100", "CodingSchemeDesignator": "SRT"})
        );
        assert_eq!(outcome.issues[0].detail, "CodeItem resolved via to_dict()");
    }

    #[test]
    fn failing_conversion_falls_through() {
        let node = OpaqueNode::new("Flaky")
            .with_conversion("_as_dict", || Err(ModelError::conversion("_as_dict", "boom")))
            .with_conversion("to_dict", || Ok(TaggedNode::from(Record::new().with("ok", true))));
        let outcome = normalize(node);
        assert_eq!(outcome.value, json!({"ok": true}));
        assert_eq!(outcome.count(IssueKind::ConversionFailed), 1);
    }

    #[test]
    fn inner_value_is_unwrapped() {
        let node = OpaqueNode::new("DataElement")
            .with_conversion("to_dict", || Err(ModelError::conversion("to_dict", "unsupported")))
            .with_inner(vec![0x41_u8, 0x42, 0x20]);
        let outcome = normalize(node);
        assert_eq!(outcome.value, json!("AB"));
        assert_eq!(outcome.count(IssueKind::ConversionFailed), 1);
        assert_eq!(outcome.count(IssueKind::UnrecognizedType), 1);
    }

    #[test]
    fn raw_bytes_are_decoded() {
        let node = OpaqueNode::new("bytearray").with_bytes(b"  MONOCHROME2 ".to_vec());
        assert_eq!(normalize(node).value, json!("MONOCHROME2"));
    }

    #[test]
    fn display_then_debug() {
        let node = OpaqueNode::new("Decimal").with_display("3.14");
        assert_eq!(normalize(node).value, json!("3.14"));

        let node = OpaqueNode::new("Unprintable").with_debug("Unprintable(0x7f3a)");
        assert_eq!(normalize(node).value, json!("Unprintable(0x7f3a)"));

        let node = OpaqueNode::new("Bare");
        assert_eq!(normalize(node).value, json!("<Bare object>"));
    }

    #[test]
    fn all_conversions_failing_reaches_string_form() {
        let node = OpaqueNode::new("Stubborn")
            .with_conversion("_as_dict", || Err(ModelError::conversion("_as_dict", "no")))
            .with_conversion("as_dict", || Err(ModelError::conversion("as_dict", "no")))
            .with_conversion("to_dict", || Err(ModelError::conversion("to_dict", "no")))
            .with_conversion("_to_dict", || Err(ModelError::conversion("_to_dict", "no")))
            .with_display("stubborn");
        let outcome = normalize(node);
        assert_eq!(outcome.value, json!("stubborn"));
        assert_eq!(outcome.count(IssueKind::ConversionFailed), 4);
    }
}
