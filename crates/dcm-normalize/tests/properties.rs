//! Property tests over generated header trees.

use dcm_model::{PersonName, Record, StructuredDate, StructuredTime, TaggedNode};
use dcm_normalize::{NormalizeOptions, Normalizer, normalize};
use proptest::prelude::*;
use serde_json::Value;

const KEYS: &[&str] = &[
    "PatientName",
    "PatientID",
    "StudyDate",
    "Modality",
    "PixelData",
    "(0009,1001)",
    "ReferencedImageSequence",
    "ImageType",
];

fn leaf() -> impl Strategy<Value = TaggedNode> {
    prop_oneof![
        Just(TaggedNode::null()),
        any::<bool>().prop_map(TaggedNode::from),
        any::<i64>().prop_map(TaggedNode::from),
        (-1.0e9_f64..1.0e9).prop_map(TaggedNode::from),
        "[A-Z0-9 ^]{0,16}".prop_map(TaggedNode::from),
        prop::collection::vec(any::<u8>(), 0..32).prop_map(TaggedNode::from),
        (1900_i32..2100, 1_u32..=12, 1_u32..=28)
            .prop_map(|(y, m, d)| StructuredDate::new(y, m, d).unwrap().into()),
        (0_u32..24, 0_u32..60, 0_u32..60, 0_u32..1_000_000)
            .prop_map(|(h, m, s, us)| StructuredTime::new(h, m, s, us).unwrap().into()),
        "[A-Z]{1,8}\\^[A-Z]{0,8}".prop_map(|pn| PersonName::from_dicom(&pn).into()),
    ]
}

fn record(inner: impl Strategy<Value = TaggedNode>) -> impl Strategy<Value = Record> {
    prop::collection::vec((prop::sample::select(KEYS), inner), 0..6).prop_map(|entries| {
        entries
            .into_iter()
            .fold(Record::new(), |record, (key, value)| record.with(key, value))
    })
}

fn tree() -> impl Strategy<Value = TaggedNode> {
    leaf().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            record(inner.clone()).prop_map(TaggedNode::from),
            prop::collection::vec(record(inner.clone()), 0..4).prop_map(TaggedNode::from),
            prop::collection::vec(inner, 0..4).prop_map(TaggedNode::MultiValue),
        ]
    })
}

fn has_key_anywhere(value: &Value, key: &str) -> bool {
    match value {
        Value::Object(map) => {
            map.contains_key(key) || map.values().any(|child| has_key_anywhere(child, key))
        }
        Value::Array(items) => items.iter().any(|child| has_key_anywhere(child, key)),
        _ => false,
    }
}

proptest! {
    #[test]
    fn generated_trees_always_normalize(node in tree()) {
        prop_assert!(normalize(&node).is_ok());
    }

    #[test]
    fn pixel_data_never_survives(node in tree()) {
        let value = normalize(&node).unwrap();
        prop_assert!(!has_key_anywhere(&value, "PixelData"));
    }

    #[test]
    fn multi_value_order_is_kept(items in prop::collection::vec(leaf(), 0..8)) {
        let normalizer = Normalizer::default();
        let whole = normalizer.normalize(&TaggedNode::MultiValue(items.clone())).unwrap();
        let expected: Vec<Value> = items
            .iter()
            .map(|item| normalizer.normalize(item).unwrap())
            .collect();
        prop_assert_eq!(whole, Value::Array(expected));
    }

    #[test]
    fn output_is_a_fixed_point(node in tree()) {
        let first = normalize(&node).unwrap();
        let second = normalize(&TaggedNode::from(first.clone())).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn output_serializes(node in tree()) {
        let value = normalize(&node).unwrap();
        prop_assert!(serde_json::to_string(&value).is_ok());
    }

    #[test]
    fn strict_policy_agrees_without_duplicates(node in tree()) {
        // Strict either fails on a collision or matches the default output.
        if let Ok(strict) = Normalizer::new(NormalizeOptions::strict()).normalize(&node) {
            prop_assert_eq!(strict, normalize(&node).unwrap());
        }
    }
}
