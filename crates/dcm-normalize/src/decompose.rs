//! Decomposition of composite values into plain mappings.

use std::borrow::Cow;

use dcm_model::{PersonName, StructuredDate, StructuredTime};
use serde_json::{Map, Number, Value};

/// `{year, month, day}`.
#[must_use]
pub fn decompose_date(date: &StructuredDate) -> Value {
    let mut map = Map::with_capacity(3);
    map.insert("year".to_string(), date.year().into());
    map.insert("month".to_string(), date.month().into());
    map.insert("day".to_string(), date.day().into());
    Value::Object(map)
}

/// `{hour, minute, second, microsecond}`.
#[must_use]
pub fn decompose_time(time: &StructuredTime) -> Value {
    let mut map = Map::with_capacity(4);
    map.insert("hour".to_string(), time.hour().into());
    map.insert("minute".to_string(), time.minute().into());
    map.insert("second".to_string(), time.second().into());
    map.insert("microsecond".to_string(), time.microsecond().into());
    Value::Object(map)
}

/// The five name components, absent ones as `""`.
///
/// `ideographic_representation` and `phonetic_representation` are only
/// added when the name carries them.
#[must_use]
pub fn decompose_person_name(name: &PersonName) -> Value {
    const COMPONENTS: [&str; 5] = [
        "family_name",
        "given_name",
        "middle_name",
        "name_prefix",
        "name_suffix",
    ];
    let mut map = Map::with_capacity(7);
    for (key, component) in COMPONENTS.into_iter().zip(name.components()) {
        map.insert(key.to_string(), component.unwrap_or_default().into());
    }
    if let Some(ideographic) = name.ideographic() {
        map.insert("ideographic_representation".to_string(), ideographic.into());
    }
    if let Some(phonetic) = name.phonetic() {
        map.insert("phonetic_representation".to_string(), phonetic.into());
    }
    Value::Object(map)
}

/// Text recovered from a byte payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    /// Whether invalid UTF-8 sequences were replaced with U+FFFD.
    pub replaced: bool,
}

/// Decode bytes as UTF-8, replacing invalid sequences.
#[must_use]
pub fn decode_bytes(bytes: &[u8], trim: bool) -> DecodedText {
    let decoded = String::from_utf8_lossy(bytes);
    let replaced = matches!(decoded, Cow::Owned(_));
    let text = if trim {
        decoded.trim().to_string()
    } else {
        decoded.into_owned()
    };
    DecodedText { text, replaced }
}

/// JSON number for `value`, or `None` for NaN and infinities.
pub(crate) fn float_value(value: f64) -> Option<Value> {
    Number::from_f64(value).map(Value::Number)
}
