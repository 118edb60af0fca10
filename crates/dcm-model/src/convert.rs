//! Conversions into [`TaggedNode`].

use serde_json::Value;

use crate::datetime::{StructuredDate, StructuredDateTime, StructuredTime};
use crate::node::{BinaryBlob, Record, Scalar, TaggedNode};
use crate::opaque::OpaqueNode;
use crate::person_name::PersonName;
use crate::tag::ElementKey;

macro_rules! scalar_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for TaggedNode {
                fn from(value: $ty) -> Self {
                    Self::Scalar(Scalar::$variant(value.into()))
                }
            }
        )*
    };
}

scalar_from! {
    bool => Bool,
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u8 => UInt,
    u16 => UInt,
    u32 => UInt,
    u64 => UInt,
    f32 => Float,
    f64 => Float,
    String => Str,
    &str => Str,
}

impl From<Scalar> for TaggedNode {
    fn from(value: Scalar) -> Self {
        Self::Scalar(value)
    }
}

impl<T: Into<TaggedNode>> From<Option<T>> for TaggedNode {
    fn from(value: Option<T>) -> Self {
        value.map_or_else(Self::null, Into::into)
    }
}

impl From<Record> for TaggedNode {
    fn from(value: Record) -> Self {
        Self::Record(value)
    }
}

impl From<StructuredDate> for TaggedNode {
    fn from(value: StructuredDate) -> Self {
        Self::Date(value)
    }
}

impl From<StructuredTime> for TaggedNode {
    fn from(value: StructuredTime) -> Self {
        Self::Time(value)
    }
}

impl From<StructuredDateTime> for TaggedNode {
    fn from(value: StructuredDateTime) -> Self {
        Self::DateTime(value)
    }
}

impl From<PersonName> for TaggedNode {
    fn from(value: PersonName) -> Self {
        Self::PersonName(value)
    }
}

impl From<BinaryBlob> for TaggedNode {
    fn from(value: BinaryBlob) -> Self {
        Self::Binary(value)
    }
}

impl From<Vec<u8>> for TaggedNode {
    fn from(value: Vec<u8>) -> Self {
        Self::Binary(BinaryBlob::new(value))
    }
}

impl From<&[u8]> for TaggedNode {
    fn from(value: &[u8]) -> Self {
        Self::Binary(BinaryBlob::new(value))
    }
}

impl From<OpaqueNode> for TaggedNode {
    fn from(value: OpaqueNode) -> Self {
        Self::Opaque(value)
    }
}

impl From<Vec<Record>> for TaggedNode {
    fn from(value: Vec<Record>) -> Self {
        Self::Sequence(value)
    }
}

impl From<Vec<TaggedNode>> for TaggedNode {
    fn from(value: Vec<TaggedNode>) -> Self {
        Self::MultiValue(value)
    }
}

impl From<Value> for TaggedNode {
    /// Lifts a plain JSON value back into a tree.
    ///
    /// Arrays become multi-values and objects become records keyed by the
    /// object keys verbatim, so normalizing the result reproduces `value`
    /// (minus any excluded keys).
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::null(),
            Value::Bool(flag) => flag.into(),
            Value::Number(number) => {
                if let Some(int) = number.as_i64() {
                    int.into()
                } else if let Some(uint) = number.as_u64() {
                    uint.into()
                } else {
                    number.as_f64().unwrap_or(f64::NAN).into()
                }
            }
            Value::String(text) => text.into(),
            Value::Array(items) => Self::MultiValue(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => Self::Record(
                map.into_iter()
                    .map(|(key, value)| (ElementKey::Keyword(key), Self::from(value)))
                    .collect(),
            ),
        }
    }
}
