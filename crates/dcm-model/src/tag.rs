//! Attribute tags and element keys.
//!
//! A DICOM attribute is identified by a numeric [`Tag`] (group, element).
//! Parsed trees usually carry the symbolic keyword instead, and fall back to
//! the raw tag for private or unknown attributes. [`ElementKey`] holds either
//! form and resolves between them through the [`dictionary`](crate::dictionary).

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::dictionary;
use crate::error::{ModelError, Result};

/// Numeric attribute identifier `(gggg,eeee)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag {
    pub group: u16,
    pub element: u16,
}

impl Tag {
    /// Pixel Data `(7FE0,0010)`, the bulk image payload of an instance.
    pub const PIXEL_DATA: Tag = Tag::new(0x7FE0, 0x0010);

    #[must_use]
    pub const fn new(group: u16, element: u16) -> Self {
        Self { group, element }
    }

    /// Private tags live in odd-numbered groups.
    #[must_use]
    pub const fn is_private(self) -> bool {
        self.group % 2 == 1
    }

    /// Whether the string has the shape of a tag rather than a keyword.
    ///
    /// Keywords always start with a letter, so anything opening with a
    /// parenthesis or a digit is treated as a tag candidate.
    pub(crate) fn looks_like_tag(input: &str) -> bool {
        input
            .trim_start()
            .chars()
            .next()
            .is_some_and(|c| c == '(' || c.is_ascii_digit())
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:04X},{:04X})", self.group, self.element)
    }
}

impl From<(u16, u16)> for Tag {
    fn from((group, element): (u16, u16)) -> Self {
        Self::new(group, element)
    }
}

impl From<u32> for Tag {
    fn from(value: u32) -> Self {
        Self::new((value >> 16) as u16, (value & 0xFFFF) as u16)
    }
}

impl FromStr for Tag {
    type Err = ModelError;

    /// Accepts `(gggg,eeee)`, `gggg,eeee` and `ggggeeee`, case-insensitive.
    fn from_str(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let inner = trimmed
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .unwrap_or(trimmed);
        let (group, element) = match inner.split_once(',') {
            Some((group, element)) => (group.trim(), element.trim()),
            None if inner.len() == 8 && inner.is_ascii() => inner.split_at(4),
            None => {
                return Err(ModelError::invalid_tag(
                    input,
                    "expected (gggg,eeee) or ggggeeee",
                ));
            }
        };
        let parse = |part: &str, what: &str| {
            if part.len() != 4 {
                return Err(ModelError::invalid_tag(
                    input,
                    format!("{what} must be 4 hex digits"),
                ));
            }
            u16::from_str_radix(part, 16).map_err(|_| {
                ModelError::invalid_tag(input, format!("{what} is not hexadecimal"))
            })
        };
        Ok(Self::new(parse(group, "group")?, parse(element, "element")?))
    }
}

impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Tag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Key of a record entry: a symbolic keyword or a raw tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKey {
    Keyword(String),
    Tag(Tag),
}

impl ElementKey {
    pub fn keyword(keyword: impl Into<String>) -> Self {
        Self::Keyword(keyword.into())
    }

    /// The numeric tag behind this key, when it can be resolved.
    #[must_use]
    pub fn tag(&self) -> Option<Tag> {
        match self {
            Self::Tag(tag) => Some(*tag),
            Self::Keyword(keyword) => dictionary::tag_for(keyword).or_else(|| {
                Tag::looks_like_tag(keyword)
                    .then(|| keyword.parse().ok())
                    .flatten()
            }),
        }
    }

    /// Name used for this key in normalized output.
    ///
    /// Keywords are used verbatim. Tags use their dictionary keyword when one
    /// is known and the `(GGGG,EEEE)` form otherwise.
    #[must_use]
    pub fn display_name(&self) -> Cow<'_, str> {
        match self {
            Self::Keyword(keyword) => Cow::Borrowed(keyword.as_str()),
            Self::Tag(tag) => match dictionary::keyword_for(*tag) {
                Some(keyword) => Cow::Borrowed(keyword),
                None => Cow::Owned(tag.to_string()),
            },
        }
    }

    /// Whether two keys identify the same attribute.
    ///
    /// Compares resolved tags when both sides resolve, output names otherwise.
    #[must_use]
    pub fn matches(&self, other: &ElementKey) -> bool {
        match (self.tag(), other.tag()) {
            (Some(left), Some(right)) => left == right,
            _ => self.display_name() == other.display_name(),
        }
    }
}

impl fmt::Display for ElementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

impl From<Tag> for ElementKey {
    fn from(tag: Tag) -> Self {
        Self::Tag(tag)
    }
}

impl From<&str> for ElementKey {
    /// Tag-shaped strings become [`ElementKey::Tag`] when they parse,
    /// everything else is kept as a keyword.
    fn from(value: &str) -> Self {
        if Tag::looks_like_tag(value)
            && let Ok(tag) = value.parse()
        {
            return Self::Tag(tag);
        }
        Self::Keyword(value.to_string())
    }
}

impl From<String> for ElementKey {
    fn from(value: String) -> Self {
        if Tag::looks_like_tag(&value)
            && let Ok(tag) = value.parse()
        {
            return Self::Tag(tag);
        }
        Self::Keyword(value)
    }
}

impl FromStr for ElementKey {
    type Err = ModelError;

    fn from_str(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ModelError::EmptyKey);
        }
        if Tag::looks_like_tag(trimmed) {
            return trimmed.parse().map(Self::Tag);
        }
        Ok(Self::Keyword(trimmed.to_string()))
    }
}

impl Serialize for ElementKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Keyword(keyword) => serializer.serialize_str(keyword),
            Self::Tag(tag) => serializer.collect_str(tag),
        }
    }
}

impl<'de> Deserialize<'de> for ElementKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}
