//! Person name (PN) values.
//!
//! A PN value has up to three component groups separated by `=`: alphabetic,
//! ideographic and phonetic. The alphabetic group splits on `^` into family,
//! given, middle, prefix and suffix.

use std::fmt;

/// A single decoded person name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PersonName {
    family: Option<String>,
    given: Option<String>,
    middle: Option<String>,
    prefix: Option<String>,
    suffix: Option<String>,
    ideographic: Option<String>,
    phonetic: Option<String>,
}

impl PersonName {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a PN string such as `DOE^JOHN^^DR=ドウ^ジョン`.
    ///
    /// Empty components are treated as absent. The ideographic and phonetic
    /// groups are only exposed when the source carries non-empty text for
    /// them.
    #[must_use]
    pub fn from_dicom(input: &str) -> Self {
        let mut groups = input.trim_end_matches([' ', '\0']).splitn(3, '=');
        let alphabetic = groups.next().unwrap_or_default();
        let mut parts = alphabetic.splitn(5, '^').map(non_empty);
        Self {
            family: parts.next().flatten(),
            given: parts.next().flatten(),
            middle: parts.next().flatten(),
            prefix: parts.next().flatten(),
            suffix: parts.next().flatten(),
            ideographic: groups.next().and_then(non_empty),
            phonetic: groups.next().and_then(non_empty),
        }
    }

    #[must_use]
    pub fn with_family(mut self, value: impl Into<String>) -> Self {
        self.family = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_given(mut self, value: impl Into<String>) -> Self {
        self.given = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_middle(mut self, value: impl Into<String>) -> Self {
        self.middle = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_prefix(mut self, value: impl Into<String>) -> Self {
        self.prefix = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_suffix(mut self, value: impl Into<String>) -> Self {
        self.suffix = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_ideographic(mut self, value: impl Into<String>) -> Self {
        self.ideographic = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_phonetic(mut self, value: impl Into<String>) -> Self {
        self.phonetic = Some(value.into());
        self
    }

    pub fn family(&self) -> Option<&str> {
        self.family.as_deref()
    }

    pub fn given(&self) -> Option<&str> {
        self.given.as_deref()
    }

    pub fn middle(&self) -> Option<&str> {
        self.middle.as_deref()
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    pub fn ideographic(&self) -> Option<&str> {
        self.ideographic.as_deref()
    }

    pub fn phonetic(&self) -> Option<&str> {
        self.phonetic.as_deref()
    }

    /// The five alphabetic components in DICOM order.
    pub fn components(&self) -> [Option<&str>; 5] {
        [
            self.family(),
            self.given(),
            self.middle(),
            self.prefix(),
            self.suffix(),
        ]
    }
}

impl fmt::Display for PersonName {
    /// Re-encodes the value in PN form, dropping trailing empty components.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let alphabetic = self.components().map(Option::unwrap_or_default).join("^");
        f.write_str(alphabetic.trim_end_matches('^'))?;
        match (self.ideographic(), self.phonetic()) {
            (None, None) => Ok(()),
            (ideographic, None) => write!(f, "={}", ideographic.unwrap_or_default()),
            (ideographic, Some(phonetic)) => {
                write!(f, "={}={phonetic}", ideographic.unwrap_or_default())
            }
        }
    }
}

impl From<&str> for PersonName {
    fn from(value: &str) -> Self {
        Self::from_dicom(value)
    }
}

fn non_empty(part: &str) -> Option<String> {
    let part = part.trim();
    (!part.is_empty()).then(|| part.to_string())
}
