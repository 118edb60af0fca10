//! Nodes of a kind the tree does not model directly.
//!
//! Decoders meet value types they cannot map onto a [`TaggedNode`] variant.
//! Rather than dropping them, the decoder describes what the value can do
//! once, at construction time: whether it converts itself into a mapping,
//! whether it wraps an inner value, whether it is raw bytes, and how it
//! prints. The normalizer then walks those capabilities in a fixed order.

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::node::{BinaryBlob, TaggedNode};

/// Converts an opaque value into a dictionary-like tree.
pub trait DictConversion: Send + Sync {
    /// Name of the conversion, used in logs and issue reports.
    fn method(&self) -> &str;

    /// Run the conversion.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Conversion`](crate::ModelError::Conversion) when
    /// the value cannot produce a mapping.
    fn convert(&self) -> Result<TaggedNode>;
}

/// A [`DictConversion`] backed by a closure.
pub struct FnConversion<F> {
    method: String,
    convert: F,
}

impl<F> FnConversion<F>
where
    F: Fn() -> Result<TaggedNode> + Send + Sync,
{
    pub fn new(method: impl Into<String>, convert: F) -> Self {
        Self {
            method: method.into(),
            convert,
        }
    }
}

impl<F> DictConversion for FnConversion<F>
where
    F: Fn() -> Result<TaggedNode> + Send + Sync,
{
    fn method(&self) -> &str {
        &self.method
    }

    fn convert(&self) -> Result<TaggedNode> {
        (self.convert)()
    }
}

/// Capability descriptor for a value of unknown kind.
#[derive(Clone)]
pub struct OpaqueNode {
    type_name: String,
    conversions: Vec<Arc<dyn DictConversion>>,
    inner: Option<Box<TaggedNode>>,
    bytes: Option<BinaryBlob>,
    display: Option<String>,
    debug: Option<String>,
}

impl OpaqueNode {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            conversions: Vec::new(),
            inner: None,
            bytes: None,
            display: None,
            debug: None,
        }
    }

    /// Register a dictionary conversion. Conversions are tried in the order
    /// they were added.
    #[must_use]
    pub fn with_conversion<F>(mut self, method: impl Into<String>, convert: F) -> Self
    where
        F: Fn() -> Result<TaggedNode> + Send + Sync + 'static,
    {
        self.conversions
            .push(Arc::new(FnConversion::new(method, convert)));
        self
    }

    /// Register a conversion implemented elsewhere.
    #[must_use]
    pub fn with_dict_conversion(mut self, conversion: Arc<dyn DictConversion>) -> Self {
        self.conversions.push(conversion);
        self
    }

    /// Mark the value as a holder of `inner`.
    #[must_use]
    pub fn with_inner(mut self, inner: impl Into<TaggedNode>) -> Self {
        self.inner = Some(Box::new(inner.into()));
        self
    }

    /// Mark the value as a raw byte sequence.
    #[must_use]
    pub fn with_bytes(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.bytes = Some(BinaryBlob::new(bytes));
        self
    }

    /// String form of the value. Leave unset when the value cannot print
    /// itself.
    #[must_use]
    pub fn with_display(mut self, text: impl Into<String>) -> Self {
        self.display = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_debug(mut self, text: impl Into<String>) -> Self {
        self.debug = Some(text.into());
        self
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn conversions(&self) -> impl Iterator<Item = &dyn DictConversion> {
        self.conversions.iter().map(|conversion| conversion.as_ref())
    }

    pub fn inner(&self) -> Option<&TaggedNode> {
        self.inner.as_deref()
    }

    pub fn bytes(&self) -> Option<&BinaryBlob> {
        self.bytes.as_ref()
    }

    pub fn display(&self) -> Option<&str> {
        self.display.as_deref()
    }

    /// Debug form, defaulting to `<TypeName object>`.
    pub fn debug_repr(&self) -> String {
        self.debug
            .clone()
            .unwrap_or_else(|| format!("<{} object>", self.type_name))
    }
}

impl fmt::Debug for OpaqueNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpaqueNode")
            .field("type_name", &self.type_name)
            .field(
                "conversions",
                &self.conversions().map(DictConversion::method).collect::<Vec<_>>(),
            )
            .field("inner", &self.inner)
            .field("bytes", &self.bytes)
            .field("display", &self.display)
            .field("debug", &self.debug)
            .finish()
    }
}

impl PartialEq for OpaqueNode {
    /// Conversions compare by identity; everything else by value.
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name
            && self.conversions.len() == other.conversions.len()
            && self
                .conversions
                .iter()
                .zip(&other.conversions)
                .all(|(left, right)| Arc::ptr_eq(left, right))
            && self.inner == other.inner
            && self.bytes == other.bytes
            && self.display == other.display
            && self.debug == other.debug
    }
}
