//! Configuration options for normalization.

use std::collections::BTreeSet;

use dcm_model::{ElementKey, Tag};
use serde::{Deserialize, Serialize};

use crate::error::{NormalizeError, Result};

/// Default nesting guard. Real headers rarely nest sequences more than a
/// handful of levels deep.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// What to do when two record entries produce the same output key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Later entry replaces the earlier one, keeping the earlier position.
    #[default]
    Overwrite,
    /// Fail with [`NormalizeError::KeyCollision`].
    Strict,
}

/// Options controlling normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeOptions {
    /// Record keys dropped from the output, together with their values.
    ///
    /// Matching goes through tag resolution, so `"PixelData"` and
    /// `"(7FE0,0010)"` exclude the same element.
    pub excluded_keys: BTreeSet<ElementKey>,

    /// Handling of duplicate output keys within a record.
    pub collision_policy: CollisionPolicy,

    /// Maximum nesting depth before [`NormalizeError::DepthExceeded`].
    pub max_depth: usize,

    /// Trim surrounding whitespace from decoded binary text (default: true).
    pub trim_decoded_text: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            excluded_keys: BTreeSet::from([ElementKey::Tag(Tag::PIXEL_DATA)]),
            collision_policy: CollisionPolicy::Overwrite,
            max_depth: DEFAULT_MAX_DEPTH,
            trim_decoded_text: true,
        }
    }
}

impl NormalizeOptions {
    /// Create options with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that reject duplicate keys.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            collision_policy: CollisionPolicy::Strict,
            ..Self::default()
        }
    }

    /// Parse options from JSON. Missing fields take their defaults.
    ///
    /// ```
    /// use dcm_normalize::{CollisionPolicy, NormalizeOptions};
    ///
    /// let options = NormalizeOptions::from_json_str(
    ///     r#"{"excluded_keys": ["(7FE0,0010)", "OverlayData"], "collision_policy": "strict"}"#,
    /// )
    /// .unwrap();
    /// assert_eq!(options.excluded_keys.len(), 2);
    /// assert_eq!(options.collision_policy, CollisionPolicy::Strict);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError::InvalidOptions`] for malformed JSON, bad
    /// keys, or values rejected by [`NormalizeOptions::validate`].
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Check option values for consistency.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError::InvalidOptions`] when `max_depth` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(NormalizeError::invalid_options(
                "max_depth must be at least 1",
            ));
        }
        Ok(())
    }

    /// Add a key to the exclusion set.
    #[must_use]
    pub fn with_excluded_key(mut self, key: impl Into<ElementKey>) -> Self {
        self.excluded_keys.insert(key.into());
        self
    }

    /// Replace the exclusion set.
    #[must_use]
    pub fn with_excluded_keys<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<ElementKey>,
    {
        self.excluded_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision_policy = policy;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn with_trim_decoded_text(mut self, enable: bool) -> Self {
        self.trim_decoded_text = enable;
        self
    }

    /// Whether `key` is dropped from record output.
    #[must_use]
    pub fn is_excluded(&self, key: &ElementKey) -> bool {
        self.excluded_keys
            .iter()
            .any(|excluded| excluded.matches(key))
    }
}
