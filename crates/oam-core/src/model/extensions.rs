use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::ModelError;

/// Every vendor extension key starts with this prefix.
pub const EXTENSION_PREFIX: &str = "x-";

/// Vendor extensions (`x-*`) attached to a model element.
///
/// Iteration follows insertion order. Overwriting a key keeps the position it
/// was first inserted at, so serialized output is stable across edits. Values
/// are opaque JSON and never validated.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Extensions(IndexMap<String, Value>);

impl Extensions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid_key(key: &str) -> bool {
        key.starts_with(EXTENSION_PREFIX)
    }

    /// Insert or overwrite an extension, returning the previous value.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, ModelError> {
        let key = key.into();
        if !Self::is_valid_key(&key) {
            return Err(ModelError::InvalidExtensionKey(key));
        }
        Ok(self.0.insert(key, value.into()))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Remove an extension. Missing keys are a no-op.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Overlay `other` on top of `self`: shared keys take `other`'s value in
    /// place, new keys are appended.
    pub fn overlay(&mut self, other: &Extensions) {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }
}

impl Serialize for Extensions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter())
    }
}

impl<'de> Deserialize<'de> for Extensions {
    /// Used through `#[serde(flatten)]`: receives every key the owning struct
    /// did not consume, and keeps only the `x-` ones.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = IndexMap::<String, Value>::deserialize(deserializer)?;
        let mut entries = IndexMap::with_capacity(raw.len());
        for (key, value) in raw {
            if Self::is_valid_key(&key) {
                entries.insert(key, value);
            } else {
                log::trace!("ignoring unknown field `{key}`");
            }
        }
        Ok(Self(entries))
    }
}

/// An element that owns an extension bag.
pub trait Extensible {
    fn extensions(&self) -> &Extensions;

    fn extensions_mut(&mut self) -> &mut Extensions;

    fn add_extension(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<&mut Self, ModelError>
    where
        Self: Sized,
    {
        self.extensions_mut().insert(key, value)?;
        Ok(self)
    }

    fn remove_extension(&mut self, key: &str) -> &mut Self
    where
        Self: Sized,
    {
        self.extensions_mut().remove(key);
        self
    }

    fn with_extension(
        mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Self, ModelError>
    where
        Self: Sized,
    {
        self.extensions_mut().insert(key, value)?;
        Ok(self)
    }
}
