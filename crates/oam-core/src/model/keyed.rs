//! Serde support for the OpenAPI "patterned field" maps (`Paths`,
//! `Responses`, `Callback`): arbitrary keys map to entries, while `x-*` keys
//! carry extensions and an optional `$ref` makes the map a reference cell.

use std::fmt;
use std::marker::PhantomData;

use indexmap::IndexMap;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::extensions::Extensions;

pub(crate) const REF_KEY: &str = "$ref";

pub(crate) fn serialize<S, T>(
    serializer: S,
    ref_path: Option<&str>,
    entries: &IndexMap<String, T>,
    extensions: &Extensions,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize,
{
    let len = entries.len() + extensions.len() + usize::from(ref_path.is_some());
    let mut map = serializer.serialize_map(Some(len))?;
    if let Some(target) = ref_path {
        map.serialize_entry(REF_KEY, target)?;
    }
    for (key, entry) in entries {
        map.serialize_entry(key, entry)?;
    }
    for (key, value) in extensions.iter() {
        map.serialize_entry(key, value)?;
    }
    map.end()
}

pub(crate) struct Parts<T> {
    pub ref_path: Option<String>,
    pub entries: IndexMap<String, T>,
    pub extensions: Extensions,
}

/// Deserialize a patterned map. `allow_ref` controls whether `$ref` is a
/// reference target or an ordinary entry key.
pub(crate) fn deserialize<'de, D, T>(
    deserializer: D,
    what: &'static str,
    allow_ref: bool,
) -> Result<Parts<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    deserializer.deserialize_map(PartsVisitor {
        what,
        allow_ref,
        marker: PhantomData,
    })
}

struct PartsVisitor<T> {
    what: &'static str,
    allow_ref: bool,
    marker: PhantomData<T>,
}

impl<'de, T: Deserialize<'de>> Visitor<'de> for PartsVisitor<T> {
    type Value = Parts<T>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a {} object", self.what)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut parts = Parts {
            ref_path: None,
            entries: IndexMap::new(),
            extensions: Extensions::new(),
        };
        while let Some(key) = map.next_key::<String>()? {
            if self.allow_ref && key == REF_KEY {
                parts.ref_path = Some(map.next_value()?);
            } else if Extensions::is_valid_key(&key) {
                let value: serde_json::Value = map.next_value()?;
                parts.extensions.insert(key, value).map_err(de::Error::custom)?;
            } else {
                let entry: T = map.next_value()?;
                parts.entries.insert(key, entry);
            }
        }
        Ok(parts)
    }
}
