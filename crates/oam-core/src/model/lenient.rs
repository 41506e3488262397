//! Deserialization helpers for scanner-produced input.

use serde::{Deserialize, Deserializer};

/// Deserialize a list, silently dropping `null` entries.
pub(crate) fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let raw = Option::<Vec<Option<T>>>::deserialize(deserializer)?;
    let raw = raw.unwrap_or_default();
    let before = raw.len();
    let items: Vec<T> = raw.into_iter().flatten().collect();
    if items.len() != before {
        log::debug!("dropped {} null list entries", before - items.len());
    }
    Ok(items)
}

/// Like [`list`], but keeps the difference between an absent list and an
/// explicit empty one (`security: []` disables security).
pub(crate) fn optional_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let raw = Option::<Vec<Option<T>>>::deserialize(deserializer)?;
    Ok(raw.map(|items| items.into_iter().flatten().collect()))
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "super::list")]
        tags: Vec<String>,
    }

    #[test]
    fn null_entries_are_dropped() {
        let holder: Holder = serde_json::from_value(json!({"tags": ["a", null, "b"]})).unwrap();
        assert_eq!(holder.tags, vec!["a", "b"]);
    }

    #[test]
    fn null_list_is_empty() {
        let holder: Holder = serde_json::from_value(json!({"tags": null})).unwrap();
        assert!(holder.tags.is_empty());
    }

    #[derive(Deserialize)]
    struct OptionalHolder {
        #[serde(default, deserialize_with = "super::optional_list")]
        security: Option<Vec<String>>,
    }

    #[test]
    fn explicit_empty_list_is_kept() {
        let holder: OptionalHolder = serde_json::from_value(json!({"security": []})).unwrap();
        assert_eq!(holder.security, Some(vec![]));

        let holder: OptionalHolder = serde_json::from_value(json!({})).unwrap();
        assert_eq!(holder.security, None);
    }
}
