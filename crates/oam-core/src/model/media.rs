use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::extensions::Extensions;
use super::header::Header;
use super::reference::ComponentKind;
use super::schema::Schema;

/// A named example value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Example {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub(crate) ref_path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) value: Option<serde_json::Value>,

    #[serde(rename = "externalValue", skip_serializing_if = "Option::is_none")]
    pub(crate) external_value: Option<String>,

    #[serde(flatten)]
    pub(crate) extensions: Extensions,
}

impl Example {
    pub fn of(value: impl Into<serde_json::Value>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    string_field! {
        summary, set_summary, with_summary;
        description, set_description, with_description;
        external_value, set_external_value, with_external_value;
    }

    value_field! {
        value: serde_json::Value, set_value, with_value;
    }
}

/// Encoding object for multipart and form request bodies.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Encoding {
    #[serde(rename = "contentType", skip_serializing_if = "Option::is_none")]
    pub(crate) content_type: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub(crate) headers: IndexMap<String, Header>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) style: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) explode: Option<bool>,

    #[serde(rename = "allowReserved", skip_serializing_if = "Option::is_none")]
    pub(crate) allow_reserved: Option<bool>,

    #[serde(flatten)]
    pub(crate) extensions: Extensions,
}

impl Encoding {
    string_field! {
        content_type, set_content_type, with_content_type;
        style, set_style, with_style;
    }

    flag_field! {
        explode, set_explode, with_explode;
        allow_reserved, set_allow_reserved, with_allow_reserved;
    }

    map_field! {
        headers: Header, set_headers, add_header, remove_header;
    }
}

/// A media type object: the payload description for one content type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MediaType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) schema: Option<Schema>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) example: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub(crate) examples: IndexMap<String, Example>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub(crate) encoding: IndexMap<String, Encoding>,

    #[serde(flatten)]
    pub(crate) extensions: Extensions,
}

impl MediaType {
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }

    pub fn set_schema(&mut self, schema: Option<Schema>) -> &mut Self {
        self.schema = schema;
        self
    }

    example_fields!();

    map_field! {
        encoding: Encoding, set_encoding, add_encoding, remove_encoding;
    }
}

/// Content map keyed by media type name (`application/json`, ...).
pub type Content = IndexMap<String, MediaType>;

impl_extensible!(Example, Encoding, MediaType);
impl_referenceable!(Example => ComponentKind::Examples);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn examples_clear_example() {
        let mut media = MediaType::default().with_example(json!({"id": 1}));
        media.add_example("first", Example::of(json!({"id": 2})));

        assert!(media.example().is_none());
        assert_eq!(media.examples().len(), 1);
        let value = serde_json::to_value(&media).unwrap();
        assert!(value.get("example").is_none());
    }

    #[test]
    fn example_clears_examples() {
        let mut media = MediaType::default();
        media.add_example("first", Example::of("a"));
        media.set_example(Some(json!("b")));

        assert!(media.examples().is_empty());
        assert_eq!(media.example(), Some(&json!("b")));
    }

    #[test]
    fn content_without_examples_serializes_neither() {
        let media = MediaType::default().with_schema(Schema::default());
        let value = serde_json::to_value(&media).unwrap();
        assert_eq!(value, json!({"schema": {}}));
    }
}
