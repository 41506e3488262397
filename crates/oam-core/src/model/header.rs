use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::extensions::Extensions;
use super::media::{Content, Example, MediaType};
use super::reference::ComponentKind;
use super::schema::Schema;

/// Serialization style of a header value. OpenAPI only allows `simple`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderStyle {
    #[default]
    Simple,
}

/// A response or encoding header.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Header {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub(crate) ref_path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) required: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) deprecated: Option<bool>,

    #[serde(rename = "allowEmptyValue", skip_serializing_if = "Option::is_none")]
    pub(crate) allow_empty_value: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) style: Option<HeaderStyle>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) explode: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) schema: Option<Schema>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) example: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub(crate) examples: IndexMap<String, Example>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub(crate) content: Content,

    #[serde(flatten)]
    pub(crate) extensions: Extensions,
}

impl Header {
    string_field! {
        description, set_description, with_description;
    }

    flag_field! {
        required, set_required, with_required;
        deprecated, set_deprecated, with_deprecated;
        allow_empty_value, set_allow_empty_value, with_allow_empty_value;
        explode, set_explode, with_explode;
    }

    value_field! {
        style: HeaderStyle, set_style, with_style;
        schema: Schema, set_schema, with_schema;
    }

    example_fields!();

    map_field! {
        content: MediaType, set_content, add_content, remove_content;
    }
}

impl_extensible!(Header);
impl_referenceable!(Header => ComponentKind::Headers);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::extensions::Extensible;
    use crate::model::reference::Referenceable;
    use serde_json::json;

    #[test]
    fn reference_with_description_override() {
        let mut header = Header::reference("Request-Limit");
        header.set_description(Some("Request-Limit reference".into()));
        header.add_extension("x-header", "test-header").unwrap();

        let value = serde_json::to_value(&header).unwrap();
        assert_eq!(
            value,
            json!({
                "$ref": "#/components/headers/Request-Limit",
                "description": "Request-Limit reference",
                "x-header": "test-header"
            })
        );
    }

    #[test]
    fn explicit_false_is_serialized() {
        let header = Header::default().with_required(false).with_style(HeaderStyle::Simple);
        let value = serde_json::to_value(&header).unwrap();
        assert_eq!(value, json!({"required": false, "style": "simple"}));
    }

    #[test]
    fn examples_last_set_wins() {
        let mut header = Header::default();
        header.add_example("one", Example::of(1));
        header.set_example(Some(json!(2)));
        assert!(header.examples().is_empty());

        header.add_example("three", Example::of(3));
        assert!(header.example().is_none());
    }
}
