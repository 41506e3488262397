use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::extensions::Extensions;
use super::media::{Content, Example, MediaType};
use super::reference::ComponentKind;
use super::schema::Schema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Query,
    Header,
    Path,
    Cookie,
}

impl ParameterLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
            ParameterLocation::Path => "path",
            ParameterLocation::Cookie => "cookie",
        }
    }
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterStyle {
    Matrix,
    Label,
    Form,
    Simple,
    SpaceDelimited,
    PipeDelimited,
    DeepObject,
}

/// Identity of a parameter inside an operation: `(name, in)` for concrete
/// parameters, the `$ref` target for reference cells.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParameterKey {
    Named(String, Option<ParameterLocation>),
    Reference(String),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub(crate) ref_path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) name: Option<String>,

    #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
    pub(crate) location: Option<ParameterLocation>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) required: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) deprecated: Option<bool>,

    #[serde(rename = "allowEmptyValue", skip_serializing_if = "Option::is_none")]
    pub(crate) allow_empty_value: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) style: Option<ParameterStyle>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) explode: Option<bool>,

    #[serde(rename = "allowReserved", skip_serializing_if = "Option::is_none")]
    pub(crate) allow_reserved: Option<bool>,

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

impl Parameter {
    /// A parameter at `location`. Path parameters start out required.
    pub fn new(name: impl Into<String>, location: ParameterLocation) -> Self {
        let mut parameter = Self {
            name: Some(name.into()),
            ..Self::default()
        };
        parameter.set_location(Some(location));
        parameter
    }

    pub fn query(name: impl Into<String>) -> Self {
        Self::new(name, ParameterLocation::Query)
    }

    pub fn path(name: impl Into<String>) -> Self {
        Self::new(name, ParameterLocation::Path)
    }

    pub fn header(name: impl Into<String>) -> Self {
        Self::new(name, ParameterLocation::Header)
    }

    pub fn cookie(name: impl Into<String>) -> Self {
        Self::new(name, ParameterLocation::Cookie)
    }

    string_field! {
        name, set_name, with_name;
        description, set_description, with_description;
    }

    flag_field! {
        deprecated, set_deprecated, with_deprecated;
        allow_empty_value, set_allow_empty_value, with_allow_empty_value;
        explode, set_explode, with_explode;
        allow_reserved, set_allow_reserved, with_allow_reserved;
    }

    value_field! {
        style: ParameterStyle, set_style, with_style;
    }

    pub fn location(&self) -> Option<ParameterLocation> {
        self.location
    }

    pub fn set_location(&mut self, location: Option<ParameterLocation>) -> &mut Self {
        self.location = location;
        if location == Some(ParameterLocation::Path) {
            self.required = Some(true);
        }
        self
    }

    pub fn with_location(mut self, location: ParameterLocation) -> Self {
        self.set_location(Some(location));
        self
    }

    /// The declared `required` value. Path parameters always report `true`.
    pub fn required(&self) -> Option<bool> {
        if self.location == Some(ParameterLocation::Path) {
            Some(true)
        } else {
            self.required
        }
    }

    /// Path parameters ignore attempts to make them optional.
    pub fn set_required(&mut self, required: Option<bool>) -> &mut Self {
        self.required = if self.location == Some(ParameterLocation::Path) {
            Some(true)
        } else {
            required
        };
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.set_required(Some(required));
        self
    }

    pub fn is_required(&self) -> bool {
        self.required().unwrap_or(false)
    }

    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }

    /// Setting a schema clears `content`.
    pub fn set_schema(&mut self, schema: Option<Schema>) -> &mut Self {
        if schema.is_some() {
            self.content.clear();
        }
        self.schema = schema;
        self
    }

    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.set_schema(Some(schema));
        self
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    /// Setting content clears `schema`.
    pub fn set_content(&mut self, content: Content) -> &mut Self {
        if !content.is_empty() {
            self.schema = None;
        }
        self.content = content;
        self
    }

    pub fn add_content(&mut self, media_type: impl Into<String>, media: MediaType) -> &mut Self {
        self.schema = None;
        self.content.insert(media_type.into(), media);
        self
    }

    pub fn remove_content(&mut self, media_type: &str) -> &mut Self {
        self.content.shift_remove(media_type);
        self
    }

    example_fields!();

    /// Merge identity: `$ref` for reference cells, `(name, in)` otherwise.
    pub fn key(&self) -> ParameterKey {
        match &self.ref_path {
            Some(target) => ParameterKey::Reference(target.clone()),
            None => ParameterKey::Named(self.name.clone().unwrap_or_default(), self.location),
        }
    }

    pub fn is_path(&self) -> bool {
        self.location == Some(ParameterLocation::Path)
    }

    /// Re-establish invariants on values that bypassed the setters.
    pub(crate) fn normalize(&mut self) {
        if self.is_path() && self.required != Some(true) {
            log::debug!(
                "forcing path parameter `{}` to required",
                self.name.as_deref().unwrap_or_default()
            );
            self.required = Some(true);
        }
        self.settle_examples();
    }
}

impl_extensible!(Parameter);
impl_referenceable!(Parameter => ComponentKind::Parameters);
