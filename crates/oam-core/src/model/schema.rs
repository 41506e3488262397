use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::extensions::Extensions;
use super::info::ExternalDocumentation;
use super::lenient;
use super::reference::ComponentKind;

/// A JSON Schema type keyword value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    Null,
}

/// The `type` field can be a single type or an array of types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeSet {
    Single(SchemaType),
    Multiple(Vec<SchemaType>),
}

impl TypeSet {
    pub fn contains(&self, ty: SchemaType) -> bool {
        match self {
            TypeSet::Single(t) => *t == ty,
            TypeSet::Multiple(types) => types.contains(&ty),
        }
    }
}

impl From<SchemaType> for TypeSet {
    fn from(ty: SchemaType) -> Self {
        TypeSet::Single(ty)
    }
}

impl From<Vec<SchemaType>> for TypeSet {
    fn from(types: Vec<SchemaType>) -> Self {
        TypeSet::Multiple(types)
    }
}

/// Discriminator for polymorphic schemas.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Discriminator {
    #[serde(rename = "propertyName", default)]
    pub(crate) property_name: String,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub(crate) mapping: IndexMap<String, String>,

    #[serde(flatten)]
    pub(crate) extensions: Extensions,
}

impl Discriminator {
    pub fn new(property_name: impl Into<String>) -> Self {
        Self {
            property_name: property_name.into(),
            ..Self::default()
        }
    }

    pub fn property_name(&self) -> &str {
        &self.property_name
    }

    map_field! {
        mapping: String, set_mapping, add_mapping, remove_mapping;
    }
}

/// `additionalProperties` can be a boolean or a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<Schema>),
}

impl From<bool> for AdditionalProperties {
    fn from(allowed: bool) -> Self {
        AdditionalProperties::Bool(allowed)
    }
}

impl From<Schema> for AdditionalProperties {
    fn from(schema: Schema) -> Self {
        AdditionalProperties::Schema(Box::new(schema))
    }
}

/// A JSON Schema object (OpenAPI 3.1 dialect).
///
/// In 3.1 `$ref` is an ordinary keyword, so a schema holding a reference may
/// carry sibling keywords; they are kept and serialized next to `$ref`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schema {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub(crate) ref_path: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub(crate) schema_type: Option<TypeSet>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,

    #[serde(rename = "default", skip_serializing_if = "Option::is_none")]
    pub(crate) default_value: Option<serde_json::Value>,

    #[serde(rename = "const", skip_serializing_if = "Option::is_none")]
    pub(crate) const_value: Option<serde_json::Value>,

    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) enum_values: Vec<serde_json::Value>,

    // Object keywords
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub(crate) properties: IndexMap<String, Schema>,

    #[serde(
        default,
        deserialize_with = "lenient::list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub(crate) required: Vec<String>,

    #[serde(
        rename = "additionalProperties",
        skip_serializing_if = "Option::is_none"
    )]
    pub(crate) additional_properties: Option<AdditionalProperties>,

    #[serde(
        rename = "dependentRequired",
        default,
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub(crate) dependent_required: IndexMap<String, Vec<String>>,

    #[serde(
        rename = "dependentSchemas",
        default,
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub(crate) dependent_schemas: IndexMap<String, Schema>,

    #[serde(rename = "minProperties", skip_serializing_if = "Option::is_none")]
    pub(crate) min_properties: Option<u64>,
    #[serde(rename = "maxProperties", skip_serializing_if = "Option::is_none")]
    pub(crate) max_properties: Option<u64>,

    // Array keywords
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) items: Option<Box<Schema>>,
    #[serde(rename = "minItems", skip_serializing_if = "Option::is_none")]
    pub(crate) min_items: Option<u64>,
    #[serde(rename = "maxItems", skip_serializing_if = "Option::is_none")]
    pub(crate) max_items: Option<u64>,
    #[serde(rename = "uniqueItems", skip_serializing_if = "Option::is_none")]
    pub(crate) unique_items: Option<bool>,

    // Composition
    #[serde(
        rename = "allOf",
        default,
        deserialize_with = "lenient::list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub(crate) all_of: Vec<Schema>,

    #[serde(
        rename = "oneOf",
        default,
        deserialize_with = "lenient::list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub(crate) one_of: Vec<Schema>,

    #[serde(
        rename = "anyOf",
        default,
        deserialize_with = "lenient::list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub(crate) any_of: Vec<Schema>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) not: Option<Box<Schema>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) discriminator: Option<Discriminator>,

    // Numeric keywords
    #[serde(rename = "multipleOf", skip_serializing_if = "Option::is_none")]
    pub(crate) multiple_of: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) maximum: Option<f64>,
    #[serde(rename = "exclusiveMinimum", skip_serializing_if = "Option::is_none")]
    pub(crate) exclusive_minimum: Option<f64>,
    #[serde(rename = "exclusiveMaximum", skip_serializing_if = "Option::is_none")]
    pub(crate) exclusive_maximum: Option<f64>,

    // String keywords
    #[serde(rename = "minLength", skip_serializing_if = "Option::is_none")]
    pub(crate) min_length: Option<u64>,
    #[serde(rename = "maxLength", skip_serializing_if = "Option::is_none")]
    pub(crate) max_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) pattern: Option<String>,
    #[serde(rename = "contentEncoding", skip_serializing_if = "Option::is_none")]
    pub(crate) content_encoding: Option<String>,
    #[serde(rename = "contentMediaType", skip_serializing_if = "Option::is_none")]
    pub(crate) content_media_type: Option<String>,

    // Annotations
    #[serde(rename = "readOnly", skip_serializing_if = "Option::is_none")]
    pub(crate) read_only: Option<bool>,
    #[serde(rename = "writeOnly", skip_serializing_if = "Option::is_none")]
    pub(crate) write_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) deprecated: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) examples: Vec<serde_json::Value>,
    #[serde(rename = "externalDocs", skip_serializing_if = "Option::is_none")]
    pub(crate) external_docs: Option<ExternalDocumentation>,

    #[serde(flatten)]
    pub(crate) extensions: Extensions,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// A schema with a single `type`.
    pub fn of_type(ty: SchemaType) -> Self {
        Self {
            schema_type: Some(TypeSet::Single(ty)),
            ..Self::default()
        }
    }

    string_field! {
        format, set_format, with_format;
        title, set_title, with_title;
        description, set_description, with_description;
        pattern, set_pattern, with_pattern;
        content_encoding, set_content_encoding, with_content_encoding;
        content_media_type, set_content_media_type, with_content_media_type;
    }

    flag_field! {
        unique_items, set_unique_items, with_unique_items;
        read_only, set_read_only, with_read_only;
        write_only, set_write_only, with_write_only;
        deprecated, set_deprecated, with_deprecated;
    }

    value_field! {
        schema_type: TypeSet, set_schema_type, with_schema_type;
        default_value: serde_json::Value, set_default_value, with_default_value;
        const_value: serde_json::Value, set_const_value, with_const_value;
        additional_properties: AdditionalProperties, set_additional_properties, with_additional_properties;
        discriminator: Discriminator, set_discriminator, with_discriminator;
        external_docs: ExternalDocumentation, set_external_docs, with_external_docs;
        minimum: f64, set_minimum, with_minimum;
        maximum: f64, set_maximum, with_maximum;
        exclusive_minimum: f64, set_exclusive_minimum, with_exclusive_minimum;
        exclusive_maximum: f64, set_exclusive_maximum, with_exclusive_maximum;
        multiple_of: f64, set_multiple_of, with_multiple_of;
        min_length: u64, set_min_length, with_min_length;
        max_length: u64, set_max_length, with_max_length;
        min_items: u64, set_min_items, with_min_items;
        max_items: u64, set_max_items, with_max_items;
        min_properties: u64, set_min_properties, with_min_properties;
        max_properties: u64, set_max_properties, with_max_properties;
    }

    list_field! {
        enum_values: serde_json::Value, set_enum_values, add_enum_value, remove_enum_value;
        required: String, set_required, add_required, remove_required;
        all_of: Schema, set_all_of, add_all_of, remove_all_of;
        one_of: Schema, set_one_of, add_one_of, remove_one_of;
        any_of: Schema, set_any_of, add_any_of, remove_any_of;
        examples: serde_json::Value, set_examples, add_example, remove_example;
    }

    map_field! {
        properties: Schema, set_properties, add_property, remove_property;
        dependent_required: Vec<String>, set_dependent_required, add_dependent_required, remove_dependent_required;
        dependent_schemas: Schema, set_dependent_schemas, add_dependent_schema, remove_dependent_schema;
    }

    /// Builder form of [`Schema::add_property`].
    pub fn with_property(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.properties.insert(name.into(), schema);
        self
    }

    /// Builder that adds `name` to `required`, keeping entries unique.
    pub fn with_required(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.required.contains(&name) {
            self.required.push(name);
        }
        self
    }

    pub fn items(&self) -> Option<&Schema> {
        self.items.as_deref()
    }

    pub fn set_items(&mut self, items: Option<Schema>) -> &mut Self {
        self.items = items.map(Box::new);
        self
    }

    pub fn with_items(mut self, items: Schema) -> Self {
        self.items = Some(Box::new(items));
        self
    }

    pub fn not_schema(&self) -> Option<&Schema> {
        self.not.as_deref()
    }

    pub fn set_not_schema(&mut self, not: Option<Schema>) -> &mut Self {
        self.not = not.map(Box::new);
        self
    }

    /// Names listed in `required` that have no matching entry in `properties`.
    pub fn undeclared_required(&self) -> Vec<&str> {
        self.required
            .iter()
            .filter(|name| !self.properties.contains_key(name.as_str()))
            .map(String::as_str)
            .collect()
    }
}

impl_extensible!(Schema, Discriminator);
impl_referenceable!(Schema => ComponentKind::Schemas);
