//! Fragments: the partial API descriptions a scanner hands to the merge
//! engine, and their JSON / YAML loading.
//!
//! A fragment file holds one fragment object or a list of them:
//!
//! ```yaml
//! - scope: document_default
//!   document:
//!     info: { title: Airlines, version: "1.0" }
//! - scope: method
//!   declaring_type: BookingResource
//!   operation:
//!     path: /bookings/{id}
//!     method: get
//!     method_name: getBookingById
//!     summary: Get a booking
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ModelError, ParseError};
use crate::model::{Document, HttpMethod, Operation, ParameterLocation, Tag};
use crate::pointer;

/// Where a fragment was declared. Later variants take priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    DocumentDefault,
    Type,
    Method,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::DocumentDefault => "document-default",
            Scope::Type => "type",
            Scope::Method => "method",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    pub scope: Scope,

    /// Position among fragments of the same scope; higher wins.
    #[serde(default)]
    pub order: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declaring_type: Option<String>,

    #[serde(flatten)]
    pub body: FragmentBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentBody {
    Document(Box<Document>),
    Operation(Box<OperationFragment>),
}

impl Fragment {
    pub fn document(scope: Scope, document: Document) -> Self {
        Self {
            scope,
            order: 0,
            declaring_type: None,
            body: FragmentBody::Document(Box::new(document)),
        }
    }

    pub fn operation(scope: Scope, operation: OperationFragment) -> Self {
        Self {
            scope,
            order: 0,
            declaring_type: None,
            body: FragmentBody::Operation(Box::new(operation)),
        }
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = order;
        self
    }

    pub fn with_declaring_type(mut self, declaring_type: impl Into<String>) -> Self {
        self.declaring_type = Some(declaring_type.into());
        self
    }
}

/// Operation-level declarations. Without `path` and `method` the fragment
/// applies to every operation in its reach: all operations for
/// document-default scope, the operations of its declaring type for type
/// scope.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OperationFragment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<HttpMethod>,

    /// Name of the handler the operation was scanned from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method_name: Option<String>,

    /// Tags defined here are applied to the operation and added to the
    /// document's top-level tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tag_definitions: Vec<Tag>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hidden: Vec<Hidden>,

    #[serde(flatten)]
    pub operation: Operation,
}

impl OperationFragment {
    /// A fragment targeting one operation.
    pub fn at(path: impl Into<String>, method: HttpMethod, operation: Operation) -> Self {
        Self {
            path: Some(path.into()),
            method: Some(method),
            operation,
            ..Self::default()
        }
    }

    /// A fragment applying to every operation in its scope's reach.
    pub fn broadcast(operation: Operation) -> Self {
        Self {
            operation,
            ..Self::default()
        }
    }

    pub fn with_method_name(mut self, name: impl Into<String>) -> Self {
        self.method_name = Some(name.into());
        self
    }

    pub fn with_tag_definition(mut self, tag: Tag) -> Self {
        self.tag_definitions.push(tag);
        self
    }

    pub fn with_hidden(mut self, hidden: Hidden) -> Self {
        self.hidden.push(hidden);
        self
    }

    pub fn is_targeted(&self) -> bool {
        self.path.is_some() && self.method.is_some()
    }
}

/// Something a fragment hides from the merged output. Hidden always wins
/// regardless of scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hidden {
    Operation,
    Field(OperationField),
    Parameter {
        name: String,
        #[serde(rename = "in")]
        location: ParameterLocation,
    },
    Response(String),
    Tag(String),
    Callback(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationField {
    Summary,
    Description,
    OperationId,
    Deprecated,
    ExternalDocs,
    RequestBody,
    Tags,
    Servers,
    Security,
    Parameters,
    Callbacks,
}

/// Map-valued collections whose entries may not be null.
const MAP_COLLECTIONS: &[&str] = &[
    "schemas",
    "parameters",
    "requestBodies",
    "securitySchemes",
    "pathItems",
    "webhooks",
    "paths",
    "scopes",
    "callbacks",
    "headers",
    "examples",
    "links",
    "encoding",
    "content",
    "responses",
    "properties",
    "patternProperties",
    "dependentSchemas",
    "$defs",
    "variables",
];

/// Keys holding literal user data, never scanned.
const LITERAL_KEYS: &[&str] = &["value", "example", "default", "const", "enum"];

pub fn from_json(input: &str) -> Result<Vec<Fragment>, ParseError> {
    from_value(serde_json::from_str(input)?)
}

pub fn from_yaml(input: &str) -> Result<Vec<Fragment>, ParseError> {
    from_value(serde_yaml_ng::from_str(input)?)
}

/// Load one fragment or a list of fragments from a raw value.
///
/// Before typing, the raw value is checked and tidied:
/// - a `null` entry inside a map-valued collection is an `InvalidArgument`;
///   a `null` collection is treated as absent;
/// - when an object carries both `example` and an `examples` map, the key
///   written later wins.
pub fn from_value(mut value: Value) -> Result<Vec<Fragment>, ParseError> {
    prepare(&mut value)?;
    let fragments = match value {
        Value::Array(items) => items
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Fragment>, _>>()?,
        Value::Null => Vec::new(),
        other => vec![serde_json::from_value(other)?],
    };
    log::debug!("loaded {} fragments", fragments.len());
    Ok(fragments)
}

/// Apply the null and `example`/`examples` rules to a raw value in place.
pub(crate) fn prepare(value: &mut Value) -> Result<(), ModelError> {
    tidy(value, &mut Vec::new(), false)
}

/// `names` is set while walking a map whose keys are user-chosen names
/// (schema names, header names, status codes, callback expressions).
/// Keyword rules only apply to element objects.
fn tidy(value: &mut Value, location: &mut Vec<String>, names: bool) -> Result<(), ModelError> {
    match value {
        Value::Object(map) => {
            if !names {
                settle_example_keys(map, location);
                for name in MAP_COLLECTIONS {
                    check_collection(map, name, location)?;
                }
            }
            // A callback is itself keyed by expression.
            let entries_are_callbacks = names && location.last().is_some_and(|key| key == "callbacks");
            for (key, child) in map.iter_mut() {
                if !names && (LITERAL_KEYS.contains(&key.as_str()) || key.starts_with("x-")) {
                    continue;
                }
                let child_names = if names {
                    entries_are_callbacks
                } else {
                    MAP_COLLECTIONS.contains(&key.as_str())
                };
                location.push(key.clone());
                tidy(child, location, child_names)?;
                location.pop();
            }
        }
        Value::Array(items) => {
            for (i, item) in items.iter_mut().enumerate() {
                location.push(i.to_string());
                tidy(item, location, false)?;
                location.pop();
            }
        }
        _ => {}
    }
    Ok(())
}

fn check_collection(map: &mut Map<String, Value>, name: &str, location: &[String]) -> Result<(), ModelError> {
    match map.get(name) {
        Some(Value::Null) => {
            map.remove(name);
        }
        Some(Value::Object(entries)) => {
            if let Some((key, _)) = entries.iter().find(|(_, v)| v.is_null()) {
                let mut at = location.to_vec();
                at.extend([name.to_string(), key.clone()]);
                return Err(ModelError::InvalidArgument(format!(
                    "null entry in `{name}` at {}",
                    pointer::join(&at)
                )));
            }
        }
        _ => {}
    }
    Ok(())
}

fn settle_example_keys(map: &mut Map<String, Value>, location: &[String]) {
    let (Some(example_at), Some(examples_at)) = (
        map.keys().position(|k| k == "example"),
        map.keys().position(|k| k == "examples"),
    ) else {
        return;
    };
    if !map.get("examples").is_some_and(Value::is_object) {
        return;
    }
    let dropped = if example_at < examples_at { "example" } else { "examples" };
    log::debug!(
        "both `example` and `examples` at {}; keeping the later one",
        pointer::join(location)
    );
    map.shift_remove(dropped);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;

    #[test]
    fn loads_a_single_fragment_or_a_list() {
        let single = from_yaml(
            r#"
scope: method
declaring_type: BookingResource
operation:
  path: /bookings/{id}
  method: get
  method_name: getBookingById
  summary: Get a booking
"#,
        )
        .unwrap();
        assert_eq!(single.len(), 1);
        let FragmentBody::Operation(op) = &single[0].body else {
            panic!("expected an operation fragment");
        };
        assert_eq!(op.path.as_deref(), Some("/bookings/{id}"));
        assert_eq!(op.method, Some(HttpMethod::Get));
        assert_eq!(op.operation.summary(), Some("Get a booking"));
        assert_eq!(single[0].declaring_type.as_deref(), Some("BookingResource"));

        let list = from_json(r#"[{"scope": "document_default", "document": {"info": {"title": "t", "version": "1"}}}]"#).unwrap();
        assert!(matches!(list[0].body, FragmentBody::Document(_)));
    }

    #[test]
    fn null_map_entries_are_rejected() {
        let err = from_json(
            r#"{"scope": "method", "operation": {"path": "/a", "method": "get",
                "responses": {"200": {"description": "ok", "headers": {"X-Rate": null}}}}}"#,
        )
        .unwrap_err();
        match err {
            ParseError::Model(ModelError::InvalidArgument(message)) => {
                assert!(message.contains("/operation/responses/200/headers/X-Rate"), "{message}")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn null_list_entries_are_dropped() {
        let fragments = from_json(
            r#"{"scope": "method", "operation": {"path": "/a", "method": "get",
                "tags": ["a", null], "servers": null}}"#,
        )
        .unwrap();
        let FragmentBody::Operation(op) = &fragments[0].body else {
            panic!("expected an operation fragment");
        };
        assert_eq!(op.operation.tags(), ["a"]);
        assert!(op.operation.servers().is_empty());
    }

    #[test]
    fn later_example_key_wins() {
        let fragments = from_json(
            r#"{"scope": "method", "operation": {"path": "/a", "method": "post",
                "requestBody": {"content": {
                    "application/json": {"examples": {"one": {"value": 1}}, "example": 2},
                    "text/plain": {"example": "x", "examples": {"one": {"value": "y"}}}
                }}}}"#,
        )
        .unwrap();
        let FragmentBody::Operation(op) = &fragments[0].body else {
            panic!("expected an operation fragment");
        };
        let content = op.operation.request_body().unwrap().content();
        let json = &content["application/json"];
        assert_eq!(json.example(), Some(&serde_json::json!(2)));
        assert!(json.examples().is_empty());
        let text = &content["text/plain"];
        assert!(text.example().is_none());
        assert_eq!(text.examples().len(), 1);
    }

    #[test]
    fn entries_named_like_keywords_are_kept() {
        let fragments = from_json(
            r#"{"scope": "document_default", "document": {
                "info": {"title": "t", "version": "1"},
                "components": {
                    "schemas": {"example": {"type": "string"}, "examples": {"type": "object"}},
                    "headers": {"x-trace": {"schema": {"type": "string"}}}
                }}}"#,
        )
        .unwrap();
        let FragmentBody::Document(document) = &fragments[0].body else {
            panic!("expected a document fragment");
        };
        let schemas: Vec<_> = document.components().schemas().keys().collect();
        assert_eq!(schemas, ["example", "examples"]);
        assert!(document.components().headers().contains_key("x-trace"));
    }

    #[test]
    fn named_entries_are_still_checked_for_nulls() {
        let err = from_json(
            r#"{"scope": "document_default", "document": {
                "info": {"title": "t", "version": "1"},
                "components": {"schemas": {"example": {"properties": {"id": null}}}}}}"#,
        )
        .unwrap_err();
        match err {
            ParseError::Model(ModelError::InvalidArgument(message)) => {
                assert!(message.contains("/document/components/schemas/example/properties/id"), "{message}")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn literal_values_are_not_scanned() {
        let fragments = from_json(
            r#"{"scope": "method", "operation": {"path": "/a", "method": "get",
                "responses": {"200": {"description": "ok", "content": {"application/json":
                    {"example": {"headers": {"a": null}}}}}}}}"#,
        )
        .unwrap();
        assert_eq!(fragments.len(), 1);
    }

    #[test]
    fn hidden_markers_parse() {
        let fragments = from_yaml(
            r#"
scope: type
operation:
  hidden:
    - operation
    - field: summary
    - parameter: { name: id, in: query }
    - response: "404"
    - tag: internal
    - callback: onEvent
"#,
        )
        .unwrap();
        let FragmentBody::Operation(op) = &fragments[0].body else {
            panic!("expected an operation fragment");
        };
        assert_eq!(
            op.hidden,
            vec![
                Hidden::Operation,
                Hidden::Field(OperationField::Summary),
                Hidden::Parameter { name: "id".into(), location: ParameterLocation::Query },
                Hidden::Response("404".into()),
                Hidden::Tag("internal".into()),
                Hidden::Callback("onEvent".into()),
            ]
        );
    }
}
