//! Whole-document loading. Input goes through the same null and
//! `example`/`examples` handling as fragments before it is typed.

use serde_json::Value;

use crate::error::ParseError;
use crate::fragment;
use crate::model::Document;

/// Parse an OpenAPI document from YAML.
pub fn from_yaml(input: &str) -> Result<Document, ParseError> {
    let value: Value = serde_yaml_ng::from_str(input)?;
    from_value(value)
}

/// Parse an OpenAPI document from JSON.
pub fn from_json(input: &str) -> Result<Document, ParseError> {
    let value: Value = serde_json::from_str(input)?;
    from_value(value)
}

pub fn from_value(mut value: Value) -> Result<Document, ParseError> {
    fragment::prepare(&mut value)?;
    let mut document: Document = serde_json::from_value(value)?;
    validate_version(&document)?;
    document.normalize();
    Ok(document)
}

fn validate_version(document: &Document) -> Result<(), ParseError> {
    if !document.openapi().starts_with("3.") {
        return Err(ParseError::UnsupportedVersion(document.openapi().to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HttpMethod, ParameterLocation};

    #[test]
    fn parses_yaml_and_repairs_path_parameters() {
        let doc = from_yaml(
            r#"
openapi: 3.1.0
info: {title: Bookings, version: "1"}
paths:
  /bookings/{id}:
    get:
      parameters:
        - {name: id, in: path, required: false}
      responses:
        "200": {description: ok}
"#,
        )
        .unwrap();
        let op = doc.paths().get("/bookings/{id}").unwrap().operation(HttpMethod::Get).unwrap();
        assert_eq!(op.parameters()[0].location(), Some(ParameterLocation::Path));
        assert!(op.parameters()[0].is_required());
    }

    #[test]
    fn rejects_swagger_2() {
        let err = from_json(r#"{"openapi": "2.0", "info": {"title": "t", "version": "1"}}"#).unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedVersion(v) if v == "2.0"));
    }

    #[test]
    fn null_map_entries_are_rejected() {
        let err = from_json(r#"{"openapi": "3.1.0", "info": {"title": "t", "version": "1"}, "components": {"schemas": {"Pet": null}}}"#)
            .unwrap_err();
        assert!(matches!(err, ParseError::Model(_)));
    }
}
