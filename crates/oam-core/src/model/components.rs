use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::extensions::Extensions;
use super::header::Header;
use super::media::Example;
use super::parameter::Parameter;
use super::path_item::{Callback, PathItem};
use super::reference::ComponentKind;
use super::request_body::RequestBody;
use super::response::{ApiResponse, Link};
use super::schema::Schema;
use super::security::SecurityScheme;

/// Reusable objects, addressed from elsewhere only through `$ref`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Components {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub(crate) schemas: IndexMap<String, Schema>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub(crate) responses: IndexMap<String, ApiResponse>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub(crate) parameters: IndexMap<String, Parameter>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub(crate) examples: IndexMap<String, Example>,

    #[serde(rename = "requestBodies", default, skip_serializing_if = "IndexMap::is_empty")]
    pub(crate) request_bodies: IndexMap<String, RequestBody>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub(crate) headers: IndexMap<String, Header>,

    #[serde(rename = "securitySchemes", default, skip_serializing_if = "IndexMap::is_empty")]
    pub(crate) security_schemes: IndexMap<String, SecurityScheme>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub(crate) links: IndexMap<String, Link>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub(crate) callbacks: IndexMap<String, Callback>,

    #[serde(rename = "pathItems", default, skip_serializing_if = "IndexMap::is_empty")]
    pub(crate) path_items: IndexMap<String, PathItem>,

    #[serde(flatten)]
    pub(crate) extensions: Extensions,
}

impl Components {
    pub fn new() -> Self {
        Self::default()
    }

    map_field! {
        schemas: Schema, set_schemas, add_schema, remove_schema;
        responses: ApiResponse, set_responses, add_response, remove_response;
        parameters: Parameter, set_parameters, add_parameter, remove_parameter;
        examples: Example, set_examples, add_example, remove_example;
        request_bodies: RequestBody, set_request_bodies, add_request_body, remove_request_body;
        headers: Header, set_headers, add_header, remove_header;
        security_schemes: SecurityScheme, set_security_schemes, add_security_scheme, remove_security_scheme;
        links: Link, set_links, add_link, remove_link;
        callbacks: Callback, set_callbacks, add_callback, remove_callback;
        path_items: PathItem, set_path_items, add_path_item, remove_path_item;
    }

    pub fn with_schema(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.schemas.insert(name.into(), schema);
        self
    }

    /// Number of entries declared under `kind`.
    pub fn count(&self, kind: ComponentKind) -> usize {
        match kind {
            ComponentKind::Schemas => self.schemas.len(),
            ComponentKind::Responses => self.responses.len(),
            ComponentKind::Parameters => self.parameters.len(),
            ComponentKind::Examples => self.examples.len(),
            ComponentKind::RequestBodies => self.request_bodies.len(),
            ComponentKind::Headers => self.headers.len(),
            ComponentKind::SecuritySchemes => self.security_schemes.len(),
            ComponentKind::Links => self.links.len(),
            ComponentKind::Callbacks => self.callbacks.len(),
            ComponentKind::PathItems => self.path_items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        ComponentKind::ALL.iter().all(|kind| self.count(*kind) == 0) && self.extensions.is_empty()
    }

    /// Overlay `other`: same-named entries are replaced in place, new ones
    /// appended.
    pub(crate) fn overlay(&mut self, other: &Components) {
        fn merge<T: Clone>(target: &mut IndexMap<String, T>, source: &IndexMap<String, T>) {
            for (name, value) in source {
                target.insert(name.clone(), value.clone());
            }
        }
        merge(&mut self.schemas, &other.schemas);
        merge(&mut self.responses, &other.responses);
        merge(&mut self.parameters, &other.parameters);
        merge(&mut self.examples, &other.examples);
        merge(&mut self.request_bodies, &other.request_bodies);
        merge(&mut self.headers, &other.headers);
        merge(&mut self.security_schemes, &other.security_schemes);
        merge(&mut self.links, &other.links);
        merge(&mut self.callbacks, &other.callbacks);
        merge(&mut self.path_items, &other.path_items);
        self.extensions.overlay(&other.extensions);
    }

    pub(crate) fn normalize(&mut self) {
        for parameter in self.parameters.values_mut() {
            parameter.normalize();
        }
        for header in self.headers.values_mut() {
            header.settle_examples();
        }
        for response in self.responses.values_mut() {
            response.normalize();
        }
        for body in self.request_bodies.values_mut() {
            body.normalize();
        }
        for callback in self.callbacks.values_mut() {
            callback.normalize();
        }
        for item in self.path_items.values_mut() {
            item.normalize();
        }
    }
}

impl_extensible!(Components);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::schema::SchemaType;

    #[test]
    fn overlay_replaces_in_place() {
        let mut base = Components::new()
            .with_schema("Airline", Schema::of_type(SchemaType::Object))
            .with_schema("Flight", Schema::of_type(SchemaType::Object));
        let update = Components::new()
            .with_schema("Airline", Schema::of_type(SchemaType::String))
            .with_schema("Booking", Schema::new());
        base.overlay(&update);

        let names: Vec<_> = base.schemas().keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Airline", "Flight", "Booking"]);
        assert_eq!(base.schemas()["Airline"], Schema::of_type(SchemaType::String));
    }

    #[test]
    fn empty_components_are_empty() {
        assert!(Components::new().is_empty());
        assert_eq!(Components::new().with_schema("A", Schema::new()).count(ComponentKind::Schemas), 1);
    }
}
