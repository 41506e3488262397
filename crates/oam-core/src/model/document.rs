use std::collections::HashMap;
use std::ops::Deref;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};

use super::components::Components;
use super::extensions::Extensions;
use super::info::{ExternalDocumentation, Info};
use super::lenient;
use super::operation::{HttpMethod, Operation};
use super::path_item::{PathItem, Paths};
use super::security::SecurityRequirement;
use super::server::Server;
use crate::error::ResolveError;
use crate::registry::{DEFAULT_MAX_CHAIN, NodeRegistry};
use crate::resolve::Resolver;
use crate::validate;

pub const OPENAPI_VERSION: &str = "3.1.0";

fn default_openapi() -> String {
    OPENAPI_VERSION.to_string()
}

/// A tag used to group operations.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Tag {
    #[serde(default)]
    pub(crate) name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,

    #[serde(rename = "externalDocs", skip_serializing_if = "Option::is_none")]
    pub(crate) external_docs: Option<ExternalDocumentation>,

    #[serde(flatten)]
    pub(crate) extensions: Extensions,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    string_field! {
        description, set_description, with_description;
    }

    value_field! {
        external_docs: ExternalDocumentation, set_external_docs, with_external_docs;
    }
}

impl From<&str> for Tag {
    fn from(name: &str) -> Self {
        Tag::new(name)
    }
}

/// The root of an API description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default = "default_openapi")]
    pub(crate) openapi: String,

    #[serde(default)]
    pub(crate) info: Info,

    #[serde(rename = "jsonSchemaDialect", skip_serializing_if = "Option::is_none")]
    pub(crate) json_schema_dialect: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient::list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub(crate) servers: Vec<Server>,

    #[serde(default, skip_serializing_if = "Paths::is_empty")]
    pub(crate) paths: Paths,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub(crate) webhooks: IndexMap<String, PathItem>,

    #[serde(default, skip_serializing_if = "Components::is_empty")]
    pub(crate) components: Components,

    #[serde(
        default,
        deserialize_with = "lenient::optional_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub(crate) security: Option<Vec<SecurityRequirement>>,

    #[serde(
        default,
        deserialize_with = "lenient::list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub(crate) tags: Vec<Tag>,

    #[serde(rename = "externalDocs", skip_serializing_if = "Option::is_none")]
    pub(crate) external_docs: Option<ExternalDocumentation>,

    #[serde(flatten)]
    pub(crate) extensions: Extensions,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            openapi: default_openapi(),
            info: Info::default(),
            json_schema_dialect: None,
            servers: Vec::new(),
            paths: Paths::default(),
            webhooks: IndexMap::new(),
            components: Components::default(),
            security: None,
            tags: Vec::new(),
            external_docs: None,
            extensions: Extensions::default(),
        }
    }
}

impl Document {
    pub fn new(info: Info) -> Self {
        Self {
            info,
            ..Self::default()
        }
    }

    pub fn openapi(&self) -> &str {
        &self.openapi
    }

    pub fn set_openapi(&mut self, version: impl Into<String>) -> &mut Self {
        self.openapi = version.into();
        self
    }

    pub fn info(&self) -> &Info {
        &self.info
    }

    pub fn info_mut(&mut self) -> &mut Info {
        &mut self.info
    }

    pub fn set_info(&mut self, info: Info) -> &mut Self {
        self.info = info;
        self
    }

    string_field! {
        json_schema_dialect, set_json_schema_dialect, with_json_schema_dialect;
    }

    value_field! {
        external_docs: ExternalDocumentation, set_external_docs, with_external_docs;
    }

    list_field! {
        servers: Server, set_servers, add_server, remove_server;
    }

    map_field! {
        webhooks: PathItem, set_webhooks, add_webhook, remove_webhook;
    }

    pub fn paths(&self) -> &Paths {
        &self.paths
    }

    pub fn paths_mut(&mut self) -> &mut Paths {
        &mut self.paths
    }

    pub fn add_path(&mut self, path: impl Into<String>, item: PathItem) -> &mut Self {
        self.paths.add(path, item);
        self
    }

    pub fn with_path(mut self, path: impl Into<String>, item: PathItem) -> Self {
        self.paths.add(path, item);
        self
    }

    pub fn remove_path(&mut self, path: &str) -> &mut Self {
        self.paths.remove(path);
        self
    }

    pub fn components(&self) -> &Components {
        &self.components
    }

    pub fn components_mut(&mut self) -> &mut Components {
        &mut self.components
    }

    pub fn set_components(&mut self, components: Components) -> &mut Self {
        self.components = components;
        self
    }

    pub fn security(&self) -> Option<&[SecurityRequirement]> {
        self.security.as_deref()
    }

    pub fn set_security(&mut self, security: Option<Vec<SecurityRequirement>>) -> &mut Self {
        self.security = security;
        self
    }

    pub fn add_security(&mut self, requirement: SecurityRequirement) -> &mut Self {
        self.security.get_or_insert_with(Vec::new).push(requirement);
        self
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn set_tags(&mut self, tags: Vec<Tag>) -> &mut Self {
        self.tags = tags;
        self
    }

    pub fn add_tag(&mut self, tag: impl Into<Tag>) -> &mut Self {
        self.tags.push(tag.into());
        self
    }

    pub fn remove_tag(&mut self, name: &str) -> &mut Self {
        self.tags.retain(|tag| tag.name != name);
        self
    }

    pub fn tag(&self, name: &str) -> Option<&Tag> {
        self.tags.iter().find(|tag| tag.name == name)
    }

    /// Every operation under `paths`, in document order.
    pub fn operations(&self) -> impl Iterator<Item = (&str, HttpMethod, &Operation)> {
        self.paths.iter().flat_map(|(path, item)| {
            item.operations().map(move |(method, op)| (path, method, op))
        })
    }

    /// Visit every operation in the document: `paths`, `webhooks`,
    /// `components.pathItems`, `components.callbacks`, and the callbacks
    /// nested inside each of those operations. `location` is the path
    /// template, webhook name, component name or callback expression.
    pub fn for_each_operation<'a>(&'a self, mut visit: impl FnMut(&'a str, HttpMethod, &'a Operation)) {
        let items = self
            .paths
            .iter()
            .chain(self.webhooks.iter().map(|(name, item)| (name.as_str(), item)))
            .chain(self.components.path_items.iter().map(|(name, item)| (name.as_str(), item)));
        for (location, item) in items {
            visit_item(location, item, &mut visit);
        }
        for callback in self.components.callbacks.values() {
            for (expression, item) in &callback.expressions {
                visit_item(expression, item, &mut visit);
            }
        }
    }

    /// Mutable counterpart of [`Document::for_each_operation`].
    pub(crate) fn for_each_operation_mut(&mut self, mut visit: impl FnMut(&str, HttpMethod, &mut Operation)) {
        for (path, item) in self.paths.iter_mut() {
            visit_item_mut(path, item, &mut visit);
        }
        let items = self
            .webhooks
            .iter_mut()
            .chain(self.components.path_items.iter_mut());
        for (name, item) in items {
            visit_item_mut(name, item, &mut visit);
        }
        for callback in self.components.callbacks.values_mut() {
            for (expression, item) in callback.expressions.iter_mut() {
                visit_item_mut(expression, item, &mut visit);
            }
        }
    }

    /// Restore the model invariants on a document assembled from parsed input.
    pub fn normalize(&mut self) {
        for (_, item) in self.paths.iter_mut() {
            item.normalize();
        }
        for item in self.webhooks.values_mut() {
            item.normalize();
        }
        self.components.normalize();
    }

    /// Give every response without a description its default one, including
    /// responses of webhook, callback and component operations.
    pub fn fill_response_descriptions(&mut self) {
        self.for_each_operation_mut(|_, _, op| op.responses.fill_descriptions());
        for response in self.components.responses.values_mut() {
            if response.ref_path.is_none() && response.description.is_none() {
                response.description = Some(super::response::DEFAULT_RESPONSE_DESCRIPTION.to_string());
            }
        }
    }

    /// Seal with the default options.
    pub fn seal(self) -> Result<SealedDocument, ResolveError> {
        self.seal_with(&SealOptions::default())
    }

    /// Normalize, check name uniqueness, and freeze the document.
    pub fn seal_with(mut self, options: &SealOptions) -> Result<SealedDocument, ResolveError> {
        self.normalize();
        if options.fill_response_descriptions {
            self.fill_response_descriptions();
        }
        check_operation_ids(&self)?;
        let registered = NodeRegistry::from_document(&self)?.len();
        log::debug!("sealed document with {registered} addressable elements");

        for issue in validate::validate(&self) {
            log::warn!("{issue}");
        }

        Ok(SealedDocument {
            inner: Arc::new(self),
            max_chain: options.max_chain,
        })
    }
}

fn visit_item<'a>(location: &'a str, item: &'a PathItem, visit: &mut dyn FnMut(&'a str, HttpMethod, &'a Operation)) {
    for (method, op) in item.operations() {
        visit(location, method, op);
        for callback in op.callbacks.values() {
            for (expression, nested) in &callback.expressions {
                visit_item(expression, nested, visit);
            }
        }
    }
}

fn visit_item_mut(location: &str, item: &mut PathItem, visit: &mut dyn FnMut(&str, HttpMethod, &mut Operation)) {
    for (method, op) in item.operations_mut() {
        visit(location, method, op);
        for callback in op.callbacks.values_mut() {
            for (expression, nested) in callback.expressions.iter_mut() {
                visit_item_mut(expression, nested, visit);
            }
        }
    }
}

fn check_operation_ids(document: &Document) -> Result<(), ResolveError> {
    let mut seen: HashMap<&str, (&str, HttpMethod)> = HashMap::new();
    let mut duplicate = None;
    document.for_each_operation(|location, method, op| {
        let Some(id) = op.operation_id() else { return };
        if let Some((first_location, first_method)) = seen.insert(id, (location, method)) {
            duplicate.get_or_insert_with(|| {
                format!("operationId `{id}` used by {first_method} {first_location} and {method} {location}")
            });
        }
    });
    match duplicate {
        Some(message) => Err(ResolveError::DuplicateName(message)),
        None => Ok(()),
    }
}

/// Knobs for [`Document::seal_with`].
#[derive(Debug, Clone)]
pub struct SealOptions {
    pub fill_response_descriptions: bool,
    pub max_chain: usize,
}

impl Default for SealOptions {
    fn default() -> Self {
        Self {
            fill_response_descriptions: true,
            max_chain: DEFAULT_MAX_CHAIN,
        }
    }
}

/// An immutable, cheaply clonable document that can be shared across threads.
#[derive(Debug, Clone)]
pub struct SealedDocument {
    inner: Arc<Document>,
    max_chain: usize,
}

impl SealedDocument {
    pub fn document(&self) -> &Document {
        &self.inner
    }

    /// An address index over this document.
    pub fn registry(&self) -> Result<NodeRegistry<'_>, ResolveError> {
        Ok(NodeRegistry::from_document(&self.inner)?.with_max_chain(self.max_chain))
    }

    /// A pointer resolver over the serialized view of this document.
    pub fn resolver(&self) -> Result<Resolver, serde_json::Error> {
        Ok(Resolver::new(serde_json::to_value(&*self.inner)?).with_max_chain(self.max_chain))
    }

    /// Take the document back for further editing. Clones only when other
    /// handles are still alive.
    pub fn into_document(self) -> Document {
        Arc::unwrap_or_clone(self.inner)
    }
}

impl Deref for SealedDocument {
    type Target = Document;

    fn deref(&self) -> &Document {
        &self.inner
    }
}

impl Serialize for SealedDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.inner.serialize(serializer)
    }
}

impl_extensible!(Tag, Document);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::parameter::Parameter;
    use crate::model::path_item::Callback;
    use crate::model::response::ApiResponse;
    use serde_json::json;

    fn airlines() -> Document {
        Document::new(Info::new("AirlinesRatingApp API", "1.0")).with_path(
            "/bookings/{id}",
            PathItem::new().with_operation(
                HttpMethod::Get,
                Operation::new()
                    .with_operation_id("getBookingById")
                    .with_parameter(Parameter::path("id"))
                    .with_response("200", ApiResponse::default()),
            ),
        )
    }

    #[test]
    fn sealing_fills_response_descriptions() {
        let sealed = airlines().seal().unwrap();
        let op = sealed.paths().get("/bookings/{id}").unwrap().operation(HttpMethod::Get).unwrap();
        assert_eq!(op.responses().get("200").unwrap().description(), Some("OK"));
    }

    #[test]
    fn sealing_rejects_duplicate_operation_ids() {
        let mut doc = airlines();
        doc.add_path(
            "/bookings",
            PathItem::new().with_operation(HttpMethod::Get, Operation::new().with_operation_id("getBookingById")),
        );
        let err = doc.seal().unwrap_err();
        assert!(matches!(err, ResolveError::DuplicateName(_)));
    }

    #[test]
    fn operation_ids_are_unique_across_webhooks_and_callbacks() {
        let mut doc = airlines();
        doc.add_webhook(
            "newBooking",
            PathItem::new().with_operation(HttpMethod::Post, Operation::new().with_operation_id("getBookingById")),
        );
        assert!(matches!(doc.seal().unwrap_err(), ResolveError::DuplicateName(_)));

        let mut op = Operation::new().with_operation_id("subscribe");
        op.add_callback(
            "onStatus",
            Callback::new().with(
                "{$request.query.url}",
                PathItem::new().with_operation(HttpMethod::Post, Operation::new().with_operation_id("getBookingById")),
            ),
        );
        let mut doc = airlines();
        doc.add_path("/subscriptions", PathItem::new().with_operation(HttpMethod::Post, op));
        assert!(matches!(doc.seal().unwrap_err(), ResolveError::DuplicateName(_)));
    }

    #[test]
    fn sealing_fills_callback_and_component_responses() {
        let notify = || {
            Callback::new().with(
                "{$request.query.url}",
                PathItem::new().with_operation(HttpMethod::Post, Operation::new().with_response("200", ApiResponse::default())),
            )
        };
        let mut subscribe = Operation::new();
        subscribe.add_callback("onStatus", notify());
        let mut doc = airlines();
        doc.add_path("/subscriptions", PathItem::new().with_operation(HttpMethod::Post, subscribe));
        doc.components_mut().add_callback("Shared", notify());
        doc.components_mut().add_path_item(
            "Ping",
            PathItem::new().with_operation(HttpMethod::Get, Operation::new().with_response("204", ApiResponse::default())),
        );

        let sealed = doc.seal().unwrap();
        let value = serde_json::to_value(&sealed).unwrap();
        let nested = &value["paths"]["/subscriptions"]["post"]["callbacks"]["onStatus"]["{$request.query.url}"];
        assert_eq!(nested["post"]["responses"]["200"]["description"], json!("OK"));
        let shared = &value["components"]["callbacks"]["Shared"]["{$request.query.url}"];
        assert_eq!(shared["post"]["responses"]["200"]["description"], json!("OK"));
        assert_eq!(
            value["components"]["pathItems"]["Ping"]["get"]["responses"]["204"]["description"],
            json!("No Content")
        );
    }

    #[test]
    fn sealed_documents_are_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SealedDocument>();

        let sealed = airlines().seal().unwrap();
        let handle = sealed.clone();
        let title = std::thread::spawn(move || handle.info().title().to_string())
            .join()
            .unwrap();
        assert_eq!(title, "AirlinesRatingApp API");
    }

    #[test]
    fn parsed_path_parameters_become_required() {
        let doc: Document = serde_json::from_value(json!({
            "openapi": "3.1.0",
            "info": {"title": "t", "version": "1"},
            "paths": {"/r/{id}": {"get": {"parameters": [{"name": "id", "in": "path"}]}}}
        }))
        .unwrap();
        let sealed = doc.seal().unwrap();
        let value = serde_json::to_value(&sealed).unwrap();
        assert_eq!(value["paths"]["/r/{id}"]["get"]["parameters"][0]["required"], json!(true));
    }

    #[test]
    fn default_document_declares_openapi_31() {
        let value = serde_json::to_value(Document::default()).unwrap();
        assert_eq!(value, json!({"openapi": "3.1.0", "info": {"title": "", "version": ""}}));
    }
}
