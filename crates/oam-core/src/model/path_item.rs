use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::extensions::Extensions;
use super::keyed;
use super::lenient;
use super::operation::{HttpMethod, Operation};
use super::parameter::Parameter;
use super::reference::ComponentKind;
use super::server::Server;

/// Operations available on a single path.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PathItem {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub(crate) ref_path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) get: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) put: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) post: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) delete: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) options: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) head: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) patch: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) trace: Option<Operation>,

    #[serde(
        default,
        deserialize_with = "lenient::list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub(crate) servers: Vec<Server>,

    #[serde(
        default,
        deserialize_with = "lenient::list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub(crate) parameters: Vec<Parameter>,

    #[serde(flatten)]
    pub(crate) extensions: Extensions,
}

impl PathItem {
    pub fn new() -> Self {
        Self::default()
    }

    string_field! {
        summary, set_summary, with_summary;
        description, set_description, with_description;
    }

    list_field! {
        servers: Server, set_servers, add_server, remove_server;
        parameters: Parameter, set_parameters, add_parameter, remove_parameter;
    }

    fn slot(&self, method: HttpMethod) -> &Option<Operation> {
        match method {
            HttpMethod::Get => &self.get,
            HttpMethod::Put => &self.put,
            HttpMethod::Post => &self.post,
            HttpMethod::Delete => &self.delete,
            HttpMethod::Options => &self.options,
            HttpMethod::Head => &self.head,
            HttpMethod::Patch => &self.patch,
            HttpMethod::Trace => &self.trace,
        }
    }

    fn slot_mut(&mut self, method: HttpMethod) -> &mut Option<Operation> {
        match method {
            HttpMethod::Get => &mut self.get,
            HttpMethod::Put => &mut self.put,
            HttpMethod::Post => &mut self.post,
            HttpMethod::Delete => &mut self.delete,
            HttpMethod::Options => &mut self.options,
            HttpMethod::Head => &mut self.head,
            HttpMethod::Patch => &mut self.patch,
            HttpMethod::Trace => &mut self.trace,
        }
    }

    pub fn operation(&self, method: HttpMethod) -> Option<&Operation> {
        self.slot(method).as_ref()
    }

    pub fn operation_mut(&mut self, method: HttpMethod) -> Option<&mut Operation> {
        self.slot_mut(method).as_mut()
    }

    /// Set or clear the operation for `method`. A path item holds at most one
    /// operation per method, so setting replaces.
    pub fn set_operation(&mut self, method: HttpMethod, operation: Option<Operation>) -> &mut Self {
        *self.slot_mut(method) = operation;
        self
    }

    pub fn with_operation(mut self, method: HttpMethod, operation: Operation) -> Self {
        self.set_operation(method, Some(operation));
        self
    }

    /// Operations in canonical method order.
    pub fn operations(&self) -> impl Iterator<Item = (HttpMethod, &Operation)> {
        HttpMethod::ALL
            .into_iter()
            .filter_map(move |method| self.operation(method).map(|op| (method, op)))
    }

    pub fn operations_mut(&mut self) -> impl Iterator<Item = (HttpMethod, &mut Operation)> {
        [
            (HttpMethod::Get, &mut self.get),
            (HttpMethod::Put, &mut self.put),
            (HttpMethod::Post, &mut self.post),
            (HttpMethod::Delete, &mut self.delete),
            (HttpMethod::Options, &mut self.options),
            (HttpMethod::Head, &mut self.head),
            (HttpMethod::Patch, &mut self.patch),
            (HttpMethod::Trace, &mut self.trace),
        ]
        .into_iter()
        .filter_map(|(method, slot)| slot.as_mut().map(|op| (method, op)))
    }

    pub fn has_operations(&self) -> bool {
        self.operations().next().is_some()
    }

    pub(crate) fn normalize(&mut self) {
        for parameter in &mut self.parameters {
            parameter.normalize();
        }
        for (_, operation) in self.operations_mut() {
            operation.normalize();
        }
    }
}

/// The `paths` object: literal path templates to path items.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Paths {
    pub(crate) entries: IndexMap<String, PathItem>,
    pub(crate) extensions: Extensions,
}

impl Paths {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &str) -> Option<&PathItem> {
        self.entries.get(path)
    }

    pub fn get_mut(&mut self, path: &str) -> Option<&mut PathItem> {
        self.entries.get_mut(path)
    }

    /// The path item at `path`, created empty at the end if missing.
    pub fn entry(&mut self, path: impl Into<String>) -> &mut PathItem {
        self.entries.entry(path.into()).or_default()
    }

    pub fn add(&mut self, path: impl Into<String>, item: PathItem) -> &mut Self {
        self.entries.insert(path.into(), item);
        self
    }

    pub fn remove(&mut self, path: &str) -> &mut Self {
        self.entries.shift_remove(path);
        self
    }

    pub fn entries(&self) -> &IndexMap<String, PathItem> {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PathItem)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut PathItem)> {
        self.entries.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.extensions.is_empty()
    }
}

impl Serialize for Paths {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        keyed::serialize(serializer, None, &self.entries, &self.extensions)
    }
}

impl<'de> Deserialize<'de> for Paths {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let parts = keyed::deserialize(deserializer, "paths", false)?;
        Ok(Self {
            entries: parts.entries,
            extensions: parts.extensions,
        })
    }
}

/// Out-of-band requests the API may make, keyed by runtime expression
/// (e.g. `{$request.query.callbackUrl}/data`). Keys are never interpreted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Callback {
    pub(crate) ref_path: Option<String>,
    pub(crate) expressions: IndexMap<String, PathItem>,
    pub(crate) extensions: Extensions,
}

impl Callback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, expression: &str) -> Option<&PathItem> {
        self.expressions.get(expression)
    }

    pub fn add(&mut self, expression: impl Into<String>, item: PathItem) -> &mut Self {
        self.expressions.insert(expression.into(), item);
        self
    }

    pub fn with(mut self, expression: impl Into<String>, item: PathItem) -> Self {
        self.add(expression, item);
        self
    }

    pub fn remove(&mut self, expression: &str) -> &mut Self {
        self.expressions.shift_remove(expression);
        self
    }

    pub fn expressions(&self) -> &IndexMap<String, PathItem> {
        &self.expressions
    }

    pub(crate) fn normalize(&mut self) {
        for item in self.expressions.values_mut() {
            item.normalize();
        }
    }
}

impl Serialize for Callback {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        keyed::serialize(
            serializer,
            self.ref_path.as_deref(),
            &self.expressions,
            &self.extensions,
        )
    }
}

impl<'de> Deserialize<'de> for Callback {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let parts = keyed::deserialize(deserializer, "callback", true)?;
        Ok(Self {
            ref_path: parts.ref_path,
            expressions: parts.entries,
            extensions: parts.extensions,
        })
    }
}

impl_extensible!(PathItem, Paths, Callback);
impl_referenceable!(
    PathItem => ComponentKind::PathItems,
    Callback => ComponentKind::Callbacks,
);
