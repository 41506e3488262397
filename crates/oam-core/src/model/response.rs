use http::StatusCode;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::extensions::Extensions;
use super::header::Header;
use super::keyed;
use super::media::{Content, MediaType};
use super::reference::ComponentKind;
use super::server::Server;

pub const DEFAULT_RESPONSE_KEY: &str = "default";
pub const DEFAULT_RESPONSE_DESCRIPTION: &str = "default response";

/// The description a response receives when none was declared: the canonical
/// reason phrase of its status code, or `"default response"`.
pub fn default_description(code: &str) -> String {
    code.parse::<u16>()
        .ok()
        .and_then(|code| StatusCode::from_u16(code).ok())
        .and_then(|status| status.canonical_reason())
        .unwrap_or(DEFAULT_RESPONSE_DESCRIPTION)
        .to_string()
}

/// A design-time link between a response and another operation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Link {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub(crate) ref_path: Option<String>,

    #[serde(rename = "operationRef", skip_serializing_if = "Option::is_none")]
    pub(crate) operation_ref: Option<String>,

    #[serde(rename = "operationId", skip_serializing_if = "Option::is_none")]
    pub(crate) operation_id: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub(crate) parameters: IndexMap<String, serde_json::Value>,

    #[serde(rename = "requestBody", skip_serializing_if = "Option::is_none")]
    pub(crate) request_body: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) server: Option<Server>,

    #[serde(flatten)]
    pub(crate) extensions: Extensions,
}

impl Link {
    string_field! {
        operation_ref, set_operation_ref, with_operation_ref;
        operation_id, set_operation_id, with_operation_id;
        description, set_description, with_description;
    }

    value_field! {
        request_body: serde_json::Value, set_request_body, with_request_body;
        server: Server, set_server, with_server;
    }

    map_field! {
        parameters: serde_json::Value, set_parameters, add_parameter, remove_parameter;
    }
}

/// A single response from an API operation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ApiResponse {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub(crate) ref_path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub(crate) headers: IndexMap<String, Header>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub(crate) content: Content,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub(crate) links: IndexMap<String, Link>,

    #[serde(flatten)]
    pub(crate) extensions: Extensions,
}

impl ApiResponse {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Self::default()
        }
    }

    string_field! {
        description, set_description, with_description;
    }

    map_field! {
        headers: Header, set_headers, add_header, remove_header;
        content: MediaType, set_content, add_content, remove_content;
        links: Link, set_links, add_link, remove_link;
    }

    pub fn with_header(mut self, name: impl Into<String>, header: Header) -> Self {
        self.headers.insert(name.into(), header);
        self
    }

    pub fn with_content(mut self, media_type: impl Into<String>, media: MediaType) -> Self {
        self.content.insert(media_type.into(), media);
        self
    }

    pub(crate) fn normalize(&mut self) {
        for header in self.headers.values_mut() {
            header.settle_examples();
        }
        for media in self.content.values_mut() {
            media.settle_examples();
        }
    }
}

/// Responses of an operation keyed by status code (or `default`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApiResponses {
    pub(crate) entries: IndexMap<String, ApiResponse>,
    pub(crate) extensions: Extensions,
}

impl ApiResponses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, code: &str) -> Option<&ApiResponse> {
        self.entries.get(code)
    }

    pub fn get_mut(&mut self, code: &str) -> Option<&mut ApiResponse> {
        self.entries.get_mut(code)
    }

    /// Insert or replace a response. Replacing keeps the original position.
    pub fn add(&mut self, code: impl Into<String>, response: ApiResponse) -> &mut Self {
        self.entries.insert(code.into(), response);
        self
    }

    pub fn with(mut self, code: impl Into<String>, response: ApiResponse) -> Self {
        self.add(code, response);
        self
    }

    pub fn remove(&mut self, code: &str) -> &mut Self {
        self.entries.shift_remove(code);
        self
    }

    pub fn default_response(&self) -> Option<&ApiResponse> {
        self.entries.get(DEFAULT_RESPONSE_KEY)
    }

    pub fn set_default_response(&mut self, response: Option<ApiResponse>) -> &mut Self {
        match response {
            Some(response) => {
                self.entries.insert(DEFAULT_RESPONSE_KEY.to_string(), response);
            }
            None => {
                self.entries.shift_remove(DEFAULT_RESPONSE_KEY);
            }
        }
        self
    }

    pub fn entries(&self) -> &IndexMap<String, ApiResponse> {
        &self.entries
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ApiResponse)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.extensions.is_empty()
    }

    /// Give every concrete response without a description the default one
    /// for its code. Reference cells are left alone.
    pub fn fill_descriptions(&mut self) {
        for (code, response) in self.entries.iter_mut() {
            if response.ref_path.is_none() && response.description.is_none() {
                let description = default_description(code);
                log::debug!("response {code} has no description, using `{description}`");
                response.description = Some(description);
            }
        }
    }

    pub(crate) fn normalize(&mut self) {
        for response in self.entries.values_mut() {
            response.normalize();
        }
    }
}

impl Serialize for ApiResponses {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        keyed::serialize(serializer, None, &self.entries, &self.extensions)
    }
}

impl<'de> Deserialize<'de> for ApiResponses {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let parts = keyed::deserialize(deserializer, "responses", false)?;
        Ok(Self {
            entries: parts.entries,
            extensions: parts.extensions,
        })
    }
}

impl_extensible!(Link, ApiResponse, ApiResponses);
impl_referenceable!(
    Link => ComponentKind::Links,
    ApiResponse => ComponentKind::Responses,
);
