use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::extensions::Extensions;
use super::info::ExternalDocumentation;
use super::lenient;
use super::parameter::{Parameter, ParameterKey};
use super::path_item::Callback;
use super::request_body::RequestBody;
use super::response::{ApiResponse, ApiResponses};
use super::security::SecurityRequirement;
use super::server::Server;
use crate::error::ModelError;

/// The HTTP methods a path item can hold an operation for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Put,
        HttpMethod::Post,
        HttpMethod::Delete,
        HttpMethod::Options,
        HttpMethod::Head,
        HttpMethod::Patch,
        HttpMethod::Trace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Put => "put",
            HttpMethod::Post => "post",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Patch => "patch",
            HttpMethod::Trace => "trace",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        HttpMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == lower)
            .ok_or_else(|| ModelError::InvalidArgument(format!("unknown HTTP method `{s}`")))
    }
}

/// A single API operation on a path.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Operation {
    #[serde(
        default,
        deserialize_with = "lenient::list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub(crate) tags: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,

    #[serde(rename = "externalDocs", skip_serializing_if = "Option::is_none")]
    pub(crate) external_docs: Option<ExternalDocumentation>,

    #[serde(rename = "operationId", skip_serializing_if = "Option::is_none")]
    pub(crate) operation_id: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient::list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub(crate) parameters: Vec<Parameter>,

    #[serde(rename = "requestBody", skip_serializing_if = "Option::is_none")]
    pub(crate) request_body: Option<RequestBody>,

    #[serde(default, skip_serializing_if = "ApiResponses::is_empty")]
    pub(crate) responses: ApiResponses,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub(crate) callbacks: IndexMap<String, Callback>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) deprecated: Option<bool>,

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
    pub(crate) servers: Vec<Server>,

    #[serde(flatten)]
    pub(crate) extensions: Extensions,
}

impl Operation {
    pub fn new() -> Self {
        Self::default()
    }

    string_field! {
        summary, set_summary, with_summary;
        description, set_description, with_description;
        operation_id, set_operation_id, with_operation_id;
    }

    flag_field! {
        deprecated, set_deprecated, with_deprecated;
    }

    value_field! {
        external_docs: ExternalDocumentation, set_external_docs, with_external_docs;
        request_body: RequestBody, set_request_body, with_request_body;
    }

    list_field! {
        tags: String, set_tags, add_tag, remove_tag;
        servers: Server, set_servers, add_server, remove_server;
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn set_parameters(&mut self, parameters: Vec<Parameter>) -> &mut Self {
        self.parameters = parameters;
        self
    }

    map_field! {
        callbacks: Callback, set_callbacks, add_callback, remove_callback;
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Add a parameter, replacing one with the same identity in place.
    pub fn add_parameter(&mut self, parameter: Parameter) -> &mut Self {
        let key = parameter.key();
        match self.parameters.iter_mut().find(|p| p.key() == key) {
            Some(existing) => *existing = parameter,
            None => self.parameters.push(parameter),
        }
        self
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.add_parameter(parameter);
        self
    }

    pub fn parameter(&self, key: &ParameterKey) -> Option<&Parameter> {
        self.parameters.iter().find(|p| &p.key() == key)
    }

    pub fn remove_parameter(&mut self, key: &ParameterKey) -> &mut Self {
        self.parameters.retain(|p| &p.key() != key);
        self
    }

    pub fn responses(&self) -> &ApiResponses {
        &self.responses
    }

    pub fn responses_mut(&mut self) -> &mut ApiResponses {
        &mut self.responses
    }

    pub fn set_responses(&mut self, responses: ApiResponses) -> &mut Self {
        self.responses = responses;
        self
    }

    pub fn with_response(mut self, code: impl Into<String>, response: ApiResponse) -> Self {
        self.responses.add(code, response);
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

    pub fn with_security(mut self, requirement: SecurityRequirement) -> Self {
        self.add_security(requirement);
        self
    }

    pub fn remove_security(&mut self, requirement: &SecurityRequirement) -> &mut Self {
        if let Some(list) = self.security.as_mut() {
            list.retain(|r| r != requirement);
        }
        self
    }

    pub(crate) fn normalize(&mut self) {
        for parameter in &mut self.parameters {
            parameter.normalize();
        }
        if let Some(body) = self.request_body.as_mut() {
            body.normalize();
        }
        self.responses.normalize();
        for callback in self.callbacks.values_mut() {
            callback.normalize();
        }
    }
}

impl_extensible!(Operation);
