use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::extensions::Extensions;
use super::reference::ComponentKind;

/// Scheme name → ordered scope names. An empty scope list is allowed.
pub type SecurityRequirement = IndexMap<String, Vec<String>>;

/// Build a requirement for a single scheme.
pub fn requirement<I, S>(scheme: impl Into<String>, scopes: I) -> SecurityRequirement
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut requirement = SecurityRequirement::new();
    requirement.insert(scheme.into(), scopes.into_iter().map(Into::into).collect());
    requirement
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecuritySchemeType {
    #[serde(rename = "apiKey")]
    ApiKey,
    #[serde(rename = "http")]
    Http,
    #[serde(rename = "mutualTLS")]
    MutualTls,
    #[serde(rename = "oauth2")]
    OAuth2,
    #[serde(rename = "openIdConnect")]
    OpenIdConnect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiKeyLocation {
    Query,
    Header,
    Cookie,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SecurityScheme {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub(crate) ref_path: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub(crate) scheme_type: Option<SecuritySchemeType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) name: Option<String>,

    #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
    pub(crate) location: Option<ApiKeyLocation>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) scheme: Option<String>,

    #[serde(rename = "bearerFormat", skip_serializing_if = "Option::is_none")]
    pub(crate) bearer_format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) flows: Option<OAuthFlows>,

    #[serde(rename = "openIdConnectUrl", skip_serializing_if = "Option::is_none")]
    pub(crate) open_id_connect_url: Option<String>,

    #[serde(flatten)]
    pub(crate) extensions: Extensions,
}

impl SecurityScheme {
    pub fn new(scheme_type: SecuritySchemeType) -> Self {
        Self {
            scheme_type: Some(scheme_type),
            ..Self::default()
        }
    }

    pub fn api_key(name: impl Into<String>, location: ApiKeyLocation) -> Self {
        Self::new(SecuritySchemeType::ApiKey)
            .with_name(name)
            .with_location(location)
    }

    pub fn http(scheme: impl Into<String>) -> Self {
        Self::new(SecuritySchemeType::Http).with_scheme(scheme)
    }

    pub fn oauth2(flows: OAuthFlows) -> Self {
        Self::new(SecuritySchemeType::OAuth2).with_flows(flows)
    }

    string_field! {
        description, set_description, with_description;
        name, set_name, with_name;
        scheme, set_scheme, with_scheme;
        bearer_format, set_bearer_format, with_bearer_format;
        open_id_connect_url, set_open_id_connect_url, with_open_id_connect_url;
    }

    value_field! {
        scheme_type: SecuritySchemeType, set_scheme_type, with_scheme_type;
        location: ApiKeyLocation, set_location, with_location;
        flows: OAuthFlows, set_flows, with_flows;
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OAuthFlows {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) implicit: Option<OAuthFlow>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) password: Option<OAuthFlow>,

    #[serde(rename = "clientCredentials", skip_serializing_if = "Option::is_none")]
    pub(crate) client_credentials: Option<OAuthFlow>,

    #[serde(rename = "authorizationCode", skip_serializing_if = "Option::is_none")]
    pub(crate) authorization_code: Option<OAuthFlow>,

    #[serde(flatten)]
    pub(crate) extensions: Extensions,
}

impl OAuthFlows {
    value_field! {
        implicit: OAuthFlow, set_implicit, with_implicit;
        password: OAuthFlow, set_password, with_password;
        client_credentials: OAuthFlow, set_client_credentials, with_client_credentials;
        authorization_code: OAuthFlow, set_authorization_code, with_authorization_code;
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OAuthFlow {
    #[serde(rename = "authorizationUrl", skip_serializing_if = "Option::is_none")]
    pub(crate) authorization_url: Option<String>,

    #[serde(rename = "tokenUrl", skip_serializing_if = "Option::is_none")]
    pub(crate) token_url: Option<String>,

    #[serde(rename = "refreshUrl", skip_serializing_if = "Option::is_none")]
    pub(crate) refresh_url: Option<String>,

    // Required by the format even when empty.
    #[serde(default)]
    pub(crate) scopes: IndexMap<String, String>,

    #[serde(flatten)]
    pub(crate) extensions: Extensions,
}

impl OAuthFlow {
    string_field! {
        authorization_url, set_authorization_url, with_authorization_url;
        token_url, set_token_url, with_token_url;
        refresh_url, set_refresh_url, with_refresh_url;
    }

    map_field! {
        scopes: String, set_scopes, add_scope, remove_scope;
    }

    pub fn with_scope(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.scopes.insert(name.into(), description.into());
        self
    }
}

impl_extensible!(SecurityScheme, OAuthFlows, OAuthFlow);
impl_referenceable!(SecurityScheme => ComponentKind::SecuritySchemes);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn oauth2_scheme_serializes_flows() {
        let flows = OAuthFlows::default().with_implicit(
            OAuthFlow::default()
                .with_authorization_url("https://example.com/api/oauth/dialog")
                .with_scope("write:reviews", "modify reviews"),
        );
        let scheme = SecurityScheme::oauth2(flows).with_description("reviewoauth2 security");

        let value = serde_json::to_value(&scheme).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "oauth2",
                "description": "reviewoauth2 security",
                "flows": {
                    "implicit": {
                        "authorizationUrl": "https://example.com/api/oauth/dialog",
                        "scopes": {"write:reviews": "modify reviews"}
                    }
                }
            })
        );
    }

    #[test]
    fn requirement_allows_empty_scopes() {
        let req = requirement("airlinesRatingApp_auth", Vec::<String>::new());
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"airlinesRatingApp_auth": []})
        );
    }
}
