use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::extensions::Extensions;

/// A server variable for URL templates.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ServerVariable {
    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) enum_values: Vec<String>,

    #[serde(default)]
    pub(crate) default: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,

    #[serde(flatten)]
    pub(crate) extensions: Extensions,
}

impl ServerVariable {
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            default: default.into(),
            ..Self::default()
        }
    }

    pub fn default_value(&self) -> &str {
        &self.default
    }

    pub fn set_default_value(&mut self, default: impl Into<String>) -> &mut Self {
        self.default = default.into();
        self
    }

    pub fn with_enum_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = values.into_iter().map(Into::into).collect();
        self
    }

    string_field! {
        description, set_description, with_description;
    }

    list_field! {
        enum_values: String, set_enum_values, add_enum_value, remove_enum_value;
    }
}

/// A server URL definition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Server {
    #[serde(default)]
    pub(crate) url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub(crate) variables: IndexMap<String, ServerVariable>,

    #[serde(flatten)]
    pub(crate) extensions: Extensions,
}

impl Server {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn set_url(&mut self, url: impl Into<String>) -> &mut Self {
        self.url = url.into();
        self
    }

    pub fn with_variable(mut self, name: impl Into<String>, variable: ServerVariable) -> Self {
        self.variables.insert(name.into(), variable);
        self
    }

    string_field! {
        description, set_description, with_description;
    }

    map_field! {
        variables: ServerVariable, set_variables, add_variable, remove_variable;
    }

    /// Names of the `{var}` placeholders in the URL, in order of appearance.
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names = Vec::new();
        let mut rest = self.url.as_str();
        while let Some(start) = rest.find('{') {
            let after = &rest[start + 1..];
            match after.find('}') {
                Some(end) => {
                    names.push(&after[..end]);
                    rest = &after[end + 1..];
                }
                None => break,
            }
        }
        names
    }
}

impl From<&str> for Server {
    fn from(url: &str) -> Self {
        Server::new(url)
    }
}

impl_extensible!(Server, ServerVariable);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_url_placeholders() {
        let server = Server::new("https://{username}.example.com:{port}/{basePath}");
        assert_eq!(server.placeholders(), vec!["username", "port", "basePath"]);
        assert!(Server::new("http://localhost:9080").placeholders().is_empty());
    }

    #[test]
    fn variables_keep_declaration_order() {
        let mut server = Server::new("{protocol}://{host}");
        server
            .add_variable("protocol", ServerVariable::new("https"))
            .add_variable("host", ServerVariable::new("localhost"))
            .remove_variable("missing");
        let names: Vec<_> = server.variables().keys().cloned().collect();
        assert_eq!(names, vec!["protocol", "host"]);
    }
}
