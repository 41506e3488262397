use serde::{Deserialize, Serialize};

use super::extensions::Extensions;
use super::overlay_option;

/// Info object describing the API.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Info {
    #[serde(default)]
    pub(crate) title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,

    #[serde(rename = "termsOfService", skip_serializing_if = "Option::is_none")]
    pub(crate) terms_of_service: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) contact: Option<Contact>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) license: Option<License>,

    #[serde(default)]
    pub(crate) version: String,

    #[serde(flatten)]
    pub(crate) extensions: Extensions,
}

impl Info {
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = title.into();
        self
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn set_version(&mut self, version: impl Into<String>) -> &mut Self {
        self.version = version.into();
        self
    }

    string_field! {
        summary, set_summary, with_summary;
        description, set_description, with_description;
        terms_of_service, set_terms_of_service, with_terms_of_service;
    }

    value_field! {
        contact: Contact, set_contact, with_contact;
        license: License, set_license, with_license;
    }

    /// Overlay the fields `other` declares on top of `self`.
    pub(crate) fn overlay(&mut self, other: &Info) {
        if !other.title.is_empty() {
            self.title = other.title.clone();
        }
        if !other.version.is_empty() {
            self.version = other.version.clone();
        }
        overlay_option(&mut self.summary, &other.summary);
        overlay_option(&mut self.description, &other.description);
        overlay_option(&mut self.terms_of_service, &other.terms_of_service);
        overlay_option(&mut self.contact, &other.contact);
        overlay_option(&mut self.license, &other.license);
        self.extensions.overlay(&other.extensions);
    }
}

/// Contact information.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Contact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) email: Option<String>,

    #[serde(flatten)]
    pub(crate) extensions: Extensions,
}

impl Contact {
    string_field! {
        name, set_name, with_name;
        url, set_url, with_url;
        email, set_email, with_email;
    }
}

/// License information.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct License {
    #[serde(default)]
    pub(crate) name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) url: Option<String>,

    #[serde(flatten)]
    pub(crate) extensions: Extensions,
}

impl License {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    string_field! {
        identifier, set_identifier, with_identifier;
        url, set_url, with_url;
    }
}

/// A pointer to documentation hosted elsewhere.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExternalDocumentation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,

    #[serde(default)]
    pub(crate) url: String,

    #[serde(flatten)]
    pub(crate) extensions: Extensions,
}

impl ExternalDocumentation {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    string_field! {
        description, set_description, with_description;
    }
}

impl_extensible!(Info, Contact, License, ExternalDocumentation);
