use std::fmt;

use crate::error::ResolveError;
use crate::pointer;
use crate::registry::{Component, NodeRegistry};

/// Sections of the `components` object that can hold referenceable elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentKind {
    Schemas,
    Responses,
    Parameters,
    Examples,
    RequestBodies,
    Headers,
    SecuritySchemes,
    Links,
    Callbacks,
    PathItems,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 10] = [
        ComponentKind::Schemas,
        ComponentKind::Responses,
        ComponentKind::Parameters,
        ComponentKind::Examples,
        ComponentKind::RequestBodies,
        ComponentKind::Headers,
        ComponentKind::SecuritySchemes,
        ComponentKind::Links,
        ComponentKind::Callbacks,
        ComponentKind::PathItems,
    ];

    /// The section name as it appears in a pointer.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Schemas => "schemas",
            ComponentKind::Responses => "responses",
            ComponentKind::Parameters => "parameters",
            ComponentKind::Examples => "examples",
            ComponentKind::RequestBodies => "requestBodies",
            ComponentKind::Headers => "headers",
            ComponentKind::SecuritySchemes => "securitySchemes",
            ComponentKind::Links => "links",
            ComponentKind::Callbacks => "callbacks",
            ComponentKind::PathItems => "pathItems",
        }
    }

    pub fn from_section(section: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == section)
    }

    /// Singular element name, used in diagnostics.
    pub fn element_name(&self) -> &'static str {
        match self {
            ComponentKind::Schemas => "schema",
            ComponentKind::Responses => "response",
            ComponentKind::Parameters => "parameter",
            ComponentKind::Examples => "example",
            ComponentKind::RequestBodies => "request body",
            ComponentKind::Headers => "header",
            ComponentKind::SecuritySchemes => "security scheme",
            ComponentKind::Links => "link",
            ComponentKind::Callbacks => "callback",
            ComponentKind::PathItems => "path item",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expand a short component name to a full pointer for `kind`.
///
/// Anything that already looks like a pointer or URI (contains `#` or `/`)
/// is returned untouched.
pub fn expand_ref(kind: ComponentKind, target: &str) -> String {
    if target.contains('#') || target.contains('/') {
        target.to_string()
    } else {
        format!("#/components/{}/{}", kind.as_str(), pointer::escape(target))
    }
}

/// An element that can stand in for a component through `$ref`.
///
/// When `ref_path` is set the element is a reference cell: its remaining
/// fields are kept as overrides, but the target is authoritative.
pub trait Referenceable: Default {
    const KIND: ComponentKind;

    fn ref_path(&self) -> Option<&str>;

    fn set_ref_path(&mut self, target: Option<String>) -> &mut Self;

    fn is_reference(&self) -> bool {
        self.ref_path().is_some()
    }

    /// Point this element at `target`, expanding a short name.
    fn set_ref(&mut self, target: &str) -> &mut Self {
        self.set_ref_path(Some(expand_ref(Self::KIND, target)))
    }

    /// A new element that only holds a reference. The target is not checked,
    /// so forward references are fine.
    fn reference(target: &str) -> Self {
        let mut element = Self::default();
        element.set_ref(target);
        element
    }

    fn as_reference(&self) -> Option<Reference> {
        self.ref_path().map(Reference::new)
    }
}

/// A bare `$ref` target, resolved lazily against a [`NodeRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    target: String,
}

impl Reference {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Follow the reference (and any chain behind it) to a concrete element.
    pub fn resolve<'a, T: Component>(
        &self,
        registry: &NodeRegistry<'a>,
    ) -> Result<&'a T, ResolveError> {
        registry.resolve_address::<T>(&self.target)
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.target)
    }
}
