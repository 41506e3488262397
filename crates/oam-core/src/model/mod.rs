//! The OpenAPI 3.1 object model.
//!
//! Every element keeps its fields crate-private behind generated accessors,
//! carries an [`Extensions`] bag, and (when it can stand in for a component)
//! an optional `$ref` making it a reference cell.

#[macro_use]
mod macros;

pub mod components;
pub mod document;
pub mod extensions;
pub mod header;
pub mod info;
mod keyed;
pub(crate) mod lenient;
pub mod media;
pub mod operation;
pub mod parameter;
pub mod path_item;
pub mod reference;
pub mod request_body;
pub mod response;
pub mod schema;
pub mod security;
pub mod server;

pub use components::Components;
pub use document::{Document, OPENAPI_VERSION, SealOptions, SealedDocument, Tag};
pub use extensions::{Extensible, Extensions};
pub use header::{Header, HeaderStyle};
pub use info::{Contact, ExternalDocumentation, Info, License};
pub use media::{Content, Encoding, Example, MediaType};
pub use operation::{HttpMethod, Operation};
pub use parameter::{Parameter, ParameterKey, ParameterLocation, ParameterStyle};
pub use path_item::{Callback, PathItem, Paths};
pub use reference::{ComponentKind, Reference, Referenceable};
pub use request_body::RequestBody;
pub use response::{ApiResponse, ApiResponses, Link};
pub use schema::{AdditionalProperties, Discriminator, Schema, SchemaType, TypeSet};
pub use security::{
    ApiKeyLocation, OAuthFlow, OAuthFlows, SecurityRequirement, SecurityScheme,
    SecuritySchemeType,
};
pub use server::{Server, ServerVariable};

/// Replace `target` with `source` when `source` is set. Unset never overrides.
pub(crate) fn overlay_option<T: Clone>(target: &mut Option<T>, source: &Option<T>) {
    if source.is_some() {
        target.clone_from(source);
    }
}
