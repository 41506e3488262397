//! OpenAPI 3.1 document model with scoped fragment merging and `$ref`
//! resolution.
//!
//! Fragments declared at document-default, type and method scope are merged
//! by [`merge::merge`] into a [`Document`], which is sealed into an immutable
//! [`SealedDocument`] that resolves references through a [`NodeRegistry`].

pub mod config;
pub mod error;
pub mod fragment;
pub mod merge;
pub mod model;
pub mod naming;
pub mod parse;
pub mod pointer;
pub mod registry;
pub mod render;
pub mod resolve;
pub mod validate;

pub use error::{Error, MergeError, ModelError, ParseError, ResolveError};
pub use fragment::{Fragment, Scope};
pub use model::{Document, SealOptions, SealedDocument};
pub use registry::NodeRegistry;
pub use resolve::Resolver;

/// Merge `fragments`, apply the configured server overrides and seal the
/// result.
pub fn build(fragments: &[Fragment], config: &config::OamConfig) -> Result<SealedDocument, Error> {
    let mut document = merge::merge(fragments, &merge::MergeOptions::from(config))?;
    merge::apply_server_overrides(&mut document, &config.servers);
    let sealed = document.seal_with(&SealOptions {
        fill_response_descriptions: config.merge.default_response_descriptions,
        max_chain: config.resolver.max_chain,
    })?;
    Ok(sealed)
}
