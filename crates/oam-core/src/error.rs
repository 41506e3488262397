use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported OpenAPI version: {0}")]
    UnsupportedVersion(String),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Malformed input handed to a model mutator or found at the fragment boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid extension key `{0}`: extension keys must start with `x-`")]
    InvalidExtensionKey(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("duplicate name: {0} is already bound to a different element")]
    DuplicateName(String),

    #[error("unresolved reference: {0}")]
    UnresolvedReference(String),

    #[error("circular reference detected: {}", .0.join(" -> "))]
    CyclicReference(Vec<String>),

    #[error("reference chain starting at {address} exceeds {limit} links")]
    ReferenceChainTooLong { address: String, limit: usize },

    #[error("invalid reference format: {0}")]
    InvalidReference(String),

    #[error("reference {address} points to a {found}, expected a {expected}")]
    KindMismatch {
        address: String,
        expected: &'static str,
        found: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    #[error(
        "conflicting declarations of path parameter `{name}` for {method} {path} at {scope} scope: required={first} vs required={second}"
    )]
    ConflictingIdentity {
        path: String,
        method: String,
        scope: String,
        name: String,
        first: bool,
        second: bool,
    },

    #[error("{0} fragment is missing its target {1}")]
    MissingTarget(String, &'static str),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("merge error: {0}")]
    Merge(#[from] MergeError),

    #[error("render failed: {0}")]
    Render(String),
}
