use std::collections::HashSet;

use heck::{ToLowerCamelCase, ToPascalCase};
use serde::{Deserialize, Serialize};

use crate::model::HttpMethod;

/// How an operationId is derived for an operation that declares none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationIdStrategy {
    /// Leave the operationId unset.
    #[default]
    None,
    /// The handler's method name.
    Method,
    /// Declaring type plus method name.
    TypeMethod,
    /// Derived from HTTP method and path.
    Route,
}

/// Derive an operationId. Returns `None` when the strategy is
/// [`OperationIdStrategy::None`] or the inputs it needs are missing.
pub fn derive_operation_id(
    strategy: OperationIdStrategy,
    method: HttpMethod,
    path: &str,
    method_name: Option<&str>,
    declaring_type: Option<&str>,
) -> Option<String> {
    match strategy {
        OperationIdStrategy::None => None,
        OperationIdStrategy::Method => method_name.map(|name| name.to_lower_camel_case()),
        OperationIdStrategy::TypeMethod => match (declaring_type, method_name) {
            (Some(ty), Some(name)) => Some(format!("{}{}", short_type_name(ty).to_lower_camel_case(), name.to_pascal_case())),
            (None, Some(name)) => Some(name.to_lower_camel_case()),
            _ => None,
        },
        OperationIdStrategy::Route => Some(route_to_name(method, path)),
    }
}

/// Last segment of a qualified type name (`com.acme.PetResource` → `PetResource`).
fn short_type_name(ty: &str) -> &str {
    ty.rsplit(['.', ':']).find(|s| !s.is_empty()).unwrap_or(ty)
}

/// Make `candidate` unique against `taken` by appending `_1`, `_2`, ...
/// The chosen id is added to `taken`.
pub fn unique_operation_id(candidate: String, taken: &mut HashSet<String>) -> String {
    if taken.insert(candidate.clone()) {
        return candidate;
    }
    let mut n = 1;
    loop {
        let next = format!("{candidate}_{n}");
        if taken.insert(next.clone()) {
            log::debug!("operationId `{candidate}` already taken, using `{next}`");
            return next;
        }
        n += 1;
    }
}

/// Derive a camelCase operation name from HTTP method + path.
///
/// - `GET /users` → `listUsers`
/// - `GET /users/{userId}` → `getUser`
/// - `POST /users/{userId}/messages` → `createUsersMessages`
pub fn route_to_name(method: HttpMethod, path: &str) -> String {
    let mut resource_parts: Vec<&str> = Vec::new();
    let mut ends_with_param = false;

    for seg in path.split('/').filter(|s| !s.is_empty()) {
        if seg.starts_with('{') && seg.ends_with('}') {
            ends_with_param = true;
        } else {
            resource_parts.push(seg);
            ends_with_param = false;
        }
    }

    let prefix = match method {
        HttpMethod::Get if ends_with_param => "get",
        HttpMethod::Get => "list",
        HttpMethod::Post => "create",
        HttpMethod::Put => "update",
        other => other.as_str(),
    };

    let mut name = prefix.to_string();
    let last = resource_parts.len().saturating_sub(1);
    for (i, part) in resource_parts.iter().enumerate() {
        let word = if i == last && ends_with_param {
            singularize(part)
        } else {
            part.to_string()
        };
        name.push_str(&word.to_pascal_case());
    }
    name
}

fn singularize(word: &str) -> String {
    if word.ends_with("ies") && word.len() > 3 {
        format!("{}y", &word[..word.len() - 3])
    } else if word.ends_with("ses") || word.ends_with("xes") || word.ends_with("zes") {
        word[..word.len() - 2].to_string()
    } else if word.ends_with('s') && !word.ends_with("ss") && word.len() > 1 {
        word[..word.len() - 1].to_string()
    } else {
        word.to_string()
    }
}
