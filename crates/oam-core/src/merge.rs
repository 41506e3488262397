//! The merge engine: folds fragments declared at document-default, type and
//! method scope into one document.
//!
//! Fragments are applied in priority order (scope, then `order`, then input
//! position), so for every scalar the last declaration standing wins and an
//! unset value never overrides. Identity lists (tags, servers, security) are
//! unioned per scope, keyed maps replace entries in place, and hidden markers
//! are applied last.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use indexmap::IndexMap;

use crate::config::{OamConfig, ServerOverrides};
use crate::error::MergeError;
use crate::fragment::{Fragment, FragmentBody, Hidden, OperationField, Scope};
use crate::model::{
    Document, HttpMethod, Operation, ParameterKey, PathItem, SecurityRequirement, Server, Tag,
    overlay_option,
};
use crate::naming::{OperationIdStrategy, derive_operation_id, unique_operation_id};

#[derive(Debug, Clone)]
pub struct MergeOptions {
    pub operation_id_strategy: OperationIdStrategy,
    pub default_response_descriptions: bool,
    /// Overrides the `openapi` version of the merged document.
    pub openapi: Option<String>,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            operation_id_strategy: OperationIdStrategy::None,
            default_response_descriptions: true,
            openapi: None,
        }
    }
}

impl From<&OamConfig> for MergeOptions {
    fn from(config: &OamConfig) -> Self {
        Self {
            operation_id_strategy: config.merge.operation_id_strategy,
            default_response_descriptions: config.merge.default_response_descriptions,
            openapi: Some(config.openapi.clone()),
        }
    }
}

/// One operation-level declaration, borrowed from a fragment.
struct Contribution<'f> {
    scope: Scope,
    declaring_type: Option<&'f str>,
    path: Option<&'f str>,
    method: Option<HttpMethod>,
    method_name: Option<&'f str>,
    operation: &'f Operation,
    tag_definitions: &'f [Tag],
    hidden: &'f [Hidden],
}

impl Contribution<'_> {
    fn is_targeted(&self) -> bool {
        self.path.is_some() && self.method.is_some()
    }

    fn targets(&self, path: &str, method: HttpMethod) -> bool {
        self.path == Some(path) && self.method == Some(method)
    }

    /// Whether this contribution reaches the operation at `path`/`method`
    /// whose handlers were declared on `types`.
    fn applies_to(&self, path: &str, method: HttpMethod, types: &HashSet<&str>) -> bool {
        if self.path.is_some_and(|p| p != path) || self.method.is_some_and(|m| m != method) {
            return false;
        }
        if self.is_targeted() {
            return true;
        }
        match self.scope {
            Scope::DocumentDefault => true,
            Scope::Type => self.declaring_type.is_none_or(|ty| types.contains(ty)),
            Scope::Method => false,
        }
    }

    fn tag_names(&self) -> Vec<String> {
        let mut names = self.operation.tags.clone();
        names.extend(self.tag_definitions.iter().map(|tag| tag.name.clone()));
        names
    }
}

/// Merge `fragments` into a single document.
pub fn merge(fragments: &[Fragment], options: &MergeOptions) -> Result<Document, MergeError> {
    let mut ordered: Vec<&Fragment> = fragments.iter().collect();
    ordered.sort_by_key(|fragment| (fragment.scope, fragment.order));

    let mut document = Document::default();
    let mut contributions: Vec<Contribution<'_>> = Vec::new();
    let mut servers: Vec<(Scope, &[Server])> = Vec::new();
    let mut tags: Vec<(Scope, &[Tag])> = Vec::new();
    let mut security: Vec<(Scope, &[SecurityRequirement])> = Vec::new();

    for &fragment in &ordered {
        match &fragment.body {
            FragmentBody::Document(doc) => {
                log::debug!("merging {} document fragment", fragment.scope.as_str());
                overlay_document(&mut document, doc);
                servers.push((fragment.scope, doc.servers()));
                tags.push((fragment.scope, doc.tags()));
                if let Some(list) = doc.security() {
                    security.push((fragment.scope, list));
                }
                for (path, item) in doc.paths().iter() {
                    for (method, op) in item.operations() {
                        contributions.push(Contribution {
                            scope: fragment.scope,
                            declaring_type: fragment.declaring_type.as_deref(),
                            path: Some(path),
                            method: Some(method),
                            method_name: None,
                            operation: op,
                            tag_definitions: &[],
                            hidden: &[],
                        });
                    }
                }
            }
            FragmentBody::Operation(op) => {
                if fragment.scope == Scope::Method {
                    if op.path.is_none() {
                        return Err(MergeError::MissingTarget(fragment.scope.as_str().to_string(), "path"));
                    }
                    if op.method.is_none() {
                        return Err(MergeError::MissingTarget(fragment.scope.as_str().to_string(), "method"));
                    }
                }
                contributions.push(Contribution {
                    scope: fragment.scope,
                    declaring_type: fragment.declaring_type.as_deref(),
                    path: op.path.as_deref(),
                    method: op.method,
                    method_name: op.method_name.as_deref(),
                    operation: &op.operation,
                    tag_definitions: &op.tag_definitions,
                    hidden: &op.hidden,
                });
            }
        }
    }

    document.servers = union_by_scope(servers, |server| server.url.clone());
    document.tags = union_by_scope(tags, |tag| tag.name.clone());
    if !security.is_empty() {
        document.security = Some(union_security(security));
    }
    add_tag_definitions(&mut document, &contributions);

    // Operations exist where some contribution names both path and method,
    // in input order.
    let mut targets: IndexMap<(&str, HttpMethod), HashSet<&str>> = IndexMap::new();
    for fragment in fragments {
        for (path, method, declaring_type) in declared_targets(fragment) {
            let types = targets.entry((path, method)).or_default();
            if let Some(ty) = declaring_type {
                types.insert(ty);
            }
        }
    }

    let mut fully_hidden: HashMap<&str, bool> = HashMap::new();
    let mut sources: IndexMap<(String, HttpMethod), (Option<&str>, Option<&str>)> = IndexMap::new();

    for ((path, method), types) in &targets {
        let applicable: Vec<&Contribution<'_>> = contributions
            .iter()
            .filter(|c| c.applies_to(path, *method, types))
            .collect();

        let merged = merge_operation(path, *method, &applicable)?;
        let all_hidden = fully_hidden.entry(*path).or_insert(true);
        match merged {
            Some(operation) => {
                *all_hidden = false;
                let source = applicable
                    .iter()
                    .rev()
                    .find(|c| c.targets(path, *method) && c.method_name.is_some())
                    .map(|c| (c.method_name, c.declaring_type))
                    .unwrap_or_default();
                sources.insert((path.to_string(), *method), source);
                document.paths.entry(*path).set_operation(*method, Some(operation));
            }
            None => log::debug!("{method} {path} is hidden"),
        }
    }

    for (path, hidden) in fully_hidden {
        let declared_elsewhere = document.paths.get(path).is_some_and(|item| item.has_operations());
        if hidden && !declared_elsewhere {
            log::debug!("omitting {path}: every operation is hidden");
            document.paths.remove(path);
        }
    }

    assign_operation_ids(&mut document, options.operation_id_strategy, &sources);

    if let Some(version) = &options.openapi {
        document.openapi = version.clone();
    }
    document.normalize();
    if options.default_response_descriptions {
        document.fill_response_descriptions();
    }
    log::debug!(
        "merged {} fragments into {} paths",
        fragments.len(),
        document.paths.len()
    );
    Ok(document)
}

/// The `(path, method, declaring type)` targets a fragment names.
fn declared_targets(fragment: &Fragment) -> Vec<(&str, HttpMethod, Option<&str>)> {
    let declaring_type = fragment.declaring_type.as_deref();
    match &fragment.body {
        FragmentBody::Operation(op) => match (op.path.as_deref(), op.method) {
            (Some(path), Some(method)) => vec![(path, method, declaring_type)],
            _ => Vec::new(),
        },
        FragmentBody::Document(doc) => doc
            .paths()
            .iter()
            .flat_map(|(path, item)| item.operations().map(move |(method, _)| (path, method, declaring_type)))
            .collect(),
    }
}

/// Fold the contributions for one operation. `None` when it is hidden.
fn merge_operation(
    path: &str,
    method: HttpMethod,
    contributions: &[&Contribution<'_>],
) -> Result<Option<Operation>, MergeError> {
    check_path_parameters(path, method, contributions)?;

    let hidden: Vec<&Hidden> = contributions.iter().flat_map(|c| c.hidden).collect();
    if hidden.contains(&&Hidden::Operation) {
        return Ok(None);
    }

    let mut merged = Operation::default();
    for contribution in contributions {
        let op = contribution.operation;
        overlay_option(&mut merged.summary, &op.summary);
        overlay_option(&mut merged.description, &op.description);
        overlay_option(&mut merged.operation_id, &op.operation_id);
        overlay_option(&mut merged.deprecated, &op.deprecated);
        overlay_option(&mut merged.external_docs, &op.external_docs);
        overlay_option(&mut merged.request_body, &op.request_body);

        for parameter in &op.parameters {
            merged.add_parameter(parameter.clone());
        }
        for (code, response) in &op.responses.entries {
            merged.responses.entries.insert(code.clone(), response.clone());
        }
        merged.responses.extensions.overlay(&op.responses.extensions);
        for (name, callback) in &op.callbacks {
            merged.callbacks.insert(name.clone(), callback.clone());
        }
        merged.extensions.overlay(&op.extensions);
    }

    let tag_lists: Vec<(Scope, Vec<String>)> = contributions.iter().map(|c| (c.scope, c.tag_names())).collect();
    merged.tags = union_by_scope(
        tag_lists.iter().map(|(scope, names)| (*scope, names.as_slice())),
        String::clone,
    );
    merged.servers = union_by_scope(
        contributions.iter().map(|c| (c.scope, c.operation.servers.as_slice())),
        |server| server.url.clone(),
    );
    let security: Vec<(Scope, &[SecurityRequirement])> = contributions
        .iter()
        .filter_map(|c| c.operation.security.as_deref().map(|list| (c.scope, list)))
        .collect();
    if !security.is_empty() {
        merged.security = Some(union_security(security));
    }

    for marker in hidden {
        apply_hidden(&mut merged, marker);
    }
    merged.normalize();
    Ok(Some(merged))
}

/// Two declarations of the same path parameter at one scope must agree on an
/// explicit `required`.
fn check_path_parameters(
    path: &str,
    method: HttpMethod,
    contributions: &[&Contribution<'_>],
) -> Result<(), MergeError> {
    let mut seen: HashMap<(Scope, &str), bool> = HashMap::new();
    for contribution in contributions {
        for parameter in contribution.operation.parameters.iter().filter(|p| p.is_path()) {
            let (Some(name), Some(required)) = (parameter.name.as_deref(), parameter.required) else {
                continue;
            };
            match seen.get(&(contribution.scope, name)) {
                Some(&first) if first != required => {
                    return Err(MergeError::ConflictingIdentity {
                        path: path.to_string(),
                        method: method.to_string(),
                        scope: contribution.scope.as_str().to_string(),
                        name: name.to_string(),
                        first,
                        second: required,
                    });
                }
                Some(_) => {}
                None => {
                    seen.insert((contribution.scope, name), required);
                }
            }
        }
    }
    Ok(())
}

fn apply_hidden(op: &mut Operation, hidden: &Hidden) {
    match hidden {
        Hidden::Operation => {}
        Hidden::Field(field) => match field {
            OperationField::Summary => op.summary = None,
            OperationField::Description => op.description = None,
            OperationField::OperationId => op.operation_id = None,
            OperationField::Deprecated => op.deprecated = None,
            OperationField::ExternalDocs => op.external_docs = None,
            OperationField::RequestBody => op.request_body = None,
            OperationField::Tags => op.tags.clear(),
            OperationField::Servers => op.servers.clear(),
            OperationField::Security => op.security = None,
            OperationField::Parameters => op.parameters.clear(),
            OperationField::Callbacks => op.callbacks.clear(),
        },
        Hidden::Parameter { name, location } => {
            op.remove_parameter(&ParameterKey::Named(name.clone(), Some(*location)));
        }
        Hidden::Response(code) => {
            op.responses.remove(code);
        }
        Hidden::Tag(name) => {
            op.remove_tag(name);
        }
        Hidden::Callback(name) => {
            op.remove_callback(name);
        }
    }
}

/// Union of per-scope lists. Within a scope the first occurrence of a key
/// wins; a higher scope drops lower entries with the same key and appends
/// its own after the survivors.
fn union_by_scope<'a, T, K, I>(contributions: I, key: impl Fn(&T) -> K) -> Vec<T>
where
    T: Clone + 'a,
    K: Eq + Hash,
    I: IntoIterator<Item = (Scope, &'a [T])>,
{
    let mut result: Vec<T> = Vec::new();
    let mut level: Vec<T> = Vec::new();
    let mut level_keys: HashSet<K> = HashSet::new();
    let mut current: Option<Scope> = None;

    let flush = |result: &mut Vec<T>, level: &mut Vec<T>, level_keys: &mut HashSet<K>| {
        result.retain(|item| !level_keys.contains(&key(item)));
        result.append(level);
        level_keys.clear();
    };

    for (scope, items) in contributions {
        if current != Some(scope) {
            flush(&mut result, &mut level, &mut level_keys);
            current = Some(scope);
        }
        for item in items {
            if level_keys.insert(key(item)) {
                level.push(item.clone());
            }
        }
    }
    flush(&mut result, &mut level, &mut level_keys);
    result
}

/// Security requirements: an explicit empty list at some scope discards
/// what lower scopes declared.
fn union_security(contributions: Vec<(Scope, &[SecurityRequirement])>) -> Vec<SecurityRequirement> {
    let cutoff = contributions
        .iter()
        .filter(|(_, list)| list.is_empty())
        .map(|(scope, _)| *scope)
        .max();
    let kept = contributions
        .into_iter()
        .filter(|(scope, _)| cutoff.is_none_or(|cutoff| *scope >= cutoff));
    union_by_scope(kept, |requirement| {
        let mut key: Vec<_> = requirement
            .iter()
            .map(|(scheme, scopes)| (scheme.clone(), scopes.clone()))
            .collect();
        key.sort();
        key
    })
}

fn overlay_document(target: &mut Document, source: &Document) {
    target.info.overlay(&source.info);
    overlay_option(&mut target.json_schema_dialect, &source.json_schema_dialect);
    overlay_option(&mut target.external_docs, &source.external_docs);
    target.components.overlay(&source.components);
    for (name, item) in &source.webhooks {
        target.webhooks.insert(name.clone(), item.clone());
    }
    for (path, item) in source.paths.iter() {
        overlay_path_fields(target.paths.entry(path), item);
    }
    target.paths.extensions.overlay(&source.paths.extensions);
    target.extensions.overlay(&source.extensions);
}

/// Path-level fields only; operations are merged separately.
fn overlay_path_fields(target: &mut PathItem, source: &PathItem) {
    overlay_option(&mut target.ref_path, &source.ref_path);
    overlay_option(&mut target.summary, &source.summary);
    overlay_option(&mut target.description, &source.description);
    if !source.servers.is_empty() {
        target.servers = source.servers.clone();
    }
    for parameter in &source.parameters {
        let key = parameter.key();
        match target.parameters.iter_mut().find(|p| p.key() == key) {
            Some(existing) => *existing = parameter.clone(),
            None => target.parameters.push(parameter.clone()),
        }
    }
    target.extensions.overlay(&source.extensions);
}

/// Tags defined on operation fragments join the top-level tags; an existing
/// tag of the same name wins.
fn add_tag_definitions(document: &mut Document, contributions: &[Contribution<'_>]) {
    for tag in contributions.iter().flat_map(|c| c.tag_definitions) {
        if document.tag(&tag.name).is_none() {
            log::debug!("adding tag definition `{}`", tag.name);
            document.tags.push(tag.clone());
        }
    }
}

fn assign_operation_ids(
    document: &mut Document,
    strategy: OperationIdStrategy,
    sources: &IndexMap<(String, HttpMethod), (Option<&str>, Option<&str>)>,
) {
    if strategy == OperationIdStrategy::None {
        return;
    }
    let mut taken: HashSet<String> = HashSet::new();
    document.for_each_operation(|_, _, op| {
        if let Some(id) = &op.operation_id {
            taken.insert(id.clone());
        }
    });

    for (path, item) in document.paths.iter_mut() {
        for (method, op) in item.operations_mut() {
            if op.operation_id.is_some() {
                continue;
            }
            let (method_name, declaring_type) = sources
                .get(&(path.to_string(), method))
                .copied()
                .unwrap_or_default();
            if let Some(id) = derive_operation_id(strategy, method, path, method_name, declaring_type) {
                op.operation_id = Some(unique_operation_id(id, &mut taken));
            }
        }
    }
}

/// Replace servers according to configuration. Unknown paths and
/// operationIds are reported and skipped.
pub fn apply_server_overrides(document: &mut Document, overrides: &ServerOverrides) {
    if !overrides.global.is_empty() {
        document.servers = overrides.global.iter().map(|url| Server::new(url.as_str())).collect();
    }
    for (path, urls) in &overrides.paths {
        match document.paths.get_mut(path) {
            Some(item) => item.servers = urls.iter().map(|url| Server::new(url.as_str())).collect(),
            None => log::warn!("server override for unknown path `{path}`"),
        }
    }
    for (operation_id, urls) in &overrides.operations {
        let mut found = false;
        document.for_each_operation_mut(|_, _, op| {
            if op.operation_id.as_deref() == Some(operation_id.as_str()) {
                op.servers = urls.iter().map(|url| Server::new(url.as_str())).collect();
                found = true;
            }
        });
        if !found {
            log::warn!("server override for unknown operationId `{operation_id}`");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::OperationFragment;
    use crate::model::{ApiResponse, Info, Parameter, security};

    fn method(path: &str, http: HttpMethod, op: Operation) -> Fragment {
        Fragment::operation(Scope::Method, OperationFragment::at(path, http, op))
    }

    fn merged_op(doc: &Document, path: &str, http: HttpMethod) -> Operation {
        doc.paths().get(path).and_then(|item| item.operation(http)).cloned().unwrap()
    }

    #[test]
    fn unset_never_overrides() {
        let fragments = vec![
            Fragment::operation(Scope::Type, OperationFragment::at("/a", HttpMethod::Get, Operation::new().with_summary("A"))),
            method("/a", HttpMethod::Get, Operation::new()),
        ];
        let doc = merge(&fragments, &MergeOptions::default()).unwrap();
        assert_eq!(merged_op(&doc, "/a", HttpMethod::Get).summary(), Some("A"));
    }

    #[test]
    fn higher_scope_wins_and_empty_string_counts() {
        let fragments = vec![
            method("/a", HttpMethod::Get, Operation::new().with_summary("").with_description("method")),
            Fragment::operation(
                Scope::DocumentDefault,
                OperationFragment::broadcast(Operation::new().with_summary("A").with_description("default")),
            ),
        ];
        let doc = merge(&fragments, &MergeOptions::default()).unwrap();
        let op = merged_op(&doc, "/a", HttpMethod::Get);
        assert_eq!(op.summary(), Some(""));
        assert_eq!(op.description(), Some("method"));
    }

    #[test]
    fn later_declaration_wins_within_a_scope() {
        let fragments = vec![
            method("/a", HttpMethod::Get, Operation::new().with_summary("B")).with_order(2),
            method("/a", HttpMethod::Get, Operation::new().with_summary("A")).with_order(1),
        ];
        let doc = merge(&fragments, &MergeOptions::default()).unwrap();
        assert_eq!(merged_op(&doc, "/a", HttpMethod::Get).summary(), Some("B"));
    }

    #[test]
    fn keyed_maps_replace_in_place() {
        let fragments = vec![
            Fragment::operation(
                Scope::Type,
                OperationFragment::broadcast(
                    Operation::new()
                        .with_response("200", ApiResponse::new("type ok"))
                        .with_response("404", ApiResponse::new("missing")),
                ),
            ),
            method("/a", HttpMethod::Get, Operation::new().with_response("200", ApiResponse::new("method ok"))),
        ];
        let doc = merge(&fragments, &MergeOptions::default()).unwrap();
        let op = merged_op(&doc, "/a", HttpMethod::Get);
        let codes: Vec<_> = op.responses().codes().collect();
        assert_eq!(codes, vec!["200", "404"]);
        assert_eq!(op.responses().get("200").unwrap().description(), Some("method ok"));
    }

    #[test]
    fn identity_lists_union_with_higher_scope_last() {
        let fragments = vec![
            Fragment::operation(
                Scope::Type,
                OperationFragment::broadcast(Operation::new().with_tag("shared").with_tag("type-only")),
            ),
            method("/a", HttpMethod::Get, Operation::new().with_tag("method-only").with_tag("shared")),
        ];
        let doc = merge(&fragments, &MergeOptions::default()).unwrap();
        assert_eq!(merged_op(&doc, "/a", HttpMethod::Get).tags(), ["type-only", "method-only", "shared"]);
    }

    #[test]
    fn type_scope_reaches_only_its_own_methods() {
        let fragments = vec![
            Fragment::operation(Scope::Type, OperationFragment::broadcast(Operation::new().with_tag("bookings")))
                .with_declaring_type("BookingResource"),
            method("/bookings", HttpMethod::Get, Operation::new()).with_declaring_type("BookingResource"),
            method("/airlines", HttpMethod::Get, Operation::new()).with_declaring_type("AirlineResource"),
        ];
        let doc = merge(&fragments, &MergeOptions::default()).unwrap();
        assert_eq!(merged_op(&doc, "/bookings", HttpMethod::Get).tags(), ["bookings"]);
        assert!(merged_op(&doc, "/airlines", HttpMethod::Get).tags().is_empty());
    }

    #[test]
    fn explicit_empty_security_clears_lower_scopes() {
        let fragments = vec![
            Fragment::operation(
                Scope::Type,
                OperationFragment::broadcast(Operation::new().with_security(security::requirement("oauth", ["read"]))),
            ),
            method("/public", HttpMethod::Get, {
                let mut op = Operation::new();
                op.set_security(Some(Vec::new()));
                op
            }),
            method("/private", HttpMethod::Get, Operation::new()),
        ];
        let doc = merge(&fragments, &MergeOptions::default()).unwrap();
        assert_eq!(merged_op(&doc, "/public", HttpMethod::Get).security(), Some(&[][..]));
        assert_eq!(merged_op(&doc, "/private", HttpMethod::Get).security().map(<[_]>::len), Some(1));
    }

    #[test]
    fn security_requirements_compare_without_scheme_order() {
        let both = |first: &str, second: &str| {
            let mut requirement = security::requirement(first, Vec::<String>::new());
            requirement.insert(second.to_string(), Vec::new());
            requirement
        };
        let fragments = vec![
            Fragment::operation(Scope::Type, OperationFragment::broadcast(Operation::new().with_security(both("apiKey", "oauth")))),
            method("/a", HttpMethod::Get, Operation::new().with_security(both("oauth", "apiKey"))),
        ];
        let doc = merge(&fragments, &MergeOptions::default()).unwrap();
        let security = merged_op(&doc, "/a", HttpMethod::Get).security().unwrap().to_vec();
        assert_eq!(security.len(), 1);
        assert_eq!(security[0].keys().collect::<Vec<_>>(), ["oauth", "apiKey"]);
    }

    #[test]
    fn path_parameters_are_forced_required() {
        let mut id: Parameter = serde_json::from_value(serde_json::json!({"name": "id", "in": "path"})).unwrap();
        id.set_description(Some("booking id".into()));
        let fragments = vec![method("/bookings/{id}", HttpMethod::Get, Operation::new().with_parameter(id))];
        let doc = merge(&fragments, &MergeOptions::default()).unwrap();
        let op = merged_op(&doc, "/bookings/{id}", HttpMethod::Get);
        assert_eq!(op.parameters()[0].required, Some(true));
    }

    #[test]
    fn conflicting_required_at_one_scope_fails() {
        let declare = |required: bool| {
            let p: Parameter = serde_json::from_value(serde_json::json!({"name": "id", "in": "path", "required": required})).unwrap();
            method("/a/{id}", HttpMethod::Get, Operation::new().with_parameter(p))
        };
        let err = merge(&[declare(true), declare(false)], &MergeOptions::default()).unwrap_err();
        assert!(matches!(err, MergeError::ConflictingIdentity { first: true, second: false, .. }));
    }

    #[test]
    fn hidden_always_wins() {
        let fragments = vec![
            Fragment::operation(
                Scope::DocumentDefault,
                OperationFragment::broadcast(Operation::new()).with_hidden(Hidden::Response("500".into())),
            ),
            method(
                "/a",
                HttpMethod::Get,
                Operation::new()
                    .with_summary("kept")
                    .with_response("200", ApiResponse::new("ok"))
                    .with_response("500", ApiResponse::new("boom")),
            ),
        ];
        let doc = merge(&fragments, &MergeOptions::default()).unwrap();
        let codes: Vec<_> = merged_op(&doc, "/a", HttpMethod::Get).responses().codes().map(str::to_string).collect();
        assert_eq!(codes, vec!["200"]);
    }

    #[test]
    fn fully_hidden_paths_are_omitted() {
        let fragments = vec![
            Fragment::operation(
                Scope::Method,
                OperationFragment::at("/internal", HttpMethod::Get, Operation::new()).with_hidden(Hidden::Operation),
            ),
            method("/public", HttpMethod::Get, Operation::new()),
        ];
        let doc = merge(&fragments, &MergeOptions::default()).unwrap();
        assert!(doc.paths().get("/internal").is_none());
        assert!(doc.paths().get("/public").is_some());
    }

    #[test]
    fn method_fragments_need_a_target() {
        let fragments = vec![Fragment::operation(Scope::Method, OperationFragment::broadcast(Operation::new()))];
        let err = merge(&fragments, &MergeOptions::default()).unwrap_err();
        assert_eq!(err, MergeError::MissingTarget("method".into(), "path"));
    }

    #[test]
    fn document_fragments_overlay_info_and_union_servers() {
        let mut defaults = Document::new(Info::new("Default", "0.1"));
        defaults.add_server("https://a.example.com").add_server("https://b.example.com");
        let mut specific = Document::new(Info::new("Airlines", ""));
        specific.add_server("https://a.example.com");

        let fragments = vec![
            Fragment::document(Scope::Type, specific),
            Fragment::document(Scope::DocumentDefault, defaults),
        ];
        let doc = merge(&fragments, &MergeOptions::default()).unwrap();
        assert_eq!(doc.info().title(), "Airlines");
        assert_eq!(doc.info().version(), "0.1");
        let urls: Vec<_> = doc.servers().iter().map(Server::url).collect();
        assert_eq!(urls, vec!["https://b.example.com", "https://a.example.com"]);
    }

    #[test]
    fn tag_definitions_join_the_document() {
        let fragments = vec![Fragment::operation(
            Scope::Method,
            OperationFragment::at("/a", HttpMethod::Get, Operation::new())
                .with_tag_definition(Tag::new("reviews").with_description("All the review methods")),
        )];
        let doc = merge(&fragments, &MergeOptions::default()).unwrap();
        assert_eq!(doc.tag("reviews").unwrap().description(), Some("All the review methods"));
        assert_eq!(merged_op(&doc, "/a", HttpMethod::Get).tags(), ["reviews"]);
    }

    #[test]
    fn derived_operation_ids_are_unique() {
        let fragments = vec![
            Fragment::operation(
                Scope::Method,
                OperationFragment::at("/a", HttpMethod::Get, Operation::new()).with_method_name("list"),
            ),
            Fragment::operation(
                Scope::Method,
                OperationFragment::at("/b", HttpMethod::Get, Operation::new()).with_method_name("list"),
            ),
            method("/c", HttpMethod::Get, Operation::new().with_operation_id("list")),
        ];
        let options = MergeOptions {
            operation_id_strategy: OperationIdStrategy::Method,
            ..MergeOptions::default()
        };
        let doc = merge(&fragments, &options).unwrap();
        assert_eq!(merged_op(&doc, "/a", HttpMethod::Get).operation_id(), Some("list_1"));
        assert_eq!(merged_op(&doc, "/b", HttpMethod::Get).operation_id(), Some("list_2"));
        assert_eq!(merged_op(&doc, "/c", HttpMethod::Get).operation_id(), Some("list"));
    }

    #[test]
    fn missing_descriptions_get_reason_phrases() {
        let fragments = vec![method("/a", HttpMethod::Get, Operation::new().with_response("404", ApiResponse::default()))];
        let doc = merge(&fragments, &MergeOptions::default()).unwrap();
        assert_eq!(
            merged_op(&doc, "/a", HttpMethod::Get).responses().get("404").unwrap().description(),
            Some("Not Found")
        );
    }

    #[test]
    fn server_overrides() {
        let fragments = vec![method("/a", HttpMethod::Get, Operation::new().with_operation_id("getA"))];
        let mut doc = merge(&fragments, &MergeOptions::default()).unwrap();
        let overrides = ServerOverrides {
            global: vec!["https://api.example.com".into()],
            paths: IndexMap::from([("/a".to_string(), vec!["https://a.example.com".to_string()])]),
            operations: IndexMap::from([("getA".to_string(), vec!["https://get.example.com".to_string()])]),
        };
        apply_server_overrides(&mut doc, &overrides);

        assert_eq!(doc.servers()[0].url(), "https://api.example.com");
        let item = doc.paths().get("/a").unwrap();
        assert_eq!(item.servers()[0].url(), "https://a.example.com");
        assert_eq!(item.operation(HttpMethod::Get).unwrap().servers()[0].url(), "https://get.example.com");
    }
}
