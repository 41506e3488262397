//! Pointer dereferencing over the serialized view of a document.
//!
//! The resolver never touches the object graph: it works on the
//! `serde_json::Value` a sealed document serializes to, which makes arbitrary
//! nesting (`.../schema/properties/photo`) uniform.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::error::ResolveError;
use crate::model::Document;
use crate::pointer;
use crate::registry::DEFAULT_MAX_CHAIN;

const REF_KEY: &str = "$ref";

pub struct Resolver {
    root: Value,
    max_chain: usize,
}

impl Resolver {
    pub fn new(root: Value) -> Self {
        Self {
            root,
            max_chain: DEFAULT_MAX_CHAIN,
        }
    }

    pub fn from_document(document: &Document) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::to_value(document)?))
    }

    pub fn with_max_chain(mut self, max_chain: usize) -> Self {
        self.max_chain = max_chain;
        self
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Walk `path` from the root, following every `$ref` met on the way
    /// (including one at the final location), and return the canonical
    /// pointer of the concrete location reached.
    ///
    /// `path` may be a pointer (`#/a/b`, `/a/b`) or dotted (`a.b.'c/d'`).
    pub fn dereference(&self, path: &str) -> Result<String, ResolveError> {
        let (location, _) = self.walk(path)?;
        Ok(pointer::join(&location))
    }

    /// The value at the concrete location [`Resolver::dereference`] reaches.
    pub fn value_at(&self, path: &str) -> Result<&Value, ResolveError> {
        let (_, value) = self.walk(path)?;
        Ok(value)
    }

    fn walk(&self, path: &str) -> Result<(Vec<String>, &Value), ResolveError> {
        let mut location: Vec<String> = Vec::new();
        let mut current = &self.root;

        for segment in parse_path(path) {
            // A sibling next to `$ref` overrides the target's own value.
            let local = match current {
                Value::Object(map) if map.contains_key(REF_KEY) => map.get(&segment),
                _ => None,
            };
            if local.is_none() {
                current = self.follow(current, &mut location)?;
            }
            current = match local.or_else(|| child(current, &segment)) {
                Some(next) => next,
                None => {
                    location.push(segment);
                    return Err(ResolveError::UnresolvedReference(pointer::join(&location)));
                }
            };
            location.push(segment);
        }

        let current = self.follow(current, &mut location)?;
        Ok((location, current))
    }

    /// Follow the `$ref` chain at `value`, updating `location` to the target.
    fn follow<'v>(&'v self, mut value: &'v Value, location: &mut Vec<String>) -> Result<&'v Value, ResolveError> {
        let mut visited: HashSet<String> = HashSet::new();
        let mut chain: Vec<String> = Vec::new();

        while let Some(target) = ref_target(value) {
            if !target.starts_with('#') {
                return Err(ResolveError::InvalidReference(target.to_string()));
            }
            let canonical = pointer::join(&pointer::segments(target));
            chain.push(canonical.clone());
            if !visited.insert(canonical.clone()) {
                return Err(ResolveError::CyclicReference(chain));
            }
            if chain.len() > self.max_chain {
                return Err(ResolveError::ReferenceChainTooLong {
                    address: pointer::join(location),
                    limit: self.max_chain,
                });
            }
            let segments = pointer::segments(target);
            value = lookup(&self.root, &segments).ok_or_else(|| ResolveError::UnresolvedReference(canonical.clone()))?;
            log::trace!("{} -> {canonical}", pointer::join(location));
            *location = segments;
        }
        Ok(value)
    }

    /// A copy of the document with every local `$ref` inlined. Sibling
    /// keywords are laid over the inlined target. Cyclic and external
    /// references are left as `$ref`.
    pub fn dereferenced(&self) -> Value {
        let mut stack = Vec::new();
        self.inline(&self.root, &mut stack)
    }

    fn inline(&self, value: &Value, stack: &mut Vec<String>) -> Value {
        match value {
            Value::Object(map) => {
                if let Some(target) = ref_target(value) {
                    if let Some(inlined) = self.inline_target(target, map, stack) {
                        return inlined;
                    }
                }
                Value::Object(
                    map.iter()
                        .map(|(key, v)| (key.clone(), self.inline(v, stack)))
                        .collect(),
                )
            }
            Value::Array(items) => Value::Array(items.iter().map(|v| self.inline(v, stack)).collect()),
            other => other.clone(),
        }
    }

    fn inline_target(&self, target: &str, siblings: &Map<String, Value>, stack: &mut Vec<String>) -> Option<Value> {
        if !target.starts_with('#') {
            return None;
        }
        if stack.iter().any(|seen| seen == target) || stack.len() >= self.max_chain {
            log::debug!("leaving cyclic reference {target} in place");
            return None;
        }
        let Some(found) = lookup(&self.root, &pointer::segments(target)) else {
            log::warn!("unresolved reference {target} left in place");
            return None;
        };

        stack.push(target.to_string());
        let mut inlined = self.inline(found, stack);
        if let Value::Object(object) = &mut inlined {
            for (key, value) in siblings {
                if key != REF_KEY {
                    object.insert(key.clone(), self.inline(value, stack));
                }
            }
        }
        stack.pop();
        Some(inlined)
    }
}

fn parse_path(path: &str) -> Vec<String> {
    if path.starts_with('#') || path.starts_with('/') {
        pointer::segments(path)
    } else {
        pointer::dotted_segments(path)
    }
}

fn ref_target(value: &Value) -> Option<&str> {
    value.as_object()?.get(REF_KEY)?.as_str()
}

fn child<'v>(value: &'v Value, segment: &str) -> Option<&'v Value> {
    match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

fn lookup<'v>(root: &'v Value, segments: &[String]) -> Option<&'v Value> {
    segments.iter().try_fold(root, |current, segment| child(current, segment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pets() -> Resolver {
        Resolver::new(json!({
            "paths": {
                "/pets/{id}": {
                    "get": {
                        "responses": {
                            "200": {
                                "content": {
                                    "application/json": {
                                        "schema": {"$ref": "#/components/schemas/Pet"}
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Pet": {
                        "type": "object",
                        "properties": {
                            "photo": {"$ref": "#/components/schemas/Photo"},
                            "tags": {"type": "array", "items": {"$ref": "#/components/schemas/Tag"}}
                        }
                    },
                    "Photo": {"type": "string", "format": "uri"},
                    "Tag": {"$ref": "#/components/schemas/Label"},
                    "Label": {"type": "string"},
                    "Node": {"type": "object", "properties": {"next": {"$ref": "#/components/schemas/Node"}}},
                    "A": {"$ref": "#/components/schemas/B"},
                    "B": {"$ref": "#/components/schemas/A"}
                }
            }
        }))
    }

    #[test]
    fn follows_references_through_nesting() {
        let resolver = pets();
        let pointer = resolver
            .dereference("#/paths/~1pets~1{id}/get/responses/200/content/application~1json/schema/properties/photo")
            .unwrap();
        assert_eq!(pointer, "#/components/schemas/Photo");
    }

    #[test]
    fn dotted_paths_are_accepted() {
        let resolver = pets();
        let pointer = resolver
            .dereference("paths.'/pets/{id}'.get.responses.'200'.content.'application/json'.schema")
            .unwrap();
        assert_eq!(pointer, "#/components/schemas/Pet");
    }

    #[test]
    fn chains_end_at_the_concrete_schema() {
        let resolver = pets();
        assert_eq!(
            resolver.dereference("/components/schemas/Pet/properties/tags/items").unwrap(),
            "#/components/schemas/Label"
        );
        assert_eq!(
            resolver.value_at("#/components/schemas/Tag").unwrap(),
            &json!({"type": "string"})
        );
    }

    #[test]
    fn missing_segments_are_unresolved() {
        let err = pets().dereference("#/components/schemas/Pet/properties/name").unwrap_err();
        assert_eq!(
            err,
            ResolveError::UnresolvedReference("#/components/schemas/Pet/properties/name".into())
        );
    }

    #[test]
    fn mutual_references_are_cyclic() {
        let err = pets().dereference("#/components/schemas/A").unwrap_err();
        assert!(matches!(err, ResolveError::CyclicReference(_)));
    }

    #[test]
    fn dereferenced_inlines_and_keeps_cycles() {
        let inlined = pets().dereferenced();
        assert_eq!(
            inlined["components"]["schemas"]["Pet"]["properties"]["photo"],
            json!({"type": "string", "format": "uri"})
        );
        assert_eq!(
            inlined["components"]["schemas"]["Node"]["properties"]["next"]["properties"]["next"],
            json!({"$ref": "#/components/schemas/Node"})
        );
    }

    #[test]
    fn siblings_override_the_inlined_target() {
        let resolver = Resolver::new(json!({
            "components": {"schemas": {
                "Photo": {"type": "string", "description": "a photo"},
                "Avatar": {"$ref": "#/components/schemas/Photo", "description": "an avatar"}
            }}
        }));
        let inlined = resolver.dereferenced();
        assert_eq!(
            inlined["components"]["schemas"]["Avatar"],
            json!({"type": "string", "description": "an avatar"})
        );
        assert_eq!(
            resolver.value_at("#/components/schemas/Avatar/description").unwrap(),
            &json!("an avatar")
        );
    }
}
