//! Address index over a document.
//!
//! The registry borrows every addressable element of a [`Document`] and binds
//! it to its canonical JSON Pointer (`#/components/schemas/Pet`,
//! `#/paths/~1pets/get`, ...). It never owns or copies the elements, so it is
//! cheap to rebuild and always agrees with the document it was built from.

use indexmap::IndexMap;

use crate::error::ResolveError;
use crate::model::operation::{HttpMethod, Operation};
use crate::model::reference::{ComponentKind, Referenceable, expand_ref};
use crate::model::{
    ApiResponse, Callback, Document, Example, Header, Link, Parameter, PathItem, RequestBody,
    Schema, SecurityScheme,
};
use crate::pointer;

/// Default bound on the length of a `$ref` chain.
pub const DEFAULT_MAX_CHAIN: usize = 100;

macro_rules! nodes {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        /// A borrowed, kind-tagged element.
        #[derive(Debug, Clone, Copy)]
        pub enum Node<'a> {
            $($variant(&'a $ty),)*
            Operation(&'a Operation),
        }

        impl<'a> Node<'a> {
            /// Same element by identity. Equal copies are distinct elements.
            fn same(&self, other: &Node<'a>) -> bool {
                match (self, other) {
                    $((Node::$variant(a), Node::$variant(b)) => std::ptr::eq(*a, *b),)*
                    (Node::Operation(a), Node::Operation(b)) => std::ptr::eq(*a, *b),
                    _ => false,
                }
            }

            /// `$ref` target when the element is a reference cell.
            pub fn ref_path(&self) -> Option<&'a str> {
                match self {
                    $(Node::$variant(e) => Referenceable::ref_path(*e),)*
                    Node::Operation(_) => None,
                }
            }
        }

        $(
            impl Component for $ty {
                fn from_node<'a>(node: Node<'a>) -> Option<&'a Self> {
                    match node {
                        Node::$variant(element) => Some(element),
                        _ => None,
                    }
                }

                fn as_node(&self) -> Node<'_> {
                    Node::$variant(self)
                }
            }
        )*
    };
}

nodes! {
    Schema(Schema),
    Response(ApiResponse),
    Parameter(Parameter),
    Example(Example),
    RequestBody(RequestBody),
    Header(Header),
    SecurityScheme(SecurityScheme),
    Link(Link),
    Callback(Callback),
    PathItem(PathItem),
}

impl Node<'_> {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Schema(_) => ComponentKind::Schemas.element_name(),
            Node::Response(_) => ComponentKind::Responses.element_name(),
            Node::Parameter(_) => ComponentKind::Parameters.element_name(),
            Node::Example(_) => ComponentKind::Examples.element_name(),
            Node::RequestBody(_) => ComponentKind::RequestBodies.element_name(),
            Node::Header(_) => ComponentKind::Headers.element_name(),
            Node::SecurityScheme(_) => ComponentKind::SecuritySchemes.element_name(),
            Node::Link(_) => ComponentKind::Links.element_name(),
            Node::Callback(_) => ComponentKind::Callbacks.element_name(),
            Node::PathItem(_) => ComponentKind::PathItems.element_name(),
            Node::Operation(_) => "operation",
        }
    }
}

/// A referenceable element type that can be stored in the registry.
pub trait Component: Referenceable + PartialEq + Sized {
    fn from_node<'a>(node: Node<'a>) -> Option<&'a Self>;

    fn as_node(&self) -> Node<'_>;
}

/// Canonical `#/...` form of a local pointer.
pub fn canonical_address(address: &str) -> Result<String, ResolveError> {
    if !(address.starts_with("#/") || address.starts_with('/')) {
        return Err(ResolveError::InvalidReference(address.to_string()));
    }
    Ok(pointer::join(&pointer::segments(address)))
}

pub fn component_address(kind: ComponentKind, name: &str) -> String {
    pointer::join(&["components", kind.as_str(), name])
}

pub fn path_address(path: &str) -> String {
    pointer::join(&["paths", path])
}

pub fn operation_address(path: &str, method: HttpMethod) -> String {
    pointer::join(&["paths", path, method.as_str()])
}

pub fn webhook_address(name: &str) -> String {
    pointer::join(&["webhooks", name])
}

#[derive(Debug, Clone)]
pub struct NodeRegistry<'a> {
    nodes: IndexMap<String, Node<'a>>,
    max_chain: usize,
}

impl Default for NodeRegistry<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> NodeRegistry<'a> {
    pub fn new() -> Self {
        Self {
            nodes: IndexMap::new(),
            max_chain: DEFAULT_MAX_CHAIN,
        }
    }

    pub fn with_max_chain(mut self, max_chain: usize) -> Self {
        self.max_chain = max_chain;
        self
    }

    /// Index every addressable element of `document`.
    pub fn from_document(document: &'a Document) -> Result<Self, ResolveError> {
        let mut registry = Self::new();
        let components = document.components();

        fn register_all<'a, T: Component>(
            registry: &mut NodeRegistry<'a>,
            entries: &'a IndexMap<String, T>,
        ) -> Result<(), ResolveError> {
            for (name, element) in entries {
                registry.register(name, element)?;
            }
            Ok(())
        }

        register_all(&mut registry, components.schemas())?;
        register_all(&mut registry, components.responses())?;
        register_all(&mut registry, components.parameters())?;
        register_all(&mut registry, components.examples())?;
        register_all(&mut registry, components.request_bodies())?;
        register_all(&mut registry, components.headers())?;
        register_all(&mut registry, components.security_schemes())?;
        register_all(&mut registry, components.links())?;
        register_all(&mut registry, components.callbacks())?;
        register_all(&mut registry, components.path_items())?;

        for (name, item) in document.webhooks() {
            let address = webhook_address(name);
            for (method, op) in item.operations() {
                registry.bind(pointer::join(&["webhooks", name.as_str(), method.as_str()]), Node::Operation(op))?;
            }
            registry.bind(address, Node::PathItem(item))?;
        }

        for (path, item) in document.paths().iter() {
            registry.bind(path_address(path), Node::PathItem(item))?;
            for (method, op) in item.operations() {
                registry.bind(operation_address(path, method), Node::Operation(op))?;
            }
        }

        log::debug!("registry indexed {} elements", registry.len());
        Ok(registry)
    }

    /// Bind `element` under `#/components/<kind>/<name>`, returning the
    /// address. Re-registering the same element is a no-op; an equal copy
    /// is a different element and fails with `DuplicateName`.
    pub fn register<T: Component>(&mut self, name: &str, element: &'a T) -> Result<String, ResolveError> {
        let address = component_address(T::KIND, name);
        self.bind(address.clone(), element.as_node())?;
        Ok(address)
    }

    /// Bind a node at an arbitrary canonical address.
    pub fn bind(&mut self, address: String, node: Node<'a>) -> Result<(), ResolveError> {
        if let Some(existing) = self.nodes.get(&address) {
            if existing.same(&node) {
                log::trace!("{address} re-registered with the same {}", node.kind_name());
                return Ok(());
            }
            return Err(ResolveError::DuplicateName(address));
        }
        log::trace!("registered {} at {address}", node.kind_name());
        self.nodes.insert(address, node);
        Ok(())
    }

    pub fn lookup(&self, address: &str) -> Result<Node<'a>, ResolveError> {
        let canonical = canonical_address(address)?;
        self.nodes
            .get(&canonical)
            .copied()
            .ok_or(ResolveError::UnresolvedReference(canonical))
    }

    pub fn contains(&self, address: &str) -> bool {
        self.lookup(address).is_ok()
    }

    /// The element bound at `address`, without following references.
    pub fn get<T: Component>(&self, address: &str) -> Result<&'a T, ResolveError> {
        let node = self.lookup(address)?;
        T::from_node(node).ok_or_else(|| ResolveError::KindMismatch {
            address: address.to_string(),
            expected: T::KIND.element_name(),
            found: node.kind_name(),
        })
    }

    pub fn operation(&self, path: &str, method: HttpMethod) -> Result<&'a Operation, ResolveError> {
        let address = operation_address(path, method);
        match self.lookup(&address)? {
            Node::Operation(op) => Ok(op),
            other => Err(ResolveError::KindMismatch {
                address,
                expected: "operation",
                found: other.kind_name(),
            }),
        }
    }

    /// Follow the `$ref` chain starting at `address` to a concrete element.
    /// Short names are expanded for `T`'s component kind.
    pub fn resolve_address<T: Component>(&self, address: &str) -> Result<&'a T, ResolveError> {
        let start = canonical_address(&expand_ref(T::KIND, address))?;
        let mut chain = vec![start.clone()];
        let mut current = start.clone();

        loop {
            let element: &'a T = self.get(&current)?;
            let Some(next) = element.ref_path() else {
                return Ok(element);
            };
            let next = canonical_address(&expand_ref(T::KIND, next))?;
            if chain.contains(&next) {
                chain.push(next);
                return Err(ResolveError::CyclicReference(chain));
            }
            if chain.len() >= self.max_chain {
                return Err(ResolveError::ReferenceChainTooLong {
                    address: start,
                    limit: self.max_chain,
                });
            }
            log::trace!("{current} -> {next}");
            chain.push(next.clone());
            current = next;
        }
    }

    /// `element` itself when concrete, otherwise the end of its chain.
    pub fn resolve<T: Component>(&self, element: &'a T) -> Result<&'a T, ResolveError> {
        match element.ref_path() {
            Some(target) => self.resolve_address(target),
            None => Ok(element),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn addresses(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Info, SchemaType};

    #[test]
    fn re_registering_the_same_element_is_idempotent() {
        let pet = Schema::of_type(SchemaType::Object);
        let copy = pet.clone();
        let mut registry = NodeRegistry::new();

        assert_eq!(registry.register("Pet", &pet).unwrap(), "#/components/schemas/Pet");
        registry.register("Pet", &pet).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(std::ptr::eq(registry.get::<Schema>("#/components/schemas/Pet").unwrap(), &pet));

        let err = registry.register("Pet", &copy).unwrap_err();
        assert_eq!(err, ResolveError::DuplicateName("#/components/schemas/Pet".into()));
    }

    #[test]
    fn different_element_under_same_name_is_rejected() {
        let pet = Schema::of_type(SchemaType::Object);
        let other = Schema::of_type(SchemaType::String);
        let mut registry = NodeRegistry::new();
        registry.register("Pet", &pet).unwrap();

        let err = registry.register("Pet", &other).unwrap_err();
        assert_eq!(err, ResolveError::DuplicateName("#/components/schemas/Pet".into()));
    }

    #[test]
    fn names_are_pointer_escaped() {
        let schema = Schema::new();
        let mut registry = NodeRegistry::new();
        let address = registry.register("a/b~c", &schema).unwrap();
        assert_eq!(address, "#/components/schemas/a~1b~0c");
        assert!(std::ptr::eq(registry.get::<Schema>(&address).unwrap(), &schema));
    }

    #[test]
    fn missing_address_is_unresolved() {
        let registry = NodeRegistry::new();
        let err = registry.resolve_address::<Schema>("Missing").unwrap_err();
        assert_eq!(err, ResolveError::UnresolvedReference("#/components/schemas/Missing".into()));
    }

    #[test]
    fn chains_resolve_to_the_concrete_element() {
        let concrete = Schema::of_type(SchemaType::Object);
        let alias = Schema::reference("Concrete");
        let alias_of_alias = Schema::reference("Alias");
        let mut registry = NodeRegistry::new();
        registry.register("Concrete", &concrete).unwrap();
        registry.register("Alias", &alias).unwrap();
        registry.register("Outer", &alias_of_alias).unwrap();

        let resolved = registry.resolve_address::<Schema>("Outer").unwrap();
        assert!(std::ptr::eq(resolved, &concrete));
        assert!(std::ptr::eq(registry.resolve(&concrete).unwrap(), &concrete));
    }

    #[test]
    fn mutual_references_are_cyclic() {
        let a = Schema::reference("B");
        let b = Schema::reference("A");
        let mut registry = NodeRegistry::new();
        registry.register("A", &a).unwrap();
        registry.register("B", &b).unwrap();

        match registry.resolve_address::<Schema>("A").unwrap_err() {
            ResolveError::CyclicReference(chain) => assert_eq!(
                chain,
                vec![
                    "#/components/schemas/A",
                    "#/components/schemas/B",
                    "#/components/schemas/A"
                ]
            ),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn long_chains_hit_the_bound() {
        let links: Vec<Schema> = (0..5).map(|i| Schema::reference(&format!("S{}", i + 1))).collect();
        let end = Schema::new();
        let mut registry = NodeRegistry::new().with_max_chain(3);
        for (i, link) in links.iter().enumerate() {
            registry.register(&format!("S{i}"), link).unwrap();
        }
        registry.register("S5", &end).unwrap();

        let err = registry.resolve_address::<Schema>("S0").unwrap_err();
        assert!(matches!(err, ResolveError::ReferenceChainTooLong { limit: 3, .. }));
    }

    #[test]
    fn kind_mismatch_is_reported() {
        let header = Header::default();
        let mut registry = NodeRegistry::new();
        registry.register("Limit", &header).unwrap();

        let err = registry.get::<Schema>("#/components/headers/Limit").unwrap_err();
        assert!(matches!(err, ResolveError::KindMismatch { expected: "schema", found: "header", .. }));
    }

    #[test]
    fn external_references_are_invalid() {
        let registry = NodeRegistry::new();
        let err = registry.lookup("https://example.com/pet.json").unwrap_err();
        assert!(matches!(err, ResolveError::InvalidReference(_)));
    }

    #[test]
    fn indexes_paths_and_operations() {
        let doc = Document::new(Info::new("t", "1")).with_path(
            "/pets/{id}",
            PathItem::new().with_operation(HttpMethod::Get, Operation::new().with_summary("one pet")),
        );
        let registry = NodeRegistry::from_document(&doc).unwrap();

        assert!(registry.contains("#/paths/~1pets~1{id}"));
        let op = registry.operation("/pets/{id}", HttpMethod::Get).unwrap();
        assert_eq!(op.summary(), Some("one pet"));
    }
}
