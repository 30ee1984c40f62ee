//! Namespace registry — the run-scoped namespace → prefix table.
//!
//! The registry is injective by construction: a namespace registers at
//! most one prefix and no prefix is ever handed to two namespaces. It is
//! an explicit accumulator threaded through resolution, never a global.

use indexmap::IndexMap;
use tracing::debug;

use crate::base::{XSD_NAMESPACE, XSD_PREFIX};
use crate::parser::SchemaFile;

/// Mapping from namespace identifier to its display prefix for one run.
///
/// Frozen once closure completes; iteration order is registration order,
/// so two identical runs produce identical registries. The canonical
/// reserved prefix (and any declared alias of the reserved namespace) is
/// never handed to a user namespace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamespaceRegistry {
    /// namespace URI → assigned prefix
    prefixes: IndexMap<String, String>,
    /// Declared aliases of the reserved namespace (`xs:` and friends);
    /// occupied for disambiguation purposes but never assigned.
    reserved_aliases: Vec<String>,
    root_namespace: Option<String>,
    root_prefix: Option<String>,
}

impl NamespaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a registry from the root schema's own declarations.
    ///
    /// Records the root target namespace and, if the root declared an
    /// explicit prefix for it, that prefix; other declared namespaces are
    /// registered as-is. The root namespace stays unregistered when the
    /// root declared no prefix for it, so definitions merge unprefixed.
    pub fn from_root(root: &SchemaFile) -> Self {
        let root_namespace = root.target_namespace.clone();
        let root_prefix = root_namespace.as_deref().and_then(|ns| {
            root.ns_decls
                .iter()
                .find(|(prefix, uri)| !prefix.is_empty() && *uri == ns)
                .map(|(prefix, _)| prefix.clone())
        });

        let mut registry = Self {
            prefixes: IndexMap::new(),
            reserved_aliases: Vec::new(),
            root_namespace,
            root_prefix,
        };

        for (prefix, uri) in &root.ns_decls {
            if prefix.is_empty() {
                continue;
            }
            if uri == XSD_NAMESPACE {
                registry.reserve_alias(prefix);
                continue;
            }
            if registry.is_root_namespace(uri) && registry.root_prefix.is_none() {
                continue;
            }
            registry.register(uri, prefix);
        }
        registry
    }

    /// The root schema's target namespace, if it declared one.
    pub fn root_namespace(&self) -> Option<&str> {
        self.root_namespace.as_deref()
    }

    /// The prefix the root schema declared for its own namespace, if any.
    pub fn root_prefix(&self) -> Option<&str> {
        self.root_prefix.as_deref()
    }

    pub fn is_root_namespace(&self, namespace: &str) -> bool {
        self.root_namespace.as_deref() == Some(namespace)
    }

    /// Look up the canonical prefix for a namespace.
    pub fn prefix_for(&self, namespace: &str) -> Option<&str> {
        self.prefixes.get(namespace).map(String::as_str)
    }

    /// Register a namespace under a candidate prefix.
    ///
    /// An already-registered namespace keeps its prefix. A candidate that
    /// is taken by a different namespace is disambiguated with a numeric
    /// suffix, so the table stays injective.
    pub fn register(&mut self, namespace: &str, candidate: &str) -> String {
        if let Some(existing) = self.prefixes.get(namespace) {
            return existing.clone();
        }
        let prefix = self.disambiguate(candidate);
        debug!("registering prefix '{prefix}' for namespace {namespace}");
        self.prefixes.insert(namespace.to_string(), prefix.clone());
        prefix
    }

    /// Get or derive a prefix for a namespace (closure step 4).
    ///
    /// Derivation takes the last path segment of the identifier, splits on
    /// `_`, keeps the first component and lowercases it; collisions append
    /// an incrementing numeric suffix.
    pub fn ensure_prefix(&mut self, namespace: &str) -> String {
        if let Some(existing) = self.prefixes.get(namespace) {
            return existing.clone();
        }
        let prefix = self.disambiguate(&derive_candidate(namespace));
        debug!("deriving prefix '{prefix}' for namespace {namespace}");
        self.prefixes.insert(namespace.to_string(), prefix.clone());
        prefix
    }

    /// Absorb an imported file's declared prefixes (first file to declare
    /// a namespace wins; the XSD and root namespaces are never collected).
    pub fn collect_declared(&mut self, file: &SchemaFile) {
        for (prefix, uri) in &file.ns_decls {
            if prefix.is_empty() {
                continue;
            }
            if uri == XSD_NAMESPACE {
                self.reserve_alias(prefix);
                continue;
            }
            if self.is_root_namespace(uri) {
                continue;
            }
            self.register(uri, prefix);
        }
    }

    /// Iterate (namespace, prefix) pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes
            .iter()
            .map(|(ns, prefix)| (ns.as_str(), prefix.as_str()))
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    fn disambiguate(&self, candidate: &str) -> String {
        if !self.prefix_in_use(candidate) {
            return candidate.to_string();
        }
        let mut counter = 2;
        loop {
            let next = format!("{candidate}{counter}");
            if !self.prefix_in_use(&next) {
                return next;
            }
            counter += 1;
        }
    }

    fn reserve_alias(&mut self, prefix: &str) {
        if prefix != XSD_PREFIX && !self.reserved_aliases.iter().any(|p| p == prefix) {
            self.reserved_aliases.push(prefix.to_string());
        }
    }

    fn prefix_in_use(&self, prefix: &str) -> bool {
        prefix == XSD_PREFIX
            || self.reserved_aliases.iter().any(|p| p == prefix)
            || self.prefixes.values().any(|p| p == prefix)
    }
}

/// Derive a candidate prefix from a namespace identifier.
fn derive_candidate(namespace: &str) -> String {
    let last_segment = namespace
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(namespace);
    let base = last_segment.split('_').next().unwrap_or(last_segment);
    base.to_lowercase()
}
