//! Bidirectional one-hop usage index.
//!
//! For every qualified name, records which definitions reference it
//! directly: derivation bases, name references, declared types, and
//! substitution-group heads. Transitive users are reachable by walking
//! the graph, never flattened into an entry.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

use crate::base::is_builtin;
use crate::parser::SchemaNode;

use super::super::document::ResolvedDocument;
use super::super::types::{Diagnostic, DiagnosticKind};

/// How a source definition references its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReferenceKind {
    /// An element's declared `type` points at the target.
    TypeOf,
    /// The target is an extension base.
    Extends,
    /// The target is a restriction base.
    Restricts,
    /// An element/group/attributeGroup `ref` to the target.
    RefersTo,
    /// The target is the head of the source's substitution group.
    SubstitutionGroupOf,
}

/// One direct reference from a source definition to a target.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UsageInfo {
    /// Qualified name of the definition containing the reference.
    pub source: String,
    pub kind: ReferenceKind,
}

#[derive(Debug, Clone, Default)]
struct UsageEntry {
    users: FxHashSet<UsageInfo>,
}

/// Reverse usage index over a resolved document.
///
/// Mirrors the document's frozen state: built once after closure, then
/// read-only. Accessors return name-sorted vectors so output is
/// deterministic.
#[derive(Debug, Clone, Default)]
pub struct UsageIndex {
    /// target name → definitions that reference it directly
    reverse: FxHashMap<String, UsageEntry>,
    /// source name → targets it references directly
    forward: FxHashMap<String, FxHashSet<String>>,
}

impl UsageIndex {
    /// Build the index from a frozen document.
    ///
    /// Edges whose target has no definition are omitted and reported as
    /// unresolved-reference diagnostics; `xsd:` builtins are skipped
    /// silently.
    pub fn build(document: &ResolvedDocument) -> (Self, Vec<Diagnostic>) {
        let mut index = Self::default();
        let mut diagnostics = Vec::new();

        for def in document.definitions() {
            def.node.walk(&mut |n| {
                for (attr, kind) in reference_attrs(n) {
                    let Some(target) = n.attr(attr) else {
                        continue;
                    };
                    if is_builtin(target) {
                        continue;
                    }
                    if !document.contains(target) {
                        diagnostics.push(Diagnostic::warning(
                            DiagnosticKind::UnresolvedReference,
                            format!(
                                "'{}' references unknown target '{target}' via {attr}",
                                def.name
                            ),
                        ));
                        continue;
                    }
                    index.add(def.name, target, kind);
                }
            });
        }

        (index, diagnostics)
    }

    fn add(&mut self, source: &str, target: &str, kind: ReferenceKind) {
        trace!("usage edge {source} -[{kind:?}]-> {target}");
        self.reverse
            .entry(target.to_string())
            .or_default()
            .users
            .insert(UsageInfo {
                source: source.to_string(),
                kind,
            });
        self.forward
            .entry(source.to_string())
            .or_default()
            .insert(target.to_string());
    }

    /// All direct references to a target, sorted by source name.
    pub fn users_of(&self, target: &str) -> Vec<&UsageInfo> {
        let mut users: Vec<&UsageInfo> = self
            .reverse
            .get(target)
            .map(|entry| entry.users.iter().collect())
            .unwrap_or_default();
        users.sort();
        users
    }

    /// Names of the definitions that directly reference a target.
    pub fn user_names(&self, target: &str) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .reverse
            .get(target)
            .map(|entry| entry.users.iter().map(|u| u.source.as_str()).collect())
            .unwrap_or_default();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Direct subtypes: the subset of a target's users connected by an
    /// extension edge. Not the full usage set.
    pub fn extended_by(&self, target: &str) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .reverse
            .get(target)
            .map(|entry| {
                entry
                    .users
                    .iter()
                    .filter(|u| u.kind == ReferenceKind::Extends)
                    .map(|u| u.source.as_str())
                    .collect()
            })
            .unwrap_or_default();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// All targets a source references directly, sorted.
    pub fn targets_of(&self, source: &str) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .forward
            .get(source)
            .map(|targets| targets.iter().map(String::as_str).collect())
            .unwrap_or_default();
        names.sort_unstable();
        names
    }

    pub fn has_users(&self, target: &str) -> bool {
        self.reverse
            .get(target)
            .is_some_and(|entry| !entry.users.is_empty())
    }

    pub fn target_count(&self) -> usize {
        self.reverse.len()
    }
}

/// Which reference attributes apply to a node, with their edge kinds.
fn reference_attrs(node: &SchemaNode) -> Vec<(&'static str, ReferenceKind)> {
    let mut attrs = vec![
        ("ref", ReferenceKind::RefersTo),
        ("type", ReferenceKind::TypeOf),
        ("substitutionGroup", ReferenceKind::SubstitutionGroupOf),
    ];
    match node.tag.as_str() {
        "extension" => attrs.push(("base", ReferenceKind::Extends)),
        "restriction" => attrs.push(("base", ReferenceKind::Restricts)),
        _ => {}
    }
    attrs
}
