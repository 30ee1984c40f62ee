//! Inheritance chain resolution with per-type memoization.
//!
//! A chain lists a type's ancestors root-to-leaf, each step carrying the
//! elements that ancestor contributes to the requesting type. Extension
//! steps carry the base's full declared content; a restriction step
//! carries exactly the elements redeclared inside the restriction node,
//! and cuts off everything above it, so dropped elements never reappear
//! in descendants.

use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

use crate::base::is_builtin;
use crate::parser::SchemaNode;

use super::super::document::ResolvedDocument;
use super::super::types::{Diagnostic, DiagnosticKind};

/// The two derivation semantics a chain step can use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DerivationKind {
    Extension,
    Restriction,
}

/// One ancestor in an inheritance chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InheritanceStep {
    /// Qualified name of the ancestor.
    pub base: String,
    pub derivation: DerivationKind,
    /// Element names this ancestor contributes to the requesting type.
    pub elements: Vec<String>,
}

/// A type's ancestors, root-to-leaf.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InheritanceChain {
    pub steps: Vec<InheritanceStep>,
}

impl InheritanceChain {
    /// Union of all inherited element names, root-to-leaf order, deduped.
    pub fn inherited_elements(&self) -> Vec<String> {
        let mut elements = Vec::new();
        for step in &self.steps {
            for name in &step.elements {
                push_unique(&mut elements, name);
            }
        }
        elements
    }

    /// The step contributed by a specific ancestor, if present.
    pub fn inherited_from(&self, base: &str) -> Option<&InheritanceStep> {
        self.steps.iter().find(|step| step.base == base)
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Lazily computes and caches inheritance chains over a frozen document.
///
/// Chains are memoized by qualified type name, so shared ancestors are
/// computed once regardless of how many descendants request them.
pub struct InheritanceResolver<'a> {
    document: &'a ResolvedDocument,
    cache: FxHashMap<String, Rc<InheritanceChain>>,
    /// Guard against derivation cycles in malformed inputs.
    visiting: FxHashSet<String>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> InheritanceResolver<'a> {
    pub fn new(document: &'a ResolvedDocument) -> Self {
        Self {
            document,
            cache: FxHashMap::default(),
            visiting: FxHashSet::default(),
            diagnostics: Vec::new(),
        }
    }

    /// Resolve the inheritance chain for a qualified type name.
    ///
    /// Unknown names and types without derivation yield an empty chain.
    pub fn resolve(&mut self, name: &str) -> Rc<InheritanceChain> {
        if let Some(cached) = self.cache.get(name) {
            return Rc::clone(cached);
        }
        if !self.visiting.insert(name.to_string()) {
            self.diagnostics.push(Diagnostic::warning(
                DiagnosticKind::CircularDerivation,
                format!("derivation cycle through '{name}'"),
            ));
            return Rc::new(InheritanceChain::default());
        }

        trace!("resolving inheritance chain for {name}");
        let chain = Rc::new(self.compute(name));
        self.visiting.remove(name);
        self.cache.insert(name.to_string(), Rc::clone(&chain));
        chain
    }

    /// A type's full rendered content: everything it inherits plus its
    /// own declared elements, in order.
    pub fn content_elements(&mut self, name: &str) -> Vec<String> {
        let mut elements = self.resolve(name).inherited_elements();
        if let Some(def) = self.document.get(name) {
            for own in declared_elements(content_node(def.node)) {
                push_unique(&mut elements, &own);
            }
        }
        elements
    }

    /// Drain the diagnostics collected so far.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    fn compute(&mut self, name: &str) -> InheritanceChain {
        let Some(def) = self.document.get(name) else {
            return InheritanceChain::default();
        };
        let Some((derivation_node, derivation)) = derivation_of(def.node) else {
            return InheritanceChain::default();
        };
        let Some(base) = derivation_node.attr("base").map(str::to_string) else {
            return InheritanceChain::default();
        };

        match derivation {
            DerivationKind::Extension => {
                // Builtin bases (simple-content extension of xsd:string
                // and friends) end the chain without a step.
                if is_builtin(&base) {
                    return InheritanceChain::default();
                }
                let Some(base_def) = self.document.get(&base) else {
                    self.diagnostics.push(Diagnostic::warning(
                        DiagnosticKind::UnresolvedReference,
                        format!("'{name}' extends unknown base '{base}'"),
                    ));
                    return InheritanceChain::default();
                };
                let base_elements = declared_elements(content_node(base_def.node));

                let mut steps = self.resolve(&base).steps.clone();
                steps.push(InheritanceStep {
                    base,
                    derivation: DerivationKind::Extension,
                    elements: base_elements,
                });
                InheritanceChain { steps }
            }
            DerivationKind::Restriction => {
                if is_builtin(&base) {
                    return InheritanceChain::default();
                }
                if !self.document.contains(&base) {
                    self.diagnostics.push(Diagnostic::warning(
                        DiagnosticKind::UnresolvedReference,
                        format!("'{name}' restricts unknown base '{base}'"),
                    ));
                    return InheritanceChain::default();
                }
                // The retained set is exactly what the restriction node
                // redeclares; ancestors above the base contribute nothing.
                InheritanceChain {
                    steps: vec![InheritanceStep {
                        base,
                        derivation: DerivationKind::Restriction,
                        elements: declared_elements(derivation_node),
                    }],
                }
            }
        }
    }
}

/// Locate a complexType's derivation node, if it has one.
///
/// Simple-content derivations carry no element content, which the
/// element-collection helpers reflect naturally.
fn derivation_of(node: &SchemaNode) -> Option<(&SchemaNode, DerivationKind)> {
    let content = node
        .find_child("complexContent")
        .or_else(|| node.find_child("simpleContent"))?;
    if let Some(extension) = content.find_child("extension") {
        return Some((extension, DerivationKind::Extension));
    }
    if let Some(restriction) = content.find_child("restriction") {
        // A simple-content restriction only narrows facets; its redeclared
        // element set is empty either way.
        return Some((restriction, DerivationKind::Restriction));
    }
    None
}

/// The node holding a type's own element declarations: the derivation
/// node when the type derives, the type node itself otherwise.
fn content_node(node: &SchemaNode) -> &SchemaNode {
    match derivation_of(node) {
        Some((derivation_node, _)) => derivation_node,
        None => node,
    }
}

/// Collect element names declared in a content model, in document order.
/// Recurses through model groups but not into nested type definitions.
fn declared_elements(node: &SchemaNode) -> Vec<String> {
    let mut elements = Vec::new();
    collect_elements(node, &mut elements);
    elements
}

fn collect_elements(node: &SchemaNode, out: &mut Vec<String>) {
    for child in &node.children {
        match child.tag.as_str() {
            "element" => {
                if let Some(name) = child.attr("name").or_else(|| child.attr("ref")) {
                    push_unique(out, name);
                }
            }
            "sequence" | "choice" | "all" => collect_elements(child, out),
            _ => {}
        }
    }
}

fn push_unique(out: &mut Vec<String>, name: &str) {
    if !out.iter().any(|n| n == name) {
        out.push(name.to_string());
    }
}
