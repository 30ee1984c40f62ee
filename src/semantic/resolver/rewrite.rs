//! Attribute rewriting passes applied during the merge.

use indexmap::IndexMap;

use crate::base::{XSD_NAMESPACE, XSD_PREFIX, has_prefix, qualify, split_qname};
use crate::parser::SchemaNode;
use rustc_hash::FxHashSet;

use super::super::registry::NamespaceRegistry;
use super::super::types::{Diagnostic, DiagnosticKind};

/// Top-level tags whose `name` attribute is a definition name.
const NAMED_DEFINITION_TAGS: [&str; 5] = [
    "element",
    "group",
    "attributeGroup",
    "complexType",
    "simpleType",
];

/// Attributes that hold a reference to a qualified name.
const REFERENCE_ATTRS: [&str; 4] = ["type", "base", "ref", "substitutionGroup"];

/// Prepend `prefix` to every top-level definition name that lacks one.
pub(super) fn prefix_definition_names(nodes: &mut [SchemaNode], prefix: &str) {
    for node in nodes {
        if !NAMED_DEFINITION_TAGS.contains(&node.tag.as_str()) {
            continue;
        }
        if let Some(name) = node.attr("name")
            && !has_prefix(name)
        {
            let qualified = qualify(prefix, name);
            node.set_attr("name", qualified);
        }
    }
}

/// Prepend `prefix` to every unprefixed reference attribute anywhere in
/// the trees: element/group/attributeGroup refs, type references,
/// extension/restriction bases, and substitution-group targets.
pub(super) fn prefix_unqualified_refs(nodes: &mut [SchemaNode], prefix: &str) {
    for node in nodes {
        node.walk_mut(&mut |n| {
            for attr in REFERENCE_ATTRS {
                if let Some(value) = n.attr(attr)
                    && !has_prefix(value)
                {
                    let qualified = qualify(prefix, value);
                    n.set_attr(attr, qualified);
                }
            }
        });
    }
}

/// Cross-namespace normalization: resolve each prefixed reference through
/// the file's *own* declarations to a namespace, then re-emit it with the
/// global registry's canonical prefix for that namespace.
///
/// `applied_prefix` is the prefix the merge already stamped onto the
/// file's unqualified references; values carrying it are canonical and
/// skipped. The reserved XSD namespace always normalizes to `xsd:`; the
/// root namespace uses the root prefix or drops the prefix entirely;
/// anything the registry does not know is left untouched with a warning.
pub(super) fn remap_prefixed_refs(
    nodes: &mut [SchemaNode],
    decls: &IndexMap<String, String>,
    applied_prefix: Option<&str>,
    registry: &NamespaceRegistry,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for node in nodes {
        node.walk_mut(&mut |n| {
            for attr in REFERENCE_ATTRS {
                let Some(value) = n.attr(attr).map(str::to_string) else {
                    continue;
                };
                let (Some(local_prefix), local) = split_qname(&value) else {
                    continue;
                };
                if applied_prefix == Some(local_prefix) {
                    continue;
                }

                let Some(namespace) = decls.get(local_prefix) else {
                    diagnostics.push(Diagnostic::warning(
                        DiagnosticKind::UnknownPrefix,
                        format!(
                            "prefix '{local_prefix}' in {attr}=\"{value}\" is not declared; keeping value"
                        ),
                    ));
                    continue;
                };

                if namespace == XSD_NAMESPACE {
                    let canonical = qualify(XSD_PREFIX, local);
                    n.set_attr(attr, canonical);
                } else if registry.is_root_namespace(namespace) {
                    match registry.root_prefix() {
                        Some(root_prefix) => {
                            let canonical = qualify(root_prefix, local);
                            n.set_attr(attr, canonical);
                        }
                        // Root namespace without a prefix: strip
                        None => n.set_attr(attr, local.to_string()),
                    }
                } else if let Some(prefix) = registry.prefix_for(namespace) {
                    let canonical = qualify(prefix, local);
                    n.set_attr(attr, canonical);
                } else {
                    diagnostics.push(Diagnostic::warning(
                        DiagnosticKind::UnresolvedReference,
                        format!("no registry prefix for {namespace}, keeping '{value}'"),
                    ));
                }
            }
        });
    }
}

/// Rewrite any alias of the reserved namespace (`xs:` and friends) on
/// `type`/`base` attributes to the canonical `xsd:` prefix.
pub(super) fn normalize_reserved_prefixes(nodes: &mut [SchemaNode], aliases: &FxHashSet<String>) {
    for node in nodes {
        node.walk_mut(&mut |n| {
            for attr in ["type", "base"] {
                if let Some(value) = n.attr(attr)
                    && let (Some(prefix), local) = split_qname(value)
                    && aliases.contains(prefix)
                {
                    let canonical = qualify(XSD_PREFIX, local);
                    n.set_attr(attr, canonical);
                }
            }
        });
    }
}
