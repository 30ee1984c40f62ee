//! The merged, frozen output of closure resolution.

use indexmap::IndexMap;

use crate::parser::SchemaNode;

use super::types::{Diagnostic, DiagnosticKind};

/// The kind of a named top-level schema construct.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DefinitionKind {
    Element,
    ComplexType,
    SimpleType,
    Group,
    AttributeGroup,
}

impl DefinitionKind {
    /// Classify a top-level tag; `None` for non-definition nodes
    /// (annotations, notations, ...).
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "element" => Some(Self::Element),
            "complexType" => Some(Self::ComplexType),
            "simpleType" => Some(Self::SimpleType),
            "group" => Some(Self::Group),
            "attributeGroup" => Some(Self::AttributeGroup),
            _ => None,
        }
    }

    /// Display category used by the documentation renderer.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Element => "element",
            Self::ComplexType | Self::SimpleType => "type",
            Self::Group => "group",
            Self::AttributeGroup => "attribute-group",
        }
    }
}

/// A named top-level definition inside a [`ResolvedDocument`].
#[derive(Clone, Copy, Debug)]
pub struct Definition<'a> {
    /// Qualified name, unique within the document.
    pub name: &'a str,
    pub kind: DefinitionKind,
    pub node: &'a SchemaNode,
}

/// The merged closure output: a forest of top-level nodes with all
/// references rewritten to canonical qualified names, indexed by name.
///
/// Owned exclusively by the run and immutable once closure completes.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDocument {
    target_namespace: Option<String>,
    nodes: Vec<SchemaNode>,
    /// qualified name → index into `nodes`, in merge order
    index: IndexMap<String, usize>,
}

impl ResolvedDocument {
    /// Freeze a merged node forest, indexing named definitions.
    ///
    /// Qualified names are unique after a well-formed merge; when an input
    /// violates that, the first definition wins and a warning is recorded.
    pub(crate) fn new(
        target_namespace: Option<String>,
        nodes: Vec<SchemaNode>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Self {
        let mut index = IndexMap::new();
        for (i, node) in nodes.iter().enumerate() {
            if DefinitionKind::from_tag(&node.tag).is_none() {
                continue;
            }
            let Some(name) = node.attr("name") else {
                continue;
            };
            if index.contains_key(name) {
                diagnostics.push(Diagnostic::warning(
                    DiagnosticKind::DuplicateDefinition,
                    format!("duplicate definition of '{name}'; keeping the first"),
                ));
                continue;
            }
            index.insert(name.to_string(), i);
        }
        Self {
            target_namespace,
            nodes,
            index,
        }
    }

    /// The root schema's target namespace, if any.
    pub fn target_namespace(&self) -> Option<&str> {
        self.target_namespace.as_deref()
    }

    /// All merged top-level nodes, in merge order.
    pub fn nodes(&self) -> &[SchemaNode] {
        &self.nodes
    }

    /// Look up a definition by qualified name.
    pub fn get(&self, name: &str) -> Option<Definition<'_>> {
        let (_, name, &i) = self.index.get_full(name)?;
        let node = &self.nodes[i];
        let kind = DefinitionKind::from_tag(&node.tag)?;
        Some(Definition { name, kind, node })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterate all named definitions in merge order.
    pub fn definitions(&self) -> impl Iterator<Item = Definition<'_>> {
        self.index.iter().filter_map(|(name, &i)| {
            let node = &self.nodes[i];
            DefinitionKind::from_tag(&node.tag).map(|kind| Definition {
                name: name.as_str(),
                kind,
                node,
            })
        })
    }

    pub fn definition_count(&self) -> usize {
        self.index.len()
    }
}
