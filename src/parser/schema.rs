//! Schema node tree and per-file metadata.

use std::path::PathBuf;

use indexmap::IndexMap;

/// One element of a parsed schema document.
///
/// Tags in the XSD namespace are stored as bare local names (`"element"`,
/// `"complexType"`, ...); foreign elements (appinfo payloads and the like)
/// keep their raw qualified form. Attribute order is preserved so the
/// merged document is deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    pub tag: String,
    pub attrs: IndexMap<String, String>,
    pub children: Vec<SchemaNode>,
    /// Concatenated character content, if any (documentation text).
    pub text: Option<String>,
}

impl SchemaNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: IndexMap::new(),
            children: Vec::new(),
            text: None,
        }
    }

    /// Get an attribute value.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    /// Set or replace an attribute value.
    pub fn set_attr(&mut self, key: &str, value: impl Into<String>) {
        self.attrs.insert(key.to_string(), value.into());
    }

    /// First direct child with the given tag.
    pub fn find_child(&self, tag: &str) -> Option<&SchemaNode> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// All direct children with the given tag.
    pub fn children_tagged<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a SchemaNode> {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    /// Visit this node and all descendants, depth-first.
    pub fn walk(&self, f: &mut impl FnMut(&SchemaNode)) {
        f(self);
        for child in &self.children {
            child.walk(f);
        }
    }

    /// Visit this node and all descendants mutably, depth-first.
    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut SchemaNode)) {
        f(self);
        for child in &mut self.children {
            child.walk_mut(f);
        }
    }
}

/// A parsed schema file, read-only after parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaFile {
    /// Canonical path the file was read from.
    pub path: PathBuf,
    /// The schema's declared `targetNamespace`, if any.
    pub target_namespace: Option<String>,
    /// Declared namespace prefixes (prefix → URI). The default namespace,
    /// when declared, sits under the empty prefix.
    pub ns_decls: IndexMap<String, String>,
    /// Top-level children of the `<schema>` element, in document order.
    pub nodes: Vec<SchemaNode>,
}

impl SchemaFile {
    /// Resolve a declared prefix to its namespace URI.
    pub fn namespace_for(&self, prefix: &str) -> Option<&str> {
        self.ns_decls.get(prefix).map(String::as_str)
    }
}
