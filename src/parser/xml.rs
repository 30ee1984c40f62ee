//! quick-xml event loop building [`SchemaNode`] trees.

use std::path::Path;

use indexmap::IndexMap;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::debug;

use crate::base::XSD_NAMESPACE;

use super::error::ParseError;
use super::schema::{SchemaFile, SchemaNode};

/// Parse a schema file from disk.
pub fn parse_file(path: &Path) -> Result<SchemaFile, ParseError> {
    debug!("parsing schema file {}", path.display());
    let bytes = std::fs::read(path)?;
    parse_bytes(&bytes, path)
}

/// Parse a schema document from raw bytes, recording `path` as its origin.
pub fn parse_bytes(input: &[u8], path: &Path) -> Result<SchemaFile, ParseError> {
    let mut reader = Reader::from_reader(input);
    reader.config_mut().trim_text(true);

    let mut builder = TreeBuilder::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                builder.handle_start(e, reader.error_position())?;
            }
            Ok(Event::Empty(ref e)) => {
                // Self-closing element - handle as start + end
                builder.handle_start(e, reader.error_position())?;
                builder.handle_end();
            }
            Ok(Event::End(_)) => {
                builder.handle_end();
            }
            Ok(Event::Text(ref t)) => {
                let text = t.unescape().map_err(|e| {
                    ParseError::xml(reader.error_position(), format!("text error: {e}"))
                })?;
                builder.handle_text(&text);
            }
            Ok(Event::CData(ref t)) => {
                // CDATA content is literal; no unescaping
                let text = std::str::from_utf8(t).map_err(|e| {
                    ParseError::xml(reader.error_position(), format!("CDATA error: {e}"))
                })?;
                builder.handle_text(text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ParseError::xml(reader.error_position(), e.to_string()));
            }
            _ => {}
        }
        buf.clear();
    }

    if !builder.saw_schema {
        return Err(ParseError::MissingSchemaRoot);
    }

    Ok(SchemaFile {
        path: path.to_path_buf(),
        target_namespace: builder.target_namespace,
        ns_decls: builder.ns_decls,
        nodes: builder.top,
    })
}

/// Stack entry type for tracking nested elements.
enum StackEntry {
    /// The `<schema>` root - its children land in the top-level list.
    Root,
    /// Any other element, still being built.
    Node(SchemaNode),
}

#[derive(Default)]
struct TreeBuilder {
    /// Declared prefixes (prefix → URI), first declaration wins.
    ns_decls: IndexMap<String, String>,
    target_namespace: Option<String>,
    saw_schema: bool,
    stack: Vec<StackEntry>,
    top: Vec<SchemaNode>,
}

impl TreeBuilder {
    fn handle_start(&mut self, e: &BytesStart<'_>, position: u64) -> Result<(), ParseError> {
        let raw_tag = std::str::from_utf8(e.name().as_ref())
            .map_err(|err| ParseError::xml(position, format!("invalid tag name: {err}")))?
            .to_string();

        let mut attrs = IndexMap::new();
        for attr_result in e.attributes() {
            let attr = attr_result
                .map_err(|err| ParseError::xml(position, format!("attribute error: {err}")))?;
            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(|err| ParseError::xml(position, format!("attribute key error: {err}")))?;
            let value = attr
                .unescape_value()
                .map_err(|err| ParseError::xml(position, format!("attribute value error: {err}")))?
                .to_string();

            // Namespace declarations feed the file-level prefix table and
            // are not kept as ordinary attributes.
            if key == "xmlns" {
                self.ns_decls.entry(String::new()).or_insert(value);
            } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                self.ns_decls.entry(prefix.to_string()).or_insert(value);
            } else {
                attrs.insert(key.to_string(), value);
            }
        }

        let tag = self.resolve_tag(&raw_tag);

        if !self.saw_schema {
            if tag != "schema" {
                return Err(ParseError::MissingSchemaRoot);
            }
            self.saw_schema = true;
            self.target_namespace = attrs.shift_remove("targetNamespace");
            self.stack.push(StackEntry::Root);
            return Ok(());
        }

        let mut node = SchemaNode::new(tag);
        node.attrs = attrs;
        self.stack.push(StackEntry::Node(node));
        Ok(())
    }

    fn handle_end(&mut self) {
        match self.stack.pop() {
            Some(StackEntry::Node(node)) => match self.stack.last_mut() {
                Some(StackEntry::Node(parent)) => parent.children.push(node),
                _ => self.top.push(node),
            },
            Some(StackEntry::Root) | None => {}
        }
    }

    fn handle_text(&mut self, text: &str) {
        if let Some(StackEntry::Node(node)) = self.stack.last_mut() {
            let slot = node.text.get_or_insert_with(String::new);
            if !slot.is_empty() {
                slot.push(' ');
            }
            slot.push_str(text);
        }
    }

    /// Strip the prefix from tags in the XSD namespace; foreign tags keep
    /// their raw qualified form.
    fn resolve_tag(&self, raw: &str) -> String {
        let (prefix, local) = match raw.split_once(':') {
            Some((p, l)) => (p, l),
            None => ("", raw),
        };
        match self.ns_decls.get(prefix) {
            Some(ns) if ns == XSD_NAMESPACE => local.to_string(),
            _ => raw.to_string(),
        }
    }
}
