//! # Parser
//!
//! Event-driven XML parsing of XSD schema files into a generic node tree.
//!
//! The parser is deliberately schema-language-agnostic beyond recognizing
//! the `<schema>` root: it produces [`SchemaNode`] trees that the semantic
//! layer classifies and rewrites. Files are parsed exactly once; the
//! resolver owns any mutation afterward.

mod error;
mod schema;
mod xml;

pub use error::ParseError;
pub use schema::{SchemaFile, SchemaNode};
pub use xml::{parse_bytes, parse_file};
