//! Error types for schema file parsing.

use thiserror::Error;

/// Errors that can occur while parsing a single schema file.
#[derive(Debug, Error)]
pub enum ParseError {
    /// IO error during read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed XML, with the byte position reported by the reader.
    #[error("XML parse error at position {position}: {message}")]
    Xml { position: u64, message: String },

    /// The document contains no `<schema>` root element.
    #[error("document has no schema root element")]
    MissingSchemaRoot,
}

impl ParseError {
    /// Create an XML error at a reader position.
    pub fn xml(position: u64, message: impl Into<String>) -> Self {
        Self::Xml {
            position,
            message: message.into(),
        }
    }
}
