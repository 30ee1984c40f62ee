//! Diagnostics — structured warnings collected during resolution.
//!
//! Resolution degrades gracefully: only a missing or unparseable file is
//! fatal (see [`ImportError`](super::error::ImportError)). Everything else
//! is recorded here and returned alongside the result so callers and tests
//! can assert on it without scraping log output.

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Warning,
    Info,
}

/// What kind of non-fatal problem was observed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// A reference's target namespace or definition could not be found;
    /// the attribute was left unmodified or the view omits the edge.
    UnresolvedReference,
    /// A reference used a prefix its own file never declared.
    UnknownPrefix,
    /// Two merged definitions share a qualified name; the first wins.
    DuplicateDefinition,
    /// A derivation chain loops back on itself.
    CircularDerivation,
}

/// A collected diagnostic message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    /// Create a warning diagnostic.
    pub fn warning(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            message: message.into(),
        }
    }

    /// Create an info diagnostic.
    pub fn info(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            kind,
            message: message.into(),
        }
    }
}
