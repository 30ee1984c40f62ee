//! # xsdoc-base
//!
//! Core library for XSD schema parsing, import resolution, and
//! cross-reference analysis.
//!
//! Given a root schema file, the library merges the transitive
//! import/include closure into a single namespace-consistent document and
//! derives two views over it: per-type inheritance chains and a one-hop
//! usage index. An external renderer turns these into documentation; this
//! crate owns no output format.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! semantic  → registry, import closure resolver, resolved document,
//!             inheritance chains, usage index
//!   ↓
//! parser    → quick-xml event parser, schema node tree
//!   ↓
//! base      → primitives (namespace constants, qualified names)
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → semantic)
// ============================================================================

/// Foundation: XSD namespace constants, qualified-name helpers
pub mod base;

/// Parser: quick-xml event reader producing a generic schema node tree
pub mod parser;

/// Semantic analysis: namespace registry, import closure, derived graphs
pub mod semantic;

// Re-export the core-to-collaborator surface
pub use parser::{ParseError, SchemaFile, SchemaNode, parse_file};
pub use semantic::document::{Definition, DefinitionKind, ResolvedDocument};
pub use semantic::error::ImportError;
pub use semantic::graphs::{
    DerivationKind, InheritanceChain, InheritanceResolver, InheritanceStep, ReferenceKind,
    UsageIndex, UsageInfo,
};
pub use semantic::registry::NamespaceRegistry;
pub use semantic::resolver::{Resolution, Resolver, resolve};
pub use semantic::types::{Diagnostic, DiagnosticKind, Severity};
