//! # Semantic Analysis
//!
//! This module turns parsed schema files into a queryable model: the
//! import closure resolver merges files into one [`ResolvedDocument`]
//! with a globally consistent [`NamespaceRegistry`], and the graph
//! builders derive inheritance chains and a one-hop usage index from it.
//!
//! All mutation happens inside the resolver during closure; the document
//! and registry are frozen afterward and the graph builders only read.

pub mod document;
pub mod error;
pub mod graphs;
pub mod registry;
pub mod resolver;
pub mod types;

pub use document::{Definition, DefinitionKind, ResolvedDocument};
pub use error::ImportError;
pub use graphs::{
    DerivationKind, InheritanceChain, InheritanceResolver, InheritanceStep, ReferenceKind,
    UsageIndex, UsageInfo,
};
pub use registry::NamespaceRegistry;
pub use resolver::{Resolution, Resolver, resolve};
pub use types::{Diagnostic, DiagnosticKind, Severity};

/// A definition's namespace-prefixed name, unique after merge.
pub type QualifiedName = String;
