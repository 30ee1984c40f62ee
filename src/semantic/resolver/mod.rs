//! # Import Closure Resolver
//!
//! Walks the import/include graph from a root schema file, merges every
//! reachable file exactly once, and rewrites definition names and
//! references so the merged document addresses everything through the
//! global registry's canonical prefixes.
//!
//! The resolver owns all mutation: parsed files are read-only, rewriting
//! happens on the resolver's own copies, and the returned document and
//! registry are frozen.

mod rewrite;

use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use crate::parser::{SchemaFile, SchemaNode, parse_file};

use super::document::ResolvedDocument;
use super::error::ImportError;
use super::registry::NamespaceRegistry;
use super::types::Diagnostic;

/// Tags consumed during closure and absent from the merged output.
const DIRECTIVE_TAGS: [&str; 2] = ["import", "include"];

/// The complete output of closure resolution.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub document: ResolvedDocument,
    pub registry: NamespaceRegistry,
    pub diagnostics: Vec<Diagnostic>,
}

/// Resolve a root schema file and its transitive import closure.
///
/// Fails with [`ImportError`] if any transitively referenced file is
/// missing or unparseable; otherwise always terminates (the visited set
/// makes diamond and cyclic import graphs safe) and returns a complete,
/// internally consistent document.
pub fn resolve(root: impl AsRef<Path>) -> Result<Resolution, ImportError> {
    Resolver::new().resolve(root.as_ref())
}

/// Closure traversal state: the registry, the visited-file set, and the
/// collected diagnostics. One resolver handles one run.
pub struct Resolver {
    registry: NamespaceRegistry,
    visited: FxHashSet<PathBuf>,
    diagnostics: Vec<Diagnostic>,
}

impl Resolver {
    pub fn new() -> Self {
        Self {
            registry: NamespaceRegistry::new(),
            visited: FxHashSet::default(),
            diagnostics: Vec::new(),
        }
    }

    /// Run the closure algorithm. Consumes the resolver; the result owns
    /// the frozen registry and document.
    pub fn resolve(mut self, root: &Path) -> Result<Resolution, ImportError> {
        let root_path = root
            .canonicalize()
            .map_err(|_| ImportError::RootNotFound(root.to_path_buf()))?;
        let root_file =
            parse_file(&root_path).map_err(|e| ImportError::parse(&root_path, e))?;

        self.registry = NamespaceRegistry::from_root(&root_file);
        self.visited.insert(root_path);

        // Depth-first over the import graph; imported content accumulates
        // here in traversal order, after the root's own nodes.
        let mut merged_imports = Vec::new();
        self.merge_imports(&root_file, &mut merged_imports)?;

        // The root's own definitions are prefixed only after the whole
        // closure completes, and only if the root declared a prefix for
        // its own namespace.
        let mut root_nodes: Vec<SchemaNode> = root_file
            .nodes
            .into_iter()
            .filter(|n| !DIRECTIVE_TAGS.contains(&n.tag.as_str()))
            .collect();
        if let Some(prefix) = self.registry.root_prefix().map(str::to_string) {
            rewrite::prefix_definition_names(&mut root_nodes, &prefix);
            rewrite::prefix_unqualified_refs(&mut root_nodes, &prefix);
        }

        let mut nodes = root_nodes;
        nodes.append(&mut merged_imports);

        // Normalize any leftover aliases of the reserved namespace
        // (xs:string and friends) to the single canonical prefix.
        let aliases: FxHashSet<String> = root_file
            .ns_decls
            .iter()
            .filter(|(prefix, uri)| {
                !prefix.is_empty()
                    && uri.as_str() == crate::base::XSD_NAMESPACE
                    && prefix.as_str() != crate::base::XSD_PREFIX
            })
            .map(|(prefix, _)| prefix.clone())
            .collect();
        if !aliases.is_empty() {
            rewrite::normalize_reserved_prefixes(&mut nodes, &aliases);
        }

        let document =
            ResolvedDocument::new(root_file.target_namespace, nodes, &mut self.diagnostics);
        Ok(Resolution {
            document,
            registry: self.registry,
            diagnostics: self.diagnostics,
        })
    }

    /// Process every import/include directive of `file` in document order.
    ///
    /// Transitive imports are recursed into *before* the importing file's
    /// own rewrite, so namespaces they pull in are registered before being
    /// needed; their content therefore also lands first in `out`.
    fn merge_imports(
        &mut self,
        file: &SchemaFile,
        out: &mut Vec<SchemaNode>,
    ) -> Result<(), ImportError> {
        for directive in file
            .nodes
            .iter()
            .filter(|n| DIRECTIVE_TAGS.contains(&n.tag.as_str()))
        {
            let Some(location) = directive.attr("schemaLocation") else {
                return Err(ImportError::MissingLocation(file.path.clone()));
            };

            let base_dir = file.path.parent().unwrap_or_else(|| Path::new("."));
            let target = base_dir.join(location);
            let target = target.canonicalize().map_err(|_| ImportError::FileNotFound {
                path: target.clone(),
                imported_from: file.path.clone(),
            })?;

            if !self.visited.insert(target.clone()) {
                trace!("skipping already merged file {}", target.display());
                continue;
            }
            debug!("importing {}", target.display());

            let imported = parse_file(&target).map_err(|e| ImportError::parse(&target, e))?;

            // Register the imported file's declared prefixes before
            // touching its content.
            self.registry.collect_declared(&imported);

            // Effective namespace: the directive's override, or the
            // imported file's own target namespace.
            let namespace = directive
                .attr("namespace")
                .map(str::to_string)
                .or_else(|| imported.target_namespace.clone());

            let add_prefix = match namespace.as_deref() {
                Some(ns) if !self.registry.is_root_namespace(ns) => {
                    Some(self.registry.ensure_prefix(ns))
                }
                // Root namespace: reuse the root prefix, or merge into the
                // bare namespace when the root declared none.
                Some(_) => self.registry.root_prefix().map(str::to_string),
                None => None,
            };

            self.merge_imports(&imported, out)?;

            let SchemaFile {
                nodes: mut imported_nodes,
                ns_decls,
                ..
            } = imported;

            if let Some(prefix) = &add_prefix {
                rewrite::prefix_definition_names(&mut imported_nodes, prefix);
                rewrite::prefix_unqualified_refs(&mut imported_nodes, prefix);
            }
            rewrite::remap_prefixed_refs(
                &mut imported_nodes,
                &ns_decls,
                add_prefix.as_deref(),
                &self.registry,
                &mut self.diagnostics,
            );

            // Top-level annotations are not merged upward; directives were
            // consumed by the recursion above.
            out.extend(imported_nodes.into_iter().filter(|n| {
                n.tag != "annotation" && !DIRECTIVE_TAGS.contains(&n.tag.as_str())
            }));
        }
        Ok(())
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}
