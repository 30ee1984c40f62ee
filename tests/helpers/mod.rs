//! Common fixture support for resolution tests.
//!
//! Schema fixtures are written into a [`TempDir`] so the resolver
//! exercises real path canonicalization and relative schemaLocation
//! handling.

// Not every suite uses every helper
#![allow(dead_code)]

use std::fs;

use tempfile::TempDir;
use xsdoc::{Resolution, resolve};

/// Write a set of (file name, content) pairs into a fresh temp directory.
pub fn schema_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("create temp dir");
    for (name, content) in files {
        fs::write(dir.path().join(name), content).expect("write fixture");
    }
    dir
}

/// Resolve a root file inside a fixture directory, expecting success.
pub fn resolve_root(dir: &TempDir, root: &str) -> Resolution {
    resolve(dir.path().join(root)).expect("resolution should succeed")
}

/// Names of all definitions in the merged document, in merge order.
pub fn definition_names(resolution: &Resolution) -> Vec<String> {
    resolution
        .document
        .definitions()
        .map(|d| d.name.to_string())
        .collect()
}
