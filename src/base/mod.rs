//! Foundation types for the xsdoc toolchain.
//!
//! This module provides the primitives used throughout the crate:
//! - XSD namespace constants
//! - Qualified-name helpers (prefix splitting, builtin detection)
//!
//! This module has NO dependencies on other xsdoc modules.

/// The XML Schema definition namespace.
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// Canonical display prefix for [`XSD_NAMESPACE`]. All aliases (`xs:`,
/// `schema:`, ...) are normalized to this during resolution.
pub const XSD_PREFIX: &str = "xsd";

/// Split a qualified name into its prefix (if any) and local part.
///
/// `"a:TypeA"` → `(Some("a"), "TypeA")`, `"TypeA"` → `(None, "TypeA")`.
pub fn split_qname(name: &str) -> (Option<&str>, &str) {
    match name.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, name),
    }
}

/// Whether a name carries an explicit prefix.
pub fn has_prefix(name: &str) -> bool {
    name.contains(':')
}

/// Whether a reference points at an XSD builtin (`xsd:string` etc.).
///
/// Only meaningful after prefix normalization; during the per-file rewrite
/// the resolver additionally consults the file's own declarations.
pub fn is_builtin(name: &str) -> bool {
    name.starts_with("xsd:")
}

/// Join a prefix and local name into a qualified name.
pub fn qualify(prefix: &str, local: &str) -> String {
    format!("{prefix}:{local}")
}
