//! Import closure resolution: prefixing, merging, dedup, and rewriting.

mod helpers;

use helpers::{definition_names, resolve_root, schema_dir};
use xsdoc::{DiagnosticKind, ImportError, resolve};

const MAIN_XSD: &str = r#"<?xml version="1.0"?>
<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema"
            targetNamespace="http://example.com/main">
    <xsd:annotation><xsd:documentation>Root docs stay.</xsd:documentation></xsd:annotation>
    <xsd:import namespace="http://example.com/a" schemaLocation="child_a.xsd"/>
    <xsd:import namespace="http://example.com/b" schemaLocation="child_b.xsd"/>
    <xsd:complexType name="MainType">
        <xsd:sequence>
            <xsd:element name="label" type="xsd:string"/>
        </xsd:sequence>
    </xsd:complexType>
</xsd:schema>"#;

const CHILD_A_XSD: &str = r#"<?xml version="1.0"?>
<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema"
            targetNamespace="http://example.com/a">
    <xsd:annotation><xsd:documentation>Dropped on merge.</xsd:documentation></xsd:annotation>
    <xsd:complexType name="TypeA">
        <xsd:sequence>
            <xsd:element name="value" type="xsd:string"/>
        </xsd:sequence>
    </xsd:complexType>
</xsd:schema>"#;

// child_b addresses namespace a through its own local prefix "mya", which
// must be rewritten to the registry's canonical prefix after the merge.
const CHILD_B_XSD: &str = r#"<?xml version="1.0"?>
<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema"
            xmlns:mya="http://example.com/a"
            targetNamespace="http://example.com/b">
    <xsd:import schemaLocation="child_c.xsd"/>
    <xsd:complexType name="TypeB">
        <xsd:sequence>
            <xsd:element name="refToA" type="mya:TypeA"/>
        </xsd:sequence>
    </xsd:complexType>
</xsd:schema>"#;

const CHILD_C_XSD: &str = r#"<?xml version="1.0"?>
<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema"
            targetNamespace="http://example.com/c">
    <xsd:complexType name="TypeC">
        <xsd:sequence>
            <xsd:element name="payload" type="xsd:string"/>
        </xsd:sequence>
    </xsd:complexType>
</xsd:schema>"#;

fn main_fixture() -> tempfile::TempDir {
    schema_dir(&[
        ("main.xsd", MAIN_XSD),
        ("child_a.xsd", CHILD_A_XSD),
        ("child_b.xsd", CHILD_B_XSD),
        ("child_c.xsd", CHILD_C_XSD),
    ])
}

#[test]
fn test_direct_imports_get_derived_prefixes() {
    let dir = main_fixture();
    let resolution = resolve_root(&dir, "main.xsd");
    let names = definition_names(&resolution);

    assert!(names.contains(&"a:TypeA".to_string()), "names: {names:?}");
    assert!(names.contains(&"b:TypeB".to_string()), "names: {names:?}");
}

#[test]
fn test_root_definitions_stay_unprefixed_without_root_prefix() {
    let dir = main_fixture();
    let resolution = resolve_root(&dir, "main.xsd");
    assert!(definition_names(&resolution).contains(&"MainType".to_string()));
}

#[test]
fn test_transitive_import_merged_exactly_once() {
    let dir = main_fixture();
    let resolution = resolve_root(&dir, "main.xsd");
    let names = definition_names(&resolution);
    let count = names.iter().filter(|n| *n == "c:TypeC").count();
    assert_eq!(count, 1, "names: {names:?}");
}

#[test]
fn test_cross_namespace_reference_uses_registry_prefix() {
    let dir = main_fixture();
    let resolution = resolve_root(&dir, "main.xsd");

    let type_b = resolution.document.get("b:TypeB").expect("b:TypeB merged");
    let sequence = type_b.node.find_child("sequence").expect("sequence");
    let ref_to_a = sequence
        .children_tagged("element")
        .find(|e| e.attr("name") == Some("refToA"))
        .expect("refToA element");
    // Not "mya:TypeA" (child_b's local prefix) - the canonical registry one
    assert_eq!(ref_to_a.attr("type"), Some("a:TypeA"));
}

#[test]
fn test_imported_annotations_dropped_root_annotation_kept() {
    let dir = main_fixture();
    let resolution = resolve_root(&dir, "main.xsd");
    let annotations = resolution
        .document
        .nodes()
        .iter()
        .filter(|n| n.tag == "annotation")
        .count();
    assert_eq!(annotations, 1);
}

#[test]
fn test_import_directives_absent_from_merged_document() {
    let dir = main_fixture();
    let resolution = resolve_root(&dir, "main.xsd");
    assert!(
        resolution
            .document
            .nodes()
            .iter()
            .all(|n| n.tag != "import" && n.tag != "include")
    );
}

#[test]
fn test_resolution_is_deterministic() {
    let dir = main_fixture();
    let first = resolve_root(&dir, "main.xsd");
    let second = resolve_root(&dir, "main.xsd");

    assert_eq!(first.document, second.document);
    assert_eq!(first.registry, second.registry);
}

// ===========================================================================
// Diamond imports
// ===========================================================================

#[test]
fn test_diamond_import_merged_once() {
    let root = r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
        <xsd:import namespace="http://example.com/left" schemaLocation="left.xsd"/>
        <xsd:import namespace="http://example.com/right" schemaLocation="right.xsd"/>
    </xsd:schema>"#;
    let left = r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema"
            targetNamespace="http://example.com/left">
        <xsd:import namespace="http://example.com/Shared_Data" schemaLocation="shared.xsd"/>
        <xsd:complexType name="LeftType"/>
    </xsd:schema>"#;
    let right = r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema"
            targetNamespace="http://example.com/right">
        <xsd:import namespace="http://example.com/Shared_Data" schemaLocation="shared.xsd"/>
        <xsd:complexType name="RightType"/>
    </xsd:schema>"#;
    let shared = r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema"
            targetNamespace="http://example.com/Shared_Data">
        <xsd:complexType name="SharedType"/>
    </xsd:schema>"#;

    let dir = schema_dir(&[
        ("root.xsd", root),
        ("left.xsd", left),
        ("right.xsd", right),
        ("shared.xsd", shared),
    ]);
    let resolution = resolve_root(&dir, "root.xsd");
    let names = definition_names(&resolution);

    let count = names.iter().filter(|n| *n == "shared:SharedType").count();
    assert_eq!(count, 1, "names: {names:?}");
    assert_eq!(
        resolution.registry.prefix_for("http://example.com/Shared_Data"),
        Some("shared")
    );
}

#[test]
fn test_cyclic_imports_terminate() {
    let first = r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema"
            targetNamespace="http://example.com/one">
        <xsd:import namespace="http://example.com/two" schemaLocation="two.xsd"/>
        <xsd:complexType name="One"/>
    </xsd:schema>"#;
    let second = r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema"
            targetNamespace="http://example.com/two">
        <xsd:import namespace="http://example.com/one" schemaLocation="one.xsd"/>
        <xsd:complexType name="Two"/>
    </xsd:schema>"#;
    let root = r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
        <xsd:import namespace="http://example.com/one" schemaLocation="one.xsd"/>
    </xsd:schema>"#;

    let dir = schema_dir(&[("root.xsd", root), ("one.xsd", first), ("two.xsd", second)]);
    let resolution = resolve_root(&dir, "root.xsd");
    let names = definition_names(&resolution);
    assert!(names.contains(&"one:One".to_string()));
    assert!(names.contains(&"two:Two".to_string()));
    assert_eq!(names.len(), 2);
}

// ===========================================================================
// Prefix collisions
// ===========================================================================

#[test]
fn test_declared_prefix_collision_stays_injective() {
    let root = r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
        <xsd:import namespace="http://example.com/d" schemaLocation="collision_d.xsd"/>
        <xsd:import namespace="http://example.com/e" schemaLocation="collision_e.xsd"/>
    </xsd:schema>"#;
    let d = r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema"
            xmlns:shared="http://example.com/d"
            targetNamespace="http://example.com/d">
        <xsd:complexType name="TypeD"/>
    </xsd:schema>"#;
    let e = r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema"
            xmlns:shared="http://example.com/e"
            targetNamespace="http://example.com/e">
        <xsd:complexType name="TypeE"/>
    </xsd:schema>"#;

    let dir = schema_dir(&[
        ("root.xsd", root),
        ("collision_d.xsd", d),
        ("collision_e.xsd", e),
    ]);
    let resolution = resolve_root(&dir, "root.xsd");

    let prefix_d = resolution.registry.prefix_for("http://example.com/d");
    let prefix_e = resolution.registry.prefix_for("http://example.com/e");
    assert_eq!(prefix_d, Some("shared"));
    assert_eq!(prefix_e, Some("shared2"));

    let names = definition_names(&resolution);
    assert!(names.contains(&"shared:TypeD".to_string()));
    assert!(names.contains(&"shared2:TypeE".to_string()));
}

#[test]
fn test_namespace_deriving_reserved_prefix_gets_suffix() {
    let root = r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
        <xsd:import namespace="http://example.com/xsd" schemaLocation="vendor.xsd"/>
    </xsd:schema>"#;
    // This namespace's derived candidate collides with the reserved prefix
    let vendor = r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema"
            targetNamespace="http://example.com/xsd">
        <xsd:complexType name="Thing">
            <xsd:sequence>
                <xsd:element name="label" type="xsd:string"/>
            </xsd:sequence>
        </xsd:complexType>
    </xsd:schema>"#;

    let dir = schema_dir(&[("root.xsd", root), ("vendor.xsd", vendor)]);
    let resolution = resolve_root(&dir, "root.xsd");

    assert_eq!(
        resolution.registry.prefix_for("http://example.com/xsd"),
        Some("xsd2")
    );
    let names = definition_names(&resolution);
    assert!(names.contains(&"xsd2:Thing".to_string()), "names: {names:?}");

    // Builtin references inside the vendor file stay canonical
    let thing = resolution.document.get("xsd2:Thing").expect("xsd2:Thing");
    let sequence = thing.node.find_child("sequence").expect("sequence");
    assert_eq!(sequence.children[0].attr("type"), Some("xsd:string"));
}

#[test]
fn test_self_references_in_imports_resolve_without_warnings() {
    let root = r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
        <xsd:import namespace="http://example.com/a" schemaLocation="child.xsd"/>
    </xsd:schema>"#;
    // The child addresses its own type unprefixed, the common case
    let child = r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema"
            targetNamespace="http://example.com/a">
        <xsd:complexType name="TypeX"/>
        <xsd:element name="item" type="TypeX"/>
    </xsd:schema>"#;

    let dir = schema_dir(&[("root.xsd", root), ("child.xsd", child)]);
    let resolution = resolve_root(&dir, "root.xsd");

    assert!(
        resolution.diagnostics.is_empty(),
        "{:?}",
        resolution.diagnostics
    );
    let item = resolution.document.get("a:item").expect("a:item");
    assert_eq!(item.node.attr("type"), Some("a:TypeX"));
}

// ===========================================================================
// Root prefix and namespace overrides
// ===========================================================================

#[test]
fn test_root_prefix_applied_to_root_definitions() {
    let root = r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema"
            xmlns:tns="http://example.com/main"
            targetNamespace="http://example.com/main">
        <xsd:complexType name="MainType">
            <xsd:sequence>
                <xsd:element name="other" type="Other"/>
                <xsd:element name="label" type="xsd:string"/>
            </xsd:sequence>
        </xsd:complexType>
        <xsd:complexType name="Other"/>
    </xsd:schema>"#;

    let dir = schema_dir(&[("root.xsd", root)]);
    let resolution = resolve_root(&dir, "root.xsd");
    let names = definition_names(&resolution);
    assert!(names.contains(&"tns:MainType".to_string()));
    assert!(names.contains(&"tns:Other".to_string()));

    let main_type = resolution.document.get("tns:MainType").expect("MainType");
    let sequence = main_type.node.find_child("sequence").expect("sequence");
    assert_eq!(sequence.children[0].attr("type"), Some("tns:Other"));
    // Builtins stay untouched
    assert_eq!(sequence.children[1].attr("type"), Some("xsd:string"));
}

#[test]
fn test_import_namespace_override_wins_over_missing_target() {
    let root = r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
        <xsd:import namespace="http://example.com/lib" schemaLocation="lib.xsd"/>
    </xsd:schema>"#;
    // No targetNamespace of its own; the directive's override applies
    let lib = r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
        <xsd:element name="Widget" type="xsd:string"/>
    </xsd:schema>"#;

    let dir = schema_dir(&[("root.xsd", root), ("lib.xsd", lib)]);
    let resolution = resolve_root(&dir, "root.xsd");
    assert!(definition_names(&resolution).contains(&"lib:Widget".to_string()));
}

#[test]
fn test_include_into_root_namespace_merges_unprefixed() {
    let root = r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema"
            targetNamespace="http://example.com/main">
        <xsd:include schemaLocation="part.xsd"/>
        <xsd:complexType name="MainType"/>
    </xsd:schema>"#;
    let part = r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema"
            targetNamespace="http://example.com/main">
        <xsd:complexType name="PartType"/>
    </xsd:schema>"#;

    let dir = schema_dir(&[("root.xsd", root), ("part.xsd", part)]);
    let resolution = resolve_root(&dir, "root.xsd");
    let names = definition_names(&resolution);
    assert!(names.contains(&"MainType".to_string()));
    assert!(names.contains(&"PartType".to_string()));
}

// ===========================================================================
// Reserved namespace normalization
// ===========================================================================

#[test]
fn test_xs_alias_normalized_to_canonical_prefix() {
    let root = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
            targetNamespace="http://example.com/main">
        <xs:complexType name="MainType">
            <xs:sequence>
                <xs:element name="label" type="xs:string"/>
            </xs:sequence>
        </xs:complexType>
    </xs:schema>"#;

    let dir = schema_dir(&[("root.xsd", root)]);
    let resolution = resolve_root(&dir, "root.xsd");
    let main_type = resolution.document.get("MainType").expect("MainType");
    let sequence = main_type.node.find_child("sequence").expect("sequence");
    assert_eq!(sequence.children[0].attr("type"), Some("xsd:string"));
}

// ===========================================================================
// Failure modes and diagnostics
// ===========================================================================

#[test]
fn test_missing_import_is_fatal() {
    let root = r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
        <xsd:import namespace="http://example.com/gone" schemaLocation="gone.xsd"/>
    </xsd:schema>"#;

    let dir = schema_dir(&[("root.xsd", root)]);
    let err = resolve(dir.path().join("root.xsd")).unwrap_err();
    assert!(matches!(err, ImportError::FileNotFound { .. }), "{err}");
}

#[test]
fn test_missing_root_is_fatal() {
    let dir = schema_dir(&[]);
    let err = resolve(dir.path().join("absent.xsd")).unwrap_err();
    assert!(matches!(err, ImportError::RootNotFound(_)), "{err}");
}

#[test]
fn test_import_without_schema_location_is_fatal() {
    let root = r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
        <xsd:import namespace="http://example.com/x"/>
    </xsd:schema>"#;

    let dir = schema_dir(&[("root.xsd", root)]);
    let err = resolve(dir.path().join("root.xsd")).unwrap_err();
    assert!(matches!(err, ImportError::MissingLocation(_)), "{err}");
}

#[test]
fn test_unparseable_import_is_fatal() {
    let root = r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
        <xsd:import namespace="http://example.com/bad" schemaLocation="bad.xsd"/>
    </xsd:schema>"#;

    let dir = schema_dir(&[("root.xsd", root), ("bad.xsd", "<notaschema/>")]);
    let err = resolve(dir.path().join("root.xsd")).unwrap_err();
    assert!(matches!(err, ImportError::Parse { .. }), "{err}");
}

#[test]
fn test_undeclared_prefix_warns_and_keeps_value() {
    let root = r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
        <xsd:import namespace="http://example.com/f" schemaLocation="f.xsd"/>
    </xsd:schema>"#;
    let f = r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema"
            targetNamespace="http://example.com/f">
        <xsd:element name="broken" type="mystery:Thing"/>
    </xsd:schema>"#;

    let dir = schema_dir(&[("root.xsd", root), ("f.xsd", f)]);
    let resolution = resolve_root(&dir, "root.xsd");

    assert!(
        resolution
            .diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::UnknownPrefix)
    );
    let broken = resolution.document.get("f:broken").expect("f:broken");
    assert_eq!(broken.node.attr("type"), Some("mystery:Thing"));
}
