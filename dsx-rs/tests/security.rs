//! Security-focused tests.
//!
//! Documents are untrusted input: the parser must never reach outside the
//! document for DTDs or entities, and must not expand entity declarations.

use xml_dsx::parse_str;

#[test]
fn test_external_entity_is_not_resolved() {
    let xml = r#"<!DOCTYPE r [<!ENTITY xxe SYSTEM "file:///etc/passwd">]><r>&xxe;</r>"#;
    let err = parse_str(xml).unwrap_err();
    assert!(err.is_malformed());
    assert_eq!(err.node_snapshot(), Some("<r/>"));
}

#[test]
fn test_external_dtd_is_not_loaded() {
    let xml = r#"<!DOCTYPE r SYSTEM "http://127.0.0.1:1/never.dtd"><r a="1"/>"#;
    let root = parse_str(xml).unwrap();
    assert_eq!(root.to_xml(), r#"<r a="1"/>"#);
}

#[test]
fn test_parameter_entities_are_ignored() {
    let xml = r#"<!DOCTYPE r [<!ENTITY % p SYSTEM "http://127.0.0.1:1/p.dtd"> %p;]><r/>"#;
    assert_eq!(parse_str(xml).unwrap().to_xml(), "<r/>");
}

#[test]
fn test_internal_entities_are_not_expanded() {
    let xml = r#"<!DOCTYPE r [
  <!ENTITY a "aaaaaaaaaa">
  <!ENTITY b "&a;&a;&a;&a;&a;&a;&a;&a;&a;&a;">
  <!ENTITY c "&b;&b;&b;&b;&b;&b;&b;&b;&b;&b;">
]>
<r>&c;</r>"#;
    assert!(parse_str(xml).unwrap_err().is_malformed());
}

#[test]
fn test_entity_in_attribute_is_rejected() {
    let xml = r#"<!DOCTYPE r [<!ENTITY e "x">]><r v="&e;"/>"#;
    assert!(parse_str(xml).unwrap_err().is_malformed());
}
