// crates/optolink-rs-xcfg/tests/robustness.rs

//! Integration tests focused on error handling and the reload protocol.
//!
//! These tests ensure a malformed or inconsistent document never panics,
//! never half-applies, and never disturbs a previously installed model.

use optolink_rs::store::ModelStore;
use optolink_rs_xcfg::{Reloader, XcfgError, compile_from_str};
use std::sync::Arc;

/// A minimal valid document used as a base for creating corrupted test cases.
const MINIMAL_VALID_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<V-Control>
  <protocols>
    <protocol name="KW2"><pid>0x01</pid></protocol>
  </protocols>
  <units>
    <unit name="Temperatur">
      <abbrev>UT</abbrev>
      <calc get="V/10" set="V*10"/>
    </unit>
  </units>
  <devices>
    <device ID="2094" name="V200KW2" protocol="KW2"/>
  </devices>
  <commands>
    <command name="getTempA" protocmd="getaddr">
      <addr>0800</addr>
      <unit>UT</unit>
    </command>
  </commands>
  <config>
    <net><port>3002</port></net>
    <device ID="2094"/>
  </config>
</V-Control>"#;

#[test]
fn test_rejects_wrong_root_element() {
    let err = compile_from_str("<Vito><config/></Vito>").unwrap_err();
    assert!(matches!(err, XcfgError::WrongDocumentType { root } if root == "Vito"));
}

#[test]
fn test_rejects_missing_config_section() {
    let xml = MINIMAL_VALID_XML.replace("<config>", "<ignored>").replace("</config>", "</ignored>");
    let err = compile_from_str(&xml).unwrap_err();
    assert!(matches!(err, XcfgError::MissingElement { element: "config" }));
}

#[test]
fn test_rejects_duplicated_section() {
    let xml = MINIMAL_VALID_XML.replace("<units>", "<units></units><units>");
    let err = compile_from_str(&xml).unwrap_err();
    assert!(matches!(err, XcfgError::DuplicateSection { section: "units" }));
}

#[test]
fn test_rejects_unresolved_protocol_reference() {
    let xml = MINIMAL_VALID_XML.replace(r#"protocol="KW2""#, r#"protocol="GWG""#);
    let err = compile_from_str(&xml).unwrap_err();
    assert!(matches!(err, XcfgError::UnknownProtocol { name } if name == "GWG"));
}

#[test]
fn test_rejects_unresolved_default_device() {
    let xml = MINIMAL_VALID_XML.replace(r#"<device ID="2094"/>"#, r#"<device ID="9999"/>"#);
    let err = compile_from_str(&xml).unwrap_err();
    assert!(matches!(err, XcfgError::UnknownDevice { id } if id == "9999"));
}

#[test]
fn test_rejects_override_for_unknown_device() {
    let xml = MINIMAL_VALID_XML.replace(
        "<addr>0800</addr>",
        r#"<addr>0800</addr><device ID="5555"><addr>0801</addr></device>"#,
    );
    let err = compile_from_str(&xml).unwrap_err();
    assert!(matches!(err, XcfgError::UnknownDevice { id } if id == "5555"));
}

#[test]
fn test_rejects_unit_without_name() {
    let xml = MINIMAL_VALID_XML.replace(r#"<unit name="Temperatur">"#, "<unit>");
    let err = compile_from_str(&xml).unwrap_err();
    assert!(matches!(
        err,
        XcfgError::MissingAttribute { element: "unit", attribute: "name" }
    ));
}

#[test]
fn test_rejects_enum_without_text() {
    let xml = MINIMAL_VALID_XML.replace("<abbrev>UT</abbrev>", r#"<abbrev>UT</abbrev><enum bytes="00"/>"#);
    let err = compile_from_str(&xml).unwrap_err();
    assert!(matches!(
        err,
        XcfgError::MissingAttribute { element: "enum", attribute: "text" }
    ));
}

#[test]
fn test_rejects_stray_element_in_unit_section() {
    let xml = MINIMAL_VALID_XML.replace("<units>", "<units><abbrev>XX</abbrev>");
    let err = compile_from_str(&xml).unwrap_err();
    assert!(matches!(err, XcfgError::UnexpectedElement { section: "units", .. }));
}

#[test]
fn test_rejects_truncated_document() {
    let xml = &MINIMAL_VALID_XML[..MINIMAL_VALID_XML.len() / 2];
    assert!(compile_from_str(xml).is_err());
}

/// A malformed access rule literal is dropped with a log line, never fatal.
#[test]
fn test_malformed_allow_rule_is_soft_skipped() {
    let xml = MINIMAL_VALID_XML.replace(
        "<net><port>3002</port></net>",
        r#"<net><port>3002</port><allow ip="not-an-address"/><allow ip="10.0.0.0/8"/></net>"#,
    );
    let model = compile_from_str(&xml).unwrap();
    assert_eq!(model.config.allows.len(), 1);
    assert_eq!(model.config.allows[0].text, "10.0.0.0/8");
}

/// A failed reload leaves the previously installed generation in place and
/// fully answerable.
#[test]
fn test_failed_reload_keeps_previous_generation() {
    env_logger::try_init().ok(); // Ignore error if already initialized
    let store = Arc::new(ModelStore::new());
    let reloader = Reloader::new(store.clone());

    let first = reloader.reload_from_str(MINIMAL_VALID_XML).unwrap();

    let broken = MINIMAL_VALID_XML.replace(r#"protocol="KW2""#, r#"protocol="GWG""#);
    assert!(reloader.reload_from_str(&broken).is_err());

    let live = store.snapshot().expect("store emptied by failed reload");
    assert!(Arc::ptr_eq(&first, &live));
    assert!(live.device("2094").unwrap().command("getTempA").is_some());
}

/// Reloading the same document twice produces a fresh generation that
/// answers queries identically; the displaced generation stays usable
/// through snapshots already taken.
#[test]
fn test_reload_is_idempotent_and_generational() {
    let store = Arc::new(ModelStore::new());
    let reloader = Reloader::new(store.clone());

    let first = reloader.reload_from_str(MINIMAL_VALID_XML).unwrap();
    let held = store.snapshot().unwrap();

    let second = reloader.reload_from_str(MINIMAL_VALID_XML).unwrap();
    assert!(!Arc::ptr_eq(&first, &second));

    // The old snapshot still answers, unchanged by the swap.
    assert_eq!(held.default_device().id, "2094");
    assert_eq!(
        held.device("2094").unwrap().command("getTempA").unwrap().addr.as_deref(),
        second.device("2094").unwrap().command("getTempA").unwrap().addr.as_deref()
    );

    // Dropping the last references releases the displaced generation.
    let weak = Arc::downgrade(&first);
    drop(first);
    drop(held);
    assert!(weak.upgrade().is_none());
}

/// A failed initial load leaves the store empty rather than installing a
/// partial model.
#[test]
fn test_failed_initial_load_installs_nothing() {
    let store = Arc::new(ModelStore::new());
    let reloader = Reloader::new(store.clone());

    let xml = MINIMAL_VALID_XML.replace("</commands>", "");
    assert!(reloader.reload_from_str(&xml).is_err());
    assert!(!store.is_loaded());
    assert!(store.snapshot().is_none());
}
