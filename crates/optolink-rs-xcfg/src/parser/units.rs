// crates/optolink-rs-xcfg/src/parser/units.rs

//! Builder for the `units` section.

use super::text_or_empty;
use crate::cursor::next_in_section;
use crate::dom::{Document, NodeId};
use crate::error::XcfgError;
use log::{debug, error, trace};
use optolink_rs::model::{Enumeration, Unit};

/// Parses the children of a `units` section.
///
/// A `unit` element (with a mandatory `name` attribute) starts a new unit;
/// the builder then descends into its children. Any unrecognized child
/// under a started unit aborts the compile; no partial unit is retained.
pub(crate) fn parse_units(
    doc: &Document,
    first: Option<NodeId>,
) -> Result<Vec<Unit>, XcfgError> {
    let mut units: Vec<Unit> = Vec::new();
    let mut unit_node: Option<NodeId> = None;
    let mut cur = first;

    while let Some(node) = cur {
        if doc.is_text(node) {
            cur = next_in_section(doc, node, &mut unit_node);
            continue;
        }
        let name = doc.element_name(node).unwrap_or_default();
        trace!("UNIT: element <{}>", name);

        if name == "unit" {
            let unit_name = doc.attr(node, "name").ok_or(XcfgError::MissingAttribute {
                element: "unit",
                attribute: "name",
            })?;
            debug!("new unit: {}", unit_name);
            units.push(new_unit(unit_name));
            match doc.first_child(node) {
                Some(child) => {
                    unit_node = Some(node);
                    cur = Some(child);
                }
                None => cur = next_in_section(doc, node, &mut unit_node),
            }
            continue;
        }

        // Every other element is a child of the unit in progress.
        let Some(unit) = units.last_mut() else {
            error!("element <{}> outside of a unit", name);
            return Err(XcfgError::UnexpectedElement {
                section: "units",
                element: name.to_string(),
            });
        };

        match name {
            "enum" => {
                let text = doc.attr(node, "text").ok_or_else(|| {
                    error!("enum without text= in unit {}", unit.name);
                    XcfgError::MissingAttribute {
                        element: "enum",
                        attribute: "text",
                    }
                })?;
                // Absence of bytes= marks the unit's default entry.
                let bytes = doc
                    .attr(node, "bytes")
                    .map(optolink_rs::codec::decode_escaped_bytes);
                unit.enums.push(Enumeration {
                    text: text.to_string(),
                    bytes,
                });
            }
            "abbrev" => unit.abbrev = text_or_empty(doc, node),
            "calc" => {
                unit.get_calc = doc.attr(node, "get").unwrap_or_default().to_string();
                unit.set_calc = doc.attr(node, "set").unwrap_or_default().to_string();
            }
            "icalc" => {
                unit.get_icalc = doc.attr(node, "get").unwrap_or_default().to_string();
                unit.set_icalc = doc.attr(node, "set").unwrap_or_default().to_string();
            }
            "type" => unit.unit_type = text_or_empty(doc, node),
            "entity" => unit.entity = text_or_empty(doc, node),
            other => {
                error!("error parsing unit {}: unexpected <{}>", unit.name, other);
                return Err(XcfgError::UnexpectedElement {
                    section: "units",
                    element: other.to_string(),
                });
            }
        }
        cur = next_in_section(doc, node, &mut unit_node);
    }

    Ok(units)
}

fn new_unit(name: &str) -> Unit {
    Unit {
        name: name.to_string(),
        abbrev: String::new(),
        get_calc: String::new(),
        set_calc: String::new(),
        get_icalc: String::new(),
        set_icalc: String::new(),
        entity: String::new(),
        unit_type: String::new(),
        enums: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units_of(xml: &str) -> Result<Vec<Unit>, XcfgError> {
        let doc = Document::parse_str(xml).unwrap();
        parse_units(&doc, doc.first_child(doc.root()))
    }

    #[test]
    fn full_unit() {
        let units = units_of(
            r#"<units>
                 <unit name="Temperature">
                   <abbrev>UT</abbrev>
                   <calc get="V/2" set="V*2"/>
                   <icalc get="V" set="V"/>
                   <type>short</type>
                   <entity>°C</entity>
                 </unit>
               </units>"#,
        )
        .expect("parse failed");
        assert_eq!(units.len(), 1);
        let u = &units[0];
        assert_eq!(u.name, "Temperature");
        assert_eq!(u.abbrev, "UT");
        assert_eq!(u.get_calc, "V/2");
        assert_eq!(u.set_calc, "V*2");
        assert_eq!(u.unit_type, "short");
        assert_eq!(u.entity, "°C");
    }

    #[test]
    fn enum_entries_and_default() {
        let units = units_of(
            r#"<units>
                 <unit name="Mode">
                   <abbrev>BA</abbrev>
                   <enum bytes="0x01" text="on"/>
                   <enum bytes="0x00" text="off"/>
                   <enum text="auto"/>
                 </unit>
               </units>"#,
        )
        .unwrap();
        let enums = &units[0].enums;
        assert_eq!(enums.len(), 3);
        assert_eq!(enums[0].bytes.as_deref(), Some(&[0x01][..]));
        assert_eq!(enums[2].bytes, None);
    }

    #[test]
    fn blank_only_unit_body_does_not_end_the_section() {
        let units = units_of(
            "<units><unit name=\"A\"> </unit><unit name=\"B\"><abbrev>B1</abbrev></unit></units>",
        )
        .unwrap();
        assert_eq!(units.len(), 2);
        assert_eq!(units[1].abbrev, "B1");
    }

    #[test]
    fn enum_without_text_is_fatal() {
        let err = units_of(
            r#"<units><unit name="Mode"><abbrev>BA</abbrev><enum bytes="0x01"/></unit></units>"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            XcfgError::MissingAttribute {
                element: "enum",
                ..
            }
        ));
    }

    #[test]
    fn unknown_child_is_fatal() {
        let err =
            units_of(r#"<units><unit name="Mode"><bogus>x</bogus></unit></units>"#).unwrap_err();
        assert!(matches!(err, XcfgError::UnexpectedElement { .. }));
    }

    #[test]
    fn two_units_with_blank_separators() {
        let units = units_of(
            "<units>\n  <unit name=\"A\"><abbrev>A1</abbrev></unit>\n  <unit name=\"B\"><abbrev>B1</abbrev></unit>\n</units>",
        )
        .unwrap();
        assert_eq!(units.len(), 2);
        assert_eq!(units[1].abbrev, "B1");
    }
}
