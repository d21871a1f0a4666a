// crates/optolink-rs-xcfg/src/parser/protocols.rs

//! Builder for the `protocols` section.

use super::icmds::parse_icmds;
use super::macros::parse_macros;
use crate::cursor::next_in_section;
use crate::dom::{Document, NodeId};
use crate::error::XcfgError;
use log::{debug, trace};
use optolink_rs::codec::decode_hex;
use optolink_rs::model::Protocol;

/// Parses the children of a `protocols` section.
///
/// A `protocol` element needs a `name` attribute (missing name is a hard
/// error). Recognized children: `pid` (hex protocol id), a `macros`
/// container and a `commands` container. Unlike the unit/macro builders,
/// unrecognized children are skipped, not errors; a protocol body may
/// carry ignorable metadata.
pub(crate) fn parse_protocols(
    doc: &Document,
    first: Option<NodeId>,
) -> Result<Vec<Protocol>, XcfgError> {
    let mut protocols: Vec<Protocol> = Vec::new();
    let mut proto_node: Option<NodeId> = None;
    let mut cur = first;

    while let Some(node) = cur {
        if doc.is_text(node) {
            cur = next_in_section(doc, node, &mut proto_node);
            continue;
        }
        let name = doc.element_name(node).unwrap_or_default();
        trace!("PROT: element <{}>", name);

        if name == "protocol" {
            let proto_name = doc.attr(node, "name").ok_or(XcfgError::MissingAttribute {
                element: "protocol",
                attribute: "name",
            })?;
            debug!("new protocol: {}", proto_name);
            protocols.push(Protocol {
                name: proto_name.to_string(),
                id: 0,
                macros: Vec::new(),
                internal_commands: Vec::new(),
            });
            match doc.first_child(node) {
                Some(child) => {
                    proto_node = Some(node);
                    cur = Some(child);
                }
                None => cur = next_in_section(doc, node, &mut proto_node),
            }
            continue;
        }

        if let Some(proto) = protocols.last_mut() {
            match name {
                "pid" => {
                    proto.id = decode_hex(doc.text(node).unwrap_or_default());
                }
                "macros" => {
                    proto.macros = parse_macros(doc, doc.first_child(node))?;
                }
                "commands" => {
                    proto.internal_commands = parse_icmds(doc, doc.first_child(node))?;
                }
                other => trace!("skipping <{}> in protocol {}", other, proto.name),
            }
        } else {
            trace!("skipping <{}> before any protocol", name);
        }
        cur = next_in_section(doc, node, &mut proto_node);
    }

    Ok(protocols)
}
