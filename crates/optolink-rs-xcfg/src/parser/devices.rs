// crates/optolink-rs-xcfg/src/parser/devices.rs

//! Builder for the `devices` section.

use crate::cursor::next_in_section;
use crate::dom::{Document, NodeId};
use crate::error::XcfgError;
use log::{debug, error, trace};
use optolink_rs::model::{Device, Protocol, ProtocolId};

/// Parses the children of a `devices` section.
///
/// Each `device` element must carry `name`, `ID` and `protocol` attributes.
/// The protocol name is resolved immediately against the already-built
/// protocol list; commands parsed later need a live protocol reference,
/// so an unresolved name fails the compile here.
pub(crate) fn parse_devices(
    doc: &Document,
    first: Option<NodeId>,
    protocols: &[Protocol],
) -> Result<Vec<Device>, XcfgError> {
    let mut devices: Vec<Device> = Vec::new();
    let mut cur = first;

    while let Some(node) = cur {
        if doc.is_text(node) {
            cur = next_in_section(doc, node, &mut None);
            continue;
        }
        let name = doc.element_name(node).unwrap_or_default();
        trace!("DEVICE: element <{}>", name);

        if name == "device" {
            let display = doc.attr(node, "name").ok_or(XcfgError::MissingAttribute {
                element: "device",
                attribute: "name",
            })?;
            let id = doc.attr(node, "ID").ok_or(XcfgError::MissingAttribute {
                element: "device",
                attribute: "ID",
            })?;
            let proto = doc.attr(node, "protocol").ok_or(XcfgError::MissingAttribute {
                element: "device",
                attribute: "protocol",
            })?;
            let protocol = protocols
                .iter()
                .position(|p| p.name == proto)
                .map(ProtocolId)
                .ok_or_else(|| {
                    error!("protocol {} not defined", proto);
                    XcfgError::UnknownProtocol {
                        name: proto.to_string(),
                    }
                })?;
            debug!("new device: name={} ID={} protocol={}", display, id, proto);
            devices.push(Device {
                id: id.to_string(),
                name: display.to_string(),
                protocol,
                commands: Vec::new(),
            });
        }
        cur = next_in_section(doc, node, &mut None);
    }

    Ok(devices)
}
