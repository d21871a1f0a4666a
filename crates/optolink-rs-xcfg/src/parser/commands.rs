// crates/optolink-rs-xcfg/src/parser/commands.rs

//! Builder for the `commands` section, including device-scoped overrides.
//!
//! Command definitions nest: a top-level `command` element defines a
//! generic, protocol-independent command, and `device` elements inside it
//! override that same logical command for one device. An override shares
//! `name` and `description` with the enclosing generic record (by `Arc`,
//! so the sharing survives into the compiled model) and inherits `unit`
//! and the protocol command text unless it specifies its own.

use super::{lenient_int, text_or_empty};
use crate::cursor::next_in_section;
use crate::dom::{Document, NodeId};
use crate::error::XcfgError;
use log::{debug, error, trace};
use optolink_rs::codec::decode_escaped_bytes;
use optolink_rs::model::{Command, CommandOrigin, Device};
use std::sync::Arc;

/// Parses the children of the top-level `commands` section.
///
/// Returns the generic command list; device-scoped overrides are appended
/// directly to the matching device's command list as they are seen.
pub(crate) fn parse_commands(
    doc: &Document,
    first: Option<NodeId>,
    devices: &mut [Device],
) -> Result<Vec<Command>, XcfgError> {
    let mut generics: Vec<Command> = Vec::new();
    let mut cmd_node: Option<NodeId> = None;
    let mut cur = first;

    while let Some(node) = cur {
        if doc.is_text(node) {
            cur = next_in_section(doc, node, &mut cmd_node);
            continue;
        }
        let name = doc.element_name(node).unwrap_or_default();
        trace!("COMMAND: element <{}>", name);

        if name == "command" {
            let cmd_name = doc.attr(node, "name").ok_or(XcfgError::MissingAttribute {
                element: "command",
                attribute: "name",
            })?;
            debug!("new command: {}", cmd_name);
            let mut cmd = Command::new(Arc::from(cmd_name), CommandOrigin::Authored);
            cmd.pcmd = doc.attr(node, "protocmd").map(Arc::from);
            generics.push(cmd);
            match doc.first_child(node) {
                Some(child) => {
                    cmd_node = Some(node);
                    cur = Some(child);
                }
                None => cur = next_in_section(doc, node, &mut cmd_node),
            }
            continue;
        }

        let Some(cmd) = generics.last_mut() else {
            error!("element <{}> outside of a command", name);
            return Err(XcfgError::UnexpectedElement {
                section: "commands",
                element: name.to_string(),
            });
        };

        if name == "device" {
            parse_device_override(doc, node, cmd, devices)?;
        } else {
            apply_leaf(doc, node, name, cmd)?;
        }
        cur = next_in_section(doc, node, &mut cmd_node);
    }

    Ok(generics)
}

/// Parses a `device` element nested inside a generic command.
fn parse_device_override(
    doc: &Document,
    node: NodeId,
    generic: &Command,
    devices: &mut [Device],
) -> Result<(), XcfgError> {
    let id = doc.attr(node, "ID").ok_or(XcfgError::MissingAttribute {
        element: "device",
        attribute: "ID",
    })?;
    let idx = devices.iter().position(|d| d.id == id).ok_or_else(|| {
        error!("device {} is not defined", id);
        XcfgError::UnknownDevice { id: id.to_string() }
    })?;
    debug!("device-scoped command {} for device {}", generic.name, id);

    let mut scoped = Command::new(Arc::clone(&generic.name), CommandOrigin::DeviceScoped);
    parse_override_body(doc, doc.first_child(node), &mut scoped)?;

    // Shared with the generic record, not copied.
    scoped.description = generic.description.clone();
    // Inherited only where the override stayed silent.
    if scoped.unit.is_none() {
        scoped.unit = generic.unit.clone();
    }
    scoped.pcmd = doc
        .attr(node, "protocmd")
        .map(Arc::from)
        .or_else(|| generic.pcmd.clone());

    devices[idx].commands.push(scoped);
    Ok(())
}

/// Parses the leaf fields of a device-scoped override. Overrides carry only
/// leaf fields; further nesting is a hard error.
fn parse_override_body(
    doc: &Document,
    first: Option<NodeId>,
    cmd: &mut Command,
) -> Result<(), XcfgError> {
    let mut cur = first;
    while let Some(node) = cur {
        if doc.is_text(node) {
            cur = next_in_section(doc, node, &mut None);
            continue;
        }
        let name = doc.element_name(node).unwrap_or_default();
        apply_leaf(doc, node, name, cmd)?;
        cur = next_in_section(doc, node, &mut None);
    }
    Ok(())
}

/// Applies one recognized leaf field to a command record.
fn apply_leaf(
    doc: &Document,
    node: NodeId,
    name: &str,
    cmd: &mut Command,
) -> Result<(), XcfgError> {
    match name {
        "addr" => cmd.addr = Some(Arc::from(text_or_empty(doc, node))),
        "error" => {
            let bytes = decode_escaped_bytes(&text_or_empty(doc, node));
            cmd.err_str = if bytes.is_empty() {
                None
            } else {
                Some(Arc::from(bytes))
            };
        }
        "unit" => cmd.unit = Some(Arc::from(text_or_empty(doc, node))),
        "precommand" => cmd.precmd = Some(Arc::from(text_or_empty(doc, node))),
        "description" => cmd.description = Some(Arc::from(text_or_empty(doc, node))),
        "len" => cmd.len = lenient_int(doc.text(node)),
        // An empty <bit> leaves the record a whole-field command.
        "bit" => {
            if doc.text(node).is_some() {
                cmd.bit = lenient_int(doc.text(node));
            }
        }
        other => {
            error!("error parsing command {}: unexpected <{}>", cmd.name, other);
            return Err(XcfgError::UnexpectedElement {
                section: "commands",
                element: other.to_string(),
            });
        }
    }
    Ok(())
}
