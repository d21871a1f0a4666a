// crates/optolink-rs-xcfg/src/parser/icmds.rs

//! Builder for a protocol's `commands` container (internal commands).

use super::{lenient_int, text_or_empty};
use crate::cursor::next_in_section;
use crate::dom::{Document, NodeId};
use crate::error::XcfgError;
use log::{debug, error, trace};
use optolink_rs::model::InternalCommand;

/// Parses the children of a protocol's `commands` container.
///
/// A `command` element with a `name` attribute starts a new internal
/// command; recognized children are `send`, `retry` and `recvTimeout`.
/// Absent integers default to zero; downstream callers treat a zero
/// `recvTimeout` as "no timeout override". Anything else is a hard error.
pub(crate) fn parse_icmds(
    doc: &Document,
    first: Option<NodeId>,
) -> Result<Vec<InternalCommand>, XcfgError> {
    let mut icmds: Vec<InternalCommand> = Vec::new();
    let mut cmd_node: Option<NodeId> = None;
    let mut cur = first;

    while let Some(node) = cur {
        if doc.is_text(node) {
            cur = next_in_section(doc, node, &mut cmd_node);
            continue;
        }
        let name = doc.element_name(node).unwrap_or_default();
        trace!("ICMD: element <{}>", name);

        if name == "command" {
            let cmd_name = doc.attr(node, "name").ok_or(XcfgError::MissingAttribute {
                element: "command",
                attribute: "name",
            })?;
            debug!("new internal command: {}", cmd_name);
            icmds.push(InternalCommand {
                name: cmd_name.to_string(),
                send: String::new(),
                retry: 0,
                recv_timeout: 0,
            });
            match doc.first_child(node) {
                Some(child) => {
                    cmd_node = Some(node);
                    cur = Some(child);
                }
                None => cur = next_in_section(doc, node, &mut cmd_node),
            }
            continue;
        }

        let Some(icmd) = icmds.last_mut() else {
            error!("element <{}> outside of an internal command", name);
            return Err(XcfgError::UnexpectedElement {
                section: "internal commands",
                element: name.to_string(),
            });
        };

        match name {
            "send" => icmd.send = text_or_empty(doc, node),
            "retry" => icmd.retry = lenient_int(doc.text(node)),
            "recvTimeout" => icmd.recv_timeout = lenient_int(doc.text(node)),
            other => {
                error!("error parsing internal command: unexpected <{}>", other);
                return Err(XcfgError::UnexpectedElement {
                    section: "internal commands",
                    element: other.to_string(),
                });
            }
        }
        cur = next_in_section(doc, node, &mut cmd_node);
    }

    Ok(icmds)
}
