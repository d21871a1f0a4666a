// crates/optolink-rs-xcfg/src/parser/macros.rs

//! Builder for a protocol's `macros` container.

use super::text_or_empty;
use crate::cursor::next_in_section;
use crate::dom::{Document, NodeId};
use crate::error::XcfgError;
use log::{debug, error, trace};
use optolink_rs::model::Macro;

/// Parses the children of a `macros` container.
///
/// A `macro` element with a `name` attribute starts a new entry; its single
/// recognized child `command` fills the command text. Anything else under a
/// started macro is a hard error.
pub(crate) fn parse_macros(
    doc: &Document,
    first: Option<NodeId>,
) -> Result<Vec<Macro>, XcfgError> {
    let mut macros: Vec<Macro> = Vec::new();
    let mut macro_node: Option<NodeId> = None;
    let mut cur = first;

    while let Some(node) = cur {
        if doc.is_text(node) {
            cur = next_in_section(doc, node, &mut macro_node);
            continue;
        }
        let name = doc.element_name(node).unwrap_or_default();
        trace!("MACRO: element <{}>", name);

        match name {
            "macro" => {
                let macro_name = doc.attr(node, "name").ok_or(XcfgError::MissingAttribute {
                    element: "macro",
                    attribute: "name",
                })?;
                debug!("new macro: {}", macro_name);
                macros.push(Macro {
                    name: macro_name.to_string(),
                    command: String::new(),
                });
                match doc.first_child(node) {
                    Some(child) => {
                        macro_node = Some(node);
                        cur = Some(child);
                    }
                    None => cur = next_in_section(doc, node, &mut macro_node),
                }
                continue;
            }
            "command" => {
                let Some(entry) = macros.last_mut() else {
                    error!("command element outside of a macro");
                    return Err(XcfgError::UnexpectedElement {
                        section: "macros",
                        element: name.to_string(),
                    });
                };
                entry.command = text_or_empty(doc, node);
                cur = next_in_section(doc, node, &mut macro_node);
            }
            other => {
                error!("error parsing macro: unexpected <{}>", other);
                return Err(XcfgError::UnexpectedElement {
                    section: "macros",
                    element: other.to_string(),
                });
            }
        }
    }

    Ok(macros)
}
