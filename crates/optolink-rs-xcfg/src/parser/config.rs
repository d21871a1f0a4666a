// crates/optolink-rs-xcfg/src/parser/config.rs

//! Builder for the `config` section.

use super::{is_truthy, lenient_int, text_or_empty};
use crate::cursor::next_in_section;
use crate::dom::{Document, NodeId};
use crate::error::XcfgError;
use log::{trace, warn};
use optolink_rs::model::Allow;

/// The parsed `config` section, before default-device resolution.
#[derive(Debug, Default)]
pub(crate) struct ConfigDraft {
    pub tty: String,
    pub port: u16,
    pub logfile: String,
    pub syslog: bool,
    pub debug: bool,
    pub device_id: String,
    pub allows: Vec<Allow>,
}

/// Parses the children of a `config` section.
///
/// Container elements `serial`, `net` and `logging` are descended into;
/// the recognized leaves are `tty`, `port`, `allow ip=`, `file`, `syslog`,
/// `debug` and the `device ID=` default-device element. Unrecognized
/// children are skipped. A malformed `allow` literal is logged and the
/// rule dropped, never fatal.
pub(crate) fn parse_config(
    doc: &Document,
    first: Option<NodeId>,
) -> Result<ConfigDraft, XcfgError> {
    let mut cfg = ConfigDraft::default();
    let mut container: Option<NodeId> = None;
    let mut in_serial = false;
    let mut in_net = false;
    let mut in_logging = false;
    let mut cur = first;

    while let Some(node) = cur {
        if doc.is_text(node) {
            cur = next_in_section(doc, node, &mut container);
            continue;
        }
        let name = doc.element_name(node).unwrap_or_default();
        trace!("CONFIG: element <{}>", name);

        match name {
            "serial" => {
                in_serial = true;
                descend(doc, node, &mut container, &mut cur);
                continue;
            }
            "net" => {
                in_net = true;
                descend(doc, node, &mut container, &mut cur);
                continue;
            }
            "logging" => {
                in_logging = true;
                descend(doc, node, &mut container, &mut cur);
                continue;
            }
            "device" => {
                cfg.device_id = doc.attr(node, "ID").unwrap_or_default().to_string();
                trace!("default device ID={}", cfg.device_id);
            }
            "tty" if in_serial => cfg.tty = text_or_empty(doc, node),
            "port" if in_net => cfg.port = lenient_int(doc.text(node)),
            "allow" if in_net => {
                let literal = doc.attr(node, "ip").unwrap_or_default();
                match Allow::parse(literal) {
                    Some(rule) => {
                        trace!("allow {} (mask {:08x})", rule.text, rule.mask);
                        cfg.allows.push(rule);
                    }
                    None => warn!("skipping malformed allow rule: {}", literal),
                }
            }
            "file" if in_logging => cfg.logfile = text_or_empty(doc, node),
            "syslog" if in_logging => cfg.syslog = is_truthy(doc.text(node)),
            "debug" if in_logging => cfg.debug = is_truthy(doc.text(node)),
            other => trace!("skipping <{}> in config", other),
        }
        cur = next_in_section(doc, node, &mut container);
    }

    Ok(cfg)
}

/// Moves the cursor into a container's children, or past a childless
/// container. The container is recorded as a backtrack target only when
/// it is actually entered.
fn descend(
    doc: &Document,
    node: NodeId,
    container: &mut Option<NodeId>,
    cur: &mut Option<NodeId>,
) {
    match doc.first_child(node) {
        Some(child) => {
            *container = Some(node);
            *cur = Some(child);
        }
        None => *cur = next_in_section(doc, node, container),
    }
}
