// crates/optolink-rs-xcfg/src/compiler.rs

//! Whole-document compilation: section discovery, the per-section builders
//! in dependency order, default-command propagation and default-device
//! resolution.

use crate::cursor::next_in_section;
use crate::dom::{Document, NodeId};
use crate::error::XcfgError;
use crate::parser::{commands, config, devices, protocols, units};
use log::{debug, error, info, trace};
use optolink_rs::model::{CommandOrigin, Config, DeviceId, Model};

/// The top-level section nodes found under the document root.
#[derive(Default)]
struct Sections {
    protocols: Option<NodeId>,
    units: Option<NodeId>,
    devices: Option<NodeId>,
    commands: Option<NodeId>,
    config: Option<NodeId>,
}

fn record(
    slot: &mut Option<NodeId>,
    section: &'static str,
    node: NodeId,
) -> Result<(), XcfgError> {
    if slot.is_some() {
        error!("section <{}> defined more than once", section);
        return Err(XcfgError::DuplicateSection { section });
    }
    *slot = Some(node);
    Ok(())
}

/// Walks the root's children and records each section node.
///
/// The `unix` wrapper (holding `config`) and the `extern`/`vito` inclusion
/// wrappers are descended through transparently; their contents sit at the
/// same logical level as the plain sections. Anything else is skipped.
fn discover_sections(doc: &Document, root: NodeId) -> Result<Sections, XcfgError> {
    let mut sections = Sections::default();
    let mut wrapper: Option<NodeId> = None;
    let mut cur = doc.first_child(root);

    while let Some(node) = cur {
        if doc.is_text(node) {
            cur = next_in_section(doc, node, &mut wrapper);
            continue;
        }
        let name = doc.element_name(node).unwrap_or_default();
        trace!("TOP: element <{}>", name);

        match name {
            "unix" => {
                // Record the wrapper only when actually entering it, so a
                // childless <unix/> never becomes a stale backtrack target.
                match doc.first_child(node) {
                    Some(child) => {
                        wrapper = Some(node);
                        cur = Some(child);
                    }
                    None => cur = next_in_section(doc, node, &mut wrapper),
                }
                continue;
            }
            "extern" => {
                // The included subtree hangs below <extern><vito>.
                let mut inner = doc.first_child(node);
                while let Some(c) = inner {
                    if !doc.is_text(c) {
                        break;
                    }
                    inner = doc.next_sibling(c);
                }
                match inner
                    .filter(|&c| doc.element_name(c) == Some("vito"))
                    .and_then(|vito| doc.first_child(vito).map(|child| (vito, child)))
                {
                    Some((vito, child)) => {
                        wrapper = Some(vito);
                        cur = Some(child);
                    }
                    None => cur = next_in_section(doc, node, &mut wrapper),
                }
                continue;
            }
            "protocols" => record(&mut sections.protocols, "protocols", node)?,
            "units" => record(&mut sections.units, "units", node)?,
            "devices" => record(&mut sections.devices, "devices", node)?,
            "commands" => record(&mut sections.commands, "commands", node)?,
            "config" => record(&mut sections.config, "config", node)?,
            other => trace!("skipping top-level <{}>", other),
        }
        cur = next_in_section(doc, node, &mut wrapper);
    }

    Ok(sections)
}

fn children(doc: &Document, section: Option<NodeId>) -> Option<NodeId> {
    section.and_then(|n| doc.first_child(n))
}

/// Compiles a parsed document into a complete model generation.
///
/// Sections are compiled in dependency order regardless of where they
/// appear in the document: protocols first, then units, then devices
/// (which resolve protocol references), then commands (whose overrides
/// resolve device references), then the configuration. A missing `config`
/// section fails the compile; any other absent section compiles as empty.
///
/// After the builders run, every generic command is propagated to each
/// device that does not already carry a same-named entry. The propagated
/// record aliases the generic's fields and is appended after any
/// device-scoped overrides, so a first-match-by-name lookup prefers the
/// override. Finally the configured default device id must resolve to a
/// defined device.
pub fn compile(doc: &Document) -> Result<Model, XcfgError> {
    let root = doc.root();
    let root_name = doc.element_name(root).unwrap_or_default();
    if root_name != "V-Control" {
        error!("document of the wrong type, root node {} != V-Control", root_name);
        return Err(XcfgError::WrongDocumentType {
            root: root_name.to_string(),
        });
    }

    let sections = discover_sections(doc, root)?;
    let Some(config_node) = sections.config else {
        error!("no config section in document");
        return Err(XcfgError::MissingElement { element: "config" });
    };

    let protocols = protocols::parse_protocols(doc, children(doc, sections.protocols))?;
    let units = units::parse_units(doc, children(doc, sections.units))?;
    let mut devices = devices::parse_devices(doc, children(doc, sections.devices), &protocols)?;
    let generics = commands::parse_commands(doc, children(doc, sections.commands), &mut devices)?;
    let draft = config::parse_config(doc, doc.first_child(config_node))?;

    // Every device that does not define a command inherits the generic one.
    for generic in &generics {
        for device in devices.iter_mut() {
            if device.command(&generic.name).is_none() {
                debug!("copying command {} to device {}", generic.name, device.id);
                let mut inherited = generic.clone();
                inherited.origin = CommandOrigin::Inherited;
                device.commands.push(inherited);
            }
        }
    }

    let default_device = devices
        .iter()
        .position(|d| d.id == draft.device_id)
        .map(DeviceId)
        .ok_or_else(|| {
            error!("device {} is not defined", draft.device_id);
            XcfgError::UnknownDevice {
                id: draft.device_id.clone(),
            }
        })?;

    info!(
        "compiled model: {} protocols, {} units, {} devices, {} commands",
        protocols.len(),
        units.len(),
        devices.len(),
        generics.len()
    );

    Ok(Model {
        protocols,
        units,
        devices,
        commands: generics,
        config: Config {
            tty: draft.tty,
            port: draft.port,
            logfile: draft.logfile,
            syslog: draft.syslog,
            debug: draft.debug,
            device_id: draft.device_id,
            default_device,
            allows: draft.allows,
        },
    })
}
