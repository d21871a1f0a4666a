// crates/optolink-rs/src/model/device.rs

//! Devices and their resolved command lists.

use super::ProtocolId;
use std::sync::Arc;

/// A concrete controllable unit, bound to one protocol.
#[derive(Debug)]
pub struct Device {
    /// `@ID`: unique among devices.
    pub id: String,
    /// `@name`: display name.
    pub name: String,
    /// Resolved reference to the device's protocol.
    pub protocol: ProtocolId,
    /// The device's command list. Device-scoped overrides are inserted
    /// while parsing, inherited defaults are appended afterwards, so a
    /// first-match-by-name scan always prefers the override.
    pub commands: Vec<Command>,
}

impl Device {
    /// Looks up a command by name, first match wins.
    pub fn command(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|c| &*c.name == name)
    }
}

/// Where a command record came from.
///
/// Mirrors how the record's text fields are shared: an `Authored` record
/// introduced its strings, a `DeviceScoped` override shares `name` and
/// `description` with its enclosing generic command, and an `Inherited`
/// record shares every field with the generic command it was propagated
/// from. Sharing is by `Arc`, so provenance is informational; teardown is
/// safe regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOrigin {
    /// A top-level generic command, as authored in the document.
    Authored,
    /// A `device`-nested override of a generic command.
    DeviceScoped,
    /// Injected by default-command propagation.
    Inherited,
}

/// A named, addressable operation with a wire-level template and unit
/// semantics.
#[derive(Debug, Clone)]
pub struct Command {
    /// `@name`: unique within a device's final list. Shared between a
    /// generic command and its per-device records.
    pub name: Arc<str>,
    /// `@protocmd`: the protocol-level send template.
    pub pcmd: Option<Arc<str>>,
    /// `<addr>`: device address text.
    pub addr: Option<Arc<str>>,
    /// `<precommand>`: name of a command to run first.
    pub precmd: Option<Arc<str>>,
    /// `<unit>`: abbreviation of the value unit.
    pub unit: Option<Arc<str>>,
    /// `<bit>`: bit index within the addressed byte; -1 means the whole
    /// byte/field is meant.
    pub bit: i16,
    /// `<len>`: payload byte length.
    pub len: usize,
    /// `<error>`: decoded error-indicator bytes.
    pub err_str: Option<Arc<[u8]>>,
    /// `<description>`: shared with derived records.
    pub description: Option<Arc<str>>,
    /// Provenance tag, see [`CommandOrigin`].
    pub origin: CommandOrigin,
}

impl Command {
    /// A fresh record with nothing set, as each builder pass starts from.
    pub fn new(name: Arc<str>, origin: CommandOrigin) -> Self {
        Command {
            name,
            pcmd: None,
            addr: None,
            precmd: None,
            unit: None,
            bit: -1,
            len: 0,
            err_str: None,
            description: None,
            origin,
        }
    }

    /// True if this command addresses a single bit rather than whole bytes.
    pub fn is_bit_field(&self) -> bool {
        self.bit >= 0
    }
}
