// crates/optolink-rs/src/model/mod.rs

//! The compiled command model.
//!
//! One [`Model`] value is one *generation*: the complete, immutable result of
//! a single successful configuration compile. Entities are appended in
//! document order and every lookup is a first-match-wins linear scan, so
//! earlier-declared entries shadow later ones; device-scoped command
//! overrides rely on exactly this ordering.

mod config;
mod device;
mod protocol;
mod unit;

pub use config::{Allow, Config};
pub use device::{Command, CommandOrigin, Device};
pub use protocol::{InternalCommand, Macro, Protocol};
pub use unit::{EnumLookup, Enumeration, Unit};

/// Index of a [`Protocol`] within [`Model::protocols`].
///
/// Devices reference their protocol by id rather than owning it; the id is
/// resolved once at compile time and stays valid for the generation's life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolId(pub usize);

/// Index of a [`Device`] within [`Model::devices`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceId(pub usize);

/// One complete compiled model generation.
///
/// Never mutated after the compile pass that built it finishes; replaced
/// wholesale through [`crate::ModelStore`].
#[derive(Debug)]
pub struct Model {
    /// All protocols, in declaration order.
    pub protocols: Vec<Protocol>,
    /// All units, in declaration order.
    pub units: Vec<Unit>,
    /// All devices, in declaration order. Command lists are fully resolved:
    /// device-scoped overrides first, inherited defaults appended after.
    pub devices: Vec<Device>,
    /// The generic (protocol-level) command list, as authored. Kept so
    /// callers can distinguish the defaults from per-device resolutions.
    pub commands: Vec<Command>,
    /// Daemon configuration, including the access rule list.
    pub config: Config,
}

impl Model {
    /// Looks up a device by its `ID` attribute.
    pub fn device(&self, id: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.id == id)
    }

    /// Looks up a unit by its abbreviation.
    pub fn unit(&self, abbrev: &str) -> Option<&Unit> {
        self.units.iter().find(|u| u.abbrev == abbrev)
    }

    /// Looks up a protocol by name.
    pub fn protocol(&self, name: &str) -> Option<&Protocol> {
        self.protocols.iter().find(|p| p.name == name)
    }

    /// Resolves a device's protocol reference.
    pub fn protocol_of(&self, device: &Device) -> &Protocol {
        &self.protocols[device.protocol.0]
    }

    /// The device named by the configuration's default device id.
    pub fn default_device(&self) -> &Device {
        &self.devices[self.config.default_device.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn sample_model() -> Model {
        let protocols = vec![Protocol {
            name: "P300".into(),
            id: 0x41,
            macros: Vec::new(),
            internal_commands: Vec::new(),
        }];
        let devices = vec![
            Device {
                id: "2094".into(),
                name: "V200KW2".into(),
                protocol: ProtocolId(0),
                commands: Vec::new(),
            },
            // Deliberate duplicate id: the first declaration must win.
            Device {
                id: "2094".into(),
                name: "shadowed".into(),
                protocol: ProtocolId(0),
                commands: Vec::new(),
            },
        ];
        Model {
            protocols,
            units: Vec::new(),
            devices,
            commands: Vec::new(),
            config: Config {
                tty: "/dev/ttyS0".into(),
                port: 3002,
                logfile: String::new(),
                syslog: false,
                debug: false,
                device_id: "2094".into(),
                default_device: DeviceId(0),
                allows: Vec::new(),
            },
        }
    }

    #[test]
    fn lookup_is_first_match_wins() {
        let model = sample_model();
        assert_eq!(model.device("2094").unwrap().name, "V200KW2");
        assert!(model.device("9999").is_none());
    }

    #[test]
    fn default_device_follows_config() {
        let model = sample_model();
        assert_eq!(model.default_device().id, "2094");
        let _ = Arc::new(model); // a generation is shared read-only
    }
}
