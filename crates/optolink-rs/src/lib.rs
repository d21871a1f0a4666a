// crates/optolink-rs/src/lib.rs

#![doc = "Core command model for Optolink heating controllers."]
#![doc = ""]
#![doc = "This crate defines the immutable entity graph a configuration compiler"]
#![doc = "produces (protocols, devices, commands, units, access rules), the"]
#![doc = "query interface a command dispatcher consumes, and the process-wide"]
#![doc = "store that swaps whole model generations atomically."]

// --- Foundation Modules ---
pub mod codec;
pub mod model;
pub mod store;

// --- Top-level Exports ---
pub use model::{
    Allow, Command, CommandOrigin, Config, Device, DeviceId, EnumLookup, Enumeration,
    InternalCommand, Macro, Model, Protocol, ProtocolId, Unit,
};
pub use store::ModelStore;
