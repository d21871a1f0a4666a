// crates/optolink-rs-xcfg/src/lib.rs

#![doc = "Compiles Optolink XML controller configurations into a command model."]
#![doc = ""]
#![doc = "The compiler walks an element/attribute/text document tree with a"]
#![doc = "backtracking node cursor, builds the entity graph section by section,"]
#![doc = "resolves cross-references, propagates protocol-default commands to"]
#![doc = "every device, and installs the finished generation atomically: a"]
#![doc = "failed compile leaves the previously active model untouched."]

// --- Crate Modules ---

mod compiler;
mod cursor;
mod dom;
mod error;
mod parser;
mod reload;

// --- Public API Re-exports ---

pub use compiler::compile;
pub use dom::{Document, NodeId};
pub use error::XcfgError;
pub use reload::Reloader;

use optolink_rs::Model;

/// Parses and compiles a configuration document in one step.
///
/// # Errors
/// Returns an [`XcfgError`] if the document cannot be parsed or any
/// structural rule of the configuration schema is violated.
pub fn compile_from_str(xml: &str) -> Result<Model, XcfgError> {
    let doc = Document::parse_str(xml)?;
    compile(&doc)
}
