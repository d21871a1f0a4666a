// crates/optolink-rs-xcfg/src/parser/mod.rs

//! One builder per document section.
//!
//! Each builder consumes a node stream under the cursor's traversal rule
//! and produces an ordered entity list. Strictness deliberately differs by
//! section: unit, macro and internal-command bodies hard-error on unknown
//! children, while protocol and config bodies skip them.

use crate::dom::{Document, NodeId};

pub(crate) mod commands;
pub(crate) mod config;
pub(crate) mod devices;
pub(crate) mod icmds;
pub(crate) mod macros;
pub(crate) mod protocols;
pub(crate) mod units;

/// The element's text content, or empty when absent.
pub(crate) fn text_or_empty(doc: &Document, node: NodeId) -> String {
    doc.text(node).unwrap_or_default().to_string()
}

/// Lenient integer parse: absent or malformed text yields the default,
/// never an error.
pub(crate) fn lenient_int<T>(text: Option<&str>) -> T
where
    T: std::str::FromStr + Default,
{
    text.and_then(|t| t.trim().parse().ok()).unwrap_or_default()
}

/// Truthiness of a flag element's text: `y...` or `1...` enable it.
pub(crate) fn is_truthy(text: Option<&str>) -> bool {
    matches!(
        text.map(str::trim).and_then(|t| t.chars().next()),
        Some('y') | Some('1')
    )
}
