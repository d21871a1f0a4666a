// crates/optolink-rs-xcfg/src/cursor.rs

//! The "next relevant node" rule shared by every section builder.

use crate::dom::{Document, NodeId};

/// Advances to the next node a section builder should visit.
///
/// Source documents freely interleave whitespace-only text nodes with
/// element nodes, so plain sibling hopping is not enough: a builder that
/// descended into a subtree must also resume at the right ancestor level
/// once the subtree is exhausted.
///
/// The rule: if `cur` has a direct sibling that is not pure whitespace, or
/// that sibling itself has a further sibling, return the sibling (builders
/// skip blank text at the top of their loops). Otherwise return the sibling
/// of the recorded `parent`, if one was recorded when descending. Otherwise
/// the section is exhausted.
///
/// A lone trailing blank node therefore never ends a section early: it
/// fails the first test and control falls through to the ancestor.
///
/// The fallback is consumed when taken; once traversal has backtracked to
/// the ancestor's level, the record no longer applies there.
pub(crate) fn next_in_section(
    doc: &Document,
    cur: NodeId,
    parent: &mut Option<NodeId>,
) -> Option<NodeId> {
    if let Some(sibling) = doc.next_sibling(cur) {
        if !doc.is_blank(sibling) || doc.next_sibling(sibling).is_some() {
            return Some(sibling);
        }
    }
    parent.take().and_then(|p| doc.next_sibling(p))
}
