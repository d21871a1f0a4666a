// crates/optolink-rs-xcfg/src/error.rs

use quick_xml::events::attributes::AttrError;
use std::error::Error;
use std::fmt;

/// Errors that can occur while compiling a configuration document.
///
/// Every variant except [`XcfgError::ReloadInProgress`] is structural: it
/// aborts the in-progress compile and discards the candidate model, leaving
/// any previously installed generation authoritative.
#[derive(Debug)]
pub enum XcfgError {
    /// An error from the underlying `quick-xml` reader.
    XmlParsing(quick_xml::Error),

    /// An attribute list could not be decoded.
    XmlAttr(AttrError),

    /// The document's root element is not `V-Control`.
    WrongDocumentType { root: String },

    /// A required element was missing (e.g. the `config` section).
    MissingElement { element: &'static str },

    /// A section appeared more than once.
    DuplicateSection { section: &'static str },

    /// A required attribute was missing (e.g. `name` on a `unit`).
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    /// An element not recognized by a strict section builder.
    UnexpectedElement {
        section: &'static str,
        element: String,
    },

    /// A device referenced a protocol name that is not defined.
    UnknownProtocol { name: String },

    /// A command or the configuration referenced an undefined device id.
    UnknownDevice { id: String },

    /// A reload was requested while another is still in progress.
    ReloadInProgress,
}

impl From<quick_xml::Error> for XcfgError {
    fn from(e: quick_xml::Error) -> Self {
        XcfgError::XmlParsing(e)
    }
}

impl From<AttrError> for XcfgError {
    fn from(e: AttrError) -> Self {
        XcfgError::XmlAttr(e)
    }
}

impl fmt::Display for XcfgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XcfgError::XmlParsing(e) => write!(f, "XML parsing error: {}", e),
            XcfgError::XmlAttr(e) => write!(f, "XML attribute error: {}", e),
            XcfgError::WrongDocumentType { root } => {
                write!(f, "document of the wrong type, root node {} != V-Control", root)
            }
            XcfgError::MissingElement { element } => {
                write!(f, "missing required element: {}", element)
            }
            XcfgError::DuplicateSection { section } => {
                write!(f, "section {} defined more than once", section)
            }
            XcfgError::MissingAttribute { element, attribute } => {
                write!(f, "element {} is missing attribute {}", element, attribute)
            }
            XcfgError::UnexpectedElement { section, element } => {
                write!(f, "unexpected element {} in {} section", element, section)
            }
            XcfgError::UnknownProtocol { name } => {
                write!(f, "protocol {} is not defined", name)
            }
            XcfgError::UnknownDevice { id } => {
                write!(f, "device {} is not defined", id)
            }
            XcfgError::ReloadInProgress => {
                write!(f, "a configuration reload is already in progress")
            }
        }
    }
}

impl Error for XcfgError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            XcfgError::XmlParsing(e) => Some(e),
            XcfgError::XmlAttr(e) => Some(e),
            _ => None,
        }
    }
}
