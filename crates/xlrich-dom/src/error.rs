//! XML tree error types

use thiserror::Error;

use crate::NodeId;

/// Result type for XML tree operations
pub type XmlResult<T> = std::result::Result<T, XmlError>;

/// Errors that can occur while parsing, mutating or serializing an [`XmlDocument`](crate::XmlDocument)
#[derive(Debug, Error)]
pub enum XmlError {
    /// Error reported by the XML reader or writer
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Names, attributes or text that are not valid UTF-8
    #[error("Invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Markup that parses but does not form a usable tree
    #[error("Malformed XML: {0}")]
    Malformed(String),

    /// The node id does not belong to this document
    #[error("Unknown node: {0:?}")]
    UnknownNode(NodeId),

    /// The operation needs an element but was given a text node
    #[error("Node {0:?} is not an element")]
    NotAnElement(NodeId),

    /// `child` is not a direct child of `parent`
    #[error("Node {child:?} is not a child of {parent:?}")]
    NotAChild { parent: NodeId, child: NodeId },
}

impl XmlError {
    /// Create a new "malformed" error with a message
    pub fn malformed<S: Into<String>>(msg: S) -> Self {
        XmlError::Malformed(msg.into())
    }
}
