//! # xlrich-dom
//!
//! A small mutable XML tree for the parts of a spreadsheet that are edited in
//! place, such as the `<r>` runs inside an inline or shared string.
//!
//! Parsing and serialization go through `quick-xml`; the tree itself is an
//! arena of nodes addressed by [`NodeId`].
//!
//! ## Example
//!
//! ```rust
//! use xlrich_dom::{Namespaces, XmlDocument, SPREADSHEETML_MAIN};
//!
//! let mut doc = XmlDocument::parse_fragment(
//!     "is",
//!     "<r><t>Hello</t></r>",
//!     &Namespaces::spreadsheet(),
//! )
//! .unwrap();
//!
//! let root = doc.root();
//! let run = doc.create_element("r", Some(SPREADSHEETML_MAIN));
//! doc.append_child(root, run).unwrap();
//!
//! assert_eq!(doc.child_elements(root, "r", Some(SPREADSHEETML_MAIN)).count(), 2);
//! assert_eq!(doc.inner_xml(root).unwrap(), "<r><t>Hello</t></r><r/>");
//! ```

mod document;
pub mod error;
pub mod namespace;
mod reader;
mod writer;

pub use document::{NodeId, XmlDocument};
pub use error::{XmlError, XmlResult};
pub use namespace::{Namespaces, SPREADSHEETML_MAIN, XML_NAMESPACE};
