//! # xlrich
//!
//! Rich text runs for spreadsheet cells.
//!
//! A [`RichTextCollection`] keeps an ordered list of styled runs in step with
//! the `<r>` children of an XML element (as found in `<is>` inline strings and
//! `<si>` shared strings). When bound to a [`Cell`] it keeps the cell's rich
//! text flag and cached value current.
//!
//! ## Features
//!
//! - Load runs from existing markup, in document order
//! - New runs inherit the formatting of the previous run, or the cell font
//! - Per-run font name, size, color, bold, italic, strike, underline and
//!   vertical alignment
//! - Any change to a bound run re-serializes the runs into the owning cell
//!
//! ## Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use xlrich::prelude::*;
//!
//! let font = FontStyle::new().with_name("Arial").with_size(12.0);
//! let cell = Rc::new(RefCell::new(Cell::new().with_font(font)));
//!
//! let mut runs = cell.rich_text().unwrap();
//! runs.add("Total: ").unwrap().set_bold(true).unwrap();
//! runs.add("42").unwrap().set_color(Color::RED).unwrap();
//!
//! assert!(cell.borrow().is_rich_text());
//! assert_eq!(cell.borrow().display_text(), "Total: 42");
//!
//! runs.clear().unwrap();
//! assert!(!cell.borrow().is_rich_text());
//! ```

pub mod collection;
pub mod ext;
pub mod options;
pub mod prelude;
pub mod run;

pub use collection::{Iter, RichTextCollection};
pub use ext::CellRichTextExt;
pub use options::RichTextOptions;
pub use run::{RichTextRun, RunId, RunProperties, RunView, RunViewMut};

// Re-export core types
pub use xlrich_core::{
    rich_markup_text, Cell, CellValue, Color, Error, FontStyle, FontVerticalAlign, Result,
    RichTextHost, RichTextValue, Underline,
};
pub use xlrich_dom::{Namespaces, NodeId, XmlDocument};
