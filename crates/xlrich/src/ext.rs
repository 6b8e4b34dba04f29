//! Rich text access for shared cells

use std::cell::RefCell;
use std::rc::Rc;

use xlrich_core::{Cell, CellValue, Error, Result};
use xlrich_dom::{Namespaces, XmlDocument};

use crate::collection::{RichTextCollection, INLINE_STRING_ELEMENT};

/// Extension trait giving a shared [`Cell`] a bound rich text collection
///
/// ```rust
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use xlrich::prelude::*;
///
/// let cell = Rc::new(RefCell::new(Cell::with_value("Hello")));
/// let mut runs = cell.rich_text().unwrap();
/// runs.add(" world").unwrap().set_bold(true).unwrap();
///
/// assert!(cell.borrow().is_rich_text());
/// assert_eq!(cell.borrow().display_text(), "Hello world");
/// ```
pub trait CellRichTextExt {
    /// Build a collection bound to this cell
    ///
    /// A rich text value is parsed into its runs. Any other non-empty value
    /// becomes a single run styled from the cell font, which turns the cell
    /// into a rich text cell. An empty cell yields an empty collection.
    fn rich_text(&self) -> Result<RichTextCollection>;
}

impl CellRichTextExt for Rc<RefCell<Cell>> {
    fn rich_text(&self) -> Result<RichTextCollection> {
        let (markup, plain) = {
            let cell = self
                .try_borrow()
                .map_err(|_| Error::other("cell is mutably borrowed"))?;
            match cell.value() {
                CellValue::RichText(rt) => (Some(rt.markup.clone()), None),
                CellValue::Empty => (None, None),
                other => (None, Some(other.to_string())),
            }
        };

        let namespaces = Namespaces::spreadsheet();
        let doc = match markup {
            Some(markup) => XmlDocument::parse_fragment(INLINE_STRING_ELEMENT, &markup, &namespaces)?,
            None => XmlDocument::new(INLINE_STRING_ELEMENT, namespaces.default_uri()),
        };
        let top = doc.root();
        let mut collection = RichTextCollection::with_owner(doc, top, namespaces, self);

        if let Some(text) = plain.filter(|t| !t.is_empty()) {
            log::debug!("promoting plain cell value to rich text");
            collection.add(&text)?;
        }
        Ok(collection)
    }
}
