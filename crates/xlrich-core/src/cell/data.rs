//! A single cell acting as the owner of rich text

use xlrich_dom::{Namespaces, XmlDocument};

use super::{CellValue, RichTextHost, RichTextValue};
use crate::error::Result;
use crate::style::FontStyle;

/// A cell with its value, resolved font and rich text flag
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    value: CellValue,
    font: FontStyle,
    rich_text: bool,
}

impl Cell {
    /// Create an empty cell with the default font
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cell holding `value`
    pub fn with_value<V: Into<CellValue>>(value: V) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    /// Set the font (builder style)
    pub fn with_font(mut self, font: FontStyle) -> Self {
        self.font = font;
        self
    }

    /// The cell value
    pub fn value(&self) -> &CellValue {
        &self.value
    }

    /// Replace the value with a plain one, dropping any rich text
    pub fn set_value<V: Into<CellValue>>(&mut self, value: V) {
        self.value = value.into();
        self.rich_text = self.value.is_rich_text();
    }

    /// The cell font
    pub fn font(&self) -> &FontStyle {
        &self.font
    }

    /// Mutable access to the cell font
    pub fn font_mut(&mut self) -> &mut FontStyle {
        &mut self.font
    }

    /// Text shown for the cell
    pub fn display_text(&self) -> String {
        self.value.to_string()
    }
}

impl RichTextHost for Cell {
    fn base_font(&self) -> FontStyle {
        self.font.clone()
    }

    fn is_rich_text(&self) -> bool {
        self.rich_text
    }

    fn set_rich_text(&mut self, rich: bool) {
        self.rich_text = rich;
        if !rich {
            // Keep the text, lose the formatting
            if let CellValue::RichText(rt) = &self.value {
                self.value = CellValue::String(rt.text.clone());
            }
        }
    }

    fn set_value_rich_text(&mut self, markup: &str) -> Result<()> {
        if markup.is_empty() {
            self.value = CellValue::Empty;
            return Ok(());
        }
        let text = rich_markup_text(markup)?;
        log::trace!("cell rich text value refreshed ({} bytes)", markup.len());
        self.value = CellValue::RichText(RichTextValue {
            markup: markup.to_string(),
            text,
        });
        Ok(())
    }
}

/// Plain text of serialized runs
///
/// Accepts the inner markup of an `<is>` or `<si>` element: a sequence of
/// `<r>` runs and/or a bare `<t>`. Phonetic runs (`<rPh>`) are skipped.
pub fn rich_markup_text(markup: &str) -> Result<String> {
    let namespaces = Namespaces::spreadsheet();
    let doc = XmlDocument::parse_fragment("is", markup, &namespaces)?;
    let root = doc.root();

    let mut text = String::new();
    for &child in doc.children(root) {
        match doc.local_name(child) {
            Some("t") => text.push_str(&doc.text_content(child)),
            Some("r") => {
                for t in doc.children(child) {
                    if doc.local_name(*t) == Some("t") {
                        text.push_str(&doc.text_content(*t));
                    }
                }
            }
            _ => {}
        }
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_markup_text() {
        assert_eq!(
            rich_markup_text("<r><rPr><b/></rPr><t>Hel</t></r><r><t>lo</t></r>").unwrap(),
            "Hello"
        );
        assert_eq!(rich_markup_text("<t>plain</t>").unwrap(), "plain");
        assert_eq!(
            rich_markup_text("<r><t>a</t></r><rPh sb=\"0\" eb=\"1\"><t>x</t></rPh>").unwrap(),
            "a"
        );
        assert_eq!(rich_markup_text("").unwrap(), "");
    }

    #[test]
    fn test_markup_text_rejects_broken_markup() {
        assert!(rich_markup_text("<r><t>oops</r>").is_err());
    }

    #[test]
    fn test_set_value_rich_text() {
        let mut cell = Cell::new();
        cell.set_value_rich_text("<r><t>Hi</t></r>").unwrap();
        assert_eq!(cell.display_text(), "Hi");
        assert_eq!(cell.value().rich_markup(), Some("<r><t>Hi</t></r>"));
    }

    #[test]
    fn test_clearing_flag_demotes_value() {
        let mut cell = Cell::new();
        cell.set_rich_text(true);
        cell.set_value_rich_text("<r><t>Hi</t></r>").unwrap();
        cell.set_rich_text(false);
        assert!(!cell.is_rich_text());
        assert_eq!(cell.value(), &CellValue::String("Hi".into()));
    }

    #[test]
    fn test_empty_markup_empties_value() {
        let mut cell = Cell::new();
        cell.set_rich_text(true);
        cell.set_value_rich_text("<r><t>Hi</t></r>").unwrap();
        cell.set_value_rich_text("").unwrap();
        cell.set_rich_text(false);
        assert!(cell.value().is_empty());
        assert_eq!(cell.display_text(), "");
    }

    #[test]
    fn test_plain_value_clears_flag() {
        let mut cell = Cell::new();
        cell.set_rich_text(true);
        cell.set_value(5.0);
        assert!(!cell.is_rich_text());
    }

    #[test]
    fn test_base_font() {
        let cell = Cell::new().with_font(FontStyle::new().with_name("Arial").with_size(12.0));
        assert_eq!(cell.base_font().name, "Arial");
        assert_eq!(cell.base_font().size, 12.0);
    }
}
