//! Owner contract for rich text collections

use crate::error::Result;
use crate::style::FontStyle;

/// The cell (or first cell of a range) that owns a rich text collection
///
/// A collection only holds a weak reference to its host, so the host may be
/// dropped while the collection is still alive.
pub trait RichTextHost {
    /// Resolved font of the first cell in the owning range
    fn base_font(&self) -> FontStyle;

    /// Whether the cell value is made of styled runs
    fn is_rich_text(&self) -> bool;

    /// Set or clear the rich text flag
    fn set_rich_text(&mut self, rich: bool);

    /// Refresh the cached value from the serialized runs (inner markup of the
    /// backing `<is>`/`<si>` element)
    ///
    /// Empty markup means the collection no longer has any runs.
    fn set_value_rich_text(&mut self, markup: &str) -> Result<()>;
}
