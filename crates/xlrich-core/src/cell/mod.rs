//! Cell-related types
//!
//! This module contains:
//! - [`CellValue`] - The value stored in a cell
//! - [`Cell`] - A cell with value, font and rich text flag
//! - [`RichTextHost`] - What a rich text collection needs from its owning cell

mod data;
mod host;
mod value;

pub use data::{rich_markup_text, Cell};
pub use host::RichTextHost;
pub use value::{CellValue, RichTextValue};
