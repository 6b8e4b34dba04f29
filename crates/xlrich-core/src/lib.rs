//! # xlrich-core
//!
//! Core data structures shared by the xlrich crates:
//! - [`FontStyle`] and [`Color`] - Font formatting of cells and runs
//! - [`CellValue`] and [`Cell`] - Cell values, including cached rich text
//! - [`RichTextHost`] - The contract between a rich text collection and its owning cell
//! - [`Error`] - Error type for rich text editing
//!
//! ## Example
//!
//! ```rust
//! use xlrich_core::{Cell, FontStyle, RichTextHost};
//!
//! let mut cell = Cell::new().with_font(FontStyle::new().with_name("Arial"));
//! cell.set_value_rich_text("<r><t>Hello</t></r>").unwrap();
//!
//! assert_eq!(cell.display_text(), "Hello");
//! assert_eq!(cell.base_font().name, "Arial");
//! ```

pub mod cell;
pub mod error;
pub mod style;

pub use cell::{rich_markup_text, Cell, CellValue, RichTextHost, RichTextValue};
pub use error::{Error, Result};
pub use style::{Color, FontStyle, FontVerticalAlign, Underline};
