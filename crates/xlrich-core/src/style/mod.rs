//! Font styling types
//!
//! - [`FontStyle`] - Font settings shared by cells and rich text runs
//! - [`Color`] - Color representation

mod color;
mod font;

pub use color::Color;
pub use font::{FontStyle, FontVerticalAlign, Underline};
