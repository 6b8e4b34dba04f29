//! Prelude module - common imports for xlrich users
//!
//! ```rust
//! use xlrich::prelude::*;
//! ```

pub use crate::{
    // Cell types
    Cell,
    CellRichTextExt,
    CellValue,
    Color,
    Error,
    FontStyle,
    FontVerticalAlign,
    Result,
    // Rich text
    RichTextCollection,
    RichTextHost,
    RichTextOptions,
    RunId,
    RunProperties,
    RunView,
    RunViewMut,
    Underline,
};
