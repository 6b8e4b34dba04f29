//! Rich text options

/// Options for a [`RichTextCollection`](crate::RichTextCollection)
#[derive(Debug, Clone, PartialEq)]
pub struct RichTextOptions {
    /// Font name for the first run of an unbound collection (default: Calibri)
    pub default_font_name: String,
    /// Font size for the first run of an unbound collection (default: 11)
    pub default_font_size: f64,
}

impl Default for RichTextOptions {
    fn default() -> Self {
        Self {
            default_font_name: "Calibri".to_string(),
            default_font_size: 11.0,
        }
    }
}

impl RichTextOptions {
    /// Create the default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default font used by unbound collections
    pub fn with_default_font<S: Into<String>>(mut self, name: S, size: f64) -> Self {
        self.default_font_name = name.into();
        self.default_font_size = size;
        self
    }
}
