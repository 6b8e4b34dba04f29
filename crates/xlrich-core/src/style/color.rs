//! Color representation

use std::fmt;

/// Color representation
///
/// Supports RGB, ARGB, theme colors, and indexed colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// Automatic/default color
    #[default]
    Auto,

    /// RGB color (no alpha)
    Rgb { r: u8, g: u8, b: u8 },

    /// ARGB color with alpha channel
    Argb { a: u8, r: u8, g: u8, b: u8 },

    /// Theme color with optional tint
    Theme {
        /// Theme color index (0 = Background 1, 1 = Text 1, 4-9 = Accent 1-6)
        index: u8,
        /// Tint value (-1.0 to 1.0, stored as i8 percentage)
        tint: i8,
    },

    /// Indexed color (legacy Excel palette)
    Indexed(u8),
}

impl Color {
    /// Create an RGB color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb { r, g, b }
    }

    /// Create an ARGB color
    pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Color::Argb { a, r, g, b }
    }

    /// Create a theme color
    pub const fn theme(index: u8, tint: i8) -> Self {
        Color::Theme { index, tint }
    }

    /// Create from a hex string (e.g., "#FF0000", "FF0000" or "FFFF0000")
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();

        match hex.len() {
            6 => Some(Color::Rgb {
                r: byte(0)?,
                g: byte(2)?,
                b: byte(4)?,
            }),
            8 => Some(Color::Argb {
                a: byte(0)?,
                r: byte(2)?,
                g: byte(4)?,
                b: byte(6)?,
            }),
            _ => None,
        }
    }

    /// Read a color from the attributes of an OOXML color element
    /// (`<color rgb=".."/>`, `<color theme=".." tint=".."/>`, `<color indexed=".."/>`)
    ///
    /// Priority is rgb > theme > indexed; anything else is [`Color::Auto`].
    pub fn from_ooxml_attributes<'a>(attr: impl Fn(&str) -> Option<&'a str>) -> Self {
        if let Some(color) = attr("rgb").and_then(Color::from_hex) {
            return color;
        }

        if let Some(index) = attr("theme").and_then(|s| s.parse::<u8>().ok()) {
            let tint = attr("tint")
                .and_then(|s| s.parse::<f64>().ok())
                .map(|t| (t * 100.0).round() as i8)
                .unwrap_or(0);
            return Color::Theme { index, tint };
        }

        if let Some(i) = attr("indexed").and_then(|s| s.parse::<u8>().ok()) {
            return Color::Indexed(i);
        }

        Color::Auto
    }

    /// Attributes describing this color on an OOXML color element
    ///
    /// Empty for [`Color::Auto`], which is expressed by omitting the element.
    pub fn to_ooxml_attributes(&self) -> Vec<(&'static str, String)> {
        match self {
            Color::Auto => Vec::new(),
            Color::Rgb { .. } | Color::Argb { .. } => vec![("rgb", self.to_argb_hex())],
            Color::Theme { index, tint } => {
                let mut attrs = vec![("theme", index.to_string())];
                if *tint != 0 {
                    attrs.push(("tint", ((*tint as f64) / 100.0).to_string()));
                }
                attrs
            }
            Color::Indexed(i) => vec![("indexed", i.to_string())],
        }
    }

    /// Convert to ARGB hex string (8 characters, used by XLSX)
    ///
    /// Always returns an 8-character string with alpha, e.g., "FFFF0000" for opaque red.
    /// Theme and indexed colors have no fixed RGB value and map to opaque black.
    pub fn to_argb_hex(&self) -> String {
        match self {
            Color::Rgb { r, g, b } => format!("FF{:02X}{:02X}{:02X}", r, g, b),
            Color::Argb { a, r, g, b } => format!("{:02X}{:02X}{:02X}{:02X}", a, r, g, b),
            Color::Auto | Color::Theme { .. } | Color::Indexed(_) => "FF000000".to_string(),
        }
    }

    /// Check if color is automatic/default
    pub fn is_auto(&self) -> bool {
        matches!(self, Color::Auto)
    }

    // Common colors
    pub const BLACK: Color = Color::Rgb { r: 0, g: 0, b: 0 };
    pub const WHITE: Color = Color::Rgb {
        r: 255,
        g: 255,
        b: 255,
    };
    pub const RED: Color = Color::Rgb { r: 255, g: 0, b: 0 };
    pub const GREEN: Color = Color::Rgb { r: 0, g: 255, b: 0 };
    pub const BLUE: Color = Color::Rgb { r: 0, g: 0, b: 255 };
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Auto => write!(f, "auto"),
            Color::Rgb { r, g, b } => write!(f, "#{:02X}{:02X}{:02X}", r, g, b),
            Color::Argb { a, r, g, b } => write!(f, "#{:02X}{:02X}{:02X}{:02X}", a, r, g, b),
            Color::Theme { index, tint } => write!(f, "theme({}, {}%)", index, tint),
            Color::Indexed(i) => write!(f, "indexed({})", i),
        }
    }
}
