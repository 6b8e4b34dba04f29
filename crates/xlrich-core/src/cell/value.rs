//! Cell value types

use std::fmt;

/// Represents the value stored in a cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Empty cell (no value)
    #[default]
    Empty,

    /// Boolean value (TRUE/FALSE)
    Boolean(bool),

    /// Numeric value
    Number(f64),

    /// Plain string value
    String(String),

    /// Value composed of styled runs
    RichText(RichTextValue),
}

/// Cached rich text value: the serialized runs and their concatenated text
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RichTextValue {
    /// Inner markup of the `<is>`/`<si>` element (`<r>...</r><r>...</r>`)
    pub markup: String,
    /// Text of all runs without formatting
    pub text: String,
}

impl CellValue {
    /// Create a new string value
    pub fn string<S: Into<String>>(s: S) -> Self {
        CellValue::String(s.into())
    }

    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Check if the cell holds styled runs
    pub fn is_rich_text(&self) -> bool {
        matches!(self, CellValue::RichText(_))
    }

    /// Try to get the value as a string; rich text yields its plain text
    pub fn as_string(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            CellValue::RichText(rt) => Some(&rt.text),
            _ => None,
        }
    }

    /// Serialized runs, if this is a rich text value
    pub fn rich_markup(&self) -> Option<&str> {
        match self {
            CellValue::RichText(rt) => Some(&rt.markup),
            _ => None,
        }
    }

    /// Get the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Empty => "empty",
            CellValue::Boolean(_) => "boolean",
            CellValue::Number(_) => "number",
            CellValue::String(_) => "string",
            CellValue::RichText(_) => "rich_text",
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => write!(f, ""),
            CellValue::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::String(s) => write!(f, "{}", s),
            CellValue::RichText(rt) => write!(f, "{}", rt.text),
        }
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::string(s)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::string(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(CellValue::Empty.to_string(), "");
        assert_eq!(CellValue::Boolean(true).to_string(), "TRUE");
        assert_eq!(CellValue::from(42).to_string(), "42");
        assert_eq!(CellValue::from("x").to_string(), "x");
        let rich = CellValue::RichText(RichTextValue {
            markup: "<r><t>Hi</t></r>".into(),
            text: "Hi".into(),
        });
        assert_eq!(rich.to_string(), "Hi");
    }

    #[test]
    fn test_as_string() {
        assert_eq!(CellValue::from("abc").as_string(), Some("abc"));
        assert_eq!(CellValue::Number(1.0).as_string(), None);
        let rich = CellValue::RichText(RichTextValue {
            markup: String::new(),
            text: "t".into(),
        });
        assert_eq!(rich.as_string(), Some("t"));
        assert!(rich.is_rich_text());
        assert_eq!(rich.rich_markup(), Some(""));
    }

    #[test]
    fn test_type_name() {
        assert_eq!(CellValue::default().type_name(), "empty");
        assert_eq!(CellValue::from(true).type_name(), "boolean");
    }
}
