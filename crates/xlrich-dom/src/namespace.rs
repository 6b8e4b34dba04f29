//! Namespace context used to resolve prefixes when selecting and parsing nodes

/// SpreadsheetML main namespace (`<worksheet>`, `<si>`, `<is>`, `<r>`, ...)
pub const SPREADSHEETML_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";

/// Namespace bound to the reserved `xml` prefix
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Prefix to namespace URI mapping
///
/// The empty prefix is the default namespace. Later bindings for the same
/// prefix replace earlier ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespaces {
    bindings: Vec<(String, String)>,
}

impl Namespaces {
    /// Create a context with no bindings besides the reserved `xml` prefix
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Context used by spreadsheet parts: the default namespace and the `d`
    /// prefix both map to [`SPREADSHEETML_MAIN`]
    pub fn spreadsheet() -> Self {
        Self::new()
            .with_binding("", SPREADSHEETML_MAIN)
            .with_binding("d", SPREADSHEETML_MAIN)
    }

    /// Bind `prefix` to `uri`
    pub fn with_binding(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.bind(prefix, uri);
        self
    }

    /// Bind `prefix` to `uri` in place
    pub fn bind(&mut self, prefix: impl Into<String>, uri: impl Into<String>) {
        let prefix = prefix.into();
        let uri = uri.into();
        match self.bindings.iter_mut().find(|(p, _)| *p == prefix) {
            Some(binding) => binding.1 = uri,
            None => self.bindings.push((prefix, uri)),
        }
    }

    /// Resolve a prefix (`""` for the default namespace)
    pub fn uri(&self, prefix: &str) -> Option<&str> {
        if prefix == "xml" {
            return Some(XML_NAMESPACE);
        }
        self.bindings
            .iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, uri)| uri.as_str())
    }

    /// The default namespace, if bound
    pub fn default_uri(&self) -> Option<&str> {
        self.uri("")
    }

    /// Iterate over `(prefix, uri)` bindings
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().map(|(p, u)| (p.as_str(), u.as_str()))
    }
}

impl Default for Namespaces {
    fn default() -> Self {
        Self::spreadsheet()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spreadsheet_bindings() {
        let ns = Namespaces::spreadsheet();
        assert_eq!(ns.default_uri(), Some(SPREADSHEETML_MAIN));
        assert_eq!(ns.uri("d"), Some(SPREADSHEETML_MAIN));
        assert_eq!(ns.uri("x"), None);
    }

    #[test]
    fn test_rebind_replaces() {
        let ns = Namespaces::new()
            .with_binding("a", "urn:one")
            .with_binding("a", "urn:two");
        assert_eq!(ns.uri("a"), Some("urn:two"));
        assert_eq!(ns.iter().count(), 1);
    }

    #[test]
    fn test_xml_prefix_is_reserved() {
        assert_eq!(Namespaces::new().uri("xml"), Some(XML_NAMESPACE));
    }
}
