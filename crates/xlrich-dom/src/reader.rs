//! Building an [`XmlDocument`] from markup with `quick-xml`

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::document::{Element, NodeKind, NodeId, XmlDocument};
use crate::error::{XmlError, XmlResult};
use crate::namespace::Namespaces;

pub(crate) fn parse_document(xml: &str) -> XmlResult<XmlDocument> {
    let mut doc = XmlDocument::unrooted();
    let mut builder = TreeBuilder::new(Namespaces::new(), None);
    builder.run(&mut doc, xml)?;
    match builder.root {
        Some(root) => {
            doc.set_root(root);
            Ok(doc)
        }
        None => Err(XmlError::malformed("document has no root element")),
    }
}

pub(crate) fn parse_fragment(
    doc: &mut XmlDocument,
    parent: NodeId,
    markup: &str,
    namespaces: &Namespaces,
) -> XmlResult<()> {
    let mut builder = TreeBuilder::new(namespaces.clone(), Some(parent));
    builder.run(doc, markup)
}

/// Open-element stack plus the namespace declarations in scope for each level
struct TreeBuilder {
    /// Bindings in effect before the first element
    base: Namespaces,
    scopes: Vec<Vec<(String, String)>>,
    stack: Vec<NodeId>,
    /// Number of stack entries owned by the caller (fragment parent)
    floor: usize,
    root: Option<NodeId>,
}

impl TreeBuilder {
    fn new(base: Namespaces, parent: Option<NodeId>) -> Self {
        let stack: Vec<NodeId> = parent.into_iter().collect();
        Self {
            base,
            scopes: Vec::new(),
            floor: stack.len(),
            stack,
            root: None,
        }
    }

    fn run(&mut self, doc: &mut XmlDocument, xml: &str) -> XmlResult<()> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(false);

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let id = self.open(doc, &e)?;
                    self.stack.push(id);
                }
                Event::Empty(e) => {
                    self.open(doc, &e)?;
                    self.scopes.pop();
                }
                Event::End(_) => {
                    if self.stack.len() <= self.floor {
                        return Err(XmlError::malformed("unexpected closing tag"));
                    }
                    self.stack.pop();
                    self.scopes.pop();
                }
                Event::Text(e) => {
                    let text = e.unescape()?;
                    self.text(doc, &text)?;
                }
                Event::CData(e) => {
                    let bytes = e.into_inner();
                    let text = std::str::from_utf8(&bytes)?;
                    self.text(doc, text)?;
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if self.stack.len() > self.floor {
            return Err(XmlError::malformed("unclosed element at end of input"));
        }
        Ok(())
    }

    fn resolve(&self, prefix: &str) -> Option<String> {
        for scope in self.scopes.iter().rev() {
            if let Some((_, uri)) = scope.iter().find(|(p, _)| p == prefix) {
                return Some(uri.clone());
            }
        }
        self.base.uri(prefix).map(str::to_string)
    }

    fn open(&mut self, doc: &mut XmlDocument, e: &BytesStart<'_>) -> XmlResult<NodeId> {
        let name = std::str::from_utf8(e.name().as_ref())?.to_string();

        let mut attributes = Vec::new();
        let mut scope = Vec::new();
        for attr in e.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
            let value = attr.unescape_value()?.into_owned();
            if key == "xmlns" {
                scope.push((String::new(), value.clone()));
            } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                scope.push((prefix.to_string(), value.clone()));
            }
            attributes.push((key, value));
        }
        self.scopes.push(scope);

        let prefix = name.split_once(':').map_or("", |(p, _)| p);
        let namespace = self.resolve(prefix);
        if namespace.is_none() && !prefix.is_empty() {
            log::debug!("unbound prefix '{prefix}' on <{name}>");
        }

        let id = doc.push_node(NodeKind::Element(Element {
            name,
            namespace,
            attributes,
        }));

        match self.stack.last() {
            Some(parent) => doc.append_child(*parent, id)?,
            None if self.root.is_none() => self.root = Some(id),
            None => return Err(XmlError::malformed("more than one root element")),
        }
        Ok(id)
    }

    fn text(&mut self, doc: &mut XmlDocument, text: &str) -> XmlResult<()> {
        match self.stack.last() {
            Some(parent) => {
                let id = doc.create_text(text);
                doc.append_child(*parent, id)
            }
            // Whitespace around the root element
            None if text.trim().is_empty() => Ok(()),
            None => Err(XmlError::malformed("text outside the root element")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::SPREADSHEETML_MAIN;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_document_resolves_default_namespace() {
        let doc = XmlDocument::parse(&format!(
            r#"<?xml version="1.0"?><si xmlns="{SPREADSHEETML_MAIN}"><r><t>Hi</t></r></si>"#
        ))
        .unwrap();
        let root = doc.root();
        assert_eq!(doc.name(root), Some("si"));
        let runs: Vec<_> = doc
            .child_elements(root, "r", Some(SPREADSHEETML_MAIN))
            .collect();
        assert_eq!(runs.len(), 1);
        assert_eq!(doc.text_content(runs[0]), "Hi");
    }

    #[test]
    fn test_parse_prefixed_elements() {
        let doc = XmlDocument::parse(&format!(
            r#"<d:is xmlns:d="{SPREADSHEETML_MAIN}"><d:r><d:t>a</d:t></d:r><r/></d:is>"#
        ))
        .unwrap();
        let root = doc.root();
        assert_eq!(doc.local_name(root), Some("is"));
        assert_eq!(
            doc.child_elements(root, "r", Some(SPREADSHEETML_MAIN)).count(),
            1
        );
        assert_eq!(doc.child_elements(root, "r", None).count(), 1);
    }

    #[test]
    fn test_parse_keeps_whitespace_and_entities() {
        let doc = XmlDocument::parse(r#"<t xml:space="preserve">  a &amp; b  </t>"#).unwrap();
        let root = doc.root();
        assert_eq!(doc.text_content(root), "  a & b  ");
        assert_eq!(doc.attribute(root, "xml:space"), Some("preserve"));
    }

    #[test]
    fn test_parse_cdata() {
        let doc = XmlDocument::parse("<t><![CDATA[<b>]]></t>").unwrap();
        assert_eq!(doc.text_content(doc.root()), "<b>");
    }

    #[test]
    fn test_parse_fragment() {
        let ns = Namespaces::spreadsheet();
        let doc = XmlDocument::parse_fragment(
            "is",
            "<r><t>Hel</t></r><d:r><t>lo</t></d:r>",
            &ns,
        )
        .unwrap();
        let root = doc.root();
        let runs: Vec<_> = doc
            .child_elements(root, "r", Some(SPREADSHEETML_MAIN))
            .collect();
        assert_eq!(runs.len(), 2);
        assert_eq!(doc.text_content(root), "Hello");
    }

    #[test]
    fn test_parse_fragment_rejects_stray_end() {
        let ns = Namespaces::spreadsheet();
        assert!(XmlDocument::parse_fragment("is", "<r></r></is>", &ns).is_err());
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(matches!(
            XmlDocument::parse("   "),
            Err(XmlError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_two_roots() {
        assert!(XmlDocument::parse("<a/><b/>").is_err());
    }
}
