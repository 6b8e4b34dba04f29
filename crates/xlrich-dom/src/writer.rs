//! Serializing nodes back to markup with `quick-xml`

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::document::{NodeKind, NodeId, XmlDocument};
use crate::error::XmlResult;

pub(crate) fn write_node(doc: &XmlDocument, node: NodeId) -> XmlResult<String> {
    let mut writer = Writer::new(Vec::new());
    emit(doc, node, &mut writer)?;
    finish(writer)
}

pub(crate) fn write_children(doc: &XmlDocument, node: NodeId) -> XmlResult<String> {
    // Validate the id even when it has no children to write
    doc.node(node)?;
    let mut writer = Writer::new(Vec::new());
    for child in doc.children(node) {
        emit(doc, *child, &mut writer)?;
    }
    finish(writer)
}

fn finish(writer: Writer<Vec<u8>>) -> XmlResult<String> {
    let bytes = writer.into_inner();
    String::from_utf8(bytes).map_err(|e| e.utf8_error().into())
}

fn emit(doc: &XmlDocument, node: NodeId, writer: &mut Writer<Vec<u8>>) -> XmlResult<()> {
    let data = doc.node(node)?;
    match &data.kind {
        NodeKind::Text(text) => {
            writer.write_event(Event::Text(BytesText::new(text)))?;
        }
        NodeKind::Element(el) => {
            let mut start = BytesStart::new(el.name.as_str());
            for (key, value) in &el.attributes {
                start.push_attribute((key.as_str(), value.as_str()));
            }
            if data.children.is_empty() {
                writer.write_event(Event::Empty(start))?;
            } else {
                writer.write_event(Event::Start(start))?;
                for child in &data.children {
                    emit(doc, *child, writer)?;
                }
                writer.write_event(Event::End(BytesEnd::new(el.name.as_str())))?;
            }
        }
    }
    Ok(())
}
