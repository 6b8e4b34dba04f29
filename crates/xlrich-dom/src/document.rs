//! Arena-backed XML document
//!
//! Nodes live in a single `Vec` of slots owned by the [`XmlDocument`] and are
//! addressed by [`NodeId`]. Removing a node frees its slot and those of its
//! descendants for reuse; every slot carries a generation so an id of a
//! removed node never resolves to the node that later takes its place.

use crate::error::{XmlError, XmlResult};
use crate::namespace::Namespaces;
use crate::{reader, writer};

/// Handle to a node inside an [`XmlDocument`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

impl NodeId {
    /// Position of the node in its document's arena
    pub fn index(self) -> usize {
        self.index
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Element {
    /// Qualified name as written (`r`, `d:r`, ...)
    pub(crate) name: String,
    /// Resolved namespace URI
    pub(crate) namespace: Option<String>,
    /// Attributes in document order, keyed by qualified name
    pub(crate) attributes: Vec<(String, String)>,
}

impl Element {
    pub(crate) fn local_name(&self) -> &str {
        match self.name.split_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum NodeKind {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// A mutable XML tree with a single root element
#[derive(Debug, Clone)]
pub struct XmlDocument {
    slots: Vec<Slot>,
    /// Indices of empty slots
    free: Vec<usize>,
    root: NodeId,
}

impl XmlDocument {
    /// Create a document containing only a root element
    ///
    /// When `namespace` is given it is declared on the root as the default
    /// namespace so the serialized document stays self-describing.
    pub fn new(root_name: &str, namespace: Option<&str>) -> Self {
        let mut attributes = Vec::new();
        if let Some(uri) = namespace {
            attributes.push(("xmlns".to_string(), uri.to_string()));
        }
        let mut doc = Self::unrooted();
        doc.root = doc.push_node(NodeKind::Element(Element {
            name: root_name.to_string(),
            namespace: namespace.map(str::to_string),
            attributes,
        }));
        doc
    }

    /// Parse a complete document
    pub fn parse(xml: &str) -> XmlResult<Self> {
        reader::parse_document(xml)
    }

    /// Parse `markup` as the content of a new root element
    ///
    /// Used for inner markup such as the runs of a shared string, which is
    /// not a well-formed document on its own. Prefixes in `markup` are
    /// resolved against `namespaces`; the root element is placed in the
    /// default namespace of that context.
    pub fn parse_fragment(root_name: &str, markup: &str, namespaces: &Namespaces) -> XmlResult<Self> {
        let mut doc = Self::new(root_name, namespaces.default_uri());
        let root = doc.root;
        reader::parse_fragment(&mut doc, root, markup, namespaces)?;
        Ok(doc)
    }

    /// Arena without nodes; the reader sets the root once it sees one
    pub(crate) fn unrooted() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: NodeId {
                index: 0,
                generation: 0,
            },
        }
    }

    pub(crate) fn set_root(&mut self, root: NodeId) {
        self.root = root;
    }

    pub(crate) fn push_node(&mut self, kind: NodeKind) -> NodeId {
        let node = Node {
            kind,
            parent: None,
            children: Vec::new(),
        };
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.node = Some(node);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeId {
                    index: self.slots.len() - 1,
                    generation: 0,
                }
            }
        }
    }

    fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)?
            .node
            .as_ref()
    }

    pub(crate) fn node(&self, id: NodeId) -> XmlResult<&Node> {
        self.get(id).ok_or(XmlError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> XmlResult<&mut Node> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
            .ok_or(XmlError::UnknownNode(id))
    }

    /// Number of live nodes, attached or not
    pub fn node_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Free `node` and its descendants
    fn release(&mut self, node: NodeId) {
        let mut pending = vec![node];
        while let Some(id) = pending.pop() {
            let Some(slot) = self
                .slots
                .get_mut(id.index)
                .filter(|slot| slot.generation == id.generation)
            else {
                continue;
            };
            if let Some(released) = slot.node.take() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(id.index);
                pending.extend(released.children);
            }
        }
    }

    fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.get(id)?.kind {
            NodeKind::Element(el) => Some(el),
            NodeKind::Text(_) => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> XmlResult<&mut Element> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Element(el) => Ok(el),
            NodeKind::Text(_) => Err(XmlError::NotAnElement(id)),
        }
    }

    /// The root element
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Create a detached element
    ///
    /// No namespace declaration is added; the element inherits whatever is
    /// in scope where it gets attached.
    pub fn create_element(&mut self, name: &str, namespace: Option<&str>) -> NodeId {
        self.push_node(NodeKind::Element(Element {
            name: name.to_string(),
            namespace: namespace.map(str::to_string),
            attributes: Vec::new(),
        }))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push_node(NodeKind::Text(text.to_string()))
    }

    fn check_parent(&self, parent: NodeId, child: NodeId) -> XmlResult<()> {
        if self.element(parent).is_none() {
            self.node(parent)?;
            return Err(XmlError::NotAnElement(parent));
        }
        self.node(child)?;
        if child == parent || self.is_ancestor(child, parent) {
            return Err(XmlError::malformed(format!(
                "cannot attach {child:?} below itself"
            )));
        }
        Ok(())
    }

    fn is_ancestor(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        while let Some(parent) = self.parent(node) {
            if parent == ancestor {
                return true;
            }
            node = parent;
        }
        false
    }

    fn detach(&mut self, child: NodeId) -> XmlResult<()> {
        if let Some(old_parent) = self.node(child)?.parent {
            self.node_mut(old_parent)?.children.retain(|c| *c != child);
            self.node_mut(child)?.parent = None;
        }
        Ok(())
    }

    /// Append `child` as the last child of `parent`, moving it if attached elsewhere
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> XmlResult<()> {
        self.check_parent(parent, child)?;
        self.detach(child)?;
        self.node_mut(parent)?.children.push(child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Insert `child` into `parent` right before `reference`
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) -> XmlResult<()> {
        self.check_parent(parent, child)?;
        if self.parent(reference) != Some(parent) {
            return Err(XmlError::NotAChild {
                parent,
                child: reference,
            });
        }
        self.detach(child)?;
        let children = &mut self.node_mut(parent)?.children;
        let pos = children
            .iter()
            .position(|c| *c == reference)
            .unwrap_or(children.len());
        children.insert(pos, child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Remove `child` from `parent` and delete it with its subtree
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> XmlResult<()> {
        if self.node(child)?.parent != Some(parent) {
            return Err(XmlError::NotAChild { parent, child });
        }
        self.delete(child)
    }

    /// Delete a node and its subtree, detaching it first if attached
    ///
    /// The root cannot be deleted.
    pub fn delete(&mut self, node: NodeId) -> XmlResult<()> {
        if node == self.root {
            return Err(XmlError::malformed("cannot delete the root element"));
        }
        self.detach(node)?;
        self.release(node);
        Ok(())
    }

    /// Delete every child of `node`
    pub fn remove_all_children(&mut self, node: NodeId) -> XmlResult<()> {
        let children = std::mem::take(&mut self.node_mut(node)?.children);
        for child in children {
            self.release(child);
        }
        Ok(())
    }

    /// Parent of a node, `None` for the root and detached nodes
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.get(node)?.parent
    }

    /// Direct children in document order
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.get(node)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Direct child elements matching `local_name` in `namespace`
    ///
    /// A `namespace` of `None` matches only elements without a namespace.
    pub fn child_elements<'a>(
        &'a self,
        node: NodeId,
        local_name: &'a str,
        namespace: Option<&'a str>,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.children(node).iter().copied().filter(move |c| {
            self.element(*c).map_or(false, |el| {
                el.local_name() == local_name && el.namespace.as_deref() == namespace
            })
        })
    }

    /// First direct child element matching `local_name` in `namespace`
    pub fn first_child_element(
        &self,
        node: NodeId,
        local_name: &str,
        namespace: Option<&str>,
    ) -> Option<NodeId> {
        self.child_elements(node, local_name, namespace).next()
    }

    /// Whether the node is an element
    pub fn is_element(&self, node: NodeId) -> bool {
        self.element(node).is_some()
    }

    /// Qualified element name
    pub fn name(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|el| el.name.as_str())
    }

    /// Element name without its prefix
    pub fn local_name(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(Element::local_name)
    }

    /// Resolved namespace URI of an element
    pub fn namespace(&self, node: NodeId) -> Option<&str> {
        self.element(node)?.namespace.as_deref()
    }

    /// Attribute value by qualified name
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)?
            .attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// All attributes of an element in document order
    pub fn attributes(&self, node: NodeId) -> impl Iterator<Item = (&str, &str)> {
        self.element(node)
            .into_iter()
            .flat_map(|el| el.attributes.iter())
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Set or replace an attribute
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> XmlResult<()> {
        let el = self.element_mut(node)?;
        match el.attributes.iter_mut().find(|(k, _)| k == name) {
            Some(attr) => attr.1 = value.to_string(),
            None => el.attributes.push((name.to_string(), value.to_string())),
        }
        Ok(())
    }

    /// Remove an attribute, returning its previous value
    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> XmlResult<Option<String>> {
        let el = self.element_mut(node)?;
        let pos = el.attributes.iter().position(|(k, _)| k == name);
        Ok(pos.map(|p| el.attributes.remove(p).1))
    }

    /// Concatenated text of the node and all its descendants
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        let Some(n) = self.get(node) else {
            return;
        };
        match &n.kind {
            NodeKind::Text(t) => out.push_str(t),
            NodeKind::Element(_) => {
                for child in &n.children {
                    self.collect_text(*child, out);
                }
            }
        }
    }

    /// Replace the content of an element with a single text node
    ///
    /// A lone existing text child is updated in place.
    pub fn set_text_content(&mut self, node: NodeId, text: &str) -> XmlResult<()> {
        self.element_mut(node)?;
        if let &[only] = self.children(node) {
            if !text.is_empty() {
                if let NodeKind::Text(existing) = &mut self.node_mut(only)?.kind {
                    existing.clear();
                    existing.push_str(text);
                    return Ok(());
                }
            }
        }
        self.remove_all_children(node)?;
        if !text.is_empty() {
            let t = self.create_text(text);
            self.append_child(node, t)?;
        }
        Ok(())
    }

    /// Serialize the children of `node`
    pub fn inner_xml(&self, node: NodeId) -> XmlResult<String> {
        writer::write_children(self, node)
    }

    /// Serialize `node` itself including its children
    pub fn outer_xml(&self, node: NodeId) -> XmlResult<String> {
        writer::write_node(self, node)
    }

    /// Serialize the whole document from its root
    pub fn to_xml(&self) -> XmlResult<String> {
        self.outer_xml(self.root)
    }
}
