//! A single rich text run (`<r>`) and views over its properties
//!
//! A run stores nothing but the id of its `<r>` element; every property lives
//! in the XML:
//!
//! ```xml
//! <r>
//!   <rPr><rFont val="Calibri"/><b/><i/><color rgb="FFFF0000"/><sz val="11"/><u/></rPr>
//!   <t xml:space="preserve"> text </t>
//! </r>
//! ```

use std::fmt;

use xlrich_core::{Color, Error, FontStyle, FontVerticalAlign, Result, Underline};
use xlrich_dom::{NodeId, XmlDocument};

/// Schema order of the children of `<rPr>` (CT_RPrElt)
const RPR_ORDER: &[&str] = &[
    "rFont",
    "charset",
    "family",
    "b",
    "i",
    "strike",
    "outline",
    "shadow",
    "condense",
    "extend",
    "color",
    "sz",
    "u",
    "vertAlign",
    "scheme",
];

const COLOR_ATTRIBUTES: &[&str] = &["rgb", "theme", "tint", "indexed", "auto"];

/// Invoked with the inner markup of the backing node after a run changes
pub(crate) type ChangeCallback = Box<dyn Fn(&str) -> Result<()>>;

/// Identity of a run, stable for the lifetime of its collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunId {
    pub(crate) collection: u64,
    pub(crate) node: NodeId,
}

/// One run of a rich text collection
pub struct RichTextRun {
    id: RunId,
    callback: Option<ChangeCallback>,
}

impl RichTextRun {
    pub(crate) fn new(collection: u64, node: NodeId) -> Self {
        Self {
            id: RunId { collection, node },
            callback: None,
        }
    }

    /// Identity of this run
    pub fn id(&self) -> RunId {
        self.id
    }

    pub(crate) fn node(&self) -> NodeId {
        self.id.node
    }

    /// Register the change callback, replacing any previous one
    pub(crate) fn set_callback(&mut self, callback: ChangeCallback) {
        self.callback = Some(callback);
    }

    pub(crate) fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    fn notify(&self, doc: &XmlDocument, top: NodeId) -> Result<()> {
        if let Some(callback) = &self.callback {
            let markup = doc.inner_xml(top)?;
            log::trace!("run {:?} changed, propagating {} bytes", self.id.node, markup.len());
            callback(&markup)?;
        }
        Ok(())
    }
}

impl fmt::Debug for RichTextRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RichTextRun")
            .field("id", &self.id)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

/// Read access to the properties of a run
///
/// Implemented by [`RunView`] and [`RunViewMut`].
pub trait RunProperties {
    #[doc(hidden)]
    fn document(&self) -> &XmlDocument;

    #[doc(hidden)]
    fn run_node(&self) -> NodeId;

    /// Identity of the run
    fn id(&self) -> RunId;

    /// Text of the run (`<t>` content)
    fn text(&self) -> String {
        let doc = self.document();
        text_element(doc, self.run_node())
            .map(|t| doc.text_content(t))
            .unwrap_or_default()
    }

    /// Font family name (`<rFont val>`)
    fn font_name(&self) -> Option<String> {
        property_val(self.document(), self.run_node(), "rFont").map(str::to_string)
    }

    /// Font size in points (`<sz val>`)
    fn size(&self) -> Option<f64> {
        property_val(self.document(), self.run_node(), "sz").and_then(|s| s.parse().ok())
    }

    /// Font color; [`Color::Auto`] when unset
    fn color(&self) -> Color {
        let doc = self.document();
        match property(doc, self.run_node(), "color") {
            Some(el) => Color::from_ooxml_attributes(|name| doc.attribute(el, name)),
            None => Color::Auto,
        }
    }

    /// Bold (`<b/>`)
    fn bold(&self) -> bool {
        flag(self.document(), self.run_node(), "b")
    }

    /// Italic (`<i/>`)
    fn italic(&self) -> bool {
        flag(self.document(), self.run_node(), "i")
    }

    /// Strikethrough (`<strike/>`)
    fn strike(&self) -> bool {
        flag(self.document(), self.run_node(), "strike")
    }

    /// Underline style (`<u val>`)
    fn underline(&self) -> Underline {
        let doc = self.document();
        match property(doc, self.run_node(), "u") {
            Some(el) => Underline::from_ooxml(doc.attribute(el, "val")),
            None => Underline::None,
        }
    }

    /// Superscript/subscript (`<vertAlign val>`)
    fn vertical_align(&self) -> FontVerticalAlign {
        property_val(self.document(), self.run_node(), "vertAlign")
            .map(FontVerticalAlign::from_ooxml)
            .unwrap_or_default()
    }

    /// Whether leading/trailing whitespace survives serialization (`xml:space="preserve"`)
    fn preserve_space(&self) -> bool {
        let doc = self.document();
        text_element(doc, self.run_node())
            .and_then(|t| doc.attribute(t, "xml:space"))
            == Some("preserve")
    }

    /// Snapshot of the run formatting; unset name and size fall back to [`FontStyle::default`]
    fn font(&self) -> FontStyle {
        let defaults = FontStyle::default();
        FontStyle {
            name: self.font_name().unwrap_or(defaults.name),
            size: self.size().unwrap_or(defaults.size),
            bold: self.bold(),
            italic: self.italic(),
            underline: self.underline(),
            strikethrough: self.strike(),
            color: self.color(),
            vertical_align: self.vertical_align(),
        }
    }
}

/// Read-only view of a run
#[derive(Clone, Copy)]
pub struct RunView<'a> {
    doc: &'a XmlDocument,
    run: &'a RichTextRun,
}

impl<'a> RunView<'a> {
    pub(crate) fn new(doc: &'a XmlDocument, run: &'a RichTextRun) -> Self {
        Self { doc, run }
    }
}

impl RunProperties for RunView<'_> {
    fn document(&self) -> &XmlDocument {
        self.doc
    }

    fn run_node(&self) -> NodeId {
        self.run.node()
    }

    fn id(&self) -> RunId {
        self.run.id()
    }
}

impl fmt::Debug for RunView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunView")
            .field("id", &self.run.id())
            .field("text", &self.text())
            .finish()
    }
}

/// Mutable view of a run
///
/// Every setter writes to the backing XML and then fires the run's change
/// callback, if one is registered. Setters return `&mut Self` so they can be
/// chained with `?`.
pub struct RunViewMut<'a> {
    doc: &'a mut XmlDocument,
    top: NodeId,
    run: &'a RichTextRun,
}

impl<'a> RunViewMut<'a> {
    pub(crate) fn new(doc: &'a mut XmlDocument, top: NodeId, run: &'a RichTextRun) -> Self {
        Self { doc, top, run }
    }

    fn changed(&mut self) -> Result<&mut Self> {
        self.run.notify(self.doc, self.top)?;
        Ok(self)
    }

    /// Set the text, creating `<t>` if needed
    pub fn set_text(&mut self, text: &str) -> Result<&mut Self> {
        let t = ensure_text_element(self.doc, self.run.node())?;
        self.doc.set_text_content(t, text)?;
        self.changed()
    }

    /// Set or clear the font name
    pub fn set_font_name(&mut self, name: Option<&str>) -> Result<&mut Self> {
        let node = self.run.node();
        match name.filter(|n| !n.is_empty()) {
            Some(name) => set_property_val(self.doc, node, "rFont", name)?,
            None => remove_property(self.doc, node, "rFont")?,
        }
        self.changed()
    }

    /// Set or clear the font size
    pub fn set_size(&mut self, size: Option<f64>) -> Result<&mut Self> {
        let node = self.run.node();
        match size {
            Some(size) if !size.is_finite() || size <= 0.0 => {
                return Err(Error::InvalidValue {
                    property: "size",
                    value: size.to_string(),
                });
            }
            Some(size) => set_property_val(self.doc, node, "sz", &size.to_string())?,
            None => remove_property(self.doc, node, "sz")?,
        }
        self.changed()
    }

    /// Set the color; [`Color::Auto`] removes it
    pub fn set_color(&mut self, color: Color) -> Result<&mut Self> {
        let node = self.run.node();
        if color.is_auto() {
            remove_property(self.doc, node, "color")?;
        } else {
            let el = ensure_property(self.doc, node, "color")?;
            for name in COLOR_ATTRIBUTES {
                self.doc.remove_attribute(el, name)?;
            }
            for (name, value) in color.to_ooxml_attributes() {
                self.doc.set_attribute(el, name, &value)?;
            }
        }
        self.changed()
    }

    /// Set bold
    pub fn set_bold(&mut self, bold: bool) -> Result<&mut Self> {
        set_flag(self.doc, self.run.node(), "b", bold)?;
        self.changed()
    }

    /// Set italic
    pub fn set_italic(&mut self, italic: bool) -> Result<&mut Self> {
        set_flag(self.doc, self.run.node(), "i", italic)?;
        self.changed()
    }

    /// Set strikethrough
    pub fn set_strike(&mut self, strike: bool) -> Result<&mut Self> {
        set_flag(self.doc, self.run.node(), "strike", strike)?;
        self.changed()
    }

    /// Set the underline style; [`Underline::None`] removes it
    pub fn set_underline(&mut self, underline: Underline) -> Result<&mut Self> {
        let node = self.run.node();
        match underline {
            Underline::None => remove_property(self.doc, node, "u")?,
            Underline::Single => {
                let el = ensure_property(self.doc, node, "u")?;
                self.doc.remove_attribute(el, "val")?;
            }
            other => {
                if let Some(val) = other.as_ooxml() {
                    set_property_val(self.doc, node, "u", val)?;
                }
            }
        }
        self.changed()
    }

    /// Set superscript/subscript; baseline removes it
    pub fn set_vertical_align(&mut self, align: FontVerticalAlign) -> Result<&mut Self> {
        let node = self.run.node();
        match align {
            FontVerticalAlign::Baseline => remove_property(self.doc, node, "vertAlign")?,
            other => set_property_val(self.doc, node, "vertAlign", other.as_ooxml())?,
        }
        self.changed()
    }

    /// Set or clear `xml:space="preserve"` on `<t>`
    pub fn set_preserve_space(&mut self, preserve: bool) -> Result<&mut Self> {
        let t = ensure_text_element(self.doc, self.run.node())?;
        if preserve {
            self.doc.set_attribute(t, "xml:space", "preserve")?;
        } else {
            self.doc.remove_attribute(t, "xml:space")?;
        }
        self.changed()
    }

    /// Replace the `<color>` attributes with `attributes` as written
    ///
    /// `None` removes the element.
    pub(crate) fn set_color_attributes(
        &mut self,
        attributes: Option<&[(String, String)]>,
    ) -> Result<&mut Self> {
        let node = self.run.node();
        match attributes {
            Some(attributes) => {
                let el = ensure_property(self.doc, node, "color")?;
                for name in COLOR_ATTRIBUTES {
                    self.doc.remove_attribute(el, name)?;
                }
                for (name, value) in attributes {
                    self.doc.set_attribute(el, name, value)?;
                }
            }
            None => remove_property(self.doc, node, "color")?,
        }
        self.changed()
    }

    /// Apply every property of `font`
    pub fn set_font(&mut self, font: &FontStyle) -> Result<&mut Self> {
        self.set_font_name(Some(font.name.as_str()))?
            .set_size(Some(font.size))?
            .set_bold(font.bold)?
            .set_italic(font.italic)?
            .set_strike(font.strikethrough)?
            .set_underline(font.underline)?
            .set_color(font.color)?
            .set_vertical_align(font.vertical_align)
    }
}

impl RunProperties for RunViewMut<'_> {
    fn document(&self) -> &XmlDocument {
        self.doc
    }

    fn run_node(&self) -> NodeId {
        self.run.node()
    }

    fn id(&self) -> RunId {
        self.run.id()
    }
}

impl fmt::Debug for RunViewMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunViewMut")
            .field("id", &self.run.id())
            .field("text", &self.text())
            .finish()
    }
}

/// Qualified name for a child of `parent`, reusing the parent's prefix
pub(crate) fn child_name(doc: &XmlDocument, parent: NodeId, local: &str) -> String {
    match doc.name(parent).and_then(|n| n.split_once(':')) {
        Some((prefix, _)) => format!("{prefix}:{local}"),
        None => local.to_string(),
    }
}

fn create_child(doc: &mut XmlDocument, parent: NodeId, local: &str) -> NodeId {
    let name = child_name(doc, parent, local);
    let namespace = doc.namespace(parent).map(str::to_string);
    doc.create_element(&name, namespace.as_deref())
}

fn child(doc: &XmlDocument, parent: NodeId, local: &str) -> Option<NodeId> {
    doc.first_child_element(parent, local, doc.namespace(parent))
}

fn text_element(doc: &XmlDocument, run: NodeId) -> Option<NodeId> {
    child(doc, run, "t")
}

fn ensure_text_element(doc: &mut XmlDocument, run: NodeId) -> Result<NodeId> {
    if let Some(t) = text_element(doc, run) {
        return Ok(t);
    }
    let t = create_child(doc, run, "t");
    doc.append_child(run, t)?;
    Ok(t)
}

fn property(doc: &XmlDocument, run: NodeId, local: &str) -> Option<NodeId> {
    let rpr = child(doc, run, "rPr")?;
    child(doc, rpr, local)
}

/// Attributes of the `<color>` element as written, `None` when absent
pub(crate) fn color_attributes(doc: &XmlDocument, run: NodeId) -> Option<Vec<(String, String)>> {
    let el = property(doc, run, "color")?;
    Some(
        doc.attributes(el)
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    )
}

fn property_val<'d>(doc: &'d XmlDocument, run: NodeId, local: &str) -> Option<&'d str> {
    property(doc, run, local).and_then(|el| doc.attribute(el, "val"))
}

/// `<b/>` and `<b val="1"/>` are on, `<b val="0"/>` is off
fn flag(doc: &XmlDocument, run: NodeId, local: &str) -> bool {
    match property(doc, run, local) {
        Some(el) => !matches!(doc.attribute(el, "val"), Some("0") | Some("false")),
        None => false,
    }
}

fn set_flag(doc: &mut XmlDocument, run: NodeId, local: &str, on: bool) -> Result<()> {
    if on {
        let el = ensure_property(doc, run, local)?;
        doc.remove_attribute(el, "val")?;
        Ok(())
    } else {
        remove_property(doc, run, local)
    }
}

fn set_property_val(doc: &mut XmlDocument, run: NodeId, local: &str, val: &str) -> Result<()> {
    let el = ensure_property(doc, run, local)?;
    doc.set_attribute(el, "val", val)?;
    Ok(())
}

/// `<rPr>` must precede `<t>`
fn ensure_rpr(doc: &mut XmlDocument, run: NodeId) -> Result<NodeId> {
    if let Some(rpr) = child(doc, run, "rPr") {
        return Ok(rpr);
    }
    let rpr = create_child(doc, run, "rPr");
    match doc.children(run).first().copied() {
        Some(first) => doc.insert_before(run, rpr, first)?,
        None => doc.append_child(run, rpr)?,
    }
    Ok(rpr)
}

fn order_of(local: &str) -> usize {
    RPR_ORDER
        .iter()
        .position(|name| *name == local)
        .unwrap_or(RPR_ORDER.len())
}

fn ensure_property(doc: &mut XmlDocument, run: NodeId, local: &str) -> Result<NodeId> {
    let rpr = ensure_rpr(doc, run)?;
    if let Some(el) = child(doc, rpr, local) {
        return Ok(el);
    }

    let rank = order_of(local);
    let next = doc
        .children(rpr)
        .iter()
        .copied()
        .find(|c| doc.local_name(*c).map_or(false, |name| order_of(name) > rank));

    let el = create_child(doc, rpr, local);
    match next {
        Some(next) => doc.insert_before(rpr, el, next)?,
        None => doc.append_child(rpr, el)?,
    }
    Ok(el)
}

fn remove_property(doc: &mut XmlDocument, run: NodeId, local: &str) -> Result<()> {
    let Some(rpr) = child(doc, run, "rPr") else {
        return Ok(());
    };
    if let Some(el) = child(doc, rpr, local) {
        doc.remove_child(rpr, el)?;
    }
    if !doc.children(rpr).iter().any(|c| doc.is_element(*c)) {
        doc.remove_child(run, rpr)?;
    }
    Ok(())
}
