//! Ordered collection of rich text runs backed by an XML node
//!
//! The collection owns an [`XmlDocument`] and keeps the `<r>` children of one
//! of its elements (usually the `<is>` or `<si>` root) in step with an
//! in-memory list of runs. When bound to an owning cell it also keeps the
//! cell's rich text flag and cached value up to date.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use xlrich_core::{Error, FontStyle, Result, RichTextHost, Underline};
use xlrich_dom::{Namespaces, NodeId, XmlDocument};

use crate::options::RichTextOptions;
use crate::run::{
    child_name, color_attributes, ChangeCallback, RichTextRun, RunId, RunProperties, RunView,
    RunViewMut,
};

const RUN_ELEMENT: &str = "r";
pub(crate) const INLINE_STRING_ELEMENT: &str = "is";

static NEXT_COLLECTION_ID: AtomicU64 = AtomicU64::new(1);

type OwnerRef = Weak<RefCell<dyn RichTextHost>>;

/// Rich text runs of a single cell value
///
/// ```rust
/// use xlrich::prelude::*;
///
/// let mut runs = RichTextCollection::empty();
/// runs.add("Hello, ").unwrap().set_bold(true).unwrap();
/// runs.add("world").unwrap();
///
/// assert_eq!(runs.len(), 2);
/// assert_eq!(runs.text(), "Hello, world");
/// // The second run inherits the formatting of the first
/// assert!(runs.get(1).unwrap().bold());
/// ```
#[derive(Debug)]
pub struct RichTextCollection {
    id: u64,
    doc: XmlDocument,
    top: NodeId,
    namespaces: Namespaces,
    runs: Vec<RichTextRun>,
    owner: Option<OwnerRef>,
    options: RichTextOptions,
}

/// Formatting copied into a new run by [`RichTextCollection::add`]
enum Inherited {
    /// From the current last run
    Run {
        font_name: Option<String>,
        size: Option<f64>,
        /// `<color>` attributes as written, so theme tints survive unrounded
        color: Option<Vec<(String, String)>>,
        bold: bool,
        italic: bool,
        underline: Underline,
    },
    /// From the owning cell
    Owner(FontStyle),
    /// From [`RichTextOptions`]
    Defaults,
}

impl RichTextCollection {
    /// Wrap the `<r>` children of `top`
    ///
    /// Runs are matched by local name in the default namespace of
    /// `namespaces`.
    pub fn new(doc: XmlDocument, top: NodeId, namespaces: Namespaces) -> Self {
        let id = NEXT_COLLECTION_ID.fetch_add(1, Ordering::Relaxed);
        let runs = doc
            .child_elements(top, RUN_ELEMENT, namespaces.default_uri())
            .map(|node| RichTextRun::new(id, node))
            .collect::<Vec<_>>();
        log::debug!("rich text collection loaded with {} runs", runs.len());

        Self {
            id,
            doc,
            top,
            namespaces,
            runs,
            owner: None,
            options: RichTextOptions::default(),
        }
    }

    /// Wrap the `<r>` children of `top` and bind the collection to its owning cell
    ///
    /// Only a weak reference to `owner` is kept.
    pub fn with_owner<H>(
        doc: XmlDocument,
        top: NodeId,
        namespaces: Namespaces,
        owner: &Rc<RefCell<H>>,
    ) -> Self
    where
        H: RichTextHost + 'static,
    {
        let weak = Rc::downgrade(owner);
        let owner: OwnerRef = weak;
        let mut collection = Self::new(doc, top, namespaces);
        for run in &mut collection.runs {
            run.set_callback(owner_callback(&owner));
        }
        collection.owner = Some(owner);
        collection
    }

    /// An unbound collection over a new, empty `<is>` element
    pub fn empty() -> Self {
        let namespaces = Namespaces::spreadsheet();
        let doc = XmlDocument::new(INLINE_STRING_ELEMENT, namespaces.default_uri());
        let top = doc.root();
        Self::new(doc, top, namespaces)
    }

    /// An unbound collection over serialized runs (the inner markup of `<is>` or `<si>`)
    pub fn from_markup(markup: &str) -> Result<Self> {
        let namespaces = Namespaces::spreadsheet();
        let doc = XmlDocument::parse_fragment(INLINE_STRING_ELEMENT, markup, &namespaces)?;
        let top = doc.root();
        Ok(Self::new(doc, top, namespaces))
    }

    /// Replace the options (builder style)
    pub fn with_options(mut self, options: RichTextOptions) -> Self {
        self.options = options;
        self
    }

    /// Current options
    pub fn options(&self) -> &RichTextOptions {
        &self.options
    }

    /// Whether the collection was bound to an owning cell
    pub fn is_bound(&self) -> bool {
        self.owner.is_some()
    }

    /// The backing document
    pub fn document(&self) -> &XmlDocument {
        &self.doc
    }

    /// The element whose children are the runs
    pub fn top_node(&self) -> NodeId {
        self.top
    }

    /// Give back the backing document
    pub fn into_document(self) -> XmlDocument {
        self.doc
    }

    /// Serialized runs (inner markup of the backing element)
    pub fn inner_xml(&self) -> Result<String> {
        Ok(self.doc.inner_xml(self.top)?)
    }

    /// Number of runs
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    /// Whether there are no runs
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Run at `index`
    pub fn get(&self, index: usize) -> Result<RunView<'_>> {
        let run = self
            .runs
            .get(index)
            .ok_or_else(|| Error::out_of_range(index, self.runs.len()))?;
        Ok(RunView::new(&self.doc, run))
    }

    /// Mutable run at `index`
    pub fn get_mut(&mut self, index: usize) -> Result<RunViewMut<'_>> {
        let len = self.runs.len();
        let run = self
            .runs
            .get(index)
            .ok_or_else(|| Error::out_of_range(index, len))?;
        Ok(RunViewMut::new(&mut self.doc, self.top, run))
    }

    /// Position of a run in this collection
    pub fn position(&self, id: RunId) -> Option<usize> {
        if id.collection != self.id {
            return None;
        }
        self.runs.iter().position(|run| run.id() == id)
    }

    /// Iterate over the runs in document order
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            doc: &self.doc,
            inner: self.runs.iter(),
        }
    }

    /// Append a run with `text`
    ///
    /// The new run copies its formatting from the last run. The first run of
    /// a bound collection takes the owning cell's font and marks the cell as
    /// rich text; the first run of an unbound collection gets the default
    /// font from [`RichTextOptions`]. Whitespace is always preserved.
    pub fn add(&mut self, text: &str) -> Result<RunViewMut<'_>> {
        let inherited = match self.runs.last() {
            Some(prev) => {
                let prev = RunView::new(&self.doc, prev);
                Inherited::Run {
                    font_name: prev.font_name(),
                    size: prev.size(),
                    color: color_attributes(&self.doc, prev.run_node()),
                    bold: prev.bold(),
                    italic: prev.italic(),
                    underline: prev.underline(),
                }
            }
            None => match self.update_owner(|host| Ok(host.base_font()))? {
                Some(font) => Inherited::Owner(font),
                None => Inherited::Defaults,
            },
        };

        // Styled while detached so a failing setter leaves the tree untouched
        let name = self.run_element_name();
        let namespace = self.namespaces.default_uri().map(str::to_string);
        let node = self.doc.create_element(&name, namespace.as_deref());
        let mut run = RichTextRun::new(self.id, node);

        let styled = {
            let mut view = RunViewMut::new(&mut self.doc, self.top, &run);
            style_new_run(&mut view, &inherited, &self.options, text)
        };
        if let Err(err) = styled {
            self.doc.delete(node)?;
            return Err(err);
        }
        self.doc.append_child(self.top, node)?;

        if matches!(inherited, Inherited::Owner(_)) {
            self.update_owner(|host| {
                host.set_rich_text(true);
                Ok(())
            })?;
        }
        if let Some(owner) = &self.owner {
            run.set_callback(owner_callback(owner));
        }

        self.runs.push(run);
        log::debug!("rich text run added (count: {})", self.runs.len());
        self.refresh_owner()?;

        let index = self.runs.len() - 1;
        Ok(RunViewMut::new(&mut self.doc, self.top, &self.runs[index]))
    }

    /// Qualified name for a new run
    ///
    /// Follows the prefix of the backing element when it lives in the run
    /// namespace, otherwise any prefix bound to that namespace.
    fn run_element_name(&self) -> String {
        let namespace = self.namespaces.default_uri();
        if self.doc.namespace(self.top) == namespace {
            return child_name(&self.doc, self.top, RUN_ELEMENT);
        }
        self.namespaces
            .iter()
            .find(|(prefix, uri)| !prefix.is_empty() && Some(*uri) == namespace)
            .map(|(prefix, _)| format!("{prefix}:{RUN_ELEMENT}"))
            .unwrap_or_else(|| RUN_ELEMENT.to_string())
    }

    /// Remove every run
    ///
    /// A bound cell loses its value and its rich text flag, even if the
    /// collection was already empty.
    pub fn clear(&mut self) -> Result<()> {
        self.runs.clear();
        self.doc.remove_all_children(self.top)?;
        self.release_owner()?;
        log::debug!("rich text collection cleared");
        Ok(())
    }

    /// Remove the run at `index`
    pub fn remove_at(&mut self, index: usize) -> Result<()> {
        let node = self
            .runs
            .get(index)
            .ok_or_else(|| Error::out_of_range(index, self.runs.len()))?
            .node();
        self.doc.remove_child(self.top, node)?;
        self.runs.remove(index);
        log::debug!("rich text run {index} removed (count: {})", self.runs.len());
        self.after_removal()
    }

    /// Remove a run by identity
    ///
    /// Returns `false` and leaves everything untouched when the run does not
    /// belong to this collection.
    pub fn remove(&mut self, id: RunId) -> Result<bool> {
        match self.position(id) {
            Some(index) => {
                self.remove_at(index)?;
                Ok(true)
            }
            None => {
                log::debug!("run {id:?} is not part of this collection");
                Ok(false)
            }
        }
    }

    /// Concatenated text of all runs
    pub fn text(&self) -> String {
        self.iter().map(|run| run.text()).collect()
    }

    /// Replace the whole text
    ///
    /// An empty collection gets a new run (styled as by [`add`](Self::add)).
    /// Otherwise the first run keeps its formatting and takes the text, and
    /// every later run is removed.
    pub fn set_text(&mut self, value: &str) -> Result<()> {
        if self.runs.is_empty() {
            self.add(value)?;
            return Ok(());
        }
        while self.runs.len() > 1 {
            self.remove_at(self.runs.len() - 1)?;
        }
        self.get_mut(0)?.set_text(value)?;
        Ok(())
    }

    fn after_removal(&mut self) -> Result<()> {
        if self.runs.is_empty() {
            self.release_owner()
        } else {
            self.refresh_owner()
        }
    }

    /// Empty the owning cell's value and clear its rich text flag
    fn release_owner(&self) -> Result<()> {
        self.update_owner(|host| {
            host.set_value_rich_text("")?;
            host.set_rich_text(false);
            Ok(())
        })?;
        Ok(())
    }

    /// Push the serialized runs to the owning cell
    fn refresh_owner(&self) -> Result<()> {
        if self.owner.is_none() || self.runs.is_empty() {
            return Ok(());
        }
        let markup = self.doc.inner_xml(self.top)?;
        self.update_owner(|host| host.set_value_rich_text(&markup))?;
        Ok(())
    }

    /// Run `f` against the owning cell; `None` when unbound or the cell is gone
    fn update_owner<R>(
        &self,
        f: impl FnOnce(&mut dyn RichTextHost) -> Result<R>,
    ) -> Result<Option<R>> {
        let Some(owner) = &self.owner else {
            return Ok(None);
        };
        let Some(host) = owner.upgrade() else {
            log::warn!("owning cell of rich text collection has been dropped");
            return Ok(None);
        };
        let mut guard = host
            .try_borrow_mut()
            .map_err(|_| Error::other("owning cell is already borrowed"))?;
        f(&mut *guard).map(Some)
    }
}

fn style_new_run(
    view: &mut RunViewMut<'_>,
    inherited: &Inherited,
    options: &RichTextOptions,
    text: &str,
) -> Result<()> {
    match inherited {
        Inherited::Run {
            font_name,
            size,
            color,
            bold,
            italic,
            underline,
        } => {
            view.set_font_name(font_name.as_deref())?
                .set_size(*size)?
                .set_color_attributes(color.as_deref())?
                .set_bold(*bold)?
                .set_italic(*italic)?
                .set_underline(*underline)?;
        }
        Inherited::Owner(font) => {
            view.set_font_name(Some(font.name.as_str()))?
                .set_size(Some(font.size))?
                .set_bold(font.bold)?
                .set_italic(font.italic)?;
        }
        Inherited::Defaults => {
            view.set_font_name(Some(options.default_font_name.as_str()))?
                .set_size(Some(options.default_font_size))?;
        }
    }
    view.set_text(text)?.set_preserve_space(true)?;
    Ok(())
}

/// Callback that copies the serialized runs into the owning cell
fn owner_callback(owner: &OwnerRef) -> ChangeCallback {
    let owner = owner.clone();
    Box::new(move |markup: &str| {
        let Some(host) = owner.upgrade() else {
            log::warn!("owning cell of rich text run has been dropped");
            return Ok(());
        };
        let mut guard = host
            .try_borrow_mut()
            .map_err(|_| Error::other("owning cell is already borrowed"))?;
        guard.set_value_rich_text(markup)
    })
}

/// Iterator over the runs of a [`RichTextCollection`]
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    doc: &'a XmlDocument,
    inner: std::slice::Iter<'a, RichTextRun>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = RunView<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let doc = self.doc;
        self.inner.next().map(|run| RunView::new(doc, run))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let doc = self.doc;
        self.inner.next_back().map(|run| RunView::new(doc, run))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a RichTextCollection {
    type Item = RunView<'a>;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
