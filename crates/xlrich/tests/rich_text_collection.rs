//! End-to-end tests for rich text collections bound to cells

use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use xlrich::prelude::*;
use xlrich::{Namespaces, XmlDocument};

fn shared(cell: Cell) -> Rc<RefCell<Cell>> {
    Rc::new(RefCell::new(cell))
}

fn arial_bold_cell() -> Rc<RefCell<Cell>> {
    let font = FontStyle::new()
        .with_name("Arial")
        .with_size(12.0)
        .with_bold(true)
        .with_italic(false);
    shared(Cell::new().with_font(font))
}

/// Collection over `<si>` markup, bound to `cell`
fn bound(markup: &str, cell: &Rc<RefCell<Cell>>) -> RichTextCollection {
    let namespaces = Namespaces::spreadsheet();
    let doc = XmlDocument::parse_fragment("si", markup, &namespaces).unwrap();
    let top = doc.root();
    RichTextCollection::with_owner(doc, top, namespaces, cell)
}

fn child_count(runs: &RichTextCollection) -> usize {
    runs.document().children(runs.top_node()).len()
}

#[test]
fn test_load_runs_in_document_order() {
    let runs = RichTextCollection::from_markup(
        r#"<r><t>one</t></r><r><rPr><i/></rPr><t xml:space="preserve"> two </t></r><r><t>three</t></r>"#,
    )
    .unwrap();

    assert_eq!(runs.len(), 3);
    let texts: Vec<String> = runs.iter().map(|r| r.text()).collect();
    assert_eq!(texts, vec!["one", " two ", "three"]);
    assert!(runs.get(1).unwrap().italic());
    assert!(runs.get(1).unwrap().preserve_space());
}

#[test]
fn test_load_full_shared_strings_item() {
    let xml = r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><si><r><t>a</t></r><r><t>b</t></r></si></sst>"#;
    let doc = XmlDocument::parse(xml).unwrap();
    let namespaces = Namespaces::spreadsheet();
    let si = doc
        .first_child_element(doc.root(), "si", namespaces.default_uri())
        .unwrap();

    let runs = RichTextCollection::new(doc, si, namespaces);
    assert_eq!(runs.len(), 2);
    assert_eq!(runs.text(), "ab");
}

#[test]
fn test_add_inherits_from_previous_run() {
    let mut runs = RichTextCollection::empty();
    runs.add("first")
        .unwrap()
        .set_font_name(Some("Georgia"))
        .unwrap()
        .set_size(Some(9.5))
        .unwrap()
        .set_color(Color::theme(3, 0))
        .unwrap()
        .set_bold(true)
        .unwrap()
        .set_italic(true)
        .unwrap()
        .set_underline(Underline::Double)
        .unwrap();

    let second = runs.add("x").unwrap();
    assert_eq!(second.font_name().as_deref(), Some("Georgia"));
    assert_eq!(second.size(), Some(9.5));
    assert_eq!(second.color(), Color::theme(3, 0));
    assert!(second.bold());
    assert!(second.italic());
    assert_eq!(second.underline(), Underline::Double);
    assert!(second.preserve_space());
}

#[test]
fn test_add_keeps_theme_tint_exact() {
    let mut runs = RichTextCollection::from_markup(
        r#"<r><rPr><color theme="1" tint="0.39997558519241921"/></rPr><t>a</t></r>"#,
    )
    .unwrap();
    runs.add("b").unwrap();

    assert_eq!(
        runs.inner_xml().unwrap(),
        concat!(
            r#"<r><rPr><color theme="1" tint="0.39997558519241921"/></rPr><t>a</t></r>"#,
            r#"<r><rPr><color theme="1" tint="0.39997558519241921"/></rPr>"#,
            r#"<t xml:space="preserve">b</t></r>"#,
        )
    );
}

#[test]
fn test_add_keeps_auto_color() {
    let mut runs =
        RichTextCollection::from_markup(r#"<r><rPr><color auto="1"/></rPr><t>a</t></r>"#).unwrap();
    runs.add("b").unwrap();
    let xml = runs.inner_xml().unwrap();
    assert_eq!(xml.matches(r#"<color auto="1"/>"#).count(), 2, "{xml}");
}

#[test]
fn test_failed_add_leaves_runs_and_children_aligned() {
    let mut runs =
        RichTextCollection::from_markup(r#"<r><rPr><sz val="0"/></rPr><t>a</t></r>"#).unwrap();
    let before = runs.inner_xml().unwrap();

    assert!(matches!(
        runs.add("b"),
        Err(Error::InvalidValue { property: "size", .. })
    ));
    assert_eq!(runs.len(), 1);
    assert_eq!(child_count(&runs), 1);
    assert_eq!(runs.inner_xml().unwrap(), before);
}

#[test]
fn test_failed_first_add_leaves_cell_untouched() {
    let cell = shared(Cell::with_value(1).with_font(FontStyle::new().with_size(0.0)));
    let namespaces = Namespaces::spreadsheet();
    let doc = XmlDocument::new("is", namespaces.default_uri());
    let top = doc.root();
    let mut runs = RichTextCollection::with_owner(doc, top, namespaces, &cell);

    assert!(runs.add("x").is_err());
    assert!(runs.is_empty());
    assert_eq!(child_count(&runs), 0);
    assert!(!cell.borrow().is_rich_text());
    assert_eq!(cell.borrow().value(), &CellValue::Number(1.0));
}

#[test]
fn test_prefixed_backing_node_round_trip() {
    let xml = r#"<d:si xmlns:d="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><d:r><d:t>a</d:t></d:r></d:si>"#;
    let doc = XmlDocument::parse(xml).unwrap();
    let top = doc.root();
    let mut runs = RichTextCollection::new(doc, top, Namespaces::spreadsheet());
    runs.add("b").unwrap().set_bold(true).unwrap();

    let written = runs.document().to_xml().unwrap();
    assert!(
        written.contains(r#"<d:r><d:rPr><d:b/></d:rPr><d:t xml:space="preserve">b</d:t></d:r>"#),
        "{written}"
    );

    let doc = XmlDocument::parse(&written).unwrap();
    let top = doc.root();
    let reloaded = RichTextCollection::new(doc, top, Namespaces::spreadsheet());
    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded.text(), "ab");
    assert!(reloaded.get(1).unwrap().bold());
}

#[test]
fn test_add_inherits_from_cell_when_empty() {
    let cell = arial_bold_cell();
    let mut runs = bound("", &cell);
    assert!(!cell.borrow().is_rich_text());

    let run = runs.add("x").unwrap();
    assert_eq!(run.font_name().as_deref(), Some("Arial"));
    assert_eq!(run.size(), Some(12.0));
    assert!(run.bold());
    assert!(!run.italic());
    assert!(cell.borrow().is_rich_text());
}

#[test]
fn test_add_defaults_when_unbound() {
    let mut runs = RichTextCollection::empty();
    let run = runs.add("x").unwrap();
    assert_eq!(run.font_name().as_deref(), Some("Calibri"));
    assert_eq!(run.size(), Some(11.0));
    assert!(!run.bold());
}

#[test]
fn test_add_preserves_whitespace() {
    let mut runs = RichTextCollection::empty();
    runs.add("  padded  ").unwrap();
    let xml = runs.inner_xml().unwrap();
    assert!(xml.contains(r#"<t xml:space="preserve">  padded  </t>"#), "{xml}");
}

#[test]
fn test_clear_empties_state() {
    let cell = arial_bold_cell();
    let mut runs = bound("", &cell);
    runs.add("a").unwrap();
    runs.add("b").unwrap();

    runs.clear().unwrap();
    assert_eq!(runs.len(), 0);
    assert_eq!(child_count(&runs), 0);
    assert!(!cell.borrow().is_rich_text());

    // Clearing again is harmless
    runs.clear().unwrap();
    assert!(!cell.borrow().is_rich_text());
    assert!(cell.borrow().value().is_empty());
}

#[test]
fn test_set_text_collapses_to_one_run() {
    let cell = arial_bold_cell();
    let mut runs = bound("", &cell);
    for text in ["a", "b", "c"] {
        runs.add(text).unwrap();
    }

    runs.set_text("z").unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs.get(0).unwrap().text(), "z");
    assert_eq!(child_count(&runs), 1);
    assert_eq!(cell.borrow().display_text(), "z");
}

#[test]
fn test_remove_last_run_clears_flag() {
    let cell = arial_bold_cell();
    let mut runs = bound("", &cell);
    runs.add("only").unwrap();
    assert!(cell.borrow().is_rich_text());

    runs.remove_at(0).unwrap();
    assert_eq!(runs.len(), 0);
    assert_eq!(child_count(&runs), 0);
    assert!(!cell.borrow().is_rich_text());
    assert_eq!(cell.borrow().display_text(), "");
}

#[test]
fn test_long_editing_session_does_not_grow_document() {
    let mut runs = RichTextCollection::empty();
    runs.add("a").unwrap();
    let live = runs.document().node_count();

    for i in 0..10_000 {
        runs.get_mut(0).unwrap().set_text(&i.to_string()).unwrap();
    }
    runs.remove_at(0).unwrap();
    runs.add("z").unwrap();

    assert_eq!(runs.document().node_count(), live);
    assert_eq!(runs.text(), "z");
}

#[test]
fn test_removed_run_id_does_not_match_new_run() {
    let mut runs = RichTextCollection::empty();
    let old = runs.add("old").unwrap().id();
    runs.remove_at(0).unwrap();
    runs.add("new").unwrap();

    assert!(!runs.remove(old).unwrap());
    assert_eq!(runs.text(), "new");
}

#[test]
fn test_text_concatenates_runs() {
    let mut runs = RichTextCollection::empty();
    runs.add("Hel").unwrap();
    runs.add("lo").unwrap();
    assert_eq!(runs.text(), "Hello");
}

#[test]
fn test_run_change_refreshes_cell_value() {
    let cell = arial_bold_cell();
    let mut runs = bound("", &cell);
    runs.add("Hel").unwrap();
    runs.add("lo").unwrap();
    assert_eq!(cell.borrow().display_text(), "Hello");

    runs.get_mut(1).unwrap().set_text("p").unwrap();
    assert_eq!(cell.borrow().display_text(), "Help");

    runs.get_mut(0).unwrap().set_italic(true).unwrap();
    let markup = cell.borrow().value().rich_markup().map(str::to_string);
    assert_eq!(markup, Some(runs.inner_xml().unwrap()));
}

#[test]
fn test_loaded_runs_notify_owner() {
    let cell = shared(Cell::new());
    let mut runs = bound("<r><t>old</t></r>", &cell);
    runs.get_mut(0).unwrap().set_text("new").unwrap();
    assert_eq!(cell.borrow().display_text(), "new");
}

#[test]
fn test_remove_refreshes_cell_value() {
    let cell = arial_bold_cell();
    let mut runs = bound("", &cell);
    runs.add("a").unwrap();
    let b = runs.add("b").unwrap().id();
    runs.add("c").unwrap();

    assert!(runs.remove(b).unwrap());
    assert_eq!(cell.borrow().display_text(), "ac");
    assert!(cell.borrow().is_rich_text());
}

#[test]
fn test_properties_written_in_schema_order() {
    let mut runs = RichTextCollection::empty();
    runs.add("x")
        .unwrap()
        .set_vertical_align(FontVerticalAlign::Subscript)
        .unwrap()
        .set_strike(true)
        .unwrap()
        .set_color(Color::Indexed(12))
        .unwrap()
        .set_bold(true)
        .unwrap();

    assert_eq!(
        runs.inner_xml().unwrap(),
        concat!(
            r#"<r><rPr><rFont val="Calibri"/><b/><strike/><color indexed="12"/>"#,
            r#"<sz val="11"/><vertAlign val="subscript"/></rPr>"#,
            r#"<t xml:space="preserve">x</t></r>"#,
        )
    );
}

#[test]
fn test_out_of_range_errors() {
    let mut runs = RichTextCollection::empty();
    runs.add("a").unwrap();

    assert!(matches!(
        runs.get(2),
        Err(Error::IndexOutOfRange { index: 2, len: 1 })
    ));
    assert!(matches!(
        runs.remove_at(1),
        Err(Error::IndexOutOfRange { index: 1, len: 1 })
    ));
    assert_eq!(runs.len(), 1);
}

#[test]
fn test_removing_foreign_run_is_noop() {
    let cell = arial_bold_cell();
    let mut runs = bound("", &cell);
    runs.add("mine").unwrap();

    let mut other = RichTextCollection::empty();
    let foreign = other.add("theirs").unwrap().id();

    assert!(!runs.remove(foreign).unwrap());
    assert_eq!(runs.len(), 1);
    assert_eq!(child_count(&runs), 1);
    assert_eq!(other.len(), 1);
    assert!(cell.borrow().is_rich_text());
}

#[test]
fn test_rich_text_on_plain_and_rich_cells() {
    let plain = shared(Cell::with_value("plain").with_font(FontStyle::new().with_name("Verdana")));
    let runs = plain.rich_text().unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs.get(0).unwrap().font_name().as_deref(), Some("Verdana"));
    assert!(plain.borrow().is_rich_text());

    let rich = shared(Cell::new());
    rich.borrow_mut()
        .set_value_rich_text("<r><t>x</t></r><r><t>y</t></r>")
        .unwrap();
    let runs = rich.rich_text().unwrap();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs.text(), "xy");
}

#[test]
fn test_dropped_cell_is_ignored() {
    let cell = arial_bold_cell();
    let mut runs = bound("<r><t>a</t></r>", &cell);
    drop(cell);

    runs.get_mut(0).unwrap().set_text("b").unwrap();
    runs.add("c").unwrap();
    runs.clear().unwrap();
    assert!(runs.is_empty());
}
