use pretty_assertions::assert_eq;
use std::io::Write;
use xsdgen_roundtrip::sample::{self, *};
use xsdgen_runtime::{self as meta, Element, Loader};

const DOCUMENT: &str = concat!(
    r#"<?xml version="1.0" encoding="utf-8"?>"#,
    r#"<Catalog xmlns="urn:xsdgen:sample" Version="2" Owner="Ada">"#,
    r#"<Title>Spring</Title>"#,
    r#"<Foo Id="f1" Color="dark-blue" Direction="West"/>"#,
    r#"<Bar Id="b1" Permissions="read write" Weight="2.5" Visible="true">"#,
    r#"<Label Lang="en">Crate</Label>"#,
    r#"<Length Unit="cm">12.5</Length>"#,
    r#"</Bar>"#,
    r#"<Note>fragile</Note>"#,
    r#"<Swatches><Foo Id="f2"/></Swatches>"#,
    r#"</Catalog>"#,
);

fn loader() -> Loader {
    Loader::new([sample::registry()])
}

#[test]
fn registry_lists_elements_then_local_elements_then_types() {
    let registry = sample::registry();
    let names = registry
        .entries()
        .iter()
        .map(|entry| entry.xml_name)
        .collect::<Vec<_>>();
    assert_eq!(
        names,
        vec![
            "Title", "Swatches", "Foo", "Bar", "Catalog", "Label", "Length", "Note", "Measure",
            "Palette",
        ]
    );
    assert!(registry.find_exact("Placeholder").is_none());
}

#[test]
fn loads_typed_tree() {
    let root = loader().load_str(DOCUMENT).unwrap();
    let catalog = meta::downcast_ref::<Catalog>(&root).unwrap();
    assert_eq!(catalog.version(), Some(2));
    assert_eq!(catalog.owner(), Some("Ada"));

    let titles = catalog.children_of::<Title>();
    let title = meta::downcast_ref::<Title>(&titles[0]).unwrap();
    assert_eq!(title.content(), Some("Spring"));

    let foos = catalog.children_of::<Foo>();
    assert_eq!(foos.len(), 1);
    let foo = meta::downcast_ref::<Foo>(&foos[0]).unwrap();
    assert_eq!(foo.color(), Some(Color::DarkBlue));
    assert_eq!(foo.direction(), Some(DirectionType::West));

    let bars = catalog.children_of::<Bar>();
    let bar = meta::downcast_ref::<Bar>(&bars[0]).unwrap();
    assert_eq!(bar.permissions(), Some(Permission::READ | Permission::WRITE));
    assert_eq!(bar.weight(), Some(2.5));
    assert_eq!(bar.visible(), Some(true));
    assert_eq!(bar.size(), None);

    let lengths = bar.children_of::<Length>();
    let length = meta::downcast_ref::<Length>(&lengths[0]).unwrap();
    assert_eq!(length.content(), Some(12.5));
    assert_eq!(length.unit(), Some(UnitType::Cm));

    let swatches = catalog.children_of::<Swatches>();
    assert_eq!(swatches.len(), 1);
    assert!(std::rc::Rc::ptr_eq(
        &swatches[0].borrow().parent().unwrap(),
        &root
    ));
}

#[test]
fn round_trips() {
    let root = loader().load_str(DOCUMENT).unwrap();
    assert_eq!(meta::to_xml_string(&root, false).unwrap(), DOCUMENT);
}

#[test]
fn serializes_in_schema_order() {
    let catalog = Catalog::new();
    let root: meta::ElementRef = catalog.clone();
    catalog.borrow_mut().set_version(1);

    let note = Note::new();
    note.borrow_mut().set_content("last");
    meta::add_child(&root, note).unwrap();
    let title = Title::new();
    title.borrow_mut().set_content("first");
    meta::add_child(&root, title).unwrap();

    assert_eq!(
        meta::to_xml_string(&root, false).unwrap(),
        concat!(
            r#"<?xml version="1.0" encoding="utf-8"?>"#,
            r#"<Catalog xmlns="urn:xsdgen:sample" Version="1">"#,
            r#"<Title>first</Title><Note>last</Note></Catalog>"#,
        )
    );
}

#[test]
fn undeclared_elements_fall_back_to_the_registry() {
    let root = loader()
        .load_str(r#"<Catalog Version="1"><Palette><Bar Id="b"/></Palette></Catalog>"#)
        .unwrap();
    let catalog = meta::downcast_ref::<Catalog>(&root).unwrap();
    let palettes = catalog.children_of::<Palette>();
    assert_eq!(palettes.len(), 1);
    assert_eq!(
        meta::downcast_ref::<Palette>(&palettes[0])
            .unwrap()
            .children_of::<Bar>()
            .len(),
        1
    );
}

#[test]
fn whitespace_only_text_is_string_content() {
    let root = loader()
        .load_str("<Catalog Version=\"1\">\n  <Note>  </Note>\n</Catalog>")
        .unwrap();
    let catalog = meta::downcast_ref::<Catalog>(&root).unwrap();
    let notes = catalog.children_of::<Note>();
    assert_eq!(notes.len(), 1);
    assert_eq!(
        meta::downcast_ref::<Note>(&notes[0]).unwrap().content(),
        Some("  ")
    );
}

#[test]
fn unknown_elements_fail() {
    let error = loader()
        .load_str(r#"<Catalog Version="1"><Mystery/></Catalog>"#)
        .unwrap_err();
    assert!(matches!(error, meta::Error::NoCorrespondingType(name) if name == "Mystery"));
}

#[test]
fn malformed_attribute_values_fail() {
    let error = loader()
        .load_str(r#"<Catalog Version="two"/>"#)
        .unwrap_err();
    assert!(matches!(error, meta::Error::InvalidValue { ref name, .. } if name == "Version"));
}

#[test]
fn content_model_violations_fail() {
    let error = loader()
        .load_str(r#"<Swatches><Foo Id="a"/><Bar Id="b"/></Swatches>"#)
        .unwrap_err();
    assert!(matches!(error, meta::Error::ChoiceViolation(name) if name == "Bar"));
}

#[test]
fn loads_files() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(DOCUMENT.as_bytes()).unwrap();
    let root = loader().load_file(file.path()).unwrap();
    assert!(meta::is::<Catalog>(&root));
}

#[test]
fn built_trees_load_back_with_the_same_values() {
    let bar = Bar::new();
    {
        let mut bar = bar.borrow_mut();
        bar.set_id("b7");
        bar.set_permissions(Permission::WRITE | Permission::EXECUTE);
        bar.set_weight(f64::INFINITY);
        bar.set_size(-4);
        bar.set_visible(false);
    }
    let label = Label::new();
    label.borrow_mut().set_lang("de");
    label.borrow_mut().set_content("Kiste & Deckel");
    let parent: meta::ElementRef = bar.clone();
    meta::add_child(&parent, label).unwrap();

    let text = meta::to_xml_string(&parent, true).unwrap();
    let root = loader().load_str(&text).unwrap();

    let loaded = meta::downcast_ref::<Bar>(&root).unwrap();
    assert_eq!(loaded.id(), Some("b7"));
    assert_eq!(
        loaded.permissions(),
        Some(Permission::WRITE | Permission::EXECUTE)
    );
    assert_eq!(loaded.weight(), Some(f64::INFINITY));
    assert_eq!(loaded.size(), Some(-4));
    assert_eq!(loaded.visible(), Some(false));

    let labels = loaded.children_of::<Label>();
    let label = meta::downcast_ref::<Label>(&labels[0]).unwrap();
    assert_eq!(label.lang(), Some("de"));
    assert_eq!(label.content(), Some("Kiste & Deckel"));
}
