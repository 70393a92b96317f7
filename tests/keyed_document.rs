//! End-to-end behavior of keyed documents: building, reading back, and
//! printing.

use xmlpp::tree::NodeKind;
use xmlpp::{KeyedDocument, PrintOptions, ValueError};

fn element_names(doc: &KeyedDocument) -> Vec<String> {
    let tree = doc.tree();
    tree.descendants(tree.root())
        .filter_map(|id| tree.node_name(id).map(str::to_string))
        .collect()
}

// --- Building ---

#[test]
fn test_archer_document() {
    let mut doc = KeyedDocument::with_declaration("1.0", "utf-8", None);
    doc.child("root").child("name").set("archer");
    doc.child("root").child("age").set(10);
    doc.child("root").child("info").child("tel").set("1000229");

    let expected = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
                    <root>\n\
                    \x20   <name>archer</name>\n\
                    \x20   <age>10</age>\n\
                    \x20   <info>\n\
                    \x20       <tel>1000229</tel>\n\
                    \x20   </info>\n\
                    </root>\n";
    assert_eq!(doc.serialize(), expected);
}

#[test]
fn test_key_is_created_once() {
    let mut doc = KeyedDocument::new();
    assert!(doc.get("root").is_none());

    doc.child("root").child("age");
    doc.child("root").child("age");
    doc.child("root").child("age").set(3);

    assert_eq!(element_names(&doc), vec!["root", "age"]);
    assert_eq!(doc.wrapper_count(), 2);
}

#[test]
fn test_keys_are_case_sensitive() {
    let mut doc = KeyedDocument::new();
    let mut root = doc.child("root");
    let lower = root.child("name").handle();
    let upper = root.child("Name").handle();
    assert_ne!(lower, upper);
    assert_eq!(element_names(&doc), vec!["root", "name", "Name"]);
}

#[test]
fn test_array_of_records() {
    let mut doc = KeyedDocument::with_declaration("1.0", "utf-8", None);
    let mut root = doc.child("root");

    let mut jason = root.append("info");
    jason.child("name").set("jason");
    jason.child("age").set(10);

    let mut lily = root.append("info");
    lily.child("name").set("lily");
    lily.child("age").set(7);

    let expected = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
                    <root>\n\
                    \x20   <info>\n\
                    \x20       <name>jason</name>\n\
                    \x20       <age>10</age>\n\
                    \x20   </info>\n\
                    \x20   <info>\n\
                    \x20       <name>lily</name>\n\
                    \x20       <age>7</age>\n\
                    \x20   </info>\n\
                    </root>\n";
    assert_eq!(doc.serialize(), expected);
}

#[test]
fn test_keyed_access_resolves_to_first_appended() {
    let mut doc = KeyedDocument::new();
    let mut root = doc.child("root");
    root.append("info").child("name").set("jason");
    root.append("info").child("name").set("lily");

    assert_eq!(root.child("info").child("name").text(), "jason");

    let root = doc.get("root").expect("root exists");
    let names: Vec<&str> = root
        .get_all("info")
        .filter_map(|info| info.get("name"))
        .map(|name| name.text())
        .collect();
    assert_eq!(names, vec!["jason", "lily"]);
}

#[test]
fn test_handles_share_one_cache() {
    let mut doc = KeyedDocument::new();
    let root = doc.child("root").handle();
    let copy = root;

    doc.node(root).child("a").set(1);
    doc.node(copy).child("a").set(2);

    assert_eq!(element_names(&doc), vec!["root", "a"]);
    assert_eq!(doc.node_ref(root).get("a").map(|a| a.as_i32()), Some(2));
}

#[test]
fn test_wrappers_match_elements_one_to_one() {
    let mut doc = KeyedDocument::new();
    {
        let mut root = doc.child("root");
        for _ in 0..3 {
            let mut item = root.append("item");
            item.child("id");
            item.child("id");
        }
        root.child("tail");
    }
    let tree = doc.tree();
    let elements = tree
        .descendants(tree.root())
        .filter(|&id| tree.node(id).kind.is_element())
        .count();
    assert_eq!(elements, 8);
    assert_eq!(doc.wrapper_count(), elements);
}

// --- Declarations and comments ---

#[test]
fn test_declaration_replaced_not_duplicated() {
    let mut doc = KeyedDocument::with_declaration("1.0", "utf-8", None);
    doc.child("root");
    doc.set_declaration("1.0", "ISO-8859-1", Some("yes"));

    let tree = doc.tree();
    let declarations: Vec<_> = tree
        .children(tree.root())
        .filter(|&id| matches!(tree.node(id).kind, NodeKind::Declaration { .. }))
        .collect();
    assert_eq!(declarations.len(), 1);
    assert!(doc.serialize().starts_with(
        "<?xml version=\"1.0\" encoding=\"ISO-8859-1\" standalone=\"yes\"?>\n<root/>"
    ));
}

#[test]
fn test_element_comment_is_last_child() {
    let mut doc = KeyedDocument::new();
    doc.set_print_options(PrintOptions::compact());
    let mut root = doc.child("root");
    root.child("a").set(1);
    root.add_comment("after a");
    root.child("b").set(2);
    assert_eq!(
        doc.serialize(),
        "<root><a>1</a><!--after a--><b>2</b></root>"
    );
}

// --- Reading values ---

#[test]
fn test_scalar_round_trips() {
    let mut doc = KeyedDocument::new();
    let mut v = doc.child("values");
    v.child("text").set("hello world");
    v.child("int").set(-42_i32);
    v.child("long").set(2_000_000_000_isize);
    v.child("int64").set(1_234_567_890_123_i64);
    v.child("double").set(3.5_f64);

    assert_eq!(v.child("text").text(), "hello world");
    assert_eq!(v.child("int").as_i32(), -42);
    assert_eq!(v.child("long").as_long(), 2_000_000_000);
    assert_eq!(v.child("int64").as_i64(), 1_234_567_890_123);
    assert!((v.child("double").as_f64() - 3.5).abs() < f64::EPSILON);
}

#[test]
fn test_absent_text_reads_as_zero() {
    let mut doc = KeyedDocument::new();
    let mut v = doc.child("values");
    assert_eq!(v.child("missing").as_i32(), 0);
    assert_eq!(v.child("missing").as_long(), 0);
    assert_eq!(v.child("missing").as_i64(), 0);
    assert_eq!(v.child("missing").as_f64().to_bits(), 0.0_f64.to_bits());
    assert_eq!(v.child("missing").text(), "");
    assert_eq!(v.child("missing").text_opt(), None);
}

#[test]
fn test_malformed_text_lenient_and_strict() {
    let mut doc = KeyedDocument::new();
    doc.child("width").set("42px");
    doc.child("ratio").set("abc");

    let width = doc.get("width").expect("width exists");
    assert_eq!(width.as_i32(), 42);
    assert!(matches!(
        width.try_value::<i32>(),
        Err(ValueError::Malformed { target: "i32", .. })
    ));

    let ratio = doc.get("ratio").expect("ratio exists");
    assert_eq!(ratio.as_f64().to_bits(), 0.0_f64.to_bits());
    assert!(ratio.try_value::<f64>().is_err());
}

#[test]
fn test_text_with_markup_is_escaped_and_read_back() {
    let mut doc = KeyedDocument::new();
    doc.set_print_options(PrintOptions::compact());
    doc.child("expr").set("a < b && c > d");
    doc.child("expr").set_attribute("note", "\"quoted\"");

    assert_eq!(doc.get("expr").map(|e| e.text()), Some("a < b && c > d"));
    assert_eq!(
        doc.serialize(),
        "<expr note=\"&quot;quoted&quot;\">a &lt; b &amp;&amp; c &gt; d</expr>"
    );
}

#[test]
fn test_display_matches_serialize() {
    let mut doc = KeyedDocument::with_declaration("1.0", "utf-8", None);
    doc.child("root").child("x").set(1);
    let shown = doc.to_string();
    assert_eq!(doc.serialize(), shown);
}
