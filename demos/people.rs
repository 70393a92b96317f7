//! Building repeated records with `append` and reading them back.
//!
//! Run with: `cargo run --example people`

use xmlpp::KeyedDocument;

fn main() {
    let people = [("jason", 10, 1.32), ("lily", 7, 1.18)];

    let mut doc = KeyedDocument::with_declaration("1.0", "utf-8", None);
    doc.add_comment("generated by the people example");

    let mut root = doc.child("root");
    root.set_attribute("count", &people.len().to_string());
    for (name, age, height) in people {
        let mut info = root.append("info");
        info.child("name").set(name);
        info.child("age").set(age);
        info.child("height").set(height);
    }

    println!("{}", doc.serialize());

    // Keyed access only sees the first `info`; the rest are reached by
    // walking every wrapper cached under that key.
    if let Some(root) = doc.get("root") {
        for info in root.get_all("info") {
            let name = info.get("name").map(|n| n.text()).unwrap_or_default();
            let age = info.get("age").map_or(0, |a| a.as_i32());
            let height = info.get("height").map_or(0.0, |h| h.as_f64());
            println!("{name}: {age} years, {height} m");
        }
    }
}
