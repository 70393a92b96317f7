#![no_main]
use libfuzzer_sys::fuzz_target;
use xmlpp::{Handle, KeyedDocument};

// Interprets the input as a stream of keyed operations. Each line is
// `<op><key>[=<value>]`; building, reading, and serializing must never panic,
// and keyed access must stay idempotent.
fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let mut doc = KeyedDocument::with_declaration("1.0", "utf-8", None);
    let mut handles: Vec<Handle> = vec![doc.child("root").handle()];

    for line in s.lines().take(256) {
        let mut chars = line.chars();
        let Some(op) = chars.next() else { continue };
        let rest = chars.as_str();
        let (key, value) = rest.split_once('=').unwrap_or((rest, ""));
        let parent = handles[line.len() % handles.len()];
        let mut node = doc.node(parent);
        match op {
            'c' => {
                let first = node.child(key).handle();
                assert_eq!(node.child(key).handle(), first);
                handles.push(first);
            }
            'a' => handles.push(node.append(key).handle()),
            's' => {
                node.set(value);
                assert_eq!(node.text(), value);
            }
            '@' => {
                node.set_attribute(key, value);
            }
            '!' => {
                node.add_comment(value);
            }
            'r' => {
                let _ = node.as_i64();
                let _ = node.as_f64();
                let _ = node.try_value::<i32>();
            }
            'd' => doc.set_declaration(key, value, None),
            _ => {}
        }
    }

    let text = doc.serialize().to_string();
    assert_eq!(text, doc.to_string());
    let _ = doc.to_bytes();
});
