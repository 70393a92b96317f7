//! Keyed, chainable document building.
//!
//! [`KeyedDocument`] owns an XML tree and lets callers address elements by
//! tag name, creating them on first use:
//!
//! ```
//! use xmlpp::KeyedDocument;
//!
//! let mut doc = KeyedDocument::with_declaration("1.0", "utf-8", None);
//! doc.child("root").child("name").set("archer");
//! doc.child("root").child("age").set(10);
//! doc.child("root").child("info").child("tel").set("1000229");
//!
//! assert_eq!(
//!     doc.serialize(),
//!     "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
//!      <root>\n\
//!      \x20   <name>archer</name>\n\
//!      \x20   <age>10</age>\n\
//!      \x20   <info>\n\
//!      \x20       <tel>1000229</tel>\n\
//!      \x20   </info>\n\
//!      </root>\n"
//! );
//! ```
//!
//! Two access contracts coexist. `child(key)` is get-or-create: the first
//! call creates an element, every later call with the same key returns
//! that same element. `append(key)` always creates a new sibling; those
//! extra siblings are reached through the returned handle, not through
//! `child(key)`.

pub mod node;
pub mod scalar;

pub use node::{Handle, NodeMut, NodeRef};
pub use scalar::FromText;

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE};
use log::{debug, warn};

use crate::serial::{self, PrintOptions, Printer};
use crate::tree::{Document, NodeId};
use node::{first_cached, ChildCache, Parent, Wrapper};

static NEXT_DOCUMENT_ID: AtomicU32 = AtomicU32::new(0);

/// An XML document addressed by tag-name keys.
///
/// Owns the element tree, the declaration, the cache of top-level
/// wrappers, the arena of all wrappers, and its own print buffer.
#[derive(Debug)]
pub struct KeyedDocument {
    id: u32,
    tree: Document,
    declaration: Option<NodeId>,
    encoding: Option<String>,
    top: ChildCache,
    wrappers: Vec<Wrapper>,
    printer: Printer,
}

impl KeyedDocument {
    /// Creates an empty document with no declaration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: NEXT_DOCUMENT_ID.fetch_add(1, Ordering::Relaxed),
            tree: Document::new(),
            declaration: None,
            encoding: None,
            top: ChildCache::new(),
            wrappers: Vec::new(),
            printer: Printer::default(),
        }
    }

    /// Creates an empty document whose first node is an XML declaration.
    ///
    /// # Examples
    ///
    /// ```
    /// use xmlpp::KeyedDocument;
    ///
    /// let doc = KeyedDocument::with_declaration("1.0", "utf-8", Some("yes"));
    /// assert_eq!(
    ///     doc.declaration(),
    ///     Some("xml version=\"1.0\" encoding=\"utf-8\" standalone=\"yes\"")
    /// );
    /// ```
    #[must_use]
    pub fn with_declaration(version: &str, encoding: &str, standalone: Option<&str>) -> Self {
        let mut doc = Self::new();
        doc.set_declaration(version, encoding, standalone);
        doc
    }

    /// Sets the XML declaration.
    ///
    /// The first call inserts the declaration as the document's first node;
    /// later calls rewrite that node in place, so there is never more than
    /// one.
    pub fn set_declaration(&mut self, version: &str, encoding: &str, standalone: Option<&str>) {
        let mut content = format!("xml version=\"{version}\" encoding=\"{encoding}\"");
        if let Some(standalone) = standalone {
            content.push_str(" standalone=\"");
            content.push_str(standalone);
            content.push('"');
        }
        self.encoding = Some(encoding.to_string());

        if let Some(decl) = self.declaration {
            debug!("updating declaration: {content}");
            self.tree.set_node_value(decl, &content);
        } else {
            debug!("inserting declaration: {content}");
            let decl = self.tree.create_declaration(&content);
            let root = self.tree.root();
            self.tree.prepend_child(root, decl);
            self.declaration = Some(decl);
        }
    }

    /// Returns the declaration content (without `<?` and `?>`), if set.
    #[must_use]
    pub fn declaration(&self) -> Option<&str> {
        self.declaration.and_then(|decl| self.tree.node_value(decl))
    }

    /// Returns `true` once a declaration has been inserted.
    #[must_use]
    pub fn has_declaration(&self) -> bool {
        self.declaration.is_some()
    }

    /// Returns the encoding named by the declaration.
    #[must_use]
    pub fn encoding(&self) -> Option<&str> {
        self.encoding.as_deref()
    }

    /// Inserts a document-level comment.
    ///
    /// The comment goes right after the declaration, or first in the
    /// document when there is no declaration. Each call inserts at that
    /// same spot, so the most recent comment comes first.
    pub fn add_comment(&mut self, text: &str) {
        let comment = self.tree.create_comment(text);
        if let Some(decl) = self.declaration {
            self.tree.insert_after(decl, comment);
        } else {
            let root = self.tree.root();
            self.tree.prepend_child(root, comment);
        }
    }

    /// Keyed access to a top-level element, creating it on first use.
    ///
    /// New top-level elements are linked after everything already in the
    /// document.
    pub fn child(&mut self, key: &str) -> NodeMut<'_> {
        let handle = self.child_or_create(Parent::Top, key);
        NodeMut::new(self, handle)
    }

    /// Looks up a top-level element by key without creating it.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<NodeRef<'_>> {
        first_cached(&self.top, key).map(|handle| NodeRef::new(self, handle))
    }

    /// Re-enters a wrapper through a handle kept from an earlier access.
    ///
    /// # Panics
    ///
    /// Panics if `handle` was not issued by this document.
    pub fn node(&mut self, handle: Handle) -> NodeMut<'_> {
        assert!(self.owns(handle), "handle {handle:?} does not belong to this document");
        NodeMut::new(self, handle)
    }

    /// Read-only counterpart of [`node`](Self::node).
    ///
    /// # Panics
    ///
    /// Panics if `handle` was not issued by this document.
    #[must_use]
    pub fn node_ref(&self, handle: Handle) -> NodeRef<'_> {
        assert!(self.owns(handle), "handle {handle:?} does not belong to this document");
        NodeRef::new(self, handle)
    }

    fn owns(&self, handle: Handle) -> bool {
        handle.document() == self.id && handle.as_index() < self.wrappers.len()
    }

    /// Renders the whole document into this document's print buffer and
    /// returns the text.
    ///
    /// The buffer is cleared first, so the result always reflects the tree
    /// as it is now.
    pub fn serialize(&mut self) -> &str {
        self.printer.clear();
        self.printer.print(&self.tree);
        debug!("serialized document: {} bytes", self.printer.as_str().len());
        self.printer.as_str()
    }

    /// Serializes the document and encodes it in the declared encoding.
    ///
    /// UTF-16 labels produce a byte order mark followed by UTF-16 code
    /// units in the labelled byte order (`utf-16` alone means little-endian).
    /// Other encodings go through `encoding_rs`, and characters they cannot
    /// represent are written as numeric character references. Without a
    /// declaration the output is UTF-8. A label `encoding_rs` cannot encode
    /// into is also written as UTF-8 and logged as a warning.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let text = self.to_string();
        let Some(label) = self.encoding.as_deref() else {
            return text.into_bytes();
        };
        let Some(encoding) = Encoding::for_label(label.as_bytes()) else {
            warn!("unknown encoding {label:?}; writing UTF-8");
            return text.into_bytes();
        };
        if encoding == UTF_16LE || encoding == UTF_16BE {
            return encode_utf16(&text, encoding == UTF_16BE);
        }
        if encoding.output_encoding() != encoding {
            warn!("cannot encode into {}; writing UTF-8", encoding.name());
            return text.into_bytes();
        }
        let (bytes, used, unmappable) = encoding.encode(&text);
        if unmappable {
            debug!("some characters are not representable in {}", used.name());
        }
        bytes.into_owned()
    }

    /// Returns the options used when printing.
    #[must_use]
    pub fn print_options(&self) -> &PrintOptions {
        self.printer.options()
    }

    /// Replaces the options used when printing.
    pub fn set_print_options(&mut self, options: PrintOptions) {
        self.printer.set_options(options);
    }

    /// Borrows the underlying tree.
    #[must_use]
    pub fn tree(&self) -> &Document {
        &self.tree
    }

    /// Returns the number of wrappers this document owns.
    #[must_use]
    pub fn wrapper_count(&self) -> usize {
        self.wrappers.len()
    }
}

impl Default for KeyedDocument {
    fn default() -> Self {
        Self::new()
    }
}

fn encode_utf16(text: &str, big_endian: bool) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(2 * (text.len() + 1));
    for unit in std::iter::once(0xFEFF).chain(text.encode_utf16()) {
        let pair = if big_endian {
            unit.to_be_bytes()
        } else {
            unit.to_le_bytes()
        };
        bytes.extend_from_slice(&pair);
    }
    bytes
}

impl fmt::Display for KeyedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&serial::to_string(&self.tree, self.printer.options()))
    }
}
