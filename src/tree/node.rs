//! Node type definitions.
//!
//! The `NodeKind` enum covers the node types the keyed layer can build.
//! Each variant carries its payload; links live in `NodeData`.

use super::Attribute;

/// The kind of an XML node and its associated data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The document node. There is exactly one per `Document`.
    Document,

    /// An element node, e.g., `<item id="1">`.
    Element {
        /// The tag name, stored verbatim.
        name: String,
        /// Attributes in insertion order. Names are unique per element.
        attributes: Vec<Attribute>,
    },

    /// A text node. Stored unescaped; the printer escapes on output.
    Text {
        /// The character data.
        content: String,
    },

    /// A comment node, e.g., `<!-- ... -->`.
    Comment {
        /// The comment text (without the `<!--` and `-->` delimiters).
        content: String,
    },

    /// An XML declaration, printed as `<?content?>`.
    ///
    /// The content is kept preformatted (e.g., `xml version="1.0"`) so the
    /// owner can rewrite it in place.
    Declaration {
        /// Everything between `<?` and `?>`.
        content: String,
    },
}

impl NodeKind {
    /// Creates an element kind with no attributes.
    #[must_use]
    pub fn element(name: &str) -> Self {
        Self::Element {
            name: name.to_string(),
            attributes: Vec::new(),
        }
    }

    /// Returns `true` for element nodes.
    #[must_use]
    pub fn is_element(&self) -> bool {
        matches!(self, Self::Element { .. })
    }
}
