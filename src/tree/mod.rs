//! Arena-based XML document tree.
//!
//! This is the element store the keyed layer builds on. All nodes live in a
//! contiguous `Vec<NodeData>` owned by the `Document` and are referenced by
//! `NodeId`, a newtype over `NonZeroU32`.
//!
//! Nodes are never freed individually. Detaching a node makes it unreachable
//! but leaves it in the arena; dropping the `Document` frees everything at
//! once.
//!
//! # Architecture
//!
//! Navigation links (parent, first\_child, last\_child, next\_sibling,
//! prev\_sibling) are arena indices rather than pointers, which keeps the
//! borrow checker out of tree surgery and avoids reference cycles.

mod node;

pub use node::NodeKind;

use std::num::NonZeroU32;

/// A typed index into the document's node arena.
///
/// `Option<NodeId>` has the same size as `NodeId` (niche optimization).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NodeId(NonZeroU32);

impl NodeId {
    /// Creates a `NodeId` from a raw index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is 0.
    #[allow(clippy::expect_used, clippy::cast_possible_truncation)]
    fn from_index(index: usize) -> Self {
        Self(NonZeroU32::new(index as u32).expect("NodeId index must be non-zero"))
    }

    /// Returns the raw index as a `usize` for indexing into the arena.
    fn as_index(self) -> usize {
        self.0.get() as usize
    }
}

/// Storage for a single node in the document arena.
#[derive(Debug, Clone)]
pub struct NodeData {
    /// What kind of node this is and its payload.
    pub kind: NodeKind,
    /// Parent node, if any. The document node and detached nodes have none.
    pub parent: Option<NodeId>,
    /// First child node.
    pub first_child: Option<NodeId>,
    /// Last child node (for O(1) append).
    pub last_child: Option<NodeId>,
    /// Next sibling.
    pub next_sibling: Option<NodeId>,
    /// Previous sibling.
    pub prev_sibling: Option<NodeId>,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            first_child: None,
            last_child: None,
            next_sibling: None,
            prev_sibling: None,
        }
    }
}

/// An attribute on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// The attribute name.
    pub name: String,
    /// The attribute value, unescaped.
    pub value: String,
}

/// An in-memory XML document.
///
/// The `Document` owns all nodes in an arena. Navigation goes through
/// `&Document`, mutation through `&mut Document`.
///
/// # Examples
///
/// ```
/// use xmlpp::tree::Document;
///
/// let mut doc = Document::new();
/// let root = doc.create_element("root");
/// doc.append_child(doc.root(), root);
/// doc.set_text(root, "hello");
/// assert_eq!(doc.element_text(root), Some("hello"));
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    /// The node arena. Index 0 is unused (placeholder for `NonZeroU32`).
    nodes: Vec<NodeData>,
    /// The document node id (not the root element).
    root: NodeId,
}

impl Document {
    /// Creates a new empty document containing only the document node.
    #[must_use]
    pub fn new() -> Self {
        let mut nodes = Vec::with_capacity(64);
        // Index 0: placeholder (NodeId uses NonZeroU32)
        nodes.push(NodeData::new(NodeKind::Document));
        nodes.push(NodeData::new(NodeKind::Document));
        Self {
            nodes,
            root: NodeId::from_index(1),
        }
    }

    /// Returns the document node id.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns a reference to the `NodeData` for the given node.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this document.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.as_index()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.as_index()]
    }

    /// Returns the tag name of an element node.
    #[must_use]
    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Returns the value of a text, comment, or declaration node.
    ///
    /// For element nodes this is the tag name, like tinyxml2's `Value()`.
    #[must_use]
    pub fn node_value(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Element { name, .. } => Some(name),
            NodeKind::Text { content }
            | NodeKind::Comment { content }
            | NodeKind::Declaration { content } => Some(content),
            NodeKind::Document => None,
        }
    }

    /// Replaces the value of a text, comment, or declaration node.
    ///
    /// Elements and the document node are left unchanged.
    pub fn set_node_value(&mut self, id: NodeId, value: &str) {
        match &mut self.node_mut(id).kind {
            NodeKind::Text { content }
            | NodeKind::Comment { content }
            | NodeKind::Declaration { content } => {
                content.clear();
                content.push_str(value);
            }
            NodeKind::Element { .. } | NodeKind::Document => {}
        }
    }

    /// Returns the text of an element: the content of its first child when
    /// that child is a text node.
    #[must_use]
    pub fn element_text(&self, id: NodeId) -> Option<&str> {
        let first = self.first_child(id)?;
        match &self.node(first).kind {
            NodeKind::Text { content } => Some(content),
            _ => None,
        }
    }

    /// Sets the text of an element.
    ///
    /// Replaces the first child if it is already a text node, otherwise
    /// inserts a new text node as the first child.
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        if let Some(first) = self.first_child(id) {
            if let NodeKind::Text { content } = &mut self.node_mut(first).kind {
                content.clear();
                content.push_str(text);
                return;
            }
        }
        let node = self.create_text(text);
        self.prepend_child(id, node);
    }

    /// Returns the attributes of an element node.
    ///
    /// Returns an empty slice for non-element nodes.
    #[must_use]
    pub fn attributes(&self, id: NodeId) -> &[Attribute] {
        match &self.node(id).kind {
            NodeKind::Element { attributes, .. } => attributes,
            _ => &[],
        }
    }

    /// Returns the value of an attribute by name on an element node.
    #[must_use]
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attributes(id)
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Sets an attribute on an element, replacing any existing value.
    ///
    /// New attributes are appended after existing ones. Non-element nodes
    /// are left unchanged.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        let NodeKind::Element { attributes, .. } = &mut self.node_mut(id).kind else {
            return;
        };
        if let Some(attr) = attributes.iter_mut().find(|a| a.name == name) {
            attr.value.clear();
            attr.value.push_str(value);
        } else {
            attributes.push(Attribute {
                name: name.to_string(),
                value: value.to_string(),
            });
        }
    }

    // --- Navigation ---

    /// Returns the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Returns the first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).first_child
    }

    /// Returns the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).last_child
    }

    /// Returns the next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).next_sibling
    }

    /// Returns the previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).prev_sibling
    }

    /// Returns an iterator over the children of a node.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            doc: self,
            next: self.node(id).first_child,
        }
    }

    /// Returns an iterator over the element children of a node with the
    /// given tag name, in document order.
    pub fn children_named<'a>(
        &'a self,
        id: NodeId,
        name: &'a str,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.children(id)
            .filter(move |&child| self.node_name(child) == Some(name))
    }

    /// Returns an iterator over all descendants of a node (depth-first).
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            doc: self,
            root: id,
            next: self.first_child(id),
        }
    }

    // --- Mutation ---

    /// Allocates a new detached node in the arena and returns its `NodeId`.
    pub fn create_node(&mut self, kind: NodeKind) -> NodeId {
        let index = self.nodes.len();
        self.nodes.push(NodeData::new(kind));
        NodeId::from_index(index)
    }

    /// Allocates a detached element with no attributes.
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.create_node(NodeKind::element(name))
    }

    /// Allocates a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.create_node(NodeKind::Text {
            content: text.to_string(),
        })
    }

    /// Allocates a detached comment node.
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.create_node(NodeKind::Comment {
            content: text.to_string(),
        })
    }

    /// Allocates a detached declaration node with preformatted content.
    pub fn create_declaration(&mut self, content: &str) -> NodeId {
        self.create_node(NodeKind::Declaration {
            content: content.to_string(),
        })
    }

    /// Appends a child node to the end of a parent's child list.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if `child` already has a parent.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(
            self.node(child).parent.is_none(),
            "child already has a parent"
        );

        self.node_mut(child).parent = Some(parent);

        if let Some(last) = self.node(parent).last_child {
            self.node_mut(last).next_sibling = Some(child);
            self.node_mut(child).prev_sibling = Some(last);
            self.node_mut(parent).last_child = Some(child);
        } else {
            self.node_mut(parent).first_child = Some(child);
            self.node_mut(parent).last_child = Some(child);
        }
    }

    /// Inserts `new_child` before `reference` in the parent's child list.
    ///
    /// # Panics
    ///
    /// Panics if `reference` has no parent, or in debug builds if
    /// `new_child` already has a parent.
    #[allow(clippy::expect_used)]
    pub fn insert_before(&mut self, reference: NodeId, new_child: NodeId) {
        debug_assert!(
            self.node(new_child).parent.is_none(),
            "new_child already has a parent"
        );

        let parent = self
            .node(reference)
            .parent
            .expect("reference has no parent");
        self.node_mut(new_child).parent = Some(parent);

        if let Some(prev) = self.node(reference).prev_sibling {
            self.node_mut(prev).next_sibling = Some(new_child);
            self.node_mut(new_child).prev_sibling = Some(prev);
        } else {
            self.node_mut(parent).first_child = Some(new_child);
        }

        self.node_mut(new_child).next_sibling = Some(reference);
        self.node_mut(reference).prev_sibling = Some(new_child);
    }

    /// Inserts `new_child` right after `reference` in the parent's child list.
    ///
    /// # Panics
    ///
    /// Panics if `reference` has no parent, or in debug builds if
    /// `new_child` already has a parent.
    #[allow(clippy::expect_used)]
    pub fn insert_after(&mut self, reference: NodeId, new_child: NodeId) {
        if let Some(next) = self.next_sibling(reference) {
            self.insert_before(next, new_child);
            return;
        }
        let parent = self
            .node(reference)
            .parent
            .expect("reference has no parent");
        self.append_child(parent, new_child);
    }

    /// Prepends a child node as the first child of a parent.
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) {
        if let Some(first) = self.first_child(parent) {
            self.insert_before(first, child);
        } else {
            self.append_child(parent, child);
        }
    }

    /// Returns the total number of nodes in the arena (including the
    /// document node, excluding the placeholder).
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len() - 1
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

// --- Iterators ---

/// Iterator over the children of a node.
pub struct Children<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.node(current).next_sibling;
        Some(current)
    }
}

/// Depth-first iterator over all descendants of a node.
pub struct Descendants<'a> {
    doc: &'a Document,
    root: NodeId,
    next: Option<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;

        if let Some(child) = self.doc.first_child(current) {
            self.next = Some(child);
            return Some(current);
        }

        if let Some(sibling) = self.doc.next_sibling(current) {
            self.next = Some(sibling);
            return Some(current);
        }

        // Walk up to find an ancestor with a next sibling
        let mut ancestor = self.doc.parent(current);
        while let Some(anc) = ancestor {
            if anc == self.root {
                break;
            }
            if let Some(sibling) = self.doc.next_sibling(anc) {
                self.next = Some(sibling);
                return Some(current);
            }
            ancestor = self.doc.parent(anc);
        }

        self.next = None;
        Some(current)
    }
}
