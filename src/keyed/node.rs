//! Wrapper handles.
//!
//! A wrapper pairs one tree element with a cache of the child wrappers
//! created through it, keyed by tag name. Wrappers live in the owning
//! [`KeyedDocument`]'s arena and are addressed by [`Handle`]; the
//! [`NodeMut`] and [`NodeRef`] views borrow the document and name one
//! wrapper.
//!
//! Because the cache lives in the arena rather than in the handle, copying
//! a `Handle` shares the cache: a copy can never re-create an element that
//! the handle it was copied from already created.

use std::collections::HashMap;
use std::fmt;

use log::trace;

use super::scalar::FromText;
use super::KeyedDocument;
use crate::error::ValueError;
use crate::tree::NodeId;

/// Tag name to wrappers created under that name, in creation order.
///
/// Keyed access always resolves to the first entry; later entries come
/// from `append` and are only reachable through the handles it returned.
pub(crate) type ChildCache = HashMap<String, Vec<Handle>>;

/// Identifies one wrapper inside a [`KeyedDocument`].
///
/// Handles are cheap to copy, store, and compare. Each one records the
/// document that issued it, and that document rejects handles from any
/// other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle {
    document: u32,
    index: u32,
}

impl Handle {
    #[allow(clippy::cast_possible_truncation)]
    fn new(document: u32, index: usize) -> Self {
        Self {
            document,
            index: index as u32,
        }
    }

    pub(crate) fn document(self) -> u32 {
        self.document
    }

    pub(crate) fn as_index(self) -> usize {
        self.index as usize
    }
}

/// Arena entry: one element and the wrappers created beneath it.
#[derive(Debug)]
pub(crate) struct Wrapper {
    pub(crate) element: NodeId,
    pub(crate) children: ChildCache,
}

/// Where a new wrapper gets linked: directly under the document node, or
/// under another wrapper's element.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Parent {
    Top,
    Node(Handle),
}

pub(crate) fn first_cached(cache: &ChildCache, key: &str) -> Option<Handle> {
    cache.get(key).and_then(|list| list.first().copied())
}

impl KeyedDocument {
    pub(crate) fn wrapper(&self, handle: Handle) -> &Wrapper {
        &self.wrappers[handle.as_index()]
    }

    fn cache(&self, parent: Parent) -> &ChildCache {
        match parent {
            Parent::Top => &self.top,
            Parent::Node(h) => &self.wrapper(h).children,
        }
    }

    /// Creates a new element named `key` as the last child of `parent`,
    /// wraps it, and records the wrapper in the parent's cache.
    pub(crate) fn create_wrapper(&mut self, parent: Parent, key: &str) -> Handle {
        let parent_element = match parent {
            Parent::Top => self.tree.root(),
            Parent::Node(h) => self.wrapper(h).element,
        };
        let element = self.tree.create_element(key);
        self.tree.append_child(parent_element, element);

        let handle = Handle::new(self.id, self.wrappers.len());
        self.wrappers.push(Wrapper {
            element,
            children: ChildCache::new(),
        });
        let cache = match parent {
            Parent::Top => &mut self.top,
            Parent::Node(h) => &mut self.wrappers[h.as_index()].children,
        };
        let list = cache.entry(key.to_string()).or_default();
        list.push(handle);
        trace!(
            "created <{key}> under {parent:?} ({} cached under this key)",
            list.len()
        );
        handle
    }

    /// Returns the first wrapper cached under `key`, creating it on a miss.
    pub(crate) fn child_or_create(&mut self, parent: Parent, key: &str) -> Handle {
        if let Some(handle) = first_cached(self.cache(parent), key) {
            return handle;
        }
        self.create_wrapper(parent, key)
    }
}

/// A mutable view of one wrapper.
///
/// Obtained from [`KeyedDocument::child`] or [`KeyedDocument::node`], and
/// from the keyed access methods of another `NodeMut`.
///
/// # Examples
///
/// ```
/// use xmlpp::KeyedDocument;
///
/// let mut doc = KeyedDocument::with_declaration("1.0", "utf-8", None);
/// doc.child("root").child("name").set("archer");
/// doc.child("root").child("age").set(10);
///
/// assert_eq!(doc.child("root").child("age").as_i32(), 10);
/// ```
pub struct NodeMut<'a> {
    doc: &'a mut KeyedDocument,
    handle: Handle,
}

impl<'a> NodeMut<'a> {
    pub(crate) fn new(doc: &'a mut KeyedDocument, handle: Handle) -> Self {
        Self { doc, handle }
    }

    /// Returns the handle of this wrapper, for re-entering it later through
    /// [`KeyedDocument::node`].
    #[must_use]
    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// Returns the wrapped element's id in the underlying tree.
    #[must_use]
    pub fn element(&self) -> NodeId {
        self.doc.wrapper(self.handle).element
    }

    /// Returns a read-only view of this wrapper.
    #[must_use]
    pub fn view(&self) -> NodeRef<'_> {
        NodeRef {
            doc: &*self.doc,
            handle: self.handle,
        }
    }

    /// Keyed access: returns the first child wrapper created under `key`,
    /// creating the element and its wrapper if there is none yet.
    ///
    /// Never fails. Repeated calls with the same key return the same
    /// element.
    pub fn child(&mut self, key: &str) -> NodeMut<'_> {
        let handle = self.doc.child_or_create(Parent::Node(self.handle), key);
        NodeMut::new(self.doc, handle)
    }

    /// Like [`child`](Self::child), but consumes this view so the result
    /// can outlive it.
    #[must_use]
    pub fn into_child(self, key: &str) -> NodeMut<'a> {
        let handle = self.doc.child_or_create(Parent::Node(self.handle), key);
        NodeMut::new(self.doc, handle)
    }

    /// Always creates a new child element named `key` after the existing
    /// children, and returns its wrapper.
    ///
    /// Use this for repeated elements. Keyed access keeps resolving to the
    /// first element created under `key`, so keep the returned handle to
    /// reach the new element again.
    ///
    /// # Examples
    ///
    /// ```
    /// use xmlpp::KeyedDocument;
    ///
    /// let mut doc = KeyedDocument::new();
    /// let mut root = doc.child("root");
    /// root.append("info").child("name").set("jason");
    /// let lily = root.append("info").handle();
    ///
    /// doc.node(lily).child("name").set("lily");
    /// assert_eq!(doc.get("root").unwrap().get("info").unwrap().get("name").unwrap().text(), "jason");
    /// ```
    pub fn append(&mut self, key: &str) -> NodeMut<'_> {
        let handle = self.doc.create_wrapper(Parent::Node(self.handle), key);
        NodeMut::new(self.doc, handle)
    }

    /// Like [`append`](Self::append), but consumes this view.
    #[must_use]
    pub fn into_append(self, key: &str) -> NodeMut<'a> {
        let handle = self.doc.create_wrapper(Parent::Node(self.handle), key);
        NodeMut::new(self.doc, handle)
    }

    /// Sets the element's text to the `Display` form of `value`, replacing
    /// any previous text.
    pub fn set<V: fmt::Display>(&mut self, value: V) -> &mut Self {
        let element = self.element();
        self.doc.tree.set_text(element, &value.to_string());
        self
    }

    /// Sets an attribute on the element, replacing an existing value.
    pub fn set_attribute(&mut self, name: &str, value: &str) -> &mut Self {
        let element = self.element();
        self.doc.tree.set_attribute(element, name, value);
        self
    }

    /// Appends a comment as the element's last child.
    pub fn add_comment(&mut self, text: &str) -> &mut Self {
        let element = self.element();
        let comment = self.doc.tree.create_comment(text);
        self.doc.tree.append_child(element, comment);
        self
    }

    /// Returns the element's tag name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.view().name()
    }

    /// Returns the element's text, if it has any.
    #[must_use]
    pub fn text_opt(&self) -> Option<&str> {
        self.view().text_opt()
    }

    /// Returns the element's text, or `""` if it has none.
    #[must_use]
    pub fn text(&self) -> &str {
        self.view().text()
    }

    /// Returns the value of an attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.view().attribute(name)
    }

    /// Reads the text as an `i32`. See [`NodeRef::value`].
    #[must_use]
    pub fn as_i32(&self) -> i32 {
        self.view().as_i32()
    }

    /// Reads the text as a platform `long` (`isize`). See [`NodeRef::value`].
    #[must_use]
    pub fn as_long(&self) -> isize {
        self.view().as_long()
    }

    /// Reads the text as an `i64`. See [`NodeRef::value`].
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.view().as_i64()
    }

    /// Reads the text as an `f64`. See [`NodeRef::value`].
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        self.view().as_f64()
    }

    /// Lenient typed read. See [`NodeRef::value`].
    #[must_use]
    pub fn value<T: FromText>(&self) -> T {
        self.view().value()
    }

    /// Strict typed read. See [`NodeRef::try_value`].
    ///
    /// # Errors
    ///
    /// See [`NodeRef::try_value`].
    pub fn try_value<T: FromText>(&self) -> Result<T, ValueError> {
        self.view().try_value()
    }
}

impl fmt::Debug for NodeMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.view(), f)
    }
}

/// A read-only view of one wrapper.
///
/// Lookups through a `NodeRef` never create elements: [`get`](Self::get)
/// only follows wrappers that already exist.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    doc: &'a KeyedDocument,
    handle: Handle,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(doc: &'a KeyedDocument, handle: Handle) -> Self {
        Self { doc, handle }
    }

    /// Returns the handle of this wrapper.
    #[must_use]
    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// Returns the wrapped element's id in the underlying tree.
    #[must_use]
    pub fn element(&self) -> NodeId {
        self.doc.wrapper(self.handle).element
    }

    /// Returns the first child wrapper created under `key`, without creating
    /// one on a miss.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<NodeRef<'a>> {
        let children = &self.doc.wrapper(self.handle).children;
        first_cached(children, key).map(|handle| NodeRef::new(self.doc, handle))
    }

    /// Returns every child wrapper cached under `key`, the keyed one first,
    /// then appended ones in creation order.
    pub fn get_all(&self, key: &str) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let doc = self.doc;
        doc.wrapper(self.handle)
            .children
            .get(key)
            .into_iter()
            .flatten()
            .map(move |&handle| NodeRef::new(doc, handle))
    }

    /// Returns the element's tag name.
    #[must_use]
    pub fn name(&self) -> &'a str {
        self.doc.tree.node_name(self.element()).unwrap_or_default()
    }

    /// Returns the element's text, if it has any.
    #[must_use]
    pub fn text_opt(&self) -> Option<&'a str> {
        self.doc.tree.element_text(self.element())
    }

    /// Returns the element's text, or `""` if it has none.
    #[must_use]
    pub fn text(&self) -> &'a str {
        self.text_opt().unwrap_or_default()
    }

    /// Returns the value of an attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.doc.tree.attribute(self.element(), name)
    }

    /// Reads the text as an `i32`, or 0.
    #[must_use]
    pub fn as_i32(&self) -> i32 {
        self.value()
    }

    /// Reads the text as a platform `long` (`isize`), or 0.
    #[must_use]
    pub fn as_long(&self) -> isize {
        self.value()
    }

    /// Reads the text as an `i64`, or 0.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.value()
    }

    /// Reads the text as an `f64`, or 0.0.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        self.value()
    }

    /// Lenient typed read.
    ///
    /// Absent text yields the type's zero value. Present text is parsed
    /// like the C library does: leading whitespace skipped, the longest
    /// numeric prefix used, zero when there is none.
    #[must_use]
    pub fn value<T: FromText>(&self) -> T {
        match self.text_opt() {
            Some(text) => T::from_text(text),
            None => T::absent(),
        }
    }

    /// Strict typed read.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::Missing`] if the element has no text, and
    /// [`ValueError::Malformed`] if the trimmed text is not a valid `T`.
    pub fn try_value<T: FromText>(&self) -> Result<T, ValueError> {
        let Some(text) = self.text_opt() else {
            return Err(ValueError::Missing {
                element: self.name().to_string(),
            });
        };
        T::parse_text(text).ok_or_else(|| ValueError::Malformed {
            element: self.name().to_string(),
            text: text.to_string(),
            target: T::TYPE_NAME,
        })
    }
}

/// Views are equal when they wrap the same element of the same document.
impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.element() == other.element()
    }
}

impl Eq for NodeRef<'_> {}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("handle", &self.handle)
            .field("name", &self.name())
            .field("text", &self.text_opt())
            .finish()
    }
}

macro_rules! impl_from_node_ref {
    ($($ty:ty),*) => {$(
        impl From<NodeRef<'_>> for $ty {
            fn from(node: NodeRef<'_>) -> Self {
                node.value()
            }
        }
    )*};
}

impl_from_node_ref!(String, i32, i64, isize, f64);
