//! XML printer.
//!
//! Renders a `Document` tree into text. The layout follows tinyxml2's
//! printer: the declaration and every top-level node on their own line,
//! element-only content indented one level per depth, and elements whose
//! only child is text kept on one line (`<age>10</age>`).

use crate::tree::{Document, NodeId, NodeKind};

/// Options controlling printed output.
///
/// # Examples
///
/// ```
/// use xmlpp::serial::PrintOptions;
///
/// let tabs = PrintOptions::default().indent_str("\t");
/// assert!(tabs.indent);
/// assert!(!PrintOptions::compact().indent);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintOptions {
    /// Whether to produce indented (pretty-printed) output.
    /// Defaults to `true`.
    pub indent: bool,
    /// The indentation string used for each level when `indent` is `true`.
    /// Defaults to four spaces.
    pub indent_str: String,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            indent: true,
            indent_str: "    ".to_string(),
        }
    }
}

impl PrintOptions {
    /// Options for compact output: no newlines, no indentation.
    #[must_use]
    pub fn compact() -> Self {
        Self::default().indent(false)
    }

    /// Enables or disables indented output.
    ///
    /// Mixed-content elements (text alongside element children) are never
    /// indented, since added whitespace would change their text.
    #[must_use]
    pub fn indent(mut self, indent: bool) -> Self {
        self.indent = indent;
        self
    }

    /// Sets the indentation string used for each nesting level.
    ///
    /// Only takes effect when [`indent`](Self::indent) is enabled.
    #[must_use]
    pub fn indent_str(mut self, s: &str) -> Self {
        self.indent_str = s.to_string();
        self
    }
}

/// A printer with an owned output buffer.
///
/// The buffer is reused across [`print`](Printer::print) calls; callers
/// [`clear`](Printer::clear) it first to get a fresh rendering.
///
/// # Examples
///
/// ```
/// use xmlpp::serial::{PrintOptions, Printer};
/// use xmlpp::tree::Document;
///
/// let mut doc = Document::new();
/// let root = doc.create_element("root");
/// doc.append_child(doc.root(), root);
///
/// let mut printer = Printer::new(PrintOptions::compact());
/// printer.print(&doc);
/// assert_eq!(printer.as_str(), "<root/>");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Printer {
    buffer: String,
    options: PrintOptions,
}

impl Printer {
    /// Creates a printer with an empty buffer.
    #[must_use]
    pub fn new(options: PrintOptions) -> Self {
        Self {
            buffer: String::new(),
            options,
        }
    }

    /// Empties the buffer, keeping its allocation.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Appends the rendering of the whole document to the buffer.
    pub fn print(&mut self, doc: &Document) {
        write_document(doc, &self.options, &mut self.buffer);
    }

    /// Returns the buffered text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Returns the options in effect.
    #[must_use]
    pub fn options(&self) -> &PrintOptions {
        &self.options
    }

    /// Replaces the options used by later [`print`](Printer::print) calls.
    pub fn set_options(&mut self, options: PrintOptions) {
        self.options = options;
    }
}

/// Renders a document to a new string.
#[must_use]
pub fn to_string(doc: &Document, options: &PrintOptions) -> String {
    let mut out = String::new();
    write_document(doc, options, &mut out);
    out
}

/// Appends the rendering of every child of the document node to `out`.
pub fn write_document(doc: &Document, options: &PrintOptions, out: &mut String) {
    for child in doc.children(doc.root()) {
        write_node(doc, child, out, options, 0, true);
        if options.indent {
            out.push('\n');
        }
    }
}

/// Returns `true` if the element has element children and no text, which
/// makes it safe to indent.
fn is_element_only(doc: &Document, id: NodeId) -> bool {
    let mut has_element_child = false;
    for child in doc.children(id) {
        match &doc.node(child).kind {
            NodeKind::Element { .. } => has_element_child = true,
            NodeKind::Text { .. } => return false,
            _ => {}
        }
    }
    has_element_child
}

fn write_indent(out: &mut String, options: &PrintOptions, depth: usize) {
    for _ in 0..depth {
        out.push_str(&options.indent_str);
    }
}

/// Writes one node. `block` is true when the node sits on its own line
/// (top level, or inside an indented element); the caller owns the
/// newline after top-level nodes.
fn write_node(
    doc: &Document,
    id: NodeId,
    out: &mut String,
    options: &PrintOptions,
    depth: usize,
    block: bool,
) {
    let pretty = options.indent && block;
    match &doc.node(id).kind {
        NodeKind::Element { name, attributes } => {
            if pretty {
                write_indent(out, options, depth);
            }
            out.push('<');
            out.push_str(name);
            for attr in attributes {
                out.push(' ');
                out.push_str(&attr.name);
                out.push_str("=\"");
                write_escaped_attr(out, &attr.value);
                out.push('"');
            }

            if doc.first_child(id).is_none() {
                out.push_str("/>");
                return;
            }

            out.push('>');
            let element_only = options.indent && is_element_only(doc, id);
            for child in doc.children(id) {
                if element_only {
                    out.push('\n');
                }
                write_node(doc, child, out, options, depth + 1, element_only);
            }
            if element_only {
                out.push('\n');
                if pretty {
                    write_indent(out, options, depth);
                }
            }
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
        NodeKind::Text { content } => {
            write_escaped_text(out, content);
        }
        NodeKind::Comment { content } => {
            if pretty {
                write_indent(out, options, depth);
            }
            out.push_str("<!--");
            out.push_str(content);
            out.push_str("-->");
        }
        NodeKind::Declaration { content } => {
            if pretty {
                write_indent(out, options, depth);
            }
            out.push_str("<?");
            out.push_str(content);
            out.push_str("?>");
        }
        NodeKind::Document => {
            // Never a child node
        }
    }
}

/// Writes a hexadecimal character reference (`&#xHH;`) for a code point.
fn write_hex_char_ref(out: &mut String, ch: char) {
    use std::fmt::Write;
    let _ = write!(out, "&#x{:X};", ch as u32);
}

/// Escapes text content.
///
/// `<`, `>`, `&` become named references, `\r` becomes `&#13;`, other
/// control characters except `\t` and `\n` are hex-encoded.
fn write_escaped_text(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\r' => out.push_str("&#13;"),
            '\t' | '\n' => out.push(ch),
            c if (c as u32) < 0x20 => write_hex_char_ref(out, c),
            _ => out.push(ch),
        }
    }
}

/// Escapes an attribute value for a double-quoted attribute.
fn write_escaped_attr(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\t' => out.push_str("&#9;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            c if (c as u32) < 0x20 => write_hex_char_ref(out, c),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(doc: &mut Document, parent: NodeId, name: &str) -> NodeId {
        let id = doc.create_element(name);
        doc.append_child(parent, id);
        id
    }

    #[test]
    fn test_print_empty_document() {
        let doc = Document::new();
        assert_eq!(to_string(&doc, &PrintOptions::default()), "");
    }

    #[test]
    fn test_print_empty_element() {
        let mut doc = Document::new();
        let root = doc.root();
        element(&mut doc, root, "br");
        assert_eq!(to_string(&doc, &PrintOptions::default()), "<br/>\n");
        assert_eq!(to_string(&doc, &PrintOptions::compact()), "<br/>");
    }

    #[test]
    fn test_print_text_stays_inline() {
        let mut doc = Document::new();
        let root = doc.root();
        let e = element(&mut doc, root, "name");
        doc.set_text(e, "archer");
        assert_eq!(
            to_string(&doc, &PrintOptions::default()),
            "<name>archer</name>\n"
        );
    }

    #[test]
    fn test_print_nested_indented() {
        let mut doc = Document::new();
        let top = doc.root();
        let decl = doc.create_declaration("xml version=\"1.0\"");
        doc.append_child(top, decl);
        let root = element(&mut doc, top, "root");
        let info = element(&mut doc, root, "info");
        let tel = element(&mut doc, info, "tel");
        doc.set_text(tel, "1000229");
        let comment = doc.create_comment("end");
        doc.append_child(root, comment);

        let expected = "<?xml version=\"1.0\"?>\n\
                        <root>\n\
                        \x20   <info>\n\
                        \x20       <tel>1000229</tel>\n\
                        \x20   </info>\n\
                        \x20   <!--end-->\n\
                        </root>\n";
        assert_eq!(to_string(&doc, &PrintOptions::default()), expected);
    }

    #[test]
    fn test_print_compact() {
        let mut doc = Document::new();
        let top = doc.root();
        let root = element(&mut doc, top, "root");
        let a = element(&mut doc, root, "a");
        doc.set_text(a, "1");
        element(&mut doc, root, "b");
        assert_eq!(
            to_string(&doc, &PrintOptions::compact()),
            "<root><a>1</a><b/></root>"
        );
    }

    #[test]
    fn test_print_custom_indent() {
        let mut doc = Document::new();
        let top = doc.root();
        let root = element(&mut doc, top, "root");
        element(&mut doc, root, "a");
        let options = PrintOptions::default().indent_str("\t");
        assert_eq!(to_string(&doc, &options), "<root>\n\t<a/>\n</root>\n");
    }

    #[test]
    fn test_print_mixed_content_not_indented() {
        let mut doc = Document::new();
        let top = doc.root();
        let root = element(&mut doc, top, "p");
        element(&mut doc, root, "b");
        doc.set_text(root, "lead");
        assert_eq!(
            to_string(&doc, &PrintOptions::default()),
            "<p>lead<b/></p>\n"
        );
    }

    #[test]
    fn test_print_escaping() {
        let mut doc = Document::new();
        let top = doc.root();
        let root = element(&mut doc, top, "e");
        doc.set_attribute(root, "q", "a\"b<c>&\n");
        doc.set_text(root, "1 < 2 & 3 > 2\r");
        assert_eq!(
            to_string(&doc, &PrintOptions::compact()),
            "<e q=\"a&quot;b&lt;c&gt;&amp;&#10;\">1 &lt; 2 &amp; 3 &gt; 2&#13;</e>"
        );
    }

    #[test]
    fn test_print_control_char_hex_encoded() {
        let mut doc = Document::new();
        let top = doc.root();
        let root = element(&mut doc, top, "e");
        doc.set_text(root, "a\u{1}b");
        assert_eq!(to_string(&doc, &PrintOptions::compact()), "<e>a&#x1;b</e>");
    }

    #[test]
    fn test_printer_clear_and_reprint() {
        let mut doc = Document::new();
        let top = doc.root();
        let root = element(&mut doc, top, "root");

        let mut printer = Printer::new(PrintOptions::compact());
        printer.print(&doc);
        assert_eq!(printer.as_str(), "<root/>");

        doc.set_text(root, "x");
        printer.clear();
        printer.print(&doc);
        assert_eq!(printer.as_str(), "<root>x</root>");

        printer.set_options(PrintOptions::default());
        printer.clear();
        printer.print(&doc);
        assert_eq!(printer.as_str(), "<root>x</root>\n");
    }
}
