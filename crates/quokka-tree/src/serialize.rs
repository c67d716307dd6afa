//! Round-trip serialization of the document tree.
//!
//! Two forms are produced from the same depth-first, pre-order
//! traversal. The compact form is the wire form: an element with no
//! value and no children self-closes, everything else opens, emits its
//! reference-encoded value, recurses, and closes. The pretty form is
//! structurally identical plus two-space indentation per depth level and
//! a line break after every tag; for an unchanged tree it is byte
//! stable.
//!
//! Attributes render only when their value is non-empty, in insertion
//! order, always double-quoted.

use quokka_escape::encode;

use crate::{Document, Node, NodeId};

/// Two spaces per depth level.
const INDENT: &str = "  ";

impl Document {
    /// Serialize the subtree rooted at `id` in compact form.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_compact(id, &mut out);
        out
    }

    /// Serialize the subtree rooted at `id` in pretty form.
    #[must_use]
    pub fn as_formatted_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_pretty(id, 0, &mut out);
        out
    }

    /// Just the opening tag of `id` (attributes included, children and
    /// value omitted). Used for diagnostics.
    #[must_use]
    pub fn open_tag_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        let node = self.node(id);
        out.push('<');
        out.push_str(&node.name);
        write_attributes(node, &mut out);
        out.push('>');
        out
    }

    fn write_compact(&self, id: NodeId, out: &mut String) {
        let node = self.node(id);
        out.push('<');
        out.push_str(&node.name);
        write_attributes(node, out);

        if node.value.is_empty() && node.children.is_empty() {
            out.push_str("/>");
            return;
        }

        out.push('>');
        out.push_str(&encode(&node.value));
        for &child in &node.children {
            self.write_compact(child, out);
        }
        out.push_str("</");
        out.push_str(&node.name);
        out.push('>');
    }

    fn write_pretty(&self, id: NodeId, depth: usize, out: &mut String) {
        let node = self.node(id);
        for _ in 0..depth {
            out.push_str(INDENT);
        }
        out.push('<');
        out.push_str(&node.name);
        write_attributes(node, out);

        if node.value.is_empty() && node.children.is_empty() {
            out.push_str("/>\n");
            return;
        }

        out.push('>');
        if node.children.is_empty() {
            // Text-only elements stay on one line.
            out.push_str(&encode(&node.value));
            out.push_str("</");
            out.push_str(&node.name);
            out.push_str(">\n");
            return;
        }

        out.push_str(&encode(&node.value));
        out.push('\n');
        for &child in &node.children {
            self.write_pretty(child, depth + 1, out);
        }
        for _ in 0..depth {
            out.push_str(INDENT);
        }
        out.push_str("</");
        out.push_str(&node.name);
        out.push_str(">\n");
    }
}

fn write_attributes(node: &Node, out: &mut String) {
    for attr in &node.attributes {
        if attr.value.is_empty() {
            continue;
        }
        out.push(' ');
        out.push_str(&attr.name);
        out.push_str("=\"");
        out.push_str(&encode(&attr.value));
        out.push('"');
    }
}
