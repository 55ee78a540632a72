//! HTML serialization.
//!
//! Text and attribute values are escaped here, at the output boundary, so
//! stored node data always holds the raw strings.

use crate::document::Dom;
use crate::node::{NodeId, NodeKind};

/// Escape `& < > " '` for use in text or a double-quoted attribute.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Serialize `id` and its subtree. Stale handles render as an empty string.
pub fn render_html(dom: &Dom, id: NodeId) -> String {
    let mut out = String::new();
    write_node(dom, id, &mut out);
    out
}

fn write_node(dom: &Dom, id: NodeId, out: &mut String) {
    match dom.kind(id) {
        Some(NodeKind::Text) => {
            if let Some(text) = dom.text(id) {
                out.push_str(&escape_html(text));
            }
        }
        Some(NodeKind::Element) => {
            let tag = dom.tag(id).unwrap_or("span");
            out.push('<');
            out.push_str(tag);
            for (name, value) in dom.attributes(id) {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&escape_html(value));
                out.push('"');
            }
            out.push('>');
            for child in dom.children(id) {
                write_node(dom, *child, out);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
        None => {}
    }
}
