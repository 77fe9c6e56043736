//! HTML serialisation

use std::borrow::Cow;
use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::document::Document;
use crate::node::{NodeId, NodeKind};

/// Escape text for use between HTML tags
pub fn escape_text(text: &str) -> Cow<'_, str> {
    encode_text(text)
}

/// Break up every `</style` (any ASCII case) so CSS text cannot end its
/// `<style>` element early
fn escape_style_close(css: &str) -> Cow<'_, str> {
    let mut out = String::new();
    let mut copied = 0;
    let mut from = 0;
    while let Some(pos) = css[from..].find("</") {
        let at = from + pos;
        let name = css.as_bytes().get(at + 2..at + 7);
        if name.is_some_and(|name| name.eq_ignore_ascii_case(b"style")) {
            out.push_str(&css[copied..at]);
            out.push_str("<\\/");
            copied = at + 2;
        }
        from = at + 2;
    }

    if copied == 0 {
        Cow::Borrowed(css)
    } else {
        out.push_str(&css[copied..]);
        Cow::Owned(out)
    }
}

impl Document {
    /// Serialise a node and its subtree as HTML
    pub fn to_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_node(node, &mut out);
        out
    }

    /// Serialise the head style registry as `<style id=..>` elements
    pub fn head_html(&self) -> String {
        let mut out = String::new();
        for fragment in self.styles() {
            let css = escape_style_close(fragment.source());
            let _ = write!(
                out,
                "<style id=\"{}\">{}</style>",
                encode_double_quoted_attribute(fragment.id()),
                css
            );
        }
        out
    }

    fn write_node(&self, node: NodeId, out: &mut String) {
        match self.node_kind(node) {
            Some(NodeKind::Text(text)) => out.push_str(&encode_text(text)),
            Some(NodeKind::Element(element)) => {
                out.push('<');
                out.push_str(&element.tag);
                if let Some(id) = &element.id {
                    let _ = write!(out, " id=\"{}\"", encode_double_quoted_attribute(id));
                }
                if !element.classes.is_empty() {
                    let _ = write!(
                        out,
                        " class=\"{}\"",
                        encode_double_quoted_attribute(&element.classes.join(" "))
                    );
                }
                for (name, value) in &element.attributes {
                    let _ = write!(out, " {}=\"{}\"", name, encode_double_quoted_attribute(value));
                }
                out.push('>');
                for child in self.children(node) {
                    self.write_node(*child, out);
                }
                out.push_str("</");
                out.push_str(&element.tag);
                out.push('>');
            }
            None => {}
        }
    }
}
