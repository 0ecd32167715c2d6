//! Import of server-rendered markup (through `scraper`) and serialization back to HTML.

use crate::tree::{ElementData, NodeId, NodeKind, Tree};
use scraper::{ElementRef, Html, Node};
use tracing::trace;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Parses a full document into `tree`, attaching top-level nodes to the document node.
pub(crate) fn import_document(tree: &mut Tree, markup: &str) {
    let parsed = Html::parse_document(markup);
    if !parsed.errors.is_empty() {
        trace!(errors = parsed.errors.len(), "Markup parsed with recoverable errors");
    }

    for child in parsed.tree.root().children() {
        match child.value() {
            Node::Doctype(doctype) => {
                let id = tree.push(NodeKind::Doctype(doctype.name().to_owned()));
                attach(tree, NodeId::ROOT, id);
            },
            Node::Comment(comment) => {
                let text: &str = comment;
                let id = tree.push(NodeKind::Comment(text.to_owned()));
                attach(tree, NodeId::ROOT, id);
            },
            Node::Element(_) => {
                if let Some(element) = ElementRef::wrap(child) {
                    import_element(tree, NodeId::ROOT, element);
                }
            },
            _ => {},
        }
    }
}

fn import_element(tree: &mut Tree, parent: NodeId, element: ElementRef<'_>) {
    let source = element.value();
    let mut data = ElementData::new(source.name());
    for (name, value) in source.attrs() {
        data.set_attr(name, value.to_owned());
    }
    let id = tree.push(NodeKind::Element(data));
    attach(tree, parent, id);

    for child in element.children() {
        match child.value() {
            Node::Element(_) => {
                if let Some(el) = ElementRef::wrap(child) {
                    import_element(tree, id, el);
                }
            },
            Node::Text(text) => {
                let text: &str = text;
                let node = tree.push(NodeKind::Text(text.to_owned()));
                attach(tree, id, node);
            },
            Node::Comment(comment) => {
                let text: &str = comment;
                let node = tree.push(NodeKind::Comment(text.to_owned()));
                attach(tree, id, node);
            },
            _ => {},
        }
    }
}

fn attach(tree: &mut Tree, parent: NodeId, child: NodeId) {
    // Freshly pushed nodes under an element parent cannot form a cycle.
    if let Err(err) = tree.append(parent, child) {
        trace!(error = %err, "Skipping node during markup import");
    }
}

/// Serializes `id` (including itself unless it is the document node).
pub(crate) fn serialize(tree: &Tree, id: NodeId, out: &mut String) {
    let Ok(node) = tree.get(id) else { return };
    match &node.kind {
        NodeKind::Document => {
            for child in tree.children(id) {
                serialize(tree, *child, out);
            }
        },
        NodeKind::Doctype(name) => {
            out.push_str("<!DOCTYPE ");
            out.push_str(name);
            out.push('>');
        },
        NodeKind::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        },
        NodeKind::Text(text) => {
            let raw = tree
                .parent(id)
                .and_then(|p| tree.element(p))
                .is_some_and(|p| RAW_TEXT_ELEMENTS.contains(&p.tag.as_str()));
            if raw {
                out.push_str(text);
            } else {
                escape_into(text, false, out);
            }
        },
        NodeKind::Element(data) => {
            out.push('<');
            out.push_str(&data.tag);
            for (name, value) in &data.attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                escape_into(value, true, out);
                out.push('"');
            }
            out.push('>');
            if VOID_ELEMENTS.contains(&data.tag.as_str()) {
                return;
            }
            for child in tree.children(id) {
                serialize(tree, *child, out);
            }
            out.push_str("</");
            out.push_str(&data.tag);
            out.push('>');
        },
    }
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            '"' if attribute => out.push_str("&quot;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            other => out.push(other),
        }
    }
}
