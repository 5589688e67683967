use crate::dom::{DoctypeData, Document, NodeId, NodeType};

use scraper::{Html, Node};
use std::collections::HashMap;

// Elements that never have an end tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

// Elements whose text content is written verbatim. The parser runs with
// scripting enabled, so `noscript` content arrives as text too.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "iframe",
    "noembed",
    "noframes",
    "noscript",
    "plaintext",
    "script",
    "style",
    "xmp",
];

/// Parse an HTML page into a [`Document`]
pub fn load_document(source: &str) -> Document {
    let html = Html::parse_document(source);
    if !html.errors.is_empty() {
        debug!("HTML parsed with {} recoverable errors", html.errors.len());
    }

    let mut document = Document::new();
    let mut ids: HashMap<_, NodeId> = HashMap::new();

    // Pre-order traversal so every parent is mapped before its children
    for node in html.tree.root().descendants() {
        let parent = match node.parent() {
            Some(parent) => ids.get(&parent.id()).copied(),
            None => {
                ids.insert(node.id(), document.root());
                continue;
            }
        };
        let id = match node.value() {
            Node::Doctype(doctype) => Some(document.create_doctype(
                DoctypeData {
                    name: doctype.name().to_owned(),
                    public_id: doctype.public_id().to_owned(),
                    system_id: doctype.system_id().to_owned(),
                },
                parent,
            )),
            Node::Element(element) => Some(document.create_element(
                element.name(),
                element
                    .attrs()
                    .map(|(k, v)| (k.to_owned(), v.to_owned()))
                    .collect(),
                parent,
            )),
            Node::Text(text) => Some(document.create_text(&**text, parent)),
            Node::Comment(comment) => Some(document.create_comment(&**comment, parent)),
            _ => None,
        };
        if let Some(id) = id {
            ids.insert(node.id(), id);
        }
    }
    document
}

/// Serialise a [`Document`] back to HTML
pub fn to_html(document: &Document) -> String {
    let mut out = String::new();
    for &child in &document.nodes[document.root()].children {
        write_node(document, child, false, &mut out);
    }
    out
}

fn write_node(document: &Document, id: NodeId, raw_text: bool, out: &mut String) {
    let node = &document.nodes[id];
    match &node.node_type {
        NodeType::Document => {
            for &child in &node.children {
                write_node(document, child, false, out);
            }
        }
        NodeType::Doctype(doctype) => write_doctype(doctype, out),
        NodeType::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        NodeType::Text(text) => {
            if raw_text {
                out.push_str(text);
            } else {
                out.push_str(&escape(text, false));
            }
        }
        NodeType::Element(el) => {
            out.push('<');
            out.push_str(&el.tag_name);
            for (name, value) in &el.attributes {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&escape(value, true));
                out.push('"');
            }
            out.push('>');
            if VOID_ELEMENTS.contains(&el.tag_name.as_str()) {
                return;
            }
            let raw = RAW_TEXT_ELEMENTS.contains(&el.tag_name.as_str());
            for &child in &node.children {
                write_node(document, child, raw, out);
            }
            out.push_str("</");
            out.push_str(&el.tag_name);
            out.push('>');
        }
    }
}

fn write_doctype(doctype: &DoctypeData, out: &mut String) {
    out.push_str("<!DOCTYPE ");
    out.push_str(&doctype.name);
    if !doctype.public_id.is_empty() {
        out.push_str(" PUBLIC \"");
        out.push_str(&doctype.public_id);
        out.push('"');
    } else if !doctype.system_id.is_empty() {
        out.push_str(" SYSTEM");
    }
    if !doctype.system_id.is_empty() {
        out.push_str(" \"");
        out.push_str(&doctype.system_id);
        out.push('"');
    }
    out.push('>');
}

fn escape(text: &str, attribute: bool) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '\u{a0}' => escaped.push_str("&nbsp;"),
            '"' if attribute => escaped.push_str("&quot;"),
            '<' if !attribute => escaped.push_str("&lt;"),
            '>' if !attribute => escaped.push_str("&gt;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_document_finds_picture_markup() {
        let document = load_document(
            r#"<!DOCTYPE html><html><body><picture data-alt="A robot"><source srcset="a.png 1x, b.png 2x" media="(min-width: 800px)"><img src="fallback.png"></picture></body></html>"#,
        );
        let pictures = document.elements_by_tag_name(document.root(), "picture");
        assert_eq!(pictures.len(), 1);
        assert_eq!(document.get_attribute(pictures[0], "data-alt"), Some("A robot"));

        let sources = document.elements_by_tag_name(pictures[0], "source");
        assert_eq!(sources.len(), 1);
        assert_eq!(
            document.get_attribute(sources[0], "media"),
            Some("(min-width: 800px)")
        );
        assert!(document
            .first_element_by_tag_name(pictures[0], "img")
            .is_some());
    }

    #[test]
    fn test_to_html_round_trip() {
        let source = r#"<!DOCTYPE html><html><head><style>a > b { color: red; }</style></head><body><p title="&quot;x&quot;">1 &lt; 2 &amp; 3</p><img src="a.png" alt=""><noscript><img src="b.png" alt="x &amp; y"></noscript><!-- note --></body></html>"#;
        let document = load_document(source);
        assert_eq!(to_html(&document), source);
    }

    #[test]
    fn test_noscript_fallback_is_not_escaped() {
        let document = load_document(r#"<body><noscript><img src="a.png"></noscript></body>"#);
        assert!(document
            .first_element_by_tag_name(document.root(), "img")
            .is_none());
        assert!(to_html(&document).contains(r#"<noscript><img src="a.png"></noscript>"#));
    }

    #[test]
    fn test_doctype_identifiers_round_trip() {
        let legacy = r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd"><html><head></head><body></body></html>"#;
        assert_eq!(to_html(&load_document(legacy)), legacy);

        let system = r#"<!DOCTYPE html SYSTEM "about:legacy-compat"><html><head></head><body></body></html>"#;
        assert_eq!(to_html(&load_document(system)), system);
    }

    #[test]
    fn test_void_elements_have_no_end_tag() {
        let mut document = Document::new();
        let root = document.root();
        let picture = document.create_element("picture", vec![], Some(root));
        document.create_element(
            "img",
            vec![("src".to_owned(), "a.png".to_owned())],
            Some(picture),
        );
        assert_eq!(to_html(&document), r#"<picture><img src="a.png"></picture>"#);
    }
}
