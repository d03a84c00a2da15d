use crate::dom::{DomNode, NodeType};

/// Longest text excerpt shown per node in the outline.
const TEXT_EXCERPT_CHARS: usize = 40;

/// Tags whose current value is shown in the outline.
const FORM_TAGS: &[&str] = &["input", "select", "textarea"];

/// Serialize a snapshot as pretty JSON. Pixel buffers are omitted.
pub fn to_json(node: &DomNode) -> serde_json::Result<String> {
    serde_json::to_string_pretty(node)
}

/// Compact, indented outline of a tree for terminal output.
pub fn to_outline_string(root: &DomNode) -> String {
    let mut lines = Vec::new();
    write_outline(root, 0, &mut lines);
    lines.join("\n")
}

fn write_outline(node: &DomNode, depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    match node.node_type {
        NodeType::Document => lines.push(format!("{indent}#document")),
        NodeType::Text => lines.push(format!("{indent}\"{}\"", excerpt(node.text.trim()))),
        NodeType::Comment => lines.push(format!("{indent}<!--{}-->", excerpt(node.text.trim()))),
        NodeType::Element => lines.push(format!("{indent}{}", describe_element(node))),
    }
    for child in &node.children {
        write_outline(child, depth + 1, lines);
    }
}

fn describe_element(node: &DomNode) -> String {
    let mut head = node.tag.clone();
    if let Some(id) = node.get_attr("id") {
        head.push_str(&format!("#{}", id));
    }
    if let Some(class) = node.get_attr("class") {
        for name in class.split_whitespace() {
            head.push_str(&format!(".{}", name));
        }
    }

    let mut parts = vec![head];
    if FORM_TAGS.iter().any(|tag| node.is_element_named(tag)) {
        if let Some(value) = node.value() {
            parts.push(format!("value={:?}", excerpt(&value)));
        }
    }
    if let Some(canvas) = node.canvas() {
        parts.push(format!("{}x{}", canvas.width(), canvas.height()));
    }
    let scroll = node.scroll();
    if !scroll.is_zero() {
        parts.push(format!("scroll={},{}", scroll.top, scroll.left));
    }
    let pending = node.pending_load_listeners().len();
    if pending > 0 {
        parts.push(format!("+{} on load", pending));
    }
    parts.join(" ")
}

fn excerpt(text: &str) -> String {
    if text.chars().count() <= TEXT_EXCERPT_CHARS {
        return text.to_string();
    }
    let cut: String = text.chars().take(TEXT_EXCERPT_CHARS).collect();
    format!("{cut}…")
}
