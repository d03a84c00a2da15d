//! Building detached elements from a tag, class, markup and inline style.

use crate::dom::{parse_fragment, DomNode};
use std::collections::BTreeMap;

/// What to put on a freshly created element.
#[derive(Debug, Clone, Default)]
pub struct ElementOptions {
    pub class_name: Option<String>,
    /// Markup parsed into the element's children. Scripts are stripped.
    pub inner_html: Option<String>,
    /// Inline style declarations. Keys may be camelCase (`backgroundColor`)
    /// or CSS property names.
    pub style: BTreeMap<String, String>,
}

pub fn create_element(tag: &str, options: &ElementOptions) -> DomNode {
    let tag = tag.to_ascii_lowercase();
    let mut el = DomNode::new_element(&tag);

    if let Some(class) = options.class_name.as_deref().filter(|c| !c.is_empty()) {
        el.set_attr("class", class);
    }

    if let Some(html) = options.inner_html.as_deref().filter(|h| !h.is_empty()) {
        for child in parse_fragment(html, &tag) {
            el.append_child(child);
        }
        remove_scripts(&mut el);
    }

    let declarations: Vec<String> = options
        .style
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| format!("{}: {};", css_property_name(key), value))
        .collect();
    if !declarations.is_empty() {
        el.set_attr("style", &declarations.join(" "));
    }

    el
}

fn remove_scripts(node: &mut DomNode) {
    node.children.retain(|child| !child.is_element_named("script"));
    for child in &mut node.children {
        remove_scripts(child);
    }
}

/// `backgroundColor` -> `background-color`. Names that are already
/// hyphenated or custom properties pass through.
pub fn css_property_name(key: &str) -> String {
    if key == "cssFloat" {
        return "float".to_string();
    }
    if key.starts_with("--") || key.contains('-') {
        return key.to_string();
    }
    let mut name = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            name.push('-');
            name.push(ch.to_ascii_lowercase());
        } else {
            name.push(ch);
        }
    }
    name
}
