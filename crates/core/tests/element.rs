//! Tests for the element factory.

use domsnap_core::element::{create_element, css_property_name, ElementOptions};
use domsnap_core::NodeType;
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;

#[test]
fn test_create_element_with_everything() {
    let mut style = BTreeMap::new();
    style.insert("backgroundColor".to_string(), "white".to_string());
    style.insert("margin-top".to_string(), "4px".to_string());
    style.insert("color".to_string(), String::new());

    let options = ElementOptions {
        class_name: Some("page-overlay".to_string()),
        inner_html: Some(
            "<p>Hi</p><script>alert(1)</script><span><script>steal()</script>ok</span>".to_string(),
        ),
        style,
    };
    let el = create_element("DIV", &options);

    assert_eq!(el.tag, "div");
    assert_eq!(el.get_attr("class"), Some("page-overlay"));
    assert_eq!(
        el.get_attr("style"),
        Some("background-color: white; margin-top: 4px;")
    );
    let tags: Vec<&str> = el.children.iter().map(|c| c.tag.as_str()).collect();
    assert_eq!(tags, vec!["p", "span"]);
    assert!(el.find_all("script").is_empty());
    assert_eq!(el.find_first("span").unwrap().text_content(), "ok");
}

#[test]
fn test_create_element_with_defaults_is_bare() {
    let el = create_element("section", &ElementOptions::default());
    assert_eq!(el.tag, "section");
    assert!(el.attributes.is_empty());
    assert!(el.children.is_empty());
}

#[test]
fn test_empty_class_is_skipped() {
    let options = ElementOptions {
        class_name: Some(String::new()),
        ..Default::default()
    };
    assert!(create_element("div", &options).get_attr("class").is_none());
}

#[test]
fn test_css_property_names() {
    assert_eq!(css_property_name("backgroundColor"), "background-color");
    assert_eq!(css_property_name("borderTopLeftRadius"), "border-top-left-radius");
    assert_eq!(css_property_name("width"), "width");
    assert_eq!(css_property_name("margin-top"), "margin-top");
    assert_eq!(css_property_name("--accent"), "--accent");
    assert_eq!(css_property_name("cssFloat"), "float");
}

#[test]
fn test_inner_html_parsed_in_element_context() {
    let options = ElementOptions {
        inner_html: Some("<tr><td>1</td></tr><tr><td>2</td></tr>".to_string()),
        ..Default::default()
    };
    let tbody = create_element("tbody", &options);

    let tags: Vec<&str> = tbody.children.iter().map(|c| c.tag.as_str()).collect();
    assert_eq!(tags, vec!["tr", "tr"]);
    assert_eq!(tbody.find_all("td").len(), 2);
    assert_eq!(tbody.text_content(), "1 2");
}

#[test]
fn test_inner_html_keeps_whitespace_text() {
    let options = ElementOptions {
        inner_html: Some("<b>a</b> <i>b</i>".to_string()),
        ..Default::default()
    };
    let p = create_element("p", &options);

    assert_eq!(p.children.len(), 3);
    assert_eq!(p.children[1].node_type, NodeType::Text);
    assert_eq!(p.children[1].text, " ");
    let rendered: String = p
        .children
        .iter()
        .map(|c| match c.node_type {
            NodeType::Text => c.text.clone(),
            _ => c.text_content(),
        })
        .collect();
    assert_eq!(rendered, "a b");
}
