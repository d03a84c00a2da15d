use crate::canvas::{CanvasSurface, DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH};
use crate::events::LoadListener;
use html5ever::{ns, parse_document, parse_fragment as parse_html_fragment, LocalName, QualName};
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::ParseOpts;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use serde::Serialize;
use std::collections::HashMap;

/// A node in a DOM tree, together with the runtime state a live page keeps
/// outside of its markup.
#[derive(Debug, Clone, Serialize)]
pub struct DomNode {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub tag: String,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub attributes: HashMap<String, String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DomNode>,
    pub node_type: NodeType,
    #[serde(skip_serializing_if = "NodeState::is_default")]
    pub state: NodeState,
    #[serde(skip)]
    pub(crate) load_listeners: Vec<LoadListener>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Element,
    Text,
    Comment,
    Document,
}

/// Runtime state that is not reflected in attributes or children.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NodeState {
    /// Dirty value of a form control. `None` means the markup default applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Dirty checkedness of a checkbox or radio input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canvas: Option<CanvasSurface>,
    #[serde(skip_serializing_if = "ScrollOffsets::is_zero")]
    pub scroll: ScrollOffsets,
}

impl NodeState {
    fn for_tag(tag: &str) -> Self {
        Self {
            canvas: tag
                .eq_ignore_ascii_case("canvas")
                .then(CanvasSurface::default),
            ..Default::default()
        }
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Scroll position of a scrollable container, in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScrollOffsets {
    pub top: f64,
    pub left: f64,
}

impl ScrollOffsets {
    pub fn new(top: f64, left: f64) -> Self {
        Self { top, left }
    }

    pub fn is_zero(&self) -> bool {
        self.top == 0.0 && self.left == 0.0
    }
}

impl DomNode {
    pub fn new_element(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attributes: HashMap::new(),
            text: String::new(),
            children: Vec::new(),
            node_type: NodeType::Element,
            state: NodeState::for_tag(tag),
            load_listeners: Vec::new(),
        }
    }

    pub fn new_text(text: &str) -> Self {
        Self {
            tag: String::new(),
            attributes: HashMap::new(),
            text: text.to_string(),
            children: Vec::new(),
            node_type: NodeType::Text,
            state: NodeState::default(),
            load_listeners: Vec::new(),
        }
    }

    pub fn new_comment(text: &str) -> Self {
        Self {
            node_type: NodeType::Comment,
            ..Self::new_text(text)
        }
    }

    pub fn new_document() -> Self {
        Self {
            tag: String::new(),
            attributes: HashMap::new(),
            text: String::new(),
            children: Vec::new(),
            node_type: NodeType::Document,
            state: NodeState::default(),
            load_listeners: Vec::new(),
        }
    }

    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    /// True for an element whose tag matches `name`, ignoring ASCII case.
    pub fn is_element_named(&self, name: &str) -> bool {
        self.is_element() && self.tag.eq_ignore_ascii_case(name)
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    /// Set an attribute. On a canvas, `width` and `height` resize the
    /// drawing surface, which also clears it.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
        if !self.is_element_named("canvas") || !matches!(name, "width" | "height") {
            return;
        }
        let width = canvas_dimension(self.get_attr("width"), DEFAULT_CANVAS_WIDTH);
        let height = canvas_dimension(self.get_attr("height"), DEFAULT_CANVAS_HEIGHT);
        self.state
            .canvas
            .get_or_insert_with(CanvasSurface::default)
            .set_dimensions(width, height);
    }

    pub fn append_child(&mut self, child: DomNode) {
        self.children.push(child);
    }

    /// The drawing surface of a canvas element.
    pub fn canvas(&self) -> Option<&CanvasSurface> {
        self.state.canvas.as_ref()
    }

    pub fn canvas_mut(&mut self) -> Option<&mut CanvasSurface> {
        self.state.canvas.as_mut()
    }

    pub fn scroll(&self) -> ScrollOffsets {
        self.state.scroll
    }

    pub fn set_scroll(&mut self, offsets: ScrollOffsets) {
        self.state.scroll = offsets;
    }

    /// Current value of a form control, following the platform's rules:
    /// a dirty value wins, otherwise the default comes from the markup.
    pub fn value(&self) -> Option<String> {
        if !self.is_element() {
            return None;
        }
        if let Some(value) = &self.state.value {
            return Some(value.clone());
        }
        match self.tag.to_ascii_lowercase().as_str() {
            "textarea" => Some(self.raw_text()),
            "select" => Some(
                self.selected_option()
                    .map(option_value)
                    .unwrap_or_default(),
            ),
            "input" => Some(self.get_attr("value").unwrap_or_default().to_string()),
            "option" => Some(option_value(self)),
            _ => None,
        }
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.state.value = Some(value.into());
    }

    /// Checkedness of an input; the `checked` attribute is the default.
    pub fn checked(&self) -> bool {
        self.state
            .checked
            .unwrap_or_else(|| self.attributes.contains_key("checked"))
    }

    pub fn set_checked(&mut self, checked: bool) {
        self.state.checked = Some(checked);
    }

    /// Kind-preserving, non-recursive duplicate of this node.
    ///
    /// Copies the tag, attributes and character data. Like the platform's
    /// cloning steps, an `input` also carries its value and checkedness.
    /// Children, canvas pixels, textarea/select values, scroll offsets and
    /// load listeners are left behind.
    pub fn shallow_copy(&self) -> DomNode {
        let mut copy = match self.node_type {
            NodeType::Element => {
                let mut el = DomNode::new_element(&self.tag);
                for (name, value) in &self.attributes {
                    el.set_attr(name, value);
                }
                el
            }
            NodeType::Text => DomNode::new_text(&self.text),
            NodeType::Comment => DomNode::new_comment(&self.text),
            NodeType::Document => DomNode::new_document(),
        };
        if self.is_element_named("input") {
            copy.state.value = self.state.value.clone();
            copy.state.checked = self.state.checked;
        }
        copy
    }

    /// All descendant elements with the given tag, in document order.
    pub fn find_all(&self, tag: &str) -> Vec<&DomNode> {
        let mut found = Vec::new();
        for child in &self.children {
            child.collect_named(tag, &mut found);
        }
        found
    }

    fn collect_named<'a>(&'a self, tag: &str, out: &mut Vec<&'a DomNode>) {
        if self.is_element_named(tag) {
            out.push(self);
        }
        for child in &self.children {
            child.collect_named(tag, out);
        }
    }

    pub fn find_first(&self, tag: &str) -> Option<&DomNode> {
        self.children.iter().find_map(|child| {
            if child.is_element_named(tag) {
                Some(child)
            } else {
                child.find_first(tag)
            }
        })
    }

    pub fn node_at_path(&self, path: &[usize]) -> Option<&DomNode> {
        path.iter()
            .try_fold(self, |node, &index| node.children.get(index))
    }

    pub fn node_at_path_mut(&mut self, path: &[usize]) -> Option<&mut DomNode> {
        let mut node = self;
        for &index in path {
            node = node.children.get_mut(index)?;
        }
        Some(node)
    }

    /// Number of nodes below this one.
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| 1 + child.descendant_count())
            .sum()
    }

    /// Get the visible text content of this node and all children.
    pub fn text_content(&self) -> String {
        let mut result = String::new();
        self.collect_text(&mut result);
        result.trim().to_string()
    }

    fn collect_text(&self, out: &mut String) {
        match self.node_type {
            NodeType::Text => {
                let trimmed = self.text.trim();
                if !trimmed.is_empty() {
                    if !out.is_empty() && !out.ends_with(' ') {
                        out.push(' ');
                    }
                    out.push_str(trimmed);
                }
            }
            NodeType::Comment => {}
            _ => {
                for child in &self.children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Concatenated character data of the text children, untouched.
    fn raw_text(&self) -> String {
        self.children
            .iter()
            .filter(|child| child.node_type == NodeType::Text)
            .map(|child| child.text.as_str())
            .collect()
    }

    fn selected_option(&self) -> Option<&DomNode> {
        let options = self.find_all("option");
        options
            .iter()
            .find(|option| option.attributes.contains_key("selected"))
            .or_else(|| options.first())
            .copied()
    }
}

fn option_value(option: &DomNode) -> String {
    match option.get_attr("value") {
        Some(value) => value.to_string(),
        None => option.text_content(),
    }
}

fn canvas_dimension(attr: Option<&str>, default: u32) -> u32 {
    attr.and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

/// Parse an HTML string into a DomNode tree.
pub fn parse_html(html: &str) -> DomNode {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            drop_doctype: true,
            ..Default::default()
        },
        ..Default::default()
    };

    let dom = parse_document(RcDom::default(), opts).one(html);

    convert_node(&dom.document, false).unwrap_or_else(DomNode::new_document)
}

/// Parse markup as the children of a `context` element, the way assigning
/// `innerHTML` on that element does. Whitespace-only text is kept.
pub fn parse_fragment(html: &str, context: &str) -> Vec<DomNode> {
    let context = QualName::new(None, ns!(html), LocalName::from(context.to_ascii_lowercase()));
    let dom = parse_html_fragment(RcDom::default(), ParseOpts::default(), context, Vec::new(), true)
        .one(html);

    // The fragment parser hangs its output off a synthetic <html> root.
    let roots = dom.document.children.borrow();
    let Some(root) = roots.first() else {
        return Vec::new();
    };
    let nodes = root
        .children
        .borrow()
        .iter()
        .filter_map(|child| convert_node(child, true))
        .collect();
    nodes
}

fn convert_node(handle: &Handle, keep_whitespace: bool) -> Option<DomNode> {
    match &handle.data {
        NodeData::Document => {
            let mut doc = DomNode::new_document();
            convert_children(handle, &mut doc, false);
            Some(doc)
        }
        NodeData::Element { name, attrs, .. } => {
            let tag = name.local.to_string();
            let mut node = DomNode::new_element(&tag);
            for attr in attrs.borrow().iter() {
                node.set_attr(&attr.name.local, &attr.value);
            }
            let keep_whitespace = keep_whitespace || tag == "pre" || tag == "textarea";
            convert_children(handle, &mut node, keep_whitespace);
            Some(node)
        }
        NodeData::Text { contents } => {
            let text = contents.borrow().to_string();
            if !keep_whitespace && text.trim().is_empty() {
                return None;
            }
            Some(DomNode::new_text(&text))
        }
        NodeData::Comment { contents } => Some(DomNode::new_comment(contents)),
        _ => None, // doctypes, PIs
    }
}

fn convert_children(handle: &Handle, parent: &mut DomNode, keep_whitespace: bool) {
    for child in handle.children.borrow().iter() {
        if let Some(node) = convert_node(child, keep_whitespace) {
            parent.append_child(node);
        }
    }
}
