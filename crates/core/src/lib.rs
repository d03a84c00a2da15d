pub mod canvas;
pub mod clone;
pub mod dom;
pub mod element;
pub mod events;
pub mod images;
pub mod output;
pub mod units;

pub use clone::{clone_node, clone_node_with, CloneError, CloneOptions};
pub use dom::{DomNode, NodeType};

/// Parse an HTML string and return a detached snapshot of the document.
/// This is the primary entry point for domsnap-core.
pub fn snapshot(html: &str, options: &CloneOptions) -> Result<DomNode, CloneError> {
    let live = dom::parse_html(html);
    clone::clone_node_with(&live, options)
}
