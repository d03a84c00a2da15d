//! Snapshot cloning of live DOM subtrees.
//!
//! [`clone_node`] copies a tree node by node: text gets a fresh text node,
//! everything else a shallow duplicate, and children are appended one at a
//! time so script elements can be left out. After an element's children are
//! in place its runtime state is restored through [`POST_CLONE_HOOKS`], and
//! a one-shot load listener is armed to put its scroll position back once the
//! copy has been attached and laid out.

use crate::canvas::{CanvasError, CanvasLimits, CanvasSurface};
use crate::dom::{DomNode, NodeType};
use crate::events::LoadListener;
use thiserror::Error;
use tracing::debug;

/// Options for a clone.
#[derive(Debug, Clone, Default)]
pub struct CloneOptions {
    /// Copy `<script>` elements into the output.
    pub include_scripts: bool,
    /// Caps applied when allocating canvas surfaces on the copy.
    pub canvas_limits: CanvasLimits,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CloneError {
    #[error("failed to copy canvas pixels: {0}")]
    Canvas(#[from] CanvasError),
}

/// State restored on an element after its children are attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostCloneHook {
    /// Copy the surface size, then the pixels. Resizing clears a surface,
    /// so the order matters.
    CopyCanvas,
    /// Copy the current value of a form control.
    CopyValue,
}

pub const POST_CLONE_HOOKS: &[(&str, PostCloneHook)] = &[
    ("canvas", PostCloneHook::CopyCanvas),
    ("textarea", PostCloneHook::CopyValue),
    ("select", PostCloneHook::CopyValue),
];

pub fn hook_for(tag: &str) -> Option<PostCloneHook> {
    POST_CLONE_HOOKS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(tag))
        .map(|(_, hook)| *hook)
}

impl PostCloneHook {
    fn apply(
        self,
        source: &DomNode,
        clone: &mut DomNode,
        options: &CloneOptions,
    ) -> Result<(), CloneError> {
        match self {
            PostCloneHook::CopyCanvas => copy_canvas(source, clone, &options.canvas_limits)?,
            PostCloneHook::CopyValue => {
                if let Some(value) = source.value() {
                    clone.set_value(value);
                }
            }
        }
        Ok(())
    }
}

/// Deep-clone `source`, dropping `<script>` elements unless `include_scripts`.
pub fn clone_node(source: &DomNode, include_scripts: bool) -> Result<DomNode, CloneError> {
    clone_node_with(
        source,
        &CloneOptions {
            include_scripts,
            ..Default::default()
        },
    )
}

pub fn clone_node_with(source: &DomNode, options: &CloneOptions) -> Result<DomNode, CloneError> {
    let mut stats = CloneStats::default();
    let clone = clone_recursive(source, options, &mut stats)?;
    debug!(
        nodes = stats.nodes,
        canvases = stats.canvases,
        "cloned <{}> subtree",
        source.tag
    );
    Ok(clone)
}

#[derive(Default)]
struct CloneStats {
    nodes: usize,
    canvases: usize,
}

fn clone_recursive(
    source: &DomNode,
    options: &CloneOptions,
    stats: &mut CloneStats,
) -> Result<DomNode, CloneError> {
    let mut clone = match source.node_type {
        NodeType::Text => DomNode::new_text(&source.text),
        _ => source.shallow_copy(),
    };
    stats.nodes += 1;

    for child in &source.children {
        if options.include_scripts || !child.is_element_named("script") {
            clone.append_child(clone_recursive(child, options, stats)?);
        }
    }

    if source.is_element() {
        if let Some(hook) = hook_for(&source.tag) {
            if hook == PostCloneHook::CopyCanvas {
                stats.canvases += 1;
            }
            hook.apply(source, &mut clone, options)?;
        }
        clone.add_load_listener(LoadListener::RestoreScroll(source.scroll()));
    }

    Ok(clone)
}

fn copy_canvas(source: &DomNode, clone: &mut DomNode, limits: &CanvasLimits) -> Result<(), CanvasError> {
    let fallback = CanvasSurface::default();
    let surface = source.canvas().unwrap_or(&fallback);

    clone.set_attr("width", &surface.width().to_string());
    clone.set_attr("height", &surface.height().to_string());
    let target = clone
        .state
        .canvas
        .get_or_insert_with(CanvasSurface::default);
    target.set_dimensions(surface.width(), surface.height());
    target.context_2d(limits)?.draw_image(surface, 0, 0)
}
