//! One-shot "finished loading" listeners.
//!
//! A listener is armed on a node and fires at most once: dispatching drains
//! the node's listener list, so a second load event finds nothing to run.
//! Without a host event loop, [`DomNode::finish_loading`] is the explicit
//! finalize step a caller runs once a snapshot is attached and settled.

use crate::dom::{DomNode, ScrollOffsets};
use tracing::debug;

/// A deferred action that runs when its node finishes loading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadListener {
    /// Apply scroll offsets captured from the node this one was cloned from.
    RestoreScroll(ScrollOffsets),
}

impl LoadListener {
    fn fire(self, node: &mut DomNode) {
        match self {
            LoadListener::RestoreScroll(offsets) => node.set_scroll(offsets),
        }
    }
}

impl DomNode {
    pub fn add_load_listener(&mut self, listener: LoadListener) {
        self.load_listeners.push(listener);
    }

    /// Listeners armed on this node that have not fired yet.
    pub fn pending_load_listeners(&self) -> &[LoadListener] {
        &self.load_listeners
    }

    /// Fire this node's load listeners. Returns how many ran.
    pub fn dispatch_load(&mut self) -> usize {
        let listeners = std::mem::take(&mut self.load_listeners);
        let fired = listeners.len();
        for listener in listeners {
            listener.fire(self);
        }
        if fired > 0 {
            debug!(tag = %self.tag, fired, "load listeners fired");
        }
        fired
    }

    /// Deliver a load event to the descendant at `path`.
    ///
    /// Capturing listeners on every node from here down to the target run,
    /// outermost first. Returns false, firing nothing, when `path` does not
    /// name a node.
    pub fn dispatch_load_at(&mut self, path: &[usize]) -> bool {
        if self.node_at_path(path).is_none() {
            return false;
        }
        let mut node = self;
        node.dispatch_load();
        for &index in path {
            let Some(child) = node.children.get_mut(index) else {
                return false;
            };
            node = child;
            node.dispatch_load();
        }
        true
    }

    /// Fire every pending listener in this subtree, children before their
    /// parents. Returns the total number fired.
    pub fn finish_loading(&mut self) -> usize {
        let mut fired = 0;
        for child in &mut self.children {
            fired += child.finish_loading();
        }
        fired + self.dispatch_load()
    }
}
