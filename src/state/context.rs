use crate::state::{SnapshotState, VisitedSet};
use crate::url::RootUrl;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A discovered link waiting to be expanded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FrontierEntry {
    /// Normalized absolute URL
    pub url: String,

    /// Number of link hops from the root
    pub depth: u32,
}

impl FrontierEntry {
    pub fn new(url: impl Into<String>, depth: u32) -> Self {
        Self {
            url: url.into(),
            depth,
        }
    }
}

/// Mutable state of one traversal
///
/// The frontier is a LIFO work-stack: children are pushed in reverse
/// document order so that popping yields a depth-first pre-order walk.
/// Everything on the frontier is already in the visited set.
#[derive(Debug, Clone, Default)]
pub struct TraversalContext {
    visited: VisitedSet,
    frontier: Vec<FrontierEntry>,
    current_depth: u32,
}

impl TraversalContext {
    /// Creates the context of a fresh traversal: the root is visited and
    /// is the only frontier entry
    pub fn new(root: &RootUrl) -> Self {
        let mut visited = VisitedSet::new();
        visited.insert(root.page());

        Self {
            visited,
            frontier: vec![FrontierEntry::new(root.page(), 0)],
            current_depth: 0,
        }
    }

    /// Rebuilds the context of an interrupted traversal
    pub fn from_snapshot(state: &SnapshotState) -> Self {
        let mut visited: VisitedSet = state.visited.iter().cloned().collect();
        for entry in &state.frontier {
            visited.insert(&entry.url);
        }

        Self {
            visited,
            frontier: state.frontier.clone(),
            current_depth: state.current_depth,
        }
    }

    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }

    pub fn visited_mut(&mut self) -> &mut VisitedSet {
        &mut self.visited
    }

    /// Pending entries, bottom of the stack first
    pub fn frontier(&self) -> &[FrontierEntry] {
        &self.frontier
    }

    /// Depth of the entry most recently taken from the frontier
    pub fn current_depth(&self) -> u32 {
        self.current_depth
    }

    /// Takes the next entry to expand
    pub fn pop(&mut self) -> Option<FrontierEntry> {
        let entry = self.frontier.pop()?;
        self.current_depth = entry.depth;
        Some(entry)
    }

    /// Schedules the children of a page, first child on top
    pub fn push_children(&mut self, children: &[String], depth: u32) {
        self.frontier.extend(
            children
                .iter()
                .rev()
                .map(|url| FrontierEntry::new(url.as_str(), depth)),
        );
    }
}

/// Cooperative interruption flag
///
/// Cloned handles share one flag. The traversal only checks it between page
/// expansions, so a fetch in flight always completes.
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    stopped: Arc<AtomicBool>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the traversal to stop, returning true if it was already requested
    pub fn request_stop(&self) -> bool {
        self.stopped.swap(true, Ordering::SeqCst)
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}
