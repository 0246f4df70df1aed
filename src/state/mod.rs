//! State module for tracking traversal progress
//!
//! # Components
//!
//! - `VisitedSet`: Global deduplication ledger of discovered URLs
//! - `TraversalContext`: Owns the visited set, the frontier work-stack and the depth counter
//! - `StopSignal`: Cooperative interruption flag checked between page expansions
//! - `Snapshot`: Durable record of an interrupted traversal

mod context;
mod snapshot;
mod visited;

// Re-export main types
pub use context::{FrontierEntry, StopSignal, TraversalContext};
pub use snapshot::{Snapshot, SnapshotState, SNAPSHOT_FORMAT_VERSION};
pub use visited::VisitedSet;
