//! Output module for the link hierarchy and run statistics
//!
//! This module handles:
//! - Opening the output target (stdout or a file, appended to on resume)
//! - Writing one indented line per discovered link
//! - Summarizing a run

mod sink;
pub mod stats;

pub use sink::{LinkWriter, OutputTarget, INDENT};
pub use stats::{print_statistics, TraceStatistics};
