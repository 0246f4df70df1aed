//! URL handling module for Sitetrace
//!
//! This module owns the root boundary of a trace and the per-link
//! filtering/rewriting pipeline applied to every anchor target.

mod normalize;
mod root;

// Re-export main functions
pub use normalize::normalize_link;
pub use root::{page_directory, RootUrl};

/// Outcome of running one anchor target through the normalization pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkDecision {
    /// The link is inside the root and should be recorded under this URL
    Follow(String),
    /// The link was filtered out
    Skip(SkipReason),
}

impl LinkDecision {
    /// Returns the normalized URL if the link should be followed
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Follow(url) => Some(url),
            Self::Skip(_) => None,
        }
    }
}

/// Why a link was filtered out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// Blank `href` value
    Empty,
    /// Contains a query string while dynamic URLs are disallowed
    QueryString,
    /// Contains a fragment marker (in-page reference)
    Fragment,
    /// Protocol-relative, or carries a scheme that does not match the root
    External,
    /// Parent-directory reference that could not be resolved
    Unresolvable,
    /// Resolved to a URL outside the root boundary
    OutsideRoot,
}
