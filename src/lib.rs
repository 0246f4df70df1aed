//! Sitetrace: a small web tracer
//!
//! This crate follows `<a href>` links from a root URL, depth-first and up to
//! a configurable depth, and writes the discovered link hierarchy to an output
//! stream. An interrupted trace can be snapshotted and resumed later.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Sitetrace operations
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Errors raised while saving or restoring a trace snapshot
///
/// Every load failure is fatal: a resume that cannot be honored must never
/// silently restart from the root.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Snapshot file not found: {0}")]
    Missing(String),

    #[error("Failed to access snapshot file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Unsupported snapshot format version {found} (expected {expected})")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("Snapshot checksum mismatch (stored {stored}, computed {computed})")]
    ChecksumMismatch { stored: String, computed: String },

    #[error("Snapshot was taken for root {snapshot}, but {requested} was requested")]
    RootMismatch { snapshot: String, requested: String },
}

/// Result type alias for Sitetrace operations
pub type Result<T> = std::result::Result<T, TraceError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

/// Result type alias for snapshot operations
pub type SnapshotResult<T> = std::result::Result<T, SnapshotError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{FetchOutcome, PageSource, TraceOutcome, Tracer};
pub use state::{Snapshot, StopSignal, TraversalContext, VisitedSet};
pub use url::{normalize_link, RootUrl};
