use crate::output::OutputTarget;
use crate::url::RootUrl;
use serde::Deserialize;
use std::path::PathBuf;

/// Default snapshot file written on interruption
pub const DEFAULT_SNAPSHOT_PATH: &str = "trace.dump";

/// Main configuration structure for Sitetrace, as read from a TOML file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub trace: TraceConfig,
    pub http: HttpConfig,
}

/// Traversal defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Maximum depth to follow links from the root (0 = unbounded)
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// File receiving the link hierarchy (stdout when absent)
    pub output: Option<String>,

    /// File the traversal state is written to on interruption
    pub snapshot: String,

    /// Whether links with query strings are followed
    #[serde(rename = "dynamic-urls")]
    pub dynamic_urls: bool,

    /// Whether per-link diagnostics are printed
    pub debug: bool,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            max_depth: 0,
            output: None,
            snapshot: DEFAULT_SNAPSHOT_PATH.to_string(),
            dynamic_urls: false,
            debug: false,
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Total request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Connection timeout in seconds
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("sitetrace/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// Options given explicitly on the command line
///
/// `None`/`false` means "not supplied", so that restored or configured values
/// are kept.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub max_depth: Option<u32>,
    pub output: Option<PathBuf>,
    pub snapshot: Option<PathBuf>,
    pub dynamic_urls: bool,
    pub debug: bool,
}

/// Fully resolved settings for one traversal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceSettings {
    pub root: RootUrl,
    pub max_depth: u32,
    pub output: OutputTarget,
    pub snapshot_path: PathBuf,
    pub dynamic_urls: bool,
    pub debug: bool,
}
