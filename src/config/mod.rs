//! Configuration module for Sitetrace
//!
//! Settings are layered: built-in defaults, an optional TOML file, a restored
//! snapshot (when resuming), then flags given on the command line.
//!
//! # Example
//!
//! ```no_run
//! use sitetrace::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sitetrace.toml")).unwrap();
//! println!("Tracer will use max depth: {}", config.trace.max_depth);
//! ```

mod parser;
mod settings;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, HttpConfig, Overrides, TraceConfig, TraceSettings, DEFAULT_SNAPSHOT_PATH,
};

// Re-export parser functions
pub use parser::{load_config, load_optional_config};
pub use settings::snapshot_path;
