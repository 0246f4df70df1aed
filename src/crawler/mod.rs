//! Crawler module for page fetching and link tracing
//!
//! This module contains the core tracing logic, including:
//! - HTTP fetching, one attempt per URL
//! - HTML parsing and link extraction
//! - The depth-first traversal engine

mod engine;
mod fetcher;
mod parser;

pub use engine::{resume_trace, run_trace, start_trace, TraceOutcome, Tracer};
pub use fetcher::{
    build_http_client, fetch_url, FetchOutcome, HttpSource, PageSource, DEFAULT_ENCODING,
};
pub use parser::{parse_html, LinkExtractor, ParsedPage};
