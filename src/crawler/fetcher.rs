//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the tracer, including:
//! - Building the HTTP client with the configured user agent and timeouts
//! - GET requests to fetch page content
//! - Decoding bodies with the declared character encoding
//! - Classifying failures as leaves of the traversal
//!
//! There is exactly one attempt per URL. Redirects follow reqwest's default
//! policy.

use crate::config::HttpConfig;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::future::Future;
use std::time::Duration;

/// Encoding assumed when the server declares none
pub const DEFAULT_ENCODING: &str = "utf-8";

/// Result of a fetch operation
///
/// Both failure variants mean "this page has no children"; neither aborts
/// the traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Successfully fetched and decoded the page
    Fetched {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Declared character encoding (`utf-8` when absent)
        encoding: String,
        /// Decoded page body
        body: String,
    },

    /// The page could not be retrieved (unreachable host, timeout,
    /// malformed URL, or an HTTP error status)
    FetchFailed {
        /// Error description
        reason: String,
    },

    /// The response arrived but its body could not be read or decoded
    ParseFailed {
        /// Error description
        reason: String,
    },
}

/// Something that can retrieve a page for the traversal engine
///
/// [`HttpSource`] is the production implementation; tests substitute an
/// in-memory site.
pub trait PageSource {
    fn fetch(&self, url: &str) -> impl Future<Output = FetchOutcome>;
}

/// Page source backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    /// Builds a source with a client configured from `config`
    pub fn from_config(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }
}

impl PageSource for HttpSource {
    async fn fetch(&self, url: &str) -> FetchOutcome {
        fetch_url(&self.client, url).await
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The HTTP client configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL with a single GET request
///
/// | Condition | Outcome |
/// |-----------|---------|
/// | 2xx, body decoded | Fetched |
/// | Non-2xx status | FetchFailed |
/// | Timeout / connection refused / DNS / bad URL | FetchFailed |
/// | Body read or decode error | ParseFailed |
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
pub async fn fetch_url(client: &Client, url: &str) -> FetchOutcome {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            let reason = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                format!("Connection failed: {}", e)
            } else if e.is_builder() {
                format!("Malformed URL: {}", e)
            } else {
                e.to_string()
            };
            return FetchOutcome::FetchFailed { reason };
        }
    };

    let status = response.status();
    if !status.is_success() {
        return FetchOutcome::FetchFailed {
            reason: format!("HTTP {}", status.as_u16()),
        };
    }

    let final_url = response.url().to_string();
    let encoding = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(declared_charset)
        .unwrap_or_else(|| DEFAULT_ENCODING.to_string());

    match response.text_with_charset(DEFAULT_ENCODING).await {
        Ok(body) => FetchOutcome::Fetched {
            final_url,
            status_code: status.as_u16(),
            encoding,
            body,
        },
        Err(e) => FetchOutcome::ParseFailed {
            reason: format!("Failed to read body: {}", e),
        },
    }
}

/// Extracts the `charset` parameter of a Content-Type header value
fn declared_charset(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .skip(1)
        .filter_map(|param| param.split_once('='))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("charset"))
        .map(|(_, value)| value.trim().trim_matches('"').to_ascii_lowercase())
        .filter(|value| !value.is_empty())
}
