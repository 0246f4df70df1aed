use crate::{UrlError, UrlResult};
use std::fmt;
use url::Url;

/// The starting page of a trace and the boundary derived from it
///
/// The page is the user-supplied URL without query or fragment; it is the
/// first page fetched and the first line printed. The base is the page
/// itself when it ends in `/`, otherwise the page's directory. Every
/// followed link must start with the base, and site-absolute and relative
/// links are rewritten by concatenating onto it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RootUrl {
    page: String,
    base: String,
}

impl RootUrl {
    /// Parses a user-supplied root URL
    ///
    /// # Examples
    ///
    /// ```
    /// use sitetrace::url::RootUrl;
    ///
    /// let root = RootUrl::parse("http://EXAMPLE.com/docs/index.html?lang=en").unwrap();
    /// assert_eq!(root.page(), "http://example.com/docs/index.html");
    /// assert_eq!(root.base(), "http://example.com/docs/");
    /// ```
    pub fn parse(input: &str) -> UrlResult<Self> {
        let mut url = Url::parse(input.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(UrlError::InvalidScheme(format!(
                "Only HTTP and HTTPS roots are supported, got: {}",
                url.scheme()
            )));
        }

        if url.host_str().is_none() {
            return Err(UrlError::MissingHost);
        }

        url.set_query(None);
        url.set_fragment(None);

        let page = url.to_string();
        let base = if page.ends_with('/') {
            page.clone()
        } else {
            page_directory(&url).to_string()
        };

        Ok(Self { page, base })
    }

    /// The first page of the trace
    pub fn page(&self) -> &str {
        &self.page
    }

    /// The boundary prefix, always ending in `/`
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Returns true if `url` lies inside the boundary
    pub fn contains(&self, url: &str) -> bool {
        url.starts_with(&self.base)
    }

    /// Prefixes a base-relative path with the base
    pub fn join_relative(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}

impl fmt::Display for RootUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.page)
    }
}

/// Returns the directory of a page: the page URL with its last path segment removed
///
/// ```
/// use sitetrace::url::page_directory;
/// use url::Url;
///
/// let page = Url::parse("http://example.com/a/b.html").unwrap();
/// assert_eq!(page_directory(&page).as_str(), "http://example.com/a/");
/// ```
pub fn page_directory(page: &Url) -> Url {
    let mut dir = page.clone();
    dir.set_query(None);
    dir.set_fragment(None);
    if let Ok(mut segments) = dir.path_segments_mut() {
        segments.pop().push("");
    }
    dir
}
