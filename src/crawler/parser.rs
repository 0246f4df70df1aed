//! HTML parser for extracting links
//!
//! Anchors are read with `scraper`, whose html5ever tree builder recovers
//! from malformed markup: every anchor it can recover is returned, so link
//! extraction is best-effort and never fails.

use crate::state::VisitedSet;
use crate::url::{normalize_link, LinkDecision, RootUrl};
use scraper::{Html, Selector};

/// Extracted information from an HTML page
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// The page title (from <title> tag)
    pub title: Option<String>,

    /// Raw `href` values of all anchors, in document order
    pub hrefs: Vec<String>,
}

/// Parses HTML content and extracts the anchor targets and title
///
/// # Example
///
/// ```
/// use sitetrace::crawler::parse_html;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let parsed = parse_html(html);
/// assert_eq!(parsed.title, Some("Test".to_string()));
/// assert_eq!(parsed.hrefs, vec!["/page".to_string()]);
/// ```
pub fn parse_html(html: &str) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        hrefs: extract_hrefs(&document),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts the `href` of every `<a>` element
fn extract_hrefs(document: &Html) -> Vec<String> {
    let mut hrefs = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                hrefs.push(href.to_string());
            }
        }
    }

    hrefs
}

/// Turns page markup into the list of newly discovered links
///
/// Each anchor target goes through [`normalize_link`]; survivors are checked
/// against the global visited set, which is updated as a side effect so a
/// URL is returned at most once across the whole traversal.
#[derive(Debug, Clone, Copy)]
pub struct LinkExtractor<'a> {
    root: &'a RootUrl,
    allow_dynamic: bool,
    verbose: bool,
}

impl<'a> LinkExtractor<'a> {
    pub fn new(root: &'a RootUrl, allow_dynamic: bool) -> Self {
        Self {
            root,
            allow_dynamic,
            verbose: false,
        }
    }

    /// Reports every link's raw and normalized value at info level
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Extracts new links from a page, in document order
    ///
    /// # Arguments
    ///
    /// * `html` - The decoded page body
    /// * `page_url` - The URL of the page, used to resolve `../` references
    /// * `visited` - The traversal's visited set
    pub fn extract(&self, html: &str, page_url: &str, visited: &mut VisitedSet) -> Vec<String> {
        let parsed = parse_html(html);
        tracing::debug!(
            "Parsed {} ({}): {} anchors",
            page_url,
            parsed.title.as_deref().unwrap_or("untitled"),
            parsed.hrefs.len()
        );

        let mut links = Vec::new();
        for href in &parsed.hrefs {
            let decision = normalize_link(href, page_url, self.root, self.allow_dynamic);
            self.report(href, &decision);

            if let LinkDecision::Follow(url) = decision {
                if visited.insert(&url) {
                    links.push(url);
                }
            }
        }

        links
    }

    fn report(&self, href: &str, decision: &LinkDecision) {
        if self.verbose {
            tracing::info!("link {:?} -> {:?}", href, decision);
        } else {
            tracing::trace!("link {:?} -> {:?}", href, decision);
        }
    }
}
