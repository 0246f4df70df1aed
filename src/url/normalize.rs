use crate::url::root::{page_directory, RootUrl};
use crate::url::{LinkDecision, SkipReason};
use url::Url;

/// Normalizes an anchor target according to Sitetrace's link rules
///
/// # Pipeline
///
/// Each rule either rewrites the value or skips the link, in this order:
///
/// 1. Blank values are skipped
/// 2. Values containing `?` are skipped unless dynamic URLs are allowed
/// 3. Values containing `#` are skipped (in-page references)
/// 4. Protocol-relative values (`//host/...`) and values whose scheme does
///    not match the root are skipped
/// 5. `../` references are resolved against the page's directory
/// 6. Site-absolute values (`/path`) become root + `path`
/// 7. A leading `./` is dropped; anything not starting with `http://` or
///    `https://` is prefixed with the root
/// 8. Results outside the root are skipped
///
/// Deduplication against the visited set is not part of this function; it is
/// pure, and normalizing an already-normalized URL returns it unchanged.
///
/// # Arguments
///
/// * `href` - The raw `href` attribute value
/// * `page_url` - The URL of the page the anchor was found on
/// * `root` - The root boundary of the trace
/// * `allow_dynamic` - Whether links with query strings are kept
///
/// # Examples
///
/// ```
/// use sitetrace::url::{normalize_link, LinkDecision, RootUrl};
///
/// let root = RootUrl::parse("http://example.com/").unwrap();
/// let decision = normalize_link("/about", "http://example.com/", &root, false);
/// assert_eq!(decision, LinkDecision::Follow("http://example.com/about".to_string()));
/// ```
pub fn normalize_link(
    href: &str,
    page_url: &str,
    root: &RootUrl,
    allow_dynamic: bool,
) -> LinkDecision {
    let value = href.trim();

    if value.is_empty() {
        return LinkDecision::Skip(SkipReason::Empty);
    }

    if !allow_dynamic && value.contains('?') {
        return LinkDecision::Skip(SkipReason::QueryString);
    }

    if value.contains('#') {
        return LinkDecision::Skip(SkipReason::Fragment);
    }

    if value.starts_with("//") || (has_scheme(value) && !root.contains(value)) {
        return LinkDecision::Skip(SkipReason::External);
    }

    let resolved = if value.starts_with("../") {
        match resolve_parent(value, page_url) {
            Some(url) => url,
            None => return LinkDecision::Skip(SkipReason::Unresolvable),
        }
    } else if let Some(rest) = value.strip_prefix('/') {
        root.join_relative(rest)
    } else {
        let value = value.strip_prefix("./").unwrap_or(value);
        if value.starts_with("http://") || value.starts_with("https://") {
            value.to_string()
        } else {
            root.join_relative(value)
        }
    };

    if !root.contains(&resolved) {
        return LinkDecision::Skip(SkipReason::OutsideRoot);
    }

    LinkDecision::Follow(resolved)
}

/// Resolves a `../` reference against the directory of the page it was found on
fn resolve_parent(value: &str, page_url: &str) -> Option<String> {
    let page = Url::parse(page_url).ok()?;
    page_directory(&page)
        .join(value)
        .ok()
        .map(|url| url.to_string())
}

/// Checks whether a value starts with a URI scheme (`name:`)
fn has_scheme(value: &str) -> bool {
    match value.split_once(':') {
        Some((scheme, _)) => {
            let mut chars = scheme.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
                && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}
