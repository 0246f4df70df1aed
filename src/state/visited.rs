use std::collections::HashSet;

/// Set of URLs already discovered during a traversal
///
/// The set is shared by every branch of the traversal and only grows, so a
/// URL is emitted at most once per run, including across resumed runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitedSet {
    urls: HashSet<String>,
}

impl VisitedSet {
    /// Creates an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a URL, returning true if it had not been seen before
    pub fn insert(&mut self, url: &str) -> bool {
        if self.urls.contains(url) {
            return false;
        }
        self.urls.insert(url.to_string())
    }

    /// Returns true if the URL has already been discovered
    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Returns the URLs in lexicographic order
    pub fn to_sorted_vec(&self) -> Vec<String> {
        let mut urls: Vec<String> = self.urls.iter().cloned().collect();
        urls.sort();
        urls
    }
}

impl FromIterator<String> for VisitedSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            urls: iter.into_iter().collect(),
        }
    }
}
