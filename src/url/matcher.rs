//! Link filter for candidate article links
//!
//! Decides which anchors found on a page are followed and turns the accepted
//! ones into absolute addresses.

use url::Url;

/// Character that marks special namespaces (`File:`, `Help:`, `Talk:` ...)
pub const NAMESPACE_SEPARATOR: char = ':';

/// Decides which anchors on a page are followed
///
/// An href is accepted when it is a site-relative path starting with the
/// configured prefix and contains no namespace separator anywhere. Absolute
/// hrefs always carry a `:` after their scheme and are therefore rejected,
/// which keeps the traversal on the site being crawled.
#[derive(Debug, Clone)]
pub struct LinkFilter {
    prefix: String,
}

impl LinkFilter {
    /// Creates a filter for hrefs starting with `prefix` (e.g. "/wiki/")
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// The path prefix this filter accepts
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns true if the raw href is an allowed article path
    ///
    /// # Examples
    ///
    /// ```
    /// use article_harvester::url::LinkFilter;
    ///
    /// let filter = LinkFilter::new("/wiki/");
    /// assert!(filter.matches("/wiki/Rust_(programming_language)"));
    /// assert!(!filter.matches("/wiki/File:Logo.svg"));
    /// assert!(!filter.matches("https://example.com/wiki/Rust"));
    /// assert!(!filter.matches("/w/index.php"));
    /// ```
    pub fn matches(&self, href: &str) -> bool {
        href.starts_with(&self.prefix) && !href.contains(NAMESPACE_SEPARATOR)
    }

    /// Filters and resolves an href against the page it was found on
    ///
    /// Returns None if the href is not an allowed article path or cannot be
    /// joined onto `base`.
    pub fn resolve(&self, href: &str, base: &Url) -> Option<Url> {
        let href = href.trim();
        if !self.matches(href) {
            return None;
        }
        base.join(href).ok()
    }
}
