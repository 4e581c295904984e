//! HTML extractor for page records and candidate links
//!
//! This module parses a fetched document to extract:
//! - The page title (first heading)
//! - A short content preview built from the main content paragraphs
//! - A bounded list of article links to follow

use crate::config::ExtractConfig;
use crate::output::{PageRecord, CONTENT_PREVIEW_LIMIT};
use crate::url::LinkFilter;
use crate::ConfigError;
use scraper::{Html, Selector};
use url::Url;

/// What a single successful visit yields
#[derive(Debug, Clone, Default)]
pub struct CrawlOutcome {
    /// The extracted record, absent when the page had no content
    pub record: Option<PageRecord>,

    /// Candidate links in document order, at most the per-page cap
    pub links: Vec<Url>,
}

/// Compiled extraction rules
#[derive(Debug, Clone)]
pub struct Extractor {
    title_selector: Selector,
    content_selector: Selector,
    anchor_selector: Selector,
    link_filter: LinkFilter,
    max_links: usize,
    language: String,
}

impl Extractor {
    /// Compiles the selectors from the extraction settings
    ///
    /// # Returns
    ///
    /// * `Ok(Extractor)` - Ready to extract
    /// * `Err(ConfigError::InvalidSelector)` - A selector failed to parse
    pub fn new(config: &ExtractConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            title_selector: compile(&config.title_selector)?,
            content_selector: compile(&config.content_selector)?,
            anchor_selector: compile("a[href]")?,
            link_filter: LinkFilter::new(config.link_prefix.clone()),
            max_links: config.max_links_per_page,
            language: config.language.clone(),
        })
    }

    /// Extracts a record and candidate links from a document
    ///
    /// # Extraction Rules
    ///
    /// - **title**: text of the first title-selector match, whitespace
    ///   collapsed; empty if there is none
    /// - **content**: text of every content-selector match, each trimmed,
    ///   empty blocks dropped, joined by single spaces, whitespace runs
    ///   collapsed, then cut to the first [`CONTENT_PREVIEW_LIMIT`] characters
    /// - **links**: `a[href]` values accepted by the link filter, resolved
    ///   against `page_url`, first `max_links` only
    ///
    /// No record is produced when the content is empty; links are still
    /// returned.
    ///
    /// # Example
    ///
    /// ```
    /// use article_harvester::config::ExtractConfig;
    /// use article_harvester::crawler::Extractor;
    /// use url::Url;
    ///
    /// let extractor = Extractor::new(&ExtractConfig::default()).unwrap();
    /// let html = r#"<h1>Rust</h1><div class="mw-parser-output"><p>A language.</p>
    ///     <a href="/wiki/Cargo">Cargo</a></div>"#;
    /// let page = Url::parse("https://en.wikipedia.org/wiki/Rust").unwrap();
    ///
    /// let outcome = extractor.extract(html, &page);
    /// assert_eq!(outcome.record.unwrap().title, "Rust");
    /// assert_eq!(outcome.links[0].as_str(), "https://en.wikipedia.org/wiki/Cargo");
    /// ```
    pub fn extract(&self, document: &str, page_url: &Url) -> CrawlOutcome {
        self.extract_with_base(document, page_url, page_url)
    }

    /// Like [`Extractor::extract`], but resolves links against `link_base`
    ///
    /// Used after a redirect: the record keeps the requested address while
    /// relative links belong to the page that was actually served.
    pub fn extract_with_base(
        &self,
        document: &str,
        page_url: &Url,
        link_base: &Url,
    ) -> CrawlOutcome {
        let html = Html::parse_document(document);

        let title = self.extract_title(&html);
        let content = self.extract_content(&html);
        let links = self.extract_links(&html, link_base);

        let record = if content.is_empty() {
            None
        } else {
            Some(PageRecord {
                title,
                url: page_url.to_string(),
                language: self.language.clone(),
                content,
            })
        };

        CrawlOutcome { record, links }
    }

    fn extract_title(&self, html: &Html) -> String {
        html.select(&self.title_selector)
            .next()
            .map(|element| collapse_whitespace(&element.text().collect::<String>()))
            .unwrap_or_default()
    }

    fn extract_content(&self, html: &Html) -> String {
        let joined = html
            .select(&self.content_selector)
            .map(|element| element.text().collect::<String>())
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        truncate_chars(&collapse_whitespace(&joined), CONTENT_PREVIEW_LIMIT)
    }

    fn extract_links(&self, html: &Html, base: &Url) -> Vec<Url> {
        html.select(&self.anchor_selector)
            .filter_map(|element| element.value().attr("href"))
            .filter_map(|href| self.link_filter.resolve(href, base))
            .take(self.max_links)
            .collect()
    }
}

fn compile(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector)
        .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {:?}", selector, e)))
}

/// Collapses every whitespace run to a single space and trims the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keeps the first `limit` characters of `text`
pub fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}
