use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref HREF_PATTERN: Regex = Regex::new(r#"HREF="(.*?)""#).unwrap();
}

/// Substring a link target must contain to count as a school result page
const RESULT_MARKER: &str = "result";

/// Scans raw index markup for school result links
///
/// This is a lexical scan over `HREF="..."` attributes, not a DOM parse. The
/// attribute name is matched case-sensitively, the way the portal emits it.
pub struct LinkExtractor {
    base_url: String,
}

impl LinkExtractor {
    /// Create an extractor that prefixes every target with `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Extract absolute school result URLs in document order
    ///
    /// Returns an empty vector when nothing matches.
    pub fn extract(&self, html: &str) -> Vec<String> {
        let links: Vec<String> = HREF_PATTERN
            .captures_iter(html)
            .filter_map(|caps| caps.get(1))
            .map(|target| target.as_str())
            .filter(|target| target.contains(RESULT_MARKER))
            .map(|target| self.absolute(target))
            .collect();

        tracing::debug!("Extracted {} school links", links.len());
        links
    }

    /// Only the first backslash is normalized
    fn absolute(&self, target: &str) -> String {
        format!("{}{}", self.base_url, target.replacen('\\', "/", 1))
    }
}

impl Default for LinkExtractor {
    fn default() -> Self {
        Self::new(crate::DEFAULT_BASE_URL)
    }
}
