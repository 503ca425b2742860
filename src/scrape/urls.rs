//! Search-page URL construction
//!
//! Each target site has its own URL grammar, and reproducing it exactly is
//! part of the adapter contract: Indeed is purely query-parameter driven
//! with a `start` offset in increments of 10, while Naukri lower-cases and
//! hyphenates the free-text keyword/location into a path slug and appends
//! the page number as a trailing path segment.

use url::Url;

/// Builds the absolute URL for one search-result page
pub trait UrlBuilder: Send {
    fn page_url(&self, keyword: &str, location: &str, page: u32) -> String;
}

/// Indeed: `/jobs?q={keyword}&l={location}&start={(page-1)*10}`
pub struct IndeedUrlBuilder {
    base: Url,
}

impl IndeedUrlBuilder {
    pub fn new(base: Url) -> Self {
        Self { base }
    }
}

impl UrlBuilder for IndeedUrlBuilder {
    fn page_url(&self, keyword: &str, location: &str, page: u32) -> String {
        let mut url = self.base.clone();
        url.set_path("/jobs");
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", keyword);
            pairs.append_pair("l", location);
            // Offset pagination; page 1 carries no start parameter
            if page > 1 {
                pairs.append_pair("start", &((page - 1) * 10).to_string());
            }
        }
        url.to_string()
    }
}

/// Naukri: `/{keyword-slug}-jobs-in-{location-slug}[-{page}]?k=..&l=..`
pub struct NaukriUrlBuilder {
    base: Url,
}

impl NaukriUrlBuilder {
    pub fn new(base: Url) -> Self {
        Self { base }
    }
}

impl UrlBuilder for NaukriUrlBuilder {
    fn page_url(&self, keyword: &str, location: &str, page: u32) -> String {
        let mut segment = format!("{}-jobs-in-{}", slugify(keyword), slugify(location));
        if page > 1 {
            segment.push('-');
            segment.push_str(&page.to_string());
        }

        let mut url = self.base.clone();
        url.set_path(&segment);
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("k", &keyword.to_lowercase());
            pairs.append_pair("l", &location.to_lowercase());
        }
        url.to_string()
    }
}

/// Lower-cases free text and hyphenates it into a path segment, collapsing
/// every run of non-alphanumeric characters into a single hyphen.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            for lower in c.to_lowercase() {
                slug.push(lower);
            }
        } else {
            pending_hyphen = true;
        }
    }

    slug
}
