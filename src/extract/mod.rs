//! Structured extractors
//!
//! Per-site extraction of listing fragments from raw HTML. Target sites
//! A/B-test and migrate their markup continuously, so nothing here relies
//! on a single selector: card discovery and every field try an ordered
//! list of alternatives and accept the first that matches. A field that
//! never matches is `None`; a card with neither title nor organization is
//! skipped; a document that matches nothing yields an empty list. None of
//! these are errors.

mod indeed;
mod naukri;

pub use indeed::IndeedExtractor;
pub use naukri::NaukriExtractor;

use scraper::{ElementRef, Html, Selector};

use crate::model::{ListingFragment, SourceSite};

/// Contract for turning one raw document into listing fragments
pub trait Extractor: Send {
    /// The site whose markup this extractor understands
    fn site(&self) -> SourceSite;

    /// Extracts fragments from one page of HTML. Infallible: markup drift
    /// degrades to an empty result, never to an error.
    fn extract(&self, html: &str) -> Vec<ListingFragment>;

    /// Selector alternatives identifying a listing card, exposed so the
    /// browser fetcher can use them as its render-completion signal.
    fn card_selectors(&self) -> &'static [&'static str];
}

/// Collects card elements using the first selector alternative that
/// yields at least one match.
pub(crate) fn select_cards<'a>(
    document: &'a Html,
    alternatives: &[&str],
) -> Vec<ElementRef<'a>> {
    for alternative in alternatives {
        let Ok(selector) = Selector::parse(alternative) else {
            continue;
        };
        let cards: Vec<ElementRef<'a>> = document.select(&selector).collect();
        if !cards.is_empty() {
            return cards;
        }
    }
    Vec::new()
}

/// First non-empty text content among the selector alternatives.
pub(crate) fn first_text(scope: ElementRef<'_>, alternatives: &[&str]) -> Option<String> {
    for alternative in alternatives {
        let Ok(selector) = Selector::parse(alternative) else {
            continue;
        };
        if let Some(element) = scope.select(&selector).next() {
            let text = element.text().collect::<String>();
            let text = text.trim();
            if !text.is_empty() {
                return Some(text.to_string());
            }
        }
    }
    None
}

/// First non-empty attribute value among the selector alternatives,
/// checking the scope element itself before its descendants.
pub(crate) fn first_attr(
    scope: ElementRef<'_>,
    alternatives: &[&str],
    attr: &str,
) -> Option<String> {
    if let Some(value) = non_empty(scope.value().attr(attr)) {
        return Some(value);
    }

    for alternative in alternatives {
        let Ok(selector) = Selector::parse(alternative) else {
            continue;
        };
        if let Some(element) = scope.select(&selector).next() {
            if let Some(value) = non_empty(element.value().attr(attr)) {
                return Some(value);
            }
        }
    }
    None
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_cards_prefers_earlier_alternative() {
        let html = Html::parse_document(
            r#"<div class="new-card">a</div><div class="old-card">b</div>"#,
        );
        let cards = select_cards(&html, &["div.new-card", "div.old-card"]);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].text().collect::<String>(), "a");
    }

    #[test]
    fn test_select_cards_falls_back_when_primary_missing() {
        let html = Html::parse_document(r#"<div class="old-card">b</div>"#);
        let cards = select_cards(&html, &["div.new-card", "div.old-card"]);
        assert_eq!(cards.len(), 1);
    }

    #[test]
    fn test_select_cards_empty_when_nothing_matches() {
        let html = Html::parse_document("<p>nothing here</p>");
        assert!(select_cards(&html, &["div.new-card", "div.old-card"]).is_empty());
    }

    #[test]
    fn test_first_text_skips_empty_matches() {
        let html = Html::parse_document(
            r#"<div id="root"><span class="a">   </span><span class="b">hello</span></div>"#,
        );
        let root = html.root_element();
        assert_eq!(
            first_text(root, &["span.a", "span.b"]),
            Some("hello".to_string())
        );
    }

    #[test]
    fn test_first_attr_checks_scope_element_first() {
        let html = Html::parse_document(
            r#"<div id="card" data-id="outer"><a data-id="inner">x</a></div>"#,
        );
        let selector = Selector::parse("div#card").unwrap();
        let card = html.select(&selector).next().unwrap();
        assert_eq!(first_attr(card, &["a"], "data-id"), Some("outer".to_string()));
    }
}
