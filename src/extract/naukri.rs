//! Naukri result-page extractor
//!
//! Covers the current `srp-jobtuple-wrapper` layout and the older
//! `jobTuple` article cards.

use scraper::Html;

use super::{first_attr, first_text, select_cards, Extractor};
use crate::model::{ListingFragment, SourceSite};

const CARD_SELECTORS: &[&str] = &[
    "div.srp-jobtuple-wrapper",
    "article.jobTuple",
    "div.cust-job-tuple",
];

const TITLE_SELECTORS: &[&str] = &["a.title", "a.jobTitle", "div.title a"];

const ORGANIZATION_SELECTORS: &[&str] = &[
    "a.comp-name",
    "a.subTitle",
    "span.comp-name",
    "div.companyInfo a",
];

const LOCATION_SELECTORS: &[&str] = &[
    "span.locWdth",
    "span.loc-wrap span",
    "li.location span",
    "span.location",
];

const COMPENSATION_SELECTORS: &[&str] = &["span.sal-wrap span", "li.salary span", "span.sal"];

const SNIPPET_SELECTORS: &[&str] = &["span.job-desc", "div.job-description", "ul.tags-gt"];

const DETAIL_LINK_SELECTORS: &[&str] = &["a.title", "a.jobTitle", "div.title a"];

/// Extractor for Naukri search-result pages
#[derive(Debug, Default, Clone, Copy)]
pub struct NaukriExtractor;

impl Extractor for NaukriExtractor {
    fn site(&self) -> SourceSite {
        SourceSite::Naukri
    }

    fn card_selectors(&self) -> &'static [&'static str] {
        CARD_SELECTORS
    }

    fn extract(&self, html: &str) -> Vec<ListingFragment> {
        let document = Html::parse_document(html);
        let mut fragments = Vec::new();

        for card in select_cards(&document, CARD_SELECTORS) {
            let title = first_text(card, TITLE_SELECTORS);
            let organization = first_text(card, ORGANIZATION_SELECTORS);

            if title.is_none() && organization.is_none() {
                continue;
            }

            let mut fragment = ListingFragment::new(SourceSite::Naukri);
            fragment.external_id = first_attr(card, &[], "data-job-id");
            fragment.title = title;
            fragment.organization = organization;
            fragment.location_text = first_text(card, LOCATION_SELECTORS);
            fragment.compensation_text = first_text(card, COMPENSATION_SELECTORS);
            fragment.description_snippet = first_text(card, SNIPPET_SELECTORS);
            fragment.detail_url = first_attr(card, DETAIL_LINK_SELECTORS, "href");
            fragments.push(fragment);
        }

        fragments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_from_current_markup() {
        let html = r#"<html><body>
            <div class="srp-jobtuple-wrapper" data-job-id="91001">
              <a class="title" href="https://www.naukri.com/job-listings-sde-91001">SDE II</a>
              <a class="comp-name">Flipkart (4,210 reviews)</a>
              <span class="locWdth">Bengaluru</span>
              <span class="sal-wrap"><span>12-18 Lacs PA</span></span>
              <span class="job-desc">Own services end to end.</span>
            </div>
        </body></html>"#;

        let fragments = NaukriExtractor.extract(html);
        assert_eq!(fragments.len(), 1);
        let fragment = &fragments[0];
        assert_eq!(fragment.external_id.as_deref(), Some("91001"));
        assert_eq!(fragment.title.as_deref(), Some("SDE II"));
        assert_eq!(
            fragment.organization.as_deref(),
            Some("Flipkart (4,210 reviews)")
        );
        assert_eq!(fragment.location_text.as_deref(), Some("Bengaluru"));
        assert_eq!(fragment.compensation_text.as_deref(), Some("12-18 Lacs PA"));
        assert_eq!(
            fragment.detail_url.as_deref(),
            Some("https://www.naukri.com/job-listings-sde-91001")
        );
        assert_eq!(fragment.source_site, SourceSite::Naukri);
    }

    #[test]
    fn test_extracts_from_older_article_markup() {
        let html = r#"<html><body>
            <article class="jobTuple">
              <a class="jobTitle" href="/job-listings-qa-77">QA Engineer</a>
              <a class="subTitle">Zoho</a>
              <li class="location"><span>Chennai</span></li>
            </article>
        </body></html>"#;

        let fragments = NaukriExtractor.extract(html);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].title.as_deref(), Some("QA Engineer"));
        assert_eq!(fragments[0].organization.as_deref(), Some("Zoho"));
        assert_eq!(fragments[0].location_text.as_deref(), Some("Chennai"));
        assert_eq!(fragments[0].external_id, None);
    }

    #[test]
    fn test_skips_all_empty_cards() {
        let html = r#"<html><body>
            <div class="srp-jobtuple-wrapper" data-job-id="x">
              <span class="job-desc">promo tile</span>
            </div>
        </body></html>"#;

        assert!(NaukriExtractor.extract(html).is_empty());
    }

    #[test]
    fn test_drifted_markup_degrades_to_empty() {
        let html = r#"<html><body><section class="totally-new-layout">jobs!</section></body></html>"#;
        assert!(NaukriExtractor.extract(html).is_empty());
    }
}
