//! Indeed result-page extractor
//!
//! Indeed has cycled through several card layouts (`job_seen_beacon`,
//! `tapItem`, the legacy `SerpJobCard` table cells); the alternatives below
//! cover the variants observed in the wild, newest first.

use scraper::Html;

use super::{first_attr, first_text, select_cards, Extractor};
use crate::model::{ListingFragment, SourceSite};

const CARD_SELECTORS: &[&str] = &[
    "div.job_seen_beacon",
    "td.resultContent",
    "a.tapItem",
    "div.jobsearch-SerpJobCard",
];

const TITLE_SELECTORS: &[&str] = &[
    "h2.jobTitle span[title]",
    "h2.jobTitle a",
    "h2.jobTitle",
    "a.jobtitle",
];

const ORGANIZATION_SELECTORS: &[&str] = &[
    "span[data-testid='company-name']",
    "span.companyName",
    "span.company",
];

const LOCATION_SELECTORS: &[&str] = &[
    "div[data-testid='text-location']",
    "div.companyLocation",
    "span.location",
];

const COMPENSATION_SELECTORS: &[&str] = &[
    "div[data-testid='attribute_snippet_testid']",
    "div.salary-snippet-container",
    "span.salaryText",
];

const SNIPPET_SELECTORS: &[&str] = &[
    "div[data-testid='jobsnippet_footer']",
    "div.job-snippet",
    "div.summary",
];

const ID_CARRIER_SELECTORS: &[&str] = &["a[data-jk]", "a.jcs-JobTitle"];

const DETAIL_LINK_SELECTORS: &[&str] = &["h2.jobTitle a", "a.jcs-JobTitle", "a[data-jk]"];

/// Extractor for Indeed search-result pages
#[derive(Debug, Default, Clone, Copy)]
pub struct IndeedExtractor;

impl Extractor for IndeedExtractor {
    fn site(&self) -> SourceSite {
        SourceSite::Indeed
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

            // All-empty cards (ads, separators, drifted markup) are skipped
            if title.is_none() && organization.is_none() {
                continue;
            }

            let mut fragment = ListingFragment::new(SourceSite::Indeed);
            fragment.external_id = first_attr(card, ID_CARRIER_SELECTORS, "data-jk");
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

    fn current_markup_card(jk: &str, title: &str, company: &str) -> String {
        format!(
            r#"<div class="job_seen_beacon">
                 <h2 class="jobTitle"><a data-jk="{jk}" href="/rc/clk?jk={jk}"><span title="{title}">{title}</span></a></h2>
                 <span data-testid="company-name">{company}</span>
                 <div data-testid="text-location">in Bengaluru, Karnataka</div>
                 <div class="job-snippet">Build things.</div>
               </div>"#
        )
    }

    #[test]
    fn test_extracts_from_current_markup() {
        let html = format!(
            "<html><body>{}{}</body></html>",
            current_markup_card("abc123", "Software Engineer", "Acme Corp"),
            current_markup_card("def456", "Backend Engineer", "Initech"),
        );

        let fragments = IndeedExtractor.extract(&html);
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].external_id.as_deref(), Some("abc123"));
        assert_eq!(fragments[0].title.as_deref(), Some("Software Engineer"));
        assert_eq!(fragments[0].organization.as_deref(), Some("Acme Corp"));
        assert_eq!(
            fragments[0].location_text.as_deref(),
            Some("in Bengaluru, Karnataka")
        );
        assert_eq!(
            fragments[0].detail_url.as_deref(),
            Some("/rc/clk?jk=abc123")
        );
        assert_eq!(fragments[0].source_site, SourceSite::Indeed);
    }

    #[test]
    fn test_extracts_from_legacy_markup() {
        let html = r#"<html><body>
            <div class="jobsearch-SerpJobCard">
              <a class="jobtitle" href="/viewjob?jk=old1">Data Analyst</a>
              <span class="company">Globex</span>
              <span class="location">Mumbai</span>
              <span class="salaryText">₹8,00,000 a year</span>
            </div>
        </body></html>"#;

        let fragments = IndeedExtractor.extract(html);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].title.as_deref(), Some("Data Analyst"));
        assert_eq!(fragments[0].organization.as_deref(), Some("Globex"));
        assert_eq!(
            fragments[0].compensation_text.as_deref(),
            Some("₹8,00,000 a year")
        );
        // Legacy cards carry no data-jk
        assert_eq!(fragments[0].external_id, None);
    }

    #[test]
    fn test_skips_cards_without_title_or_organization() {
        let html = r#"<html><body>
            <div class="job_seen_beacon"><div class="job-snippet">sponsored</div></div>
        </body></html>"#;

        assert!(IndeedExtractor.extract(html).is_empty());
    }

    #[test]
    fn test_missing_fields_are_none_not_errors() {
        let html = r#"<html><body>
            <div class="job_seen_beacon">
              <h2 class="jobTitle">Lone Title</h2>
            </div>
        </body></html>"#;

        let fragments = IndeedExtractor.extract(html);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].title.as_deref(), Some("Lone Title"));
        assert_eq!(fragments[0].organization, None);
        assert_eq!(fragments[0].location_text, None);
        assert_eq!(fragments[0].compensation_text, None);
        assert_eq!(fragments[0].detail_url, None);
    }

    #[test]
    fn test_unrecognized_document_yields_empty() {
        assert!(IndeedExtractor.extract("<html><body><p>maintenance page</p></body></html>").is_empty());
        assert!(IndeedExtractor.extract("").is_empty());
    }
}
