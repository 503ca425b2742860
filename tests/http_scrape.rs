//! End-to-end HTTP-mode runs against a wiremock server
//!
//! Exercises the real HTTP fetcher and Indeed extractor over mock result
//! pages: pagination, cross-page deduplication, normalization, early
//! stop, error classification and retry.

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use url::Url;

use leadscout::config::HttpSettings;
use leadscout::extract::IndeedExtractor;
use leadscout::fetch::HttpFetcher;
use leadscout::run::{JobOrchestrator, RunOptions};
use leadscout::scrape::{IndeedUrlBuilder, SiteAdapter};
use leadscout::{FetchErrorKind, FetchStrategy, RunStatus, ScrapeParams, SourceSite};

/// Matches /jobs requests without a `start` parameter (page 1).
struct NoStartParam;

impl wiremock::Match for NoStartParam {
    fn matches(&self, request: &Request) -> bool {
        !request.url.query_pairs().any(|(key, _)| key == "start")
    }
}

fn indeed_card(jk: &str, title: &str, company: &str) -> String {
    format!(
        r#"<div class="job_seen_beacon">
             <h2 class="jobTitle"><a data-jk="{jk}" href="/rc/clk?jk={jk}"><span title="{title}">{title}</span></a></h2>
             <span data-testid="company-name">{company}</span>
             <div data-testid="text-location">in Bengaluru, Karnataka</div>
           </div>"#
    )
}

fn result_page(cards: &[String]) -> String {
    format!("<html><body>{}</body></html>", cards.join("\n"))
}

fn adapter_against(server_url: &str, settings: &HttpSettings) -> SiteAdapter {
    SiteAdapter::new(
        SourceSite::Indeed,
        FetchStrategy::Http,
        Box::new(HttpFetcher::new(settings).unwrap()),
        Box::new(IndeedExtractor),
        Box::new(IndeedUrlBuilder::new(Url::parse(server_url).unwrap())),
    )
}

fn params(max_pages: u32) -> ScrapeParams {
    ScrapeParams {
        keyword: "Software Engineer".to_string(),
        location: "Bengaluru".to_string(),
        max_pages,
    }
}

fn fast_options() -> RunOptions {
    let mut options = RunOptions::default();
    options.page_delay = std::time::Duration::ZERO;
    options
}

#[tokio::test]
async fn full_run_paginates_normalizes_and_stops_early() {
    let server = MockServer::start().await;

    // Page 1: two listings, one with review-count noise in the company
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .and(NoStartParam)
        .respond_with(ResponseTemplate::new(200).set_body_string(result_page(&[
            indeed_card("jk-1", "Software Engineer", "Acme Corp (1,234 reviews)"),
            indeed_card("jk-2", "Platform Engineer", "Initech"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    // Page 2: one repeat of jk-2 plus one new listing
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .and(query_param("start", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_string(result_page(&[
            indeed_card("jk-2", "Platform Engineer", "Initech"),
            indeed_card("jk-3", "SRE", "Globex"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    // Pages 3 and 4: end of results
    for start in ["20", "30"] {
        Mock::given(method("GET"))
            .and(path("/jobs"))
            .and(query_param("start", start))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("<html><body></body></html>"),
            )
            .mount(&server)
            .await;
    }

    let mut adapter = adapter_against(&server.uri(), &HttpSettings::default());
    let result =
        JobOrchestrator::run_with_adapter(&mut adapter, &params(10), &fast_options(), None)
            .await
            .unwrap();

    // Two empty pages end the run at page 4 of the requested 10
    assert_eq!(result.status, RunStatus::Completed);
    assert_eq!(result.statistics.requests_attempted, 4);
    assert_eq!(result.statistics.requests_succeeded, 4);
    assert_eq!(result.statistics.fragments_extracted, 4);
    assert_eq!(result.statistics.duplicates_removed, 1);
    assert_eq!(result.statistics.invalid_dropped, 0);

    assert_eq!(result.listings.len(), 3);
    let first = &result.listings[0];
    assert_eq!(first.external_id.as_deref(), Some("jk-1"));
    // Review-count noise stripped, location prefix stripped
    assert_eq!(first.organization.as_deref(), Some("Acme Corp"));
    assert_eq!(first.location_text.as_deref(), Some("Bengaluru, Karnataka"));
    // Relative link resolved against the production site origin
    assert_eq!(
        first.detail_url.as_deref(),
        Some("https://in.indeed.com/rc/clk?jk=jk-1")
    );
}

#[tokio::test]
async fn forbidden_response_fails_the_run_with_classified_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/jobs"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let mut adapter = adapter_against(&server.uri(), &HttpSettings::default());
    let result =
        JobOrchestrator::run_with_adapter(&mut adapter, &params(3), &fast_options(), None)
            .await
            .unwrap();

    assert_eq!(result.status, RunStatus::Failed);
    assert!(result.listings.is_empty());
    assert_eq!(result.statistics.errors.len(), 1);
    assert_eq!(
        result.statistics.errors[0].kind,
        FetchErrorKind::BlockedOrForbidden
    );
}

#[tokio::test]
async fn server_errors_consume_the_retry_budget() {
    let server = MockServer::start().await;

    // One initial attempt plus one retry
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .respond_with(ResponseTemplate::new(502))
        .expect(2)
        .mount(&server)
        .await;

    let mut settings = HttpSettings::default();
    settings.retry_attempts = 1;
    settings.retry_delay_ms = 10;

    let mut adapter = adapter_against(&server.uri(), &settings);
    let result =
        JobOrchestrator::run_with_adapter(&mut adapter, &params(2), &fast_options(), None)
            .await
            .unwrap();

    assert_eq!(result.status, RunStatus::Failed);
    assert_eq!(result.statistics.errors.len(), 1);
    assert_eq!(result.statistics.errors[0].kind, FetchErrorKind::UpstreamError);
}

#[tokio::test]
async fn not_found_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/jobs"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let mut settings = HttpSettings::default();
    settings.retry_attempts = 3;
    settings.retry_delay_ms = 10;

    let mut adapter = adapter_against(&server.uri(), &settings);
    let result =
        JobOrchestrator::run_with_adapter(&mut adapter, &params(1), &fast_options(), None)
            .await
            .unwrap();

    assert_eq!(result.status, RunStatus::Failed);
    assert_eq!(result.statistics.errors[0].kind, FetchErrorKind::NotFound);
}
