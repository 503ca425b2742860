//! Normalization pipeline
//!
//! Turns the full fragment list of a run into clean, deduplicated,
//! structurally valid listings. Four strictly ordered stages:
//!
//! 1. Clean - whitespace, review-count noise, location prefix, URL
//!    absolutization
//! 2. Deduplicate - by natural key, first occurrence wins
//! 3. Validate - drop fragments failing the `NormalizedListing` invariant
//! 4. Stats - report original/removed/final counts
//!
//! The pipeline runs over the whole accumulated set, not per page, so
//! deduplication sees every fragment of the run. Processing the pipeline's
//! own output is a no-op: same listings, zero removals.

mod clean;
mod dedupe;
mod validate;

pub use clean::{clean_field, clean_fragment, clean_location, clean_organization, resolve_detail_url};
pub use dedupe::{dedupe, DedupeKey};
pub use validate::{is_valid, retain_valid};

use url::Url;

use crate::model::{ListingFragment, NormalizedListing};

/// Caller-supplied pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Base URL for resolving relative detail links (the site's origin)
    pub base_url: Url,
    /// Natural key for deduplication
    pub dedupe_key: DedupeKey,
}

impl PipelineOptions {
    pub fn for_base(base_url: Url) -> Self {
        Self {
            base_url,
            dedupe_key: DedupeKey::default(),
        }
    }
}

/// Counts reported alongside the surviving listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub original: usize,
    pub duplicates_removed: usize,
    pub invalid_removed: usize,
    pub final_count: usize,
}

/// Runs all four stages over a run's accumulated fragments.
pub fn process(
    fragments: Vec<ListingFragment>,
    options: &PipelineOptions,
) -> (Vec<NormalizedListing>, PipelineStats) {
    let original = fragments.len();

    let cleaned: Vec<NormalizedListing> = fragments
        .into_iter()
        .map(|fragment| clean_fragment(fragment, &options.base_url))
        .collect();

    let (deduped, duplicates_removed) = dedupe(cleaned, options.dedupe_key);
    let (valid, invalid_removed) = retain_valid(deduped);

    let stats = PipelineStats {
        original,
        duplicates_removed,
        invalid_removed,
        final_count: valid.len(),
    };

    (valid, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SourceSite;

    fn fragment(id: Option<&str>, title: Option<&str>, org: Option<&str>) -> ListingFragment {
        let mut f = ListingFragment::new(SourceSite::Indeed);
        f.external_id = id.map(str::to_string);
        f.title = title.map(str::to_string);
        f.organization = org.map(str::to_string);
        f
    }

    fn options() -> PipelineOptions {
        PipelineOptions::for_base(Url::parse("https://in.indeed.com").unwrap())
    }

    #[test]
    fn test_counts_always_balance() {
        let fragments = vec![
            fragment(Some("a"), Some("One"), None),
            fragment(Some("a"), Some("One again"), None),
            fragment(Some("b"), None, None), // invalid: no title/org
            fragment(None, None, Some("Org only")), // invalid: no id/url
            fragment(Some("c"), Some("Three"), Some("Acme")),
        ];

        let (listings, stats) = process(fragments, &options());
        assert_eq!(
            stats.final_count + stats.duplicates_removed + stats.invalid_removed,
            stats.original
        );
        assert_eq!(listings.len(), stats.final_count);
        assert_eq!(stats.duplicates_removed, 1);
        assert_eq!(stats.invalid_removed, 2);
    }

    #[test]
    fn test_scenario_fifteen_fragments_two_dupes_one_invalid() {
        // 15 raw fragments: 2 exact-externalId duplicates and 1 fragment
        // missing both title and organization -> 12 survivors
        let mut fragments = Vec::new();
        for i in 0..12 {
            fragments.push(fragment(
                Some(&format!("id-{}", i)),
                Some(&format!("Role {}", i)),
                Some("Acme (12 reviews)"),
            ));
        }
        fragments.push(fragment(Some("id-0"), Some("Role 0"), Some("Acme")));
        fragments.push(fragment(Some("id-1"), Some("Role 1"), Some("Acme")));
        fragments.push(fragment(Some("id-x"), None, None));
        assert_eq!(fragments.len(), 15);

        let (listings, stats) = process(fragments, &options());
        assert_eq!(listings.len(), 12);
        assert_eq!(stats.duplicates_removed, 2);
        assert_eq!(stats.invalid_removed, 1);
    }

    #[test]
    fn test_processing_own_output_changes_nothing() {
        let fragments = vec![
            {
                let mut f = fragment(Some(" j1 "), Some("  Senior\n Engineer "), Some("Acme (3.9)"));
                f.location_text = Some("in  Bengaluru".to_string());
                f.detail_url = Some("/rc/clk?jk=j1".to_string());
                f
            },
            fragment(Some("j1"), Some("Senior Engineer"), Some("Acme")),
            fragment(Some("j2"), Some("Analyst"), None),
        ];

        let (first_pass, first_stats) = process(fragments, &options());
        assert_eq!(first_stats.duplicates_removed, 1);

        let reprocessed: Vec<ListingFragment> =
            first_pass.iter().cloned().map(Into::into).collect();
        let (second_pass, second_stats) = process(reprocessed, &options());

        assert_eq!(first_pass, second_pass);
        assert_eq!(second_stats.duplicates_removed, 0);
        assert_eq!(second_stats.invalid_removed, 0);
        assert_eq!(second_stats.final_count, first_stats.final_count);
    }

    #[test]
    fn test_stage_order_dedupes_before_validate() {
        // Two fragments share an id; the first is the invalid one. Dedup
        // runs first, so the valid later copy is the duplicate that gets
        // dropped, and the survivor then fails validation.
        let fragments = vec![
            fragment(Some("a"), None, None),
            fragment(Some("a"), Some("Valid title"), None),
        ];

        let (listings, stats) = process(fragments, &options());
        assert!(listings.is_empty());
        assert_eq!(stats.duplicates_removed, 1);
        assert_eq!(stats.invalid_removed, 1);
    }
}
