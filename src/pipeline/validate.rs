//! Validation stage
//!
//! Enforces the `NormalizedListing` invariant after cleaning and
//! deduplication: a listing must still say *what* it is (title or
//! organization) and *where* it lives (external id or detail URL).
//! Fragments that cleaned down to neither are structurally useless and
//! are dropped and counted.

use crate::model::NormalizedListing;

/// The keep rule for a normalized listing.
pub fn is_valid(listing: &NormalizedListing) -> bool {
    let identifies_posting = listing.title.is_some() || listing.organization.is_some();
    let addressable = listing.external_id.is_some() || listing.detail_url.is_some();
    identifies_posting && addressable
}

/// Drops invalid listings, returning survivors and the number removed.
pub fn retain_valid(listings: Vec<NormalizedListing>) -> (Vec<NormalizedListing>, usize) {
    let original = listings.len();
    let survivors: Vec<NormalizedListing> =
        listings.into_iter().filter(is_valid).collect();
    let removed = original - survivors.len();
    (survivors, removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SourceSite;
    use chrono::Utc;

    fn listing() -> NormalizedListing {
        NormalizedListing {
            external_id: Some("j1".to_string()),
            title: Some("Engineer".to_string()),
            organization: None,
            location_text: None,
            compensation_text: None,
            description_snippet: None,
            detail_url: None,
            source_site: SourceSite::Naukri,
            extracted_at: Utc::now(),
        }
    }

    #[test]
    fn test_title_plus_external_id_is_valid() {
        assert!(is_valid(&listing()));
    }

    #[test]
    fn test_organization_plus_detail_url_is_valid() {
        let mut l = listing();
        l.title = None;
        l.external_id = None;
        l.organization = Some("Acme".to_string());
        l.detail_url = Some("https://x/1".to_string());
        assert!(is_valid(&l));
    }

    #[test]
    fn test_missing_both_identity_fields_is_invalid() {
        let mut l = listing();
        l.title = None;
        l.organization = None;
        assert!(!is_valid(&l));
    }

    #[test]
    fn test_missing_both_address_fields_is_invalid() {
        let mut l = listing();
        l.external_id = None;
        l.detail_url = None;
        assert!(!is_valid(&l));
    }

    #[test]
    fn test_retain_valid_counts_drops() {
        let mut invalid = listing();
        invalid.title = None;
        invalid.organization = None;

        let (survivors, removed) = retain_valid(vec![listing(), invalid, listing()]);
        assert_eq!(survivors.len(), 2);
        assert_eq!(removed, 1);
    }
}
