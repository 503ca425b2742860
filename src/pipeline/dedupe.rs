//! Deduplication stage
//!
//! Listings referring to the same real-world posting are collapsed by a
//! natural key. The first occurrence wins; later duplicates are dropped
//! and counted. Listings lacking the configured key field cannot collide
//! and are kept — the validate stage decides their fate.

use std::collections::HashSet;

use crate::model::NormalizedListing;

/// Which natural key identifies a posting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DedupeKey {
    /// Site-native identifier (the default)
    #[default]
    ExternalId,
    /// Absolute detail-page URL
    DetailUrl,
    /// Composite of both fields
    ExternalIdAndUrl,
}

impl std::str::FromStr for DedupeKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "external-id" | "externalid" | "id" => Ok(DedupeKey::ExternalId),
            "detail-url" | "detailurl" | "url" => Ok(DedupeKey::DetailUrl),
            "both" | "composite" => Ok(DedupeKey::ExternalIdAndUrl),
            other => Err(format!(
                "unknown dedupe key '{}', expected external-id|detail-url|both",
                other
            )),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
enum NaturalKey {
    Id(String),
    Url(String),
    Composite(Option<String>, Option<String>),
}

fn key_of(listing: &NormalizedListing, key: DedupeKey) -> Option<NaturalKey> {
    match key {
        DedupeKey::ExternalId => listing.external_id.clone().map(NaturalKey::Id),
        DedupeKey::DetailUrl => listing.detail_url.clone().map(NaturalKey::Url),
        DedupeKey::ExternalIdAndUrl => {
            if listing.external_id.is_none() && listing.detail_url.is_none() {
                None
            } else {
                Some(NaturalKey::Composite(
                    listing.external_id.clone(),
                    listing.detail_url.clone(),
                ))
            }
        }
    }
}

/// Drops later duplicates, preserving the order of survivors. Returns the
/// surviving listings and the number removed.
pub fn dedupe(
    listings: Vec<NormalizedListing>,
    key: DedupeKey,
) -> (Vec<NormalizedListing>, usize) {
    let mut seen: HashSet<NaturalKey> = HashSet::new();
    let mut survivors = Vec::with_capacity(listings.len());
    let mut removed = 0;

    for listing in listings {
        match key_of(&listing, key) {
            Some(natural_key) => {
                if seen.insert(natural_key) {
                    survivors.push(listing);
                } else {
                    removed += 1;
                }
            }
            // Unkeyed listings cannot collide
            None => survivors.push(listing),
        }
    }

    (survivors, removed)
}
