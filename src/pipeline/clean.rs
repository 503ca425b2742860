//! Cleaning stage
//!
//! Field-level normalization applied to every fragment before
//! deduplication:
//!
//! 1. Trim and collapse internal whitespace/newlines on every string field
//! 2. Strip parenthetical review-count noise from organization names
//! 3. Strip a leading "in " token from location strings
//! 4. Resolve `detail_url` against the site base URL, dropping it if
//!    resolution fails
//!
//! Every rule is applied to a fixed point so that cleaning its own output
//! changes nothing.

use regex::Regex;
use std::sync::OnceLock;
use url::Url;

use crate::model::{ListingFragment, NormalizedListing};

/// Trailing parenthetical containing at least one digit, e.g.
/// "(4,210 reviews)" or "(3.9)".
fn review_noise() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*\([^()]*\d[^()]*\)\s*$").expect("static regex"))
}

/// Applies every cleaning rule to one fragment.
pub fn clean_fragment(fragment: ListingFragment, base_url: &Url) -> NormalizedListing {
    NormalizedListing {
        external_id: clean_field(fragment.external_id),
        title: clean_field(fragment.title),
        organization: clean_organization(fragment.organization),
        location_text: clean_location(fragment.location_text),
        compensation_text: clean_field(fragment.compensation_text),
        description_snippet: clean_field(fragment.description_snippet),
        detail_url: resolve_detail_url(fragment.detail_url, base_url),
        source_site: fragment.source_site,
        extracted_at: fragment.extracted_at,
    }
}

/// Trims and collapses internal whitespace; blank values become `None`.
pub fn clean_field(value: Option<String>) -> Option<String> {
    let value = value?;
    let collapsed = collapse_whitespace(&value);
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// Organization cleaning: whitespace rules plus review-count noise.
/// Stripping repeats until stable so stacked parentheticals cannot leave
/// fresh noise at the end of the string.
pub fn clean_organization(value: Option<String>) -> Option<String> {
    let mut name = clean_field(value)?;

    loop {
        let stripped = review_noise().replace(&name, "").trim().to_string();
        if stripped == name {
            break;
        }
        name = stripped;
    }

    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Location cleaning: whitespace rules plus the leading "in " token some
/// sites prefix onto location strings.
pub fn clean_location(value: Option<String>) -> Option<String> {
    let mut location = clean_field(value)?;

    while location.len() > 3 && location[..3].eq_ignore_ascii_case("in ") {
        location = location[3..].trim_start().to_string();
    }

    if location.is_empty() {
        None
    } else {
        Some(location)
    }
}

/// Resolves a possibly-relative detail link against the site base URL.
/// Anything that does not resolve to an http(s) URL is dropped.
pub fn resolve_detail_url(value: Option<String>, base_url: &Url) -> Option<String> {
    let value = clean_field(value)?;

    match base_url.join(&value) {
        Ok(resolved) if resolved.scheme() == "http" || resolved.scheme() == "https" => {
            Some(resolved.to_string())
        }
        _ => None,
    }
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
