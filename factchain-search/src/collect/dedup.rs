//! Row deduplication by canonical URL.
//!
//! Keeps the first row seen for each canonical URL, rewrites its URL to
//! the canonical form, and drops rows from the excluded patent host even
//! if a provider ignored the `-site:` clause.

use std::collections::HashSet;

use crate::query::EXCLUDED_DOMAIN;
use crate::trust::{host_matches, host_of};
use crate::types::SearchRow;

use super::url_normalize::normalize_url;

/// Deduplicate rows by canonical URL, first-seen wins.
///
/// Rows with an empty URL are dropped. The output preserves input order.
pub fn dedup_rows(rows: Vec<SearchRow>) -> Vec<SearchRow> {
    let mut seen: HashSet<String> = HashSet::with_capacity(rows.len());
    let mut out = Vec::with_capacity(rows.len());

    for row in rows {
        if row.url.trim().is_empty() {
            continue;
        }
        let canonical = normalize_url(row.url.trim());
        if is_excluded(&canonical) {
            tracing::trace!(url = %canonical, "dropping excluded host");
            continue;
        }
        if !seen.insert(canonical.clone()) {
            continue;
        }
        out.push(SearchRow {
            url: canonical,
            ..row
        });
    }

    out
}

/// True when the URL's host is the excluded patent host or a subdomain.
pub fn is_excluded(url: &str) -> bool {
    host_matches(&host_of(url), EXCLUDED_DOMAIN)
}
