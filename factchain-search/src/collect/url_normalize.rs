//! URL canonicalisation for evidence deduplication.
//!
//! Canonicalises URLs so that links differing only in host capitalisation,
//! tracking parameters, or fragments compare as equal. Unlike a full
//! canonicaliser this keeps the path and the order of the remaining query
//! parameters untouched: some sites route on parameter order, and the
//! canonical URL is what ends up in the report.

use url::Url;

/// Tracking query parameters that are stripped during normalisation.
pub const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "gclid",
    "fbclid",
    "mc_cid",
    "mc_eid",
];

/// Normalise a URL for deduplication and reporting.
///
/// Applies the following transformations:
///
/// 1. Lowercase scheme and host (path is preserved as-is).
/// 2. Strip [`TRACKING_PARAMS`] (keys compared case-insensitively).
/// 3. Keep every other query parameter in its original order.
/// 4. Drop the query entirely when nothing is left in it.
/// 5. Remove the fragment (`#…`).
///
/// If the input cannot be parsed as a URL it is returned unchanged. The
/// function is idempotent.
///
/// # Examples
///
/// ```
/// use factchain_search::collect::url_normalize::normalize_url;
///
/// assert_eq!(
///     normalize_url("https://EX.com/a?utm_source=x&id=1#frag"),
///     "https://ex.com/a?id=1"
/// );
/// ```
pub fn normalize_url(raw: &str) -> String {
    let Ok(mut parsed) = Url::parse(raw) else {
        return raw.to_string();
    };

    parsed.set_fragment(None);

    let pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    let kept: Vec<&(String, String)> = pairs
        .iter()
        .filter(|(key, _)| !is_tracking_param(key))
        .collect();

    // Only re-serialise a non-empty query when something was removed, so
    // that untouched URLs keep their original percent-encoding.
    if kept.is_empty() {
        parsed.set_query(None);
    } else if kept.len() != pairs.len() {
        parsed
            .query_pairs_mut()
            .clear()
            .extend_pairs(kept.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }

    // Url::parse already lowercases scheme and host, so the serialised
    // form is canonical.
    parsed.to_string()
}

fn is_tracking_param(key: &str) -> bool {
    TRACKING_PARAMS.iter().any(|p| p.eq_ignore_ascii_case(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_scheme_and_host() {
        let result = normalize_url("HTTPS://Example.COM/Path");
        assert_eq!(result, "https://example.com/Path");
    }

    #[test]
    fn strips_tracking_and_fragment() {
        let result = normalize_url("https://EX.com/a?utm_source=x&id=1#frag");
        assert_eq!(result, "https://ex.com/a?id=1");
    }

    #[test]
    fn preserves_remaining_param_order() {
        let result = normalize_url("https://example.com/s?z=1&utm_medium=m&a=2&gclid=g&m=3");
        assert_eq!(result, "https://example.com/s?z=1&a=2&m=3");
    }

    #[test]
    fn removes_every_tracking_param() {
        let url = "https://example.com/page?utm_source=a&utm_medium=b&utm_campaign=c&utm_term=d&utm_content=e&gclid=f&fbclid=g&mc_cid=h&mc_eid=i";
        assert_eq!(normalize_url(url), "https://example.com/page");
    }

    #[test]
    fn tracking_keys_match_case_insensitively() {
        let result = normalize_url("https://example.com/page?q=test&UTM_Source=twitter");
        assert_eq!(result, "https://example.com/page?q=test");
    }

    #[test]
    fn keeps_params_outside_the_tracking_set() {
        // `ref` and `si` are common trackers elsewhere but not in our set.
        let result = normalize_url("https://example.com/page?ref=home&si=abc");
        assert_eq!(result, "https://example.com/page?ref=home&si=abc");
    }

    #[test]
    fn removes_fragment() {
        assert_eq!(
            normalize_url("https://example.com/page#section"),
            "https://example.com/page"
        );
    }

    #[test]
    fn preserves_path_trailing_slash() {
        assert_eq!(
            normalize_url("https://example.com/path/"),
            "https://example.com/path/"
        );
    }

    #[test]
    fn untouched_query_keeps_encoding() {
        let url = "https://example.com/search?q=hello%20world&lang=en";
        assert_eq!(normalize_url(url), url);
    }

    #[test]
    fn normalisation_is_idempotent() {
        for url in [
            "https://EX.com/a?utm_source=x&id=1#frag",
            "https://example.com/search?q=hello+world&utm_term=t&lang=ko",
            "https://example.com/search?q=%ED%95%9C%EA%B8%80&fbclid=z",
            "https://example.com/?",
            "not a url",
            "",
        ] {
            let once = normalize_url(url);
            assert_eq!(normalize_url(&once), once, "not idempotent for {url}");
        }
    }

    #[test]
    fn empty_query_is_dropped() {
        assert_eq!(normalize_url("https://example.com/?"), "https://example.com/");
        assert_eq!(normalize_url("https://example.com/a?#top"), "https://example.com/a");
        assert_eq!(normalize_url("https://example.com/a?&"), "https://example.com/a");
    }

    #[test]
    fn invalid_url_returned_unchanged() {
        let input = "not a url at all";
        assert_eq!(normalize_url(input), input);
    }

    #[test]
    fn empty_string_returned_unchanged() {
        assert_eq!(normalize_url(""), "");
    }
}
