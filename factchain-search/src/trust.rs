//! Domain trust classification.
//!
//! Maps a host to a [`TrustTier`] by checking suffix tables, most
//! authoritative tier first. A pattern matches the host itself or any of
//! its subdomains, so `ietf.org` covers `datatracker.ietf.org` but not
//! `notietf.org`.
//!
//! Additions to these tables should stay conservative: a tier-2 entry
//! lifts every result from that domain above unclassified sources.

use url::Url;

use crate::types::TrustTier;

/// Government, standards bodies, international organisations, academia.
const AUTHORITATIVE_SUFFIXES: &[&str] = &[
    "gov",
    "go.kr",
    "g.kr",
    "edu",
    "who.int",
    "un.org",
    "europe.eu",
    "rfc-editor.org",
    "ietf.org",
    "iso.org",
    "ieee.org",
];

/// Major press and large technology vendors.
const ESTABLISHED_SUFFIXES: &[&str] = &[
    // international press
    "reuters.com",
    "apnews.com",
    "bbc.com",
    "nytimes.com",
    "wsj.com",
    "bloomberg.com",
    "theguardian.com",
    "cnn.com",
    "cnbc.com",
    "forbes.com",
    "economist.com",
    "washingtonpost.com",
    // Korean press
    "hani.co.kr",
    "yna.co.kr",
    "yonhapnews.co.kr",
    "kbs.co.kr",
    "mbc.co.kr",
    "sbs.co.kr",
    "chosun.com",
    "joongang.co.kr",
    "donga.com",
    "jtbc.co.kr",
    "mk.co.kr",
    "edaily.co.kr",
    "koreatimes.co.kr",
    "koreaherald.com",
    "asiatoday.co.kr",
    "newsis.co.kr",
    "heraldcorp.com",
    // technology vendors and standards sites
    "microsoft.com",
    "apple.com",
    "google.com",
    "meta.com",
    "cloudflare.com",
    "mozilla.org",
    "oracle.com",
    "intel.com",
    "nvidia.com",
];

/// Tier tables in match order. Tier 3 must come before tier 2.
const TIER_TABLE: &[(TrustTier, &[&str])] = &[
    (TrustTier::Authoritative, AUTHORITATIVE_SUFFIXES),
    (TrustTier::Established, ESTABLISHED_SUFFIXES),
];

/// Classify a host into a trust tier. Total: unknown hosts are tier 1.
///
/// # Examples
///
/// ```
/// use factchain_search::trust::classify_domain;
/// use factchain_search::TrustTier;
///
/// assert_eq!(classify_domain("www.ietf.org"), TrustTier::Authoritative);
/// assert_eq!(classify_domain("reuters.com"), TrustTier::Established);
/// assert_eq!(classify_domain("someblog.example"), TrustTier::Unclassified);
/// ```
pub fn classify_domain(domain: &str) -> TrustTier {
    let host = domain.trim().trim_end_matches('.').to_ascii_lowercase();
    TIER_TABLE
        .iter()
        .find(|(_, suffixes)| suffixes.iter().any(|s| host_matches(&host, s)))
        .map_or(TrustTier::Unclassified, |(tier, _)| *tier)
}

/// True when `host` equals `suffix` or is a subdomain of it.
pub fn host_matches(host: &str, suffix: &str) -> bool {
    match host.strip_suffix(suffix) {
        Some("") => true,
        Some(prefix) => prefix.ends_with('.'),
        None => false,
    }
}

/// Lowercased host of `url`, or an empty string when it cannot be parsed.
pub fn host_of(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn government_tlds_are_authoritative() {
        assert_eq!(classify_domain("cdc.gov"), TrustTier::Authoritative);
        assert_eq!(classify_domain("www.korea.go.kr"), TrustTier::Authoritative);
        assert_eq!(classify_domain("mit.edu"), TrustTier::Authoritative);
        assert_eq!(classify_domain("seoul.g.kr"), TrustTier::Authoritative);
    }

    #[test]
    fn standards_bodies_are_authoritative() {
        assert_eq!(classify_domain("ietf.org"), TrustTier::Authoritative);
        assert_eq!(classify_domain("datatracker.ietf.org"), TrustTier::Authoritative);
        assert_eq!(classify_domain("www.rfc-editor.org"), TrustTier::Authoritative);
    }

    #[test]
    fn press_and_vendors_are_established() {
        assert_eq!(classify_domain("www.reuters.com"), TrustTier::Established);
        assert_eq!(classify_domain("news.kbs.co.kr"), TrustTier::Established);
        assert_eq!(classify_domain("learn.microsoft.com"), TrustTier::Established);
    }

    #[test]
    fn tier_three_wins_over_tier_two() {
        // `developers.google.com` is tier 2 through google.com, but a host
        // that also ends in a tier-3 suffix must resolve to tier 3.
        assert_eq!(classify_domain("google.com.gov"), TrustTier::Authoritative);
        assert_eq!(classify_domain("developers.google.com"), TrustTier::Established);
    }

    #[test]
    fn unknown_hosts_default_to_unclassified() {
        assert_eq!(classify_domain("someblog.example"), TrustTier::Unclassified);
        assert_eq!(classify_domain(""), TrustTier::Unclassified);
        assert_eq!(classify_domain("not a host at all"), TrustTier::Unclassified);
    }

    #[test]
    fn suffix_match_requires_label_boundary() {
        assert_eq!(classify_domain("notietf.org"), TrustTier::Unclassified);
        assert_eq!(classify_domain("fakereuters.com"), TrustTier::Unclassified);
        assert_eq!(classify_domain("government"), TrustTier::Unclassified);
    }

    #[test]
    fn classification_ignores_case_and_trailing_dot() {
        assert_eq!(classify_domain("WWW.IETF.ORG"), TrustTier::Authoritative);
        assert_eq!(classify_domain("bbc.com."), TrustTier::Established);
    }

    #[test]
    fn host_of_extracts_lowercase_host() {
        assert_eq!(host_of("https://WWW.Example.com/a?b=c"), "www.example.com");
        assert_eq!(host_of("garbage"), "");
    }

    #[test]
    fn classify_is_safe_across_threads() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| classify_domain("who.int")))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().expect("thread"), TrustTier::Authoritative);
        }
    }
}
