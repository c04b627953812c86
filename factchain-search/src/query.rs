//! Category-restricted query construction.
//!
//! Each [`SearchCategory`] rewrites the user query with a `site:` clause
//! (an OR-combined allow-list, or a TLD filter for government sources).
//! Every category excludes patent listings, which otherwise crowd out
//! evidence for technical claims.

use crate::types::SearchCategory;

/// Host whose results are never used as evidence.
pub const EXCLUDED_DOMAIN: &str = "patents.google.com";

const SCHOLARLY_SITES: &[&str] = &[
    "arxiv.org",
    "acm.org",
    "ieee.org",
    "springer.com",
    "sciencedirect.com",
    "nature.com",
    "science.org",
    "pnas.org",
    "cell.com",
    "cambridge.org",
];

const GOVERNMENT_SITES: &[&str] = &[".gov", ".go.kr", ".g.kr", ".edu"];

const NEWS_SITES: &[&str] = &[
    "reuters.com",
    "apnews.com",
    "bbc.com",
    "nytimes.com",
    "wsj.com",
    "bloomberg.com",
    "theguardian.com",
    "cnn.com",
    "cnbc.com",
    "economist.com",
    "washingtonpost.com",
    "yna.co.kr",
    "yonhapnews.co.kr",
    "kbs.co.kr",
    "mbc.co.kr",
    "sbs.co.kr",
    "chosun.com",
    "joongang.co.kr",
    "donga.com",
    "hani.co.kr",
    "jtbc.co.kr",
    "mk.co.kr",
    "edaily.co.kr",
    "koreaherald.com",
    "koreatimes.co.kr",
    "asiatoday.co.kr",
    "newsis.co.kr",
    "heraldcorp.com",
];

const BLOG_SITES: &[&str] = &[
    "medium.com",
    "tistory.com",
    "velog.io",
    "dev.to",
    "blogspot.com",
    "hashnode.com",
    "brunch.co.kr",
    "naver.com/blog",
];

const COMMUNITY_SITES: &[&str] = &[
    "reddit.com",
    "stackoverflow.com",
    "superuser.com",
    "serverfault.com",
    "quora.com",
    "news.ycombinator.com",
    "okky.kr",
    "discord.com/invite",
];

/// Allow-list of sites for a category; empty for [`SearchCategory::General`].
pub fn category_sites(category: SearchCategory) -> &'static [&'static str] {
    match category {
        SearchCategory::Scholarly => SCHOLARLY_SITES,
        SearchCategory::Government => GOVERNMENT_SITES,
        SearchCategory::News => NEWS_SITES,
        SearchCategory::Blogs => BLOG_SITES,
        SearchCategory::Community => COMMUNITY_SITES,
        SearchCategory::General => &[],
    }
}

/// `(site:a OR site:b ...)`, or an empty string for no sites.
pub fn site_filter<S: AsRef<str>>(sites: &[S]) -> String {
    if sites.is_empty() {
        return String::new();
    }
    let joined = sites
        .iter()
        .map(|s| format!("site:{}", s.as_ref()))
        .collect::<Vec<_>>()
        .join(" OR ");
    format!("({joined})")
}

/// Rewrite `query` for the given category.
///
/// # Examples
///
/// ```
/// use factchain_search::query::build_category_query;
/// use factchain_search::SearchCategory;
///
/// assert_eq!(
///     build_category_query(SearchCategory::General, "HTTP/3 QUIC"),
///     "HTTP/3 QUIC -site:patents.google.com"
/// );
/// ```
pub fn build_category_query(category: SearchCategory, query: &str) -> String {
    let query = query.trim();
    let filter = site_filter(category_sites(category));
    if filter.is_empty() {
        with_exclusion(query)
    } else {
        with_exclusion(&format!("{query} {filter}"))
    }
}

/// Query restricted to one group of authority domains.
pub fn site_sweep_query<S: AsRef<str>>(query: &str, domains: &[S]) -> String {
    let filter = site_filter(domains);
    if filter.is_empty() {
        return with_exclusion(query.trim());
    }
    with_exclusion(&format!("{} {filter}", query.trim()))
}

/// Broadened query hinting at technical reports and whitepapers.
pub fn whitepaper_query(query: &str) -> String {
    format!("{} (filetype:pdf OR \"white paper\")", query.trim())
}

/// Append the patent exclusion once; already-excluded queries are unchanged.
pub fn with_exclusion(query: &str) -> String {
    let clause = format!("-site:{EXCLUDED_DOMAIN}");
    if query.contains(&clause) {
        query.to_string()
    } else {
        format!("{query} {clause}")
    }
}
