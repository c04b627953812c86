//! Authority-domain fallback for the general search path.
//!
//! When a general search comes back with too few institutional sources,
//! the collector sweeps a topic- and locale-specific list of authority
//! domains with grouped `site:` queries.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::provider::SearchBackend;
use crate::query::{site_sweep_query, whitepaper_query};
use crate::trust::{classify_domain, host_of};
use crate::types::{SearchCategory, SearchRow, TimeWindow, Topic, TrustTier};

/// When to run the authority sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorityPolicy {
    /// Sweep only when the general search found too few trusted domains.
    #[default]
    Auto,
    Always,
    Never,
}

impl AuthorityPolicy {
    /// Parse `auto`, `always` or `never` (case-insensitive).
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "always" => Some(Self::Always),
            "never" => Some(Self::Never),
            _ => None,
        }
    }

    /// Decide whether the sweep runs for the rows gathered so far.
    pub fn should_run(self, rows: &[SearchRow], min_trusted_domains: usize) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => needs_fallback(rows, min_trusted_domains),
        }
    }
}

const TECH_AUTHORITY: &[&str] = &[
    "ietf.org",
    "rfc-editor.org",
    "w3.org",
    "iana.org",
    "developer.mozilla.org",
    "learn.microsoft.com",
    "cloudflare.com",
    "google.com",
];

const SCIENCE_AUTHORITY: &[&str] = &[
    "arxiv.org",
    "nature.com",
    "science.org",
    "springer.com",
    "sciencedirect.com",
    "pnas.org",
    "cell.com",
    "nih.gov",
];

const POLICY_AUTHORITY: &[&str] = &[
    "un.org",
    "oecd.org",
    "reuters.com",
    "apnews.com",
    "bbc.com",
    "nytimes.com",
];

const HEALTH_AUTHORITY: &[&str] = &[
    "who.int",
    "cdc.gov",
    "fda.gov",
    "ema.europa.eu",
    "nih.gov",
    "bmj.com",
    "thelancet.com",
    "nejm.org",
];

const FINANCE_AUTHORITY: &[&str] = &[
    "reuters.com",
    "apnews.com",
    "bloomberg.com",
    "wsj.com",
    "ft.com",
];

const GENERAL_AUTHORITY: &[&str] = &["reuters.com", "apnews.com", "bbc.com", "nature.com"];

const KR_AUTHORITY: &[&str] = &[
    "korea.kr",
    "go.kr",
    "stat.go.kr",
    "yna.co.kr",
    "kbs.co.kr",
    "mbc.co.kr",
    "sbs.co.kr",
    "chosun.com",
    "joongang.co.kr",
    "hani.co.kr",
];

const US_AUTHORITY: &[&str] = &[
    "cdc.gov",
    "fda.gov",
    "nih.gov",
    "nasa.gov",
    "nytimes.com",
    "wsj.com",
    "apnews.com",
    "reuters.com",
];

const EU_AUTHORITY: &[&str] = &[
    "ec.europa.eu",
    "ema.europa.eu",
    "who.int",
    "oecd.org",
    "reuters.com",
    "bbc.com",
];

/// Academic suffix hints added when scholarly emphasis applies.
const SCHOLARLY_HINTS: &[&str] = &["edu", "ac.kr"];

/// Base authority list for a topic.
pub fn base_authority(topic: Topic) -> &'static [&'static str] {
    match topic {
        Topic::Tech => TECH_AUTHORITY,
        Topic::Science => SCIENCE_AUTHORITY,
        Topic::Policy => POLICY_AUTHORITY,
        Topic::Health => HEALTH_AUTHORITY,
        Topic::Finance => FINANCE_AUTHORITY,
        Topic::Community | Topic::General => GENERAL_AUTHORITY,
    }
}

/// Locale authority list; unknown locales have none.
pub fn locale_authority(locale: &str) -> &'static [&'static str] {
    match locale.trim().to_ascii_uppercase().as_str() {
        "KR" => KR_AUTHORITY,
        "US" => US_AUTHORITY,
        "EU" => EU_AUTHORITY,
        _ => &[],
    }
}

/// True when the topic or the requested buckets lean on academic sources.
pub fn scholarly_emphasis(topic: Topic, categories: &[SearchCategory]) -> bool {
    topic.scholarly_emphasis() || categories.contains(&SearchCategory::Scholarly)
}

/// Ordered, duplicate-free authority list for a claim.
///
/// Base list, then locale list, then `extra`, then the academic hints when
/// [`scholarly_emphasis`] applies. First occurrence wins.
pub fn authority_domains(
    topic: Topic,
    locale: &str,
    extra: &[String],
    categories: &[SearchCategory],
) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    let hints: &[&str] = if scholarly_emphasis(topic, categories) {
        SCHOLARLY_HINTS
    } else {
        &[]
    };

    let candidates = base_authority(topic)
        .iter()
        .copied()
        .chain(locale_authority(locale).iter().copied())
        .chain(extra.iter().map(String::as_str))
        .chain(hints.iter().copied());

    for domain in candidates {
        let domain = domain.trim();
        if domain.is_empty() {
            continue;
        }
        if seen.insert(domain.to_string()) {
            out.push(domain.to_string());
        }
    }
    out
}

/// Number of distinct hosts among `rows` classified tier 2 or above.
///
/// Hosts are taken from the raw provider URL.
pub fn count_trusted_domains(rows: &[SearchRow]) -> usize {
    let mut hosts = HashSet::new();
    rows.iter()
        .filter(|r| !r.url.is_empty())
        .map(|r| host_of(&r.url))
        .filter(|host| hosts.insert(host.clone()))
        .filter(|host| classify_domain(host) >= TrustTier::Established)
        .count()
}

/// True when fewer than `min_trusted_domains` distinct trusted hosts were found.
pub fn needs_fallback(rows: &[SearchRow], min_trusted_domains: usize) -> bool {
    count_trusted_domains(rows) < min_trusted_domains
}

/// Rows requested per authority domain during a sweep.
pub fn rows_per_domain(k: usize) -> usize {
    if k <= 6 {
        1
    } else {
        2
    }
}

/// Parameters of one authority sweep.
#[derive(Debug, Clone)]
pub struct Sweep<'a> {
    pub query: &'a str,
    pub domains: &'a [String],
    /// Target evidence count for the claim.
    pub k: usize,
    pub group_size: usize,
    /// Also issue the broadened white-paper query when still short.
    pub scholarly: bool,
    pub time_window: Option<TimeWindow>,
}

/// Run an authority sweep, returning the newly gathered rows.
///
/// `have` is the number of rows already collected before the sweep and only
/// matters for the white-paper top-up.
pub async fn run_sweep<B: SearchBackend>(backend: &B, sweep: &Sweep<'_>, have: usize) -> Vec<SearchRow> {
    let mut out = Vec::new();
    if sweep.domains.is_empty() {
        return out;
    }

    let per_domain = rows_per_domain(sweep.k);
    let target = per_domain * sweep.domains.len();

    for group in sweep.domains.chunks(sweep.group_size.max(1)) {
        let query = site_sweep_query(sweep.query, group);
        let rows = backend
            .search(
                SearchCategory::General,
                &query,
                per_domain * group.len(),
                sweep.time_window,
            )
            .await;
        tracing::debug!(group = group.len(), found = rows.len(), "authority sweep group");
        out.extend(rows);
        if out.len() >= target {
            break;
        }
    }

    let total = have + out.len();
    if sweep.scholarly && total < sweep.k {
        let want = sweep.k.saturating_sub(total).max(2);
        let rows = backend
            .search(
                SearchCategory::General,
                &whitepaper_query(sweep.query),
                want,
                sweep.time_window,
            )
            .await;
        tracing::debug!(found = rows.len(), "white-paper top-up");
        out.extend(rows);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchError;
    use crate::provider::PageRequest;
    use crate::types::SearchProvider;
    use std::sync::Mutex;

    fn row(url: &str) -> SearchRow {
        SearchRow::new("t", url, "s")
    }

    /// Returns `per_query` rows for every query and records the queries.
    struct RecordingBackend {
        per_query: usize,
        queries: Mutex<Vec<(String, usize)>>,
    }

    impl RecordingBackend {
        fn new(per_query: usize) -> Self {
            Self {
                per_query,
                queries: Mutex::new(Vec::new()),
            }
        }

        fn queries(&self) -> Vec<(String, usize)> {
            self.queries.lock().expect("lock").clone()
        }
    }

    impl SearchBackend for RecordingBackend {
        fn provider(&self) -> SearchProvider {
            SearchProvider::GoogleCse
        }

        fn page_size(&self) -> usize {
            100
        }

        async fn fetch_page(&self, request: &PageRequest<'_>) -> Result<Vec<SearchRow>, SearchError> {
            self.queries
                .lock()
                .expect("lock")
                .push((request.query.to_string(), request.num));
            let n = self.per_query.min(request.num);
            Ok((0..n)
                .map(|i| row(&format!("https://s{i}.example.org/{}", request.query.len())))
                .collect())
        }
    }

    #[test]
    fn policy_labels_parse() {
        assert_eq!(AuthorityPolicy::from_label("AUTO"), Some(AuthorityPolicy::Auto));
        assert_eq!(AuthorityPolicy::from_label(" never "), Some(AuthorityPolicy::Never));
        assert_eq!(AuthorityPolicy::from_label("sometimes"), None);
    }

    #[test]
    fn policy_serde_is_lowercase() {
        let json = serde_json::to_string(&AuthorityPolicy::Always).expect("serialize");
        assert_eq!(json, "\"always\"");
    }

    #[test]
    fn tech_kr_list_is_ordered_union_with_hints() {
        let domains = authority_domains(Topic::Tech, "kr", &[], &[]);
        assert_eq!(domains.first().map(String::as_str), Some("ietf.org"));
        assert_eq!(domains[8], "korea.kr");
        assert_eq!(&domains[domains.len() - 2..], ["edu", "ac.kr"]);
        assert_eq!(domains.len(), 8 + 10 + 2);
    }

    #[test]
    fn duplicates_keep_first_occurrence() {
        let extra = vec!["reuters.com".to_string(), "example.gov".to_string()];
        let domains = authority_domains(Topic::Policy, "US", &extra, &[]);
        let reuters = domains.iter().filter(|d| *d == "reuters.com").count();
        assert_eq!(reuters, 1);
        assert_eq!(domains[2], "reuters.com");
        assert_eq!(domains.last().map(String::as_str), Some("example.gov"));
        assert!(!domains.contains(&"edu".to_string()));
    }

    #[test]
    fn scholarly_category_adds_hints() {
        let domains = authority_domains(Topic::Finance, "XX", &[], &[SearchCategory::Scholarly]);
        assert!(domains.contains(&"edu".to_string()));
        assert!(domains.contains(&"ac.kr".to_string()));
    }

    #[test]
    fn community_uses_general_list() {
        assert_eq!(base_authority(Topic::Community), base_authority(Topic::General));
    }

    #[test]
    fn trusted_domains_count_distinct_hosts() {
        let rows = vec![
            row("https://www.nasa.gov/a"),
            row("https://www.nasa.gov/b"),
            row("https://blog.example.com/c"),
        ];
        assert_eq!(count_trusted_domains(&rows), 1);
        assert!(needs_fallback(&rows, 2));

        let mut more = rows.clone();
        more.push(row("https://www.reuters.com/x"));
        assert_eq!(count_trusted_domains(&more), 2);
        assert!(!needs_fallback(&more, 2));
    }

    #[test]
    fn should_run_follows_policy() {
        let trusted = vec![row("https://nasa.gov/a"), row("https://reuters.com/b")];
        assert!(AuthorityPolicy::Always.should_run(&trusted, 2));
        assert!(!AuthorityPolicy::Never.should_run(&[], 2));
        assert!(!AuthorityPolicy::Auto.should_run(&trusted, 2));
        assert!(AuthorityPolicy::Auto.should_run(&trusted, 3));
    }

    #[test]
    fn per_domain_threshold() {
        assert_eq!(rows_per_domain(6), 1);
        assert_eq!(rows_per_domain(7), 2);
    }

    #[tokio::test]
    async fn sweep_groups_domains_and_stops_at_target() {
        let domains: Vec<String> = (0..20).map(|i| format!("d{i}.org")).collect();
        let backend = RecordingBackend::new(100);
        let sweep = Sweep {
            query: "q",
            domains: &domains,
            k: 6,
            group_size: 8,
            scholarly: false,
            time_window: None,
        };
        let rows = run_sweep(&backend, &sweep, 0).await;
        // First group asks for 8 rows, second for 8, third for 4: 20 reached.
        let asked: Vec<usize> = backend.queries().iter().map(|(_, n)| *n).collect();
        assert_eq!(asked, vec![8, 8, 4]);
        assert_eq!(rows.len(), 20);
        assert!(backend.queries()[0].0.contains("site:d0.org OR site:d1.org"));
    }

    #[tokio::test]
    async fn larger_k_asks_two_rows_per_domain() {
        let domains: Vec<String> = (0..10).map(|i| format!("d{i}.org")).collect();
        let backend = RecordingBackend::new(100);
        let sweep = Sweep {
            query: "q",
            domains: &domains,
            k: 10,
            group_size: 8,
            scholarly: false,
            time_window: None,
        };
        run_sweep(&backend, &sweep, 0).await;
        let asked: Vec<usize> = backend.queries().iter().map(|(_, n)| *n).collect();
        assert_eq!(asked, vec![16, 4]);
    }

    #[tokio::test]
    async fn sweep_stops_once_target_reached() {
        let domains: Vec<String> = (0..12).map(|i| format!("d{i}.org")).collect();
        let backend = RecordingBackend::new(100);
        let sweep = Sweep {
            query: "q",
            domains: &domains,
            k: 6,
            group_size: 12,
            scholarly: true,
            time_window: None,
        };
        let rows = run_sweep(&backend, &sweep, 0).await;
        assert_eq!(rows.len(), 12);
        // Target met in one group, and k is satisfied so no white-paper query.
        assert_eq!(backend.queries().len(), 1);
    }

    #[tokio::test]
    async fn whitepaper_top_up_when_short() {
        let domains = vec!["ietf.org".to_string()];
        let backend = RecordingBackend::new(0);
        let sweep = Sweep {
            query: "quic",
            domains: &domains,
            k: 6,
            group_size: 8,
            scholarly: true,
            time_window: None,
        };
        run_sweep(&backend, &sweep, 1).await;
        let queries = backend.queries();
        assert_eq!(queries.len(), 2);
        assert!(queries[1].0.starts_with("quic (filetype:pdf OR \"white paper\")"));
        assert_eq!(queries[1].1, 5);
    }

    #[tokio::test]
    async fn whitepaper_asks_for_at_least_two() {
        let domains = vec!["ietf.org".to_string()];
        let backend = RecordingBackend::new(0);
        let sweep = Sweep {
            query: "quic",
            domains: &domains,
            k: 6,
            group_size: 8,
            scholarly: true,
            time_window: None,
        };
        run_sweep(&backend, &sweep, 5).await;
        assert_eq!(backend.queries()[1].1, 2);
    }

    #[tokio::test]
    async fn empty_domain_list_issues_nothing() {
        let backend = RecordingBackend::new(3);
        let sweep = Sweep {
            query: "q",
            domains: &[],
            k: 6,
            group_size: 8,
            scholarly: true,
            time_window: None,
        };
        assert!(run_sweep(&backend, &sweep, 0).await.is_empty());
        assert!(backend.queries().is_empty());
    }
}
