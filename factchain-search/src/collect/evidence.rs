//! Per-claim evidence collection.
//!
//! Runs the search plan for one claim: category buckets (or a general
//! search with an optional authority sweep), then canonicalisation,
//! deduplication, trust classification and the diversity merge.

use futures::future::join_all;

use crate::config::SearchConfig;
use crate::provider::SearchBackend;
use crate::trust::{classify_domain, host_of};
use crate::types::{Evidence, SearchCategory, SearchRow, TimeWindow, Topic};

use super::authority::{authority_domains, run_sweep, scholarly_emphasis, Sweep};
use super::dedup::dedup_rows;
use super::diversity::diversity_merge;

/// What to search for on behalf of one claim.
#[derive(Debug, Clone)]
pub struct EvidenceRequest<'a> {
    /// Search query, usually the claim's suggested query.
    pub query: &'a str,
    pub topic: Topic,
    /// Category buckets to search. Empty selects the general path.
    pub categories: &'a [SearchCategory],
    /// Region key for the authority tables.
    pub locale: &'a str,
    pub time_window: Option<TimeWindow>,
    /// Extra authority domains for the sweep.
    pub authority_extra: &'a [String],
}

impl<'a> EvidenceRequest<'a> {
    /// Request on the general path, taking locale and extra authority
    /// domains from `config`.
    pub fn new(query: &'a str, topic: Topic, config: &'a SearchConfig) -> Self {
        Self {
            query,
            topic,
            categories: &[],
            locale: &config.locale,
            time_window: None,
            authority_extra: &config.authority_extra,
        }
    }

    /// Restrict the search to these category buckets.
    pub fn with_categories(mut self, categories: &'a [SearchCategory]) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_time_window(mut self, window: Option<TimeWindow>) -> Self {
        self.time_window = window;
        self
    }
}

/// Collect up to `config.max_results` evidence items for one request.
///
/// Never fails: search errors are logged by the backend and read as empty
/// results, so the worst case is an empty list.
pub async fn collect_evidence<B: SearchBackend>(
    backend: &B,
    request: &EvidenceRequest<'_>,
    config: &SearchConfig,
) -> Vec<Evidence> {
    let k = config.max_results;
    if k == 0 || request.query.trim().is_empty() {
        return Vec::new();
    }

    let raw = if request.categories.is_empty() {
        general_rows(backend, request, config).await
    } else {
        bucket_rows(backend, request, k).await
    };
    let found = raw.len();

    let evidence: Vec<Evidence> = dedup_rows(raw).into_iter().map(to_evidence).collect();
    let unique = evidence.len();
    let merged = diversity_merge(evidence, k, config.diversity_passes);

    tracing::debug!(
        topic = %request.topic,
        found,
        unique,
        selected = merged.len(),
        "evidence collected"
    );
    merged
}

/// Search each bucket for `max(1, k / buckets)` rows, then top up with a
/// general search when short of `k`.
async fn bucket_rows<B: SearchBackend>(
    backend: &B,
    request: &EvidenceRequest<'_>,
    k: usize,
) -> Vec<SearchRow> {
    let per_bucket = (k / request.categories.len()).max(1);

    let searches = request.categories.iter().map(|&category| {
        backend.search(category, request.query, per_bucket, request.time_window)
    });
    let mut rows: Vec<SearchRow> = join_all(searches).await.into_iter().flatten().collect();

    if rows.len() < k {
        let top_up = backend
            .search(
                SearchCategory::General,
                request.query,
                k - rows.len(),
                request.time_window,
            )
            .await;
        rows.extend(top_up);
    }
    rows
}

/// General search for `k` rows, followed by the authority sweep when the
/// policy asks for it.
async fn general_rows<B: SearchBackend>(
    backend: &B,
    request: &EvidenceRequest<'_>,
    config: &SearchConfig,
) -> Vec<SearchRow> {
    let k = config.max_results;
    let mut rows = backend
        .search(SearchCategory::General, request.query, k, request.time_window)
        .await;

    if !config
        .authority_policy
        .should_run(&rows, config.min_trusted_domains)
    {
        return rows;
    }

    let domains = authority_domains(
        request.topic,
        request.locale,
        request.authority_extra,
        request.categories,
    );
    if domains.is_empty() {
        return rows;
    }

    tracing::debug!(domains = domains.len(), "running authority sweep");
    let sweep = Sweep {
        query: request.query,
        domains: &domains,
        k,
        group_size: config.sweep_group_size,
        scholarly: scholarly_emphasis(request.topic, request.categories),
        time_window: request.time_window,
    };
    let extra = run_sweep(backend, &sweep, rows.len()).await;
    rows.extend(extra);
    rows
}

fn to_evidence(row: SearchRow) -> Evidence {
    let domain = host_of(&row.url);
    let trust_tier = classify_domain(&domain);
    Evidence {
        title: row.title,
        url: row.url,
        snippet: row.snippet,
        domain,
        trust_tier,
    }
}
