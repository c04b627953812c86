//! Trait definition for pluggable search provider backends.
//!
//! Each backend (Google Custom Search, SerpAPI) implements
//! [`SearchBackend`] by providing a single-page request. Query rewriting,
//! pagination and the soft-fail policy are shared default methods, so every
//! backend degrades the same way: a failed request ends the page walk and
//! the caller receives whatever rows were collected, possibly none.

use std::future::Future;
use std::time::Duration;

use crate::error::SearchError;
use crate::query::build_category_query;
use crate::types::{SearchCategory, SearchProvider, SearchRow, TimeWindow};

/// One page request issued by the pagination loop.
#[derive(Debug, Clone)]
pub struct PageRequest<'a> {
    /// Bucket the query was rewritten for.
    pub category: SearchCategory,
    /// Fully rewritten query string.
    pub query: &'a str,
    /// Zero-based offset of the first row on this page.
    pub offset: usize,
    /// Rows requested for this page.
    pub num: usize,
    pub time_window: Option<TimeWindow>,
}

/// Rows gathered by a search plus the error that stopped it, if any.
///
/// `rows` being empty with `error == None` means the provider genuinely
/// found nothing; with `Some(_)` it means the request failed.
#[derive(Debug, Default)]
pub struct SearchOutcome {
    pub rows: Vec<SearchRow>,
    pub error: Option<SearchError>,
}

impl SearchOutcome {
    /// True when the page walk ended because of a failure.
    pub fn failed(&self) -> bool {
        self.error.is_some()
    }
}

/// A pluggable search backend.
///
/// Implementors only describe how to fetch and decode one page. All
/// implementations must be `Send + Sync` so that claim tasks can share a
/// backend behind an `Arc`.
pub trait SearchBackend: Send + Sync {
    /// Which provider this backend talks to.
    fn provider(&self) -> SearchProvider;

    /// Maximum rows a single request may return.
    fn page_size(&self) -> usize {
        10
    }

    /// Pause inserted between consecutive page requests.
    fn page_delay(&self) -> Duration {
        Duration::ZERO
    }

    /// Rewrite `query` for `category`. Backends with a native vertical for
    /// a category may override this.
    fn build_query(&self, category: SearchCategory, query: &str) -> String {
        build_category_query(category, query)
    }

    /// Issue a single page request.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] on missing credentials, transport failure,
    /// non-2xx status, or an undecodable body.
    fn fetch_page(
        &self,
        request: &PageRequest<'_>,
    ) -> impl Future<Output = Result<Vec<SearchRow>, SearchError>> + Send;

    /// Search a category bucket, paging until `max_results` rows were
    /// collected or the provider returned a short page.
    fn search_detailed(
        &self,
        category: SearchCategory,
        query: &str,
        max_results: usize,
        time_window: Option<TimeWindow>,
    ) -> impl Future<Output = SearchOutcome> + Send {
        async move {
            let query = self.build_query(category, query);
            walk_pages(self, category, &query, max_results, time_window).await
        }
    }

    /// Like [`SearchBackend::search_detailed`] but only the rows. Never
    /// fails: errors are logged and read as "no results".
    fn search(
        &self,
        category: SearchCategory,
        query: &str,
        max_results: usize,
        time_window: Option<TimeWindow>,
    ) -> impl Future<Output = Vec<SearchRow>> + Send {
        async move {
            self.search_detailed(category, query, max_results, time_window)
                .await
                .rows
        }
    }
}

/// Page through an already rewritten `query` until `max_results` rows were
/// collected, a short page arrives or a request fails.
pub(crate) async fn walk_pages<B: SearchBackend + ?Sized>(
    backend: &B,
    category: SearchCategory,
    query: &str,
    max_results: usize,
    time_window: Option<TimeWindow>,
) -> SearchOutcome {
    tracing::trace!(provider = %backend.provider(), %category, query = %query, "search");

    let mut outcome = SearchOutcome::default();
    let page_size = backend.page_size().max(1);

    while outcome.rows.len() < max_results {
        let num = page_size.min(max_results - outcome.rows.len());
        let request = PageRequest {
            category,
            query,
            offset: outcome.rows.len(),
            num,
            time_window,
        };

        if request.offset > 0 {
            let delay = backend.page_delay();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        match backend.fetch_page(&request).await {
            Ok(page) => {
                let short_page = page.len() < num;
                let room = max_results - outcome.rows.len();
                outcome.rows.extend(page.into_iter().take(room));
                if short_page {
                    break;
                }
            }
            Err(err) => {
                tracing::warn!(
                    provider = %backend.provider(),
                    %category,
                    error = %err,
                    "search request failed"
                );
                outcome.error = Some(err);
                break;
            }
        }
    }

    tracing::debug!(
        provider = %backend.provider(),
        %category,
        count = outcome.rows.len(),
        "search finished"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Serves `total` synthetic rows in pages and records each request.
    struct PagedBackend {
        total: usize,
        page_size: usize,
        fail_at_offset: Option<usize>,
        requests: Mutex<Vec<(usize, usize, String)>>,
    }

    impl PagedBackend {
        fn new(total: usize, page_size: usize) -> Self {
            Self {
                total,
                page_size,
                fail_at_offset: None,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<(usize, usize, String)> {
            self.requests.lock().expect("lock").clone()
        }
    }

    impl SearchBackend for PagedBackend {
        fn provider(&self) -> SearchProvider {
            SearchProvider::GoogleCse
        }

        fn page_size(&self) -> usize {
            self.page_size
        }

        async fn fetch_page(&self, request: &PageRequest<'_>) -> Result<Vec<SearchRow>, SearchError> {
            self.requests.lock().expect("lock").push((
                request.offset,
                request.num,
                request.query.to_string(),
            ));
            if self.fail_at_offset == Some(request.offset) {
                return Err(SearchError::Http("status 500".into()));
            }
            let end = (request.offset + request.num).min(self.total);
            Ok((request.offset..end)
                .map(|i| SearchRow::new(format!("T{i}"), format!("https://r{i}.com"), "s"))
                .collect())
        }
    }

    #[test]
    fn backend_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PagedBackend>();
    }

    #[tokio::test]
    async fn pages_until_max_results() {
        let backend = PagedBackend::new(100, 10);
        let rows = backend
            .search(SearchCategory::General, "q", 25, None)
            .await;
        assert_eq!(rows.len(), 25);
        let offsets: Vec<(usize, usize)> =
            backend.requests().iter().map(|(o, n, _)| (*o, *n)).collect();
        assert_eq!(offsets, vec![(0, 10), (10, 10), (20, 5)]);
    }

    #[tokio::test]
    async fn stops_on_short_page() {
        let backend = PagedBackend::new(13, 10);
        let rows = backend
            .search(SearchCategory::General, "q", 50, None)
            .await;
        assert_eq!(rows.len(), 13);
        assert_eq!(backend.requests().len(), 2);
    }

    #[tokio::test]
    async fn query_is_rewritten_for_category() {
        let backend = PagedBackend::new(1, 10);
        backend.search(SearchCategory::General, "quic", 1, None).await;
        assert_eq!(backend.requests()[0].2, "quic -site:patents.google.com");
    }

    #[tokio::test]
    async fn failure_is_soft_and_keeps_earlier_pages() {
        let backend = PagedBackend {
            fail_at_offset: Some(10),
            ..PagedBackend::new(100, 10)
        };
        let outcome = backend
            .search_detailed(SearchCategory::News, "q", 30, None)
            .await;
        assert!(outcome.failed());
        assert_eq!(outcome.rows.len(), 10);
    }

    #[tokio::test]
    async fn failure_on_first_page_yields_empty() {
        let backend = PagedBackend {
            fail_at_offset: Some(0),
            ..PagedBackend::new(100, 10)
        };
        let rows = backend.search(SearchCategory::News, "q", 5, None).await;
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn zero_max_results_issues_no_request() {
        let backend = PagedBackend::new(100, 10);
        let rows = backend.search(SearchCategory::General, "q", 0, None).await;
        assert!(rows.is_empty());
        assert!(backend.requests().is_empty());
    }
}
