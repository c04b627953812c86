//! SerpAPI backend: Google results through the SerpAPI proxy.
//!
//! News searches use Google's news vertical (`tbm=nws`) instead of a
//! `site:` allow-list. Scholarly searches ask Google Scholar first and top
//! up with the site-filtered web query when Scholar returns too few rows.
//! Every other category uses the shared query rewrite.

use std::collections::HashSet;
use std::time::Duration;

use serde::Deserialize;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http;
use crate::provider::{walk_pages, PageRequest, SearchBackend, SearchOutcome};
use crate::query::{build_category_query, with_exclusion};
use crate::types::{SearchCategory, SearchProvider, SearchRow, TimeWindow};

/// SerpAPI caps `num` at 100, but Google pages beyond 10 are unreliable.
const SERPAPI_PAGE_SIZE: usize = 10;

/// Google Scholar serves at most 20 rows per request.
const SCHOLAR_PAGE_SIZE: usize = 20;

/// SerpAPI client.
pub struct SerpApiProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    hl: String,
    gl: String,
    delay_ms: (u64, u64),
}

impl SerpApiProvider {
    /// Build a backend from the shared search configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        Ok(Self {
            client: http::build_client(config)?,
            endpoint: config.serpapi_endpoint.clone(),
            api_key: config.credentials.serpapi_key.clone(),
            hl: config.hl.clone(),
            gl: config.gl.clone(),
            delay_ms: config.request_delay_ms,
        })
    }
}

impl SearchBackend for SerpApiProvider {
    fn provider(&self) -> SearchProvider {
        SearchProvider::SerpApi
    }

    fn page_size(&self) -> usize {
        SERPAPI_PAGE_SIZE
    }

    fn page_delay(&self) -> Duration {
        http::jitter_delay(self.delay_ms)
    }

    fn build_query(&self, category: SearchCategory, query: &str) -> String {
        match category {
            SearchCategory::News => with_exclusion(query.trim()),
            other => build_category_query(other, query),
        }
    }

    async fn fetch_page(&self, request: &PageRequest<'_>) -> Result<Vec<SearchRow>, SearchError> {
        let key = self.api_key()?;
        let num = request.num.clamp(1, SERPAPI_PAGE_SIZE).to_string();
        let start = request.offset.to_string();
        let mut params: Vec<(&str, &str)> = vec![
            ("engine", "google"),
            ("q", request.query),
            ("api_key", key),
            ("num", num.as_str()),
            ("start", start.as_str()),
            ("hl", self.hl.as_str()),
            ("gl", self.gl.as_str()),
        ];
        let news = request.category == SearchCategory::News;
        if news {
            params.push(("tbm", "nws"));
        }
        if let Some(window) = request.time_window {
            params.push(("tbs", recency_filter(window)));
        }

        let body = self.get(&params).await?;
        tracing::trace!(bytes = body.len(), news, "SerpAPI response received");
        parse_serpapi_response(&body, news)
    }

    async fn search_detailed(
        &self,
        category: SearchCategory,
        query: &str,
        max_results: usize,
        time_window: Option<TimeWindow>,
    ) -> SearchOutcome {
        if category == SearchCategory::Scholarly {
            return self.scholarly_search(query, max_results, time_window).await;
        }
        let query = self.build_query(category, query);
        walk_pages(self, category, &query, max_results, time_window).await
    }
}

impl SerpApiProvider {
    fn api_key(&self) -> Result<&str, SearchError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| SearchError::MissingCredentials("SERPAPI_API_KEY is required".into()))
    }

    async fn get(&self, params: &[(&str, &str)]) -> Result<String, SearchError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(params)
            .send()
            .await
            .map_err(|e| http::map_request_error("SerpAPI", e))?
            .error_for_status()
            .map_err(|e| http::map_request_error("SerpAPI", e))?;

        response
            .text()
            .await
            .map_err(|e| http::map_request_error("SerpAPI", e))
    }

    /// One Google Scholar request for the raw query.
    async fn fetch_scholar(&self, query: &str, num: usize) -> Result<Vec<SearchRow>, SearchError> {
        let key = self.api_key()?;
        let num = num.clamp(1, SCHOLAR_PAGE_SIZE).to_string();
        let params = [
            ("engine", "google_scholar"),
            ("q", query),
            ("api_key", key),
            ("num", num.as_str()),
            ("hl", self.hl.as_str()),
        ];
        let body = self.get(&params).await?;
        tracing::trace!(bytes = body.len(), "SerpAPI scholar response received");
        parse_serpapi_response(&body, false)
    }

    /// Scholar first, then the site-filtered web query for the remainder.
    ///
    /// A Scholar failure does not stop the top-up. The outcome only reports
    /// it when nothing at all was collected.
    async fn scholarly_search(
        &self,
        query: &str,
        max_results: usize,
        time_window: Option<TimeWindow>,
    ) -> SearchOutcome {
        let mut outcome = SearchOutcome::default();
        if max_results == 0 {
            return outcome;
        }

        let query = query.trim();
        let mut scholar_error = None;
        match self.fetch_scholar(query, max_results).await {
            Ok(rows) => outcome.rows.extend(rows.into_iter().take(max_results)),
            Err(err) => {
                tracing::warn!(error = %err, "SerpAPI scholar request failed");
                scholar_error = Some(err);
            }
        }

        let remaining = max_results - outcome.rows.len();
        if remaining > 0 {
            let delay = self.page_delay();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let filtered = build_category_query(SearchCategory::Scholarly, query);
            let top_up = walk_pages(
                self,
                SearchCategory::Scholarly,
                &filtered,
                remaining,
                time_window,
            )
            .await;
            outcome.rows.extend(top_up.rows);
            outcome.error = top_up.error;
        }

        let mut seen = HashSet::new();
        outcome
            .rows
            .retain(|row| !row.url.is_empty() && seen.insert(row.url.clone()));

        if outcome.rows.is_empty() && outcome.error.is_none() {
            outcome.error = scholar_error;
        }
        tracing::debug!(count = outcome.rows.len(), "SerpAPI scholarly search finished");
        outcome
    }
}

/// `tbs` value for a time window.
fn recency_filter(window: TimeWindow) -> &'static str {
    match window {
        TimeWindow::Day => "qdr:d",
        TimeWindow::Week => "qdr:w",
        TimeWindow::Month => "qdr:m",
        TimeWindow::Year => "qdr:y",
    }
}

#[derive(Deserialize)]
struct SerpApiResponse {
    #[serde(default)]
    organic_results: Vec<SerpApiItem>,
    #[serde(default)]
    news_results: Vec<SerpApiItem>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct SerpApiItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
    /// News items name their outlet either as a string or as
    /// `{"name": ...}` depending on API version.
    #[serde(default)]
    source: Option<serde_json::Value>,
    /// Scholar rows often carry only an authors/venue line here.
    #[serde(default)]
    publication_info: Option<PublicationInfo>,
}

#[derive(Deserialize)]
struct PublicationInfo {
    #[serde(default)]
    summary: String,
}

impl SerpApiItem {
    fn source_name(&self) -> String {
        match &self.source {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Object(map)) => map
                .get("name")
                .and_then(serde_json::Value::as_str)
                .unwrap_or_default()
                .to_string(),
            _ => String::new(),
        }
    }
}

/// Decode a SerpAPI response body into rows.
///
/// SerpAPI reports some failures (bad key, exhausted plan) with a 200 and
/// an `error` field. "Google hasn't returned any results" is also reported
/// that way and is treated as an empty result, not a failure.
pub(crate) fn parse_serpapi_response(body: &str, news: bool) -> Result<Vec<SearchRow>, SearchError> {
    let parsed: SerpApiResponse = serde_json::from_str(body)
        .map_err(|e| SearchError::Parse(format!("SerpAPI response: {e}")))?;

    let items = if news {
        parsed.news_results
    } else {
        parsed.organic_results
    };

    if items.is_empty() {
        if let Some(message) = parsed.error {
            if message.to_ascii_lowercase().contains("hasn't returned any results") {
                return Ok(Vec::new());
            }
            return Err(SearchError::Http(format!("SerpAPI error: {message}")));
        }
    }

    Ok(items
        .into_iter()
        .map(|item| {
            let snippet = if !item.snippet.is_empty() {
                item.snippet.clone()
            } else if news {
                item.source_name()
            } else {
                item.publication_info
                    .as_ref()
                    .map(|info| info.summary.clone())
                    .unwrap_or_default()
            };
            SearchRow {
                title: item.title,
                url: item.link,
                snippet,
            }
        })
        .collect())
}
