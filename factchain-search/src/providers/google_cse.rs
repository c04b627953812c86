//! Google Programmable Search (Custom Search JSON API) backend.
//!
//! One request returns at most ten items; `start` is 1-based.

use std::time::Duration;

use serde::Deserialize;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http;
use crate::provider::{PageRequest, SearchBackend};
use crate::types::{SearchProvider, SearchRow, TimeWindow};

/// Largest `num` the Custom Search API accepts.
const CSE_PAGE_SIZE: usize = 10;

/// Google Custom Search JSON API client.
pub struct GoogleCseProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    cx: Option<String>,
    delay_ms: (u64, u64),
}

impl GoogleCseProvider {
    /// Build a backend from the shared search configuration.
    ///
    /// Missing credentials are not an error here; every request then fails
    /// soft with [`SearchError::MissingCredentials`].
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        Ok(Self {
            client: http::build_client(config)?,
            endpoint: config.google_cse_endpoint.clone(),
            api_key: config.credentials.google_cse_key.clone(),
            cx: config.credentials.google_cse_cx.clone(),
            delay_ms: config.request_delay_ms,
        })
    }
}

impl SearchBackend for GoogleCseProvider {
    fn provider(&self) -> SearchProvider {
        SearchProvider::GoogleCse
    }

    fn page_size(&self) -> usize {
        CSE_PAGE_SIZE
    }

    fn page_delay(&self) -> Duration {
        http::jitter_delay(self.delay_ms)
    }

    async fn fetch_page(&self, request: &PageRequest<'_>) -> Result<Vec<SearchRow>, SearchError> {
        let (Some(key), Some(cx)) = (self.api_key.as_deref(), self.cx.as_deref()) else {
            return Err(SearchError::MissingCredentials(
                "GOOGLE_CSE_API_KEY and GOOGLE_CSE_CX are required".into(),
            ));
        };

        let num = request.num.clamp(1, CSE_PAGE_SIZE).to_string();
        let start = (request.offset + 1).to_string();
        let mut params: Vec<(&str, &str)> = vec![
            ("key", key),
            ("cx", cx),
            ("q", request.query),
            ("num", num.as_str()),
            ("start", start.as_str()),
        ];
        if let Some(window) = request.time_window {
            params.push(("dateRestrict", date_restrict(window)));
        }

        let response = self
            .client
            .get(&self.endpoint)
            .query(&params)
            .send()
            .await
            .map_err(|e| http::map_request_error("Google CSE", e))?
            .error_for_status()
            .map_err(|e| http::map_request_error("Google CSE", e))?;

        let body = response
            .text()
            .await
            .map_err(|e| http::map_request_error("Google CSE", e))?;

        tracing::trace!(bytes = body.len(), "Google CSE response received");

        parse_cse_response(&body)
    }
}

/// `dateRestrict` value for a time window.
fn date_restrict(window: TimeWindow) -> &'static str {
    match window {
        TimeWindow::Day => "d1",
        TimeWindow::Week => "w1",
        TimeWindow::Month => "m1",
        TimeWindow::Year => "y1",
    }
}

#[derive(Deserialize)]
struct CseResponse {
    #[serde(default)]
    items: Vec<CseItem>,
}

#[derive(Deserialize)]
struct CseItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
    #[serde(default, rename = "htmlSnippet")]
    html_snippet: String,
}

/// Decode a Custom Search response body into rows.
///
/// A body without `items` is a valid "no results" answer.
pub(crate) fn parse_cse_response(body: &str) -> Result<Vec<SearchRow>, SearchError> {
    let parsed: CseResponse = serde_json::from_str(body)
        .map_err(|e| SearchError::Parse(format!("Google CSE response: {e}")))?;

    Ok(parsed
        .items
        .into_iter()
        .map(|item| {
            let snippet = if item.snippet.is_empty() {
                item.html_snippet
            } else {
                item.snippet
            };
            SearchRow {
                title: item.title,
                url: item.link,
                snippet,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOCK_CSE_JSON: &str = r#"{
        "kind": "customsearch#search",
        "items": [
            {
                "title": "RFC 9114 - HTTP/3",
                "link": "https://www.rfc-editor.org/rfc/rfc9114",
                "snippet": "HTTP/3 maps HTTP semantics over the QUIC transport protocol."
            },
            {
                "title": "QUIC explained",
                "link": "https://blog.example.com/quic?utm_source=feed",
                "htmlSnippet": "<b>QUIC</b> is a UDP-based transport."
            },
            {
                "link": "https://bare.example.org/"
            }
        ]
    }"#;

    #[test]
    fn parse_items_into_rows() {
        let rows = parse_cse_response(MOCK_CSE_JSON).expect("should parse");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].title, "RFC 9114 - HTTP/3");
        assert_eq!(rows[0].url, "https://www.rfc-editor.org/rfc/rfc9114");
        assert!(rows[0].snippet.contains("QUIC transport"));
    }

    #[test]
    fn html_snippet_used_when_snippet_missing() {
        let rows = parse_cse_response(MOCK_CSE_JSON).expect("should parse");
        assert_eq!(rows[1].snippet, "<b>QUIC</b> is a UDP-based transport.");
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let rows = parse_cse_response(MOCK_CSE_JSON).expect("should parse");
        assert_eq!(rows[2].title, "");
        assert_eq!(rows[2].snippet, "");
    }

    #[test]
    fn response_without_items_is_empty() {
        let rows = parse_cse_response(r#"{"kind":"customsearch#search"}"#).expect("should parse");
        assert!(rows.is_empty());
    }

    #[test]
    fn malformed_body_is_parse_error() {
        let err = parse_cse_response("<html>quota exceeded</html>").unwrap_err();
        assert!(matches!(err, SearchError::Parse(_)));
    }

    #[test]
    fn date_restrict_mapping() {
        assert_eq!(date_restrict(TimeWindow::Day), "d1");
        assert_eq!(date_restrict(TimeWindow::Year), "y1");
    }

    #[tokio::test]
    async fn missing_credentials_fail_soft() {
        let backend = GoogleCseProvider::new(&SearchConfig::default()).expect("client");
        let outcome = backend
            .search_detailed(crate::types::SearchCategory::General, "q", 5, None)
            .await;
        assert!(outcome.rows.is_empty());
        assert!(matches!(outcome.error, Some(SearchError::MissingCredentials(_))));
    }

    #[test]
    fn is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GoogleCseProvider>();
    }
}
