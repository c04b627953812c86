//! Search provider implementations.
//!
//! Each module provides a struct implementing
//! [`crate::provider::SearchBackend`] for one search API. [`AnyBackend`]
//! selects between them once, from configuration, so call sites never
//! branch on the provider.

pub mod google_cse;
pub mod serpapi;

use std::time::Duration;

pub use google_cse::GoogleCseProvider;
pub use serpapi::SerpApiProvider;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::provider::{PageRequest, SearchBackend, SearchOutcome};
use crate::types::{SearchCategory, SearchProvider, SearchRow, TimeWindow};

/// The backend chosen by [`SearchConfig::provider`].
pub enum AnyBackend {
    GoogleCse(GoogleCseProvider),
    SerpApi(SerpApiProvider),
}

impl AnyBackend {
    /// Construct the backend named in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &SearchConfig) -> Result<Self, SearchError> {
        Ok(match config.provider {
            SearchProvider::GoogleCse => Self::GoogleCse(GoogleCseProvider::new(config)?),
            SearchProvider::SerpApi => Self::SerpApi(SerpApiProvider::new(config)?),
        })
    }
}

impl SearchBackend for AnyBackend {
    fn provider(&self) -> SearchProvider {
        match self {
            Self::GoogleCse(b) => b.provider(),
            Self::SerpApi(b) => b.provider(),
        }
    }

    fn page_size(&self) -> usize {
        match self {
            Self::GoogleCse(b) => b.page_size(),
            Self::SerpApi(b) => b.page_size(),
        }
    }

    fn page_delay(&self) -> Duration {
        match self {
            Self::GoogleCse(b) => b.page_delay(),
            Self::SerpApi(b) => b.page_delay(),
        }
    }

    fn build_query(&self, category: SearchCategory, query: &str) -> String {
        match self {
            Self::GoogleCse(b) => b.build_query(category, query),
            Self::SerpApi(b) => b.build_query(category, query),
        }
    }

    async fn fetch_page(&self, request: &PageRequest<'_>) -> Result<Vec<SearchRow>, SearchError> {
        match self {
            Self::GoogleCse(b) => b.fetch_page(request).await,
            Self::SerpApi(b) => b.fetch_page(request).await,
        }
    }

    async fn search_detailed(
        &self,
        category: SearchCategory,
        query: &str,
        max_results: usize,
        time_window: Option<TimeWindow>,
    ) -> SearchOutcome {
        match self {
            Self::GoogleCse(b) => {
                b.search_detailed(category, query, max_results, time_window)
                    .await
            }
            Self::SerpApi(b) => {
                b.search_detailed(category, query, max_results, time_window)
                    .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selects_backend_from_config() {
        let cse = AnyBackend::from_config(&SearchConfig::default()).expect("backend");
        assert_eq!(cse.provider(), SearchProvider::GoogleCse);

        let serp = AnyBackend::from_config(&SearchConfig {
            provider: SearchProvider::SerpApi,
            ..Default::default()
        })
        .expect("backend");
        assert_eq!(serp.provider(), SearchProvider::SerpApi);
    }

    #[test]
    fn query_rewrite_delegates_to_selected_backend() {
        let serp = AnyBackend::from_config(&SearchConfig {
            provider: SearchProvider::SerpApi,
            ..Default::default()
        })
        .expect("backend");
        assert!(!serp.build_query(SearchCategory::News, "q").contains("site:reuters.com"));

        let cse = AnyBackend::from_config(&SearchConfig::default()).expect("backend");
        assert!(cse.build_query(SearchCategory::News, "q").contains("site:reuters.com"));
    }
}
