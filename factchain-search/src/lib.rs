//! # factchain-search
//!
//! Evidence acquisition for claim verification.
//!
//! Given a search query derived from a claim, this crate asks a web search
//! provider for candidate sources and turns the raw rows into a short,
//! authority-ranked, domain-diverse evidence list.
//!
//! ## Design
//!
//! - Two provider adapters (Google Custom Search, SerpAPI) behind one
//!   [`SearchBackend`] trait; pagination and soft failure are shared
//! - Category buckets rewrite the query with `site:` allow-lists
//! - A topic/locale authority sweep backs up thin general results
//! - URLs are canonicalised and deduplicated, then each source is given a
//!   [`TrustTier`] from its host
//! - A round-robin merge keeps any single domain from dominating
//!
//! ## Security
//!
//! - API keys are read from the environment and never serialised or logged
//! - Search queries are logged only at trace level
//! - Provider failures degrade to empty results and never abort a run

pub mod collect;
pub mod config;
pub mod error;
pub mod http;
pub mod provider;
pub mod providers;
pub mod query;
pub mod trust;
pub mod types;

pub use collect::{collect_evidence, AuthorityPolicy, EvidenceRequest};
pub use config::{ProviderCredentials, SearchConfig};
pub use error::{Result, SearchError};
pub use provider::{PageRequest, SearchBackend, SearchOutcome};
pub use providers::AnyBackend;
pub use types::{Evidence, SearchCategory, SearchProvider, SearchRow, TimeWindow, Topic, TrustTier};

/// Collect evidence for `query` on the general search path.
///
/// Builds the backend named in `config` and runs [`collect_evidence`].
/// Individual provider failures are logged and read as "no results", so
/// the only errors are configuration errors.
///
/// # Errors
///
/// Returns [`SearchError::Config`] for an invalid configuration, or
/// [`SearchError::Http`] if the HTTP client cannot be built.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> factchain_search::Result<()> {
/// use factchain_search::{SearchConfig, Topic};
///
/// let config = SearchConfig::default().with_env_credentials();
/// let evidence = factchain_search::collect("HTTP/3 runs over QUIC", Topic::Tech, &config).await?;
/// for item in &evidence {
///     println!("[{}] {}: {}", item.trust_tier, item.domain, item.url);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn collect(query: &str, topic: Topic, config: &SearchConfig) -> Result<Vec<Evidence>> {
    config.validate()?;
    let backend = AnyBackend::from_config(config)?;
    let request = EvidenceRequest::new(query, topic, config);
    Ok(collect_evidence(&backend, &request, config).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn collect_validates_config_zero_max_results() {
        let config = SearchConfig {
            max_results: 0,
            ..Default::default()
        };
        let result = collect("test", Topic::General, &config).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("max_results"));
    }

    #[tokio::test]
    async fn collect_validates_config_zero_timeout() {
        let config = SearchConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        let result = collect("test", Topic::General, &config).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout"));
    }

    #[tokio::test]
    async fn collect_without_credentials_is_empty_not_error() {
        let config = SearchConfig {
            authority_policy: AuthorityPolicy::Never,
            ..Default::default()
        };
        let evidence = collect("test", Topic::General, &config).await.expect("collect");
        assert!(evidence.is_empty());
    }
}
