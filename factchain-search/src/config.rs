//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] controls which provider is queried, how many evidence
//! items a claim receives, locale hints, and the tunables of the authority
//! fallback and diversity merge. It is built once per run and shared
//! read-only between claim tasks.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::collect::authority::AuthorityPolicy;
use crate::error::SearchError;
use crate::types::SearchProvider;

/// Default Google Custom Search endpoint.
pub const GOOGLE_CSE_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

/// Default SerpAPI endpoint.
pub const SERPAPI_ENDPOINT: &str = "https://serpapi.com/search.json";

/// Configuration for evidence collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Which backend to query.
    pub provider: SearchProvider,
    /// Target evidence count `k` per claim.
    pub max_results: usize,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
    /// Interface language hint (`hl`).
    pub hl: String,
    /// Country hint (`gl`).
    pub gl: String,
    /// Region key for the authority-domain tables (`KR`, `US`, `EU`).
    pub locale: String,
    /// When to run the authority-domain sweep on the general search path.
    pub authority_policy: AuthorityPolicy,
    /// Extra authority domains appended to the topic/locale lists.
    pub authority_extra: Vec<String>,
    /// The `auto` policy sweeps when fewer distinct tier-2+ domains than
    /// this were found.
    pub min_trusted_domains: usize,
    /// Domains per `site:` group in an authority sweep.
    pub sweep_group_size: usize,
    /// Round-robin passes per tier in the diversity merge.
    pub diversity_passes: usize,
    /// Random delay range in milliseconds `(min, max)` between paged requests.
    pub request_delay_ms: (u64, u64),
    /// Custom User-Agent. `None` uses `factchain-search/<version>`.
    pub user_agent: Option<String>,
    /// Google Custom Search endpoint.
    pub google_cse_endpoint: String,
    /// SerpAPI endpoint.
    pub serpapi_endpoint: String,
    /// Provider credentials; never serialised.
    #[serde(skip)]
    pub credentials: ProviderCredentials,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            provider: SearchProvider::GoogleCse,
            max_results: 6,
            timeout_seconds: 20,
            hl: "ko".into(),
            gl: "kr".into(),
            locale: "KR".into(),
            authority_policy: AuthorityPolicy::Auto,
            authority_extra: Vec::new(),
            min_trusted_domains: 2,
            sweep_group_size: 8,
            diversity_passes: 2,
            request_delay_ms: (0, 0),
            user_agent: None,
            google_cse_endpoint: GOOGLE_CSE_ENDPOINT.into(),
            serpapi_endpoint: SERPAPI_ENDPOINT.into(),
            credentials: ProviderCredentials::default(),
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `max_results` must be greater than 0
    /// - `timeout_seconds` must be greater than 0
    /// - `sweep_group_size` and `diversity_passes` must be greater than 0
    /// - `request_delay_ms.0` must be <= `request_delay_ms.1`
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.max_results == 0 {
            return Err(SearchError::Config(
                "max_results must be greater than 0".into(),
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.sweep_group_size == 0 {
            return Err(SearchError::Config(
                "sweep_group_size must be greater than 0".into(),
            ));
        }
        if self.diversity_passes == 0 {
            return Err(SearchError::Config(
                "diversity_passes must be greater than 0".into(),
            ));
        }
        if self.request_delay_ms.0 > self.request_delay_ms.1 {
            return Err(SearchError::Config(
                "request_delay_ms min must be <= max".into(),
            ));
        }
        Ok(())
    }

    /// Replace the credentials with those found in the environment.
    pub fn with_env_credentials(mut self) -> Self {
        self.credentials = ProviderCredentials::from_env();
        self
    }

    /// Checks that the selected provider has its credentials.
    pub fn require_credentials(&self) -> Result<(), SearchError> {
        match self.provider {
            SearchProvider::GoogleCse => {
                if self.credentials.google_cse_key.is_none() {
                    return Err(SearchError::MissingCredentials(
                        "GOOGLE_CSE_API_KEY is not set".into(),
                    ));
                }
                if self.credentials.google_cse_cx.is_none() {
                    return Err(SearchError::MissingCredentials(
                        "GOOGLE_CSE_CX is not set".into(),
                    ));
                }
            }
            SearchProvider::SerpApi => {
                if self.credentials.serpapi_key.is_none() {
                    return Err(SearchError::MissingCredentials(
                        "SERPAPI_API_KEY is not set".into(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// API keys for the search providers.
#[derive(Clone, Default)]
pub struct ProviderCredentials {
    pub google_cse_key: Option<String>,
    pub google_cse_cx: Option<String>,
    pub serpapi_key: Option<String>,
}

impl ProviderCredentials {
    /// Read credentials from `GOOGLE_CSE_API_KEY`, `GOOGLE_CSE_CX` and
    /// `SERPAPI_API_KEY`. Blank values count as unset.
    pub fn from_env() -> Self {
        Self {
            google_cse_key: non_empty_env("GOOGLE_CSE_API_KEY"),
            google_cse_cx: non_empty_env("GOOGLE_CSE_CX"),
            serpapi_key: non_empty_env("SERPAPI_API_KEY"),
        }
    }
}

impl fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn mask(v: &Option<String>) -> &'static str {
            if v.is_some() {
                "<redacted>"
            } else {
                "<unset>"
            }
        }
        f.debug_struct("ProviderCredentials")
            .field("google_cse_key", &mask(&self.google_cse_key))
            .field("google_cse_cx", &mask(&self.google_cse_cx))
            .field("serpapi_key", &mask(&self.serpapi_key))
            .finish()
    }
}

fn non_empty_env(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sensible_values() {
        let config = SearchConfig::default();
        assert_eq!(config.provider, SearchProvider::GoogleCse);
        assert_eq!(config.max_results, 6);
        assert_eq!(config.timeout_seconds, 20);
        assert_eq!(config.hl, "ko");
        assert_eq!(config.gl, "kr");
        assert_eq!(config.locale, "KR");
        assert_eq!(config.authority_policy, AuthorityPolicy::Auto);
        assert_eq!(config.min_trusted_domains, 2);
        assert_eq!(config.sweep_group_size, 8);
        assert_eq!(config.diversity_passes, 2);
        assert!(config.user_agent.is_none());
    }

    #[test]
    fn valid_config_passes_validation() {
        assert!(SearchConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_max_results_rejected() {
        let config = SearchConfig {
            max_results: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_results"));
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = SearchConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_seconds"));
    }

    #[test]
    fn zero_passes_rejected() {
        let config = SearchConfig {
            diversity_passes: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn invalid_delay_range_rejected() {
        let config = SearchConfig {
            request_delay_ms: (500, 100),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("delay"));
    }

    #[test]
    fn missing_cse_credentials_reported() {
        let config = SearchConfig::default();
        let err = config.require_credentials().unwrap_err();
        assert!(matches!(err, SearchError::MissingCredentials(_)));
        assert!(err.to_string().contains("GOOGLE_CSE_API_KEY"));
    }

    #[test]
    fn cse_requires_both_key_and_cx() {
        let config = SearchConfig {
            credentials: ProviderCredentials {
                google_cse_key: Some("k".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let err = config.require_credentials().unwrap_err();
        assert!(err.to_string().contains("GOOGLE_CSE_CX"));
    }

    #[test]
    fn serpapi_needs_only_its_key() {
        let config = SearchConfig {
            provider: SearchProvider::SerpApi,
            credentials: ProviderCredentials {
                serpapi_key: Some("k".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.require_credentials().is_ok());
    }

    #[test]
    fn debug_output_redacts_credentials() {
        let creds = ProviderCredentials {
            google_cse_key: Some("secret-key".into()),
            ..Default::default()
        };
        let out = format!("{creds:?}");
        assert!(!out.contains("secret-key"));
        assert!(out.contains("<redacted>"));
        assert!(out.contains("<unset>"));
    }

    #[test]
    fn credentials_are_not_serialised() {
        let config = SearchConfig {
            credentials: ProviderCredentials {
                serpapi_key: Some("secret".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let json = serde_json::to_string(&config).expect("serialize");
        assert!(!json.contains("secret"));
    }
}
