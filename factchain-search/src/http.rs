//! Shared HTTP plumbing for search provider requests.
//!
//! Provides a configured [`reqwest::Client`] and the jittered pause used
//! between paginated requests so that a claim's page walk does not hammer
//! a metered API.

use std::time::Duration;

use rand::Rng;

use crate::config::SearchConfig;
use crate::error::SearchError;

/// Build a [`reqwest::Client`] for provider API calls.
///
/// The client has:
/// - Timeout from config
/// - Custom User-Agent if configured, `factchain-search/<version>` otherwise
/// - gzip decompression
///
/// # Errors
///
/// Returns [`SearchError::Http`] if the client cannot be constructed.
pub fn build_client(config: &SearchConfig) -> Result<reqwest::Client, SearchError> {
    let ua = match config.user_agent {
        Some(ref custom) => custom.clone(),
        None => default_user_agent(),
    };

    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(ua)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| SearchError::Http(format!("failed to build HTTP client: {e}")))
}

/// `factchain-search/<crate version>`.
pub fn default_user_agent() -> String {
    format!("factchain-search/{}", env!("CARGO_PKG_VERSION"))
}

/// Pick a delay inside the `(min, max)` millisecond range.
pub fn jitter_delay(range_ms: (u64, u64)) -> Duration {
    let (min, max) = range_ms;
    if max == 0 || min >= max {
        return Duration::from_millis(min);
    }
    Duration::from_millis(rand::thread_rng().gen_range(min..=max))
}

/// Map a reqwest failure to a [`SearchError`], keeping timeouts distinct.
pub(crate) fn map_request_error(provider: &str, err: reqwest::Error) -> SearchError {
    if err.is_timeout() {
        SearchError::Timeout(format!("{provider} request timed out"))
    } else if let Some(status) = err.status() {
        SearchError::Http(format!("{provider} returned status {status}"))
    } else {
        // reqwest embeds the request URL (with api keys) in its Display
        // output, so only the error kind is reported.
        SearchError::Http(format!("{provider} request failed: {}", error_kind(&err)))
    }
}

fn error_kind(err: &reqwest::Error) -> &'static str {
    if err.is_connect() {
        "connection error"
    } else if err.is_decode() {
        "decode error"
    } else if err.is_body() {
        "body error"
    } else if err.is_redirect() {
        "redirect error"
    } else {
        "transport error"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_client_with_default_config() {
        let config = SearchConfig::default();
        assert!(build_client(&config).is_ok());
    }

    #[test]
    fn build_client_with_custom_ua() {
        let config = SearchConfig {
            user_agent: Some("CustomBot/1.0".into()),
            ..Default::default()
        };
        assert!(build_client(&config).is_ok());
    }

    #[test]
    fn default_user_agent_names_crate() {
        assert!(default_user_agent().starts_with("factchain-search/"));
    }

    #[test]
    fn zero_delay_range_means_no_pause() {
        assert_eq!(jitter_delay((0, 0)), Duration::ZERO);
    }

    #[test]
    fn jitter_stays_inside_range() {
        for _ in 0..50 {
            let d = jitter_delay((10, 30));
            assert!(d >= Duration::from_millis(10) && d <= Duration::from_millis(30));
        }
    }
}
