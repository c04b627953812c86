//! Error types for the factchain-search crate.
//!
//! Messages are stable strings suitable for logs. No API keys or query
//! parameters carrying credentials appear in error messages.

/// Errors raised by a single search provider request.
///
/// These never escape [`crate::provider::SearchBackend::search`]; the
/// adapter logs them and degrades to an empty row set.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Required provider credentials are not configured.
    #[error("missing credentials: {0}")]
    MissingCredentials(String),

    /// A provider request did not complete in time.
    #[error("search timed out: {0}")]
    Timeout(String),

    /// Transport failure or a non-2xx response.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The provider response body could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),
}

/// Convenience type alias for factchain-search results.
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_missing_credentials() {
        let err = SearchError::MissingCredentials("GOOGLE_CSE_CX is not set".into());
        assert_eq!(err.to_string(), "missing credentials: GOOGLE_CSE_CX is not set");
    }

    #[test]
    fn display_timeout() {
        let err = SearchError::Timeout("exceeded 20s limit".into());
        assert_eq!(err.to_string(), "search timed out: exceeded 20s limit");
    }

    #[test]
    fn display_http() {
        let err = SearchError::Http("status 403".into());
        assert_eq!(err.to_string(), "HTTP error: status 403");
    }

    #[test]
    fn display_parse() {
        let err = SearchError::Parse("expected object".into());
        assert_eq!(err.to_string(), "parse error: expected object");
    }

    #[test]
    fn display_config() {
        let err = SearchError::Config("max_results must be > 0".into());
        assert_eq!(err.to_string(), "config error: max_results must be > 0");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SearchError>();
    }
}
