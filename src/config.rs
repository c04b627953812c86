//! Configuration for a verification run.
//!
//! Built once before dispatch: defaults, then an optional TOML file, then
//! environment overrides, then CLI overrides. The result is shared
//! read-only by every claim task.

use std::fmt;
use std::path::Path;

use factchain_search::{ProviderCredentials, SearchConfig, SearchProvider, TimeWindow};
use serde::{Deserialize, Serialize};

use crate::error::{FactchainError, Result};

/// Default language model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default OpenAI API base URL.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FactchainConfig {
    /// Language-model service settings.
    pub llm: LlmConfig,
    /// Evidence search settings.
    pub search: SearchConfig,
    /// Claim pipeline settings.
    pub pipeline: PipelineConfig,
}

/// Language-model service settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Model identifier sent with every request.
    pub model: String,
    /// API base URL, without the `/v1` suffix.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
    /// API key; read from the environment, never serialised.
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.into(),
            base_url: DEFAULT_OPENAI_BASE_URL.into(),
            timeout_seconds: 60,
            api_key: None,
        }
    }
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .field(
                "api_key",
                &if self.api_key.is_some() { "<redacted>" } else { "<unset>" },
            )
            .finish()
    }
}

/// Claim pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Upper bound on concurrently processed claims.
    pub max_workers_cap: usize,
    /// Time budget for one claim (collect, judge and score), in seconds.
    pub task_timeout_seconds: u64,
    /// Search the category buckets preset for each claim's topic. When
    /// false, claims use the general search with authority fallback.
    pub topic_presets: bool,
    /// Optional recency restriction applied to every search.
    pub time_window: Option<TimeWindow>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_workers_cap: 6,
            task_timeout_seconds: 120,
            topic_presets: true,
            time_window: None,
        }
    }
}

impl PipelineConfig {
    /// Worker count: `min(max_workers_cap, available parallelism)`, at least 1.
    pub fn max_workers(&self) -> usize {
        let cpus = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        self.max_workers_cap.min(cpus).max(1)
    }
}

impl FactchainConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| FactchainError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// Credentials are not written.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| FactchainError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Defaults or `path`, then the process environment, then validation.
    ///
    /// # Errors
    ///
    /// Returns an error for an unreadable file, an unparseable environment
    /// value or an invalid result.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`FactchainError::Config`] when a numeric or enumerated
    /// variable cannot be parsed.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    ///
    /// Blank values are ignored. Credentials are always replaced by what
    /// `lookup` provides.
    ///
    /// # Errors
    ///
    /// Returns [`FactchainError::Config`] when a numeric or enumerated
    /// variable cannot be parsed.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        self.llm.api_key = get("OPENAI_API_KEY");
        if let Some(url) = get("OPENAI_BASE_URL") {
            self.llm.base_url = url;
        }
        if let Some(model) = get("FACTCHAIN_MODEL") {
            self.llm.model = model;
        }
        if let Some(n) = get("FACTCHAIN_MAX_RESULTS") {
            self.search.max_results = parse_number("FACTCHAIN_MAX_RESULTS", &n)?;
        }
        if let Some(n) = get("FACTCHAIN_TIMEOUT") {
            self.search.timeout_seconds = parse_number("FACTCHAIN_TIMEOUT", &n)?;
        }
        if let Some(hl) = get("FACTCHAIN_HL") {
            self.search.hl = hl;
        }
        if let Some(gl) = get("FACTCHAIN_GL") {
            self.search.gl = gl;
        }
        if let Some(locale) = get("FACTCHAIN_LOCALE") {
            self.search.locale = locale.to_ascii_uppercase();
        }
        if let Some(label) = get("FACTCHAIN_PROVIDER") {
            self.search.provider = SearchProvider::from_label(&label).ok_or_else(|| {
                FactchainError::Config(format!("FACTCHAIN_PROVIDER: unknown provider '{label}'"))
            })?;
        }
        if let Some(endpoint) = get("SERPAPI_ENDPOINT") {
            self.search.serpapi_endpoint = endpoint;
        }
        self.search.credentials = ProviderCredentials {
            google_cse_key: get("GOOGLE_CSE_API_KEY"),
            google_cse_cx: get("GOOGLE_CSE_CX"),
            serpapi_key: get("SERPAPI_API_KEY"),
        };
        Ok(())
    }

    /// Replace the model identifier. Must happen before dispatch.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.llm.model = model.into();
        self
    }

    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// # Errors
    ///
    /// Returns [`FactchainError::Config`] or a wrapped search config error.
    pub fn validate(&self) -> Result<()> {
        self.search.validate()?;
        if self.llm.model.trim().is_empty() {
            return Err(FactchainError::Config("llm.model must not be empty".into()));
        }
        if self.llm.timeout_seconds == 0 {
            return Err(FactchainError::Config(
                "llm.timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.pipeline.max_workers_cap == 0 {
            return Err(FactchainError::Config(
                "pipeline.max_workers_cap must be greater than 0".into(),
            ));
        }
        if self.pipeline.task_timeout_seconds == 0 {
            return Err(FactchainError::Config(
                "pipeline.task_timeout_seconds must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Checks that every credential the run needs is present.
    ///
    /// # Errors
    ///
    /// Returns [`FactchainError::MissingCredentials`] naming the first
    /// missing key.
    pub fn require_credentials(&self) -> Result<()> {
        if self.llm.api_key.is_none() {
            return Err(FactchainError::MissingCredentials(
                "OPENAI_API_KEY is not set".into(),
            ));
        }
        self.search
            .require_credentials()
            .map_err(|e| FactchainError::MissingCredentials(e.to_string()))
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| FactchainError::Config(format!("{key}: expected a number, got '{value}'")))
}
