//! End-to-end run: extract claims, process them, assemble the report.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use factchain_search::{AnyBackend, SearchBackend};
use tracing::{info, warn};

use super::orchestrator::{ClaimPipeline, elapsed_secs};
use super::report::{EXTRACT_TIMING_KEY, ParallelInfo, Report, ReportMeta};
use crate::config::FactchainConfig;
use crate::error::Result;
use crate::llm::{
    ClaimExtractor, EvidenceJudge, OpenAiClaimExtractor, OpenAiEvidenceJudge, ResponsesClient,
};
use crate::scoring::round_to;

/// Verifies the claims in a passage of text.
pub struct FactChecker<B> {
    extractor: Arc<dyn ClaimExtractor>,
    pipeline: ClaimPipeline<B>,
}

impl FactChecker<AnyBackend> {
    /// Wire the OpenAI services and the configured search provider.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FactchainError::MissingCredentials`] when an API key
    /// is absent, or an error if configuration is invalid or an HTTP client
    /// cannot be built.
    pub fn from_config(config: FactchainConfig) -> Result<Self> {
        config.validate()?;
        config.require_credentials()?;

        let client = ResponsesClient::from_config(&config.llm)?;
        let extractor = Arc::new(OpenAiClaimExtractor::new(client.clone()));
        let judge = Arc::new(OpenAiEvidenceJudge::new(client));
        let backend = Arc::new(AnyBackend::from_config(&config.search)?);

        Ok(Self::new(extractor, judge, backend, Arc::new(config)))
    }
}

impl<B: SearchBackend + 'static> FactChecker<B> {
    pub fn new(
        extractor: Arc<dyn ClaimExtractor>,
        judge: Arc<dyn EvidenceJudge>,
        backend: Arc<B>,
        config: Arc<FactchainConfig>,
    ) -> Self {
        Self {
            extractor,
            pipeline: ClaimPipeline::new(backend, judge, config),
        }
    }

    pub fn pipeline(&self) -> &ClaimPipeline<B> {
        &self.pipeline
    }

    /// Run the full chain on `text`.
    ///
    /// Service failures never abort the run: a failed extraction yields a
    /// report with no claims and failed claims become placeholders.
    pub async fn run(&self, text: &str) -> Report {
        let run_started = Instant::now();
        let config = self.pipeline.config();

        let started = Instant::now();
        let claims = match self.extractor.extract(text).await {
            Ok(claims) => claims,
            Err(e) => {
                warn!(error = %e, "claim extraction failed; continuing with no claims");
                Vec::new()
            }
        };
        let extract_secs = elapsed_secs(started);
        info!(claims = claims.len(), secs = extract_secs, "claims extracted");

        let mut output = self.pipeline.process_claims(claims).await;
        output
            .timings
            .insert(EXTRACT_TIMING_KEY.to_string(), extract_secs);

        let elapsed_sec = round_to(run_started.elapsed().as_secs_f64(), 3);
        info!(elapsed_sec, claims = output.assessments.len(), "run complete");

        Report {
            meta: ReportMeta {
                model: config.llm.model.clone(),
                search_provider: self.pipeline.backend().provider().name().to_string(),
                max_results: config.search.max_results,
                elapsed_sec,
                hl: config.search.hl.clone(),
                gl: config.search.gl.clone(),
                locale: config.search.locale.clone(),
                generated_at: Utc::now(),
                timings: output.timings,
                parallel: ParallelInfo {
                    enabled: true,
                    max_workers: self.pipeline.max_workers(),
                },
            },
            claims: output.assessments,
        }
    }
}
