//! Concurrent per-claim processing.
//!
//! Each claim runs collect, judge and score in its own task. Tasks share
//! the backend, the judge and the configuration read-only. A semaphore
//! bounds how many run at once and each one has a time budget. A task that
//! fails, times out or panics is replaced by a placeholder assessment, and
//! the results are put back into claim-id order whatever order the tasks
//! finished in.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use factchain_search::{EvidenceRequest, SearchBackend, collect_evidence};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use super::state::ClaimProgress;
use crate::assessment::ClaimAssessment;
use crate::claims::{Claim, claim_ordinal};
use crate::config::FactchainConfig;
use crate::error::{FactchainError, Result};
use crate::llm::EvidenceJudge;
use crate::scoring::{assess, round_to};

/// Phase durations in seconds, keyed `{claim_id}_{phase}`.
pub type Timings = BTreeMap<String, f64>;

/// Assessments in claim-id order plus the per-phase timings of every claim.
#[derive(Debug, Default)]
pub struct PipelineOutput {
    pub assessments: Vec<ClaimAssessment>,
    pub timings: Timings,
}

/// Runs claims through evidence collection, judgement and scoring.
pub struct ClaimPipeline<B> {
    backend: Arc<B>,
    judge: Arc<dyn EvidenceJudge>,
    config: Arc<FactchainConfig>,
}

impl<B> Clone for ClaimPipeline<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            judge: Arc::clone(&self.judge),
            config: Arc::clone(&self.config),
        }
    }
}

impl<B: SearchBackend + 'static> ClaimPipeline<B> {
    pub fn new(backend: Arc<B>, judge: Arc<dyn EvidenceJudge>, config: Arc<FactchainConfig>) -> Self {
        Self {
            backend,
            judge,
            config,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &FactchainConfig {
        &self.config
    }

    /// Concurrency limit for [`Self::process_claims`].
    pub fn max_workers(&self) -> usize {
        self.config.pipeline.max_workers()
    }

    /// Process every claim concurrently.
    ///
    /// Never fails as a whole: the output holds exactly one assessment per
    /// input claim.
    pub async fn process_claims(&self, claims: Vec<Claim>) -> PipelineOutput {
        if claims.is_empty() {
            return PipelineOutput::default();
        }

        let total = claims.len();
        let workers = self.max_workers();
        let budget = Duration::from_secs(self.config.pipeline.task_timeout_seconds);
        let semaphore = Arc::new(Semaphore::new(workers));
        info!(claims = total, workers, "processing claims");

        let mut tasks = JoinSet::new();
        let mut task_index = HashMap::with_capacity(total);
        for (index, claim) in claims.into_iter().enumerate() {
            let backend = Arc::clone(&self.backend);
            let judge = Arc::clone(&self.judge);
            let config = Arc::clone(&self.config);
            let semaphore = Arc::clone(&semaphore);

            let handle = tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let outcome = tokio::time::timeout(
                    budget,
                    process_claim(backend.as_ref(), judge.as_ref(), &config, &claim),
                )
                .await;
                let outcome = match outcome {
                    Ok(result) => result,
                    Err(_) => Err(FactchainError::Pipeline(format!(
                        "timed out after {}s",
                        budget.as_secs()
                    ))),
                };
                (claim.id, outcome)
            });
            task_index.insert(handle.id(), index);
        }

        let mut slots: Vec<Option<(ClaimAssessment, Timings)>> = vec![None; total];
        while let Some(joined) = tasks.join_next_with_id().await {
            match joined {
                Ok((id, (claim_id, Ok(done)))) => {
                    if let Some(&index) = task_index.get(&id) {
                        slots[index] = Some(done);
                    }
                    debug!(claim = %claim_id, "claim finished");
                }
                Ok((_, (claim_id, Err(e)))) => {
                    warn!(claim = %claim_id, error = %e, "claim processing failed");
                }
                Err(e) => {
                    error!(error = %e, "claim task panicked");
                }
            }
        }

        let base = unix_millis();
        let mut results: Vec<(usize, ClaimAssessment, Timings)> = slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| match slot {
                Some((assessment, timings)) => (index, assessment, timings),
                None => {
                    let placeholder_id = format!("CX_{}", base + index as u128);
                    let timings = Timings::from([(format!("{placeholder_id}_error"), 0.0)]);
                    (index, ClaimAssessment::placeholder(placeholder_id), timings)
                }
            })
            .collect();

        results.sort_by_key(|(index, assessment, _)| {
            let ordinal = claim_ordinal(&assessment.claim_id);
            (ordinal.is_none(), ordinal.unwrap_or(0), *index)
        });

        let failed = results.iter().filter(|(_, a, _)| a.is_failed()).count();
        info!(claims = total, failed, "claims processed");

        let mut output = PipelineOutput::default();
        for (_, assessment, timings) in results {
            output.timings.extend(timings);
            output.assessments.push(assessment);
        }
        output
    }
}

/// Collect, judge and score one claim.
async fn process_claim<B: SearchBackend>(
    backend: &B,
    judge: &dyn EvidenceJudge,
    config: &FactchainConfig,
    claim: &Claim,
) -> Result<(ClaimAssessment, Timings)> {
    let mut progress = ClaimProgress::new(&claim.id);
    let mut timings = Timings::new();

    progress.advance();
    let started = Instant::now();
    let categories = if config.pipeline.topic_presets {
        claim.category.search_preset()
    } else {
        &[]
    };
    let request = EvidenceRequest::new(&claim.normalized_query, claim.category, &config.search)
        .with_categories(categories)
        .with_time_window(config.pipeline.time_window);
    let evidence = collect_evidence(backend, &request, &config.search).await;
    timings.insert(format!("{}_collect", claim.id), elapsed_secs(started));

    progress.advance();
    let started = Instant::now();
    let judgement = match judge.judge(claim, &evidence).await {
        Ok(judgement) => judgement,
        Err(e) => {
            progress.fail();
            return Err(e);
        }
    };
    timings.insert(format!("{}_judge", claim.id), elapsed_secs(started));

    progress.advance();
    let started = Instant::now();
    let assessment = assess(claim, evidence, &judgement);
    timings.insert(format!("{}_score", claim.id), elapsed_secs(started));
    progress.advance();

    debug!(
        claim = %claim.id,
        evidence = assessment.evidence.len(),
        verdict = %assessment.model_verdict,
        score = assessment.credibility_score,
        "claim scored"
    );
    Ok((assessment, timings))
}

/// Seconds since `started`, rounded to milliseconds.
pub(crate) fn elapsed_secs(started: Instant) -> f64 {
    round_to(started.elapsed().as_secs_f64(), 3)
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::judgement::{JudgementResult, Verdict};
    use async_trait::async_trait;
    use factchain_search::{
        Evidence, PageRequest, SearchConfig, SearchError, SearchProvider, SearchRow, Topic,
    };

    struct EmptyBackend;

    impl SearchBackend for EmptyBackend {
        fn provider(&self) -> SearchProvider {
            SearchProvider::GoogleCse
        }

        async fn fetch_page(&self, _request: &PageRequest<'_>) -> std::result::Result<Vec<SearchRow>, SearchError> {
            Ok(Vec::new())
        }
    }

    /// Judges by claim id: `C2` errors, `C3` sleeps past the budget.
    struct ScriptedJudge;

    #[async_trait]
    impl EvidenceJudge for ScriptedJudge {
        async fn judge(&self, claim: &Claim, _evidence: &[Evidence]) -> Result<JudgementResult> {
            match claim.id.as_str() {
                "C2" => Err(FactchainError::Llm("judge unavailable".into())),
                "C3" => {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    Ok(JudgementResult::default())
                }
                _ => Ok(JudgementResult::new(vec![], Verdict::Supported, 1.0)),
            }
        }
    }

    fn pipeline(timeout_seconds: u64) -> ClaimPipeline<EmptyBackend> {
        let mut config = FactchainConfig {
            search: SearchConfig::default(),
            ..Default::default()
        };
        config.pipeline.task_timeout_seconds = timeout_seconds;
        ClaimPipeline::new(Arc::new(EmptyBackend), Arc::new(ScriptedJudge), Arc::new(config))
    }

    #[tokio::test]
    async fn empty_input_gives_empty_output() {
        let output = pipeline(1).process_claims(Vec::new()).await;
        assert!(output.assessments.is_empty());
        assert!(output.timings.is_empty());
    }

    #[tokio::test]
    async fn judge_failure_becomes_placeholder() {
        let claims = vec![
            Claim::new("C1", "one", Topic::General),
            Claim::new("C2", "two", Topic::General),
        ];
        let output = pipeline(5).process_claims(claims).await;

        assert_eq!(output.assessments.len(), 2);
        assert_eq!(output.assessments[0].claim_id, "C1");
        assert_eq!(output.assessments[0].credibility_score, 50.0);
        let failed = &output.assessments[1];
        assert!(failed.is_failed());
        assert!(failed.claim_id.starts_with("CX_"));
        assert!(output.timings.contains_key("C1_collect"));
        assert!(output.timings.contains_key("C1_judge"));
        assert!(output.timings.contains_key("C1_score"));
        assert!(output.timings.contains_key(&format!("{}_error", failed.claim_id)));
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_becomes_placeholder() {
        let claims = vec![
            Claim::new("C3", "slow", Topic::General),
            Claim::new("C4", "fast", Topic::General),
        ];
        let output = pipeline(1).process_claims(claims).await;

        assert_eq!(output.assessments[0].claim_id, "C4");
        assert!(!output.assessments[0].is_failed());
        assert!(output.assessments[1].is_failed());
    }

    #[tokio::test]
    async fn placeholders_get_distinct_ids() {
        let claims = vec![
            Claim::new("C2", "a", Topic::General),
            Claim::new("C2", "b", Topic::General),
        ];
        let output = pipeline(5).process_claims(claims).await;
        assert_ne!(output.assessments[0].claim_id, output.assessments[1].claim_id);
    }

    #[tokio::test]
    async fn non_numeric_ids_sort_last_in_input_order() {
        let claims = vec![
            Claim::new("intro", "x", Topic::General),
            Claim::new("C10", "y", Topic::General),
            Claim::new("C9", "z", Topic::General),
            Claim::new("outro", "w", Topic::General),
        ];
        let output = pipeline(5).process_claims(claims).await;
        let ids: Vec<&str> = output.assessments.iter().map(|a| a.claim_id.as_str()).collect();
        assert_eq!(ids, ["C9", "C10", "intro", "outro"]);
    }
}
