//! Language-model services consumed by the pipeline.
//!
//! Claim extraction and evidence judgement sit behind the
//! [`ClaimExtractor`] and [`EvidenceJudge`] traits so that the pipeline can
//! be driven by the OpenAI implementations in production and by scripted
//! doubles in tests.

pub mod extractor;
pub mod judge;
pub mod openai;
pub mod prompts;

pub use extractor::OpenAiClaimExtractor;
pub use judge::OpenAiEvidenceJudge;
pub use openai::ResponsesClient;

use async_trait::async_trait;
use factchain_search::Evidence;

use crate::claims::Claim;
use crate::error::Result;
use crate::judgement::JudgementResult;

/// Extracts verifiable claims from free text.
#[async_trait]
pub trait ClaimExtractor: Send + Sync {
    /// Return the claims found in `text`.
    ///
    /// Malformed service output should yield an empty list rather than an
    /// error. An `Err` means the service could not be reached at all.
    async fn extract(&self, text: &str) -> Result<Vec<Claim>>;
}

/// Judges a claim against its collected evidence.
#[async_trait]
pub trait EvidenceJudge: Send + Sync {
    /// Judge `claim` against `evidence`.
    ///
    /// An `Err` marks the claim as failed in the pipeline.
    async fn judge(&self, claim: &Claim, evidence: &[Evidence]) -> Result<JudgementResult>;
}
