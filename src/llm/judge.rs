//! Evidence judgement through the Responses API.

use async_trait::async_trait;
use factchain_search::Evidence;

use super::EvidenceJudge;
use super::openai::ResponsesClient;
use super::prompts;
use crate::claims::Claim;
use crate::error::Result;
use crate::judgement::JudgementResult;

/// Judge backed by the Responses API.
///
/// Service failures degrade to [`JudgementResult::default`], so this judge
/// never fails a claim on its own.
pub struct OpenAiEvidenceJudge {
    client: ResponsesClient,
}

impl OpenAiEvidenceJudge {
    pub fn new(client: ResponsesClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EvidenceJudge for OpenAiEvidenceJudge {
    async fn judge(&self, claim: &Claim, evidence: &[Evidence]) -> Result<JudgementResult> {
        let output = self
            .client
            .complete_json(
                prompts::JUDGE_INSTRUCTIONS,
                &prompts::judgement_input(claim, evidence),
                "EvidenceEval",
                &prompts::judgement_schema(),
            )
            .await;

        match output {
            Ok(text) => Ok(JudgementResult::from_json_str(&text)),
            Err(e) => {
                tracing::warn!(claim = %claim.id, error = %e, "evidence judgement failed; using uncertain");
                Ok(JudgementResult::default())
            }
        }
    }
}
