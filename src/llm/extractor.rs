//! Claim extraction through the Responses API.

use async_trait::async_trait;
use serde::Deserialize;

use super::ClaimExtractor;
use super::openai::ResponsesClient;
use super::prompts;
use crate::claims::{Claim, ClaimDraft, normalize_claims};
use crate::error::Result;

pub struct OpenAiClaimExtractor {
    client: ResponsesClient,
}

impl OpenAiClaimExtractor {
    pub fn new(client: ResponsesClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ClaimsEnvelope {
    #[serde(default)]
    claims: Vec<ClaimDraft>,
}

/// Parse extraction output into claims; malformed output is no claims.
pub fn parse_claims(text: &str) -> Vec<Claim> {
    match serde_json::from_str::<ClaimsEnvelope>(text) {
        Ok(envelope) => normalize_claims(envelope.claims),
        Err(e) => {
            tracing::warn!(error = %e, "claim extraction output is malformed; no claims");
            Vec::new()
        }
    }
}

#[async_trait]
impl ClaimExtractor for OpenAiClaimExtractor {
    async fn extract(&self, text: &str) -> Result<Vec<Claim>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let output = self
            .client
            .complete_json(
                prompts::EXTRACT_INSTRUCTIONS,
                &prompts::extraction_input(text),
                "ClaimList",
                &prompts::claims_schema(),
            )
            .await?;
        let claims = parse_claims(&output);
        tracing::debug!(count = claims.len(), model = self.client.model(), "claims extracted");
        Ok(claims)
    }
}
