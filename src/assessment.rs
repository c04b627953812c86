//! Per-claim results as written into the report.

use factchain_search::{Evidence, TrustTier};
use serde::{Deserialize, Serialize};

use crate::judgement::Verdict;

/// Claim text recorded for a claim whose processing failed.
pub const FAILED_CLAIM_TEXT: &str = "<processing_failed>";

/// Whether a claim made it through collection, judgement and scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssessmentStatus {
    #[default]
    Done,
    Failed,
}

/// Number of evidence items per trust tier.
///
/// Serialises with the string keys `"1"`, `"2"` and `"3"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCounts {
    #[serde(rename = "1")]
    pub unclassified: usize,
    #[serde(rename = "2")]
    pub established: usize,
    #[serde(rename = "3")]
    pub authoritative: usize,
}

impl TierCounts {
    pub fn from_evidence(evidence: &[Evidence]) -> Self {
        let mut counts = Self::default();
        for ev in evidence {
            match ev.trust_tier {
                TrustTier::Unclassified => counts.unclassified += 1,
                TrustTier::Established => counts.established += 1,
                TrustTier::Authoritative => counts.authoritative += 1,
            }
        }
        counts
    }

    pub fn get(&self, tier: TrustTier) -> usize {
        match tier {
            TrustTier::Unclassified => self.unclassified,
            TrustTier::Established => self.established,
            TrustTier::Authoritative => self.authoritative,
        }
    }

    pub fn total(&self) -> usize {
        self.unclassified + self.established + self.authoritative
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustSummary {
    pub tier_counts: TierCounts,
}

/// The scored outcome for one claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimAssessment {
    pub claim_id: String,
    pub claim_text: String,
    pub normalized_query: String,
    pub evidence: Vec<Evidence>,
    pub exists_evidence: bool,
    pub source_trust_summary: TrustSummary,
    pub model_verdict: Verdict,
    /// Clamped to `[0, 1]`, rounded to 3 decimals.
    pub model_confidence: f64,
    /// In `[0, 100]`, rounded to 1 decimal.
    pub credibility_score: f64,
    #[serde(default)]
    pub status: AssessmentStatus,
}

impl ClaimAssessment {
    /// Stand-in for a claim whose task failed, timed out or panicked.
    pub fn placeholder(claim_id: impl Into<String>) -> Self {
        Self {
            claim_id: claim_id.into(),
            claim_text: FAILED_CLAIM_TEXT.into(),
            normalized_query: String::new(),
            evidence: Vec::new(),
            exists_evidence: false,
            source_trust_summary: TrustSummary::default(),
            model_verdict: Verdict::Uncertain,
            model_confidence: 0.0,
            credibility_score: 0.0,
            status: AssessmentStatus::Failed,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.status == AssessmentStatus::Failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evidence(tier: TrustTier) -> Evidence {
        Evidence {
            title: "t".into(),
            url: format!("https://example.com/{}", tier.as_u8()),
            snippet: "s".into(),
            domain: "example.com".into(),
            trust_tier: tier,
        }
    }

    #[test]
    fn tier_counts_sum_to_evidence_length() {
        let list = vec![
            evidence(TrustTier::Authoritative),
            evidence(TrustTier::Unclassified),
            evidence(TrustTier::Authoritative),
        ];
        let counts = TierCounts::from_evidence(&list);
        assert_eq!(counts.get(TrustTier::Authoritative), 2);
        assert_eq!(counts.get(TrustTier::Established), 0);
        assert_eq!(counts.total(), list.len());
    }

    #[test]
    fn tier_counts_serialise_with_string_keys() {
        let counts = TierCounts {
            unclassified: 1,
            established: 0,
            authoritative: 2,
        };
        let json = serde_json::to_value(counts).expect("serialize");
        assert_eq!(json, serde_json::json!({"1": 1, "2": 0, "3": 2}));
    }

    #[test]
    fn placeholder_is_failed_and_zeroed() {
        let p = ClaimAssessment::placeholder("CX_17");
        assert!(p.is_failed());
        assert_eq!(p.claim_text, FAILED_CLAIM_TEXT);
        assert!(p.evidence.is_empty());
        assert_eq!(p.model_verdict, Verdict::Uncertain);
        assert_eq!(p.credibility_score, 0.0);
        assert_eq!(p.source_trust_summary.tier_counts.total(), 0);

        let json = serde_json::to_value(&p).expect("serialize");
        assert_eq!(json["status"], "failed");
        assert_eq!(json["source_trust_summary"]["tier_counts"]["3"], 0);
    }
}
