//! Credibility scoring.
//!
//! A deterministic heuristic over evidence tiers and the judgement:
//!
//! | term                                   | points            |
//! |----------------------------------------|-------------------|
//! | any evidence                           | +10               |
//! | per tier-3 / tier-2 / tier-1 item      | +10 / +5 / +1     |
//! | `max(0, supports - refutes)`           | ×3                |
//! | verdict supported / refuted            | +10 / −15         |
//! | confidence                             | ×40               |
//!
//! The sum is clamped to `[0, 100]`.

use factchain_search::Evidence;

use crate::assessment::{AssessmentStatus, ClaimAssessment, TierCounts, TrustSummary};
use crate::claims::Claim;
use crate::judgement::{JudgementResult, Verdict, clamp_confidence};

/// Score a claim's evidence and judgement. Unrounded.
pub fn credibility_score(evidence: &[Evidence], judgement: &JudgementResult) -> f64 {
    let tiers = TierCounts::from_evidence(evidence);
    let (supports, refutes) = judgement.label_counts();

    let mut score = 0.0;
    if !evidence.is_empty() {
        score += 10.0;
    }
    score += (tiers.authoritative * 10 + tiers.established * 5 + tiers.unclassified) as f64;
    score += supports.saturating_sub(refutes) as f64 * 3.0;
    score += match judgement.overall_verdict {
        Verdict::Supported => 10.0,
        Verdict::Refuted => -15.0,
        Verdict::Uncertain => 0.0,
    };
    score += clamp_confidence(judgement.confidence) * 40.0;
    score.clamp(0.0, 100.0)
}

/// Build the assessment for a claim.
pub fn assess(claim: &Claim, evidence: Vec<Evidence>, judgement: &JudgementResult) -> ClaimAssessment {
    let score = credibility_score(&evidence, judgement);
    ClaimAssessment {
        claim_id: claim.id.clone(),
        claim_text: claim.claim.clone(),
        normalized_query: claim.normalized_query.clone(),
        exists_evidence: !evidence.is_empty(),
        source_trust_summary: TrustSummary {
            tier_counts: TierCounts::from_evidence(&evidence),
        },
        evidence,
        model_verdict: judgement.overall_verdict,
        model_confidence: round_to(clamp_confidence(judgement.confidence), 3),
        credibility_score: round_to(score, 1),
        status: AssessmentStatus::Done,
    }
}

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
