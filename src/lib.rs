//! factchain: claim verification against web evidence.
//!
//! A run takes a passage of text through four steps:
//! claim extraction → evidence collection → evidence judgement → scoring
//!
//! # Architecture
//!
//! - **Claims**: a language model extracts short factual claims, each with
//!   a search query and a topic ([`llm::ClaimExtractor`])
//! - **Evidence**: per claim, [`factchain_search`] searches the topic's
//!   category buckets, canonicalises and deduplicates URLs, assigns trust
//!   tiers and merges for domain diversity
//! - **Judgement**: a language model labels each evidence item and gives an
//!   overall verdict ([`llm::EvidenceJudge`])
//! - **Scoring**: a deterministic heuristic turns tiers and judgement into
//!   a 0–100 credibility score ([`scoring`])
//!
//! Claims are processed concurrently by [`pipeline::ClaimPipeline`]; a
//! failing claim becomes a placeholder without affecting the others.
//!
//! # Example
//!
//! ```no_run
//! # async fn example() -> factchain::Result<()> {
//! use factchain::{FactChecker, FactchainConfig};
//!
//! let config = FactchainConfig::load(None)?;
//! let checker = FactChecker::from_config(config)?;
//! let report = checker.run("Bitcoin was first issued in 2009.").await;
//! for claim in &report.claims {
//!     println!("{} {}", claim.claim_id, claim.credibility_score);
//! }
//! # Ok(())
//! # }
//! ```

pub mod assessment;
pub mod claims;
pub mod config;
pub mod error;
pub mod judgement;
pub mod llm;
pub mod pipeline;
pub mod scoring;

pub use assessment::{AssessmentStatus, ClaimAssessment, TierCounts, TrustSummary};
pub use claims::Claim;
pub use config::{FactchainConfig, LlmConfig, PipelineConfig};
pub use error::{FactchainError, Result};
pub use judgement::{EvidenceJudgement, EvidenceLabel, JudgementResult, Verdict};
pub use pipeline::{ClaimPipeline, FactChecker, Report};
