//! Run report: JSON document and console summary.

use std::fmt::Write as _;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::orchestrator::Timings;
use crate::assessment::ClaimAssessment;
use crate::error::Result;
use crate::judgement::Verdict;

/// Timing key of the claim extraction phase.
pub const EXTRACT_TIMING_KEY: &str = "extract_claims";

/// Evidence lines shown per claim in the console summary.
const SUMMARY_EVIDENCE_LINES: usize = 3;
const SUMMARY_TITLE_CHARS: usize = 70;
const RULE: &str = "-------------------------------";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub meta: ReportMeta,
    pub claims: Vec<ClaimAssessment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMeta {
    pub model: String,
    pub search_provider: String,
    pub max_results: usize,
    /// Wall time of the whole run in seconds.
    pub elapsed_sec: f64,
    pub hl: String,
    pub gl: String,
    pub locale: String,
    pub generated_at: DateTime<Utc>,
    pub timings: Timings,
    pub parallel: ParallelInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParallelInfo {
    pub enabled: bool,
    pub max_workers: usize,
}

impl Report {
    /// Write the report as pretty-printed JSON, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Read a report written by [`Self::write_json`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn read_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Plain-text summary for the terminal.
    pub fn render_summary(&self) -> String {
        let meta = &self.meta;
        let timings = &meta.timings;
        let mut out = String::new();

        let _ = writeln!(out, "\n[Verification results]");
        let _ = writeln!(out, "{RULE}");
        let _ = writeln!(out, "Model: {} | Search: {}", meta.model, meta.search_provider);
        let _ = writeln!(
            out,
            "Elapsed: {:.2}s | Claims: {}\n",
            meta.elapsed_sec,
            self.claims.len()
        );
        let _ = writeln!(out, "Phase times:");
        let _ = writeln!(
            out,
            "  extract claims : {:.2}s",
            timings.get(EXTRACT_TIMING_KEY).copied().unwrap_or_default()
        );
        let _ = writeln!(out, "  collect        : {:.2}s", phase_time(timings, "_collect"));
        let _ = writeln!(out, "  judge          : {:.2}s", phase_time(timings, "_judge"));
        let _ = writeln!(out, "  score          : {:.2}s\n", phase_time(timings, "_score"));

        for claim in &self.claims {
            let counts = claim.source_trust_summary.tier_counts;
            let _ = writeln!(out, "* [{}] {}", claim.claim_id, claim.claim_text);
            let _ = writeln!(
                out,
                "   verdict: {} ({}% confident)",
                verdict_label(claim.model_verdict),
                (claim.model_confidence * 100.0).round() as u32
            );
            let _ = writeln!(out, "   credibility: {}", claim.credibility_score);
            let _ = writeln!(
                out,
                "   sources: tier3={} tier2={} tier1={}",
                counts.authoritative, counts.established, counts.unclassified
            );
            for ev in claim.evidence.iter().take(SUMMARY_EVIDENCE_LINES) {
                let title: String = ev.title.chars().take(SUMMARY_TITLE_CHARS).collect();
                let _ = writeln!(out, "      - {}: {}...", ev.domain, title);
            }
            let _ = writeln!(out, "{RULE}");
        }
        out
    }
}

/// Longest recorded duration among timing keys ending in `suffix`.
///
/// Claims run concurrently, so the slowest claim bounds the phase.
pub fn phase_time(timings: &Timings, suffix: &str) -> f64 {
    timings
        .iter()
        .filter(|(key, _)| key.ends_with(suffix))
        .map(|(_, secs)| *secs)
        .fold(0.0, f64::max)
}

fn verdict_label(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Supported => "likely true",
        Verdict::Refuted => "likely false",
        Verdict::Uncertain => "uncertain",
    }
}
