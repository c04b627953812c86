//! Prompt text and output schemas for the language-model calls.

use factchain_search::{Evidence, Topic};
use serde_json::{Value, json};

use crate::claims::Claim;

/// Characters of snippet shown per evidence item.
pub const SNIPPET_CHARS: usize = 300;

pub const EXTRACT_INSTRUCTIONS: &str = "You are a fact-checking editor. From the input text, \
keep only statements of fact and restate each as one short claim. Leave out value judgements, \
opinions and speculation. For every claim give a keyword query suitable for a web search and \
pick one topic category.";

pub const JUDGE_INSTRUCTIONS: &str = "You are a fact-checking expert. Assess the claim using \
only the evidence summaries provided. For each evidence item decide whether it supports the \
claim, refutes it, or is irrelevant, then give an overall verdict. Use \"uncertain\" when the \
evidence does not settle the claim. Do not exaggerate or guess.";

const NO_EVIDENCE: &str = "(no evidence)";

/// Input for the extraction call.
pub fn extraction_input(text: &str) -> String {
    let topics: Vec<&str> = Topic::ALL.iter().map(|t| t.name()).collect();
    format!(
        "Topic categories: {}\nNumber claims C1, C2, ... in order of appearance.\n\n[Input]\n{}",
        topics.join(", "),
        text.trim()
    )
}

/// Input for the judgement call.
pub fn judgement_input(claim: &Claim, evidence: &[Evidence]) -> String {
    format!(
        "[Claim]\n{}\n\n[Evidence]\n{}",
        claim.claim,
        evidence_bullets(evidence)
    )
}

/// One bullet per evidence item, or a marker when there is none.
pub fn evidence_bullets(evidence: &[Evidence]) -> String {
    if evidence.is_empty() {
        return NO_EVIDENCE.to_string();
    }
    evidence
        .iter()
        .map(|ev| {
            let snippet: String = ev.snippet.chars().take(SNIPPET_CHARS).collect();
            format!(
                "- [{}] {} \u{2014} {} (URL: {})",
                ev.domain, ev.title, snippet, ev.url
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn claims_schema() -> Value {
    let topics: Vec<&str> = Topic::ALL.iter().map(|t| t.name()).collect();
    json!({
        "type": "object",
        "properties": {
            "claims": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "id": {"type": "string"},
                        "claim": {"type": "string"},
                        "normalized_query": {"type": "string"},
                        "category": {"type": "string", "enum": topics}
                    },
                    "required": ["id", "claim", "normalized_query", "category"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["claims"],
        "additionalProperties": false
    })
}

pub fn judgement_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "per_evidence": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "url": {"type": "string"},
                        "judgement": {"type": "string", "enum": ["supports", "refutes", "irrelevant"]},
                        "rationale": {"type": "string"}
                    },
                    "required": ["url", "judgement", "rationale"],
                    "additionalProperties": false
                }
            },
            "overall_verdict": {"type": "string", "enum": ["supported", "refuted", "uncertain"]},
            "confidence": {"type": "number"}
        },
        "required": ["per_evidence", "overall_verdict", "confidence"],
        "additionalProperties": false
    })
}
