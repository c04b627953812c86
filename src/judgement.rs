//! Evidence judgements returned by the judgement service.
//!
//! The service output is untrusted. Parsing never fails: unknown labels
//! fall back to [`EvidenceLabel::Irrelevant`] and [`Verdict::Uncertain`],
//! confidence is clamped to `[0, 1]` with NaN mapped to 0, and anything
//! that is not an object yields [`JudgementResult::default`].

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How one evidence item relates to the claim.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum EvidenceLabel {
    Supports,
    Refutes,
    #[default]
    Irrelevant,
}

impl EvidenceLabel {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "supports" => Self::Supports,
            "refutes" => Self::Refutes,
            _ => Self::Irrelevant,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Supports => "supports",
            Self::Refutes => "refutes",
            Self::Irrelevant => "irrelevant",
        }
    }
}

impl From<String> for EvidenceLabel {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

/// Overall verdict on a claim.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Verdict {
    Supported,
    Refuted,
    #[default]
    Uncertain,
}

impl Verdict {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "supported" => Self::Supported,
            "refuted" => Self::Refuted,
            _ => Self::Uncertain,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Supported => "supported",
            Self::Refuted => "refuted",
            Self::Uncertain => "uncertain",
        }
    }
}

impl From<String> for Verdict {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Judgement of a single evidence item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceJudgement {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub judgement: EvidenceLabel,
    #[serde(default)]
    pub rationale: String,
}

/// Judgement of a claim against its evidence.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JudgementResult {
    pub per_evidence: Vec<EvidenceJudgement>,
    pub overall_verdict: Verdict,
    /// Always within `[0, 1]`.
    pub confidence: f64,
}

impl JudgementResult {
    pub fn new(per_evidence: Vec<EvidenceJudgement>, verdict: Verdict, confidence: f64) -> Self {
        Self {
            per_evidence,
            overall_verdict: verdict,
            confidence: clamp_confidence(confidence),
        }
    }

    /// Parse service output text. Unparseable text gives the default.
    pub fn from_json_str(text: &str) -> Self {
        match serde_json::from_str::<Value>(text) {
            Ok(value) => Self::from_value(&value),
            Err(e) => {
                tracing::debug!(error = %e, "judgement output is not JSON");
                Self::default()
            }
        }
    }

    /// Build from a JSON value, tolerating missing and mistyped fields.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };

        let per_evidence = obj
            .get("per_evidence")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(parse_item).collect())
            .unwrap_or_default();
        let verdict = obj
            .get("overall_verdict")
            .and_then(Value::as_str)
            .map(Verdict::from_label)
            .unwrap_or_default();
        let confidence = obj.get("confidence").map(number_of).unwrap_or(0.0);

        Self::new(per_evidence, verdict, confidence)
    }

    /// `(supports, refutes)` counted over the per-evidence labels.
    pub fn label_counts(&self) -> (usize, usize) {
        self.per_evidence
            .iter()
            .fold((0, 0), |(s, r), item| match item.judgement {
                EvidenceLabel::Supports => (s + 1, r),
                EvidenceLabel::Refutes => (s, r + 1),
                EvidenceLabel::Irrelevant => (s, r),
            })
    }
}

impl<'de> Deserialize<'de> for JudgementResult {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

fn parse_item(item: &Value) -> Option<EvidenceJudgement> {
    let obj = item.as_object()?;
    let text = |key: &str| {
        obj.get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .trim()
            .to_string()
    };
    Some(EvidenceJudgement {
        url: text("url"),
        judgement: EvidenceLabel::from_label(&text("judgement")),
        rationale: text("rationale"),
    })
}

fn number_of(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Clamp to `[0, 1]`; NaN becomes 0.
pub fn clamp_confidence(confidence: f64) -> f64 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    }
}
