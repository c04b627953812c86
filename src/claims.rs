//! Claims extracted from input text.

use std::collections::HashSet;

use factchain_search::Topic;
use serde::{Deserialize, Serialize};

/// A single factual statement to verify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// Identifier of the form `C<n>`.
    pub id: String,
    /// The claim, one sentence.
    pub claim: String,
    /// Keyword query used for evidence search.
    pub normalized_query: String,
    pub category: Topic,
}

impl Claim {
    pub fn new(id: impl Into<String>, claim: impl Into<String>, category: Topic) -> Self {
        let claim = claim.into();
        Self {
            id: id.into(),
            normalized_query: claim.clone(),
            claim,
            category,
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.normalized_query = query.into();
        self
    }

    /// Numeric suffix of a `C<n>` id.
    pub fn ordinal(&self) -> Option<u64> {
        claim_ordinal(&self.id)
    }
}

/// Parse the `n` out of `C<n>`; anything else is `None`.
pub fn claim_ordinal(id: &str) -> Option<u64> {
    let digits = id.strip_prefix('C')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// A claim as returned by the extraction service, before clean-up.
///
/// Every field is optional because the service output is untrusted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClaimDraft {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub claim: Option<String>,
    #[serde(default)]
    pub normalized_query: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Clean up drafts into claims.
///
/// Trims claim text and drops empty or repeated texts. A missing id
/// becomes `C<position>` (1-based among kept claims), a missing query
/// becomes the claim text, and an unknown category becomes general.
pub fn normalize_claims(drafts: Vec<ClaimDraft>) -> Vec<Claim> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out: Vec<Claim> = Vec::with_capacity(drafts.len());

    for draft in drafts {
        let text = draft.claim.as_deref().unwrap_or_default().trim().to_string();
        if text.is_empty() || !seen.insert(text.clone()) {
            continue;
        }
        let id = draft
            .id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| format!("C{}", out.len() + 1));
        let query = draft
            .normalized_query
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .unwrap_or_else(|| text.clone());
        let category = draft
            .category
            .as_deref()
            .map(Topic::from_label)
            .unwrap_or_default();

        out.push(Claim {
            id,
            claim: text,
            normalized_query: query,
            category,
        });
    }
    out
}
