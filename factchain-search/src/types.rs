//! Core types for search rows, evidence, trust tiers and topic categories.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw row returned by a search provider, before normalisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRow {
    /// Title of the result page.
    pub title: String,
    /// URL as returned by the provider.
    pub url: String,
    /// Text snippet summarising the page.
    pub snippet: String,
}

impl SearchRow {
    /// Build a row from its three fields.
    pub fn new(title: impl Into<String>, url: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
        }
    }
}

/// A deduplicated, classified web source attached to a claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    pub title: String,
    /// Canonical URL (see [`crate::collect::url_normalize::normalize_url`]).
    pub url: String,
    pub snippet: String,
    /// Lowercased host of `url`.
    pub domain: String,
    pub trust_tier: TrustTier,
}

impl Evidence {
    /// Ranking key shared by every ordering in the crate:
    /// tier, then snippet length, then title length (all descending when
    /// compared in reverse).
    pub fn rank_key(&self) -> (TrustTier, usize, usize) {
        (
            self.trust_tier,
            self.snippet.chars().count(),
            self.title.chars().count(),
        )
    }
}

/// Institutional authority of a source domain.
///
/// Serialises as the integers 1, 2 and 3.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(into = "u8", try_from = "u8")]
pub enum TrustTier {
    /// Anything not otherwise classified.
    #[default]
    Unclassified = 1,
    /// Major press and large technology vendors.
    Established = 2,
    /// Government, standards bodies, international organisations, academia.
    Authoritative = 3,
}

impl TrustTier {
    /// All tiers, highest first. This is the order the diversity merge walks.
    pub const DESCENDING: [TrustTier; 3] = [
        TrustTier::Authoritative,
        TrustTier::Established,
        TrustTier::Unclassified,
    ];

    /// Numeric tier value (1–3).
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl From<TrustTier> for u8 {
    fn from(tier: TrustTier) -> Self {
        tier.as_u8()
    }
}

impl TryFrom<u8> for TrustTier {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Unclassified),
            2 => Ok(Self::Established),
            3 => Ok(Self::Authoritative),
            other => Err(format!("trust tier must be 1, 2 or 3, got {other}")),
        }
    }
}

impl fmt::Display for TrustTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// Search-query restriction profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchCategory {
    Scholarly,
    Government,
    News,
    Blogs,
    Community,
    General,
}

impl SearchCategory {
    /// Lowercase label used in logs and configuration.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Scholarly => "scholarly",
            Self::Government => "government",
            Self::News => "news",
            Self::Blogs => "blogs",
            Self::Community => "community",
            Self::General => "general",
        }
    }
}

impl fmt::Display for SearchCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Topic assigned to a claim by the extraction service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Tech,
    Science,
    Policy,
    Health,
    Finance,
    Community,
    #[default]
    General,
}

impl Topic {
    /// Every topic, in the order offered to the extraction service.
    pub const ALL: [Topic; 7] = [
        Topic::Tech,
        Topic::Science,
        Topic::Policy,
        Topic::Health,
        Topic::Finance,
        Topic::Community,
        Topic::General,
    ];

    /// Lowercase label.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Tech => "tech",
            Self::Science => "science",
            Self::Policy => "policy",
            Self::Health => "health",
            Self::Finance => "finance",
            Self::Community => "community",
            Self::General => "general",
        }
    }

    /// Parse a label leniently; anything unknown is [`Topic::General`].
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(label))
            .unwrap_or_default()
    }

    /// Category buckets searched for claims of this topic.
    pub fn search_preset(&self) -> &'static [SearchCategory] {
        use SearchCategory::*;
        match self {
            Self::Tech => &[Scholarly, Government, News, General],
            Self::Science => &[Scholarly, Government, News],
            Self::Policy => &[Government, News, General, Community],
            Self::Health => &[Government, Scholarly, News],
            Self::Finance => &[News, General, Government],
            Self::Community => &[Community, News, General],
            Self::General => &[News, General, Government],
        }
    }

    /// Topics whose evidence should lean on academic sources.
    pub fn scholarly_emphasis(&self) -> bool {
        matches!(self, Self::Science | Self::Health | Self::Tech)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Recency restriction for a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    Day,
    Week,
    Month,
    Year,
}

impl TimeWindow {
    /// Parse the single-letter codes `d`, `w`, `m`, `y`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "d" => Some(Self::Day),
            "w" => Some(Self::Week),
            "m" => Some(Self::Month),
            "y" => Some(Self::Year),
            _ => None,
        }
    }

    /// Single-letter code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Day => "d",
            Self::Week => "w",
            Self::Month => "m",
            Self::Year => "y",
        }
    }
}

/// Search backends factchain can query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchProvider {
    /// Google Programmable Search (Custom Search JSON API).
    #[default]
    GoogleCse,
    /// SerpAPI proxy for Google results.
    #[serde(rename = "serpapi")]
    SerpApi,
}

impl SearchProvider {
    /// Human-readable provider name, as written into reports.
    pub fn name(&self) -> &'static str {
        match self {
            Self::GoogleCse => "Google Custom Search API",
            Self::SerpApi => "SerpAPI",
        }
    }

    /// Parse a configuration label (`google_cse`, `cse`, `serpapi`).
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "google_cse" | "cse" | "google" => Some(Self::GoogleCse),
            "serpapi" | "serp_api" | "serp" => Some(Self::SerpApi),
            _ => None,
        }
    }
}

impl fmt::Display for SearchProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
