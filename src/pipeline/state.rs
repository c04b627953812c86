//! Per-claim processing states.

use std::fmt;

/// Where a claim is in its collect, judge and score sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClaimState {
    Pending,
    CollectingEvidence,
    AwaitingJudgement,
    Scoring,
    Done,
    Failed,
}

impl ClaimState {
    /// The state after this one on the success path.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::CollectingEvidence),
            Self::CollectingEvidence => Some(Self::AwaitingJudgement),
            Self::AwaitingJudgement => Some(Self::Scoring),
            Self::Scoring => Some(Self::Done),
            Self::Done | Self::Failed => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::CollectingEvidence => "collecting_evidence",
            Self::AwaitingJudgement => "awaiting_judgement",
            Self::Scoring => "scoring",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ClaimState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tracks one claim through its states, logging each transition.
#[derive(Debug)]
pub struct ClaimProgress<'a> {
    claim_id: &'a str,
    state: ClaimState,
}

impl<'a> ClaimProgress<'a> {
    pub fn new(claim_id: &'a str) -> Self {
        Self {
            claim_id,
            state: ClaimState::Pending,
        }
    }

    pub fn state(&self) -> ClaimState {
        self.state
    }

    /// Move to the next state. Terminal states stay put.
    pub fn advance(&mut self) -> ClaimState {
        if let Some(next) = self.state.next() {
            tracing::trace!(claim = self.claim_id, from = %self.state, to = %next, "claim state");
            self.state = next;
        }
        self.state
    }

    /// Mark the claim failed unless it already finished.
    pub fn fail(&mut self) {
        if !self.state.is_terminal() {
            tracing::trace!(claim = self.claim_id, from = %self.state, "claim failed");
            self.state = ClaimState::Failed;
        }
    }
}
