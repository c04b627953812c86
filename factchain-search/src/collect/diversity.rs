//! Domain-diverse merge of classified evidence.
//!
//! Evidence is grouped by domain and drained tier by tier in round-robin
//! passes, so that a single prolific site cannot crowd out other sources of
//! the same authority. Leftover slots are filled from whatever remains,
//! best-ranked first.

use std::collections::VecDeque;

use crate::types::{Evidence, TrustTier};

/// Default number of round-robin passes per tier.
pub const DEFAULT_PASSES: usize = 2;

/// Per-domain queues, one per tier, each sorted best-first.
struct DomainGroup {
    domain: String,
    tiers: [VecDeque<Evidence>; 3],
}

impl DomainGroup {
    fn new(domain: String) -> Self {
        Self {
            domain,
            tiers: Default::default(),
        }
    }

    fn queue(&mut self, tier: TrustTier) -> &mut VecDeque<Evidence> {
        &mut self.tiers[tier_slot(tier)]
    }

    /// Move remaining items into `out`, best tier first.
    fn drain_into(&mut self, out: &mut Vec<Evidence>) {
        for tier in TrustTier::DESCENDING {
            out.extend(self.queue(tier).drain(..));
        }
    }
}

fn tier_slot(tier: TrustTier) -> usize {
    usize::from(tier.as_u8()).saturating_sub(1).min(2)
}

/// Sort best-first by `(tier, snippet chars, title chars)`. Stable.
pub fn sort_by_rank(items: &mut [Evidence]) {
    items.sort_by(|a, b| b.rank_key().cmp(&a.rank_key()));
}

/// Select up to `k` items favouring authority first and domain diversity
/// second.
///
/// For each tier from 3 down to 1, `passes` round-robin passes take at most
/// one item of that tier from every domain, visiting domains in the order
/// they first appeared. Remaining slots are filled from the leftovers sorted
/// by rank.
pub fn diversity_merge(evidence: Vec<Evidence>, k: usize, passes: usize) -> Vec<Evidence> {
    if evidence.is_empty() || k == 0 {
        return Vec::new();
    }

    let mut groups: Vec<DomainGroup> = Vec::new();
    for item in evidence {
        let idx = match groups.iter().position(|g| g.domain == item.domain) {
            Some(idx) => idx,
            None => {
                groups.push(DomainGroup::new(item.domain.clone()));
                groups.len() - 1
            }
        };
        let tier = item.trust_tier;
        groups[idx].queue(tier).push_back(item);
    }
    for group in &mut groups {
        for queue in &mut group.tiers {
            sort_by_rank(queue.make_contiguous());
        }
    }

    let mut merged = Vec::with_capacity(k);
    for tier in TrustTier::DESCENDING {
        for _ in 0..passes {
            if merged.len() >= k {
                break;
            }
            for group in &mut groups {
                if merged.len() >= k {
                    break;
                }
                if let Some(item) = group.queue(tier).pop_front() {
                    merged.push(item);
                }
            }
        }
    }

    if merged.len() < k {
        let mut rest = Vec::new();
        for group in &mut groups {
            group.drain_into(&mut rest);
        }
        sort_by_rank(&mut rest);
        let room = k - merged.len();
        merged.extend(rest.into_iter().take(room));
    }

    tracing::trace!(domains = groups.len(), selected = merged.len(), "diversity merge");
    merged
}
