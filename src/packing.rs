//! Budget packing with priority tiers and dependency consistency

use crate::types::*;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Decide which resolved documents ship under `budget`.
///
/// Tier 0 always ships, even past the budget. When the floor uses up the
/// whole budget no tier >= 1 entry ships. Otherwise they are admitted
/// greedily by (tier, resolved order) against what the floor leaves over; the
/// first entry that does not fit closes the pass. Afterwards any admitted
/// entry whose prerequisite was cut is dropped too, repeated to a fixpoint.
/// The closing position is never reopened, so a smaller budget can only
/// ever ship a subset of what a larger one ships.
pub fn pack(resolved: &ResolvedSet, budget: usize) -> PackedSet {
    let entries = &resolved.entries;

    let floor: usize = entries
        .iter()
        .filter(|e| e.priority_tier == 0)
        .map(|e| e.size_estimate)
        .sum();
    if floor > budget {
        warn!("Tier-0 floor of {} exceeds budget {}; shipping core documents anyway", floor, budget);
    }
    let available = budget.saturating_sub(floor);

    let mut order: Vec<usize> = (0..entries.len())
        .filter(|&i| entries[i].priority_tier > 0)
        .collect();
    // Stable: ties keep resolved order
    order.sort_by_key(|&i| entries[i].priority_tier);

    let mut status: Vec<PackStatus> = entries
        .iter()
        .map(|e| {
            if e.priority_tier == 0 {
                PackStatus::Included
            } else {
                PackStatus::Truncated { cause: TruncationReason::OverBudget }
            }
        })
        .collect();

    // At or past the floor nothing else ships, zero-sized documents included
    if floor >= budget {
        order.clear();
    }

    let mut used = 0usize;
    for &i in &order {
        let size = entries[i].size_estimate;
        if used.saturating_add(size) > available {
            debug!("Budget closes at '{}' ({} + {} > {})", entries[i].id, used, size, available);
            break;
        }
        used += size;
        status[i] = PackStatus::Included;
    }

    // Closure validation: never ship a document without its prerequisites
    loop {
        let included: HashSet<&str> = entries
            .iter()
            .zip(&status)
            .filter(|(_, s)| s.is_included())
            .map(|(e, _)| e.id.as_str())
            .collect();

        let mut cut = Vec::new();
        for (i, entry) in entries.iter().enumerate() {
            if !status[i].is_included() {
                continue;
            }
            let missing = entry
                .requires
                .iter()
                .find(|req| resolved.contains(req) && !included.contains(req.as_str()));
            if let Some(missing) = missing {
                cut.push((i, missing.clone()));
            }
        }

        if cut.is_empty() {
            break;
        }
        for (i, missing) in cut {
            debug!("Dropping '{}': prerequisite '{}' was cut", entries[i].id, missing);
            status[i] = PackStatus::Truncated {
                cause: TruncationReason::DependencyCut(missing),
            };
        }
    }

    let entries = entries
        .iter()
        .zip(status)
        .map(|(e, status)| PackedEntry {
            id: e.id.clone(),
            category: e.category,
            priority_tier: e.priority_tier,
            size_estimate: e.size_estimate,
            status,
        })
        .collect();

    PackedSet {
        entries,
        budget,
        complexity_hint: resolved.complexity_hint,
    }
}
