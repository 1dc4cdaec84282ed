//! Module resolution: TaskPlan -> ordered, dependency-closed ResolvedSet

use crate::error::{ConflictingDocument, ResolutionError};
use crate::registry::DocumentRegistry;
use crate::types::*;
use std::collections::HashSet;
use tracing::debug;

/// Expand a plan against the registry.
///
/// Roots come from the baseline, then mandatory selectors, then every
/// conditional selector whose condition holds. Each root is followed directly
/// by its not-yet-seen `requires` (depth-first, declared order); the first
/// occurrence of an id fixes its position. Any declared conflict among the
/// result fails the whole resolution.
pub fn resolve(plan: &TaskPlan, registry: &DocumentRegistry) -> Result<ResolvedSet, ResolutionError> {
    let mut roots: Vec<(&Document, Inclusion)> = Vec::new();

    for selector in &plan.baseline {
        for doc in registry.select(selector) {
            roots.push((doc, Inclusion::Baseline { selector: selector.clone() }));
        }
    }
    for selector in &plan.mandatory_categories {
        let docs = registry.select(selector);
        if docs.is_empty() {
            debug!("Mandatory selector '{}' matched no documents", selector);
        }
        for doc in docs {
            roots.push((doc, Inclusion::Mandatory { selector: selector.clone() }));
        }
    }
    for rule in &plan.conditional_categories {
        if !rule.condition.holds(&plan.signals) {
            continue;
        }
        for doc in registry.select(&rule.selector) {
            roots.push((
                doc,
                Inclusion::Conditional {
                    selector: rule.selector.clone(),
                    condition: rule.condition.to_string(),
                },
            ));
        }
    }

    let mut seen: HashSet<&str> = HashSet::new();
    let mut entries: Vec<ResolvedEntry> = Vec::new();
    for (doc, inclusion) in roots {
        push_with_requires(doc, inclusion, registry, &mut seen, &mut entries);
    }

    check_conflicts(&entries, registry)?;

    debug!("Resolved {} documents: {:?}", entries.len(), entries.iter().map(|e| &e.id).collect::<Vec<_>>());

    Ok(ResolvedSet {
        entries,
        complexity_hint: plan.complexity_hint,
    })
}

fn push_with_requires<'r>(
    doc: &'r Document,
    inclusion: Inclusion,
    registry: &'r DocumentRegistry,
    seen: &mut HashSet<&'r str>,
    entries: &mut Vec<ResolvedEntry>,
) {
    if !seen.insert(doc.id.as_str()) {
        return;
    }

    entries.push(ResolvedEntry {
        id: doc.id.clone(),
        category: doc.category,
        priority_tier: doc.priority_tier,
        size_estimate: doc.size_estimate,
        requires: doc.requires.clone(),
        inclusion,
    });

    // Registry validation guarantees every id exists and the graph is acyclic
    for req in &doc.requires {
        if let Some(dep) = registry.get(req) {
            push_with_requires(
                dep,
                Inclusion::Dependency { of: doc.id.clone() },
                registry,
                seen,
                entries,
            );
        }
    }
}

fn check_conflicts(entries: &[ResolvedEntry], registry: &DocumentRegistry) -> Result<(), ResolutionError> {
    for (i, a) in entries.iter().enumerate() {
        for b in &entries[i + 1..] {
            if registry.conflicts(&a.id, &b.id) {
                debug!("Conflict between '{}' and '{}'", a.id, b.id);
                return Err(ResolutionError::Conflict(
                    ConflictingDocument { id: a.id.clone(), category: a.category },
                    ConflictingDocument { id: b.id.clone(), category: b.category },
                ));
            }
        }
    }
    Ok(())
}
