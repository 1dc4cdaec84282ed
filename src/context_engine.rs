//! ContextEngine: runs extract -> classify -> resolve -> pack -> assemble

use crate::assembler::assemble;
use crate::classifier::classify;
use crate::error::PipelineError;
use crate::packing::pack;
use crate::registry::{DocumentRegistry, SharedRegistry};
use crate::resolver::resolve;
use crate::signals::extract;
use crate::types::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Main context engine (shared across requests via Arc, no locking)
pub struct ContextEngine {
    registry: SharedRegistry,
}

pub type SharedContextEngine = Arc<ContextEngine>;

impl ContextEngine {
    pub fn new(registry: SharedRegistry) -> SharedContextEngine {
        Arc::new(Self { registry })
    }

    pub fn registry(&self) -> &DocumentRegistry {
        &self.registry
    }

    /// Main entry point. Either a complete bundle or a typed error; never a partial bundle.
    pub fn compile(&self, req: CompileRequest) -> Result<CompileResponse, PipelineError> {
        let start = Instant::now();

        info!("Compiling context: budget={}", req.budget);
        debug!("Request input: '{}'", req.input);

        // Step 1: Signals
        let signals = extract(&req.input, &req.flags);

        // Step 2: Plan
        let plan = classify(signals.clone()).map_err(|e| {
            info!("Classification stopped: {}", e);
            e
        })?;
        if let Some(ref clarification) = plan.clarification {
            warn!("Proceeding without work type: {}", clarification.reason);
        }

        // Step 3: Candidates
        let resolved = resolve(&plan, &self.registry).map_err(|e| {
            warn!("Resolution failed: {}", e);
            e
        })?;

        // Step 4: Budget
        let packed = pack(&resolved, req.budget);
        for entry in packed.truncated() {
            debug!("Truncated '{}' (tier {}): {:?}", entry.id, entry.priority_tier, entry.status);
        }

        // Step 5: Bundle
        let bundle = assemble(&packed, &self.registry)?;
        let rendered = bundle.render();

        let documents_included = bundle.sections.len();
        let stats = CompileStats {
            documents_resolved: resolved.len(),
            documents_included,
            documents_truncated: resolved.len() - documents_included,
            total_size: bundle.total_size,
            budget: req.budget,
            utilization: if req.budget == 0 {
                0.0
            } else {
                bundle.total_size as f32 / req.budget as f32
            },
            over_budget_floor: packed.floor_size() > req.budget,
            elapsed_us: start.elapsed().as_micros() as u64,
        };

        info!(
            "Compilation complete: {} of {} documents, size {} ({:.1}% of budget)",
            stats.documents_included,
            stats.documents_resolved,
            stats.total_size,
            stats.utilization * 100.0
        );

        let rationale = if req.explain {
            Some(explain(&resolved, &packed))
        } else {
            None
        };

        Ok(CompileResponse {
            bundle,
            rendered,
            signals,
            clarification: plan.clarification,
            packed,
            stats,
            rationale,
        })
    }
}

fn explain(resolved: &ResolvedSet, packed: &PackedSet) -> Vec<DocumentExplanation> {
    resolved
        .entries
        .iter()
        .zip(&packed.entries)
        .map(|(r, p)| {
            let mut reasons = vec![r.inclusion.to_string()];
            match &p.status {
                PackStatus::Included if r.priority_tier == 0 => {
                    reasons.push("core tier, always shipped".to_string())
                }
                PackStatus::Included => reasons.push("fits budget".to_string()),
                PackStatus::Truncated { cause: TruncationReason::OverBudget } => {
                    reasons.push("over budget".to_string())
                }
                PackStatus::Truncated { cause: TruncationReason::DependencyCut(missing) } => {
                    reasons.push(format!("prerequisite '{}' was cut", missing))
                }
            }
            DocumentExplanation {
                id: r.id.clone(),
                priority_tier: r.priority_tier,
                status: p.status.clone(),
                reasons,
            }
        })
        .collect()
}
