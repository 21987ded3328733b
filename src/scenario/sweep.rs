//! Churn sensitivity: project the same book under several churn rates

use rayon::prelude::*;
use serde::Serialize;

use crate::assumptions::GlobalAssumptions;
use crate::clients::ClientRegistry;
use crate::projection::{ProjectionEngine, ProjectionSummary};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChurnScenario {
    pub churn_percent: f64,
    pub summary: ProjectionSummary,
}

/// Project the registry once per churn rate, in parallel
///
/// All other assumptions are held fixed. Results follow the input order.
pub fn sweep_churn(
    registry: &ClientRegistry,
    assumptions: &GlobalAssumptions,
    churn_rates: &[f64],
) -> Vec<ChurnScenario> {
    churn_rates
        .par_iter()
        .map(|&churn_percent| {
            let engine = ProjectionEngine::new(GlobalAssumptions {
                customer_churn_rate_percent: churn_percent,
                ..assumptions.clone()
            });
            ChurnScenario {
                churn_percent,
                summary: engine.project(registry).summary,
            }
        })
        .collect()
}
