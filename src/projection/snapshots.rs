//! Projection output: per-month snapshots, summary metrics, month breakdown

use serde::Serialize;

use super::state::ProjectionState;
use crate::assumptions::GlobalAssumptions;

/// One projected month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthSnapshot {
    /// Display month (1-indexed)
    pub month: u32,
    /// Customers: the larger of active clients and rounded cumulative count
    pub customers: u64,
    /// MRR: the larger of this month's revenue and rounded cumulative MRR
    pub mrr: f64,
    pub arr: f64,
    /// Average revenue per active client, rounded
    pub arpu: f64,
    pub new_customers: u64,

    // Components behind the headline figures
    pub active_customers: u64,
    pub month_mrr: f64,
    pub expansion_mrr: f64,
    pub cumulative_customers: f64,
    pub cumulative_mrr: f64,
}

impl MonthSnapshot {
    /// Build the snapshot for 0-indexed `month` from the post-step state
    pub fn from_state(
        month: u32,
        state: &ProjectionState,
        active_customers: u64,
        month_mrr: f64,
        new_customers: u64,
        expansion_mrr: f64,
    ) -> Self {
        let customers = active_customers.max(state.cumulative_customers.round() as u64);
        let mrr = month_mrr.max(state.cumulative_mrr.round());
        let arpu = if active_customers > 0 {
            (month_mrr / active_customers as f64).round()
        } else {
            0.0
        };

        Self {
            month: month + 1,
            customers,
            mrr,
            arr: mrr * 12.0,
            arpu,
            new_customers,
            active_customers,
            month_mrr,
            expansion_mrr,
            cumulative_customers: state.cumulative_customers,
            cumulative_mrr: state.cumulative_mrr,
        }
    }
}

/// Headline metrics at the end of the projection
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectionSummary {
    pub mrr: f64,
    pub arr: f64,
    pub arpu: f64,
    pub total_customers: u64,
    pub avg_lifetime_months: f64,
    pub retention_rate: f64,
    pub ltv: f64,
    pub ltv_cac_ratio: f64,
}

impl ProjectionSummary {
    /// Derive from the final snapshot; an empty projection reports zeros
    /// apart from the churn-derived figures
    pub fn from_snapshots(snapshots: &[MonthSnapshot], assumptions: &GlobalAssumptions) -> Self {
        let avg_lifetime_months = assumptions.avg_lifetime_months();
        let retention_rate = assumptions.retention_rate();

        let Some(last) = snapshots.last() else {
            return Self {
                avg_lifetime_months,
                retention_rate,
                ..Default::default()
            };
        };

        let ltv = last.arpu * avg_lifetime_months;
        let ltv_cac_ratio = if assumptions.cac > 0.0 {
            ltv / assumptions.cac
        } else {
            0.0
        };

        Self {
            mrr: last.mrr,
            arr: last.arr,
            arpu: last.arpu,
            total_customers: last.customers,
            avg_lifetime_months,
            retention_rate,
            ltv,
            ltv_cac_ratio,
        }
    }
}

/// Full projection output
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionResult {
    pub snapshots: Vec<MonthSnapshot>,
    pub summary: ProjectionSummary,
}

impl ProjectionResult {
    /// Snapshot for 0-indexed `month`
    pub fn snapshot(&self, month: u32) -> Option<&MonthSnapshot> {
        self.snapshots.get(month as usize)
    }
}

/// MRR movement in a single selected month
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthBreakdown {
    /// 0-indexed month
    pub month: u32,
    pub new_mrr: f64,
    pub new_customers: u64,
    pub lost_mrr: f64,
    pub expansion_mrr: f64,
    pub net_mrr: f64,
}
