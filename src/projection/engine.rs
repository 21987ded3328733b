//! Month-by-month cohort and MRR projection

use log::debug;

use super::snapshots::{MonthBreakdown, MonthSnapshot, ProjectionResult, ProjectionSummary};
use super::state::ProjectionState;
use crate::assumptions::GlobalAssumptions;
use crate::clients::{client_revenue, ClientRegistry};
use crate::error::{MetricsError, Result};

/// Projects a client registry forward under a set of global assumptions
///
/// Holds no state between calls: every projection is a pure function of the
/// registry passed in and the assumptions captured at construction.
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    assumptions: GlobalAssumptions,
}

impl ProjectionEngine {
    pub fn new(assumptions: GlobalAssumptions) -> Self {
        Self { assumptions }
    }

    pub fn assumptions(&self) -> &GlobalAssumptions {
        &self.assumptions
    }

    /// Active client count and their combined revenue in `month`
    fn active_revenue(registry: &ClientRegistry, month: u32) -> (u64, f64) {
        registry
            .active_in(month)
            .fold((0, 0.0), |(count, mrr), client| {
                (count + 1, mrr + client_revenue(client, month))
            })
    }

    /// Run the projection over months `0..months`
    pub fn project(&self, registry: &ClientRegistry) -> ProjectionResult {
        let months = self.assumptions.months;
        let churn = self.assumptions.churn_decimal();
        let mut state = ProjectionState::new();
        let mut snapshots = Vec::with_capacity(months as usize);

        for month in 0..months {
            let (active_customers, month_mrr) = Self::active_revenue(registry, month);
            let new_customers = registry.starting_in(month).count() as u64;

            state.decay_and_add(churn, new_customers as f64, month_mrr);
            let expansion = state.apply_expansion(&self.assumptions);

            snapshots.push(MonthSnapshot::from_state(
                month,
                &state,
                active_customers,
                month_mrr,
                new_customers,
                expansion,
            ));
        }

        debug!(
            "Projected {} months for {} clients at {:.2}% churn",
            months,
            registry.len(),
            self.assumptions.customer_churn_rate_percent
        );

        let summary = ProjectionSummary::from_snapshots(&snapshots, &self.assumptions);
        ProjectionResult { snapshots, summary }
    }

    /// MRR movement for the selected 0-indexed month
    ///
    /// New MRR and customers come from the clients active in that month.
    /// Lost and expansion MRR are driven by the previous month's snapshot,
    /// which is taken as zero for the first month.
    pub fn month_breakdown(
        &self,
        result: &ProjectionResult,
        registry: &ClientRegistry,
        month: u32,
    ) -> Result<MonthBreakdown> {
        let months = self.assumptions.months;
        if month >= months {
            return Err(MetricsError::MonthOutOfRange { month, months });
        }

        let (new_customers, new_mrr) = Self::active_revenue(registry, month);
        let (prev_mrr, prev_customers) = month
            .checked_sub(1)
            .and_then(|prev| result.snapshot(prev))
            .map_or((0.0, 0.0), |s| (s.mrr, s.customers as f64));

        let lost_mrr = prev_mrr * self.assumptions.churn_decimal();
        let expansion_mrr = self.assumptions.expansion_mrr(prev_customers);

        Ok(MonthBreakdown {
            month,
            new_mrr,
            new_customers,
            lost_mrr,
            expansion_mrr,
            net_mrr: new_mrr + expansion_mrr - lost_mrr,
        })
    }
}
