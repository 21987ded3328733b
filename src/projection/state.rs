//! Running totals carried from one projected month to the next

use crate::assumptions::GlobalAssumptions;

/// Cumulative customer count and MRR, before rounding
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProjectionState {
    pub cumulative_customers: f64,
    pub cumulative_mrr: f64,
}

impl ProjectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decay the running totals by churn, then add this month's arrivals
    ///
    /// Churn is applied before the month's values are added, so the totals
    /// never go negative while churn stays within [0, 1].
    pub fn decay_and_add(&mut self, churn_decimal: f64, new_customers: f64, month_mrr: f64) {
        let retained = 1.0 - churn_decimal;
        self.cumulative_customers = self.cumulative_customers * retained + new_customers;
        self.cumulative_mrr = self.cumulative_mrr * retained + month_mrr;
    }

    /// Add expansion revenue for the month and return it
    pub fn apply_expansion(&mut self, assumptions: &GlobalAssumptions) -> f64 {
        let expansion = assumptions.expansion_mrr(self.cumulative_customers);
        self.cumulative_mrr += expansion;
        expansion
    }
}
