//! Single-cohort decay curves

use serde::Serialize;

use super::round_to_tenth;
use crate::assumptions::GlobalAssumptions;

/// Last month of the decay chart (inclusive)
pub const DECAY_HORIZON_MONTHS: u32 = 36;

/// Share of a 100-customer cohort remaining after `month` months
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecayPoint {
    pub month: u32,
    /// Remaining under the user's churn rate
    pub remaining: f64,
    /// Reference curves at fixed 5%, 10% and 20% monthly churn
    pub churn5: f64,
    pub churn10: f64,
    pub churn20: f64,
}

fn benchmark_remaining(retention: f64, month: u32) -> f64 {
    round_to_tenth(100.0 * retention.powi(month as i32))
}

/// Decay of a 100-customer cohort over months 0..=36, one decimal place
pub fn cohort_decay(assumptions: &GlobalAssumptions) -> Vec<DecayPoint> {
    let retained = 1.0 - assumptions.churn_decimal();
    let mut cohort_size = 100.0;

    (0..=DECAY_HORIZON_MONTHS)
        .map(|month| {
            let point = DecayPoint {
                month,
                remaining: round_to_tenth(cohort_size),
                churn5: benchmark_remaining(0.95, month),
                churn10: benchmark_remaining(0.90, month),
                churn20: benchmark_remaining(0.80, month),
            };
            cohort_size *= retained;
            point
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decay_shape() {
        let points = cohort_decay(&GlobalAssumptions::default());

        assert_eq!(points.len(), 37);
        assert_eq!(points[0].remaining, 100.0);
        assert_eq!(points[0].churn20, 100.0);
        assert_eq!(points[1].remaining, 95.0);
        assert_eq!(points[1].churn10, 90.0);
        assert_eq!(points[2].churn20, 64.0);
        // 0.95^12 = 0.5404
        assert_eq!(points[12].churn5, 54.0);
        assert_eq!(points[36].month, 36);
    }

    #[test]
    fn test_live_churn_matches_benchmark() {
        let assumptions = GlobalAssumptions {
            customer_churn_rate_percent: 10.0,
            ..Default::default()
        };
        for point in cohort_decay(&assumptions) {
            assert!((point.remaining - point.churn10).abs() <= 0.1 + 1e-9, "month {}", point.month);
        }
    }

    #[test]
    fn test_zero_churn_flat() {
        let assumptions = GlobalAssumptions {
            customer_churn_rate_percent: 0.0,
            ..Default::default()
        };
        assert!(cohort_decay(&assumptions).iter().all(|p| p.remaining == 100.0));
    }
}
