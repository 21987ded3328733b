//! LTV:CAC comparison against reference ratios

use serde::Serialize;

use super::round_to_tenth;
use crate::projection::ProjectionSummary;

/// Health band of an LTV:CAC ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RatioHealth {
    /// 3:1 or better
    Healthy,
    /// Between 1:1 and 3:1
    Marginal,
    /// Below 1:1
    Risky,
}

impl RatioHealth {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio >= 3.0 {
            RatioHealth::Healthy
        } else if ratio >= 1.0 {
            RatioHealth::Marginal
        } else {
            RatioHealth::Risky
        }
    }

    /// Chart color (green, amber, red)
    pub fn color(self) -> &'static str {
        match self {
            RatioHealth::Healthy => "#10b981",
            RatioHealth::Marginal => "#f59e0b",
            RatioHealth::Risky => "#ef4444",
        }
    }
}

/// One bar of the LTV:CAC chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkRow {
    pub name: &'static str,
    pub ltv: f64,
    pub cac: f64,
    pub ratio: f64,
    pub health: RatioHealth,
}

/// The user's ratio next to a healthy 3:1 and a risky 1:1 reference
pub fn ltv_cac_benchmarks(summary: &ProjectionSummary, cac: f64) -> [BenchmarkRow; 3] {
    [
        BenchmarkRow {
            name: "Your business",
            ltv: summary.ltv.round(),
            cac,
            ratio: round_to_tenth(summary.ltv_cac_ratio),
            health: RatioHealth::from_ratio(summary.ltv_cac_ratio),
        },
        BenchmarkRow {
            name: "Healthy SaaS (3:1)",
            ltv: cac * 3.0,
            cac,
            ratio: 3.0,
            health: RatioHealth::Healthy,
        },
        BenchmarkRow {
            name: "Risky (1:1)",
            ltv: cac,
            cac,
            ratio: 1.0,
            health: RatioHealth::Risky,
        },
    ]
}
