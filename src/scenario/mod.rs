//! Auxiliary series for display: cohort decay, LTV:CAC benchmarks,
//! unit economics and churn sensitivity

pub mod benchmarks;
pub mod decay;
pub mod sweep;
pub mod unit_economics;

pub use benchmarks::{ltv_cac_benchmarks, BenchmarkRow, RatioHealth};
pub use decay::{cohort_decay, DecayPoint, DECAY_HORIZON_MONTHS};
pub use sweep::{sweep_churn, ChurnScenario};
pub use unit_economics::{RatioTarget, Runway, UnitEconomicsInputs, UnitEconomicsReport};

/// Round to one decimal place
pub(crate) fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
