//! Investor-style unit economics: gross margin, fully-loaded CAC, LTV, runway
//!
//! Independent of the client registry: works from a single ARPU figure and
//! the monthly acquisition spend.

use serde::{Deserialize, Serialize};

/// Inputs for the unit-economics simulator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitEconomicsInputs {
    /// Average monthly revenue per user
    #[serde(default = "default_arpu")]
    pub arpu: f64,

    /// AI/API cost per user per month
    #[serde(default = "default_ai_cost")]
    pub ai_cost: f64,

    /// Monthly marketing spend
    #[serde(default = "default_marketing")]
    pub marketing: f64,

    /// Monthly value of founder time spent on acquisition
    #[serde(default = "default_founder_cost")]
    pub founder_cost: f64,

    /// Monthly churn in percent
    #[serde(default = "default_churn")]
    pub churn: f64,

    /// Cash on hand
    #[serde(default)]
    pub cash: f64,

    /// Customers acquired per month with the above spend
    #[serde(default = "default_new_customers")]
    pub new_customers: f64,

    /// Current MRR offsetting the acquisition spend
    #[serde(default = "default_current_mrr")]
    pub current_mrr: f64,
}

fn default_arpu() -> f64 { 3230.0 }
fn default_ai_cost() -> f64 { 50.0 }
fn default_marketing() -> f64 { 5000.0 }
fn default_founder_cost() -> f64 { 20_000.0 }
fn default_churn() -> f64 { 10.0 }
fn default_new_customers() -> f64 { 3.0 }
fn default_current_mrr() -> f64 { 25_837.0 }

impl Default for UnitEconomicsInputs {
    fn default() -> Self {
        Self {
            arpu: 3230.0,
            ai_cost: 50.0,
            marketing: 5000.0,
            founder_cost: 20_000.0,
            churn: 10.0,
            cash: 0.0,
            new_customers: 3.0,
            current_mrr: 25_837.0,
        }
    }
}

/// Months of cash left, or no burn at all
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Runway {
    Months(f64),
    Profitable,
}

/// Where the LTV:CAC ratio sits against the 3:1 to 5:1 target band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioTarget {
    /// Below 3:1
    BelowTarget,
    OnTarget,
    /// Above 5:1: acquisition is likely under-funded
    AboveTarget,
}

impl RatioTarget {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio < 3.0 {
            RatioTarget::BelowTarget
        } else if ratio > 5.0 {
            RatioTarget::AboveTarget
        } else {
            RatioTarget::OnTarget
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitEconomicsReport {
    pub gross_margin: f64,
    /// Gross margin as a fraction of ARPU
    pub gross_margin_pct: f64,
    /// Marketing plus founder time
    pub acquisition_cost: f64,
    /// Fully-loaded cost per acquired customer
    pub cac: f64,
    pub ltv: f64,
    pub ltv_cac_ratio: f64,
    pub burn: f64,
    pub runway: Runway,
    pub target: RatioTarget,
}

impl UnitEconomicsInputs {
    pub fn evaluate(&self) -> UnitEconomicsReport {
        let gross_margin = self.arpu - self.ai_cost;
        let gross_margin_pct = if self.arpu != 0.0 {
            gross_margin / self.arpu
        } else {
            0.0
        };

        let acquisition_cost = self.marketing + self.founder_cost;
        let cac = if self.new_customers > 0.0 {
            acquisition_cost / self.new_customers
        } else {
            0.0
        };

        let churn = self.churn / 100.0;
        let ltv = if churn > 0.0 {
            self.arpu * gross_margin_pct / churn
        } else {
            0.0
        };
        let ltv_cac_ratio = if cac > 0.0 { ltv / cac } else { 0.0 };

        let burn = acquisition_cost - self.current_mrr;
        let runway = if burn > 0.0 {
            Runway::Months(self.cash / burn)
        } else {
            Runway::Profitable
        };

        UnitEconomicsReport {
            gross_margin,
            gross_margin_pct,
            acquisition_cost,
            cac,
            ltv,
            ltv_cac_ratio,
            burn,
            runway,
            target: RatioTarget::from_ratio(ltv_cac_ratio),
        }
    }
}
