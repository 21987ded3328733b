//! Global assumptions applied to the whole client book

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifetime reported when churn is zero, in place of an infinite value
pub const ZERO_CHURN_LIFETIME_MONTHS: f64 = 999.0;

/// Share of the cumulative customer count eligible for an upgrade each month
pub const UPGRADE_ELIGIBLE_SHARE: f64 = 0.1;

/// Length of every projection, in months
pub const PROJECTION_MONTHS: u32 = 12;

/// Global assumptions as entered by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalAssumptions {
    /// Monthly customer churn in percent (0-100)
    #[serde(rename = "customerChurnRate", default = "default_churn")]
    pub customer_churn_rate_percent: f64,

    /// Customer acquisition cost per customer
    #[serde(default = "default_cac")]
    pub cac: f64,

    /// Upper bound on customers upgrading per month
    #[serde(rename = "upgradedCustomers", default = "default_upgraded")]
    pub upgraded_customers_per_month: f64,

    /// Extra MRR per upgraded customer
    #[serde(rename = "upgradePriceIncrease", default = "default_upsell")]
    pub upgrade_price_increase: f64,

    /// Projection horizon; always `PROJECTION_MONTHS` once loaded
    #[serde(default = "default_months")]
    pub months: u32,
}

fn default_churn() -> f64 { 5.0 }
fn default_cac() -> f64 { 3500.0 }
fn default_upgraded() -> f64 { 5.0 }
fn default_upsell() -> f64 { 1500.0 }
fn default_months() -> u32 { PROJECTION_MONTHS }

impl Default for GlobalAssumptions {
    fn default() -> Self {
        Self {
            customer_churn_rate_percent: 5.0,
            cac: 3500.0,
            upgraded_customers_per_month: 5.0,
            upgrade_price_increase: 1500.0,
            months: PROJECTION_MONTHS,
        }
    }
}

impl GlobalAssumptions {
    /// Churn as a monthly decimal, clamped to [0, 1]
    pub fn churn_decimal(&self) -> f64 {
        (self.customer_churn_rate_percent / 100.0).clamp(0.0, 1.0)
    }

    /// Monthly retention in percent
    pub fn retention_rate(&self) -> f64 {
        100.0 - self.churn_decimal() * 100.0
    }

    /// Expected customer lifetime in months (1 / churn)
    pub fn avg_lifetime_months(&self) -> f64 {
        let churn = self.churn_decimal();
        if churn > 0.0 {
            1.0 / churn
        } else {
            ZERO_CHURN_LIFETIME_MONTHS
        }
    }

    /// Expansion MRR for a month given the cumulative customer count
    pub fn expansion_mrr(&self, cumulative_customers: f64) -> f64 {
        let upgrading = (cumulative_customers * UPGRADE_ELIGIBLE_SHARE)
            .min(self.upgraded_customers_per_month);
        upgrading * self.upgrade_price_increase
    }

    /// Set a field from raw form input
    pub fn set_field(&mut self, field: GlobalField, raw: &str) {
        let value = coerce_numeric(raw);
        match field {
            GlobalField::ChurnRate => self.customer_churn_rate_percent = value,
            GlobalField::Cac => self.cac = value,
            GlobalField::UpgradedCustomers => self.upgraded_customers_per_month = value,
            GlobalField::UpgradePriceIncrease => self.upgrade_price_increase = value,
        }
    }
}

/// User-editable global assumption fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalField {
    ChurnRate,
    Cac,
    UpgradedCustomers,
    UpgradePriceIncrease,
}

impl FromStr for GlobalField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "churn" | "customerChurnRate" => Ok(GlobalField::ChurnRate),
            "cac" => Ok(GlobalField::Cac),
            "upgraded-customers" | "upgradedCustomers" => Ok(GlobalField::UpgradedCustomers),
            "upgrade-price-increase" | "upgradePriceIncrease" => {
                Ok(GlobalField::UpgradePriceIncrease)
            }
            other => Err(format!(
                "unknown assumption '{}' (expected churn, cac, upgraded-customers, upgrade-price-increase)",
                other
            )),
        }
    }
}

impl fmt::Display for GlobalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GlobalField::ChurnRate => "churn",
            GlobalField::Cac => "cac",
            GlobalField::UpgradedCustomers => "upgraded-customers",
            GlobalField::UpgradePriceIncrease => "upgrade-price-increase",
        };
        f.write_str(name)
    }
}

/// Coerce a form field to a number
///
/// Parses the longest numeric prefix of the trimmed input ("12 zák." gives 12).
/// Empty, non-numeric and non-finite input gives 0.
pub fn coerce_numeric(raw: &str) -> f64 {
    let trimmed = raw.trim_start();
    let boundaries = trimmed
        .char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .collect::<Vec<_>>();

    for &end in boundaries.iter().rev() {
        if let Ok(value) = trimmed[..end].parse::<f64>() {
            return if value.is_finite() { value } else { 0.0 };
        }
    }
    0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let a = GlobalAssumptions::default();
        assert_eq!(a.months, 12);
        assert_relative_eq!(a.churn_decimal(), 0.05);
        assert_relative_eq!(a.retention_rate(), 95.0);
        assert_relative_eq!(a.avg_lifetime_months(), 20.0);
    }

    #[test]
    fn test_zero_churn_lifetime_sentinel() {
        let a = GlobalAssumptions {
            customer_churn_rate_percent: 0.0,
            ..Default::default()
        };
        assert_eq!(a.avg_lifetime_months(), ZERO_CHURN_LIFETIME_MONTHS);
        assert!(a.avg_lifetime_months().is_finite());
    }

    #[test]
    fn test_churn_clamped() {
        let over = GlobalAssumptions {
            customer_churn_rate_percent: 150.0,
            ..Default::default()
        };
        assert_eq!(over.churn_decimal(), 1.0);

        let negative = GlobalAssumptions {
            customer_churn_rate_percent: -3.0,
            ..Default::default()
        };
        assert_eq!(negative.churn_decimal(), 0.0);
    }

    #[test]
    fn test_expansion_clamp() {
        let a = GlobalAssumptions::default();
        // 10% of 20 customers = 2 upgrades
        assert_relative_eq!(a.expansion_mrr(20.0), 2.0 * 1500.0);
        // 10% of 200 = 20, capped at 5
        assert_relative_eq!(a.expansion_mrr(200.0), 5.0 * 1500.0);
        assert_eq!(a.expansion_mrr(0.0), 0.0);
    }

    #[test]
    fn test_coerce_numeric() {
        assert_eq!(coerce_numeric("42"), 42.0);
        assert_eq!(coerce_numeric("  7.5"), 7.5);
        assert_eq!(coerce_numeric("12 zák."), 12.0);
        assert_eq!(coerce_numeric("1e"), 1.0);
        assert_eq!(coerce_numeric("-3"), -3.0);
        assert_eq!(coerce_numeric(""), 0.0);
        assert_eq!(coerce_numeric("abc"), 0.0);
        assert_eq!(coerce_numeric("NaN"), 0.0);
        assert_eq!(coerce_numeric("inf"), 0.0);
    }

    #[test]
    fn test_set_field() {
        let mut a = GlobalAssumptions::default();
        a.set_field(GlobalField::ChurnRate, "8");
        a.set_field(GlobalField::Cac, "oops");
        assert_eq!(a.customer_churn_rate_percent, 8.0);
        assert_eq!(a.cac, 0.0);
    }

    #[test]
    fn test_partial_document_uses_field_defaults() {
        let a: GlobalAssumptions = serde_json::from_str(r#"{"customerChurnRate": 3}"#).unwrap();
        assert_eq!(a.customer_churn_rate_percent, 3.0);
        assert_eq!(a.cac, 3500.0);
        assert_eq!(a.months, 12);
    }

    #[test]
    fn test_field_names() {
        assert_eq!("churn".parse::<GlobalField>(), Ok(GlobalField::ChurnRate));
        assert_eq!("upgradePriceIncrease".parse::<GlobalField>(), Ok(GlobalField::UpgradePriceIncrease));
        assert!("runway".parse::<GlobalField>().is_err());
    }
}
