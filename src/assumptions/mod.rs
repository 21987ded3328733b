//! Price catalog and global assumptions

pub mod catalog;
pub mod global;

pub use catalog::{Addon, FlexRates, Plan, PlanChoice};
pub use global::{
    coerce_numeric, GlobalAssumptions, GlobalField, PROJECTION_MONTHS, UPGRADE_ELIGIBLE_SHARE,
    ZERO_CHURN_LIFETIME_MONTHS,
};
