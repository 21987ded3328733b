//! Price catalog: flat plans, the usage-based flex plan, and add-ons
//!
//! All prices are monthly and in Kč. The catalog is fixed; users choose from
//! it but cannot edit it.

use serde::{Deserialize, Serialize};

/// Flat-rate subscription plans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Trial,
    Basic,
    Pro,
    Enterprise,
}

impl Plan {
    pub const ALL: [Plan; 4] = [Plan::Trial, Plan::Basic, Plan::Pro, Plan::Enterprise];

    /// Monthly list price
    pub fn monthly_price(self) -> f64 {
        match self {
            Plan::Trial => 0.0,
            Plan::Basic => 990.0,
            Plan::Pro => 2490.0,
            Plan::Enterprise => 7490.0,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Plan::Trial => "Trial",
            Plan::Basic => "Basic",
            Plan::Pro => "Pro",
            Plan::Enterprise => "Enterprise",
        }
    }
}

/// Plan selection carried by a subscription patch: any flat plan, or flex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanChoice {
    Trial,
    Basic,
    Pro,
    Enterprise,
    Flex,
}

impl PlanChoice {
    /// The flat plan this choice names, or None for flex
    pub fn flat_plan(self) -> Option<Plan> {
        match self {
            PlanChoice::Trial => Some(Plan::Trial),
            PlanChoice::Basic => Some(Plan::Basic),
            PlanChoice::Pro => Some(Plan::Pro),
            PlanChoice::Enterprise => Some(Plan::Enterprise),
            PlanChoice::Flex => None,
        }
    }

    pub fn display_name(self) -> &'static str {
        self.flat_plan().map_or("Flex", Plan::display_name)
    }
}

impl From<Plan> for PlanChoice {
    fn from(plan: Plan) -> Self {
        match plan {
            Plan::Trial => PlanChoice::Trial,
            Plan::Basic => PlanChoice::Basic,
            Plan::Pro => PlanChoice::Pro,
            Plan::Enterprise => PlanChoice::Enterprise,
        }
    }
}

/// Rates for the usage-metered flex plan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlexRates {
    /// Monthly base fee
    pub base_price: f64,
    /// Personas covered by the base fee
    pub included_personas: u32,
    /// Charge per persona beyond the included ones
    pub persona_rate: f64,
    /// Premium posts per month covered by the base fee
    pub free_premium_posts: u32,
    pub premium_post_rate: f64,
    /// Regenerations per month covered by the base fee
    pub free_regenerations: u32,
    pub regeneration_rate: f64,
}

impl FlexRates {
    /// The catalog row for the flex plan
    pub const fn standard() -> Self {
        Self {
            base_price: 1490.0,
            included_personas: 1,
            persona_rate: 290.0,
            free_premium_posts: 20,
            premium_post_rate: 49.0,
            free_regenerations: 50,
            regeneration_rate: 9.0,
        }
    }

    /// Monthly charge for the given usage, add-ons excluded
    pub fn usage_charge(&self, personas: u32, premium_posts: u32, regenerations: u32) -> f64 {
        let extra_personas = personas.saturating_sub(self.included_personas);
        let extra_posts = premium_posts.saturating_sub(self.free_premium_posts);
        let extra_regens = regenerations.saturating_sub(self.free_regenerations);

        self.base_price
            + extra_personas as f64 * self.persona_rate
            + extra_posts as f64 * self.premium_post_rate
            + extra_regens as f64 * self.regeneration_rate
    }
}

impl Default for FlexRates {
    fn default() -> Self {
        Self::standard()
    }
}

/// Purchasable add-ons, billed per unit per month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Addon {
    AnalyticsPro,
    PrioritySupport,
    WhiteLabel,
    ExtraSeat,
}

impl Addon {
    pub const ALL: [Addon; 4] = [
        Addon::AnalyticsPro,
        Addon::PrioritySupport,
        Addon::WhiteLabel,
        Addon::ExtraSeat,
    ];

    /// Key used in persisted add-on maps
    pub fn key(self) -> &'static str {
        match self {
            Addon::AnalyticsPro => "analytics_pro",
            Addon::PrioritySupport => "priority_support",
            Addon::WhiteLabel => "white_label",
            Addon::ExtraSeat => "extra_seat",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|addon| addon.key() == key)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Addon::AnalyticsPro => "Analytics Pro",
            Addon::PrioritySupport => "Priority Support",
            Addon::WhiteLabel => "White Label",
            Addon::ExtraSeat => "Extra Seat",
        }
    }

    pub fn monthly_price(self) -> f64 {
        match self {
            Addon::AnalyticsPro => 490.0,
            Addon::PrioritySupport => 990.0,
            Addon::WhiteLabel => 1990.0,
            Addon::ExtraSeat => 290.0,
        }
    }
}
