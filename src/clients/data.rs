//! Client records and subscription state

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::assumptions::{Addon, Plan, PlanChoice};

/// Add-on quantities keyed by catalog key
///
/// Keys stay as strings so a data file written by a newer catalog still
/// loads; keys the catalog does not know are priced at zero.
pub type Addons = BTreeMap<String, u32>;

/// Metered usage for a flex subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlexUsage {
    #[serde(default)]
    pub personas: u32,
    #[serde(default)]
    pub premium_posts: u32,
    #[serde(default)]
    pub regenerations: u32,
}

impl Default for FlexUsage {
    fn default() -> Self {
        Self {
            personas: 1,
            premium_posts: 0,
            regenerations: 0,
        }
    }
}

/// What a client is subscribed to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SubscriptionState {
    /// Flat-rate plan plus add-ons
    Flat {
        plan: Plan,
        #[serde(default)]
        addons: Addons,
    },
    /// Usage-metered flex plan plus add-ons
    Flex {
        #[serde(rename = "flexUsage", default)]
        usage: FlexUsage,
        #[serde(default)]
        addons: Addons,
    },
}

impl SubscriptionState {
    pub fn flat(plan: Plan) -> Self {
        SubscriptionState::Flat {
            plan,
            addons: Addons::new(),
        }
    }

    pub fn flex(usage: FlexUsage) -> Self {
        SubscriptionState::Flex {
            usage,
            addons: Addons::new(),
        }
    }

    /// Builder-style add-on quantity; a quantity of 0 removes the add-on
    pub fn with_addon(mut self, addon: Addon, quantity: u32) -> Self {
        let addons = match &mut self {
            SubscriptionState::Flat { addons, .. } | SubscriptionState::Flex { addons, .. } => addons,
        };
        if quantity == 0 {
            addons.remove(addon.key());
        } else {
            addons.insert(addon.key().to_string(), quantity);
        }
        self
    }

    pub fn addons(&self) -> &Addons {
        match self {
            SubscriptionState::Flat { addons, .. } | SubscriptionState::Flex { addons, .. } => addons,
        }
    }

    pub fn plan_choice(&self) -> PlanChoice {
        match self {
            SubscriptionState::Flat { plan, .. } => PlanChoice::from(*plan),
            SubscriptionState::Flex { .. } => PlanChoice::Flex,
        }
    }

    pub fn flex_usage(&self) -> Option<FlexUsage> {
        match self {
            SubscriptionState::Flat { .. } => None,
            SubscriptionState::Flex { usage, .. } => Some(*usage),
        }
    }

    /// Shallow-merge a patch over this state
    ///
    /// Fields present in the patch replace the current ones wholesale; absent
    /// fields carry over. Switching to flex without usage starts from the
    /// default usage, and usage given while the plan stays flat is ignored.
    pub fn apply(&self, patch: &SubscriptionPatch) -> SubscriptionState {
        let addons = patch
            .addons
            .clone()
            .unwrap_or_else(|| self.addons().clone());
        let choice = patch.plan.unwrap_or_else(|| self.plan_choice());

        match choice.flat_plan() {
            Some(plan) => SubscriptionState::Flat { plan, addons },
            None => SubscriptionState::Flex {
                usage: patch
                    .flex_usage
                    .or_else(|| self.flex_usage())
                    .unwrap_or_default(),
                addons,
            },
        }
    }
}

impl SubscriptionState {
    /// Subscription for a new client described only by a patch
    ///
    /// Starts from the trial plan. Flex usage given without a plan selects
    /// the flex plan rather than being dropped.
    pub fn from_patch(patch: &SubscriptionPatch) -> SubscriptionState {
        let mut patch = patch.clone();
        if patch.plan.is_none() && patch.flex_usage.is_some() {
            patch.plan = Some(PlanChoice::Flex);
        }
        SubscriptionState::default().apply(&patch)
    }
}

impl Default for SubscriptionState {
    fn default() -> Self {
        SubscriptionState::flat(Plan::Trial)
    }
}

/// Month-scoped partial change to a client's subscription
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<PlanChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flex_usage: Option<FlexUsage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addons: Option<Addons>,
}

impl SubscriptionPatch {
    pub fn plan(choice: impl Into<PlanChoice>) -> Self {
        Self {
            plan: Some(choice.into()),
            ..Default::default()
        }
    }

    pub fn flex_usage(usage: FlexUsage) -> Self {
        Self {
            flex_usage: Some(usage),
            ..Default::default()
        }
    }

    pub fn addons(addons: Addons) -> Self {
        Self {
            addons: Some(addons),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.plan.is_none() && self.flex_usage.is_none() && self.addons.is_none()
    }
}

/// A subscribing client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: u64,
    pub name: String,
    /// First active month (0-indexed)
    pub start_month: u32,
    /// Month from which the client is inactive, if paused
    #[serde(default)]
    pub paused_at: Option<u32>,
    pub subscription: SubscriptionState,
    /// Overrides keyed by the month they take effect
    #[serde(default)]
    pub overrides: BTreeMap<u32, SubscriptionPatch>,
}

impl Client {
    pub fn new(id: u64, name: impl Into<String>, start_month: u32, subscription: SubscriptionState) -> Self {
        Self {
            id,
            name: name.into(),
            start_month,
            paused_at: None,
            subscription,
            overrides: BTreeMap::new(),
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }
}
