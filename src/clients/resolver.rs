//! Subscription pricing: which subscription applies in a month and what it earns

use log::debug;

use super::data::{Addons, Client, SubscriptionState};
use crate::assumptions::{Addon, FlexRates};

/// Whether the client pays in `month`
///
/// Active from `start_month` up to, but not including, `paused_at`.
pub fn is_active(client: &Client, month: u32) -> bool {
    month >= client.start_month && client.paused_at.map_or(true, |paused| month < paused)
}

/// Subscription effective in `month`
///
/// Overrides keyed at or before `month` are folded over the base subscription
/// in ascending month order, so the latest applicable override wins.
pub fn resolve_subscription(client: &Client, month: u32) -> SubscriptionState {
    client
        .overrides
        .range(..=month)
        .fold(client.subscription.clone(), |state, (_, patch)| state.apply(patch))
}

/// Monthly revenue of add-ons; unknown keys earn nothing
pub fn addons_revenue(addons: &Addons) -> f64 {
    addons
        .iter()
        .map(|(key, &quantity)| match Addon::from_key(key) {
            Some(addon) => quantity as f64 * addon.monthly_price(),
            None => {
                debug!("Ignoring unknown add-on '{}' (quantity {})", key, quantity);
                0.0
            }
        })
        .sum()
}

/// Monthly revenue of a resolved subscription
pub fn monthly_revenue(state: &SubscriptionState) -> f64 {
    match state {
        SubscriptionState::Flat { plan, addons } => plan.monthly_price() + addons_revenue(addons),
        SubscriptionState::Flex { usage, addons } => {
            FlexRates::standard().usage_charge(usage.personas, usage.premium_posts, usage.regenerations)
                + addons_revenue(addons)
        }
    }
}

/// Revenue the client contributes in `month` (0 when inactive)
pub fn client_revenue(client: &Client, month: u32) -> f64 {
    if is_active(client, month) {
        monthly_revenue(&resolve_subscription(client, month))
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::{Plan, PlanChoice};
    use crate::clients::data::{FlexUsage, SubscriptionPatch};

    fn basic_client() -> Client {
        Client::new(1, "Pekárna", 1, SubscriptionState::flat(Plan::Basic))
    }

    #[test]
    fn test_active_window() {
        let mut client = basic_client();
        assert!(!is_active(&client, 0));
        assert!(is_active(&client, 1));
        assert!(is_active(&client, 11));

        client.paused_at = Some(6);
        assert!(is_active(&client, 5));
        assert!(!is_active(&client, 6));
        assert!(!is_active(&client, 9));
    }

    #[test]
    fn test_no_overrides_returns_base() {
        let client = basic_client();
        for month in 1..12 {
            assert_eq!(resolve_subscription(&client, month), client.subscription);
        }
    }

    #[test]
    fn test_override_precedence() {
        let mut client = basic_client();
        client.overrides.insert(2, SubscriptionPatch::plan(Plan::Pro));
        client.overrides.insert(
            5,
            SubscriptionPatch {
                addons: Some([("white_label".to_string(), 1)].into_iter().collect()),
                ..Default::default()
            },
        );

        assert_eq!(resolve_subscription(&client, 1).plan_choice(), PlanChoice::Basic);

        let month4 = resolve_subscription(&client, 4);
        assert_eq!(month4.plan_choice(), PlanChoice::Pro);
        assert!(month4.addons().is_empty());

        // Month 6: addons from month 5 layered over the Pro switch from month 2
        let month6 = resolve_subscription(&client, 6);
        assert_eq!(month6.plan_choice(), PlanChoice::Pro);
        assert_eq!(month6.addons().get("white_label"), Some(&1));
        assert_eq!(monthly_revenue(&month6), 2490.0 + 1990.0);
    }

    #[test]
    fn test_flat_revenue_with_addons() {
        let state = SubscriptionState::flat(Plan::Enterprise)
            .with_addon(Addon::ExtraSeat, 3)
            .with_addon(Addon::PrioritySupport, 1);
        assert_eq!(monthly_revenue(&state), 7490.0 + 3.0 * 290.0 + 990.0);
    }

    #[test]
    fn test_flex_base_only() {
        let state = SubscriptionState::flex(FlexUsage { personas: 1, premium_posts: 0, regenerations: 0 });
        assert_eq!(monthly_revenue(&state), FlexRates::standard().base_price);
    }

    #[test]
    fn test_unknown_addon_contributes_nothing() {
        let mut addons = Addons::new();
        addons.insert("legacy_reports".to_string(), 4);
        addons.insert("analytics_pro".to_string(), 1);
        assert_eq!(addons_revenue(&addons), 490.0);
    }

    #[test]
    fn test_client_revenue_inactive_is_zero() {
        let mut client = basic_client();
        client.paused_at = Some(3);
        assert_eq!(client_revenue(&client, 0), 0.0);
        assert_eq!(client_revenue(&client, 2), 990.0);
        assert_eq!(client_revenue(&client, 3), 0.0);
    }
}
