//! The persisted JSON document

use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::assumptions::{GlobalAssumptions, PROJECTION_MONTHS};
use crate::clients::{Client, ClientRegistry};

/// Whole application state as written to disk
///
/// Plan identifiers deserialize strictly, so a document naming a plan the
/// catalog does not have is rejected as malformed. Add-on keys are lenient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedDocument {
    #[serde(default)]
    pub clients: Vec<Client>,

    #[serde(default = "default_next_client_id")]
    pub next_client_id: u64,

    #[serde(default)]
    pub global_inputs: GlobalAssumptions,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

fn default_next_client_id() -> u64 { 1 }

impl PersistedDocument {
    /// Snapshot the current state, stamped with the current time
    pub fn from_state(registry: &ClientRegistry, assumptions: &GlobalAssumptions) -> Self {
        Self {
            clients: registry.clients().to_vec(),
            next_client_id: registry.next_client_id(),
            global_inputs: assumptions.clone(),
            saved_at: Some(Utc::now()),
        }
    }

    /// Split into registry and assumptions, repairing the id counter
    ///
    /// The stored projection length is not trusted: any value other than
    /// `PROJECTION_MONTHS` is replaced.
    pub fn into_state(self) -> (ClientRegistry, GlobalAssumptions) {
        let mut assumptions = self.global_inputs;
        if assumptions.months != PROJECTION_MONTHS {
            warn!(
                "Ignoring stored projection length of {} months, using {}",
                assumptions.months, PROJECTION_MONTHS
            );
            assumptions.months = PROJECTION_MONTHS;
        }
        (
            ClientRegistry::from_parts(self.clients, self.next_client_id),
            assumptions,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::{Addon, Plan};
    use crate::clients::{FlexUsage, SubscriptionPatch, SubscriptionState};

    #[test]
    fn test_json_round_trip() {
        let mut registry = ClientRegistry::new();
        let a = registry.add_client("A", 0, SubscriptionState::flat(Plan::Basic).with_addon(Addon::ExtraSeat, 2));
        let b = registry.add_client(
            "B",
            2,
            SubscriptionState::flex(FlexUsage { personas: 2, premium_posts: 30, regenerations: 70 }),
        );
        registry.update_subscription(a, 4, SubscriptionPatch::plan(Plan::Pro)).unwrap();
        registry.pause_client(b, 8).unwrap();
        let assumptions = GlobalAssumptions {
            customer_churn_rate_percent: 7.5,
            ..Default::default()
        };

        let doc = PersistedDocument::from_state(&registry, &assumptions);
        let json = serde_json::to_string_pretty(&doc).unwrap();
        let back: PersistedDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);

        let (registry_back, assumptions_back) = back.into_state();
        assert_eq!(registry_back, registry);
        assert_eq!(assumptions_back, assumptions);
    }

    #[test]
    fn test_minimal_document() {
        let doc: PersistedDocument = serde_json::from_str("{}").unwrap();
        let (registry, assumptions) = doc.into_state();
        assert!(registry.is_empty());
        assert_eq!(registry.next_client_id(), 1);
        assert_eq!(assumptions, GlobalAssumptions::default());
    }

    #[test]
    fn test_stored_months_pinned() {
        for json in [
            r#"{"globalInputs": {"months": 0}}"#,
            r#"{"globalInputs": {"months": 4000000000, "cac": 900}}"#,
        ] {
            let doc: PersistedDocument = serde_json::from_str(json).unwrap();
            let (_, assumptions) = doc.into_state();
            assert_eq!(assumptions.months, PROJECTION_MONTHS);
        }

        let doc: PersistedDocument =
            serde_json::from_str(r#"{"globalInputs": {"months": 36, "cac": 900}}"#).unwrap();
        let (_, assumptions) = doc.into_state();
        assert_eq!(assumptions.months, PROJECTION_MONTHS);
        assert_eq!(assumptions.cac, 900.0);
    }

    #[test]
    fn test_unknown_plan_rejected() {
        let json = r#"{
            "clients": [{"id": 1, "name": "A", "startMonth": 0,
                         "subscription": {"type": "flat", "plan": "platinum"}}],
            "nextClientId": 2
        }"#;
        assert!(serde_json::from_str::<PersistedDocument>(json).is_err());
    }

    #[test]
    fn test_unknown_addon_tolerated() {
        let json = r#"{
            "clients": [{"id": 3, "name": "A", "startMonth": 1,
                         "subscription": {"type": "flat", "plan": "basic",
                                          "addons": {"legacy_reports": 2}}}],
            "nextClientId": 1
        }"#;
        let doc: PersistedDocument = serde_json::from_str(json).unwrap();
        let (registry, _) = doc.into_state();
        assert_eq!(registry.get(3).unwrap().subscription.addons().get("legacy_reports"), Some(&2));
        // Stale id counter raised past the stored id
        assert_eq!(registry.next_client_id(), 4);
    }
}
