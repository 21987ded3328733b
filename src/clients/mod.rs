//! Client records, the registry, and per-month subscription pricing

mod data;
pub mod registry;
pub mod resolver;

pub use data::{Addons, Client, FlexUsage, SubscriptionPatch, SubscriptionState};
pub use registry::ClientRegistry;
pub use resolver::{addons_revenue, client_revenue, is_active, monthly_revenue, resolve_subscription};
