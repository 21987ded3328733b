//! SaaS Metrics - subscription pricing and MRR projection for a small client book
//!
//! This library provides:
//! - A fixed price catalog (flat plans, the usage-metered flex plan, add-ons)
//! - A client registry with month-scoped subscription overrides and pausing
//! - A month-by-month cohort projection of customers, MRR, ARR, ARPU and LTV
//! - Display series: cohort decay curves, LTV:CAC benchmarks, unit economics
//! - Single-file JSON persistence with debounced autosave

pub mod assumptions;
pub mod clients;
pub mod error;
pub mod projection;
pub mod scenario;
pub mod storage;
pub mod workspace;

// Re-export commonly used types
pub use assumptions::{GlobalAssumptions, Plan, PlanChoice};
pub use clients::{Client, ClientRegistry, SubscriptionPatch, SubscriptionState};
pub use error::{MetricsError, Result, StorageError};
pub use projection::{MonthSnapshot, ProjectionEngine, ProjectionResult};
pub use storage::{DataBridge, JsonFileStore, PersistedDocument};
pub use workspace::{DashboardMetrics, Workspace};
