//! Projection engine for the client book

mod state;
mod engine;
mod snapshots;

pub use state::ProjectionState;
pub use engine::ProjectionEngine;
pub use snapshots::{MonthBreakdown, MonthSnapshot, ProjectionResult, ProjectionSummary};
