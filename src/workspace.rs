//! Application state: the client book, assumptions, and the selected month
//!
//! Mutations go through here so each one can queue a save of the full
//! document. Metrics are re-derived from the current state on every call.

use log::info;
use serde::Serialize;

use crate::assumptions::{GlobalAssumptions, GlobalField};
use crate::clients::{Client, ClientRegistry, SubscriptionPatch, SubscriptionState};
use crate::error::{MetricsError, Result};
use crate::projection::{MonthBreakdown, ProjectionEngine, ProjectionResult};
use crate::scenario::{cohort_decay, ltv_cac_benchmarks, round_to_tenth, BenchmarkRow, DecayPoint};
use crate::storage::{Autosaver, DataBridge, PersistedDocument};

/// Everything the dashboard shows
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardMetrics {
    pub projection: ProjectionResult,
    /// MRR movement in the selected month
    pub breakdown: MonthBreakdown,
    pub cohort_decay: Vec<DecayPoint>,
    pub benchmarks: [BenchmarkRow; 3],
}

#[derive(Default)]
pub struct Workspace {
    registry: ClientRegistry,
    assumptions: GlobalAssumptions,
    /// Selected month, 0-indexed
    active_month: u32,
    autosaver: Option<Autosaver>,
}

impl Workspace {
    pub fn new(registry: ClientRegistry, assumptions: GlobalAssumptions) -> Self {
        Self {
            registry,
            assumptions,
            active_month: 0,
            autosaver: None,
        }
    }

    /// Start from the persisted document, or from defaults if there is none
    pub fn load(bridge: &dyn DataBridge) -> Self {
        match bridge.load_data() {
            Some(document) => {
                let (registry, assumptions) = document.into_state();
                Self::new(registry, assumptions)
            }
            None => {
                info!("Starting with an empty client book");
                Self::default()
            }
        }
    }

    /// Queue a save through `autosaver` after every mutation
    pub fn with_autosave(mut self, autosaver: Autosaver) -> Self {
        self.autosaver = Some(autosaver);
        self
    }

    pub fn registry(&self) -> &ClientRegistry {
        &self.registry
    }

    pub fn assumptions(&self) -> &GlobalAssumptions {
        &self.assumptions
    }

    pub fn active_month(&self) -> u32 {
        self.active_month
    }

    pub fn document(&self) -> PersistedDocument {
        PersistedDocument::from_state(&self.registry, &self.assumptions)
    }

    fn changed(&self) {
        if let Some(saver) = &self.autosaver {
            saver.schedule(self.document());
        }
    }

    pub fn add_client(
        &mut self,
        name: impl Into<String>,
        start_month: u32,
        subscription: SubscriptionState,
    ) -> u64 {
        let id = self.registry.add_client(name, start_month, subscription);
        self.changed();
        id
    }

    pub fn remove_client(&mut self, id: u64) -> Result<Client> {
        let removed = self.registry.remove_client(id)?;
        self.changed();
        Ok(removed)
    }

    pub fn pause_client(&mut self, id: u64, month: u32) -> Result<()> {
        self.registry.pause_client(id, month)?;
        self.changed();
        Ok(())
    }

    pub fn unpause_client(&mut self, id: u64) -> Result<()> {
        self.registry.unpause_client(id)?;
        self.changed();
        Ok(())
    }

    pub fn rename_client(&mut self, id: u64, name: impl Into<String>) -> Result<()> {
        self.registry.rename_client(id, name)?;
        self.changed();
        Ok(())
    }

    pub fn update_subscription(&mut self, id: u64, month: u32, patch: SubscriptionPatch) -> Result<()> {
        self.registry.update_subscription(id, month, patch)?;
        self.changed();
        Ok(())
    }

    /// Set a global assumption from raw form input (non-numeric becomes 0)
    pub fn set_assumption(&mut self, field: GlobalField, raw: &str) {
        self.assumptions.set_field(field, raw);
        self.changed();
    }

    /// Change the selected month; view state only, not saved
    pub fn select_month(&mut self, month: u32) -> Result<()> {
        let months = self.assumptions.months;
        if month >= months {
            return Err(MetricsError::MonthOutOfRange { month, months });
        }
        self.active_month = month;
        Ok(())
    }

    pub fn metrics(&self) -> Result<DashboardMetrics> {
        let engine = ProjectionEngine::new(self.assumptions.clone());
        let projection = engine.project(&self.registry);
        let breakdown = engine.month_breakdown(&projection, &self.registry, self.active_month)?;
        let benchmarks = ltv_cac_benchmarks(&projection.summary, self.assumptions.cac);

        Ok(DashboardMetrics {
            breakdown,
            cohort_decay: cohort_decay(&self.assumptions),
            benchmarks,
            projection,
        })
    }

    /// Write any queued save now
    pub async fn flush(&self) -> bool {
        match &self.autosaver {
            Some(saver) => saver.flush().await,
            None => true,
        }
    }

    /// Flush and stop autosaving
    pub async fn close(self) -> bool {
        match self.autosaver {
            Some(saver) => saver.shutdown().await,
            None => true,
        }
    }
}

/// Headline figures for printing or export
#[derive(Debug, Clone, Serialize)]
pub struct HeadlineMetrics {
    pub mrr: f64,
    pub arr: f64,
    pub customers: u64,
    pub ltv: f64,
    pub ltv_cac_ratio: f64,
    pub avg_lifetime_months: f64,
    pub retention_rate: f64,
}

impl From<&DashboardMetrics> for HeadlineMetrics {
    fn from(metrics: &DashboardMetrics) -> Self {
        let s = &metrics.projection.summary;
        Self {
            mrr: s.mrr,
            arr: s.arr,
            customers: s.total_customers,
            ltv: s.ltv.round(),
            ltv_cac_ratio: round_to_tenth(s.ltv_cac_ratio),
            avg_lifetime_months: round_to_tenth(s.avg_lifetime_months),
            retention_rate: round_to_tenth(s.retention_rate),
        }
    }
}
