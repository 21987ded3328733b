//! Boundary between the calculator and whatever hosts its data file

use std::path::PathBuf;

use super::document::PersistedDocument;

/// Load/save operations offered by the host
///
/// Failures never propagate: a failed load reads as "no data" and a failed
/// save reports `false`. Implementations log the cause.
pub trait DataBridge: Send + Sync {
    /// The persisted document, or None if absent or unreadable
    fn load_data(&self) -> Option<PersistedDocument>;

    /// Replace the persisted document; true on success
    fn save_data(&self, document: &PersistedDocument) -> bool;

    /// Location of the data, for display
    fn data_path(&self) -> PathBuf;
}
