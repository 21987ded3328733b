//! Persistence of the client book and assumptions

pub mod autosave;
pub mod bridge;
pub mod config;
pub mod document;
pub mod json_store;

pub use autosave::Autosaver;
pub use bridge::DataBridge;
pub use config::{StorageConfig, DATA_DIR_ENV};
pub use document::PersistedDocument;
pub use json_store::JsonFileStore;
