//! Single-file JSON store
//!
//! The whole document is read at startup and rewritten on every save. Writes
//! go to a sibling temp file which is then renamed over the target.

use log::{debug, error, info, warn};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::bridge::DataBridge;
use super::config::StorageConfig;
use super::document::PersistedDocument;
use crate::error::StorageError;

/// JSON file holding the persisted document
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.file_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Read the document; Ok(None) when the file does not exist
    pub fn try_load(&self) -> Result<Option<PersistedDocument>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        let document = serde_json::from_str(&content).map_err(|source| StorageError::Json {
            path: self.path.clone(),
            source,
        })?;
        Ok(Some(document))
    }

    /// Write the document, replacing the file in one step
    pub fn try_save(&self, document: &PersistedDocument) -> Result<(), StorageError> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| StorageError::Path(self.path.display().to_string()))?;
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let content = serde_json::to_string_pretty(document).map_err(|source| StorageError::Json {
            path: self.path.clone(),
            source,
        })?;

        let temp_path = self.temp_path();
        let written = write_synced(&temp_path, content.as_bytes())
            .and_then(|()| fs::rename(&temp_path, &self.path));
        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(self.io_error(e));
        }

        Ok(())
    }
}

fn write_synced(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(content)?;
    writer.flush()?;
    writer.get_ref().sync_all()
}

impl DataBridge for JsonFileStore {
    fn load_data(&self) -> Option<PersistedDocument> {
        match self.try_load() {
            Ok(Some(document)) => {
                info!(
                    "Loaded {} clients from {}",
                    document.clients.len(),
                    self.path.display()
                );
                Some(document)
            }
            Ok(None) => {
                debug!("No data file at {}", self.path.display());
                None
            }
            Err(e) => {
                warn!("Ignoring unreadable data file: {}", e);
                None
            }
        }
    }

    fn save_data(&self, document: &PersistedDocument) -> bool {
        match self.try_save(document) {
            Ok(()) => {
                debug!("Saved {} clients to {}", document.clients.len(), self.path.display());
                true
            }
            Err(e) => {
                error!("Failed to save data: {}", e);
                false
            }
        }
    }

    fn data_path(&self) -> PathBuf {
        self.path.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::{GlobalAssumptions, Plan};
    use crate::clients::{ClientRegistry, SubscriptionState};

    fn sample_document() -> PersistedDocument {
        let mut registry = ClientRegistry::new();
        registry.add_client("A", 0, SubscriptionState::flat(Plan::Pro));
        PersistedDocument::from_state(&registry, &GlobalAssumptions::default())
    }

    #[test]
    fn test_missing_file_is_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("saas-data.json"));

        assert!(store.try_load().unwrap().is_none());
        assert!(store.load_data().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("saas-data.json"));
        let document = sample_document();

        assert!(store.save_data(&document));
        assert!(!store.temp_path().exists());
        assert_eq!(store.load_data(), Some(document));
    }

    #[test]
    fn test_malformed_file_is_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saas-data.json");
        fs::write(&path, "{ not json").unwrap();
        let store = JsonFileStore::new(&path);

        assert!(matches!(store.try_load(), Err(StorageError::Json { .. })));
        assert!(store.load_data().is_none());
    }

    #[test]
    fn test_save_failure_reports_false() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be makes the rename fail
        let path = dir.path().join("saas-data.json");
        fs::create_dir_all(path.join("occupied")).unwrap();
        let store = JsonFileStore::new(&path);

        assert!(!store.save_data(&sample_document()));
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn test_failed_temp_write_keeps_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("saas-data.json"));
        let document = sample_document();
        assert!(store.save_data(&document));

        // The temp file cannot be created while a directory holds its name
        fs::create_dir_all(store.temp_path()).unwrap();
        let mut changed = document.clone();
        changed.next_client_id = 40;

        assert!(matches!(store.try_save(&changed), Err(StorageError::Io { .. })));
        assert_eq!(store.load_data(), Some(document));
    }

    #[test]
    fn test_data_path() {
        let store = JsonFileStore::from_config(&StorageConfig::default().with_data_dir("/srv/metrics"));
        assert_eq!(store.data_path(), PathBuf::from("/srv/metrics/saas-data.json"));
    }
}
