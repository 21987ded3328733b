//! Where the data file lives and how saves are paced

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable selecting the data directory
pub const DATA_DIR_ENV: &str = "SAAS_METRICS_DATA_DIR";

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_FILE_NAME: &str = "saas-data.json";
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub file_name: String,
    /// Quiet period after the last change before the file is written
    pub debounce: Duration,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            file_name: DEFAULT_FILE_NAME.to_string(),
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

impl StorageConfig {
    /// Defaults, with the data directory taken from `SAAS_METRICS_DATA_DIR` if set
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(dir) = env::var_os(DATA_DIR_ENV).filter(|d| !d.is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }
        config
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn file_path(&self) -> PathBuf {
        self.data_dir.join(&self.file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StorageConfig::default();
        assert_eq!(config.file_path(), PathBuf::from("data").join("saas-data.json"));
        assert_eq!(config.debounce, Duration::from_millis(500));
    }

    #[test]
    fn test_with_data_dir() {
        let config = StorageConfig::default().with_data_dir("/tmp/metrics");
        assert_eq!(config.file_path(), PathBuf::from("/tmp/metrics/saas-data.json"));
    }
}
