//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into the registry and
//! the ER queue. The core itself never reads environment variables.

use crate::constants::{DEFAULT_DATA_DIR, ER_QUEUE_FILE_NAME, PATIENTS_FILE_NAME};
use crate::{RecordError, RecordResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// The directory does not need to exist yet; it is created on the first save.
    /// It must not be an existing regular file.
    pub fn new(data_dir: PathBuf) -> RecordResult<Self> {
        if data_dir.as_os_str().is_empty() {
            return Err(RecordError::InvalidInput("data_dir cannot be empty".into()));
        }
        if data_dir.is_file() {
            return Err(RecordError::InvalidInput(format!(
                "data_dir {} is a file, not a directory",
                data_dir.display()
            )));
        }

        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn patients_file(&self) -> PathBuf {
        self.data_dir.join(PATIENTS_FILE_NAME)
    }

    pub fn er_queue_file(&self) -> PathBuf {
        self.data_dir.join(ER_QUEUE_FILE_NAME)
    }
}

/// Resolve the data directory from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the current directory.
pub fn data_dir_from_env_value(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_data_dir_defaults_when_unset_or_blank() {
        assert_eq!(data_dir_from_env_value(None), PathBuf::from("."));
        assert_eq!(
            data_dir_from_env_value(Some("   ".into())),
            PathBuf::from(".")
        );
    }

    #[test]
    fn test_data_dir_trims_value() {
        assert_eq!(
            data_dir_from_env_value(Some(" /var/ward ".into())),
            PathBuf::from("/var/ward")
        );
    }

    #[test]
    fn test_config_joins_file_names() {
        let cfg = CoreConfig::new(PathBuf::from("/data")).expect("CoreConfig::new should succeed");
        assert_eq!(cfg.patients_file(), PathBuf::from("/data/patients.txt"));
        assert_eq!(cfg.er_queue_file(), PathBuf::from("/data/erqueue.txt"));
    }

    #[test]
    fn test_config_rejects_regular_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file = temp_dir.path().join("not-a-dir");
        std::fs::write(&file, "").expect("should write file");

        let err = CoreConfig::new(file).expect_err("a file is not a data directory");
        assert!(matches!(err, RecordError::InvalidInput(_)));
    }

    #[test]
    fn test_config_rejects_empty_path() {
        let err = CoreConfig::new(PathBuf::new()).expect_err("empty path should be rejected");
        assert!(matches!(err, RecordError::InvalidInput(_)));
    }
}
