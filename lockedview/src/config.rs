//! Runtime settings loaded via OrthoConfig.

use std::path::PathBuf;

use ortho_config::OrthoConfig;
use pagination::DEFAULT_PAGE_SIZE;
use serde::Deserialize;

use crate::domain::IDENTITY_STORAGE_KEY;

const DEFAULT_DATA_DIR: &str = ".lockedview";

/// Settings for the identity store and pagination.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "LOCKEDVIEW")]
pub struct LockedViewSettings {
    /// Directory holding the file-backed store.
    pub data_dir: Option<PathBuf>,
    /// Key the identity record is stored under.
    pub storage_key: Option<String>,
    /// Items per page assumed when rendering pagination; zero means the
    /// default.
    #[ortho_config(default = 20)]
    pub page_size: u64,
}

impl LockedViewSettings {
    /// Return the configured data directory, falling back to the default.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
    }

    /// Return the configured storage key, falling back to the default.
    pub fn storage_key(&self) -> &str {
        self.storage_key.as_deref().unwrap_or(IDENTITY_STORAGE_KEY)
    }

    /// Return the configured page size, treating zero as the default.
    pub fn page_size(&self) -> u64 {
        if self.page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            self.page_size
        }
    }
}
