use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by a persistence medium.
///
/// These never cross the `FavoritesStore` boundary; the store logs them
/// and degrades (fallback write, empty load).
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O failed for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Storage file '{path}' is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: u64, quota: u64 },

    #[error("Storage unavailable: {reason}")]
    Unavailable { reason: String },
}

/// A string key-value persistence medium.
///
/// Mirrors the browser storage contract: reads return `None` for absent
/// keys, writes overwrite, removing an absent key succeeds.
pub trait StorageMedium: Send + Sync {
    /// Short label used in log output.
    fn name(&self) -> &'static str;

    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}
