use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Remote data API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the PokeAPI (e.g., "https://pokeapi.co/api/v2").
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Total request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Connection timeout in seconds (default: 5).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u32,
    /// Entries per list page (default: 20).
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Size of the name index fetched for search (default: 1302).
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,
}

/// Favorites persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the local-storage and cookie files.
    /// Defaults to `dirs::data_dir()/pokefav`.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Byte quota of the primary medium (default: 5 MiB).
    #[serde(default = "default_quota_bytes")]
    pub quota_bytes: u64,
    /// Lifetime of the fallback cookie in days (default: 30).
    #[serde(default = "default_cookie_max_age_days")]
    pub cookie_max_age_days: u32,
    /// Buffered change notifications per view (default: 16).
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_base_url() -> String {
    "https://pokeapi.co/api/v2".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_connect_timeout() -> u32 {
    5
}

fn default_page_size() -> u32 {
    20
}

fn default_search_limit() -> u32 {
    1302
}

fn default_quota_bytes() -> u64 {
    5 * 1024 * 1024
}

fn default_cookie_max_age_days() -> u32 {
    30
}

fn default_channel_capacity() -> usize {
    16
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
            page_size: default_page_size(),
            search_limit: default_search_limit(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            quota_bytes: default_quota_bytes(),
            cookie_max_age_days: default_cookie_max_age_days(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

impl StorageConfig {
    /// Resolve the data directory, falling back to the platform data dir.
    pub fn resolved_data_dir(&self) -> PathBuf {
        match &self.data_dir {
            Some(dir) => dir.clone(),
            None => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("pokefav"),
        }
    }

    /// Path of the primary (local-storage) file.
    pub fn local_storage_path(&self) -> PathBuf {
        self.resolved_data_dir().join("local_storage.json")
    }

    /// Path of the fallback cookie jar.
    pub fn cookie_jar_path(&self) -> PathBuf {
        self.resolved_data_dir().join("cookies.json")
    }
}
