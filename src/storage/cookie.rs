//! Expiring cookie jar used as the secondary medium.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use super::medium::{StorageError, StorageMedium};

/// Largest name + value a single cookie may carry.
pub const MAX_COOKIE_BYTES: u64 = 4096;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// A single stored cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub path: String,
    /// Expiry as seconds since the Unix epoch.
    pub expires_at: u64,
}

impl Cookie {
    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.expires_at
    }
}

pub struct CookieJar {
    path: PathBuf,
    max_age: Duration,
}

impl CookieJar {
    pub fn new(path: PathBuf, max_age: Duration) -> Self {
        Self { path, max_age }
    }

    /// Jar whose cookies live for `days` days.
    pub fn with_max_age_days(path: PathBuf, days: u32) -> Self {
        Self::new(path, Duration::from_secs(u64::from(days) * SECONDS_PER_DAY))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All unexpired cookies, in storage order.
    pub fn cookies(&self) -> Result<Vec<Cookie>, StorageError> {
        let now = unix_now();
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|c| !c.is_expired(now))
            .collect())
    }

    fn read_all(&self) -> Result<Vec<Cookie>, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|e| StorageError::Corrupt {
            path: self.path.clone(),
            source: e,
        })
    }

    fn write_all(&self, cookies: &[Cookie]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StorageError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let content = serde_json::to_string_pretty(cookies).map_err(|e| StorageError::Corrupt {
            path: self.path.clone(),
            source: e,
        })?;

        fs::write(&self.path, content).map_err(|e| StorageError::Io {
            path: self.path.clone(),
            source: e,
        })
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

impl StorageMedium for CookieJar {
    fn name(&self) -> &'static str {
        "cookie"
    }

    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let now = unix_now();
        Ok(self
            .read_all()?
            .into_iter()
            .find(|c| c.name == key && !c.is_expired(now))
            .map(|c| c.value))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let needed = (key.len() + value.len()) as u64;
        if needed > MAX_COOKIE_BYTES {
            return Err(StorageError::QuotaExceeded {
                needed,
                quota: MAX_COOKIE_BYTES,
            });
        }

        let now = unix_now();
        let mut cookies: Vec<Cookie> = self
            .read_all()?
            .into_iter()
            .filter(|c| c.name != key && !c.is_expired(now))
            .collect();

        cookies.push(Cookie {
            name: key.to_string(),
            value: value.to_string(),
            path: "/".to_string(),
            expires_at: now + self.max_age.as_secs(),
        });

        self.write_all(&cookies)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let cookies = self.read_all()?;
        if !cookies.iter().any(|c| c.name == key) {
            return Ok(());
        }
        let kept: Vec<Cookie> = cookies.into_iter().filter(|c| c.name != key).collect();
        self.write_all(&kept)
    }
}
