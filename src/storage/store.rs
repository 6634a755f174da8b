//! The favorites persistence boundary.
//!
//! `save` and `load` never fail from the caller's point of view. Every
//! medium error is logged and degraded: writes fall back to the cookie,
//! reads fall back to the cookie and then to an empty set.
//!
//! Concurrent writers (other processes sharing the same data dir) are not
//! coordinated. The last write wins.

use std::sync::Arc;

use crate::config::StorageConfig;
use crate::favorites::FavoriteSet;

use super::cookie::CookieJar;
use super::local::LocalStorage;
use super::medium::StorageMedium;

/// Fixed key of the favorites record in both media.
pub const FAVORITES_KEY: &str = "pokemon-favorites";

#[derive(Clone)]
struct Media {
    primary: Arc<dyn StorageMedium>,
    secondary: Arc<dyn StorageMedium>,
}

#[derive(Clone)]
pub struct FavoritesStore {
    media: Option<Media>,
}

impl FavoritesStore {
    pub fn new(primary: Arc<dyn StorageMedium>, secondary: Arc<dyn StorageMedium>) -> Self {
        Self {
            media: Some(Media { primary, secondary }),
        }
    }

    /// A store with no medium attached: loads are empty, saves are dropped.
    pub fn detached() -> Self {
        Self { media: None }
    }

    /// Local-storage file plus cookie jar under the configured data dir.
    pub fn from_config(config: &StorageConfig) -> Self {
        let primary =
            LocalStorage::new(config.local_storage_path()).with_quota(config.quota_bytes);
        let secondary =
            CookieJar::with_max_age_days(config.cookie_jar_path(), config.cookie_max_age_days);
        Self::new(Arc::new(primary), Arc::new(secondary))
    }

    pub fn is_available(&self) -> bool {
        self.media.is_some()
    }

    /// Persist `favorites`, overwriting any previous record.
    pub fn save(&self, favorites: &FavoriteSet) {
        let Some(media) = &self.media else {
            tracing::debug!("No storage medium attached, favorites not saved");
            return;
        };

        let text = match serde_json::to_string(favorites) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize favorites");
                return;
            }
        };

        match media.primary.set_item(FAVORITES_KEY, &text) {
            Ok(()) => {
                tracing::debug!(
                    medium = media.primary.name(),
                    count = favorites.len(),
                    "Favorites saved"
                );
                // A stale fallback record would otherwise resurface if the
                // primary record is lost later.
                if let Err(e) = media.secondary.remove_item(FAVORITES_KEY) {
                    tracing::debug!(error = %e, "Failed to clear fallback favorites");
                }
            }
            Err(e) => {
                tracing::warn!(
                    medium = media.primary.name(),
                    error = %e,
                    "Error saving favorites, falling back to cookie"
                );
                if let Err(e) = media.primary.remove_item(FAVORITES_KEY) {
                    tracing::debug!(error = %e, "Failed to clear stale primary favorites");
                }
                if let Err(e) = media.secondary.set_item(FAVORITES_KEY, &text) {
                    tracing::warn!(
                        medium = media.secondary.name(),
                        error = %e,
                        "Fallback save failed, favorites not persisted"
                    );
                }
            }
        }
    }

    /// Read the persisted favorites. Never fails; degrades to an empty set.
    pub fn load(&self) -> FavoriteSet {
        let Some(media) = &self.media else {
            tracing::debug!("No storage medium attached, using empty favorites");
            return FavoriteSet::new();
        };

        if let Some(text) = read_record(media.primary.as_ref()) {
            return parse_record(&text, media.primary.name()).unwrap_or_default();
        }

        if let Some(text) = read_record(media.secondary.as_ref()) {
            return match parse_record(&text, media.secondary.name()) {
                Some(favorites) => {
                    migrate_to_primary(media, &text);
                    favorites
                }
                None => FavoriteSet::new(),
            };
        }

        FavoriteSet::new()
    }
}

fn read_record(medium: &dyn StorageMedium) -> Option<String> {
    match medium.get_item(FAVORITES_KEY) {
        Ok(Some(text)) if !text.trim().is_empty() => Some(text),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!(medium = medium.name(), error = %e, "Error loading favorites");
            None
        }
    }
}

fn parse_record(text: &str, medium: &str) -> Option<FavoriteSet> {
    match serde_json::from_str::<FavoriteSet>(text) {
        Ok(favorites) => Some(favorites),
        Err(e) => {
            tracing::warn!(medium, error = %e, "Stored favorites are malformed, ignoring");
            None
        }
    }
}

/// Move a record served from the cookie back into the primary medium.
fn migrate_to_primary(media: &Media, text: &str) {
    match media.primary.set_item(FAVORITES_KEY, text) {
        Ok(()) => {
            tracing::debug!("Migrated fallback favorites into primary storage");
            if let Err(e) = media.secondary.remove_item(FAVORITES_KEY) {
                tracing::debug!(error = %e, "Failed to clear migrated fallback favorites");
            }
        }
        Err(e) => {
            tracing::debug!(error = %e, "Primary storage still unavailable, keeping fallback");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn memory_store() -> (FavoritesStore, MemoryStorage, MemoryStorage) {
        let primary = MemoryStorage::new();
        let secondary = MemoryStorage::new();
        let store = FavoritesStore::new(Arc::new(primary.clone()), Arc::new(secondary.clone()));
        (store, primary, secondary)
    }

    fn set(names: &[&str]) -> FavoriteSet {
        names.iter().copied().collect()
    }

    #[test]
    fn empty_store_loads_empty_set() {
        let (store, _, _) = memory_store();
        assert!(store.load().is_empty());
    }

    #[test]
    fn save_writes_json_array_under_fixed_key() {
        let (store, primary, _) = memory_store();
        store.save(&set(&["pikachu", "eevee"]));
        assert_eq!(
            primary.raw(FAVORITES_KEY).as_deref(),
            Some(r#"["pikachu","eevee"]"#)
        );
    }

    #[test]
    fn failed_primary_write_goes_to_cookie() {
        let (store, primary, secondary) = memory_store();
        primary.set_fail_writes(true);

        store.save(&set(&["mew"]));

        assert_eq!(primary.raw(FAVORITES_KEY), None);
        assert_eq!(secondary.raw(FAVORITES_KEY).as_deref(), Some(r#"["mew"]"#));
    }

    #[test]
    fn failed_primary_write_clears_stale_primary_record() {
        let (store, primary, _) = memory_store();
        store.save(&set(&["old"]));
        primary.set_fail_writes(true);

        store.save(&set(&["old", "new"]));

        assert_eq!(store.load(), set(&["old", "new"]));
    }

    #[test]
    fn empty_primary_value_falls_through_to_cookie() {
        let (store, primary, secondary) = memory_store();
        primary.insert_raw(FAVORITES_KEY, "");
        secondary.insert_raw(FAVORITES_KEY, r#"["ditto"]"#);
        primary.set_fail_writes(true);

        assert_eq!(store.load(), set(&["ditto"]));
    }

    #[test]
    fn cookie_record_is_migrated_when_primary_recovers() {
        let (store, primary, secondary) = memory_store();
        secondary.insert_raw(FAVORITES_KEY, r#"["snorlax"]"#);

        assert_eq!(store.load(), set(&["snorlax"]));
        assert_eq!(primary.raw(FAVORITES_KEY).as_deref(), Some(r#"["snorlax"]"#));
        assert_eq!(secondary.raw(FAVORITES_KEY), None);
    }

    #[test]
    fn failed_migration_keeps_cookie() {
        let (store, primary, secondary) = memory_store();
        secondary.insert_raw(FAVORITES_KEY, r#"["snorlax"]"#);
        primary.set_fail_writes(true);

        assert_eq!(store.load(), set(&["snorlax"]));
        assert!(secondary.raw(FAVORITES_KEY).is_some());
    }

    #[test]
    fn malformed_record_loads_empty_without_overwrite() {
        let (store, primary, _) = memory_store();
        primary.insert_raw(FAVORITES_KEY, "{not json");

        assert!(store.load().is_empty());
        assert_eq!(primary.raw(FAVORITES_KEY).as_deref(), Some("{not json"));
    }

    #[test]
    fn successful_save_clears_fallback_cookie() {
        let (store, _, secondary) = memory_store();
        secondary.insert_raw(FAVORITES_KEY, r#"["stale"]"#);

        store.save(&set(&["fresh"]));

        assert_eq!(secondary.raw(FAVORITES_KEY), None);
        assert_eq!(store.load(), set(&["fresh"]));
    }

    #[test]
    fn detached_store_is_inert() {
        let store = FavoritesStore::detached();
        assert!(!store.is_available());
        store.save(&set(&["pikachu"]));
        assert!(store.load().is_empty());
    }
}
