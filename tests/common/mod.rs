//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod mock_api;

use pokefav::api::PokeApiClient;
use pokefav::config::{ApiConfig, StorageConfig};
use pokefav::favorites::{ChangeChannel, FavoriteSet, FavoritesView};
use pokefav::storage::{FavoritesStore, MemoryStorage};
use std::sync::Arc;
use tempfile::TempDir;

/// Store over two in-memory media; the media handles stay usable for
/// seeding and failure injection.
pub fn memory_store() -> (FavoritesStore, MemoryStorage, MemoryStorage) {
    let primary = MemoryStorage::new();
    let secondary = MemoryStorage::new();
    let store = FavoritesStore::new(Arc::new(primary.clone()), Arc::new(secondary.clone()));
    (store, primary, secondary)
}

/// File-backed store rooted in a fresh temp dir.
pub fn file_store(quota_bytes: u64) -> (TempDir, StorageConfig, FavoritesStore) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = StorageConfig {
        data_dir: Some(temp_dir.path().to_path_buf()),
        quota_bytes,
        ..StorageConfig::default()
    };
    let store = FavoritesStore::from_config(&config);
    (temp_dir, config, store)
}

pub fn set(names: &[&str]) -> FavoriteSet {
    names.iter().copied().collect()
}

pub fn mount(store: &FavoritesStore, channel: &ChangeChannel) -> FavoritesView {
    FavoritesView::mount(store.clone(), channel.clone())
}

pub fn client_for(base_url: String) -> PokeApiClient {
    let config = ApiConfig {
        base_url,
        timeout_seconds: 5,
        connect_timeout_seconds: 2,
        page_size: 2,
        search_limit: 1302,
    };
    PokeApiClient::new(&config).expect("Failed to build client")
}
