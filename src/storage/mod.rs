//! Favorites persistence: storage media and the store boundary over them.
//!
//! ```text
//! FavoritesStore ──→ primary   (LocalStorage, quota-bound file)
//!        │
//!        └──────→ secondary (CookieJar, 30-day cookie, used on failure)
//! ```

mod cookie;
mod local;
mod medium;
mod memory;
mod store;

pub use cookie::{Cookie, CookieJar, MAX_COOKIE_BYTES};
pub use local::LocalStorage;
pub use medium::{StorageError, StorageMedium};
pub use memory::MemoryStorage;
pub use store::{FavoritesStore, FAVORITES_KEY};
