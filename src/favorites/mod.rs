//! Favorites synchronization layer.
//!
//! - `FavoriteSet`: the ordered, duplicate-free list of names
//! - `ChangeChannel`: page-wide broadcast of change pulses
//! - `FavoritesState` / `FavoritesReducer`: per-view state machine
//! - `FavoritesView`: a mounted view driving the reducer and its effects

mod channel;
mod set;
mod state;
mod view;

pub use channel::{ChangeChannel, ChangePulse};
pub use set::FavoriteSet;
pub use state::{FavoritesIntent, FavoritesReducer, FavoritesState};
pub use view::{DetailsRefresh, FavoriteChange, FavoritesView, ToggleOutcome};
