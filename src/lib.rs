//! PokeAPI catalog client with locally persisted, cross-view synchronized
//! favorites.

pub mod api;
pub mod cancel;
pub mod config;
pub mod favorites;
pub mod logging;
pub mod mvi;
pub mod storage;
