use std::sync::Arc;

use crate::favorites::FavoriteSet;
use crate::mvi::{Intent, Reducer, ViewState};

/// Per-view favorites state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FavoritesState {
    /// Not hydrated yet. Callers render a placeholder, not "no favorites".
    #[default]
    Uninitialized,
    Hydrated {
        favorites: Arc<FavoriteSet>,
        /// Bumped whenever `favorites` changes value.
        generation: u64,
    },
}

impl ViewState for FavoritesState {}

impl FavoritesState {
    pub fn is_hydrated(&self) -> bool {
        matches!(self, Self::Hydrated { .. })
    }

    pub fn favorites(&self) -> Option<&Arc<FavoriteSet>> {
        match self {
            Self::Hydrated { favorites, .. } => Some(favorites),
            Self::Uninitialized => None,
        }
    }

    pub fn generation(&self) -> Option<u64> {
        match self {
            Self::Hydrated { generation, .. } => Some(*generation),
            Self::Uninitialized => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum FavoritesIntent {
    /// Replace local memory with what the store returned.
    Hydrate { favorites: FavoriteSet },
    /// Add `name` if absent, remove it if present.
    Toggle { name: String },
}

impl Intent for FavoritesIntent {}

pub struct FavoritesReducer;

impl Reducer for FavoritesReducer {
    type State = FavoritesState;
    type Intent = FavoritesIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            FavoritesIntent::Hydrate { favorites } => match state {
                // Same value: keep the existing Arc so nothing downstream
                // sees a spurious change.
                FavoritesState::Hydrated {
                    favorites: current,
                    generation,
                } if *current == favorites => FavoritesState::Hydrated {
                    favorites: current,
                    generation,
                },
                FavoritesState::Hydrated { generation, .. } => FavoritesState::Hydrated {
                    favorites: Arc::new(favorites),
                    generation: generation + 1,
                },
                FavoritesState::Uninitialized => FavoritesState::Hydrated {
                    favorites: Arc::new(favorites),
                    generation: 0,
                },
            },
            FavoritesIntent::Toggle { name } => match state {
                FavoritesState::Hydrated {
                    favorites,
                    generation,
                } => {
                    let next = if favorites.contains(&name) {
                        favorites.without(&name)
                    } else {
                        favorites.with(&name)
                    };
                    FavoritesState::Hydrated {
                        favorites: Arc::new(next),
                        generation: generation + 1,
                    }
                }
                // Toggling before hydration would clobber unseen data.
                other => other,
            },
        }
    }
}
