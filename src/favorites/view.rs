//! A mounted favorites view.
//!
//! Every view owns its own copy of the favorites set. Views never share
//! memory; they stay consistent through the store plus change pulses on
//! the `ChangeChannel`:
//!
//! ```text
//! view A: toggle ──→ save ──→ notify ─┐
//!                                     ▼
//! view B:              poll_changes / changed ──→ load ──→ re-render
//! ```
//!
//! A toggle always starts from the stored set, never from a possibly
//! outdated local copy, and absorbs any pulses already queued for the view.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use uuid::Uuid;

use crate::api::{display_name, ApiError, FavoriteDetails, PokeApiClient, PokemonDetails};
use crate::cancel::CancelToken;
use crate::favorites::channel::{ChangeChannel, ChangePulse};
use crate::favorites::state::{FavoritesIntent, FavoritesReducer, FavoritesState};
use crate::favorites::FavoriteSet;
use crate::mvi::Reducer;
use crate::storage::FavoritesStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteChange {
    Added,
    Removed,
}

/// Result of a membership change, with the user-facing notice for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ToggleOutcome {
    pub name: String,
    pub change: FavoriteChange,
    /// The view's set after the change.
    pub favorites: Arc<FavoriteSet>,
}

impl ToggleOutcome {
    pub fn title(&self) -> &'static str {
        match self.change {
            FavoriteChange::Added => "Added to favorites",
            FavoriteChange::Removed => "Removed from favorites",
        }
    }

    pub fn description(&self) -> String {
        let verb = match self.change {
            FavoriteChange::Added => "added to",
            FavoriteChange::Removed => "removed from",
        };
        format!("{} has been {} your favorites.", display_name(&self.name), verb)
    }
}

/// Outcome of `FavoritesView::refresh_details`.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailsRefresh {
    /// Nothing to fetch: the view is not hydrated or has no favorites.
    Disabled,
    /// Results were stored in the view.
    Applied(FavoriteDetails),
    /// The set changed while fetching; results were discarded.
    Stale,
    /// The view was unmounted; results were discarded.
    Cancelled,
}

struct ViewInner {
    state: FavoritesState,
    details: Vec<PokemonDetails>,
    /// Pulses this view emitted that its own receiver has not drained yet.
    own_pulses: usize,
}

impl ViewInner {
    /// Drain queued pulses, skipping the ones this view emitted.
    ///
    /// Returns true if any pulse came from another view or pulses were lost.
    fn drain_pulses(
        &mut self,
        receiver: &mut broadcast::Receiver<ChangePulse>,
        view: Uuid,
    ) -> bool {
        let mut foreign = false;
        loop {
            match receiver.try_recv() {
                Ok(ChangePulse) => {
                    if !self.consume_own_pulse() {
                        foreign = true;
                    }
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::debug!(%view, skipped, "Change pulses lagged");
                    self.own_pulses = 0;
                    foreign = true;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return foreign,
            }
        }
    }

    fn consume_own_pulse(&mut self) -> bool {
        if self.own_pulses > 0 {
            self.own_pulses -= 1;
            true
        } else {
            false
        }
    }

    fn apply(&mut self, intent: FavoritesIntent) {
        self.state = FavoritesReducer::reduce(std::mem::take(&mut self.state), intent);
        if let Some(favorites) = self.state.favorites().cloned() {
            self.details.retain(|d| favorites.contains(&d.name));
        }
    }
}

pub struct FavoritesView {
    id: Uuid,
    store: FavoritesStore,
    channel: ChangeChannel,
    receiver: Mutex<broadcast::Receiver<ChangePulse>>,
    inner: Mutex<ViewInner>,
    cancel: CancelToken,
}

impl FavoritesView {
    /// Subscribe to `channel` and hydrate from `store` if it has a medium.
    pub fn mount(store: FavoritesStore, channel: ChangeChannel) -> Self {
        let receiver = channel.subscribe();
        let view = Self {
            id: Uuid::new_v4(),
            store,
            channel,
            receiver: Mutex::new(receiver),
            inner: Mutex::new(ViewInner {
                state: FavoritesState::Uninitialized,
                details: Vec::new(),
                own_pulses: 0,
            }),
            cancel: CancelToken::new(),
        };
        let hydrated = view.hydrate();
        tracing::debug!(view = %view.id, hydrated, "Favorites view mounted");
        view
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> FavoritesState {
        self.inner.lock().state.clone()
    }

    /// Current set, or `None` while uninitialized.
    pub fn favorites(&self) -> Option<Arc<FavoriteSet>> {
        self.inner.lock().state.favorites().cloned()
    }

    /// Affordance state for `name`; `None` while uninitialized.
    pub fn is_favorite(&self, name: &str) -> Option<bool> {
        self.inner
            .lock()
            .state
            .favorites()
            .map(|favorites| favorites.contains(name))
    }

    /// (Re)load local memory from the store.
    ///
    /// Returns false, leaving the state untouched, when the store has no
    /// medium attached.
    pub fn hydrate(&self) -> bool {
        if !self.store.is_available() {
            return false;
        }
        let mut inner = self.inner.lock();
        let favorites = self.store.load();
        inner.apply(FavoritesIntent::Hydrate { favorites });
        true
    }

    /// Add `name` if absent, remove it if present.
    ///
    /// Persists the new set and pulses the channel. `None` only when the
    /// store has no medium, in which case nothing changes.
    pub fn toggle(&self, name: &str) -> Option<ToggleOutcome> {
        self.update(name, None)
    }

    /// Add `name`. `None` if it is already a favorite.
    pub fn add(&self, name: &str) -> Option<ToggleOutcome> {
        self.update(name, Some(true))
    }

    /// Remove `name`. `None` if it is not a favorite.
    pub fn remove(&self, name: &str) -> Option<ToggleOutcome> {
        self.update(name, Some(false))
    }

    fn update(&self, name: &str, want: Option<bool>) -> Option<ToggleOutcome> {
        if !self.store.is_available() {
            return None;
        }

        // Lock order: inner, then receiver.
        let mut inner = self.inner.lock();
        if inner.drain_pulses(&mut self.receiver.lock(), self.id) {
            tracing::debug!(view = %self.id, "Pending changes from other views absorbed");
        }
        let favorites = self.store.load();
        inner.apply(FavoritesIntent::Hydrate { favorites });

        let present = inner
            .state
            .favorites()
            .is_some_and(|favorites| favorites.contains(name));
        if want == Some(present) {
            return None;
        }

        inner.apply(FavoritesIntent::Toggle {
            name: name.to_string(),
        });
        let favorites = inner.state.favorites().cloned().unwrap_or_default();
        self.store.save(&favorites);
        inner.own_pulses += 1;
        drop(inner);

        let receivers = self.channel.notify();
        let change = if present {
            FavoriteChange::Removed
        } else {
            FavoriteChange::Added
        };
        tracing::info!(
            view = %self.id,
            pokemon = name,
            ?change,
            count = favorites.len(),
            receivers,
            "Favorites updated"
        );

        Some(ToggleOutcome {
            name: name.to_string(),
            change,
            favorites,
        })
    }

    /// Drain pending pulses without waiting.
    ///
    /// Re-hydrates once if any pulse came from another view, and reports
    /// whether it did.
    pub fn poll_changes(&mut self) -> bool {
        let receiver = self.receiver.get_mut();
        let foreign = self.inner.lock().drain_pulses(receiver, self.id);
        if foreign {
            self.hydrate();
        }
        foreign
    }

    /// Wait for the next pulse from another view, then re-hydrate.
    ///
    /// Returns false once the view is unmounted or the channel is gone.
    pub async fn changed(&mut self) -> bool {
        loop {
            if self.cancel.is_cancelled() {
                return false;
            }

            let received = tokio::select! {
                received = self.receiver.get_mut().recv() => received,
                _ = self.cancel.cancelled() => return false,
            };

            match received {
                Ok(ChangePulse) => {
                    if self.inner.lock().consume_own_pulse() {
                        continue;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(view = %self.id, skipped, "Change pulses lagged");
                    self.inner.lock().own_pulses = 0;
                }
                Err(RecvError::Closed) => return false,
            }

            self.hydrate();
            return true;
        }
    }

    /// The set that derived detail data is keyed on.
    ///
    /// `None` while uninitialized or empty: no fetch should be issued.
    pub fn details_key(&self) -> Option<Arc<FavoriteSet>> {
        self.details_snapshot().map(|(favorites, _)| favorites)
    }

    fn details_snapshot(&self) -> Option<(Arc<FavoriteSet>, u64)> {
        match &self.inner.lock().state {
            FavoritesState::Hydrated {
                favorites,
                generation,
            } if !favorites.is_empty() => Some((favorites.clone(), *generation)),
            _ => None,
        }
    }

    /// Detail records resolved by the last applied refresh, pruned to the
    /// current set.
    pub fn details(&self) -> Vec<PokemonDetails> {
        self.inner.lock().details.clone()
    }

    /// Resolve details for the current set and store them in the view.
    ///
    /// Results are applied only if the view is still mounted and its set
    /// did not change while the requests were in flight.
    pub async fn refresh_details(&self, client: &PokeApiClient) -> Result<DetailsRefresh, ApiError> {
        let Some((favorites, generation)) = self.details_snapshot() else {
            self.inner.lock().details.clear();
            return Ok(DetailsRefresh::Disabled);
        };

        let resolved = match client.resolve_favorites(&favorites, &self.cancel).await {
            Ok(resolved) => resolved,
            Err(ApiError::Cancelled) => return Ok(DetailsRefresh::Cancelled),
            Err(e) => return Err(e),
        };

        let mut inner = self.inner.lock();
        if self.cancel.is_cancelled() {
            return Ok(DetailsRefresh::Cancelled);
        }
        if inner.state.generation() != Some(generation) {
            tracing::debug!(view = %self.id, "Favorites changed during fetch, discarding details");
            return Ok(DetailsRefresh::Stale);
        }

        inner.details = resolved.details.clone();
        Ok(DetailsRefresh::Applied(resolved))
    }

    /// Handle for cancelling this view's in-flight work from elsewhere.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn is_mounted(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Detach the view: in-flight detail fetches stop and are discarded.
    pub fn unmount(&self) {
        if !self.cancel.is_cancelled() {
            tracing::debug!(view = %self.id, "Favorites view unmounted");
        }
        self.cancel.cancel();
    }
}

impl Drop for FavoritesView {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
