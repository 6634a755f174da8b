//! Concurrent detail resolution for a whole favorites set.

use std::collections::HashMap;
use std::future::Future;

use tokio::task::{Id, JoinSet};

use crate::api::client::PokeApiClient;
use crate::api::error::ApiError;
use crate::api::models::PokemonDetails;
use crate::cancel::CancelToken;
use crate::favorites::FavoriteSet;

/// Outcome of resolving a favorites set.
///
/// Both lists keep the order of the input set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FavoriteDetails {
    pub details: Vec<PokemonDetails>,
    /// Names whose lookup failed. They are simply absent from `details`.
    pub failed: Vec<String>,
}

impl FavoriteDetails {
    pub fn get(&self, name: &str) -> Option<&PokemonDetails> {
        self.details.iter().find(|d| d.name == name)
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

impl PokeApiClient {
    /// Fetch every favorite concurrently.
    ///
    /// A failing lookup is logged and skipped; it never fails the batch.
    /// The only error is `ApiError::Cancelled`, returned as soon as `cancel`
    /// fires, with all outstanding requests aborted.
    pub async fn resolve_favorites(
        &self,
        favorites: &FavoriteSet,
        cancel: &CancelToken,
    ) -> Result<FavoriteDetails, ApiError> {
        resolve_each(favorites, cancel, |name| {
            let client = self.clone();
            async move { client.fetch_pokemon(&name).await }
        })
        .await
    }
}

async fn resolve_each<F, Fut>(
    favorites: &FavoriteSet,
    cancel: &CancelToken,
    fetch: F,
) -> Result<FavoriteDetails, ApiError>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<PokemonDetails, ApiError>> + Send + 'static,
{
    if cancel.is_cancelled() {
        return Err(ApiError::Cancelled);
    }

    let mut tasks = JoinSet::new();
    let mut pending: HashMap<Id, (usize, String)> = HashMap::new();
    for (index, name) in favorites.iter().enumerate() {
        let handle = tasks.spawn(fetch(name.to_string()));
        pending.insert(handle.id(), (index, name.to_string()));
    }

    let mut resolved: Vec<Option<PokemonDetails>> = vec![None; favorites.len()];
    let mut failed: Vec<(usize, String)> = Vec::new();

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            joined = tasks.join_next_with_id() => Some(joined),
        };

        let Some(next) = next else {
            tracing::debug!(pending = tasks.len(), "Favorite resolution cancelled");
            tasks.abort_all();
            return Err(ApiError::Cancelled);
        };
        let Some(joined) = next else { break };

        let (id, result) = match joined {
            Ok((id, result)) => (id, result.map_err(|e| e.to_string())),
            Err(e) => (e.id(), Err(format!("task did not complete: {}", e))),
        };
        let Some((index, name)) = pending.remove(&id) else {
            continue;
        };

        match result {
            Ok(details) => resolved[index] = Some(details),
            Err(error) => {
                tracing::warn!(pokemon = %name, %error, "Failed to fetch details");
                failed.push((index, name));
            }
        }
    }

    failed.sort_by_key(|(index, _)| *index);

    Ok(FavoriteDetails {
        details: resolved.into_iter().flatten().collect(),
        failed: failed.into_iter().map(|(_, name)| name).collect(),
    })
}
