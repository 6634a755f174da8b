//! Paged catalog browsing.

use tokio::task::JoinSet;

use crate::api::client::PokeApiClient;
use crate::api::error::ApiError;
use crate::api::models::{NamedResourceList, PokemonSummary};

/// One list page with each entry resolved to a summary.
#[derive(Debug, Clone, PartialEq)]
pub struct PokemonPage {
    pub pokemons: Vec<PokemonSummary>,
    pub next_page: Option<String>,
}

impl PokeApiClient {
    /// Fetch the list page at `url`, then every entry's detail concurrently.
    ///
    /// The list request itself must succeed. Entries whose detail request
    /// fails are dropped from the page with a warning.
    pub async fn fetch_page(&self, url: &str) -> Result<PokemonPage, ApiError> {
        let list: NamedResourceList = self.get_json(url).await?;

        let mut tasks = JoinSet::new();
        for (index, entry) in list.results.into_iter().enumerate() {
            let client = self.clone();
            tasks.spawn(async move {
                let result = client.fetch_pokemon_at(&entry.url).await;
                (index, entry.name, result)
            });
        }

        let mut entries: Vec<(usize, PokemonSummary)> = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, _, Ok(details))) => entries.push((index, details.summary())),
                Ok((_, name, Err(e))) => {
                    tracing::warn!(pokemon = %name, error = %e, "Skipping list entry");
                }
                Err(e) => tracing::warn!(error = %e, "List entry task did not complete"),
            }
        }
        entries.sort_by_key(|(index, _)| *index);

        Ok(PokemonPage {
            pokemons: entries.into_iter().map(|(_, summary)| summary).collect(),
            next_page: list.next,
        })
    }
}

/// Accumulates pages the way an infinite-scroll list does.
pub struct Paginator {
    client: PokeApiClient,
    pages: Vec<PokemonPage>,
    next_url: Option<String>,
}

impl Paginator {
    pub fn new(client: PokeApiClient) -> Self {
        let next_url = Some(client.first_page_url());
        Self {
            client,
            pages: Vec::new(),
            next_url,
        }
    }

    pub fn has_next_page(&self) -> bool {
        self.next_url.is_some()
    }

    /// Fetch and append the next page. `Ok(None)` once the list is exhausted.
    ///
    /// On error nothing is recorded, so the same page can be retried.
    pub async fn fetch_next_page(&mut self) -> Result<Option<&PokemonPage>, ApiError> {
        let Some(url) = self.next_url.clone() else {
            return Ok(None);
        };

        let page = self.client.fetch_page(&url).await?;
        self.next_url = page.next_page.clone();
        self.pages.push(page);
        Ok(self.pages.last())
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Every entry fetched so far, in list order.
    pub fn pokemons(&self) -> impl Iterator<Item = &PokemonSummary> {
        self.pages.iter().flat_map(|page| page.pokemons.iter())
    }
}
