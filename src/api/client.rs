use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::api::error::ApiError;
use crate::api::models::{NamedResource, NamedResourceList, PokemonDetails};
use crate::config::ApiConfig;

/// Read-only PokeAPI client.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct PokeApiClient {
    client: Client,
    base_url: String,
    base: Url,
    page_size: u32,
    search_limit: u32,
}

impl PokeApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(u64::from(config.connect_timeout_seconds)))
            .timeout(Duration::from_secs(u64::from(config.timeout_seconds)))
            .build()
            .map_err(ApiError::Client)?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        let base = Url::parse(&base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| ApiError::InvalidBaseUrl {
                url: base_url.clone(),
            })?;

        Ok(Self {
            client,
            base_url,
            base,
            page_size: config.page_size,
            search_limit: config.search_limit,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Detail URL for `name`, which always stays a single path segment.
    pub fn pokemon_url(&self, name: &str) -> String {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("pokemon").push(name);
        }
        url.into()
    }

    /// URL of the first list page.
    pub fn first_page_url(&self) -> String {
        format!("{}/pokemon?limit={}", self.base_url, self.page_size)
    }

    /// `GET /pokemon/{name}`.
    pub async fn fetch_pokemon(&self, name: &str) -> Result<PokemonDetails, ApiError> {
        self.get_json(&self.pokemon_url(name)).await
    }

    /// Fetch a detail record by its absolute resource URL.
    pub async fn fetch_pokemon_at(&self, url: &str) -> Result<PokemonDetails, ApiError> {
        self.get_json(url).await
    }

    /// Names containing `term`, case-insensitively.
    ///
    /// Downloads the name index once per call. An empty term returns
    /// nothing without touching the network.
    pub async fn search(&self, term: &str) -> Result<Vec<NamedResource>, ApiError> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/pokemon?limit={}", self.base_url, self.search_limit);
        let index: NamedResourceList = self.get_json(&url).await?;

        Ok(index
            .results
            .into_iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .collect())
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::Request {
                url: url.to_string(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.json::<T>().await.map_err(|e| ApiError::Decode {
            url: url.to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_built_from_trimmed_base() {
        let config = ApiConfig {
            base_url: "http://localhost:9000/api/v2/".to_string(),
            page_size: 10,
            ..ApiConfig::default()
        };
        let client = PokeApiClient::new(&config).unwrap();

        assert_eq!(client.base_url(), "http://localhost:9000/api/v2");
        assert_eq!(
            client.pokemon_url("pikachu"),
            "http://localhost:9000/api/v2/pokemon/pikachu"
        );
        assert_eq!(
            client.first_page_url(),
            "http://localhost:9000/api/v2/pokemon?limit=10"
        );
    }

    #[test]
    fn names_cannot_escape_the_pokemon_path() {
        let config = ApiConfig {
            base_url: "http://localhost:9000/api/v2".to_string(),
            ..ApiConfig::default()
        };
        let client = PokeApiClient::new(&config).unwrap();

        assert_eq!(
            client.pokemon_url("../type/fire"),
            "http://localhost:9000/api/v2/pokemon/..%2Ftype%2Ffire"
        );
        assert_eq!(
            client.pokemon_url("mr mime?"),
            "http://localhost:9000/api/v2/pokemon/mr%20mime%3F"
        );
    }

    #[test]
    fn unparseable_base_url_is_rejected() {
        let config = ApiConfig {
            base_url: "not a url".to_string(),
            ..ApiConfig::default()
        };
        assert!(matches!(
            PokeApiClient::new(&config),
            Err(ApiError::InvalidBaseUrl { .. })
        ));
    }

    #[tokio::test]
    async fn empty_search_term_skips_request() {
        let config = ApiConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            ..ApiConfig::default()
        };
        let client = PokeApiClient::new(&config).unwrap();
        assert!(client.search("   ").await.unwrap().is_empty());
    }
}
