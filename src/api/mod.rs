//! PokeAPI access: single records, favorites batches, paging and search.

mod batch;
mod client;
mod error;
mod models;
mod pagination;

pub use batch::FavoriteDetails;
pub use client::PokeApiClient;
pub use error::ApiError;
pub use models::{
    display_name, format_stat_name, AbilitySlot, Artwork, NamedRef, NamedResource,
    NamedResourceList, OtherSprites, PokemonDetails, PokemonSummary, PokemonTypeSlot, Sprites,
    StatEntry,
};
pub use pagination::{Paginator, PokemonPage};
