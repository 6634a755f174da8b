//! PokeAPI response shapes.
//!
//! Only `id` and `name` are required. Everything else defaults when missing
//! or null, so partially populated records still decode.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonDetails {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub types: Vec<PokemonTypeSlot>,
    #[serde(default)]
    pub abilities: Vec<AbilitySlot>,
    #[serde(default)]
    pub stats: Vec<StatEntry>,
    #[serde(default)]
    pub sprites: Option<Sprites>,
}

impl PokemonDetails {
    /// Official artwork URL, if the record has one.
    pub fn artwork_url(&self) -> Option<&str> {
        self.other_sprites()?
            .official_artwork
            .as_ref()?
            .front_default
            .as_deref()
    }

    pub fn dream_world_url(&self) -> Option<&str> {
        self.other_sprites()?
            .dream_world
            .as_ref()?
            .front_default
            .as_deref()
    }

    /// Type names ordered by slot.
    pub fn type_names(&self) -> Vec<&str> {
        let mut slots: Vec<&PokemonTypeSlot> = self.types.iter().collect();
        slots.sort_by_key(|t| t.slot);
        slots.into_iter().map(|t| t.kind.name.as_str()).collect()
    }

    pub fn summary(&self) -> PokemonSummary {
        PokemonSummary {
            id: self.id,
            name: self.name.clone(),
            image: self.artwork_url().map(str::to_string),
        }
    }

    fn other_sprites(&self) -> Option<&OtherSprites> {
        self.sprites.as_ref()?.other.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonTypeSlot {
    pub slot: u32,
    #[serde(rename = "type")]
    pub kind: NamedRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilitySlot {
    pub ability: NamedRef,
    #[serde(default)]
    pub is_hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatEntry {
    pub base_stat: u32,
    pub stat: NamedRef,
}

/// `{ "name": ... }` reference; the accompanying `url` is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sprites {
    #[serde(default)]
    pub other: Option<OtherSprites>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OtherSprites {
    #[serde(rename = "official-artwork", default)]
    pub official_artwork: Option<Artwork>,
    #[serde(default)]
    pub dream_world: Option<Artwork>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Artwork {
    #[serde(default)]
    pub front_default: Option<String>,
}

/// One entry of a list page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonSummary {
    pub id: u32,
    pub name: String,
    pub image: Option<String>,
}

/// `GET /pokemon?limit=N` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedResourceList {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<NamedResource>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

/// Display label for a PokeAPI stat name.
pub fn format_stat_name(stat: &str) -> &str {
    match stat {
        "hp" => "HP",
        "attack" => "Attack",
        "defense" => "Defense",
        "special-attack" => "Sp. Atk",
        "special-defense" => "Sp. Def",
        "speed" => "Speed",
        other => other,
    }
}

/// Name with its first character upper-cased ("pikachu" -> "Pikachu").
pub fn display_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PIKACHU: &str = r#"{
        "id": 25,
        "name": "pikachu",
        "height": 4,
        "weight": 60,
        "types": [{"slot": 1, "type": {"name": "electric", "url": "x"}}],
        "abilities": [{"ability": {"name": "static"}, "is_hidden": false}],
        "stats": [{"base_stat": 35, "effort": 0, "stat": {"name": "hp"}}],
        "sprites": {
            "front_default": "front.png",
            "other": {
                "official-artwork": {"front_default": "art.png"},
                "dream_world": {"front_default": null}
            }
        }
    }"#;

    #[test]
    fn decodes_full_record() {
        let details: PokemonDetails = serde_json::from_str(PIKACHU).unwrap();
        assert_eq!(details.id, 25);
        assert_eq!(details.type_names(), vec!["electric"]);
        assert_eq!(details.artwork_url(), Some("art.png"));
        assert_eq!(details.dream_world_url(), None);
        assert_eq!(details.stats[0].base_stat, 35);
    }

    #[test]
    fn decodes_record_without_optional_fields() {
        let details: PokemonDetails =
            serde_json::from_str(r#"{"id": 1, "name": "bulbasaur"}"#).unwrap();
        assert!(details.types.is_empty());
        assert_eq!(details.artwork_url(), None);
        assert_eq!(details.summary().image, None);
    }

    #[test]
    fn type_names_follow_slot_order() {
        let details: PokemonDetails = serde_json::from_str(
            r#"{"id": 1, "name": "bulbasaur", "types": [
                {"slot": 2, "type": {"name": "poison"}},
                {"slot": 1, "type": {"name": "grass"}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(details.type_names(), vec!["grass", "poison"]);
    }

    #[test]
    fn stat_names_are_formatted() {
        assert_eq!(format_stat_name("special-attack"), "Sp. Atk");
        assert_eq!(format_stat_name("hp"), "HP");
        assert_eq!(format_stat_name("accuracy"), "accuracy");
    }

    #[test]
    fn display_name_capitalizes_first_letter() {
        assert_eq!(display_name("pikachu"), "Pikachu");
        assert_eq!(display_name(""), "");
    }
}
