//! Transformation of raw catalog JSON into internal shapes
//!
//! Pure functions over the deserialized external representation:
//! stat-name mapping with a 0 default, type filtering against the fixed
//! 18-value set with a neutral fallback, artwork-preferring image
//! selection, and flavor-text control-character normalization.

use crate::TypeRelations;
use pokefusion_utils::types::{ParentRecord, Stats, TypeTag};
use serde::Deserialize;

/// Raw `/pokemon/{id}` response, trimmed to the fields we use.
#[derive(Debug, Deserialize)]
pub struct RawPokemon {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub weight: u32,
    pub types: Vec<RawTypeSlot>,
    pub stats: Vec<RawStat>,
    pub abilities: Vec<RawAbilitySlot>,
    #[serde(default)]
    pub sprites: RawSprites,
}

#[derive(Debug, Deserialize)]
pub struct RawTypeSlot {
    #[serde(rename = "type")]
    pub type_ref: Named,
}

#[derive(Debug, Deserialize)]
pub struct RawStat {
    pub base_stat: u16,
    pub stat: Named,
}

#[derive(Debug, Deserialize)]
pub struct RawAbilitySlot {
    pub ability: Named,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawSprites {
    pub front_default: Option<String>,
    pub other: Option<RawOtherSprites>,
}

#[derive(Debug, Deserialize)]
pub struct RawOtherSprites {
    #[serde(rename = "official-artwork")]
    pub official_artwork: Option<RawArtwork>,
}

#[derive(Debug, Deserialize)]
pub struct RawArtwork {
    pub front_default: Option<String>,
}

/// A `{"name": ...}` reference, ubiquitous in the catalog's JSON.
#[derive(Debug, Deserialize)]
pub struct Named {
    pub name: String,
}

/// Raw `/pokemon-species/{id}` response, trimmed to taxonomy fields.
#[derive(Debug, Deserialize)]
pub struct RawSpecies {
    #[serde(default)]
    pub is_legendary: bool,
    #[serde(default)]
    pub is_mythical: bool,
    #[serde(default)]
    pub flavor_text_entries: Vec<RawFlavorText>,
    #[serde(default)]
    pub egg_groups: Vec<Named>,
    #[serde(default)]
    pub genera: Vec<RawGenus>,
}

#[derive(Debug, Deserialize)]
pub struct RawFlavorText {
    pub flavor_text: String,
    pub language: Named,
}

#[derive(Debug, Deserialize)]
pub struct RawGenus {
    pub genus: String,
    pub language: Named,
}

/// Raw `/type/{name}` response.
#[derive(Debug, Deserialize)]
pub struct RawTypeResponse {
    pub damage_relations: RawDamageRelations,
}

#[derive(Debug, Deserialize)]
pub struct RawDamageRelations {
    pub double_damage_to: Vec<Named>,
    pub half_damage_to: Vec<Named>,
    pub no_damage_to: Vec<Named>,
    pub double_damage_from: Vec<Named>,
    pub half_damage_from: Vec<Named>,
    pub no_damage_from: Vec<Named>,
}

/// Map the raw attribute record into a [`ParentRecord`].
///
/// Taxonomy fields start unset; [`apply_species`] fills them when the
/// secondary lookup succeeds.
pub fn transform_pokemon(raw: RawPokemon) -> ParentRecord {
    let mut types: Vec<TypeTag> = raw
        .types
        .iter()
        .filter_map(|slot| TypeTag::from_name(&slot.type_ref.name))
        .collect();
    if types.is_empty() {
        // Everything the catalog sent was outside the known set.
        types.push(TypeTag::Normal);
    }

    let stat = |name: &str| {
        raw.stats
            .iter()
            .find(|s| s.stat.name == name)
            .map_or(0, |s| s.base_stat)
    };

    let sprite = raw
        .sprites
        .other
        .as_ref()
        .and_then(|o| o.official_artwork.as_ref())
        .and_then(|a| a.front_default.clone())
        .or(raw.sprites.front_default)
        .unwrap_or_default();

    ParentRecord {
        id: raw.id,
        name: raw.name,
        height: raw.height,
        weight: raw.weight,
        types,
        stats: Stats {
            hp: stat("hp"),
            attack: stat("attack"),
            defense: stat("defense"),
            special_attack: stat("special-attack"),
            special_defense: stat("special-defense"),
            speed: stat("speed"),
        },
        abilities: raw.abilities.into_iter().map(|a| a.ability.name).collect(),
        sprite,
        is_legendary: None,
        is_mythical: None,
        flavor_text: None,
        egg_groups: None,
        genus: None,
    }
}

/// Merge species taxonomy into an already-transformed record.
pub fn apply_species(record: &mut ParentRecord, species: RawSpecies) {
    record.is_legendary = Some(species.is_legendary);
    record.is_mythical = Some(species.is_mythical);
    record.flavor_text = species
        .flavor_text_entries
        .iter()
        .find(|entry| entry.language.name == "en")
        .map(|entry| normalize_flavor_text(&entry.flavor_text));
    record.genus = species
        .genera
        .iter()
        .find(|entry| entry.language.name == "en")
        .map(|entry| entry.genus.clone());
    if !species.egg_groups.is_empty() {
        record.egg_groups = Some(species.egg_groups.into_iter().map(|g| g.name).collect());
    }
}

/// Flavor text embeds line breaks and form feeds as layout hints;
/// normalize each to a single space.
pub fn normalize_flavor_text(text: &str) -> String {
    text.chars()
        .map(|c| if c == '\n' || c == '\u{c}' { ' ' } else { c })
        .collect()
}

/// Map raw damage relations, dropping names outside the known set.
pub fn transform_type_relations(raw: RawTypeResponse) -> TypeRelations {
    let tags = |named: Vec<Named>| {
        named
            .into_iter()
            .filter_map(|n| TypeTag::from_name(&n.name))
            .collect()
    };
    let relations = raw.damage_relations;
    TypeRelations {
        double_damage_to: tags(relations.double_damage_to),
        half_damage_to: tags(relations.half_damage_to),
        no_damage_to: tags(relations.no_damage_to),
        double_damage_from: tags(relations.double_damage_from),
        half_damage_from: tags(relations.half_damage_from),
        no_damage_from: tags(relations.no_damage_from),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_pokemon() -> RawPokemon {
        RawPokemon {
            id: 25,
            name: "pikachu".to_string(),
            height: 4,
            weight: 60,
            types: vec![RawTypeSlot {
                type_ref: Named {
                    name: "electric".to_string(),
                },
            }],
            stats: vec![
                RawStat {
                    base_stat: 35,
                    stat: Named { name: "hp".to_string() },
                },
                RawStat {
                    base_stat: 55,
                    stat: Named { name: "attack".to_string() },
                },
                RawStat {
                    base_stat: 90,
                    stat: Named { name: "speed".to_string() },
                },
            ],
            abilities: vec![RawAbilitySlot {
                ability: Named { name: "static".to_string() },
            }],
            sprites: RawSprites {
                front_default: Some("front.png".to_string()),
                other: None,
            },
        }
    }

    #[test]
    fn missing_stats_default_to_zero() {
        let record = transform_pokemon(raw_pokemon());
        assert_eq!(record.stats.hp, 35);
        assert_eq!(record.stats.attack, 55);
        assert_eq!(record.stats.defense, 0);
        assert_eq!(record.stats.special_attack, 0);
        assert_eq!(record.stats.speed, 90);
    }

    #[test]
    fn unknown_types_are_dropped() {
        let mut raw = raw_pokemon();
        raw.types.push(RawTypeSlot {
            type_ref: Named { name: "cosmic".to_string() },
        });
        let record = transform_pokemon(raw);
        assert_eq!(record.types, vec![TypeTag::Electric]);
    }

    #[test]
    fn all_unknown_types_default_to_normal() {
        let mut raw = raw_pokemon();
        raw.types = vec![RawTypeSlot {
            type_ref: Named { name: "cosmic".to_string() },
        }];
        let record = transform_pokemon(raw);
        assert_eq!(record.types, vec![TypeTag::Normal]);
    }

    #[test]
    fn sprite_prefers_artwork_then_front_default_then_empty() {
        let mut raw = raw_pokemon();
        raw.sprites.other = Some(RawOtherSprites {
            official_artwork: Some(RawArtwork {
                front_default: Some("artwork.png".to_string()),
            }),
        });
        assert_eq!(transform_pokemon(raw).sprite, "artwork.png");

        let raw = raw_pokemon();
        assert_eq!(transform_pokemon(raw).sprite, "front.png");

        let mut raw = raw_pokemon();
        raw.sprites = RawSprites {
            front_default: None,
            other: None,
        };
        assert_eq!(transform_pokemon(raw).sprite, "");
    }

    #[test]
    fn transform_is_idempotent_through_serialization() {
        // Transforming equivalent input twice yields identical records.
        let first = transform_pokemon(raw_pokemon());
        let second = transform_pokemon(raw_pokemon());
        assert_eq!(first, second);
    }

    #[test]
    fn flavor_text_normalizes_control_characters() {
        assert_eq!(
            normalize_flavor_text("a\nb\u{c}c"),
            "a b c"
        );
        assert_eq!(normalize_flavor_text("plain text"), "plain text");
    }

    #[test]
    fn species_without_english_entries_leaves_text_unset() {
        let mut record = transform_pokemon(raw_pokemon());
        apply_species(
            &mut record,
            RawSpecies {
                is_legendary: true,
                is_mythical: false,
                flavor_text_entries: vec![RawFlavorText {
                    flavor_text: "texte".to_string(),
                    language: Named { name: "fr".to_string() },
                }],
                egg_groups: vec![],
                genera: vec![],
            },
        );
        assert_eq!(record.is_legendary, Some(true));
        assert!(record.flavor_text.is_none());
        assert!(record.egg_groups.is_none());
        assert!(record.genus.is_none());
    }

    #[test]
    fn type_relations_drop_unknown_names() {
        let raw = RawTypeResponse {
            damage_relations: RawDamageRelations {
                double_damage_to: vec![
                    Named { name: "fire".to_string() },
                    Named { name: "cosmic".to_string() },
                ],
                half_damage_to: vec![],
                no_damage_to: vec![],
                double_damage_from: vec![],
                half_damage_from: vec![],
                no_damage_from: vec![],
            },
        };
        let relations = transform_type_relations(raw);
        assert_eq!(relations.double_damage_to, vec![TypeTag::Fire]);
    }
}
