//! Shared domain types for the fusion battle pipeline
//!
//! Wire names are camelCase to match the public API surface
//! (`pairA.parent1Id`, `specialAttack`, `keyFactors`, ...).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the 18 fixed elemental type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    Normal,
    Fire,
    Water,
    Electric,
    Grass,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
    Dark,
    Steel,
    Fairy,
}

impl TypeTag {
    /// All 18 type tags, in canonical order.
    pub const ALL: [TypeTag; 18] = [
        TypeTag::Normal,
        TypeTag::Fire,
        TypeTag::Water,
        TypeTag::Electric,
        TypeTag::Grass,
        TypeTag::Ice,
        TypeTag::Fighting,
        TypeTag::Poison,
        TypeTag::Ground,
        TypeTag::Flying,
        TypeTag::Psychic,
        TypeTag::Bug,
        TypeTag::Rock,
        TypeTag::Ghost,
        TypeTag::Dragon,
        TypeTag::Dark,
        TypeTag::Steel,
        TypeTag::Fairy,
    ];

    /// Lowercase wire names of all 18 tags, in the same order as [`ALL`](Self::ALL).
    pub const NAMES: [&'static str; 18] = [
        "normal", "fire", "water", "electric", "grass", "ice", "fighting", "poison", "ground",
        "flying", "psychic", "bug", "rock", "ghost", "dragon", "dark", "steel", "fairy",
    ];

    /// Lowercase wire name of this tag.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TypeTag::Normal => "normal",
            TypeTag::Fire => "fire",
            TypeTag::Water => "water",
            TypeTag::Electric => "electric",
            TypeTag::Grass => "grass",
            TypeTag::Ice => "ice",
            TypeTag::Fighting => "fighting",
            TypeTag::Poison => "poison",
            TypeTag::Ground => "ground",
            TypeTag::Flying => "flying",
            TypeTag::Psychic => "psychic",
            TypeTag::Bug => "bug",
            TypeTag::Rock => "rock",
            TypeTag::Ghost => "ghost",
            TypeTag::Dragon => "dragon",
            TypeTag::Dark => "dark",
            TypeTag::Steel => "steel",
            TypeTag::Fairy => "fairy",
        }
    }

    /// Parse a wire name into a tag. Returns `None` for anything outside
    /// the fixed 18-value set, which the catalog transform relies on to
    /// drop unrecognized external types.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        TypeTag::ALL
            .iter()
            .copied()
            .find(|tag| tag.as_str() == name)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeTag {
    type Err = UnknownTypeTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeTag::from_name(s).ok_or_else(|| UnknownTypeTag(s.to_string()))
    }
}

/// Error for a type name outside the fixed 18-value set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown type tag: {0}")]
pub struct UnknownTypeTag(pub String);

/// The six base stat values. Bounded to [1, 255] for generated children;
/// the catalog transform may produce 0 for a stat the catalog omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub special_attack: u16,
    pub special_defense: u16,
    pub speed: u16,
}

/// Externally sourced creature attribute bundle used as breeding input.
///
/// Immutable once fetched; owned by the request that fetched it. Taxonomy
/// fields come from a best-effort secondary species lookup and stay `None`
/// when that lookup fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentRecord {
    pub id: u32,
    pub name: String,
    /// Height in decimeters.
    pub height: u32,
    /// Weight in hectograms.
    pub weight: u32,
    pub types: Vec<TypeTag>,
    pub stats: Stats,
    pub abilities: Vec<String>,
    /// Image reference; empty string when the catalog has none.
    pub sprite: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_legendary: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_mythical: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flavor_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub egg_groups: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genus: Option<String>,
}

/// A generated fusion child's signature move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureMove {
    pub name: String,
    #[serde(rename = "type")]
    pub move_type: TypeTag,
    /// Power in [0, 200].
    pub power: u16,
    pub description: String,
}

/// Generatively synthesized creature combining two parent records.
/// Never mutated after schema validation succeeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FusionChild {
    pub name: String,
    pub types: Vec<TypeTag>,
    pub stats: Stats,
    pub abilities: Vec<String>,
    pub signature_move: SignatureMove,
    pub description: String,
}

/// Which child the judge picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    #[serde(rename = "child1")]
    Child1,
    #[serde(rename = "child2")]
    Child2,
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Winner::Child1 => f.write_str("child1"),
            Winner::Child2 => f.write_str("child2"),
        }
    }
}

/// Generatively produced verdict comparing two fusion children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleJudgment {
    pub winner: Winner,
    /// Certainty in [0, 100].
    pub confidence: u16,
    /// Free-text explanation, 50-2000 chars.
    pub reasoning: String,
    /// 1-5 main reasons for the prediction.
    pub key_factors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_violations: Option<Vec<String>>,
}

/// One parent pair selection in a battle request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairSelection {
    pub parent1_id: u32,
    pub parent2_id: u32,
}

/// Two parent-pair selections (4 identifiers total).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleRequest {
    pub pair_a: PairSelection,
    pub pair_b: PairSelection,
}

/// The two fetched records backing one pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentPair {
    pub parent1: ParentRecord,
    pub parent2: ParentRecord,
}

/// Both fetched pairs keyed the way the wire format nests them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentPairs {
    pub pair_a: ParentPair,
    pub pair_b: ParentPair,
}

/// The two generated children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Children {
    pub child1: FusionChild,
    pub child2: FusionChild,
}

/// Composite result tying parents, children and the judgment together.
/// Constructed fresh per request; not persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleResponse {
    pub parents: ParentPairs,
    pub children: Children,
    pub battle: BattleJudgment,
}

/// One entry in the selection listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonListItem {
    pub id: u32,
    pub name: String,
}

/// A page of the catalog listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonListResponse {
    pub pokemon: Vec<PokemonListItem>,
    pub total: u32,
    pub limit: u32,
    pub offset: u32,
}

/// Weakness/resistance/immunity classification for a defensive typing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectivenessSummary {
    pub weak_to: Vec<TypeTag>,
    pub resistant_to: Vec<TypeTag>,
    pub immune_to: Vec<TypeTag>,
}

/// User-visible failure shape: `{error, details?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    #[must_use]
    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}
