//! Concrete wire schemas for generative replies and battle requests

use crate::{Field, Kind, Schema};
use pokefusion_utils::types::TypeTag;

/// Allowed winner labels for a battle judgment.
pub const WINNER_LABELS: &[&str] = &["child1", "child2"];

fn stat_field(name: &'static str) -> Field {
    Field::required(
        name,
        Kind::Integer {
            min: Some(1),
            max: Some(255),
        },
    )
}

fn stats_schema() -> Schema {
    Schema::new(vec![
        stat_field("hp"),
        stat_field("attack"),
        stat_field("defense"),
        stat_field("specialAttack"),
        stat_field("specialDefense"),
        stat_field("speed"),
    ])
}

fn type_tag_kind() -> Kind {
    Kind::Enum(&TypeTag::NAMES)
}

/// Schema for a generated fusion child reply.
#[must_use]
pub fn fusion_child_schema() -> Schema {
    Schema::new(vec![
        Field::required(
            "name",
            Kind::String {
                min_len: Some(1),
                max_len: Some(50),
            },
        ),
        Field::required(
            "types",
            Kind::Array {
                min_items: Some(1),
                max_items: Some(2),
                items: Box::new(type_tag_kind()),
            },
        ),
        Field::required("stats", Kind::Object(stats_schema())),
        Field::required(
            "abilities",
            Kind::Array {
                min_items: Some(1),
                max_items: Some(2),
                items: Box::new(Kind::String {
                    min_len: Some(1),
                    max_len: None,
                }),
            },
        ),
        Field::required(
            "signatureMove",
            Kind::Object(Schema::new(vec![
                Field::required(
                    "name",
                    Kind::String {
                        min_len: Some(1),
                        max_len: None,
                    },
                ),
                Field::required("type", type_tag_kind()),
                Field::required(
                    "power",
                    Kind::Integer {
                        min: Some(0),
                        max: Some(200),
                    },
                ),
                Field::required(
                    "description",
                    Kind::String {
                        min_len: None,
                        max_len: None,
                    },
                ),
            ])),
        ),
        Field::required(
            "description",
            Kind::String {
                min_len: None,
                max_len: None,
            },
        ),
    ])
}

/// Schema for a battle judgment reply.
#[must_use]
pub fn battle_judgment_schema() -> Schema {
    Schema::new(vec![
        Field::required("winner", Kind::Enum(WINNER_LABELS)),
        Field::required(
            "confidence",
            Kind::Integer {
                min: Some(0),
                max: Some(100),
            },
        ),
        Field::required(
            "reasoning",
            Kind::String {
                min_len: Some(50),
                max_len: Some(2000),
            },
        ),
        Field::required(
            "keyFactors",
            Kind::Array {
                min_items: Some(1),
                max_items: Some(5),
                items: Box::new(Kind::String {
                    min_len: Some(1),
                    max_len: None,
                }),
            },
        ),
        Field::optional(
            "ruleViolations",
            Kind::Array {
                min_items: None,
                max_items: None,
                items: Box::new(Kind::String {
                    min_len: None,
                    max_len: None,
                }),
            },
        ),
    ])
}

fn pair_schema() -> Schema {
    Schema::new(vec![
        Field::required(
            "parent1Id",
            Kind::Integer {
                min: Some(1),
                max: None,
            },
        ),
        Field::required(
            "parent2Id",
            Kind::Integer {
                min: Some(1),
                max: None,
            },
        ),
    ])
}

/// Schema for an incoming battle request body.
#[must_use]
pub fn battle_request_schema() -> Schema {
    Schema::new(vec![
        Field::required("pairA", Kind::Object(pair_schema())),
        Field::required("pairB", Kind::Object(pair_schema())),
    ])
}
