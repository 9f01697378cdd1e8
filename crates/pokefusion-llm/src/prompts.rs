//! Prompt construction for the generator and judge models
//!
//! Both prompts end with an explicit JSON shape and an instruction to
//! reply with JSON only; the clients still extract and validate because
//! models drift from instructions.

use pokefusion_utils::types::{FusionChild, ParentRecord, Stats};

fn format_stats(stats: &Stats) -> String {
    format!(
        "HP={}, Attack={}, Defense={}, Sp.Atk={}, Sp.Def={}, Speed={}",
        stats.hp,
        stats.attack,
        stats.defense,
        stats.special_attack,
        stats.special_defense,
        stats.speed
    )
}

fn format_types(types: &[pokefusion_utils::types::TypeTag]) -> String {
    types
        .iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_parent(label: &str, parent: &ParentRecord) -> String {
    format!(
        "{label}:\n- Name: {}\n- Types: {}\n- Stats: {}\n- Abilities: {}",
        parent.name,
        format_types(&parent.types),
        format_stats(&parent.stats),
        parent.abilities.join(", ")
    )
}

fn format_child(label: &str, child: &FusionChild) -> String {
    format!(
        "{label}:\n- Name: {}\n- Types: {}\n- Stats: {}\n- Abilities: {}\n- Signature Move: {} ({}, Power: {}) - {}",
        child.name,
        format_types(&child.types),
        format_stats(&child.stats),
        child.abilities.join(", "),
        child.signature_move.name,
        child.signature_move.move_type,
        child.signature_move.power,
        child.signature_move.description
    )
}

/// The breeding prompt: both parents' attributes plus the required child
/// JSON shape.
#[must_use]
pub fn build_generator_prompt(parent1: &ParentRecord, parent2: &ParentRecord) -> String {
    format!(
        r#"You are a Pokemon breeding expert. Given two parent Pokemon, create a unique offspring that combines their traits.

{parent_1}

{parent_2}

Generate a child Pokemon with:
1. A creative fusion name combining both parents (max 50 characters)
2. 1-2 types inherited or combined from parents
3. Stats that blend parent stats creatively (each stat between 1-255)
4. 1-2 abilities derived from or inspired by parent abilities
5. A unique signature move that combines parent typings with:
   - A creative name
   - A type (should relate to the child's types)
   - Power between 0-200
   - A brief description of the move
6. A short description of the child Pokemon (2-3 sentences)

Respond with ONLY valid JSON in this exact format:
{{
  "name": "string",
  "types": ["string"],
  "stats": {{
    "hp": number,
    "attack": number,
    "defense": number,
    "specialAttack": number,
    "specialDefense": number,
    "speed": number
  }},
  "abilities": ["string"],
  "signatureMove": {{
    "name": "string",
    "type": "string",
    "power": number,
    "description": "string"
  }},
  "description": "string"
}}"#,
        parent_1 = format_parent("Parent 1", parent1),
        parent_2 = format_parent("Parent 2", parent2),
    )
}

/// The battle-analysis prompt: both children's attributes plus the
/// required judgment JSON shape.
#[must_use]
pub fn build_judge_prompt(child1: &FusionChild, child2: &FusionChild) -> String {
    format!(
        r#"You are a Pokemon battle analyst. Analyze a hypothetical battle between two fusion Pokemon and predict the winner.

{child_1}

{child_2}

Consider:
1. Type matchups and advantages/disadvantages
2. Stat distributions (speed determines who attacks first)
3. Signature moves and their effectiveness against the opponent
4. Ability synergies and potential counters
5. Any rule violations or unrealistic attributes

Provide your prediction with:
- Winner: either "child1" or "child2"
- Confidence level: 0-100 (how certain you are)
- Reasoning: detailed explanation (50-2000 characters)
- Key factors: 1-5 main reasons for your prediction
- Rule violations: any issues with the Pokemon attributes (empty array if none)

Respond with ONLY valid JSON in this exact format:
{{
  "winner": "child1" or "child2",
  "confidence": number,
  "reasoning": "string",
  "keyFactors": ["string"],
  "ruleViolations": ["string"] or []
}}"#,
        child_1 = format_child("Child 1 (from Pair A)", child1),
        child_2 = format_child("Child 2 (from Pair B)", child2),
    )
}
