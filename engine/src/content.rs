use std::collections::HashMap;

use anyhow::{anyhow, Context, Result};

use crate::encounter::Encounter;

pub fn builtin_encounters() -> HashMap<&'static str, &'static str> {
    HashMap::from([(
        "goblin_ambush",
        include_str!("../content/encounters/goblin_ambush.json"),
    )])
}

/// Parses a bundled encounter by id.
pub fn builtin_encounter(id: &str) -> Result<Encounter> {
    let text = builtin_encounters()
        .get(id)
        .copied()
        .ok_or_else(|| anyhow!("no built-in encounter '{}'", id))?;
    serde_json::from_str(text).with_context(|| format!("failed to parse built-in encounter: {}", id))
}
