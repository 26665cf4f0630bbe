use std::collections::HashMap;

use anyhow::{anyhow, Result};

use crate::encounter::Encounter;

/// Where encounters live between commands. One writer per encounter;
/// whoever saves last wins.
pub trait EncounterStore {
    fn load(&self, id: &str) -> Result<Encounter>;
    fn save(&mut self, encounter: &Encounter) -> Result<()>;
}

/// Keeps encounters in a map. Used by tests and embedders without storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    encounters: HashMap<String, Encounter>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(encounters: impl IntoIterator<Item = Encounter>) -> Self {
        Self {
            encounters: encounters.into_iter().map(|e| (e.id.clone(), e)).collect(),
        }
    }
}

impl EncounterStore for MemoryStore {
    fn load(&self, id: &str) -> Result<Encounter> {
        self.encounters
            .get(id)
            .cloned()
            .ok_or_else(|| anyhow!("encounter '{}' not found", id))
    }

    fn save(&mut self, encounter: &Encounter) -> Result<()> {
        self.encounters.insert(encounter.id.clone(), encounter.clone());
        Ok(())
    }
}
