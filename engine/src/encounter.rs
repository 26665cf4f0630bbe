use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::combat::CombatState;
use crate::error::CombatError;
use crate::life::Health;

const DEFAULT_DEXTERITY: i32 = 10;
const DEFAULT_ARMOR_CLASS: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantKind {
    Pc,
    Npc,
}

fn default_dexterity() -> i32 {
    DEFAULT_DEXTERITY
}

fn default_armor_class() -> i32 {
    DEFAULT_ARMOR_CLASS
}

fn default_true() -> bool {
    true
}

/// A combatant on the encounter roster. Survives across combats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub character_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ParticipantKind,
    #[serde(default)]
    pub is_player: bool,
    #[serde(default = "default_true")]
    pub is_visible: bool,
    #[serde(default = "default_dexterity")]
    pub dexterity: i32,
    /// Rolls the initiative d20 twice and keeps the higher face.
    #[serde(default)]
    pub initiative_advantage: bool,
    #[serde(flatten)]
    pub health: Health,
    #[serde(default = "default_armor_class")]
    pub armor_class: i32,
    #[serde(default)]
    pub conditions: IndexSet<String>,
}

impl Participant {
    pub fn new(
        character_id: impl Into<String>,
        name: impl Into<String>,
        kind: ParticipantKind,
        dexterity: i32,
        max_hp: i32,
    ) -> Self {
        Self {
            character_id: character_id.into(),
            name: name.into(),
            kind,
            is_player: kind == ParticipantKind::Pc,
            is_visible: true,
            dexterity,
            initiative_advantage: false,
            health: Health::new(max_hp),
            armor_class: DEFAULT_ARMOR_CLASS,
            conditions: IndexSet::new(),
        }
    }
}

/// One encounter record: the roster plus its combat sub-state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Encounter {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub combat_state: CombatState,
}

impl Encounter {
    pub fn new(id: impl Into<String>, name: impl Into<String>, participants: Vec<Participant>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            participants,
            combat_state: CombatState::default(),
        }
    }

    pub fn participant(&self, id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.character_id == id)
    }

    /// Returns a copy of the encounter with one participant rewritten.
    pub fn with_participant(
        &self,
        id: &str,
        edit: impl FnOnce(&mut Participant),
    ) -> Result<Encounter, CombatError> {
        let mut next = self.clone();
        let participant = next
            .participants
            .iter_mut()
            .find(|p| p.character_id == id)
            .ok_or_else(|| CombatError::ParticipantNotFound(id.to_string()))?;
        edit(participant);
        Ok(next)
    }

    /// Display name for a participant id, falling back to the id itself.
    pub fn name_of<'a>(&'a self, id: &'a str) -> &'a str {
        self.participant(id).map(|p| p.name.as_str()).unwrap_or(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn participant_json_uses_roster_field_names() {
        let json = r#"{
            "characterId": "c1",
            "name": "Fighter",
            "type": "pc",
            "maxHitPoints": 12,
            "currentHitPoints": 9,
            "temporaryHitPoints": 2,
            "conditions": ["prone"]
        }"#;
        let p: Participant = serde_json::from_str(json).unwrap();
        assert_eq!(p.kind, ParticipantKind::Pc);
        assert_eq!(p.dexterity, 10);
        assert!(p.is_visible);
        assert_eq!(p.health, Health { current: 9, max: 12, temporary: 2 });
        assert!(p.conditions.contains("prone"));

        let back = serde_json::to_value(&p).unwrap();
        assert_eq!(back["currentHitPoints"], 9);
        assert_eq!(back["type"], "pc");
    }

    #[test]
    fn editing_unknown_participant_fails() {
        let enc = Encounter::new("e", "E", vec![]);
        let err = enc.with_participant("ghost", |_| {}).unwrap_err();
        assert_eq!(err, CombatError::ParticipantNotFound("ghost".into()));
    }
}
