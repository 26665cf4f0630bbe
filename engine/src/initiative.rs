use serde::{Deserialize, Serialize};

use crate::encounter::Participant;
use crate::error::CombatError;
use crate::{ability_mod, AdMode, Dice};

/// One slot in the turn order. Rebuilt on every roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiativeEntry {
    pub participant_id: String,
    pub initiative: i32,
    /// Only consulted to break initiative ties.
    pub dexterity: i32,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub has_acted: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_delayed: bool,
    /// Trigger text for a readied action, e.g. "when the goblin moves".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ready_action: Option<String>,
}

impl InitiativeEntry {
    fn key(&self) -> (i32, i32) {
        (self.initiative, self.dexterity)
    }
}

/// What the roller needs to know about a combatant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitiativeRoll {
    pub participant_id: String,
    pub dexterity: i32,
    pub mode: AdMode,
}

impl InitiativeRoll {
    pub fn new(participant_id: impl Into<String>, dexterity: i32) -> Self {
        Self { participant_id: participant_id.into(), dexterity, mode: AdMode::Normal }
    }
}

impl From<&Participant> for InitiativeRoll {
    fn from(p: &Participant) -> Self {
        Self {
            participant_id: p.character_id.clone(),
            dexterity: p.dexterity,
            mode: if p.initiative_advantage { AdMode::Advantage } else { AdMode::Normal },
        }
    }
}

/// How a caller wants initiative (re)computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum InitiativeRequest {
    /// Fresh roll for the whole roster.
    RollAll,
    /// Roll one roster member again and slot them back in.
    RollSingle { participant_id: String },
    /// Reroll one entry, or every entry when no id is given.
    Reroll {
        #[serde(default)]
        participant_id: Option<String>,
    },
}

/// d20 + dexterity modifier.
pub fn roll_initiative_value(dice: &mut Dice, dexterity: i32, mode: AdMode) -> i32 {
    dice.d20(mode) as i32 + ability_mod(dexterity)
}

/// Highest initiative first, then highest dexterity. Stable, so full ties
/// keep their existing relative order.
pub fn sort_order(order: &mut [InitiativeEntry]) {
    order.sort_by(|a, b| b.key().cmp(&a.key()));
}

pub fn is_sorted(order: &[InitiativeEntry]) -> bool {
    order.windows(2).all(|w| w[0].key() >= w[1].key())
}

pub fn roll_bulk_initiative(
    participants: impl IntoIterator<Item = InitiativeRoll>,
    dice: &mut Dice,
) -> Vec<InitiativeEntry> {
    let mut order: Vec<InitiativeEntry> = participants
        .into_iter()
        .map(|p| {
            let initiative = roll_initiative_value(dice, p.dexterity, p.mode);
            tracing::debug!(participant = %p.participant_id, initiative, "rolled initiative");
            InitiativeEntry {
                participant_id: p.participant_id,
                initiative,
                dexterity: p.dexterity,
                is_active: false,
                has_acted: false,
                is_delayed: false,
                ready_action: None,
            }
        })
        .collect();
    sort_order(&mut order);
    order
}

/// Rerolls one existing entry and inserts it after any entries with an
/// equal key.
pub fn roll_single_initiative(
    order: &[InitiativeEntry],
    roll: &InitiativeRoll,
    dice: &mut Dice,
) -> Result<Vec<InitiativeEntry>, CombatError> {
    let idx = position_of(order, &roll.participant_id)?;
    let mut next = order.to_vec();
    let mut entry = next.remove(idx);
    entry.dexterity = roll.dexterity;
    entry.initiative = roll_initiative_value(dice, roll.dexterity, roll.mode);
    let at = next.partition_point(|e| e.key() >= entry.key());
    tracing::debug!(participant = %entry.participant_id, initiative = entry.initiative, slot = at, "rolled single initiative");
    next.insert(at, entry);
    Ok(next)
}

pub fn reroll_initiative(
    order: &[InitiativeEntry],
    participant_id: Option<&str>,
    dice: &mut Dice,
) -> Result<Vec<InitiativeEntry>, CombatError> {
    reroll_initiative_with(order, participant_id, dice, |_| AdMode::Normal)
}

/// Like [`reroll_initiative`], with a per-participant d20 mode. Delay and
/// ready flags ride along on each entry; `has_acted` is reset on every
/// rerolled entry.
pub fn reroll_initiative_with(
    order: &[InitiativeEntry],
    participant_id: Option<&str>,
    dice: &mut Dice,
    mode_of: impl Fn(&str) -> AdMode,
) -> Result<Vec<InitiativeEntry>, CombatError> {
    if order.is_empty() {
        return Err(CombatError::EmptyInitiativeOrder);
    }
    let mut next = order.to_vec();
    let targets: Vec<usize> = match participant_id {
        Some(id) => vec![position_of(order, id)?],
        None => (0..next.len()).collect(),
    };
    for idx in targets {
        let entry = &mut next[idx];
        entry.initiative = roll_initiative_value(dice, entry.dexterity, mode_of(&entry.participant_id));
        entry.has_acted = false;
        tracing::debug!(participant = %entry.participant_id, initiative = entry.initiative, "rerolled initiative");
    }
    sort_order(&mut next);
    Ok(next)
}

pub(crate) fn position_of(order: &[InitiativeEntry], participant_id: &str) -> Result<usize, CombatError> {
    order
        .iter()
        .position(|e| e.participant_id == participant_id)
        .ok_or_else(|| CombatError::ParticipantNotFound(participant_id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, initiative: i32, dexterity: i32) -> InitiativeEntry {
        InitiativeEntry {
            participant_id: id.into(),
            initiative,
            dexterity,
            is_active: false,
            has_acted: false,
            is_delayed: false,
            ready_action: None,
        }
    }

    #[test]
    fn single_roll_lands_after_equal_keys() {
        let order = vec![entry("a", 15, 12), entry("b", 12, 10), entry("c", 12, 10)];
        // d20 = 12, dex 10 → 12: ties with b and c, goes after both
        let mut dice = Dice::from_scripted(vec![12]);
        let next = roll_single_initiative(&order, &InitiativeRoll::new("a", 10), &mut dice).unwrap();
        let ids: Vec<_> = next.iter().map(|e| e.participant_id.as_str()).collect();
        assert_eq!(ids, ["b", "c", "a"]);
    }

    #[test]
    fn request_json_is_tagged() {
        let req: InitiativeRequest =
            serde_json::from_str(r#"{"mode":"roll_single","participantId":"x"}"#).unwrap();
        assert_eq!(req, InitiativeRequest::RollSingle { participant_id: "x".into() });
        let req: InitiativeRequest = serde_json::from_str(r#"{"mode":"reroll"}"#).unwrap();
        assert_eq!(req, InitiativeRequest::Reroll { participant_id: None });
    }
}
