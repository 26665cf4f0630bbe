use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::combat::{CombatPhase, CombatState};
use crate::config::TrackerConfig;
use crate::encounter::Encounter;
use crate::error::CombatError;
use crate::initiative::InitiativeRequest;
use crate::life::Health;
use crate::store::EncounterStore;
use crate::Dice;

/// Every mutation a front door can ask for, one variant per operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum CombatCommand {
    RollInitiative { request: InitiativeRequest },
    Start,
    NextTurn,
    PreviousTurn,
    Pause,
    Resume,
    End,
    Delay { participant_id: String },
    Ready { participant_id: String, trigger: String },
    ResolvePending { participant_id: String },
    Damage { participant_id: String, amount: i32 },
    Heal { participant_id: String, amount: i32 },
    SetTemporaryHp { participant_id: String, amount: i32 },
    ClearTemporaryHp { participant_id: String },
    SetCurrentHp { participant_id: String, amount: i32 },
    SetMaxHp { participant_id: String, amount: i32 },
    AddCondition { participant_id: String, condition: String },
    RemoveCondition { participant_id: String, condition: String },
}

/// Applies one command, returning the encounter as it should be saved.
pub fn apply_command(
    encounter: &Encounter,
    command: &CombatCommand,
    dice: &mut Dice,
    config: &TrackerConfig,
    now: DateTime<Utc>,
) -> Result<Encounter, CombatError> {
    use CombatCommand::*;

    let state = &encounter.combat_state;
    let combat = |combat_state: CombatState| Encounter { combat_state, ..encounter.clone() };
    let health = |id: &str, f: fn(Health, i32) -> Health, amount: i32| {
        encounter.with_participant(id, |p| p.health = f(p.health, amount))
    };

    let next = match command {
        RollInitiative { request } => combat(state.roll_initiative(
            &encounter.participants,
            request,
            dice,
            config.roll_all_while_active,
        )?),
        Start => combat(state.start()?),
        NextTurn => combat(state.next_turn()?),
        PreviousTurn => combat(state.previous_turn()?),
        Pause => combat(state.pause(now)?),
        Resume => combat(state.resume()?),
        End => combat(state.end()?),
        Delay { participant_id } => combat(state.delay_action(participant_id)?),
        Ready { participant_id, trigger } => combat(state.ready_action(participant_id, trigger.as_str())?),
        ResolvePending { participant_id } => combat(state.resolve_pending_action(participant_id)?),
        Damage { participant_id, amount } => health(participant_id.as_str(), Health::apply_damage, *amount)?,
        Heal { participant_id, amount } => health(participant_id.as_str(), Health::apply_healing, *amount)?,
        SetTemporaryHp { participant_id, amount } => {
            health(participant_id.as_str(), Health::set_temporary_hp, *amount)?
        }
        ClearTemporaryHp { participant_id } => {
            encounter.with_participant(participant_id, |p| p.health = p.health.clear_temporary_hp())?
        }
        SetCurrentHp { participant_id, amount } => health(participant_id.as_str(), Health::set_current_hp, *amount)?,
        SetMaxHp { participant_id, amount } => health(participant_id.as_str(), Health::set_max_hp, *amount)?,
        AddCondition { participant_id, condition } => encounter.with_participant(participant_id, |p| {
            p.conditions.insert(condition.trim().to_lowercase());
        })?,
        RemoveCondition { participant_id, condition } => {
            encounter.with_participant(participant_id, |p| {
                p.conditions.shift_remove(&condition.trim().to_lowercase());
            })?
        }
    };
    Ok(next)
}

/// One load → apply → save transaction. Nothing is saved if the command
/// is refused.
pub fn run_command(
    store: &mut impl EncounterStore,
    encounter_id: &str,
    command: &CombatCommand,
    dice: &mut Dice,
    config: &TrackerConfig,
) -> Result<Encounter> {
    let encounter = store
        .load(encounter_id)
        .with_context(|| format!("failed to load encounter: {}", encounter_id))?;
    let next = apply_command(&encounter, command, dice, config, Utc::now())?;
    store
        .save(&next)
        .with_context(|| format!("failed to save encounter: {}", encounter_id))?;
    Ok(next)
}

/// Human-readable turn order, one line per entry, active entry marked.
pub fn turn_order_lines(encounter: &Encounter) -> Vec<String> {
    let state = &encounter.combat_state;
    let mut lines = Vec::with_capacity(state.initiative_order.len() + 1);
    let phase = match state.phase() {
        CombatPhase::NotStarted => "not started",
        CombatPhase::Active => "active",
        CombatPhase::Paused => "paused",
    };
    lines.push(format!(
        "[COMBAT] {} round={} turn={}",
        phase,
        state.current_round,
        state.current_turn + 1
    ));
    for entry in &state.initiative_order {
        let mut line = format!(
            "[INIT]{} {} {} (dex {})",
            if entry.is_active { ">" } else { " " },
            encounter.name_of(&entry.participant_id),
            entry.initiative,
            entry.dexterity
        );
        if entry.has_acted {
            line.push_str(" acted");
        }
        if entry.is_delayed {
            line.push_str(" delayed");
        }
        if let Some(trigger) = &entry.ready_action {
            line.push_str(&format!(" ready: {}", trigger));
        }
        if let Some(p) = encounter.participant(&entry.participant_id) {
            line.push_str(&format!(
                " [HP {}/{}{}]",
                p.health.current,
                p.health.max,
                if p.health.temporary > 0 {
                    format!(" +{}", p.health.temporary)
                } else {
                    String::new()
                }
            ));
        }
        lines.push(line);
    }
    lines
}
