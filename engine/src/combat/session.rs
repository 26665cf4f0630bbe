use chrono::{DateTime, Utc};

use super::CombatState;
use crate::config::RollAllPolicy;
use crate::encounter::Participant;
use crate::error::CombatError;
use crate::initiative::{
    position_of, reroll_initiative_with, roll_bulk_initiative, roll_single_initiative,
    InitiativeEntry, InitiativeRequest, InitiativeRoll,
};
use crate::{AdMode, Dice};

impl CombatState {
    /// Begins a fresh session at round 1 with the top of the order acting.
    pub fn start(&self) -> Result<CombatState, CombatError> {
        if self.is_active {
            return Err(CombatError::CombatAlreadyActive);
        }
        if self.initiative_order.is_empty() {
            return Err(CombatError::EmptyInitiativeOrder);
        }
        let mut next = CombatState {
            is_active: true,
            initiative_order: self.initiative_order.clone(),
            ..CombatState::default()
        };
        for entry in &mut next.initiative_order {
            entry.has_acted = false;
        }
        next.mark_active(Some(0));
        tracing::info!(participants = next.initiative_order.len(), "combat started");
        Ok(next)
    }

    pub fn roll_initiative(
        &self,
        roster: &[Participant],
        request: &InitiativeRequest,
        dice: &mut Dice,
        policy: RollAllPolicy,
    ) -> Result<CombatState, CombatError> {
        match request {
            InitiativeRequest::RollAll => self.roll_all(roster, dice, policy),
            InitiativeRequest::RollSingle { participant_id } => {
                let participant = roster
                    .iter()
                    .find(|p| &p.character_id == participant_id)
                    .ok_or_else(|| CombatError::ParticipantNotFound(participant_id.clone()))?;
                let order =
                    roll_single_initiative(&self.initiative_order, &InitiativeRoll::from(participant), dice)?;
                Ok(self.with_order_preserving_active(order))
            }
            InitiativeRequest::Reroll { participant_id } => {
                self.reroll_preserving_active_turn(participant_id.as_deref(), roster, dice)
            }
        }
    }

    fn roll_all(
        &self,
        roster: &[Participant],
        dice: &mut Dice,
        policy: RollAllPolicy,
    ) -> Result<CombatState, CombatError> {
        if roster.is_empty() {
            return Err(CombatError::EmptyInitiativeOrder);
        }
        let order = roll_bulk_initiative(roster.iter().map(InitiativeRoll::from), dice);
        if !self.is_active {
            return Ok(CombatState {
                initiative_order: order,
                current_turn: 0,
                ..self.clone()
            });
        }
        match policy {
            RollAllPolicy::RestartAtTop => {
                let mut next = CombatState {
                    initiative_order: order,
                    current_turn: 0,
                    turn_history: Vec::new(),
                    ..self.clone()
                };
                next.mark_active(Some(0));
                tracing::debug!(round = next.current_round, "initiative rolled; turn order restarts");
                Ok(next)
            }
            RollAllPolicy::PreserveActive => Ok(self.with_order_preserving_active(order)),
        }
    }

    /// Rerolls one entry, or all of them, without changing whose turn it is.
    pub fn reroll_preserving_active_turn(
        &self,
        participant_id: Option<&str>,
        roster: &[Participant],
        dice: &mut Dice,
    ) -> Result<CombatState, CombatError> {
        let mode_of = |id: &str| {
            roster
                .iter()
                .find(|p| p.character_id == id)
                .map(|p| InitiativeRoll::from(p).mode)
                .unwrap_or(AdMode::Normal)
        };
        let order = reroll_initiative_with(&self.initiative_order, participant_id, dice, mode_of)?;
        Ok(self.with_order_preserving_active(order))
    }

    fn with_order_preserving_active(&self, order: Vec<InitiativeEntry>) -> CombatState {
        let active = self
            .active_entry()
            .filter(|_| self.is_active)
            .map(|e| e.participant_id.clone());
        let mut next = CombatState { initiative_order: order, ..self.clone() };
        next.restore_active(active.as_deref());
        next
    }

    pub fn pause(&self, now: DateTime<Utc>) -> Result<CombatState, CombatError> {
        if !self.is_active {
            return Err(CombatError::CombatNotActive);
        }
        if self.is_paused() {
            return Err(CombatError::AlreadyPaused);
        }
        tracing::info!(round = self.current_round, turn = self.current_turn, "combat paused");
        Ok(CombatState { paused_at: Some(now), ..self.clone() })
    }

    pub fn resume(&self) -> Result<CombatState, CombatError> {
        let Some(paused_at) = self.paused_at else {
            return Err(CombatError::CombatNotPaused);
        };
        tracing::info!(%paused_at, "combat resumed");
        Ok(CombatState { paused_at: None, ..self.clone() })
    }

    /// Ends the session from either Active or Paused, returning the reset state.
    pub fn end(&self) -> Result<CombatState, CombatError> {
        if !self.is_active {
            return Err(CombatError::CombatNotActive);
        }
        let summary = self.summary();
        tracing::info!(
            rounds = summary.rounds,
            turns = summary.turns_taken,
            participants = summary.participants,
            "combat ended"
        );
        Ok(CombatState::default())
    }

    pub fn delay_action(&self, participant_id: &str) -> Result<CombatState, CombatError> {
        self.edit_entry(participant_id, |e| e.is_delayed = true)
    }

    pub fn ready_action(
        &self,
        participant_id: &str,
        trigger: impl Into<String>,
    ) -> Result<CombatState, CombatError> {
        let trigger = trigger.into();
        self.edit_entry(participant_id, move |e| e.ready_action = Some(trigger))
    }

    /// The delayed or readied action was taken; drop both markers.
    pub fn resolve_pending_action(&self, participant_id: &str) -> Result<CombatState, CombatError> {
        self.edit_entry(participant_id, |e| {
            e.is_delayed = false;
            e.ready_action = None;
        })
    }

    fn edit_entry(
        &self,
        participant_id: &str,
        edit: impl FnOnce(&mut InitiativeEntry),
    ) -> Result<CombatState, CombatError> {
        self.ensure_running()?;
        let idx = position_of(&self.initiative_order, participant_id)?;
        let mut next = self.clone();
        edit(&mut next.initiative_order[idx]);
        tracing::debug!(participant = participant_id, "updated initiative entry");
        Ok(next)
    }
}
