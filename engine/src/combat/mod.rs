//! Combat state for one encounter: turn order, the active cursor and the
//! session lifecycle.
//!
//! Every transition borrows the current [`CombatState`] and returns a new
//! one, leaving persistence to the caller.

mod session;
mod turn;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CombatError;
pub use crate::initiative::InitiativeEntry;

/// Where a session sits in its lifecycle. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatPhase {
    NotStarted,
    Active,
    Paused,
}

/// A finished turn, kept so "previous turn" can walk back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnRecord {
    pub round: u32,
    pub turn: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CombatState {
    pub is_active: bool,
    pub current_round: u32,
    pub current_turn: usize,
    pub initiative_order: Vec<InitiativeEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paused_at: Option<DateTime<Utc>>,
    pub turn_history: Vec<TurnRecord>,
}

impl Default for CombatState {
    fn default() -> Self {
        Self {
            is_active: false,
            current_round: 1,
            current_turn: 0,
            initiative_order: Vec::new(),
            paused_at: None,
            turn_history: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CombatSummary {
    pub rounds: u32,
    pub turns_taken: usize,
    pub participants: usize,
}

impl CombatState {
    pub fn phase(&self) -> CombatPhase {
        match (self.is_active, self.paused_at) {
            (false, _) => CombatPhase::NotStarted,
            (true, Some(_)) => CombatPhase::Paused,
            (true, None) => CombatPhase::Active,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.initiative_order.iter().position(|e| e.is_active)
    }

    pub fn active_entry(&self) -> Option<&InitiativeEntry> {
        self.initiative_order.iter().find(|e| e.is_active)
    }

    pub fn entry(&self, participant_id: &str) -> Option<&InitiativeEntry> {
        self.initiative_order
            .iter()
            .find(|e| e.participant_id == participant_id)
    }

    pub fn summary(&self) -> CombatSummary {
        CombatSummary {
            rounds: self.current_round,
            turns_taken: self.turn_history.len(),
            participants: self.initiative_order.len(),
        }
    }

    /// Turn movement and per-entry actions need a running, unpaused session.
    fn ensure_running(&self) -> Result<(), CombatError> {
        if !self.is_active || self.is_paused() {
            return Err(CombatError::CombatNotActive);
        }
        Ok(())
    }

    /// Marks exactly the entry at `idx` active (or nobody for `None`).
    fn mark_active(&mut self, idx: Option<usize>) {
        for (i, entry) in self.initiative_order.iter_mut().enumerate() {
            entry.is_active = Some(i) == idx;
        }
    }

    /// Re-attaches the active flag to `participant_id` wherever its entry
    /// now sits. When it is gone, nobody is active.
    fn restore_active(&mut self, participant_id: Option<&str>) {
        let idx = participant_id.and_then(|id| {
            self.initiative_order
                .iter()
                .position(|e| e.participant_id == id)
        });
        self.mark_active(idx);
        match idx {
            Some(i) => self.current_turn = i,
            None => {
                self.current_turn = self
                    .current_turn
                    .min(self.initiative_order.len().saturating_sub(1))
            }
        }
    }
}
