use super::{CombatState, TurnRecord};
use crate::error::CombatError;

impl CombatState {
    /// Hands the turn to the next entry, rolling into a new round after the
    /// last one. The finishing entry is marked as having acted.
    pub fn next_turn(&self) -> Result<CombatState, CombatError> {
        self.ensure_running()?;
        let len = self.initiative_order.len();
        if len == 0 {
            return Err(CombatError::UnableToAdvance);
        }

        let mut next = self.clone();
        let finished = self.current_turn.min(len - 1);
        next.turn_history.push(TurnRecord {
            round: self.current_round,
            turn: finished,
            participant_id: Some(self.initiative_order[finished].participant_id.clone()),
        });
        next.initiative_order[finished].has_acted = true;

        if finished + 1 == len {
            next.current_turn = 0;
            next.current_round += 1;
            // fresh action economy
            for entry in &mut next.initiative_order {
                entry.has_acted = false;
            }
        } else {
            next.current_turn = finished + 1;
        }
        next.mark_active(Some(next.current_turn));

        tracing::debug!(
            round = next.current_round,
            turn = next.current_turn,
            participant = %next.initiative_order[next.current_turn].participant_id,
            "advanced turn"
        );
        Ok(next)
    }

    /// Steps back one turn, preferring the recorded history.
    pub fn previous_turn(&self) -> Result<CombatState, CombatError> {
        self.ensure_running()?;
        let len = self.initiative_order.len();
        if len == 0 {
            return Err(CombatError::NoPreviousTurn);
        }

        let mut next = self.clone();
        let (round, turn) = match next.turn_history.pop() {
            Some(record) => {
                let by_identity = record.participant_id.as_deref().and_then(|id| {
                    self.initiative_order
                        .iter()
                        .position(|e| e.participant_id == id)
                });
                (record.round.max(1), by_identity.unwrap_or(record.turn.min(len - 1)))
            }
            None if self.current_round <= 1 && self.current_turn == 0 => {
                return Err(CombatError::NoPreviousTurn);
            }
            None if self.current_turn == 0 => (self.current_round - 1, len - 1),
            None => (self.current_round, self.current_turn.min(len) - 1),
        };

        if round != self.current_round {
            // back into the previous round: everyone ahead of the cursor acted
            for (i, entry) in next.initiative_order.iter_mut().enumerate() {
                entry.has_acted = i < turn;
            }
        }
        next.initiative_order[turn].has_acted = false;
        next.current_round = round;
        next.current_turn = turn;
        next.mark_active(Some(turn));

        tracing::debug!(round, turn, "stepped back a turn");
        Ok(next)
    }
}
