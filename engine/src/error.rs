use thiserror::Error;

/// Every way a combat transition can be refused.
///
/// Transitions either succeed with a new state or return one of these; no
/// variant is transient, so retrying with the same input fails the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CombatError {
    #[error("participant '{0}' is not part of this encounter")]
    ParticipantNotFound(String),
    #[error("initiative order is empty")]
    EmptyInitiativeOrder,
    #[error("unable to advance: no participants in initiative order")]
    UnableToAdvance,
    #[error("no previous turn: combat is at round 1, turn 1")]
    NoPreviousTurn,
    #[error("combat is not active")]
    CombatNotActive,
    #[error("combat is already active")]
    CombatAlreadyActive,
    #[error("combat is already paused")]
    AlreadyPaused,
    #[error("combat is not paused")]
    CombatNotPaused,
}
