pub mod api;
pub mod combat;
pub mod config;
pub mod content;
pub mod encounter;
pub mod error;
pub mod initiative;
pub mod life;
pub mod store;

pub use api::{apply_command, run_command, turn_order_lines, CombatCommand};
pub use combat::{CombatPhase, CombatState, CombatSummary, InitiativeEntry, TurnRecord};
pub use config::{RollAllPolicy, TrackerConfig};
pub use encounter::{Encounter, Participant, ParticipantKind};
pub use error::CombatError;
pub use initiative::{InitiativeRequest, InitiativeRoll};
pub use life::{Health, HealthStatus};
pub use store::{EncounterStore, MemoryStore};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AdMode { Normal, Advantage }

enum Source {
    Seeded(ChaCha8Rng),
    /// Replays a fixed list of d20 faces, cycling when exhausted.
    Scripted { faces: Vec<u8>, next: usize },
}

pub struct Dice { source: Source }

impl Dice {
    pub fn from_seed(seed: u64) -> Self {
        Self { source: Source::Seeded(ChaCha8Rng::seed_from_u64(seed)) }
    }

    pub fn from_entropy() -> Self {
        Self { source: Source::Seeded(ChaCha8Rng::from_entropy()) }
    }

    /// Deterministic dice for tests and replays. Faces are clamped to 1..=20;
    /// an empty script always rolls 10.
    pub fn from_scripted(faces: Vec<u8>) -> Self {
        let faces = faces.into_iter().map(|f| f.clamp(1, 20)).collect();
        Self { source: Source::Scripted { faces, next: 0 } }
    }

    fn face(&mut self) -> u8 {
        match &mut self.source {
            Source::Seeded(rng) => rng.gen_range(1..=20),
            Source::Scripted { faces, next } => {
                if faces.is_empty() {
                    return 10;
                }
                let face = faces[*next % faces.len()];
                *next += 1;
                face
            }
        }
    }

    pub fn d20(&mut self, mode: AdMode) -> u8 {
        match mode {
            AdMode::Normal => self.face(),
            AdMode::Advantage => { let a = self.face(); let b = self.face(); a.max(b) }
        }
    }
}

/// D&D ability modifier = floor((score - 10) / 2) for integer scores.
pub fn ability_mod(score: i32) -> i32 {
    // `div_euclid` with positive divisor matches mathematical floor division.
    (score - 10).div_euclid(2)
}
