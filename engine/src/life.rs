use serde::{Deserialize, Serialize};

/// Hit-point bookkeeping for one participant.
///
/// Every mutator is total: out-of-range input is clamped or ignored, never
/// rejected, and `0 <= current <= max` holds after each call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawHealth")]
pub struct Health {
    #[serde(rename = "currentHitPoints")]
    pub current: i32,
    #[serde(rename = "maxHitPoints")]
    pub max: i32,
    #[serde(rename = "temporaryHitPoints", default)]
    pub temporary: i32,
}

/// Wire shape of a pool; loading clamps it through [`Health::with_values`].
#[derive(Deserialize)]
struct RawHealth {
    #[serde(rename = "currentHitPoints")]
    current: i32,
    #[serde(rename = "maxHitPoints")]
    max: i32,
    #[serde(rename = "temporaryHitPoints", default)]
    temporary: i32,
}

impl From<RawHealth> for Health {
    fn from(raw: RawHealth) -> Self {
        Health::with_values(raw.current, raw.max, raw.temporary)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Unconscious,
    Critical,
    Injured,
    Healthy,
}

impl Health {
    /// Full health with no temporary HP. A max below 1 is raised to 1.
    pub fn new(max: i32) -> Self {
        let max = max.max(1);
        Self { current: max, max, temporary: 0 }
    }

    /// Rebuilds a pool from raw values, clamping each into range.
    pub fn with_values(current: i32, max: i32, temporary: i32) -> Self {
        let max = max.max(1);
        Self {
            current: current.clamp(0, max),
            max,
            temporary: temporary.max(0),
        }
    }

    /// Temporary HP soaks damage first; current HP never drops below 0.
    pub fn apply_damage(self, amount: i32) -> Self {
        if amount < 0 {
            return self;
        }
        let absorbed = amount.min(self.temporary);
        let remainder = amount - absorbed;
        let next = Self {
            current: (self.current - remainder).max(0),
            temporary: self.temporary - absorbed,
            ..self
        };
        tracing::debug!(
            amount,
            absorbed,
            before = self.current,
            after = next.current,
            "damage applied"
        );
        next
    }

    pub fn apply_healing(self, amount: i32) -> Self {
        if amount < 0 {
            return self;
        }
        let current = self.current.saturating_add(amount).min(self.max);
        tracing::debug!(amount, before = self.current, after = current, "healing applied");
        Self { current, ..self }
    }

    /// Temporary HP does not stack: the larger of the old and new pool wins.
    pub fn set_temporary_hp(self, amount: i32) -> Self {
        if amount < 0 {
            return self;
        }
        Self { temporary: self.temporary.max(amount), ..self }
    }

    pub fn clear_temporary_hp(self) -> Self {
        Self { temporary: 0, ..self }
    }

    pub fn set_current_hp(self, amount: i32) -> Self {
        Self { current: amount.clamp(0, self.max), ..self }
    }

    /// Lowering max below current drags current down with it.
    pub fn set_max_hp(self, amount: i32) -> Self {
        if amount < 1 {
            return self;
        }
        Self { max: amount, current: self.current.min(amount), ..self }
    }

    pub fn effective_hp(&self) -> i32 {
        self.current.saturating_add(self.temporary)
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    pub fn status(&self) -> HealthStatus {
        if self.current <= 0 {
            HealthStatus::Unconscious
        } else if self.current >= self.max {
            HealthStatus::Healthy
        } else if (self.current as i64) * 4 <= self.max as i64 {
            // current / max <= 25%
            HealthStatus::Critical
        } else {
            HealthStatus::Injured
        }
    }
}
