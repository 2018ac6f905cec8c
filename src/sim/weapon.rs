//! Shot rate limiting and the per-level shot cap

use serde::{Deserialize, Serialize};

use crate::consts::{FIRE_INTERVAL_MS, SHOT_COOLDOWN_TICKS};

/// Shots allowed before the weapon overheats, or `None` when uncapped
pub fn shot_cap(level: u32) -> Option<u32> {
    match level {
        0..=6 => Some(7),
        7..=12 => Some(13),
        13..=20 => Some(20),
        _ => None,
    }
}

/// Result of a fire attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    /// Cooling down, or too soon after the previous shot
    Blocked,
    Fired,
    /// The shot was fired and used up the last one allowed at this level
    FiredAndOverheated,
}

impl FireOutcome {
    pub fn fired(self) -> bool {
        !matches!(self, FireOutcome::Blocked)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Weapon {
    /// Shots since the last cooldown
    pub shot_count: u32,
    /// Ticks left before firing is allowed again (0 = ready)
    pub cooldown_ticks: u32,
    /// Wall-clock time of the last accepted shot
    pub last_shot_ms: Option<f64>,
}

impl Weapon {
    pub fn cooldown_active(&self) -> bool {
        self.cooldown_ticks > 0
    }

    /// Rate-limit and count a shot taken at `now_ms`
    pub fn try_fire(&mut self, now_ms: f64, level: u32) -> FireOutcome {
        if self.cooldown_active() {
            return FireOutcome::Blocked;
        }
        if let Some(last) = self.last_shot_ms {
            if now_ms - last < FIRE_INTERVAL_MS {
                return FireOutcome::Blocked;
            }
        }

        self.last_shot_ms = Some(now_ms);
        self.shot_count += 1;

        match shot_cap(level) {
            Some(cap) if self.shot_count >= cap => {
                self.cooldown_ticks = SHOT_COOLDOWN_TICKS;
                FireOutcome::FiredAndOverheated
            }
            _ => FireOutcome::Fired,
        }
    }

    /// Advance the cooldown by one tick; true on the tick it ends
    pub fn tick_cooldown(&mut self) -> bool {
        if self.cooldown_ticks == 0 {
            return false;
        }
        self.cooldown_ticks -= 1;
        if self.cooldown_ticks == 0 {
            self.shot_count = 0;
            true
        } else {
            false
        }
    }
}
