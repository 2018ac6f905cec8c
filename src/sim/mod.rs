//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Wall-clock time only enters through explicit `now_ms` arguments
//! - No rendering or platform dependencies

pub mod collision;
pub mod schedule;
pub mod scoring;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod weapon;

pub use collision::{Rect, aabb_overlap};
pub use schedule::{Task, TimerHandle, Timers};
pub use scoring::{Award, RANK_TITLES, Scoreboard, rank_title};
pub use state::{
    Field, GameEvent, GamePhase, GameState, LifeLostNotice, Obstacle, ObstacleKind,
    ObstacleProfile, Player, PowerUp, PowerUpHighlight, PowerUpKind, Projectile,
};
pub use tick::{TickInput, fire, tick};
pub use weapon::{FireOutcome, Weapon, shot_cap};
