//! Nebula Nomad - an arcade space-dodging game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, collisions, scoring)
//! - `session`: Game-state machine and the frame/timer scheduler
//! - `renderer`: Draw-list building and the WebGPU sprite pipeline
//! - `hud`: Text overlay model for the DOM HUD
//! - `assets`: Asset registry with fallback tracking
//! - `summary`: Score card export

pub mod assets;
#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod error;
pub mod hud;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod summary;

pub use error::{GameError, Result};
pub use session::{Cue, Session, ShipChoice};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one tick per 60 Hz display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    pub const TICKS_PER_SECOND: u32 = 60;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Largest frame delta fed into the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Play field used until the host reports the canvas size
    pub const DEFAULT_FIELD_WIDTH: f32 = 800.0;
    pub const DEFAULT_FIELD_HEIGHT: f32 = 600.0;

    /// Player defaults
    pub const MAX_LIVES: u8 = 3;
    pub const PLAYER_MENU_SIZE: f32 = 50.0;
    pub const PLAYER_SIZE: f32 = 60.0;
    pub const DEFAULT_SHIP_SPEED: f32 = 10.5;
    pub const PLAYER_BOTTOM_MARGIN: f32 = 20.0;
    /// Player speed while the shot cooldown is active
    pub const COOLDOWN_SPEED: f32 = 2.0;

    /// Projectiles
    pub const PROJECTILE_WIDTH: f32 = 10.0;
    pub const PROJECTILE_HEIGHT: f32 = 20.0;
    pub const PROJECTILE_SPEED: f32 = 10.0;
    /// Minimum wall-clock gap between shots (ms)
    pub const FIRE_INTERVAL_MS: f64 = 500.0;
    pub const SHOT_COOLDOWN_TICKS: u32 = 3 * 60;

    /// Power-ups
    pub const POWER_UP_SIZE: f32 = 30.0;
    pub const POWER_UP_SPEED: f32 = 3.0;
    pub const POWER_UP_CHECK_MS: f64 = 500.0;
    pub const POWER_UP_BASE_CHANCE: f64 = 0.10;
    pub const POWER_UP_CHANCE_PER_LEVEL: f64 = 0.005;
    pub const POWER_UP_MAX_CHANCE: f64 = 0.15;
    pub const SHIELD_TICKS: u32 = 7 * 60;
    pub const DOUBLE_SCORE_TICKS: u32 = 12 * 60;

    /// Power-up highlight and life-lost message duration
    pub const NOTIFICATION_TICKS: u32 = 3 * 60;

    /// Obstacle spawn timers (ms)
    pub const OBSTACLE_BASE_INTERVAL_MS: f64 = 800.0;
    pub const OBSTACLE_INTERVAL_LEVEL_FACTOR: f64 = 0.3;
    pub const MENU_SPAWN_INTERVAL_MS: f64 = 1000.0;
    /// Firings a single timer may catch up on in one pump
    pub const MAX_TIMER_CATCHUP: u32 = 4;

    /// Total score between level-ups
    pub const POINTS_PER_LEVEL: u32 = 20;

    /// Background scroll (pixels per tick)
    pub const BACKGROUND_SCROLL_SPEED: f32 = 2.0;

    /// Image preload gives up after this long (ms)
    pub const ASSET_PRELOAD_TIMEOUT_MS: f64 = 10_000.0;

    pub const DEFAULT_PLAYER_NAME: &str = "Player";
}

/// Format elapsed seconds as `MM:SS:hh` (hundredths), zero padded
pub fn format_time(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let minutes = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    let hundredths = ((seconds % 1.0) * 100.0).floor() as u64;
    format!("{minutes:02}:{secs:02}:{hundredths:02}")
}
