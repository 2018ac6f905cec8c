//! Game state and core simulation types
//!
//! Everything the per-tick simulation reads or writes lives in `GameState`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::scoring::Scoreboard;
use super::weapon::Weapon;
use crate::consts::*;
use crate::error::{GameError, Result};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for image preload to settle
    Loading,
    /// Decorative obstacles only, waiting for ship selection
    Menu,
    /// Active gameplay
    Playing,
    /// Simulation frozen
    Paused,
    /// Run ended, score card on screen
    GameOver,
}

/// Obstacle kinds, each with its own size and speed profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    LightRock,
    FastFragment,
    HeavyDebris,
    DenseShard,
    DriftingJunk,
    LargeCraft,
}

/// Spawn tunables for one obstacle kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleProfile {
    pub base_speed: f32,
    /// Extra speed per level (gameplay spawns only)
    pub level_multiplier: f32,
    pub min_size: f32,
    /// Size is drawn from `[min_size, min_size + size_span)`
    pub size_span: f32,
}

const PROFILES: [ObstacleProfile; 6] = [
    ObstacleProfile { base_speed: 2.0, level_multiplier: 1.2, min_size: 40.0, size_span: 30.0 },
    ObstacleProfile { base_speed: 4.0, level_multiplier: 1.6, min_size: 20.0, size_span: 20.0 },
    ObstacleProfile { base_speed: 1.0, level_multiplier: 0.8, min_size: 60.0, size_span: 40.0 },
    ObstacleProfile { base_speed: 5.0, level_multiplier: 2.0, min_size: 15.0, size_span: 10.0 },
    ObstacleProfile { base_speed: 1.5, level_multiplier: 0.96, min_size: 50.0, size_span: 30.0 },
    ObstacleProfile { base_speed: 0.8, level_multiplier: 0.64, min_size: 70.0, size_span: 30.0 },
];

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 6] = [
        ObstacleKind::LightRock,
        ObstacleKind::FastFragment,
        ObstacleKind::HeavyDebris,
        ObstacleKind::DenseShard,
        ObstacleKind::DriftingJunk,
        ObstacleKind::LargeCraft,
    ];

    pub fn profile(self) -> &'static ObstacleProfile {
        &PROFILES[self as usize]
    }

    /// Map a uniform draw in [0, 1) onto six equal slices, in `ALL` order
    pub fn from_roll(roll: f64) -> Self {
        let index = ((roll.clamp(0.0, 1.0) * 6.0) as usize).min(5);
        Self::ALL[index]
    }

    /// Fall speed; menu obstacles ignore the level bonus
    pub fn speed(self, level: u32, is_menu: bool) -> f32 {
        let profile = self.profile();
        if is_menu {
            profile.base_speed
        } else {
            profile.base_speed + level as f32 * profile.level_multiplier
        }
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    Shield,
    DoubleScore,
}

/// Play field size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub width: f32,
    pub height: f32,
}

impl Default for Field {
    fn default() -> Self {
        Self {
            width: DEFAULT_FIELD_WIDTH,
            height: DEFAULT_FIELD_HEIGHT,
        }
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    /// Current horizontal speed (pixels per tick)
    pub speed: f32,
    /// Ship speed restored after a shot cooldown
    pub base_speed: f32,
    /// Ticks of shield left (0 = no shield)
    pub shield_ticks: u32,
    pub lives: u8,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            size: Vec2::splat(PLAYER_MENU_SIZE),
            speed: DEFAULT_SHIP_SPEED,
            base_speed: DEFAULT_SHIP_SPEED,
            shield_ticks: 0,
            lives: MAX_LIVES,
        }
    }
}

impl Player {
    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn has_shield(&self) -> bool {
        self.shield_ticks > 0
    }

    /// Horizontally centred, just above the bottom edge
    pub fn spawn_position(&self, field: Field) -> Vec2 {
        Vec2::new(
            field.width / 2.0 - self.size.x / 2.0,
            field.height - self.size.y - PLAYER_BOTTOM_MARGIN,
        )
    }

    pub fn recenter(&mut self, field: Field) {
        self.pos = self.spawn_position(field);
    }

    /// Move by `dir` * speed, kept inside the field's width
    pub fn steer(&mut self, dir: f32, field: Field) {
        let max_x = (field.width - self.size.x).max(0.0);
        self.pos.x = (self.pos.x + dir * self.speed).clamp(0.0, max_x);
    }
}

/// A falling obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
}

impl Obstacle {
    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// A falling power-up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
}

impl PowerUp {
    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// A player shot travelling upward
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    /// Signed y velocity (negative = up)
    pub vel_y: f32,
}

impl Projectile {
    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// Outline flashed around the player after a pickup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerUpHighlight {
    pub kind: PowerUpKind,
    pub ticks: u32,
}

/// "N Lives Left!" banner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LifeLostNotice {
    pub lives_left: u8,
    pub ticks: u32,
}

impl LifeLostNotice {
    pub fn message(&self) -> String {
        format!("{} Lives Left!", self.lives_left)
    }
}

/// Things that happened during a tick, drained by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    ObstacleDodged,
    ObstacleDestroyed,
    ShieldAbsorbed,
    LifeLost { lives_left: u8 },
    PowerUpCollected(PowerUpKind),
    LevelUp { level: u32 },
    CooldownStarted,
    CooldownEnded,
    GameOver,
}

fn unseeded_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    #[serde(skip, default = "unseeded_rng")]
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub field: Field,
    pub player: Player,
    /// Set once a ship has been picked; the player is only drawn after that
    pub ship_selected: bool,
    pub player_name: String,
    pub obstacles: Vec<Obstacle>,
    pub power_ups: Vec<PowerUp>,
    pub projectiles: Vec<Projectile>,
    pub score: Scoreboard,
    pub weapon: Weapon,
    /// Ticks of double score left (0 = inactive)
    pub double_score_ticks: u32,
    pub highlight: Option<PowerUpHighlight>,
    pub life_notice: Option<LifeLostNotice>,
    /// Gameplay ticks since the run started
    pub time_ticks: u64,
    /// Background scroll position in [0, field height)
    pub background_offset: f32,
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    pub fn new(seed: u64, field: Field) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Loading,
            field,
            player: Player::default(),
            ship_selected: false,
            player_name: DEFAULT_PLAYER_NAME.to_string(),
            obstacles: Vec::new(),
            power_ups: Vec::new(),
            projectiles: Vec::new(),
            score: Scoreboard::default(),
            weapon: Weapon::default(),
            double_score_ticks: 0,
            highlight: None,
            life_notice: None,
            time_ticks: 0,
            background_offset: 0.0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn double_score_active(&self) -> bool {
        self.double_score_ticks > 0
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.time_ticks as f64 / TICKS_PER_SECOND as f64
    }

    pub fn rank_title(&self) -> &'static str {
        self.score.rank_title()
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Put the chosen ship at the spawn point with full size and speed
    pub fn board_ship(&mut self, speed: f32) {
        self.player.size = Vec2::splat(PLAYER_SIZE);
        self.player.speed = speed;
        self.player.base_speed = speed;
        self.player.recenter(self.field);
        self.ship_selected = true;
    }

    /// Reset everything a new run starts from; ship, name and field survive
    pub fn reset_run(&mut self) {
        self.obstacles.clear();
        self.power_ups.clear();
        self.projectiles.clear();
        self.score = Scoreboard::default();
        self.weapon = Weapon::default();
        self.double_score_ticks = 0;
        self.highlight = None;
        self.life_notice = None;
        self.time_ticks = 0;
        self.player.lives = MAX_LIVES;
        self.player.shield_ticks = 0;
        self.player.speed = self.player.base_speed;
        self.player.recenter(self.field);
        self.events.clear();
    }

    /// Rescale entities when the play field changes size
    pub fn resize(&mut self, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        let scale = Vec2::new(width / self.field.width, height / self.field.height);
        self.field = Field { width, height };

        for obstacle in &mut self.obstacles {
            obstacle.pos *= scale;
            obstacle.size *= scale;
        }
        for power_up in &mut self.power_ups {
            power_up.pos *= scale;
            power_up.size *= scale;
        }
        for projectile in &mut self.projectiles {
            projectile.pos *= scale;
            projectile.size *= scale;
        }
        if self.ship_selected {
            let max_x = (width - self.player.size.x).max(0.0);
            self.player.pos.x = (self.player.pos.x * scale.x).clamp(0.0, max_x);
            self.player.pos.y = height - self.player.size.y - PLAYER_BOTTOM_MARGIN;
        }
        self.background_offset = self.background_offset.min(height) % height;
    }

    /// Check the invariants a finished frame must hold
    pub fn check_invariants(&self) -> Result<()> {
        let score = &self.score;
        if score.total != score.dodged + score.destroyed {
            return Err(GameError::Frame(format!(
                "total {} != dodged {} + destroyed {}",
                score.total, score.dodged, score.destroyed
            )));
        }
        if score.level != 1 + score.total / POINTS_PER_LEVEL {
            return Err(GameError::Frame(format!(
                "level {} out of step with total {}",
                score.level, score.total
            )));
        }
        if self.player.lives > MAX_LIVES {
            return Err(GameError::Frame(format!("lives {} above max", self.player.lives)));
        }
        if self.player.lives == 0 && self.phase != GamePhase::GameOver {
            return Err(GameError::Frame(format!(
                "no lives left but phase is {:?}",
                self.phase
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_partition() {
        assert_eq!(ObstacleKind::from_roll(0.0), ObstacleKind::LightRock);
        assert_eq!(ObstacleKind::from_roll(0.16), ObstacleKind::LightRock);
        assert_eq!(ObstacleKind::from_roll(0.17), ObstacleKind::FastFragment);
        assert_eq!(ObstacleKind::from_roll(0.4), ObstacleKind::HeavyDebris);
        assert_eq!(ObstacleKind::from_roll(0.6), ObstacleKind::DenseShard);
        assert_eq!(ObstacleKind::from_roll(0.8), ObstacleKind::DriftingJunk);
        assert_eq!(ObstacleKind::from_roll(0.9999), ObstacleKind::LargeCraft);
    }

    #[test]
    fn test_kind_speed() {
        assert_eq!(ObstacleKind::DenseShard.speed(3, false), 11.0);
        assert_eq!(ObstacleKind::DenseShard.speed(3, true), 5.0);
        assert!((ObstacleKind::LightRock.speed(1, false) - 3.2).abs() < 1e-6);
    }

    #[test]
    fn test_steer_clamps_to_field() {
        let field = Field { width: 200.0, height: 100.0 };
        let mut player = Player::default();
        player.size = Vec2::splat(60.0);
        player.pos = Vec2::new(5.0, 20.0);
        player.steer(-1.0, field);
        assert_eq!(player.pos.x, 0.0);

        player.pos.x = 135.0;
        player.steer(1.0, field);
        assert_eq!(player.pos.x, 140.0);
    }

    #[test]
    fn test_board_ship_positions_player() {
        let mut state = GameState::new(1, Field { width: 800.0, height: 600.0 });
        state.board_ship(8.0);
        assert_eq!(state.player.size, Vec2::splat(60.0));
        assert_eq!(state.player.pos, Vec2::new(370.0, 520.0));
        assert_eq!(state.player.base_speed, 8.0);
        assert!(state.ship_selected);
    }

    #[test]
    fn test_resize_scales_entities() {
        let mut state = GameState::new(1, Field { width: 400.0, height: 300.0 });
        state.board_ship(10.0);
        state.player.pos.x = 100.0;
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle {
            id,
            kind: ObstacleKind::LightRock,
            pos: Vec2::new(40.0, 30.0),
            size: Vec2::splat(40.0),
            speed: 2.0,
        });

        state.resize(800.0, 600.0);

        assert_eq!(state.obstacles[0].pos, Vec2::new(80.0, 60.0));
        assert_eq!(state.obstacles[0].size, Vec2::splat(80.0));
        assert_eq!(state.player.pos, Vec2::new(200.0, 520.0));
        assert_eq!(state.field, Field { width: 800.0, height: 600.0 });
    }

    #[test]
    fn test_resize_keeps_player_inside_narrower_field() {
        let mut state = GameState::new(1, Field { width: 800.0, height: 600.0 });
        state.board_ship(10.0);
        state.player.pos.x = 800.0 - state.player.size.x;

        state.resize(300.0, 600.0);

        assert!(state.player.pos.x >= 0.0);
        assert!(state.player.pos.x + state.player.size.x <= 300.0);
        assert_eq!(state.player.pos.x, 300.0 - state.player.size.x);
    }

    #[test]
    fn test_invariant_check_flags_bad_total() {
        let mut state = GameState::new(1, Field::default());
        assert!(state.check_invariants().is_ok());
        state.score.total = 5;
        assert!(matches!(state.check_invariants(), Err(GameError::Frame(_))));
    }
}
