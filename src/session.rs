//! Game-state machine and frame scheduler
//!
//! `Session` owns the game state, the spawn timers and the tick accumulator.
//! The host calls `advance` once per display refresh; whether simulation
//! frames run is decided by `frame_active`, not by who schedules the call.

use crate::consts::*;
use crate::error::{Action, GameError, Result};
use crate::settings::Settings;
use crate::sim::spawner::{
    gameplay_spawns_allowed, obstacle_interval_ms, spawn_obstacle, spawn_power_up,
};
use crate::sim::{
    FireOutcome, Field, GameEvent, GamePhase, GameState, Task, TickInput, TimerHandle, Timers,
    tick,
};
use crate::summary::ScoreCard;

/// A ship picked on the menu
#[derive(Debug, Clone, PartialEq)]
pub struct ShipChoice {
    /// Sprite path for the ship image
    pub sprite: String,
    /// Horizontal speed (pixels per tick)
    pub speed: f32,
}

/// Side effects for the host to carry out (audio, overlays)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    StartMusic,
    PauseMusic,
    ResumeMusic,
    Explosion,
    /// Run ended; show the score card
    GameOver,
}

/// What a call to `advance` did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Simulation ticks run
    pub ticks: u32,
    /// Entities created by timers
    pub spawned: u32,
}

impl FrameReport {
    /// Whether the picture changed and should be redrawn
    pub fn needs_redraw(&self) -> bool {
        self.ticks > 0
    }
}

pub struct Session {
    state: GameState,
    timers: Timers,
    obstacle_timer: Option<TimerHandle>,
    menu_timer: Option<TimerHandle>,
    power_up_timer: Option<TimerHandle>,
    input: TickInput,
    accumulator: f32,
    last_frame_ms: Option<f64>,
    spawn_while_paused: bool,
    cues: Vec<Cue>,
}

impl Session {
    pub fn new(seed: u64, field: Field, settings: &Settings) -> Self {
        Self {
            state: GameState::new(seed, field),
            timers: Timers::new(),
            obstacle_timer: None,
            menu_timer: None,
            power_up_timer: None,
            input: TickInput::default(),
            accumulator: 0.0,
            last_frame_ms: None,
            spawn_while_paused: settings.spawn_while_paused,
            cues: Vec::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Simulation frames run only on the menu and during unpaused play
    pub fn frame_active(&self) -> bool {
        matches!(self.state.phase, GamePhase::Menu | GamePhase::Playing)
    }

    pub fn obstacle_timer_active(&self) -> bool {
        self.obstacle_timer
            .is_some_and(|handle| self.timers.is_active(handle))
    }

    pub fn menu_timer_active(&self) -> bool {
        self.menu_timer
            .is_some_and(|handle| self.timers.is_active(handle))
    }

    pub fn power_up_timer_active(&self) -> bool {
        self.power_up_timer
            .is_some_and(|handle| self.timers.is_active(handle))
    }

    /// Current gameplay spawn period, when the obstacle timer is running
    pub fn obstacle_period_ms(&self) -> Option<f64> {
        self.obstacle_timer
            .and_then(|handle| self.timers.period_ms(handle))
    }

    pub fn set_left(&mut self, held: bool) {
        self.input.left = held;
    }

    pub fn set_right(&mut self, held: bool) {
        self.input.right = held;
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.resize(width, height);
    }

    pub fn drain_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    pub fn score_card(&self) -> ScoreCard {
        ScoreCard::from_state(&self.state)
    }

    fn reject(&self, action: Action) -> GameError {
        GameError::InvalidTransition {
            phase: self.state.phase,
            action,
        }
    }

    /// Loading -> Menu, once the preload has settled
    pub fn enter_menu(&mut self, now_ms: f64) -> Result<()> {
        if self.state.phase != GamePhase::Loading {
            return Err(self.reject(Action::EnterMenu));
        }
        self.state.phase = GamePhase::Menu;
        self.menu_timer = Some(
            self.timers
                .start(Task::SpawnMenuObstacle, MENU_SPAWN_INTERVAL_MS, now_ms),
        );
        self.power_up_timer = Some(
            self.timers
                .start(Task::CheckPowerUp, POWER_UP_CHECK_MS, now_ms),
        );
        self.last_frame_ms = None;
        log::info!("Menu spawning started");
        Ok(())
    }

    /// Menu -> Playing with the chosen ship
    pub fn select_ship(
        &mut self,
        choice: &ShipChoice,
        player_name: &str,
        now_ms: f64,
    ) -> Result<()> {
        if self.state.phase != GamePhase::Menu {
            return Err(self.reject(Action::SelectShip));
        }
        if let Some(handle) = self.menu_timer.take() {
            self.timers.cancel(handle);
        }
        self.state.obstacles.clear();
        self.state.player_name = player_name.to_string();
        self.state.board_ship(choice.speed);
        self.begin_run(now_ms);
        log::info!(
            "{} launched in {} (speed {})",
            self.state.player_name,
            choice.sprite,
            choice.speed
        );
        Ok(())
    }

    /// Playing <-> Paused
    pub fn toggle_pause(&mut self) -> Result<()> {
        match self.state.phase {
            GamePhase::Playing => {
                self.state.phase = GamePhase::Paused;
                self.cues.push(Cue::PauseMusic);
                log::info!("Paused");
            }
            GamePhase::Paused => {
                self.state.phase = GamePhase::Playing;
                // Don't replay the time spent paused
                self.last_frame_ms = None;
                self.accumulator = 0.0;
                self.cues.push(Cue::ResumeMusic);
                log::info!("Resumed");
            }
            _ => return Err(self.reject(Action::TogglePause)),
        }
        Ok(())
    }

    /// Shoot, subject to the rate limit and shot cap
    pub fn fire(&mut self, now_ms: f64) -> Result<FireOutcome> {
        if self.state.phase != GamePhase::Playing {
            return Err(self.reject(Action::Fire));
        }
        let outcome = crate::sim::fire(&mut self.state, now_ms);
        self.handle_events(now_ms);
        Ok(outcome)
    }

    /// GameOver -> Playing with everything reset
    pub fn restart(&mut self, now_ms: f64) -> Result<()> {
        if self.state.phase != GamePhase::GameOver {
            return Err(self.reject(Action::Restart));
        }
        self.begin_run(now_ms);
        log::info!("Game restarted");
        Ok(())
    }

    fn begin_run(&mut self, now_ms: f64) {
        self.state.reset_run();
        self.state.phase = GamePhase::Playing;
        self.accumulator = 0.0;
        self.last_frame_ms = None;
        self.restart_obstacle_timer(now_ms);
        self.cues.push(Cue::StartMusic);
    }

    fn restart_obstacle_timer(&mut self, now_ms: f64) {
        if let Some(handle) = self.obstacle_timer.take() {
            self.timers.cancel(handle);
        }
        let period = obstacle_interval_ms(self.state.score.level);
        self.obstacle_timer = Some(self.timers.start(Task::SpawnObstacle, period, now_ms));
        log::debug!("Obstacle spawn interval {period:.1}ms");
    }

    /// Pump timers and run any simulation frames due at `now_ms`
    pub fn advance(&mut self, now_ms: f64) -> Result<FrameReport> {
        let dt = match self.last_frame_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => SIM_DT,
        };
        self.last_frame_ms = Some(now_ms);
        let dt = dt.clamp(0.0, MAX_FRAME_DT);

        let mut report = FrameReport {
            spawned: self.run_timers(now_ms),
            ..Default::default()
        };

        if self.frame_active() {
            self.accumulator += dt;
            while self.accumulator >= SIM_DT && report.ticks < MAX_SUBSTEPS {
                tick(&mut self.state, &self.input);
                self.accumulator -= SIM_DT;
                report.ticks += 1;
                self.handle_events(now_ms);
                if !self.frame_active() {
                    break;
                }
            }
            // Drop whatever the substep budget could not absorb
            self.accumulator = self.accumulator.min(SIM_DT);
        } else {
            self.accumulator = 0.0;
        }

        self.state.check_invariants()?;
        Ok(report)
    }

    fn run_timers(&mut self, now_ms: f64) -> u32 {
        let mut spawned = 0;
        for task in self.timers.due(now_ms) {
            let phase = self.state.phase;
            match task {
                Task::SpawnMenuObstacle => {
                    if phase == GamePhase::Menu {
                        spawn_obstacle(&mut self.state, true);
                        spawned += 1;
                    }
                }
                Task::SpawnObstacle => {
                    if gameplay_spawns_allowed(phase, self.spawn_while_paused) {
                        spawn_obstacle(&mut self.state, false);
                        spawned += 1;
                    }
                }
                Task::CheckPowerUp => {
                    if gameplay_spawns_allowed(phase, self.spawn_while_paused)
                        && spawn_power_up(&mut self.state).is_some()
                    {
                        spawned += 1;
                    }
                }
            }
        }
        spawned
    }

    fn handle_events(&mut self, now_ms: f64) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::LevelUp { .. } => self.restart_obstacle_timer(now_ms),
                GameEvent::LifeLost { lives_left } if lives_left > 0 => {
                    log::info!("{lives_left} lives left");
                }
                GameEvent::GameOver => {
                    if let Some(handle) = self.obstacle_timer.take() {
                        self.timers.cancel(handle);
                    }
                    self.cues.push(Cue::Explosion);
                    self.cues.push(Cue::PauseMusic);
                    self.cues.push(Cue::GameOver);
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Obstacle, ObstacleKind};
    use glam::Vec2;

    const FRAME_MS: f64 = 1000.0 / 60.0;

    fn ship() -> ShipChoice {
        ShipChoice {
            sprite: "assets/ship1.png".to_string(),
            speed: 9.0,
        }
    }

    fn menu_session() -> Session {
        let mut session = Session::new(42, Field::default(), &Settings::default());
        session.enter_menu(0.0).unwrap();
        session
    }

    fn playing_session() -> Session {
        let mut session = menu_session();
        session.select_ship(&ship(), "Ada", 0.0).unwrap();
        session
    }

    /// Drop an obstacle right on the ship
    fn ram_player(session: &mut Session) {
        let state = session.state_mut();
        let id = state.next_entity_id();
        let pos = state.player.pos;
        state.obstacles.push(Obstacle {
            id,
            kind: ObstacleKind::HeavyDebris,
            pos,
            size: Vec2::splat(40.0),
            speed: 0.0,
        });
    }

    #[test]
    fn test_loading_waits_for_menu() {
        let mut session = Session::new(1, Field::default(), &Settings::default());
        assert_eq!(session.phase(), GamePhase::Loading);
        assert!(!session.frame_active());
        let report = session.advance(5_000.0).unwrap();
        assert_eq!(report.ticks, 0);
        assert!(session.state().obstacles.is_empty());
    }

    #[test]
    fn test_menu_spawns_decorative_obstacles() {
        let mut session = menu_session();
        let mut now = 0.0;
        while now < 3_000.0 {
            now += FRAME_MS;
            session.advance(now).unwrap();
        }
        assert!(session.menu_timer_active());
        assert!(session.power_up_timer_active());
        assert!(!session.state().obstacles.is_empty());
        // Menu obstacles use base speed and never score
        for obstacle in &session.state().obstacles {
            assert_eq!(obstacle.speed, obstacle.kind.profile().base_speed);
        }
        assert_eq!(session.state().score.total, 0);
        assert!(session.state().power_ups.is_empty());
    }

    #[test]
    fn test_select_ship_starts_play() {
        let mut session = menu_session();
        session.advance(2_500.0).unwrap();
        session.select_ship(&ship(), "Ada", 2_500.0).unwrap();

        assert_eq!(session.phase(), GamePhase::Playing);
        assert!(!session.menu_timer_active());
        assert!(session.obstacle_timer_active());
        assert!(session.state().obstacles.is_empty());
        assert_eq!(session.state().player.speed, 9.0);
        assert_eq!(session.state().player_name, "Ada");
        assert_eq!(session.drain_cues(), vec![Cue::StartMusic]);
        let expected = obstacle_interval_ms(1);
        assert_eq!(session.obstacle_period_ms(), Some(expected));
    }

    #[test]
    fn test_invalid_transitions_rejected() {
        let mut session = menu_session();
        assert_eq!(
            session.toggle_pause(),
            Err(GameError::InvalidTransition {
                phase: GamePhase::Menu,
                action: Action::TogglePause
            })
        );
        assert!(session.fire(0.0).is_err());
        assert!(session.restart(0.0).is_err());
        assert!(session.enter_menu(0.0).is_err());
        assert_eq!(session.phase(), GamePhase::Menu);

        let mut session = playing_session();
        assert!(session.select_ship(&ship(), "Bo", 0.0).is_err());
        assert_eq!(session.state().player_name, "Ada");
    }

    #[test]
    fn test_pause_freezes_simulation() {
        let mut session = playing_session();
        session.advance(FRAME_MS).unwrap();
        session.toggle_pause().unwrap();
        assert!(!session.frame_active());

        let ticks = session.state().time_ticks;
        let mut now = FRAME_MS;
        for _ in 0..120 {
            now += FRAME_MS;
            assert_eq!(session.advance(now).unwrap().ticks, 0);
        }
        assert_eq!(session.state().time_ticks, ticks);
        // Spawn timers keep running but create nothing by default
        assert!(session.obstacle_timer_active());
        assert!(session.state().obstacles.is_empty());

        session.toggle_pause().unwrap();
        assert_eq!(session.phase(), GamePhase::Playing);
        let report = session.advance(now + FRAME_MS).unwrap();
        assert_eq!(report.ticks, 1);
        assert_eq!(
            session.drain_cues(),
            vec![Cue::StartMusic, Cue::PauseMusic, Cue::ResumeMusic]
        );
    }

    #[test]
    fn test_spawn_while_paused_policy() {
        let settings = Settings {
            spawn_while_paused: true,
            ..Default::default()
        };
        let mut session = Session::new(9, Field::default(), &settings);
        session.enter_menu(0.0).unwrap();
        session.select_ship(&ship(), "Ada", 0.0).unwrap();
        session.toggle_pause().unwrap();
        session.advance(700.0).unwrap();
        assert_eq!(session.state().obstacles.len(), 1);
        // Nothing moved
        assert!(session.state().obstacles[0].pos.y < 0.0);
    }

    #[test]
    fn test_obstacles_spawn_during_play() {
        let mut session = playing_session();
        let mut now = 0.0;
        let mut spawned = 0;
        while now < 2_000.0 {
            now += FRAME_MS;
            spawned += session.advance(now).unwrap().spawned;
        }
        // 615ms period over two seconds
        assert!(spawned >= 3, "spawned {spawned}");
    }

    #[test]
    fn test_level_up_restarts_obstacle_timer() {
        let mut session = playing_session();
        {
            let state = session.state_mut();
            state.score.dodged = 19;
            state.score.total = 19;
            let id = state.next_entity_id();
            state.obstacles.push(Obstacle {
                id,
                kind: ObstacleKind::LightRock,
                pos: Vec2::new(0.0, 600.0),
                size: Vec2::splat(20.0),
                speed: 1.0,
            });
        }
        session.advance(FRAME_MS).unwrap();
        assert_eq!(session.state().score.level, 2);
        assert_eq!(session.obstacle_period_ms(), Some(obstacle_interval_ms(2)));
    }

    #[test]
    fn test_game_over_stops_spawning() {
        let mut session = playing_session();
        session.state_mut().player.lives = 1;
        ram_player(&mut session);
        session.advance(FRAME_MS).unwrap();

        assert_eq!(session.phase(), GamePhase::GameOver);
        assert!(!session.obstacle_timer_active());
        assert!(!session.frame_active());
        let cues = session.drain_cues();
        assert!(cues.ends_with(&[Cue::Explosion, Cue::PauseMusic, Cue::GameOver]));

        let count = session.state().obstacles.len();
        session.advance(10_000.0).unwrap();
        assert_eq!(session.state().obstacles.len(), count);
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut session = playing_session();
        {
            let state = session.state_mut();
            state.score.dodged = 30;
            state.score.destroyed = 12;
            state.score.total = 42;
            state.score.level = 3;
            state.double_score_ticks = 300;
            state.weapon.shot_count = 5;
            state.player.lives = 1;
            state.player.shield_ticks = 0;
        }
        ram_player(&mut session);
        session.advance(FRAME_MS).unwrap();
        assert_eq!(session.phase(), GamePhase::GameOver);

        session.restart(5_000.0).unwrap();
        let state = session.state();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score.dodged, 0);
        assert_eq!(state.score.destroyed, 0);
        assert_eq!(state.score.total, 0);
        assert_eq!(state.score.level, 1);
        assert_eq!(state.player.lives, MAX_LIVES);
        assert!(state.obstacles.is_empty());
        assert!(state.power_ups.is_empty());
        assert!(state.projectiles.is_empty());
        assert!(!state.player.has_shield());
        assert!(!state.double_score_active());
        assert!(!state.weapon.cooldown_active());
        assert_eq!(state.weapon.shot_count, 0);
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.player.speed, 9.0);
        assert!(state.life_notice.is_none());
        assert!(session.obstacle_timer_active());
    }

    #[test]
    fn test_fire_through_session() {
        let mut session = playing_session();
        assert_eq!(session.fire(1_000.0), Ok(FireOutcome::Fired));
        assert_eq!(session.fire(1_100.0), Ok(FireOutcome::Blocked));
        assert_eq!(session.state().projectiles.len(), 1);
    }

    #[test]
    fn test_substeps_bounded() {
        let mut session = playing_session();
        session.advance(0.0).unwrap();
        // A long stall only runs a few ticks
        let report = session.advance(5_000.0).unwrap();
        assert!(report.ticks <= MAX_SUBSTEPS);
    }

    #[test]
    fn test_slow_frames_leave_no_backlog() {
        let mut session = playing_session();
        let mut now = 0.0;
        session.advance(now).unwrap();

        for _ in 0..100 {
            now += 100.0;
            session.state_mut().obstacles.clear();
            session.advance(now).unwrap();
        }

        let mut total = 0;
        for _ in 0..120 {
            now += FRAME_MS;
            session.state_mut().obstacles.clear();
            let report = session.advance(now).unwrap();
            assert!(report.ticks <= 2, "caught up {} ticks in one frame", report.ticks);
            total += report.ticks;
        }
        assert_eq!(session.phase(), GamePhase::Playing);
        assert!(total <= 121, "{total} ticks over 120 frames");
    }

    #[test]
    fn test_invariant_violation_surfaces_as_frame_error() {
        let mut session = playing_session();
        session.state_mut().score.total = 7;
        assert!(matches!(session.advance(FRAME_MS), Err(GameError::Frame(_))));
    }
}
