//! Fixed timestep simulation tick
//!
//! Advances the game state by one 60 Hz step. Resolution order inside a
//! gameplay tick: countdowns, background, player, obstacle hits on the player,
//! dodged obstacles, power-ups, projectiles, double-score countdown.

use glam::Vec2;

use super::scoring::Award;
use super::state::{
    GameEvent, GamePhase, GameState, LifeLostNotice, PowerUpHighlight, PowerUpKind, Projectile,
};
use super::weapon::FireOutcome;
use crate::consts::*;

/// Held input for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    match state.phase {
        GamePhase::Menu => menu_tick(state),
        GamePhase::Playing => play_tick(state, input),
        GamePhase::Loading | GamePhase::Paused | GamePhase::GameOver => {}
    }
}

/// Fire a projectile from the ship's nose at wall-clock `now_ms`
pub fn fire(state: &mut GameState, now_ms: f64) -> FireOutcome {
    if state.phase != GamePhase::Playing {
        return FireOutcome::Blocked;
    }
    let outcome = state.weapon.try_fire(now_ms, state.score.level);
    if !outcome.fired() {
        return outcome;
    }

    if outcome == FireOutcome::FiredAndOverheated {
        state.player.speed = COOLDOWN_SPEED;
        state.push_event(GameEvent::CooldownStarted);
        log::info!(
            "Shooting cooldown: {} shots reached at level {}",
            state.weapon.shot_count,
            state.score.level
        );
    }

    let player = &state.player;
    let pos = Vec2::new(
        player.pos.x + player.size.x / 2.0 - PROJECTILE_WIDTH / 2.0,
        player.pos.y,
    );
    let id = state.next_entity_id();
    state.projectiles.push(Projectile {
        id,
        pos,
        size: Vec2::new(PROJECTILE_WIDTH, PROJECTILE_HEIGHT),
        vel_y: -PROJECTILE_SPEED,
    });
    outcome
}

fn scroll_background(state: &mut GameState) {
    state.background_offset += BACKGROUND_SCROLL_SPEED;
    if state.background_offset >= state.field.height {
        state.background_offset = 0.0;
    }
}

/// Menu backdrop: obstacles drift down, nothing scores
fn menu_tick(state: &mut GameState) {
    scroll_background(state);
    for obstacle in &mut state.obstacles {
        obstacle.pos.y += obstacle.speed;
    }
    let height = state.field.height;
    state.obstacles.retain(|o| o.pos.y <= height);
}

fn play_tick(state: &mut GameState, input: &TickInput) {
    state.time_ticks += 1;
    update_countdowns(state);
    scroll_background(state);

    if input.left {
        state.player.steer(-1.0, state.field);
    }
    if input.right {
        state.player.steer(1.0, state.field);
    }

    for obstacle in &mut state.obstacles {
        obstacle.pos.y += obstacle.speed;
    }
    if resolve_player_hits(state) {
        // Run is over; nothing else moves this tick
        return;
    }
    collect_dodges(state);
    update_power_ups(state);
    update_projectiles(state);

    if state.double_score_ticks > 0 {
        state.double_score_ticks -= 1;
    }
}

fn update_countdowns(state: &mut GameState) {
    if state.weapon.tick_cooldown() {
        state.player.speed = state.player.base_speed;
        state.push_event(GameEvent::CooldownEnded);
        log::info!("Shooting cooldown ended");
    }

    if let Some(highlight) = &mut state.highlight {
        highlight.ticks = highlight.ticks.saturating_sub(1);
        if highlight.ticks == 0 {
            state.highlight = None;
        }
    }

    state.player.shield_ticks = state.player.shield_ticks.saturating_sub(1);

    if let Some(notice) = &mut state.life_notice {
        notice.ticks = notice.ticks.saturating_sub(1);
        if notice.ticks == 0 {
            state.life_notice = None;
        }
    }
}

/// Obstacles touching the ship. Returns true when the last life was lost.
fn resolve_player_hits(state: &mut GameState) -> bool {
    let mut i = 0;
    while i < state.obstacles.len() {
        if !state.obstacles[i].bounds().overlaps(&state.player.bounds()) {
            i += 1;
            continue;
        }
        state.obstacles.remove(i);

        if state.player.has_shield() {
            state.player.shield_ticks = 0;
            state.push_event(GameEvent::ShieldAbsorbed);
            continue;
        }

        state.player.lives = state.player.lives.saturating_sub(1);
        let lives_left = state.player.lives;
        state.life_notice = Some(LifeLostNotice {
            lives_left,
            ticks: NOTIFICATION_TICKS,
        });
        state.push_event(GameEvent::LifeLost { lives_left });

        if lives_left == 0 {
            state.phase = GamePhase::GameOver;
            state.push_event(GameEvent::GameOver);
            log::info!(
                "Game over: {} points, level {} ({})",
                state.score.total,
                state.score.level,
                state.rank_title()
            );
            return true;
        }
        state.player.recenter(state.field);
    }
    false
}

fn collect_dodges(state: &mut GameState) {
    let height = state.field.height;
    let before = state.obstacles.len();
    state.obstacles.retain(|o| o.pos.y <= height);
    for _ in state.obstacles.len()..before {
        award(state, Award::Dodge);
    }
}

fn update_power_ups(state: &mut GameState) {
    for power_up in &mut state.power_ups {
        power_up.pos.y += power_up.speed;
    }

    let player = state.player.bounds();
    let height = state.field.height;
    let mut collected = Vec::new();
    state.power_ups.retain(|p| {
        if p.bounds().overlaps(&player) {
            collected.push(p.kind);
            false
        } else {
            p.pos.y <= height
        }
    });

    for kind in collected {
        apply_power_up(state, kind);
    }
}

/// Re-collecting resets the timer rather than extending it
fn apply_power_up(state: &mut GameState, kind: PowerUpKind) {
    match kind {
        PowerUpKind::Shield => state.player.shield_ticks = SHIELD_TICKS,
        PowerUpKind::DoubleScore => state.double_score_ticks = DOUBLE_SCORE_TICKS,
    }
    state.highlight = Some(PowerUpHighlight {
        kind,
        ticks: NOTIFICATION_TICKS,
    });
    state.push_event(GameEvent::PowerUpCollected(kind));
}

fn update_projectiles(state: &mut GameState) {
    for projectile in &mut state.projectiles {
        projectile.pos.y += projectile.vel_y;
    }

    let mut i = 0;
    while i < state.projectiles.len() {
        let bounds = state.projectiles[i].bounds();
        if let Some(j) = state
            .obstacles
            .iter()
            .position(|o| o.bounds().overlaps(&bounds))
        {
            state.obstacles.remove(j);
            state.projectiles.remove(i);
            award(state, Award::Destroy);
            continue;
        }
        if bounds.pos.y < 0.0 {
            state.projectiles.remove(i);
            continue;
        }
        i += 1;
    }
}

fn award(state: &mut GameState, award: Award) {
    let double = state.double_score_active();
    let level_up = state.score.award(award, double);
    state.push_event(match award {
        Award::Dodge => GameEvent::ObstacleDodged,
        Award::Destroy => GameEvent::ObstacleDestroyed,
    });
    if let Some(level) = level_up {
        state.push_event(GameEvent::LevelUp { level });
        log::info!("Level up to {level}: rank is now {}", state.rank_title());
    }
}
