//! Obstacle and power-up creation
//!
//! Spawns only ever append to the entity lists; the session decides when a
//! spawn is allowed and drives the timers that call in here.

use glam::Vec2;
use rand::Rng;

use super::state::{GamePhase, GameState, Obstacle, ObstacleKind, PowerUp, PowerUpKind};
use crate::consts::*;

/// Gameplay obstacle spawn period for a level (ms)
pub fn obstacle_interval_ms(level: u32) -> f64 {
    OBSTACLE_BASE_INTERVAL_MS / (1.0 + level as f64 * OBSTACLE_INTERVAL_LEVEL_FACTOR)
}

/// Chance that a power-up check produces a power-up
pub fn power_up_chance(level: u32) -> f64 {
    (POWER_UP_BASE_CHANCE + level as f64 * POWER_UP_CHANCE_PER_LEVEL).min(POWER_UP_MAX_CHANCE)
}

/// Whether gameplay spawns (obstacles and power-ups) may run in `phase`
pub fn gameplay_spawns_allowed(phase: GamePhase, spawn_while_paused: bool) -> bool {
    match phase {
        GamePhase::Playing => true,
        GamePhase::Paused => spawn_while_paused,
        _ => false,
    }
}

/// Add one obstacle above the top edge; returns its id
pub fn spawn_obstacle(state: &mut GameState, is_menu: bool) -> u32 {
    let kind = ObstacleKind::from_roll(state.rng.random::<f64>());
    let profile = kind.profile();
    let size = profile.min_size + state.rng.random::<f32>() * profile.size_span;
    let x = state.rng.random::<f32>() * (state.field.width - size).max(0.0);
    let speed = kind.speed(state.score.level, is_menu);

    let id = state.next_entity_id();
    state.obstacles.push(Obstacle {
        id,
        kind,
        pos: Vec2::new(x, -size),
        size: Vec2::splat(size),
        speed,
    });
    log::debug!("spawned {kind:?} #{id} size={size:.1} speed={speed:.2} menu={is_menu}");
    id
}

/// Roll for a power-up; returns the new id when one was created
pub fn spawn_power_up(state: &mut GameState) -> Option<u32> {
    if !state.rng.random_bool(power_up_chance(state.score.level)) {
        return None;
    }
    let kind = if state.rng.random_bool(0.5) {
        PowerUpKind::Shield
    } else {
        PowerUpKind::DoubleScore
    };
    let x = state.rng.random::<f32>() * (state.field.width - POWER_UP_SIZE).max(0.0);

    let id = state.next_entity_id();
    state.power_ups.push(PowerUp {
        id,
        kind,
        pos: Vec2::new(x, -POWER_UP_SIZE),
        size: Vec2::splat(POWER_UP_SIZE),
        speed: POWER_UP_SPEED,
    });
    log::debug!("spawned power-up {kind:?} #{id}");
    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Field;

    #[test]
    fn test_obstacle_interval() {
        assert!((obstacle_interval_ms(1) - 800.0 / 1.3).abs() < 1e-9);
        assert!((obstacle_interval_ms(10) - 200.0).abs() < 1e-9);
        assert!(obstacle_interval_ms(5) < obstacle_interval_ms(4));
    }

    #[test]
    fn test_power_up_chance_capped() {
        assert!((power_up_chance(1) - 0.105).abs() < 1e-12);
        assert!((power_up_chance(10) - 0.15).abs() < 1e-12);
        assert!((power_up_chance(50) - 0.15).abs() < 1e-12);
    }

    #[test]
    fn test_spawn_gate() {
        assert!(gameplay_spawns_allowed(GamePhase::Playing, false));
        assert!(!gameplay_spawns_allowed(GamePhase::Paused, false));
        assert!(gameplay_spawns_allowed(GamePhase::Paused, true));
        assert!(!gameplay_spawns_allowed(GamePhase::Menu, true));
        assert!(!gameplay_spawns_allowed(GamePhase::GameOver, true));
    }

    #[test]
    fn test_spawned_obstacles_respect_profiles() {
        let mut state = GameState::new(7, Field { width: 500.0, height: 400.0 });
        state.score.level = 4;
        for _ in 0..500 {
            spawn_obstacle(&mut state, false);
        }
        for obstacle in &state.obstacles {
            let profile = obstacle.kind.profile();
            let size = obstacle.size.x;
            assert_eq!(obstacle.size.x, obstacle.size.y);
            assert!(size >= profile.min_size && size < profile.min_size + profile.size_span);
            assert_eq!(obstacle.pos.y, -size);
            assert!(obstacle.pos.x >= 0.0 && obstacle.pos.x <= 500.0 - size);
            assert_eq!(obstacle.speed, obstacle.kind.speed(4, false));
        }
        // Every kind shows up over enough draws
        for kind in ObstacleKind::ALL {
            assert!(state.obstacles.iter().any(|o| o.kind == kind));
        }
    }

    #[test]
    fn test_menu_obstacles_use_base_speed() {
        let mut state = GameState::new(3, Field::default());
        state.score.level = 9;
        spawn_obstacle(&mut state, true);
        let obstacle = &state.obstacles[0];
        assert_eq!(obstacle.speed, obstacle.kind.profile().base_speed);
    }

    #[test]
    fn test_power_ups_spawn_at_top() {
        let mut state = GameState::new(11, Field::default());
        let spawned = (0..1000).filter_map(|_| spawn_power_up(&mut state)).count();
        assert_eq!(spawned, state.power_ups.len());
        // 10.5% chance over 1000 rolls
        assert!(spawned > 50 && spawned < 170, "spawned {spawned}");
        for power_up in &state.power_ups {
            assert_eq!(power_up.pos.y, -POWER_UP_SIZE);
            assert_eq!(power_up.size, Vec2::splat(POWER_UP_SIZE));
            assert_eq!(power_up.speed, POWER_UP_SPEED);
        }
    }
}
