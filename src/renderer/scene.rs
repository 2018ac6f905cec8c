//! Draw-list building
//!
//! Turns a read-only view of the game state into back-to-front draw commands
//! in field pixels. Any sprite that is not loaded is swapped for its fallback
//! fill here, so the GPU side never has to know about asset status.

use glam::Vec2;

use super::vertex::{colors, obstacle_fallback};
use crate::assets::{AssetId, AssetRegistry};
use crate::sim::{Field, GamePhase, GameState, PowerUpKind, Rect};

/// Outline inset around the player and power-ups
const OUTLINE_MARGIN: f32 = 5.0;
const OUTLINE_THICKNESS: f32 = 3.0;

/// Lives row along the bottom-left corner
const HEART_SIZE: f32 = 30.0;
const HEART_SPACING: f32 = 40.0;
const HEART_INSET: f32 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Sprite {
        asset: AssetId,
        rect: Rect,
        alpha: f32,
    },
    Fill {
        rect: Rect,
        color: [f32; 4],
    },
    Outline {
        rect: Rect,
        color: [f32; 4],
        thickness: f32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub field: Field,
    pub commands: Vec<DrawCommand>,
    /// Assets that were replaced by a fallback fill this frame
    pub fallbacks: Vec<AssetId>,
}

impl Scene {
    fn new(field: Field) -> Self {
        Self {
            field,
            commands: Vec::new(),
            fallbacks: Vec::new(),
        }
    }

    fn fill(&mut self, rect: Rect, color: [f32; 4]) {
        self.commands.push(DrawCommand::Fill { rect, color });
    }

    fn outline(&mut self, rect: Rect, color: [f32; 4]) {
        self.commands.push(DrawCommand::Outline {
            rect,
            color,
            thickness: OUTLINE_THICKNESS,
        });
    }

    /// Sprite when available, otherwise the fallback fill
    fn sprite_or(&mut self, assets: &AssetRegistry, asset: AssetId, rect: Rect, fallback: [f32; 4]) {
        if assets.is_available(asset) {
            self.commands.push(DrawCommand::Sprite {
                asset,
                rect,
                alpha: 1.0,
            });
        } else {
            self.note_fallback(asset);
            self.fill(rect, fallback);
        }
    }

    fn note_fallback(&mut self, asset: AssetId) {
        if !self.fallbacks.contains(&asset) {
            self.fallbacks.push(asset);
        }
    }
}

/// `base + amp * sin(rate * t)`, or fully opaque when pulses are off
fn pulse(t: f64, base: f64, amp: f64, rate: f64, pulses: bool) -> f32 {
    if !pulses {
        return 1.0;
    }
    (base + amp * (rate * t).sin()).clamp(0.0, 1.0) as f32
}

/// Build the draw list for the current frame
pub fn build_scene(state: &GameState, assets: &AssetRegistry, pulses: bool) -> Scene {
    let field = state.field;
    let mut scene = Scene::new(field);
    let t = state.elapsed_secs();

    // Background: two stacked copies scrolling down
    let full = Vec2::new(field.width, field.height);
    if assets.is_available(AssetId::Background) {
        for y in [state.background_offset - field.height, state.background_offset] {
            scene.commands.push(DrawCommand::Sprite {
                asset: AssetId::Background,
                rect: Rect::from_pos_size(Vec2::new(0.0, y), full),
                alpha: 1.0,
            });
        }
    } else {
        scene.note_fallback(AssetId::Background);
        scene.fill(Rect::from_pos_size(Vec2::ZERO, full), colors::BLACK);
    }

    let in_run = matches!(
        state.phase,
        GamePhase::Playing | GamePhase::Paused | GamePhase::GameOver
    );

    if in_run && state.ship_selected {
        let player = state.player.bounds();
        scene.sprite_or(assets, AssetId::PlayerShip, player, colors::BLUE);

        let ring = player.inflate(OUTLINE_MARGIN);
        if let Some(highlight) = state.highlight {
            let color = match highlight.kind {
                PowerUpKind::Shield => colors::GREEN,
                PowerUpKind::DoubleScore => colors::YELLOW,
            };
            let alpha = pulse(t, 0.5, 0.5, 5.0, pulses);
            scene.outline(ring, colors::with_alpha(color, alpha));
        }
        if state.player.has_shield() {
            scene.outline(ring, colors::CYAN);
        }
        if state.weapon.cooldown_active() {
            let alpha = pulse(t, 0.5, 0.5, 5.0, pulses);
            scene.outline(ring, colors::with_alpha(colors::YELLOW, alpha));
        }
    }

    for obstacle in &state.obstacles {
        scene.sprite_or(
            assets,
            AssetId::for_obstacle(obstacle.kind),
            obstacle.bounds(),
            obstacle_fallback(obstacle.kind),
        );
    }

    for power_up in &state.power_ups {
        let asset = AssetId::for_power_up(power_up.kind);
        let bounds = power_up.bounds();
        if assets.is_available(asset) {
            let alpha = pulse(t, 0.3, 0.7, 0.8, pulses);
            scene.outline(
                bounds.inflate(OUTLINE_MARGIN),
                colors::with_alpha(colors::WHITE, alpha),
            );
        }
        scene.sprite_or(assets, asset, bounds, colors::PURPLE);
    }

    for projectile in &state.projectiles {
        scene.fill(projectile.bounds(), colors::RED);
    }

    if in_run {
        for i in 0..state.player.lives {
            let pos = Vec2::new(
                HEART_INSET + i as f32 * HEART_SPACING,
                field.height - HEART_SPACING,
            );
            let rect = Rect::from_pos_size(pos, Vec2::splat(HEART_SIZE));
            scene.sprite_or(assets, AssetId::Heart, rect, colors::RED);
        }
    }

    scene
}

/// Plain background shown after a frame fault
pub fn fallback_scene(field: Field) -> Scene {
    let mut scene = Scene::new(field);
    scene.fill(
        Rect::from_pos_size(Vec2::ZERO, Vec2::new(field.width, field.height)),
        colors::BLACK,
    );
    scene
}
