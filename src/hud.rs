//! HUD text model
//!
//! Plain strings for the DOM overlay; the browser host copies them into
//! their elements each frame.

use crate::format_time;
use crate::sim::GameState;

/// Pulsing message across the top of the field
#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub text: String,
    /// Opacity in [0, 1]
    pub alpha: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub player: String,
    pub rank: String,
    pub dodged: String,
    pub destroyed: String,
    pub total: String,
    pub double_score: Option<String>,
    pub cooldown: Option<String>,
    pub time: String,
    pub banner: Option<Banner>,
}

/// Whole seconds left, rounded up
fn seconds_left(ticks: u32) -> u32 {
    ticks.div_ceil(crate::consts::TICKS_PER_SECOND)
}

/// Banner opacity at game time `t` seconds
pub fn banner_alpha(t: f64, pulses: bool) -> f32 {
    if !pulses {
        return 1.0;
    }
    (0.5 + 0.5 * (t * 10.0).sin()).clamp(0.0, 1.0) as f32
}

impl Hud {
    pub fn from_state(state: &GameState, pulses: bool) -> Self {
        let score = &state.score;
        let t = state.elapsed_secs();

        let double_score = state
            .double_score_active()
            .then(|| format!("Double Score: {}s", seconds_left(state.double_score_ticks)));
        let cooldown = state.weapon.cooldown_active().then(|| {
            format!(
                "Shooting Cooldown: {}s",
                seconds_left(state.weapon.cooldown_ticks)
            )
        });
        let banner = state.life_notice.map(|notice| Banner {
            text: notice.message(),
            alpha: banner_alpha(t, pulses),
        });

        Self {
            player: format!("Player: {}, Level: {}", state.player_name, score.level),
            rank: format!("Rank: {}", state.rank_title()),
            dodged: format!("Dodged: {}", score.dodged),
            destroyed: format!("Destroyed: {}", score.destroyed),
            total: format!("Total Score: {}", score.total),
            double_score,
            cooldown,
            time: format!("Time: {}", format_time(t)),
            banner,
        }
    }
}
