//! End-to-end runs through the public session API

use proptest::prelude::*;

use nebula_nomad::assets::{AssetId, AssetRegistry};
use nebula_nomad::consts::MAX_LIVES;
use nebula_nomad::hud::Hud;
use nebula_nomad::renderer::{build_scene, shapes::tessellate};
use nebula_nomad::sim::{Field, GamePhase};
use nebula_nomad::{Cue, Session, Settings, ShipChoice};

const FRAME_MS: f64 = 1000.0 / 60.0;

fn ship() -> ShipChoice {
    ShipChoice {
        sprite: "assets/ship2.png".to_string(),
        speed: 12.0,
    }
}

fn start(seed: u64) -> (Session, f64) {
    let settings = Settings::default();
    let mut session = Session::new(seed, Field::default(), &settings);
    session.enter_menu(0.0).unwrap();

    let mut now = 0.0;
    for _ in 0..90 {
        now += FRAME_MS;
        session.advance(now).unwrap();
    }
    let name = settings.player_name("  ");
    session.select_ship(&ship(), &name, now).unwrap();
    (session, now)
}

/// Sit still and let the obstacles come; returns the final clock
fn play_until_game_over(session: &mut Session, mut now: f64) -> f64 {
    for _ in 0..60 * 60 * 20 {
        now += FRAME_MS;
        session.advance(now).unwrap();
        if session.phase() == GamePhase::GameOver {
            break;
        }
    }
    now
}

#[test]
fn test_menu_to_game_over_to_restart() {
    let (mut session, now) = start(11);
    assert_eq!(session.state().player_name, "Player");
    assert_eq!(session.drain_cues(), vec![Cue::StartMusic]);

    let now = play_until_game_over(&mut session, now);
    assert_eq!(session.phase(), GamePhase::GameOver);
    assert_eq!(session.state().player.lives, 0);

    let cues = session.drain_cues();
    assert!(cues.contains(&Cue::Explosion));
    assert_eq!(cues.last(), Some(&Cue::GameOver));

    let card = session.score_card();
    let text = card.to_text();
    assert!(text.starts_with("Nebula Nomad Score Card\n\nPlayer: Player\n"));
    assert!(text.contains(&format!("Total Score: {}", card.dodged + card.destroyed)));
    assert!(card.share_text().starts_with("Nebula Nomad: Player ("));

    session.restart(now).unwrap();
    assert_eq!(session.phase(), GamePhase::Playing);
    assert_eq!(session.state().player.lives, MAX_LIVES);
    assert_eq!(session.state().score.total, 0);
    assert_eq!(session.drain_cues(), vec![Cue::StartMusic]);
}

#[test]
fn test_same_seed_same_run() {
    let run = |seed| {
        let (mut session, now) = start(seed);
        play_until_game_over(&mut session, now);
        session.score_card()
    };
    assert_eq!(run(5), run(5));
}

#[test]
fn test_scene_renders_with_no_assets() {
    let (mut session, mut now) = start(3);
    for _ in 0..120 {
        now += FRAME_MS;
        session.advance(now).unwrap();
    }

    let mut assets = AssetRegistry::new();
    for id in AssetId::PRELOAD {
        assets.mark_failed(id);
    }
    let scene = build_scene(session.state(), &assets, true);
    assets.report_fallbacks(&scene.fallbacks);
    assert!(assets.reported_fallbacks() >= 2);

    let mesh = tessellate(&scene);
    assert_eq!(mesh.vertices.len() % 6, 0);
    assert!(mesh.batches.iter().all(|b| b.texture.is_none()));

    let hud = Hud::from_state(session.state(), true);
    assert!(hud.player.starts_with("Player: Player, Level: "));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_random_input_keeps_invariants(
        seed in any::<u64>(),
        inputs in prop::collection::vec((any::<bool>(), any::<bool>(), any::<bool>(), 0u8..40), 1..600)
    ) {
        let (mut session, mut now) = start(seed);
        let mut last_level = session.state().score.level;

        for (left, right, shoot, pause_roll) in inputs {
            now += FRAME_MS;
            session.set_left(left);
            session.set_right(right);
            if shoot && session.phase() == GamePhase::Playing {
                session.fire(now).unwrap();
            }
            if pause_roll == 0 && matches!(session.phase(), GamePhase::Playing | GamePhase::Paused) {
                session.toggle_pause().unwrap();
            }
            session.advance(now).unwrap();

            let state = session.state();
            prop_assert_eq!(state.score.total, state.score.dodged + state.score.destroyed);
            prop_assert!(state.score.level >= last_level);
            prop_assert!(state.player.lives <= MAX_LIVES);
            prop_assert!(state.player.pos.x >= 0.0);
            prop_assert!(state.player.pos.x + state.player.size.x <= state.field.width);
            last_level = state.score.level;

            if session.phase() == GamePhase::GameOver {
                session.restart(now).unwrap();
                last_level = session.state().score.level;
            }
        }
    }
}
