//! Score card export
//!
//! Built once the run ends; offered as a text download and as a one-line
//! share text copied to the clipboard.

use serde::{Deserialize, Serialize};

use crate::format_time;
use crate::sim::GameState;

/// File name used for the downloaded score card
pub const SCORE_CARD_FILE_NAME: &str = "scorecard.txt";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub player_name: String,
    pub rank: String,
    pub dodged: u32,
    pub destroyed: u32,
    pub total: u32,
    pub level: u32,
    /// Game time in seconds
    pub elapsed_secs: f64,
}

impl ScoreCard {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            player_name: state.player_name.clone(),
            rank: state.rank_title().to_string(),
            dodged: state.score.dodged,
            destroyed: state.score.destroyed,
            total: state.score.total,
            level: state.score.level,
            elapsed_secs: state.elapsed_secs(),
        }
    }

    pub fn time(&self) -> String {
        format_time(self.elapsed_secs)
    }

    /// Contents of the downloadable score card
    pub fn to_text(&self) -> String {
        format!(
            "Nebula Nomad Score Card\n\nPlayer: {}\nRank: {}\nDodged: {}\nDestroyed: {}\nTotal Score: {}\nLevel: {}\nTime: {}",
            self.player_name,
            self.rank,
            self.dodged,
            self.destroyed,
            self.total,
            self.level,
            self.time()
        )
    }

    /// One-line brag for the clipboard
    pub fn share_text(&self) -> String {
        format!(
            "Nebula Nomad: {} ({}) scored {} (Dodged: {}, Destroyed: {}) on Level {} in {}!",
            self.player_name,
            self.rank,
            self.total,
            self.dodged,
            self.destroyed,
            self.level,
            self.time()
        )
    }
}

#[cfg(target_arch = "wasm32")]
mod browser {
    use wasm_bindgen::prelude::*;

    use super::{SCORE_CARD_FILE_NAME, ScoreCard};
    use crate::error::{GameError, Result};

    #[wasm_bindgen(inline_js = "
        export function download_text(filename, text) {
            const blob = new Blob([text], { type: 'text/plain' });
            const url = URL.createObjectURL(blob);
            const a = document.createElement('a');
            a.href = url;
            a.download = filename;
            a.click();
            URL.revokeObjectURL(url);
        }

        export function copy_text(text) {
            return navigator.clipboard.writeText(text);
        }
    ")]
    extern "C" {
        #[wasm_bindgen(catch)]
        fn download_text(filename: &str, text: &str) -> std::result::Result<(), JsValue>;
        #[wasm_bindgen(catch)]
        fn copy_text(text: &str) -> std::result::Result<js_sys::Promise, JsValue>;
    }

    fn export_error(err: JsValue) -> GameError {
        GameError::Export(err.as_string().unwrap_or_else(|| format!("{err:?}")))
    }

    /// Save the score card as `scorecard.txt`
    pub fn download(card: &ScoreCard) -> Result<()> {
        download_text(SCORE_CARD_FILE_NAME, &card.to_text()).map_err(export_error)
    }

    /// Copy the share text to the clipboard
    pub async fn copy_share_text(card: &ScoreCard) -> Result<()> {
        let promise = copy_text(&card.share_text()).map_err(export_error)?;
        wasm_bindgen_futures::JsFuture::from(promise)
            .await
            .map(|_| ())
            .map_err(export_error)
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::{copy_share_text, download};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Field;

    fn card() -> ScoreCard {
        ScoreCard {
            player_name: "Ada".to_string(),
            rank: "Apprentice".to_string(),
            dodged: 30,
            destroyed: 12,
            total: 42,
            level: 3,
            elapsed_secs: 83.25,
        }
    }

    #[test]
    fn test_score_card_text() {
        assert_eq!(
            card().to_text(),
            "Nebula Nomad Score Card\n\nPlayer: Ada\nRank: Apprentice\nDodged: 30\n\
             Destroyed: 12\nTotal Score: 42\nLevel: 3\nTime: 01:23:25"
        );
    }

    #[test]
    fn test_share_text() {
        assert_eq!(
            card().share_text(),
            "Nebula Nomad: Ada (Apprentice) scored 42 (Dodged: 30, Destroyed: 12) on Level 3 in 01:23:25!"
        );
    }

    #[test]
    fn test_from_state() {
        let mut state = GameState::new(1, Field::default());
        state.player_name = "Zed".to_string();
        state.score.dodged = 5;
        state.score.destroyed = 16;
        state.score.total = 21;
        state.score.level = 2;
        state.time_ticks = 90;

        let card = ScoreCard::from_state(&state);
        assert_eq!(card.rank, "Beginner");
        assert_eq!(card.total, 21);
        assert_eq!(card.time(), "00:01:50");
    }
}
