//! Audio playback using `<audio>` elements
//!
//! One looping music track and a one-shot explosion. Browsers may refuse to
//! play before a user gesture; that is treated as a silent skip.

use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlAudioElement;

use crate::assets::SoundId;
use crate::session::Cue;
use crate::settings::Settings;

/// Audio manager for the game
pub struct AudioManager {
    music: Option<HtmlAudioElement>,
    explosion: Option<HtmlAudioElement>,
    music_volume: f32,
    sfx_volume: f32,
}

fn load(sound: SoundId) -> Option<HtmlAudioElement> {
    match HtmlAudioElement::new_with_src(sound.path()) {
        Ok(el) => Some(el),
        Err(e) => {
            log::warn!("Audio unavailable for {}: {:?}", sound.path(), e);
            None
        }
    }
}

/// Start playback; a rejected play promise is only worth a debug line
fn play(el: &HtmlAudioElement, what: &'static str) {
    match el.play() {
        Ok(promise) => {
            wasm_bindgen_futures::spawn_local(async move {
                if let Err(e) = JsFuture::from(promise).await {
                    log::debug!("{what} playback refused: {:?}", e);
                }
            });
        }
        Err(e) => log::debug!("{what} playback failed: {:?}", e),
    }
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        let music = load(SoundId::BackgroundMusic);
        if let Some(music) = &music {
            music.set_loop(true);
        }
        let manager = Self {
            music,
            explosion: load(SoundId::Explosion),
            music_volume: settings.effective_music_volume(),
            sfx_volume: settings.effective_sfx_volume(),
        };
        manager.apply_volumes();
        manager
    }

    fn apply_volumes(&self) {
        if let Some(el) = &self.music {
            el.set_volume(self.music_volume as f64);
        }
        if let Some(el) = &self.explosion {
            el.set_volume(self.sfx_volume as f64);
        }
    }

    /// Carry out a session cue
    pub fn apply(&self, cue: Cue) {
        match cue {
            Cue::StartMusic => {
                if let Some(el) = &self.music {
                    el.set_current_time(0.0);
                    play(el, "music");
                }
            }
            Cue::ResumeMusic => {
                if let Some(el) = &self.music {
                    play(el, "music");
                }
            }
            Cue::PauseMusic => {
                if let Some(el) = &self.music {
                    let _ = el.pause();
                }
            }
            Cue::Explosion => {
                if let Some(el) = &self.explosion {
                    el.set_current_time(0.0);
                    play(el, "explosion");
                }
            }
            // Handled by the overlay code
            Cue::GameOver => {}
        }
    }
}
