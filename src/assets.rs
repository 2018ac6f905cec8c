//! Asset registry
//!
//! Tracks which images actually loaded so the renderer can choose between a
//! sprite and its fallback fill. A missing asset is a normal condition.

use std::collections::{HashMap, HashSet};

use crate::consts::ASSET_PRELOAD_TIMEOUT_MS;
use crate::error::GameError;
use crate::sim::{ObstacleKind, PowerUpKind};

/// Named image assets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetId {
    Background,
    Asteroid,
    Comet,
    Debris,
    Meteor,
    SpaceJunk,
    AlienProbe,
    Shield,
    DoubleScore,
    Heart,
    /// Sprite of the ship picked on the menu; its path comes with the choice
    PlayerShip,
}

impl AssetId {
    /// Images loaded before the menu starts
    pub const PRELOAD: [AssetId; 10] = [
        AssetId::Background,
        AssetId::Asteroid,
        AssetId::Comet,
        AssetId::Debris,
        AssetId::Meteor,
        AssetId::SpaceJunk,
        AssetId::AlienProbe,
        AssetId::Shield,
        AssetId::DoubleScore,
        AssetId::Heart,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AssetId::Background => "background",
            AssetId::Asteroid => "asteroid",
            AssetId::Comet => "comet",
            AssetId::Debris => "debris",
            AssetId::Meteor => "meteor",
            AssetId::SpaceJunk => "space_junk",
            AssetId::AlienProbe => "alien_probe",
            AssetId::Shield => "shield",
            AssetId::DoubleScore => "double_score",
            AssetId::Heart => "heart",
            AssetId::PlayerShip => "player_ship",
        }
    }

    /// Fixed source path; `None` for the player ship
    pub fn path(self) -> Option<&'static str> {
        match self {
            AssetId::Background => Some("assets/background.png"),
            AssetId::Asteroid => Some("assets/asteroid.png"),
            AssetId::Comet => Some("assets/comet.PNG"),
            AssetId::Debris => Some("assets/debris.png"),
            AssetId::Meteor => Some("assets/meteor.PNG"),
            AssetId::SpaceJunk => Some("assets/space_junk.PNG"),
            AssetId::AlienProbe => Some("assets/alien_probe.PNG"),
            AssetId::Shield => Some("assets/shield.png"),
            AssetId::DoubleScore => Some("assets/double_score.png"),
            AssetId::Heart => Some("assets/heart.png"),
            AssetId::PlayerShip => None,
        }
    }

    pub fn for_obstacle(kind: ObstacleKind) -> Self {
        match kind {
            ObstacleKind::LightRock => AssetId::Asteroid,
            ObstacleKind::FastFragment => AssetId::Comet,
            ObstacleKind::HeavyDebris => AssetId::Debris,
            ObstacleKind::DenseShard => AssetId::Meteor,
            ObstacleKind::DriftingJunk => AssetId::SpaceJunk,
            ObstacleKind::LargeCraft => AssetId::AlienProbe,
        }
    }

    pub fn for_power_up(kind: PowerUpKind) -> Self {
        match kind {
            PowerUpKind::Shield => AssetId::Shield,
            PowerUpKind::DoubleScore => AssetId::DoubleScore,
        }
    }
}

/// Sound cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundId {
    /// Looping soundtrack while playing
    BackgroundMusic,
    /// One-shot on game over
    Explosion,
}

impl SoundId {
    pub fn path(self) -> &'static str {
        match self {
            SoundId::BackgroundMusic => "assets/background_music.mp3",
            SoundId::Explosion => "assets/explosion.mp3",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetStatus {
    Pending,
    Loaded,
    Failed,
}

#[derive(Debug, Clone)]
pub struct AssetRegistry {
    images: HashMap<AssetId, AssetStatus>,
    ship_path: Option<String>,
    preload_started_ms: Option<f64>,
    /// Assets already reported as falling back
    reported: HashSet<AssetId>,
}

impl Default for AssetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetRegistry {
    pub fn new() -> Self {
        let images = AssetId::PRELOAD
            .iter()
            .map(|&id| (id, AssetStatus::Pending))
            .collect();
        Self {
            images,
            ship_path: None,
            preload_started_ms: None,
            reported: HashSet::new(),
        }
    }

    pub fn begin_preload(&mut self, now_ms: f64) {
        self.preload_started_ms = Some(now_ms);
    }

    /// Record a finished load; an image with no pixels counts as failed
    pub fn mark_loaded(&mut self, id: AssetId, natural_width: u32) -> AssetStatus {
        let status = if natural_width > 0 {
            AssetStatus::Loaded
        } else {
            log::warn!("Image loaded but invalid: {}", id.name());
            AssetStatus::Failed
        };
        self.images.insert(id, status);
        status
    }

    pub fn mark_failed(&mut self, id: AssetId) {
        log::warn!("Image failed to load: {}", id.name());
        self.images.insert(id, AssetStatus::Failed);
    }

    pub fn status(&self, id: AssetId) -> AssetStatus {
        self.images.get(&id).copied().unwrap_or(AssetStatus::Failed)
    }

    pub fn is_available(&self, id: AssetId) -> bool {
        self.status(id) == AssetStatus::Loaded
    }

    /// Switch the player sprite to a newly chosen ship
    pub fn set_ship(&mut self, path: &str) {
        self.ship_path = Some(path.to_string());
        self.images.insert(AssetId::PlayerShip, AssetStatus::Pending);
        self.reported.remove(&AssetId::PlayerShip);
    }

    pub fn ship_path(&self) -> Option<&str> {
        self.ship_path.as_deref()
    }

    /// Every preload image has either loaded or failed
    pub fn preload_settled(&self) -> bool {
        AssetId::PRELOAD
            .iter()
            .all(|&id| self.status(id) != AssetStatus::Pending)
    }

    /// Preload finished, or gave up after the timeout
    pub fn preload_complete(&self, now_ms: f64) -> bool {
        if self.preload_settled() {
            return true;
        }
        match self.preload_started_ms {
            Some(start) => now_ms - start >= ASSET_PRELOAD_TIMEOUT_MS,
            None => false,
        }
    }

    /// Log each asset the renderer had to replace, once per asset
    pub fn report_fallbacks(&mut self, fallbacks: &[AssetId]) {
        for &asset in fallbacks {
            // Still loading is not worth a warning yet
            if self.status(asset) == AssetStatus::Pending {
                continue;
            }
            if self.reported.insert(asset) {
                log::warn!("{}; using fallback fill", GameError::AssetUnavailable { asset });
            }
        }
    }

    pub fn reported_fallbacks(&self) -> usize {
        self.reported.len()
    }
}
