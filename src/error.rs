//! Error types shared by the simulation, session and browser host

use core::fmt;

use crate::assets::AssetId;
use crate::sim::GamePhase;

/// Session commands, named in `InvalidTransition` errors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    EnterMenu,
    SelectShip,
    TogglePause,
    Fire,
    Restart,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnterMenu => write!(f, "enter menu"),
            Self::SelectShip => write!(f, "select ship"),
            Self::TogglePause => write!(f, "toggle pause"),
            Self::Fire => write!(f, "fire"),
            Self::Restart => write!(f, "restart"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum GameError {
    /// Sprite or sound could not be used; always recovered with a fallback
    AssetUnavailable { asset: AssetId },
    /// Command not valid in the current phase; state is left untouched
    InvalidTransition { phase: GamePhase, action: Action },
    /// Fault detected while running a frame
    Frame(String),
    /// Canvas or GPU surface could not be initialised
    SurfaceInit(String),
    /// Settings JSON could not be parsed
    Settings(String),
    /// Score card download or clipboard copy failed
    Export(String),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AssetUnavailable { asset } => write!(f, "asset unavailable: {}", asset.name()),
            Self::InvalidTransition { phase, action } => {
                write!(f, "cannot {action} while {phase:?}")
            }
            Self::Frame(msg) => write!(f, "frame error: {msg}"),
            Self::SurfaceInit(msg) => write!(f, "surface initialisation failed: {msg}"),
            Self::Settings(msg) => write!(f, "invalid settings: {msg}"),
            Self::Export(msg) => write!(f, "score export failed: {msg}"),
        }
    }
}

impl std::error::Error for GameError {}

pub type Result<T> = std::result::Result<T, GameError>;
