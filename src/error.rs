//! Error types for the game core.
//!
//! Low-level failures (asset lookup, terminal writes, config parsing) are
//! converted into a `GameError` at the point of use.  The game loop wraps
//! anything escaping a frame into `GameError::GameLoop`, which is fatal to
//! the session.

use thiserror::Error;

use crate::assets::SpriteId;

#[derive(Error, Debug)]
pub enum GameError {
    /// A sprite sequence is missing or malformed.
    #[error("failed to load sprite {id:?}: {reason}")]
    AssetLoad { id: SpriteId, reason: String },

    /// An entity could not be placed on the current screen.
    #[error("failed to create {entity}: {reason}")]
    EntityInstance {
        entity: &'static str,
        reason: String,
    },

    /// Invalid or unreadable configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Writing a frame or a screen to the terminal failed.
    #[error("failed to update screen: {0}")]
    UpdateScreen(#[from] std::io::Error),

    /// Any failure escaping the per-frame update.
    #[error("game loop failed at frame {frame}: {source}")]
    GameLoop {
        frame: u64,
        #[source]
        source: Box<GameError>,
    },
}

pub type Result<T> = std::result::Result<T, GameError>;
