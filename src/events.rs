/// Notifications the game core hands to its collaborators (audio, HUD,
/// logging).  They are collected during a frame and drained by the loop.

use crate::assets::{MusicId, SoundId};
use crate::entities::ItemKind;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Sound(SoundId),
    MusicStarted(MusicId),
    MusicStopped,
    ScoreChanged(u32),
    PlayerHit { lifes_left: u32 },
    ItemCollected(ItemKind),
    BossSpawned { lifes: u32 },
    BossDefeated { count: u32 },
    GameOver { score: u32 },
}
