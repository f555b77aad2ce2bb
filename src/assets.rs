/// Asset identifiers and the sprite library.
///
/// The game core never loads files itself: it asks the library for a sprite
/// sequence by `SpriteId` and names sounds and music by `SoundId` /
/// `MusicId`, leaving playback to whoever consumes the emitted events.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{GameError, Result};
use crate::mask::Mask;

/// Logical pixels covered by one character cell of sprite art.
pub const CELL_W: i32 = 8;
pub const CELL_H: i32 = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteId {
    Player,
    Obstacle,
    Boss,
    PlayerShot,
    ObstacleShot,
    BossShot,
    ItemLife,
    ItemFire,
    ItemSpeed,
    Explosion,
    LifeIcon,
}

impl SpriteId {
    pub const ALL: [SpriteId; 11] = [
        SpriteId::Player,
        SpriteId::Obstacle,
        SpriteId::Boss,
        SpriteId::PlayerShot,
        SpriteId::ObstacleShot,
        SpriteId::BossShot,
        SpriteId::ItemLife,
        SpriteId::ItemFire,
        SpriteId::ItemSpeed,
        SpriteId::Explosion,
        SpriteId::LifeIcon,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundId {
    Shoot,
    Explosion,
    TakeItem,
    BossAppear,
    GameOver,
    Exterminate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MusicId {
    Title,
    Game,
}

// ── Frames ───────────────────────────────────────────────────────────────────

/// One image of a sprite sequence together with its collision mask.
#[derive(Clone, Debug)]
pub struct Frame {
    rows: Vec<String>,
    mask: Mask,
}

impl Frame {
    pub fn from_art(rows: &[&str]) -> Self {
        let cols = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let rows: Vec<String> = rows.iter().map(|r| format!("{:<cols$}", r)).collect();
        let mask = Mask::from_rows(&rows, CELL_W, CELL_H);
        Self { rows, mask }
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    pub fn width(&self) -> i32 {
        self.mask.width()
    }

    pub fn height(&self) -> i32 {
        self.mask.height()
    }
}

/// A non-empty sequence of equally-sized frames.
#[derive(Clone, Debug)]
pub struct SpriteSheet {
    id: SpriteId,
    frames: Vec<Frame>,
}

impl SpriteSheet {
    pub fn from_art(id: SpriteId, art: &[&[&str]]) -> Result<Self> {
        if art.is_empty() {
            return Err(GameError::AssetLoad {
                id,
                reason: "sprite has no frames".to_string(),
            });
        }
        let frames: Vec<Frame> = art.iter().map(|rows| Frame::from_art(rows)).collect();

        let (w, h) = (frames[0].width(), frames[0].height());
        if w == 0 || h == 0 {
            return Err(GameError::AssetLoad {
                id,
                reason: "first frame is empty".to_string(),
            });
        }
        if let Some(i) = frames
            .iter()
            .position(|f| f.width() != w || f.height() != h)
        {
            return Err(GameError::AssetLoad {
                id,
                reason: format!(
                    "frame {i} is {}x{}, expected {w}x{h}",
                    frames[i].width(),
                    frames[i].height()
                ),
            });
        }

        Ok(Self { id, frames })
    }

    pub fn id(&self) -> SpriteId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frame(&self, index: usize) -> &Frame {
        &self.frames[index % self.frames.len()]
    }

    pub fn width(&self) -> i32 {
        self.frames[0].width()
    }

    pub fn height(&self) -> i32 {
        self.frames[0].height()
    }
}

// ── Library ──────────────────────────────────────────────────────────────────

/// Sprite sequences keyed by identifier, shared by every entity built from
/// them.
#[derive(Clone, Debug, Default)]
pub struct AssetLibrary {
    sheets: HashMap<SpriteId, Arc<SpriteSheet>>,
}

impl AssetLibrary {
    /// Load every built-in sprite.
    pub fn builtin() -> Result<Self> {
        let mut library = Self::default();
        for id in SpriteId::ALL {
            library.insert(SpriteSheet::from_art(id, builtin_art(id))?);
        }
        tracing::debug!(sprites = library.sheets.len(), "asset library loaded");
        Ok(library)
    }

    pub fn insert(&mut self, sheet: SpriteSheet) {
        self.sheets.insert(sheet.id(), Arc::new(sheet));
    }

    pub fn sheet(&self, id: SpriteId) -> Result<Arc<SpriteSheet>> {
        self.sheets
            .get(&id)
            .cloned()
            .ok_or_else(|| GameError::AssetLoad {
                id,
                reason: "not present in the library".to_string(),
            })
    }
}

// ── Built-in art ─────────────────────────────────────────────────────────────

fn builtin_art(id: SpriteId) -> &'static [&'static [&'static str]] {
    match id {
        SpriteId::Player => PLAYER,
        SpriteId::Obstacle => OBSTACLE,
        SpriteId::Boss => BOSS,
        SpriteId::PlayerShot => SHOOT_PLAYER,
        SpriteId::ObstacleShot => SHOOT_OBSTACLE,
        SpriteId::BossShot => SHOOT_BOSS,
        SpriteId::ItemLife => ITEM_LIFE,
        SpriteId::ItemFire => ITEM_FIRE,
        SpriteId::ItemSpeed => ITEM_SPEED,
        SpriteId::Explosion => EXPLOSION,
        SpriteId::LifeIcon => LIFE_ICON,
    }
}

const PLAYER: &[&[&str]] = &[
    &[" |\\__  ", "={##o>>", " |/--  "],
    &[" |\\__  ", "~{##o>>", " |/--  "],
    &[" |\\__  ", "-{##o>>", " |/--  "],
    &[" |\\__  ", "~{##o>>", " |/--  "],
];

const OBSTACLE: &[&[&str]] = &[&[
    "  _@@@_ ",
    " @@#@@@@",
    "@@@@@#@@",
    " @#@@@@ ",
    "  ~@@@~ ",
]];

const BOSS: &[&[&str]] = &[
    &[
        "    _/##\\_    ",
        "  /########\\  ",
        "<=[##(@@)##]==",
        "<=[########]==",
        "  \\########/  ",
        "    ~\\##/~    ",
    ],
    &[
        "    _/##\\_    ",
        "  /########\\  ",
        "<=[##(oo)##]==",
        "<=[########]==",
        "  \\########/  ",
        "    ~\\##/~    ",
    ],
    &[
        "    _/##\\_    ",
        "  /########\\  ",
        "<=[##(..)##]==",
        "<=[########]==",
        "  \\########/  ",
        "    ~\\##/~    ",
    ],
    &[
        "    _/##\\_    ",
        "  /########\\  ",
        "<=[##(oo)##]==",
        "<=[########]==",
        "  \\########/  ",
        "    ~\\##/~    ",
    ],
];

const SHOOT_PLAYER: &[&[&str]] = &[&["=>"]];

const SHOOT_OBSTACLE: &[&[&str]] = &[&["o"]];

const SHOOT_BOSS: &[&[&str]] = &[&["<=="]];

const ITEM_LIFE: &[&[&str]] = &[&["(\\/)", " \\/ "]];

const ITEM_FIRE: &[&[&str]] = &[
    &["(^^)", "(##)"],
    &["(^ )", "(##)"],
    &["( ^)", "(##)"],
    &["(^^)", "(#*)"],
];

const ITEM_SPEED: &[&[&str]] = &[
    &[">>> ", ">>> "],
    &[" >>>", " >>>"],
    &["> >>", "> >>"],
    &[">> >", ">> >"],
    &[">>>>", ">>>>"],
];

const EXPLOSION: &[&[&str]] = &[
    &["     ", "  *  ", "     "],
    &["  .  ", " .*. ", "  .  "],
    &[" .*. ", ".*#*.", " .*. "],
    &["*.#.*", ".###.", "*.#.*"],
    &["#*#*#", "*###*", "#*#*#"],
    &["*#*#*", "#*.*#", "*#*#*"],
    &[". * .", "* . *", ". * ."],
    &[".   .", "  .  ", ".   ."],
    &["  .  ", "     ", "  .  "],
    &["     ", "  .  ", "     "],
];

const LIFE_ICON: &[&[&str]] = &[&["<3"]];
