use rand::seq::SliceRandom;
use rand::Rng;

use crate::assets::{AssetLibrary, SpriteId};
use crate::entities::entity::{Actor, Entity};
use crate::entities::player::Player;
use crate::error::{GameError, Result};

const ANIMATION_TICKS: u32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// One extra life, permanent.
    Hearth,
    /// Faster firing for a limited time.
    FireRate,
    /// Faster movement for a limited time.
    Speed,
}

impl ItemKind {
    pub const ALL: [ItemKind; 3] = [ItemKind::Hearth, ItemKind::FireRate, ItemKind::Speed];

    pub fn random(rng: &mut impl Rng) -> Self {
        *Self::ALL.choose(rng).unwrap_or(&ItemKind::Hearth)
    }

    pub fn sprite(self) -> SpriteId {
        match self {
            ItemKind::Hearth => SpriteId::ItemLife,
            ItemKind::FireRate => SpriteId::ItemFire,
            ItemKind::Speed => SpriteId::ItemSpeed,
        }
    }
}

/// A power-up drifting leftwards until picked up or lost off-screen.
#[derive(Clone, Debug)]
pub struct Item {
    pub entity: Entity,
    kind: ItemKind,
    speed: i32,
}

impl Item {
    pub fn new(assets: &AssetLibrary, kind: ItemKind, x: i32, y: i32, speed: i32) -> Result<Self> {
        Ok(Self {
            entity: Entity::new(assets.sheet(kind.sprite())?, x, y, ANIMATION_TICKS),
            kind,
            speed,
        })
    }

    /// Item just past the right edge at a random height.
    pub fn spawn(
        assets: &AssetLibrary,
        kind: ItemKind,
        width: i32,
        height: i32,
        speed: i32,
        rng: &mut impl Rng,
    ) -> Result<Self> {
        let sheet = assets.sheet(kind.sprite())?;
        let max_y = height - sheet.height();
        if max_y < 0 {
            return Err(GameError::EntityInstance {
                entity: "item",
                reason: format!("screen is only {height} px tall"),
            });
        }
        Self::new(assets, kind, width, rng.gen_range(0..=max_y), speed)
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    /// Drift one frame; `false` once past the left edge.
    pub fn update(&mut self) -> bool {
        self.entity.rect.x -= self.speed;
        self.entity.advance_animation();
        !self.entity.is_off_left()
    }

    pub fn apply_effect(&self, player: &mut Player) {
        match self.kind {
            ItemKind::Hearth => player.increase_hearth(),
            ItemKind::FireRate => player.increase_fire_rate(),
            ItemKind::Speed => player.increase_speed(),
        }
    }
}

impl Actor for Item {
    fn entity(&self) -> &Entity {
        &self.entity
    }
}
