use std::sync::Arc;

use crate::assets::SpriteSheet;
use crate::entities::entity::{Actor, Entity};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShotOwner {
    Player,
    Obstacle,
    Boss,
}

/// A projectile flying in a straight horizontal line.  Player shots travel
/// rightwards, hostile shots leftwards.
#[derive(Clone, Debug)]
pub struct Shot {
    pub entity: Entity,
    owner: ShotOwner,
    speed: i32,
}

impl Shot {
    /// Spawn a shot whose leading edge sits at `muzzle_x`, vertically
    /// centred on `center_y`.
    pub fn new(
        sheet: Arc<SpriteSheet>,
        owner: ShotOwner,
        speed: i32,
        muzzle_x: i32,
        center_y: i32,
    ) -> Self {
        let (w, h) = (sheet.width(), sheet.height());
        let x = match owner {
            ShotOwner::Player => muzzle_x,
            ShotOwner::Obstacle | ShotOwner::Boss => muzzle_x - w,
        };
        Self {
            entity: Entity::new(sheet, x, center_y - h / 2, 1),
            owner,
            speed,
        }
    }

    pub fn owner(&self) -> ShotOwner {
        self.owner
    }

    /// True for obstacle and boss projectiles.
    pub fn is_hostile(&self) -> bool {
        self.owner != ShotOwner::Player
    }

    pub fn speed(&self) -> i32 {
        self.speed
    }

    /// Move one frame; returns `false` once the shot has left the screen
    /// through the edge it is heading for.
    pub fn update(&mut self, screen_width: i32) -> bool {
        self.entity.advance_animation();
        if self.is_hostile() {
            self.entity.rect.x -= self.speed;
            self.entity.rect.right() > 0
        } else {
            self.entity.rect.x += self.speed;
            self.entity.rect.left() < screen_width
        }
    }
}

impl Actor for Shot {
    fn entity(&self) -> &Entity {
        &self.entity
    }
}
