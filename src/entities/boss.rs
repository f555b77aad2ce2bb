use std::sync::Arc;

use crate::assets::{AssetLibrary, SoundId, SpriteId, SpriteSheet};
use crate::config::GameConfig;
use crate::entities::entity::{Actor, Entity, ExplosionStep};
use crate::entities::shot::{Shot, ShotOwner};
use crate::error::{GameError, Result};
use crate::events::GameEvent;

const ANIMATION_TICKS: u32 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BossState {
    /// Sliding in from the right edge.
    Entering,
    /// Fully on screen, sweeping up and down and firing.
    Patrolling,
    /// Out of lives; playing the death animation.
    Exploding,
}

/// Outcome of a player projectile striking the boss.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BossHit {
    Damaged,
    /// This hit took the last life.
    Destroyed,
    /// Already exploding; nothing happened.
    Ignored,
}

#[derive(Clone, Debug)]
pub struct Boss {
    pub entity: Entity,
    lifes: u32,
    max_lifes: u32,
    speedx: i32,
    speedy: i32,
    moving_down: bool,
    frames_alive: u32,
    fire_timer: u32,
    grace_frames: u32,
    fire_frames: u32,
    damaged: bool,
    hidden: bool,
    shot_sheet: Arc<SpriteSheet>,
    shot_speed_offset: i32,
}

impl Boss {
    /// Boss just past the right edge, vertically centred.  Patrol speed
    /// grows with the score at spawn time.
    pub fn spawn(
        assets: &AssetLibrary,
        config: &GameConfig,
        score: u32,
        lifes: u32,
        width: i32,
        height: i32,
    ) -> Result<Self> {
        let sheet = assets.sheet(SpriteId::Boss)?;
        if sheet.height() > height {
            return Err(GameError::EntityInstance {
                entity: "boss",
                reason: format!(
                    "sprite is {} px tall but the screen is only {} px",
                    sheet.height(),
                    height
                ),
            });
        }
        let y = height / 2 - sheet.height() / 2;
        let speedy = config.boss_patrol_speed + (score / config.boss_speed_divisor) as i32;

        Ok(Self {
            entity: Entity::new(sheet, width, y, ANIMATION_TICKS)
                .with_explosion(assets.sheet(SpriteId::Explosion)?),
            lifes,
            max_lifes: lifes.max(1),
            speedx: config.boss_entry_speed.max(1),
            speedy,
            moving_down: true,
            frames_alive: 0,
            fire_timer: 0,
            grace_frames: config.frames(config.boss_grace_secs),
            fire_frames: config.frames(config.boss_fire_secs),
            damaged: false,
            hidden: false,
            shot_sheet: assets.sheet(SpriteId::BossShot)?,
            shot_speed_offset: config.shot_speed_offset,
        })
    }

    pub fn state(&self) -> BossState {
        if self.entity.is_exploded() {
            BossState::Exploding
        } else if self.speedx > 0 {
            BossState::Entering
        } else {
            BossState::Patrolling
        }
    }

    pub fn is_entering(&self) -> bool {
        self.state() == BossState::Entering
    }

    /// Explosion finished or drifted off the left edge.
    pub fn is_removed(&self) -> bool {
        self.entity.explosion_finished() || self.entity.is_off_left()
    }

    pub fn update(
        &mut self,
        width: i32,
        height: i32,
        shots: &mut Vec<Shot>,
        events: &mut Vec<GameEvent>,
    ) {
        self.hidden = std::mem::take(&mut self.damaged);

        if self.entity.is_exploded() {
            if self.entity.advance_explosion() == ExplosionStep::Started {
                events.push(GameEvent::Sound(SoundId::Explosion));
            }
            return;
        }

        self.entity.advance_animation();
        self.frames_alive += 1;

        match self.state() {
            BossState::Entering => {
                self.entity.rect.x -= self.speedx;
                if self.entity.rect.right() <= width {
                    self.speedx = 0;
                }
            }
            BossState::Patrolling => {
                self.patrol(height);
                self.fire(shots, events);
            }
            BossState::Exploding => {}
        }
    }

    fn patrol(&mut self, height: i32) {
        let rect = &mut self.entity.rect;
        if self.moving_down {
            rect.y += self.speedy;
            if rect.bottom() >= height {
                rect.y = height - rect.h;
                self.moving_down = false;
            }
        } else {
            rect.y -= self.speedy;
            if rect.top() <= 0 {
                rect.y = 0;
                self.moving_down = true;
            }
        }
    }

    fn fire(&mut self, shots: &mut Vec<Shot>, events: &mut Vec<GameEvent>) {
        if self.frames_alive < self.grace_frames {
            return;
        }
        self.fire_timer += 1;
        if self.fire_timer < self.fire_frames {
            return;
        }
        self.fire_timer = 0;
        let rect = self.entity.rect;
        shots.push(Shot::new(
            Arc::clone(&self.shot_sheet),
            ShotOwner::Boss,
            self.speedy + self.shot_speed_offset,
            rect.left(),
            rect.center_y(),
        ));
        events.push(GameEvent::Sound(SoundId::Shoot));
    }

    /// Take one hit.  The killing blow starts the explosion and wipes every
    /// standing boss projectile.
    pub fn hit(&mut self, boss_shots: &mut Vec<Shot>) -> BossHit {
        if self.entity.is_exploded() {
            return BossHit::Ignored;
        }
        self.lifes = self.lifes.saturating_sub(1);
        self.damaged = true;
        if self.lifes == 0 {
            self.entity.explode();
            boss_shots.clear();
            BossHit::Destroyed
        } else {
            BossHit::Damaged
        }
    }

    pub fn lifes(&self) -> u32 {
        self.lifes
    }

    pub fn max_lifes(&self) -> u32 {
        self.max_lifes
    }

    pub fn speedx(&self) -> i32 {
        self.speedx
    }

    pub fn speedy(&self) -> i32 {
        self.speedy
    }

    pub fn is_moving_down(&self) -> bool {
        self.moving_down
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Width of the filled part of a health bar `full` pixels wide.
    pub fn health_bar_width(&self, full: i32) -> i32 {
        (full as i64 * self.lifes as i64 / self.max_lifes as i64) as i32
    }
}

impl Actor for Boss {
    fn entity(&self) -> &Entity {
        &self.entity
    }
}
