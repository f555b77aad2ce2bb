use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::assets::{AssetLibrary, SoundId, SpriteId, SpriteSheet};
use crate::config::GameConfig;
use crate::entities::entity::{Actor, Entity, ExplosionStep};
use crate::entities::shot::{Shot, ShotOwner};
use crate::error::{GameError, Result};
use crate::events::GameEvent;

/// Chance per update that an obstacle spawns siblings.
pub const SIBLING_CHANCE: f64 = 0.03;
/// Siblings only appear while the collection holds at most this many.
pub const SIBLING_CAP: usize = 2;
pub const MAX_SIBLINGS: usize = 4;

const ANIMATION_TICKS: u32 = 2;

/// A drifting rock that scrolls leftwards and takes part in volleys.
#[derive(Clone, Debug)]
pub struct Obstacle {
    pub entity: Entity,
    speed: i32,
    fire_timer: u32,
    shot_sheet: Arc<SpriteSheet>,
}

impl Obstacle {
    pub fn new(assets: &AssetLibrary, x: i32, y: i32, speed: i32) -> Result<Self> {
        Ok(Self {
            entity: Entity::new(assets.sheet(SpriteId::Obstacle)?, x, y, ANIMATION_TICKS)
                .with_explosion(assets.sheet(SpriteId::Explosion)?),
            speed,
            fire_timer: 0,
            shot_sheet: assets.sheet(SpriteId::ObstacleShot)?,
        })
    }

    /// A fresh obstacle just past the right edge at a random height.  Its
    /// speed grows with the score and stays fixed afterwards.
    pub fn spawn(ctx: &ObstacleContext<'_>, rng: &mut impl Rng) -> Result<Self> {
        let sheet = ctx.assets.sheet(SpriteId::Obstacle)?;
        let max_y = ctx.height - sheet.height();
        if max_y < 0 {
            return Err(GameError::EntityInstance {
                entity: "obstacle",
                reason: format!(
                    "sprite is {} px tall but the screen is only {} px",
                    sheet.height(),
                    ctx.height
                ),
            });
        }
        let y = rng.gen_range(0..=max_y);
        let speed = (ctx.score / 5) as i32
            + rng.gen_range(ctx.config.obstacle_speed_min..=ctx.config.obstacle_speed_max);
        Self::new(ctx.assets, ctx.width, y, speed)
    }

    pub fn speed(&self) -> i32 {
        self.speed
    }

    pub fn fire_timer(&self) -> u32 {
        self.fire_timer
    }

    fn fire(&self, speed_offset: i32) -> Shot {
        let rect = self.entity.rect;
        Shot::new(
            Arc::clone(&self.shot_sheet),
            ShotOwner::Obstacle,
            self.speed + speed_offset,
            rect.left(),
            rect.center_y(),
        )
    }
}

impl Actor for Obstacle {
    fn entity(&self) -> &Entity {
        &self.entity
    }
}

/// Session state every obstacle observes during its update.
pub struct ObstacleContext<'a> {
    pub assets: &'a AssetLibrary,
    pub config: &'a GameConfig,
    pub width: i32,
    pub height: i32,
    pub score: u32,
    /// While a boss encounter runs, obstacles neither replicate nor fire.
    pub boss_active: bool,
}

/// Advance every obstacle by one frame: movement, explosions, sibling
/// spawning and the synchronized volley.  Finished and off-screen
/// obstacles are removed.
pub fn update_obstacles(
    obstacles: &mut Vec<Obstacle>,
    shots: &mut Vec<Shot>,
    ctx: &ObstacleContext<'_>,
    rng: &mut impl Rng,
    events: &mut Vec<GameEvent>,
) -> Result<()> {
    let fire_frames = ctx.config.frames(ctx.config.obstacle_fire_secs);
    let mut volley = false;

    // Siblings pushed during the loop are not updated until next frame.
    let existing = obstacles.len();
    for i in 0..existing {
        let obstacle = &mut obstacles[i];
        if obstacle.entity.is_exploded() {
            if obstacle.entity.advance_explosion() == ExplosionStep::Started {
                events.push(GameEvent::Sound(SoundId::Explosion));
            }
            continue;
        }

        obstacle.entity.rect.x -= obstacle.speed;
        obstacle.entity.advance_animation();
        if ctx.boss_active {
            continue;
        }

        obstacle.fire_timer += 1;
        if obstacle.fire_timer >= fire_frames {
            volley = true;
        }

        if obstacles.len() <= SIBLING_CAP && rng.gen_bool(SIBLING_CHANCE) {
            let count = rng.gen_range(1..=MAX_SIBLINGS);
            for _ in 0..count {
                obstacles.push(Obstacle::spawn(ctx, rng)?);
            }
            tracing::debug!(count, total = obstacles.len(), "obstacle replicated");
        }
    }

    if volley {
        fire_volley(obstacles, shots, ctx.config.shot_speed_offset, rng, events);
    }

    obstacles.retain(|o| !o.entity.explosion_finished() && !o.entity.is_off_left());
    Ok(())
}

/// A random subset of the live obstacles fires at once, then every
/// obstacle's fire timer restarts together.
pub fn fire_volley(
    obstacles: &mut [Obstacle],
    shots: &mut Vec<Shot>,
    speed_offset: i32,
    rng: &mut impl Rng,
    events: &mut Vec<GameEvent>,
) {
    let active: Vec<usize> = obstacles
        .iter()
        .enumerate()
        .filter(|(_, o)| !o.entity.is_exploded())
        .map(|(i, _)| i)
        .collect();
    let shooters = rng.gen_range(0..=active.len());

    for &i in active.choose_multiple(rng, shooters) {
        shots.push(obstacles[i].fire(speed_offset));
    }
    if shooters > 0 {
        events.push(GameEvent::Sound(SoundId::Shoot));
    }

    for obstacle in obstacles.iter_mut() {
        obstacle.fire_timer = 0;
    }
}

/// Mark every obstacle as exploding, as when a boss is about to arrive.
pub fn explode_all(obstacles: &mut [Obstacle]) {
    for obstacle in obstacles.iter_mut() {
        obstacle.entity.explode();
    }
}
