use std::sync::Arc;

use crate::assets::{AssetLibrary, SoundId, SpriteId, SpriteSheet};
use crate::config::GameConfig;
use crate::entities::entity::{Actor, Entity};
use crate::entities::shot::{Shot, ShotOwner};
use crate::error::Result;
use crate::events::GameEvent;
use crate::input::InputState;

/// Horizontal distance of the ship from the left edge at session start.
pub const PLAYER_START_X: i32 = 40;

const ANIMATION_TICKS: u32 = 3;
const BOOSTED_ANIMATION_TICKS: u32 = 1;

/// The player's ship.
///
/// Timed buffs are frame countdowns ticked inside `update`, so every state
/// change happens on the game loop's thread within a frame.  Picking up a
/// buff that is already running restarts its countdown at full length.
#[derive(Clone, Debug)]
pub struct Player {
    pub entity: Entity,
    lifes: u32,
    speed: i32,
    fire_timer: u32,
    fire_interval: u32,
    damaged: bool,
    hidden: bool,
    fire_buff: Option<u32>,
    speed_buff: Option<u32>,
    shot_sheet: Arc<SpriteSheet>,
    base_speed: i32,
    boosted_speed: i32,
    base_fire_interval: u32,
    boosted_fire_interval: u32,
    buff_frames: u32,
    shot_speed_offset: i32,
}

impl Player {
    /// Ship at its fixed starting position, vertically centred on a screen
    /// `height` pixels tall.
    pub fn new(assets: &AssetLibrary, config: &GameConfig, height: i32) -> Result<Self> {
        let sheet = assets.sheet(SpriteId::Player)?;
        let y = height / 2 - sheet.height() / 2;
        Ok(Self {
            entity: Entity::new(sheet, PLAYER_START_X, y.max(0), ANIMATION_TICKS),
            lifes: config.initial_lives,
            speed: config.player_speed,
            fire_timer: 0,
            fire_interval: config.fire_interval,
            damaged: false,
            hidden: false,
            fire_buff: None,
            speed_buff: None,
            shot_sheet: assets.sheet(SpriteId::PlayerShot)?,
            base_speed: config.player_speed,
            boosted_speed: config.boosted_speed,
            base_fire_interval: config.fire_interval,
            boosted_fire_interval: config.boosted_fire_interval,
            buff_frames: config.frames(config.buff_duration_secs),
            shot_speed_offset: config.shot_speed_offset,
        })
    }

    // ── Per-frame update ─────────────────────────────────────────────────────

    pub fn update(
        &mut self,
        input: &InputState,
        width: i32,
        height: i32,
        shots: &mut Vec<Shot>,
        events: &mut Vec<GameEvent>,
    ) {
        // A hit shows as one skipped frame.
        self.hidden = std::mem::take(&mut self.damaged);

        self.tick_buffs();
        self.movements(input, width, height);
        self.shoot(input, shots, events);
        self.entity.advance_animation();
    }

    /// Eight-way movement.  Diagonals move at full speed on both axes.
    pub fn movements(&mut self, input: &InputState, width: i32, height: i32) {
        let mut dx = 0;
        let mut dy = 0;
        if input.left {
            dx -= self.speed;
        }
        if input.right {
            dx += self.speed;
        }
        if input.up {
            dy -= self.speed;
        }
        if input.down {
            dy += self.speed;
        }
        self.entity.rect.x += dx;
        self.entity.rect.y += dy;
        self.entity.rect.clamp_within(width, height);
    }

    /// Count towards the next shot and fire from the nose when allowed.
    /// Returns whether a shot was fired.
    pub fn shoot(
        &mut self,
        input: &InputState,
        shots: &mut Vec<Shot>,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        self.fire_timer += 1;
        if self.fire_timer <= self.fire_interval || !input.fire {
            return false;
        }
        self.fire_timer = 0;
        let rect = self.entity.rect;
        shots.push(Shot::new(
            Arc::clone(&self.shot_sheet),
            ShotOwner::Player,
            self.speed + self.shot_speed_offset,
            rect.right(),
            rect.center_y(),
        ));
        events.push(GameEvent::Sound(SoundId::Shoot));
        true
    }

    fn tick_buffs(&mut self) {
        match self.fire_buff {
            Some(left) if left > 1 => self.fire_buff = Some(left - 1),
            Some(_) => {
                self.fire_buff = None;
                self.fire_interval = self.base_fire_interval;
                tracing::debug!("fire-rate buff expired");
            }
            None => {}
        }
        match self.speed_buff {
            Some(left) if left > 1 => self.speed_buff = Some(left - 1),
            Some(_) => {
                self.speed_buff = None;
                self.speed = self.base_speed;
                self.entity.animator_mut().set_speed(ANIMATION_TICKS);
                tracing::debug!("speed buff expired");
            }
            None => {}
        }
    }

    // ── Item effects ─────────────────────────────────────────────────────────

    pub fn increase_fire_rate(&mut self) {
        self.fire_interval = self.boosted_fire_interval;
        self.fire_buff = Some(self.buff_frames);
    }

    pub fn increase_speed(&mut self) {
        self.speed = self.boosted_speed;
        self.speed_buff = Some(self.buff_frames);
        self.entity.animator_mut().set_speed(BOOSTED_ANIMATION_TICKS);
    }

    pub fn increase_hearth(&mut self) {
        self.lifes += 1;
    }

    // ── Damage ───────────────────────────────────────────────────────────────

    /// Lose one life and flash on the next frame.
    pub fn take_hit(&mut self) {
        self.lifes = self.lifes.saturating_sub(1);
        self.damaged = true;
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn lifes(&self) -> u32 {
        self.lifes
    }

    pub fn speed(&self) -> i32 {
        self.speed
    }

    pub fn fire_interval(&self) -> u32 {
        self.fire_interval
    }

    pub fn is_damaged(&self) -> bool {
        self.damaged
    }

    /// Skipped this frame because of a hit.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// `false` while a fire-rate buff is running.
    pub fn shooting_enabled(&self) -> bool {
        self.fire_buff.is_none()
    }

    /// `false` while a speed buff is running.
    pub fn increase_speed_enabled(&self) -> bool {
        self.speed_buff.is_none()
    }

    pub fn fire_buff_remaining(&self) -> Option<u32> {
        self.fire_buff
    }

    pub fn speed_buff_remaining(&self) -> Option<u32> {
        self.speed_buff
    }
}

impl Actor for Player {
    fn entity(&self) -> &Entity {
        &self.entity
    }
}
