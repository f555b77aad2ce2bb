//! Tunable gameplay constants.
//!
//! Defaults give the classic pacing (20 FPS, item every 15 points, boss
//! every 20 points, bosses starting at 5 lives).  A JSON file may override any
//! subset of fields; missing fields keep their defaults.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{GameError, Result};

/// Upper bound for every `*_secs` field.
pub const MAX_SECS: f32 = 3600.0;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    /// Simulation and render rate.
    pub fps: u32,
    /// Logical screen used when no terminal dictates the size.
    pub screen_width: i32,
    pub screen_height: i32,

    pub initial_lives: u32,
    pub player_speed: i32,
    pub boosted_speed: i32,
    /// Frames the fire counter must exceed before the next shot.
    pub fire_interval: u32,
    pub boosted_fire_interval: u32,
    /// How long a fire-rate or speed buff lasts.
    pub buff_duration_secs: f32,
    /// Added to the owner's speed to get a projectile's speed.
    pub shot_speed_offset: i32,

    pub obstacle_speed_min: i32,
    pub obstacle_speed_max: i32,
    pub obstacle_fire_secs: f32,

    pub item_threshold: u32,
    pub item_speed: i32,

    pub boss_threshold: u32,
    pub boss_base_lives: u32,
    pub boss_lives_step: u32,
    pub boss_entry_speed: i32,
    pub boss_patrol_speed: i32,
    /// Score points per extra unit of boss patrol speed.
    pub boss_speed_divisor: u32,
    pub boss_grace_secs: f32,
    pub boss_fire_secs: f32,
    /// Forced-explosion frames played before a boss appears.
    pub boss_sweep_frames: u32,

    pub game_over_secs: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fps: 20,
            screen_width: 1280,
            screen_height: 720,
            initial_lives: 3,
            player_speed: 15,
            boosted_speed: 25,
            fire_interval: 6,
            boosted_fire_interval: 1,
            buff_duration_secs: 12.0,
            shot_speed_offset: 20,
            obstacle_speed_min: 20,
            obstacle_speed_max: 30,
            obstacle_fire_secs: 1.5,
            item_threshold: 15,
            item_speed: 10,
            boss_threshold: 20,
            boss_base_lives: 5,
            boss_lives_step: 5,
            boss_entry_speed: 10,
            boss_patrol_speed: 4,
            boss_speed_divisor: 20,
            boss_grace_secs: 5.0,
            boss_fire_secs: 2.0,
            boss_sweep_frames: 15,
            game_over_secs: 3.0,
        }
    }
}

impl GameConfig {
    /// Read a JSON config file and validate it.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| GameError::Config(format!("cannot read {}: {e}", path.display())))?;
        let config: GameConfig = serde_json::from_str(&text)
            .map_err(|e| GameError::Config(format!("cannot parse {}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.fps == 0 {
            return Err(GameError::Config("fps must be positive".into()));
        }
        if self.item_threshold == 0 || self.boss_threshold == 0 {
            return Err(GameError::Config(
                "item_threshold and boss_threshold must be positive".into(),
            ));
        }
        if self.boss_speed_divisor == 0 {
            return Err(GameError::Config("boss_speed_divisor must be positive".into()));
        }
        if self.obstacle_speed_min > self.obstacle_speed_max {
            return Err(GameError::Config(format!(
                "obstacle_speed_min ({}) exceeds obstacle_speed_max ({})",
                self.obstacle_speed_min, self.obstacle_speed_max
            )));
        }
        if self.screen_width <= 0 || self.screen_height <= 0 {
            return Err(GameError::Config("screen size must be positive".into()));
        }
        let speeds = [
            ("player_speed", self.player_speed),
            ("boosted_speed", self.boosted_speed),
            ("shot_speed_offset", self.shot_speed_offset),
            ("obstacle_speed_min", self.obstacle_speed_min),
            ("item_speed", self.item_speed),
            ("boss_entry_speed", self.boss_entry_speed),
            ("boss_patrol_speed", self.boss_patrol_speed),
        ];
        for (name, speed) in speeds {
            if speed <= 0 {
                return Err(GameError::Config(format!("{name} must be positive, got {speed}")));
            }
        }
        let durations = [
            ("buff_duration_secs", self.buff_duration_secs),
            ("obstacle_fire_secs", self.obstacle_fire_secs),
            ("boss_grace_secs", self.boss_grace_secs),
            ("boss_fire_secs", self.boss_fire_secs),
            ("game_over_secs", self.game_over_secs),
        ];
        for (name, secs) in durations {
            if !(0.0..=MAX_SECS).contains(&secs) {
                return Err(GameError::Config(format!(
                    "{name} must be between 0 and {MAX_SECS} seconds, got {secs}"
                )));
            }
        }
        Ok(())
    }

    /// Whole frames covering `secs` at the configured rate, never zero.
    pub fn frames(&self, secs: f32) -> u32 {
        ((secs * self.fps as f32).round() as u32).max(1)
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps as f64)
    }
}
