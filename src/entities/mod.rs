//! Every actor of the game: the base `Entity` plus the player, obstacles,
//! boss, projectiles and items built around it.

pub mod boss;
pub mod entity;
pub mod item;
pub mod obstacle;
pub mod player;
pub mod shot;

pub use boss::{Boss, BossHit, BossState};
pub use entity::{Actor, Animator, Entity, ExplosionStep};
pub use item::{Item, ItemKind};
pub use obstacle::{Obstacle, ObstacleContext};
pub use player::Player;
pub use shot::{Shot, ShotOwner};
