//! Core of a side-scrolling arcade shooter.
//!
//! Everything here is terminal-agnostic: the simulation runs in logical
//! pixels, draws through `render::Surface` and reads input as
//! `input::InputState` snapshots.  The binary supplies a crossterm
//! frontend.

pub mod assets;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod events;
pub mod game_loop;
pub mod geometry;
pub mod input;
pub mod mask;
pub mod render;
