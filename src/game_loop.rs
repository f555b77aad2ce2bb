//! Fixed-rate session driver.
//!
//! Each frame: poll input, run the first half of the frame, open the pause
//! menu if requested, run the second half, hand the frame's events to the
//! frontend, draw, then sleep out the rest of the frame period.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::Rng;

use crate::assets::AssetLibrary;
use crate::compute::{GameState, Phase};
use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::events::GameEvent;
use crate::input::InputState;
use crate::render::{render_scene, Surface};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PauseChoice {
    Resume,
    ReturnToMenu,
}

/// Answer of the screen shown after a game over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResetChoice {
    ReturnToMenu,
    Exit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEnd {
    ReturnToMenu,
    Exit,
}

/// Everything a session needs from the outside world.
pub trait Frontend: Surface {
    /// Logical actions held during this frame.
    fn poll_input(&mut self) -> Result<InputState>;
    /// Blocks until the player picks an entry.
    fn show_pause(&mut self) -> Result<PauseChoice>;
    fn show_game_over(&mut self, score: u32) -> Result<ResetChoice>;
    fn dispatch(&mut self, event: &GameEvent) -> Result<()>;
    fn sleep(&mut self, duration: Duration);
}

/// Play one session until the player quits, leaves through a menu or
/// answers the game-over screen.
pub fn run_session<F: Frontend>(
    frontend: &mut F,
    config: &GameConfig,
    assets: Arc<AssetLibrary>,
    rng: &mut impl Rng,
) -> Result<SessionEnd> {
    config.validate()?;
    let (width, height) = frontend.size();
    let mut game = GameState::new(config.clone(), assets, width, height)?;
    let frame_period = config.frame_duration();

    loop {
        let frame_start = Instant::now();

        match run_frame(frontend, &mut game, rng) {
            Ok(Some(end)) => {
                tracing::info!(?end, score = game.score, "session ended");
                return Ok(end);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!(frame = game.frame, error = %e, "frame failed");
                return Err(GameError::GameLoop {
                    frame: game.frame,
                    source: Box::new(e),
                });
            }
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_period {
            frontend.sleep(frame_period - elapsed);
        }
    }
}

/// Pause is only offered in normal play; a pause key held during the boss
/// sweep or entry is ignored.
fn run_frame<F: Frontend>(
    frontend: &mut F,
    game: &mut GameState,
    rng: &mut impl Rng,
) -> Result<Option<SessionEnd>> {
    let input = frontend.poll_input()?;
    if input.quit {
        return Ok(Some(SessionEnd::Exit));
    }

    game.begin_frame(&input, rng)?;

    if input.pause && game.phase() == Phase::Playing {
        flush_events(frontend, game)?;
        if frontend.show_pause()? == PauseChoice::ReturnToMenu {
            frontend.dispatch(&GameEvent::MusicStopped)?;
            return Ok(Some(SessionEnd::ReturnToMenu));
        }
    }

    game.end_frame();
    flush_events(frontend, game)?;
    render_scene(game, frontend)?;

    if game.is_over() {
        frontend.sleep(Duration::from_secs_f32(game.config.game_over_secs.max(0.0)));
        let end = match frontend.show_game_over(game.score)? {
            ResetChoice::ReturnToMenu => SessionEnd::ReturnToMenu,
            ResetChoice::Exit => SessionEnd::Exit,
        };
        return Ok(Some(end));
    }
    Ok(None)
}

fn flush_events<F: Frontend>(frontend: &mut F, game: &mut GameState) -> Result<()> {
    for event in game.take_events() {
        frontend.dispatch(&event)?;
    }
    Ok(())
}
