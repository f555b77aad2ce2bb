/// Terminal frontend: all terminal I/O lives here.
///
/// The game core draws in logical pixels; this module maps them onto
/// character cells (`CELL_W` x `CELL_H` pixels each), turns key events into
/// `InputState` snapshots and answers the pause and game-over screens.

pub mod screens;

use std::io::Write;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use crossterm::{
    cursor,
    event::Event,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

use spacial_game::assets::{Frame, SoundId, CELL_H, CELL_W};
use spacial_game::error::Result;
use spacial_game::events::GameEvent;
use spacial_game::game_loop::{Frontend, PauseChoice, ResetChoice};
use spacial_game::geometry::Rect;
use spacial_game::input::{InputState, KeyTracker};
use spacial_game::render::{Surface, Tone};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_PLAYER: Color = Color::White;
const C_HOSTILE: Color = Color::Green;
const C_BOSS: Color = Color::Magenta;
const C_ITEM: Color = Color::Cyan;
const C_EXPLOSION: Color = Color::Yellow;
const C_HUD: Color = Color::DarkGrey;
const C_ALERT: Color = Color::Red;

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Player => C_PLAYER,
        Tone::Hostile => C_HOSTILE,
        Tone::Boss => C_BOSS,
        Tone::Item => C_ITEM,
        Tone::Explosion => C_EXPLOSION,
        Tone::Hud => C_HUD,
        Tone::Alert => C_ALERT,
    }
}

fn fill_glyph(tone: Tone) -> char {
    match tone {
        Tone::Hud => '░',
        _ => '█',
    }
}

pub struct TerminalFrontend<'a, W: Write> {
    out: &'a mut W,
    rx: &'a Receiver<Event>,
    keys: KeyTracker,
    cols: u16,
    rows: u16,
    bell: bool,
}

impl<'a, W: Write> TerminalFrontend<'a, W> {
    pub fn new(out: &'a mut W, rx: &'a Receiver<Event>, bell: bool) -> Result<Self> {
        let (cols, rows) = terminal::size()?;
        Ok(Self {
            out,
            rx,
            keys: KeyTracker::new(),
            cols,
            rows,
            bell,
        })
    }

    pub fn out(&mut self) -> &mut W {
        &mut *self.out
    }

    fn on_screen(&self, col: i32, row: i32) -> Option<(u16, u16)> {
        let visible =
            (0..self.cols as i32).contains(&col) && (0..self.rows as i32).contains(&row);
        visible.then_some((col as u16, row as u16))
    }

    /// Print `text` starting at cell `(col, row)`, clipped to the screen.
    fn print_clipped(&mut self, text: &str, col: i32, row: i32) -> Result<()> {
        if !(0..self.rows as i32).contains(&row) {
            return Ok(());
        }
        let skip = (-col).max(0) as usize;
        let room = (self.cols as i32 - col.max(0)).max(0) as usize;
        let visible: String = text.chars().skip(skip).take(room).collect();
        if visible.is_empty() {
            return Ok(());
        }
        self.out.queue(cursor::MoveTo(col.max(0) as u16, row as u16))?;
        self.out.queue(Print(visible))?;
        Ok(())
    }
}

impl<W: Write> Surface for TerminalFrontend<'_, W> {
    fn size(&self) -> (i32, i32) {
        (self.cols as i32 * CELL_W, self.rows as i32 * CELL_H)
    }

    fn clear(&mut self) -> Result<()> {
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;
        Ok(())
    }

    fn draw_frame(&mut self, frame: &Frame, x: i32, y: i32, tone: Tone) -> Result<()> {
        self.out.queue(style::SetForegroundColor(tone_color(tone)))?;
        let col0 = x.div_euclid(CELL_W);
        let row0 = y.div_euclid(CELL_H);
        for (r, line) in frame.rows().iter().enumerate() {
            for (c, ch) in line.chars().enumerate() {
                if ch == ' ' {
                    continue;
                }
                if let Some((col, row)) = self.on_screen(col0 + c as i32, row0 + r as i32) {
                    self.out.queue(cursor::MoveTo(col, row))?;
                    self.out.queue(Print(ch))?;
                }
            }
        }
        Ok(())
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, tone: Tone) -> Result<()> {
        self.out.queue(style::SetForegroundColor(tone_color(tone)))?;
        self.print_clipped(text, x.div_euclid(CELL_W), y.div_euclid(CELL_H))
    }

    fn fill_rect(&mut self, rect: Rect, tone: Tone) -> Result<()> {
        let cols = rect.w / CELL_W;
        let rows = (rect.h / CELL_H).max(1);
        if cols <= 0 {
            return Ok(());
        }
        self.out.queue(style::SetForegroundColor(tone_color(tone)))?;
        let line: String = std::iter::repeat(fill_glyph(tone)).take(cols as usize).collect();
        let col = rect.x.div_euclid(CELL_W);
        let row0 = rect.y.div_euclid(CELL_H);
        for r in 0..rows {
            self.print_clipped(&line, col, row0 + r)?;
        }
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        // Park cursor in a harmless spot and flush
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, self.rows.saturating_sub(1)))?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> Frontend for TerminalFrontend<'_, W> {
    fn poll_input(&mut self) -> Result<InputState> {
        self.keys.begin_frame();
        while let Ok(event) = self.rx.try_recv() {
            if let Event::Resize(cols, rows) = event {
                // The playfield keeps its size; only clipping follows the terminal.
                self.cols = cols;
                self.rows = rows;
                tracing::debug!(cols, rows, "terminal resized");
                continue;
            }
            self.keys.handle(&event);
        }
        Ok(self.keys.snapshot())
    }

    fn show_pause(&mut self) -> Result<PauseChoice> {
        tracing::info!("paused");
        let choice = screens::pause(self.out, self.rx)?;
        self.keys.clear();
        tracing::info!(?choice, "pause closed");
        Ok(choice)
    }

    fn show_game_over(&mut self, score: u32) -> Result<ResetChoice> {
        let choice = screens::reset(self.out, self.rx, score)?;
        self.keys.clear();
        Ok(choice)
    }

    fn dispatch(&mut self, event: &GameEvent) -> Result<()> {
        match event {
            GameEvent::Sound(sound) => {
                tracing::trace!(?sound, "sound");
                if self.bell && matches!(sound, SoundId::Explosion | SoundId::GameOver) {
                    self.out.queue(Print('\x07'))?;
                }
            }
            GameEvent::MusicStarted(music) => tracing::info!(?music, "music started"),
            GameEvent::MusicStopped => tracing::info!("music stopped"),
            GameEvent::GameOver { score } => tracing::info!(score, "game over"),
            GameEvent::BossSpawned { lifes } => tracing::info!(lifes, "boss appeared"),
            other => tracing::debug!(event = ?other, "game event"),
        }
        Ok(())
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
