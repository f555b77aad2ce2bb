/// Input model.
///
/// The core only sees `InputState`, a snapshot of which logical actions are
/// held this frame.  `KeyTracker` builds that snapshot from raw terminal key
/// events: it records the frame of the last press/repeat for every key and
/// treats a key as "held" while that timestamp is fresh.
///
/// Works on two classes of terminal:
/// * **Keyboard-enhancement capable** (Ghostty, kitty, etc.): proper
///   `Press` / `Repeat` / `Release` events, so keys are dropped on release.
/// * **Classic terminals**: only `Press` events (OS key-repeat shows up as
///   repeated `Press`).  Keys expire after `HOLD_WINDOW` frames of silence,
///   which is shorter than the OS repeat interval.

use std::collections::HashMap;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
    pub pause: bool,
    pub quit: bool,
}

/// A key counts as held if its last press/repeat arrived within this many
/// frames.  At 20 FPS that is 150 ms, longer than any OS repeat interval.
pub const HOLD_WINDOW: u64 = 3;

#[derive(Debug, Default)]
pub struct KeyTracker {
    key_frame: HashMap<KeyCode, u64>,
    frame: u64,
    quit: bool,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the tracker's clock; call once per game frame before
    /// feeding that frame's events.
    pub fn begin_frame(&mut self) {
        self.frame += 1;
    }

    pub fn handle(&mut self, event: &Event) {
        let Event::Key(KeyEvent {
            code,
            kind,
            modifiers,
            ..
        }) = event
        else {
            return;
        };
        let code = normalize(*code);

        match kind {
            KeyEventKind::Press => {
                if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
                    self.quit = true;
                    return;
                }
                if matches!(code, KeyCode::Char('q') | KeyCode::Esc) {
                    self.quit = true;
                }
                self.key_frame.insert(code, self.frame);
            }
            KeyEventKind::Repeat => {
                self.key_frame.insert(code, self.frame);
            }
            KeyEventKind::Release => {
                self.key_frame.remove(&code);
            }
        }
    }

    fn is_held(&self, key: KeyCode) -> bool {
        self.key_frame
            .get(&key)
            .map(|&last| self.frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }

    pub fn snapshot(&self) -> InputState {
        InputState {
            up: self.is_held(KeyCode::Up) || self.is_held(KeyCode::Char('w')),
            down: self.is_held(KeyCode::Down) || self.is_held(KeyCode::Char('s')),
            left: self.is_held(KeyCode::Left) || self.is_held(KeyCode::Char('a')),
            right: self.is_held(KeyCode::Right) || self.is_held(KeyCode::Char('d')),
            fire: self.is_held(KeyCode::Char(' ')),
            pause: self.is_held(KeyCode::Char('p')),
            quit: self.quit,
        }
    }

    /// Forget every held key, e.g. after returning from a menu screen.
    pub fn clear(&mut self) {
        self.key_frame.clear();
    }
}

/// Fold upper-case letters onto lower-case so Shift doesn't change bindings.
fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}
