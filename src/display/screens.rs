/// Blocking menu screens: title, credits, pause and play-again.
///
/// Each screen redraws itself and waits on the event channel until the
/// player confirms an entry with Enter.  Space is never a confirm key since
/// it is usually still held from firing when a menu opens.

use std::io::Write;
use std::sync::mpsc::Receiver;

use crossterm::{
    cursor,
    event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

use spacial_game::error::Result;
use spacial_game::game_loop::{PauseChoice, ResetChoice};

const C_TITLE: Color = Color::Cyan;
const C_TEXT: Color = Color::White;
const C_SELECTED: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TitleChoice {
    Play,
    Credits,
    Exit,
}

struct Menu<'m> {
    title: &'m str,
    lines: &'m [String],
    buttons: &'m [&'m str],
}

pub fn title<W: Write>(out: &mut W, rx: &Receiver<Event>) -> Result<TitleChoice> {
    let menu = Menu {
        title: "★  SPACIAL  GAME  ★",
        lines: &["Survive the rocks, beat the boss.".to_string()],
        buttons: &["PLAY", "CREDITS", "EXIT"],
    };
    Ok(match run_menu(out, rx, &menu)? {
        Some(0) => TitleChoice::Play,
        Some(1) => TitleChoice::Credits,
        _ => TitleChoice::Exit,
    })
}

pub fn credits<W: Write>(out: &mut W, rx: &Receiver<Event>) -> Result<()> {
    let lines = [
        "A side-scrolling shooter for the terminal.".to_string(),
        "Built on crossterm and rand.".to_string(),
        String::new(),
        "↑ ↓ ← → / W A S D : Move".to_string(),
        "SPACE : Shoot   P : Pause   Q : Quit".to_string(),
    ];
    let menu = Menu {
        title: "CREDITS",
        lines: &lines,
        buttons: &["RETURN TO MENU"],
    };
    run_menu(out, rx, &menu)?;
    Ok(())
}

pub fn pause<W: Write>(out: &mut W, rx: &Receiver<Event>) -> Result<PauseChoice> {
    let menu = Menu {
        title: "PAUSE",
        lines: &[],
        buttons: &["RETURN TO GAME", "RETURN TO MENU"],
    };
    Ok(match run_menu(out, rx, &menu)? {
        Some(1) => PauseChoice::ReturnToMenu,
        _ => PauseChoice::Resume,
    })
}

pub fn reset<W: Write>(out: &mut W, rx: &Receiver<Event>, score: u32) -> Result<ResetChoice> {
    let menu = Menu {
        title: "GAME  OVER",
        lines: &[format!("Final Score: {score}")],
        buttons: &["RETURN TO MENU", "EXIT"],
    };
    Ok(match run_menu(out, rx, &menu)? {
        Some(0) => ResetChoice::ReturnToMenu,
        _ => ResetChoice::Exit,
    })
}

/// Index of the confirmed button, or `None` if the player backed out.
fn run_menu<W: Write>(out: &mut W, rx: &Receiver<Event>, menu: &Menu<'_>) -> Result<Option<usize>> {
    // Drop keys pressed before the menu opened.
    while rx.try_recv().is_ok() {}

    let count = menu.buttons.len();
    let mut selected = 0;
    draw_menu(out, menu, selected)?;

    // Block until the user makes a choice
    loop {
        let Ok(event) = rx.recv() else {
            return Ok(None);
        };
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                modifiers,
                ..
            }) => match code {
                KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => {
                    selected = (selected + count - 1) % count;
                }
                KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => {
                    selected = (selected + 1) % count;
                }
                KeyCode::Enter => return Ok(Some(selected)),
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(None);
                }
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(None),
                _ => continue,
            },
            Event::Resize(..) => {}
            _ => continue,
        }
        draw_menu(out, menu, selected)?;
    }
}

fn draw_menu<W: Write>(out: &mut W, menu: &Menu<'_>, selected: usize) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let rows = 2 + menu.lines.len() as u16 + 1 + menu.buttons.len() as u16 * 2;
    let mut row = (height / 2).saturating_sub(rows / 2);

    print_centered(out, menu.title, cx, row, C_TITLE)?;
    row += 2;

    for line in menu.lines {
        print_centered(out, line, cx, row, C_TEXT)?;
        row += 1;
    }
    row += 1;

    for (i, button) in menu.buttons.iter().enumerate() {
        if i == selected {
            print_centered(out, &format!("> {button} <"), cx, row, C_SELECTED)?;
        } else {
            print_centered(out, button, cx, row, C_TEXT)?;
        }
        row += 2;
    }

    print_centered(out, "↑ ↓ : Select   ENTER : Confirm", cx, height.saturating_sub(2), C_HINT)?;

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

fn print_centered<W: Write>(out: &mut W, text: &str, cx: u16, row: u16, color: Color) -> Result<()> {
    out.queue(cursor::MoveTo(
        cx.saturating_sub(text.chars().count() as u16 / 2),
        row,
    ))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}
