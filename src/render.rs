/// Scene composition.
///
/// The core never talks to a terminal: it draws through a `Surface`, a
/// pixel-addressed canvas the frontend maps onto whatever it really has.

use crate::assets::{Frame, SpriteId, CELL_H, CELL_W};
use crate::compute::{GameState, Phase};
use crate::entities::Entity;
use crate::error::Result;
use crate::geometry::Rect;

/// Colour role of whatever is being drawn; the frontend picks the palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tone {
    Player,
    Hostile,
    Boss,
    Item,
    Explosion,
    Hud,
    Alert,
}

pub trait Surface {
    /// Logical size in pixels.
    fn size(&self) -> (i32, i32);
    fn clear(&mut self) -> Result<()>;
    /// Draw the opaque cells of `frame` with its top-left corner at `(x, y)`.
    fn draw_frame(&mut self, frame: &Frame, x: i32, y: i32, tone: Tone) -> Result<()>;
    fn draw_text(&mut self, text: &str, x: i32, y: i32, tone: Tone) -> Result<()>;
    fn fill_rect(&mut self, rect: Rect, tone: Tone) -> Result<()>;
    /// Make everything drawn since `clear` visible.
    fn present(&mut self) -> Result<()>;
}

const HUD_MARGIN: i32 = 10;
const ICON_GAP: i32 = CELL_W;
const SCORE_Y: i32 = 50;

pub fn render_scene<S: Surface + ?Sized>(state: &GameState, surface: &mut S) -> Result<()> {
    surface.clear()?;

    for obstacle in &state.obstacles {
        draw_entity(surface, &obstacle.entity, Tone::Hostile)?;
    }
    for shot in &state.obstacle_shots {
        draw_entity(surface, &shot.entity, Tone::Hostile)?;
    }
    for shot in &state.boss_shots {
        draw_entity(surface, &shot.entity, Tone::Boss)?;
    }
    for shot in &state.player_shots {
        draw_entity(surface, &shot.entity, Tone::Player)?;
    }
    for item in &state.items {
        draw_entity(surface, &item.entity, Tone::Item)?;
    }

    if let Some(boss) = &state.boss {
        if !boss.is_hidden() {
            draw_entity(surface, &boss.entity, Tone::Boss)?;
        }
        if !boss.entity.is_exploded() {
            let rect = boss.entity.rect;
            let bar = Rect::new(rect.x, (rect.y - CELL_H).max(0), rect.w, CELL_H);
            surface.fill_rect(bar, Tone::Hud)?;
            surface.fill_rect(
                Rect::new(bar.x, bar.y, boss.health_bar_width(bar.w), bar.h),
                Tone::Alert,
            )?;
        }
    }

    if !state.player.is_hidden() {
        draw_entity(surface, &state.player.entity, Tone::Player)?;
    }

    draw_hud(state, surface)?;

    if state.phase() == Phase::GameOver {
        draw_centered_text(surface, "GAME OVER", state.height / 2, Tone::Alert)?;
    }

    surface.present()
}

/// The live sprite, or the explosion centred on it once dead.
fn draw_entity<S: Surface + ?Sized>(surface: &mut S, entity: &Entity, tone: Tone) -> Result<()> {
    if entity.is_exploded() {
        if let Some(frame) = entity.explosion_frame() {
            let at = entity.rect.centered(frame.width(), frame.height());
            surface.draw_frame(frame, at.x, at.y, Tone::Explosion)?;
        }
        return Ok(());
    }
    let rect = entity.rect;
    surface.draw_frame(entity.frame(), rect.x, rect.y, tone)
}

fn draw_hud<S: Surface + ?Sized>(state: &GameState, surface: &mut S) -> Result<()> {
    // Lives, top-left.
    let heart = state.assets().sheet(SpriteId::LifeIcon)?;
    let mut x = HUD_MARGIN;
    for _ in 0..state.player.lifes() {
        surface.draw_frame(heart.frame(0), x, HUD_MARGIN, Tone::Alert)?;
        x += heart.width() + ICON_GAP;
    }

    // Running buffs, top-centre.
    let mut buffs = Vec::new();
    if !state.player.shooting_enabled() {
        buffs.push(state.assets().sheet(SpriteId::ItemFire)?);
    }
    if !state.player.increase_speed_enabled() {
        buffs.push(state.assets().sheet(SpriteId::ItemSpeed)?);
    }
    let total: i32 = buffs.iter().map(|s| s.width() + ICON_GAP).sum::<i32>() - ICON_GAP;
    let mut x = state.width / 2 - total / 2;
    for sheet in &buffs {
        surface.draw_frame(sheet.frame(0), x, HUD_MARGIN, Tone::Item)?;
        x += sheet.width() + ICON_GAP;
    }

    let score = format!("SCORE: {}", state.score);
    let x = state.width - (score.len() as i32 + 2) * CELL_W;
    surface.draw_text(&score, x, SCORE_Y, Tone::Hud)
}

fn draw_centered_text<S: Surface + ?Sized>(
    surface: &mut S,
    text: &str,
    y: i32,
    tone: Tone,
) -> Result<()> {
    let (width, _) = surface.size();
    let x = width / 2 - text.len() as i32 * CELL_W / 2;
    surface.draw_text(text, x, y, tone)
}
