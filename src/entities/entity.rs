/// Base behaviour shared by every on-screen actor: position, looping
/// animation, death explosion and pixel-mask collision.

use std::sync::Arc;

use crate::assets::{Frame, SpriteSheet};
use crate::geometry::Rect;

/// Update ticks between two explosion frames.
pub const EXPLOSION_TICKS: u32 = 2;

// ── Animation ────────────────────────────────────────────────────────────────

/// Endless circular walk over a sprite sheet, one frame every
/// `ticks_per_frame` updates.
#[derive(Clone, Debug)]
pub struct Animator {
    sheet: Arc<SpriteSheet>,
    index: usize,
    timer: u32,
    ticks_per_frame: u32,
}

impl Animator {
    pub fn new(sheet: Arc<SpriteSheet>, ticks_per_frame: u32) -> Self {
        Self {
            sheet,
            index: 0,
            timer: 0,
            ticks_per_frame: ticks_per_frame.max(1),
        }
    }

    pub fn advance(&mut self) {
        self.timer += 1;
        if self.timer >= self.ticks_per_frame {
            self.timer = 0;
            self.index = (self.index + 1) % self.sheet.len();
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn frame(&self) -> &Frame {
        self.sheet.frame(self.index)
    }

    pub fn speed(&self) -> u32 {
        self.ticks_per_frame
    }

    pub fn set_speed(&mut self, ticks_per_frame: u32) {
        self.ticks_per_frame = ticks_per_frame.max(1);
        self.timer = self.timer.min(self.ticks_per_frame - 1);
    }
}

// ── Explosion ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExplosionStep {
    /// First call: the caller should play the explosion sound.
    Started,
    Playing,
    /// The sequence is exhausted; the entity must leave its collection.
    Finished,
}

#[derive(Clone, Debug)]
struct Explosion {
    sheet: Arc<SpriteSheet>,
    index: usize,
    timer: u32,
    started: bool,
    finished: bool,
}

impl Explosion {
    fn new(sheet: Arc<SpriteSheet>) -> Self {
        Self {
            sheet,
            index: 0,
            timer: 0,
            started: false,
            finished: false,
        }
    }

    fn advance(&mut self) -> ExplosionStep {
        if self.finished {
            return ExplosionStep::Finished;
        }
        if !self.started {
            self.started = true;
            return ExplosionStep::Started;
        }
        self.timer += 1;
        if self.timer < EXPLOSION_TICKS {
            return ExplosionStep::Playing;
        }
        self.timer = 0;
        self.index += 1;
        if self.index >= self.sheet.len() {
            self.finished = true;
            ExplosionStep::Finished
        } else {
            ExplosionStep::Playing
        }
    }

    fn frame(&self) -> Option<&Frame> {
        (self.started && !self.finished).then(|| self.sheet.frame(self.index))
    }
}

// ── Entity ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Entity {
    pub rect: Rect,
    animator: Animator,
    explosion: Option<Explosion>,
    exploded: bool,
}

impl Entity {
    /// Entity at `(x, y)` sized after the sheet's frames.
    pub fn new(sheet: Arc<SpriteSheet>, x: i32, y: i32, ticks_per_frame: u32) -> Self {
        let rect = Rect::new(x, y, sheet.width(), sheet.height());
        Self {
            rect,
            animator: Animator::new(sheet, ticks_per_frame),
            explosion: None,
            exploded: false,
        }
    }

    /// Give the entity a death animation.
    pub fn with_explosion(mut self, sheet: Arc<SpriteSheet>) -> Self {
        self.explosion = Some(Explosion::new(sheet));
        self
    }

    pub fn advance_animation(&mut self) {
        self.animator.advance();
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    pub fn animator_mut(&mut self) -> &mut Animator {
        &mut self.animator
    }

    pub fn frame(&self) -> &Frame {
        self.animator.frame()
    }

    /// Mark the entity as dead; it stops colliding and starts exploding on
    /// its next update.
    pub fn explode(&mut self) {
        self.exploded = true;
    }

    pub fn is_exploded(&self) -> bool {
        self.exploded
    }

    /// Step the death animation.  Entities without an explosion sheet
    /// finish immediately.
    pub fn advance_explosion(&mut self) -> ExplosionStep {
        match &mut self.explosion {
            Some(explosion) => explosion.advance(),
            None => ExplosionStep::Finished,
        }
    }

    pub fn explosion_finished(&self) -> bool {
        self.exploded
            && self
                .explosion
                .as_ref()
                .map(|e| e.finished)
                .unwrap_or(true)
    }

    /// Frame to draw while exploding, if the explosion is on screen.
    pub fn explosion_frame(&self) -> Option<&Frame> {
        self.explosion.as_ref().and_then(Explosion::frame)
    }

    pub fn is_off_left(&self) -> bool {
        self.rect.right() < 0
    }

    /// Pixel-accurate collision; exploded entities never collide.
    pub fn collides_with(&self, other: &Entity) -> bool {
        if self.exploded || other.exploded || !self.rect.intersects(&other.rect) {
            return false;
        }
        self.frame().mask().overlaps(
            other.frame().mask(),
            other.rect.x - self.rect.x,
            other.rect.y - self.rect.y,
        )
    }
}

// ── Collections ──────────────────────────────────────────────────────────────

/// Anything built around an `Entity`.
pub trait Actor {
    fn entity(&self) -> &Entity;
}

/// Indices of every member of `group` touching `actor`.
pub fn collide_one<A: Actor, B: Actor>(actor: &A, group: &[B]) -> Vec<usize> {
    group
        .iter()
        .enumerate()
        .filter(|(_, b)| actor.entity().collides_with(b.entity()))
        .map(|(i, _)| i)
        .collect()
}

/// For each member of `a` touching something in `b`: its index and the
/// indices it touches.
pub fn group_collide<A: Actor, B: Actor>(a: &[A], b: &[B]) -> Vec<(usize, Vec<usize>)> {
    a.iter()
        .enumerate()
        .filter_map(|(i, x)| {
            let hits = collide_one(x, b);
            (!hits.is_empty()).then_some((i, hits))
        })
        .collect()
}

/// Drop the members at `doomed` (indices may repeat or be unsorted).
pub fn remove_indices<T>(items: &mut Vec<T>, doomed: &[usize]) {
    if doomed.is_empty() {
        return;
    }
    let mut index = 0;
    items.retain(|_| {
        let keep = !doomed.contains(&index);
        index += 1;
        keep
    });
}
