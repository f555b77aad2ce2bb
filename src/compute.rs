/// Per-frame game logic.
///
/// `GameState` owns every entity collection and the progression counters.
/// A frame is split in two halves so the loop can open the pause screen
/// between them:
///
/// * `begin_frame`: spawn, advance entities, damage, kills, shot duels,
///   item spawn and pickup.
/// * `end_frame`: boss trigger, boss hits, game-over check.
///
/// All randomness comes through the injected `rng` so callers control
/// determinism (tests use a seeded RNG).

use std::sync::Arc;

use rand::Rng;

use crate::assets::{AssetLibrary, MusicId, SoundId};
use crate::config::GameConfig;
use crate::entities::entity::{collide_one, group_collide, remove_indices};
use crate::entities::obstacle::{explode_all, update_obstacles};
use crate::entities::{Boss, BossHit, Item, ItemKind, Obstacle, ObstacleContext, Player, Shot};
use crate::error::Result;
use crate::events::GameEvent;
use crate::input::InputState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Playing,
    /// Obstacles are being swept away before the boss shows up.
    BossIncoming { sub_frames_left: u32 },
    /// Only the boss moves until it is fully on screen.
    BossEntering,
    GameOver,
}

pub struct GameState {
    pub config: GameConfig,
    assets: Arc<AssetLibrary>,
    pub width: i32,
    pub height: i32,

    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub obstacle_shots: Vec<Shot>,
    pub player_shots: Vec<Shot>,
    pub boss: Option<Boss>,
    pub boss_shots: Vec<Shot>,
    pub items: Vec<Item>,

    pub score: u32,
    /// A boss encounter is running: no obstacle spawning, firing or items.
    pub boss_active: bool,
    pub count_boss_died: u32,
    pub phase: Phase,
    pub frame: u64,

    /// Next score milestones for an item and a boss.  A frame that jumps
    /// past a milestone still triggers it.
    next_item_at: u32,
    next_boss_at: u32,
    events: Vec<GameEvent>,
}

// ── Constructors ─────────────────────────────────────────────────────────────

impl GameState {
    /// Fresh session on a `width` x `height` logical screen.
    pub fn new(
        config: GameConfig,
        assets: Arc<AssetLibrary>,
        width: i32,
        height: i32,
    ) -> Result<Self> {
        let player = Player::new(&assets, &config, height)?;
        let (next_item_at, next_boss_at) = (config.item_threshold, config.boss_threshold);
        tracing::info!(width, height, lifes = player.lifes(), "session started");
        Ok(Self {
            config,
            assets,
            width,
            height,
            player,
            obstacles: Vec::new(),
            obstacle_shots: Vec::new(),
            player_shots: Vec::new(),
            boss: None,
            boss_shots: Vec::new(),
            items: Vec::new(),
            score: 0,
            boss_active: false,
            count_boss_died: 0,
            phase: Phase::Playing,
            frame: 0,
            next_item_at,
            next_boss_at,
            events: vec![GameEvent::MusicStarted(MusicId::Game)],
        })
    }

    pub fn assets(&self) -> &AssetLibrary {
        &self.assets
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// Events emitted since the last call.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }
}

// ── Frame driving ────────────────────────────────────────────────────────────

impl GameState {
    /// Both halves of a frame, ignoring the pause request.
    pub fn tick(&mut self, input: &InputState, rng: &mut impl Rng) -> Result<()> {
        self.begin_frame(input, rng)?;
        self.end_frame();
        Ok(())
    }

    pub fn begin_frame(&mut self, input: &InputState, rng: &mut impl Rng) -> Result<()> {
        self.frame += 1;
        match self.phase {
            Phase::Playing => self.play_frame(input, rng),
            Phase::BossIncoming { sub_frames_left } => {
                self.sweep_frame(input, sub_frames_left, rng)
            }
            Phase::BossEntering => {
                self.boss_entry_frame();
                Ok(())
            }
            Phase::GameOver => Ok(()),
        }
    }

    pub fn end_frame(&mut self) {
        if self.phase == Phase::Playing {
            self.check_boss_trigger();
            self.resolve_boss_hits();
        }
        self.check_game_over();
    }

    fn play_frame(&mut self, input: &InputState, rng: &mut impl Rng) -> Result<()> {
        if self.obstacles.is_empty() && !self.boss_active {
            let obstacle = Obstacle::spawn(&self.obstacle_context(), rng)?;
            self.obstacles.push(obstacle);
            tracing::debug!(frame = self.frame, "obstacle spawned");
        }

        self.advance_entities(input, rng)?;

        self.resolve_player_damage();
        self.resolve_obstacle_kills();
        self.resolve_shot_duels();
        self.spawn_item(rng)?;
        self.resolve_item_pickup();
        Ok(())
    }

    /// Forced-explosion frame played while a boss is incoming.
    fn sweep_frame(
        &mut self,
        input: &InputState,
        sub_frames_left: u32,
        rng: &mut impl Rng,
    ) -> Result<()> {
        self.sweep_hostiles();
        self.advance_entities(input, rng)?;

        if sub_frames_left <= 1 {
            self.spawn_boss()?;
        } else {
            self.phase = Phase::BossIncoming {
                sub_frames_left: sub_frames_left - 1,
            };
        }
        Ok(())
    }

    fn boss_entry_frame(&mut self) {
        match self.boss.as_mut() {
            Some(boss) => {
                boss.update(self.width, self.height, &mut self.boss_shots, &mut self.events);
                if !boss.is_entering() {
                    self.phase = Phase::Playing;
                }
            }
            None => self.phase = Phase::Playing,
        }
    }

    fn obstacle_context(&self) -> ObstacleContext<'_> {
        ObstacleContext {
            assets: self.assets.as_ref(),
            config: &self.config,
            width: self.width,
            height: self.height,
            score: self.score,
            boss_active: self.boss_active,
        }
    }

    /// Move, animate and fire everything; drop what left the screen or
    /// finished exploding.
    fn advance_entities(&mut self, input: &InputState, rng: &mut impl Rng) -> Result<()> {
        let (width, height) = (self.width, self.height);

        self.player_shots.retain_mut(|s| s.update(width));
        self.obstacle_shots.retain_mut(|s| s.update(width));
        self.boss_shots.retain_mut(|s| s.update(width));

        self.player
            .update(input, width, height, &mut self.player_shots, &mut self.events);

        let ctx = ObstacleContext {
            assets: self.assets.as_ref(),
            config: &self.config,
            width,
            height,
            score: self.score,
            boss_active: self.boss_active,
        };
        update_obstacles(
            &mut self.obstacles,
            &mut self.obstacle_shots,
            &ctx,
            rng,
            &mut self.events,
        )?;

        if let Some(boss) = self.boss.as_mut() {
            boss.update(width, height, &mut self.boss_shots, &mut self.events);
        }
        if self.boss.as_ref().is_some_and(Boss::is_removed) {
            self.boss = None;
            tracing::debug!("boss removed");
        }

        self.items.retain_mut(Item::update);
        Ok(())
    }

    fn add_score(&mut self, points: u32) {
        if points == 0 {
            return;
        }
        self.score += points;
        self.events.push(GameEvent::ScoreChanged(self.score));
    }
}

// ── Collisions ───────────────────────────────────────────────────────────────

impl GameState {
    /// Contact with an obstacle, an obstacle shot, the boss or a boss shot
    /// costs exactly one life, however many of them touch at once.  The
    /// checks short-circuit in that order.
    fn resolve_player_damage(&mut self) {
        let hit = self.player_hits_obstacle()
            || self.player_hits_obstacle_shot()
            || self.player_touches_boss()
            || self.player_hits_boss_shot();
        if hit {
            self.player.take_hit();
            self.events.push(GameEvent::PlayerHit {
                lifes_left: self.player.lifes(),
            });
            tracing::debug!(lifes = self.player.lifes(), "player hit");
        }
    }

    fn player_hits_obstacle(&mut self) -> bool {
        let hits = collide_one(&self.player, &self.obstacles);
        for &i in &hits {
            self.obstacles[i].entity.explode();
        }
        !hits.is_empty()
    }

    fn player_hits_obstacle_shot(&mut self) -> bool {
        let hits = collide_one(&self.player, &self.obstacle_shots);
        remove_indices(&mut self.obstacle_shots, &hits);
        !hits.is_empty()
    }

    fn player_touches_boss(&self) -> bool {
        self.boss
            .as_ref()
            .is_some_and(|boss| self.player.entity.collides_with(&boss.entity))
    }

    fn player_hits_boss_shot(&mut self) -> bool {
        let hits = collide_one(&self.player, &self.boss_shots);
        remove_indices(&mut self.boss_shots, &hits);
        !hits.is_empty()
    }

    /// Every obstacle struck by a player shot explodes and scores one point;
    /// the shots that hit are spent.
    fn resolve_obstacle_kills(&mut self) {
        let collisions = group_collide(&self.player_shots, &self.obstacles);
        if collisions.is_empty() {
            return;
        }
        let spent: Vec<usize> = collisions.iter().map(|(shot, _)| *shot).collect();
        let mut struck: Vec<usize> = collisions.into_iter().flat_map(|(_, hit)| hit).collect();
        struck.sort_unstable();
        struck.dedup();

        for &i in &struck {
            self.obstacles[i].entity.explode();
        }
        remove_indices(&mut self.player_shots, &spent);
        self.add_score(struck.len() as u32);
    }

    /// Player shots cancel obstacle shots; boss shots swallow player shots.
    fn resolve_shot_duels(&mut self) {
        let duels = group_collide(&self.player_shots, &self.obstacle_shots);
        if !duels.is_empty() {
            let spent: Vec<usize> = duels.iter().map(|(shot, _)| *shot).collect();
            let cancelled: Vec<usize> = duels.into_iter().flat_map(|(_, hit)| hit).collect();
            remove_indices(&mut self.player_shots, &spent);
            remove_indices(&mut self.obstacle_shots, &cancelled);
        }

        let blocked: Vec<usize> = group_collide(&self.player_shots, &self.boss_shots)
            .into_iter()
            .map(|(shot, _)| shot)
            .collect();
        remove_indices(&mut self.player_shots, &blocked);
    }

    fn resolve_item_pickup(&mut self) {
        let hits = collide_one(&self.player, &self.items);
        let Some(&first) = hits.first() else {
            return;
        };
        let kind = self.items[first].kind();
        self.items[first].apply_effect(&mut self.player);
        remove_indices(&mut self.items, &hits);

        self.events.push(GameEvent::Sound(SoundId::TakeItem));
        self.events.push(GameEvent::ItemCollected(kind));
        tracing::debug!(?kind, "item collected");
    }

    fn resolve_boss_hits(&mut self) {
        let Some(boss) = self.boss.as_mut() else {
            return;
        };
        let hits = collide_one(&*boss, &self.player_shots);
        if hits.is_empty() {
            return;
        }
        remove_indices(&mut self.player_shots, &hits);

        let mut destroyed = false;
        for _ in &hits {
            if boss.hit(&mut self.boss_shots) == BossHit::Destroyed {
                destroyed = true;
            }
        }

        if destroyed {
            self.add_score(1);
            self.boss_active = false;
            self.count_boss_died += 1;
            self.events.push(GameEvent::BossDefeated {
                count: self.count_boss_died,
            });
            tracing::info!(
                score = self.score,
                defeated = self.count_boss_died,
                "boss defeated"
            );
        }
    }
}

// ── Progression ──────────────────────────────────────────────────────────────

impl GameState {
    fn spawn_item(&mut self, rng: &mut impl Rng) -> Result<()> {
        if self.score < self.next_item_at || !self.items.is_empty() || self.boss_active {
            return Ok(());
        }
        let kind = ItemKind::random(rng);
        let item = Item::spawn(
            &self.assets,
            kind,
            self.width,
            self.height,
            self.config.item_speed,
            rng,
        )?;
        self.items.push(item);
        self.next_item_at = next_milestone(self.score, self.config.item_threshold);
        tracing::debug!(?kind, score = self.score, "item spawned");
        Ok(())
    }

    fn check_boss_trigger(&mut self) {
        if self.score < self.next_boss_at || self.boss.is_some() || self.boss_active {
            return;
        }
        self.next_boss_at = next_milestone(self.score, self.config.boss_threshold);
        self.boss_active = true;
        self.phase = Phase::BossIncoming {
            sub_frames_left: self.config.boss_sweep_frames,
        };
        self.sweep_hostiles();
        tracing::info!(score = self.score, "boss incoming");
    }

    /// Explode every obstacle and wipe the obstacle and player shots.
    fn sweep_hostiles(&mut self) {
        explode_all(&mut self.obstacles);
        self.obstacle_shots.clear();
        self.player_shots.clear();
    }

    fn spawn_boss(&mut self) -> Result<()> {
        let lifes = self.config.boss_base_lives + self.config.boss_lives_step * self.count_boss_died;
        let boss = Boss::spawn(
            &self.assets,
            &self.config,
            self.score,
            lifes,
            self.width,
            self.height,
        )?;
        self.boss = Some(boss);
        self.phase = Phase::BossEntering;
        self.events.push(GameEvent::Sound(SoundId::BossAppear));
        self.events.push(GameEvent::BossSpawned { lifes });
        tracing::info!(lifes, "boss spawned");
        Ok(())
    }

    fn check_game_over(&mut self) {
        if self.phase == Phase::GameOver || self.player.lifes() > 0 {
            return;
        }
        self.phase = Phase::GameOver;
        self.events.push(GameEvent::MusicStopped);
        self.events.push(GameEvent::Sound(SoundId::Exterminate));
        self.events.push(GameEvent::Sound(SoundId::GameOver));
        self.events.push(GameEvent::GameOver { score: self.score });
        tracing::info!(score = self.score, frame = self.frame, "game over");
    }
}

/// First multiple of `threshold` strictly above `score`.
fn next_milestone(score: u32, threshold: u32) -> u32 {
    (score / threshold + 1) * threshold
}
