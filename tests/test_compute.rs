use std::sync::Arc;

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use spacial_game::assets::{AssetLibrary, MusicId, SoundId, SpriteId, CELL_H, CELL_W};
use spacial_game::compute::*;
use spacial_game::config::GameConfig;
use spacial_game::entities::*;
use spacial_game::events::GameEvent;
use spacial_game::input::InputState;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn make_game(config: GameConfig) -> GameState {
    let assets = Arc::new(AssetLibrary::builtin().unwrap());
    let (w, h) = (config.screen_width, config.screen_height);
    GameState::new(config, assets, w, h).unwrap()
}

fn idle() -> InputState {
    InputState::default()
}

fn tick(game: &mut GameState, rng: &mut StdRng) {
    game.tick(&idle(), rng).unwrap();
}

/// A motionless obstacle parked over the player's fuselage row.
fn obstacle_on_player(game: &GameState) -> Obstacle {
    let rect = game.player.entity.rect;
    Obstacle::new(game.assets(), rect.x, rect.y, 0).unwrap()
}

fn shot(game: &GameState, owner: ShotOwner, speed: i32, muzzle_x: i32, center_y: i32) -> Shot {
    let id = match owner {
        ShotOwner::Player => SpriteId::PlayerShot,
        ShotOwner::Obstacle => SpriteId::ObstacleShot,
        ShotOwner::Boss => SpriteId::BossShot,
    };
    Shot::new(game.assets().sheet(id).unwrap(), owner, speed, muzzle_x, center_y)
}

/// Player shot that lands on the solid middle row of an obstacle at
/// `(x, y)` during the next frame.
fn shot_into_obstacle(game: &GameState, x: i32, y: i32) -> Shot {
    shot(game, ShotOwner::Player, 0, x + CELL_W, y + 2 * CELL_H + CELL_H / 2)
}

/// Two motionless obstacles, each with a player shot about to land on it.
fn double_kill_setup(game: &mut GameState) {
    for y in [100, 400] {
        let o = Obstacle::new(game.assets(), 600, y, 0).unwrap();
        game.obstacles.push(o);
        let s = shot_into_obstacle(game, 600, y);
        game.player_shots.push(s);
    }
}

/// Drive the game from a score of `score` through the boss sweep until the
/// boss has fully entered.  Items passed on the way are dropped.
fn summon_boss(game: &mut GameState, rng: &mut StdRng, score: u32) {
    game.score = score;
    tick(game, rng);
    for _ in 0..100 {
        if game.phase() == Phase::Playing {
            game.items.clear();
            return;
        }
        tick(game, rng);
    }
    panic!("boss never finished entering");
}

// ── Session start ─────────────────────────────────────────────────────────────

#[test]
fn new_session_starts_music_and_empty() {
    let game = make_game(GameConfig::default());
    assert_eq!(game.events(), &[GameEvent::MusicStarted(MusicId::Game)]);
    assert_eq!(game.phase(), Phase::Playing);
    assert_eq!(game.score, 0);
    assert_eq!(game.player.lifes(), 3);
    assert!(game.obstacles.is_empty());
    assert!(game.boss.is_none());
    assert!(!game.boss_active);
}

#[test]
fn first_frame_spawns_an_obstacle() {
    let mut game = make_game(GameConfig::default());
    let mut rng = seeded_rng();
    tick(&mut game, &mut rng);
    assert!(!game.obstacles.is_empty());
    let o = &game.obstacles[0];
    assert_eq!(o.entity.rect.x, 1280 - o.speed());
    assert_eq!(game.frame, 1);
}

#[test]
fn take_events_drains() {
    let mut game = make_game(GameConfig::default());
    assert_eq!(game.take_events().len(), 1);
    assert!(game.take_events().is_empty());
}

// ── Player damage ─────────────────────────────────────────────────────────────

#[test]
fn obstacle_contact_costs_a_life_and_explodes_it() {
    let mut game = make_game(GameConfig::default());
    let mut rng = seeded_rng();
    let o = obstacle_on_player(&game);
    game.obstacles.push(o);
    game.take_events();

    tick(&mut game, &mut rng);
    assert_eq!(game.player.lifes(), 2);
    assert!(game.obstacles[0].entity.is_exploded());
    assert!(game
        .take_events()
        .contains(&GameEvent::PlayerHit { lifes_left: 2 }));
}

#[test]
fn simultaneous_hazards_cost_a_single_life() {
    let mut game = make_game(GameConfig::default());
    let mut rng = seeded_rng();
    let rect = game.player.entity.rect;
    let o = obstacle_on_player(&game);
    game.obstacles.push(o);
    let s = shot(&game, ShotOwner::Obstacle, 0, rect.x + 5 * CELL_W, rect.center_y());
    game.obstacle_shots.push(s);

    tick(&mut game, &mut rng);
    assert_eq!(game.player.lifes(), 2);
    // The obstacle check short-circuits the rest.
    assert_eq!(game.obstacle_shots.len(), 1);

    // Next frame the obstacle is dead; the shot lands.
    tick(&mut game, &mut rng);
    assert_eq!(game.player.lifes(), 1);
    assert!(game.obstacle_shots.is_empty());
}

#[test]
fn hostile_shots_are_consumed_on_hit() {
    let mut game = make_game(GameConfig::default());
    let mut rng = seeded_rng();
    let rect = game.player.entity.rect;
    let s = shot(&game, ShotOwner::Boss, 0, rect.x + 5 * CELL_W, rect.center_y());
    game.boss_shots.push(s);

    tick(&mut game, &mut rng);
    assert_eq!(game.player.lifes(), 2);
    assert!(game.boss_shots.is_empty());
}

#[test]
fn player_is_hidden_the_frame_after_a_hit() {
    let mut game = make_game(GameConfig::default());
    let mut rng = seeded_rng();
    let o = obstacle_on_player(&game);
    game.obstacles.push(o);
    tick(&mut game, &mut rng);
    assert!(!game.player.is_hidden());
    tick(&mut game, &mut rng);
    assert!(game.player.is_hidden());
}

// ── Scoring ───────────────────────────────────────────────────────────────────

#[test]
fn shooting_an_obstacle_scores_one_point() {
    let mut game = make_game(GameConfig::default());
    let mut rng = seeded_rng();
    let o = Obstacle::new(game.assets(), 600, 200, 0).unwrap();
    game.obstacles.push(o);
    let s = shot_into_obstacle(&game, 600, 200);
    game.player_shots.push(s);
    game.take_events();

    tick(&mut game, &mut rng);
    assert_eq!(game.score, 1);
    assert!(game.obstacles[0].entity.is_exploded());
    assert!(game.player_shots.is_empty());
    assert!(game.take_events().contains(&GameEvent::ScoreChanged(1)));
}

#[test]
fn two_shots_on_one_obstacle_score_once() {
    let mut game = make_game(GameConfig::default());
    let mut rng = seeded_rng();
    let o = Obstacle::new(game.assets(), 600, 200, 0).unwrap();
    game.obstacles.push(o);
    let a = shot_into_obstacle(&game, 600, 200);
    let b = shot_into_obstacle(&game, 600 + 3 * CELL_W, 200);
    game.player_shots.extend([a, b]);

    tick(&mut game, &mut rng);
    assert_eq!(game.score, 1);
    assert!(game.player_shots.is_empty());
}

#[test]
fn each_obstacle_struck_in_a_frame_scores() {
    let mut game = make_game(GameConfig::default());
    let mut rng = seeded_rng();
    double_kill_setup(&mut game);
    game.take_events();

    tick(&mut game, &mut rng);
    assert_eq!(game.score, 2);
    assert!(game.obstacles[..2].iter().all(|o| o.entity.is_exploded()));
    assert!(game.player_shots.is_empty());
    assert!(game.take_events().contains(&GameEvent::ScoreChanged(2)));
}

#[test]
fn exploding_obstacles_absorb_nothing() {
    let mut game = make_game(GameConfig::default());
    let mut rng = seeded_rng();
    let mut o = Obstacle::new(game.assets(), 600, 200, 0).unwrap();
    o.entity.explode();
    game.obstacles.push(o);
    let s = shot_into_obstacle(&game, 600, 200);
    game.player_shots.push(s);

    tick(&mut game, &mut rng);
    assert_eq!(game.score, 0);
    assert_eq!(game.player_shots.len(), 1);
}

#[test]
fn obstacle_shots_do_not_hurt_obstacles() {
    let mut game = make_game(GameConfig::default());
    let mut rng = seeded_rng();
    let o = Obstacle::new(game.assets(), 600, 200, 0).unwrap();
    game.obstacles.push(o);
    let s = shot(&game, ShotOwner::Obstacle, 0, 600 + 4 * CELL_W, 200 + 2 * CELL_H + CELL_H / 2);
    game.obstacle_shots.push(s);

    tick(&mut game, &mut rng);
    assert!(!game.obstacles[0].entity.is_exploded());
    assert_eq!(game.obstacle_shots.len(), 1);
}

// ── Shot duels ────────────────────────────────────────────────────────────────

#[test]
fn player_and_obstacle_shots_cancel_out() {
    let mut game = make_game(GameConfig::default());
    let mut rng = seeded_rng();
    let mine = shot(&game, ShotOwner::Player, 0, 600, 100);
    let theirs = shot(&game, ShotOwner::Obstacle, 0, 612, 100);
    game.player_shots.push(mine);
    game.obstacle_shots.push(theirs);

    tick(&mut game, &mut rng);
    assert!(game.player_shots.is_empty());
    assert!(game.obstacle_shots.is_empty());
    assert_eq!(game.score, 0);
}

#[test]
fn boss_shots_swallow_player_shots() {
    let mut game = make_game(GameConfig::default());
    let mut rng = seeded_rng();
    let mine = shot(&game, ShotOwner::Player, 0, 600, 100);
    let theirs = shot(&game, ShotOwner::Boss, 0, 620, 100);
    game.player_shots.push(mine);
    game.boss_shots.push(theirs);

    tick(&mut game, &mut rng);
    assert!(game.player_shots.is_empty());
    assert_eq!(game.boss_shots.len(), 1);
}

#[test]
fn player_shot_flies_off_the_right_edge() {
    let mut game = make_game(GameConfig::default());
    let mut rng = seeded_rng();
    // Keep rocks out of the flight path.
    game.boss_active = true;
    let s = shot(&game, ShotOwner::Player, 35, 100, 40);
    game.player_shots.push(s);

    // ceil((1280 - 100) / 35) frames.
    for _ in 0..33 {
        tick(&mut game, &mut rng);
        assert_eq!(game.player_shots.len(), 1);
    }
    tick(&mut game, &mut rng);
    assert!(game.player_shots.is_empty());
}

// ── Items ─────────────────────────────────────────────────────────────────────

#[test]
fn item_appears_once_per_milestone() {
    let mut game = make_game(GameConfig::default());
    let mut rng = seeded_rng();
    game.score = 15;

    tick(&mut game, &mut rng);
    assert_eq!(game.items.len(), 1);
    assert_eq!(game.items[0].entity.rect.x, 1280);

    game.items.clear();
    tick(&mut game, &mut rng);
    assert!(game.items.is_empty());

    game.score = 30;
    tick(&mut game, &mut rng);
    assert_eq!(game.items.len(), 1);
}

#[test]
fn no_item_off_milestone_or_during_boss() {
    let mut game = make_game(GameConfig::default());
    let mut rng = seeded_rng();
    game.score = 14;
    tick(&mut game, &mut rng);
    assert!(game.items.is_empty());

    game.score = 15;
    game.boss_active = true;
    tick(&mut game, &mut rng);
    assert!(game.items.is_empty());
}

#[test]
fn item_milestone_jumped_in_one_frame_still_counts() {
    let mut game = make_game(GameConfig::default());
    let mut rng = seeded_rng();
    game.score = 14;
    double_kill_setup(&mut game);

    tick(&mut game, &mut rng);
    assert_eq!(game.score, 16);
    assert_eq!(game.items.len(), 1);
}

#[test]
fn blocked_item_milestone_waits_for_the_screen_to_clear() {
    let mut game = make_game(GameConfig::default());
    let mut rng = seeded_rng();
    let parked = Item::new(game.assets(), ItemKind::Speed, 640, 40, 0).unwrap();
    game.items.push(parked);
    game.score = 15;
    tick(&mut game, &mut rng);
    assert_eq!(game.items.len(), 1);

    game.items.clear();
    game.score = 16;
    tick(&mut game, &mut rng);
    assert_eq!(game.items.len(), 1);
}

#[test]
fn picking_up_an_item_applies_it() {
    let mut game = make_game(GameConfig::default());
    let mut rng = seeded_rng();
    let rect = game.player.entity.rect;
    let heart = Item::new(game.assets(), ItemKind::Hearth, rect.x, rect.y, 0).unwrap();
    game.items.push(heart);
    game.take_events();

    tick(&mut game, &mut rng);
    assert_eq!(game.player.lifes(), 4);
    assert!(game.items.is_empty());
    let events = game.take_events();
    assert!(events.contains(&GameEvent::Sound(SoundId::TakeItem)));
    assert!(events.contains(&GameEvent::ItemCollected(ItemKind::Hearth)));
}

#[test]
fn fire_item_starts_the_buff() {
    let mut game = make_game(GameConfig::default());
    let mut rng = seeded_rng();
    let rect = game.player.entity.rect;
    let item = Item::new(game.assets(), ItemKind::FireRate, rect.x, rect.y, 0).unwrap();
    game.items.push(item);

    tick(&mut game, &mut rng);
    assert_eq!(game.player.fire_interval(), 1);
    assert!(!game.player.shooting_enabled());
}

// ── Boss encounter ────────────────────────────────────────────────────────────

#[test]
fn boss_milestone_sweeps_the_field() {
    let mut game = make_game(GameConfig::default());
    let mut rng = seeded_rng();
    let o = Obstacle::new(game.assets(), 900, 100, 0).unwrap();
    game.obstacles.push(o);
    let s = shot(&game, ShotOwner::Player, 1, 300, 600);
    game.player_shots.push(s);
    game.score = 20;

    tick(&mut game, &mut rng);
    assert_eq!(game.phase(), Phase::BossIncoming { sub_frames_left: 15 });
    assert!(game.boss_active);
    assert!(game.obstacles.iter().all(|o| o.entity.is_exploded()));
    assert!(game.player_shots.is_empty());
    assert!(game.obstacle_shots.is_empty());
}

#[test]
fn boss_milestone_jumped_in_one_frame_still_counts() {
    let mut game = make_game(GameConfig::default());
    let mut rng = seeded_rng();
    game.score = 19;
    double_kill_setup(&mut game);

    tick(&mut game, &mut rng);
    assert_eq!(game.score, 21);
    assert_eq!(game.phase(), Phase::BossIncoming { sub_frames_left: 15 });
    assert!(game.boss_active);

    for _ in 0..15 {
        tick(&mut game, &mut rng);
    }
    assert!(game.boss.is_some());
}

#[test]
fn boss_arrives_after_the_sweep() {
    let mut game = make_game(GameConfig::default());
    let mut rng = seeded_rng();
    game.score = 20;
    tick(&mut game, &mut rng);

    for _ in 0..14 {
        tick(&mut game, &mut rng);
        assert!(game.boss.is_none());
        // Nothing respawns while the boss is coming.
        assert!(game.obstacles.iter().all(|o| o.entity.is_exploded()));
    }
    game.take_events();
    tick(&mut game, &mut rng);
    assert_eq!(game.phase(), Phase::BossEntering);
    let boss = game.boss.as_ref().unwrap();
    assert_eq!(boss.lifes(), 5);
    assert_eq!(boss.speedy(), 5);
    let events = game.take_events();
    assert!(events.contains(&GameEvent::BossSpawned { lifes: 5 }));
    assert!(events.contains(&GameEvent::Sound(SoundId::BossAppear)));
}

#[test]
fn only_the_boss_moves_while_entering() {
    let mut game = make_game(GameConfig::default());
    let mut rng = seeded_rng();
    game.score = 20;
    for _ in 0..16 {
        tick(&mut game, &mut rng);
    }
    assert_eq!(game.phase(), Phase::BossEntering);

    let player = game.player.entity.rect;
    let input = InputState {
        up: true,
        ..Default::default()
    };
    let boss_x = game.boss.as_ref().unwrap().entity.rect.x;
    game.tick(&input, &mut rng).unwrap();
    assert_eq!(game.player.entity.rect, player);
    assert!(game.boss.as_ref().unwrap().entity.rect.x < boss_x);

    for _ in 0..20 {
        tick(&mut game, &mut rng);
    }
    assert_eq!(game.phase(), Phase::Playing);
    assert!(game.boss_active);
}

#[test]
fn later_bosses_are_tougher() {
    let mut game = make_game(GameConfig::default());
    let mut rng = seeded_rng();
    game.count_boss_died = 2;
    summon_boss(&mut game, &mut rng, 60);
    assert_eq!(game.boss.as_ref().unwrap().lifes(), 15);
}

#[test]
fn killing_the_boss_ends_the_encounter() {
    let config = GameConfig {
        boss_base_lives: 1,
        ..GameConfig::default()
    };
    let mut game = make_game(config);
    let mut rng = seeded_rng();
    summon_boss(&mut game, &mut rng, 20);
    game.take_events();

    let rect = game.boss.as_ref().unwrap().entity.rect;
    let s = shot(&game, ShotOwner::Player, 0, rect.x + 2 * CELL_W, rect.y + 3 * CELL_H + CELL_H / 2);
    game.player_shots.push(s);
    tick(&mut game, &mut rng);

    assert_eq!(game.score, 21);
    assert!(!game.boss_active);
    assert_eq!(game.count_boss_died, 1);
    assert!(game.player_shots.is_empty());
    let events = game.take_events();
    assert!(events.contains(&GameEvent::BossDefeated { count: 1 }));
    assert!(events.contains(&GameEvent::ScoreChanged(21)));

    // Explosion plays out, then the boss is gone and rocks return.
    for _ in 0..25 {
        tick(&mut game, &mut rng);
    }
    assert!(game.boss.is_none());
    assert!(!game.obstacles.is_empty());
    assert_eq!(game.phase(), Phase::Playing);
}

#[test]
fn boss_contact_hurts_without_removing_it() {
    let mut game = make_game(GameConfig::default());
    let mut rng = seeded_rng();
    summon_boss(&mut game, &mut rng, 20);
    let boss = game.boss.as_ref().unwrap().entity.rect;
    game.player.entity.rect.x = boss.x - 2 * CELL_W;
    game.player.entity.rect.y = boss.y + 2 * CELL_H;

    tick(&mut game, &mut rng);
    assert_eq!(game.player.lifes(), 2);
    assert!(game.boss.is_some());
    assert!(!game.boss.as_ref().unwrap().entity.is_exploded());
}

// ── Game over ─────────────────────────────────────────────────────────────────

#[test]
fn last_life_lost_ends_the_game_once() {
    let mut game = make_game(GameConfig::default());
    let mut rng = seeded_rng();
    game.player.take_hit();
    game.player.take_hit();
    game.score = 7;
    let o = obstacle_on_player(&game);
    game.obstacles.push(o);
    game.take_events();

    tick(&mut game, &mut rng);
    assert!(game.is_over());
    let events = game.take_events();
    let tail = &events[events.len() - 4..];
    assert_eq!(
        tail,
        &[
            GameEvent::MusicStopped,
            GameEvent::Sound(SoundId::Exterminate),
            GameEvent::Sound(SoundId::GameOver),
            GameEvent::GameOver { score: 7 },
        ]
    );

    let obstacles = game.obstacles.len();
    for _ in 0..10 {
        tick(&mut game, &mut rng);
        assert!(game.take_events().is_empty());
    }
    assert_eq!(game.obstacles.len(), obstacles);
    assert_eq!(game.phase(), Phase::GameOver);
}

#[test]
fn headless_sessions_are_reproducible() {
    let run = |seed: u64| {
        let mut game = make_game(GameConfig::default());
        let mut rng = StdRng::seed_from_u64(seed);
        let fire = InputState {
            fire: true,
            up: true,
            ..Default::default()
        };
        for _ in 0..300 {
            game.tick(&fire, &mut rng).unwrap();
        }
        (game.score, game.player.lifes(), game.obstacles.len(), game.frame)
    };
    assert_eq!(run(9), run(9));
}

// ── Properties ────────────────────────────────────────────────────────────────

fn input_from_bits(bits: u8) -> InputState {
    InputState {
        up: bits & 1 != 0,
        down: bits & 2 != 0,
        left: bits & 4 != 0,
        right: bits & 8 != 0,
        fire: bits & 16 != 0,
        ..Default::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn lifes_only_rise_by_one_on_a_heart(
        seed in any::<u64>(),
        inputs in prop::collection::vec(any::<u8>(), 1..600),
    ) {
        let config = GameConfig {
            item_threshold: 2,
            ..GameConfig::default()
        };
        let mut game = make_game(config);
        let mut rng = StdRng::seed_from_u64(seed);

        for bits in inputs {
            let before = game.player.lifes();
            game.tick(&input_from_bits(bits), &mut rng).unwrap();
            let after = game.player.lifes();
            let hearts = game
                .take_events()
                .iter()
                .filter(|e| **e == GameEvent::ItemCollected(ItemKind::Hearth))
                .count() as u32;

            prop_assert!(hearts <= 1);
            prop_assert!(after <= before + hearts, "lifes {before} -> {after}");
            if game.is_over() {
                break;
            }
        }
    }
}
