//! Boss controller
//!
//! One behavior routine per `BossKind`, selected at a single dispatch point.
//! Every routine is clocked by the boss's `attack_pattern` tick counter;
//! `cooldown` is a free-running gate that only the slime reads.
//!
//! Target distance is measured between top-left corners (the golem's hold
//! range depends on it), while aim angles run centre to centre. Keep the two
//! measures as they are; changing distance to centres shifts golem spacing.

use std::f32::consts::TAU;

use glam::Vec2;

use super::geometry::clamp_to_arena;
use super::state::{Boss, BossKind, Player, Projectile, World};
use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};
use crate::{angle_between, direction_from_angle};

/// Slime: bursts of charging toward the target
const SLIME_CHARGE_MULTIPLIER: f32 = 5.0;
/// Per-tick chance (as a threshold on a unit roll) of pausing the charge
const SLIME_REST_ROLL: f32 = 0.97;
const SLIME_REST_TICKS: i32 = 35;

/// Golem: slow heavy boulder, keeps mid-range pressure
const GOLEM_FIRE_PERIOD: u64 = 120;
const GOLEM_HOLD_DISTANCE: f32 = 120.0;
const GOLEM_SHOT_SPEED: f32 = 6.0;
const GOLEM_SHOT_DAMAGE: f32 = 15.0;
const GOLEM_SHOT_RADIUS: f32 = 15.0;
const GOLEM_SHOT_LIFETIME: u32 = 200;
const GOLEM_SHOT_COLOR: u32 = 0x475569;

/// Wizard: blink to a random spot and release a radial ring
const WIZARD_BLINK_PERIOD: u64 = 180;
const WIZARD_RING_COUNT: usize = 8;
const WIZARD_SHOT_SPEED: f32 = 5.0;
const WIZARD_SHOT_DAMAGE: f32 = 12.0;
const WIZARD_SHOT_RADIUS: f32 = 10.0;
const WIZARD_SHOT_LIFETIME: u32 = 120;
const WIZARD_SHOT_COLOR: u32 = 0xd946ef;

/// Rogue: lunge and knife throw on the same beat
const ROGUE_LUNGE_PERIOD: u64 = 60;
const ROGUE_LUNGE_DISTANCE: f32 = 150.0;
const ROGUE_SHOT_SPEED: f32 = 2.0;
const ROGUE_SHOT_DAMAGE: f32 = 8.0;
const ROGUE_SHOT_RADIUS: f32 = 5.0;
const ROGUE_SHOT_LIFETIME: u32 = 120;
const ROGUE_SHOT_COLOR: u32 = 0xe11d48;

/// Demon King: rotating twin beam while easing toward the arena center
const DEMON_FIRE_PERIOD: u64 = 10;
/// Beam angle advance per volley, in radians
const DEMON_SWEEP_STEP: f32 = 0.5;
const DEMON_DRIFT_RATE: f32 = 0.1;
const DEMON_SHOT_SPEED: f32 = 4.0;
const DEMON_SHOT_DAMAGE: f32 = 8.0;
const DEMON_SHOT_RADIUS: f32 = 8.0;
const DEMON_SHOT_LIFETIME: u32 = 300;
const DEMON_SHOT_COLOR: u32 = 0xef4444;

/// The player a boss is currently focused on
#[derive(Debug, Clone, Copy)]
struct Target {
    /// Distance between top-left corners
    distance: f32,
    /// Angle from boss center to target center
    angle: f32,
}

/// Nearest living player (first in player order on ties)
fn nearest_target(boss: &Boss, players: &[Player]) -> Option<Target> {
    let mut best: Option<(&Player, f32)> = None;
    for player in players.iter().filter(|p| p.is_alive()) {
        let distance = player.pos.distance(boss.pos);
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((player, distance));
        }
    }

    best.map(|(player, distance)| Target {
        distance,
        angle: angle_between(boss.center(), player.center()),
    })
}

/// Advance the boss by one tick
///
/// No-op without a boss, once it is defeated, or when nobody is alive.
pub fn update_boss(world: &mut World) {
    let Some(mut boss) = world.boss.take() else {
        return;
    };

    let target = if boss.is_defeated() {
        None
    } else {
        nearest_target(&boss, &world.players)
    };

    if let Some(target) = target {
        boss.attack_pattern += 1;
        boss.cooldown -= 1;

        match boss.kind {
            BossKind::Slime => slime(&mut boss, target, world),
            BossKind::Golem => golem(&mut boss, target, world),
            BossKind::Wizard => wizard(&mut boss, world),
            BossKind::Rogue => rogue(&mut boss, target, world),
            BossKind::DemonKing => demon_king(&mut boss, world),
        }

        boss.pos = clamp_to_arena(boss.pos, boss.width, boss.height);
    }

    world.boss = Some(boss);
}

fn slime(boss: &mut Boss, target: Target, world: &mut World) {
    if boss.cooldown <= 0 {
        boss.pos += direction_from_angle(target.angle) * boss.speed * SLIME_CHARGE_MULTIPLIER;
        if world.random_unit() > SLIME_REST_ROLL {
            boss.cooldown = SLIME_REST_TICKS;
        }
    }
}

fn golem(boss: &mut Boss, target: Target, world: &mut World) {
    let dir = direction_from_angle(target.angle);

    if boss.attack_pattern.is_multiple_of(GOLEM_FIRE_PERIOD) {
        world.spawn_projectile(Projectile::hostile(
            boss.center(),
            dir * GOLEM_SHOT_SPEED,
            GOLEM_SHOT_DAMAGE,
            GOLEM_SHOT_RADIUS,
            GOLEM_SHOT_LIFETIME,
            GOLEM_SHOT_COLOR,
        ));
    }

    if target.distance > GOLEM_HOLD_DISTANCE {
        boss.pos += dir * boss.speed;
    }
}

fn wizard(boss: &mut Boss, world: &mut World) {
    if !boss.attack_pattern.is_multiple_of(WIZARD_BLINK_PERIOD) {
        return;
    }

    boss.pos = Vec2::new(
        world.random_unit() * (ARENA_WIDTH - boss.width),
        world.random_unit() * (ARENA_HEIGHT - boss.height),
    );

    let origin = boss.center();
    for i in 0..WIZARD_RING_COUNT {
        let theta = TAU / WIZARD_RING_COUNT as f32 * i as f32;
        world.spawn_projectile(Projectile::hostile(
            origin,
            direction_from_angle(theta) * WIZARD_SHOT_SPEED,
            WIZARD_SHOT_DAMAGE,
            WIZARD_SHOT_RADIUS,
            WIZARD_SHOT_LIFETIME,
            WIZARD_SHOT_COLOR,
        ));
    }
}

fn rogue(boss: &mut Boss, target: Target, world: &mut World) {
    if !boss.attack_pattern.is_multiple_of(ROGUE_LUNGE_PERIOD) {
        return;
    }

    // The knife leaves from where the lunge started
    let origin = boss.center();
    let dir = direction_from_angle(target.angle);
    boss.pos += dir * ROGUE_LUNGE_DISTANCE;

    world.spawn_projectile(Projectile::hostile(
        origin,
        dir * ROGUE_SHOT_SPEED,
        ROGUE_SHOT_DAMAGE,
        ROGUE_SHOT_RADIUS,
        ROGUE_SHOT_LIFETIME,
        ROGUE_SHOT_COLOR,
    ));
}

fn demon_king(boss: &mut Boss, world: &mut World) {
    if boss.attack_pattern.is_multiple_of(DEMON_FIRE_PERIOD) {
        let theta = (boss.attack_pattern / DEMON_FIRE_PERIOD) as f32 * DEMON_SWEEP_STEP;
        let origin = boss.center();
        for dir in [direction_from_angle(theta), -direction_from_angle(theta)] {
            world.spawn_projectile(Projectile::hostile(
                origin,
                dir * DEMON_SHOT_SPEED,
                DEMON_SHOT_DAMAGE,
                DEMON_SHOT_RADIUS,
                DEMON_SHOT_LIFETIME,
                DEMON_SHOT_COLOR,
            ));
        }
    }

    let anchor = Vec2::new(
        ARENA_WIDTH / 2.0 - boss.width / 2.0,
        ARENA_HEIGHT / 2.0 - boss.height / 2.0,
    );
    boss.pos += (anchor - boss.pos) * DEMON_DRIFT_RATE;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{PlayerId, PlayerStats};

    fn make_boss(kind: BossKind, pos: Vec2) -> Boss {
        Boss {
            kind,
            name: format!("{kind:?}"),
            pos,
            width: 80.0,
            height: 80.0,
            max_hp: 500.0,
            hp: 500.0,
            color: 0xffffff,
            speed: 2.0,
            phase: 1,
            cooldown: 60,
            attack_pattern: 0,
        }
    }

    /// World with player 1 at `p1`, player 2 dead in a corner
    fn setup(kind: BossKind, boss_pos: Vec2, p1: Vec2) -> World {
        let mut world = World::new(5);
        let mut players: Vec<Player> = PlayerId::ALL
            .into_iter()
            .map(|id| Player::new(id, PlayerStats::default()))
            .collect();
        players[0].pos = p1;
        players[1].pos = Vec2::ZERO;
        players[1].is_dead = true;
        world.begin_level(players, make_boss(kind, boss_pos));
        world
    }

    fn boss(world: &World) -> &Boss {
        world.boss.as_ref().expect("boss present")
    }

    #[test]
    fn test_nearest_target_prefers_first_on_tie() {
        let boss = make_boss(BossKind::Golem, Vec2::new(400.0, 300.0));
        let mut players: Vec<Player> = PlayerId::ALL
            .into_iter()
            .map(|id| Player::new(id, PlayerStats::default()))
            .collect();
        players[0].pos = Vec2::new(300.0, 300.0);
        players[1].pos = Vec2::new(500.0, 300.0);
        let target = nearest_target(&boss, &players).expect("target");
        // Player 1 is to the left of the boss
        assert!(target.angle.abs() > 3.0);
        assert_eq!(target.distance, 100.0);
    }

    #[test]
    fn test_nearest_target_skips_dead() {
        let boss = make_boss(BossKind::Golem, Vec2::new(400.0, 300.0));
        let mut players: Vec<Player> = PlayerId::ALL
            .into_iter()
            .map(|id| Player::new(id, PlayerStats::default()))
            .collect();
        players[0].pos = Vec2::new(390.0, 300.0);
        players[0].is_dead = true;
        players[1].pos = Vec2::new(700.0, 300.0);
        let target = nearest_target(&boss, &players).expect("target");
        assert_eq!(target.distance, 300.0);

        players[1].is_dead = true;
        assert!(nearest_target(&boss, &players).is_none());
    }

    #[test]
    fn test_defeated_boss_is_frozen() {
        let mut world = setup(BossKind::Slime, Vec2::new(400.0, 260.0), Vec2::new(100.0, 270.0));
        world.boss.as_mut().unwrap().hp = 0.0;
        update_boss(&mut world);
        assert_eq!(boss(&world).pos, Vec2::new(400.0, 260.0));
        assert_eq!(boss(&world).attack_pattern, 0);
    }

    #[test]
    fn test_no_living_players_is_noop() {
        let mut world = setup(BossKind::DemonKing, Vec2::new(0.0, 0.0), Vec2::new(100.0, 270.0));
        world.players[0].is_dead = true;
        update_boss(&mut world);
        assert_eq!(boss(&world).pos, Vec2::ZERO);
        assert!(world.projectiles.is_empty());
    }

    #[test]
    fn test_slime_charges_straight_right() {
        // Target center level with the boss center, directly to the right
        let mut world = setup(BossKind::Slime, Vec2::new(200.0, 260.0), Vec2::new(600.0, 270.0));
        world.boss.as_mut().unwrap().cooldown = 0;
        update_boss(&mut world);
        let b = boss(&world);
        assert!((b.pos.x - (200.0 + 2.0 * SLIME_CHARGE_MULTIPLIER)).abs() < 1e-4);
        assert!((b.pos.y - 260.0).abs() < 1e-4);
    }

    #[test]
    fn test_slime_waits_while_cooling_down() {
        let mut world = setup(BossKind::Slime, Vec2::new(200.0, 260.0), Vec2::new(600.0, 270.0));
        update_boss(&mut world);
        assert_eq!(boss(&world).pos, Vec2::new(200.0, 260.0));
        assert_eq!(boss(&world).cooldown, 59);
    }

    #[test]
    fn test_slime_eventually_rests() {
        let mut world = setup(BossKind::Slime, Vec2::new(200.0, 260.0), Vec2::new(700.0, 270.0));
        world.boss.as_mut().unwrap().cooldown = 0;
        let mut rested = false;
        for _ in 0..2000 {
            update_boss(&mut world);
            if boss(&world).cooldown > 0 {
                rested = true;
                break;
            }
        }
        assert!(rested, "slime never paused its charge");
    }

    #[test]
    fn test_golem_fires_on_period_and_holds_range() {
        // Far target: golem advances every tick
        let mut world = setup(BossKind::Golem, Vec2::new(600.0, 260.0), Vec2::new(50.0, 270.0));
        for _ in 0..GOLEM_FIRE_PERIOD - 1 {
            update_boss(&mut world);
        }
        assert!(world.projectiles.is_empty());
        assert!(boss(&world).pos.x < 600.0);
        update_boss(&mut world);
        assert_eq!(world.projectiles.len(), 1);
        let shot = &world.projectiles[0];
        assert!(shot.is_hostile);
        assert_eq!(shot.damage, GOLEM_SHOT_DAMAGE);
        assert_eq!(shot.radius, GOLEM_SHOT_RADIUS);
        assert!(shot.velocity.x < 0.0);

        // Close target: golem stands its ground
        let mut world = setup(BossKind::Golem, Vec2::new(300.0, 260.0), Vec2::new(250.0, 260.0));
        update_boss(&mut world);
        assert_eq!(boss(&world).pos, Vec2::new(300.0, 260.0));
    }

    #[test]
    fn test_golem_hold_range_uses_top_left_corners() {
        // Corners 110 apart (inside hold range); centres about 123 apart
        let mut world = setup(BossKind::Golem, Vec2::new(300.0, 260.0), Vec2::new(190.0, 260.0));
        let target = nearest_target(boss(&world), &world.players).expect("target");
        assert_eq!(target.distance, 110.0);
        assert!(boss(&world).center().distance(world.players[0].center()) > GOLEM_HOLD_DISTANCE);

        update_boss(&mut world);
        assert_eq!(boss(&world).pos, Vec2::new(300.0, 260.0));
    }

    #[test]
    fn test_wizard_ring_is_radial() {
        let mut world = setup(BossKind::Wizard, Vec2::new(300.0, 260.0), Vec2::new(50.0, 270.0));
        world.boss.as_mut().unwrap().attack_pattern = WIZARD_BLINK_PERIOD - 1;
        update_boss(&mut world);

        assert_eq!(world.projectiles.len(), WIZARD_RING_COUNT);
        let b = boss(&world);
        assert!(b.pos.x >= 0.0 && b.pos.x <= ARENA_WIDTH - b.width);
        assert!(b.pos.y >= 0.0 && b.pos.y <= ARENA_HEIGHT - b.height);

        let sum: Vec2 = world.projectiles.iter().map(|p| p.velocity).sum();
        assert!(sum.length() < 1e-3, "ring should cancel out");
        for shot in &world.projectiles {
            assert_eq!(shot.pos, b.center());
            assert!((shot.velocity.length() - WIZARD_SHOT_SPEED).abs() < 1e-4);
        }
    }

    #[test]
    fn test_rogue_lunge_and_shot_share_heading() {
        let mut world = setup(BossKind::Rogue, Vec2::new(500.0, 260.0), Vec2::new(50.0, 270.0));
        let start_center = boss(&world).center();
        world.boss.as_mut().unwrap().attack_pattern = ROGUE_LUNGE_PERIOD - 1;
        update_boss(&mut world);

        assert!((boss(&world).pos.x - (500.0 - ROGUE_LUNGE_DISTANCE)).abs() < 1e-3);
        assert_eq!(world.projectiles.len(), 1);
        let shot = &world.projectiles[0];
        assert_eq!(shot.pos, start_center);
        assert!((shot.velocity - Vec2::new(-ROGUE_SHOT_SPEED, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_demon_king_twin_beam_and_drift() {
        let mut world = setup(BossKind::DemonKing, Vec2::new(0.0, 0.0), Vec2::new(700.0, 500.0));
        world.boss.as_mut().unwrap().attack_pattern = DEMON_FIRE_PERIOD - 1;
        update_boss(&mut world);

        assert_eq!(world.projectiles.len(), 2);
        let a = world.projectiles[0].velocity;
        let b = world.projectiles[1].velocity;
        assert!((a + b).length() < 1e-4, "beams must be opposite");
        assert!((a - Vec2::new(0.5_f32.cos(), 0.5_f32.sin()) * DEMON_SHOT_SPEED).length() < 1e-4);

        let anchor = Vec2::new(ARENA_WIDTH / 2.0 - 40.0, ARENA_HEIGHT / 2.0 - 40.0);
        let pos = boss(&world).pos;
        assert!((pos - anchor * DEMON_DRIFT_RATE).length() < 1e-3);

        // Easing never overshoots the anchor
        for _ in 0..200 {
            update_boss(&mut world);
        }
        let pos = boss(&world).pos;
        assert!(pos.x <= anchor.x && pos.y <= anchor.y);
        assert!((pos - anchor).length() < 1.0);
    }

    #[test]
    fn test_boss_stays_in_arena() {
        let mut world = setup(BossKind::Rogue, Vec2::new(10.0, 10.0), Vec2::new(0.0, 0.0));
        world.players[0].pos = Vec2::new(0.0, 0.0);
        for _ in 0..600 {
            update_boss(&mut world);
            let b = boss(&world);
            assert!(b.pos.x >= 0.0 && b.pos.x <= ARENA_WIDTH - b.width);
            assert!(b.pos.y >= 0.0 && b.pos.y <= ARENA_HEIGHT - b.height);
        }
    }
}
