//! Combat resolution
//!
//! Runs after movement each tick: body contact first, then the projectile
//! sweep. Damage to players always goes through `apply_damage`, so the
//! invincibility gate, armor floor and revive rule apply to every source.

use glam::Vec2;

use super::geometry::{circle_rect_intersect, clamp_to_arena, outside_arena, rect_intersect};
use super::state::{GameEvent, Player, Projectile, World};
use crate::consts::*;
use crate::{angle_between, direction_from_angle};

const DAMAGE_TEXT_COLOR: u32 = 0xef4444;
const BOSS_DAMAGE_TEXT_COLOR: u32 = 0xffffff;
const REVIVE_TEXT_COLOR: u32 = 0xa855f7;
const DEATH_TEXT_COLOR: u32 = 0x64748b;

/// What a single hit did to a player
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageOutcome {
    /// Player was invincible; nothing changed
    Ignored,
    Hurt { dealt: f32 },
    /// Lethal hit absorbed by the revive item
    Revived { dealt: f32 },
    Killed { dealt: f32 },
}

impl DamageOutcome {
    /// Hp removed by the hit, if it landed
    pub fn dealt(&self) -> Option<f32> {
        match *self {
            DamageOutcome::Ignored => None,
            DamageOutcome::Hurt { dealt }
            | DamageOutcome::Revived { dealt }
            | DamageOutcome::Killed { dealt } => Some(dealt),
        }
    }
}

/// Damage after armor; never below 1
#[inline]
pub fn effective_damage(incoming: f32, armor: f32) -> f32 {
    (incoming - armor).max(1.0)
}

/// Apply one hit to a player's stats and timers
pub fn apply_damage(player: &mut Player, amount: f32) -> DamageOutcome {
    if player.invincibility > 0 {
        return DamageOutcome::Ignored;
    }

    let dealt = effective_damage(amount, player.stats.armor);
    player.stats.hp -= dealt;
    player.invincibility = HIT_INVINCIBILITY;

    if player.stats.hp > 0.0 {
        return DamageOutcome::Hurt { dealt };
    }

    let stats = &mut player.stats;
    if stats.has_revive_item && !stats.used_revive {
        stats.hp = stats.max_hp * REVIVE_HP_FRACTION;
        stats.has_revive_item = false;
        stats.used_revive = true;
        player.invincibility = REVIVE_INVINCIBILITY;
        DamageOutcome::Revived { dealt }
    } else {
        player.is_dead = true;
        DamageOutcome::Killed { dealt }
    }
}

/// Hit the player at `index`, emitting feedback text and events
pub fn damage_player(world: &mut World, index: usize, amount: f32) -> DamageOutcome {
    let player = &mut world.players[index];
    let outcome = apply_damage(player, amount);
    let (id, pos) = (player.id, player.pos);

    if let Some(dealt) = outcome.dealt() {
        world.spawn_text(format!("-{dealt}"), pos, DAMAGE_TEXT_COLOR);
    }
    match outcome {
        DamageOutcome::Revived { .. } => {
            world.spawn_text("PHOENIX PROTOCOL!", pos - Vec2::new(0.0, 30.0), REVIVE_TEXT_COLOR);
            world.push_event(GameEvent::PlayerRevived(id));
            log::debug!("Player {} revived", id.number());
        }
        DamageOutcome::Killed { .. } => {
            world.spawn_text("KIA", pos, DEATH_TEXT_COLOR);
            world.push_event(GameEvent::PlayerDowned(id));
            log::debug!("Player {} down", id.number());
        }
        DamageOutcome::Ignored | DamageOutcome::Hurt { .. } => {}
    }

    outcome
}

/// Body contact between living players and the boss
///
/// Applies every tick the hitboxes overlap; invincibility is the only
/// throttle on damage, knockback always applies.
pub fn resolve_contact(world: &mut World) {
    for index in 0..world.players.len() {
        let Some(boss) = world.boss.as_ref() else {
            return;
        };
        let player = &world.players[index];
        if player.is_dead || !rect_intersect(&player.rect(), &boss.rect()) {
            continue;
        }

        let push = direction_from_angle(angle_between(boss.center(), player.center()));
        damage_player(world, index, CONTACT_DAMAGE);

        let player = &mut world.players[index];
        player.pos = clamp_to_arena(player.pos + push * PLAYER_KNOCKBACK, player.width, player.height);
        if let Some(boss) = world.boss.as_mut() {
            boss.pos = clamp_to_arena(boss.pos - push * BOSS_KNOCKBACK, boss.width, boss.height);
        }
    }
}

/// First living player hit by a hostile shot
fn hit_players(world: &mut World, shot: &Projectile) -> bool {
    let victim = world
        .players
        .iter()
        .position(|p| p.is_alive() && circle_rect_intersect(shot.pos, shot.radius, &p.rect()));

    match victim {
        Some(index) => {
            damage_player(world, index, shot.damage);
            true
        }
        None => false,
    }
}

/// Friendly shot against the boss, crediting the owner
fn hit_boss(world: &mut World, shot: &Projectile) -> bool {
    let Some(rect) = world.boss.as_ref().map(|b| b.rect()) else {
        return false;
    };
    if !circle_rect_intersect(shot.pos, shot.radius, &rect) {
        return false;
    }

    if let Some(boss) = world.boss.as_mut() {
        boss.hp -= shot.damage;
    }
    let text_pos = Vec2::new(rect.pos.x + world.random_unit() * rect.width, rect.pos.y);
    world.spawn_text(format!("-{}", shot.damage), text_pos, BOSS_DAMAGE_TEXT_COLOR);

    if let Some(player) = shot.owner.and_then(|id| world.player_mut(id)) {
        player.damage_dealt_this_round += shot.damage;
    }
    true
}

/// Move, age and collide every projectile
///
/// A projectile is removed the tick it hits something, runs out of
/// lifetime, or leaves the arena.
pub fn sweep_projectiles(world: &mut World) {
    let mut projectiles = std::mem::take(&mut world.projectiles);

    projectiles.retain_mut(|shot| {
        shot.pos += shot.velocity;
        shot.lifetime = shot.lifetime.saturating_sub(1);

        let hit = if shot.is_hostile {
            hit_players(world, shot)
        } else {
            hit_boss(world, shot)
        };

        !(hit || shot.lifetime == 0 || outside_arena(shot.pos))
    });

    projectiles.append(&mut world.projectiles);
    world.projectiles = projectiles;
}

/// Latch the round-end event
///
/// Defeat is checked before victory, and the event fires at most once
/// until the latch is reset for the next level.
pub fn check_round_end(world: &mut World) {
    if world.round_over {
        return;
    }
    let Some(boss) = world.boss.as_ref() else {
        return;
    };

    let won = if world.players.iter().all(|p| p.is_dead) {
        false
    } else if boss.is_defeated() {
        true
    } else {
        return;
    };

    world.round_over = true;
    world.push_event(GameEvent::RoundOver {
        won,
        players: world.players.clone(),
    });
}
