//! Player controller
//!
//! Turns the held-key snapshot into movement, facing, dash and shots for
//! each living player.

use glam::Vec2;

use super::geometry::clamp_to_arena;
use super::input::{InputState, KeyBindings};
use super::state::{Facing, GameEvent, Player, Projectile, World};
use crate::consts::*;

/// Update every living player for one tick
pub fn update_players(world: &mut World, input: &InputState) {
    for index in 0..world.players.len() {
        update_player(world, index, input);
    }
}

/// Raw movement delta for this tick
///
/// Axis contributions are summed without normalizing, so diagonal movement
/// is faster than moving along one axis. Also updates horizontal facing.
fn movement_delta(player: &mut Player, bindings: &KeyBindings, input: &InputState) -> Vec2 {
    let speed = player.stats.speed;
    let mut delta = Vec2::ZERO;

    if input.is_held(bindings.up) {
        delta.y -= speed;
    }
    if input.is_held(bindings.down) {
        delta.y += speed;
    }
    if input.is_held(bindings.left) {
        delta.x -= speed;
        player.direction = Facing::Left;
    }
    if input.is_held(bindings.right) {
        delta.x += speed;
        player.direction = Facing::Right;
    }

    delta
}

fn update_player(world: &mut World, index: usize, input: &InputState) {
    let player = &mut world.players[index];
    if player.is_dead {
        return;
    }

    player.invincibility = player.invincibility.saturating_sub(1);
    player.dash_cooldown = player.dash_cooldown.saturating_sub(1);

    let bindings = KeyBindings::for_player(player.id);
    let delta = movement_delta(player, &bindings, input);
    if delta != Vec2::ZERO {
        player.last_move_dir = delta.normalize();
    }

    // Dash is an instant teleport; landing inside the boss is resolved by
    // the contact check later this tick.
    let mut dash_landing = None;
    if input.is_held(bindings.dash) && player.dash_cooldown == 0 {
        player.dash_cooldown = DASH_COOLDOWN_TICKS;
        player.pos += player.last_move_dir * DASH_DISTANCE;
        player.invincibility = DASH_INVINCIBILITY;
        dash_landing = Some(player.pos);
    }

    player.pos = clamp_to_arena(player.pos + delta, player.width, player.height);

    player.cooldown = player.cooldown.saturating_sub(1);
    let mut shot = None;
    if input.is_held(bindings.attack) && player.cooldown == 0 {
        player.cooldown = player.stats.attack_speed;
        shot = Some(Projectile::friendly(
            player.id,
            player.center(),
            player.last_move_dir * PLAYER_PROJECTILE_SPEED,
            player.stats.damage,
        ));
    }

    let id = player.id;
    if let Some(landing) = dash_landing {
        log::debug!("Player {} dashed", id.number());
        world.spawn_text("BOOST!", landing, 0xffffff);
        world.push_event(GameEvent::PlayerDashed(id));
    }
    if let Some(shot) = shot {
        world.spawn_projectile(shot);
    }
}
