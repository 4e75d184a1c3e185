//! Fixed timestep simulation tick
//!
//! One call advances the world by one frame: input → players → boss →
//! combat → text decay → round-end check.

use super::boss::update_boss;
use super::combat::{check_round_end, resolve_contact, sweep_projectiles};
use super::input::InputState;
use super::player::update_players;
use super::state::{GamePhase, World};

/// Advance the world by one tick
///
/// Skipped entirely outside `Playing` or before a boss has been installed.
pub fn tick(world: &mut World, input: &InputState) {
    if world.phase != GamePhase::Playing || world.boss.is_none() {
        return;
    }

    world.time_ticks += 1;

    update_players(world, input);
    update_boss(world);

    resolve_contact(world);
    sweep_projectiles(world);
    decay_texts(world);

    check_round_end(world);
}

/// Drift floating texts and drop expired ones
fn decay_texts(world: &mut World) {
    for text in world.texts.iter_mut() {
        text.pos += text.velocity;
        text.lifetime = text.lifetime.saturating_sub(1);
    }
    world.texts.retain(|t| t.lifetime > 0);
}
