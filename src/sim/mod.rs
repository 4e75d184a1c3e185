//! Fixed-timestep simulation module
//!
//! All gameplay logic lives here:
//! - One tick per frame, constants tuned for 60 Hz
//! - Seeded RNG only
//! - Stable iteration order (players by id, entities by spawn order)
//! - No rendering or platform dependencies

pub mod boss;
pub mod combat;
pub mod geometry;
pub mod input;
pub mod player;
pub mod state;
pub mod tick;

pub use combat::{DamageOutcome, apply_damage, effective_damage};
pub use geometry::{Rect, circle_rect_intersect, clamp_to_arena, rect_intersect};
pub use input::{InputState, Key, KeyBindings};
pub use state::{
    Boss, BossKind, Facing, FloatingText, GameEvent, GamePhase, Player, PlayerId, PlayerStats,
    Projectile, Snapshot, World,
};
pub use tick::tick;
