//! Rift Duo - A two-player co-operative boss-rush arcade game
//!
//! Core modules:
//! - `sim`: Fixed-timestep simulation (players, bosses, projectiles, combat)
//! - `session`: Level progression, rewards and the between-fight shop
//! - `tuning`: Data-driven game balance

pub mod session;
pub mod sim;
pub mod tuning;

pub use session::{PurchaseError, Session};
pub use tuning::{ShopItem, Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
///
/// Every duration is expressed in ticks at the assumed 60 Hz frame rate.
pub mod consts {
    /// Nominal simulation rate (one tick per rendered frame)
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Arena dimensions, shared with presentation
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Player hitbox
    pub const PLAYER_WIDTH: f32 = 55.0;
    pub const PLAYER_HEIGHT: f32 = 60.0;

    /// Player shot defaults
    pub const PLAYER_PROJECTILE_SPEED: f32 = 12.0;
    pub const PLAYER_PROJECTILE_RADIUS: f32 = 6.0;
    pub const PLAYER_PROJECTILE_LIFETIME: u32 = 120;

    /// Dash: a teleport along the last movement direction
    pub const DASH_DISTANCE: f32 = 120.0;
    pub const DASH_COOLDOWN_TICKS: u32 = 20 * TICKS_PER_SECOND;

    /// Invincibility grants (the only ways the window can grow)
    pub const DASH_INVINCIBILITY: u32 = 20;
    pub const HIT_INVINCIBILITY: u32 = 30;
    pub const REVIVE_INVINCIBILITY: u32 = 180;
    pub const SPAWN_INVINCIBILITY: u32 = 60;

    /// Boss body contact
    pub const CONTACT_DAMAGE: f32 = 10.0;
    pub const PLAYER_KNOCKBACK: f32 = 30.0;
    pub const BOSS_KNOCKBACK: f32 = 20.0;

    /// Fraction of max hp restored by the revive item
    pub const REVIVE_HP_FRACTION: f32 = 0.5;

    /// Attack cooldown can never be upgraded below this
    pub const MIN_ATTACK_SPEED: u32 = 5;

    /// Floating text defaults
    pub const FLOATING_TEXT_LIFETIME: u32 = 60;
    pub const FLOATING_TEXT_RISE: f32 = 2.0;

    /// Number of levels (one boss each)
    pub const LEVEL_COUNT: u32 = 5;
}

/// Angle from `from` to `to`, in radians
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Unit vector for an angle
#[inline]
pub fn direction_from_angle(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}
