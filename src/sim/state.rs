//! World state and core simulation types
//!
//! `World` is the single owner of all mutable entity state between ticks.
//! Everything outside the simulation sees it through `Snapshot`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::consts::*;

/// Current phase of the game; the simulation only advances while `Playing`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen
    Menu,
    /// A boss fight is running
    Playing,
    /// Between-fight merchant
    Shop,
    /// Both players fell
    GameOver,
    /// Final boss cleared
    Victory,
}

/// Which of the two players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    pub const ALL: [PlayerId; 2] = [PlayerId::One, PlayerId::Two];

    /// 1-based player number
    pub fn number(self) -> u8 {
        match self {
            PlayerId::One => 1,
            PlayerId::Two => 2,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(PlayerId::One),
            2 => Some(PlayerId::Two),
            _ => None,
        }
    }

    /// Body colour
    pub fn color(self) -> u32 {
        match self {
            PlayerId::One => 0x22d3ee,
            PlayerId::Two => 0xef4444,
        }
    }

    /// Plasma shot colour
    pub fn shot_color(self) -> u32 {
        match self {
            PlayerId::One => 0x22d3ee,
            PlayerId::Two => 0xf97316,
        }
    }
}

/// Horizontal facing, for sprite flipping and recoil
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// Per-player stats, carried across the whole run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub max_hp: f32,
    /// May dip below zero for the tick in which death is resolved
    pub hp: f32,
    pub damage: f32,
    /// Ticks between shots (lower is faster)
    pub attack_speed: u32,
    pub speed: f32,
    pub armor: f32,
    pub gold: u32,
    pub has_revive_item: bool,
    /// Once set, stays set for the rest of the run
    pub used_revive: bool,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            max_hp: 100.0,
            hp: 100.0,
            damage: 20.0,
            attack_speed: 30,
            speed: 5.0,
            armor: 0.0,
            gold: 0,
            has_revive_item: false,
            used_revive: false,
        }
    }
}

/// A player avatar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    /// Top-left corner of the hitbox
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub color: u32,
    pub stats: PlayerStats,
    /// Ticks until the next shot is allowed
    pub cooldown: u32,
    pub is_dead: bool,
    pub damage_dealt_this_round: f32,
    pub direction: Facing,
    /// Unit vector; persists when no movement key is held
    pub last_move_dir: Vec2,
    pub invincibility: u32,
    pub dash_cooldown: u32,
}

impl Player {
    pub fn new(id: PlayerId, stats: PlayerStats) -> Self {
        Self {
            id,
            pos: Self::spawn_point(id),
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            color: id.color(),
            stats,
            cooldown: 0,
            is_dead: false,
            damage_dealt_this_round: 0.0,
            direction: Facing::Right,
            last_move_dir: Vec2::X,
            invincibility: 0,
            dash_cooldown: 0,
        }
    }

    /// Level start position
    pub fn spawn_point(id: PlayerId) -> Vec2 {
        match id {
            PlayerId::One => Vec2::new(100.0, ARENA_HEIGHT / 2.0),
            PlayerId::Two => Vec2::new(150.0, ARENA_HEIGHT / 2.0),
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.width, self.height)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        !self.is_dead
    }
}

/// The five scripted bosses, one per level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossKind {
    Slime,
    Golem,
    Wizard,
    Rogue,
    DemonKing,
}

/// The boss for the current level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boss {
    pub kind: BossKind,
    pub name: String,
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub max_hp: f32,
    pub hp: f32,
    pub color: u32,
    pub speed: f32,
    /// Reserved; every behavior is driven by `attack_pattern`
    pub phase: u32,
    /// Generic attack gate, decremented every tick (may go negative)
    pub cooldown: i32,
    /// Tick counter used as the clock for periodic attacks
    pub attack_pattern: u64,
}

impl Boss {
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.width, self.height)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }

    #[inline]
    pub fn is_defeated(&self) -> bool {
        self.hp <= 0.0
    }
}

/// A shot in flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    /// Player credited with boss damage
    pub owner: Option<PlayerId>,
    pub pos: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    pub damage: f32,
    pub color: u32,
    /// true: hurts players only. false: hurts the boss only
    pub is_hostile: bool,
    pub lifetime: u32,
}

impl Projectile {
    /// A boss shot (id assigned on spawn)
    pub fn hostile(pos: Vec2, velocity: Vec2, damage: f32, radius: f32, lifetime: u32, color: u32) -> Self {
        Self {
            id: 0,
            owner: None,
            pos,
            velocity,
            radius,
            damage,
            color,
            is_hostile: true,
            lifetime,
        }
    }

    /// A player shot (id assigned on spawn)
    pub fn friendly(owner: PlayerId, pos: Vec2, velocity: Vec2, damage: f32) -> Self {
        Self {
            id: 0,
            owner: Some(owner),
            pos,
            velocity,
            radius: PLAYER_PROJECTILE_RADIUS,
            damage,
            color: owner.shot_color(),
            is_hostile: false,
            lifetime: PLAYER_PROJECTILE_LIFETIME,
        }
    }
}

/// Cosmetic combat feedback (damage numbers, callouts)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatingText {
    pub id: u32,
    pub text: String,
    pub pos: Vec2,
    pub color: u32,
    pub lifetime: u32,
    pub velocity: Vec2,
}

/// Things that happened during a tick
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    PlayerDashed(PlayerId),
    PlayerDowned(PlayerId),
    PlayerRevived(PlayerId),
    /// Fires once per level
    RoundOver { won: bool, players: Vec<Player> },
}

/// Immutable copy of the world for presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub players: Vec<Player>,
    pub boss: Option<Boss>,
    pub projectiles: Vec<Projectile>,
    pub texts: Vec<FloatingText>,
}

/// Complete simulation state, owned by the game loop
#[derive(Debug, Clone)]
pub struct World {
    pub phase: GamePhase,
    /// Both players, in id order
    pub players: Vec<Player>,
    pub boss: Option<Boss>,
    pub projectiles: Vec<Projectile>,
    pub texts: Vec<FloatingText>,
    /// Set once the round-end event has fired for this level
    pub round_over: bool,
    /// Ticks simulated since the current level began
    pub time_ticks: u64,
    events: Vec<GameEvent>,
    rng: Pcg32,
    next_id: u32,
}

impl World {
    /// Create an idle world (menu phase, no boss) with the given RNG seed
    pub fn new(seed: u64) -> Self {
        Self {
            phase: GamePhase::Menu,
            players: PlayerId::ALL
                .into_iter()
                .map(|id| Player::new(id, PlayerStats::default()))
                .collect(),
            boss: None,
            projectiles: Vec::new(),
            texts: Vec::new(),
            round_over: false,
            time_ticks: 0,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Uniform random value in `[0, 1)`
    pub fn random_unit(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    /// Install fresh players and boss for a level and start playing
    pub fn begin_level(&mut self, players: Vec<Player>, boss: Boss) {
        self.players = players;
        self.boss = Some(boss);
        self.projectiles.clear();
        self.texts.clear();
        self.events.clear();
        self.round_over = false;
        self.time_ticks = 0;
        self.phase = GamePhase::Playing;
    }

    /// Switch phase; leaving `Playing` drops per-level transient state
    pub fn set_phase(&mut self, phase: GamePhase) {
        if phase != GamePhase::Playing {
            self.projectiles.clear();
            self.round_over = false;
        }
        self.phase = phase;
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// Add a projectile, assigning its id
    pub fn spawn_projectile(&mut self, mut projectile: Projectile) {
        projectile.id = self.next_entity_id();
        self.projectiles.push(projectile);
    }

    /// Add a rising floating text at `pos`
    pub fn spawn_text(&mut self, text: impl Into<String>, pos: Vec2, color: u32) {
        let id = self.next_entity_id();
        let drift = (self.random_unit() - 0.5) * 2.0;
        self.texts.push(FloatingText {
            id,
            text: text.into(),
            pos,
            color,
            lifetime: FLOATING_TEXT_LIFETIME,
            velocity: Vec2::new(drift, -FLOATING_TEXT_RISE),
        });
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Copy of the current entity state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            players: self.players.clone(),
            boss: self.boss.clone(),
            projectiles: self.projectiles.clone(),
            texts: self.texts.clone(),
        }
    }
}
