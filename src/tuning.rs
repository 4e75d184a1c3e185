//! Data-driven game balance
//!
//! Starting stats, the boss roster and the merchant's stock. The built-in
//! defaults are the shipped balance; a JSON override can replace any part.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::{Boss, BossKind, PlayerStats};

/// Why a tuning override was rejected
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("no boss configured for level {0}")]
    MissingLevel(u32),
    #[error("attack speed {0} is below the minimum of {min}", min = MIN_ATTACK_SPEED)]
    InvalidAttackSpeed(u32),
}

/// Boss template for one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossConfig {
    pub kind: BossKind,
    pub name: String,
    pub max_hp: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub color: u32,
}

impl BossConfig {
    fn new(kind: BossKind, name: &str, max_hp: f32, size: (f32, f32), speed: f32, color: u32) -> Self {
        Self {
            kind,
            name: name.to_string(),
            max_hp,
            width: size.0,
            height: size.1,
            speed,
            color,
        }
    }

    /// Fresh boss at its entry point on the right side of the arena
    pub fn spawn(&self) -> Boss {
        Boss {
            kind: self.kind,
            name: self.name.clone(),
            pos: Vec2::new(ARENA_WIDTH - 150.0, ARENA_HEIGHT / 2.0 - self.height / 2.0),
            width: self.width,
            height: self.height,
            max_hp: self.max_hp,
            hp: self.max_hp,
            color: self.color,
            speed: self.speed,
            phase: 1,
            cooldown: 60,
            attack_pattern: 0,
        }
    }
}

/// Everything the merchant sells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShopItem {
    /// Heal (consumable)
    Potion,
    /// +damage
    PlasmaBlade,
    /// Shorter attack cooldown
    Accelerator,
    /// +move speed
    Thrusters,
    /// +armor
    EnergyShield,
    /// One-time revive
    PhoenixChip,
}

impl ShopItem {
    pub const ALL: [ShopItem; 6] = [
        ShopItem::Potion,
        ShopItem::PlasmaBlade,
        ShopItem::Accelerator,
        ShopItem::Thrusters,
        ShopItem::EnergyShield,
        ShopItem::PhoenixChip,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ShopItem::Potion => "Potion",
            ShopItem::PlasmaBlade => "Plasma Blade",
            ShopItem::Accelerator => "Accelerator",
            ShopItem::Thrusters => "Thrusters",
            ShopItem::EnergyShield => "Energy Shield",
            ShopItem::PhoenixChip => "Phoenix Chip",
        }
    }

    /// Shipped price and effect size
    fn default_offer(self) -> ShopOffer {
        let (cost, value) = match self {
            ShopItem::Potion => (50, 50.0),
            ShopItem::PlasmaBlade => (100, 5.0),
            ShopItem::Accelerator => (120, -3.0),
            ShopItem::Thrusters => (80, 1.0),
            ShopItem::EnergyShield => (150, 2.0),
            ShopItem::PhoenixChip => (500, 1.0),
        };
        ShopOffer { item: self, cost, value }
    }
}

/// A priced item on the merchant's shelf
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShopOffer {
    pub item: ShopItem,
    pub cost: u32,
    /// Effect size; meaning depends on the item
    pub value: f32,
}

impl ShopOffer {
    /// Apply the item's effect to a player's stats (gold is not touched)
    pub fn apply(&self, stats: &mut PlayerStats) {
        match self.item {
            ShopItem::Potion => stats.hp = (stats.hp + self.value).min(stats.max_hp),
            ShopItem::PlasmaBlade => stats.damage += self.value,
            ShopItem::Accelerator => {
                let ticks = stats.attack_speed as f32 + self.value;
                stats.attack_speed = (ticks.round().max(0.0) as u32).max(MIN_ATTACK_SPEED);
            }
            ShopItem::Thrusters => stats.speed += self.value,
            ShopItem::EnergyShield => stats.armor += self.value,
            ShopItem::PhoenixChip => stats.has_revive_item = true,
        }
    }

    pub fn description(&self) -> String {
        match self.item {
            ShopItem::Potion => format!("Heal {} HP", self.value),
            ShopItem::PlasmaBlade => format!("+{} Damage", self.value),
            ShopItem::Accelerator => format!("{} attack cooldown", self.value),
            ShopItem::Thrusters => format!("+{} Move Spd", self.value),
            ShopItem::EnergyShield => format!("+{} Armor", self.value),
            ShopItem::PhoenixChip => "Revive once on death".to_string(),
        }
    }
}

/// Game balance data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Stats both players start a run with
    pub initial_stats: PlayerStats,
    /// One boss per level, in level order
    pub bosses: Vec<BossConfig>,
    pub shop: Vec<ShopOffer>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            initial_stats: PlayerStats::default(),
            bosses: vec![
                BossConfig::new(BossKind::Slime, "Giant Slime", 300.0, (80.0, 80.0), 1.0, 0xa3e635),
                BossConfig::new(BossKind::Golem, "Iron Golem", 800.0, (90.0, 100.0), 1.8, 0x94a3b8),
                BossConfig::new(BossKind::Wizard, "Void Wizard", 600.0, (60.0, 90.0), 3.0, 0x8b5cf6),
                BossConfig::new(BossKind::Rogue, "Shadow Assassin", 700.0, (50.0, 50.0), 6.0, 0xf43f5e),
                BossConfig::new(BossKind::DemonKing, "Demon Overlord", 2000.0, (120.0, 140.0), 2.5, 0xdc2626),
            ],
            shop: ShopItem::ALL.into_iter().map(ShopItem::default_offer).collect(),
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON override (missing fields keep defaults)
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every level has a boss and stats are in range
    pub fn validate(&self) -> Result<(), TuningError> {
        for level in 1..=LEVEL_COUNT {
            if self.boss_for_level(level).is_none() {
                return Err(TuningError::MissingLevel(level));
            }
        }
        if self.initial_stats.attack_speed < MIN_ATTACK_SPEED {
            return Err(TuningError::InvalidAttackSpeed(self.initial_stats.attack_speed));
        }
        Ok(())
    }

    /// Boss template for a 1-based level
    pub fn boss_for_level(&self, level: u32) -> Option<&BossConfig> {
        let index = usize::try_from(level.checked_sub(1)?).ok()?;
        self.bosses.get(index)
    }

    /// Current price list entry for an item
    pub fn offer(&self, item: ShopItem) -> Option<&ShopOffer> {
        self.shop.iter().find(|o| o.item == item)
    }
}
