//! Run progression: levels, rewards and the merchant
//!
//! The session owns the `World`, feeds it fresh players and a boss at each
//! level start, and reacts to the round-end event once per level.

use thiserror::Error;

use crate::consts::*;
use crate::sim::{GameEvent, GamePhase, InputState, Player, PlayerId, Snapshot, World, tick};
use crate::tuning::{ShopItem, Tuning};

/// Flat gold for clearing a level
pub const MISSION_REWARD: u32 = 200;
/// Gold per point of boss damage dealt
pub const DAMAGE_REWARD_RATE: f32 = 0.5;
/// Extra gold for finishing the fight alive
pub const SURVIVAL_REWARD: u32 = 150;

/// Why the merchant refused a sale
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PurchaseError {
    #[error("the shop is closed")]
    ShopClosed,
    #[error("{0:?} is not in stock")]
    NotStocked(ShopItem),
    #[error("not enough gold: costs {cost}, have {gold}")]
    InsufficientGold { cost: u32, gold: u32 },
    #[error("the revive can only be bought once per run")]
    ReviveUnavailable,
    #[error("no such player")]
    UnknownPlayer,
}

/// Gold earned by one player for a won level
pub fn level_reward(player: &Player) -> u32 {
    let damage_bonus = (player.damage_dealt_this_round * DAMAGE_REWARD_RATE).floor().max(0.0) as u32;
    let survival_bonus = if player.is_dead { 0 } else { SURVIVAL_REWARD };
    MISSION_REWARD + damage_bonus + survival_bonus
}

/// A full run from title screen to victory or defeat
#[derive(Debug, Clone)]
pub struct Session {
    pub tuning: Tuning,
    pub world: World,
    /// Current level (1-based)
    pub level: u32,
    /// Text for the end screens
    pub end_message: Option<String>,
}

impl Session {
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let mut world = World::new(seed);
        for player in &mut world.players {
            player.stats = tuning.initial_stats.clone();
        }
        Self {
            tuning,
            world,
            level: 1,
            end_message: None,
        }
    }

    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.world.phase
    }

    /// Fight clock for the current level
    pub fn fight_seconds(&self) -> f32 {
        self.world.time_ticks as f32 / TICKS_PER_SECOND as f32
    }

    /// Start a new run: full stat reset, then level 1
    pub fn start_game(&mut self) {
        log::info!("Starting new run");
        for player in &mut self.world.players {
            player.stats = self.tuning.initial_stats.clone();
            player.is_dead = false;
            player.damage_dealt_this_round = 0.0;
            player.dash_cooldown = 0;
        }
        self.level = 1;
        self.end_message = None;
        self.init_level(1);
    }

    /// Reset players and spawn the boss for `level`
    pub fn init_level(&mut self, level: u32) {
        let Some(config) = self.tuning.boss_for_level(level) else {
            log::warn!("No boss configured for level {}", level);
            return;
        };
        let boss = config.spawn();

        let players = self
            .world
            .players
            .iter()
            .map(|p| {
                let mut player = p.clone();
                player.pos = Player::spawn_point(player.id);
                player.is_dead = false;
                player.stats.hp = player.stats.max_hp;
                player.damage_dealt_this_round = 0.0;
                player.invincibility = SPAWN_INVINCIBILITY;
                player.dash_cooldown = 0;
                player.cooldown = 0;
                player
            })
            .collect();

        log::info!("Level {}: {}", level, boss.name);
        self.level = level;
        self.world.begin_level(players, boss);
    }

    /// Run one frame and react to its events
    pub fn frame(&mut self, input: &InputState) -> Snapshot {
        tick(&mut self.world, input);

        for event in self.world.drain_events() {
            match event {
                GameEvent::RoundOver { won, players } => self.finish_round(won, players),
                GameEvent::PlayerDowned(id) => log::info!("Player {} is down", id.number()),
                GameEvent::PlayerRevived(id) => log::info!("Player {} revived", id.number()),
                GameEvent::PlayerDashed(_) => {}
            }
        }

        self.world.snapshot()
    }

    fn finish_round(&mut self, won: bool, mut players: Vec<Player>) {
        if won {
            for player in &mut players {
                let earned = level_reward(player);
                player.stats.gold += earned;
                log::info!("Player {} earned {} gold", player.id.number(), earned);
            }
            self.world.players = players;
            log::info!("Level {} cleared in {:.1}s", self.level, self.fight_seconds());
            self.world.set_phase(GamePhase::Shop);
        } else {
            self.world.players = players;
            let message = format!("DEFEAT AT LEVEL {}", self.level);
            log::info!("{}", message);
            self.end_message = Some(message);
            self.world.set_phase(GamePhase::GameOver);
        }
    }

    /// Leave the shop: next boss, or victory after the last one
    pub fn next_level(&mut self) {
        if self.phase() != GamePhase::Shop {
            log::warn!("next_level called outside the shop");
            return;
        }
        if self.level >= LEVEL_COUNT {
            log::info!("All bosses defeated");
            self.end_message = Some("VICTORY! THE RIFT IS CLOSED.".to_string());
            self.world.set_phase(GamePhase::Victory);
        } else {
            self.init_level(self.level + 1);
        }
    }

    /// Whether `item` is currently purchasable for a player
    pub fn can_buy(&self, id: PlayerId, item: ShopItem) -> Result<(), PurchaseError> {
        if self.phase() != GamePhase::Shop {
            return Err(PurchaseError::ShopClosed);
        }
        let offer = self.tuning.offer(item).ok_or(PurchaseError::NotStocked(item))?;
        let player = self.world.player(id).ok_or(PurchaseError::UnknownPlayer)?;
        let stats = &player.stats;

        if item == ShopItem::PhoenixChip && (stats.has_revive_item || stats.used_revive) {
            return Err(PurchaseError::ReviveUnavailable);
        }
        if stats.gold < offer.cost {
            return Err(PurchaseError::InsufficientGold {
                cost: offer.cost,
                gold: stats.gold,
            });
        }
        Ok(())
    }

    /// Buy an item for a player
    pub fn buy(&mut self, id: PlayerId, item: ShopItem) -> Result<(), PurchaseError> {
        if let Err(err) = self.can_buy(id, item) {
            log::warn!("Player {} could not buy {}: {}", id.number(), item.name(), err);
            return Err(err);
        }
        let offer = *self.tuning.offer(item).ok_or(PurchaseError::NotStocked(item))?;
        let player = self.world.player_mut(id).ok_or(PurchaseError::UnknownPlayer)?;

        player.stats.gold -= offer.cost;
        offer.apply(&mut player.stats);
        log::info!("Player {} bought {}", id.number(), item.name());
        Ok(())
    }
}
