//! Event cache: messages kept so that reconnecting players can be shown what
//! they missed.

use std::collections::VecDeque;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::MAX_PLAYER_SLOTS;

// =============================================================================
// Event types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    CityBuild,
    CityLost,
    CityGrowth,
    CityFamine,
    UnitBuilt,
    UnitWinDef,
    UnitWinAtt,
    UnitLoseDef,
    UnitLoseAtt,
    UnitOrders,
    UnitBecameVet,
    TechGain,
    HutGold,
    HutBarb,
    Diplomacy,
    MyDiplomatSabotage,
    EnemyDiplomatSabotage,
    Spaceship,
    GameStart,
    TurnBulletin,
    NewGovernment,
    Setting,
    ChatMsg,
    Report,
}

impl EventType {
    pub const ALL: [EventType; 24] = [
        EventType::CityBuild,
        EventType::CityLost,
        EventType::CityGrowth,
        EventType::CityFamine,
        EventType::UnitBuilt,
        EventType::UnitWinDef,
        EventType::UnitWinAtt,
        EventType::UnitLoseDef,
        EventType::UnitLoseAtt,
        EventType::UnitOrders,
        EventType::UnitBecameVet,
        EventType::TechGain,
        EventType::HutGold,
        EventType::HutBarb,
        EventType::Diplomacy,
        EventType::MyDiplomatSabotage,
        EventType::EnemyDiplomatSabotage,
        EventType::Spaceship,
        EventType::GameStart,
        EventType::TurnBulletin,
        EventType::NewGovernment,
        EventType::Setting,
        EventType::ChatMsg,
        EventType::Report,
    ];

    /// Name of the event as written into saves.
    pub fn name(self) -> &'static str {
        match self {
            EventType::CityBuild => "E_CITY_BUILD",
            EventType::CityLost => "E_CITY_LOST",
            EventType::CityGrowth => "E_CITY_GROWTH",
            EventType::CityFamine => "E_CITY_FAMINE",
            EventType::UnitBuilt => "E_UNIT_BUILT",
            EventType::UnitWinDef => "E_UNIT_WIN_DEF",
            EventType::UnitWinAtt => "E_UNIT_WIN_ATT",
            EventType::UnitLoseDef => "E_UNIT_LOSE_DEF",
            EventType::UnitLoseAtt => "E_UNIT_LOSE_ATT",
            EventType::UnitOrders => "E_UNIT_ORDERS",
            EventType::UnitBecameVet => "E_UNIT_BECAME_VET",
            EventType::TechGain => "E_TECH_GAIN",
            EventType::HutGold => "E_HUT_GOLD",
            EventType::HutBarb => "E_HUT_BARB",
            EventType::Diplomacy => "E_DIPLOMACY",
            EventType::MyDiplomatSabotage => "E_MY_DIPLOMAT_SABOTAGE",
            EventType::EnemyDiplomatSabotage => "E_ENEMY_DIPLOMAT_SABOTAGE",
            EventType::Spaceship => "E_SPACESHIP",
            EventType::GameStart => "E_GAME_START",
            EventType::TurnBulletin => "E_TURN_BULLETIN",
            EventType::NewGovernment => "E_NEW_GOVERNMENT",
            EventType::Setting => "E_SETTING",
            EventType::ChatMsg => "E_CHAT_MSG",
            EventType::Report => "E_REPORT",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|e| e.name().eq_ignore_ascii_case(name))
    }
}

// =============================================================================
// Player masks
// =============================================================================

const MASK_WORDS: usize = MAX_PLAYER_SLOTS.div_ceil(64);

/// Set of player slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PlayerMask([u64; MASK_WORDS]);

impl PlayerMask {
    pub fn set(&mut self, slot: usize) {
        if slot < MAX_PLAYER_SLOTS {
            self.0[slot / 64] |= 1u64 << (slot % 64);
        }
    }

    pub fn contains(&self, slot: usize) -> bool {
        slot < MAX_PLAYER_SLOTS && self.0[slot / 64] & (1u64 << (slot % 64)) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|w| *w == 0)
    }

    pub fn len(&self) -> usize {
        self.0.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Saved form: one `'0'`/`'1'` character per slot, slot 0 first.
    pub fn to_bit_string(&self) -> String {
        (0..MAX_PLAYER_SLOTS)
            .map(|slot| if self.contains(slot) { '1' } else { '0' })
            .collect()
    }

    /// Parse the saved form. Characters past the last slot are ignored and a
    /// short string leaves the remaining slots unset.
    pub fn from_bit_string(bits: &str) -> Self {
        let mut mask = PlayerMask::default();
        for (slot, c) in bits.chars().take(MAX_PLAYER_SLOTS).enumerate() {
            if c == '1' {
                mask.set(slot);
            }
        }
        mask
    }
}

impl FromIterator<usize> for PlayerMask {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut mask = PlayerMask::default();
        for slot in iter {
            mask.set(slot);
        }
        mask
    }
}

// =============================================================================
// Event cache
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventTarget {
    All,
    Players(PlayerMask),
    GlobalObservers,
}

impl EventTarget {
    /// Saved `target_type` name.
    pub fn type_name(&self) -> &'static str {
        match self {
            EventTarget::All => "All",
            EventTarget::Players(_) => "Player",
            EventTarget::GlobalObservers => "Global Observers",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventCacheEntry {
    /// `None` when the saved event name is unknown to this build.
    pub event: Option<EventType>,
    pub message: String,
    pub turn: i64,
    pub server_state: i64,
    pub target: EventTarget,
}

impl EventCacheEntry {
    pub fn is_for_player(&self, slot: usize) -> bool {
        match &self.target {
            EventTarget::All => true,
            EventTarget::Players(mask) => mask.contains(slot),
            EventTarget::GlobalObservers => false,
        }
    }

    pub fn is_for_observers(&self) -> bool {
        matches!(self.target, EventTarget::All | EventTarget::GlobalObservers)
    }
}

#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventCache {
    pub entries: VecDeque<EventCacheEntry>,
}

impl EventCache {
    pub fn push(&mut self, entry: EventCacheEntry) {
        self.entries.push_back(entry);
    }

    /// Entries to replay to a reconnecting player, oldest first.
    pub fn replay_for_player(&self, slot: usize) -> impl Iterator<Item = &EventCacheEntry> {
        self.entries.iter().filter(move |e| e.is_for_player(slot))
    }

    pub fn replay_for_observer(&self) -> impl Iterator<Item = &EventCacheEntry> {
        self.entries.iter().filter(|e| e.is_for_observers())
    }

    /// Drop entries older than `max_age` turns.
    pub fn remove_old(&mut self, current_turn: i64, max_age: i64) {
        self.entries.retain(|e| current_turn - e.turn <= max_age);
    }
}
