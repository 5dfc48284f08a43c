use std::collections::BTreeMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::FIRST_CONTACT_UNSET;

// =============================================================================
// Diplomatic states
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DiplStateType {
    Armistice,
    War,
    CeaseFire,
    Peace,
    Alliance,
    #[default]
    NeverMet,
    Team,
}

impl DiplStateType {
    /// Canonical order written into `savefile.ds_t_vector`.
    pub const ALL: [DiplStateType; 7] = [
        DiplStateType::Armistice,
        DiplStateType::War,
        DiplStateType::CeaseFire,
        DiplStateType::Peace,
        DiplStateType::Alliance,
        DiplStateType::NeverMet,
        DiplStateType::Team,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DiplStateType::Armistice => "Armistice",
            DiplStateType::War => "War",
            DiplStateType::CeaseFire => "Cease-fire",
            DiplStateType::Peace => "Peace",
            DiplStateType::Alliance => "Alliance",
            DiplStateType::NeverMet => "Never met",
            DiplStateType::Team => "Team",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiplState {
    pub state: DiplStateType,
    pub first_contact_turn: i64,
}

impl Default for DiplState {
    fn default() -> Self {
        Self {
            state: DiplStateType::NeverMet,
            first_contact_turn: FIRST_CONTACT_UNSET,
        }
    }
}

// =============================================================================
// Player
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitValue {
    pub val: i64,
    pub modifier: i64,
}

#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub slot: usize,
    pub name: String,
    pub ai_type: String,
    pub team: usize,
    pub got_first_city: bool,
    pub turns_alive: i64,
    pub traits: Vec<TraitValue>,
    /// Keyed by the other player's slot.
    pub diplstates: BTreeMap<usize, DiplState>,
}

impl Player {
    pub fn new(slot: usize, name: impl Into<String>, ai_type: impl Into<String>) -> Self {
        Self {
            slot,
            name: name.into(),
            ai_type: ai_type.into(),
            team: slot,
            got_first_city: false,
            turns_alive: 0,
            traits: Vec::new(),
            diplstates: BTreeMap::new(),
        }
    }
}

/// Tiles a player has seen, indexed by tile.
#[derive(Component, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnownTiles {
    pub known: Vec<bool>,
}

impl KnownTiles {
    pub fn count(&self) -> usize {
        self.known.iter().filter(|k| **k).count()
    }
}
