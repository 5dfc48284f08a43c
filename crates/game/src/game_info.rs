use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::activity::ServerSideAgent;
use crate::actions::Action;
use crate::config::GAME_START_TURN;
use crate::player::DiplStateType;

/// Game-wide state restored from the `game` and `savefile` sections.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameInfo {
    pub turn: i64,
    pub save_version: i64,
    pub ruleset: String,
    /// Capabilities the save was written with (`savefile.options`).
    pub capabilities: Vec<String>,
}

impl Default for GameInfo {
    fn default() -> Self {
        Self {
            turn: GAME_START_TURN,
            save_version: 0,
            ruleset: "classic".to_string(),
            capabilities: Vec::new(),
        }
    }
}

/// Index tables that map saved integers to current enumerators.
///
/// Built from the vectors a save carries (`savefile.action_vector` and
/// friends). Entries the current build does not know are `None`.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct SavedOrderings {
    pub actions: Vec<Option<Action>>,
    pub ssa: Vec<Option<ServerSideAgent>>,
    pub diplstates: Vec<Option<DiplStateType>>,
    pub specialists: Vec<String>,
}

impl SavedOrderings {
    pub fn action(&self, index: i64) -> Option<Action> {
        lookup(&self.actions, index)
    }

    pub fn ssa(&self, index: i64) -> Option<ServerSideAgent> {
        lookup(&self.ssa, index)
    }

    pub fn diplstate(&self, index: i64) -> Option<DiplStateType> {
        lookup(&self.diplstates, index)
    }
}

fn lookup<T: Copy>(table: &[Option<T>], index: i64) -> Option<T> {
    usize::try_from(index)
        .ok()
        .and_then(|i| table.get(i).copied().flatten())
}
