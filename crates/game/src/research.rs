use std::collections::BTreeMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// One independent research track: a player, or a team when research is pooled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResearchRecord {
    pub number: usize,
    pub researching: Option<String>,
    pub bulbs: i64,
    pub techs: i64,
}

#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResearchRegistry {
    pub team_pooled: bool,
    pub records: BTreeMap<usize, ResearchRecord>,
}

impl ResearchRegistry {
    /// Research index of a player: its team when research is pooled.
    pub fn index_for(&self, player_slot: usize, team: usize) -> usize {
        if self.team_pooled {
            team
        } else {
            player_slot
        }
    }

    pub fn record_for(&self, player_slot: usize, team: usize) -> Option<&ResearchRecord> {
        self.records.get(&self.index_for(player_slot, team))
    }
}
