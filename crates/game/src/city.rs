use std::collections::BTreeMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::CITY_TURN_UNSET;
use crate::map::TileIndex;

#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: u32,
    pub owner: usize,
    pub name: String,
    pub tile: TileIndex,
    pub size: u32,
    /// Citizen count per nationality (player slot).
    pub citizens: BTreeMap<usize, u32>,
    /// Specialist count per specialist rule name.
    pub specialists: BTreeMap<String, u32>,
    pub turn_founded: i64,
    pub turn_last_built: i64,
}

impl City {
    pub fn new(id: u32, owner: usize, name: impl Into<String>, tile: TileIndex, size: u32) -> Self {
        Self {
            id,
            owner,
            name: name.into(),
            tile,
            size,
            citizens: BTreeMap::new(),
            specialists: BTreeMap::new(),
            turn_founded: CITY_TURN_UNSET,
            turn_last_built: CITY_TURN_UNSET,
        }
    }

    pub fn citizen_total(&self) -> u32 {
        self.citizens.values().sum()
    }
}
