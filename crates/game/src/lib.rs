pub mod actions;
pub mod activity;
pub mod city;
pub mod config;
pub mod events;
pub mod game_info;
pub mod map;
pub mod player;
pub mod research;
pub mod ruleset;
pub mod settings;
pub mod unit;

pub use actions::Action;
pub use activity::{Activity, ServerSideAgent};
pub use map::{Direction8, GameMap, TileIndex};
pub use ruleset::Ruleset;
