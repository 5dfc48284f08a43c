//! Typed builders for document paths.
//!
//! Every indexed key of the savegame layout is built here so that index
//! formatting (`player3.c12.size`, `map.k05_0017`) lives in one place.

pub fn savefile(key: &str) -> String {
    format!("savefile.{key}")
}

pub fn scenario(key: &str) -> String {
    format!("scenario.{key}")
}

pub fn game(key: &str) -> String {
    format!("game.{key}")
}

pub fn map(key: &str) -> String {
    format!("map.{key}")
}

/// Known-tiles row for 4-bit group `group` (8 groups per 32-slot word) and row `y`.
pub fn known_row(group: usize, y: usize) -> String {
    format!("map.k{group:02}_{y:04}")
}

/// Known-tiles row as written by saves carrying the `knownv2` capability.
pub fn known_row_v2(group: usize, y: usize) -> String {
    format!("map.kvb{group:02}_{y:04}")
}

pub fn players(key: &str) -> String {
    format!("players.{key}")
}

pub fn player_section(p: usize) -> String {
    format!("player{p}")
}

pub fn player(p: usize, key: &str) -> String {
    format!("player{p}.{key}")
}

pub fn city(p: usize, c: usize, key: &str) -> String {
    format!("player{p}.c{c}.{key}")
}

pub fn unit(p: usize, u: usize, key: &str) -> String {
    format!("player{p}.u{u}.{key}")
}

pub fn player_trait(p: usize, t: usize, key: &str) -> String {
    format!("player{p}.trait{t}.{key}")
}

pub fn diplstate(p: usize, other: usize, key: &str) -> String {
    format!("player{p}.diplstate{other}.{key}")
}

pub fn settings(key: &str) -> String {
    format!("settings.{key}")
}

pub fn setting(i: usize, key: &str) -> String {
    format!("settings.set{i}.{key}")
}

pub fn research(key: &str) -> String {
    format!("research.{key}")
}

pub fn research_record(i: usize, key: &str) -> String {
    format!("research.r{i}.{key}")
}

pub fn event_cache(key: &str) -> String {
    format!("event_cache.{key}")
}

pub fn event(i: usize, key: &str) -> String {
    format!("event_cache.events{i}.{key}")
}
