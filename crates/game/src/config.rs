/// Number of player slots the current build can address.
pub const MAX_PLAYER_SLOTS: usize = 512;

/// Map dimensions used when a save does not record them.
pub const MAP_DEFAULT_WIDTH: usize = 64;
pub const MAP_DEFAULT_HEIGHT: usize = 48;

/// Latitude range. North pole is `MAP_MAX_LATITUDE`, south pole is `MAP_MIN_LATITUDE`.
pub const MAP_MAX_LATITUDE: i64 = 1000;
pub const MAP_MIN_LATITUDE: i64 = -MAP_MAX_LATITUDE;

/// Latitude used for both map edges when the whole map is temperate.
pub const MAP_TEMPERATE_LATITUDE: i64 = MAP_MAX_LATITUDE / 2;

/// AI implementation assigned to players whose save predates per-player AI types.
pub const DEFAULT_AI_TYPE: &str = "classic";

pub const GAME_DEFAULT_TEAM_POOLED_RESEARCH: bool = true;

/// First turn of a freshly started game (turns are counted inclusively).
pub const GAME_START_TURN: i64 = 1;

/// City turn fields that have never been set hold this value.
pub const CITY_TURN_UNSET: i64 = -2;

/// Unit birth turn for units created before the game started.
pub const UNIT_BIRTH_TURN_UNSET: i64 = -1;

/// `first_contact_turn` of a diplomatic state between players that never met.
pub const FIRST_CONTACT_UNSET: i64 = 0;

/// Sub target value meaning "no sub target".
pub const NO_SUB_TARGET: i64 = -1;
