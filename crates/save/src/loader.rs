// ---------------------------------------------------------------------------
// Loader: build the game world from a document in the current layout
// ---------------------------------------------------------------------------
//
// Runs after every load compat step, so it only knows the current layout.
// Saved integers that index enumerations go through the vectors the save
// carries (`SavedOrderings`); names this build does not know load as `None`.

use bevy::prelude::*;

use game::city::City;
use game::config::{
    CITY_TURN_UNSET, FIRST_CONTACT_UNSET, GAME_DEFAULT_TEAM_POOLED_RESEARCH, GAME_START_TURN,
    MAP_DEFAULT_HEIGHT, MAP_DEFAULT_WIDTH, NO_SUB_TARGET, UNIT_BIRTH_TURN_UNSET,
};
use game::events::{EventCache, EventCacheEntry, EventTarget, EventType, PlayerMask};
use game::game_info::{GameInfo, SavedOrderings};
use game::map::{Topology, Wrap};
use game::player::{DiplState, DiplStateType, KnownTiles, Player, TraitValue};
use game::research::{ResearchRecord, ResearchRegistry};
use game::settings::{ServerSettings, Setting, SettingValue};
use game::unit::{OrderKind, Unit, UnitOrder, UnitOrders};
use game::{Action, Activity, Direction8, GameMap, Ruleset, ServerSideAgent, TileIndex};

use crate::compat::{known_current_group, known_words_present, settings_block, KnownGrid};
use crate::doc_path;
use crate::document::{Document, Value};
use crate::save_error::SaveError;
use crate::setting_compat::{name_for_current, value_for_current};

/// Build a world holding every resource and entity the document describes.
pub fn load_current_format(doc: &Document, ruleset: &Ruleset) -> Result<World, SaveError> {
    let mut world = World::new();

    let orderings = load_orderings(doc, ruleset)?;
    let settings = load_settings(doc)?;
    let map = load_map(doc, &settings)?;

    world.insert_resource(load_game_info(doc, ruleset)?);
    world.insert_resource(load_research(doc, &settings)?);
    world.insert_resource(load_event_cache(doc)?);

    let known = load_known(doc, &map)?;
    let mut units = 0;
    let mut cities = 0;
    for p in doc.player_slots() {
        let player = load_player(doc, p, &orderings)?;
        let known_tiles = KnownTiles {
            known: (0..map.tile_count())
                .map(|tile| known.as_ref().is_some_and(|g| g.is_known(tile, p)))
                .collect(),
        };
        world.spawn((player, known_tiles));

        for c in 0..count(doc, &doc_path::player(p, "ncities")) {
            world.spawn(load_city(doc, p, c, &map, &orderings)?);
            cities += 1;
        }
        for u in 0..count(doc, &doc_path::player(p, "nunits")) {
            world.spawn(load_unit(doc, p, u, &map, &orderings)?);
            units += 1;
        }
    }
    info!(
        "Loaded {} players, {cities} cities, {units} units on a {}x{} map",
        doc.player_slots().len(),
        map.width,
        map.height
    );

    world.insert_resource(settings);
    world.insert_resource(map);
    world.insert_resource(orderings);
    world.insert_resource(ruleset.clone());
    Ok(world)
}

fn count(doc: &Document, path: &str) -> usize {
    usize::try_from(doc.lookup_int_default(path, 0)).unwrap_or(0)
}

fn to_index<T: TryFrom<i64>>(path: &str, value: i64) -> Result<T, SaveError> {
    T::try_from(value)
        .map_err(|_| SaveError::Structural(format!("{path} = {value} is out of range")))
}

// =============================================================================
// Savefile and game
// =============================================================================

/// Decode one saved name vector. Unknown names log an error and map to `None`.
fn decode_vector<T>(
    doc: &Document,
    key: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Vec<Option<T>>, SaveError> {
    let names = doc.lookup_str_vec(&doc_path::savefile(key))?;
    Ok(names
        .iter()
        .map(|name| {
            let parsed = parse(name);
            if parsed.is_none() {
                error!("savefile.{key}: unknown entry \"{name}\"");
            }
            parsed
        })
        .collect())
}

fn load_orderings(doc: &Document, ruleset: &Ruleset) -> Result<SavedOrderings, SaveError> {
    Ok(SavedOrderings {
        actions: decode_vector(doc, "action_vector", Action::from_rule_name)?,
        ssa: decode_vector(doc, "ssa_vector", ServerSideAgent::from_name)?,
        diplstates: decode_vector(doc, "ds_t_vector", DiplStateType::from_name)?,
        specialists: doc
            .lookup_str_vec(&doc_path::savefile("specialists_vector"))
            .unwrap_or_else(|_| ruleset.specialists.clone()),
    })
}

fn load_game_info(doc: &Document, ruleset: &Ruleset) -> Result<GameInfo, SaveError> {
    Ok(GameInfo {
        turn: doc.lookup_int_default(&doc_path::game("turn"), GAME_START_TURN),
        save_version: doc.lookup_int(&doc_path::savefile("version"))?,
        ruleset: ruleset.name.clone(),
        capabilities: doc
            .lookup_str_default(&doc_path::savefile("options"), String::new())
            .split_whitespace()
            .map(|c| c.trim_start_matches('+').to_string())
            .collect(),
    })
}

// =============================================================================
// Settings and map
// =============================================================================

fn setting_value(path: &str, value: &Value, name: &str) -> Result<SettingValue, SaveError> {
    Ok(match value {
        Value::Bool(b) => SettingValue::Bool(*b),
        Value::Int(i) => SettingValue::Int(*i),
        Value::Str(s) => match value_for_current(name, s) {
            Some(current) => {
                info!("Setting {name}: value {s} replaced by {current}");
                SettingValue::Str(current.to_string())
            }
            None => SettingValue::Str(s.clone()),
        },
        _ => {
            return Err(SaveError::WrongType {
                path: path.to_string(),
                expected: "setting value",
            })
        }
    })
}

/// Settings in saved order, under their current names.
fn load_settings(doc: &Document) -> Result<ServerSettings, SaveError> {
    let mut settings = ServerSettings::default();
    for i in 0..settings_block::count(doc) {
        let saved_name = doc.lookup_str(&doc_path::setting(i, "name"))?;
        let name = name_for_current(&saved_name);
        if name != saved_name {
            debug!("Setting {saved_name} is now called {name}");
        }

        let value_path = doc_path::setting(i, "value");
        let Some(value) = doc.lookup(&value_path) else {
            return Err(SaveError::MissingField(value_path));
        };
        let value = setting_value(&value_path, value, name)?;

        let gamestart_path = doc_path::setting(i, "gamestart");
        let gamestart = match doc.lookup(&gamestart_path) {
            Some(gs) => Some(setting_value(&gamestart_path, gs, name)?),
            None => None,
        };

        settings.settings.push(Setting {
            name: name.to_string(),
            value,
            gamestart,
            gamesetdef: doc.lookup_bool_default(&doc_path::setting(i, "gamesetdef"), false),
        });
    }
    Ok(settings)
}

fn load_map(doc: &Document, settings: &ServerSettings) -> Result<GameMap, SaveError> {
    let dimension = |key: &str, default: usize| -> Result<usize, SaveError> {
        let path = doc_path::map(key);
        match doc.lookup_int(&path) {
            Ok(v) => to_index(&path, v),
            Err(_) => Ok(default),
        }
    };
    let mut map = GameMap::new(
        dimension("width", MAP_DEFAULT_WIDTH)?,
        dimension("height", MAP_DEFAULT_HEIGHT)?,
    );
    if let Some(topology) = settings.value("topology").and_then(SettingValue::as_str) {
        map.topology = Topology::from_setting(topology);
    }
    if let Some(wrap) = settings.value("wrap").and_then(SettingValue::as_str) {
        map.wrap = Wrap::from_setting(wrap);
    }
    Ok(map)
}

fn load_known(doc: &Document, map: &GameMap) -> Result<Option<KnownGrid>, SaveError> {
    let words = known_words_present(doc);
    if words == 0 {
        return Ok(None);
    }
    KnownGrid::read(doc, map.width, map.height, words, known_current_group).map(Some)
}

fn tile_at(
    doc: &Document,
    path_of: impl Fn(&str) -> String,
    map: &GameMap,
) -> Result<TileIndex, SaveError> {
    let x_path = path_of("x");
    let y_path = path_of("y");
    let x = to_index(&x_path, doc.lookup_int(&x_path)?)?;
    let y = to_index(&y_path, doc.lookup_int(&y_path)?)?;
    map.tile_index(x, y).ok_or_else(|| {
        SaveError::Structural(format!("{x_path},{y_path} = ({x}, {y}) is off the map"))
    })
}

// =============================================================================
// Research and events
// =============================================================================

fn load_research(doc: &Document, settings: &ServerSettings) -> Result<ResearchRegistry, SaveError> {
    let mut research = ResearchRegistry {
        team_pooled: settings
            .value("team_pooled_research")
            .and_then(SettingValue::as_bool)
            .unwrap_or(GAME_DEFAULT_TEAM_POOLED_RESEARCH),
        ..Default::default()
    };
    for r in 0..count(doc, &doc_path::research("count")) {
        let number_path = doc_path::research_record(r, "number");
        let number = to_index(&number_path, doc.lookup_int(&number_path)?)?;
        let researching = doc
            .lookup_str_default(&doc_path::research_record(r, "researching"), "None".into());
        research.records.insert(
            number,
            ResearchRecord {
                number,
                researching: (!researching.eq_ignore_ascii_case("None")).then_some(researching),
                bulbs: doc.lookup_int_default(&doc_path::research_record(r, "bulbs"), 0),
                techs: doc.lookup_int_default(&doc_path::research_record(r, "techs"), 0),
            },
        );
    }
    Ok(research)
}

fn load_event_cache(doc: &Document) -> Result<EventCache, SaveError> {
    let mut cache = EventCache::default();
    for e in 0..count(doc, &doc_path::event_cache("count")) {
        let name = doc.lookup_str(&doc_path::event(e, "event"))?;
        let event = EventType::from_name(&name);
        if event.is_none() {
            error!("Event cache entry {e}: unknown event {name}");
        }

        let target_path = doc_path::event(e, "target_type");
        let target_type = doc.lookup_str_default(&target_path, "All".into());
        let target = match target_type.as_str() {
            "All" => EventTarget::All,
            "Global Observers" => EventTarget::GlobalObservers,
            "Player" => EventTarget::Players(PlayerMask::from_bit_string(
                &doc.lookup_str(&doc_path::event(e, "targets"))?,
            )),
            other => {
                return Err(SaveError::Structural(format!(
                    "{target_path}: unknown target type {other}"
                )))
            }
        };

        cache.push(EventCacheEntry {
            event,
            message: doc.lookup_str_default(&doc_path::event(e, "message"), String::new()),
            turn: doc.lookup_int_default(&doc_path::event(e, "turn"), 0),
            server_state: doc.lookup_int_default(&doc_path::event(e, "server_state"), 0),
            target,
        });
    }
    Ok(cache)
}

// =============================================================================
// Players, cities, units
// =============================================================================

fn load_player(doc: &Document, p: usize, orderings: &SavedOrderings) -> Result<Player, SaveError> {
    let mut player = Player::new(
        p,
        doc.lookup_str_default(&doc_path::player(p, "name"), format!("Player {p}")),
        doc.lookup_str(&doc_path::player(p, "ai_type"))?,
    );
    player.got_first_city = doc.lookup_bool(&doc_path::player(p, "got_first_city"))?;
    player.turns_alive = doc.lookup_int(&doc_path::player(p, "turns_alive"))?;
    if let Ok(team) = doc.lookup_int(&doc_path::player(p, "team_no")) {
        player.team = to_index(&doc_path::player(p, "team_no"), team)?;
    }

    for t in 0..count(doc, &doc_path::player(p, "ntraits")) {
        player.traits.push(TraitValue {
            val: doc.lookup_int(&doc_path::player_trait(p, t, "val"))?,
            modifier: doc.lookup_int(&doc_path::player_trait(p, t, "mod"))?,
        });
    }

    for entry in doc.entry_names(&doc_path::player_section(p)) {
        let Some(other) = entry
            .strip_prefix("diplstate")
            .and_then(|rest| rest.strip_suffix(".type"))
            .and_then(|o| o.parse::<usize>().ok())
        else {
            continue;
        };
        let type_path = doc_path::diplstate(p, other, "type");
        let state = match doc.lookup(&type_path) {
            Some(Value::Int(i)) => orderings.diplstate(*i),
            Some(Value::Str(name)) => DiplStateType::from_name(name),
            _ => None,
        };
        let state = state.unwrap_or_else(|| {
            error!("{type_path}: unknown diplomatic state, using never met");
            DiplStateType::NeverMet
        });
        player.diplstates.insert(
            other,
            DiplState {
                state,
                first_contact_turn: doc.lookup_int_default(
                    &doc_path::diplstate(p, other, "first_contact_turn"),
                    FIRST_CONTACT_UNSET,
                ),
            },
        );
    }
    Ok(player)
}

fn load_city(
    doc: &Document,
    p: usize,
    c: usize,
    map: &GameMap,
    orderings: &SavedOrderings,
) -> Result<City, SaveError> {
    let path = |key: &str| doc_path::city(p, c, key);
    let size = to_index(&path("size"), doc.lookup_int_default(&path("size"), 1))?;
    let mut city = City::new(
        to_index(&path("id"), doc.lookup_int_default(&path("id"), 0))?,
        p,
        doc.lookup_str_default(&path("name"), format!("City {c}")),
        tile_at(doc, path, map)?,
        size,
    );
    city.turn_founded = doc.lookup_int_default(&path("turn_founded"), CITY_TURN_UNSET);
    city.turn_last_built = doc.lookup_int_default(&path("turn_last_built"), CITY_TURN_UNSET);

    let citizen_prefix = format!("c{c}.citizen");
    for entry in doc.entry_names(&doc_path::player_section(p)) {
        let Some(nationality) = entry
            .strip_prefix(&citizen_prefix)
            .and_then(|n| n.parse::<usize>().ok())
        else {
            continue;
        };
        let count_path = path(&format!("citizen{nationality}"));
        let citizens = to_index(&count_path, doc.lookup_int(&count_path)?)?;
        city.citizens.insert(nationality, citizens);
    }

    if let Ok(counts) = doc.lookup_int_vec(&path("specialists")) {
        for (i, n) in counts.into_iter().enumerate() {
            if n <= 0 {
                continue;
            }
            match orderings.specialists.get(i) {
                Some(name) => {
                    city.specialists.insert(name.clone(), to_index(&path("specialists"), n)?);
                }
                None => error!("{}: no specialist type {i}", path("specialists")),
            }
        }
    }
    Ok(city)
}

fn load_unit(
    doc: &Document,
    p: usize,
    u: usize,
    map: &GameMap,
    orderings: &SavedOrderings,
) -> Result<(Unit, UnitOrders), SaveError> {
    let path = |key: &str| doc_path::unit(p, u, key);
    let mut unit = Unit::new(
        to_index(&path("id"), doc.lookup_int_default(&path("id"), 0))?,
        p,
        doc.lookup_str(&path("type"))?,
        tile_at(doc, path, map)?,
    );

    let activity = doc.lookup_str_default(&path("activity"), Activity::Idle.name().into());
    unit.activity = Activity::from_name(&activity).unwrap_or_else(|| {
        error!("{}: unknown activity {activity}, using Idle", path("activity"));
        Activity::Idle
    });

    if let Ok(ssa) = doc.lookup_int(&path("server_side_agent")) {
        unit.ssa = match orderings.ssa(ssa) {
            Some(ssa) => ssa,
            None => {
                if ssa >= 0 {
                    error!("{}: unknown server side agent {ssa}", path("server_side_agent"));
                }
                ServerSideAgent::None
            }
        };
    }
    unit.birth_turn = doc.lookup_int_default(&path("birth_turn"), UNIT_BIRTH_TURN_UNSET);

    let orders = load_orders(doc, &path, orderings)?;
    Ok((unit, orders))
}

fn order_chars(doc: &Document, path: &str, len: usize) -> Result<Vec<char>, SaveError> {
    let chars: Vec<char> = doc.lookup_str(path)?.chars().collect();
    if chars.len() < len {
        return Err(SaveError::Structural(format!(
            "{path} holds {} orders, expected {len}",
            chars.len()
        )));
    }
    Ok(chars)
}

fn load_orders(
    doc: &Document,
    path: &impl Fn(&str) -> String,
    orderings: &SavedOrderings,
) -> Result<UnitOrders, SaveError> {
    let len = count(doc, &path("orders_length"));
    if len == 0 {
        return Ok(UnitOrders::default());
    }

    let kinds = order_chars(doc, &path("orders_list"), len)?;
    let dirs = order_chars(doc, &path("dir_list"), len)?;
    let activities = order_chars(doc, &path("activity_list"), len)?;
    let actions = doc.lookup_int_vec(&path("action_vec")).unwrap_or_default();
    let targets = doc.lookup_int_vec(&path("tgt_vec")).unwrap_or_default();
    let sub_targets = doc.lookup_int_vec(&path("sub_tgt_vec")).unwrap_or_default();

    let mut list = Vec::with_capacity(len);
    for i in 0..len {
        let order = OrderKind::from_char(kinds[i]).ok_or_else(|| {
            SaveError::Structural(format!("{}: unknown order {}", path("orders_list"), kinds[i]))
        })?;
        let dir = match dirs[i] {
            '?' => None,
            c => Some(Direction8::from_char(c).ok_or_else(|| {
                SaveError::Structural(format!("{}: bad direction {c}", path("dir_list")))
            })?),
        };
        let activity = match activities[i] {
            '?' => None,
            c => {
                let activity = Activity::from_char(c);
                if activity.is_none() {
                    error!("{}: unknown activity letter {c}", path("activity_list"));
                }
                activity
            }
        };
        let action = match actions.get(i).copied() {
            Some(index) if index >= 0 => {
                let action = orderings.action(index);
                if action.is_none() {
                    error!("{}: unknown action {index}", path("action_vec"));
                }
                action
            }
            _ => None,
        };
        let target = match targets.get(i).copied() {
            Some(tile) if tile >= 0 => Some(to_index(&path("tgt_vec"), tile)?),
            _ => None,
        };
        list.push(UnitOrder {
            order,
            dir,
            activity,
            action,
            target,
            sub_target: sub_targets.get(i).copied().unwrap_or(NO_SUB_TARGET),
        });
    }

    Ok(UnitOrders {
        list,
        index: count(doc, &path("orders_index")),
        repeat: doc.lookup_bool_default(&path("orders_repeat"), false),
        vigilant: doc.lookup_bool_default(&path("orders_vigilant"), false),
    })
}
