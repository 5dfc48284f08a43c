//! Every historical format version migrates to something the current
//! loader accepts.

use game::city::City;
use game::config::{CITY_TURN_UNSET, DEFAULT_AI_TYPE, FIRST_CONTACT_UNSET};
use game::events::{EventCache, EventType};
use game::game_info::GameInfo;
use game::player::{DiplStateType, KnownTiles, Player};
use game::research::ResearchRegistry;
use game::settings::{ServerSettings, SettingValue};
use game::unit::Unit;
use game::{Activity, GameMap, Ruleset};

use super::*;
use crate::doc_path;
use crate::load_pipeline::{load_savegame, upgrade_document};
use crate::load_session::LoadOptions;
use crate::test_fixtures::{minimal_document, MAP_HEIGHT, MAP_WIDTH};

/// One stamp from every era, plus both edges of the eras that have them.
const HISTORICAL_VERSIONS: [i64; 13] = [3, 10, 19, 20, 29, 30, 39, 40, 50, 60, 70, 79, 80];

#[test]
fn test_every_historical_version_loads() {
    let ruleset = Ruleset::classic();
    for version in HISTORICAL_VERSIONS {
        let result = load_savegame(minimal_document(version), &ruleset, LoadOptions::default());
        assert!(result.is_ok(), "version {version}: {:?}", result.err());
    }
}

#[test]
fn test_version_10_gets_ai_type_and_citizens() {
    let doc = minimal_document(10);
    assert!(!doc.contains(&doc_path::player(0, "ai_type")));
    assert!(!doc.contains(&doc_path::city(0, 0, "citizen0")));

    let (upgraded, report) =
        upgrade_document(doc, &Ruleset::classic(), LoadOptions::default()).unwrap();
    assert_eq!(
        upgraded.lookup_str(&doc_path::player(0, "ai_type")),
        Ok(DEFAULT_AI_TYPE.to_string())
    );
    assert_eq!(upgraded.lookup_int(&doc_path::city(0, 0, "citizen0")), Ok(5));
    assert_eq!(report.steps_applied, vec![20, 30, 40, 50, 60, 70]);
    assert_eq!(
        upgraded.lookup_int(&doc_path::savefile("version")),
        Ok(CURRENT_COMPAT_VERSION)
    );
}

#[test]
fn test_upgraded_document_is_stable() {
    let ruleset = Ruleset::classic();
    let (once, _) = upgrade_document(minimal_document(3), &ruleset, LoadOptions::default()).unwrap();
    let (twice, report) = upgrade_document(once.clone(), &ruleset, LoadOptions::default()).unwrap();
    assert!(report.steps_applied.is_empty());
    assert_eq!(once, twice);
}

#[test]
fn test_oldest_save_loads_into_world() {
    let ruleset = Ruleset::classic();
    let mut loaded = load_savegame(minimal_document(3), &ruleset, LoadOptions::default()).unwrap();
    assert_eq!(loaded.report.original_version, 3);
    assert_eq!(loaded.report.steps_applied, vec![20, 30, 40, 50, 60, 70]);
    assert_eq!(loaded.report.post_load_applied, vec![60]);

    let world = &mut loaded.world;
    assert_eq!(world.resource::<GameInfo>().turn, 13);
    assert_eq!(world.resource::<GameInfo>().save_version, 3);

    let map = world.resource::<GameMap>();
    assert_eq!((map.width, map.height), (MAP_WIDTH, MAP_HEIGHT));
    assert!(map.topology.iso && !map.topology.hex);
    assert!(map.wrap.wrap_x && !map.wrap.wrap_y);

    let settings = world.resource::<ServerSettings>();
    assert_eq!(
        settings.value("victories"),
        Some(&SettingValue::Str("SPACERACE".into()))
    );
    assert_eq!(settings.value("endspaceship"), Some(&SettingValue::Bool(true)));
    assert_eq!(settings.value("huts"), Some(&SettingValue::Int(150)));
    assert_eq!(settings.value("killcitizen"), Some(&SettingValue::Bool(true)));
    assert_eq!(settings.value("northlatitude"), Some(&SettingValue::Int(1000)));
    assert_eq!(settings.value("southlatitude"), Some(&SettingValue::Int(-1000)));
    assert_eq!(settings.value("diplbulbcost"), Some(&SettingValue::Int(0)));
    assert!(settings.get("diplcost").is_none());
    assert!(settings.get("spacerace").is_none());

    let research = world.resource::<ResearchRegistry>();
    assert!(research.team_pooled);
    let record = research.record_for(0, 0).unwrap();
    assert_eq!(record.researching.as_deref(), Some("Bronze Working"));
    assert_eq!((record.bulbs, record.techs), (7, 3));

    let events = world.resource::<EventCache>();
    assert_eq!(events.entries.len(), 1);
    assert_eq!(events.entries[0].event, Some(EventType::UnitWinDef));

    let player = world.query::<&Player>().single(world).clone();
    assert_eq!(player.ai_type, DEFAULT_AI_TYPE);
    assert!(player.got_first_city);
    assert_eq!(player.turns_alive, 12);
    let own = player.diplstates[&0];
    assert_eq!(own.state, DiplStateType::Team);
    assert_eq!(own.first_contact_turn, FIRST_CONTACT_UNSET);

    let known = world.query::<&KnownTiles>().single(world);
    assert_eq!(known.known.len(), MAP_WIDTH * MAP_HEIGHT);

    let city = world.query::<&City>().single(world).clone();
    assert_eq!(city.turn_founded, 4);
    assert_eq!(city.turn_last_built, CITY_TURN_UNSET);
    assert_eq!(city.citizens.get(&0), Some(&5));
    assert_eq!(city.citizen_total(), city.size);

    let unit = world.query::<&Unit>().single(world).clone();
    assert_eq!(unit.birth_turn, 3);
    assert_eq!(unit.activity, Activity::Idle);
    assert_eq!(unit.unit_type, "Workers");
}

#[test]
fn test_recent_save_keeps_its_turns() {
    let ruleset = Ruleset::classic();
    let mut loaded = load_savegame(minimal_document(60), &ruleset, LoadOptions::default()).unwrap();
    assert_eq!(loaded.report.steps_applied, vec![70]);
    assert!(loaded.report.post_load_applied.is_empty());

    let world = &mut loaded.world;
    assert_eq!(world.resource::<GameInfo>().turn, 12);
    let city = world.query::<&City>().single(world).clone();
    assert_eq!(city.turn_founded, 3);
}
