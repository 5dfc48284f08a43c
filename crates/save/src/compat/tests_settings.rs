//! Setting conversions of the load steps and the remapper applied while
//! loading.

use game::settings::{ServerSettings, SettingValue};
use game::Ruleset;

use super::*;
use crate::doc_path;
use crate::document::{Document, Value};
use crate::load_pipeline::{load_savegame, upgrade_document};
use crate::load_session::LoadOptions;
use crate::save_file::CompressionKind;
use crate::test_fixtures::minimal_document;

fn upgrade(doc: Document) -> Document {
    upgrade_document(doc, &Ruleset::classic(), LoadOptions::default())
        .unwrap()
        .0
}

fn setting_value(doc: &Document, name: &str) -> Option<Value> {
    settings_block::find(doc, name).and_then(|i| settings_block::value(doc, i).cloned())
}

fn setting_gamestart(doc: &Document, name: &str) -> Option<Value> {
    settings_block::find(doc, name).and_then(|i| settings_block::gamestart(doc, i).cloned())
}

/// A 2.x document whose only setting is `topology`.
fn topology_doc(value: Value) -> Document {
    let mut doc = minimal_document(40);
    doc.remove(&doc_path::settings("set_count"));
    for entry in doc.entry_names("settings") {
        doc.remove(&doc_path::settings(&entry));
    }
    settings_block::append(&mut doc, "topology", value, None);
    doc
}

#[test]
fn test_topology_bitmask_splits_into_topology_and_wrap() {
    // ISO | WRAPX
    let doc = upgrade(topology_doc(Value::Int(4 | 1)));
    assert_eq!(settings_block::count(&doc), 2);
    assert_eq!(doc.lookup_str("settings.set0.name"), Ok("topology".to_string()));
    assert_eq!(doc.lookup_str("settings.set0.value"), Ok("ISO".to_string()));
    assert_eq!(doc.lookup_str("settings.set1.name"), Ok("wrap".to_string()));
    assert_eq!(doc.lookup_str("settings.set1.value"), Ok("WrapX".to_string()));
}

#[test]
fn test_topology_names_split_too() {
    let doc = upgrade(topology_doc(Value::Str("WRAPX|WRAPY|HEX".into())));
    assert_eq!(setting_value(&doc, "topology"), Some(Value::Str("HEX".into())));
    assert_eq!(setting_value(&doc, "wrap"), Some(Value::Str("WrapX|WrapY".into())));
}

#[test]
fn test_plain_topology_gets_empty_wrap() {
    let doc = upgrade(topology_doc(Value::Int(0)));
    assert_eq!(setting_value(&doc, "topology"), Some(Value::Str(String::new())));
    assert_eq!(setting_value(&doc, "wrap"), Some(Value::Str(String::new())));
}

#[test]
fn test_topology_gamestart_is_split() {
    let doc = upgrade(minimal_document(40));
    assert_eq!(setting_gamestart(&doc, "topology"), Some(Value::Str("ISO".into())));
    assert_eq!(setting_gamestart(&doc, "wrap"), Some(Value::Str("WrapX".into())));
}

#[test]
fn test_spacerace_becomes_victories_flag() {
    let doc = upgrade(minimal_document(40));
    assert_eq!(
        setting_value(&doc, "victories"),
        Some(Value::Str("SPACERACE".into()))
    );
    assert_eq!(setting_value(&doc, "endspaceship"), Some(Value::Bool(true)));
    assert!(settings_block::find(&doc, "spacerace").is_none());
}

#[test]
fn test_spacerace_merges_into_existing_victories() {
    let mut doc = minimal_document(40);
    settings_block::append(&mut doc, "victories", "ALLIED", Some(Value::Str(String::new())));
    let i = settings_block::find(&doc, "spacerace").unwrap();
    doc.replace(&doc_path::setting(i, "gamestart"), true);

    let doc = upgrade(doc);
    assert_eq!(
        setting_value(&doc, "victories"),
        Some(Value::Str("ALLIED|SPACERACE".into()))
    );
    assert_eq!(
        setting_gamestart(&doc, "victories"),
        Some(Value::Str("SPACERACE".into()))
    );
    assert_eq!(doc.lookup_str(&doc_path::setting(i, "name")), Ok("endspaceship".into()));
    assert_eq!(setting_value(&doc, "endspaceship"), Some(Value::Bool(true)));
}

#[test]
fn test_spacerace_off_leaves_victories_empty() {
    let mut doc = minimal_document(40);
    let i = settings_block::find(&doc, "spacerace").unwrap();
    doc.replace(&doc_path::setting(i, "value"), false);
    let doc = upgrade(doc);
    assert_eq!(setting_value(&doc, "victories"), Some(Value::Str(String::new())));
    assert_eq!(setting_value(&doc, "endspaceship"), Some(Value::Bool(false)));
}

#[test]
fn test_huts_are_rescaled() {
    let doc = upgrade(minimal_document(40));
    assert_eq!(setting_value(&doc, "huts"), Some(Value::Int(150)));
}

#[test]
fn test_killcitizen_bits_become_bool() {
    for (saved, expected) in [
        (Value::Int(1), true),
        (Value::Int(6), false),
        (Value::Str("SEA|LAND".into()), true),
        (Value::Str("SEA".into()), false),
    ] {
        let mut doc = minimal_document(30);
        let i = settings_block::find(&doc, "killcitizen").unwrap();
        doc.replace(&doc_path::setting(i, "value"), saved.clone());
        let doc = upgrade(doc);
        assert_eq!(
            setting_value(&doc, "killcitizen"),
            Some(Value::Bool(expected)),
            "{saved:?}"
        );
    }
}

#[test]
fn test_maxplayers_raised_to_player_count() {
    let mut doc = minimal_document(20);
    doc.replace(&doc_path::players("nplayers"), 4);
    settings_block::append(&mut doc, "maxplayers", 2, None);
    let doc = upgrade(doc);
    assert_eq!(setting_value(&doc, "maxplayers"), Some(Value::Int(4)));
}

#[test]
fn test_both_latitude_switches_replaced_in_place() {
    let mut doc = minimal_document(60);
    settings_block::append(&mut doc, "singlepole", true, Some(Value::Bool(false)));
    let temperate = settings_block::find(&doc, "alltemperate").unwrap();
    let pole = settings_block::find(&doc, "singlepole").unwrap();
    let count = settings_block::count(&doc);

    let doc = upgrade(doc);
    assert_eq!(settings_block::count(&doc), count);
    assert_eq!(settings_block::find(&doc, "northlatitude"), Some(temperate));
    assert_eq!(settings_block::find(&doc, "southlatitude"), Some(pole));
    assert_eq!(setting_value(&doc, "northlatitude"), Some(Value::Int(1000)));
    assert_eq!(setting_value(&doc, "southlatitude"), Some(Value::Int(0)));
    assert_eq!(setting_gamestart(&doc, "southlatitude"), Some(Value::Int(-1000)));
}

#[test]
fn test_lone_latitude_switch_appends_the_other() {
    let mut doc = minimal_document(60);
    let temperate = settings_block::find(&doc, "alltemperate").unwrap();
    doc.replace(&doc_path::setting(temperate, "value"), true);
    let count = settings_block::count(&doc);

    let doc = upgrade(doc);
    assert_eq!(settings_block::count(&doc), count + 1);
    assert_eq!(settings_block::find(&doc, "southlatitude"), Some(count));
    assert_eq!(setting_value(&doc, "northlatitude"), Some(Value::Int(500)));
    assert_eq!(setting_value(&doc, "southlatitude"), Some(Value::Int(500)));
}

#[test]
fn test_missing_switch_follows_ruleset_latitudes() {
    let mut ruleset = Ruleset::classic();
    ruleset.south_latitude = 0;
    let doc = minimal_document(60);
    let (doc, _) = upgrade_document(doc, &ruleset, LoadOptions::default()).unwrap();
    assert_eq!(setting_value(&doc, "northlatitude"), Some(Value::Int(1000)));
    assert_eq!(setting_value(&doc, "southlatitude"), Some(Value::Int(0)));
}

#[test]
fn test_loader_remaps_setting_names_and_values() {
    let mut doc = minimal_document(CURRENT_COMPAT_VERSION);
    settings_block::append(&mut doc, "compresstype", "BZIP2", None);
    settings_block::append(&mut doc, "Barbarians", "NORMAL", None);

    let loaded = load_savegame(doc, &Ruleset::classic(), LoadOptions::default()).unwrap();
    let settings = loaded.world.resource::<ServerSettings>();
    assert_eq!(
        settings.value("compresstype"),
        Some(&SettingValue::Str(CompressionKind::preferred().name().into()))
    );
    assert_eq!(
        settings.value("barbarian_level"),
        Some(&SettingValue::Str("NORMAL".into()))
    );
    assert_eq!(settings.value("diplbulbcost"), Some(&SettingValue::Int(0)));
}
