//! 3.2.0: map latitudes, action and agent renames, cleaning activities,
//! specialists vector.

use bevy::prelude::*;

use game::config::{MAP_MAX_LATITUDE, MAP_MIN_LATITUDE, MAP_TEMPERATE_LATITUDE};
use game::{Activity, Ruleset};

use super::settings_block;
use crate::doc_path;
use crate::document::{Document, Value};
use crate::load_session::{FormatClass, LoadSession};
use crate::save_error::SaveError;

const ACTION_RENAMES: &[(&str, &str)] = &[
    ("Clean Pollution", "Clean"),
    ("Clean Fallout", "Clean"),
    ("Conquer City", "Conquer City Shrink"),
    ("Conquer City 2", "Conquer City Shrink 2"),
    ("Conquer City 3", "Conquer City Shrink 3"),
    ("Conquer City 4", "Conquer City Shrink 4"),
];

const SSA_RENAMES: &[(&str, &str)] = &[("Auto Worker", "Autoworker")];

/// Activity names and order letters of the two retired cleaning activities.
const CLEANING_ACTIVITIES: [&str; 2] = ["Pollution", "Fallout"];
const CLEANING_LETTERS: [char; 2] = ['p', 'F'];

pub(super) fn compat_load_030200(
    session: &mut LoadSession,
    _format: FormatClass,
) -> Result<(), SaveError> {
    session.check()?;
    let ruleset = session.ruleset();
    let canonical_actions = session.canonical_action_vector;
    let doc = session.doc_mut();

    convert_latitudes(doc, ruleset);

    if canonical_actions {
        debug!("Action vector already in current order, skipping action renames");
    } else {
        rename_vector_entries(doc, &doc_path::savefile("action_vector"), ACTION_RENAMES);
    }
    rename_vector_entries(doc, &doc_path::savefile("ssa_vector"), SSA_RENAMES);

    for p in doc.player_slots() {
        convert_cleaning(doc, p);
    }

    doc.insert(
        &doc_path::savefile("specialists_vector"),
        ruleset.specialists.clone(),
    );
    Ok(())
}

/// Latitudes the legacy switches describe.
fn latitudes(alltemperate: bool, singlepole: bool) -> (i64, i64) {
    if alltemperate {
        (MAP_TEMPERATE_LATITUDE, MAP_TEMPERATE_LATITUDE)
    } else if singlepole {
        (MAP_MAX_LATITUDE, 0)
    } else {
        (MAP_MAX_LATITUDE, MAP_MIN_LATITUDE)
    }
}

fn bool_of(value: Option<&Value>) -> Option<bool> {
    match value {
        Some(Value::Bool(b)) => Some(*b),
        _ => None,
    }
}

/// `alltemperate` and `singlepole` become `northlatitude` and
/// `southlatitude`. A switch missing from the save takes the value the
/// ruleset's map bounds imply; when only one switch was saved, the other
/// latitude is appended to the settings.
fn convert_latitudes(doc: &mut Document, ruleset: &Ruleset) {
    let temperate = settings_block::find(doc, "alltemperate");
    let pole = settings_block::find(doc, "singlepole");
    if temperate.is_none() && pole.is_none() {
        return;
    }

    let read = |doc: &Document, i: Option<usize>, default: bool| {
        let value = i
            .and_then(|i| bool_of(settings_block::value(doc, i)))
            .unwrap_or(default);
        let gamestart = i.and_then(|i| bool_of(settings_block::gamestart(doc, i)));
        (value, gamestart)
    };
    let (alltemperate, alltemperate_gs) = read(&*doc, temperate, ruleset.all_temperate());
    let (singlepole, singlepole_gs) = read(&*doc, pole, ruleset.single_pole());

    let (north, south) = latitudes(alltemperate, singlepole);
    let gamestart = (alltemperate_gs.is_some() || singlepole_gs.is_some()).then(|| {
        latitudes(
            alltemperate_gs.unwrap_or(alltemperate),
            singlepole_gs.unwrap_or(singlepole),
        )
    });

    write_latitude(doc, temperate, "northlatitude", north, gamestart.map(|(n, _)| n));
    write_latitude(doc, pole, "southlatitude", south, gamestart.map(|(_, s)| s));
    info!("Map latitudes set to {north}..{south}");
}

fn write_latitude(
    doc: &mut Document,
    slot: Option<usize>,
    name: &str,
    value: i64,
    gamestart: Option<i64>,
) {
    match slot {
        Some(i) => {
            doc.replace(&doc_path::setting(i, "name"), name);
            doc.replace(&doc_path::setting(i, "value"), value);
            if let Some(gs) = gamestart {
                doc.replace(&doc_path::setting(i, "gamestart"), gs);
            }
        }
        None => {
            settings_block::append(doc, name, value, gamestart.map(Value::Int));
        }
    }
}

fn rename_vector_entries(doc: &mut Document, path: &str, renames: &[(&str, &str)]) {
    let Ok(mut names) = doc.lookup_str_vec(path) else {
        return;
    };
    let mut changed = false;
    for name in names.iter_mut() {
        if let Some((_, new)) = renames.iter().find(|(old, _)| old.eq_ignore_ascii_case(name)) {
            *name = new.to_string();
            changed = true;
        }
    }
    if changed {
        doc.replace(path, names);
    }
}

/// Pollution and fallout cleaning merged into one `Clean` activity.
fn convert_cleaning(doc: &mut Document, p: usize) {
    let nunits = doc.lookup_int_default(&doc_path::player(p, "nunits"), 0);
    for u in 0..usize::try_from(nunits).unwrap_or(0) {
        let path = doc_path::unit(p, u, "activity");
        if doc
            .lookup_str(&path)
            .is_ok_and(|a| CLEANING_ACTIVITIES.iter().any(|c| c.eq_ignore_ascii_case(&a)))
        {
            doc.replace(&path, Activity::Clean.name());
        }

        let list_path = doc_path::unit(p, u, "activity_list");
        if let Ok(list) = doc.lookup_str(&list_path) {
            if list.contains(CLEANING_LETTERS) {
                let clean = Activity::Clean.to_char();
                let list: String = list
                    .chars()
                    .map(|c| if CLEANING_LETTERS.contains(&c) { clean } else { c })
                    .collect();
                doc.replace(&list_path, list);
            }
        }
    }
}
