//! 2.5.0: unit activities saved by name, roads vector, maxplayers floor.

use bevy::prelude::*;

use super::settings_block;
use crate::doc_path;
use crate::document::{Document, Value};
use crate::load_session::{FormatClass, LoadSession};
use crate::save_error::SaveError;

/// Activity numbering of 2.4 saves. Retired activities are folded into the
/// 2.5 activity that replaced them.
const ACTIVITIES_2_4: [&str; 21] = [
    "Idle",
    "Pollution",
    "Road",
    "Mine",
    "Irrigate",
    "Fortified",
    "Base", // fortress
    "Sentry",
    "Road", // railroad
    "Pillage",
    "Goto",
    "Explore",
    "Transform",
    "Idle", // unknown
    "Base", // airbase
    "Fortifying",
    "Fallout",
    "Idle", // patrol
    "Base",
    "Road", // gen_road
    "Convert",
];

pub(super) fn compat_load_020500(
    session: &mut LoadSession,
    _format: FormatClass,
) -> Result<(), SaveError> {
    session.check()?;
    let doc = session.doc_mut();

    for p in doc.player_slots() {
        convert_unit_activities(doc, p);
    }

    doc.insert(
        &doc_path::savefile("roads_vector"),
        vec!["Road".to_string(), "Railroad".to_string()],
    );

    raise_maxplayers(doc);
    Ok(())
}

fn convert_unit_activities(doc: &mut Document, p: usize) {
    let nunits = doc.lookup_int_default(&doc_path::player(p, "nunits"), 0);
    for u in 0..usize::try_from(nunits).unwrap_or(0) {
        let path = doc_path::unit(p, u, "activity");
        let Ok(old) = doc.lookup_int(&path) else {
            continue;
        };
        let name = match usize::try_from(old).ok().and_then(|i| ACTIVITIES_2_4.get(i)) {
            Some(name) => *name,
            None => {
                error!("{path}: unknown activity number {old}, using Idle");
                "Idle"
            }
        };
        doc.replace(&path, name);
    }
}

/// `maxplayers` may not be lower than the number of players already in the game.
fn raise_maxplayers(doc: &mut Document) {
    let nplayers = doc.lookup_int_default(&doc_path::players("nplayers"), 0);
    let Some(i) = settings_block::find(doc, "maxplayers") else {
        return;
    };
    if let Some(&Value::Int(max)) = settings_block::value(doc, i) {
        if max < nplayers {
            info!("Raising maxplayers from {max} to {nplayers}");
            doc.replace(&doc_path::setting(i, "value"), nplayers);
        }
    }
}
