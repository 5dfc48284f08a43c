//! 2.6.0: killcitizen as a bool, got_first_city, research records, trait
//! groups, turns_alive.

use bevy::prelude::*;

use game::config::GAME_DEFAULT_TEAM_POOLED_RESEARCH;

use super::settings_block;
use crate::doc_path;
use crate::document::{Document, Value};
use crate::load_session::{FormatClass, LoadSession};
use crate::save_error::SaveError;

/// Trait value assumed when a 2.5 save omits it.
const TRAIT_DEFAULT_VALUE: i64 = 50;

pub(super) fn compat_load_020600(
    session: &mut LoadSession,
    _format: FormatClass,
) -> Result<(), SaveError> {
    session.check()?;
    let doc = session.doc_mut();

    convert_killcitizen(doc);

    let turn = doc.lookup_int_default(&doc_path::game("turn"), 0);
    for p in doc.player_slots() {
        let got_first_city = match doc.remove(&doc_path::player(p, "capital")) {
            Some(Value::Bool(b)) => b,
            _ => false,
        };
        doc.insert(&doc_path::player(p, "got_first_city"), got_first_city);
        doc.insert(&doc_path::player(p, "turns_alive"), turn);
        convert_traits(doc, p)?;
    }

    move_research(doc);
    Ok(())
}

/// `killcitizen` used to be a set of unit class flags; only the first one
/// (land units) survives, as a plain on/off switch.
fn convert_killcitizen(doc: &mut Document) {
    let Some(i) = settings_block::find(doc, "killcitizen") else {
        return;
    };
    for key in ["value", "gamestart"] {
        let path = doc_path::setting(i, key);
        let enabled = match doc.lookup(&path) {
            Some(Value::Int(bits)) => bits & 1 != 0,
            Some(Value::Str(names)) => names
                .split('|')
                .any(|n| n.trim().eq_ignore_ascii_case("LAND")),
            _ => continue,
        };
        doc.replace(&path, enabled);
    }
}

/// `trait.count`, `trait.valN`, `trait.modN` become `ntraits` and `traitN.{val,mod}`.
fn convert_traits(doc: &mut Document, p: usize) -> Result<(), SaveError> {
    let Some(Value::Int(count)) = doc.remove(&doc_path::player(p, "trait.count")) else {
        return Ok(());
    };
    let count = usize::try_from(count).unwrap_or(0);
    for t in 0..count {
        let val = match doc.remove(&doc_path::player(p, &format!("trait.val{t}"))) {
            Some(Value::Int(v)) => v,
            _ => TRAIT_DEFAULT_VALUE,
        };
        let mod_path = doc_path::player(p, &format!("trait.mod{t}"));
        let modifier = doc.lookup_int(&mod_path)?;
        doc.remove(&mod_path);
        doc.replace(&doc_path::player_trait(p, t, "val"), val);
        doc.replace(&doc_path::player_trait(p, t, "mod"), modifier);
    }
    doc.replace(&doc_path::player(p, "ntraits"), count);
    Ok(())
}

/// Per-player research state moves to `research.rN` records, one per player
/// or one per team when research was pooled.
fn move_research(doc: &mut Document) {
    if doc.contains(&doc_path::research("count")) {
        return;
    }
    let pooled = settings_block::bool_value(doc, "team_pooled_research")
        .unwrap_or(GAME_DEFAULT_TEAM_POOLED_RESEARCH);

    let mut written: Vec<i64> = Vec::new();
    for p in doc.player_slots() {
        let player_no = i64::try_from(p).unwrap_or(i64::MAX);
        let team = doc.lookup_int_default(&doc_path::player(p, "team_no"), player_no);
        let number = if pooled { team } else { player_no };

        let researching = doc.remove(&doc_path::player(p, "researching"));
        let bulbs = doc.remove(&doc_path::player(p, "bulbs"));
        let techs = doc.remove(&doc_path::player(p, "techs"));
        if written.contains(&number) {
            continue;
        }

        let r = written.len();
        doc.replace(&doc_path::research_record(r, "number"), number);
        doc.replace(
            &doc_path::research_record(r, "researching"),
            researching.unwrap_or_else(|| Value::from("None")),
        );
        doc.replace(
            &doc_path::research_record(r, "bulbs"),
            bulbs.unwrap_or(Value::Int(0)),
        );
        doc.replace(
            &doc_path::research_record(r, "techs"),
            techs.unwrap_or(Value::Int(0)),
        );
        written.push(number);
    }
    debug!("Moved research of {} tracks", written.len());
    doc.replace(&doc_path::research("count"), written.len());
}
