//! 3.1.0: inclusive turn numbering, explicit enumeration vectors, order
//! sub targets, Transport Alight split.

use bevy::prelude::*;

use game::config::{CITY_TURN_UNSET, FIRST_CONTACT_UNSET, UNIT_BIRTH_TURN_UNSET};
use game::player::DiplStateType;
use game::{Action, ServerSideAgent};

use crate::doc_path;
use crate::document::{Document, Value};
use crate::load_session::{FormatClass, LoadSession};
use crate::save_error::SaveError;

const TRANSPORT_ALIGHT: &str = "Transport Alight";

pub(super) fn compat_load_030100(
    session: &mut LoadSession,
    format: FormatClass,
) -> Result<(), SaveError> {
    session.check()?;

    if session
        .doc()
        .lookup_bool_default(&doc_path::scenario("save_players"), true)
    {
        shift_turns(session.doc_mut());
    }

    let action_vector = doc_path::savefile("action_vector");
    if !session.doc().contains(&action_vector) {
        session
            .doc_mut()
            .insert(&action_vector, Action::canonical_names());
        session.canonical_action_vector = true;
    }

    let doc = session.doc_mut();
    doc.insert(
        &doc_path::savefile("ssa_vector"),
        ServerSideAgent::ALL
            .iter()
            .map(|s| s.name().to_string())
            .collect::<Vec<_>>(),
    );
    doc.insert(
        &doc_path::savefile("ds_t_vector"),
        DiplStateType::ALL
            .iter()
            .map(|d| d.name().to_string())
            .collect::<Vec<_>>(),
    );

    if format == FormatClass::Savegame3 {
        for p in doc.player_slots() {
            for u in 0..unit_count(doc, p) {
                doc.rename(
                    &doc_path::unit(p, u, "tgt_vec"),
                    &doc_path::unit(p, u, "sub_tgt_vec"),
                );
            }
        }
    }

    split_transport_alight(doc)?;
    Ok(())
}

fn unit_count(doc: &Document, p: usize) -> usize {
    usize::try_from(doc.lookup_int_default(&doc_path::player(p, "nunits"), 0)).unwrap_or(0)
}

fn city_count(doc: &Document, p: usize) -> usize {
    usize::try_from(doc.lookup_int_default(&doc_path::player(p, "ncities"), 0)).unwrap_or(0)
}

/// Add one to `path` unless it is missing or still holds `unset`.
fn bump_turn(doc: &mut Document, path: &str, unset: i64) {
    if let Ok(turn) = doc.lookup_int(path) {
        if turn != unset {
            doc.replace(path, turn + 1);
        }
    }
}

/// Turns used to be counted from zero. Every recorded turn number moves up
/// by one; fields still at their never-set value stay as they are.
fn shift_turns(doc: &mut Document) {
    if let Ok(turn) = doc.lookup_int(&doc_path::game("turn")) {
        doc.replace(&doc_path::game("turn"), turn + 1);
    }

    for p in doc.player_slots() {
        for c in 0..city_count(doc, p) {
            bump_turn(doc, &doc_path::city(p, c, "turn_founded"), CITY_TURN_UNSET);
            bump_turn(doc, &doc_path::city(p, c, "turn_last_built"), CITY_TURN_UNSET);
        }
        for u in 0..unit_count(doc, p) {
            bump_turn(doc, &doc_path::unit(p, u, "birth_turn"), UNIT_BIRTH_TURN_UNSET);
        }

        let section = doc_path::player_section(p);
        for entry in doc.entry_names(&section) {
            if entry.starts_with("diplstate") && entry.ends_with(".first_contact_turn") {
                bump_turn(doc, &format!("{section}.{entry}"), FIRST_CONTACT_UNSET);
            }
        }
    }
}

/// "Transport Alight" became two actions. Orders without a direction alight
/// where the unit stands ("Transport Deboard"); directed ones step off onto
/// the next tile ("Transport Disembark").
fn split_transport_alight(doc: &mut Document) -> Result<(), SaveError> {
    let path = doc_path::savefile("action_vector");
    let Ok(mut names) = doc.lookup_str_vec(&path) else {
        return Ok(());
    };
    let Some(alight) = names
        .iter()
        .position(|n| n.eq_ignore_ascii_case(TRANSPORT_ALIGHT))
    else {
        return Ok(());
    };

    names[alight] = Action::TransportDeboard.rule_name().to_string();
    let disembark = match names
        .iter()
        .position(|n| n.eq_ignore_ascii_case(Action::TransportDisembark.rule_name()))
    {
        Some(existing) => existing,
        None => {
            names.push(Action::TransportDisembark.rule_name().to_string());
            names.len() - 1
        }
    };
    doc.replace(&path, names);

    let (Ok(alight), Ok(disembark)) = (i64::try_from(alight), i64::try_from(disembark)) else {
        return Err(SaveError::Structural(format!("{path} is too long")));
    };

    let mut moved = 0;
    for p in doc.player_slots() {
        for u in 0..unit_count(doc, p) {
            let vec_path = doc_path::unit(p, u, "action_vec");
            let Ok(mut actions) = doc.lookup_int_vec(&vec_path) else {
                continue;
            };
            let dirs = doc.lookup_str_default(&doc_path::unit(p, u, "dir_list"), String::new());
            let mut changed = false;
            for (action, dir) in actions.iter_mut().zip(dirs.chars()) {
                if *action == alight && dir != '?' {
                    *action = disembark;
                    changed = true;
                    moved += 1;
                }
            }
            if changed {
                doc.replace(&vec_path, Value::IntVec(actions));
            }
        }
    }
    if moved > 0 {
        debug!("{moved} directed Transport Alight orders became Transport Disembark");
    }
    Ok(())
}
