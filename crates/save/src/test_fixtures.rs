//! Documents shaped the way each historical release wrote them.

use game::player::DiplStateType;
use game::{Action, ServerSideAgent};

use crate::compat::{settings_block, KnownGrid};
use crate::doc_path;
use crate::document::{Document, Value};

pub(crate) const MAP_WIDTH: usize = 6;
pub(crate) const MAP_HEIGHT: usize = 4;

/// Smallest document of format `version` that still exercises every step:
/// one player with one city, one unit and one research track, a few
/// settings and one cached event, all in the layout of the release that
/// wrote `version`.
pub(crate) fn minimal_document(version: i64) -> Document {
    let mut doc = Document::new();
    doc.replace(&doc_path::savefile("version"), version);
    doc.replace(&doc_path::savefile("options"), "+version2");
    doc.replace(&doc_path::scenario("save_players"), true);
    doc.replace(&doc_path::game("turn"), 12);
    doc.replace(&doc_path::map("width"), MAP_WIDTH);
    doc.replace(&doc_path::map("height"), MAP_HEIGHT);
    doc.replace(&doc_path::players("nplayers"), 1);

    add_player(&mut doc, version, 0);
    add_settings(&mut doc, version);
    add_event(&mut doc, version);

    if version >= 30 {
        doc.replace(
            &doc_path::savefile("roads_vector"),
            vec!["Road".to_string(), "Railroad".to_string()],
        );
    }
    if version >= 60 {
        let ssa: Vec<String> = ServerSideAgent::ALL
            .iter()
            .map(|s| match s {
                ServerSideAgent::Autoworker if version < 70 => "Auto Worker".to_string(),
                other => other.name().to_string(),
            })
            .collect();
        doc.replace(&doc_path::savefile("action_vector"), Action::canonical_names());
        doc.replace(&doc_path::savefile("ssa_vector"), ssa);
        doc.replace(
            &doc_path::savefile("ds_t_vector"),
            DiplStateType::ALL
                .iter()
                .map(|d| d.name().to_string())
                .collect::<Vec<_>>(),
        );
    }
    if version >= 70 {
        doc.replace(
            &doc_path::savefile("specialists_vector"),
            vec!["elvis".to_string(), "scientist".to_string(), "taxman".to_string()],
        );
    }
    doc
}

fn add_player(doc: &mut Document, version: i64, p: usize) {
    doc.replace(&doc_path::player(p, "name"), format!("Leader {p}"));
    doc.replace(&doc_path::player(p, "team_no"), p);
    if version >= 20 {
        doc.replace(&doc_path::player(p, "ai_type"), "classic");
    }
    if version >= 40 {
        doc.replace(&doc_path::player(p, "got_first_city"), true);
        doc.replace(&doc_path::player(p, "turns_alive"), 12);
        doc.replace(&doc_path::research("count"), 1);
        doc.replace(&doc_path::research_record(0, "number"), p);
        doc.replace(&doc_path::research_record(0, "researching"), "Bronze Working");
        doc.replace(&doc_path::research_record(0, "bulbs"), 7);
        doc.replace(&doc_path::research_record(0, "techs"), 3);
    } else {
        doc.replace(&doc_path::player(p, "capital"), true);
        doc.replace(&doc_path::player(p, "researching"), "Bronze Working");
        doc.replace(&doc_path::player(p, "bulbs"), 7);
        doc.replace(&doc_path::player(p, "techs"), 3);
    }
    doc.replace(&doc_path::diplstate(p, p, "type"), 6);
    doc.replace(&doc_path::diplstate(p, p, "first_contact_turn"), 0);

    doc.replace(&doc_path::player(p, "ncities"), 1);
    doc.replace(&doc_path::city(p, 0, "id"), 101);
    doc.replace(&doc_path::city(p, 0, "name"), "Capital");
    doc.replace(&doc_path::city(p, 0, "x"), 2);
    doc.replace(&doc_path::city(p, 0, "y"), 1);
    doc.replace(&doc_path::city(p, 0, "size"), 5);
    doc.replace(&doc_path::city(p, 0, "turn_founded"), 3);
    doc.replace(&doc_path::city(p, 0, "turn_last_built"), -2);
    if version >= 20 {
        doc.replace(&doc_path::city(p, 0, &format!("citizen{p}")), 5);
    }

    doc.replace(&doc_path::player(p, "nunits"), 1);
    doc.replace(&doc_path::unit(p, 0, "id"), 201);
    doc.replace(&doc_path::unit(p, 0, "x"), 3);
    doc.replace(&doc_path::unit(p, 0, "y"), 2);
    doc.replace(&doc_path::unit(p, 0, "type"), "Workers");
    doc.replace(&doc_path::unit(p, 0, "birth_turn"), 2);
    if version >= 30 {
        doc.replace(&doc_path::unit(p, 0, "activity"), "Idle");
    } else {
        doc.replace(&doc_path::unit(p, 0, "activity"), 0);
    }
}

fn add_settings(doc: &mut Document, version: i64) {
    if version >= 50 {
        settings_block::append(doc, "topology", "ISO", None);
        settings_block::append(doc, "wrap", "WrapX", None);
        settings_block::append(doc, "victories", "SPACERACE", None);
        settings_block::append(doc, "endspaceship", true, None);
        settings_block::append(doc, "huts", 150, None);
    } else {
        settings_block::append(doc, "topology", 5, Some(Value::Int(5)));
        settings_block::append(doc, "spacerace", true, None);
        settings_block::append(doc, "huts", 15, None);
    }
    if version >= 40 {
        settings_block::append(doc, "killcitizen", true, None);
    } else {
        settings_block::append(doc, "killcitizen", 1, None);
    }
    if version >= 70 {
        settings_block::append(doc, "northlatitude", 1000, None);
        settings_block::append(doc, "southlatitude", -1000, None);
    } else {
        settings_block::append(doc, "alltemperate", false, None);
    }
    settings_block::append(doc, "diplcost", 0, None);
}

fn add_event(doc: &mut Document, version: i64) {
    let name = if version >= 50 {
        "E_UNIT_WIN_DEF"
    } else {
        "E_UNIT_WIN"
    };
    doc.replace(&doc_path::event_cache("count"), 1);
    doc.replace(&doc_path::event(0, "event"), name);
    doc.replace(&doc_path::event(0, "message"), "Your Warriors survived.");
    doc.replace(&doc_path::event(0, "turn"), 11);
    doc.replace(&doc_path::event(0, "server_state"), 1);
    doc.replace(&doc_path::event(0, "target_type"), "All");
}

/// Give unit `u` of player `p` saved orders. `actions` are indices into the
/// save's action vector, -1 for none.
pub(crate) fn set_unit_orders(
    doc: &mut Document,
    p: usize,
    u: usize,
    orders: &str,
    dirs: &str,
    activities: &str,
    actions: Vec<i64>,
) {
    doc.replace(&doc_path::unit(p, u, "orders_length"), orders.chars().count());
    doc.replace(&doc_path::unit(p, u, "orders_index"), 0);
    doc.replace(&doc_path::unit(p, u, "orders_repeat"), false);
    doc.replace(&doc_path::unit(p, u, "orders_vigilant"), false);
    doc.replace(&doc_path::unit(p, u, "orders_list"), orders);
    doc.replace(&doc_path::unit(p, u, "dir_list"), dirs);
    doc.replace(&doc_path::unit(p, u, "activity_list"), activities);
    doc.replace(&doc_path::unit(p, u, "action_vec"), Value::IntVec(actions));
}

/// Add players `0..nplayers` with just the fields every era requires.
pub(crate) fn add_bare_players(doc: &mut Document, nplayers: usize) {
    for p in 0..nplayers {
        doc.replace(&doc_path::player(p, "name"), format!("Leader {p}"));
    }
    doc.replace(&doc_path::players("nplayers"), nplayers);
}

/// Write `grid` the way 2.3.0/2.3.1 did: group (j, l) under `l * words + j`.
pub(crate) fn write_transposed_known_rows(doc: &mut Document, grid: &KnownGrid) {
    let words = grid.words_per_tile;
    for j in 0..words {
        for l in 0..8 {
            for y in 0..grid.height {
                let row: String = (0..grid.width)
                    .map(|x| {
                        let tile = y * grid.width + x;
                        let nibble: u32 = (0..4)
                            .filter(|b| grid.is_known(tile, j * 32 + l * 4 + b))
                            .map(|b| 1u32 << b)
                            .sum();
                        char::from_digit(nibble, 16).unwrap()
                    })
                    .collect();
                doc.replace(&doc_path::known_row(l * words + j, y), row);
            }
        }
    }
}
