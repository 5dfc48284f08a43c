//! 3.0.0: victories flags, topology/wrap split, huts density, event renames.

use bevy::prelude::*;

use game::map::{Topology, Wrap};

use super::settings_block;
use crate::doc_path;
use crate::document::{Document, Value};
use crate::load_session::{FormatClass, LoadSession};
use crate::save_error::SaveError;

// Topology bits of 2.x saves.
const TF_WRAPX: i64 = 1;
const TF_WRAPY: i64 = 2;
const TF_ISO: i64 = 4;
const TF_HEX: i64 = 8;

/// `huts` became a per-mille density instead of a count per 1000 tiles / 10.
const HUTS_SCALE: i64 = 10;

const EVENT_RENAMES: &[(&str, &str)] = &[
    ("E_UNIT_WIN", "E_UNIT_WIN_DEF"),
    ("E_UNIT_LOSE", "E_UNIT_LOSE_DEF"),
];

pub(super) fn compat_load_030000(
    session: &mut LoadSession,
    _format: FormatClass,
) -> Result<(), SaveError> {
    session.check()?;
    let doc = session.doc_mut();

    convert_spacerace(doc);
    split_topology(doc)?;
    scale_huts(doc);
    rename_events(doc);
    Ok(())
}

fn flag_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Str(s)) => s
            .split('|')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn with_spacerace(mut flags: Vec<String>, spacerace: bool) -> String {
    let present = flags.iter().any(|f| f.eq_ignore_ascii_case("SPACERACE"));
    if spacerace && !present {
        flags.push("SPACERACE".to_string());
    }
    flags.join("|")
}

/// The `spacerace` bool becomes the SPACERACE flag of `victories`, and the
/// separate `endspaceship` setting takes over its old "game ends on arrival"
/// meaning.
fn convert_spacerace(doc: &mut Document) {
    let Some(sr) = settings_block::find(doc, "spacerace") else {
        return;
    };
    let as_bool = |v: Option<&Value>| match v {
        Some(Value::Bool(b)) => Some(*b),
        _ => None,
    };
    let value = as_bool(settings_block::value(doc, sr)).unwrap_or(false);
    let gamestart = as_bool(settings_block::gamestart(doc, sr));

    match settings_block::find(doc, "victories") {
        Some(v) => {
            let merged = with_spacerace(flag_list(settings_block::value(doc, v)), value);
            doc.replace(&doc_path::setting(v, "value"), merged);
            if let Some(gs) = gamestart {
                let merged = with_spacerace(flag_list(settings_block::gamestart(doc, v)), gs);
                doc.replace(&doc_path::setting(v, "gamestart"), merged);
            }
            doc.replace(&doc_path::setting(sr, "name"), "endspaceship");
        }
        None => {
            doc.replace(&doc_path::setting(sr, "name"), "victories");
            doc.replace(&doc_path::setting(sr, "value"), with_spacerace(Vec::new(), value));
            if let Some(gs) = gamestart {
                doc.replace(
                    &doc_path::setting(sr, "gamestart"),
                    with_spacerace(Vec::new(), gs),
                );
            }
            settings_block::append(doc, "endspaceship", value, gamestart.map(Value::Bool));
        }
    }
}

/// Decode a 2.x topology value: a bitmask, or bit names joined by '|'.
fn topology_bits(path: &str, value: &Value) -> Result<i64, SaveError> {
    match value {
        Value::Int(bits) => Ok(*bits),
        Value::Str(names) => Ok(names
            .split('|')
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(|n| match n.to_ascii_uppercase().as_str() {
                "WRAPX" => TF_WRAPX,
                "WRAPY" => TF_WRAPY,
                "ISO" => TF_ISO,
                "HEX" => TF_HEX,
                other => {
                    warn!("{path}: ignoring unknown topology flag {other}");
                    0
                }
            })
            .fold(0, |acc, bit| acc | bit)),
        _ => Err(SaveError::WrongType {
            path: path.to_string(),
            expected: "int",
        }),
    }
}

fn split_bits(bits: i64) -> (Topology, Wrap) {
    (
        Topology {
            iso: bits & TF_ISO != 0,
            hex: bits & TF_HEX != 0,
        },
        Wrap {
            wrap_x: bits & TF_WRAPX != 0,
            wrap_y: bits & TF_WRAPY != 0,
        },
    )
}

/// One `topology` bitmask becomes `topology` (ISO/HEX) plus `wrap` (WrapX/WrapY).
fn split_topology(doc: &mut Document) -> Result<(), SaveError> {
    let Some(i) = settings_block::find(doc, "topology") else {
        return Ok(());
    };
    if settings_block::find(doc, "wrap").is_some() {
        return Ok(());
    }

    let value_path = doc_path::setting(i, "value");
    let Some(value) = doc.lookup(&value_path) else {
        return Err(SaveError::MissingField(value_path));
    };
    let (topology, wrap) = split_bits(topology_bits(&value_path, value)?);

    let gamestart_path = doc_path::setting(i, "gamestart");
    let gamestart = match doc.lookup(&gamestart_path) {
        Some(gs) => Some(split_bits(topology_bits(&gamestart_path, gs)?)),
        None => None,
    };

    doc.replace(&value_path, topology.to_setting());
    if let Some((gs_topology, _)) = gamestart {
        doc.replace(&gamestart_path, gs_topology.to_setting());
    }
    settings_block::append(
        doc,
        "wrap",
        wrap.to_setting(),
        gamestart.map(|(_, gs_wrap)| Value::Str(gs_wrap.to_setting())),
    );
    Ok(())
}

fn scale_huts(doc: &mut Document) {
    let Some(i) = settings_block::find(doc, "huts") else {
        return;
    };
    for key in ["value", "gamestart"] {
        let path = doc_path::setting(i, key);
        if let Ok(huts) = doc.lookup_int(&path) {
            doc.replace(&path, huts.saturating_mul(HUTS_SCALE));
        }
    }
}

fn rename_events(doc: &mut Document) {
    let count = doc.lookup_int_default(&doc_path::event_cache("count"), 0);
    for e in 0..usize::try_from(count).unwrap_or(0) {
        let path = doc_path::event(e, "event");
        let Ok(name) = doc.lookup_str(&path) else {
            continue;
        };
        if let Some((_, new)) = EVENT_RENAMES
            .iter()
            .find(|(old, _)| old.eq_ignore_ascii_case(&name))
        {
            doc.replace(&path, *new);
        }
    }
}
