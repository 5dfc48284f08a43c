//! 2.4.0: per-player AI type, city citizen nationality, known-tile rows.

use bevy::prelude::*;

use game::config::DEFAULT_AI_TYPE;

use super::known_tiles;
use crate::doc_path;
use crate::document::Document;
use crate::load_session::{FormatClass, LoadSession};
use crate::save_error::SaveError;

pub(super) fn compat_load_020400(
    session: &mut LoadSession,
    _format: FormatClass,
) -> Result<(), SaveError> {
    session.check()?;
    let doc = session.doc_mut();

    for p in doc.player_slots() {
        if doc.insert(&doc_path::player(p, "ai_type"), DEFAULT_AI_TYPE) {
            debug!("player{p}: AI type set to {DEFAULT_AI_TYPE}");
        }
        add_citizen_nationality(doc, p);
    }

    known_tiles::upgrade_known_rows(doc)
}

/// Cities get their whole population as citizens of the owner's nationality.
fn add_citizen_nationality(doc: &mut Document, p: usize) {
    let ncities = doc.lookup_int_default(&doc_path::player(p, "ncities"), 0);
    for c in 0..usize::try_from(ncities).unwrap_or(0) {
        let size = doc.lookup_int_default(&doc_path::city(p, c, "size"), 0);
        if size > 0 {
            doc.insert(&doc_path::city(p, c, &format!("citizen{p}")), size);
        }
    }
}
