//! Development stream: saves that already carry the current format version
//! but were written by an earlier development snapshot.

use bevy::prelude::*;

use crate::doc_path;
use crate::load_session::{FormatClass, LoadSession};
use crate::save_error::SaveError;

/// `scenario.game_version` assumed for development saves that lack it.
const DEV_BASELINE_GAME_VERSION: i64 = 3_020_000;

/// First development snapshot that no longer reads `savefile.roads_vector`.
const DEV_ROADS_VECTOR_DROPPED: i64 = 3_029_000;

/// Game version stamped on development saves after this step.
pub(crate) const DEV_GAME_VERSION: i64 = 3_029_100;

pub(super) fn compat_load_dev(
    session: &mut LoadSession,
    _format: FormatClass,
) -> Result<(), SaveError> {
    session.check()?;
    let doc = session.doc_mut();

    let path = doc_path::scenario("game_version");
    let game_version = doc.lookup_int_default(&path, DEV_BASELINE_GAME_VERSION);
    debug!("Development save of game version {game_version}");

    if game_version < DEV_ROADS_VECTOR_DROPPED
        && doc.remove(&doc_path::savefile("roads_vector")).is_some()
    {
        info!("Dropped obsolete roads vector");
    }

    doc.replace(&path, DEV_GAME_VERSION.max(game_version));
    Ok(())
}
