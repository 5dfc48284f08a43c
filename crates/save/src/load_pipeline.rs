//! Top-level entry points: compat, world construction and post-load fixups.

use bevy::prelude::*;

use game::Ruleset;

use crate::compat::{
    build_compat_registry, defer_post_load, run_load_compat, run_load_compat_with,
    run_post_load_compat,
};
use crate::doc_path;
use crate::document::Document;
use crate::load_session::{CompatReport, LoadOptions, LoadSession};
use crate::loader::load_current_format;
use crate::save_error::SaveError;

/// A fully loaded game and what the compat pipeline did to get there.
pub struct LoadedGame {
    pub world: World,
    pub report: CompatReport,
}

/// Migrate `doc` to the current layout and build the game world from it.
///
/// Nothing is returned unless every step succeeded; the first hard failure
/// is the error.
pub fn load_savegame(
    doc: Document,
    ruleset: &Ruleset,
    options: LoadOptions,
) -> Result<LoadedGame, SaveError> {
    let mut session = LoadSession::new(doc, ruleset, options);
    run_load_compat(&mut session);
    if let Some(err) = session.take_failure() {
        return Err(err);
    }

    let mut world = load_current_format(session.doc(), ruleset)?;

    run_post_load_compat(&mut session, &mut world);
    if let Some(err) = session.take_failure() {
        return Err(err);
    }

    let report = session.report().clone();
    info!(
        "Savegame of format version {} loaded ({} load steps, {} post-load steps)",
        report.original_version,
        report.steps_applied.len(),
        report.post_load_applied.len()
    );
    Ok(LoadedGame { world, report })
}

/// Run the load compat steps only and stamp the result with the current
/// format version. A document already at the current version comes back
/// unchanged.
///
/// Post-load steps need a built world, so the ones the original version
/// needed are listed in the document and run by the next `load_savegame`.
pub fn upgrade_document(
    doc: Document,
    ruleset: &Ruleset,
    options: LoadOptions,
) -> Result<(Document, CompatReport), SaveError> {
    let registry = build_compat_registry();
    let mut session = LoadSession::new(doc, ruleset, options);
    run_load_compat_with(&registry, &mut session);
    let stored = session.version();
    if !session.has_failed() && stored < registry.current_version() {
        let doc = session.doc_mut();
        defer_post_load(&registry, stored, doc);
        doc.replace(&doc_path::savefile("version"), registry.current_version());
    }
    session.finish()
}
