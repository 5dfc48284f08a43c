// ---------------------------------------------------------------------------
// Compat: bring documents written by older releases up to the current layout
// ---------------------------------------------------------------------------
//
// Loading runs in two phases. Load steps rewrite the raw document before the
// current-format loader sees it. Post-load steps run afterwards on the built
// world, for fixes that need ruleset-resolved units and actions.
//
// Every step whose registry version is greater than the stored version runs
// exactly once, in ascending order. A failing step records its error in the
// session; the remaining steps are still called and return immediately, and
// the caller checks the session once at the end.

mod dev;
mod known_tiles;
mod post_load;
mod registry;
pub(crate) mod settings_block;
mod v2_4;
mod v2_5;
mod v2_6;
mod v3_0;
mod v3_1;
mod v3_2;

#[cfg(test)]
mod tests_historical;
#[cfg(test)]
mod tests_orders;
#[cfg(test)]
mod tests_settings;

use bevy::prelude::*;

pub use registry::{CompatEntry, CompatRegistry, LoadCompatFn, PostLoadCompatFn};

pub(crate) use known_tiles::{
    current_group as known_current_group, words_present as known_words_present, KnownGrid,
};

use crate::doc_path;
use crate::document::{Document, Value};
use crate::load_session::{LoadSession, StrictnessMode};
use crate::save_error::SaveError;

/// Format version written by this build.
pub const CURRENT_COMPAT_VERSION: i64 = 80;

/// `savefile` entry listing post-load steps an upgraded document still needs.
const POST_LOAD_PENDING: &str = "post_load_pending";

/// The registry of every release boundary this build can upgrade across.
pub fn build_compat_registry() -> CompatRegistry {
    CompatRegistry::new(vec![
        CompatEntry::new(3, "2.3.0", None, None),
        CompatEntry::new(20, "2.4.0", Some(v2_4::compat_load_020400), None),
        CompatEntry::new(30, "2.5.0", Some(v2_5::compat_load_020500), None),
        CompatEntry::new(40, "2.6.0", Some(v2_6::compat_load_020600), None),
        CompatEntry::new(50, "3.0.0", Some(v3_0::compat_load_030000), None),
        CompatEntry::new(
            60,
            "3.1.0",
            Some(v3_1::compat_load_030100),
            Some(post_load::compat_post_load_030100),
        ),
        CompatEntry::new(70, "3.2.0", Some(v3_2::compat_load_030200), None),
        CompatEntry::new(CURRENT_COMPAT_VERSION, "3.3.0", None, None),
    ])
}

/// Run every load step the session's document needs.
pub fn run_load_compat(session: &mut LoadSession) {
    run_load_compat_with(&build_compat_registry(), session);
}

/// Run the load steps of `registry`.
pub fn run_load_compat_with(registry: &CompatRegistry, session: &mut LoadSession) {
    if session.check().is_err() {
        return;
    }
    let stored = session.version();
    let current = registry.current_version();

    if stored <= 0 {
        session.fail(SaveError::InvalidVersion(stored));
        return;
    }
    if stored > current {
        match session.options().strictness {
            StrictnessMode::Strict => {
                session.fail(SaveError::VersionMismatch {
                    expected_max: current,
                    found: stored,
                });
                return;
            }
            StrictnessMode::Lenient => {
                warn!(
                    "Savefile format version {stored} is newer than this build ({current}); \
                     trying to load it anyway"
                );
            }
        }
    }

    let format = session.format();
    for entry in registry.pending(stored) {
        let Some(load) = entry.load else {
            continue;
        };
        info!(
            "Run compatibility function for version <{} (save file: {stored}; server: {current})",
            entry.version
        );
        let result = load(session, format);
        if result.is_ok() {
            session.report.steps_applied.push(entry.version);
        }
        session.record(result);
    }

    if session.options().dev_save_compat && stored == current {
        info!("Run compatibility function for development version");
        let result = dev::compat_load_dev(session, format);
        session.record(result);
    }
}

/// Run every post-load step the session's document needed.
pub fn run_post_load_compat(session: &mut LoadSession, world: &mut World) {
    run_post_load_compat_with(&build_compat_registry(), session, world);
}

pub fn run_post_load_compat_with(
    registry: &CompatRegistry,
    session: &mut LoadSession,
    world: &mut World,
) {
    if session.check().is_err() {
        return;
    }
    let stored = session.version();
    let format = session.format();
    let deferred = deferred_post_load(session.doc());
    for entry in registry.post_load_pending(stored, &deferred) {
        let Some(post_load) = entry.post_load else {
            continue;
        };
        info!(
            "Run post load compatibility function for version <{} (save file: {stored})",
            entry.version
        );
        let result = post_load(session, world, format);
        if result.is_ok() {
            session.report.post_load_applied.push(entry.version);
        }
        session.record(result);
    }
}

/// Post-load steps an upgrade left for the next full load to run.
pub(crate) fn deferred_post_load(doc: &Document) -> Vec<i64> {
    doc.lookup_int_vec(&doc_path::savefile(POST_LOAD_PENDING))
        .unwrap_or_default()
}

/// Record the post-load steps a save at `stored` still needs, so that the
/// document can be restamped as current without losing them.
pub(crate) fn defer_post_load(registry: &CompatRegistry, stored: i64, doc: &mut Document) {
    let deferred = deferred_post_load(doc);
    let pending: Vec<i64> = registry
        .post_load_pending(stored, &deferred)
        .map(|entry| entry.version)
        .collect();
    if !pending.is_empty() {
        doc.replace(&doc_path::savefile(POST_LOAD_PENDING), Value::IntVec(pending));
    }
}
