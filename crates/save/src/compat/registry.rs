// ---------------------------------------------------------------------------
// Compat registry: ordered table of per-release compatibility steps
// ---------------------------------------------------------------------------
//
// Each entry names the format version that introduced a release's layout.
// A save whose stored version is lower than an entry's version needs that
// entry's steps. The registry validates at construction time that versions
// are unique and ascending, and that the table ends in the no-op entry for
// the current version.

use bevy::prelude::*;

use crate::load_session::{FormatClass, LoadSession};
use crate::save_error::SaveError;

/// Rewrites the raw document.
pub type LoadCompatFn = fn(&mut LoadSession, FormatClass) -> Result<(), SaveError>;

/// Fixes objects after the current-format loader has built the world.
pub type PostLoadCompatFn = fn(&mut LoadSession, &mut World, FormatClass) -> Result<(), SaveError>;

#[derive(Clone, Copy)]
pub struct CompatEntry {
    pub version: i64,
    pub release: &'static str,
    pub load: Option<LoadCompatFn>,
    pub post_load: Option<PostLoadCompatFn>,
}

impl CompatEntry {
    pub const fn new(
        version: i64,
        release: &'static str,
        load: Option<LoadCompatFn>,
        post_load: Option<PostLoadCompatFn>,
    ) -> Self {
        Self {
            version,
            release,
            load,
            post_load,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.load.is_none() && self.post_load.is_none()
    }
}

impl std::fmt::Debug for CompatEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompatEntry")
            .field("version", &self.version)
            .field("release", &self.release)
            .field("load", &self.load.is_some())
            .field("post_load", &self.post_load.is_some())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct CompatRegistry {
    entries: Vec<CompatEntry>,
}

impl CompatRegistry {
    /// Build a registry from a table of entries.
    ///
    /// # Panics
    ///
    /// Panics if:
    /// - two entries share a version
    /// - the entries are not in ascending version order
    /// - the table is empty or its last entry has steps (it must be the
    ///   no-op entry of the current version)
    pub fn new(entries: Vec<CompatEntry>) -> Self {
        let mut seen = std::collections::HashSet::new();
        for entry in &entries {
            assert!(
                seen.insert(entry.version),
                "Duplicate compat step for version {}",
                entry.version
            );
        }

        for pair in entries.windows(2) {
            assert!(
                pair[0].version < pair[1].version,
                "Compat steps out of order: version {} is listed before {}",
                pair[0].version,
                pair[1].version
            );
        }

        match entries.last() {
            Some(last) => assert!(
                last.is_noop(),
                "Last compat entry (version {}) must be the no-op entry of the current version",
                last.version
            ),
            None => panic!("Compat registry needs at least the current version entry"),
        }

        Self { entries }
    }

    /// The highest version this registry can load.
    pub fn current_version(&self) -> i64 {
        self.entries.last().map_or(0, |e| e.version)
    }

    pub fn entries(&self) -> &[CompatEntry] {
        &self.entries
    }

    /// Entries a save at `stored_version` needs, ascending.
    pub fn pending(&self, stored_version: i64) -> impl Iterator<Item = &CompatEntry> {
        self.entries
            .iter()
            .filter(move |e| e.version > stored_version)
    }

    /// Entries with a post-load step a save at `stored_version` needs,
    /// including steps an earlier upgrade deferred.
    pub fn post_load_pending<'a>(
        &'a self,
        stored_version: i64,
        deferred: &'a [i64],
    ) -> impl Iterator<Item = &'a CompatEntry> {
        self.entries.iter().filter(move |e| {
            e.post_load.is_some()
                && (e.version > stored_version || deferred.contains(&e.version))
        })
    }
}
