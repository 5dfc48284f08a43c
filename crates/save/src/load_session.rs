// ---------------------------------------------------------------------------
// LoadSession: state owned by one savegame load
// ---------------------------------------------------------------------------
//
// The session owns the document while compat steps rewrite it and records
// the first hard failure. Steps call `check()` first and return early once a
// failure is recorded, so the dispatcher can call every remaining step
// without guarding each call.

use bevy::prelude::*;

use game::ruleset::Ruleset;

use crate::doc_path;
use crate::document::Document;
use crate::save_error::SaveError;

/// How to treat a save whose format version is newer than this build knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrictnessMode {
    /// Refuse the save.
    #[default]
    Strict,
    /// Log a warning and try to load it anyway.
    Lenient,
}

/// The two top-level document layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatClass {
    Savegame2,
    Savegame3,
}

impl FormatClass {
    /// Saves written with the `version3` capability use the newer layout.
    pub fn detect(doc: &Document) -> Self {
        if has_capability(doc, "version3") {
            FormatClass::Savegame3
        } else {
            FormatClass::Savegame2
        }
    }
}

/// Whether `savefile.options` lists `cap`. Capabilities are stored
/// space-separated, optionally prefixed with '+'.
pub fn has_capability(doc: &Document, cap: &str) -> bool {
    doc.lookup_str_default(&doc_path::savefile("options"), String::new())
        .split_whitespace()
        .map(|c| c.trim_start_matches('+'))
        .any(|c| c.eq_ignore_ascii_case(cap))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadOptions {
    pub strictness: StrictnessMode,
    /// Force a format class instead of detecting it from the capabilities.
    pub format: Option<FormatClass>,
    /// Also run the development-stream step on saves at the current version.
    pub dev_save_compat: bool,
}

/// What the compat pipeline did to a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompatReport {
    pub original_version: i64,
    /// Registry versions whose load step ran, in order.
    pub steps_applied: Vec<i64>,
    /// Registry versions whose post-load step ran, in order.
    pub post_load_applied: Vec<i64>,
}

pub struct LoadSession<'r> {
    doc: Document,
    ruleset: &'r Ruleset,
    options: LoadOptions,
    version: i64,
    format: FormatClass,
    failure: Option<SaveError>,
    /// The action vector was written by a step using the current canonical
    /// order, so later renames of historical action names must be skipped.
    pub(crate) canonical_action_vector: bool,
    pub(crate) report: CompatReport,
}

impl<'r> LoadSession<'r> {
    pub fn new(doc: Document, ruleset: &'r Ruleset, options: LoadOptions) -> Self {
        let version = doc.lookup_int_default(&doc_path::savefile("version"), -1);
        let format = options.format.unwrap_or_else(|| FormatClass::detect(&doc));
        Self {
            doc,
            ruleset,
            options,
            version,
            format,
            failure: None,
            canonical_action_vector: false,
            report: CompatReport {
                original_version: version,
                ..Default::default()
            },
        }
    }

    pub fn doc(&self) -> &Document {
        &self.doc
    }

    pub fn doc_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn ruleset(&self) -> &'r Ruleset {
        self.ruleset
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Format version the save was written with.
    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn format(&self) -> FormatClass {
        self.format
    }

    pub fn report(&self) -> &CompatReport {
        &self.report
    }

    pub fn has_failed(&self) -> bool {
        self.failure.is_some()
    }

    /// `Err(LoadAborted)` once a failure has been recorded.
    pub fn check(&self) -> Result<(), SaveError> {
        if self.failure.is_some() {
            Err(SaveError::LoadAborted)
        } else {
            Ok(())
        }
    }

    /// Record a failure. Only the first one is kept; `LoadAborted` never
    /// replaces a real cause.
    pub fn fail(&mut self, err: SaveError) {
        if self.failure.is_none() && !matches!(err, SaveError::LoadAborted) {
            error!("Savegame load failed: {err}");
            self.failure = Some(err);
        }
    }

    /// Record the failure of a step result, if any.
    pub fn record(&mut self, result: Result<(), SaveError>) {
        if let Err(err) = result {
            self.fail(err);
        }
    }

    /// Take the recorded failure out of the session.
    pub fn take_failure(&mut self) -> Option<SaveError> {
        self.failure.take()
    }

    /// End the session: the document, or the first recorded failure.
    pub fn finish(self) -> Result<(Document, CompatReport), SaveError> {
        match self.failure {
            Some(err) => Err(err),
            None => Ok((self.doc, self.report)),
        }
    }

    pub fn into_document(self) -> Document {
        self.doc
    }
}
