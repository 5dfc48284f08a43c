// ---------------------------------------------------------------------------
// SaveError: error type for save decoding, compat migration and loading
// ---------------------------------------------------------------------------

use std::fmt;

use crate::document::DocumentError;

/// Errors that abort a savegame load.
///
/// Compat steps record the first of these in the load session; every later
/// step then sees `LoadAborted` and does nothing.
#[derive(Debug)]
pub enum SaveError {
    /// I/O error (file not found, permission denied, disk full, etc.)
    Io(std::io::Error),
    /// Encoding the document failed.
    Encode(String),
    /// Decoding failed (corrupt container, bad checksum, invalid text).
    Decode(String),
    /// Save file version is newer than this build supports.
    VersionMismatch { expected_max: i64, found: i64 },
    /// `savefile.version` is missing or not positive.
    InvalidVersion(i64),
    /// The document is malformed in a way no step can repair.
    Structural(String),
    /// A field that must exist given other fields does not.
    MissingField(String),
    /// A field exists with a type other than the one required.
    WrongType { path: String, expected: &'static str },
    /// A compat step failed for a reason other than a missing field.
    MigrationFailed(String),
    /// An earlier step already failed; nothing further is attempted.
    LoadAborted,
    /// No save data was available to load.
    NoData,
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "I/O error: {e}"),
            SaveError::Encode(msg) => write!(f, "Encoding error: {msg}"),
            SaveError::Decode(msg) => write!(f, "Decoding error: {msg}"),
            SaveError::VersionMismatch {
                expected_max,
                found,
            } => write!(
                f,
                "Version mismatch: save is v{found}, but this build only supports up to v{expected_max}"
            ),
            SaveError::InvalidVersion(v) => write!(f, "Invalid savefile format version ({v})"),
            SaveError::Structural(msg) => write!(f, "Malformed savegame: {msg}"),
            SaveError::MissingField(path) => write!(f, "Missing required field {path}"),
            SaveError::WrongType { path, expected } => {
                write!(f, "Field {path} is not of type {expected}")
            }
            SaveError::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            SaveError::LoadAborted => write!(f, "Load already failed"),
            SaveError::NoData => write!(f, "No save data available to load"),
        }
    }
}

impl std::error::Error for SaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SaveError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<bitcode::Error> for SaveError {
    fn from(e: bitcode::Error) -> Self {
        SaveError::Decode(e.to_string())
    }
}

impl From<serde_json::Error> for SaveError {
    fn from(e: serde_json::Error) -> Self {
        SaveError::Decode(e.to_string())
    }
}

impl From<DocumentError> for SaveError {
    fn from(e: DocumentError) -> Self {
        match e {
            DocumentError::Missing(path) => SaveError::MissingField(path),
            DocumentError::WrongType { path, expected, .. } => {
                SaveError::WrongType { path, expected }
            }
        }
    }
}
