// ---------------------------------------------------------------------------
// Document: sectioned, typed key/value store holding one savegame
// ---------------------------------------------------------------------------
//
// A path `player0.c1.size` addresses entry `c1.size` of section `player0`:
// the section name ends at the first '.'. The store has no schema; what an
// entry means depends on the format version the document was written in.

use std::collections::BTreeMap;
use std::fmt;

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// A typed entry value.
///
/// Variant order matters for the untagged text form: an integer literal
/// must be read as `Int`, not `Float`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    IntVec(Vec<i64>),
    StrVec(Vec<String>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::IntVec(_) => "int vector",
            Value::StrVec(_) => "string vector",
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Value::StrVec(v)
    }
}

impl From<Vec<i64>> for Value {
    fn from(v: Vec<i64>) -> Self {
        Value::IntVec(v)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    Missing(String),
    WrongType {
        path: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentError::Missing(path) => write!(f, "no entry {path}"),
            DocumentError::WrongType {
                path,
                expected,
                found,
            } => write!(f, "entry {path} is {found}, expected {expected}"),
        }
    }
}

impl std::error::Error for DocumentError {}

// =============================================================================
// Store
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
#[serde(transparent)]
pub struct Section {
    pub entries: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
#[serde(transparent)]
pub struct Document {
    pub sections: BTreeMap<String, Section>,
}

fn split_path(path: &str) -> (&str, &str) {
    path.split_once('.').unwrap_or((path, ""))
}

macro_rules! typed_lookup {
    ($name:ident, $default_name:ident, $variant:ident, $ty:ty, $expected:literal) => {
        pub fn $name(&self, path: &str) -> Result<$ty, DocumentError> {
            match self.lookup(path) {
                Some(Value::$variant(v)) => Ok(v.clone()),
                Some(other) => Err(DocumentError::WrongType {
                    path: path.to_string(),
                    expected: $expected,
                    found: other.type_name(),
                }),
                None => Err(DocumentError::Missing(path.to_string())),
            }
        }

        /// Like the plain lookup, but an absent or mistyped entry yields `default`.
        pub fn $default_name(&self, path: &str, default: $ty) -> $ty {
            self.$name(path).unwrap_or(default)
        }
    };
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let (section, entry) = split_path(path);
        self.sections.get(section)?.entries.get(entry)
    }

    typed_lookup!(lookup_int, lookup_int_default, Int, i64, "int");
    typed_lookup!(lookup_bool, lookup_bool_default, Bool, bool, "bool");
    typed_lookup!(lookup_str, lookup_str_default, Str, String, "string");

    // An empty vector reads back from the text form as `IntVec`, so an empty
    // vector of either kind satisfies both vector lookups.

    pub fn lookup_int_vec(&self, path: &str) -> Result<Vec<i64>, DocumentError> {
        match self.lookup(path) {
            Some(Value::IntVec(v)) => Ok(v.clone()),
            Some(Value::StrVec(v)) if v.is_empty() => Ok(Vec::new()),
            Some(other) => Err(DocumentError::WrongType {
                path: path.to_string(),
                expected: "int vector",
                found: other.type_name(),
            }),
            None => Err(DocumentError::Missing(path.to_string())),
        }
    }

    pub fn lookup_str_vec(&self, path: &str) -> Result<Vec<String>, DocumentError> {
        match self.lookup(path) {
            Some(Value::StrVec(v)) => Ok(v.clone()),
            Some(Value::IntVec(v)) if v.is_empty() => Ok(Vec::new()),
            Some(other) => Err(DocumentError::WrongType {
                path: path.to_string(),
                expected: "string vector",
                found: other.type_name(),
            }),
            None => Err(DocumentError::Missing(path.to_string())),
        }
    }

    /// Floats also accept integer entries.
    pub fn lookup_float(&self, path: &str) -> Result<f64, DocumentError> {
        match self.lookup(path) {
            Some(Value::Float(v)) => Ok(*v),
            Some(Value::Int(v)) => Ok(*v as f64),
            Some(other) => Err(DocumentError::WrongType {
                path: path.to_string(),
                expected: "float",
                found: other.type_name(),
            }),
            None => Err(DocumentError::Missing(path.to_string())),
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.lookup(path).is_some()
    }

    /// Create an entry. Returns `false` and leaves the document untouched
    /// when the entry already exists.
    pub fn insert(&mut self, path: &str, value: impl Into<Value>) -> bool {
        let (section, entry) = split_path(path);
        let entries = &mut self.sections.entry(section.to_string()).or_default().entries;
        if entries.contains_key(entry) {
            return false;
        }
        entries.insert(entry.to_string(), value.into());
        true
    }

    /// Set an entry, creating it if needed. Returns the previous value.
    pub fn replace(&mut self, path: &str, value: impl Into<Value>) -> Option<Value> {
        let (section, entry) = split_path(path);
        self.sections
            .entry(section.to_string())
            .or_default()
            .entries
            .insert(entry.to_string(), value.into())
    }

    pub fn remove(&mut self, path: &str) -> Option<Value> {
        let (section, entry) = split_path(path);
        let sec = self.sections.get_mut(section)?;
        let removed = sec.entries.remove(entry);
        if sec.entries.is_empty() {
            self.sections.remove(section);
        }
        removed
    }

    /// Move an entry to a new path. Nothing happens (and `false` is returned)
    /// when the source is absent or the destination already exists.
    pub fn rename(&mut self, from: &str, to: &str) -> bool {
        if self.contains(to) {
            return false;
        }
        match self.remove(from) {
            Some(value) => self.insert(to, value),
            None => false,
        }
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Entry names of one section, in sorted order.
    pub fn entry_names(&self, section: &str) -> Vec<String> {
        self.sections
            .get(section)
            .map(|s| s.entries.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Indices of all `playerN` sections present, ascending.
    pub fn player_slots(&self) -> Vec<usize> {
        let mut slots: Vec<usize> = self
            .section_names()
            .filter_map(|name| name.strip_prefix("player"))
            .filter_map(|rest| rest.parse().ok())
            .collect();
        slots.sort_unstable();
        slots
    }
}
