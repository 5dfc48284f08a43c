//! Access to the `settings` section: `set_count` plus one `setN` group per
//! setting with `name`, `value` and optional `gamestart`.

use crate::doc_path;
use crate::document::{Document, Value};

pub(crate) fn count(doc: &Document) -> usize {
    usize::try_from(doc.lookup_int_default(&doc_path::settings("set_count"), 0)).unwrap_or(0)
}

/// Index of the setting called `name`, matched case-insensitively.
pub(crate) fn find(doc: &Document, name: &str) -> Option<usize> {
    (0..count(doc)).find(|&i| {
        doc.lookup_str(&doc_path::setting(i, "name"))
            .is_ok_and(|n| n.eq_ignore_ascii_case(name))
    })
}

pub(crate) fn value(doc: &Document, i: usize) -> Option<&Value> {
    doc.lookup(&doc_path::setting(i, "value"))
}

pub(crate) fn gamestart(doc: &Document, i: usize) -> Option<&Value> {
    doc.lookup(&doc_path::setting(i, "gamestart"))
}

/// Value of setting `name` as a bool, if the setting exists with a bool value.
pub(crate) fn bool_value(doc: &Document, name: &str) -> Option<bool> {
    match find(doc, name).and_then(|i| value(doc, i)) {
        Some(Value::Bool(b)) => Some(*b),
        _ => None,
    }
}

/// Append a setting at the end of the block.
pub(crate) fn append(
    doc: &mut Document,
    name: &str,
    value: impl Into<Value>,
    gamestart: Option<Value>,
) -> usize {
    let i = count(doc);
    doc.replace(&doc_path::setting(i, "name"), name);
    doc.replace(&doc_path::setting(i, "value"), value);
    if let Some(gamestart) = gamestart {
        doc.replace(&doc_path::setting(i, "gamestart"), gamestart);
    }
    doc.replace(&doc_path::settings("set_count"), i + 1);
    i
}
