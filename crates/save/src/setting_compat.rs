//! Setting name/value remapping for settings saved under an older name or
//! with a value the current build no longer understands.

use crate::save_file::CompressionKind;

/// Old setting name -> current name. No current name appears as an old name,
/// so remapping an already current name is a no-op.
const SETTING_RENAMES: &[(&str, &str)] = &[
    ("spaceship_travel_time", "spaceship_travel_pct"),
    ("diplcost", "diplbulbcost"),
    ("freecost", "freecost_tech"),
    ("conquercost", "conquercost_tech"),
    ("unitwaittime_extended", "unitwaittime_style"),
    ("autosaves", "autosaves_mask"),
    ("barbarians", "barbarian_level"),
];

/// Current name of a setting saved as `old_name`. Unknown names are returned
/// unchanged.
pub fn name_for_current(old_name: &str) -> &str {
    SETTING_RENAMES
        .iter()
        .find(|(old, _)| old.eq_ignore_ascii_case(old_name))
        .map_or(old_name, |(_, new)| *new)
}

/// Current value of `setting` saved as `old_value`, or `None` when the value
/// needs no remapping.
pub fn value_for_current(setting: &str, old_value: &str) -> Option<&'static str> {
    if setting.eq_ignore_ascii_case("compresstype") && old_value.eq_ignore_ascii_case("BZIP2") {
        return Some(CompressionKind::preferred().name());
    }
    None
}
