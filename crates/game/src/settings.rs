use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    /// Enum and bitwise settings, stored by name (`"ISO|HEX"`).
    Str(String),
}

impl SettingValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            SettingValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setting {
    pub name: String,
    pub value: SettingValue,
    /// Value the setting had when the game started, if recorded.
    pub gamestart: Option<SettingValue>,
    /// Whether the value was set by the game setup (not by a user command).
    pub gamesetdef: bool,
}

/// Server settings in the order they were saved.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    pub settings: Vec<Setting>,
}

impl ServerSettings {
    pub fn get(&self, name: &str) -> Option<&Setting> {
        self.settings
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }

    pub fn value(&self, name: &str) -> Option<&SettingValue> {
        self.get(name).map(|s| &s.value)
    }

    /// Replace the value of an existing setting or append a new one.
    pub fn set(&mut self, name: &str, value: SettingValue) {
        match self
            .settings
            .iter_mut()
            .find(|s| s.name.eq_ignore_ascii_case(name))
        {
            Some(setting) => setting.value = value,
            None => self.settings.push(Setting {
                name: name.to_string(),
                value,
                gamestart: None,
                gamesetdef: false,
            }),
        }
    }
}
