use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// User visibility toggles for the inventory tree. Session-only.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Preferences {
    /// Show metadata nodes and operations with empty responses.
    pub show_extra_nodes: bool,
}

impl Preferences {
    pub fn get(&self, key: PreferenceKey) -> bool {
        match key {
            PreferenceKey::ShowExtraNodes => self.show_extra_nodes,
        }
    }

    pub fn toggled(self, key: PreferenceKey) -> Self {
        match key {
            PreferenceKey::ShowExtraNodes => Self {
                show_extra_nodes: !self.show_extra_nodes,
            },
        }
    }
}

/// Keys emitted by the toolbar's options menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceKey {
    ShowExtraNodes,
}

impl PreferenceKey {
    pub fn as_str(self) -> &'static str {
        match self {
            PreferenceKey::ShowExtraNodes => "showExtraNodes",
        }
    }
}

impl FromStr for PreferenceKey {
    type Err = UnknownPreference;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        match key {
            "showExtraNodes" => Ok(PreferenceKey::ShowExtraNodes),
            other => Err(UnknownPreference(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unrecognized option \"{0}\"")]
pub struct UnknownPreference(pub String);
