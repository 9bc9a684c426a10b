use crate::preferences::Preferences;
use serde::{Deserialize, Serialize};

/// Viewer settings loaded from TOML. Missing sections and keys use defaults.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ViewerConfig {
    pub tree: TreeSection,
    pub search: SearchSection,
    /// Preferences the inventory view starts with.
    pub preferences: Preferences,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TreeSection {
    pub icons: bool,
    pub responsive: bool,
    /// Render labels as text, never as HTML.
    pub force_text: bool,
}

impl Default for TreeSection {
    fn default() -> Self {
        Self {
            icons: true,
            responsive: true,
            force_text: true,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SearchSection {
    /// Hide nodes that neither match nor lead to a match.
    pub show_only_matches: bool,
    pub case_sensitive: bool,
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            show_only_matches: true,
            case_sensitive: false,
        }
    }
}

impl ViewerConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse viewer config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize viewer config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
