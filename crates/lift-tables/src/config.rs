use std::path::Path;

use serde::Deserialize;

use crate::error::{ConvertError, Result};

pub const DEFAULT_SEPARATOR: &str = "; ";

/// Conversion settings. Unknown keys are ignored so project-wide config files
/// shared with other tools can be passed in as-is.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct ConvertConfig {
    /// Joins multi-valued fields into one cell.
    #[serde(default = "default_separator")]
    pub csv_cell_separator: String,
    /// Object language code; inferred from the first entry's form when unset.
    #[serde(default)]
    pub obj_lg: Option<String>,
    /// Meaning language code; inferred from the first gloss or definition when unset.
    #[serde(default)]
    pub gloss_lg: Option<String>,
    /// Language identifier stamped on morph and morpheme rows.
    #[serde(default, rename = "Language_ID")]
    pub language_id: Option<String>,
}

fn default_separator() -> String {
    DEFAULT_SEPARATOR.to_string()
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            csv_cell_separator: default_separator(),
            obj_lg: None,
            gloss_lg: None,
            language_id: None,
        }
    }
}

impl ConvertConfig {
    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        // An empty YAML document deserializes as unit, not as a map.
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ConvertError::io(path, e))?;
        Self::from_yaml_str(&raw)
    }

    pub fn separator(&self) -> &str {
        &self.csv_cell_separator
    }
}
