use crate::error::{Result, StructureError};
use crate::strategy::StructureType;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Deepest `max_depth` accepted. Section trees returned by `sections_json`
/// are nested values, and serializing or dropping them recurses per level.
pub const MAX_DEPTH_LIMIT: usize = 512;

/// Configuration for structure construction and rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StructureConfig {
    /// Deepest branch accepted, counted in sections from the root
    pub max_depth: usize,

    /// Title of the synthetic summary section
    pub summary_title: String,

    /// Title of the synthetic call-to-action section
    pub call_to_action_title: String,

    /// Prefix of table-of-contents links, followed by the section id
    pub link_prefix: String,

    /// Structure type used when a caller does not pick one
    pub default_structure: StructureType,
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH_LIMIT,
            summary_title: "Summary".to_string(),
            call_to_action_title: "Call to Action".to_string(),
            link_prefix: "#sections/".to_string(),
            default_structure: StructureType::default(),
        }
    }
}

impl StructureConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&raw)?;
        log::debug!("Loaded structure config from {}", path.display());
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(StructureError::invalid_config("max_depth must be > 0"));
        }

        if self.max_depth > MAX_DEPTH_LIMIT {
            return Err(StructureError::invalid_config(format!(
                "max_depth must be <= {MAX_DEPTH_LIMIT}"
            )));
        }

        if self.summary_title.trim().is_empty() {
            return Err(StructureError::invalid_config("summary_title must not be empty"));
        }

        if self.call_to_action_title.trim().is_empty() {
            return Err(StructureError::invalid_config(
                "call_to_action_title must not be empty",
            ));
        }

        Ok(())
    }
}
