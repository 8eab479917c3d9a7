//! Settings structures for smpsearch configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Timestamp field the date range is applied to unless configured otherwise
pub const DEFAULT_TIMESTAMP_FIELD: &str = "@timestamp";

/// Main settings structure, loaded from YAML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub converter: ConverterSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        Ok(settings)
    }

    /// Merge with environment variables (SMPSEARCH_* prefix)
    pub fn merge_env(&mut self) {
        self.merge_vars(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any variable source
    pub(crate) fn merge_vars<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("SMPSEARCH_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Some(val) = lookup("SMPSEARCH_TIMESTAMP_FIELD") {
            if !val.is_empty() {
                self.converter.timestamp_field = val;
            }
        }
        if let Some(val) = lookup("SMPSEARCH_PRETTY") {
            self.converter.pretty = val.parse().unwrap_or(false);
        }
    }
}

/// General settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
}

/// Output settings for the query DSL converter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterSettings {
    /// Document field holding the event time
    pub timestamp_field: String,
    /// Indent the emitted JSON
    pub pretty: bool,
}

impl Default for ConverterSettings {
    fn default() -> Self {
        Self {
            timestamp_field: DEFAULT_TIMESTAMP_FIELD.to_string(),
            pretty: false,
        }
    }
}
