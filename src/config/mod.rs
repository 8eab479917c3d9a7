//! Configuration module for smpsearch
//!
//! Handles loading settings from YAML files and environment variables.
//! The binary installs them once with [`init`]; the library reads them
//! through [`get`] (see [`crate::convert::ElasticConverter::configured`]).
//! The conversion itself never reads files or the environment.

mod settings;

pub use settings::*;

use anyhow::Result;
use once_cell::sync::OnceCell;

/// Global settings instance
static SETTINGS: OnceCell<Settings> = OnceCell::new();

/// Install the process-wide settings. Fails if already installed.
pub fn init(settings: Settings) -> Result<()> {
    SETTINGS
        .set(settings)
        .map_err(|_| anyhow::anyhow!("Settings already initialized"))?;
    Ok(())
}

/// Get a reference to the global settings, if initialized
pub fn get() -> Option<&'static Settings> {
    SETTINGS.get()
}

/// Converter settings from the global settings, or defaults before [`init`]
pub fn converter_settings() -> ConverterSettings {
    get().map(|s| s.converter.clone()).unwrap_or_default()
}
