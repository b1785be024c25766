//! Toast configuration
//!
//! This module re-exports the shared types from toast-types and provides
//! TOML loading for ToastConfig.

use std::path::Path;

pub use toast_types::{
    DEFAULT_CONTENT_CLASS, DEFAULT_DISPLAY_TIME_MS, DEFAULT_FADE_TIME_MS, DEFAULT_ROOT_CLASS,
    EffectiveOptions, Severity, ToastConfig, ToastOptions,
};

use crate::error::ConfigError;

/// Parse a configuration from TOML text. Missing keys take their defaults.
pub fn from_toml_str(text: &str) -> Result<ToastConfig, ConfigError> {
    Ok(toml::from_str(text)?)
}

/// Load a configuration file
pub fn load(path: impl AsRef<Path>) -> Result<ToastConfig, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let config = from_toml_str(&text)?;
    tracing::debug!(path = %path.display(), "Loaded toast config");
    Ok(config)
}
