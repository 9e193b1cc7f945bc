//! Framework configuration.
//!
//! Configuration is read once during process initialization, before models
//! are built and registered. Every section has a `Default` matching the
//! behaviour controllers expect out of the box, so a configuration document
//! only needs to name the settings it changes.

use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Model registry behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Consult the legacy-compatibility table after the primary maps miss.
    pub legacy_fallback: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            legacy_fallback: true,
        }
    }
}

impl RegistryConfig {
    /// Set whether the legacy table is consulted.
    pub fn legacy_fallback(mut self, enabled: bool) -> Self {
        self.legacy_fallback = enabled;
        self
    }
}

/// Record encoding behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecordConfig {
    /// Check required fields before encoding.
    pub validate_on_encode: bool,
}

impl Default for RecordConfig {
    fn default() -> Self {
        Self {
            validate_on_encode: true,
        }
    }
}

impl RecordConfig {
    /// Set whether encoding validates required fields.
    pub fn validate_on_encode(mut self, enabled: bool) -> Self {
        self.validate_on_encode = enabled;
        self
    }
}

/// Event dispatch behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchConfig {
    /// Contain subscriber panics the same way as returned errors.
    ///
    /// When disabled, a panicking subscriber unwinds through `emit` and the
    /// remaining subscribers are not notified. Only returned errors stay
    /// isolated.
    pub catch_panics: bool,

    /// Include the event arguments in subscriber failure logs.
    pub log_args: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            catch_panics: true,
            log_args: true,
        }
    }
}

impl DispatchConfig {
    /// Set whether subscriber panics are caught. Turning this off gives up
    /// panic isolation in `emit`.
    pub fn catch_panics(mut self, enabled: bool) -> Self {
        self.catch_panics = enabled;
        self
    }

    /// Set whether failure logs carry the event arguments.
    pub fn log_args(mut self, enabled: bool) -> Self {
        self.log_args = enabled;
        self
    }
}

/// Complete framework configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrameworkConfig {
    /// Registry settings.
    pub registry: RegistryConfig,
    /// Record settings, applied to every model built with this config.
    pub record: RecordConfig,
    /// Dispatch settings, applied to every event registry.
    pub dispatch: DispatchConfig,
}

impl FrameworkConfig {
    /// Parse a JSON configuration document.
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    /// Set the registry section.
    pub fn with_registry(mut self, registry: RegistryConfig) -> Self {
        self.registry = registry;
        self
    }

    /// Set the record section.
    pub fn with_record(mut self, record: RecordConfig) -> Self {
        self.record = record;
        self
    }

    /// Set the dispatch section.
    pub fn with_dispatch(mut self, dispatch: DispatchConfig) -> Self {
        self.dispatch = dispatch;
        self
    }
}
