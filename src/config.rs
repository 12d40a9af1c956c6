//! Registry configuration.
//!
//! Settings are plain values fixed when a registry is created. They can be
//! built in code, read from the environment, or (with the `config` feature)
//! deserialized from JSON.

use std::env;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// Environment variable prefix read by [`RegistryConfig::from_env`].
pub const ENV_PREFIX: &str = "FERROUS_INJECT_";

/// Behavior switches for a [`ServiceRegistry`](crate::ServiceRegistry).
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{RegistryConfig, ServiceRegistry};
///
/// let config = RegistryConfig::default()
///     .with_trace_resolutions(true)
///     .with_log_field_failures(false);
///
/// let registry = ServiceRegistry::with_config(config.clone());
/// assert_eq!(registry.config(), &config);
/// assert!(registry.config().catch_panics);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct RegistryConfig {
    /// Convert factory panics into `DiError::FactoryPanic` instead of unwinding
    pub catch_panics: bool,
    /// Emit a `trace` event for every resolution
    pub trace_resolutions: bool,
    /// Emit a `warn` event for every field that could not be injected
    pub log_field_failures: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            catch_panics: true,
            trace_resolutions: false,
            log_field_failures: true,
        }
    }
}

impl RegistryConfig {
    /// Sets [`catch_panics`](Self::catch_panics).
    pub fn with_catch_panics(mut self, enabled: bool) -> Self {
        self.catch_panics = enabled;
        self
    }

    /// Sets [`trace_resolutions`](Self::trace_resolutions).
    pub fn with_trace_resolutions(mut self, enabled: bool) -> Self {
        self.trace_resolutions = enabled;
        self
    }

    /// Sets [`log_field_failures`](Self::log_field_failures).
    pub fn with_log_field_failures(mut self, enabled: bool) -> Self {
        self.log_field_failures = enabled;
        self
    }

    /// Builds a configuration from `FERROUS_INJECT_*` environment variables.
    ///
    /// Recognized variables are `FERROUS_INJECT_CATCH_PANICS`,
    /// `FERROUS_INJECT_TRACE_RESOLUTIONS` and `FERROUS_INJECT_LOG_FIELD_FAILURES`.
    /// Unset or unparsable values keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let flag = |suffix: &str, default: bool| {
            lookup(&format!("{ENV_PREFIX}{suffix}"))
                .and_then(|raw| parse_flag(&raw))
                .unwrap_or(default)
        };

        Self {
            catch_panics: flag("CATCH_PANICS", defaults.catch_panics),
            trace_resolutions: flag("TRACE_RESOLUTIONS", defaults.trace_resolutions),
            log_field_failures: flag("LOG_FIELD_FAILURES", defaults.log_field_failures),
        }
    }

    /// Parses a JSON document; missing keys keep their defaults.
    #[cfg(feature = "config")]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes the configuration as JSON.
    #[cfg(feature = "config")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults() {
        let config = RegistryConfig::default();
        assert!(config.catch_panics);
        assert!(!config.trace_resolutions);
        assert!(config.log_field_failures);
    }

    #[test]
    fn lookup_overrides_known_flags_only() {
        let vars: HashMap<String, String> = [
            ("FERROUS_INJECT_CATCH_PANICS", "off"),
            ("FERROUS_INJECT_TRACE_RESOLUTIONS", "YES"),
            ("FERROUS_INJECT_LOG_FIELD_FAILURES", "maybe"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let config = RegistryConfig::from_lookup(|name| vars.get(name).cloned());

        assert!(!config.catch_panics);
        assert!(config.trace_resolutions);
        // unparsable value falls back to the default
        assert!(config.log_field_failures);
    }

    #[test]
    fn parse_flag_accepts_common_spellings() {
        assert_eq!(parse_flag(" 1 "), Some(true));
        assert_eq!(parse_flag("On"), Some(true));
        assert_eq!(parse_flag("false"), Some(false));
        assert_eq!(parse_flag(""), None);
    }

    #[cfg(feature = "config")]
    #[test]
    fn json_round_trip_with_partial_document() {
        let config = RegistryConfig::from_json(r#"{ "trace_resolutions": true }"#).unwrap();
        assert!(config.trace_resolutions);
        assert!(config.catch_panics);

        let json = config.to_json().unwrap();
        assert_eq!(RegistryConfig::from_json(&json).unwrap(), config);
    }
}
