//! Host Configuration
//!
//! Per-component runtime settings. Usually the defaults are fine; tests and
//! embedders that load settings from a file use [`HostConfig::from_json`].

use serde::{Deserialize, Serialize};

/// Default bound on consecutive re-renders in [`Component::render_until_stable`].
///
/// [`Component::render_until_stable`]: crate::host::Component::render_until_stable
pub const DEFAULT_MAX_RERENDERS: usize = 25;

/// Settings for a single component instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// How many renders `render_until_stable` performs before giving up.
    pub max_rerenders: usize,

    /// Abort the in-flight task of a dependency-tracked future when a newer
    /// generation is launched. Stale results are discarded either way.
    pub abort_stale_tasks: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            max_rerenders: DEFAULT_MAX_RERENDERS,
            abort_stale_tasks: false,
        }
    }
}

impl HostConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let config = HostConfig::from_json(r#"{"abort_stale_tasks": true}"#).unwrap();
        assert_eq!(config.max_rerenders, DEFAULT_MAX_RERENDERS);
        assert!(config.abort_stale_tasks);

        let config = HostConfig::from_json("{}").unwrap();
        assert_eq!(config, HostConfig::default());
    }

    #[test]
    fn json_round_trip() {
        let config = HostConfig {
            max_rerenders: 3,
            abort_stale_tasks: true,
        };
        let json = config.to_json().unwrap();
        assert_eq!(HostConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(HostConfig::from_json(r#"{"max_rerenders": "many"}"#).is_err());
    }
}
