use crate::error::ConfigError;
use crate::questionnaire::ROOT_NODE_ID;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Runtime settings shared by sessions, storage and the HTTP client.
///
/// Every field has a default, so a config file only needs the values it
/// changes:
///
/// ```
/// use shitsumon::config::EngineConfig;
///
/// let config = EngineConfig::from_toml_str("autosave_interval_secs = 10").unwrap();
/// assert_eq!(config.autosave_interval_secs, 10);
/// assert_eq!(config.root_node_id, "1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub root_node_id: String,
    pub autosave_interval_secs: u64,
    pub autosave_debounce_ms: u64,
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub storage_dir: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            root_node_id: ROOT_NODE_ID.to_string(),
            autosave_interval_secs: 30,
            autosave_debounce_ms: 1000,
            api_base_url: "http://localhost:5000".to_string(),
            request_timeout_secs: 30,
            storage_dir: PathBuf::from(".shitsumon"),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&source)
    }

    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_interval_secs)
    }

    pub fn autosave_debounce(&self) -> Duration {
        Duration::from_millis(self.autosave_debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        assert_eq!(EngineConfig::from_toml_str("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = EngineConfig::from_toml_str(
            r#"
root_node_id = "start"
api_base_url = "https://assess.example.org"
storage_dir = "/var/lib/shitsumon"
"#,
        )
        .unwrap();
        assert_eq!(config.root_node_id, "start");
        assert_eq!(config.api_base_url, "https://assess.example.org");
        assert_eq!(config.storage_dir, PathBuf::from("/var/lib/shitsumon"));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_bad_type_is_parse_error() {
        let err = EngineConfig::from_toml_str("autosave_interval_secs = \"soon\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
