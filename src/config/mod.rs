//! Configuration module for leadfilter
//!
//! Settings come from `config.toml` in the user's config directory, with
//! `LEADFILTER_*` environment variables layered on top. Every key is
//! optional; a missing file means defaults.

use crate::assist::{
    AssistError, AssistState, DEFAULT_DEBOUNCE, HttpSuggestionSource, MAX_DEBOUNCE, MIN_QUERY_CHARS,
};
use crate::facets::FacetRegistry;
use crate::persistence::{
    DEFAULT_STORAGE_KEY, FileSessionStore, FilterPersistence, PersistenceError,
};
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const ENV_PREFIX: &str = "LEADFILTER";

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

#[allow(clippy::cast_possible_truncation)]
const fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE.as_millis() as u64
}

const fn default_min_query_len() -> usize {
    MIN_QUERY_CHARS
}

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    /// Key the filter snapshot is persisted under
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Autocomplete quiescence window in milliseconds, at most ten seconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Characters required before an autocomplete lookup
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,

    /// Base URL of the lead service used for suggestions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,

    /// Domains offered by the domain facet
    #[serde(default)]
    pub domains: Vec<String>,

    /// Root directory for session state (defaults to the user cache directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_dir: Option<PathBuf>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            debounce_ms: default_debounce_ms(),
            min_query_len: default_min_query_len(),
            api_base_url: None,
            domains: Vec::new(),
            session_dir: None,
        }
    }
}

impl FilterConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| {
                ConfigError::Message("Could not determine config directory".to_string())
            })?;

        Ok(config_dir.join("leadfilter").join("config.toml"))
    }

    /// Load configuration from the default location and the environment
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path` and the environment
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::build(path, Self::environment())
    }

    /// Save configuration to the default location
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config directory cannot be created, the configuration
    /// cannot be serialized to TOML, or the file cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Facet catalog with the configured domains
    #[must_use]
    pub fn registry(&self) -> FacetRegistry {
        FacetRegistry::new(&self.domains)
    }

    /// Quiescence window, clamped to `MAX_DEBOUNCE`
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        let debounce = Duration::from_millis(self.debounce_ms);
        if debounce.as_nanos() > MAX_DEBOUNCE.as_nanos() {
            MAX_DEBOUNCE
        } else {
            debounce
        }
    }

    /// Fresh autocomplete fields using the configured debounce and minimum length
    #[must_use]
    pub const fn assist_state(&self) -> AssistState {
        AssistState::new(self.debounce(), self.min_query_len)
    }

    /// File store for `session_id`
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if no session root can be determined or the
    /// id is invalid.
    pub fn session_store(&self, session_id: &str) -> Result<FileSessionStore, PersistenceError> {
        match &self.session_dir {
            Some(root) => FileSessionStore::open(root, session_id),
            None => FileSessionStore::in_cache_dir(session_id),
        }
    }

    /// Snapshot persistence for `session_id` under the configured key
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if the session store cannot be opened.
    pub fn persistence(
        &self,
        session_id: &str,
    ) -> Result<FilterPersistence<FileSessionStore>, PersistenceError> {
        Ok(FilterPersistence::with_key(
            self.session_store(session_id)?,
            self.storage_key.clone(),
        ))
    }

    /// HTTP suggestion source for the configured service
    ///
    /// # Errors
    ///
    /// Returns `AssistError::Unavailable` if no base URL is configured, or the
    /// error from building the client.
    pub fn suggestion_source(&self) -> Result<HttpSuggestionSource, AssistError> {
        let base = self
            .api_base_url
            .as_deref()
            .ok_or_else(|| AssistError::Unavailable("api_base_url is not configured".to_string()))?;
        HttpSuggestionSource::new(base)
    }

    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("domains")
    }

    fn build(path: &Path, env: Environment) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .add_source(env)
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facets::keys;
    use tempfile::TempDir;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        FilterConfig::environment().source(Some(map))
    }

    #[test]
    fn test_default_config() {
        let config = FilterConfig::default();
        assert_eq!(config.storage_key, "lead_filter_state");
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert_eq!(config.min_query_len, 3);
        assert!(config.domains.is_empty());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = FilterConfig::build(&dir.path().join("config.toml"), env(&[])).unwrap();
        assert_eq!(config, FilterConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let toml = "domains = [\"acme.com\", \"shop.acme.com\"]\ndebounce_ms = 150\n";
        fs::write(&path, toml).unwrap();

        let config = FilterConfig::build(&path, env(&[])).unwrap();
        assert_eq!(config.domains, ["acme.com", "shop.acme.com"]);
        assert_eq!(config.debounce_ms, 150);
        assert_eq!(config.storage_key, "lead_filter_state");
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "min_query_len = 4\n").unwrap();

        let config = FilterConfig::build(
            &path,
            env(&[("LEADFILTER_MIN_QUERY_LEN", "2"), ("LEADFILTER_DOMAINS", "a.io,b.io")]),
        )
        .unwrap();
        assert_eq!(config.min_query_len, 2);
        assert_eq!(config.domains, ["a.io", "b.io"]);
    }

    #[test]
    fn test_huge_debounce_is_clamped() {
        let dir = TempDir::new().unwrap();
        let vars = [("LEADFILTER_DEBOUNCE_MS", "9223372036854775807")];
        let config = FilterConfig::build(&dir.path().join("config.toml"), env(&vars)).unwrap();

        assert_eq!(config.debounce_ms, 9_223_372_036_854_775_807);
        assert_eq!(config.debounce(), MAX_DEBOUNCE);
        let mut assist = config.assist_state();
        let now = tokio::time::Instant::now();
        assist.region.on_input("ber", now);
        assert_eq!(assist.region.deadline(), Some(now + MAX_DEBOUNCE));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = FilterConfig {
            api_base_url: Some("https://api.example.com".to_string()),
            domains: vec!["acme.com".to_string()],
            session_dir: Some(dir.path().join("sessions")),
            ..FilterConfig::default()
        };

        config.save_to(&path).unwrap();
        let reloaded = FilterConfig::build(&path, env(&[])).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_registry_uses_domains() {
        let config = FilterConfig {
            domains: vec!["acme.com".to_string()],
            ..FilterConfig::default()
        };
        let registry = config.registry();
        let domain = registry.get(keys::DOMAIN).unwrap();
        assert_eq!(domain.options.len(), 1);
    }

    #[test]
    fn test_persistence_uses_session_dir_and_key() {
        let dir = TempDir::new().unwrap();
        let config = FilterConfig {
            storage_key: "drawer_state".to_string(),
            session_dir: Some(dir.path().to_path_buf()),
            ..FilterConfig::default()
        };

        let persistence = config.persistence("s1").unwrap();
        assert_eq!(persistence.key(), "drawer_state");
        assert_eq!(persistence.store().path(), dir.path().join("s1"));
    }

    #[test]
    fn test_suggestion_source_requires_url() {
        let config = FilterConfig::default();
        assert!(matches!(config.suggestion_source(), Err(AssistError::Unavailable(_))));
    }
}
