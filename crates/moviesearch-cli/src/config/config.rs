//! `AppConfig` struct and TOML loading.

use std::path::Path;

use anyhow::{Context, Result, bail};
use moviesearch_session::{EnrichmentPolicy, SortOrder};
use serde::Deserialize;

/// Environment variable holding the OMDb API key.
pub const API_KEY_ENV: &str = "OMDB_API_KEY";

/// Top-level application configuration.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// OMDb connection settings.
    #[serde(default)]
    pub omdb: OmdbConfig,
    /// Browser defaults.
    #[serde(default)]
    pub browse: BrowseConfig,
}

/// OMDb connection configuration.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct OmdbConfig {
    /// API key; the `OMDB_API_KEY` environment variable wins over this.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Endpoint override.
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Session defaults.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
pub struct BrowseConfig {
    /// Initial year sort order.
    #[serde(default)]
    pub sort: SortOrder,
    /// Enrichment failure policy.
    #[serde(default)]
    pub enrichment: EnrichmentPolicy,
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }
}

/// Picks the API key: environment first, then config. Blank values are ignored.
///
/// # Errors
///
/// Returns an error if neither source has a key.
pub fn resolve_api_key(env: Option<String>, config: Option<&str>) -> Result<String> {
    if let Some(key) = env.filter(|k| !k.trim().is_empty()) {
        return Ok(key);
    }
    if let Some(key) = config.filter(|k| !k.trim().is_empty()) {
        return Ok(String::from(key));
    }
    bail!("{API_KEY_ENV} environment variable or [omdb] api_key in config is required")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_default_config() {
        // Arrange & Act
        let config = AppConfig::default();

        // Assert
        assert!(config.omdb.api_key.is_none());
        assert_eq!(config.browse.sort, SortOrder::Descending);
        assert_eq!(config.browse.enrichment, EnrichmentPolicy::AllOrNothing);
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_full_config() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[omdb]
api_key = "abc123"
base_url = "http://localhost:8080/"

[browse]
sort = "asc"
enrichment = "best-effort"
"#,
        )
        .unwrap();

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config.omdb.api_key.as_deref(), Some("abc123"));
        assert_eq!(
            config.omdb.base_url.as_deref(),
            Some("http://localhost:8080/")
        );
        assert_eq!(config.browse.sort, SortOrder::Ascending);
        assert_eq!(config.browse.enrichment, EnrichmentPolicy::BestEffort);
    }

    #[test]
    fn test_load_partial_config() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_invalid_sort_fails() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[browse]\nsort = \"sideways\"\n").unwrap();

        // Act
        let result = AppConfig::load(&path);

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_api_key_prefers_env() {
        // Arrange & Act
        let key = resolve_api_key(Some(String::from("from-env")), Some("from-config")).unwrap();

        // Assert
        assert_eq!(key, "from-env");
    }

    #[test]
    fn test_resolve_api_key_falls_back_to_config() {
        // Arrange & Act
        let key = resolve_api_key(Some(String::from("  ")), Some("from-config")).unwrap();

        // Assert
        assert_eq!(key, "from-config");
    }

    #[test]
    fn test_resolve_api_key_missing() {
        // Arrange & Act
        let err = resolve_api_key(None, None).unwrap_err();

        // Assert
        assert!(err.to_string().contains("OMDB_API_KEY"));
    }
}
