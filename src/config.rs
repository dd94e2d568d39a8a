use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// =============================================================================
// Defaults
// =============================================================================

/// Documentation site hosting the FortiOS release notes
pub const DEFAULT_BASE_URL: &str = "https://docs.fortinet.com";

/// Accumulated records file used when none is given
pub const DEFAULT_RECORDS_FILE: &str = "records.csv";

/// Canonical (deduplicated) records file used when none is given
pub const DEFAULT_SORTED_FILE: &str = "final.csv";

/// Timeout for fetch operations in milliseconds (30 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

/// Delay between starting each version's fetch to avoid rate limiting (10ms)
pub const FETCH_STAGGER_DELAY_MS: u64 = 10;

/// Number of versions fetched at the same time
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Rows of an issue table on the release-notes pages
pub const DEFAULT_ROW_SELECTOR: &str = "tbody tr";

/// Cells of an issue table row
pub const DEFAULT_CELL_SELECTOR: &str = "td";

const APP_NAME: &str = "release-issues";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Application configuration, read from an optional JSON file
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    pub base_url: String,
    /// Request timeout in milliseconds
    pub fetch_timeout_ms: u64,
    pub user_agent: String,
    /// Maximum number of versions fetched concurrently
    pub concurrency: usize,
    pub fetch_stagger_delay_ms: u64,
    /// CSS selector for issue table rows
    pub row_selector: String,
    /// CSS selector for the cells of a row
    pub cell_selector: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            fetch_timeout_ms: FETCH_TIMEOUT_MS,
            user_agent: APP_NAME.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            fetch_stagger_delay_ms: FETCH_STAGGER_DELAY_MS,
            row_selector: DEFAULT_ROW_SELECTOR.to_string(),
            cell_selector: DEFAULT_CELL_SELECTOR.to_string(),
        }
    }
}

impl AppConfig {
    /// Load the config file if one is given, otherwise use defaults
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(config.normalized())
    }

    fn normalized(mut self) -> Self {
        self.concurrency = self.concurrency.max(1);
        self
    }
}

/// Returns the path to the data directory for release-issues.
/// Uses $XDG_DATA_HOME/release-issues if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/release-issues,
/// or ./release-issues if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the default path of the log file.
pub fn log_path() -> PathBuf {
    data_dir().join(format!("{}.log", APP_NAME))
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join(APP_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("config.json");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn load_without_path_returns_defaults() {
        let config = AppConfig::load(None).unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.base_url, "https://docs.fortinet.com");
    }

    #[test]
    fn load_partial_object_uses_defaults_for_missing_fields() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, r#"{ "fetchTimeoutMs": 1000 }"#);

        let config = AppConfig::load(Some(path.as_path())).unwrap();

        assert_eq!(config.fetch_timeout_ms, 1000);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.concurrency, DEFAULT_CONCURRENCY);
    }

    #[test]
    fn load_full_object_parses_all_fields() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"{
                "baseUrl": "http://localhost:8080",
                "fetchTimeoutMs": 5000,
                "userAgent": "custom",
                "concurrency": 2,
                "fetchStaggerDelayMs": 0,
                "rowSelector": "table.issues tr",
                "cellSelector": "td, th"
            }"#,
        );

        let config = AppConfig::load(Some(path.as_path())).unwrap();

        assert_eq!(
            config,
            AppConfig {
                base_url: "http://localhost:8080".to_string(),
                fetch_timeout_ms: 5000,
                user_agent: "custom".to_string(),
                concurrency: 2,
                fetch_stagger_delay_ms: 0,
                row_selector: "table.issues tr".to_string(),
                cell_selector: "td, th".to_string(),
            }
        );
    }

    #[test]
    fn load_clamps_zero_concurrency_to_one() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, r#"{ "concurrency": 0 }"#);

        assert_eq!(AppConfig::load(Some(path.as_path())).unwrap().concurrency, 1);
    }

    #[test]
    fn load_reports_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "{ not json");

        assert!(matches!(
            AppConfig::load(Some(path.as_path())),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.json");

        assert!(matches!(
            AppConfig::load(Some(path.as_path())),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn data_dir_with_env_uses_xdg_data_home_when_set() {
        let path = data_dir_with_env(
            Some("/tmp/test-data".to_string()),
            Some(PathBuf::from("/home/user")),
        );

        assert_eq!(path, PathBuf::from("/tmp/test-data/release-issues"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_home_local_share() {
        let path = data_dir_with_env(None, Some(PathBuf::from("/home/user")));

        assert_eq!(path, PathBuf::from("/home/user/.local/share/release-issues"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_current_dir_when_no_dirs_available() {
        let path = data_dir_with_env(None, None);
        assert_eq!(path, PathBuf::from("./release-issues"));
    }
}
