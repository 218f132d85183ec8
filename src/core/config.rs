use crate::core::market::LookbackPeriod;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";
pub const DEFAULT_YAHOO_COOKIE_URL: &str = "https://fc.yahoo.com";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    pub name: String,
    pub symbols: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct YahooProviderConfig {
    pub base_url: String,
    /// Page visited for the session cookie that a crumb is issued against.
    #[serde(default = "default_cookie_url")]
    pub cookie_url: String,
}

fn default_cookie_url() -> String {
    DEFAULT_YAHOO_COOKIE_URL.to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub yahoo: Option<YahooProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            yahoo: Some(YahooProviderConfig {
                base_url: DEFAULT_YAHOO_BASE_URL.to_string(),
                cookie_url: default_cookie_url(),
            }),
        }
    }
}

fn default_history_rows() -> usize {
    10
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub period: LookbackPeriod,
    /// Number of most recent price rows shown in the terminal.
    #[serde(default = "default_history_rows")]
    pub history_rows: usize,
    #[serde(default)]
    pub indices: Vec<IndexConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            providers: ProvidersConfig::default(),
            period: LookbackPeriod::default(),
            history_rows: default_history_rows(),
            indices: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Loads the config at the default location, falling back to built-in
    /// defaults when no file has been created yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using built-in defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("", "", "stockview")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn yahoo_base_url(&self) -> &str {
        self.providers
            .yahoo
            .as_ref()
            .map_or(DEFAULT_YAHOO_BASE_URL, |p| &p.base_url)
    }

    pub fn yahoo_cookie_url(&self) -> &str {
        self.providers
            .yahoo
            .as_ref()
            .map_or(DEFAULT_YAHOO_COOKIE_URL, |p| &p.cookie_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
period: 1y
history_rows: 5
indices:
  - name: "Tech"
    symbols:
      - "AAPL"
      - "MSFT"
  - name: "Banks"
    symbols:
      - "HDFCBANK.NS"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.period, LookbackPeriod::OneYear);
        assert_eq!(config.history_rows, 5);
        assert_eq!(config.indices.len(), 2);
        assert_eq!(config.indices[0].name, "Tech");
        assert_eq!(config.indices[0].symbols, vec!["AAPL", "MSFT"]);
        assert_eq!(config.indices[1].symbols, vec!["HDFCBANK.NS"]);
        assert_eq!(config.yahoo_base_url(), DEFAULT_YAHOO_BASE_URL);

        let yaml_str_with_providers = r#"
providers:
  yahoo:
    base_url: "http://example.com/yahoo"
        "#;
        let config_with_providers: AppConfig =
            serde_yaml::from_str(yaml_str_with_providers).unwrap();
        assert_eq!(
            config_with_providers.yahoo_base_url(),
            "http://example.com/yahoo"
        );
        assert_eq!(
            config_with_providers.yahoo_cookie_url(),
            DEFAULT_YAHOO_COOKIE_URL
        );
        assert_eq!(config_with_providers.period, LookbackPeriod::FiveYears);
        assert_eq!(config_with_providers.history_rows, 10);
        assert!(config_with_providers.indices.is_empty());
    }

    #[test]
    fn test_config_rejects_unknown_period() {
        let result: Result<AppConfig, _> = serde_yaml::from_str("period: 7y\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_yahoo_section_uses_default_url() {
        let config: AppConfig = serde_yaml::from_str("providers: {}\n").unwrap();
        assert!(config.providers.yahoo.is_none());
        assert_eq!(config.yahoo_base_url(), DEFAULT_YAHOO_BASE_URL);
        assert_eq!(config.yahoo_cookie_url(), DEFAULT_YAHOO_COOKIE_URL);
    }

    #[test]
    fn test_cookie_url_override() {
        let yaml_str = r#"
providers:
  yahoo:
    base_url: "http://localhost:9000"
    cookie_url: "http://localhost:9000/cookie"
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str).unwrap();
        assert_eq!(config.yahoo_cookie_url(), "http://localhost:9000/cookie");
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = AppConfig::load_from_path(dir.path().join("absent.yaml"));
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }
}
