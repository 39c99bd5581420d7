use serde::Deserialize;
use std::fs;
use std::path::Path;

const ENV_CONFIG_PATH: &str = "MENTION_INTEL_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

const ENV_DB_PATH: &str = "DB_PATH";
const ENV_NEWSAPI_KEY: &str = "NEWSAPI_KEY";
const ENV_SLACK_WEBHOOK_URL: &str = "SLACK_WEBHOOK_URL";
const ENV_GOOGLE_KG_API_KEY: &str = "GOOGLE_KG_API_KEY";
const ENV_GOOGLE_NEWS_LANG: &str = "GOOGLE_NEWS_LANG";
const ENV_WIKIDATA_ENABLED: &str = "WIKIDATA_ENABLED";
const ENV_OFFLINE: &str = "OFFLINE";

const DEFAULT_DB_PATH: &str = "events.db";
const DEFAULT_COMPANIES_CSV: &str = "companies.csv";
const DEFAULT_GOOGLE_NEWS_LANG: &str = "en";
const DEFAULT_MIN_CONFIDENCE: f64 = 0.8;
const DEFAULT_MIN_SEVERITY: f64 = 0.6;
const DEFAULT_SINCE_DAYS: i64 = 14;

/// YAML configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub db_path: Option<String>,
    #[serde(default)]
    pub companies_csv: Option<String>,
    #[serde(default)]
    pub newsapi_key: Option<String>,
    #[serde(default)]
    pub slack_webhook_url: Option<String>,
    #[serde(default)]
    pub google_kg_api_key: Option<String>,
    #[serde(default)]
    pub wikidata_enabled: Option<bool>,
    #[serde(default)]
    pub google_news_lang: Option<String>,
    #[serde(default)]
    pub min_confidence: Option<f64>,
    #[serde(default)]
    pub min_severity: Option<f64>,
    #[serde(default)]
    pub since_days: Option<i64>,
    #[serde(default)]
    pub offline: Option<bool>,
    #[serde(default)]
    pub notify_unverified: Option<bool>,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub companies_csv: String,
    /// NewsAPI feed client is active only when a key is present
    pub newsapi_key: Option<String>,
    /// Slack delivery is active only when a webhook URL is present
    pub slack_webhook_url: Option<String>,
    /// Google Knowledge Graph backend is selected when a key is present
    pub google_kg_api_key: Option<String>,
    pub wikidata_enabled: bool,
    pub google_news_lang: String,
    /// Minimum name-match score for an item to be processed
    pub min_confidence: f64,
    /// Minimum severity for an item to be persisted
    pub min_severity: f64,
    /// Feed horizon in days
    pub since_days: i64,
    /// Skip outbound content fetches; domain evidence is simulated
    pub offline: bool,
    /// Deliver unverified events with a warning prefix
    pub notify_unverified: bool,
    pub port: u16,
    pub host: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: DEFAULT_DB_PATH.to_string(),
            companies_csv: DEFAULT_COMPANIES_CSV.to_string(),
            newsapi_key: None,
            slack_webhook_url: None,
            google_kg_api_key: None,
            wikidata_enabled: false,
            google_news_lang: DEFAULT_GOOGLE_NEWS_LANG.to_string(),
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            min_severity: DEFAULT_MIN_SEVERITY,
            since_days: DEFAULT_SINCE_DAYS,
            offline: false,
            notify_unverified: false,
            port: 8080,
            host: "127.0.0.1".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment and config file.
    ///
    /// Precedence: environment variable, then config file value, then default.
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let config_path =
            std::env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let file = Self::load_config_file(&config_path).unwrap_or_default();
        let defaults = Config::default();

        Self {
            db_path: env_string(ENV_DB_PATH)
                .or(file.db_path)
                .unwrap_or(defaults.db_path),
            companies_csv: file.companies_csv.unwrap_or(defaults.companies_csv),
            newsapi_key: env_string(ENV_NEWSAPI_KEY).or(non_empty(file.newsapi_key)),
            slack_webhook_url: env_string(ENV_SLACK_WEBHOOK_URL)
                .or(non_empty(file.slack_webhook_url)),
            google_kg_api_key: env_string(ENV_GOOGLE_KG_API_KEY)
                .or(non_empty(file.google_kg_api_key)),
            wikidata_enabled: env_bool(ENV_WIKIDATA_ENABLED)
                .or(file.wikidata_enabled)
                .unwrap_or(defaults.wikidata_enabled),
            google_news_lang: env_string(ENV_GOOGLE_NEWS_LANG)
                .or(file.google_news_lang)
                .unwrap_or(defaults.google_news_lang),
            min_confidence: file.min_confidence.unwrap_or(defaults.min_confidence),
            min_severity: file.min_severity.unwrap_or(defaults.min_severity),
            since_days: file.since_days.unwrap_or(defaults.since_days),
            offline: env_bool(ENV_OFFLINE)
                .or(file.offline)
                .unwrap_or(defaults.offline),
            notify_unverified: file.notify_unverified.unwrap_or(defaults.notify_unverified),
            port,
            host,
        }
    }

    /// Load configuration from YAML file
    fn load_config_file(path: &str) -> Option<ConfigFile> {
        let path = Path::new(path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => {
                // Handle empty file
                let contents = contents.trim();
                if contents.is_empty() {
                    tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
                    return Some(ConfigFile::default());
                }

                match serde_yaml::from_str(contents) {
                    Ok(config) => {
                        tracing::info!(path = %path.display(), "Loaded configuration from file");
                        Some(config)
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Failed to parse config file, using defaults");
                        None
                    }
                }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                None
            }
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_bool(name: &str) -> Option<bool> {
    std::env::var(name)
        .ok()
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.db_path, "events.db");
        assert_eq!(config.min_confidence, 0.8);
        assert_eq!(config.min_severity, 0.6);
        assert_eq!(config.since_days, 14);
        assert!(!config.offline);
        assert!(config.newsapi_key.is_none());
    }

    #[test]
    fn test_config_file_parsing() {
        let yaml = r#"
db_path: /tmp/test-events.db
newsapi_key: abc123
min_confidence: 0.9
since_days: 7
offline: true
"#;
        let file: ConfigFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(file.db_path.as_deref(), Some("/tmp/test-events.db"));
        assert_eq!(file.newsapi_key.as_deref(), Some("abc123"));
        assert_eq!(file.min_confidence, Some(0.9));
        assert_eq!(file.since_days, Some(7));
        assert_eq!(file.offline, Some(true));
        assert!(file.slack_webhook_url.is_none());
    }

    #[test]
    fn test_empty_values_treated_as_absent() {
        assert_eq!(non_empty(Some("".to_string())), None);
        assert_eq!(non_empty(Some("  ".to_string())), None);
        assert_eq!(non_empty(Some("x".to_string())), Some("x".to_string()));
    }
}
