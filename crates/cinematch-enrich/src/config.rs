use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::{Deserialize, Deserializer, Serialize};

use crate::enrich::omdb::{OmdbClient, OmdbEnricher, OMDB_API_BASE};
use crate::enrich::resilience::{RateLimiter, RetryPolicy};
use crate::error::EnrichResult;

/// Configuration for cinematch.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (CINE_* prefix)
/// 3. Config file (~/.config/cinematch/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Path to the movie catalog CSV.
    ///
    /// Can be set via:
    /// - CLI: --catalog /path/to/catalog.csv
    /// - ENV: CINE_CATALOG_PATH
    /// - Config: catalog_path = "/path/to/catalog.csv"
    /// - Default: ~/.local/share/cinematch/imdb_top_1000.csv
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,

    /// OMDb API key. Without one, recommendations use catalog data only.
    ///
    /// Can be set via:
    /// - ENV: CINE_OMDB_API_KEY
    /// - Config: omdb_api_key = "..."
    #[serde(default)]
    pub omdb_api_key: Option<String>,

    /// OMDb endpoint.
    #[serde(default = "default_omdb_base_url")]
    pub omdb_base_url: String,

    /// Number of recommendations per query.
    #[serde(default = "default_recommendations", deserialize_with = "number_or_string")]
    pub recommendations: usize,

    /// Per-request timeout for enrichment lookups, in seconds.
    #[serde(default = "default_request_timeout_secs", deserialize_with = "number_or_string")]
    pub request_timeout_secs: u64,

    /// Retries for transient enrichment failures.
    #[serde(default = "default_max_retries", deserialize_with = "number_or_string")]
    pub max_retries: usize,

    /// Enrichment request rate.
    #[serde(default = "default_requests_per_second", deserialize_with = "number_or_string")]
    pub requests_per_second: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            omdb_api_key: None,
            omdb_base_url: default_omdb_base_url(),
            recommendations: default_recommendations(),
            request_timeout_secs: default_request_timeout_secs(),
            max_retries: default_max_retries(),
            requests_per_second: default_requests_per_second(),
        }
    }
}

/// Keys accepted by `config get` and `config set`.
pub const CONFIG_KEYS: [&str; 7] = [
    "catalog_path",
    "omdb_api_key",
    "omdb_base_url",
    "recommendations",
    "request_timeout_secs",
    "max_retries",
    "requests_per_second",
];

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/cinematch/config.toml
    /// Reads environment variables with CINE_ prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let config_path = config_file_path();

        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("cine");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder.build().context("Failed to build configuration")?;

        log::debug!("Loaded configuration: catalog at {}", config.catalog_path.display());
        Ok(config)
    }

    /// Load configuration with a custom catalog path.
    ///
    /// This is used when the --catalog CLI flag is provided.
    pub fn load_with_catalog_path(catalog_path: Option<PathBuf>) -> Result<Self> {
        let mut config = Self::load()?;
        if let Some(path) = catalog_path {
            config.catalog_path = path;
        }
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries)
    }

    pub fn rate_limiter(&self) -> RateLimiter {
        RateLimiter::new(self.requests_per_second)
    }

    /// Whether an enrichment source is configured.
    pub fn has_omdb(&self) -> bool {
        self.omdb_api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    /// Build the OMDb enricher, or `None` when no API key is configured.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn omdb_enricher(&self) -> EnrichResult<Option<OmdbEnricher>> {
        let Some(api_key) = self.omdb_api_key.as_deref().filter(|k| !k.trim().is_empty()) else {
            return Ok(None);
        };
        let client = OmdbClient::new(
            api_key.trim().to_string(),
            self.omdb_base_url.clone(),
            self.request_timeout(),
        )?;
        Ok(Some(OmdbEnricher::new(
            client,
            self.rate_limiter(),
            self.retry_policy(),
        )))
    }

    /// Current value of a config key as display text.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "catalog_path" => self.catalog_path.display().to_string(),
            "omdb_api_key" => self
                .omdb_api_key
                .clone()
                .unwrap_or_else(|| String::from("<not set>")),
            "omdb_base_url" => self.omdb_base_url.clone(),
            "recommendations" => self.recommendations.to_string(),
            "request_timeout_secs" => self.request_timeout_secs.to_string(),
            "max_retries" => self.max_retries.to_string(),
            "requests_per_second" => self.requests_per_second.to_string(),
            _ => return None,
        };
        Some(value)
    }
}

/// Accepts `7` as well as `"7"`. Environment overrides reach the TOML layer
/// as strings.
fn number_or_string<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: fmt::Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString<T> {
        Number(T),
        Text(String),
    }

    match NumberOrString::<T>::deserialize(deserializer)? {
        NumberOrString::Number(value) => Ok(value),
        NumberOrString::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

fn default_catalog_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cinematch")
        .join("imdb_top_1000.csv")
}

fn default_omdb_base_url() -> String {
    OMDB_API_BASE.to_string()
}

fn default_recommendations() -> usize {
    5
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_max_retries() -> usize {
    2
}

fn default_requests_per_second() -> u32 {
    5
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/cinematch/config.toml
/// - macOS: ~/Library/Application Support/cinematch/config.toml
/// - Windows: %APPDATA%\cinematch\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cinematch")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Cinematch Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (CINE_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Path to the movie catalog (IMDb top-1000 CSV layout)
#
# Can also be set via:
# - CLI: cinematch --catalog /path/to/catalog.csv recommend "Heat"
# - Environment: CINE_CATALOG_PATH=/path/to/catalog.csv
#
# Default: Platform-specific data directory
#catalog_path = "/path/to/imdb_top_1000.csv"

# OMDb API key for posters, plots, cast and box office figures
# Without a key, recommendations are shown with catalog data only.
#
# Register for a free API key at: https://www.omdbapi.com/apikey.aspx
#
# Can also be set via:
# - Environment: CINE_OMDB_API_KEY=your-key-here
#omdb_api_key = "your-omdb-api-key-here"

# Number of recommendations per query
recommendations = 5

# Enrichment request tuning
request_timeout_secs = 10
max_retries = 2
requests_per_second = 5
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    let config_path = config_file_path();

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(&config_path, example_config()).context("Failed to write config file")?;

    Ok(true)
}

/// Replace (or append) `key = value` in TOML config text.
///
/// Commented-out lines are left alone. Numeric keys are checked against
/// their field type and written bare, everything else is written as an
/// escaped basic string.
pub fn set_value(contents: &str, key: &str, value: &str) -> Result<String> {
    if !CONFIG_KEYS.contains(&key) {
        anyhow::bail!(
            "Unknown config key: {}\n\nValid keys: {}",
            key,
            CONFIG_KEYS.join(", ")
        );
    }

    let rendered = match key {
        "recommendations" | "max_retries" => numeric_line::<usize>(key, value)?,
        "request_timeout_secs" => numeric_line::<u64>(key, value)?,
        "requests_per_second" => numeric_line::<u32>(key, value)?,
        _ => format!("{} = \"{}\"", key, escape_basic_string(value)),
    };

    let mut found = false;
    let mut lines: Vec<String> = contents
        .lines()
        .map(|line| {
            let trimmed = line.trim_start();
            let is_key = trimmed
                .strip_prefix(key)
                .is_some_and(|rest| rest.trim_start().starts_with('='));
            if is_key && !found {
                found = true;
                rendered.clone()
            } else {
                line.to_string()
            }
        })
        .collect();

    if !found {
        lines.push(rendered);
    }

    let mut updated = lines.join("\n");
    updated.push('\n');
    Ok(updated)
}

fn numeric_line<T>(key: &str, value: &str) -> Result<String>
where
    T: FromStr + fmt::Display,
{
    let parsed: T = value.trim().parse().map_err(|_| {
        anyhow::anyhow!(
            "{} must be a non-negative integer that fits in {}",
            key,
            std::any::type_name::<T>()
        )
    })?;
    Ok(format!("{} = {}", key, parsed))
}

/// Escape text for a TOML basic string.
fn escape_basic_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c if c.is_control() => escaped.push_str(&format!("\\u{:04X}", u32::from(c))),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.catalog_path.as_os_str().is_empty());
        assert!(config.omdb_api_key.is_none());
        assert_eq!(config.recommendations, 5);
        assert_eq!(config.omdb_base_url, OMDB_API_BASE);
        assert!(!config.has_omdb());
    }

    #[test]
    fn test_config_load() {
        // Should not fail even if config file doesn't exist
        let result = Config::load();
        assert!(result.is_ok());
    }

    #[test]
    fn test_config_with_custom_catalog_path() {
        let custom_path = PathBuf::from("/tmp/movies.csv");
        let config = Config::load_with_catalog_path(Some(custom_path.clone())).unwrap();
        assert_eq!(config.catalog_path, custom_path);
    }

    #[test]
    fn test_blank_api_key_is_not_configured() {
        let config = Config {
            omdb_api_key: Some("  ".to_string()),
            ..Config::default()
        };
        assert!(!config.has_omdb());
    }

    #[test]
    fn test_omdb_enricher_requires_key() {
        assert!(Config::default().omdb_enricher().unwrap().is_none());

        let config = Config {
            omdb_api_key: Some("abc123".to_string()),
            omdb_base_url: "http://localhost:1/".to_string(),
            ..Config::default()
        };
        let enricher = config.omdb_enricher().unwrap().unwrap();
        assert_eq!(enricher.client().base_url(), "http://localhost:1/");
    }

    #[test]
    fn test_get_known_and_unknown_keys() {
        let config = Config::default();
        assert_eq!(config.get("recommendations").as_deref(), Some("5"));
        assert_eq!(config.get("omdb_api_key").as_deref(), Some("<not set>"));
        assert!(config.get("nope").is_none());
        for key in CONFIG_KEYS {
            assert!(config.get(key).is_some(), "{key} should be readable");
        }
    }

    #[test]
    fn test_set_value_replaces_uncommented_line() {
        let contents = "#omdb_api_key = \"old\"\nomdb_api_key = \"old\"\nrecommendations = 5\n";
        let updated = set_value(contents, "omdb_api_key", "new").unwrap();
        assert_eq!(
            updated,
            "#omdb_api_key = \"old\"\nomdb_api_key = \"new\"\nrecommendations = 5\n"
        );
    }

    #[test]
    fn test_set_value_appends_missing_key() {
        let updated = set_value("recommendations = 5\n", "max_retries", "4").unwrap();
        assert_eq!(updated, "recommendations = 5\nmax_retries = 4\n");
    }

    #[test]
    fn test_set_value_does_not_match_key_prefixes() {
        let contents = "omdb_api_key_backup = \"x\"\n";
        let updated = set_value(contents, "omdb_api_key", "k").unwrap();
        assert_eq!(updated, "omdb_api_key_backup = \"x\"\nomdb_api_key = \"k\"\n");
    }

    #[test]
    fn test_set_value_rejects_bad_input() {
        assert!(set_value("", "nope", "1").is_err());
        assert!(set_value("", "recommendations", "many").is_err());
    }

    #[test]
    fn test_set_value_checks_each_numeric_type() {
        assert!(set_value("", "requests_per_second", "5000000000").is_err());
        assert!(set_value("", "recommendations", "-1").is_err());
        assert_eq!(
            set_value("", "request_timeout_secs", "5000000000").unwrap(),
            "request_timeout_secs = 5000000000\n"
        );
        assert_eq!(
            set_value("", "requests_per_second", " 10 ").unwrap(),
            "requests_per_second = 10\n"
        );
    }

    #[test]
    fn test_set_value_escapes_control_characters() {
        let updated = set_value("", "omdb_api_key", "line1\nline2\t\"q\"\u{7}").unwrap();
        assert_eq!(
            updated,
            "omdb_api_key = \"line1\\nline2\\t\\\"q\\\"\\u0007\"\n"
        );
        assert_eq!(updated.lines().count(), 1);
    }

    #[test]
    fn test_numeric_fields_accept_strings() {
        let config: Config = serde_json::from_str(
            r#"{"recommendations": "7", "max_retries": 3, "request_timeout_secs": " 30 ", "requests_per_second": "2"}"#,
        )
        .unwrap();
        assert_eq!(config.recommendations, 7);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.requests_per_second, 2);

        let bad = serde_json::from_str::<Config>(r#"{"requests_per_second": "5000000000"}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_numeric_env_override_loads() {
        std::env::set_var("CINE_RECOMMENDATIONS", "7");
        let result = Config::load();
        std::env::remove_var("CINE_RECOMMENDATIONS");

        let config = result.unwrap();
        assert_eq!(config.recommendations, 7);
    }

    #[test]
    fn test_example_config_mentions_every_key() {
        let example = example_config();
        for key in CONFIG_KEYS {
            if key == "omdb_base_url" {
                continue;
            }
            assert!(example.contains(key), "example config should mention {key}");
        }
    }
}
