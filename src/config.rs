use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Search configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SearchConfig {
    /// Maximum number of recipes fetched and displayed per query
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Number of detail lookups issued at once
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Base URL of the summary API (the `/summary/{term}` path is appended)
    #[serde(default = "default_summary_base_url")]
    pub summary_base_url: String,
    /// Base URL used to build a page link when the summary omits one
    #[serde(default = "default_summary_page_base_url")]
    pub summary_page_base_url: String,
    /// Base URL of the recipe API (`filter.php` and `lookup.php` live under it)
    #[serde(default = "default_recipe_base_url")]
    pub recipe_base_url: String,
    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            concurrency: default_concurrency(),
            timeout: default_timeout(),
            summary_base_url: default_summary_base_url(),
            summary_page_base_url: default_summary_page_base_url(),
            recipe_base_url: default_recipe_base_url(),
            user_agent: default_user_agent(),
        }
    }
}

// Default value functions
fn default_max_results() -> usize {
    12
}

fn default_concurrency() -> usize {
    4
}

fn default_timeout() -> u64 {
    10
}

fn default_summary_base_url() -> String {
    "https://en.wikipedia.org/api/rest_v1/page".to_string()
}

fn default_summary_page_base_url() -> String {
    "https://en.wikipedia.org/wiki".to_string()
}

fn default_recipe_base_url() -> String {
    "https://www.themealdb.com/api/json/v1/1".to_string()
}

fn default_user_agent() -> String {
    format!("pantry-search/{}", env!("CARGO_PKG_VERSION"))
}

impl SearchConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with PANTRY__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: PANTRY__MAX_RESULTS
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// Load configuration from file and environment variables
///
/// See [`SearchConfig::load`] for the precedence rules.
pub fn load_config() -> Result<SearchConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Use double underscore for nested keys: PANTRY__MAX_RESULTS
        .add_source(
            Environment::with_prefix("PANTRY")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
