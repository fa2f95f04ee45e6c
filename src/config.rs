use std::env;
use std::sync::OnceLock;
use thiserror::Error;

/// Base URL used when `RAGDESK_API_BASE_URL` is not provided.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the Ragdesk client.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the document RAG service.
    pub api_base_url: String,
    /// Grouping tag applied to uploads and list filters when none is given explicitly.
    pub default_case_id: Option<String>,
    /// Optional override for the log file location.
    pub log_file: Option<String>,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base_url = load_env_optional("RAGDESK_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        reqwest::Url::parse(&api_base_url)
            .map_err(|_| ConfigError::InvalidValue("RAGDESK_API_BASE_URL".into()))?;

        Ok(Self {
            api_base_url,
            default_case_id: load_env_optional("RAGDESK_DEFAULT_CASE_ID")
                .map(|value| value.trim().to_string()),
            log_file: load_env_optional("RAGDESK_LOG_FILE"),
            user_agent: load_env_optional("RAGDESK_USER_AGENT").unwrap_or_else(default_user_agent),
        })
    }

    /// Build a configuration pointing at an explicit base URL with defaults for everything else.
    pub fn with_base_url(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            default_case_id: None,
            log_file: None,
            user_agent: default_user_agent(),
        }
    }
}

fn default_user_agent() -> String {
    format!("ragdesk/{}", env!("CARGO_PKG_VERSION"))
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() -> Result<&'static Config, ConfigError> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    Ok(CONFIG.get_or_init(|| config))
}
