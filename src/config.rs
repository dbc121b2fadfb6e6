use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

pub const CONFIG_PATH_VAR: &str = "STOCK_ALERT_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const ENV_FILE_VAR: &str = "STOCK_ALERT_ENV_FILE";
pub const DEFAULT_ENV_FILE: &str = "api.env";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse config file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read credentials file: {0}")]
    EnvFile(#[from] dotenvy::Error),
}

/// Non-secret settings. Every field has a default so the file is optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub stock_symbol: String,
    pub company_name: String,
    pub alert_threshold: f64,
    pub stock_endpoint: String,
    pub news_endpoint: String,
    pub twilio_endpoint: String,
    pub channel_prefix: String,
    pub article_limit: usize,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            stock_symbol: "TSLA".into(),
            company_name: "Tesla Inc".into(),
            alert_threshold: 1.0,
            stock_endpoint: "https://www.alphavantage.co/query".into(),
            news_endpoint: "https://newsapi.org/v2/everything".into(),
            twilio_endpoint: "https://api.twilio.com".into(),
            channel_prefix: "whatsapp".into(),
            article_limit: 3,
            request_timeout_secs: 10,
        }
    }
}

/// API keys and phone numbers, taken once at startup from the process
/// environment, then from the credentials file. Missing values stay empty and
/// fail at the call that needs them.
#[derive(Clone, Default)]
pub struct Credentials {
    pub stock_api_key: String,
    pub news_api_key: String,
    pub twilio_sid: String,
    pub twilio_token: String,
    pub sender_number: String,
    pub recipient_number: String,
}

impl Credentials {
    pub fn from_env(file_vars: &HashMap<String, String>) -> Self {
        Self::from_layers(|key| env::var(key).ok(), file_vars)
    }

    /// Exported variables win over the file, as with `dotenvy::from_filename`.
    fn from_layers(
        lookup: impl Fn(&str) -> Option<String>,
        file_vars: &HashMap<String, String>,
    ) -> Self {
        let get = |key: &str| {
            lookup(key)
                .or_else(|| file_vars.get(key).cloned())
                .unwrap_or_default()
        };
        Self {
            stock_api_key: get("STOCK_API_KEY"),
            news_api_key: get("NEWS_API_KEY"),
            twilio_sid: get("TWILIO_SID"),
            twilio_token: get("TWILIO_TOKEN"),
            sender_number: get("TWILIO_WHATSAPP_NUMBER"),
            recipient_number: get("MY_WHATSAPP_NUMBER"),
        }
    }

    /// Names of the variables that were not set, for a startup warning.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            ("STOCK_API_KEY", &self.stock_api_key),
            ("NEWS_API_KEY", &self.news_api_key),
            ("TWILIO_SID", &self.twilio_sid),
            ("TWILIO_TOKEN", &self.twilio_token),
            ("TWILIO_WHATSAPP_NUMBER", &self.sender_number),
            ("MY_WHATSAPP_NUMBER", &self.recipient_number),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("stock_api_key", &"<redacted>")
            .field("news_api_key", &"<redacted>")
            .field("twilio_sid", &"<redacted>")
            .field("twilio_token", &"<redacted>")
            .field("sender_number", &self.sender_number)
            .field("recipient_number", &self.recipient_number)
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub settings: Settings,
    pub credentials: Credentials,
}

impl AppConfig {
    /// `whatsapp:+15550001111` style address for the sender.
    pub fn from_address(&self) -> String {
        channel_address(&self.settings.channel_prefix, &self.credentials.sender_number)
    }

    pub fn to_address(&self) -> String {
        channel_address(&self.settings.channel_prefix, &self.credentials.recipient_number)
    }
}

fn channel_address(prefix: &str, number: &str) -> String {
    if prefix.is_empty() {
        number.to_string()
    } else {
        format!("{}:{}", prefix, number)
    }
}

/// Reads settings from `path` when it exists, otherwise falls back to defaults.
pub fn load_settings(path: &Path) -> Result<Option<Settings>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let settings: Settings = serde_json::from_str(&content)?;
    Ok(Some(settings))
}

/// Reads `KEY=value` pairs from a dotenv file without touching the process
/// environment. `Ok(None)` when the file does not exist.
pub fn read_env_file(path: &Path) -> Result<Option<HashMap<String, String>>, ConfigError> {
    match dotenvy::from_filename_iter(path) {
        Ok(iter) => Ok(Some(iter.collect::<Result<HashMap<_, _>, dotenvy::Error>>()?)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn load_config() -> Result<AppConfig, ConfigError> {
    let path = env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let settings = match load_settings(Path::new(&path))? {
        Some(settings) => {
            tracing::info!("Loaded settings from {}", path);
            settings
        }
        None => {
            tracing::info!("No settings file at {}, using defaults", path);
            Settings::default()
        }
    };

    let env_path = env::var(ENV_FILE_VAR).unwrap_or_else(|_| DEFAULT_ENV_FILE.to_string());
    let file_vars = match read_env_file(Path::new(&env_path))? {
        Some(vars) => {
            tracing::info!("Loaded credentials file {}", env_path);
            vars
        }
        None => {
            tracing::info!("No credentials file at {}, using process environment", env_path);
            HashMap::new()
        }
    };

    Ok(AppConfig {
        settings,
        credentials: Credentials::from_env(&file_vars),
    })
}
